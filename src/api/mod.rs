pub use client::{HttpClient, RequestBuilder};
pub use controller::{HttpTestingController, Matches};
pub use module::TestingModule;
pub use request::TestRequest;

mod client;
mod controller;
mod module;
pub mod output;
mod request;
