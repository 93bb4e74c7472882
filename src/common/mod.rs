pub mod data;
pub mod error;
pub(crate) mod util;
