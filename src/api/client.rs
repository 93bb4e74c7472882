use std::rc::Rc;

use bytes::Bytes;
use http::Method;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::{
    common::data::{
        ErrorBody, HttpErrorResponse, HttpRequest, HttpResponse, RequestBody, ResponseType,
    },
    registry::RequestRegistry,
};

/// The HTTP client handed to code under test. Every call it issues is recorded in the
/// registry of the [TestingModule](crate::TestingModule) it came from, instead of going over
/// the network.
///
/// # Example
/// ```
/// use httpflush::TestingModule;
/// use serde::Deserialize;
///
/// #[derive(Deserialize, Debug, PartialEq)]
/// struct Data {
///     name: String,
/// }
///
/// let module = TestingModule::new();
/// let client = module.client();
///
/// client.get("/data").subscribe(
///     |data: Data| assert_eq!(data.name, "Test Data"),
///     |err| panic!("unexpected error: {}", err),
/// );
///
/// module
///     .controller()
///     .expect_one("/data")
///     .flush(serde_json::json!({ "name": "Test Data" }));
/// ```
#[derive(Clone)]
pub struct HttpClient {
    registry: Rc<RequestRegistry>,
}

impl HttpClient {
    pub(crate) fn new(registry: Rc<RequestRegistry>) -> Self {
        Self { registry }
    }

    pub fn request(&self, method: Method, url: impl Into<String>) -> RequestBuilder {
        RequestBuilder {
            registry: self.registry.clone(),
            request: HttpRequest::new(method, url),
        }
    }

    pub fn get(&self, url: impl Into<String>) -> RequestBuilder {
        self.request(Method::GET, url)
    }

    pub fn post(&self, url: impl Into<String>) -> RequestBuilder {
        self.request(Method::POST, url)
    }

    pub fn put(&self, url: impl Into<String>) -> RequestBuilder {
        self.request(Method::PUT, url)
    }

    pub fn patch(&self, url: impl Into<String>) -> RequestBuilder {
        self.request(Method::PATCH, url)
    }

    pub fn delete(&self, url: impl Into<String>) -> RequestBuilder {
        self.request(Method::DELETE, url)
    }

    pub fn head(&self, url: impl Into<String>) -> RequestBuilder {
        self.request(Method::HEAD, url)
    }
}

/// A call that has been described but not issued yet. Nothing is recorded until one of the
/// `subscribe` methods is called.
#[must_use = "requests are only issued when subscribed"]
pub struct RequestBuilder {
    registry: Rc<RequestRegistry>,
    request: HttpRequest,
}

impl RequestBuilder {
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.request.push_header(name.into(), value.into());
        self
    }

    /// Adds a query parameter. Parameters are kept apart from the URL and appended when the
    /// request is matched or reported.
    pub fn query(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.request.push_param(name.into(), value.into());
        self
    }

    pub fn json(mut self, body: Value) -> Self {
        self.request.set_body(RequestBody::Json(body));
        self
    }

    pub fn text(mut self, body: impl Into<String>) -> Self {
        self.request.set_body(RequestBody::Text(body.into()));
        self
    }

    pub fn bytes(mut self, body: impl Into<Bytes>) -> Self {
        self.request.set_body(RequestBody::Binary(body.into()));
        self
    }

    pub fn response_type(mut self, response_type: ResponseType) -> Self {
        self.request.set_response_type(response_type);
        self
    }

    /// Issues the request. Exactly one of the two callbacks runs when the test resolves it.
    ///
    /// The response body is decoded into `T` according to the request's [ResponseType]. A
    /// body that cannot be decoded goes to `on_error` as [ErrorBody::Parse].
    pub fn subscribe<T, S, E>(self, on_next: S, on_error: E)
    where
        T: DeserializeOwned + 'static,
        S: FnOnce(T) + 'static,
        E: FnOnce(HttpErrorResponse) + 'static,
    {
        self.subscribe_result(move |result: Result<T, HttpErrorResponse>| match result {
            Ok(value) => on_next(value),
            Err(err) => on_error(err),
        })
    }

    /// Issues the request and passes the decoded outcome to a single callback.
    pub fn subscribe_result<T, F>(self, callback: F)
    where
        T: DeserializeOwned + 'static,
        F: FnOnce(Result<T, HttpErrorResponse>) + 'static,
    {
        let response_type = self.request.response_type();
        self.registry.record(
            self.request,
            Box::new(move |outcome: Result<HttpResponse, HttpErrorResponse>| {
                callback(outcome.and_then(|res| decode(res, response_type)))
            }),
        );
    }

    /// Issues the request and hands over the raw response, including status and headers.
    pub fn subscribe_response<S, E>(self, on_next: S, on_error: E)
    where
        S: FnOnce(HttpResponse) + 'static,
        E: FnOnce(HttpErrorResponse) + 'static,
    {
        self.registry.record(
            self.request,
            Box::new(move |outcome: Result<HttpResponse, HttpErrorResponse>| match outcome {
                Ok(response) => on_next(response),
                Err(err) => on_error(err),
            }),
        );
    }
}

fn decode<T: DeserializeOwned>(
    response: HttpResponse,
    response_type: ResponseType,
) -> Result<T, HttpErrorResponse> {
    let parse_error = |message: String| HttpErrorResponse {
        url: response.url.clone(),
        status: response.status,
        status_text: response.status_text.clone(),
        headers: response.headers.clone(),
        error: ErrorBody::Parse(message),
    };

    let value = response.body.decode(response_type).map_err(parse_error)?;
    serde_json::from_value(value).map_err(|err| parse_error(err.to_string()))
}
