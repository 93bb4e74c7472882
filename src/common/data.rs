use std::{borrow::Cow, fmt, rc::Rc};

use bytes::Bytes;
use http::{Method, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use url::Url;

use crate::common::{error::Error, util::find_header};

/// Describes how the client interprets a flushed response body before handing it to a
/// subscriber.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResponseType {
    /// Interpret the body as JSON. Text bodies are parsed, an empty body becomes `null`.
    #[default]
    Json,
    /// Interpret the body as a UTF-8 string.
    Text,
    /// Interpret the body as raw bytes.
    Bytes,
}

/// The body a client attaches to an outgoing request.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub enum RequestBody {
    #[default]
    Empty,
    Text(String),
    Json(Value),
    Binary(Bytes),
}

impl RequestBody {
    pub fn is_empty(&self) -> bool {
        matches!(self, RequestBody::Empty)
    }

    /// Returns the body as JSON, if it was attached as JSON or is text that parses as JSON.
    pub fn as_json(&self) -> Option<Cow<'_, Value>> {
        match self {
            RequestBody::Json(v) => Some(Cow::Borrowed(v)),
            RequestBody::Text(s) => serde_json::from_str(s).ok().map(Cow::Owned),
            RequestBody::Binary(b) => serde_json::from_slice(b).ok().map(Cow::Owned),
            RequestBody::Empty => None,
        }
    }
}

/// An outgoing HTTP call as recorded by the testing backend. Instances are immutable once
/// the client has issued the call.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    method: Method,
    url: String,
    params: Vec<(String, String)>,
    headers: Vec<(String, String)>,
    body: RequestBody,
    response_type: ResponseType,
}

impl HttpRequest {
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            params: Vec::new(),
            headers: Vec::new(),
            body: RequestBody::Empty,
            response_type: ResponseType::default(),
        }
    }

    pub(crate) fn push_header(&mut self, name: String, value: String) {
        self.headers.push((name, value));
    }

    pub(crate) fn push_param(&mut self, name: String, value: String) {
        self.params.push((name, value));
    }

    pub(crate) fn set_body(&mut self, body: RequestBody) {
        self.body = body;
    }

    pub(crate) fn set_response_type(&mut self, response_type: ResponseType) {
        self.response_type = response_type;
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Returns the URL the request was issued for, without query parameters that were added
    /// through the request builder.
    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn params(&self) -> &[(String, String)] {
        &self.params
    }

    /// Returns the first value of the query parameter with the given name.
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Returns the URL including all query parameters. This is the value a URL matcher
    /// compares against.
    ///
    /// Parameters are form-urlencoded and appended with `?`, or with `&` if the URL
    /// already carries a query string.
    pub fn url_with_params(&self) -> String {
        if self.params.is_empty() {
            return self.url.clone();
        }

        let query = form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.params.iter())
            .finish();

        let separator = match self.url.find('?') {
            None => "?",
            Some(idx) if idx == self.url.len() - 1 => "",
            Some(_) if self.url.ends_with('&') => "",
            Some(_) => "&",
        };

        format!("{}{}{}", self.url, separator, query)
    }

    /// Returns the path component of the request URL. Relative URLs are resolved against
    /// a placeholder origin first.
    pub fn path(&self) -> String {
        let parsed = Url::parse(&self.url).or_else(|_| {
            Url::parse("http://localhost").and_then(|base| base.join(&self.url))
        });

        match parsed {
            Ok(url) => url.path().to_string(),
            Err(_) => self.url.clone(),
        }
    }

    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    /// Returns the first value of the header with the given name (case-insensitive).
    pub fn header(&self, name: &str) -> Option<&str> {
        find_header(&self.headers, name)
    }

    pub fn has_header(&self, name: &str) -> bool {
        self.header(name).is_some()
    }

    pub fn body(&self) -> &RequestBody {
        &self.body
    }

    pub fn response_type(&self) -> ResponseType {
        self.response_type
    }

    pub(crate) fn summary(&self, id: usize) -> RequestSummary {
        RequestSummary {
            id,
            method: self.method.to_string(),
            url: self.url_with_params(),
            header_names: self.headers.iter().map(|(k, _)| k.clone()).collect(),
        }
    }
}

/// The payload a test flushes into a pending request.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub enum ResponseBody {
    #[default]
    Empty,
    Text(String),
    Json(Value),
    Binary(Bytes),
}

impl ResponseBody {
    /// Serializes a value into a JSON response body.
    pub fn json<T: Serialize>(value: &T) -> Result<Self, Error> {
        serde_json::to_value(value)
            .map(ResponseBody::Json)
            .map_err(|err| Error::InvalidResponse(format!("cannot serialize body: {}", err)))
    }

    /// Returns the body as text, if it has a textual representation.
    pub fn as_text(&self) -> Option<Cow<'_, str>> {
        match self {
            ResponseBody::Empty => None,
            ResponseBody::Text(s) => Some(Cow::Borrowed(s)),
            ResponseBody::Json(v) => Some(Cow::Owned(v.to_string())),
            ResponseBody::Binary(b) => std::str::from_utf8(b).ok().map(Cow::Borrowed),
        }
    }

    /// Converts the body into a JSON value the way a client with the given response type
    /// would see it.
    pub(crate) fn decode(&self, response_type: ResponseType) -> Result<Value, String> {
        match (response_type, self) {
            (_, ResponseBody::Empty) => Ok(Value::Null),

            (ResponseType::Json, ResponseBody::Json(v)) => Ok(v.clone()),
            (ResponseType::Json, ResponseBody::Text(s)) if s.is_empty() => Ok(Value::Null),
            (ResponseType::Json, ResponseBody::Text(s)) => {
                serde_json::from_str(s).map_err(|err| err.to_string())
            }
            (ResponseType::Json, ResponseBody::Binary(b)) => {
                serde_json::from_slice(b).map_err(|err| err.to_string())
            }

            (ResponseType::Text, ResponseBody::Text(s)) => Ok(Value::String(s.clone())),
            (ResponseType::Text, ResponseBody::Json(v)) => Ok(Value::String(v.to_string())),
            (ResponseType::Text, ResponseBody::Binary(b)) => std::str::from_utf8(b)
                .map(|s| Value::String(s.to_string()))
                .map_err(|err| err.to_string()),

            (ResponseType::Bytes, ResponseBody::Binary(b)) => Ok(bytes_to_value(b)),
            (ResponseType::Bytes, ResponseBody::Text(s)) => Ok(bytes_to_value(s.as_bytes())),
            (ResponseType::Bytes, ResponseBody::Json(v)) => {
                Ok(bytes_to_value(v.to_string().as_bytes()))
            }
        }
    }
}

fn bytes_to_value(b: &[u8]) -> Value {
    Value::Array(b.iter().map(|byte| Value::from(*byte)).collect())
}

impl From<&str> for ResponseBody {
    fn from(value: &str) -> Self {
        ResponseBody::Text(value.to_string())
    }
}

impl From<String> for ResponseBody {
    fn from(value: String) -> Self {
        ResponseBody::Text(value)
    }
}

impl From<Value> for ResponseBody {
    fn from(value: Value) -> Self {
        ResponseBody::Json(value)
    }
}

impl From<Bytes> for ResponseBody {
    fn from(value: Bytes) -> Self {
        ResponseBody::Binary(value)
    }
}

impl From<Vec<u8>> for ResponseBody {
    fn from(value: Vec<u8>) -> Self {
        ResponseBody::Binary(Bytes::from(value))
    }
}

impl From<()> for ResponseBody {
    fn from(_: ()) -> Self {
        ResponseBody::Empty
    }
}

/// Status metadata attached to a flushed response or a simulated error.
#[derive(Debug, Clone, PartialEq)]
pub struct ResponseOptions {
    pub status: u16,
    pub status_text: Option<String>,
    pub headers: Vec<(String, String)>,
}

impl Default for ResponseOptions {
    fn default() -> Self {
        Self {
            status: 200,
            status_text: None,
            headers: Vec::new(),
        }
    }
}

impl ResponseOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Options for a transport level failure: status `0` and an empty status text.
    pub fn network() -> Self {
        Self {
            status: 0,
            status_text: Some(String::new()),
            headers: Vec::new(),
        }
    }

    pub fn status(mut self, status: u16) -> Self {
        self.status = status;
        self
    }

    pub fn status_text(mut self, text: impl Into<String>) -> Self {
        self.status_text = Some(text.into());
        self
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Validates the status code and returns the status text that goes with it. An explicit
    /// status text wins over the canonical reason phrase.
    pub(crate) fn resolve_status_text(&self, allow_network: bool) -> Result<String, Error> {
        if self.status == 0 {
            if allow_network {
                return Ok(self.status_text.clone().unwrap_or_default());
            }
            return Err(Error::InvalidResponse(
                "status 0 is reserved for network errors".to_string(),
            ));
        }

        let code = StatusCode::from_u16(self.status).map_err(|_| {
            Error::InvalidResponse(format!("{} is not a valid HTTP status code", self.status))
        })?;

        Ok(match &self.status_text {
            Some(text) => text.clone(),
            None => code.canonical_reason().unwrap_or_default().to_string(),
        })
    }
}

/// A successful response as delivered to the success continuation.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpResponse {
    pub url: String,
    pub status: u16,
    pub status_text: String,
    pub headers: Vec<(String, String)>,
    pub body: ResponseBody,
}

impl HttpResponse {
    pub fn header(&self, name: &str) -> Option<&str> {
        find_header(&self.headers, name)
    }

    pub fn is_ok(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// A transport level failure, such as a dropped connection, simulated by a test.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct NetworkError {
    message: String,
}

impl NetworkError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// What went wrong, as seen by the failure continuation.
#[derive(Debug, Clone)]
pub enum ErrorBody {
    /// The server answered with a non-success status. Holds the response body.
    Body(ResponseBody),
    /// The request never produced a response. Holds the opaque transport error.
    Network(Rc<dyn std::error::Error>),
    /// The response could not be decoded into the type the subscriber asked for.
    Parse(String),
}

impl ErrorBody {
    pub fn as_text(&self) -> Option<Cow<'_, str>> {
        match self {
            ErrorBody::Body(body) => body.as_text(),
            ErrorBody::Network(err) => Some(Cow::Owned(err.to_string())),
            ErrorBody::Parse(msg) => Some(Cow::Borrowed(msg)),
        }
    }

    /// Returns the transport error if this is a network failure.
    pub fn network_error(&self) -> Option<&dyn std::error::Error> {
        match self {
            ErrorBody::Network(err) => Some(err.as_ref()),
            _ => None,
        }
    }

    pub fn is_network(&self) -> bool {
        matches!(self, ErrorBody::Network(_))
    }
}

/// A failed call as delivered to the failure continuation.
#[derive(Debug, Clone)]
pub struct HttpErrorResponse {
    pub url: String,
    pub status: u16,
    pub status_text: String,
    pub headers: Vec<(String, String)>,
    pub error: ErrorBody,
}

impl HttpErrorResponse {
    pub fn header(&self, name: &str) -> Option<&str> {
        find_header(&self.headers, name)
    }

    pub fn message(&self) -> String {
        match &self.error {
            ErrorBody::Parse(msg) => {
                format!("Http failure during parsing for {}: {}", self.url, msg)
            }
            _ => format!(
                "Http failure response for {}: {} {}",
                self.url, self.status, self.status_text
            ),
        }
    }
}

impl fmt::Display for HttpErrorResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message())
    }
}

/// A compact, owned description of a recorded request used in diagnostics.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct RequestSummary {
    pub id: usize,
    pub method: String,
    pub url: String,
    pub header_names: Vec<String>,
}

impl fmt::Display for RequestSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.method, self.url)
    }
}

/// The pending request that came closest to a matcher that matched nothing.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ClosestMatch {
    pub request: RequestSummary,
    pub expected: String,
    pub distance: usize,
}
