use std::{fmt, rc::Rc};

use http::Method;
use regex::Regex;

use crate::common::data::HttpRequest;

/// Locates pending requests in the registry.
///
/// A plain string compares for equality against [HttpRequest::url_with_params]. Use
/// [RequestMatcher::predicate] for anything a URL cannot express.
///
/// # Example
/// ```
/// use httpflush::{Method, RequestMatcher};
///
/// let by_url: RequestMatcher = "/data".into();
/// let by_method_and_url = RequestMatcher::method_url(Method::POST, "/data");
/// let by_header = RequestMatcher::predicate(|req| req.has_header("Authorization"));
///
/// assert_eq!(by_url.to_string(), "Match URL: /data");
/// assert_eq!(by_method_and_url.to_string(), "Match method: POST, URL: /data");
/// # let _ = by_header;
/// ```
#[derive(Clone)]
pub enum RequestMatcher {
    Url(String),
    Description {
        method: Option<Method>,
        url: Option<String>,
    },
    UrlRegex(Regex),
    Predicate(Rc<dyn Fn(&HttpRequest) -> bool>),
}

impl RequestMatcher {
    pub fn url(url: impl Into<String>) -> Self {
        RequestMatcher::Url(url.into())
    }

    pub fn method(method: Method) -> Self {
        RequestMatcher::Description {
            method: Some(method),
            url: None,
        }
    }

    pub fn method_url(method: Method, url: impl Into<String>) -> Self {
        RequestMatcher::Description {
            method: Some(method),
            url: Some(url.into()),
        }
    }

    pub fn url_regex(regex: Regex) -> Self {
        RequestMatcher::UrlRegex(regex)
    }

    pub fn predicate<F>(f: F) -> Self
    where
        F: Fn(&HttpRequest) -> bool + 'static,
    {
        RequestMatcher::Predicate(Rc::new(f))
    }

    pub fn matches(&self, req: &HttpRequest) -> bool {
        match self {
            RequestMatcher::Url(url) => req.url_with_params() == *url,
            RequestMatcher::Description { method, url } => {
                method.as_ref().map_or(true, |m| req.method() == m)
                    && url.as_ref().map_or(true, |u| req.url_with_params() == *u)
            }
            RequestMatcher::UrlRegex(regex) => regex.is_match(&req.url_with_params()),
            RequestMatcher::Predicate(f) => f(req),
        }
    }

    /// The textual target this matcher compares URLs against, if it has one.
    pub(crate) fn expected_url(&self) -> Option<String> {
        match self {
            RequestMatcher::Url(url) => Some(url.clone()),
            RequestMatcher::Description { url, .. } => url.clone(),
            RequestMatcher::UrlRegex(regex) => Some(regex.as_str().to_string()),
            RequestMatcher::Predicate(_) => None,
        }
    }

    /// Edit distance between what this matcher expects and the given request. Predicates are
    /// opaque and have no distance.
    pub(crate) fn distance(&self, req: &HttpRequest) -> Option<usize> {
        match self {
            RequestMatcher::Url(url) => Some(string_distance(url, &req.url_with_params())),
            RequestMatcher::Description { method, url } => {
                let method_distance = method
                    .as_ref()
                    .map(|m| string_distance(m.as_str(), req.method().as_str()))
                    .unwrap_or(0);
                let url_distance = url
                    .as_ref()
                    .map(|u| string_distance(u, &req.url_with_params()))
                    .unwrap_or(0);
                Some(method_distance + url_distance)
            }
            RequestMatcher::UrlRegex(regex) => {
                Some(regex_unmatched_length(&req.url_with_params(), regex))
            }
            RequestMatcher::Predicate(_) => None,
        }
    }
}

fn string_distance(expected: &str, actual: &str) -> usize {
    stringmetrics::levenshtein(expected, actual) as usize
}

/// Number of characters in `text` not covered by any match of `re`.
fn regex_unmatched_length(text: &str, re: &Regex) -> usize {
    let matched: usize = re.find_iter(text).map(|m| m.end() - m.start()).sum();
    text.len() - matched
}

impl fmt::Display for RequestMatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequestMatcher::Url(url) => write!(f, "Match URL: {}", url),
            RequestMatcher::Description { method, url } => match (method, url) {
                (Some(m), Some(u)) => write!(f, "Match method: {}, URL: {}", m, u),
                (Some(m), None) => write!(f, "Match method: {}, URL: (any)", m),
                (None, Some(u)) => write!(f, "Match method: (any), URL: {}", u),
                (None, None) => write!(f, "Match method: (any), URL: (any)"),
            },
            RequestMatcher::UrlRegex(regex) => write!(f, "Match URL by regex: {}", regex),
            RequestMatcher::Predicate(_) => write!(f, "Match by function"),
        }
    }
}

impl fmt::Debug for RequestMatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RequestMatcher({})", self)
    }
}

impl From<&str> for RequestMatcher {
    fn from(url: &str) -> Self {
        RequestMatcher::Url(url.to_string())
    }
}

impl From<String> for RequestMatcher {
    fn from(url: String) -> Self {
        RequestMatcher::Url(url)
    }
}

impl From<&String> for RequestMatcher {
    fn from(url: &String) -> Self {
        RequestMatcher::Url(url.clone())
    }
}

impl From<Regex> for RequestMatcher {
    fn from(regex: Regex) -> Self {
        RequestMatcher::UrlRegex(regex)
    }
}

impl From<(Method, &str)> for RequestMatcher {
    fn from((method, url): (Method, &str)) -> Self {
        RequestMatcher::method_url(method, url)
    }
}

impl From<&RequestMatcher> for RequestMatcher {
    fn from(matcher: &RequestMatcher) -> Self {
        matcher.clone()
    }
}
