//! Lets plain HTML forms issue `PUT` and `DELETE` requests.
//!
//! A `POST` whose query string carries `_method=PUT` or `_method=DELETE`, in
//! any case, is rewritten to that method before it reaches the router.

use axum::{
    extract::{Query, Request},
    http::Method,
};
use serde::Deserialize;
use tracing::debug;

#[derive(Copy, Clone, Eq, PartialEq, Debug)]
enum OverrideMethod {
    Put,
    Patch,
    Delete,
}

impl OverrideMethod {
    const ALL: [Self; 3] = [Self::Put, Self::Patch, Self::Delete];

    /// Method names are matched ignoring ASCII case.
    fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|&method| Method::from(method).as_str().eq_ignore_ascii_case(name))
    }
}

#[derive(Clone, Eq, PartialEq, Debug, Deserialize)]
struct MethodOverride {
    #[serde(rename = "_method")]
    method: Option<String>,
}

impl From<OverrideMethod> for Method {
    fn from(value: OverrideMethod) -> Self {
        match value {
            OverrideMethod::Put => Method::PUT,
            OverrideMethod::Patch => Method::PATCH,
            OverrideMethod::Delete => Method::DELETE,
        }
    }
}

pub fn override_method(mut request: Request) -> Request {
    if request.method() != Method::POST {
        return request;
    }

    let requested = Query::try_from_uri(request.uri())
        .ok()
        .and_then(|Query(MethodOverride { method })| method);
    if let Some(method) = requested.as_deref().and_then(OverrideMethod::from_name) {
        debug!(uri = %request.uri(), ?method, "Overriding request method");
        *request.method_mut() = method.into();
    }

    request
}

#[cfg(test)]
mod tests {
    use crate::server::method_override::override_method;
    use axum::{body::Body, extract::Request, http::Method};

    fn rewritten(method: Method, uri: &str) -> Method {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap();

        override_method(request).method().clone()
    }

    #[test]
    fn post_with_override_is_rewritten() {
        assert_eq!(rewritten(Method::POST, "/stories/1?_method=PUT"), Method::PUT);
        assert_eq!(
            rewritten(Method::POST, "/stories/1?x=1&_method=DELETE"),
            Method::DELETE
        );
        assert_eq!(rewritten(Method::POST, "/stories/1?_method=put"), Method::PUT);
        assert_eq!(rewritten(Method::POST, "/stories/1?_method=Delete"), Method::DELETE);
    }

    #[test]
    fn other_requests_are_untouched() {
        assert_eq!(rewritten(Method::POST, "/stories"), Method::POST);
        assert_eq!(rewritten(Method::POST, "/stories/1?_method=GET"), Method::POST);
        assert_eq!(rewritten(Method::POST, "/stories/1?_method=PUTS"), Method::POST);
        assert_eq!(rewritten(Method::GET, "/stories/1?_method=DELETE"), Method::GET);
    }
}
