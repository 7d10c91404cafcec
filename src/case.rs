// src/case.rs
// Declarative test case descriptors: request to send, response to expect, hooks

use std::collections::BTreeMap;
use std::fmt;

use actix_web::dev::ServiceResponse;
use actix_web::HttpRequest;
use serde::Serialize;

use crate::json::json_encode;
use crate::report::CaseReport;

/// Header name to header value. Ordered so failures are reported deterministically.
pub type HeaderTable = BTreeMap<String, String>;

/// Computes the request body when the case runs.
pub type BodyFn = Box<dyn Fn(&TestCase) -> String>;

/// Computes extra request headers when the case runs.
pub type HeadersFn = Box<dyn Fn(&TestCase) -> HeaderTable>;

/// Last-moment mutation of the request before it reaches the handler.
pub type BeforeSendFn = Box<dyn Fn(&mut actix_http::Request, &TestCase, &mut CaseReport)>;

/// Inspection of the request and the response before its body is read.
pub type AfterReceiveFn =
    Box<dyn Fn(&HttpRequest, &ServiceResponse, &TestCase, &mut CaseReport)>;

/// Verdict on the observed response body. The report lets a check say why it
/// returned false.
pub type BodyCheckFn = Box<dyn Fn(&str, &TestCase, &mut CaseReport) -> bool>;

/// What to send.
#[derive(Default)]
pub struct RequestSpec {
    /// HTTP method. Empty means `GET`.
    pub method: String,
    /// Path or absolute URL.
    pub target: String,
    pub headers: HeaderTable,
    /// Static body. Takes precedence over `body_fn` when non-empty.
    pub body: String,
    pub body_fn: Option<BodyFn>,
    /// Applied after `headers`, overwriting on collision.
    pub headers_fn: Option<HeadersFn>,
}

/// What to expect back.
pub struct ResponseSpec {
    pub status_code: u16,
    /// Only the listed headers are checked.
    pub headers: HeaderTable,
    /// Exact body. Not checked when empty.
    pub body: String,
    pub body_check: Option<BodyCheckFn>,
}

impl Default for ResponseSpec {
    fn default() -> Self {
        ResponseSpec {
            status_code: 200,
            headers: HeaderTable::new(),
            body: String::new(),
            body_check: None,
        }
    }
}

/// One request/expected-response pairing plus optional hooks.
///
/// Cases can be written as struct literals with `..Default::default()` or
/// assembled with the builder methods:
///
/// ```
/// use httptestkit::TestCase;
///
/// let case = TestCase::post("/echo")
///     .with_header("Content-Type", "text/plain")
///     .with_body("hello")
///     .expect_status(200)
///     .expect_body("hello");
///
/// assert_eq!(case.request.method, "POST");
/// assert_eq!(case.response.body, "hello");
/// ```
#[derive(Default)]
pub struct TestCase {
    pub request: RequestSpec,
    pub response: ResponseSpec,
    pub before_send: Option<BeforeSendFn>,
    pub after_receive: Option<AfterReceiveFn>,
}

impl TestCase {
    pub fn new(method: &str, target: &str) -> Self {
        TestCase {
            request: RequestSpec {
                method: method.to_string(),
                target: target.to_string(),
                ..Default::default()
            },
            ..Default::default()
        }
    }

    pub fn get(target: &str) -> Self {
        Self::new("GET", target)
    }

    pub fn post(target: &str) -> Self {
        Self::new("POST", target)
    }

    pub fn put(target: &str) -> Self {
        Self::new("PUT", target)
    }

    pub fn delete(target: &str) -> Self {
        Self::new("DELETE", target)
    }

    /// Method as sent on the wire.
    pub fn method(&self) -> &str {
        if self.request.method.is_empty() {
            "GET"
        } else {
            &self.request.method
        }
    }

    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.request
            .headers
            .insert(name.to_string(), value.to_string());
        self
    }

    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.request.body = body.into();
        self
    }

    pub fn with_body_fn(mut self, make: impl Fn(&TestCase) -> String + 'static) -> Self {
        self.request.body_fn = Some(Box::new(make));
        self
    }

    pub fn with_headers_fn(mut self, make: impl Fn(&TestCase) -> HeaderTable + 'static) -> Self {
        self.request.headers_fn = Some(Box::new(make));
        self
    }

    pub fn before_send(
        mut self,
        hook: impl Fn(&mut actix_http::Request, &TestCase, &mut CaseReport) + 'static,
    ) -> Self {
        self.before_send = Some(Box::new(hook));
        self
    }

    pub fn after_receive(
        mut self,
        hook: impl Fn(&HttpRequest, &ServiceResponse, &TestCase, &mut CaseReport) + 'static,
    ) -> Self {
        self.after_receive = Some(Box::new(hook));
        self
    }

    pub fn expect_status(mut self, status_code: u16) -> Self {
        self.response.status_code = status_code;
        self
    }

    pub fn expect_header(mut self, name: &str, value: &str) -> Self {
        self.response
            .headers
            .insert(name.to_string(), value.to_string());
        self
    }

    pub fn expect_body(mut self, body: impl Into<String>) -> Self {
        self.response.body = body.into();
        self
    }

    /// Expect the compact JSON encoding of `value` as the exact body.
    ///
    /// Panics if `value` cannot be encoded.
    pub fn expect_json<T: Serialize + ?Sized>(self, value: &T) -> Self {
        let body = json_encode(value);
        self.expect_body(body)
    }

    pub fn expect_body_fn(
        mut self,
        check: impl Fn(&str, &TestCase, &mut CaseReport) -> bool + 'static,
    ) -> Self {
        self.response.body_check = Some(Box::new(check));
        self
    }
}

fn presence<T>(value: &Option<T>) -> &'static str {
    if value.is_some() {
        "Some(<fn>)"
    } else {
        "None"
    }
}

impl fmt::Debug for RequestSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestSpec")
            .field("method", &self.method)
            .field("target", &self.target)
            .field("headers", &self.headers)
            .field("body", &self.body)
            .field("body_fn", &format_args!("{}", presence(&self.body_fn)))
            .field("headers_fn", &format_args!("{}", presence(&self.headers_fn)))
            .finish()
    }
}

impl fmt::Debug for ResponseSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResponseSpec")
            .field("status_code", &self.status_code)
            .field("headers", &self.headers)
            .field("body", &self.body)
            .field("body_check", &format_args!("{}", presence(&self.body_check)))
            .finish()
    }
}

impl fmt::Debug for TestCase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TestCase")
            .field("request", &self.request)
            .field("response", &self.response)
            .field("before_send", &format_args!("{}", presence(&self.before_send)))
            .field("after_receive", &format_args!("{}", presence(&self.after_receive)))
            .finish()
    }
}
