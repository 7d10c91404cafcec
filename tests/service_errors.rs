//! Service Error Integration Tests
//!
//! A service or middleware that returns an actix `Error` is checked against
//! the response that error renders to, as a running server would send it.

mod common;

use std::cell::RefCell;
use std::rc::Rc;

use actix_web::{dev::Service, error, test, App};
use httptestkit::{run_http_tests, Mismatch, TestCase};

use common::{routes, RejectingService};

/// The error's status, content type and message are what the checks see
#[actix_web::test]
async fn service_error_is_checked_as_its_response() {
    let cases = vec![
        TestCase::get("/anything")
            .expect_status(403)
            .expect_header("content-type", "text/plain; charset=utf-8")
            .expect_body("rejected by gateway"),
        TestCase::post("/else").with_body("payload").expect_status(403),
    ];

    let report = run_http_tests(&RejectingService, &cases).await;

    assert!(report.passed(), "{}", report.summary());
}

#[actix_web::test]
async fn service_error_with_unexpected_status_is_a_mismatch() {
    let cases = vec![TestCase::get("/anything").expect_status(200)];

    let report = run_http_tests(&RejectingService, &cases).await;
    let case = &report.cases()[0];

    assert!(case.error().is_none());
    assert_eq!(
        case.mismatches(),
        &[Mismatch::Status {
            expected: 200,
            actual: 403,
        }]
    );
}

/// Middleware rejecting a request without credentials, like an auth guard
#[actix_web::test]
async fn middleware_rejection_is_checked_like_a_response() {
    let app = test::init_service(App::new().configure(routes).wrap_fn(|req, srv| {
        let authorized = req.headers().contains_key("authorization");
        let fut = srv.call(req);
        async move {
            if !authorized {
                return Err(error::ErrorUnauthorized("no credentials"));
            }
            fut.await
        }
    }))
    .await;

    let cases = vec![
        TestCase::get("/health")
            .expect_status(401)
            .expect_body("no credentials"),
        TestCase::get("/health")
            .with_header("Authorization", "Bearer token")
            .expect_status(200)
            .expect_body("ok"),
    ];

    let report = run_http_tests(&app, &cases).await;

    assert!(report.passed(), "{}", report.summary());
}

/// The after-receive hook gets the request rebuilt from what was sent
#[actix_web::test]
async fn after_receive_hook_sees_request_of_failed_call() {
    let seen: Rc<RefCell<Vec<(String, String, Option<String>)>>> = Rc::default();

    let sink = Rc::clone(&seen);
    let cases = vec![TestCase::put("/items/7?force=1")
        .with_header("X-Trace", "abc")
        .after_receive(move |req, res, _, _| {
            let trace = req
                .headers()
                .get("x-trace")
                .and_then(|v| v.to_str().ok())
                .map(String::from);
            sink.borrow_mut()
                .push((req.method().to_string(), req.uri().to_string(), trace));
            assert_eq!(res.status().as_u16(), 403);
        })
        .expect_status(403)];

    let report = run_http_tests(&RejectingService, &cases).await;

    assert!(report.passed(), "{:?}", report.cases()[0].failure_lines());
    assert_eq!(
        seen.borrow().as_slice(),
        &[(
            "PUT".to_string(),
            "/items/7?force=1".to_string(),
            Some("abc".to_string())
        )]
    );
}
