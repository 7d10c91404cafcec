// src/runner.rs
// Runs a table of test cases against an in-process actix-web service

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::time::Instant;

use actix_web::{
    body::{self, MessageBody},
    dev::{Service, ServiceResponse},
    http::{
        header::{HeaderMap, HeaderName, HeaderValue},
        Method, Uri,
    },
    test::TestRequest,
    Error, HttpMessage,
};

use crate::case::{HeaderTable, TestCase};
use crate::config::RunnerConfig;
use crate::logger::ReportLogger;
use crate::report::{CaseError, CaseReport, Mismatch, RunReport};

pub struct HttpTestRunner {
    config: RunnerConfig,
    logger: ReportLogger,
}

impl HttpTestRunner {
    pub fn new() -> Self {
        Self::with_config(RunnerConfig::default())
    }

    pub fn with_config(config: RunnerConfig) -> Self {
        let logger = ReportLogger::from_config(&config);
        HttpTestRunner { config, logger }
    }

    pub fn config(&self) -> &RunnerConfig {
        &self.config
    }

    /// Run every case in order against `app`, which is typically the value
    /// returned by `actix_web::test::init_service`.
    ///
    /// Nothing is returned as an error: each case gets a named entry in the
    /// report, and a case that fails does not stop the ones after it.
    pub async fn run<S, B>(&self, app: &S, cases: &[TestCase]) -> RunReport
    where
        S: Service<actix_http::Request, Response = ServiceResponse<B>, Error = Error>,
        B: MessageBody + 'static,
    {
        let mut reports = Vec::with_capacity(cases.len());

        for (ind, case) in cases.iter().enumerate() {
            let mut report = CaseReport::new(ind + 1, case);
            log::debug!("{}: running", report.name());

            let start_time = Instant::now();
            if let Err(err) = run_case(app, case, &mut report).await {
                report.abort(err);
            }
            report.set_elapsed(start_time.elapsed());

            if report.passed() {
                log::info!("{}: ok", report.name());
            }
            if self.config.print_report {
                self.logger.case_result(&report);
            }
            reports.push(report);
        }

        let run = RunReport::new(reports);
        if self.config.print_report {
            self.logger.summary(&run);
        }
        run
    }
}

impl Default for HttpTestRunner {
    fn default() -> Self {
        Self::new()
    }
}

/// Run `cases` against `app` with the default configuration.
pub async fn run_http_tests<S, B>(app: &S, cases: &[TestCase]) -> RunReport
where
    S: Service<actix_http::Request, Response = ServiceResponse<B>, Error = Error>,
    B: MessageBody + 'static,
{
    HttpTestRunner::new().run(app, cases).await
}

/// Run `cases` against `app`, printing the report, and panic listing every
/// failed case if any failed.
pub async fn assert_http_tests<S, B>(app: &S, cases: &[TestCase])
where
    S: Service<actix_http::Request, Response = ServiceResponse<B>, Error = Error>,
    B: MessageBody + 'static,
{
    let runner = HttpTestRunner::with_config(RunnerConfig::new().with_report_output(true));
    runner.run(app, cases).await.assert_passed();
}

async fn run_case<S, B>(app: &S, case: &TestCase, report: &mut CaseReport) -> Result<(), CaseError>
where
    S: Service<actix_http::Request, Response = ServiceResponse<B>, Error = Error>,
    B: MessageBody + 'static,
{
    let mut req = build_request(case)?;

    if let Some(ref hook) = case.before_send {
        guard("before-send hook", || hook(&mut req, case, report))?;
    }

    // The request is consumed by the call; keep what is needed to rebuild it
    // if the service fails.
    let method = req.method().clone();
    let uri = req.uri().to_string();
    let headers = req.headers().clone();

    log::debug!("{}: dispatching", report.name());
    let res = match app.call(req).await {
        Ok(res) => res.map_into_boxed_body(),
        Err(err) => {
            // A server answers with the error's own response, so check that.
            log::debug!("{}: service error, checking its response: {}", report.name(), err);
            let mut rebuilt = TestRequest::default().method(method).uri(&uri);
            for (name, value) in headers.iter() {
                rebuilt = rebuilt.append_header((name.clone(), value.clone()));
            }
            ServiceResponse::new(rebuilt.to_http_request(), err.error_response())
        }
    };

    if let Some(ref hook) = case.after_receive {
        guard("after-receive hook", || hook(res.request(), &res, case, report))?;
    }

    let status = res.status().as_u16();
    if status != case.response.status_code {
        report.record(Mismatch::Status {
            expected: case.response.status_code,
            actual: status,
        });
    }

    for mismatch in compare_headers(&case.response.headers, res.headers()) {
        report.record(mismatch);
    }

    let body_bytes = body::to_bytes(res.into_body())
        .await
        .map_err(|e| CaseError::BodyRead(e.to_string()))?;
    let body = String::from_utf8_lossy(&body_bytes).into_owned();

    if !case.response.body.is_empty() && case.response.body != body {
        report.record(Mismatch::Body {
            expected: case.response.body.clone(),
            actual: body.clone(),
        });
    }

    if let Some(ref check) = case.response.body_check {
        if !guard("body check", || check(&body, case, report))? {
            report.record(Mismatch::BodyCheck);
        }
    }

    Ok(())
}

/// Build the synthetic request: method, target, body, static headers, then
/// generated headers on top.
fn build_request(case: &TestCase) -> Result<actix_http::Request, CaseError> {
    let spec = &case.request;

    let method = Method::from_bytes(case.method().as_bytes())
        .map_err(|_| CaseError::Fixture(format!("invalid method '{}'", spec.method)))?;

    // TestRequest::uri panics on bad input, so validate first.
    spec.target
        .parse::<Uri>()
        .map_err(|e| CaseError::Fixture(format!("invalid target '{}': {}", spec.target, e)))?;

    let body = if !spec.body.is_empty() {
        Some(spec.body.clone())
    } else if let Some(ref make) = spec.body_fn {
        Some(guard("body generator", || make(case))?)
    } else {
        None
    };

    let mut builder = TestRequest::default().method(method).uri(&spec.target);
    if let Some(body) = body {
        builder = builder.set_payload(body);
    }
    let mut req = builder.to_request();

    apply_headers(req.headers_mut(), &spec.headers)?;

    if let Some(ref make) = spec.headers_fn {
        let generated = guard("header generator", || make(case))?;
        apply_headers(req.headers_mut(), &generated)?;
    }

    Ok(req)
}

/// Insert each header, replacing any value already present under that name.
fn apply_headers(headers: &mut HeaderMap, table: &HeaderTable) -> Result<(), CaseError> {
    for (name, value) in table {
        let header_name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|_| CaseError::Fixture(format!("invalid header name '{}'", name)))?;
        let header_value = HeaderValue::from_str(value).map_err(|_| {
            CaseError::Fixture(format!("invalid value for header '{}': {:?}", name, value))
        })?;
        headers.insert(header_name, header_value);
    }
    Ok(())
}

/// A missing header compares as the empty string.
fn compare_headers(expected: &HeaderTable, actual: &HeaderMap) -> Vec<Mismatch> {
    let mut mismatches = Vec::new();

    for (name, expected_value) in expected {
        let actual_value = actual
            .get(name.as_str())
            .map(|v| String::from_utf8_lossy(v.as_bytes()).into_owned());

        if actual_value.as_deref().unwrap_or("") != expected_value.as_str() {
            mismatches.push(Mismatch::Header {
                name: name.clone(),
                expected: expected_value.clone(),
                actual: actual_value,
            });
        }
    }

    mismatches
}

/// Run a case-supplied function, turning a panic into a fatal fixture error
/// for this case only.
fn guard<T>(what: &str, f: impl FnOnce() -> T) -> Result<T, CaseError> {
    panic::catch_unwind(AssertUnwindSafe(f)).map_err(|payload| {
        CaseError::Fixture(format!("{} panicked: {}", what, panic_message(&*payload)))
    })
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        msg.to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic".to_string()
    }
}
