// src/report.rs
// Per-case and per-run outcomes of a table of HTTP test cases

use std::fmt;
use std::time::Duration;

use crate::case::TestCase;

/// A non-fatal assertion failure. The case keeps running after one is recorded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mismatch {
    Status {
        expected: u16,
        actual: u16,
    },
    Header {
        name: String,
        expected: String,
        /// `None` when the response did not carry the header at all.
        actual: Option<String>,
    },
    Body {
        expected: String,
        actual: String,
    },
    BodyCheck,
    /// Recorded by a hook or body check through [`CaseReport::fail`].
    Custom(String),
}

impl fmt::Display for Mismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mismatch::Status { expected, actual } => {
                write!(f, "Expected status {}, got {}", expected, actual)
            }
            Mismatch::Header {
                name,
                expected,
                actual: Some(actual),
            } => write!(
                f,
                "Expected header '{}' to be '{}', got '{}'",
                name, expected, actual
            ),
            Mismatch::Header {
                name,
                expected,
                actual: None,
            } => write!(
                f,
                "Expected header '{}' to be '{}', header not present",
                name, expected
            ),
            Mismatch::Body { expected, actual } => {
                write!(f, "Expected body {:?}, got {:?}", expected, actual)
            }
            Mismatch::BodyCheck => write!(f, "Body check function returned false"),
            Mismatch::Custom(msg) => write!(f, "{}", msg),
        }
    }
}

/// An error that ends the current case. Later cases still run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaseError {
    /// The case itself could not be turned into a request, or one of its
    /// functions panicked.
    Fixture(String),
    /// The response body could not be drained.
    BodyRead(String),
}

impl fmt::Display for CaseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CaseError::Fixture(msg) => write!(f, "Invalid test fixture: {}", msg),
            CaseError::BodyRead(msg) => write!(f, "Failed to read response body: {}", msg),
        }
    }
}

impl std::error::Error for CaseError {}

/// Outcome of one case.
#[derive(Debug, Clone)]
pub struct CaseReport {
    index: usize,
    name: String,
    mismatches: Vec<Mismatch>,
    error: Option<CaseError>,
    elapsed: Duration,
}

impl CaseReport {
    /// `index` is 1-based.
    pub fn new(index: usize, case: &TestCase) -> Self {
        CaseReport {
            index,
            name: format!(
                "({}) Test {} {}",
                index,
                case.method(),
                case.request.target
            ),
            mismatches: Vec::new(),
            error: None,
            elapsed: Duration::ZERO,
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn mismatches(&self) -> &[Mismatch] {
        &self.mismatches
    }

    pub fn error(&self) -> Option<&CaseError> {
        self.error.as_ref()
    }

    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    pub fn passed(&self) -> bool {
        self.mismatches.is_empty() && self.error.is_none()
    }

    /// Record a custom failure without stopping the case.
    pub fn fail(&mut self, message: impl Into<String>) {
        self.record(Mismatch::Custom(message.into()));
    }

    pub(crate) fn record(&mut self, mismatch: Mismatch) {
        log::warn!("{}: {}", self.name, mismatch);
        self.mismatches.push(mismatch);
    }

    pub(crate) fn abort(&mut self, error: CaseError) {
        log::error!("{}: {}", self.name, error);
        self.error = Some(error);
    }

    pub(crate) fn set_elapsed(&mut self, elapsed: Duration) {
        self.elapsed = elapsed;
    }

    /// Failure lines, one per mismatch, then the fatal error if any.
    pub fn failure_lines(&self) -> Vec<String> {
        let mut lines: Vec<String> = self.mismatches.iter().map(|m| m.to_string()).collect();
        if let Some(ref err) = self.error {
            lines.push(err.to_string());
        }
        lines
    }
}

/// Outcome of a whole table, cases in execution order.
#[derive(Debug, Clone, Default)]
pub struct RunReport {
    cases: Vec<CaseReport>,
}

impl RunReport {
    pub fn new(cases: Vec<CaseReport>) -> Self {
        RunReport { cases }
    }

    pub fn cases(&self) -> &[CaseReport] {
        &self.cases
    }

    /// Look up a case by its 1-based index.
    pub fn case(&self, index: usize) -> Option<&CaseReport> {
        index.checked_sub(1).and_then(|i| self.cases.get(i))
    }

    pub fn passed(&self) -> bool {
        self.cases.iter().all(CaseReport::passed)
    }

    pub fn failed_cases(&self) -> impl Iterator<Item = &CaseReport> {
        self.cases.iter().filter(|c| !c.passed())
    }

    pub fn summary(&self) -> String {
        let failed = self.failed_cases().count();
        format!(
            "{} cases: {} passed, {} failed",
            self.cases.len(),
            self.cases.len() - failed,
            failed
        )
    }

    /// Panics with every failure of every failed case if anything failed.
    pub fn assert_passed(&self) {
        if self.passed() {
            return;
        }

        let mut message = self.summary();
        for case in self.failed_cases() {
            message.push_str(&format!("\n--- FAIL: {}", case.name()));
            for line in case.failure_lines() {
                message.push_str(&format!("\n    {}", line));
            }
        }
        panic!("{}", message);
    }
}
