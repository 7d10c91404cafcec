// src/logger.rs
// Colored case verdicts with timestamps, plus env_logger setup for tests

use chrono::{DateTime, Local};
use colored::*;
use std::fmt;

use crate::config::RunnerConfig;
use crate::report::{CaseReport, RunReport};

#[derive(Debug, Clone, Copy)]
pub enum Verdict {
    Pass,
    Fail,
    Info,
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Verdict::Pass => write!(f, "{}", " PASS ".on_green().bold().white()),
            Verdict::Fail => write!(f, "{}", " FAIL ".on_red().bold().white()),
            Verdict::Info => write!(f, "{}", " INFO ".on_magenta().bold().white()),
        }
    }
}

pub struct ReportLogger {
    pub enable_timestamps: bool,
    pub enable_colors: bool,
}

impl ReportLogger {
    pub fn new() -> Self {
        Self {
            enable_timestamps: true,
            enable_colors: true,
        }
    }

    pub fn from_config(config: &RunnerConfig) -> Self {
        Self::new()
            .with_timestamps(config.enable_timestamps)
            .with_colors(config.enable_colors)
    }

    pub fn with_timestamps(mut self, enable: bool) -> Self {
        self.enable_timestamps = enable;
        self
    }

    pub fn with_colors(mut self, enable: bool) -> Self {
        self.enable_colors = enable;
        self
    }

    fn format_timestamp(&self) -> String {
        if self.enable_timestamps {
            let now: DateTime<Local> = Local::now();
            format!("{} ", now.format("%Y-%m-%d %H:%M:%S").to_string().dimmed())
        } else {
            String::new()
        }
    }

    fn emit(&self, line: &str) {
        if self.enable_colors {
            println!("{}", line);
        } else {
            println!("{}", strip_ansi_codes(line));
        }
    }

    /// Verdict line for one case followed by its indented failures.
    pub fn format_case(&self, report: &CaseReport) -> Vec<String> {
        let timestamp = self.format_timestamp();
        let verdict = if report.passed() {
            Verdict::Pass
        } else {
            Verdict::Fail
        };
        let elapsed = report.elapsed().as_millis();

        let mut lines = vec![format!(
            "{}{} {} in {} ms",
            timestamp,
            verdict,
            report.name().cyan(),
            elapsed
        )];
        for failure in report.failure_lines() {
            lines.push(format!("    {}", failure.red()));
        }
        lines
    }

    pub fn case_result(&self, report: &CaseReport) {
        for line in self.format_case(report) {
            self.emit(&line);
        }
    }

    pub fn summary(&self, run: &RunReport) {
        let headline = if run.passed() {
            format!("{}", "All cases passed".green().bold())
        } else {
            format!("{}", "Some cases failed".red().bold())
        };

        if atty::is(atty::Stream::Stdout) {
            self.print_boxed(&format!("{}\n\n{}", headline, run.summary()));
        } else {
            let line = format!("{}{} {}", self.format_timestamp(), Verdict::Info, run.summary());
            self.emit(&line);
        }
    }

    pub fn print_boxed(&self, message: &str) {
        let lines: Vec<&str> = message.lines().collect();
        if lines.is_empty() {
            return;
        }

        let max_width = lines
            .iter()
            .map(|line| strip_ansi_codes(line).chars().count())
            .max()
            .unwrap_or(0);

        let box_width = max_width + 4; // 2 spaces padding on each side

        self.emit(&format!("┌{}┐", "─".repeat(box_width)));
        self.emit(&format!("│{}│", " ".repeat(box_width)));

        for line in lines {
            let stripped_len = strip_ansi_codes(line).chars().count();
            let padding = " ".repeat((box_width - stripped_len) / 2);
            let right_padding = " ".repeat(box_width - stripped_len - padding.len());
            self.emit(&format!("│{}{}{}│", padding, line, right_padding));
        }

        self.emit(&format!("│{}│", " ".repeat(box_width)));
        self.emit(&format!("└{}┘", "─".repeat(box_width)));
    }
}

impl Default for ReportLogger {
    fn default() -> Self {
        Self::new()
    }
}

// Helper function to strip ANSI color codes for width calculation
fn strip_ansi_codes(s: &str) -> String {
    let mut result = String::new();
    let mut in_escape = false;
    let mut chars = s.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch == '\x1b' && chars.peek() == Some(&'[') {
            in_escape = true;
            continue;
        }

        if in_escape {
            if ch.is_ascii_alphabetic() {
                in_escape = false;
            }
            continue;
        }

        result.push(ch);
    }

    result
}

/// Route `log` output through env_logger, captured per test. Safe to call
/// from every test.
pub fn init_test_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}
