// src/config.rs
// Runner configuration

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunnerConfig {
    /// Print a colored line per case and a summary to stdout.
    #[serde(default)]
    pub print_report: bool,

    #[serde(default = "default_enable_timestamps")]
    pub enable_timestamps: bool,

    #[serde(default = "default_enable_colors")]
    pub enable_colors: bool,
}

fn default_enable_timestamps() -> bool {
    true
}
fn default_enable_colors() -> bool {
    true
}

impl Default for RunnerConfig {
    fn default() -> Self {
        RunnerConfig {
            print_report: false,
            enable_timestamps: default_enable_timestamps(),
            enable_colors: default_enable_colors(),
        }
    }
}

impl RunnerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_report_output(mut self, enable: bool) -> Self {
        self.print_report = enable;
        self
    }

    pub fn with_timestamps(mut self, enable: bool) -> Self {
        self.enable_timestamps = enable;
        self
    }

    pub fn with_colors(mut self, enable: bool) -> Self {
        self.enable_colors = enable;
        self
    }
}
