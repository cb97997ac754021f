// crates/testgate-core/src/status.rs
// ============================================================================
// Module: Test Status
// Description: Outcome of a previous test execution.
// Purpose: Let selection filter on results recorded by an earlier run.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! [`TestStatus`] is the outcome a previous run recorded for a test. Results
//! are owned by the execution layer; this crate only names the values.

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;
use serde::Serialize;

/// Outcome recorded for a test by an earlier run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TestStatus {
    /// The test passed.
    Passed,
    /// The test ran and failed.
    Failed,
    /// The test could not be run correctly.
    Error,
    /// The test has no recorded result.
    NotRun,
}

impl TestStatus {
    /// Returns the stable label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Passed => "passed",
            Self::Failed => "failed",
            Self::Error => "error",
            Self::NotRun => "not_run",
        }
    }
}

impl fmt::Display for TestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TestStatus {
    type Err = String;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        match text.to_ascii_lowercase().as_str() {
            "passed" | "pass" => Ok(Self::Passed),
            "failed" | "fail" => Ok(Self::Failed),
            "error" => Ok(Self::Error),
            "not_run" | "notrun" => Ok(Self::NotRun),
            other => Err(format!("unknown test status: {other}")),
        }
    }
}
