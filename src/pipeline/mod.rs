//! Rendering and output for command results.
//!
//! Command handlers produce records; this module turns them into JSON or a
//! summary and writes them to stdout or a file.

mod output;
mod summary;

pub use output::{should_use_color, write_output, OutputFormat, OutputTarget};
pub use summary::SummaryReporter;

use crate::model::{PredictionRecord, Severity};
use crate::scoring::RiskAssessment;
use anyhow::Result;

/// Exit codes for scripted use
pub mod exit_codes {
    /// Success
    pub const SUCCESS: i32 = 0;
    /// A high-severity result was produced and `--fail-on-high` was set
    pub const HIGH_RISK: i32 = 1;
    /// An error occurred
    pub const ERROR: i32 = 3;
}

/// Render records in `format`.
///
/// A single record renders as a JSON object, several as an array.
pub fn render_records(
    records: &[PredictionRecord],
    format: OutputFormat,
    colored: bool,
) -> Result<String> {
    match format {
        OutputFormat::Json => Ok(match records {
            [single] => serde_json::to_string_pretty(single)?,
            many => serde_json::to_string_pretty(many)?,
        }),
        OutputFormat::Summary => Ok(reporter(colored).records(records)),
    }
}

/// Render bare risk assessments in `format`.
pub fn render_assessments(
    assessments: &[RiskAssessment],
    format: OutputFormat,
    colored: bool,
) -> Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(assessments)?),
        OutputFormat::Summary => Ok(reporter(colored).assessments(assessments)),
    }
}

const fn reporter(colored: bool) -> SummaryReporter {
    if colored {
        SummaryReporter::new()
    } else {
        SummaryReporter::new().no_color()
    }
}

/// Exit code for a finished command.
#[must_use]
pub fn exit_code_for<I>(severities: I, fail_on_high: bool) -> i32
where
    I: IntoIterator<Item = Option<Severity>>,
{
    if fail_on_high && severities.into_iter().any(|s| s == Some(Severity::High)) {
        exit_codes::HIGH_RISK
    } else {
        exit_codes::SUCCESS
    }
}
