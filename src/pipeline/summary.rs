//! Human-readable summaries for shell output.

use crate::model::{PredictionOutcome, PredictionRecord, Severity};
use crate::scoring::RiskAssessment;

/// Apply ANSI color formatting if colored output is enabled.
fn ansi_color(text: &str, color: &str, colored: bool) -> String {
    if colored {
        match color {
            "red" => format!("\x1b[31m{text}\x1b[0m"),
            "green" => format!("\x1b[32m{text}\x1b[0m"),
            "yellow" => format!("\x1b[33m{text}\x1b[0m"),
            "cyan" => format!("\x1b[36m{text}\x1b[0m"),
            "bold" => format!("\x1b[1m{text}\x1b[0m"),
            "dim" => format!("\x1b[2m{text}\x1b[0m"),
            _ => text.to_string(),
        }
    } else {
        text.to_string()
    }
}

const fn severity_color(severity: Severity) -> &'static str {
    match severity {
        Severity::High => "red",
        Severity::Medium => "yellow",
        Severity::Low => "green",
    }
}

/// Summary renderer for shell output
#[derive(Debug, Clone, Copy)]
pub struct SummaryReporter {
    colored: bool,
}

impl SummaryReporter {
    #[must_use]
    pub const fn new() -> Self {
        Self { colored: true }
    }

    /// Disable colored output
    #[must_use]
    pub const fn no_color(mut self) -> Self {
        self.colored = false;
        self
    }

    fn color(&self, text: &str, color: &str) -> String {
        ansi_color(text, color, self.colored)
    }

    fn field(&self, label: &str, value: impl std::fmt::Display) -> String {
        format!("{}  {value}", self.color(label, "cyan"))
    }

    /// Render one prediction record.
    #[must_use]
    pub fn record(&self, record: &PredictionRecord) -> String {
        let mut lines = Vec::new();

        let title = format!("{} prediction", capitalize(record.hazard.as_str()));
        lines.push(self.color(&title, "bold"));
        lines.push(self.color("─".repeat(40).as_str(), "dim"));

        if let Some(location) = &record.location {
            lines.push(self.field("Location:", format!("{}, {}", location.region, location.country)));
        }

        match &record.prediction {
            PredictionOutcome::Risk {
                probability,
                severity,
            } => {
                lines.push(self.field("Probability:", format!("{probability:.3}")));
                lines.push(self.field(
                    "Severity:",
                    self.color(severity.as_str(), severity_color(*severity)),
                ));
            }
            PredictionOutcome::Crops { recommendations } => {
                if recommendations.is_empty() {
                    lines.push(format!("  {}", self.color("No suitable crops", "dim")));
                }
                for rec in recommendations {
                    lines.push(format!(
                        "  {:<10} suitability {:.2}  confidence {:.2}",
                        self.color(&rec.crop, "green"),
                        rec.suitability,
                        rec.confidence
                    ));
                }
                if let Some(first) = recommendations.first() {
                    lines.push(self.field("Reasons:", first.reasons.join("; ")));
                }
            }
            PredictionOutcome::Price(forecast) => {
                let arrow = match forecast.change_direction {
                    crate::model::ChangeDirection::Increase => self.color("▲", "red"),
                    crate::model::ChangeDirection::Decrease => self.color("▼", "green"),
                    crate::model::ChangeDirection::Unchanged => self.color("=", "dim"),
                };
                lines.push(self.field("Crop:", &forecast.crop));
                lines.push(self.field(
                    "Price:",
                    format!(
                        "{:.2} → {:.2} ({arrow} {:.2})",
                        forecast.current_price, forecast.predicted_price, forecast.change
                    ),
                ));
                lines.push(self.field("Factors:", forecast.factors.join(", ")));
            }
        }

        lines.push(self.field("Confidence:", format!("{:.2}", record.confidence)));
        lines.push(self.field(
            "Valid:",
            format!(
                "{} → {}",
                record.timeframe.start_date.format("%Y-%m-%d"),
                record.timeframe.end_date.format("%Y-%m-%d")
            ),
        ));
        lines.push(self.field(
            "Model:",
            self.color(
                &format!("{} v{}", record.model_info.algorithm, record.model_info.version),
                "dim",
            ),
        ));

        lines.join("\n")
    }

    /// Render several records separated by blank lines.
    #[must_use]
    pub fn records(&self, records: &[PredictionRecord]) -> String {
        records
            .iter()
            .map(|r| self.record(r))
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    /// One line per assessment, plus a severity tally.
    #[must_use]
    pub fn assessments(&self, assessments: &[RiskAssessment]) -> String {
        let mut lines: Vec<String> = assessments
            .iter()
            .enumerate()
            .map(|(i, a)| {
                format!(
                    "{i:>5}  {:.3}  {}",
                    a.probability,
                    self.color(a.severity.as_str(), severity_color(a.severity))
                )
            })
            .collect();

        let count = |s: Severity| assessments.iter().filter(|a| a.severity == s).count();
        lines.push(String::new());
        lines.push(format!(
            "{}  {} high, {} medium, {} low",
            self.color("Total:", "bold"),
            count(Severity::High),
            count(Severity::Medium),
            count(Severity::Low)
        ));
        lines.join("\n")
    }
}

impl Default for SummaryReporter {
    fn default() -> Self {
        Self::new()
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().collect::<String>() + chars.as_str()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{FeatureVector, HazardType, ModelInfo, Timeframe};
    use chrono::{TimeZone, Utc};

    fn risk_record(severity: Severity) -> PredictionRecord {
        let now = Utc.with_ymd_and_hms(2025, 7, 1, 0, 0, 0).unwrap();
        PredictionRecord::new(
            HazardType::Drought,
            PredictionOutcome::Risk {
                probability: 0.66,
                severity,
            },
            0.75,
            Timeframe::starting_at(now, 30),
            ModelInfo {
                version: "1.0".to_string(),
                algorithm: "Weighted Risk Scoring".to_string(),
                features: Vec::new(),
                accuracy: Some(0.82),
            },
            FeatureVector::new(),
            now,
        )
    }

    #[test]
    fn test_plain_summary() {
        let text = SummaryReporter::new().no_color().record(&risk_record(Severity::High));
        assert!(text.starts_with("Drought prediction"));
        assert!(text.contains("Probability:  0.660"));
        assert!(text.contains("Severity:  high"));
        assert!(text.contains("2025-07-01 → 2025-07-31"));
        assert!(!text.contains('\x1b'));
    }

    #[test]
    fn test_colored_severity() {
        let text = SummaryReporter::new().record(&risk_record(Severity::High));
        assert!(text.contains("\x1b[31mhigh\x1b[0m"));
    }

    #[test]
    fn test_capitalize() {
        assert_eq!(capitalize("flood"), "Flood");
        assert_eq!(capitalize(""), "");
    }
}
