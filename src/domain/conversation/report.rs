//! Analysis report decoding.
//!
//! The Report phase asks the model for a JSON object with four fields.
//! Decoding is all-or-nothing: anything that does not yield a complete,
//! valid report is replaced by a fixed fallback report.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Structured end-of-conversation summary.
///
/// # Invariants
///
/// - every string field is non-empty
/// - `tips` holds at least one non-empty entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnalysisReport {
    summary: String,
    problem_definition: String,
    #[serde(rename = "it_tips")]
    tips: Vec<String>,
    next_step: String,
}

impl AnalysisReport {
    pub fn summary(&self) -> &str {
        &self.summary
    }

    pub fn problem_definition(&self) -> &str {
        &self.problem_definition
    }

    pub fn tips(&self) -> &[String] {
        &self.tips
    }

    pub fn next_step(&self) -> &str {
        &self.next_step
    }

    /// The report shown when the model reply cannot be decoded.
    pub fn fallback() -> Self {
        Self {
            summary: "You have a strong drive to grow, yet you feel unsure about which direction to take. Many ambitious people pass through this stage, and it is a positive sign.".to_string(),
            problem_definition: "The main issues are vague goals and a perfectionist thinking pattern. Focusing on the gap between ideal and reality may be hiding the small progress you make.".to_string(),
            tips: vec![
                "Debugging mindset: split the problem into small units and solve them one at a time".to_string(),
                "Test-driven development: set small goals and check whether you met them".to_string(),
                "Refactoring: treat your current situation as something with room to improve, and optimize it step by step".to_string(),
                "Version control: accept who you are now as the current version and plan the next release".to_string(),
            ],
            next_step: "This week, break one big goal into three small tasks and start at least one. It does not need to be perfect; begin by building a working prototype.".to_string(),
        }
    }

    /// The report shown when the Report-phase generation itself fails.
    pub fn generation_fallback() -> Self {
        Self {
            summary: "Through our conversation we came to understand your thinking patterns and the structure of your worries.".to_string(),
            problem_definition: "The important thing now is to organize your situation and find concrete points to improve.".to_string(),
            tips: vec![
                "Break the problem into small units".to_string(),
                "Solve them steadily, one at a time".to_string(),
                "Check your progress regularly".to_string(),
                "Act without demanding perfection".to_string(),
            ],
            next_step: "Start with one small action today.".to_string(),
        }
    }
}

/// Reasons a model reply is not a valid report.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ReportDecodeError {
    #[error("Report text is empty")]
    Empty,

    #[error("JSON parse error: {0}")]
    Parse(String),

    #[error("Field '{0}' must not be empty")]
    EmptyField(&'static str),

    #[error("Report must contain at least one tip")]
    NoTips,
}

/// Wire shape of the report as requested in the Report directive.
#[derive(Debug, Deserialize)]
struct ReportPayload {
    summary: String,
    #[serde(alias = "problemDefinition")]
    problem_definition: String,
    #[serde(rename = "it_tips", alias = "tips")]
    tips: Vec<String>,
    #[serde(alias = "nextStep")]
    next_step: String,
}

/// Decodes Report-phase model output.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReportParser;

impl ReportParser {
    pub fn new() -> Self {
        Self
    }

    /// Decodes `raw`, substituting the fallback report on any failure.
    pub fn parse(&self, raw: &str) -> AnalysisReport {
        match self.decode(raw) {
            Ok(report) => report,
            Err(err) => {
                tracing::warn!(error = %err, "malformed report, using fallback");
                AnalysisReport::fallback()
            }
        }
    }

    /// Strictly decodes `raw` into a report.
    ///
    /// Surrounding whitespace and one enclosing Markdown code fence are
    /// removed first; the remaining text must be exactly the report object.
    pub fn decode(&self, raw: &str) -> Result<AnalysisReport, ReportDecodeError> {
        let body = Self::strip_code_fence(raw.trim());
        if body.is_empty() {
            return Err(ReportDecodeError::Empty);
        }

        let payload: ReportPayload =
            serde_json::from_str(body).map_err(|e| ReportDecodeError::Parse(e.to_string()))?;

        Self::validate(payload)
    }

    fn validate(payload: ReportPayload) -> Result<AnalysisReport, ReportDecodeError> {
        let required = [
            ("summary", &payload.summary),
            ("problem_definition", &payload.problem_definition),
            ("next_step", &payload.next_step),
        ];
        for (field, value) in required {
            if value.trim().is_empty() {
                return Err(ReportDecodeError::EmptyField(field));
            }
        }

        if payload.tips.is_empty() {
            return Err(ReportDecodeError::NoTips);
        }
        if payload.tips.iter().any(|tip| tip.trim().is_empty()) {
            return Err(ReportDecodeError::EmptyField("it_tips"));
        }

        Ok(AnalysisReport {
            summary: payload.summary,
            problem_definition: payload.problem_definition,
            tips: payload.tips,
            next_step: payload.next_step,
        })
    }

    /// Returns the inside of a ```` ```json ```` / ```` ``` ```` fence that
    /// wraps the whole text, or the text unchanged.
    fn strip_code_fence(s: &str) -> &str {
        let Some(rest) = s.strip_prefix("```") else {
            return s;
        };
        let Some(inner) = rest.strip_suffix("```") else {
            return s;
        };
        let inner = inner.strip_prefix("json").unwrap_or(inner);
        inner.trim()
    }
}
