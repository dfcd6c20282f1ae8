//! Structured inputs and outputs of the report generator

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Structured description of a trade handed to the explanation generator
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TradeSummary {
    pub input_asset: String,
    pub output_asset: String,
    pub amount: u128,
    pub reason: String,
    pub confidence: f64,
}

/// Structured portfolio data handed to the report generator
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportInput {
    pub period: String,
    pub start_value: Decimal,
    pub end_value: Decimal,
    pub insights: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportSection {
    pub heading: String,
    pub content: String,
}

/// Generated natural-language report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    pub title: String,
    pub summary: String,
    pub sections: Vec<ReportSection>,
    pub generated_at: DateTime<Utc>,
}

impl Report {
    /// Wrap raw text into a single-section report, used when the
    /// generator's structured output cannot be trusted
    pub fn from_raw_text(text: impl Into<String>) -> Self {
        let text = text.into();
        Self {
            title: "Report".to_string(),
            summary: text.clone(),
            sections: vec![ReportSection {
                heading: "Details".to_string(),
                content: text,
            }],
            generated_at: Utc::now(),
        }
    }
}
