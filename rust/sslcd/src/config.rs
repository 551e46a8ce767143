use anyhow::{bail, Context};
use chrono::format::{Item, StrftimeItems};
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt::Write;
use std::path::Path;

/// Fixed report text and chart geometry handed to renderers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct ReportConfig {
    pub title: String,
    pub board: String,
    pub watermark: String,
    pub chart_title: String,
    pub insights_title: String,
    pub footer: String,
    pub date_format: String,
    pub chart_width: f64,
    pub chart_height: f64,
    pub label_chars: usize,
    pub download_name: String,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            title: "Karnataka SSLC Examination Result".to_string(),
            board: "Board: Karnataka Secondary Education Examination Board (KSEEB)".to_string(),
            watermark: "KARNATAKA SSLC".to_string(),
            chart_title: "Subject-wise Performance (Percentage)".to_string(),
            insights_title: "Academic Performance Insights".to_string(),
            footer: "Karnataka SSLC Result Analysis System".to_string(),
            date_format: "%d-%m-%Y".to_string(),
            chart_width: 420.0,
            chart_height: 230.0,
            label_chars: 6,
            download_name: "karnataka_sslc_result.pdf".to_string(),
        }
    }
}

impl ReportConfig {
    pub fn validate(&self) -> anyhow::Result<()> {
        if !(self.chart_width.is_finite() && self.chart_width > 0.0) {
            bail!("chartWidth must be a positive number");
        }
        if !(self.chart_height.is_finite() && self.chart_height > 0.0) {
            bail!("chartHeight must be a positive number");
        }
        if self.label_chars == 0 {
            bail!("labelChars must be at least 1");
        }
        if self.date_format.trim().is_empty() {
            bail!("dateFormat must not be empty");
        }
        if StrftimeItems::new(&self.date_format).any(|item| matches!(item, Item::Error)) {
            bail!("dateFormat is not a valid strftime pattern: {}", self.date_format);
        }
        // Patterns that parse can still fail to render, e.g. `%Z` without an offset.
        if format_generated_at(&self.date_format, sample_timestamp()).is_none() {
            bail!("dateFormat cannot be rendered for a local timestamp: {}", self.date_format);
        }
        Ok(())
    }
}

fn sample_timestamp() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2000, 1, 31)
        .and_then(|d| d.and_hms_opt(23, 59, 59))
        .unwrap_or_default()
}

/// Renders a report timestamp, or `None` when the pattern needs fields a
/// naive local timestamp does not carry.
pub fn format_generated_at(pattern: &str, at: NaiveDateTime) -> Option<String> {
    let mut out = String::new();
    write!(out, "{}", at.format(pattern)).ok()?;
    Some(out)
}

pub fn parse_config(text: &str) -> anyhow::Result<ReportConfig> {
    let cfg: ReportConfig = toml::from_str(text).context("parse report config")?;
    cfg.validate()?;
    Ok(cfg)
}

/// Loads the report config from `path`, or the defaults when no path is given.
pub fn load_config(path: Option<&Path>) -> anyhow::Result<ReportConfig> {
    let Some(path) = path else {
        return Ok(ReportConfig::default());
    };
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("read config file {}", path.display()))?;
    parse_config(&text).with_context(|| format!("load config file {}", path.display()))
}
