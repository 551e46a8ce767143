use crate::calc::{ResultRecord, PASS_PERCENT};
use crate::config::{format_generated_at, ReportConfig};
use crate::insights::{self, format_percent, InsightError};
use chrono::NaiveDateTime;
use serde::Serialize;

const AXIS_STEP: u32 = 20;
const PASS_COLOR: &str = "lightgreen";
const FAIL_COLOR: &str = "salmon";
const FALLBACK_DATE_FORMAT: &str = "%d-%m-%Y";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportHeader {
    pub title: String,
    pub board: String,
    pub watermark: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentDetails {
    pub name: String,
    pub overall_percentage: f64,
    pub grade: String,
    pub status: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AxisTick {
    pub value: u32,
    pub y: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartBar {
    pub subject: String,
    pub label: String,
    pub percentage: f64,
    pub value_label: String,
    pub passed: bool,
    pub color: String,
    pub x: f64,
    pub width: f64,
    pub height: f64,
}

/// Bar chart in chart-local units: origin at the bottom-left corner of the
/// axes, percentages scaled 0..100 onto `height`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartModel {
    pub title: String,
    pub width: f64,
    pub height: f64,
    pub axis_ticks: Vec<AxisTick>,
    pub bars: Vec<ChartBar>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportFooter {
    pub generated_on: String,
    pub system: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportModel {
    pub header: ReportHeader,
    pub student: StudentDetails,
    pub result: ResultRecord,
    pub chart: ChartModel,
    pub insights_title: String,
    pub insights: Vec<String>,
    pub footer: ReportFooter,
    pub download_name: String,
}

fn axis_ticks(chart_height: f64) -> Vec<AxisTick> {
    (0..=100)
        .step_by(AXIS_STEP as usize)
        .map(|value| AxisTick {
            value,
            y: f64::from(value) * chart_height / 100.0,
        })
        .collect()
}

fn chart_bars(record: &ResultRecord, cfg: &ReportConfig) -> Vec<ChartBar> {
    if record.subjects.is_empty() {
        return Vec::new();
    }
    // Bars and gaps share the width equally, starting with a gap.
    let bar_width = cfg.chart_width / (record.subjects.len() as f64 * 2.0);
    let gap = bar_width;

    record
        .subjects
        .iter()
        .enumerate()
        .map(|(i, s)| {
            let passed = s.percentage >= PASS_PERCENT;
            ChartBar {
                subject: s.subject.clone(),
                label: s.subject.chars().take(cfg.label_chars).collect(),
                percentage: s.percentage,
                value_label: format!("{}%", format_percent(s.percentage)),
                passed,
                color: if passed { PASS_COLOR } else { FAIL_COLOR }.to_string(),
                x: gap + i as f64 * (bar_width + gap),
                width: bar_width,
                height: s.percentage * cfg.chart_height / 100.0,
            }
        })
        .collect()
}

/// Configs that skipped validation may carry a pattern that cannot render;
/// those fall back to the default day-month-year text.
fn generated_on_text(cfg: &ReportConfig, generated_at: NaiveDateTime) -> String {
    format_generated_at(&cfg.date_format, generated_at).unwrap_or_else(|| {
        tracing::warn!(
            date_format = %cfg.date_format,
            "dateFormat cannot be rendered, using {FALLBACK_DATE_FORMAT}"
        );
        generated_at.format(FALLBACK_DATE_FORMAT).to_string()
    })
}

pub fn build_report_model(
    record: &ResultRecord,
    insights: Vec<String>,
    cfg: &ReportConfig,
    generated_at: NaiveDateTime,
) -> ReportModel {
    ReportModel {
        header: ReportHeader {
            title: cfg.title.clone(),
            board: cfg.board.clone(),
            watermark: cfg.watermark.clone(),
        },
        student: StudentDetails {
            name: record.name.clone(),
            overall_percentage: record.average,
            grade: record.grade.to_string(),
            status: record.status.as_str().to_string(),
        },
        result: record.clone(),
        chart: ChartModel {
            title: cfg.chart_title.clone(),
            width: cfg.chart_width,
            height: cfg.chart_height,
            axis_ticks: axis_ticks(cfg.chart_height),
            bars: chart_bars(record, cfg),
        },
        insights_title: cfg.insights_title.clone(),
        insights,
        footer: ReportFooter {
            generated_on: generated_on_text(cfg, generated_at),
            system: cfg.footer.clone(),
        },
        download_name: cfg.download_name.clone(),
    }
}

/// Derives insights from the record itself and assembles the full model.
pub fn result_report(
    record: &ResultRecord,
    cfg: &ReportConfig,
    generated_at: NaiveDateTime,
) -> Result<ReportModel, InsightError> {
    let lines = insights::generate(
        record.average,
        record.failed(),
        &record.subject_percentages(),
    )?;
    Ok(build_report_model(record, lines, cfg, generated_at))
}
