use serde::Serialize;
use std::num::IntErrorKind;
use thiserror::Error;

/// Kannada is graded out of 125; every other subject out of 100.
pub const KANNADA_MAX_MARKS: i64 = 125;
pub const DEFAULT_MAX_MARKS: i64 = 100;

/// A subject is failed below this percentage.
pub const PASS_PERCENT: f64 = 35.0;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Student name is required")]
    NameRequired,
    #[error("At least one subject is required")]
    NoSubjects,
    #[error("Subject name is required")]
    SubjectRequired,
    #[error("{subject} marks must be a whole number")]
    NotWholeNumber { subject: String },
    #[error("Kannada marks must be between 0 and 125")]
    KannadaOutOfRange,
    #[error("{subject} marks must be between 0 and {max_marks}")]
    OutOfRange { subject: String, max_marks: i64 },
    #[error("Malformed subject entry: {raw}")]
    MalformedEntry { raw: String },
}

impl ValidationError {
    pub fn kind(&self) -> &'static str {
        match self {
            ValidationError::NameRequired => "name_required",
            ValidationError::NoSubjects => "no_subjects",
            ValidationError::SubjectRequired => "subject_required",
            ValidationError::NotWholeNumber { .. } => "not_whole_number",
            ValidationError::KannadaOutOfRange | ValidationError::OutOfRange { .. } => {
                "out_of_range"
            }
            ValidationError::MalformedEntry { .. } => "malformed_entry",
        }
    }

    pub fn subject(&self) -> Option<&str> {
        match self {
            ValidationError::NotWholeNumber { subject }
            | ValidationError::OutOfRange { subject, .. } => Some(subject.as_str()),
            ValidationError::KannadaOutOfRange => Some("Kannada"),
            _ => None,
        }
    }
}

/// One submitted (subject, mark) pair, exactly as the caller typed it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubjectMark {
    pub subject: String,
    pub mark: String,
}

impl SubjectMark {
    pub fn new(subject: impl Into<String>, mark: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
            mark: mark.into(),
        }
    }

    /// Parses the flattened `subject:mark` form used by report download links.
    pub fn from_encoded(raw: &str) -> Result<Self, ValidationError> {
        let mut parts = raw.split(':');
        match (parts.next(), parts.next(), parts.next()) {
            (Some(subject), Some(mark), None) => Ok(Self::new(subject, mark)),
            _ => Err(ValidationError::MalformedEntry {
                raw: raw.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Grade {
    Distinction,
    #[serde(rename = "First Class")]
    FirstClass,
    #[serde(rename = "Second Class")]
    SecondClass,
    #[serde(rename = "Pass Class")]
    PassClass,
    Fail,
}

impl Grade {
    pub fn as_str(self) -> &'static str {
        match self {
            Grade::Distinction => "Distinction",
            Grade::FirstClass => "First Class",
            Grade::SecondClass => "Second Class",
            Grade::PassClass => "Pass Class",
            Grade::Fail => "Fail",
        }
    }
}

impl std::fmt::Display for Grade {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Status {
    Pass,
    Fail,
}

impl Status {
    pub fn as_str(self) -> &'static str {
        match self {
            Status::Pass => "PASS",
            Status::Fail => "FAIL",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubjectEntry {
    pub subject: String,
    pub marks: i64,
    pub max_marks: i64,
    pub percentage: f64,
}

impl SubjectEntry {
    pub fn failed(&self) -> bool {
        self.percentage < PASS_PERCENT
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultRecord {
    pub name: String,
    pub subjects: Vec<SubjectEntry>,
    pub average: f64,
    pub grade: Grade,
    pub status: Status,
}

impl ResultRecord {
    pub fn failed(&self) -> bool {
        self.status == Status::Fail
    }

    pub fn subject_percentages(&self) -> Vec<f64> {
        self.subjects.iter().map(|s| s.percentage).collect()
    }
}

/// Rounds `100 * num / den` to two decimals, ties to even.
///
/// Works on the exact ratio so that no binary float error leaks into the
/// rounding decision. The result is the nearest `f64` to the decimal value.
/// `den` must be positive and `num` non-negative.
pub fn round_percent_2dp(num: i64, den: i64) -> f64 {
    let scaled = num * 10_000;
    let mut q = scaled / den;
    let twice_rem = 2 * (scaled % den);
    if twice_rem > den || (twice_rem == den && q % 2 == 1) {
        q += 1;
    }
    q as f64 / 100.0
}

pub fn max_marks_for(subject: &str) -> i64 {
    if subject.to_lowercase() == "kannada" {
        KANNADA_MAX_MARKS
    } else {
        DEFAULT_MAX_MARKS
    }
}

/// Lower bounds are inclusive: 85.00 is Distinction, 84.99 is First Class.
pub fn calculate_grade(percentage: f64) -> Grade {
    if percentage >= 85.0 {
        Grade::Distinction
    } else if percentage >= 60.0 {
        Grade::FirstClass
    } else if percentage >= 50.0 {
        Grade::SecondClass
    } else if percentage >= PASS_PERCENT {
        Grade::PassClass
    } else {
        Grade::Fail
    }
}

fn out_of_range(subject: &str, max_marks: i64) -> ValidationError {
    if max_marks == KANNADA_MAX_MARKS {
        ValidationError::KannadaOutOfRange
    } else {
        ValidationError::OutOfRange {
            subject: subject.to_string(),
            max_marks,
        }
    }
}

/// Whole numbers too large for `i64` are still whole numbers, just out of range.
fn parse_mark(subject: &str, raw: &str, max_marks: i64) -> Result<i64, ValidationError> {
    raw.trim().parse::<i64>().map_err(|e| match e.kind() {
        IntErrorKind::PosOverflow | IntErrorKind::NegOverflow => out_of_range(subject, max_marks),
        _ => ValidationError::NotWholeNumber {
            subject: subject.to_string(),
        },
    })
}

fn subject_entry(input: &SubjectMark) -> Result<SubjectEntry, ValidationError> {
    if input.subject.trim().is_empty() {
        return Err(ValidationError::SubjectRequired);
    }
    let max_marks = max_marks_for(&input.subject);
    let marks = parse_mark(&input.subject, &input.mark, max_marks)?;
    if marks < 0 || marks > max_marks {
        return Err(out_of_range(&input.subject, max_marks));
    }

    Ok(SubjectEntry {
        subject: input.subject.clone(),
        marks,
        max_marks,
        percentage: round_percent_2dp(marks, max_marks),
    })
}

/// Runs the per-pair checks of [`compute`] on a single entry.
pub fn check_entry(input: &SubjectMark) -> Result<(), ValidationError> {
    subject_entry(input).map(|_| ())
}

/// Validates one submission and builds its result.
///
/// Pairs are checked in input order and the first bad pair aborts the whole
/// computation. The average is rounded before it is banded, and the status
/// only looks at per-subject failures, never at the average.
pub fn compute(name: &str, subjects: &[SubjectMark]) -> Result<ResultRecord, ValidationError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(ValidationError::NameRequired);
    }
    if subjects.is_empty() {
        return Err(ValidationError::NoSubjects);
    }

    let entries = subjects
        .iter()
        .map(subject_entry)
        .collect::<Result<Vec<_>, _>>()?;

    let total_obtained: i64 = entries.iter().map(|e| e.marks).sum();
    let total_max: i64 = entries.iter().map(|e| e.max_marks).sum();
    let average = round_percent_2dp(total_obtained, total_max);
    let failed = entries.iter().any(SubjectEntry::failed);

    Ok(ResultRecord {
        name: name.to_string(),
        subjects: entries,
        average,
        grade: calculate_grade(average),
        status: if failed { Status::Fail } else { Status::Pass },
    })
}
