use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum InsightError {
    #[error("at least one subject percentage is required")]
    NoSubjects,
    #[error("percentage is not a finite number: {0}")]
    NonFinite(f64),
}

/// Formats a percentage the way report text shows it: shortest decimal that
/// round-trips, always with a fractional digit (`90.0`, `80.8`, `33.33`).
pub fn format_percent(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 {
        format!("{value:.1}")
    } else {
        format!("{value}")
    }
}

fn banding_narrative(overall_percentage: f64) -> &'static str {
    if overall_percentage >= 85.0 {
        "Overall performance is excellent and falls under Distinction."
    } else if overall_percentage >= 60.0 {
        "Overall performance is good and qualifies for First Class."
    } else if overall_percentage >= 50.0 {
        "Overall performance is satisfactory with Second Class."
    } else {
        "Minimum passing performance achieved. Needs improvement."
    }
}

/// Builds the four report observations, always in the same order:
/// pass/fail, banding, highest subject, lowest subject.
pub fn generate(
    overall_percentage: f64,
    failed: bool,
    subject_percentages: &[f64],
) -> Result<Vec<String>, InsightError> {
    if subject_percentages.is_empty() {
        return Err(InsightError::NoSubjects);
    }
    if !overall_percentage.is_finite() {
        return Err(InsightError::NonFinite(overall_percentage));
    }
    if let Some(bad) = subject_percentages.iter().find(|p| !p.is_finite()) {
        return Err(InsightError::NonFinite(*bad));
    }

    let highest = subject_percentages
        .iter()
        .copied()
        .fold(f64::NEG_INFINITY, f64::max);
    let lowest = subject_percentages
        .iter()
        .copied()
        .fold(f64::INFINITY, f64::min);

    let status = if failed {
        "The student has failed in one or more subjects as per Karnataka SSLC rules."
    } else {
        "The student has passed all subjects as per Karnataka SSLC board norms."
    };

    Ok(vec![
        status.to_string(),
        banding_narrative(overall_percentage).to_string(),
        format!("Highest subject percentage: {}%.", format_percent(highest)),
        format!("Lowest subject percentage: {}%.", format_percent(lowest)),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extremal_lines_use_float_text() {
        let lines = generate(76.67, false, &[80.0, 60.0, 90.0]).expect("insights");
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[2], "Highest subject percentage: 90.0%.");
        assert_eq!(lines[3], "Lowest subject percentage: 60.0%.");
    }

    #[test]
    fn status_line_follows_failed_flag() {
        let passed = generate(40.0, false, &[40.0]).expect("insights");
        assert_eq!(
            passed[0],
            "The student has passed all subjects as per Karnataka SSLC board norms."
        );
        let failed = generate(90.0, true, &[100.0, 20.0]).expect("insights");
        assert_eq!(
            failed[0],
            "The student has failed in one or more subjects as per Karnataka SSLC rules."
        );
    }

    #[test]
    fn banding_matches_grade_boundaries() {
        let band = |p: f64| generate(p, false, &[p]).expect("insights")[1].clone();
        assert!(band(85.0).contains("Distinction"));
        assert!(band(84.99).contains("First Class"));
        assert!(band(60.0).contains("First Class"));
        assert!(band(59.99).contains("Second Class"));
        assert!(band(50.0).contains("Second Class"));
        assert_eq!(
            band(49.99),
            "Minimum passing performance achieved. Needs improvement."
        );
        assert_eq!(
            band(12.0),
            "Minimum passing performance achieved. Needs improvement."
        );
    }

    #[test]
    fn empty_and_non_finite_input_is_rejected() {
        assert_eq!(generate(50.0, false, &[]), Err(InsightError::NoSubjects));
        assert!(matches!(
            generate(f64::NAN, false, &[50.0]),
            Err(InsightError::NonFinite(_))
        ));
        assert!(matches!(
            generate(50.0, false, &[50.0, f64::INFINITY]),
            Err(InsightError::NonFinite(_))
        ));
    }

    #[test]
    fn percent_text() {
        assert_eq!(format_percent(90.0), "90.0");
        assert_eq!(format_percent(80.8), "80.8");
        assert_eq!(format_percent(33.33), "33.33");
        assert_eq!(format_percent(0.0), "0.0");
        assert_eq!(format_percent(100.0), "100.0");
    }
}
