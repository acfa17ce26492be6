/// The placeholder shown for a value that is missing or undefined.
pub const MISSING: &str = "-";

/// Format a raw metric with four decimals.
pub fn format_value(value: Option<f64>) -> String {
	match value {
		Some(value) => format!("{:.4}", value),
		None => MISSING.to_owned(),
	}
}

/// Format a ratio with two decimals and a trailing `x`.
pub fn format_ratio(value: Option<f64>) -> String {
	match value {
		Some(value) => format!("{:.2}x", value),
		None => MISSING.to_owned(),
	}
}

#[test]
fn test_format() {
	assert_eq!(format_value(Some(0.99)), "0.9900");
	assert_eq!(format_value(Some(200.0)), "200.0000");
	assert_eq!(format_value(None), "-");
	assert_eq!(format_ratio(Some(20.0)), "20.00x");
	assert_eq!(format_ratio(Some(1.0)), "1.00x");
	assert_eq!(format_ratio(None), "-");
}
