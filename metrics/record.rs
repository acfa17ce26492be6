use compression_board_util::error::Result;
use serde::{Deserialize, Deserializer, Serialize};

/// The raw metrics for one run, as produced by the summary endpoint.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RunMetricRecord {
	pub run: String,
	#[serde(default, deserialize_with = "lenient_number", skip_serializing_if = "Option::is_none")]
	pub accuracy_fp32: Option<f64>,
	#[serde(default, deserialize_with = "lenient_number", skip_serializing_if = "Option::is_none")]
	pub accuracy_int8: Option<f64>,
	#[serde(default, deserialize_with = "lenient_number", skip_serializing_if = "Option::is_none")]
	pub latency_fp32: Option<f64>,
	#[serde(default, deserialize_with = "lenient_number", skip_serializing_if = "Option::is_none")]
	pub latency_int8: Option<f64>,
	#[serde(default, deserialize_with = "lenient_number", skip_serializing_if = "Option::is_none")]
	pub model_size_fp32: Option<f64>,
	#[serde(default, deserialize_with = "lenient_number", skip_serializing_if = "Option::is_none")]
	pub model_size_int8: Option<f64>,
	#[serde(default, deserialize_with = "lenient_number", skip_serializing_if = "Option::is_none")]
	pub memory_fp32: Option<f64>,
	#[serde(default, deserialize_with = "lenient_number", skip_serializing_if = "Option::is_none")]
	pub memory_int8: Option<f64>,
	#[serde(default, deserialize_with = "lenient_number", skip_serializing_if = "Option::is_none")]
	pub energy_fp32: Option<f64>,
	#[serde(default, deserialize_with = "lenient_number", skip_serializing_if = "Option::is_none")]
	pub energy_int8: Option<f64>,
	#[serde(default, deserialize_with = "lenient_number", skip_serializing_if = "Option::is_none")]
	pub accuracy_drop: Option<f64>,
	#[serde(default, deserialize_with = "lenient_number", skip_serializing_if = "Option::is_none")]
	pub size_ratio: Option<f64>,
	#[serde(default, deserialize_with = "lenient_number", skip_serializing_if = "Option::is_none")]
	pub speedup: Option<f64>,
	#[serde(default, deserialize_with = "lenient_number", skip_serializing_if = "Option::is_none")]
	pub energy_ratio: Option<f64>,
	#[serde(default, deserialize_with = "lenient_number", skip_serializing_if = "Option::is_none")]
	pub memory_reduction_mb: Option<f64>,
	#[serde(default, deserialize_with = "lenient_number", skip_serializing_if = "Option::is_none")]
	pub energy_reduction_mw: Option<f64>,
}

impl RunMetricRecord {
	pub fn new(run: impl Into<String>) -> RunMetricRecord {
		RunMetricRecord {
			run: run.into(),
			..Default::default()
		}
	}

	/// Overwrite this record's fields with every field that is present in `other`.
	pub fn merge(&mut self, other: &RunMetricRecord) {
		fn take(into: &mut Option<f64>, from: Option<f64>) {
			if from.is_some() {
				*into = from;
			}
		}
		take(&mut self.accuracy_fp32, other.accuracy_fp32);
		take(&mut self.accuracy_int8, other.accuracy_int8);
		take(&mut self.latency_fp32, other.latency_fp32);
		take(&mut self.latency_int8, other.latency_int8);
		take(&mut self.model_size_fp32, other.model_size_fp32);
		take(&mut self.model_size_int8, other.model_size_int8);
		take(&mut self.memory_fp32, other.memory_fp32);
		take(&mut self.memory_int8, other.memory_int8);
		take(&mut self.energy_fp32, other.energy_fp32);
		take(&mut self.energy_int8, other.energy_int8);
		take(&mut self.accuracy_drop, other.accuracy_drop);
		take(&mut self.size_ratio, other.size_ratio);
		take(&mut self.speedup, other.speedup);
		take(&mut self.energy_ratio, other.energy_ratio);
		take(&mut self.memory_reduction_mb, other.memory_reduction_mb);
		take(&mut self.energy_reduction_mw, other.energy_reduction_mw);
	}
}

/// The body of the summary endpoint. `error` is set when the store could not be read, in which case `runs` is empty.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SummaryResponse {
	pub runs: Vec<RunMetricRecord>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub error: Option<String>,
}

/**
Parse a summary body. Only a body that is not a JSON object is an error. Entries of `runs` that are not objects or have no `run` string are dropped individually, and fields that are not numbers are read as missing.
*/
pub fn parse_summary(body: &str) -> Result<SummaryResponse> {
	let value: serde_json::Value = serde_json::from_str(body)?;
	let object = match value {
		serde_json::Value::Object(object) => object,
		_ => return Err(compression_board_util::err!("expected the summary to be an object")),
	};
	let runs = match object.get("runs") {
		Some(serde_json::Value::Array(runs)) => runs
			.iter()
			.filter_map(|run| serde_json::from_value(run.clone()).ok())
			.collect(),
		_ => Vec::new(),
	};
	let error = object
		.get("error")
		.and_then(|error| error.as_str())
		.map(|error| error.to_owned());
	Ok(SummaryResponse { runs, error })
}

fn lenient_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
	D: Deserializer<'de>,
{
	let value = serde_json::Value::deserialize(deserializer)?;
	Ok(number_from_value(&value))
}

fn number_from_value(value: &serde_json::Value) -> Option<f64> {
	let number = match value {
		serde_json::Value::Number(number) => number.as_f64(),
		serde_json::Value::String(string) => string.trim().parse::<f64>().ok(),
		_ => None,
	}?;
	if number.is_finite() {
		Some(number)
	} else {
		None
	}
}

#[test]
fn test_malformed_fields_are_missing() {
	let summary = parse_summary(
		r#"{"runs": [
			{"run": "alexnet", "accuracy_fp32": "0.5", "accuracy_int8": "high", "latency_fp32": null, "latency_int8": [1], "model_size_fp32": "NaN", "model_size_int8": 10}
		]}"#,
	)
	.unwrap();
	let run = &summary.runs[0];
	assert_eq!(run.run, "alexnet");
	assert_eq!(run.accuracy_fp32, Some(0.5));
	assert_eq!(run.accuracy_int8, None);
	assert_eq!(run.latency_fp32, None);
	assert_eq!(run.latency_int8, None);
	assert_eq!(run.model_size_fp32, None);
	assert_eq!(run.model_size_int8, Some(10.0));
}

#[test]
fn test_bad_entries_do_not_block_other_runs() {
	let summary = parse_summary(
		r#"{"runs": [{"accuracy_fp32": 0.9}, 42, {"run": "resnet18", "speedup": 2}], "error": null}"#,
	)
	.unwrap();
	assert_eq!(summary.runs.len(), 1);
	assert_eq!(summary.runs[0].run, "resnet18");
	assert_eq!(summary.runs[0].speedup, Some(2.0));
	assert_eq!(summary.error, None);
}

#[test]
fn test_summary_with_error() {
	let summary = parse_summary(r#"{"runs": [], "error": "no log directory"}"#).unwrap();
	assert!(summary.runs.is_empty());
	assert_eq!(summary.error.as_deref(), Some("no log directory"));
	assert!(parse_summary("[]").is_err());
	assert!(parse_summary("not json").is_err());
}

#[test]
fn test_serialize_skips_missing_fields() {
	let mut record = RunMetricRecord::new("alexnet");
	record.model_size_fp32 = Some(200.0);
	let summary = SummaryResponse {
		runs: vec![record],
		error: None,
	};
	assert_eq!(
		serde_json::to_string(&summary).unwrap(),
		r#"{"runs":[{"run":"alexnet","model_size_fp32":200.0}]}"#
	);
}

#[test]
fn test_merge_prefers_present_fields() {
	let mut first = RunMetricRecord::new("alexnet");
	first.accuracy_fp32 = Some(0.9);
	first.speedup = Some(1.5);
	let mut second = RunMetricRecord::new("alexnet");
	second.speedup = Some(2.0);
	first.merge(&second);
	assert_eq!(first.accuracy_fp32, Some(0.9));
	assert_eq!(first.speedup, Some(2.0));
}
