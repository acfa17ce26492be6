use crate::record::RunMetricRecord;

/**
A `RunMetricRecord` with its ratio families and differences filled in.

Each ratio is `fp32 / int8`. A value the source already computed, such as `speedup` for latency or `size_ratio` for size, is used unchanged even when the raw pair is present.
*/
#[derive(Clone, Debug, PartialEq)]
pub struct DerivedRunView {
	pub record: RunMetricRecord,
	pub accuracy_ratio: Option<f64>,
	pub latency_ratio: Option<f64>,
	pub energy_ratio: Option<f64>,
	pub size_ratio: Option<f64>,
	pub accuracy_drop: Option<f64>,
	pub memory_reduction_mb: Option<f64>,
	pub energy_reduction_mw: Option<f64>,
}

impl DerivedRunView {
	pub fn run(&self) -> &str {
		&self.record.run
	}
}

/// `fp32 / int8`, or `None` if either value is missing, the denominator is zero, or the result is not finite.
pub fn ratio(fp32: Option<f64>, int8: Option<f64>) -> Option<f64> {
	let (fp32, int8) = (fp32?, int8?);
	if int8 == 0.0 {
		return None;
	}
	let ratio = fp32 / int8;
	if ratio.is_finite() {
		Some(ratio)
	} else {
		None
	}
}

fn difference(fp32: Option<f64>, int8: Option<f64>) -> Option<f64> {
	let difference = fp32? - int8?;
	if difference.is_finite() {
		Some(difference)
	} else {
		None
	}
}

/// The accuracy lost by quantizing, `fp32 - int8`, defined only when both accuracies are present.
pub fn derive_drop(record: &RunMetricRecord) -> Option<f64> {
	difference(record.accuracy_fp32, record.accuracy_int8)
}

pub fn derive_ratios(record: &RunMetricRecord) -> DerivedRunView {
	let accuracy_ratio = ratio(record.accuracy_fp32, record.accuracy_int8);
	let latency_ratio = record
		.speedup
		.or_else(|| ratio(record.latency_fp32, record.latency_int8));
	let energy_ratio = record
		.energy_ratio
		.or_else(|| ratio(record.energy_fp32, record.energy_int8));
	let size_ratio = record
		.size_ratio
		.or_else(|| ratio(record.model_size_fp32, record.model_size_int8));
	let accuracy_drop = record.accuracy_drop.or_else(|| derive_drop(record));
	let memory_reduction_mb = record
		.memory_reduction_mb
		.or_else(|| difference(record.memory_fp32, record.memory_int8));
	let energy_reduction_mw = record
		.energy_reduction_mw
		.or_else(|| difference(record.energy_fp32, record.energy_int8));
	DerivedRunView {
		record: record.clone(),
		accuracy_ratio,
		latency_ratio,
		energy_ratio,
		size_ratio,
		accuracy_drop,
		memory_reduction_mb,
		energy_reduction_mw,
	}
}

/**
Merge the records of each run in the order runs first appear, then derive a view for every run. A later record for the same run overrides the fields it carries.
*/
pub fn aggregate(records: &[RunMetricRecord]) -> Vec<DerivedRunView> {
	let mut merged: Vec<RunMetricRecord> = Vec::new();
	for record in records {
		match merged.iter_mut().find(|existing| existing.run == record.run) {
			Some(existing) => existing.merge(record),
			None => merged.push(record.clone()),
		}
	}
	merged.iter().map(derive_ratios).collect()
}

#[test]
fn test_ratio_undefined_for_zero_or_missing_denominator() {
	assert_eq!(ratio(Some(200.0), Some(0.0)), None);
	assert_eq!(ratio(Some(200.0), None), None);
	assert_eq!(ratio(None, Some(10.0)), None);
	assert_eq!(ratio(Some(200.0), Some(10.0)), Some(20.0));
	assert_eq!(ratio(Some(f64::MAX), Some(1e-300)), None);
}

#[test]
fn test_derive_ratios_alexnet() {
	let mut record = RunMetricRecord::new("alexnet");
	record.accuracy_fp32 = Some(0.99);
	record.accuracy_int8 = Some(0.99);
	record.model_size_fp32 = Some(200.0);
	record.model_size_int8 = Some(10.0);
	let view = derive_ratios(&record);
	assert_eq!(view.size_ratio, Some(20.0));
	assert_eq!(view.accuracy_ratio, Some(1.0));
	assert_eq!(view.accuracy_drop, Some(0.0));
	assert_eq!(view.latency_ratio, None);
	assert_eq!(view.energy_ratio, None);
}

#[test]
fn test_precomputed_values_take_precedence() {
	let mut record = RunMetricRecord::new("resnet18");
	record.latency_fp32 = Some(10.0);
	record.latency_int8 = Some(5.0);
	record.speedup = Some(2.5);
	record.model_size_fp32 = Some(40.0);
	record.model_size_int8 = Some(10.0);
	record.size_ratio = Some(3.9);
	record.energy_fp32 = Some(100.0);
	record.energy_int8 = Some(50.0);
	record.energy_ratio = Some(1.75);
	record.accuracy_fp32 = Some(0.9);
	record.accuracy_int8 = Some(0.8);
	record.accuracy_drop = Some(0.125);
	let view = derive_ratios(&record);
	assert_eq!(view.latency_ratio, Some(2.5));
	assert_eq!(view.size_ratio, Some(3.9));
	assert_eq!(view.energy_ratio, Some(1.75));
	assert_eq!(view.accuracy_drop, Some(0.125));
}

#[test]
fn test_drop_requires_both_accuracies() {
	let mut record = RunMetricRecord::new("vgg");
	record.accuracy_fp32 = Some(0.75);
	assert_eq!(derive_drop(&record), None);
	record.accuracy_int8 = Some(0.5);
	assert_eq!(derive_drop(&record), Some(0.25));
}

#[test]
fn test_reductions_are_derived_when_missing() {
	let mut record = RunMetricRecord::new("vgg");
	record.memory_fp32 = Some(512.0);
	record.memory_int8 = Some(128.0);
	record.energy_fp32 = Some(300.0);
	record.energy_int8 = Some(100.0);
	record.energy_reduction_mw = Some(150.0);
	let view = derive_ratios(&record);
	assert_eq!(view.memory_reduction_mb, Some(384.0));
	assert_eq!(view.energy_reduction_mw, Some(150.0));
	assert_eq!(view.energy_ratio, Some(3.0));
}

#[test]
fn test_aggregate_merges_runs_in_first_seen_order() {
	let mut a = RunMetricRecord::new("b_model");
	a.model_size_fp32 = Some(100.0);
	let b = RunMetricRecord::new("a_model");
	let mut c = RunMetricRecord::new("b_model");
	c.model_size_int8 = Some(25.0);
	let views = aggregate(&[a, b, c]);
	let runs: Vec<&str> = views.iter().map(|view| view.run()).collect();
	assert_eq!(runs, vec!["b_model", "a_model"]);
	assert_eq!(views[0].size_ratio, Some(4.0));
}
