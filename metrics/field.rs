use crate::{
	derive::DerivedRunView,
	format::{format_ratio, format_value},
};

/// A numeric column of a `DerivedRunView`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Field {
	AccuracyFp32,
	AccuracyInt8,
	LatencyFp32,
	LatencyInt8,
	EnergyFp32,
	EnergyInt8,
	ModelSizeFp32,
	ModelSizeInt8,
	MemoryFp32,
	MemoryInt8,
	AccuracyRatio,
	LatencyRatio,
	EnergyRatio,
	SizeRatio,
	AccuracyDrop,
	MemoryReductionMb,
	EnergyReductionMw,
}

impl Field {
	pub const ALL: [Field; 17] = [
		Field::AccuracyFp32,
		Field::AccuracyInt8,
		Field::LatencyFp32,
		Field::LatencyInt8,
		Field::EnergyFp32,
		Field::EnergyInt8,
		Field::ModelSizeFp32,
		Field::ModelSizeInt8,
		Field::MemoryFp32,
		Field::MemoryInt8,
		Field::AccuracyRatio,
		Field::LatencyRatio,
		Field::EnergyRatio,
		Field::SizeRatio,
		Field::AccuracyDrop,
		Field::MemoryReductionMb,
		Field::EnergyReductionMw,
	];

	pub fn key(self) -> &'static str {
		match self {
			Field::AccuracyFp32 => "accuracy_fp32",
			Field::AccuracyInt8 => "accuracy_int8",
			Field::LatencyFp32 => "latency_fp32",
			Field::LatencyInt8 => "latency_int8",
			Field::EnergyFp32 => "energy_fp32",
			Field::EnergyInt8 => "energy_int8",
			Field::ModelSizeFp32 => "model_size_fp32",
			Field::ModelSizeInt8 => "model_size_int8",
			Field::MemoryFp32 => "memory_fp32",
			Field::MemoryInt8 => "memory_int8",
			Field::AccuracyRatio => "accuracy_ratio",
			Field::LatencyRatio => "latency_ratio",
			Field::EnergyRatio => "energy_ratio",
			Field::SizeRatio => "size_ratio",
			Field::AccuracyDrop => "accuracy_drop",
			Field::MemoryReductionMb => "memory_reduction_mb",
			Field::EnergyReductionMw => "energy_reduction_mw",
		}
	}

	pub fn from_key(key: &str) -> Option<Field> {
		Field::ALL.iter().copied().find(|field| field.key() == key)
	}

	pub fn is_ratio(self) -> bool {
		matches!(
			self,
			Field::AccuracyRatio | Field::LatencyRatio | Field::EnergyRatio | Field::SizeRatio
		)
	}

	pub fn value(self, view: &DerivedRunView) -> Option<f64> {
		let record = &view.record;
		match self {
			Field::AccuracyFp32 => record.accuracy_fp32,
			Field::AccuracyInt8 => record.accuracy_int8,
			Field::LatencyFp32 => record.latency_fp32,
			Field::LatencyInt8 => record.latency_int8,
			Field::EnergyFp32 => record.energy_fp32,
			Field::EnergyInt8 => record.energy_int8,
			Field::ModelSizeFp32 => record.model_size_fp32,
			Field::ModelSizeInt8 => record.model_size_int8,
			Field::MemoryFp32 => record.memory_fp32,
			Field::MemoryInt8 => record.memory_int8,
			Field::AccuracyRatio => view.accuracy_ratio,
			Field::LatencyRatio => view.latency_ratio,
			Field::EnergyRatio => view.energy_ratio,
			Field::SizeRatio => view.size_ratio,
			Field::AccuracyDrop => view.accuracy_drop,
			Field::MemoryReductionMb => view.memory_reduction_mb,
			Field::EnergyReductionMw => view.energy_reduction_mw,
		}
	}

	/// The value as shown in a table cell: ratios as `1.00x`, everything else with four decimals.
	pub fn display(self, view: &DerivedRunView) -> String {
		let value = self.value(view);
		if self.is_ratio() {
			format_ratio(value)
		} else {
			format_value(value)
		}
	}
}

#[test]
fn test_field_keys_round_trip() {
	for field in Field::ALL.iter().copied() {
		assert_eq!(Field::from_key(field.key()), Some(field));
	}
	assert_eq!(Field::from_key("run"), None);
}

#[test]
fn test_field_display() {
	let mut record = crate::RunMetricRecord::new("alexnet");
	record.model_size_fp32 = Some(200.0);
	record.model_size_int8 = Some(0.0);
	let view = crate::derive_ratios(&record);
	assert_eq!(Field::ModelSizeFp32.display(&view), "200.0000");
	assert_eq!(Field::ModelSizeInt8.display(&view), "0.0000");
	assert_eq!(Field::SizeRatio.display(&view), "-");
}
