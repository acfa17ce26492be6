use crate::sort::SortColumn;
use compression_board_metrics::{DerivedRunView, Field};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TableId {
	Raw,
	Relative,
}

pub struct Column {
	pub header: &'static str,
	pub sort: SortColumn,
}

const fn column(header: &'static str, field: Field) -> Column {
	Column {
		header,
		sort: SortColumn::Field(field),
	}
}

const RAW_COLUMNS: &[Column] = &[
	Column {
		header: "Run",
		sort: SortColumn::Run,
	},
	column("FP32 Accuracy", Field::AccuracyFp32),
	column("INT8 Accuracy", Field::AccuracyInt8),
	column("FP32 Latency (ms)", Field::LatencyFp32),
	column("INT8 Latency (ms)", Field::LatencyInt8),
	column("FP32 Energy (mW)", Field::EnergyFp32),
	column("INT8 Energy (mW)", Field::EnergyInt8),
	column("FP32 Size (MB)", Field::ModelSizeFp32),
	column("INT8 Size (MB)", Field::ModelSizeInt8),
];

const RELATIVE_COLUMNS: &[Column] = &[
	Column {
		header: "Run",
		sort: SortColumn::Run,
	},
	column("Accuracy Ratio", Field::AccuracyRatio),
	column("Latency Ratio", Field::LatencyRatio),
	column("Energy Ratio", Field::EnergyRatio),
	column("Size Ratio", Field::SizeRatio),
];

impl TableId {
	pub fn key(self) -> &'static str {
		match self {
			TableId::Raw => "raw",
			TableId::Relative => "relative",
		}
	}

	pub fn from_key(key: &str) -> Option<TableId> {
		match key {
			"raw" => Some(TableId::Raw),
			"relative" => Some(TableId::Relative),
			_ => None,
		}
	}

	pub fn element_id(self) -> &'static str {
		match self {
			TableId::Raw => "rawTable",
			TableId::Relative => "relativeTable",
		}
	}

	pub fn columns(self) -> &'static [Column] {
		match self {
			TableId::Raw => RAW_COLUMNS,
			TableId::Relative => RELATIVE_COLUMNS,
		}
	}

	pub fn csv_file_name(self) -> &'static str {
		match self {
			TableId::Raw => "raw_metrics.csv",
			TableId::Relative => "relative_metrics.csv",
		}
	}
}

impl Column {
	/// The text of this column's cell for `view`.
	pub fn display(&self, view: &DerivedRunView) -> String {
		match self.sort {
			SortColumn::Run => view.run().to_owned(),
			SortColumn::Field(field) => field.display(view),
		}
	}
}

#[test]
fn test_cell_display() {
	let mut record = compression_board_metrics::RunMetricRecord::new("alexnet");
	record.accuracy_fp32 = Some(0.99);
	record.accuracy_int8 = Some(0.99);
	record.model_size_fp32 = Some(200.0);
	record.model_size_int8 = Some(10.0);
	let view = compression_board_metrics::derive_ratios(&record);
	let cells: Vec<String> = TableId::Relative
		.columns()
		.iter()
		.map(|column| column.display(&view))
		.collect();
	assert_eq!(cells, vec!["alexnet", "1.00x", "-", "-", "20.00x"]);
	assert_eq!(TableId::Raw.columns().len(), 9);
}
