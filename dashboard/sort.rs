use compression_board_metrics::{DerivedRunView, Field};
use compression_board_ui::SortDirection;
use compression_board_util::finite::Finite;
use std::cmp::Ordering;

/// A column a table can be sorted by: the run name or one numeric field.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SortColumn {
	Run,
	Field(Field),
}

impl SortColumn {
	pub fn key(self) -> &'static str {
		match self {
			SortColumn::Run => "run",
			SortColumn::Field(field) => field.key(),
		}
	}

	pub fn from_key(key: &str) -> Option<SortColumn> {
		match key {
			"run" => Some(SortColumn::Run),
			key => Field::from_key(key).map(SortColumn::Field),
		}
	}
}

/**
Compare two rows by `column`. An undefined value compares below every defined value, so it comes first when ascending and last when descending.
*/
pub fn compare_rows(column: SortColumn, a: &DerivedRunView, b: &DerivedRunView) -> Ordering {
	match column {
		SortColumn::Run => a.run().cmp(b.run()),
		SortColumn::Field(field) => {
			let value = |view: &DerivedRunView| field.value(view).and_then(|value| Finite::new(value).ok());
			value(a).cmp(&value(b))
		}
	}
}

/// Sort rows in place. The sort is stable, so rows that compare equal keep their order.
pub fn sort_rows(rows: &mut [&DerivedRunView], column: SortColumn, direction: SortDirection) {
	rows.sort_by(|a, b| {
		let ordering = compare_rows(column, a, b);
		match direction {
			SortDirection::Ascending => ordering,
			SortDirection::Descending => ordering.reverse(),
		}
	});
}

#[cfg(test)]
fn views() -> Vec<DerivedRunView> {
	let record = |run: &str, size_fp32: Option<f64>, size_int8: Option<f64>| {
		let mut record = compression_board_metrics::RunMetricRecord::new(run);
		record.model_size_fp32 = size_fp32;
		record.model_size_int8 = size_int8;
		record
	};
	compression_board_metrics::aggregate(&[
		record("alexnet", Some(200.0), Some(10.0)),
		record("resnet18", Some(44.0), Some(0.0)),
		record("vgg16", Some(500.0), Some(125.0)),
		record("mobilenet", None, Some(4.0)),
	])
}

#[cfg(test)]
fn sorted(views: &[DerivedRunView], column: SortColumn, direction: SortDirection) -> Vec<&str> {
	let mut rows: Vec<&DerivedRunView> = views.iter().collect();
	sort_rows(&mut rows, column, direction);
	rows.into_iter().map(|row| row.run()).collect()
}

#[test]
fn test_undefined_sorts_lowest() {
	let views = views();
	let column = SortColumn::Field(Field::SizeRatio);
	assert_eq!(
		sorted(&views, column, SortDirection::Ascending),
		vec!["resnet18", "mobilenet", "vgg16", "alexnet"]
	);
	assert_eq!(
		sorted(&views, column, SortDirection::Descending),
		vec!["alexnet", "vgg16", "resnet18", "mobilenet"]
	);
}

#[test]
fn test_sort_by_run_name() {
	let views = views();
	assert_eq!(
		sorted(&views, SortColumn::Run, SortDirection::Ascending),
		vec!["alexnet", "mobilenet", "resnet18", "vgg16"]
	);
}

#[test]
fn test_sort_column_keys() {
	assert_eq!(SortColumn::from_key("run"), Some(SortColumn::Run));
	assert_eq!(
		SortColumn::from_key("size_ratio"),
		Some(SortColumn::Field(Field::SizeRatio))
	);
	assert_eq!(SortColumn::from_key("bogus"), None);
}
