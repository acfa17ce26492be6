use crate::table::TableId;
use compression_board_metrics::DerivedRunView;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExportError {
	#[error("No runs selected to export")]
	NoRunsSelected,
	#[error("failed to write csv: {0}")]
	Csv(#[from] csv::Error),
	#[error("failed to write csv: {0}")]
	Io(#[from] std::io::Error),
	#[error("csv output was not utf-8")]
	Utf8(#[from] std::string::FromUtf8Error),
}

/**
Serialize `rows` as CSV with the table's headers. Every field is quoted, and each cell holds exactly the text the table shows, so an undefined value is written as `-`.
*/
pub fn export_csv(table: TableId, rows: &[&DerivedRunView]) -> Result<String, ExportError> {
	if rows.is_empty() {
		return Err(ExportError::NoRunsSelected);
	}
	let columns = table.columns();
	let mut writer = csv::WriterBuilder::new()
		.quote_style(csv::QuoteStyle::Always)
		.from_writer(Vec::new());
	writer.write_record(columns.iter().map(|column| column.header))?;
	for row in rows {
		writer.write_record(columns.iter().map(|column| column.display(row)))?;
	}
	let bytes = writer
		.into_inner()
		.map_err(|error| ExportError::Io(error.into_error()))?;
	Ok(String::from_utf8(bytes)?)
}

#[cfg(test)]
fn test_views() -> Vec<DerivedRunView> {
	let mut alexnet = compression_board_metrics::RunMetricRecord::new("alexnet");
	alexnet.accuracy_fp32 = Some(0.99);
	alexnet.accuracy_int8 = Some(0.99);
	alexnet.model_size_fp32 = Some(200.0);
	alexnet.model_size_int8 = Some(10.0);
	let mut quoted = compression_board_metrics::RunMetricRecord::new("bench \"v2\", int8");
	quoted.model_size_fp32 = Some(44.7);
	quoted.model_size_int8 = Some(0.0);
	compression_board_metrics::aggregate(&[alexnet, quoted])
}

#[test]
fn test_export_relative_csv() {
	let views = test_views();
	let rows: Vec<&DerivedRunView> = views.iter().collect();
	let csv = export_csv(TableId::Relative, &rows).unwrap();
	insta::assert_snapshot!(csv, @r###"
	"Run","Accuracy Ratio","Latency Ratio","Energy Ratio","Size Ratio"
	"alexnet","1.00x","-","-","20.00x"
	"bench ""v2"", int8","-","-","-","-"
	"###);
}

#[test]
fn test_export_csv_round_trips() {
	let views = test_views();
	let rows: Vec<&DerivedRunView> = views.iter().take(1).collect();
	let csv = export_csv(TableId::Raw, &rows).unwrap();
	let mut reader = csv::Reader::from_reader(csv.as_bytes());
	let records: Vec<csv::StringRecord> = reader.records().map(|record| record.unwrap()).collect();
	assert_eq!(records.len(), 1);
	assert_eq!(&records[0][0], "alexnet");
	assert_eq!(&records[0][7], "200.0000");
	assert_eq!(&records[0][8], "10.0000");
}

#[test]
fn test_export_without_rows_is_refused() {
	let error = export_csv(TableId::Raw, &[]).unwrap_err();
	assert_eq!(error.to_string(), "No runs selected to export");
}

#[test]
fn test_export_follows_dashboard_state() {
	use crate::{sort::SortColumn, state::Action, state::DashboardState};
	use compression_board_metrics::{Field, RunMetricRecord, SummaryResponse};
	let record = |run: &str, size_fp32: f64, size_int8: f64| {
		let mut record = RunMetricRecord::new(run);
		record.accuracy_fp32 = Some(0.9);
		record.accuracy_int8 = Some(0.88);
		record.model_size_fp32 = Some(size_fp32);
		record.model_size_int8 = Some(size_int8);
		record
	};
	let summary = SummaryResponse {
		runs: vec![
			record("alexnet", 200.0, 10.0),
			record("resnet18", 44.7, 11.3),
			record("vgg", 500.0, 125.0),
		],
		error: None,
	};
	let state = DashboardState::new()
		.apply(Action::Loaded(summary))
		.apply(Action::ToggleRun("resnet18".to_owned()))
		.apply(Action::Search("vgg".to_owned()))
		.apply(Action::SortBy(SortColumn::Field(Field::SizeRatio)))
		.apply(Action::SortBy(SortColumn::Field(Field::SizeRatio)));
	let rows = state.visible_rows();
	let csv = export_csv(TableId::Relative, &rows).unwrap();
	let mut reader = csv::Reader::from_reader(csv.as_bytes());
	let headers: Vec<String> = reader.headers().unwrap().iter().map(str::to_owned).collect();
	assert_eq!(
		headers,
		TableId::Relative
			.columns()
			.iter()
			.map(|column| column.header.to_owned())
			.collect::<Vec<_>>()
	);
	let records: Vec<csv::StringRecord> = reader.records().map(|record| record.unwrap()).collect();
	let runs: Vec<&str> = records.iter().map(|record| &record[0]).collect();
	assert_eq!(runs, vec!["alexnet", "vgg"]);
	assert_eq!(
		runs,
		rows.iter().map(|view| view.run()).collect::<Vec<_>>()
	);
	for (record, view) in records.iter().zip(rows.iter()) {
		assert_eq!(&record[1], Field::AccuracyRatio.display(view));
		assert_eq!(&record[4], Field::SizeRatio.display(view));
	}
	assert_eq!(&records[0][4], "20.00x");
	assert_eq!(&records[1][4], "4.00x");
}
