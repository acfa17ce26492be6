use compression_board_metrics::{aggregate, Field, SummaryResponse};
use compression_board_util::table::Table;

const COLUMNS: [(&str, Field); 6] = [
	("Accuracy FP32", Field::AccuracyFp32),
	("Accuracy INT8", Field::AccuracyInt8),
	("Accuracy Drop", Field::AccuracyDrop),
	("Size Ratio", Field::SizeRatio),
	("Speedup", Field::LatencyRatio),
	("Energy Ratio", Field::EnergyRatio),
];

/// One row per run in the order the summary lists them. An empty summary prints a single line instead of a table.
pub fn summary_table(summary: &SummaryResponse) -> String {
	let views = aggregate(&summary.runs);
	if views.is_empty() {
		return "No compression runs found.\n".to_owned();
	}
	let mut header = vec!["Run"];
	header.extend(COLUMNS.iter().map(|(title, _)| *title));
	let rows: Vec<Vec<String>> = views
		.iter()
		.map(|view| {
			std::iter::once(view.run().to_owned())
				.chain(COLUMNS.iter().map(|(_, field)| field.display(view)))
				.collect()
		})
		.collect();
	Table {
		padding: 1,
		header: &header,
		rows: &rows,
	}
	.to_string()
}

#[test]
fn test_summary_table() {
	use compression_board_metrics::RunMetricRecord;
	let mut alexnet = RunMetricRecord::new("alexnet");
	alexnet.accuracy_fp32 = Some(0.99);
	alexnet.accuracy_int8 = Some(0.98);
	alexnet.model_size_fp32 = Some(200.0);
	alexnet.model_size_int8 = Some(10.0);
	alexnet.speedup = Some(2.0);
	let resnet = RunMetricRecord::new("resnet18");
	let summary = SummaryResponse {
		runs: vec![alexnet, resnet],
		error: None,
	};
	insta::assert_snapshot!(summary_table(&summary), @r###"
	| Run      | Accuracy FP32 | Accuracy INT8 | Accuracy Drop | Size Ratio | Speedup | Energy Ratio |
	|----------|---------------|---------------|---------------|------------|---------|--------------|
	| alexnet  | 0.9900        | 0.9800        | 0.0100        | 20.00x     | 2.00x   | -            |
	| resnet18 | -             | -             | -             | -          | -       | -            |
	"###);
}

#[test]
fn test_empty_summary_table() {
	assert_eq!(
		summary_table(&SummaryResponse::default()),
		"No compression runs found.\n"
	);
}
