use crate::{
	state::{CardId, DashboardState, LoadState},
	style::stylesheet,
	table::TableId,
};
use compression_board_charts::{
	build_series, render_chart, ChartBackend, ChartId, ColorTokens, RenderChartOptions,
	CHART_CONFIG,
};
use compression_board_ui::{
	Button, Card, RunItem, SearchField, Table, TableBody, TableCell, TableHeader, TableHeaderCell,
	TableRow, TextAlign,
};
use html::{raw, HostNode, Node};

pub const NO_DATA_MESSAGE: &str =
	"No compression data found. Log FP32 and INT8 metrics to see them here.";
pub const NO_RUNS_SELECTED_MESSAGE: &str = "No runs selected";

pub struct DashboardViewOptions<'a> {
	pub state: &'a DashboardState,
	pub tokens: &'a ColorTokens,
	pub backend: ChartBackend,
}

pub fn render_dashboard(options: DashboardViewOptions) -> Node {
	let DashboardViewOptions {
		state,
		tokens,
		backend,
	} = options;
	HostNode::new("div")
		.attribute("class", "compression-dashboard")
		.attribute("id", "compressionDashboard")
		.child(HostNode::new("style").child(raw!(stylesheet(tokens))))
		.child(render_sidebar(state))
		.child(
			HostNode::new("div")
				.attribute("class", "main")
				.attribute("id", "dashboardMain")
				.child(render_main(state, tokens, backend)),
		)
		.into()
}

pub fn render_sidebar(state: &DashboardState) -> Node {
	let search_value = if state.search_term.is_empty() {
		None
	} else {
		Some(state.search_term.clone())
	};
	let run_items = state.sidebar_entries().into_iter().map(|entry| RunItem {
		run: entry.run.to_owned(),
		color: entry.color.to_owned(),
		checked: entry.checked,
		hidden: entry.hidden,
	});
	HostNode::new("div")
		.attribute("class", "sidebar")
		.attribute("id", "sidebar")
		.child(
			HostNode::new("div")
				.attribute("class", "sidebar-title")
				.child("Runs"),
		)
		.child(SearchField {
			id: "runSearch".to_owned(),
			placeholder: Some("Search runs...".to_owned()),
			value: search_value,
		})
		.child(
			HostNode::new("div")
				.attribute("class", "sidebar-actions")
				.child(Button {
					action: Some("select-all"),
					children: vec!["Select All".into()],
					..Default::default()
				})
				.child(Button {
					action: Some("deselect-all"),
					children: vec!["Deselect All".into()],
					..Default::default()
				}),
		)
		.child(
			HostNode::new("div")
				.attribute("class", "run-count")
				.attribute("id", "runCount")
				.child(state.run_count_label()),
		)
		.child(
			HostNode::new("div")
				.attribute("class", "run-list")
				.attribute("id", "runList")
				.children(run_items),
		)
		.into()
}

fn status(message: String, error: bool) -> Node {
	HostNode::new("div")
		.attribute("class", if error { "status error" } else { "status" })
		.child(message)
		.into()
}

/// The main area: a status message until runs are loaded, then the chart, relative and raw cards.
pub fn render_main(state: &DashboardState, tokens: &ColorTokens, backend: ChartBackend) -> Node {
	match &state.load {
		LoadState::Loading => return status("Loading...".to_owned(), false),
		LoadState::Failed(message) => return status(format!("Error: {}", message), true),
		LoadState::Loaded if state.all_runs.is_empty() => {
			return status(NO_DATA_MESSAGE.to_owned(), false)
		}
		LoadState::Loaded => {}
	}
	let charts: Node = if state.visible_runs.is_empty() {
		status(NO_RUNS_SELECTED_MESSAGE.to_owned(), false)
	} else {
		render_chart_grid(state, tokens, backend)
	};
	let export_button = |table: TableId| -> Node {
		Button {
			action: Some("export-csv"),
			target: Some(table.key().to_owned()),
			children: vec!["Export CSV".into()],
			..Default::default()
		}
		.into()
	};
	let cards: Vec<Node> = vec![
		Card {
			id: CardId::Pareto.key().to_owned(),
			title: CardId::Pareto.title().to_owned(),
			collapsed: state.is_collapsed(CardId::Pareto),
			actions: Vec::new(),
			children: vec![charts],
		}
		.into(),
		Card {
			id: CardId::Relative.key().to_owned(),
			title: CardId::Relative.title().to_owned(),
			collapsed: state.is_collapsed(CardId::Relative),
			actions: vec![export_button(TableId::Relative)],
			children: vec![render_table(state, TableId::Relative)],
		}
		.into(),
		Card {
			id: CardId::Raw.key().to_owned(),
			title: CardId::Raw.title().to_owned(),
			collapsed: state.is_collapsed(CardId::Raw),
			actions: vec![export_button(TableId::Raw)],
			children: vec![render_table(state, TableId::Raw)],
		}
		.into(),
	];
	cards.into()
}

/// The size a chart is first drawn at, before the client measures its container.
pub fn default_chart_size(expanded: bool) -> (f64, f64) {
	let width = CHART_CONFIG.default_width;
	let width = if expanded { width * 2.0 } else { width };
	(width, CHART_CONFIG.default_height)
}

pub fn render_chart_grid(state: &DashboardState, tokens: &ColorTokens, backend: ChartBackend) -> Node {
	HostNode::new("div")
		.attribute("class", "chart-grid")
		.children(ChartId::ALL.iter().map(|chart| {
			let expanded = state.expanded_chart == Some(*chart);
			let (width, height) = default_chart_size(expanded);
			HostNode::new("div")
				.attribute(
					"class",
					if expanded {
						"chart-container expanded"
					} else {
						"chart-container"
					},
				)
				.attribute("data-chart", chart.element_id())
				.child(
					HostNode::new("div")
						.attribute("class", "chart-header")
						.child(
							HostNode::new("span")
								.attribute("class", "chart-title")
								.child(chart.title()),
						)
						.child(Button {
							action: Some("expand-chart"),
							target: Some(chart.element_id().to_owned()),
							title: Some(if expanded { "Collapse" } else { "Expand" }.to_owned()),
							children: vec![if expanded { "⤡" } else { "⤢" }.into()],
							..Default::default()
						})
						.child(Button {
							action: Some("export-svg"),
							target: Some(chart.element_id().to_owned()),
							title: Some("Export SVG".to_owned()),
							children: vec!["SVG".into()],
							..Default::default()
						}),
				)
				.child(
					HostNode::new("div")
						.attribute("class", "chart-body")
						.attribute("id", chart.element_id())
						.child(render_chart_body(
							state, *chart, tokens, backend, width, height,
						)),
				)
		}))
		.into()
}

/// Draw one chart from the visible runs at the given size.
pub fn render_chart_body(
	state: &DashboardState,
	chart: ChartId,
	tokens: &ColorTokens,
	backend: ChartBackend,
	width: f64,
	height: f64,
) -> Node {
	let rows: Vec<_> = state.visible_rows().into_iter().cloned().collect();
	let series = build_series(chart, &rows, &state.colors);
	render_chart(
		backend,
		RenderChartOptions {
			chart,
			series: &series,
			tokens,
			width,
			height,
		},
	)
}

pub fn render_table(state: &DashboardState, table: TableId) -> Node {
	let columns = table.columns();
	let text_align = |index: usize| {
		if index == 0 {
			TextAlign::Left
		} else {
			TextAlign::Right
		}
	};
	let header = TableHeader {
		children: columns
			.iter()
			.enumerate()
			.map(|(index, column)| {
				let sorted = if state.sort_column == Some(column.sort) {
					Some(state.sort_direction)
				} else {
					None
				};
				TableHeaderCell {
					sort_key: Some(column.sort.key().to_owned()),
					sorted,
					text_align: Some(text_align(index)),
					children: vec![column.header.into()],
				}
				.into()
			})
			.collect(),
	};
	let body = TableBody {
		children: state
			.visible_rows()
			.into_iter()
			.map(|row| {
				TableRow {
					color: None,
					children: columns
						.iter()
						.enumerate()
						.map(|(index, column)| {
							TableCell {
								color: None,
								text_align: Some(text_align(index)),
								children: vec![column.display(row).into()],
							}
							.into()
						})
						.collect(),
				}
				.into()
			})
			.collect(),
	};
	Table {
		id: Some(table.element_id().to_owned()),
		width: Some("100%".to_owned()),
		children: vec![header.into(), body.into()],
	}
	.into()
}

#[cfg(test)]
fn test_state() -> DashboardState {
	use compression_board_metrics::{RunMetricRecord, SummaryResponse};
	let mut alexnet = RunMetricRecord::new("alexnet");
	alexnet.accuracy_fp32 = Some(0.56);
	alexnet.accuracy_int8 = Some(0.55);
	alexnet.model_size_fp32 = Some(233.0);
	alexnet.model_size_int8 = Some(58.0);
	let mut resnet18 = RunMetricRecord::new("resnet18");
	resnet18.accuracy_fp32 = Some(0.7);
	resnet18.accuracy_int8 = Some(0.69);
	resnet18.model_size_fp32 = Some(44.7);
	resnet18.model_size_int8 = Some(11.3);
	DashboardState::new().apply(crate::Action::Loaded(SummaryResponse {
		runs: vec![alexnet, resnet18],
		error: None,
	}))
}

#[test]
fn test_charts_follow_visible_runs() {
	let tokens = ColorTokens::default();
	let state = test_state().apply(crate::Action::ToggleRun("resnet18".to_owned()));
	let html = render_main(&state, &tokens, ChartBackend::Vector).to_string();
	assert_eq!(html.matches(r#"data-run="alexnet""#).count(), 2);
	assert_eq!(html.matches(r#"data-run="resnet18""#).count(), 0);
	assert_eq!(html.matches("No data available for chart").count(), 3);
	let state = state.apply(crate::Action::DeselectAll);
	let html = render_main(&state, &tokens, ChartBackend::Vector).to_string();
	assert!(html.contains("No runs selected"));
	assert!(!html.contains("chart-grid"));
}

#[test]
fn test_status_messages() {
	let tokens = ColorTokens::default();
	let html = render_main(&DashboardState::new(), &tokens, ChartBackend::Vector).to_string();
	assert_eq!(html, r#"<div class="status">Loading...</div>"#);
	let state = DashboardState::new().apply(crate::Action::LoadFailed("timeout".to_owned()));
	let html = render_main(&state, &tokens, ChartBackend::Vector).to_string();
	assert_eq!(html, r#"<div class="status error">Error: timeout</div>"#);
}

#[test]
fn test_render_relative_table() {
	let state = test_state().apply(crate::Action::SortBy(crate::SortColumn::Field(
		compression_board_metrics::Field::SizeRatio,
	)));
	let html = render_table(&state, TableId::Relative).to_string();
	assert!(html.contains(r#"<th class="table-header-cell table-align-right sortable sort-asc" data-sort="size_ratio">Size Ratio</th>"#));
	let resnet = html.find(">resnet18<").unwrap();
	let alexnet = html.find(">alexnet<").unwrap();
	assert!(resnet < alexnet);
	assert!(html.contains(">4.02x<"));
}

#[test]
fn test_render_sidebar() {
	let state = test_state().apply(crate::Action::Search("res".to_owned()));
	let html = render_sidebar(&state).to_string();
	assert!(html.contains(r#"<div class="run-count" id="runCount">2 of 2 runs</div>"#));
	assert!(html.contains(r#"<label class="run-item" data-run="alexnet" hidden>"#));
	assert!(html.contains(r#"<label class="run-item" data-run="resnet18">"#));
	assert!(html.contains(r#"value="res""#));
}
