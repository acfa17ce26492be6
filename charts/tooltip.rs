use crate::{
	common::Point,
	pareto::{ChartId, ScatterPoint},
	theme::ColorTokens,
};
use compression_board_metrics::{format_ratio, format_value, DerivedRunView};
use html::{style, HostNode, Node};

#[derive(Clone, Debug, PartialEq)]
pub struct TooltipContent {
	pub title: String,
	pub rows: Vec<TooltipRow>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct TooltipRow {
	pub label: String,
	pub value: String,
}

fn row(label: &str, value: String) -> TooltipRow {
	TooltipRow {
		label: label.to_owned(),
		value,
	}
}

/// The tooltip for a hovered point. Derived values of the run are listed only when they are defined.
pub fn tooltip_content(chart: ChartId, point: &ScatterPoint, view: &DerivedRunView) -> TooltipContent {
	let mut rows = vec![
		row("Accuracy", format_value(Some(point.y))),
		row(
			chart.x_label(),
			format!("{:.2} {}", point.x, chart.x_unit()),
		),
	];
	if let Some(accuracy_drop) = view.accuracy_drop {
		rows.push(row("Accuracy Drop", format_value(Some(accuracy_drop))));
	}
	if let Some(size_ratio) = view.size_ratio {
		rows.push(row("Size Ratio", format_ratio(Some(size_ratio))));
	}
	if let Some(speedup) = view.latency_ratio {
		rows.push(row("Speedup", format_ratio(Some(speedup))));
	}
	if let Some(memory_reduction) = view.memory_reduction_mb {
		rows.push(row("Memory Reduction", format!("{:.2} MB", memory_reduction)));
	}
	if let Some(energy_reduction) = view.energy_reduction_mw {
		rows.push(row("Energy Reduction", format!("{:.2} mW", energy_reduction)));
	}
	TooltipContent {
		title: format!("{} ({})", point.run, point.precision.label()),
		rows,
	}
}

pub fn render_tooltip(content: &TooltipContent, tokens: &ColorTokens) -> Node {
	let container_style = style! {
		"background-color" => tokens.card_bg.as_str(),
		"border" => format!("1px solid {}", tokens.border_color),
		"color" => tokens.text_color.as_str(),
		"font-family" => tokens.font_family.as_str(),
	};
	HostNode::new("div")
		.attribute("class", "compression-tooltip")
		.attribute("style", container_style)
		.child(
			HostNode::new("div")
				.attribute("class", "compression-tooltip-title")
				.child(content.title.clone()),
		)
		.children(content.rows.iter().map(|row| {
			HostNode::new("div")
				.attribute("class", "compression-tooltip-row")
				.child(format!("{}: {}", row.label, row.value))
		}))
		.into()
}

/**
Place a tooltip of size `tooltip` near `cursor` within a viewport of size `viewport`. The tooltip sits to the right of and above the cursor, flips to the left if it would overflow on the right, flips above if it would overflow at the bottom, and never starts at a negative coordinate.
*/
pub fn place_tooltip(cursor: Point, tooltip: (f64, f64), viewport: (f64, f64)) -> Point {
	let (width, height) = tooltip;
	let (viewport_width, viewport_height) = viewport;
	let mut x = cursor.x + 15.0;
	let mut y = cursor.y - 10.0;
	if x + width > viewport_width {
		x = cursor.x - width - 15.0;
	}
	if y + height > viewport_height {
		y = cursor.y - height - 10.0;
	}
	Point {
		x: x.max(0.0),
		y: y.max(0.0),
	}
}

#[test]
fn test_tooltip_content() {
	let mut record = compression_board_metrics::RunMetricRecord::new("alexnet");
	record.accuracy_fp32 = Some(0.5655);
	record.accuracy_int8 = Some(0.5512);
	record.latency_fp32 = Some(12.0);
	record.latency_int8 = Some(6.0);
	let view = compression_board_metrics::derive_ratios(&record);
	let point = ScatterPoint {
		run: "alexnet".to_owned(),
		precision: compression_board_metrics::Precision::Int8,
		color: "#1f77b4",
		x: 6.0,
		y: 0.5512,
	};
	let content = tooltip_content(ChartId::Latency, &point, &view);
	let lines: Vec<String> = std::iter::once(content.title.clone())
		.chain(
			content
				.rows
				.iter()
				.map(|row| format!("{}: {}", row.label, row.value)),
		)
		.collect();
	insta::assert_debug_snapshot!(lines, @r###"
	[
	    "alexnet (INT8)",
	    "Accuracy: 0.5512",
	    "Latency: 6.00 ms",
	    "Accuracy Drop: 0.0143",
	    "Speedup: 2.00x",
	]
	"###);
}

#[test]
fn test_place_tooltip() {
	let viewport = (1000.0, 800.0);
	let tooltip = (200.0, 100.0);
	assert_eq!(
		place_tooltip(Point { x: 100.0, y: 100.0 }, tooltip, viewport),
		Point { x: 115.0, y: 90.0 }
	);
	assert_eq!(
		place_tooltip(Point { x: 900.0, y: 750.0 }, tooltip, viewport),
		Point { x: 685.0, y: 640.0 }
	);
	assert_eq!(
		place_tooltip(Point { x: 150.0, y: 5.0 }, (900.0, 100.0), viewport),
		Point { x: 0.0, y: 0.0 }
	);
}
