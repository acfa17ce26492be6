use crate::{
	common::{format_tick, ChartBox, LinearScale},
	config::{CHART_CONFIG, FP32_LEGEND_COLOR, INT8_LEGEND_COLOR},
	pareto::{compute_domain, ChartDomain, ChartId, ParetoSeries, ScatterPoint},
	theme::{ColorTokens, ThemeRole},
};
use compression_board_metrics::Precision;
use html::{format_number, style, HostNode, Node};

pub const EMPTY_CHART_MESSAGE: &str = "No data available for chart";

/**
How charts are drawn. `Vector` lays charts out the way a charting library does, with nested groups, scales, nice ticks and symbol paths. `Primitive` draws the same chart from plain lines, polygons and text at absolute coordinates. The backend is chosen once by the host environment.
*/
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartBackend {
	Vector,
	Primitive,
}

impl Default for ChartBackend {
	fn default() -> ChartBackend {
		ChartBackend::Vector
	}
}

impl ChartBackend {
	pub fn key(self) -> &'static str {
		match self {
			ChartBackend::Vector => "vector",
			ChartBackend::Primitive => "primitive",
		}
	}

	pub fn from_key(key: &str) -> Option<ChartBackend> {
		match key {
			"vector" => Some(ChartBackend::Vector),
			"primitive" => Some(ChartBackend::Primitive),
			_ => None,
		}
	}
}

pub struct RenderChartOptions<'a> {
	pub chart: ChartId,
	pub series: &'a ParetoSeries,
	pub tokens: &'a ColorTokens,
	pub width: f64,
	pub height: f64,
}

/// Render a chart, or a placeholder message if neither series has a point.
pub fn render_chart(backend: ChartBackend, options: RenderChartOptions) -> Node {
	let domain = match compute_domain(options.series) {
		Some(domain) => domain,
		None => return render_placeholder(options.tokens),
	};
	match backend {
		ChartBackend::Vector => render_vector_chart(&options, domain),
		ChartBackend::Primitive => render_primitive_chart(&options, domain),
	}
}

pub fn render_placeholder(tokens: &ColorTokens) -> Node {
	HostNode::new("div")
		.attribute("class", "chart-placeholder")
		.attribute(
			"style",
			style! {
				"color" => tokens.secondary_text.as_str(),
				"font-family" => tokens.font_family.as_str(),
			},
		)
		.child(EMPTY_CHART_MESSAGE)
		.into()
}

fn svg_root(options: &RenderChartOptions) -> HostNode {
	HostNode::new("svg")
		.attribute("class", "pareto-chart")
		.attribute("data-chart", options.chart.element_id())
		.attribute("width", options.width)
		.attribute("height", options.height)
		.attribute(
			"viewBox",
			format!(
				"0 0 {} {}",
				format_number(options.width),
				format_number(options.height)
			),
		)
}

fn text(role: ThemeRole, tokens: &ColorTokens, font_size: f64, value: impl Into<Node>) -> HostNode {
	let (attribute, color) = role.paint(tokens);
	HostNode::new("text")
		.attribute(ThemeRole::ATTRIBUTE, role.key())
		.attribute(attribute, color)
		.attribute("font-family", tokens.font_family.clone())
		.attribute("font-size", font_size)
		.child(value)
}

fn themed(node: HostNode, role: ThemeRole, tokens: &ColorTokens) -> HostNode {
	let (attribute, color) = role.paint(tokens);
	node.attribute(ThemeRole::ATTRIBUTE, role.key())
		.attribute(attribute, color)
}

/// Attach the data the client reads back for tooltips and hit testing.
fn marker(node: HostNode, point: &ScatterPoint, tokens: &ColorTokens) -> HostNode {
	let class = match point.precision {
		Precision::Fp32 => "marker marker-fp32",
		Precision::Int8 => "marker marker-int8",
	};
	themed(node, ThemeRole::MarkerOutline, tokens)
		.attribute("class", class)
		.attribute("fill", point.color)
		.attribute("stroke-width", 1.0)
		.attribute("data-run", point.run.clone())
		.attribute("data-precision", point.precision.segment())
		.attribute("data-x", point.x.to_string())
		.attribute("data-y", point.y.to_string())
		.child(
			HostNode::new("title")
				.child(format!("{} ({})", point.run, point.precision.label())),
		)
}

/// The path of a triangle symbol of the given area, centered on the origin and pointing up.
pub fn triangle_path(area: f64) -> String {
	let y = -(area / (3f64.sqrt() * 3.0)).sqrt();
	let x = 3f64.sqrt() * y;
	format!(
		"M0,{}L{},{}L{},{}Z",
		format_number(y * 2.0),
		format_number(-x),
		format_number(-y),
		format_number(x),
		format_number(-y),
	)
}

/// The path of a square symbol of the given area, centered on the origin.
pub fn square_path(area: f64) -> String {
	let w = area.sqrt();
	format!(
		"M{x},{x}h{w}v{w}h-{w}Z",
		x = format_number(-w / 2.0),
		w = format_number(w),
	)
}

fn symbol(precision: Precision) -> String {
	match precision {
		Precision::Fp32 => triangle_path(CHART_CONFIG.triangle_area),
		Precision::Int8 => square_path(CHART_CONFIG.square_area),
	}
}

fn translate(x: f64, y: f64) -> String {
	format!("translate({},{})", format_number(x), format_number(y))
}

fn render_vector_chart(options: &RenderChartOptions, domain: ChartDomain) -> Node {
	let RenderChartOptions {
		chart,
		series,
		tokens,
		width,
		height,
	} = options;
	let plot = ChartBox::plot_area(*width, *height);
	let x_scale = LinearScale::new((domain.x_min, domain.x_max), (0.0, plot.w));
	let y_scale = LinearScale::new((domain.y_min, domain.y_max), (plot.h, 0.0));
	let tick_size = CHART_CONFIG.tick_size;

	let (x_interval, x_ticks) = x_scale.ticks(CHART_CONFIG.tick_count);
	let x_axis = HostNode::new("g")
		.attribute("class", "x-axis")
		.attribute("transform", translate(0.0, plot.h))
		.attribute("text-anchor", "middle")
		.child(themed(
			HostNode::empty("path")
				.attribute("class", "domain")
				.attribute("fill", "none")
				.attribute(
					"d",
					format!("M0,{t}V0H{w}V{t}", t = tick_size, w = format_number(plot.w)),
				),
			ThemeRole::Axis,
			tokens,
		))
		.children(x_ticks.iter().map(|tick| {
			let label = match x_interval {
				Some(interval) => format_tick(*tick, interval),
				None => format_number(*tick),
			};
			HostNode::new("g")
				.attribute("class", "tick")
				.attribute("transform", translate(x_scale.apply(*tick), 0.0))
				.child(themed(
					HostNode::empty("line").attribute("y2", tick_size),
					ThemeRole::Axis,
					tokens,
				))
				.child(
					text(ThemeRole::Text, tokens, CHART_CONFIG.tick_font_size, label)
						.attribute("y", tick_size + 3.0)
						.attribute("dy", "0.71em"),
				)
		}));

	let (y_interval, y_ticks) = y_scale.ticks(CHART_CONFIG.tick_count);
	let y_axis = HostNode::new("g")
		.attribute("class", "y-axis")
		.attribute("text-anchor", "end")
		.child(themed(
			HostNode::empty("path")
				.attribute("class", "domain")
				.attribute("fill", "none")
				.attribute(
					"d",
					format!("M-{t},{h}H0V0H-{t}", t = tick_size, h = format_number(plot.h)),
				),
			ThemeRole::Axis,
			tokens,
		))
		.children(y_ticks.iter().map(|tick| {
			let label = match y_interval {
				Some(interval) => format_tick(*tick, interval),
				None => format_number(*tick),
			};
			HostNode::new("g")
				.attribute("class", "tick")
				.attribute("transform", translate(0.0, y_scale.apply(*tick)))
				.child(themed(
					HostNode::empty("line").attribute("x2", -tick_size),
					ThemeRole::Axis,
					tokens,
				))
				.child(
					text(ThemeRole::Text, tokens, CHART_CONFIG.tick_font_size, label)
						.attribute("x", -(tick_size + 3.0))
						.attribute("dy", "0.32em"),
				)
		}));

	let x_title = text(
		ThemeRole::Text,
		tokens,
		CHART_CONFIG.axis_title_font_size,
		chart.x_axis_title(),
	)
	.attribute("class", "axis-title")
	.attribute("x", plot.w / 2.0)
	.attribute("y", plot.h + CHART_CONFIG.margin_bottom - 5.0)
	.attribute("text-anchor", "middle");
	let y_title = text(
		ThemeRole::Text,
		tokens,
		CHART_CONFIG.axis_title_font_size,
		"Accuracy",
	)
	.attribute("class", "axis-title")
	.attribute("transform", "rotate(-90)")
	.attribute("x", -plot.h / 2.0)
	.attribute("y", -CHART_CONFIG.margin_left + 15.0)
	.attribute("text-anchor", "middle");

	let markers = HostNode::new("g").attribute("class", "markers").children(
		Precision::ALL.iter().flat_map(|precision| {
			let path = symbol(*precision);
			series.get(*precision).iter().map(move |point| {
				marker(
					HostNode::new("path").attribute("d", path.clone()).attribute(
						"transform",
						translate(x_scale.apply(point.x), y_scale.apply(point.y)),
					),
					point,
					tokens,
				)
			})
		}),
	);

	let legend_entry = |precision: Precision, color: &'static str, offset: f64| {
		vec![
			HostNode::empty("path")
				.attribute("d", symbol(precision))
				.attribute("transform", translate(0.0, offset))
				.attribute("fill", color),
			text(
				ThemeRole::Text,
				tokens,
				CHART_CONFIG.tick_font_size,
				precision.label(),
			)
			.attribute("x", 15.0)
			.attribute("y", offset + 4.0),
		]
	};
	let legend = HostNode::new("g")
		.attribute("class", "legend")
		.attribute(
			"transform",
			translate(plot.w - CHART_CONFIG.legend_offset, 10.0),
		)
		.children(legend_entry(Precision::Fp32, FP32_LEGEND_COLOR, 0.0))
		.children(legend_entry(
			Precision::Int8,
			INT8_LEGEND_COLOR,
			CHART_CONFIG.legend_entry_gap,
		));

	svg_root(options)
		.child(
			HostNode::new("g")
				.attribute("transform", translate(plot.x, plot.y))
				.child(x_axis)
				.child(y_axis)
				.child(x_title)
				.child(y_title)
				.child(markers)
				.child(legend),
		)
		.into()
}

fn render_primitive_chart(options: &RenderChartOptions, domain: ChartDomain) -> Node {
	let RenderChartOptions {
		chart,
		series,
		tokens,
		width,
		height,
	} = options;
	let (width, height) = (*width, *height);
	let plot = ChartBox::plot_area(width, height);
	let bottom = plot.y + plot.h;
	let right = plot.x + plot.w;
	let x_scale = LinearScale::new((domain.x_min, domain.x_max), (plot.x, right));
	let y_scale = LinearScale::new((domain.y_min, domain.y_max), (bottom, plot.y));
	let count = CHART_CONFIG.grid_line_count;
	let fraction = |i: usize| i as f64 / count as f64;

	let grid_line = |x1: f64, y1: f64, x2: f64, y2: f64| {
		themed(
			HostNode::empty("line")
				.attribute("class", "grid-line")
				.attribute("x1", x1)
				.attribute("y1", y1)
				.attribute("x2", x2)
				.attribute("y2", y2)
				.attribute("stroke-width", 0.5)
				.attribute("stroke-dasharray", "2,2")
				.attribute("opacity", 0.3),
			ThemeRole::Grid,
			tokens,
		)
	};
	let mut nodes: Vec<HostNode> = Vec::new();
	for i in 0..=count {
		let x = plot.x + fraction(i) * plot.w;
		nodes.push(grid_line(x, plot.y, x, bottom));
		let y = plot.y + fraction(i) * plot.h;
		nodes.push(grid_line(plot.x, y, right, y));
	}
	let axis_line = |x1: f64, y1: f64, x2: f64, y2: f64| {
		themed(
			HostNode::empty("line")
				.attribute("class", "axis-line")
				.attribute("x1", x1)
				.attribute("y1", y1)
				.attribute("x2", x2)
				.attribute("y2", y2),
			ThemeRole::Axis,
			tokens,
		)
	};
	nodes.push(axis_line(plot.x, bottom, right, bottom));
	nodes.push(axis_line(plot.x, plot.y, plot.x, bottom));
	for i in 0..=count {
		let value = domain.x_min + fraction(i) * (domain.x_max - domain.x_min);
		nodes.push(
			text(
				ThemeRole::Text,
				tokens,
				CHART_CONFIG.tick_font_size,
				format!("{:.1}", value),
			)
			.attribute("x", plot.x + fraction(i) * plot.w)
			.attribute("y", bottom + 20.0)
			.attribute("text-anchor", "middle"),
		);
		let value = domain.y_min + fraction(i) * (domain.y_max - domain.y_min);
		nodes.push(
			text(
				ThemeRole::Text,
				tokens,
				CHART_CONFIG.tick_font_size,
				format!("{:.3}", value),
			)
			.attribute("x", plot.x - 10.0)
			.attribute("y", bottom - fraction(i) * plot.h + 4.0)
			.attribute("text-anchor", "end"),
		);
	}
	nodes.push(
		text(
			ThemeRole::Text,
			tokens,
			CHART_CONFIG.axis_title_font_size,
			chart.x_axis_title(),
		)
		.attribute("class", "axis-title")
		.attribute("x", width / 2.0)
		.attribute("y", height - 5.0)
		.attribute("text-anchor", "middle"),
	);
	let (title_x, title_y) = (plot.x / 2.0, height / 2.0);
	nodes.push(
		text(
			ThemeRole::Text,
			tokens,
			CHART_CONFIG.axis_title_font_size,
			"Accuracy",
		)
		.attribute("class", "axis-title")
		.attribute("x", title_x)
		.attribute("y", title_y)
		.attribute("text-anchor", "middle")
		.attribute(
			"transform",
			format!(
				"rotate(-90, {}, {})",
				format_number(title_x),
				format_number(title_y)
			),
		),
	);
	for precision in Precision::ALL.iter().copied() {
		for point in series.get(precision) {
			let (x, y) = (x_scale.apply(point.x), y_scale.apply(point.y));
			nodes.push(marker(primitive_symbol(precision, x, y), point, tokens));
		}
	}
	let legend_x = width - CHART_CONFIG.legend_offset;
	let legend_y = 30.0;
	let legend_entries = [
		(Precision::Fp32, FP32_LEGEND_COLOR, legend_y),
		(
			Precision::Int8,
			INT8_LEGEND_COLOR,
			legend_y + CHART_CONFIG.legend_entry_gap,
		),
	];
	for (precision, color, y) in legend_entries.iter().copied() {
		nodes.push(primitive_symbol(precision, legend_x, y).attribute("fill", color));
		nodes.push(
			text(
				ThemeRole::Text,
				tokens,
				CHART_CONFIG.tick_font_size,
				precision.label(),
			)
			.attribute("x", legend_x + 15.0)
			.attribute("y", y + 4.0),
		);
	}
	svg_root(options).children(nodes).into()
}

fn primitive_symbol(precision: Precision, x: f64, y: f64) -> HostNode {
	match precision {
		Precision::Fp32 => {
			let r = CHART_CONFIG.triangle_radius;
			let dx = r * 0.866;
			let points = [(x, y - r), (x - dx, y + r / 2.0), (x + dx, y + r / 2.0)]
				.iter()
				.map(|(x, y)| format!("{},{}", format_number(*x), format_number(*y)))
				.collect::<Vec<_>>()
				.join(" ");
			HostNode::new("polygon").attribute("points", points)
		}
		Precision::Int8 => {
			let size = CHART_CONFIG.square_size;
			HostNode::new("rect")
				.attribute("x", x - size / 2.0)
				.attribute("y", y - size / 2.0)
				.attribute("width", size)
				.attribute("height", size)
		}
	}
}

#[cfg(test)]
fn test_series() -> ParetoSeries {
	let point = |run: &str, precision, x, y| ScatterPoint {
		run: run.to_owned(),
		precision,
		color: "#1f77b4",
		x,
		y,
	};
	ParetoSeries {
		fp32: vec![
			point("alexnet", Precision::Fp32, 233.0, 0.56),
			point("resnet18", Precision::Fp32, 44.7, 0.7),
		],
		int8: vec![point("alexnet", Precision::Int8, 58.0, 0.55)],
	}
}

#[test]
fn test_symbol_paths() {
	assert_eq!(triangle_path(60.0), "M0,-6.8L5.89,3.4L-5.89,3.4Z");
	assert_eq!(square_path(50.0), "M-3.54,-3.54h7.07v7.07h-7.07Z");
	assert_eq!(
		primitive_symbol(Precision::Fp32, 100.0, 50.0).get_attribute("points"),
		Some("100,44 94.8,53 105.2,53")
	);
}

#[test]
fn test_render_empty_chart_shows_placeholder() {
	let tokens = ColorTokens::default();
	for backend in [ChartBackend::Vector, ChartBackend::Primitive].iter() {
		let node = render_chart(
			*backend,
			RenderChartOptions {
				chart: ChartId::Energy,
				series: &ParetoSeries::default(),
				tokens: &tokens,
				width: 800.0,
				height: 400.0,
			},
		);
		let html = node.to_string();
		assert!(html.contains("No data available for chart"));
		assert!(!html.contains("<svg"));
	}
}

#[test]
fn test_render_vector_chart() {
	let tokens = ColorTokens::default();
	let series = test_series();
	let html = render_chart(
		ChartBackend::Vector,
		RenderChartOptions {
			chart: ChartId::Pareto,
			series: &series,
			tokens: &tokens,
			width: 800.0,
			height: 400.0,
		},
	)
	.to_string();
	assert!(html.starts_with(r#"<svg class="pareto-chart" data-chart="paretoChart" width="800" height="400" viewBox="0 0 800 400">"#));
	assert_eq!(html.matches(r#"class="marker marker-fp32""#).count(), 2);
	assert_eq!(html.matches(r#"class="marker marker-int8""#).count(), 1);
	assert!(html.contains("<title>alexnet (INT8)</title>"));
	assert!(html.contains(">Model Size (MB)</text>"));
	assert!(html.contains(r##"stroke="#202124""##));
	// The x domain is [25.87, 251.83], ticked every 20.
	assert!(html.contains(">40</text>"));
	assert!(html.contains(">240</text>"));
	assert!(!html.contains(">20</text>"));
}

#[test]
fn test_render_primitive_chart() {
	let tokens = ColorTokens::default();
	let mut series = test_series();
	series.int8.clear();
	let html = render_chart(
		ChartBackend::Primitive,
		RenderChartOptions {
			chart: ChartId::Latency,
			series: &series,
			tokens: &tokens,
			width: 800.0,
			height: 400.0,
		},
	)
	.to_string();
	assert_eq!(html.matches(r#"class="grid-line""#).count(), 18);
	assert_eq!(html.matches("<polygon").count(), 3);
	assert_eq!(html.matches("<rect").count(), 1);
	assert!(html.contains(">FP32</text>"));
	assert!(html.contains(">INT8</text>"));
	assert!(html.contains(r#"transform="rotate(-90, 35, 200)""#));
	assert!(html.contains(">Latency (ms)</text>"));
}

#[test]
fn test_backends_draw_the_same_legend() {
	let tokens = ColorTokens::default();
	let mut series = test_series();
	series.int8.clear();
	for backend in [ChartBackend::Vector, ChartBackend::Primitive].iter() {
		let html = render_chart(
			*backend,
			RenderChartOptions {
				chart: ChartId::Memory,
				series: &series,
				tokens: &tokens,
				width: 800.0,
				height: 400.0,
			},
		)
		.to_string();
		assert_eq!(html.matches(">FP32</text>").count(), 1);
		assert_eq!(html.matches(">INT8</text>").count(), 1);
	}
}

#[test]
fn test_backend_keys() {
	for backend in &[ChartBackend::Vector, ChartBackend::Primitive] {
		assert_eq!(ChartBackend::from_key(backend.key()), Some(*backend));
	}
	assert_eq!(ChartBackend::from_key("canvas"), None);
}
