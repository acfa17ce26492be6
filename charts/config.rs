use std::collections::HashMap;

pub struct ChartConfig {
	pub axis_title_font_size: f64,
	pub default_height: f64,
	pub default_width: f64,
	pub domain_padding: f64,
	pub grid_line_count: usize,
	pub legend_entry_gap: f64,
	pub legend_offset: f64,
	pub margin_bottom: f64,
	pub margin_left: f64,
	pub margin_right: f64,
	pub margin_top: f64,
	pub square_area: f64,
	pub square_size: f64,
	pub tick_count: usize,
	pub tick_font_size: f64,
	pub tick_size: f64,
	pub triangle_area: f64,
	pub triangle_radius: f64,
}

pub const CHART_CONFIG: ChartConfig = ChartConfig {
	axis_title_font_size: 12.0,
	default_height: 400.0,
	default_width: 800.0,
	domain_padding: 0.1,
	grid_line_count: 8,
	legend_entry_gap: 20.0,
	legend_offset: 100.0,
	margin_bottom: 50.0,
	margin_left: 70.0,
	margin_right: 20.0,
	margin_top: 20.0,
	square_area: 50.0,
	square_size: 5.0,
	tick_count: 8,
	tick_font_size: 11.0,
	tick_size: 6.0,
	triangle_area: 60.0,
	triangle_radius: 6.0,
};

/// Colors assigned to runs in the order they are first seen.
pub const PALETTE: [&str; 20] = [
	"#1f77b4", "#ff7f0e", "#2ca02c", "#d62728", "#9467bd", "#8c564b", "#e377c2", "#7f7f7f",
	"#bcbd22", "#17becf", "#aec7e8", "#ffbb78", "#98df8a", "#ff9896", "#c5b0d5", "#c49c94",
	"#f7b6d3", "#c7c7c7", "#dbdb8d", "#9edae5",
];

pub const FP32_LEGEND_COLOR: &str = "#4285f4";
pub const INT8_LEGEND_COLOR: &str = "#ea4335";

/**
A `RunColors` maps each run to a palette color. A run keeps its color for as long as the order in which runs were first assigned does not change, and assigning a run twice is a no-op.
*/
#[derive(Clone, Debug, Default)]
pub struct RunColors {
	colors: HashMap<String, &'static str>,
}

impl RunColors {
	pub fn new<'a>(runs: impl IntoIterator<Item = &'a str>) -> RunColors {
		let mut colors = RunColors::default();
		for run in runs {
			colors.assign(run);
		}
		colors
	}

	pub fn assign(&mut self, run: &str) -> &'static str {
		let next = PALETTE[self.colors.len() % PALETTE.len()];
		*self.colors.entry(run.to_owned()).or_insert(next)
	}

	pub fn get(&self, run: &str) -> &'static str {
		self.colors.get(run).copied().unwrap_or(PALETTE[0])
	}

	pub fn len(&self) -> usize {
		self.colors.len()
	}

	pub fn is_empty(&self) -> bool {
		self.colors.is_empty()
	}
}

#[test]
fn test_run_colors_are_stable() {
	let mut colors = RunColors::new(vec!["alexnet", "resnet18", "alexnet"]);
	assert_eq!(colors.len(), 2);
	assert_eq!(colors.get("alexnet"), "#1f77b4");
	assert_eq!(colors.get("resnet18"), "#ff7f0e");
	assert_eq!(colors.assign("alexnet"), "#1f77b4");
	assert_eq!(colors.assign("vgg16"), "#2ca02c");
}

#[test]
fn test_run_colors_wrap_around_palette() {
	let names: Vec<String> = (0..21).map(|i| format!("run{}", i)).collect();
	let colors = RunColors::new(names.iter().map(|name| name.as_str()));
	assert_eq!(colors.get("run20"), PALETTE[0]);
	assert_eq!(colors.get("run19"), PALETTE[19]);
}
