/*!
This crate draws the dashboard's Pareto charts as SVG markup. Each chart plots accuracy against one cost metric, with FP32 points as triangles and INT8 points as squares colored by run. The same markup is produced on the server and in the browser, and [`ThemeProvider`](trait.ThemeProvider.html) supplies the colors it is drawn with.
*/

mod backend;
mod common;
mod config;
mod export;
mod pareto;
mod theme;
mod tooltip;

pub use self::backend::{
	render_chart, render_placeholder, square_path, triangle_path, ChartBackend, RenderChartOptions,
	EMPTY_CHART_MESSAGE,
};
pub use self::common::{
	compute_grid_line_interval, compute_ticks, format_tick, ChartBox, GridLineInterval, LinearScale,
	Point,
};
pub use self::config::{
	ChartConfig, RunColors, CHART_CONFIG, FP32_LEGEND_COLOR, INT8_LEGEND_COLOR, PALETTE,
};
pub use self::export::{export_svg, svg_file_name};
pub use self::pareto::{
	accuracy_field, build_series, compute_domain, ChartDomain, ChartId, ParetoSeries, ScatterPoint,
};
pub use self::theme::{
	css_variables, derive_tokens, restyle, ColorTokens, FixedTheme, HostStyleSample, HostStyleTheme,
	Rgb, ThemeProvider, ThemeRole,
};
pub use self::tooltip::{place_tooltip, render_tooltip, tooltip_content, TooltipContent, TooltipRow};
