use crate::config::CHART_CONFIG;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Point {
	pub x: f64,
	pub y: f64,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ChartBox {
	pub h: f64,
	pub w: f64,
	pub x: f64,
	pub y: f64,
}

impl ChartBox {
	/// The plot area of a chart of the given size, inside the configured margins.
	pub fn plot_area(width: f64, height: f64) -> ChartBox {
		ChartBox {
			h: (height - CHART_CONFIG.margin_top - CHART_CONFIG.margin_bottom).max(0.0),
			w: (width - CHART_CONFIG.margin_left - CHART_CONFIG.margin_right).max(0.0),
			x: CHART_CONFIG.margin_left,
			y: CHART_CONFIG.margin_top,
		}
	}
}

// The interval is k * 10 ** p. k will always be 1, 2, or 5.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GridLineInterval {
	pub k: usize,
	pub p: i32,
}

impl GridLineInterval {
	pub fn value(&self) -> f64 {
		self.k as f64 * 10f64.powi(self.p)
	}

	/// The number of decimals needed to tell adjacent ticks apart.
	pub fn decimals(&self) -> usize {
		(-self.p).max(0) as usize
	}
}

/**
Choose the interval between about `count` ticks spanning `min` to `max`. The raw step is rounded to 1, 2, 5 or 10 times a power of ten, picking the multiple whose ratio to the raw step is closest on a log scale.
*/
pub fn compute_grid_line_interval(min: f64, max: f64, count: usize) -> Option<GridLineInterval> {
	if count == 0 || !min.is_finite() || !max.is_finite() || max <= min {
		return None;
	}
	let step = (max - min) / count as f64;
	let p = step.log10().floor();
	let error = step / 10f64.powf(p);
	let p = p as i32;
	let interval = if error >= 50f64.sqrt() {
		GridLineInterval { k: 1, p: p + 1 }
	} else if error >= 10f64.sqrt() {
		GridLineInterval { k: 5, p }
	} else if error >= 2f64.sqrt() {
		GridLineInterval { k: 2, p }
	} else {
		GridLineInterval { k: 1, p }
	};
	Some(interval)
}

/// The multiples of `interval` between `min` and `max` inclusive.
pub fn compute_ticks(min: f64, max: f64, interval: GridLineInterval) -> Vec<f64> {
	// Negative powers divide by an integer so that 0.1 * 3 comes out as 0.3.
	if interval.p >= 0 {
		let step = interval.value();
		let start = (min / step).ceil() as i64;
		let end = (max / step).floor() as i64;
		(start..=end).map(|i| i as f64 * step).collect()
	} else {
		let inverse = 10f64.powi(-interval.p) / interval.k as f64;
		let start = (min * inverse).ceil() as i64;
		let end = (max * inverse).floor() as i64;
		(start..=end).map(|i| i as f64 / inverse).collect()
	}
}

pub fn format_tick(value: f64, interval: GridLineInterval) -> String {
	format!("{:.*}", interval.decimals(), value)
}

/// Maps a domain linearly onto a pixel range. The range may be inverted, as it is for a y axis.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LinearScale {
	pub domain: (f64, f64),
	pub range: (f64, f64),
}

impl LinearScale {
	pub fn new(domain: (f64, f64), range: (f64, f64)) -> LinearScale {
		LinearScale { domain, range }
	}

	pub fn apply(&self, value: f64) -> f64 {
		let (d0, d1) = self.domain;
		let (r0, r1) = self.range;
		if d1 == d0 {
			return (r0 + r1) / 2.0;
		}
		r0 + (value - d0) / (d1 - d0) * (r1 - r0)
	}

	pub fn ticks(&self, count: usize) -> (Option<GridLineInterval>, Vec<f64>) {
		let (min, max) = self.domain;
		match compute_grid_line_interval(min, max, count) {
			Some(interval) => (Some(interval), compute_ticks(min, max, interval)),
			None => (None, vec![min]),
		}
	}
}

#[test]
fn test_compute_grid_line_interval() {
	assert_eq!(
		compute_grid_line_interval(0.0, 1.0, 8),
		Some(GridLineInterval { k: 1, p: -1 })
	);
	assert_eq!(
		compute_grid_line_interval(0.5, 0.95, 8),
		Some(GridLineInterval { k: 5, p: -2 })
	);
	assert_eq!(
		compute_grid_line_interval(0.0, 250.0, 8),
		Some(GridLineInterval { k: 2, p: 1 })
	);
	assert_eq!(
		compute_grid_line_interval(0.0, 700.0, 8),
		Some(GridLineInterval { k: 1, p: 2 })
	);
	assert_eq!(compute_grid_line_interval(1.0, 1.0, 8), None);
}

#[test]
fn test_compute_ticks() {
	let ticks = compute_ticks(0.5, 0.95, GridLineInterval { k: 5, p: -2 });
	assert_eq!(
		ticks,
		vec![0.5, 0.55, 0.6, 0.65, 0.7, 0.75, 0.8, 0.85, 0.9, 0.95]
	);
	let ticks = compute_ticks(3.0, 250.0, GridLineInterval { k: 2, p: 1 });
	assert_eq!(ticks.first(), Some(&20.0));
	assert_eq!(ticks.last(), Some(&240.0));
	assert_eq!(ticks.len(), 12);
}

#[test]
fn test_format_tick() {
	assert_eq!(format_tick(0.55, GridLineInterval { k: 5, p: -2 }), "0.55");
	assert_eq!(format_tick(0.3, GridLineInterval { k: 1, p: -1 }), "0.3");
	assert_eq!(format_tick(240.0, GridLineInterval { k: 2, p: 1 }), "240");
}

#[test]
fn test_linear_scale() {
	let scale = LinearScale::new((0.0, 10.0), (300.0, 0.0));
	assert_eq!(scale.apply(0.0), 300.0);
	assert_eq!(scale.apply(10.0), 0.0);
	assert_eq!(scale.apply(5.0), 150.0);
	let scale = LinearScale::new((2.0, 2.0), (0.0, 100.0));
	assert_eq!(scale.apply(2.0), 50.0);
}
