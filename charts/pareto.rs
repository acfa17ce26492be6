use crate::config::{RunColors, CHART_CONFIG};
use compression_board_metrics::{DerivedRunView, Field, Precision};

/// The four Pareto charts, each plotting accuracy against one cost metric.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ChartId {
	Pareto,
	Latency,
	Memory,
	Energy,
}

impl ChartId {
	pub const ALL: [ChartId; 4] = [
		ChartId::Pareto,
		ChartId::Latency,
		ChartId::Memory,
		ChartId::Energy,
	];

	/// The id of the chart's container element.
	pub fn element_id(self) -> &'static str {
		match self {
			ChartId::Pareto => "paretoChart",
			ChartId::Latency => "latencyChart",
			ChartId::Memory => "memoryChart",
			ChartId::Energy => "energyChart",
		}
	}

	pub fn from_element_id(id: &str) -> Option<ChartId> {
		ChartId::ALL
			.iter()
			.copied()
			.find(|chart| chart.element_id() == id)
	}

	pub fn title(self) -> &'static str {
		match self {
			ChartId::Pareto => "Accuracy vs Model Size",
			ChartId::Latency => "Accuracy vs Latency",
			ChartId::Memory => "Accuracy vs Memory Usage",
			ChartId::Energy => "Accuracy vs Energy Consumption",
		}
	}

	pub fn x_axis_title(self) -> &'static str {
		match self {
			ChartId::Pareto => "Model Size (MB)",
			ChartId::Latency => "Latency (ms)",
			ChartId::Memory => "Memory Usage (MB)",
			ChartId::Energy => "Energy (mW)",
		}
	}

	/// The name of the x metric in a tooltip.
	pub fn x_label(self) -> &'static str {
		match self {
			ChartId::Pareto => "Model Size",
			ChartId::Latency => "Latency",
			ChartId::Memory => "Memory",
			ChartId::Energy => "Energy",
		}
	}

	pub fn x_unit(self) -> &'static str {
		match self {
			ChartId::Pareto | ChartId::Memory => "MB",
			ChartId::Latency => "ms",
			ChartId::Energy => "mW",
		}
	}

	pub fn x_field(self, precision: Precision) -> Field {
		match (self, precision) {
			(ChartId::Pareto, Precision::Fp32) => Field::ModelSizeFp32,
			(ChartId::Pareto, Precision::Int8) => Field::ModelSizeInt8,
			(ChartId::Latency, Precision::Fp32) => Field::LatencyFp32,
			(ChartId::Latency, Precision::Int8) => Field::LatencyInt8,
			(ChartId::Memory, Precision::Fp32) => Field::MemoryFp32,
			(ChartId::Memory, Precision::Int8) => Field::MemoryInt8,
			(ChartId::Energy, Precision::Fp32) => Field::EnergyFp32,
			(ChartId::Energy, Precision::Int8) => Field::EnergyInt8,
		}
	}
}

pub fn accuracy_field(precision: Precision) -> Field {
	match precision {
		Precision::Fp32 => Field::AccuracyFp32,
		Precision::Int8 => Field::AccuracyInt8,
	}
}

#[derive(Clone, Debug, PartialEq)]
pub struct ScatterPoint {
	pub run: String,
	pub precision: Precision,
	pub color: &'static str,
	pub x: f64,
	pub y: f64,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ParetoSeries {
	pub fp32: Vec<ScatterPoint>,
	pub int8: Vec<ScatterPoint>,
}

impl ParetoSeries {
	pub fn get(&self, precision: Precision) -> &[ScatterPoint] {
		match precision {
			Precision::Fp32 => &self.fp32,
			Precision::Int8 => &self.int8,
		}
	}

	pub fn is_empty(&self) -> bool {
		self.fp32.is_empty() && self.int8.is_empty()
	}

	pub fn points(&self) -> impl Iterator<Item = &ScatterPoint> {
		self.fp32.iter().chain(self.int8.iter())
	}
}

/// A run adds a point to a series only when both its x value and its accuracy for that precision are present.
pub fn build_series(chart: ChartId, views: &[DerivedRunView], colors: &RunColors) -> ParetoSeries {
	let mut series = ParetoSeries::default();
	for view in views {
		for precision in Precision::ALL.iter().copied() {
			let x = chart.x_field(precision).value(view);
			let y = accuracy_field(precision).value(view);
			let (x, y) = match (x, y) {
				(Some(x), Some(y)) => (x, y),
				_ => continue,
			};
			let point = ScatterPoint {
				run: view.run().to_owned(),
				precision,
				color: colors.get(view.run()),
				x,
				y,
			};
			match precision {
				Precision::Fp32 => series.fp32.push(point),
				Precision::Int8 => series.int8.push(point),
			}
		}
	}
	series
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ChartDomain {
	pub x_min: f64,
	pub x_max: f64,
	pub y_min: f64,
	pub y_max: f64,
}

/**
The observed extent of both series, padded by a tenth of its range on each side. A zero range pads by a tenth of one unit. The x axis never starts below zero, and the accuracy axis stays within zero and one.
*/
pub fn compute_domain(series: &ParetoSeries) -> Option<ChartDomain> {
	let mut points = series.points();
	let first = points.next()?;
	let (mut x_min, mut x_max, mut y_min, mut y_max) = (first.x, first.x, first.y, first.y);
	for point in points {
		x_min = x_min.min(point.x);
		x_max = x_max.max(point.x);
		y_min = y_min.min(point.y);
		y_max = y_max.max(point.y);
	}
	let padding = |min: f64, max: f64| {
		let range = max - min;
		let range = if range == 0.0 { 1.0 } else { range };
		range * CHART_CONFIG.domain_padding
	};
	let x_padding = padding(x_min, x_max);
	let y_padding = padding(y_min, y_max);
	let mut domain = ChartDomain {
		x_min: (x_min - x_padding).max(0.0),
		x_max: x_max + x_padding,
		y_min: (y_min - y_padding).max(0.0),
		y_max: (y_max + y_padding).min(1.0),
	};
	// Accuracies outside of [0, 1] would otherwise produce an empty or inverted axis.
	if domain.x_max <= domain.x_min {
		domain.x_max = domain.x_min + 1.0;
	}
	if domain.y_max <= domain.y_min {
		domain.y_max = domain.y_min + 1.0;
	}
	Some(domain)
}

#[cfg(test)]
fn view(run: &str, fields: &[(Field, f64)]) -> DerivedRunView {
	let mut record = compression_board_metrics::RunMetricRecord::new(run);
	for (field, value) in fields {
		let slot = match field {
			Field::AccuracyFp32 => &mut record.accuracy_fp32,
			Field::AccuracyInt8 => &mut record.accuracy_int8,
			Field::ModelSizeFp32 => &mut record.model_size_fp32,
			Field::ModelSizeInt8 => &mut record.model_size_int8,
			Field::LatencyFp32 => &mut record.latency_fp32,
			Field::LatencyInt8 => &mut record.latency_int8,
			_ => unreachable!(),
		};
		*slot = Some(*value);
	}
	compression_board_metrics::derive_ratios(&record)
}

#[test]
fn test_build_series_omits_incomplete_points() {
	let views = vec![
		view(
			"alexnet",
			&[
				(Field::AccuracyFp32, 0.56),
				(Field::AccuracyInt8, 0.55),
				(Field::ModelSizeFp32, 233.0),
				(Field::ModelSizeInt8, 58.0),
			],
		),
		view(
			"resnet18",
			&[
				(Field::AccuracyFp32, 0.7),
				(Field::ModelSizeFp32, 44.7),
				(Field::ModelSizeInt8, 11.3),
			],
		),
	];
	let colors = RunColors::new(views.iter().map(|view| view.run()));
	let series = build_series(ChartId::Pareto, &views, &colors);
	assert_eq!(series.fp32.len(), 2);
	assert_eq!(series.int8.len(), 1);
	assert_eq!(series.int8[0].run, "alexnet");
	assert_eq!(series.fp32[1].color, "#ff7f0e");
	assert_eq!(series.fp32[1].x, 44.7);
	let series = build_series(ChartId::Latency, &views, &colors);
	assert!(series.is_empty());
	assert_eq!(compute_domain(&series), None);
}

#[test]
fn test_compute_domain() {
	let point = |x, y| ScatterPoint {
		run: "alexnet".to_owned(),
		precision: Precision::Fp32,
		color: "#1f77b4",
		x,
		y,
	};
	let series = ParetoSeries {
		fp32: vec![point(10.0, 0.5)],
		int8: vec![point(110.0, 0.9)],
	};
	let domain = compute_domain(&series).unwrap();
	assert_eq!(domain.x_min, 0.0);
	assert_eq!(domain.x_max, 120.0);
	assert!((domain.y_min - 0.46).abs() < 1e-9);
	assert!((domain.y_max - 0.94).abs() < 1e-9);
	let series = ParetoSeries {
		fp32: vec![point(5.0, 0.99)],
		int8: vec![],
	};
	let domain = compute_domain(&series).unwrap();
	assert_eq!(domain.x_min, 4.9);
	assert_eq!(domain.x_max, 5.1);
	assert_eq!(domain.y_min, 0.89);
	assert_eq!(domain.y_max, 1.0);
}

#[test]
fn test_chart_ids() {
	assert_eq!(ChartId::from_element_id("memoryChart"), Some(ChartId::Memory));
	assert_eq!(ChartId::Energy.x_field(Precision::Int8), Field::EnergyInt8);
	assert_eq!(ChartId::Pareto.title(), "Accuracy vs Model Size");
}
