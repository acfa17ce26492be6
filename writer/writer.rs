use crate::sink::{EventLogWriter, EventSink};
use compression_board_scalars::{wall_time_now, Event, EventPayload, Precision, Tag};
use compression_board_util::error::Result;
use serde::Deserialize;
use std::{collections::BTreeMap, path::Path};

/**
The measurements of one precision of a model, keyed by the names a benchmark uses, such as `accuracy`, `latency_mean_ms`, `model_size_mb` or `energy_consumption_mw`.
*/
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PrecisionMetrics {
	values: BTreeMap<String, f64>,
	pub evaluated_on: Option<String>,
}

impl PrecisionMetrics {
	pub fn new() -> PrecisionMetrics {
		PrecisionMetrics::default()
	}

	pub fn with(mut self, key: &str, value: f64) -> PrecisionMetrics {
		self.values.insert(key.to_owned(), value);
		self
	}

	pub fn get(&self, key: &str) -> Option<f64> {
		self.values.get(key).copied()
	}

	pub fn is_empty(&self) -> bool {
		self.values.is_empty() && self.evaluated_on.is_none()
	}

	/// Read the numeric entries of a JSON object. Entries that are not numbers are ignored, except `evaluated_on`.
	pub fn from_json(object: &serde_json::Map<String, serde_json::Value>) -> PrecisionMetrics {
		let mut metrics = PrecisionMetrics::new();
		for (key, value) in object.iter() {
			match value {
				serde_json::Value::Number(number) => {
					if let Some(number) = number.as_f64() {
						metrics.values.insert(key.clone(), number);
					}
				}
				serde_json::Value::String(string) if key == "evaluated_on" => {
					metrics.evaluated_on = Some(string.clone());
				}
				_ => {}
			}
		}
		metrics
	}
}

/// Free-form metadata about a model.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct ModelInfo {
	pub library: Option<String>,
	pub category: Option<String>,
	pub description: Option<String>,
	pub input_shape: Option<Vec<u64>>,
}

/**
A `CompressionWriter` records FP32 and INT8 comparisons for models. Every value is written under a fully qualified [`Tag`] with an explicit step.
*/
pub struct CompressionWriter<S = EventLogWriter>
where
	S: EventSink,
{
	sink: S,
}

impl CompressionWriter<EventLogWriter> {
	/// Create a writer appending to the event log in `logdir`.
	pub fn create(logdir: &Path) -> Result<CompressionWriter<EventLogWriter>> {
		Ok(CompressionWriter::new(EventLogWriter::open(logdir)?))
	}
}

impl<S> CompressionWriter<S>
where
	S: EventSink,
{
	pub fn new(sink: S) -> CompressionWriter<S> {
		CompressionWriter { sink }
	}

	pub fn sink(&self) -> &S {
		&self.sink
	}

	/// Write one scalar. Values that are not finite are dropped.
	pub fn add_scalar(&mut self, tag: &Tag, value: f64, step: i64) -> Result<()> {
		if !value.is_finite() {
			tracing::warn!(tag = %tag, value, "dropping value that is not finite");
			return Ok(());
		}
		self.sink.write(Event {
			tag: tag.to_string(),
			step,
			wall_time: wall_time_now(),
			payload: EventPayload::Scalar { value },
		})
	}

	pub fn add_text(&mut self, tag: &Tag, text: &str, step: i64) -> Result<()> {
		self.sink.write(Event {
			tag: tag.to_string(),
			step,
			wall_time: wall_time_now(),
			payload: EventPayload::Text {
				text: text.to_owned(),
			},
		})
	}

	fn add_pair(&mut self, model: &str, category: &str, metric: &str, fp32: f64, int8: f64, step: i64) -> Result<()> {
		let tag = Tag::new(model, category, metric);
		self.add_scalar(&tag.clone().with_precision(Precision::Fp32), fp32, step)?;
		self.add_scalar(&tag.with_precision(Precision::Int8), int8, step)?;
		Ok(())
	}

	/// Write the metrics both precisions carry, side by side.
	pub fn log_compression_comparison(
		&mut self,
		model: &str,
		fp32: &PrecisionMetrics,
		int8: &PrecisionMetrics,
		step: i64,
	) -> Result<()> {
		let pairs = [
			("accuracy", "metrics", "accuracy"),
			("f1_score", "metrics", "f1_score"),
			("latency_mean_ms", "performance", "latency_ms"),
			("model_size_mb", "performance", "model_size_mb"),
			("memory_usage_mb", "performance", "memory_usage_mb"),
			("loss", "metrics", "loss"),
		];
		for (key, category, metric) in pairs.iter() {
			if let (Some(fp32), Some(int8)) = (fp32.get(key), int8.get(key)) {
				self.add_pair(model, category, metric, fp32, int8, step)?;
			}
		}
		Ok(())
	}

	/// Write the ratios and differences derived from the two precisions.
	pub fn log_compression_ratios(
		&mut self,
		model: &str,
		fp32: &PrecisionMetrics,
		int8: &PrecisionMetrics,
		step: i64,
	) -> Result<()> {
		let tag = |metric: &str| Tag::new(model, "compression", metric);
		if let (Some(fp32_size), Some(int8_size)) = (fp32.get("model_size_mb"), int8.get("model_size_mb")) {
			if int8_size > 0.0 {
				self.add_scalar(&tag("size_ratio"), fp32_size / int8_size, step)?;
				let size_reduction_pct = (fp32_size - int8_size) / fp32_size * 100.0;
				self.add_scalar(&tag("size_reduction_pct"), size_reduction_pct, step)?;
			}
		}
		if let (Some(fp32_latency), Some(int8_latency)) =
			(fp32.get("latency_mean_ms"), int8.get("latency_mean_ms"))
		{
			if int8_latency > 0.0 {
				self.add_scalar(&tag("speedup"), fp32_latency / int8_latency, step)?;
			}
		}
		if let (Some(fp32_memory), Some(int8_memory)) =
			(fp32.get("memory_usage_mb"), int8.get("memory_usage_mb"))
		{
			self.add_scalar(&tag("memory_reduction_mb"), fp32_memory - int8_memory, step)?;
		}
		if let (Some(fp32_accuracy), Some(int8_accuracy)) = (fp32.get("accuracy"), int8.get("accuracy")) {
			self.add_scalar(&tag("accuracy_drop"), fp32_accuracy - int8_accuracy, step)?;
			if fp32_accuracy > 0.0 {
				let retention = int8_accuracy / fp32_accuracy * 100.0;
				self.add_scalar(&tag("accuracy_retention_pct"), retention, step)?;
			}
		}
		Ok(())
	}

	pub fn log_energy_comparison(
		&mut self,
		model: &str,
		fp32: &PrecisionMetrics,
		int8: &PrecisionMetrics,
		step: i64,
	) -> Result<()> {
		let (fp32_energy, int8_energy) = match (
			fp32.get("energy_consumption_mw"),
			int8.get("energy_consumption_mw"),
		) {
			(Some(fp32_energy), Some(int8_energy)) => (fp32_energy, int8_energy),
			_ => return Ok(()),
		};
		self.add_pair(model, "performance", "energy_mw", fp32_energy, int8_energy, step)?;
		let tag = |metric: &str| Tag::new(model, "compression", metric);
		self.add_scalar(&tag("energy_reduction_mw"), fp32_energy - int8_energy, step)?;
		if int8_energy > 0.0 {
			self.add_scalar(&tag("energy_ratio"), fp32_energy / int8_energy, step)?;
		}
		Ok(())
	}

	/// Write a text summary of the model and its input dimensions.
	pub fn log_model_metadata(&mut self, model: &str, info: &ModelInfo, step: i64) -> Result<()> {
		let mut text = format!("Model: {}\n", model);
		if let Some(library) = &info.library {
			text.push_str(&format!("Library: {}\n", library));
		}
		if let Some(category) = &info.category {
			text.push_str(&format!("Category: {}\n", category));
		}
		if let Some(description) = &info.description {
			text.push_str(&format!("Description: {}\n", description));
		}
		if let Some(input_shape) = &info.input_shape {
			let dimensions: Vec<String> = input_shape.iter().map(|d| d.to_string()).collect();
			text.push_str(&format!("Input Shape: [{}]\n", dimensions.join(", ")));
			let names = ["input_channels", "input_height", "input_width"];
			for (name, dimension) in names.iter().zip(input_shape.iter()) {
				self.add_scalar(&Tag::new(model, "metadata", name), *dimension as f64, step)?;
			}
		}
		self.add_text(&Tag::new(model, "metadata", "info"), &text, step)
	}

	/// Write the secondary metrics a benchmark may carry.
	pub fn log_additional_metrics(
		&mut self,
		model: &str,
		fp32: &PrecisionMetrics,
		int8: &PrecisionMetrics,
		step: i64,
	) -> Result<()> {
		let pairs = [
			("sensitivity", "metrics", "sensitivity"),
			("specificity", "metrics", "specificity"),
			("latency_std_ms", "performance", "latency_std_ms"),
		];
		for (key, category, metric) in pairs.iter() {
			if let (Some(fp32), Some(int8)) = (fp32.get(key), int8.get(key)) {
				self.add_pair(model, category, metric, fp32, int8, step)?;
			}
		}
		if let (Some(fp32_gpu), Some(int8_gpu)) =
			(fp32.get("gpu_memory_usage_mb"), int8.get("gpu_memory_usage_mb"))
		{
			if fp32_gpu > 0.0 || int8_gpu > 0.0 {
				self.add_pair(model, "performance", "gpu_memory_mb", fp32_gpu, int8_gpu, step)?;
			}
		}
		if let Some(device) = &fp32.evaluated_on {
			let device_gpu = if device == "gpu" { 1.0 } else { 0.0 };
			self.add_scalar(&Tag::new(model, "metadata", "device_gpu"), device_gpu, step)?;
		}
		Ok(())
	}

	pub fn flush(&mut self) -> Result<()> {
		self.sink.flush()
	}

	pub fn close(mut self) -> Result<()> {
		self.flush()
	}
}

#[cfg(test)]
fn scalar_values(store: &compression_board_scalars::ScalarStore, run: &str) -> Vec<(String, f64)> {
	use compression_board_scalars::latest_value;
	store
		.run(run)
		.map(|data| {
			data.scalars
				.iter()
				.filter_map(|(tag, events)| Some((tag.clone(), latest_value(events)?)))
				.collect()
		})
		.unwrap_or_default()
}

#[cfg(test)]
fn resnet_metrics() -> (PrecisionMetrics, PrecisionMetrics) {
	let fp32 = PrecisionMetrics::new()
		.with("accuracy", 0.8)
		.with("latency_mean_ms", 20.0)
		.with("model_size_mb", 40.0)
		.with("memory_usage_mb", 300.0)
		.with("energy_consumption_mw", 500.0)
		.with("f1_score", 0.75);
	let int8 = PrecisionMetrics::new()
		.with("accuracy", 0.6)
		.with("latency_mean_ms", 0.0)
		.with("model_size_mb", 10.0)
		.with("memory_usage_mb", 100.0)
		.with("energy_consumption_mw", 250.0);
	(fp32, int8)
}

#[test]
fn test_log_compression_comparison_and_ratios() {
	let mut store = compression_board_scalars::ScalarStore::new();
	let (fp32, int8) = resnet_metrics();
	let mut writer = CompressionWriter::new(crate::StoreSink::new(&mut store, "resnet18"));
	writer.log_compression_comparison("resnet18", &fp32, &int8, 0).unwrap();
	writer.log_compression_ratios("resnet18", &fp32, &int8, 0).unwrap();
	writer.log_energy_comparison("resnet18", &fp32, &int8, 0).unwrap();
	writer.close().unwrap();
	let values = scalar_values(&store, "resnet18");
	let lines: Vec<String> = values
		.iter()
		.map(|(tag, value)| format!("{} {}", tag, value))
		.collect();
	insta::assert_snapshot!(lines.join("\n"), @r###"
	resnet18/compression/accuracy_drop 0.20000000000000007
	resnet18/compression/accuracy_retention_pct 74.99999999999999
	resnet18/compression/energy_ratio 2
	resnet18/compression/energy_reduction_mw 250
	resnet18/compression/memory_reduction_mb 200
	resnet18/compression/size_ratio 4
	resnet18/compression/size_reduction_pct 75
	resnet18/metrics/accuracy/fp32 0.8
	resnet18/metrics/accuracy/int8 0.6
	resnet18/performance/energy_mw/fp32 500
	resnet18/performance/energy_mw/int8 250
	resnet18/performance/latency_ms/fp32 20
	resnet18/performance/latency_ms/int8 0
	resnet18/performance/memory_usage_mb/fp32 300
	resnet18/performance/memory_usage_mb/int8 100
	resnet18/performance/model_size_mb/fp32 40
	resnet18/performance/model_size_mb/int8 10
	"###);
}

#[test]
fn test_log_model_metadata_and_additional_metrics() {
	let mut store = compression_board_scalars::ScalarStore::new();
	let info = ModelInfo {
		library: Some("torchvision".to_owned()),
		category: Some("classification".to_owned()),
		description: None,
		input_shape: Some(vec![3, 224, 224]),
	};
	let mut fp32 = PrecisionMetrics::new()
		.with("sensitivity", 0.9)
		.with("gpu_memory_usage_mb", 0.0);
	fp32.evaluated_on = Some("gpu".to_owned());
	let int8 = PrecisionMetrics::new()
		.with("sensitivity", 0.85)
		.with("gpu_memory_usage_mb", 0.0);
	let mut writer = CompressionWriter::new(crate::StoreSink::new(&mut store, "alexnet"));
	writer.log_model_metadata("alexnet", &info, 0).unwrap();
	writer.log_additional_metrics("alexnet", &fp32, &int8, 0).unwrap();
	let values = scalar_values(&store, "alexnet");
	let tags: Vec<&str> = values.iter().map(|(tag, _)| tag.as_str()).collect();
	assert_eq!(
		tags,
		vec![
			"alexnet/metadata/device_gpu",
			"alexnet/metadata/input_channels",
			"alexnet/metadata/input_height",
			"alexnet/metadata/input_width",
			"alexnet/metrics/sensitivity/fp32",
			"alexnet/metrics/sensitivity/int8",
		]
	);
	let text = &store.run("alexnet").unwrap().texts["alexnet/metadata/info"][0].text;
	insta::assert_snapshot!(text, @r###"
	Model: alexnet
	Library: torchvision
	Category: classification
	Input Shape: [3, 224, 224]
	"###);
}

#[test]
fn test_non_finite_values_are_dropped() {
	let mut store = compression_board_scalars::ScalarStore::new();
	let mut writer = CompressionWriter::new(crate::StoreSink::new(&mut store, "vgg"));
	writer
		.add_scalar(&Tag::new("vgg", "compression", "speedup"), f64::NAN, 0)
		.unwrap();
	assert!(store.is_empty());
}

#[test]
fn test_event_log_writer_appends_lines() {
	let logdir = tempfile::tempdir().unwrap();
	let run_dir = logdir.path().join("alexnet");
	let mut writer = CompressionWriter::create(&run_dir).unwrap();
	writer
		.add_scalar(&Tag::new("alexnet", "compression", "speedup"), 2.0, 0)
		.unwrap();
	writer.close().unwrap();
	let mut writer = CompressionWriter::create(&run_dir).unwrap();
	writer
		.add_scalar(&Tag::new("alexnet", "compression", "speedup"), 3.0, 1)
		.unwrap();
	writer.close().unwrap();
	let store = compression_board_scalars::ScalarStore::load(logdir.path()).unwrap();
	assert_eq!(
		scalar_values(&store, "alexnet"),
		vec![("alexnet/compression/speedup".to_owned(), 3.0)]
	);
}
