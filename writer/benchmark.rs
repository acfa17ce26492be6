use crate::writer::{CompressionWriter, ModelInfo, PrecisionMetrics};
use compression_board_util::error::Result;
use std::path::{Component, Path, PathBuf};

/// What an import wrote.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ImportReport {
	pub logdir: PathBuf,
	pub imported: Vec<String>,
	pub skipped: Vec<String>,
}

/**
Converts benchmark results into event logs. A benchmark is a JSON object mapping each model name to `{"fp32": {...}, "int8": {...}, "model_info": {...}}`. Each model gets its own run directory under the base log directory.
*/
pub struct BenchmarkParser {
	step: i64,
}

impl BenchmarkParser {
	pub fn new(step: i64) -> BenchmarkParser {
		BenchmarkParser { step }
	}

	/// The log directory used when none is given: `runs/compression_benchmark/{file stem}`.
	pub fn default_logdir(json_path: &Path) -> PathBuf {
		let stem = json_path
			.file_stem()
			.map(|stem| stem.to_string_lossy().into_owned())
			.unwrap_or_else(|| "benchmark".to_owned());
		Path::new("runs").join("compression_benchmark").join(stem)
	}

	pub fn import_file(&self, json_path: &Path, logdir: Option<&Path>) -> Result<ImportReport> {
		let contents = std::fs::read_to_string(json_path).map_err(|error| {
			compression_board_util::err!("failed to read {}: {}", json_path.display(), error)
		})?;
		let benchmark: serde_json::Value = serde_json::from_str(&contents)
			.map_err(|error| compression_board_util::err!("invalid JSON in {}: {}", json_path.display(), error))?;
		let logdir = match logdir {
			Some(logdir) => logdir.to_owned(),
			None => BenchmarkParser::default_logdir(json_path),
		};
		self.import(&benchmark, &logdir)
	}

	pub fn import(&self, benchmark: &serde_json::Value, logdir: &Path) -> Result<ImportReport> {
		let models = benchmark
			.as_object()
			.ok_or_else(|| compression_board_util::err!("expected the benchmark to be a JSON object"))?;
		let mut report = ImportReport {
			logdir: logdir.to_owned(),
			..Default::default()
		};
		for (model, entry) in models.iter() {
			if !is_run_name(model) {
				tracing::warn!(model = model.as_str(), "skipping model whose name leaves the log directory");
				report.skipped.push(model.clone());
				continue;
			}
			let entry = match entry.as_object() {
				Some(entry) => entry,
				None => {
					tracing::warn!(model = model.as_str(), "skipping entry that is not an object");
					report.skipped.push(model.clone());
					continue;
				}
			};
			let precision = |key: &str| {
				entry
					.get(key)
					.and_then(|value| value.as_object())
					.map(PrecisionMetrics::from_json)
					.unwrap_or_default()
			};
			let fp32 = precision("fp32");
			let int8 = precision("int8");
			if fp32.is_empty() || int8.is_empty() {
				tracing::warn!(model = model.as_str(), "skipping model without both fp32 and int8 results");
				report.skipped.push(model.clone());
				continue;
			}
			let model_info: Option<ModelInfo> = match entry.get("model_info") {
				Some(value) => match serde_json::from_value(value.clone()) {
					Ok(model_info) => Some(model_info),
					Err(error) => {
						tracing::warn!(model = model.as_str(), %error, "ignoring unreadable model_info");
						None
					}
				},
				None => None,
			};
			let mut writer = CompressionWriter::create(&logdir.join(model))?;
			writer.log_compression_comparison(model, &fp32, &int8, self.step)?;
			writer.log_compression_ratios(model, &fp32, &int8, self.step)?;
			writer.log_energy_comparison(model, &fp32, &int8, self.step)?;
			if let Some(model_info) = &model_info {
				writer.log_model_metadata(model, model_info, self.step)?;
			}
			writer.log_additional_metrics(model, &fp32, &int8, self.step)?;
			writer.close()?;
			tracing::info!(model = model.as_str(), "imported model");
			report.imported.push(model.clone());
		}
		Ok(report)
	}
}

/// A model name becomes a run directory, so it may only consist of plain path segments.
fn is_run_name(model: &str) -> bool {
	let path = Path::new(model);
	path.components().next().is_some()
		&& path
			.components()
			.all(|component| matches!(component, Component::Normal(_)))
}

#[test]
fn test_import_benchmark() {
	let logdir = tempfile::tempdir().unwrap();
	let benchmark = serde_json::json!({
		"resnet18": {
			"fp32": {"accuracy": 0.7, "model_size_mb": 44.7, "latency_mean_ms": 12.0, "evaluated_on": "cpu"},
			"int8": {"accuracy": 0.69, "model_size_mb": 11.3, "latency_mean_ms": 6.0},
			"model_info": {"library": "torchvision", "input_shape": [3, 224, 224]}
		},
		"alexnet": {
			"fp32": {"accuracy": 0.56},
			"int8": {}
		},
		"metadata": "generated by a benchmark run"
	});
	let report = BenchmarkParser::new(0)
		.import(&benchmark, logdir.path())
		.unwrap();
	assert_eq!(report.imported, vec!["resnet18".to_owned()]);
	assert_eq!(report.skipped, vec!["alexnet".to_owned(), "metadata".to_owned()]);
	let store = compression_board_scalars::ScalarStore::load(logdir.path()).unwrap();
	assert_eq!(store.run_names().collect::<Vec<_>>(), vec!["resnet18"]);
	let records = compression_board_scalars::summarize(
		&compression_board_scalars::ProviderSource::new(&store),
	)
	.unwrap();
	assert_eq!(records.len(), 1);
	assert_eq!(records[0].run, "resnet18");
	assert_eq!(records[0].speedup, Some(2.0));
	assert_eq!(records[0].model_size_int8, Some(11.3));
	assert_eq!(records[0].accuracy_fp32, Some(0.7));
}

#[test]
fn test_default_logdir() {
	assert_eq!(
		BenchmarkParser::default_logdir(Path::new("results/models_benchmark_results.json")),
		Path::new("runs/compression_benchmark/models_benchmark_results")
	);
}

#[test]
fn test_import_rejects_non_object() {
	let logdir = tempfile::tempdir().unwrap();
	let result = BenchmarkParser::new(0).import(&serde_json::json!([1, 2]), logdir.path());
	assert!(result.is_err());
}

#[test]
fn test_import_skips_models_outside_logdir() {
	let base = tempfile::tempdir().unwrap();
	let logdir = base.path().join("logs");
	let results = serde_json::json!({
		"fp32": {"accuracy": 0.7, "model_size_mb": 40.0},
		"int8": {"accuracy": 0.69, "model_size_mb": 10.0}
	});
	let benchmark = serde_json::json!({
		"../escaped": results.clone(),
		"/absolute": results.clone(),
		"": results.clone(),
		"bench/vgg": results,
	});
	let report = BenchmarkParser::new(0).import(&benchmark, &logdir).unwrap();
	assert_eq!(report.imported, vec!["bench/vgg".to_owned()]);
	assert_eq!(
		report.skipped,
		vec!["../escaped".to_owned(), "/absolute".to_owned(), "".to_owned()]
	);
	assert!(!base.path().join("escaped").exists());
	assert!(logdir.join("bench").join("vgg").join("events.jsonl").exists());
}
