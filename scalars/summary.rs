use crate::{
	source::{HostEnvironment, MetricSource, RunScalars},
	tag::Tag,
};
use compression_board_metrics::{Precision, RunMetricRecord, SummaryResponse};
use compression_board_util::error::Result;
use std::collections::BTreeMap;

const LATENCY: &[&str] = &["performance/latency_ms", "performance/latency"];
const MEMORY: &[&str] = &["performance/memory_usage_mb", "performance/memory_usage"];
const ENERGY: &[&str] = &[
	"performance/energy_mw",
	"performance/energy_consumption_mw",
	"performance/energy",
];
const MODEL_SIZE: &[&str] = &["performance/model_size_mb"];
const ACCURACY: &[&str] = &["metrics/accuracy"];

/// The latest values of one run's tags, keyed by tag suffix.
struct RunValues {
	run: String,
	values: BTreeMap<String, f64>,
	compression: bool,
}

impl RunValues {
	/// The first suffix in `chain` that has a value. A present zero counts as a value.
	fn first(&self, chain: &[&str]) -> Option<f64> {
		chain
			.iter()
			.find_map(|suffix| self.values.get(*suffix).copied())
	}

	fn precision(&self, chain: &[&str], precision: Precision) -> Option<f64> {
		let chain: Vec<String> = chain
			.iter()
			.map(|prefix| format!("{}/{}", prefix, precision.segment()))
			.collect();
		let chain: Vec<&str> = chain.iter().map(|suffix| suffix.as_str()).collect();
		self.first(&chain)
	}

	fn compression(&self, metric: &str) -> Option<f64> {
		let suffix = format!("compression/{}", metric);
		self.first(&[suffix.as_str()])
	}

	fn record(&self) -> RunMetricRecord {
		RunMetricRecord {
			run: self.run.clone(),
			accuracy_fp32: self.precision(ACCURACY, Precision::Fp32),
			accuracy_int8: self.precision(ACCURACY, Precision::Int8),
			latency_fp32: self.precision(LATENCY, Precision::Fp32),
			latency_int8: self.precision(LATENCY, Precision::Int8),
			model_size_fp32: self.precision(MODEL_SIZE, Precision::Fp32),
			model_size_int8: self.precision(MODEL_SIZE, Precision::Int8),
			memory_fp32: self.precision(MEMORY, Precision::Fp32),
			memory_int8: self.precision(MEMORY, Precision::Int8),
			energy_fp32: self.precision(ENERGY, Precision::Fp32),
			energy_int8: self.precision(ENERGY, Precision::Int8),
			accuracy_drop: self.compression("accuracy_drop"),
			size_ratio: self.compression("size_ratio"),
			speedup: self.compression("speedup"),
			energy_ratio: self.compression("energy_ratio"),
			memory_reduction_mb: self.compression("memory_reduction_mb"),
			energy_reduction_mw: self.compression("energy_reduction_mw"),
		}
	}
}

/**
Group one store run's tags by the run named in each tag. A single store run usually holds the tags of one model, but a shared writer can put several models into one directory.
*/
fn group_by_tag_run(run: &RunScalars) -> Vec<RunValues> {
	let mut groups: Vec<RunValues> = Vec::new();
	for (tag, value) in run.latest.iter() {
		let parsed: Tag = match tag.parse() {
			Ok(parsed) => parsed,
			Err(_) => continue,
		};
		let index = match groups.iter().position(|group| group.run == parsed.run) {
			Some(index) => index,
			None => {
				groups.push(RunValues {
					run: parsed.run.clone(),
					values: BTreeMap::new(),
					compression: false,
				});
				groups.len() - 1
			}
		};
		let group = &mut groups[index];
		group.compression |= tag.contains("compression/");
		group.values.insert(parsed.suffix(), *value);
	}
	groups
}

/**
Read every run from `source` and build one record per run that has compression tags, in the order the runs are first seen.
*/
pub fn summarize(source: &dyn MetricSource) -> Result<Vec<RunMetricRecord>> {
	let runs = source.read()?;
	let mut records: Vec<RunMetricRecord> = Vec::new();
	for run in runs.iter() {
		for group in group_by_tag_run(run) {
			if !group.compression {
				continue;
			}
			let record = group.record();
			match records.iter_mut().find(|existing| existing.run == record.run) {
				Some(existing) => existing.merge(&record),
				None => records.push(record),
			}
		}
	}
	tracing::debug!(source = source.name(), runs = records.len(), "summarized runs");
	Ok(records)
}

/// The body of the summary endpoint. Failures become an empty run list with an error message.
pub fn summary_response(host: &HostEnvironment) -> SummaryResponse {
	let source = match host.metric_source() {
		Some(source) => source,
		None => {
			return SummaryResponse {
				runs: Vec::new(),
				error: Some("neither a scalar provider nor a multiplexer is available".to_owned()),
			}
		}
	};
	match summarize(source.as_ref()) {
		Ok(runs) => SummaryResponse { runs, error: None },
		Err(error) => {
			tracing::warn!(%error, "failed to summarize runs");
			SummaryResponse {
				runs: Vec::new(),
				error: Some(error.to_string()),
			}
		}
	}
}

/// Whether there is any compression data to show.
pub fn is_active(host: &HostEnvironment) -> bool {
	let source = match host.metric_source() {
		Some(source) => source,
		None => return false,
	};
	match source.read() {
		Ok(runs) => runs
			.iter()
			.any(|run| run.latest.keys().any(|tag| tag.contains("compression/"))),
		Err(_) => false,
	}
}

#[cfg(test)]
fn store_with(run: &str, values: &[(&str, f64)]) -> crate::ScalarStore {
	let mut store = crate::ScalarStore::new();
	for (tag, value) in values {
		store.add_event(
			run,
			crate::Event {
				tag: tag.to_string(),
				step: 0,
				wall_time: 0.0,
				payload: crate::EventPayload::Scalar { value: *value },
			},
		);
	}
	store
}

#[test]
fn test_summarize_reads_fallback_chains() {
	let store = store_with(
		"alexnet",
		&[
			("alexnet/compression/speedup", 2.0),
			("alexnet/metrics/accuracy/fp32", 0.99),
			("alexnet/performance/latency/fp32", 12.0),
			("alexnet/performance/latency_ms/int8", 6.0),
			("alexnet/performance/energy_consumption_mw/fp32", 300.0),
			("alexnet/performance/energy/fp32", 999.0),
			("alexnet/performance/memory_usage/int8", 64.0),
		],
	);
	let records = summarize(&crate::ProviderSource::new(&store)).unwrap();
	assert_eq!(records.len(), 1);
	let record = &records[0];
	assert_eq!(record.run, "alexnet");
	assert_eq!(record.speedup, Some(2.0));
	assert_eq!(record.accuracy_fp32, Some(0.99));
	assert_eq!(record.accuracy_int8, None);
	assert_eq!(record.latency_fp32, Some(12.0));
	assert_eq!(record.latency_int8, Some(6.0));
	assert_eq!(record.energy_fp32, Some(300.0));
	assert_eq!(record.memory_int8, Some(64.0));
}

#[test]
fn test_zero_is_a_present_value() {
	let store = store_with(
		"vgg",
		&[
			("vgg/compression/accuracy_drop", 0.0),
			("vgg/performance/latency_ms/fp32", 0.0),
			("vgg/performance/latency/fp32", 7.0),
		],
	);
	let records = summarize(&crate::MultiplexerSource::new(&store)).unwrap();
	assert_eq!(records[0].latency_fp32, Some(0.0));
	assert_eq!(records[0].accuracy_drop, Some(0.0));
}

#[test]
fn test_runs_without_compression_tags_are_skipped() {
	let mut store = store_with("training", &[("mobilenet/training/loss", 0.3)]);
	store.add_event(
		"bench",
		crate::Event {
			tag: "resnet18/compression/size_ratio".to_owned(),
			step: 0,
			wall_time: 0.0,
			payload: crate::EventPayload::Scalar { value: 3.9 },
		},
	);
	store.add_event(
		"bench",
		crate::Event {
			tag: "vgg/compression/size_ratio".to_owned(),
			step: 0,
			wall_time: 0.0,
			payload: crate::EventPayload::Scalar { value: 4.0 },
		},
	);
	let records = summarize(&crate::ProviderSource::new(&store)).unwrap();
	let runs: Vec<&str> = records.iter().map(|record| record.run.as_str()).collect();
	assert_eq!(runs, vec!["resnet18", "vgg"]);
}

#[test]
fn test_summary_response_without_source_has_error() {
	let response = summary_response(&HostEnvironment::default());
	assert!(response.runs.is_empty());
	assert!(response.error.is_some());
	assert!(!is_active(&HostEnvironment::default()));
}

#[test]
fn test_is_active() {
	let store = store_with("training", &[("mobilenet/training/loss", 0.3)]);
	let host = HostEnvironment {
		provider: Some(&store),
		multiplexer: None,
	};
	assert!(!is_active(&host));
	let store = store_with("alexnet", &[("alexnet/compression/speedup", 2.0)]);
	let host = HostEnvironment {
		provider: None,
		multiplexer: Some(&store),
	};
	assert!(is_active(&host));
	let response = summary_response(&host);
	assert_eq!(response.error, None);
	assert_eq!(response.runs[0].speedup, Some(2.0));
}
