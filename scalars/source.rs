use crate::{
	event::ScalarEvent,
	store::{ScalarMultiplexer, ScalarProvider},
};
use compression_board_util::error::Result;
use std::collections::BTreeMap;

/// The most recent value of every scalar tag of one run of the store.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RunScalars {
	pub run: String,
	pub latest: BTreeMap<String, f64>,
}

/**
A source of per-run latest scalar values. There are two implementations, one over each of the store's read interfaces, and [`HostEnvironment::metric_source`] picks one of them once per request.
*/
pub trait MetricSource {
	fn name(&self) -> &'static str;
	fn read(&self) -> Result<Vec<RunScalars>>;
}

/// The value of the event with the highest step. The last written event wins among equal steps.
pub fn latest_value(events: &[ScalarEvent]) -> Option<f64> {
	events
		.iter()
		.enumerate()
		.max_by_key(|(index, event)| (event.step, *index))
		.map(|(_, event)| event.value)
}

pub struct ProviderSource<'a> {
	provider: &'a dyn ScalarProvider,
}

impl<'a> ProviderSource<'a> {
	pub fn new(provider: &'a dyn ScalarProvider) -> ProviderSource<'a> {
		ProviderSource { provider }
	}
}

impl<'a> MetricSource for ProviderSource<'a> {
	fn name(&self) -> &'static str {
		"provider"
	}

	fn read(&self) -> Result<Vec<RunScalars>> {
		let listing = self.provider.list_scalars()?;
		let mut runs = Vec::new();
		for run in listing.keys() {
			let scalars = match self.provider.read_scalars(run) {
				Ok(scalars) => scalars,
				Err(error) => {
					tracing::warn!(run = run.as_str(), %error, "skipping run");
					continue;
				}
			};
			let latest = scalars
				.iter()
				.filter_map(|(tag, events)| Some((tag.clone(), latest_value(events)?)))
				.collect();
			runs.push(RunScalars {
				run: run.clone(),
				latest,
			});
		}
		Ok(runs)
	}
}

pub struct MultiplexerSource<'a> {
	multiplexer: &'a dyn ScalarMultiplexer,
}

impl<'a> MultiplexerSource<'a> {
	pub fn new(multiplexer: &'a dyn ScalarMultiplexer) -> MultiplexerSource<'a> {
		MultiplexerSource { multiplexer }
	}

	fn read_run(&self, run: &str) -> Result<RunScalars> {
		let mut latest = BTreeMap::new();
		for tag in self.multiplexer.tags(run)? {
			let items = self.multiplexer.items(run, &tag)?;
			if let Some(value) = latest_value(&items) {
				latest.insert(tag, value);
			}
		}
		Ok(RunScalars {
			run: run.to_owned(),
			latest,
		})
	}
}

impl<'a> MetricSource for MultiplexerSource<'a> {
	fn name(&self) -> &'static str {
		"multiplexer"
	}

	fn read(&self) -> Result<Vec<RunScalars>> {
		let mut runs = Vec::new();
		for run in self.multiplexer.runs()? {
			match self.read_run(&run) {
				Ok(run) => runs.push(run),
				Err(error) => {
					tracing::warn!(run = run.as_str(), %error, "skipping run");
				}
			}
		}
		Ok(runs)
	}
}

/// The read interfaces the hosting process offers.
#[derive(Clone, Copy, Default)]
pub struct HostEnvironment<'a> {
	pub provider: Option<&'a dyn ScalarProvider>,
	pub multiplexer: Option<&'a dyn ScalarMultiplexer>,
}

impl<'a> HostEnvironment<'a> {
	/// Prefer the richer provider interface and fall back to the multiplexer.
	pub fn metric_source(&self) -> Option<Box<dyn MetricSource + 'a>> {
		if let Some(provider) = self.provider {
			return Some(Box::new(ProviderSource::new(provider)));
		}
		if let Some(multiplexer) = self.multiplexer {
			return Some(Box::new(MultiplexerSource::new(multiplexer)));
		}
		None
	}
}

#[test]
fn test_latest_value_uses_highest_step() {
	let event = |step, value| ScalarEvent {
		step,
		wall_time: 0.0,
		value,
	};
	assert_eq!(latest_value(&[]), None);
	assert_eq!(latest_value(&[event(2, 1.0), event(1, 5.0)]), Some(1.0));
	assert_eq!(latest_value(&[event(1, 1.0), event(1, 3.0)]), Some(3.0));
}

#[test]
fn test_source_selection() {
	let store = crate::ScalarStore::new();
	let host = HostEnvironment {
		provider: Some(&store),
		multiplexer: Some(&store),
	};
	assert_eq!(host.metric_source().unwrap().name(), "provider");
	let host = HostEnvironment {
		provider: None,
		multiplexer: Some(&store),
	};
	assert_eq!(host.metric_source().unwrap().name(), "multiplexer");
	assert!(HostEnvironment::default().metric_source().is_none());
}
