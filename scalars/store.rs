use crate::event::{Event, EventPayload, ScalarEvent, TextEvent, EVENT_LOG_FILE_NAME};
use compression_board_util::error::Result;
use std::{
	collections::BTreeMap,
	io::{BufRead, BufReader},
	path::Path,
};

/**
The richer read interface: every scalar tag of every run at once, and the full series of one run.
*/
pub trait ScalarProvider: Send + Sync {
	fn list_scalars(&self) -> Result<BTreeMap<String, Vec<String>>>;
	fn read_scalars(&self, run: &str) -> Result<BTreeMap<String, Vec<ScalarEvent>>>;
}

/**
The simpler read interface: runs, the scalar tags of a run, and the items of one tag.
*/
pub trait ScalarMultiplexer: Send + Sync {
	fn runs(&self) -> Result<Vec<String>>;
	fn tags(&self, run: &str) -> Result<Vec<String>>;
	fn items(&self, run: &str, tag: &str) -> Result<Vec<ScalarEvent>>;
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct RunData {
	pub scalars: BTreeMap<String, Vec<ScalarEvent>>,
	pub texts: BTreeMap<String, Vec<TextEvent>>,
}

/// An in memory store of the events of every run under a log directory.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ScalarStore {
	runs: BTreeMap<String, RunData>,
}

impl ScalarStore {
	pub fn new() -> ScalarStore {
		ScalarStore::default()
	}

	/**
	Load every run under `logdir`. A run is a directory containing an `events.jsonl` file, named by its path relative to `logdir`, or `.` for `logdir` itself. A missing `logdir` produces an empty store. Lines that fail to parse, and runs whose log cannot be read, are skipped with a warning.
	*/
	pub fn load(logdir: &Path) -> Result<ScalarStore> {
		let mut store = ScalarStore::new();
		if !logdir.exists() {
			tracing::warn!(logdir = %logdir.display(), "log directory does not exist");
			return Ok(store);
		}
		for entry in walkdir::WalkDir::new(logdir).sort_by_file_name() {
			let entry = match entry {
				Ok(entry) => entry,
				Err(error) => {
					tracing::warn!(%error, "skipping unreadable entry in log directory");
					continue;
				}
			};
			if !entry.file_type().is_file() || entry.file_name() != EVENT_LOG_FILE_NAME {
				continue;
			}
			let run_dir = match entry.path().parent() {
				Some(run_dir) => run_dir,
				None => continue,
			};
			let run = run_name(logdir, run_dir);
			let result = std::fs::File::open(entry.path())
				.map_err(Into::into)
				.and_then(|file| store.read_event_log(&run, BufReader::new(file)));
			if let Err(error) = result {
				tracing::warn!(run = run.as_str(), %error, "stopped reading event log");
			}
		}
		tracing::info!(
			runs = store.runs.len(),
			tags = store.runs.values().map(|run| run.scalars.len()).sum::<usize>(),
			"loaded log directory"
		);
		Ok(store)
	}

	fn read_event_log(&mut self, run: &str, mut reader: impl BufRead) -> Result<()> {
		let mut buffer = Vec::new();
		let mut index = 0;
		loop {
			buffer.clear();
			if reader.read_until(b'\n', &mut buffer)? == 0 {
				break;
			}
			index += 1;
			let line = match std::str::from_utf8(&buffer) {
				Ok(line) => line,
				Err(error) => {
					tracing::warn!(run, line = index, %error, "skipping unreadable event");
					continue;
				}
			};
			if line.trim().is_empty() {
				continue;
			}
			match serde_json::from_str::<Event>(line) {
				Ok(event) => self.add_event(run, event),
				Err(error) => {
					tracing::warn!(run, line = index, %error, "skipping unreadable event");
				}
			}
		}
		Ok(())
	}

	/// Add one event to a run, keeping each series ordered by step.
	pub fn add_event(&mut self, run: &str, event: Event) {
		let run = self.runs.entry(run.to_owned()).or_default();
		match event.payload {
			EventPayload::Scalar { value } => {
				let series = run.scalars.entry(event.tag).or_default();
				let scalar = ScalarEvent {
					step: event.step,
					wall_time: event.wall_time,
					value,
				};
				let index = series.partition_point(|existing| existing.step <= scalar.step);
				series.insert(index, scalar);
			}
			EventPayload::Text { text } => {
				let series = run.texts.entry(event.tag).or_default();
				let text = TextEvent {
					step: event.step,
					wall_time: event.wall_time,
					text,
				};
				let index = series.partition_point(|existing| existing.step <= text.step);
				series.insert(index, text);
			}
		}
	}

	pub fn run(&self, run: &str) -> Option<&RunData> {
		self.runs.get(run)
	}

	pub fn run_names(&self) -> impl Iterator<Item = &str> {
		self.runs.keys().map(|run| run.as_str())
	}

	pub fn is_empty(&self) -> bool {
		self.runs.is_empty()
	}
}

fn run_name(logdir: &Path, run_dir: &Path) -> String {
	match run_dir.strip_prefix(logdir) {
		Ok(relative) if relative.as_os_str().is_empty() => ".".to_owned(),
		Ok(relative) => relative
			.components()
			.map(|component| component.as_os_str().to_string_lossy())
			.collect::<Vec<_>>()
			.join("/"),
		Err(_) => run_dir.to_string_lossy().into_owned(),
	}
}

impl ScalarProvider for ScalarStore {
	fn list_scalars(&self) -> Result<BTreeMap<String, Vec<String>>> {
		Ok(self
			.runs
			.iter()
			.map(|(run, data)| (run.clone(), data.scalars.keys().cloned().collect()))
			.collect())
	}

	fn read_scalars(&self, run: &str) -> Result<BTreeMap<String, Vec<ScalarEvent>>> {
		self.runs
			.get(run)
			.map(|data| data.scalars.clone())
			.ok_or_else(|| compression_board_util::err!("no run named \"{}\"", run))
	}
}

impl ScalarMultiplexer for ScalarStore {
	fn runs(&self) -> Result<Vec<String>> {
		Ok(self.runs.keys().cloned().collect())
	}

	fn tags(&self, run: &str) -> Result<Vec<String>> {
		self.runs
			.get(run)
			.map(|data| data.scalars.keys().cloned().collect())
			.ok_or_else(|| compression_board_util::err!("no run named \"{}\"", run))
	}

	fn items(&self, run: &str, tag: &str) -> Result<Vec<ScalarEvent>> {
		let data = self
			.runs
			.get(run)
			.ok_or_else(|| compression_board_util::err!("no run named \"{}\"", run))?;
		Ok(data.scalars.get(tag).cloned().unwrap_or_default())
	}
}

#[cfg(test)]
fn scalar(tag: &str, step: i64, value: f64) -> Event {
	Event {
		tag: tag.to_owned(),
		step,
		wall_time: 0.0,
		payload: EventPayload::Scalar { value },
	}
}

#[test]
fn test_load_runs_from_log_directory() {
	let logdir = tempfile::tempdir().unwrap();
	let alexnet = logdir.path().join("alexnet");
	std::fs::create_dir_all(&alexnet).unwrap();
	std::fs::write(
		alexnet.join(EVENT_LOG_FILE_NAME),
		concat!(
			r#"{"tag":"alexnet/compression/speedup","step":1,"wall_time":1.0,"value":2.5}"#,
			"\n",
			"not json\n",
			"\n",
			r#"{"tag":"alexnet/compression/speedup","step":0,"wall_time":0.5,"value":2.0}"#,
			"\n",
			r#"{"tag":"alexnet/metadata/info","step":0,"wall_time":0.5,"text":"Model: alexnet"}"#,
			"\n",
		),
	)
	.unwrap();
	let nested = logdir.path().join("bench").join("vgg");
	std::fs::create_dir_all(&nested).unwrap();
	std::fs::write(
		nested.join(EVENT_LOG_FILE_NAME),
		r#"{"tag":"vgg/metrics/accuracy/fp32","step":0,"wall_time":0.0,"value":0.7}"#,
	)
	.unwrap();
	let store = ScalarStore::load(logdir.path()).unwrap();
	assert_eq!(store.run_names().collect::<Vec<_>>(), vec!["alexnet", "bench/vgg"]);
	let speedup = store.items("alexnet", "alexnet/compression/speedup").unwrap();
	let steps: Vec<i64> = speedup.iter().map(|event| event.step).collect();
	assert_eq!(steps, vec![0, 1]);
	assert_eq!(store.run("alexnet").unwrap().texts.len(), 1);
	assert_eq!(
		store.tags("alexnet").unwrap(),
		vec!["alexnet/compression/speedup".to_owned()]
	);
}

#[test]
fn test_invalid_utf8_line_is_skipped() {
	let logdir = tempfile::tempdir().unwrap();
	let alexnet = logdir.path().join("alexnet");
	std::fs::create_dir_all(&alexnet).unwrap();
	std::fs::write(
		alexnet.join(EVENT_LOG_FILE_NAME),
		r#"{"tag":"alexnet/compression/speedup","step":0,"wall_time":0.0,"value":2.0}"#,
	)
	.unwrap();
	let vgg = logdir.path().join("vgg");
	std::fs::create_dir_all(&vgg).unwrap();
	let mut contents =
		br#"{"tag":"vgg/compression/speedup","step":0,"wall_time":0.0,"value":3.0}"#.to_vec();
	contents.extend_from_slice(b"\n\xff\xfe\n");
	contents.extend_from_slice(br#"{"tag":"vgg/compression/size_ratio","step":0,"wall_time":0.0,"value":4.0}"#);
	std::fs::write(vgg.join(EVENT_LOG_FILE_NAME), contents).unwrap();
	let store = ScalarStore::load(logdir.path()).unwrap();
	assert_eq!(store.run_names().collect::<Vec<_>>(), vec!["alexnet", "vgg"]);
	assert_eq!(
		store.tags("vgg").unwrap(),
		vec![
			"vgg/compression/size_ratio".to_owned(),
			"vgg/compression/speedup".to_owned(),
		]
	);
}

#[test]
fn test_missing_log_directory_is_empty() {
	let logdir = tempfile::tempdir().unwrap();
	let store = ScalarStore::load(&logdir.path().join("missing")).unwrap();
	assert!(store.is_empty());
}

#[test]
fn test_both_read_interfaces_agree() {
	let mut store = ScalarStore::new();
	store.add_event("resnet18", scalar("resnet18/compression/size_ratio", 0, 3.9));
	store.add_event("resnet18", scalar("resnet18/performance/model_size_mb/fp32", 0, 44.7));
	let listing = store.list_scalars().unwrap();
	assert_eq!(listing["resnet18"], store.tags("resnet18").unwrap());
	let scalars = store.read_scalars("resnet18").unwrap();
	assert_eq!(
		scalars["resnet18/compression/size_ratio"],
		store.items("resnet18", "resnet18/compression/size_ratio").unwrap()
	);
	assert!(store.read_scalars("missing").is_err());
	assert!(store.items("resnet18", "resnet18/unknown/tag").unwrap().is_empty());
}
