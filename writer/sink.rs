use compression_board_scalars::{Event, ScalarStore, EVENT_LOG_FILE_NAME};
use compression_board_util::error::Result;
use std::{
	fs::{File, OpenOptions},
	io::{BufWriter, Write},
	path::{Path, PathBuf},
};

/// Where a writer sends its events.
pub trait EventSink {
	fn write(&mut self, event: Event) -> Result<()>;
	fn flush(&mut self) -> Result<()>;
}

/// Appends events as JSON lines to `events.jsonl` in one run directory.
pub struct EventLogWriter {
	path: PathBuf,
	file: BufWriter<File>,
}

impl EventLogWriter {
	pub fn open(logdir: &Path) -> Result<EventLogWriter> {
		std::fs::create_dir_all(logdir)?;
		let path = logdir.join(EVENT_LOG_FILE_NAME);
		let file = OpenOptions::new().create(true).append(true).open(&path)?;
		Ok(EventLogWriter {
			path,
			file: BufWriter::new(file),
		})
	}

	pub fn path(&self) -> &Path {
		&self.path
	}
}

impl EventSink for EventLogWriter {
	fn write(&mut self, event: Event) -> Result<()> {
		serde_json::to_writer(&mut self.file, &event)?;
		self.file.write_all(b"\n")?;
		Ok(())
	}

	fn flush(&mut self) -> Result<()> {
		self.file.flush()?;
		Ok(())
	}
}

/// Writes events directly into one run of an in memory store.
pub struct StoreSink<'a> {
	store: &'a mut ScalarStore,
	run: String,
}

impl<'a> StoreSink<'a> {
	pub fn new(store: &'a mut ScalarStore, run: &str) -> StoreSink<'a> {
		StoreSink {
			store,
			run: run.to_owned(),
		}
	}
}

impl<'a> EventSink for StoreSink<'a> {
	fn write(&mut self, event: Event) -> Result<()> {
		self.store.add_event(&self.run, event);
		Ok(())
	}

	fn flush(&mut self) -> Result<()> {
		Ok(())
	}
}
