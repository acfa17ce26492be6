/*!
This crate reads the scalar events written by the compression writer and turns them into the per-run records served by the summary endpoint.

Runs live in directories under a log directory, each with an `events.jsonl` file. Every event is keyed by a [`Tag`](struct.Tag.html), `{run}/{category}/{metric}[/{precision}]`. The [`ScalarStore`](struct.ScalarStore.html) offers two read interfaces, and a [`MetricSource`](trait.MetricSource.html) is chosen over one of them for each request.
*/

mod event;
mod source;
mod store;
mod summary;
mod tag;

pub use self::event::{
	wall_time_now, Event, EventPayload, ScalarEvent, TextEvent, EVENT_LOG_FILE_NAME,
};
pub use self::source::{
	latest_value, HostEnvironment, MetricSource, MultiplexerSource, ProviderSource, RunScalars,
};
pub use self::store::{RunData, ScalarMultiplexer, ScalarProvider, ScalarStore};
pub use self::summary::{is_active, summarize, summary_response};
pub use self::tag::{Tag, TagParseError};
pub use compression_board_metrics::Precision;
