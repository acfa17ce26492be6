/*!
This crate is the writing side of the compression board. Instrumentation code uses a [`CompressionWriter`](struct.CompressionWriter.html) to record FP32 and INT8 measurements of a model, a [`TrainingLogger`](struct.TrainingLogger.html) to record per-epoch training values, and a [`BenchmarkParser`](struct.BenchmarkParser.html) to convert a whole benchmark results file at once.

Every value is keyed by a tag, `{run}/{category}/{metric}[/{precision}]`, and an explicit step.
*/

mod benchmark;
mod sink;
mod training;
mod writer;

pub use self::benchmark::{BenchmarkParser, ImportReport};
pub use self::sink::{EventLogWriter, EventSink, StoreSink};
pub use self::training::{EpochMetrics, TrainingLogger, TrainingSummary};
pub use self::writer::{CompressionWriter, ModelInfo, PrecisionMetrics};
