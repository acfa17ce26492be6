use crate::{
	sink::{EventLogWriter, EventSink},
	writer::CompressionWriter,
};
use compression_board_scalars::Tag;
use compression_board_util::error::Result;
use std::path::Path;

/// The values of one training epoch.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct EpochMetrics {
	pub train_loss: f64,
	pub train_accuracy: f64,
	pub train_f1: f64,
	pub val_loss: f64,
	pub val_accuracy: f64,
	pub val_f1: f64,
	pub train_sensitivity: Option<f64>,
	pub train_specificity: Option<f64>,
	pub val_sensitivity: Option<f64>,
	pub val_specificity: Option<f64>,
	pub learning_rate: Option<f64>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct TrainingSummary {
	pub total_epochs: i64,
	pub final_train_loss: f64,
	pub final_train_accuracy: f64,
	pub final_train_f1: f64,
	pub final_val_loss: f64,
	pub final_val_accuracy: f64,
	pub final_val_f1: f64,
	pub early_stopped: bool,
}

/**
A `TrainingLogger` writes one set of training and validation scalars per epoch for a model and keeps track of the epoch with the best validation F1 score.
*/
pub struct TrainingLogger<S = EventLogWriter>
where
	S: EventSink,
{
	model: String,
	writer: CompressionWriter<S>,
	best_val_f1: f64,
	best_epoch: i64,
}

impl TrainingLogger<EventLogWriter> {
	/// Create a logger writing to `logdir`, or `runs/training/{model}` if it is not given.
	pub fn create(model: &str, logdir: Option<&Path>) -> Result<TrainingLogger<EventLogWriter>> {
		let writer = match logdir {
			Some(logdir) => CompressionWriter::create(logdir)?,
			None => CompressionWriter::create(&Path::new("runs").join("training").join(model))?,
		};
		Ok(TrainingLogger::new(model, writer))
	}
}

impl<S> TrainingLogger<S>
where
	S: EventSink,
{
	pub fn new(model: &str, writer: CompressionWriter<S>) -> TrainingLogger<S> {
		TrainingLogger {
			model: model.to_owned(),
			writer,
			best_val_f1: 0.0,
			best_epoch: 0,
		}
	}

	pub fn best_val_f1(&self) -> f64 {
		self.best_val_f1
	}

	pub fn best_epoch(&self) -> i64 {
		self.best_epoch
	}

	fn scalar(&mut self, category: &str, metric: &str, value: f64, step: i64) -> Result<()> {
		let tag = Tag::new(&self.model, category, metric);
		self.writer.add_scalar(&tag, value, step)
	}

	pub fn log_epoch(&mut self, epoch: i64, metrics: &EpochMetrics) -> Result<()> {
		self.scalar("training", "loss", metrics.train_loss, epoch)?;
		self.scalar("training", "accuracy", metrics.train_accuracy, epoch)?;
		self.scalar("training", "f1_score", metrics.train_f1, epoch)?;
		self.scalar("validation", "loss", metrics.val_loss, epoch)?;
		self.scalar("validation", "accuracy", metrics.val_accuracy, epoch)?;
		self.scalar("validation", "f1_score", metrics.val_f1, epoch)?;
		let optional = [
			("training", "sensitivity", metrics.train_sensitivity),
			("training", "specificity", metrics.train_specificity),
			("validation", "sensitivity", metrics.val_sensitivity),
			("validation", "specificity", metrics.val_specificity),
			("training", "learning_rate", metrics.learning_rate),
		];
		for (category, metric, value) in optional.iter() {
			if let Some(value) = value {
				self.scalar(category, metric, *value, epoch)?;
			}
		}
		if metrics.val_f1 > self.best_val_f1 {
			self.best_val_f1 = metrics.val_f1;
			self.best_epoch = epoch;
		}
		Ok(())
	}

	pub fn log_early_stopping(&mut self, epoch: i64, patience: u64, min_delta: f64, stopped: bool) -> Result<()> {
		self.scalar("training", "early_stopping_patience", patience as f64, epoch)?;
		self.scalar("training", "early_stopping_min_delta", min_delta, epoch)?;
		self.scalar("training", "early_stopped", if stopped { 1.0 } else { 0.0 }, epoch)?;
		let (best_epoch, best_val_f1) = (self.best_epoch, self.best_val_f1);
		self.scalar("training", "best_epoch", best_epoch as f64, epoch)?;
		self.scalar("training", "best_val_f1", best_val_f1, epoch)?;
		Ok(())
	}

	/// Write a text summary at step `total_epochs` and the final values at step `total_epochs + 1`.
	pub fn log_training_summary(&mut self, summary: &TrainingSummary) -> Result<()> {
		let text = format!(
			"Training Summary for {model}\n\
			Total Epochs: {total_epochs}\n\
			Early Stopped: {early_stopped}\n\
			Best Epoch: {best_epoch}\n\
			Best Val F1: {best_val_f1:.4}\n\
			\n\
			Final Training Metrics:\n  \
			Loss: {train_loss:.4}\n  \
			Accuracy: {train_accuracy:.4}\n  \
			F1 Score: {train_f1:.4}\n\
			\n\
			Final Validation Metrics:\n  \
			Loss: {val_loss:.4}\n  \
			Accuracy: {val_accuracy:.4}\n  \
			F1 Score: {val_f1:.4}\n",
			model = self.model,
			total_epochs = summary.total_epochs,
			early_stopped = summary.early_stopped,
			best_epoch = self.best_epoch,
			best_val_f1 = self.best_val_f1,
			train_loss = summary.final_train_loss,
			train_accuracy = summary.final_train_accuracy,
			train_f1 = summary.final_train_f1,
			val_loss = summary.final_val_loss,
			val_accuracy = summary.final_val_accuracy,
			val_f1 = summary.final_val_f1,
		);
		let tag = Tag::new(&self.model, "training", "summary");
		self.writer.add_text(&tag, &text, summary.total_epochs)?;
		let step = summary.total_epochs + 1;
		self.scalar("training", "final_train_loss", summary.final_train_loss, step)?;
		self.scalar("training", "final_train_acc", summary.final_train_accuracy, step)?;
		self.scalar("training", "final_train_f1", summary.final_train_f1, step)?;
		self.scalar("validation", "final_val_loss", summary.final_val_loss, step)?;
		self.scalar("validation", "final_val_acc", summary.final_val_accuracy, step)?;
		self.scalar("validation", "final_val_f1", summary.final_val_f1, step)?;
		Ok(())
	}

	pub fn close(self) -> Result<()> {
		self.writer.close()
	}
}

#[test]
fn test_training_logger_tracks_best_epoch() {
	let mut store = compression_board_scalars::ScalarStore::new();
	let writer = CompressionWriter::new(crate::StoreSink::new(&mut store, "alexnet"));
	let mut logger = TrainingLogger::new("alexnet", writer);
	let epoch = |val_f1| EpochMetrics {
		train_loss: 0.5,
		train_accuracy: 0.8,
		train_f1: 0.7,
		val_loss: 0.6,
		val_accuracy: 0.75,
		val_f1,
		learning_rate: Some(0.001),
		..Default::default()
	};
	logger.log_epoch(0, &epoch(0.6)).unwrap();
	logger.log_epoch(1, &epoch(0.8)).unwrap();
	logger.log_epoch(2, &epoch(0.7)).unwrap();
	assert_eq!(logger.best_epoch(), 1);
	assert_eq!(logger.best_val_f1(), 0.8);
	logger.log_early_stopping(2, 5, 0.001, true).unwrap();
	logger
		.log_training_summary(&TrainingSummary {
			total_epochs: 3,
			final_train_loss: 0.5,
			final_train_accuracy: 0.8,
			final_train_f1: 0.7,
			final_val_loss: 0.6,
			final_val_accuracy: 0.75,
			final_val_f1: 0.7,
			early_stopped: true,
		})
		.unwrap();
	logger.close().unwrap();
	let run = store.run("alexnet").unwrap();
	let f1 = &run.scalars["alexnet/validation/f1_score"];
	assert_eq!(f1.len(), 3);
	assert_eq!(run.scalars["alexnet/training/learning_rate"].len(), 3);
	assert!(!run.scalars.contains_key("alexnet/training/sensitivity"));
	assert_eq!(run.scalars["alexnet/training/best_epoch"][0].value, 1.0);
	assert_eq!(run.scalars["alexnet/validation/final_val_f1"][0].step, 4);
	let summary = &run.texts["alexnet/training/summary"][0];
	assert_eq!(summary.step, 3);
	insta::assert_snapshot!(summary.text.as_str(), @r###"
	Training Summary for alexnet
	Total Epochs: 3
	Early Stopped: true
	Best Epoch: 1
	Best Val F1: 0.8000

	Final Training Metrics:
	  Loss: 0.5000
	  Accuracy: 0.8000
	  F1 Score: 0.7000

	Final Validation Metrics:
	  Loss: 0.6000
	  Accuracy: 0.7500
	  F1 Score: 0.7000
	"###);
}
