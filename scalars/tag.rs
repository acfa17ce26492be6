use compression_board_metrics::Precision;
use thiserror::Error;

/**
A fully qualified scalar tag, `{run}/{category}/{metric}[/{precision}]`.

The run may itself contain `/`. The category and metric may not. When a tag is parsed, a last segment of `fp32` or `int8` is read as the precision.
*/
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Tag {
	pub run: String,
	pub category: String,
	pub metric: String,
	pub precision: Option<Precision>,
}

#[derive(Debug, Error, PartialEq)]
#[error("\"{0}\" is not a tag of the form run/category/metric[/precision]")]
pub struct TagParseError(pub String);

impl Tag {
	pub fn new(run: &str, category: &str, metric: &str) -> Tag {
		Tag {
			run: run.to_owned(),
			category: category.to_owned(),
			metric: metric.to_owned(),
			precision: None,
		}
	}

	pub fn with_precision(mut self, precision: Precision) -> Tag {
		self.precision = Some(precision);
		self
	}

	/// The tag without its run prefix, `{category}/{metric}[/{precision}]`.
	pub fn suffix(&self) -> String {
		match self.precision {
			Some(precision) => format!("{}/{}/{}", self.category, self.metric, precision.segment()),
			None => format!("{}/{}", self.category, self.metric),
		}
	}
}

impl std::fmt::Display for Tag {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}/{}", self.run, self.suffix())
	}
}

impl std::str::FromStr for Tag {
	type Err = TagParseError;
	fn from_str(value: &str) -> Result<Tag, TagParseError> {
		let error = || TagParseError(value.to_owned());
		let (rest, precision) = match value.rsplit_once('/') {
			Some((rest, last)) => match Precision::from_segment(last) {
				Some(precision) => (rest, Some(precision)),
				None => (value, None),
			},
			None => return Err(error()),
		};
		let (rest, metric) = rest.rsplit_once('/').ok_or_else(error)?;
		let (run, category) = rest.rsplit_once('/').ok_or_else(error)?;
		if run.is_empty() || category.is_empty() || metric.is_empty() {
			return Err(error());
		}
		Ok(Tag {
			run: run.to_owned(),
			category: category.to_owned(),
			metric: metric.to_owned(),
			precision,
		})
	}
}

#[test]
fn test_tag_display() {
	let tag = Tag::new("alexnet", "metrics", "accuracy").with_precision(Precision::Int8);
	assert_eq!(tag.to_string(), "alexnet/metrics/accuracy/int8");
	assert_eq!(tag.suffix(), "metrics/accuracy/int8");
	let tag = Tag::new("alexnet", "compression", "speedup");
	assert_eq!(tag.to_string(), "alexnet/compression/speedup");
}

#[test]
fn test_tag_parse() {
	let tag: Tag = "alexnet/performance/latency_ms/fp32".parse().unwrap();
	assert_eq!(
		tag,
		Tag::new("alexnet", "performance", "latency_ms").with_precision(Precision::Fp32)
	);
	let tag: Tag = "bench/resnet18/training/loss".parse().unwrap();
	assert_eq!(tag, Tag::new("bench/resnet18", "training", "loss"));
	assert!("compression/speedup".parse::<Tag>().is_err());
	assert!("speedup".parse::<Tag>().is_err());
	assert!("/compression/speedup".parse::<Tag>().is_err());
}
