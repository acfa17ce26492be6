/// The two numeric precisions every comparison is made across.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Precision {
	Fp32,
	Int8,
}

impl Precision {
	pub const ALL: [Precision; 2] = [Precision::Fp32, Precision::Int8];

	/// The label shown in legends and tooltips.
	pub fn label(self) -> &'static str {
		match self {
			Precision::Fp32 => "FP32",
			Precision::Int8 => "INT8",
		}
	}

	/// The last segment of a tag.
	pub fn segment(self) -> &'static str {
		match self {
			Precision::Fp32 => "fp32",
			Precision::Int8 => "int8",
		}
	}

	pub fn from_segment(segment: &str) -> Option<Precision> {
		match segment {
			"fp32" => Some(Precision::Fp32),
			"int8" => Some(Precision::Int8),
			_ => None,
		}
	}
}

impl std::fmt::Display for Precision {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}", self.label())
	}
}

#[test]
fn test_precision_segments() {
	for precision in Precision::ALL.iter() {
		assert_eq!(Precision::from_segment(precision.segment()), Some(*precision));
	}
	assert_eq!(Precision::from_segment("FP32"), None);
	assert_eq!(Precision::Int8.to_string(), "INT8");
}
