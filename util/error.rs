pub type Error = Box<dyn std::error::Error + Send + Sync + 'static>;

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Build an [`Error`] from a format string.
#[macro_export]
macro_rules! err {
	($($t:tt)*) => {
		$crate::error::Error::from(format!($($t)*))
	};
}

#[test]
fn test_err_macro() {
	let error: Error = err!("failed to read {}", "events.jsonl");
	assert_eq!(error.to_string(), "failed to read events.jsonl");
}
