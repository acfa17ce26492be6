/*!
This crate defines the per-run metric record exchanged between the summary endpoint and the dashboard, and the pure functions that derive FP32 to INT8 ratios from it.

Every numeric field is optional. A missing field means the value was not measured. Derived values are `None` whenever they cannot be computed, so they never carry NaN or infinity into sorting or display.
*/

mod derive;
mod field;
mod format;
mod precision;
mod record;

pub use self::derive::{aggregate, derive_drop, derive_ratios, ratio, DerivedRunView};
pub use self::field::Field;
pub use self::format::{format_ratio, format_value, MISSING};
pub use self::precision::Precision;
pub use self::record::{parse_summary, RunMetricRecord, SummaryResponse};
