/*!
Shared plumbing for the compression board crates: the boxed error type, a total-order float wrapper, the HTTP serve loop, and plain-text tables for terminal output.
*/

pub mod error;
pub mod finite;
#[cfg(feature = "serve")]
pub mod serve;
pub mod table;
