use num_traits::Float;
use std::{
	cmp::{Ord, Ordering},
	fmt::Debug,
	hash::{Hash, Hasher},
};
use thiserror::Error;

/**
A float that is known to be neither NaN nor infinite. Because of that, `Finite` implements `Ord`, and `Option<Finite<T>>` orders `None` below every finite value, which is how undefined metrics sort.
*/
#[derive(Clone, Copy, Debug)]
pub struct Finite<T>(T)
where
	T: Float;

#[derive(Debug, Error, PartialEq)]
#[error("not finite")]
pub struct NotFiniteError;

impl<T> Finite<T>
where
	T: Float,
{
	pub fn new(value: T) -> Result<Self, NotFiniteError> {
		if value.is_finite() {
			Ok(Self(value))
		} else {
			Err(NotFiniteError)
		}
	}

	pub fn get(self) -> T {
		self.0
	}
}

impl<T> std::ops::Deref for Finite<T>
where
	T: Float,
{
	type Target = T;
	fn deref(&self) -> &Self::Target {
		&self.0
	}
}

impl<T> std::fmt::Display for Finite<T>
where
	T: Float + std::fmt::Display,
{
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}", self.0)
	}
}

impl<T> PartialEq for Finite<T>
where
	T: Float,
{
	#[inline]
	fn eq(&self, other: &Self) -> bool {
		self.0.eq(&other.0)
	}
}

impl<T> Eq for Finite<T> where T: Float {}

impl<T> PartialOrd for Finite<T>
where
	T: Float,
{
	fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
		Some(self.cmp(other))
	}
}

impl<T> Ord for Finite<T>
where
	T: Float,
{
	fn cmp(&self, other: &Self) -> Ordering {
		// Both values are finite so partial_cmp always returns Some.
		self.0.partial_cmp(&other.0).unwrap_or(Ordering::Equal)
	}
}

impl Hash for Finite<f32> {
	#[inline]
	fn hash<H: Hasher>(&self, state: &mut H) {
		self.0.to_bits().hash(state);
	}
}

impl Hash for Finite<f64> {
	#[inline]
	fn hash<H: Hasher>(&self, state: &mut H) {
		self.0.to_bits().hash(state);
	}
}

pub trait ToFinite<T>
where
	T: Float,
{
	/// if the value is finite, return Ok(Finite(self)), otherwise return Err(NotFiniteError).
	fn to_finite(self) -> Result<Finite<T>, NotFiniteError>;
}

impl<T> ToFinite<T> for T
where
	T: Float,
{
	fn to_finite(self) -> Result<Finite<T>, NotFiniteError> {
		Finite::new(self)
	}
}

#[test]
fn test_finite_rejects_nan_and_infinity() {
	assert_eq!(Finite::new(f64::NAN), Err(NotFiniteError));
	assert_eq!(Finite::new(f64::INFINITY), Err(NotFiniteError));
	assert_eq!(Finite::new(f64::NEG_INFINITY), Err(NotFiniteError));
	assert_eq!(Finite::new(2.5f64).map(Finite::get), Ok(2.5));
}

#[test]
fn test_missing_orders_below_every_finite_value() {
	let missing: Option<Finite<f64>> = None;
	let lowest = Finite::new(f64::MIN).ok();
	let zero = 0.0f64.to_finite().ok();
	assert!(missing < lowest);
	assert!(lowest < zero);
	let mut values = vec![zero, missing, lowest];
	values.sort();
	assert_eq!(values, vec![missing, lowest, zero]);
}
