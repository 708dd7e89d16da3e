//! Quality factors (qvalues) as laid out in RFC 2616 §3.9

use std::fmt;

use serde::{Deserialize, Serialize};

/// A quality factor between 0 and 1, kept at the three decimal digits of
/// precision a qvalue can carry.
///
/// # Examples
///
/// ```
/// use conneg::Quality;
///
/// let q = Quality::from_f32(0.8).unwrap();
/// assert_eq!(q.millis(), 800);
/// assert_eq!(q.to_string(), "0.8");
///
/// assert!(Quality::from_f32(1.5).is_none());
/// assert!(Quality::from_f32(f32::NAN).is_none());
/// ```
#[derive(
	Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(try_from = "f32", into = "f32")]
pub struct Quality(u16);

impl Quality {
	/// The highest quality, used when a value carries no `q` parameter
	pub const ONE: Quality = Quality(1000);

	/// The lowest quality
	pub const ZERO: Quality = Quality(0);

	/// The lowest quality that still marks a value as acceptable
	pub const LOWEST: Quality = Quality(1);

	/// Creates a quality from a float, rounded to three decimal digits.
	///
	/// Returns `None` when the value is NaN or lies outside `[0, 1]`.
	pub fn from_f32(value: f32) -> Option<Self> {
		if !(0.0..=1.0).contains(&value) {
			return None;
		}
		Some(Self((value * 1000.0).round() as u16))
	}

	/// Creates a quality from thousandths, returning `None` above 1000.
	pub const fn from_millis(millis: u16) -> Option<Self> {
		if millis > 1000 {
			return None;
		}
		Some(Self(millis))
	}

	/// Returns the quality in thousandths
	pub const fn millis(self) -> u16 {
		self.0
	}

	pub fn as_f32(self) -> f32 {
		f32::from(self.0) / 1000.0
	}

	/// Whether this quality marks a value as "not acceptable"
	pub const fn is_zero(self) -> bool {
		self.0 == 0
	}
}

impl Default for Quality {
	fn default() -> Self {
		Self::ONE
	}
}

impl TryFrom<f32> for Quality {
	type Error = String;

	fn try_from(value: f32) -> Result<Self, Self::Error> {
		Self::from_f32(value).ok_or_else(|| format!("{value} is not between 0 and 1"))
	}
}

impl From<Quality> for f32 {
	fn from(quality: Quality) -> Self {
		quality.as_f32()
	}
}

impl fmt::Display for Quality {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self.0 {
			0 => f.write_str("0"),
			1000 => f.write_str("1"),
			millis => {
				let digits = format!("{millis:03}");
				write!(f, "0.{}", digits.trim_end_matches('0'))
			}
		}
	}
}
