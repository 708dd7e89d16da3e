//! Acceptable values of `Accept`-family headers

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::error::{ParseError, Result};
use crate::quality::Quality;
use crate::token::{ParsedToken, parse_token};

/// An acceptable value for a response, as laid out in RFC 2616 §14.1.
///
/// Typical use is a media type in an `Accept` header, but the same structure
/// carries encodings (`Accept-Encoding`), languages (`Accept-Language`) and
/// character sets (`Accept-Charset`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Acceptable {
	/// The acceptable value. May contain wildcard (`*`) characters.
	pub value: String,
	/// Quality factor of the value; 1 when the header omits `q`
	pub quality: Quality,
	/// Extra parameters, never containing `q`
	pub params: BTreeMap<String, String>,
}

impl Acceptable {
	/// Creates an acceptable value with quality 1 and no parameters
	///
	/// # Examples
	///
	/// ```
	/// use conneg::{Acceptable, Quality};
	///
	/// let html = Acceptable::new("text/html");
	/// assert_eq!(html.value, "text/html");
	/// assert_eq!(html.quality, Quality::ONE);
	/// assert!(html.params.is_empty());
	/// ```
	pub fn new(value: impl Into<String>) -> Self {
		Self {
			value: value.into(),
			quality: Quality::ONE,
			params: BTreeMap::new(),
		}
	}

	pub fn with_quality(mut self, quality: Quality) -> Self {
		self.quality = quality;
		self
	}

	/// Adds a parameter. A `q` parameter is ignored; use [`with_quality`](Self::with_quality).
	pub fn with_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
		let name = name.into().to_ascii_lowercase();
		if name != "q" {
			self.params.insert(name, value.into());
		}
		self
	}

	/// Number of wildcard characters in the value
	pub fn wildcards(&self) -> usize {
		self.value.matches('*').count()
	}

	/// Checks whether an offer matches this value.
	///
	/// Only the patterns RFC 2616 §14.1 allows are understood: `*`, `*/*`,
	/// `type/*` (any trailing `*` acts as a prefix match) and exact values.
	///
	/// # Examples
	///
	/// ```
	/// use conneg::Acceptable;
	///
	/// assert!(Acceptable::new("*").matches("gzip"));
	/// assert!(Acceptable::new("*/*").matches("application/json"));
	/// assert!(!Acceptable::new("*/*").matches("gzip"));
	/// assert!(Acceptable::new("text/*").matches("text/plain"));
	/// assert!(!Acceptable::new("text/*").matches("application/json"));
	/// assert!(Acceptable::new("text/html").matches("text/html"));
	/// ```
	pub fn matches(&self, offer: &str) -> bool {
		match self.value.as_str() {
			"*" => true,
			"*/*" => offer.contains('/'),
			pattern => match pattern.strip_suffix('*') {
				Some(prefix) => offer.starts_with(prefix),
				None => offer == pattern,
			},
		}
	}
}

/// Parses a single acceptable value, as laid out in an `Accept`-family header
///
/// # Examples
///
/// ```
/// use conneg::parse_acceptable;
///
/// let acc = parse_acceptable("text/html;level=1;q=0.9").unwrap();
/// assert_eq!(acc.value, "text/html");
/// assert_eq!(acc.quality.millis(), 900);
/// assert_eq!(acc.params["level"], "1");
/// assert!(!acc.params.contains_key("q"));
///
/// assert!(parse_acceptable("gzip;q=abc").is_err());
/// assert!(parse_acceptable("gzip;q=1.5").is_err());
/// ```
pub fn parse_acceptable(input: &str) -> Result<Acceptable> {
	let ParsedToken { value, mut params } = parse_token(input)?;

	let quality = match params.remove("q") {
		Some(raw) => parse_quality(&raw)?,
		None => Quality::ONE,
	};

	Ok(Acceptable {
		value,
		quality,
		params,
	})
}

fn parse_quality(raw: &str) -> Result<Quality> {
	let parsed: f32 = raw.trim().parse().map_err(|source| ParseError::QualityParse {
		value: raw.to_string(),
		source,
	})?;

	Quality::from_f32(parsed).ok_or_else(|| ParseError::QualityRange {
		value: raw.to_string(),
	})
}

impl FromStr for Acceptable {
	type Err = ParseError;

	fn from_str(s: &str) -> Result<Self> {
		parse_acceptable(s)
	}
}

/// Whether a parameter value can be written without quotes
fn is_token(value: &str) -> bool {
	!value.is_empty()
		&& value
			.chars()
			.all(|c| c.is_ascii_graphic() && !"()<>@,;:\\\"/[]?=".contains(c))
}

impl fmt::Display for Acceptable {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.value)?;
		if self.quality != Quality::ONE {
			write!(f, ";q={}", self.quality)?;
		}
		for (name, value) in &self.params {
			if is_token(value) {
				write!(f, ";{name}={value}")?;
			} else {
				let escaped = value.replace('\\', "\\\\").replace('"', "\\\"");
				write!(f, ";{name}=\"{escaped}\"")?;
			}
		}
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::error::TokenError;
	use rstest::rstest;

	fn q(millis: u16) -> Quality {
		Quality::from_millis(millis).unwrap()
	}

	#[rstest]
	fn test_parse_defaults_quality_to_one() {
		let acc = parse_acceptable("application/json").unwrap();
		assert_eq!(acc, Acceptable::new("application/json"));
	}

	#[rstest]
	#[case("gzip;q=0", 0)]
	#[case("gzip;q=0.5", 500)]
	#[case("gzip; q=0.125", 125)]
	#[case("gzip;Q=1", 1000)]
	#[case("gzip;q=1.000", 1000)]
	fn test_parse_extracts_quality(#[case] input: &str, #[case] millis: u16) {
		// Act
		let acc = parse_acceptable(input).unwrap();

		// Assert
		assert_eq!(acc.value, "gzip");
		assert_eq!(acc.quality, q(millis));
		assert!(acc.params.is_empty());
	}

	#[rstest]
	#[case("gzip;q=abc")]
	#[case("gzip;q=\"\"")]
	fn test_parse_rejects_non_numeric_quality(#[case] input: &str) {
		let result = parse_acceptable(input);
		assert!(
			matches!(result, Err(ParseError::QualityParse { .. })),
			"expected quality parse error for {input}, got {result:?}"
		);
	}

	#[rstest]
	#[case("gzip;q=1.5")]
	#[case("gzip;q=-0.1")]
	#[case("gzip;q=inf")]
	#[case("gzip;q=NaN")]
	fn test_parse_rejects_out_of_range_quality(#[case] input: &str) {
		let result = parse_acceptable(input);
		assert!(
			matches!(result, Err(ParseError::QualityRange { .. })),
			"expected quality range error for {input}, got {result:?}"
		);
	}

	#[rstest]
	fn test_parse_propagates_token_errors() {
		let result = parse_acceptable("text/");
		assert_eq!(
			result,
			Err(ParseError::Token(TokenError::InvalidValue(
				"text/".to_string()
			)))
		);
	}

	#[rstest]
	fn test_parse_keeps_other_parameters() {
		// Act
		let acc = parse_acceptable("text/html; level=1; charset=utf-8; q=0.7").unwrap();

		// Assert
		assert_eq!(acc.quality, q(700));
		assert_eq!(acc.params.len(), 2);
		assert_eq!(acc.params["level"], "1");
		assert_eq!(acc.params["charset"], "utf-8");
	}

	#[rstest]
	#[case("*", 1)]
	#[case("*/*", 2)]
	#[case("text/*", 1)]
	#[case("text/html", 0)]
	fn test_wildcards(#[case] value: &str, #[case] expected: usize) {
		assert_eq!(Acceptable::new(value).wildcards(), expected);
	}

	#[rstest]
	#[case("*", "identity", true)]
	#[case("*", "text/plain", true)]
	#[case("*/*", "text/plain", true)]
	#[case("*/*", "identity", false)]
	#[case("text/*", "text/html", true)]
	#[case("text/*", "textile", false)]
	#[case("text/*", "application/json", false)]
	#[case("en*", "en-us", true)]
	#[case("gzip", "gzip", true)]
	#[case("gzip", "x-gzip", false)]
	#[case("text/html", "text/html;level=1", false)]
	fn test_matches(#[case] pattern: &str, #[case] offer: &str, #[case] expected: bool) {
		assert_eq!(Acceptable::new(pattern).matches(offer), expected);
	}

	#[rstest]
	#[case(Acceptable::new("text/html"), "text/html")]
	#[case(Acceptable::new("gzip").with_quality(q(500)), "gzip;q=0.5")]
	#[case(Acceptable::new("identity").with_quality(Quality::ZERO), "identity;q=0")]
	#[case(
		Acceptable::new("text/html").with_quality(q(250)).with_param("level", "1"),
		"text/html;q=0.25;level=1"
	)]
	#[case(
		Acceptable::new("text/plain").with_param("format", "a b"),
		"text/plain;format=\"a b\""
	)]
	#[case(
		Acceptable::new("text/plain").with_param("b", "2").with_param("a", "1"),
		"text/plain;a=1;b=2"
	)]
	fn test_display(#[case] acc: Acceptable, #[case] expected: &str) {
		assert_eq!(acc.to_string(), expected);
	}

	#[rstest]
	fn test_with_param_ignores_quality() {
		let acc = Acceptable::new("gzip").with_param("Q", "0.1");
		assert!(acc.params.is_empty());
		assert_eq!(acc.quality, Quality::ONE);
	}

	#[rstest]
	fn test_from_str() {
		let acc: Acceptable = "text/*;q=0.3".parse().unwrap();
		assert_eq!(acc, Acceptable::new("text/*").with_quality(q(300)));
	}
}
