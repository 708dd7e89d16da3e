//! Header token parsing using nom parser combinators
//!
//! Splits one comma-free segment of an `Accept`-family header, such as
//! `text/html; level=1; q=0.9`, into its base value and a map of parameters.
//! The grammar follows the media-type syntax of RFC 2045, relaxed so that a
//! bare token (`gzip`, `en-US`, `*`) is accepted as a value on its own.

use std::collections::BTreeMap;
use std::collections::btree_map::Entry;

use nom::{
	IResult, Parser,
	branch::alt,
	bytes::complete::{escaped_transform, is_not, take_while1},
	character::complete::{anychar, char, space0},
	combinator::{map, opt, recognize},
	sequence::{delimited, pair, preceded, separated_pair},
};

use crate::error::TokenError;

/// Characters that may not appear inside an RFC 2045 token
const TSPECIALS: &str = "()<>@,;:\\\"/[]?=";

/// A header token split into its base value and parameters
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedToken {
	/// Lower-cased base value (e.g. `text/html`, `gzip`, `*`)
	pub value: String,
	/// Parameters keyed by lower-cased name
	pub params: BTreeMap<String, String>,
}

// ============================================================================
// Nom Parsers
// ============================================================================

fn is_token_char(c: char) -> bool {
	c.is_ascii() && !c.is_ascii_control() && c != ' ' && !TSPECIALS.contains(c)
}

/// Parse a single token
fn token(input: &str) -> IResult<&str, &str> {
	take_while1(is_token_char).parse(input)
}

/// Parse the base value: `token` or `token/token`
fn base_value(input: &str) -> IResult<&str, &str> {
	recognize(pair(token, opt(pair(char('/'), token)))).parse(input)
}

/// Parse a quoted string, resolving backslash escapes
fn quoted_string(input: &str) -> IResult<&str, String> {
	delimited(
		char('"'),
		map(
			opt(escaped_transform(is_not("\\\""), '\\', anychar)),
			Option::unwrap_or_default,
		),
		char('"'),
	)
	.parse(input)
}

/// Parse one `; name=value` parameter
fn parameter(input: &str) -> IResult<&str, (&str, String)> {
	preceded(
		(space0, char(';'), space0),
		separated_pair(
			token,
			(space0, char('='), space0),
			alt((quoted_string, map(token, |s: &str| s.to_string()))),
		),
	)
	.parse(input)
}

// ============================================================================
// Public API
// ============================================================================

/// Parses a header token into its base value and parameters.
///
/// The base value and parameter names are lower-cased; parameter values are
/// kept verbatim. A trailing `;` is ignored.
///
/// # Examples
///
/// ```
/// use conneg::token::parse_token;
///
/// let token = parse_token("text/html; level=1; q=0.9").unwrap();
/// assert_eq!(token.value, "text/html");
/// assert_eq!(token.params["level"], "1");
/// assert_eq!(token.params["q"], "0.9");
///
/// let bare = parse_token("gzip").unwrap();
/// assert_eq!(bare.value, "gzip");
/// assert!(bare.params.is_empty());
///
/// assert!(parse_token("text/").is_err());
/// ```
pub fn parse_token(input: &str) -> Result<ParsedToken, TokenError> {
	let input = input.trim();
	if input.is_empty() {
		return Err(TokenError::Empty);
	}

	let (mut rest, value) =
		base_value(input).map_err(|_| TokenError::InvalidValue(input.to_string()))?;
	if !rest.trim_start().is_empty() && !rest.trim_start().starts_with(';') {
		return Err(TokenError::InvalidValue(input.to_string()));
	}

	let mut params = BTreeMap::new();
	loop {
		let remaining = rest.trim();
		if remaining.is_empty() || remaining == ";" {
			break;
		}

		let (next, (name, param_value)) =
			parameter(rest).map_err(|_| TokenError::InvalidParameter(remaining.to_string()))?;
		match params.entry(name.to_ascii_lowercase()) {
			Entry::Occupied(entry) => {
				return Err(TokenError::DuplicateParameter(entry.key().clone()));
			}
			Entry::Vacant(entry) => {
				entry.insert(param_value);
			}
		}
		rest = next;
	}

	Ok(ParsedToken {
		value: value.to_ascii_lowercase(),
		params,
	})
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	#[case("text/html", "text/html")]
	#[case("TEXT/HTML", "text/html")]
	#[case("  application/json  ", "application/json")]
	#[case("*/*", "*/*")]
	#[case("text/*", "text/*")]
	#[case("*", "*")]
	#[case("gzip", "gzip")]
	#[case("en-US", "en-us")]
	#[case("iso-8859-1", "iso-8859-1")]
	fn test_parse_token_values(#[case] input: &str, #[case] expected: &str) {
		// Act
		let token = parse_token(input).unwrap();

		// Assert
		assert_eq!(token.value, expected);
		assert!(token.params.is_empty());
	}

	#[rstest]
	fn test_parse_token_parameters() {
		// Act
		let token = parse_token("text/html;level=1 ; q = 0.9").unwrap();

		// Assert
		assert_eq!(token.value, "text/html");
		assert_eq!(token.params.len(), 2);
		assert_eq!(token.params["level"], "1");
		assert_eq!(token.params["q"], "0.9");
	}

	#[rstest]
	fn test_parse_token_lowercases_parameter_names_only() {
		let token = parse_token("text/plain; Charset=UTF-8").unwrap();
		assert_eq!(token.params["charset"], "UTF-8");
	}

	#[rstest]
	#[case(r#"text/plain; format="flowed""#, "flowed")]
	#[case(r#"text/plain; format="a;b,c""#, "a;b,c")]
	#[case(r#"text/plain; format="say \"hi\"""#, r#"say "hi""#)]
	#[case(r#"text/plain; format="""#, "")]
	#[case(r#"text/plain; format="a\\b""#, r"a\b")]
	fn test_parse_token_quoted_values(#[case] input: &str, #[case] expected: &str) {
		let token = parse_token(input).unwrap();
		assert_eq!(token.params["format"], expected);
	}

	#[rstest]
	fn test_parse_token_ignores_trailing_semicolon() {
		let token = parse_token("text/html;").unwrap();
		assert_eq!(token.value, "text/html");
		assert!(token.params.is_empty());
	}

	#[rstest]
	#[case("", TokenError::Empty)]
	#[case("   ", TokenError::Empty)]
	#[case("text/", TokenError::InvalidValue("text/".to_string()))]
	#[case("/html", TokenError::InvalidValue("/html".to_string()))]
	#[case("text/html/x", TokenError::InvalidValue("text/html/x".to_string()))]
	#[case("te xt", TokenError::InvalidValue("te xt".to_string()))]
	#[case("text/html;level", TokenError::InvalidParameter(";level".to_string()))]
	#[case("text/html;=1", TokenError::InvalidParameter(";=1".to_string()))]
	#[case(r#"text/html;a="open"#, TokenError::InvalidParameter(r#";a="open"#.to_string()))]
	#[case(r#"text/html;a="x\"#, TokenError::InvalidParameter(r#";a="x\"#.to_string()))]
	#[case("text/html;a=1;A=2", TokenError::DuplicateParameter("a".to_string()))]
	fn test_parse_token_rejects_malformed(#[case] input: &str, #[case] expected: TokenError) {
		// Act
		let result = parse_token(input);

		// Assert
		assert_eq!(result, Err(expected));
	}
}
