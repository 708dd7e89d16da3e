//! Error types for header token and acceptable-value parsing

use std::num::ParseFloatError;

/// Result type for parsing operations
pub type Result<T, E = ParseError> = std::result::Result<T, E>;

/// Errors raised while splitting a header token into a value and its parameters
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TokenError {
	#[error("Header token is empty")]
	Empty,

	#[error("Invalid value in header token: '{0}'")]
	InvalidValue(String),

	#[error("Invalid parameter in header token: '{0}'")]
	InvalidParameter(String),

	#[error("Duplicate parameter in header token: '{0}'")]
	DuplicateParameter(String),
}

/// Errors raised while parsing a single acceptable value
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ParseError {
	/// The token itself is malformed
	#[error(transparent)]
	Token(#[from] TokenError),

	/// The `q` parameter is not a number
	#[error("Parsing quality factor '{value}': {source}")]
	QualityParse {
		value: String,
		#[source]
		source: ParseFloatError,
	},

	/// The `q` parameter is a number outside of `[0, 1]`
	#[error("Parsing quality factor: '{value}' is not between 0 and 1")]
	QualityRange { value: String },
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	fn test_token_error_converts_into_parse_error() {
		// Arrange
		let err = TokenError::InvalidValue("text/".to_string());

		// Act
		let parse_err: ParseError = err.clone().into();

		// Assert
		assert_eq!(parse_err, ParseError::Token(err));
		assert_eq!(
			parse_err.to_string(),
			"Invalid value in header token: 'text/'"
		);
	}

	#[rstest]
	fn test_quality_range_message() {
		let err = ParseError::QualityRange {
			value: "1.5".to_string(),
		};
		assert_eq!(
			err.to_string(),
			"Parsing quality factor: '1.5' is not between 0 and 1"
		);
	}
}
