//! Header sources and `Accept`-family header list parsing

use std::collections::HashMap;

use http::HeaderMap;

use crate::acceptable::{Acceptable, parse_acceptable};
use crate::error::Result;
use crate::precedence::sort_by_precedence;

/// A collection of request headers that can be queried by name.
///
/// Implementations return every value registered under `name`, in the order
/// the header lines were received. Name lookup is case-insensitive.
pub trait HeaderSource {
	fn header_values(&self, name: &str) -> Vec<&str>;
}

impl HeaderSource for HeaderMap {
	fn header_values(&self, name: &str) -> Vec<&str> {
		self.get_all(name)
			.iter()
			.filter_map(|value| match value.to_str() {
				Ok(value) => Some(value),
				Err(_) => {
					tracing::trace!(header = name, "skipping header value with opaque bytes");
					None
				}
			})
			.collect()
	}
}

impl<K: AsRef<str>, V: AsRef<str>> HeaderSource for [(K, V)] {
	fn header_values(&self, name: &str) -> Vec<&str> {
		self.iter()
			.filter(|(key, _)| key.as_ref().eq_ignore_ascii_case(name))
			.map(|(_, value)| value.as_ref())
			.collect()
	}
}

impl<K: AsRef<str>, V: AsRef<str>, const N: usize> HeaderSource for [(K, V); N] {
	fn header_values(&self, name: &str) -> Vec<&str> {
		self.as_slice().header_values(name)
	}
}

/// A map cannot record the order of lines stored under keys differing only
/// in case. The exact key's lines come first, followed by the other
/// spellings in ascending key order.
impl HeaderSource for HashMap<String, Vec<String>> {
	fn header_values(&self, name: &str) -> Vec<&str> {
		let mut keys: Vec<&String> = self
			.keys()
			.filter(|key| key.eq_ignore_ascii_case(name))
			.collect();
		keys.sort_by(|a, b| (*a != name).cmp(&(*b != name)).then_with(|| a.cmp(b)));

		keys.into_iter()
			.flat_map(|key| self[key].iter().map(String::as_str))
			.collect()
	}
}

/// Parses every comma-separated token of every header line.
///
/// Failures are kept in the output so callers can decide what to do with
/// them; see [`accepted`] for the lenient policy.
///
/// # Examples
///
/// ```
/// use conneg::parse_tokens;
///
/// let results: Vec<_> = parse_tokens(["gzip, br;q=2", "deflate"]).collect();
/// assert_eq!(results.len(), 3);
/// assert!(results[0].is_ok());
/// assert!(results[1].is_err());
/// assert!(results[2].is_ok());
/// ```
pub fn parse_tokens<I, S>(values: I) -> impl Iterator<Item = Result<Acceptable>>
where
	I: IntoIterator<Item = S>,
	S: AsRef<str>,
{
	values.into_iter().flat_map(|line| {
		line.as_ref()
			.split(',')
			.map(parse_acceptable)
			.collect::<Vec<_>>()
	})
}

/// Keeps the successfully parsed values, dropping every failure.
///
/// A single malformed preference must not make a whole header unusable, so
/// errors are only logged.
pub fn accepted<I>(results: I) -> impl Iterator<Item = Acceptable>
where
	I: IntoIterator<Item = Result<Acceptable>>,
{
	results.into_iter().filter_map(|result| match result {
		Ok(acceptable) => Some(acceptable),
		Err(error) => {
			tracing::debug!(%error, "dropping unparseable acceptable value");
			None
		}
	})
}

/// Parses header lines into acceptable values sorted by precedence.
///
/// Any unparseable value is silently dropped.
///
/// # Examples
///
/// ```
/// use conneg::parse_accept_header;
///
/// let values = parse_accept_header(["text/*, text/html", "text/html;level=1, */*, bogus/"]);
/// let rendered: Vec<String> = values.iter().map(ToString::to_string).collect();
/// assert_eq!(rendered, ["text/html;level=1", "text/html", "text/*", "*/*"]);
/// ```
pub fn parse_accept_header<I, S>(values: I) -> Vec<Acceptable>
where
	I: IntoIterator<Item = S>,
	S: AsRef<str>,
{
	let mut acceptables: Vec<Acceptable> = accepted(parse_tokens(values)).collect();
	sort_by_precedence(&mut acceptables);
	acceptables
}
