//! Content negotiation against server-side offers

use serde::{Deserialize, Serialize};

use crate::acceptable::Acceptable;
use crate::header::{HeaderSource, parse_accept_header};
use crate::precedence::sort_by_precedence;
use crate::quality::Quality;

const IDENTITY: &str = "identity";

/// The semantic family of an `Accept`-family header.
///
/// Decides what a request that omits the header is assumed to accept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HeaderFamily {
	/// `Accept`: media types, defaulting to `*/*`
	MediaType,
	/// `Accept-Encoding`: content codings, defaulting to `*`.
	///
	/// The `identity` coding stays acceptable at the lowest precedence unless
	/// the header refuses it with `identity;q=0`, or with `*;q=0` without
	/// naming `identity` (RFC 7231 §5.3.4).
	Encoding,
	/// `Accept-Language`, `Accept-Charset` and other headers: defaulting to `*`
	Other,
}

impl HeaderFamily {
	/// The value assumed when the header is absent
	///
	/// # Examples
	///
	/// ```
	/// use conneg::HeaderFamily;
	///
	/// assert_eq!(HeaderFamily::MediaType.default_value(), "*/*");
	/// assert_eq!(HeaderFamily::Encoding.default_value(), "*");
	/// assert_eq!(HeaderFamily::Other.default_value(), "*");
	/// ```
	pub const fn default_value(self) -> &'static str {
		match self {
			HeaderFamily::MediaType => "*/*",
			HeaderFamily::Encoding | HeaderFamily::Other => "*",
		}
	}
}

/// How values with a quality factor of 0 take part in matching
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ZeroQuality {
	/// Zero-quality values sort last but may still match an offer
	#[default]
	Match,
	/// Zero-quality values never match, and an offer named exactly by one of
	/// them is refused even when a wildcard would otherwise accept it.
	///
	/// Only entries without parameters refuse an offer: `text/html;level=1;q=0`
	/// says nothing about plain `text/html`.
	Exclude,
}

/// Negotiation settings
///
/// # Examples
///
/// ```
/// use conneg::{NegotiationConfig, ZeroQuality};
///
/// let config: NegotiationConfig = serde_json::from_str(r#"{"zero_quality": "exclude"}"#).unwrap();
/// assert_eq!(config.zero_quality, ZeroQuality::Exclude);
///
/// let defaults: NegotiationConfig = serde_json::from_str("{}").unwrap();
/// assert_eq!(defaults, NegotiationConfig::default());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NegotiationConfig {
	pub zero_quality: ZeroQuality,
}

/// The outcome of a successful negotiation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Negotiated<'o> {
	/// The selected offer, borrowed from the caller's offers
	pub offer: &'o str,
	/// The acceptable value the offer matched
	pub acceptable: Acceptable,
}

/// Selects representations according to a request's `Accept`-family headers.
///
/// The best offer is the first matching offer, in the caller's order, when
/// walking the acceptable values from highest to lowest precedence.
#[derive(Debug, Clone, Default)]
pub struct Negotiator {
	config: NegotiationConfig,
}

impl Negotiator {
	/// Creates a negotiator with the default configuration
	pub fn new() -> Self {
		Self::default()
	}

	/// Creates a negotiator with a custom configuration
	///
	/// # Examples
	///
	/// ```
	/// use conneg::{HeaderFamily, NegotiationConfig, Negotiator, ZeroQuality};
	///
	/// let strict = Negotiator::with_config(NegotiationConfig {
	///     zero_quality: ZeroQuality::Exclude,
	/// });
	/// let headers = [("Accept-Language", "en, fr;q=0")];
	///
	/// let lenient = Negotiator::new().negotiate(&headers, "Accept-Language", HeaderFamily::Other, &["fr"]);
	/// assert_eq!(lenient.unwrap().offer, "fr");
	///
	/// let result = strict.negotiate(&headers, "Accept-Language", HeaderFamily::Other, &["fr"]);
	/// assert!(result.is_none());
	/// ```
	pub fn with_config(config: NegotiationConfig) -> Self {
		Self { config }
	}

	pub fn config(&self) -> &NegotiationConfig {
		&self.config
	}

	/// Returns the request's acceptable values for a header, sorted by
	/// precedence, substituting the family default when the header is
	/// absent.
	///
	/// A header that is present but blank is not absent: it names nothing,
	/// so only the implicit `identity` coding of the `Encoding` family
	/// remains acceptable.
	pub fn preferences<H>(&self, headers: &H, name: &str, family: HeaderFamily) -> Vec<Acceptable>
	where
		H: HeaderSource + ?Sized,
	{
		self.preferences_from_values(&headers.header_values(name), family)
	}

	/// Negotiates the best offer for the header `name`.
	///
	/// Returns `None` when no offer is acceptable, which callers usually
	/// answer with `406 Not Acceptable`.
	///
	/// # Examples
	///
	/// ```
	/// use conneg::{HeaderFamily, Negotiator};
	///
	/// let negotiator = Negotiator::new();
	/// let headers = [("Accept", "text/plain;q=0.1, application/json")];
	///
	/// let result = negotiator
	///     .negotiate(&headers, "Accept", HeaderFamily::MediaType, &["text/plain", "application/json"])
	///     .unwrap();
	/// assert_eq!(result.offer, "application/json");
	/// assert_eq!(result.acceptable.value, "application/json");
	/// ```
	pub fn negotiate<'o, H, S>(
		&self,
		headers: &H,
		name: &str,
		family: HeaderFamily,
		offers: &'o [S],
	) -> Option<Negotiated<'o>>
	where
		H: HeaderSource + ?Sized,
		S: AsRef<str>,
	{
		let negotiated = self.negotiate_values(&headers.header_values(name), family, offers);
		tracing::trace!(
			header = name,
			offer = ?negotiated.as_ref().map(|n| n.offer),
			"content negotiated"
		);
		negotiated
	}

	/// Negotiates the best offer from raw header values
	///
	/// # Examples
	///
	/// ```
	/// use conneg::{HeaderFamily, Negotiator};
	///
	/// let negotiator = Negotiator::new();
	/// let result = negotiator.negotiate_values(&["gzip"], HeaderFamily::Encoding, &["identity", "gzip"]);
	/// assert_eq!(result.unwrap().offer, "gzip");
	///
	/// // identity stays acceptable unless refused
	/// let result = negotiator.negotiate_values(&["gzip"], HeaderFamily::Encoding, &["identity"]);
	/// assert_eq!(result.unwrap().offer, "identity");
	/// ```
	pub fn negotiate_values<'o, V, S>(
		&self,
		values: &[V],
		family: HeaderFamily,
		offers: &'o [S],
	) -> Option<Negotiated<'o>>
	where
		V: AsRef<str>,
		S: AsRef<str>,
	{
		let preferences = self.preferences_from_values(values, family);
		self.matches(&preferences, family, offers)
			.next()
			.map(|(acceptable, offer)| Negotiated {
				offer,
				acceptable: acceptable.clone(),
			})
	}

	/// Returns every acceptable offer, best first.
	///
	/// Offers are ordered by the highest-precedence value they match, then by
	/// the caller's order. Each offer appears at most once.
	///
	/// # Examples
	///
	/// ```
	/// use conneg::{HeaderFamily, Negotiator};
	///
	/// let negotiator = Negotiator::new();
	/// let headers = [("Accept-Language", "fr;q=0.5, en, *;q=0.1")];
	///
	/// let ranked = negotiator.rank(&headers, "Accept-Language", HeaderFamily::Other, &["de", "fr", "en"]);
	/// let offers: Vec<&str> = ranked.iter().map(|n| n.offer).collect();
	/// assert_eq!(offers, ["en", "fr", "de"]);
	/// ```
	pub fn rank<'o, H, S>(
		&self,
		headers: &H,
		name: &str,
		family: HeaderFamily,
		offers: &'o [S],
	) -> Vec<Negotiated<'o>>
	where
		H: HeaderSource + ?Sized,
		S: AsRef<str>,
	{
		let preferences = self.preferences(headers, name, family);

		let mut ranked: Vec<Negotiated<'o>> = Vec::new();
		for (acceptable, offer) in self.matches(&preferences, family, offers) {
			if !ranked.iter().any(|n| n.offer == offer) {
				ranked.push(Negotiated {
					offer,
					acceptable: acceptable.clone(),
				});
			}
		}
		ranked
	}

	fn preferences_from_values<V: AsRef<str>>(
		&self,
		values: &[V],
		family: HeaderFamily,
	) -> Vec<Acceptable> {
		let mut preferences = if values.is_empty() {
			tracing::trace!(default = family.default_value(), "header absent, using default");
			parse_accept_header([family.default_value()])
		} else {
			parse_accept_header(values)
		};

		if family == HeaderFamily::Encoding
			&& !preferences
				.iter()
				.any(|p| p.value == IDENTITY || p.value == "*")
		{
			preferences.push(Acceptable::new(IDENTITY).with_quality(Quality::LOWEST));
			sort_by_precedence(&mut preferences);
		}
		preferences
	}

	/// Walks preferences in precedence order and, for each, the offers in
	/// the caller's order, yielding every matching pair.
	fn matches<'p, 'o, S: AsRef<str>>(
		&self,
		preferences: &'p [Acceptable],
		family: HeaderFamily,
		offers: &'o [S],
	) -> impl Iterator<Item = (&'p Acceptable, &'o str)> {
		let exclude_zero = self.config.zero_quality == ZeroQuality::Exclude;

		let mut vetoed: Vec<&'p str> = Vec::new();
		if exclude_zero {
			vetoed.extend(
				preferences
					.iter()
					.filter(|p| {
						p.quality.is_zero() && p.wildcards() == 0 && p.params.is_empty()
					})
					.map(|p| p.value.as_str()),
			);
		}
		if family == HeaderFamily::Encoding && identity_refused(preferences) {
			vetoed.push(IDENTITY);
		}

		preferences
			.iter()
			.filter(move |p| !(exclude_zero && p.quality.is_zero()))
			.flat_map(move |p| {
				offers
					.iter()
					.map(|offer| offer.as_ref())
					.filter(move |offer| p.matches(offer))
					.map(move |offer| (p, offer))
			})
			.filter(move |(_, offer)| !vetoed.iter().any(|v| v == offer))
	}
}

/// Whether an `Accept-Encoding` header refuses the identity coding
fn identity_refused(preferences: &[Acceptable]) -> bool {
	match preferences.iter().find(|p| p.value == IDENTITY) {
		Some(identity) => identity.quality.is_zero(),
		None => preferences
			.iter()
			.any(|p| p.value == "*" && p.quality.is_zero()),
	}
}

/// Negotiates the best offer for the header `name` with the default
/// configuration.
///
/// # Examples
///
/// ```
/// use conneg::{HeaderFamily, negotiate_content};
///
/// let headers = [("Accept", "application/json, text/*;q=0.5, */*;q=0.1")];
/// let offers = ["text/plain", "application/json"];
///
/// let result = negotiate_content(&headers, "Accept", HeaderFamily::MediaType, &offers);
/// assert_eq!(result.unwrap().offer, "application/json");
///
/// let html_only = [("Accept", "text/html")];
/// assert!(negotiate_content(&html_only, "Accept", HeaderFamily::MediaType, &offers).is_none());
/// ```
pub fn negotiate_content<'o, H, S>(
	headers: &H,
	name: &str,
	family: HeaderFamily,
	offers: &'o [S],
) -> Option<Negotiated<'o>>
where
	H: HeaderSource + ?Sized,
	S: AsRef<str>,
{
	Negotiator::new().negotiate(headers, name, family, offers)
}
