//! # Conneg
//!
//! HTTP content negotiation as laid out in RFC 2616 §14.1.
//!
//! Parses `Accept`, `Accept-Encoding`, `Accept-Language` and `Accept-Charset`
//! header values into acceptable values ordered by precedence, and selects
//! the best matching representation among the ones a server can produce.
//! All four headers reduce to the same structure: a value that may contain
//! `*` wildcards, a quality factor, and optional parameters.
//!
//! ## Examples
//!
//! ```
//! use conneg::{HeaderFamily, negotiate_content};
//! use http::{HeaderMap, HeaderValue, header::ACCEPT};
//!
//! let mut headers = HeaderMap::new();
//! headers.insert(ACCEPT, HeaderValue::from_static("text/plain;q=0.1, application/json"));
//!
//! let offers = ["text/plain", "application/json"];
//! match negotiate_content(&headers, "Accept", HeaderFamily::MediaType, &offers) {
//!     Some(negotiated) => assert_eq!(negotiated.offer, "application/json"),
//!     None => unreachable!("respond with 406 Not Acceptable"),
//! }
//! ```
//!
//! ## Zero quality
//!
//! By default a value with `q=0` only sorts last; it is not treated as a veto
//! and can still match when nothing else does. Use
//! [`ZeroQuality::Exclude`] for the stricter reading of the RFC.

pub mod acceptable;
pub mod error;
pub mod header;
pub mod negotiator;
pub mod precedence;
pub mod quality;
pub mod token;

pub use acceptable::{Acceptable, parse_acceptable};
pub use error::{ParseError, Result, TokenError};
pub use header::{HeaderSource, accepted, parse_accept_header, parse_tokens};
pub use negotiator::{
	HeaderFamily, Negotiated, NegotiationConfig, Negotiator, ZeroQuality, negotiate_content,
};
pub use precedence::{compare_precedence, sort_by_precedence};
pub use quality::Quality;
