//! Precedence ordering of acceptable values

use std::cmp::Ordering;

use crate::acceptable::Acceptable;

/// Compares two acceptable values by precedence.
///
/// `Ordering::Less` means `lhs` is preferred over `rhs`. The rules apply in
/// turn until one of them decides:
///
/// 1. the higher quality factor wins;
/// 2. the value with fewer wildcards (the more specific one) wins;
/// 3. the value with more parameters wins.
///
/// Qualities are compared exactly at the three-digit precision of a qvalue,
/// so `0.501` outranks `0.5`. Treating values within 0.001 of each other as
/// equal would make the ordering intransitive.
///
/// For instance, given the following header:
///
/// ```text
/// Accept: text/*, text/html, text/html;level=1, */*
/// ```
///
/// The types have the following precedence:
///
/// 1. `text/html;level=1`
/// 2. `text/html`
/// 3. `text/*`
/// 4. `*/*`
///
/// # Examples
///
/// ```
/// use std::cmp::Ordering;
/// use conneg::{Acceptable, compare_precedence};
///
/// let specific = Acceptable::new("text/html");
/// let wildcard = Acceptable::new("text/*");
/// assert_eq!(compare_precedence(&specific, &wildcard), Ordering::Less);
///
/// let mut values = vec![wildcard.clone(), specific.clone()];
/// values.sort_by(compare_precedence);
/// assert_eq!(values, vec![specific, wildcard]);
/// ```
pub fn compare_precedence(lhs: &Acceptable, rhs: &Acceptable) -> Ordering {
	rhs.quality
		.cmp(&lhs.quality)
		.then_with(|| lhs.wildcards().cmp(&rhs.wildcards()))
		.then_with(|| rhs.params.len().cmp(&lhs.params.len()))
}

/// Sorts acceptable values from most to least preferred
pub fn sort_by_precedence(values: &mut [Acceptable]) {
	values.sort_by(compare_precedence);
}
