//! # Diff Engine
//!
//! Field-by-field comparison of desired parameters against an observed remote
//! object. Fields are checked in the order the caller chains them and the
//! comparison stops at the first drift.
//!
//! Normalization rules:
//! - an absent string equals the empty string
//! - an unset toggle equals `false`
//! - lists compare as multisets, order-insensitive

use crate::crd::Toggle;
use tracing::debug;

/// Short-circuiting comparison builder
///
/// ```
/// use zpa_provider::controller::diff::Comparison;
/// use zpa_provider::crd::Toggle;
///
/// let up_to_date = Comparison::new("ApplicationSegment")
///     .toggle("enabled", Toggle::True, true)
///     .set(
///         "domainNames",
///         &["a.com".to_string(), "b.com".to_string()],
///         &["b.com".to_string(), "a.com".to_string()],
///     )
///     .finish();
/// assert!(up_to_date);
/// ```
#[derive(Debug, Clone)]
#[must_use]
pub struct Comparison {
    kind: &'static str,
    drift: Option<&'static str>,
}

impl Comparison {
    pub fn new(kind: &'static str) -> Self {
        Self { kind, drift: None }
    }

    pub fn string(self, field: &'static str, desired: Option<&str>, observed: Option<&str>) -> Self {
        self.check(field, || desired.unwrap_or_default() == observed.unwrap_or_default())
    }

    pub fn toggle(self, field: &'static str, desired: Toggle, observed: bool) -> Self {
        self.check(field, || desired.value() == observed)
    }

    pub fn flag(self, field: &'static str, desired: bool, observed: bool) -> Self {
        self.check(field, || desired == observed)
    }

    pub fn set(self, field: &'static str, desired: &[String], observed: &[String]) -> Self {
        self.check(field, || same_elements(desired, observed))
    }

    /// Name of the first field that differs, if any
    pub fn first_drift(&self) -> Option<&'static str> {
        self.drift
    }

    /// True when no field drifted
    pub fn finish(self) -> bool {
        match self.drift {
            Some(field) => {
                debug!("{} is not up to date: {} differs", self.kind, field);
                false
            }
            None => true,
        }
    }

    fn check(mut self, field: &'static str, equal: impl FnOnce() -> bool) -> Self {
        if self.drift.is_none() && !equal() {
            self.drift = Some(field);
        }
        self
    }
}

/// Multiset equality of two string lists
pub fn same_elements(a: &[String], b: &[String]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut a: Vec<&str> = a.iter().map(String::as_str).collect();
    let mut b: Vec<&str> = b.iter().map(String::as_str).collect();
    a.sort_unstable();
    b.sort_unstable();
    a == b
}
