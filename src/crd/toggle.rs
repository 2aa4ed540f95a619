//! # Toggle
//!
//! Three-valued flag for desired-state booleans.
//!
//! A caller may leave a flag out entirely, in which case late-initialization
//! adopts whatever the remote API chose. On the wire a toggle is an optional
//! boolean: `null`/absent is [`Toggle::Unset`].

use serde::{Deserialize, Serialize};

/// Optional boolean in desired state
///
/// Fields of this type carry `#[schemars(with = "Option<bool>")]` so the
/// generated CRD schema stays a plain nullable boolean.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "Option<bool>", into = "Option<bool>")]
pub enum Toggle {
    /// Not specified by the caller
    #[default]
    Unset,
    False,
    True,
}

impl Toggle {
    pub fn is_unset(&self) -> bool {
        matches!(self, Self::Unset)
    }

    /// Value used for comparisons and payloads; unset reads as `false`.
    pub fn value(self) -> bool {
        matches!(self, Self::True)
    }
}

impl From<bool> for Toggle {
    fn from(value: bool) -> Self {
        if value {
            Self::True
        } else {
            Self::False
        }
    }
}

impl From<Option<bool>> for Toggle {
    fn from(value: Option<bool>) -> Self {
        value.map_or(Self::Unset, Self::from)
    }
}

impl From<Toggle> for Option<bool> {
    fn from(value: Toggle) -> Self {
        match value {
            Toggle::Unset => None,
            Toggle::False => Some(false),
            Toggle::True => Some(true),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, Serialize, Deserialize)]
    struct Holder {
        #[serde(default, skip_serializing_if = "Toggle::is_unset")]
        flag: Toggle,
    }

    #[test]
    fn test_absent_and_null_deserialize_as_unset() {
        let absent: Holder = serde_json::from_value(json!({})).unwrap();
        let null: Holder = serde_json::from_value(json!({"flag": null})).unwrap();
        assert_eq!(absent.flag, Toggle::Unset);
        assert_eq!(null.flag, Toggle::Unset);
    }

    #[test]
    fn test_explicit_false_is_not_unset() {
        let holder: Holder = serde_json::from_value(json!({"flag": false})).unwrap();
        assert_eq!(holder.flag, Toggle::False);
        assert!(!holder.flag.is_unset());
        assert_eq!(serde_json::to_value(&holder).unwrap(), json!({"flag": false}));
    }

    #[test]
    fn test_unset_is_omitted_and_reads_false() {
        let holder = Holder { flag: Toggle::Unset };
        assert_eq!(serde_json::to_value(&holder).unwrap(), json!({}));
        assert!(!holder.flag.value());
    }
}
