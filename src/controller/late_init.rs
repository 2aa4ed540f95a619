//! # Late Initialization
//!
//! Adopts values the remote API chose for fields the caller left unset.
//! A field the caller set is never overwritten.

use crate::crd::Toggle;

/// Accumulates whether any desired field was filled in
#[derive(Debug, Default)]
pub struct LateInit {
    mutated: bool,
}

impl LateInit {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fill an absent or empty string; an empty observed value is not adopted.
    pub fn string(&mut self, desired: &mut Option<String>, observed: Option<&str>) -> &mut Self {
        let unset = desired.as_deref().is_none_or(str::is_empty);
        if let Some(value) = observed.filter(|v| !v.is_empty()) {
            if unset {
                *desired = Some(value.to_string());
                self.mutated = true;
            }
        }
        self
    }

    pub fn toggle(&mut self, desired: &mut Toggle, observed: bool) -> &mut Self {
        if desired.is_unset() {
            *desired = Toggle::from(observed);
            self.mutated = true;
        }
        self
    }

    /// Fill an empty list
    pub fn list(&mut self, desired: &mut Vec<String>, observed: &[String]) -> &mut Self {
        if desired.is_empty() && !observed.is_empty() {
            *desired = observed.to_vec();
            self.mutated = true;
        }
        self
    }

    pub fn mutated(&self) -> bool {
        self.mutated
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fills_unset_fields_only() {
        let mut config_space = None;
        let mut description = Some("mine".to_string());
        let mut enabled = Toggle::Unset;
        let mut ip_anchored = Toggle::False;

        let mut late_init = LateInit::new();
        late_init
            .string(&mut config_space, Some("DEFAULT"))
            .string(&mut description, Some("theirs"))
            .toggle(&mut enabled, true)
            .toggle(&mut ip_anchored, true);

        assert!(late_init.mutated());
        assert_eq!(config_space.as_deref(), Some("DEFAULT"));
        assert_eq!(description.as_deref(), Some("mine"));
        assert_eq!(enabled, Toggle::True);
        assert_eq!(ip_anchored, Toggle::False);
    }

    #[test]
    fn test_empty_observed_string_is_not_a_mutation() {
        let mut config_space = Some(String::new());
        let mut late_init = LateInit::new();
        late_init.string(&mut config_space, Some("")).string(&mut None, None);
        assert!(!late_init.mutated());
        assert_eq!(config_space.as_deref(), Some(""));
    }

    #[test]
    fn test_second_pass_is_idempotent() {
        let mut bypass_type = None;
        let mut enabled = Toggle::Unset;
        let mut domains = Vec::new();
        let observed_domains = vec!["a.com".to_string()];

        let run = |bypass_type: &mut Option<String>, enabled: &mut Toggle, domains: &mut Vec<String>| {
            let mut late_init = LateInit::new();
            late_init
                .string(bypass_type, Some("NEVER"))
                .toggle(enabled, false)
                .list(domains, &observed_domains);
            late_init.mutated()
        };

        assert!(run(&mut bypass_type, &mut enabled, &mut domains));
        assert!(!run(&mut bypass_type, &mut enabled, &mut domains));
        assert_eq!(enabled, Toggle::False);
        assert_eq!(domains, observed_domains);
    }
}
