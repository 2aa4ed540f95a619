//! # Reference Resolver
//!
//! Resolves a dependency on another managed resource (by explicit reference or
//! label selector) into that resource's external name.
//!
//! Resolution order for a single-valued field:
//!
//! 1. An explicit reference always wins and is re-resolved every time.
//! 2. A value that is already set is kept as is.
//! 3. A selector must match exactly one candidate; the match is pinned as the
//!    explicit reference so later reconciles skip the query.
//!
//! The multi-valued variant follows the same order, except a selector accepts
//! every match (at least one).

use crate::controller::credentials::StoreError;
use crate::crd::{Reference, Selector};
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;

/// Kinds that can be the target of a reference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TargetKind {
    ServerGroup,
    SegmentGroup,
}

impl std::fmt::Display for TargetKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::ServerGroup => "ServerGroup",
            Self::SegmentGroup => "SegmentGroup",
        })
    }
}

/// What the resolver needs to know about a potential target
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Candidate {
    pub name: String,
    pub labels: BTreeMap<String, String>,
    /// External name, `None` until the target has been created remotely
    pub external_name: Option<String>,
}

#[derive(Debug, Error)]
pub enum ReferenceError {
    #[error("referenced {kind} {name} does not exist")]
    ReferencedResourceNotFound { kind: TargetKind, name: String },
    #[error("referenced {kind} {name} is not ready: it has no external name yet")]
    ReferencedResourceNotReady { kind: TargetKind, name: String },
    #[error("no {kind} matches the selector")]
    NoMatchingReference { kind: TargetKind },
    #[error("{count} {kind} resources match the selector, expected exactly one")]
    AmbiguousReference { kind: TargetKind, count: usize },
    #[error("cannot look up {kind} references: {source}")]
    Lookup {
        kind: TargetKind,
        #[source]
        source: StoreError,
    },
}

/// Read access to reference targets
#[async_trait]
pub trait ReferenceReader: Send + Sync {
    async fn get(&self, kind: TargetKind, name: &str) -> Result<Option<Candidate>, StoreError>;

    async fn list(&self, kind: TargetKind) -> Result<Vec<Candidate>, StoreError>;
}

/// Result of resolving a single-valued field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolved {
    pub value: Option<String>,
    pub reference: Option<Reference>,
}

/// Result of resolving a multi-valued field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedMany {
    pub values: Vec<String>,
    pub references: Vec<Reference>,
}

impl Resolved {
    /// Write the result back into a desired spec; true when it changed
    pub fn apply(self, value: &mut Option<String>, reference: &mut Option<Reference>) -> bool {
        let mut changed = false;
        if self.value != *value {
            *value = self.value;
            changed = true;
        }
        if self.reference.is_some() && self.reference != *reference {
            *reference = self.reference;
            changed = true;
        }
        changed
    }
}

impl ResolvedMany {
    /// Write the result back into a desired spec; true when it changed
    pub fn apply(self, values: &mut Vec<String>, references: &mut Vec<Reference>) -> bool {
        let mut changed = false;
        if self.values != *values {
            *values = self.values;
            changed = true;
        }
        if !self.references.is_empty() && self.references != *references {
            *references = self.references;
            changed = true;
        }
        changed
    }
}

#[derive(Clone)]
pub struct ReferenceResolver {
    reader: Arc<dyn ReferenceReader>,
}

impl std::fmt::Debug for ReferenceResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReferenceResolver").finish_non_exhaustive()
    }
}

impl ReferenceResolver {
    pub fn new(reader: Arc<dyn ReferenceReader>) -> Self {
        Self { reader }
    }

    pub async fn resolve(
        &self,
        current: Option<&str>,
        reference: Option<&Reference>,
        selector: Option<&Selector>,
        kind: TargetKind,
    ) -> Result<Resolved, ReferenceError> {
        if let Some(reference) = reference {
            let value = self.by_name(kind, &reference.name).await?;
            return Ok(Resolved {
                value: Some(value),
                reference: Some(reference.clone()),
            });
        }

        let unchanged = Resolved {
            value: current.map(str::to_string),
            reference: None,
        };
        if current.is_some_and(|value| !value.is_empty()) {
            return Ok(unchanged);
        }
        let Some(selector) = selector else {
            return Ok(unchanged);
        };

        let mut matches = self.select(kind, selector).await?;
        match matches.len() {
            0 => Err(ReferenceError::NoMatchingReference { kind }),
            1 => {
                let candidate = matches.remove(0);
                let value = ready(kind, &candidate)?;
                debug!("Selector resolved {} {} to {}", kind, candidate.name, value);
                Ok(Resolved {
                    value: Some(value),
                    reference: Some(Reference {
                        name: candidate.name,
                    }),
                })
            }
            count => Err(ReferenceError::AmbiguousReference { kind, count }),
        }
    }

    pub async fn resolve_multiple(
        &self,
        current: &[String],
        references: &[Reference],
        selector: Option<&Selector>,
        kind: TargetKind,
    ) -> Result<ResolvedMany, ReferenceError> {
        if !references.is_empty() {
            let mut values = Vec::with_capacity(references.len());
            for reference in references {
                values.push(self.by_name(kind, &reference.name).await?);
            }
            return Ok(ResolvedMany {
                values,
                references: references.to_vec(),
            });
        }

        let unchanged = ResolvedMany {
            values: current.to_vec(),
            references: Vec::new(),
        };
        if !current.is_empty() {
            return Ok(unchanged);
        }
        let Some(selector) = selector else {
            return Ok(unchanged);
        };

        let matches = self.select(kind, selector).await?;
        if matches.is_empty() {
            return Err(ReferenceError::NoMatchingReference { kind });
        }
        let mut resolved = ResolvedMany {
            values: Vec::with_capacity(matches.len()),
            references: Vec::with_capacity(matches.len()),
        };
        for candidate in matches {
            resolved.values.push(ready(kind, &candidate)?);
            resolved.references.push(Reference {
                name: candidate.name,
            });
        }
        Ok(resolved)
    }

    async fn by_name(&self, kind: TargetKind, name: &str) -> Result<String, ReferenceError> {
        let candidate = self
            .reader
            .get(kind, name)
            .await
            .map_err(|source| ReferenceError::Lookup { kind, source })?
            .ok_or_else(|| ReferenceError::ReferencedResourceNotFound {
                kind,
                name: name.to_string(),
            })?;
        ready(kind, &candidate)
    }

    /// Matching candidates sorted by name
    async fn select(
        &self,
        kind: TargetKind,
        selector: &Selector,
    ) -> Result<Vec<Candidate>, ReferenceError> {
        let mut matches: Vec<Candidate> = self
            .reader
            .list(kind)
            .await
            .map_err(|source| ReferenceError::Lookup { kind, source })?
            .into_iter()
            .filter(|candidate| selector.matches(Some(&candidate.labels)))
            .collect();
        matches.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(matches)
    }
}

fn ready(kind: TargetKind, candidate: &Candidate) -> Result<String, ReferenceError> {
    candidate
        .external_name
        .clone()
        .filter(|name| !name.is_empty())
        .ok_or_else(|| ReferenceError::ReferencedResourceNotReady {
            kind,
            name: candidate.name.clone(),
        })
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use std::collections::HashMap;

    /// Fixed set of candidates per kind
    #[derive(Debug, Default)]
    pub(crate) struct FakeReader {
        pub(crate) candidates: HashMap<TargetKind, Vec<Candidate>>,
    }

    impl FakeReader {
        pub(crate) fn with(
            mut self,
            kind: TargetKind,
            name: &str,
            external_name: Option<&str>,
            labels: &[(&str, &str)],
        ) -> Self {
            self.candidates.entry(kind).or_default().push(Candidate {
                name: name.to_string(),
                labels: labels
                    .iter()
                    .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
                    .collect(),
                external_name: external_name.map(str::to_string),
            });
            self
        }
    }

    #[async_trait]
    impl ReferenceReader for FakeReader {
        async fn get(&self, kind: TargetKind, name: &str) -> Result<Option<Candidate>, StoreError> {
            Ok(self
                .candidates
                .get(&kind)
                .and_then(|list| list.iter().find(|c| c.name == name))
                .cloned())
        }

        async fn list(&self, kind: TargetKind) -> Result<Vec<Candidate>, StoreError> {
            Ok(self.candidates.get(&kind).cloned().unwrap_or_default())
        }
    }
}
