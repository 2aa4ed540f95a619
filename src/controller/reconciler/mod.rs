//! # Reconciler
//!
//! Generic reconcile loop for ZPA managed resources.
//!
//! Every kind (`Server`, `ServerGroup`, `SegmentGroup`, `ApplicationSegment`)
//! runs through the same cycle; the per-kind behaviour lives in
//! [`crate::controller::external`].
//!
//! - `managed`: finalizer handling, observe/create/update/delete
//! - `patch`: persisting spec, external name and status
//! - `types`: shared context, error classes and backoff state

mod managed;
mod patch;
pub mod types;

pub use managed::reconcile;
pub use types::{backoff_key, Context, ErrorClass, ReconcileError};
