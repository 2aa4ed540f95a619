//! # Runtime
//!
//! Process wiring for the controller binary.
//!
//! - `initialization`: crypto provider, logging, metrics, HTTP server and the shared context
//! - `error_policy`: requeue decisions for failed reconciles
//! - `watch_loop`: one kube-runtime `Controller` per resource kind

pub mod error_policy;
pub mod initialization;
pub mod watch_loop;

pub use initialization::{initialize, Runtime};
pub use watch_loop::run_controllers;
