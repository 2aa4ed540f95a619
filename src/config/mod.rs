//! # Configuration
//!
//! Process-level configuration for the provider.
//!
//! - `controller`: reconcile timing, backoff, concurrency and logging settings

pub mod controller;

pub use controller::ControllerConfig;
