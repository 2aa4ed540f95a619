//! Shared setup for the integration tests

use std::sync::Once;

static RUSTLS_INIT: Once = Once::new();

/// Install the ring crypto provider once per test binary.
///
/// reqwest is built with rustls and no default provider feature.
pub fn init_rustls() {
    RUSTLS_INIT.call_once(|| {
        let _ = rustls::crypto::ring::default_provider().install_default();
    });
}

/// Mock server URL without the trailing slash
#[allow(dead_code, reason = "not every test binary talks to a mock server")]
pub fn base_url(url: &impl std::fmt::Display) -> String {
    url.to_string().trim_end_matches('/').to_string()
}
