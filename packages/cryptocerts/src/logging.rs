//! Logging bootstrap
//!
//! The library emits `tracing` events, forwarded to the `log` facade. Binaries and
//! tests pick them up through `env_logger`, configured with `RUST_LOG`:
//! - `RUST_LOG=cryptocerts=debug` - one line per chain hop
//! - `RUST_LOG=cryptocerts=trace` - also every rejected issuer candidate

use std::sync::Once;

use crate::token::CertificateToken;
use crate::validator::ValidationResult;

static INIT_LOGGER: Once = Once::new();

/// Initialize `env_logger` once per process
pub fn init() {
    INIT_LOGGER.call_once(|| {
        env_logger::Builder::from_default_env()
            .format_timestamp_micros()
            .init();

        log::info!("Structured logging initialized");
    });
}

/// Initialize logging for tests; safe to call from every test
pub fn init_test() {
    let _ = env_logger::Builder::from_default_env()
        .is_test(true)
        .try_init();
}

/// One-line summary of a certificate for log output
#[must_use]
pub fn describe_certificate(token: &CertificateToken) -> String {
    format!(
        "{} [{} {}]",
        token.subject(),
        token.format(),
        token.fingerprint().short()
    )
}

/// Log a validation outcome at a level matching its severity
pub fn log_validation_result(result: &ValidationResult) {
    let target = result
        .built_chain
        .first()
        .map_or_else(|| "<empty>".to_string(), describe_certificate);

    if result.valid_to_trusted_root {
        log::info!(
            "Chain valid to trusted root: {target} (length: {})",
            result.built_chain.len()
        );
    } else {
        log::warn!(
            "Chain invalid: {target} (errors: {})",
            result
                .errors
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join("; ")
        );
    }
}
