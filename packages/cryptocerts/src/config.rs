//! Validator configuration
//!
//! Provides the path-building limits used by [`crate::CertificateValidator`].

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{CertificateError, Result};

/// Default bound on issuer hops before a chain is treated as a cycle
pub const DEFAULT_MAX_CHAIN_DEPTH: usize = 10;

/// Path-building configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ValidatorConfig {
    /// Issuer hops allowed above the target certificate
    pub max_chain_depth: usize,
    /// Consult the certificates bundled with the token after the stores
    pub use_bundled_chain: bool,
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            max_chain_depth: DEFAULT_MAX_CHAIN_DEPTH,
            use_bundled_chain: true,
        }
    }
}

impl ValidatorConfig {
    /// Only the operator's stores take part in path building
    #[must_use]
    pub fn stores_only() -> Self {
        Self {
            use_bundled_chain: false,
            ..Self::default()
        }
    }

    /// Parse and validate a JSON configuration; missing fields take defaults
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| CertificateError::Config(format!("Invalid validator config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// [`ValidatorConfig::from_json_str`] on the contents of `path`
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| CertificateError::io(path, e))?;
        Self::from_json_str(&json)
    }

    /// Reject values the validator cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.max_chain_depth == 0 {
            return Err(CertificateError::Config(
                "max_chain_depth must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
