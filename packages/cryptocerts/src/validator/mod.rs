//! Trust-chain validation
//!
//! The walk is a bounded loop over four states:
//!
//! 1. check the current certificate's validity window against `evaluated_at`
//! 2. if it is self-signed, conclude on whether it is a trust anchor
//! 3. otherwise find the first issuer candidate whose key verifies it
//! 4. append that issuer and repeat, until the depth bound is exceeded
//!
//! Every outcome of the walk is reported through [`ValidationResult`]; nothing
//! here returns an error for an untrusted chain.

mod result;

use std::time::SystemTime;

pub use result::{ValidationConclusion, ValidationErrorKind, ValidationResult};

use crate::config::ValidatorConfig;
use crate::error::Result;
use crate::store::CertificatesStore;
use crate::token::CertificateToken;

/// Builds and verifies chains against one [`CertificatesStore`]
#[derive(Debug, Clone)]
pub struct CertificateValidator {
    store: CertificatesStore,
    config: ValidatorConfig,
}

impl CertificateValidator {
    /// Validator with [`ValidatorConfig::default`]
    #[must_use]
    pub fn new(store: CertificatesStore) -> Self {
        Self {
            store,
            config: ValidatorConfig::default(),
        }
    }

    /// Validator with an explicit configuration, rejected if invalid
    pub fn with_config(store: CertificatesStore, config: ValidatorConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { store, config })
    }

    /// Stores consulted during path building
    #[must_use]
    pub fn store(&self) -> &CertificatesStore {
        &self.store
    }

    /// Active configuration
    #[must_use]
    pub fn config(&self) -> &ValidatorConfig {
        &self.config
    }

    /// Validate `token` at `evaluated_at`, or now when `None`
    #[must_use]
    pub fn validate_certificate(
        &self,
        token: &CertificateToken,
        evaluated_at: Option<SystemTime>,
    ) -> ValidationResult {
        let evaluated_at = evaluated_at.unwrap_or_else(SystemTime::now);
        let result = self.walk(token, evaluated_at);

        tracing::info!(
            subject = %token.subject(),
            fingerprint = %token.fingerprint().short(),
            valid = result.valid_to_trusted_root,
            chain_length = result.built_chain.len(),
            errors = result.errors.len(),
            "certificate validated"
        );
        result
    }

    /// One result per token, in order, all evaluated at the same instant
    #[must_use]
    pub fn validate_certificates(
        &self,
        tokens: &[CertificateToken],
        evaluated_at: Option<SystemTime>,
    ) -> Vec<ValidationResult> {
        let evaluated_at = evaluated_at.unwrap_or_else(SystemTime::now);
        tokens
            .iter()
            .map(|token| self.validate_certificate(token, Some(evaluated_at)))
            .collect()
    }

    /// Like [`CertificateValidator::validate_certificate`] but fails closed with
    /// [`crate::CertificateError::InvalidChain`] unless the chain reaches a trust anchor
    pub fn require_trusted(
        &self,
        token: &CertificateToken,
        evaluated_at: Option<SystemTime>,
    ) -> Result<ValidationResult> {
        self.validate_certificate(token, evaluated_at).into_trusted()
    }

    fn walk(&self, token: &CertificateToken, evaluated_at: SystemTime) -> ValidationResult {
        let max_depth = self.config.max_chain_depth;
        let mut built_chain = vec![token.clone()];
        let mut current = token.clone();
        let mut depth = 0usize;

        let conclude = |built_chain: Vec<CertificateToken>, error: Option<ValidationErrorKind>| {
            let valid = error.is_none();
            ValidationResult {
                validation_conclusion: if valid {
                    ValidationConclusion::Valid
                } else {
                    ValidationConclusion::Invalid
                },
                valid_to_trusted_root: valid,
                built_chain,
                errors: error.into_iter().collect(),
                evaluated_at,
            }
        };

        loop {
            if let Some(error) = validity_error(&current, evaluated_at) {
                tracing::debug!(depth, error = %error, "validity window check failed");
                return conclude(built_chain, Some(error));
            }

            if current.is_self_signed() {
                if self.store.contains_trusted(&current.fingerprint()) {
                    tracing::debug!(depth, root = %current.subject(), "reached trust anchor");
                    return conclude(built_chain, None);
                }
                return conclude(
                    built_chain,
                    Some(ValidationErrorKind::UntrustedRoot {
                        subject: current.subject().clone(),
                        fingerprint: current.fingerprint(),
                    }),
                );
            }

            let Some(issuer) = self.seek_issuer(&current, token) else {
                return conclude(
                    built_chain,
                    Some(ValidationErrorKind::IssuerNotFound {
                        subject: current.subject().clone(),
                        issuer: current.issuer().clone(),
                        fingerprint: current.fingerprint(),
                    }),
                );
            };

            depth += 1;
            tracing::debug!(
                depth,
                subject = %current.subject(),
                issuer = %issuer.fingerprint().short(),
                "issuer found"
            );
            built_chain.push(issuer.clone());

            if depth > max_depth {
                return conclude(
                    built_chain,
                    Some(ValidationErrorKind::ChainTooLong { max_depth }),
                );
            }
            current = issuer;
        }
    }

    /// First candidate named as `current`'s issuer whose key verifies it.
    ///
    /// Store candidates come first (intermediary, then trusted); the bundle shipped
    /// with `target` only supplements them.
    fn seek_issuer(
        &self,
        current: &CertificateToken,
        target: &CertificateToken,
    ) -> Option<CertificateToken> {
        let issuer_dn = current.issuer();

        let from_store = self
            .store
            .find_issuer_candidates(issuer_dn)
            .into_iter()
            .map(|candidate| candidate.token);

        let bundled: &[CertificateToken] = if self.config.use_bundled_chain {
            target.chain()
        } else {
            &[]
        };
        let from_bundle = bundled
            .iter()
            .filter(|candidate| candidate.subject() == issuer_dn && *candidate != current);

        from_store
            .chain(from_bundle)
            .find(|candidate| current.verify_signature_with(candidate))
            .cloned()
    }
}

fn validity_error(token: &CertificateToken, at: SystemTime) -> Option<ValidationErrorKind> {
    if at < token.not_before() {
        Some(ValidationErrorKind::CertificateNotYetValid {
            subject: token.subject().clone(),
            fingerprint: token.fingerprint(),
            not_before: token.not_before(),
        })
    } else if at > token.not_after() {
        Some(ValidationErrorKind::CertificateExpired {
            subject: token.subject().clone(),
            fingerprint: token.fingerprint(),
            not_after: token.not_after(),
        })
    } else {
        None
    }
}
