//! Stateless presentation token verification
//!
//! Checks are ordered: signature and shape, then expiry, then tenant. Replay
//! is not checked here; it is decided by the claim inside the engine's
//! transaction.

use jsonwebtoken::{Algorithm, Validation};

use super::{PRESENTATION_AUDIENCE, PresentationClaims, PresentationToken, TokenSigner};
use crate::error::{LoyaltyError, LoyaltyResult};

impl TokenSigner {
    /// Verify a raw token presented to a staff terminal of `expected_tenant`.
    ///
    /// Expiry is measured in milliseconds from `iat_ms`: a token is valid
    /// while `now_ms <= iat_ms + ttl`.
    pub fn verify(
        &self,
        raw: &str,
        expected_tenant: &str,
        now_ms: i64,
    ) -> LoyaltyResult<PresentationToken> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_audience(&[PRESENTATION_AUDIENCE]);
        validation.set_required_spec_claims(&["exp", "aud", "sub"]);
        // Expiry is checked below against iat_ms and the caller's clock
        validation.validate_exp = false;

        let data = jsonwebtoken::decode::<PresentationClaims>(
            raw.trim(),
            self.decoding_key(),
            &validation,
        )
        .map_err(|e| {
            tracing::debug!(error = %e, "Presentation token rejected");
            LoyaltyError::TokenInvalid(e.to_string())
        })?;
        let claims = data.claims;

        if claims.jti.is_empty() || claims.tid.is_empty() || claims.sub.is_empty() {
            return Err(LoyaltyError::TokenInvalid("missing binding claim".into()));
        }

        let expires_at_ms = claims
            .iat_ms
            .saturating_add(self.ttl_secs().saturating_mul(1000));
        if now_ms > expires_at_ms {
            return Err(LoyaltyError::TokenExpired);
        }

        if claims.tid != expected_tenant {
            return Err(LoyaltyError::TokenTenantMismatch {
                expected: expected_tenant.to_string(),
                actual: claims.tid,
            });
        }

        Ok(claims.into())
    }
}
