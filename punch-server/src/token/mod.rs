//! Presentation tokens
//!
//! A presentation token is a compact HS256 JWT a member device renders as a
//! QR code. It binds (tenant, member, card, jti) for a short validity window
//! and is consumed at most once through the replay guard.
//!
//! - [`TokenSigner`] - the signing capability, loaded once at startup
//! - [`TokenIssuer`] - resolves the member's card and mints tokens
//! - [`TokenSigner::verify`] - stateless signature / expiry / tenant checks

pub mod issuer;
pub mod verifier;

use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header};
use ring::rand::{SecureRandom, SystemRandom};
use serde::{Deserialize, Serialize};

pub use issuer::TokenIssuer;

/// Validity window of a presentation token
pub const DEFAULT_TOKEN_TTL_SECS: i64 = 30;

/// `aud` claim separating presentation tokens from session tokens
pub const PRESENTATION_AUDIENCE: &str = "punch-presentation";

/// Minimum signing secret length outside development
pub const MIN_SECRET_LEN: usize = 32;

/// Claims carried by a presentation token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PresentationClaims {
    /// Tenant ID
    pub tid: String,
    /// Member ID (Subject)
    pub sub: String,
    /// Card ID
    pub cid: i64,
    /// Unique token identifier, the replay-guard key
    pub jti: String,
    /// Issued at (Unix seconds)
    pub iat: i64,
    /// Issued at (Unix milliseconds); expiry is measured from this
    pub iat_ms: i64,
    /// iat + ttl (Unix seconds); informational for other consumers
    pub exp: i64,
    /// Audience
    pub aud: String,
}

/// A verified presentation token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PresentationToken {
    pub tenant_id: String,
    pub member_id: String,
    pub card_id: i64,
    pub jti: String,
    /// Unix milliseconds
    pub issued_at: i64,
}

impl From<PresentationClaims> for PresentationToken {
    fn from(claims: PresentationClaims) -> Self {
        Self {
            tenant_id: claims.tid,
            member_id: claims.sub,
            card_id: claims.cid,
            jti: claims.jti,
            issued_at: claims.iat_ms,
        }
    }
}

/// Tenant-independent signing key for presentation tokens
#[derive(Clone)]
pub struct TokenSigner {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    ttl_secs: i64,
}

impl std::fmt::Debug for TokenSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenSigner")
            .field("ttl_secs", &self.ttl_secs)
            .finish_non_exhaustive()
    }
}

impl TokenSigner {
    pub fn new(secret: &[u8], ttl_secs: i64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            ttl_secs,
        }
    }

    pub fn ttl_secs(&self) -> i64 {
        self.ttl_secs
    }

    /// Sign a token for the given binding, issued at `now_ms`
    pub fn mint(
        &self,
        tenant_id: &str,
        member_id: &str,
        card_id: i64,
        jti: &str,
        now_ms: i64,
    ) -> Result<String, jsonwebtoken::errors::Error> {
        let iat = now_ms.div_euclid(1000);
        let claims = PresentationClaims {
            tid: tenant_id.to_string(),
            sub: member_id.to_string(),
            cid: card_id,
            jti: jti.to_string(),
            iat,
            iat_ms: now_ms,
            exp: iat + self.ttl_secs,
            aud: PRESENTATION_AUDIENCE.to_string(),
        };

        jsonwebtoken::encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
    }

    pub(crate) fn decoding_key(&self) -> &DecodingKey {
        &self.decoding_key
    }
}

/// Generate a printable random secret (development only)
pub fn generate_dev_secret() -> String {
    const ALLOWED: &[u8] =
        b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789-_";

    let rng = SystemRandom::new();
    let mut bytes = [0u8; 64];
    if rng.fill(&mut bytes).is_err() {
        tracing::error!("System RNG unavailable, falling back to time-seeded secret");
        return format!("dev-secret-{}", shared::util::snowflake_id());
    }

    bytes
        .iter()
        .map(|b| ALLOWED[(*b as usize) % ALLOWED.len()] as char)
        .collect()
}
