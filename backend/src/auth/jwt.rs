//! Bearer token issuance and validation
//!
//! Tokens are HS256 JWTs carrying `{sub, iat, exp}`. Keys are derived once
//! from the process-wide secret; rotating the secret invalidates every
//! token issued before.

use super::clock::Clock;
use super::error::TokenError;
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{
    crypto, decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header,
    Validation,
};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use uuid::Uuid;

/// Lifetime of tokens issued without an explicit TTL
pub const DEFAULT_TOKEN_TTL_SECS: i64 = 3600;

/// Longest accepted token lifetime (30 days)
pub const MAX_TOKEN_TTL_SECS: i64 = 30 * 24 * 3600;

/// Type tag returned alongside every token
pub const TOKEN_TYPE: &str = "bearer";

const ALGORITHM: Algorithm = Algorithm::HS256;

/// JWT claims
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID)
    pub sub: String,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

impl Claims {
    /// Parse the subject as a user ID
    pub fn subject(&self) -> Result<Uuid, TokenError> {
        Uuid::parse_str(&self.sub).map_err(|_| TokenError::MalformedToken)
    }
}

/// A freshly signed token with its metadata
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub access_token: String,
    pub token_type: &'static str,
    pub subject: Uuid,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl IssuedToken {
    /// Seconds between issuance and expiry
    pub fn expires_in(&self) -> i64 {
        (self.expires_at - self.issued_at).num_seconds()
    }
}

/// Pre-computed signing keys, shared across clones
#[derive(Clone)]
struct TokenKeys {
    encoding: Arc<EncodingKey>,
    decoding: Arc<DecodingKey>,
}

/// Issues and validates bearer tokens
#[derive(Clone)]
pub struct TokenIssuer {
    keys: TokenKeys,
    default_ttl: Duration,
    clock: Arc<dyn Clock>,
}

impl fmt::Debug for TokenIssuer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenIssuer")
            .field("keys", &"[hidden]")
            .field("default_ttl", &self.default_ttl)
            .field("clock", &self.clock)
            .finish()
    }
}

impl TokenIssuer {
    /// Create a new issuer. Call once at startup and share via `AppState`.
    pub fn new(secret: &SecretString, default_ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        let secret = secret.expose_secret().as_bytes();
        Self {
            keys: TokenKeys {
                encoding: Arc::new(EncodingKey::from_secret(secret)),
                decoding: Arc::new(DecodingKey::from_secret(secret)),
            },
            default_ttl,
            clock,
        }
    }

    #[inline]
    pub fn default_ttl(&self) -> Duration {
        self.default_ttl
    }

    /// Issue a token for `subject` with the configured default lifetime
    #[inline]
    pub fn issue_default(&self, subject: Uuid) -> Result<IssuedToken, TokenError> {
        self.issue(subject, self.default_ttl)
    }

    /// Issue a token for `subject` that expires `ttl` from now
    pub fn issue(&self, subject: Uuid, ttl: Duration) -> Result<IssuedToken, TokenError> {
        let ttl_secs = ttl.num_seconds();
        if ttl_secs < 1 {
            return Err(TokenError::NonPositiveTtl);
        }

        // Claims carry whole seconds; keep the returned metadata in step
        let iat = self.clock.now().timestamp();
        let exp = iat + ttl_secs;

        let claims = Claims {
            sub: subject.to_string(),
            iat,
            exp,
        };

        let access_token = encode(&Header::new(ALGORITHM), &claims, &self.keys.encoding)
            .map_err(|e| TokenError::Signing(e.to_string()))?;

        Ok(IssuedToken {
            access_token,
            token_type: TOKEN_TYPE,
            subject,
            issued_at: DateTime::from_timestamp(iat, 0).unwrap_or_default(),
            expires_at: DateTime::from_timestamp(exp, 0).unwrap_or_default(),
        })
    }

    /// Validate a serialized token and return its claims
    ///
    /// Checks run in order: shape, signature, claim decoding, expiry. Any
    /// byte changed in the header or payload therefore reports
    /// `InvalidSignature`, never `MalformedToken`.
    pub fn validate(&self, token: &str) -> Result<Claims, TokenError> {
        let (message, signature) = split_token(token)?;

        let signature_ok = crypto::verify(signature, message.as_bytes(), &self.keys.decoding, ALGORITHM)
            .map_err(|_| TokenError::MalformedToken)?;
        if !signature_ok {
            return Err(TokenError::InvalidSignature);
        }

        let mut validation = Validation::new(ALGORITHM);
        // Expiry is checked against the injected clock below
        validation.validate_exp = false;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        let claims = decode::<Claims>(token, &self.keys.decoding, &validation)
            .map_err(|e| match e.kind() {
                ErrorKind::InvalidSignature => TokenError::InvalidSignature,
                ErrorKind::ExpiredSignature => TokenError::ExpiredToken,
                _ => TokenError::MalformedToken,
            })?
            .claims;

        if claims.exp <= self.clock.now().timestamp() {
            return Err(TokenError::ExpiredToken);
        }

        Ok(claims)
    }
}

/// Split a compact JWS into (`header.payload`, `signature`)
fn split_token(token: &str) -> Result<(&str, &str), TokenError> {
    let (message, signature) = token.rsplit_once('.').ok_or(TokenError::MalformedToken)?;
    let (header, payload) = message.split_once('.').ok_or(TokenError::MalformedToken)?;

    if header.is_empty() || payload.is_empty() || signature.is_empty() || payload.contains('.') {
        return Err(TokenError::MalformedToken);
    }
    Ok((message, signature))
}
