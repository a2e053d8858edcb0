//! Password hashing and bearer tokens.
//!
//! Passwords are stored as Argon2id PHC strings. Tokens are HS256 JWTs whose
//! subject is the user id; they are not persisted and expire [`TOKEN_TTL`]
//! after issuance.

use argon2::{
    Algorithm, Argon2, Params, PasswordHash, PasswordHasher, PasswordVerifier, Version,
    password_hash::{SaltString, rand_core::OsRng},
};
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::{EngineError, ResultEngine};

/// Lifetime of an issued token.
pub const TOKEN_TTL: Duration = Duration::days(7);

/// Minimum accepted password length, checked at registration.
pub const MIN_PASSWORD_LEN: usize = 6;

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: String,
    iat: i64,
    exp: i64,
}

/// Credential verifier: hashes passwords and signs/verifies tokens with the
/// process-wide secret.
#[derive(Clone)]
pub struct Credentials {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    hasher: Argon2<'static>,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials").finish_non_exhaustive()
    }
}

impl Credentials {
    /// Build with the default Argon2id cost.
    pub fn new(secret: &[u8]) -> ResultEngine<Self> {
        Self::with_params(secret, Params::default())
    }

    /// Build with an explicit Argon2 cost (lower costs keep tests fast).
    pub fn with_params(secret: &[u8], params: Params) -> ResultEngine<Self> {
        if secret.is_empty() {
            return Err(EngineError::Token("signing secret must not be empty".to_string()));
        }

        let mut validation = Validation::default();
        validation.leeway = 0;

        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation,
            hasher: Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
        })
    }

    pub fn hash_password(&self, password: &str) -> ResultEngine<String> {
        let salt = SaltString::generate(&mut OsRng);
        self.hasher
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|err| EngineError::Hashing(err.to_string()))
    }

    /// Check `password` against a stored PHC string.
    ///
    /// A stored hash that cannot be parsed is an error, not a mismatch.
    pub fn verify_password(&self, password: &str, hash: &str) -> ResultEngine<bool> {
        let parsed = PasswordHash::new(hash).map_err(|err| EngineError::Hashing(err.to_string()))?;
        Ok(self
            .hasher
            .verify_password(password.as_bytes(), &parsed)
            .is_ok())
    }

    pub fn issue_token(&self, user_id: Uuid) -> ResultEngine<String> {
        self.issue_token_at(user_id, Utc::now())
    }

    /// Issue a token as if it had been signed at `issued_at`.
    pub fn issue_token_at(&self, user_id: Uuid, issued_at: DateTime<Utc>) -> ResultEngine<String> {
        let claims = Claims {
            sub: user_id.to_string(),
            iat: issued_at.timestamp(),
            exp: (issued_at + TOKEN_TTL).timestamp(),
        };
        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|err| EngineError::Token(err.to_string()))
    }

    /// Return the user id bound to `token`.
    ///
    /// Fails with [`EngineError::Unauthorized`] if the token is malformed,
    /// badly signed, expired, or does not carry a user id.
    pub fn verify_token(&self, token: &str) -> ResultEngine<Uuid> {
        let data = decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map_err(|_| EngineError::Unauthorized("invalid token".to_string()))?;
        Uuid::parse_str(&data.claims.sub)
            .map_err(|_| EngineError::Unauthorized("invalid token".to_string()))
    }
}
