use chrono::{Duration, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use tracing::{debug, instrument};
use uuid::Uuid;

use super::types::TokenClaims;
use crate::config::env_or;
use crate::shared::AppError;

/// Largest clock-skew allowance accepted from configuration (one day)
pub const MAX_LEEWAY_SECONDS: u64 = 24 * 60 * 60;
/// Longest token lifetime accepted from configuration (366 days)
pub const MAX_EXPIRATION_MINUTES: i64 = 366 * 24 * 60;

/// Configuration for JWT token operations.
///
/// One instance backs both issuing and validation, so a token minted by
/// [`TokenConfig::create_token`] always verifies against the same config.
#[derive(Clone)]
pub struct TokenConfig {
    secret: String,
    pub issuer: String,
    pub audience: String,
    pub subject: String,
    pub expiration_minutes: i64,
    pub leeway_seconds: u64,
}

impl std::fmt::Debug for TokenConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenConfig")
            .field("issuer", &self.issuer)
            .field("audience", &self.audience)
            .field("subject", &self.subject)
            .field("expiration_minutes", &self.expiration_minutes)
            .field("leeway_seconds", &self.leeway_seconds)
            .finish_non_exhaustive()
    }
}

impl TokenConfig {
    pub fn new(
        secret: String,
        issuer: String,
        audience: String,
        subject: String,
        expiration_minutes: i64,
    ) -> Self {
        Self {
            secret,
            issuer,
            audience,
            subject,
            expiration_minutes,
            leeway_seconds: 0,
        }
    }

    pub fn with_leeway(mut self, leeway_seconds: u64) -> Self {
        self.leeway_seconds = leeway_seconds;
        self
    }

    /// Reads the token settings from the environment and rejects unusable values
    pub fn from_env() -> Result<Self, AppError> {
        let config = Self::new(
            env_or("JWT_SECRET", "your-secret-key-change-in-production".to_string()),
            env_or("JWT_ISSUER", "user-service".to_string()),
            env_or("JWT_AUDIENCE", "user-service-clients".to_string()),
            env_or("JWT_SUBJECT", "testuser".to_string()),
            env_or("JWT_EXPIRATION_MINUTES", 30),
        )
        .with_leeway(env_or("JWT_LEEWAY_SECONDS", 0));

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), AppError> {
        if self.secret.is_empty() {
            return Err(AppError::Configuration("JWT secret must not be empty".to_string()));
        }
        if self.issuer.trim().is_empty() || self.audience.trim().is_empty() {
            return Err(AppError::Configuration(
                "JWT issuer and audience must not be empty".to_string(),
            ));
        }
        if self.expiration_minutes <= 0 || self.expiration_minutes > MAX_EXPIRATION_MINUTES {
            return Err(AppError::Configuration(format!(
                "JWT expiration must be between 1 and {MAX_EXPIRATION_MINUTES} minutes, got {}",
                self.expiration_minutes
            )));
        }
        self.check_leeway()
    }

    fn check_leeway(&self) -> Result<(), AppError> {
        if self.leeway_seconds > MAX_LEEWAY_SECONDS {
            return Err(AppError::Configuration(format!(
                "JWT leeway must be at most {MAX_LEEWAY_SECONDS} seconds, got {}",
                self.leeway_seconds
            )));
        }
        Ok(())
    }

    /// Builds a fresh claim set for the configured subject, valid from now
    pub fn issue_claims(&self) -> Result<TokenClaims, AppError> {
        let now = Utc::now();
        let expires_at = Duration::try_minutes(self.expiration_minutes)
            .and_then(|lifetime| now.checked_add_signed(lifetime))
            .ok_or_else(|| {
                AppError::Configuration(format!(
                    "JWT expiration of {} minutes is out of range",
                    self.expiration_minutes
                ))
            })?;

        Ok(TokenClaims {
            sub: self.subject.clone(),
            jti: Uuid::new_v4().to_string(),
            iat: now.timestamp(),
            iss: self.issuer.clone(),
            aud: self.audience.as_str().into(),
            exp: expires_at.timestamp(),
        })
    }

    /// Creates a new signed token for the configured subject
    #[instrument(skip(self))]
    pub fn create_token(&self) -> Result<String, AppError> {
        self.validate()?;
        let claims = self.issue_claims()?;

        debug!(
            expiration_minutes = self.expiration_minutes,
            exp_timestamp = claims.exp,
            jti = %claims.jti,
            "Creating JWT token with expiration"
        );

        self.sign(&claims)
    }

    /// Signs an arbitrary claim set with HS256
    pub fn sign(&self, claims: &TokenClaims) -> Result<String, AppError> {
        encode(
            &Header::new(Algorithm::HS256),
            claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .map_err(|e| {
            debug!(error = %e, "Failed to encode JWT token");
            AppError::Internal(format!("Failed to sign token: {e}"))
        })
    }

    /// Validates signature, issuer, audience and lifetime; returns the claims if valid
    #[instrument(skip(self, token))]
    pub fn validate_token(&self, token: &str) -> Result<TokenClaims, AppError> {
        debug!("Decoding and validating JWT token");

        // jsonwebtoken subtracts the leeway from the current time unchecked
        self.check_leeway()?;

        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[&self.issuer]);
        validation.set_audience(&[&self.audience]);
        validation.set_required_spec_claims(&["exp", "sub", "iss", "aud"]);
        validation.leeway = self.leeway_seconds;

        let claims = decode::<TokenClaims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &validation,
        )
        .map(|data| data.claims)
        .map_err(|e| {
            debug!(error = %e, "Failed to decode JWT token");
            let reason = match e.kind() {
                ErrorKind::ExpiredSignature => "Token has expired",
                ErrorKind::InvalidSignature => "Invalid token signature",
                ErrorKind::InvalidIssuer => "Invalid token issuer",
                ErrorKind::InvalidAudience => "Invalid token audience",
                _ => "Invalid token",
            };
            AppError::Unauthorized(reason.to_string())
        })?;

        // jsonwebtoken does not check iat, so reject tokens issued in the future here
        let now = Utc::now().timestamp();
        if claims.iat > now + self.leeway_seconds as i64 {
            debug!(iat = claims.iat, now, "JWT token issued in the future");
            return Err(AppError::Unauthorized("Token is not yet valid".to_string()));
        }

        debug!(
            sub = %claims.sub,
            jti = %claims.jti,
            exp = claims.exp,
            "JWT token decoded successfully"
        );
        Ok(claims)
    }
}
