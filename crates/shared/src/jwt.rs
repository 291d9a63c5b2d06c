//! RS256 token issuing and validation.
//!
//! Access and refresh tokens carry the user id and role so the role-gate
//! middleware can authorize requests without a database round trip. Every
//! issued token gets a fresh `jti`; sessions store its hash, which is what
//! makes refresh rotation and logout revocation work.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum JwtError {
    #[error("Failed to encode token: {0}")]
    EncodingError(String),

    #[error("Failed to decode token: {0}")]
    DecodingError(String),

    #[error("Token has expired")]
    TokenExpired,

    #[error("Invalid token")]
    InvalidToken,

    #[error("Invalid key: {0}")]
    InvalidKey(String),
}

/// Claims carried by both token kinds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User id
    pub sub: String,
    /// Role at issue time (`super_admin` or `operator`); the middleware
    /// re-reads the database, so this is a hint, not an authorization source
    pub role: String,
    /// Expiry (Unix timestamp)
    pub exp: i64,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Unique token id, hashed into the sessions table
    pub jti: String,
    pub token_type: TokenType,
}

impl Claims {
    /// Parses the subject claim as a user id.
    pub fn user_id(&self) -> Result<Uuid, JwtError> {
        Uuid::parse_str(&self.sub).map_err(|_| JwtError::InvalidToken)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenType {
    Access,
    Refresh,
}

/// A signed token together with the `jti` embedded in it.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub jti: String,
}

/// Clock skew tolerance applied during validation.
pub const DEFAULT_LEEWAY_SECS: u64 = 30;

/// Key material and expiry policy for issuing and validating tokens.
#[derive(Clone)]
pub struct JwtConfig {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    pub access_token_expiry_secs: i64,
    pub refresh_token_expiry_secs: i64,
    pub leeway_secs: u64,
}

impl std::fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtConfig")
            .field("access_token_expiry_secs", &self.access_token_expiry_secs)
            .field("refresh_token_expiry_secs", &self.refresh_token_expiry_secs)
            .field("leeway_secs", &self.leeway_secs)
            .field("encoding_key", &"[REDACTED]")
            .field("decoding_key", &"[REDACTED]")
            .finish()
    }
}

impl JwtConfig {
    /// Builds a config from an RSA key pair in PEM format with the default leeway.
    pub fn new(
        private_key_pem: &str,
        public_key_pem: &str,
        access_token_expiry_secs: i64,
        refresh_token_expiry_secs: i64,
    ) -> Result<Self, JwtError> {
        Self::with_leeway(
            private_key_pem,
            public_key_pem,
            access_token_expiry_secs,
            refresh_token_expiry_secs,
            DEFAULT_LEEWAY_SECS,
        )
    }

    /// Builds a config with an explicit clock-skew leeway.
    ///
    /// Keys are normalized first: surrounding quotes are stripped and literal
    /// `\n` sequences become newlines, so keys can be supplied through
    /// single-line environment variables.
    pub fn with_leeway(
        private_key_pem: &str,
        public_key_pem: &str,
        access_token_expiry_secs: i64,
        refresh_token_expiry_secs: i64,
        leeway_secs: u64,
    ) -> Result<Self, JwtError> {
        let private_key = normalize_pem_key(private_key_pem);
        let public_key = normalize_pem_key(public_key_pem);

        let encoding_key = EncodingKey::from_rsa_pem(private_key.as_bytes())
            .map_err(|e| JwtError::InvalidKey(format!("Invalid private key: {}", e)))?;
        let decoding_key = DecodingKey::from_rsa_pem(public_key.as_bytes())
            .map_err(|e| JwtError::InvalidKey(format!("Invalid public key: {}", e)))?;

        Ok(Self {
            encoding_key,
            decoding_key,
            access_token_expiry_secs,
            refresh_token_expiry_secs,
            leeway_secs,
        })
    }

    /// HS256 config for unit tests, so tests need no RSA key fixtures.
    #[cfg(test)]
    pub fn new_for_testing(secret: &str) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            access_token_expiry_secs: 900,
            refresh_token_expiry_secs: 604800,
            leeway_secs: 0,
        }
    }

    /// Issues an access token for the user.
    pub fn issue_access_token(&self, user_id: Uuid, role: &str) -> Result<IssuedToken, JwtError> {
        self.issue(user_id, role, TokenType::Access, self.access_token_expiry_secs)
    }

    /// Issues a refresh token for the user.
    pub fn issue_refresh_token(&self, user_id: Uuid, role: &str) -> Result<IssuedToken, JwtError> {
        self.issue(user_id, role, TokenType::Refresh, self.refresh_token_expiry_secs)
    }

    fn issue(
        &self,
        user_id: Uuid,
        role: &str,
        token_type: TokenType,
        expiry_secs: i64,
    ) -> Result<IssuedToken, JwtError> {
        let now = Utc::now();
        let jti = Uuid::new_v4().to_string();

        let claims = Claims {
            sub: user_id.to_string(),
            role: role.to_string(),
            exp: (now + Duration::seconds(expiry_secs)).timestamp(),
            iat: now.timestamp(),
            jti: jti.clone(),
            token_type,
        };

        let token = encode(&Header::new(self.algorithm()), &claims, &self.encoding_key)
            .map_err(|e| JwtError::EncodingError(e.to_string()))?;

        Ok(IssuedToken { token, jti })
    }

    /// Validates a token of either kind and returns its claims.
    pub fn validate_token(&self, token: &str) -> Result<Claims, JwtError> {
        let mut validation = Validation::new(self.algorithm());
        validation.validate_exp = true;
        validation.leeway = self.leeway_secs;

        let data = decode::<Claims>(token, &self.decoding_key, &validation).map_err(|e| {
            match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => JwtError::TokenExpired,
                jsonwebtoken::errors::ErrorKind::InvalidToken
                | jsonwebtoken::errors::ErrorKind::InvalidSignature => JwtError::InvalidToken,
                _ => JwtError::DecodingError(e.to_string()),
            }
        })?;

        Ok(data.claims)
    }

    /// Validates a token and requires it to be an access token.
    pub fn validate_access_token(&self, token: &str) -> Result<Claims, JwtError> {
        let claims = self.validate_token(token)?;
        if claims.token_type != TokenType::Access {
            return Err(JwtError::InvalidToken);
        }
        Ok(claims)
    }

    /// Validates a token and requires it to be a refresh token.
    pub fn validate_refresh_token(&self, token: &str) -> Result<Claims, JwtError> {
        let claims = self.validate_token(token)?;
        if claims.token_type != TokenType::Refresh {
            return Err(JwtError::InvalidToken);
        }
        Ok(claims)
    }

    // Tests sign with HS256 so they can use plain secrets.
    fn algorithm(&self) -> Algorithm {
        #[cfg(test)]
        {
            Algorithm::HS256
        }
        #[cfg(not(test))]
        {
            Algorithm::RS256
        }
    }
}

/// Strips surrounding quotes and turns literal `\n` sequences into newlines.
fn normalize_pem_key(key: &str) -> String {
    key.trim_matches('"').trim_matches('\'').replace("\\n", "\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread::sleep;
    use std::time::Duration as StdDuration;

    fn test_config() -> JwtConfig {
        JwtConfig::new_for_testing("unit-test-signing-secret")
    }

    #[test]
    fn test_issue_and_validate_access_token() {
        let config = test_config();
        let user_id = Uuid::new_v4();

        let issued = config.issue_access_token(user_id, "super_admin").unwrap();
        let claims = config.validate_access_token(&issued.token).unwrap();

        assert_eq!(claims.user_id().unwrap(), user_id);
        assert_eq!(claims.role, "super_admin");
        assert_eq!(claims.jti, issued.jti);
        assert_eq!(claims.token_type, TokenType::Access);
        assert_eq!(claims.exp - claims.iat, config.access_token_expiry_secs);
    }

    #[test]
    fn test_issue_and_validate_refresh_token() {
        let config = test_config();
        let issued = config.issue_refresh_token(Uuid::new_v4(), "operator").unwrap();
        let claims = config.validate_refresh_token(&issued.token).unwrap();

        assert_eq!(claims.role, "operator");
        assert_eq!(claims.token_type, TokenType::Refresh);
    }

    #[test]
    fn test_token_kinds_are_not_interchangeable() {
        let config = test_config();
        let access = config.issue_access_token(Uuid::new_v4(), "operator").unwrap();
        let refresh = config.issue_refresh_token(Uuid::new_v4(), "operator").unwrap();

        assert!(matches!(
            config.validate_refresh_token(&access.token),
            Err(JwtError::InvalidToken)
        ));
        assert!(matches!(
            config.validate_access_token(&refresh.token),
            Err(JwtError::InvalidToken)
        ));
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let mut config = test_config();
        config.access_token_expiry_secs = 1;

        let issued = config.issue_access_token(Uuid::new_v4(), "operator").unwrap();
        sleep(StdDuration::from_secs(2));

        assert!(matches!(
            config.validate_access_token(&issued.token),
            Err(JwtError::TokenExpired)
        ));
    }

    #[test]
    fn test_garbage_tokens_are_rejected() {
        let config = test_config();
        assert!(config.validate_token("not_a_jwt").is_err());
        assert!(config.validate_token("still.not.valid").is_err());
    }

    #[test]
    fn test_each_token_gets_a_fresh_jti() {
        let config = test_config();
        let user_id = Uuid::new_v4();

        let first = config.issue_access_token(user_id, "operator").unwrap();
        let second = config.issue_access_token(user_id, "operator").unwrap();

        assert_ne!(first.jti, second.jti);
    }

    #[test]
    fn test_user_id_rejects_non_uuid_subject() {
        let claims = Claims {
            sub: "not-a-uuid".to_string(),
            role: "operator".to_string(),
            exp: 0,
            iat: 0,
            jti: "jti".to_string(),
            token_type: TokenType::Access,
        };
        assert!(matches!(claims.user_id(), Err(JwtError::InvalidToken)));
    }

    #[test]
    fn test_token_type_serialization() {
        assert_eq!(serde_json::to_string(&TokenType::Access).unwrap(), "\"access\"");
        assert_eq!(serde_json::to_string(&TokenType::Refresh).unwrap(), "\"refresh\"");
    }

    #[test]
    fn test_normalize_pem_key_passthrough() {
        let key = "-----BEGIN KEY-----\nabc\n-----END KEY-----";
        assert_eq!(normalize_pem_key(key), key);
    }

    #[test]
    fn test_normalize_pem_key_unescapes_env_style_keys() {
        assert_eq!(
            normalize_pem_key("\"-----BEGIN KEY-----\\nabc\\n-----END KEY-----\""),
            "-----BEGIN KEY-----\nabc\n-----END KEY-----"
        );
    }

    #[test]
    fn test_debug_redacts_key_material() {
        let rendered = format!("{:?}", test_config());
        assert!(rendered.contains("[REDACTED]"));
        assert!(!rendered.contains("unit-test-signing-secret"));
    }
}
