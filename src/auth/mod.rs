use axum::{
    http::{header::AUTHORIZATION, HeaderMap, StatusCode},
    response::{IntoResponse, Json, Response},
};
use chrono::{Duration, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::config::{AuthConfig, ConfigError, TokenAlgorithm};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub exp: i64,
    pub iat: i64,
    /// String or list of strings, depending on the issuer
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aud: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iss: Option<String>,
    /// Absent (not just empty) when the issuer did not grant scopes at all
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub permissions: Option<Vec<String>>,
}

impl Claims {
    /// Fails when the configured lifetime does not fit a timestamp
    pub fn new(subject: impl Into<String>, permissions: Vec<String>, config: &AuthConfig) -> Result<Self, JwtError> {
        let now = Utc::now();
        let hours = config.token_expiry_hours;
        let exp = i64::try_from(hours)
            .ok()
            .and_then(Duration::try_hours)
            .and_then(|lifetime| now.checked_add_signed(lifetime))
            .ok_or(JwtError::InvalidExpiry(hours))?
            .timestamp();

        Ok(Self {
            sub: subject.into(),
            exp,
            iat: now.timestamp(),
            aud: config.audience.clone().map(Value::String),
            iss: config.issuer.clone(),
            permissions: Some(permissions),
        })
    }
}

/// Authentication/authorization failure with its own status and envelope
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthError {
    pub status: u16,
    pub code: &'static str,
    pub description: &'static str,
}

impl AuthError {
    const fn new(status: u16, code: &'static str, description: &'static str) -> Self {
        Self { status, code, description }
    }

    pub fn header_missing() -> Self {
        Self::new(401, "authorization_header_missing", "Authorization header is expected.")
    }

    pub fn not_bearer() -> Self {
        Self::new(401, "invalid_header", "Authorization header must start with \"Bearer\".")
    }

    pub fn token_missing() -> Self {
        Self::new(401, "invalid_header", "Token not found.")
    }

    pub fn too_many_parts() -> Self {
        Self::new(401, "invalid_header", "Authorization header must be bearer token.")
    }

    pub fn expired() -> Self {
        Self::new(401, "token_expired", "Token expired.")
    }

    pub fn bad_claims() -> Self {
        Self::new(401, "invalid_claims", "Incorrect claims. Please, check the audience and issuer.")
    }

    pub fn unparseable() -> Self {
        Self::new(401, "invalid_header", "Unable to parse authentication token.")
    }

    pub fn permissions_missing() -> Self {
        Self::new(400, "invalid_claims", "Permissions not included in JWT.")
    }

    pub fn permission_denied() -> Self {
        Self::new(403, "unauthorized", "Permission not found.")
    }

    pub fn to_json(&self) -> Value {
        json!({
            "success": false,
            "error": self.status,
            "code": self.code,
            "message": self.description
        })
    }
}

impl std::fmt::Display for AuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({}): {}", self.status, self.code, self.description)
    }
}

impl std::error::Error for AuthError {}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.status).unwrap_or(StatusCode::UNAUTHORIZED);
        (status, Json(self.to_json())).into_response()
    }
}

#[derive(Debug)]
pub enum JwtError {
    TokenGeneration(String),
    UnsupportedAlgorithm,
    InvalidExpiry(u64),
}

impl std::fmt::Display for JwtError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            JwtError::TokenGeneration(msg) => write!(f, "JWT generation error: {}", msg),
            JwtError::UnsupportedAlgorithm => {
                write!(f, "Only HS256 tokens can be minted locally; RS256 tokens come from the identity provider")
            }
            JwtError::InvalidExpiry(hours) => write!(f, "Token lifetime of {} hours is out of range", hours),
        }
    }
}

impl std::error::Error for JwtError {}

/// Sign claims with the configured HS256 secret
pub fn generate_jwt(claims: &Claims, config: &AuthConfig) -> Result<String, JwtError> {
    if config.algorithm != TokenAlgorithm::HS256 {
        return Err(JwtError::UnsupportedAlgorithm);
    }
    if config.jwt_secret.is_empty() {
        return Err(JwtError::TokenGeneration("JWT secret not configured".to_string()));
    }

    let encoding_key = EncodingKey::from_secret(config.jwt_secret.as_bytes());
    encode(&Header::new(Algorithm::HS256), claims, &encoding_key)
        .map_err(|e| JwtError::TokenGeneration(e.to_string()))
}

/// Extract the token from `Authorization: Bearer <token>`
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, AuthError> {
    let header = headers.get(AUTHORIZATION).ok_or_else(AuthError::header_missing)?;
    let value = header.to_str().map_err(|_| AuthError::not_bearer())?;

    let mut parts = value.split_whitespace();
    match parts.next() {
        Some(scheme) if scheme.eq_ignore_ascii_case("bearer") => {}
        _ => return Err(AuthError::not_bearer()),
    }
    let token = parts.next().ok_or_else(AuthError::token_missing)?;
    if parts.next().is_some() {
        return Err(AuthError::too_many_parts());
    }
    Ok(token)
}

/// Fail unless the token grants `permission`
pub fn check_permission(claims: &Claims, permission: &str) -> Result<(), AuthError> {
    let granted = claims.permissions.as_ref().ok_or_else(AuthError::permissions_missing)?;
    if granted.iter().any(|p| p == permission) {
        Ok(())
    } else {
        Err(AuthError::permission_denied())
    }
}

/// Verifies token signature, expiry, audience and issuer
pub struct TokenVerifier {
    key: DecodingKey,
    validation: Validation,
}

impl TokenVerifier {
    pub fn from_config(config: &AuthConfig) -> Result<Self, ConfigError> {
        let (key, algorithm) = match config.algorithm {
            TokenAlgorithm::HS256 => {
                if config.jwt_secret.is_empty() {
                    return Err(ConfigError::Missing("AUTH_JWT_SECRET"));
                }
                (DecodingKey::from_secret(config.jwt_secret.as_bytes()), Algorithm::HS256)
            }
            TokenAlgorithm::RS256 => {
                let pem = config
                    .public_key_pem
                    .as_deref()
                    .ok_or(ConfigError::Missing("AUTH_PUBLIC_KEY_PATH"))?;
                let key = DecodingKey::from_rsa_pem(pem.as_bytes()).map_err(|e| ConfigError::Invalid {
                    name: "AUTH_PUBLIC_KEY_PATH",
                    value: e.to_string(),
                })?;
                (key, Algorithm::RS256)
            }
        };

        let mut validation = Validation::new(algorithm);
        match &config.audience {
            Some(aud) => validation.set_audience(&[aud]),
            None => validation.validate_aud = false,
        }
        if let Some(iss) = &config.issuer {
            validation.set_issuer(&[iss]);
        }

        Ok(Self { key, validation })
    }

    pub fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        decode::<Claims>(token, &self.key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => AuthError::expired(),
                ErrorKind::InvalidAudience | ErrorKind::InvalidIssuer => AuthError::bad_claims(),
                _ => {
                    tracing::debug!("Token rejected: {}", e);
                    AuthError::unparseable()
                }
            })
    }

    /// Full check for one request: header, token, then permission
    pub fn authorize(&self, headers: &HeaderMap, permission: &str) -> Result<Claims, AuthError> {
        let token = bearer_token(headers)?;
        let claims = self.verify(token)?;
        check_permission(&claims, permission)?;
        Ok(claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn config() -> AuthConfig {
        crate::config::AppConfig::development().auth
    }

    fn headers(value: &str) -> HeaderMap {
        let mut h = HeaderMap::new();
        h.insert(AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        h
    }

    fn token(permissions: Option<Vec<&str>>, cfg: &AuthConfig) -> String {
        let mut claims = Claims::new("barista", vec![], cfg).unwrap();
        claims.permissions = permissions.map(|p| p.into_iter().map(String::from).collect());
        generate_jwt(&claims, cfg).unwrap()
    }

    #[test]
    fn bearer_header_shapes() {
        assert_eq!(bearer_token(&HeaderMap::new()), Err(AuthError::header_missing()));
        assert_eq!(bearer_token(&headers("Basic abc")), Err(AuthError::not_bearer()));
        assert_eq!(bearer_token(&headers("Bearer")), Err(AuthError::token_missing()));
        assert_eq!(bearer_token(&headers("Bearer a b")), Err(AuthError::too_many_parts()));
        assert_eq!(bearer_token(&headers("Bearer abc")), Ok("abc"));
    }

    #[test]
    fn verifies_signed_token_and_permissions() {
        let cfg = config();
        let verifier = TokenVerifier::from_config(&cfg).unwrap();
        let h = headers(&format!("Bearer {}", token(Some(vec!["post:drinks"]), &cfg)));

        assert!(verifier.authorize(&h, "post:drinks").is_ok());
        assert_eq!(
            verifier.authorize(&h, "delete:drinks").unwrap_err(),
            AuthError::permission_denied()
        );
    }

    #[test]
    fn missing_permissions_claim_is_bad_request() {
        let cfg = config();
        let verifier = TokenVerifier::from_config(&cfg).unwrap();
        let h = headers(&format!("Bearer {}", token(None, &cfg)));
        let err = verifier.authorize(&h, "post:drinks").unwrap_err();
        assert_eq!(err.status, 400);
    }

    #[test]
    fn rejects_foreign_signature_and_expired_tokens() {
        let cfg = config();
        let verifier = TokenVerifier::from_config(&cfg).unwrap();

        let mut other = cfg.clone();
        other.jwt_secret = "someone-else".to_string();
        assert_eq!(
            verifier.verify(&token(Some(vec![]), &other)).unwrap_err(),
            AuthError::unparseable()
        );

        let mut claims = Claims::new("barista", vec![], &cfg).unwrap();
        claims.exp = Utc::now().timestamp() - 3600;
        let expired = generate_jwt(&claims, &cfg).unwrap();
        assert_eq!(verifier.verify(&expired).unwrap_err(), AuthError::expired());
    }

    #[test]
    fn enforces_audience_when_configured() {
        let mut cfg = config();
        cfg.audience = Some("coffee".to_string());
        let verifier = TokenVerifier::from_config(&cfg).unwrap();

        let mut wrong = cfg.clone();
        wrong.audience = Some("tea".to_string());
        assert_eq!(
            verifier.verify(&token(Some(vec![]), &wrong)).unwrap_err(),
            AuthError::bad_claims()
        );
        assert!(verifier.verify(&token(Some(vec![]), &cfg)).is_ok());
    }

    #[test]
    fn out_of_range_lifetime_is_an_error() {
        let mut cfg = config();
        cfg.token_expiry_hours = 99_999_999_999_999;
        assert!(matches!(
            Claims::new("barista", vec![], &cfg),
            Err(JwtError::InvalidExpiry(99_999_999_999_999))
        ));

        cfg.token_expiry_hours = u64::MAX;
        assert!(matches!(Claims::new("barista", vec![], &cfg), Err(JwtError::InvalidExpiry(_))));

        cfg.token_expiry_hours = 24;
        let claims = Claims::new("barista", vec![], &cfg).unwrap();
        assert_eq!(claims.exp - claims.iat, 24 * 3600);
    }
}
