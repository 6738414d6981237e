//! Admin token service

use actix_web::{HttpMessage, HttpRequest};
use jsonwebtoken::{
    Algorithm, DecodingKey, EncodingKey, Header, TokenData, Validation, decode, encode,
};
use vitrine_common::{VitrineError, error::Result};

use super::model::{AdminClaims, AdminIdentity, AdminRole, AuthContext, AuthSettings, DEFAULT_SUBJECT};

const UNAUTHORIZED: &str = "Unauthorized";
const INVALID_TOKEN: &str = "Invalid token";
const INVALID_TOKEN_PAYLOAD: &str = "Invalid token payload";

/// Decode and validate a signed admin token
pub fn decode_admin_token(
    token: &str,
    secret_key: &str,
) -> jsonwebtoken::errors::Result<TokenData<AdminClaims>> {
    let mut validation = Validation::new(Algorithm::HS256);
    // exp is still checked when present
    validation.required_spec_claims.clear();

    decode::<AdminClaims>(
        token,
        &DecodingKey::from_secret(secret_key.as_bytes()),
        &validation,
    )
}

/// Sign admin claims with the shared secret
pub fn encode_admin_token(
    claims: &AdminClaims,
    secret_key: &str,
) -> jsonwebtoken::errors::Result<String> {
    encode(
        &Header::new(Algorithm::HS256),
        claims,
        &EncodingKey::from_secret(secret_key.as_bytes()),
    )
}

/// Resolve a bearer token to an admin identity.
pub fn authenticate(token: &str, settings: &AuthSettings) -> Result<AdminIdentity> {
    if token == settings.admin_token {
        return Ok(AdminIdentity::legacy_owner(&settings.admin_username));
    }

    let claims = decode_admin_token(token, &settings.admin_token)
        .map_err(|_| VitrineError::Unauthorized(INVALID_TOKEN.to_string()))?
        .claims;

    let username = claims
        .username
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| VitrineError::Unauthorized(INVALID_TOKEN_PAYLOAD.to_string()))?;

    let role = AdminRole::parse(claims.role.as_deref());
    Ok(AdminIdentity {
        sub: claims
            .sub
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| DEFAULT_SUBJECT.to_string()),
        username: username.to_string(),
        email: claims.email,
        is_main: claims.is_main.unwrap_or(false) || role == AdminRole::Owner,
        role,
    })
}

/// Authorize a write request from the context the middleware attached.
pub fn require_admin(req: &HttpRequest) -> Result<AdminIdentity> {
    let context = req.extensions().get::<AuthContext>().cloned();

    match context {
        Some(AuthContext {
            identity: Some(identity),
            ..
        }) => Ok(identity),
        Some(AuthContext {
            token_provided: true,
            error: Some(message),
            ..
        }) => Err(VitrineError::Unauthorized(message)),
        _ => Err(VitrineError::Unauthorized(UNAUTHORIZED.to_string())),
    }
}
