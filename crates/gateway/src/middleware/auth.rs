//! Bearer token authentication.
//!
//! Tokens are issued elsewhere; this layer only verifies the HS256 signature
//! and expiry, then resolves the `sub` claim to a registered user.

use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::Response,
};
use axum_extra::{
    headers::{authorization::Bearer, Authorization},
    TypedHeader,
};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use common::{AppError, AppResult, JwtConfig};
use domain::User;

use crate::state::AppState;

/// JWT claims payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Id of the calling user
    pub sub: Uuid,
    pub exp: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iat: Option<i64>,
}

/// Verifies bearer tokens against the shared secret.
pub struct TokenVerifier {
    key: DecodingKey,
    validation: Validation,
}

impl TokenVerifier {
    pub fn new(config: &JwtConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = config.leeway_seconds;

        Self {
            key: DecodingKey::from_secret(config.secret.as_bytes()),
            validation,
        }
    }

    /// Check signature and expiry, returning the claims.
    pub fn verify(&self, token: &str) -> AppResult<Claims> {
        let data = decode::<Claims>(token, &self.key, &self.validation)?;
        Ok(data.claims)
    }
}

/// The authenticated caller, resolved from the token subject.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

/// Authentication middleware that validates JWT tokens.
pub async fn auth_middleware(
    State(state): State<AppState>,
    bearer: Option<TypedHeader<Authorization<Bearer>>>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let TypedHeader(Authorization(bearer)) = bearer.ok_or(AppError::Unauthorized)?;

    let claims = state.tokens.verify(bearer.token()).map_err(|e| {
        tracing::warn!(error = %e, "rejected bearer token");
        e
    })?;

    // A valid token for a user that no longer exists is still unauthenticated
    let user = match state.services.identity.resolve(claims.sub).await {
        Err(AppError::UserNotFound(id)) => {
            tracing::warn!(user_id = %id, "token subject is not a registered user");
            return Err(AppError::Unauthorized);
        }
        other => other?,
    };

    request.extensions_mut().insert(CurrentUser(user));

    Ok(next.run(request).await)
}
