use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::{header::AUTHORIZATION, request::Parts},
};
use tracing::{error, warn};
use uuid::Uuid;

use super::{jwt::JwtKeys, repo::UserRepo, repo_types::Role};
use crate::{error::ApiError, state::AppState};

/// Authenticated caller, attached to the request once the token and the
/// backing user record have both been checked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthContext {
    pub id: Uuid,
    pub email: String,
    pub role: Role,
}

/// Pulls the token out of an `Authorization: Bearer <token>` value.
pub fn bearer_token(header: &str) -> Option<&str> {
    let (scheme, token) = header.trim().split_once(' ')?;
    let token = token.trim();
    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then_some(token)
}

/// Resolves an `Authorization` header value into an [`AuthContext`].
///
/// Every rejection is a bare `Unauthorized`; only store failures surface as
/// `Internal`.
pub async fn authenticate<R>(
    users: &R,
    keys: &JwtKeys,
    header: Option<&str>,
) -> Result<AuthContext, ApiError>
where
    R: UserRepo + ?Sized,
{
    let header = header.ok_or(ApiError::Unauthorized)?;
    let token = bearer_token(header).ok_or_else(|| {
        warn!("malformed authorization header");
        ApiError::Unauthorized
    })?;

    let identity = keys.verify(token).map_err(|e| {
        warn!(error = %e, "token rejected");
        ApiError::Unauthorized
    })?;

    let user = users.find_user(identity.user_id).await.map_err(|e| {
        error!(error = %e, user_id = %identity.user_id, "user lookup failed");
        ApiError::Internal(e.to_string())
    })?;

    match user {
        Some(u) if u.is_active => Ok(AuthContext {
            id: u.id,
            email: u.email,
            role: u.role,
        }),
        Some(u) => {
            warn!(user_id = %u.id, "token for inactive user");
            Err(ApiError::Unauthorized)
        }
        None => {
            warn!(user_id = %identity.user_id, "token for unknown user");
            Err(ApiError::Unauthorized)
        }
    }
}

/// Passes admins through, rejects everyone else.
pub fn require_admin(ctx: &AuthContext) -> Result<(), ApiError> {
    if ctx.role == Role::Admin {
        Ok(())
    } else {
        warn!(user_id = %ctx.id, "admin route denied");
        Err(ApiError::Forbidden)
    }
}

/// Extracts and validates the bearer token, yielding the caller's context.
pub struct AuthUser(pub AuthContext);

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        if let Some(ctx) = parts.extensions.get::<AuthContext>() {
            return Ok(AuthUser(ctx.clone()));
        }

        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|h| h.to_str().ok());
        let keys = JwtKeys::from_ref(state);
        let ctx = authenticate(state.store.as_ref(), &keys, header).await?;

        parts.extensions.insert(ctx.clone());
        Ok(AuthUser(ctx))
    }
}

/// [`AuthUser`] plus the admin role check.
pub struct AdminUser(pub AuthContext);

#[async_trait]
impl FromRequestParts<AppState> for AdminUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let AuthUser(ctx) = AuthUser::from_request_parts(parts, state).await?;
        require_admin(&ctx)?;
        Ok(AdminUser(ctx))
    }
}
