use tracing::{error, info, warn};
use validator::Validate;

use super::{
    dto::{normalize_email, AuthResponse, LoginRequest, PublicUser, RegisterRequest},
    password::{hash_password_blocking, verify_password_blocking},
    repo::UserRepo,
    repo_types::NewUser,
};
use crate::{error::ApiError, state::AppState};

pub async fn register(state: &AppState, req: RegisterRequest) -> Result<AuthResponse, ApiError> {
    let req = req.normalized();
    req.validate()?;

    if state.store.find_user_by_email(&req.email).await?.is_some() {
        warn!(email = %req.email, "email already registered");
        return Err(ApiError::Conflict("User already exists".into()));
    }

    let password_hash = hash_password_blocking(req.password).await?;
    let user = state
        .store
        .create_user(NewUser {
            email: req.email,
            password_hash,
            first_name: req.first_name,
            last_name: req.last_name,
            currency: req.currency,
            country: req.country,
        })
        .await?;

    let token = state.keys.issue(user.id, &user.email).map_err(|e| {
        error!(error = %e, "jwt sign failed");
        ApiError::Internal(e.to_string())
    })?;

    state.mailer.send_welcome(user.email.clone(), user.first_name.clone());

    info!(user_id = %user.id, email = %user.email, "user registered");
    Ok(AuthResponse {
        token,
        user: PublicUser::from(user),
    })
}

/// Unknown email, inactive account and wrong password all produce the same
/// `InvalidCredentials`.
pub async fn login(state: &AppState, mut req: LoginRequest) -> Result<AuthResponse, ApiError> {
    req.email = normalize_email(&req.email);
    req.validate()?;

    let user = match state.store.find_user_by_email(&req.email).await? {
        Some(u) if u.is_active => u,
        Some(u) => {
            warn!(user_id = %u.id, "login for inactive user");
            return Err(ApiError::InvalidCredentials);
        }
        None => {
            warn!(email = %req.email, "login unknown email");
            return Err(ApiError::InvalidCredentials);
        }
    };

    if !verify_password_blocking(req.password, user.password_hash.clone()).await? {
        warn!(user_id = %user.id, "login invalid password");
        return Err(ApiError::InvalidCredentials);
    }

    let token = state.keys.issue(user.id, &user.email).map_err(|e| {
        error!(error = %e, "jwt sign failed");
        ApiError::Internal(e.to_string())
    })?;

    info!(user_id = %user.id, "user logged in");
    Ok(AuthResponse {
        token,
        user: PublicUser::from(user),
    })
}
