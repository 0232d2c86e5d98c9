use anyhow::Context;
use tracing::{info, warn};

use super::{
    dto::{AuthResponse, LoginInput, PublicUser, RegisterInput},
    jwt::JwtKeys,
    password,
};
use crate::{
    db::{Datastore, NewUser, User},
    error::ApiError,
    progress::dto::GameStats,
};

/// KDF work is CPU-bound; keep it off the async workers.
async fn hash_blocking(plain: String) -> anyhow::Result<String> {
    tokio::task::spawn_blocking(move || password::hash_password(&plain))
        .await
        .context("password hashing task")?
}

async fn verify_blocking(plain: String, stored: String) -> anyhow::Result<bool> {
    tokio::task::spawn_blocking(move || password::verify_password(&plain, &stored))
        .await
        .context("password verification task")?
}

fn respond(keys: &JwtKeys, user: User) -> Result<AuthResponse, ApiError> {
    let token = keys.issue(user.id, &user.username)?;
    Ok(AuthResponse {
        success: true,
        token,
        user: PublicUser {
            id: user.id,
            username: user.username,
            email: user.email,
        },
    })
}

/// Create the account and its starting progress, then sign the user in.
///
/// The existence check only buys a friendlier error: two racing requests can
/// both pass it, and then the datastore's unique constraint rejects the
/// second insert, which surfaces as an internal error.
pub async fn register(
    store: &dyn Datastore,
    keys: &JwtKeys,
    input: RegisterInput,
) -> Result<AuthResponse, ApiError> {
    if store.user_exists(&input.username, &input.email).await? {
        warn!(username = %input.username, "registration for existing user");
        return Err(ApiError::UserExists);
    }

    let hash = hash_blocking(input.password).await?;
    let user = store
        .create_user(
            NewUser {
                username: &input.username,
                email: &input.email,
                password_hash: &hash,
            },
            &GameStats::INITIAL,
        )
        .await?;

    info!(user_id = user.id, username = %user.username, "user registered");
    respond(keys, user)
}

/// Unknown user, inactive account and wrong password all yield
/// [`ApiError::InvalidCredentials`].
pub async fn login(
    store: &dyn Datastore,
    keys: &JwtKeys,
    input: LoginInput,
) -> Result<AuthResponse, ApiError> {
    let user = match store.find_user_by_username(&input.username).await? {
        Some(u) if u.is_active => u,
        Some(u) => {
            warn!(user_id = u.id, "login for inactive account");
            return Err(ApiError::InvalidCredentials);
        }
        None => {
            warn!(username = %input.username, "login unknown username");
            return Err(ApiError::InvalidCredentials);
        }
    };

    if !verify_blocking(input.password, user.password_hash.clone()).await? {
        warn!(user_id = user.id, "login invalid password");
        return Err(ApiError::InvalidCredentials);
    }

    store.touch_last_login(user.id).await?;
    info!(user_id = user.id, previous_login = ?user.last_login, "user logged in");
    respond(keys, user)
}
