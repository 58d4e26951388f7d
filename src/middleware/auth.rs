use axum::{extract::FromRequestParts, http::header};
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter};
use uuid::Uuid;

use crate::{
    entity::{
        accounts::{Column as AccountCol, Entity as Accounts},
        enums::AccountRole,
    },
    error::AppError,
    models::Account,
    state::AppState,
};

/// The caller behind a verified bearer token, resolved against the account
/// store.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: Uuid,
    pub role: AccountRole,
    pub account: Account,
}

impl AuthUser {
    pub fn is_admin(&self) -> bool {
        self.role == AccountRole::Admin
    }
}

pub fn ensure_admin(user: &AuthUser) -> Result<(), AppError> {
    if !user.is_admin() {
        return Err(AppError::Forbidden("Admins only".into()));
    }
    Ok(())
}

/// Pulls the token out of `Authorization: Bearer <token>`.
pub fn bearer_token(value: Option<&header::HeaderValue>) -> Option<&str> {
    let token = value?.to_str().ok()?.strip_prefix("Bearer ")?.trim();
    (!token.is_empty()).then_some(token)
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut axum::http::request::Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts.headers.get(header::AUTHORIZATION))
            .ok_or_else(|| AppError::Unauthorized("No token provided".into()))?;

        let subject = state.sessions.verify(token)?;

        let account = Accounts::find_by_id(subject.account_id)
            .filter(AccountCol::Role.eq(subject.role))
            .one(&state.orm)
            .await?
            .ok_or_else(|| {
                tracing::debug!(account_id = %subject.account_id, "token subject not found");
                AppError::Forbidden("Account not found".into())
            })?;

        Ok(AuthUser {
            user_id: account.id,
            role: account.role,
            account: Account::from_entity(account),
        })
    }
}
