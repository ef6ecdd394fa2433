// src/middleware/auth.rs

use axum::{
    extract::{FromRequestParts, Request, State},
    http::request::Parts,
    middleware::Next,
    response::Response,
};
use axum_extra::{
    headers::{authorization::Bearer, Authorization},
    typed_header::TypedHeaderRejection,
    TypedHeader,
};

use crate::{
    common::error::AppError,
    config::AppState,
    models::auth::{User, UserRole},
};

// Valida o Bearer token e deixa o usuário nas extensions da requisição.
pub async fn auth_guard(
    State(app_state): State<AppState>,
    bearer: Result<TypedHeader<Authorization<Bearer>>, TypedHeaderRejection>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let TypedHeader(Authorization(bearer)) = bearer.map_err(|_| AppError::InvalidToken)?;

    let user = app_state.auth_service.validate_token(bearer.token()).await?;
    request.extensions_mut().insert(user);

    Ok(next.run(request).await)
}

/// Usuário da sessão atual (colocado pelo `auth_guard`).
pub struct AuthenticatedUser(pub User);

impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<User>()
            .cloned()
            .map(AuthenticatedUser)
            .ok_or(AppError::InvalidToken)
    }
}

/// Usuário autenticado com papel `admin`. Protege logs e exclusões.
pub struct AdminUser(pub User);

impl<S> FromRequestParts<S> for AdminUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let AuthenticatedUser(user) = AuthenticatedUser::from_request_parts(parts, state).await?;

        if user.role != UserRole::Admin {
            tracing::warn!("Acesso negado a {} ({:?})", user.email, user.role);
            return Err(AppError::Forbidden(
                "Somente administradores podem realizar esta ação.".into(),
            ));
        }

        Ok(AdminUser(user))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;
    use chrono::Utc;
    use uuid::Uuid;

    fn user(role: UserRole) -> User {
        User {
            id: Uuid::new_v4(),
            email: "loja@lazavii.com".into(),
            name: "Ana".into(),
            password_hash: String::new(),
            role,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    async fn admin_from(extension: Option<User>) -> Result<AdminUser, AppError> {
        let mut builder = Request::builder();
        if let Some(u) = extension {
            builder = builder.extension(u);
        }
        let (mut parts, _) = builder.body(()).unwrap().into_parts();
        AdminUser::from_request_parts(&mut parts, &()).await
    }

    #[tokio::test]
    async fn only_admins_pass_the_admin_extractor() {
        assert!(admin_from(Some(user(UserRole::Admin))).await.is_ok());
        assert!(matches!(admin_from(Some(user(UserRole::User))).await, Err(AppError::Forbidden(_))));
        assert!(matches!(admin_from(None).await, Err(AppError::InvalidToken)));
    }
}
