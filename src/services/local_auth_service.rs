// src/services/local_auth_service.rs

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;

use crate::{
    common::error::{AppError, AppResult},
    models::auth::{LoginRequest, LoginResponse, SessionUser, User},
    services::{
        auth::{UserDirectory, TOKEN_TTL_SECS},
        ports::AuthService,
    },
    storage::{DurableStorage, SESSION_KEY},
};

/// Auth local: confere credenciais na lista sintetizada e guarda o usuário
/// no armazenamento. A sessão não expira.
#[derive(Clone)]
pub struct LocalAuthService {
    directory: UserDirectory,
    storage: Arc<dyn DurableStorage>,
}

impl LocalAuthService {
    pub fn new(directory: UserDirectory, storage: Arc<dyn DurableStorage>) -> Self {
        Self { directory, storage }
    }

    fn load_session(&self) -> AppResult<Option<User>> {
        match self.storage.get(SESSION_KEY)? {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }
}

#[async_trait]
impl AuthService for LocalAuthService {
    async fn login(&self, dto: LoginRequest) -> AppResult<LoginResponse> {
        let user = self
            .directory
            .authenticate(&dto.email, &dto.password)
            .ok_or(AppError::InvalidCredentials)?;

        self.storage.set(SESSION_KEY, &serde_json::to_string(&user)?)?;

        Ok(LoginResponse {
            token: format!("mock-token-{}", user.id),
            user: SessionUser::from(&user),
            expires_in: TOKEN_TTL_SECS,
        })
    }

    async fn logout(&self) -> AppResult<()> {
        self.storage.remove(SESSION_KEY)
    }

    fn current_user(&self) -> Option<User> {
        self.load_session().unwrap_or_else(|e| {
            tracing::warn!("Sessão gravada ilegível, ignorando: {}", e);
            None
        })
    }

    async fn refresh_token(&self) -> AppResult<String> {
        Ok(format!("mock-refreshed-token-{}", Utc::now().timestamp_millis()))
    }

    fn is_authenticated(&self) -> bool {
        self.current_user().is_some()
    }
}
