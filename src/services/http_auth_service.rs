// src/services/http_auth_service.rs

use async_trait::async_trait;
use serde_json::json;

use crate::{
    common::error::AppResult,
    models::auth::{LoginRequest, LoginResponse, RefreshResponse, SessionUser, User},
    services::{http_client::ApiClient, ports::AuthService},
    storage::{HTTP_USER_KEY, TOKEN_KEY},
};

#[derive(Clone)]
pub struct HttpAuthService {
    api: ApiClient,
}

impl HttpAuthService {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    fn clear_session(&self) {
        let storage = self.api.storage();
        for key in [TOKEN_KEY, HTTP_USER_KEY] {
            if let Err(e) = storage.remove(key) {
                tracing::warn!("Falha ao limpar {}: {}", key, e);
            }
        }
    }
}

#[async_trait]
impl AuthService for HttpAuthService {
    async fn login(&self, dto: LoginRequest) -> AppResult<LoginResponse> {
        let response: LoginResponse = self.api.post("/auth/login", &dto).await?;

        let storage = self.api.storage();
        storage.set(TOKEN_KEY, &response.token)?;
        storage.set(HTTP_USER_KEY, &serde_json::to_string(&response.user)?)?;

        Ok(response)
    }

    // A sessão local é limpa mesmo se a chamada remota falhar
    async fn logout(&self) -> AppResult<()> {
        let result = self.api.post_empty("/auth/logout", &json!({})).await;
        self.clear_session();
        result
    }

    fn current_user(&self) -> Option<User> {
        let raw = self.api.storage().get(HTTP_USER_KEY).ok().flatten()?;
        match serde_json::from_str::<SessionUser>(&raw) {
            Ok(user) => Some(User::from(user)),
            Err(e) => {
                tracing::warn!("Usuário gravado ilegível: {}", e);
                None
            }
        }
    }

    async fn refresh_token(&self) -> AppResult<String> {
        let response: RefreshResponse = self.api.post("/auth/refresh", &json!({})).await?;
        self.api.storage().set(TOKEN_KEY, &response.token)?;
        Ok(response.token)
    }

    fn is_authenticated(&self) -> bool {
        matches!(self.api.storage().get(TOKEN_KEY), Ok(Some(_)))
    }
}
