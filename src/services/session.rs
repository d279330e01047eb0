// src/services/session.rs

use std::sync::{Arc, PoisonError, RwLock};

use crate::{
    models::auth::{LoginRequest, User, UserRole},
    services::ports::AuthService,
};

/// Estado de autenticação do painel: anônimo ou autenticado com um usuário.
///
/// Começa autenticado se o armazenamento já tiver uma sessão gravada.
pub struct AuthSession {
    service: Arc<dyn AuthService>,
    user: RwLock<Option<User>>,
}

impl AuthSession {
    pub fn new(service: Arc<dyn AuthService>) -> Self {
        let restored = service.current_user();
        if let Some(user) = &restored {
            tracing::debug!("Sessão restaurada para {}", user.email);
        }
        Self {
            service,
            user: RwLock::new(restored),
        }
    }

    /// Falha de credencial não é erro: só devolve `false` e continua anônimo.
    pub async fn login(&self, email: &str, password: &str) -> bool {
        let request = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };

        match self.service.login(request).await {
            Ok(response) => {
                let user = self
                    .service
                    .current_user()
                    .unwrap_or_else(|| User::from(response.user));
                *self.user.write().unwrap_or_else(PoisonError::into_inner) = Some(user);
                true
            }
            Err(e) => {
                tracing::warn!("Login recusado para {}: {}", email, e);
                false
            }
        }
    }

    pub async fn logout(&self) {
        *self.user.write().unwrap_or_else(PoisonError::into_inner) = None;
        if let Err(e) = self.service.logout().await {
            tracing::warn!("Falha ao encerrar a sessão: {}", e);
        }
    }

    pub fn user(&self) -> Option<User> {
        self.user.read().unwrap_or_else(PoisonError::into_inner).clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.user().is_some()
    }

    pub fn is_admin(&self) -> bool {
        self.user().is_some_and(|u| u.role == UserRole::Admin)
    }

    pub fn is_student(&self) -> bool {
        self.user().is_some_and(|u| u.role == UserRole::Student)
    }
}
