// src/services/auth.rs

use std::sync::Arc;

use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use uuid::Uuid;

use crate::{
    common::error::{AppError, AppResult},
    db::StudentStore,
    models::auth::{Claims, LoginResponse, SessionUser, User, UserRole},
};

pub const ADMIN_ID: &str = "admin-1";
pub const ADMIN_EMAIL: &str = "admin@escola.com";
pub const ADMIN_PASSWORD: &str = "admin123";
/// Senha fixa de todos os logins de aluno.
pub const STUDENT_PASSWORD: &str = "aluno123";
/// Só os primeiros alunos (na ordem do store) ganham login.
pub const STUDENT_LOGINS: usize = 10;
pub const TOKEN_TTL_SECS: u64 = 3600;

/// Lista de usuários sintetizada: um admin fixo mais um usuário por aluno.
#[derive(Clone)]
pub struct UserDirectory {
    store: Arc<StudentStore>,
}

impl UserDirectory {
    pub fn new(store: Arc<StudentStore>) -> Self {
        Self { store }
    }

    fn admin() -> User {
        User {
            id: ADMIN_ID.to_string(),
            email: ADMIN_EMAIL.to_string(),
            password: ADMIN_PASSWORD.to_string(),
            role: UserRole::Admin,
            student_id: None,
            name: "Administrador".to_string(),
        }
    }

    pub fn users(&self) -> Vec<User> {
        let students = self.store.get_students();
        let student_users = students.into_iter().take(STUDENT_LOGINS).map(|s| User {
            id: format!("user-{}", s.id),
            email: s.email,
            password: STUDENT_PASSWORD.to_string(),
            role: UserRole::Student,
            student_id: Some(s.id),
            name: s.name,
        });

        std::iter::once(Self::admin()).chain(student_users).collect()
    }

    /// Comparação exata de e-mail e senha.
    pub fn authenticate(&self, email: &str, password: &str) -> Option<User> {
        self.users()
            .into_iter()
            .find(|u| u.email == email && u.password == password)
    }

    pub fn find_by_id(&self, id: &str) -> Option<User> {
        self.users().into_iter().find(|u| u.id == id)
    }
}

// =============================================================================
//  TOKENS DO SERVIDOR DE REFERÊNCIA
// =============================================================================

#[derive(Clone)]
pub struct TokenService {
    directory: UserDirectory,
    jwt_secret: String,
}

impl TokenService {
    pub fn new(directory: UserDirectory, jwt_secret: String) -> Self {
        Self { directory, jwt_secret }
    }

    pub fn login_user(&self, email: &str, password: &str) -> AppResult<LoginResponse> {
        let user = self
            .directory
            .authenticate(email, password)
            .ok_or(AppError::InvalidCredentials)?;

        let token = self.create_token(&user)?;
        tracing::info!("🔑 Login de {} ({:?})", user.email, user.role);

        Ok(LoginResponse {
            user: SessionUser::from(&user),
            token,
            expires_in: TOKEN_TTL_SECS,
        })
    }

    pub fn validate_token(&self, token: &str) -> AppResult<User> {
        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.jwt_secret.as_ref()),
            &Validation::default(),
        )
        .map_err(|_| AppError::InvalidToken)?;

        // O usuário pode ter sumido (aluno excluído) depois da emissão
        self.directory
            .find_by_id(&token_data.claims.sub)
            .ok_or(AppError::InvalidToken)
    }

    pub fn create_token(&self, user: &User) -> AppResult<String> {
        let now = Utc::now();
        let expires_at = now + chrono::Duration::seconds(TOKEN_TTL_SECS as i64);

        let claims = Claims {
            sub: user.id.clone(),
            role: user.role,
            exp: expires_at.timestamp() as usize,
            iat: now.timestamp() as usize,
            jti: Uuid::new_v4(),
        };

        Ok(encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.jwt_secret.as_ref()),
        )?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{db::StoreOptions, storage::MemoryStorage};

    fn directory(seed_count: usize) -> UserDirectory {
        let options = StoreOptions { seed_count, ..Default::default() };
        let store = StudentStore::open(Arc::new(MemoryStorage::new()), options).unwrap();
        UserDirectory::new(Arc::new(store))
    }

    #[test]
    fn admin_plus_first_ten_students() {
        let dir = directory(25);
        let users = dir.users();
        assert_eq!(users.len(), 1 + STUDENT_LOGINS);
        assert_eq!(users[0].role, UserRole::Admin);
        assert!(users[1..].iter().all(|u| u.role == UserRole::Student && u.student_id.is_some()));
    }

    #[test]
    fn student_logs_in_with_fixed_password() {
        let dir = directory(3);
        let first = dir.users()[1].clone();
        let found = dir.authenticate(&first.email, STUDENT_PASSWORD).unwrap();
        assert_eq!(found.id, format!("user-{}", first.student_id.unwrap()));
        assert!(dir.authenticate(&first.email, ADMIN_PASSWORD).is_none());
    }

    #[test]
    fn issued_token_validates_back_to_user() {
        let tokens = TokenService::new(directory(0), "segredo-de-teste".into());
        let response = tokens.login_user(ADMIN_EMAIL, ADMIN_PASSWORD).unwrap();
        assert_eq!(response.expires_in, TOKEN_TTL_SECS);

        let user = tokens.validate_token(&response.token).unwrap();
        assert_eq!(user.id, ADMIN_ID);

        let other = TokenService::new(directory(0), "outro-segredo".into());
        assert!(matches!(other.validate_token(&response.token), Err(AppError::InvalidToken)));
        assert!(matches!(
            tokens.login_user(ADMIN_EMAIL, "errada"),
            Err(AppError::InvalidCredentials)
        ));
    }
}
