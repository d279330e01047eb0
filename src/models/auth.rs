// src/models/auth.rs

use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Admin,
    Student,
}

// Usuário da sessão. Não existe cadastro de usuários: a lista é sintetizada
// a partir dos alunos (ver services::auth::UserDirectory).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub email: String,
    // Texto puro: só serve para a base de demonstração
    #[serde(default)]
    pub password: String,
    pub role: UserRole,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub student_id: Option<String>, // só para role = student
    pub name: String,
}

impl User {
    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }
}

/// Visão pública do usuário, sem senha.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionUser {
    pub id: String,
    pub email: String,
    pub name: String,
    pub role: UserRole,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub student_id: Option<String>,
}

impl From<&User> for SessionUser {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.clone(),
            email: user.email.clone(),
            name: user.name.clone(),
            role: user.role,
            student_id: user.student_id.clone(),
        }
    }
}

impl From<SessionUser> for User {
    fn from(user: SessionUser) -> Self {
        Self {
            id: user.id,
            email: user.email,
            password: String::new(),
            role: user.role,
            student_id: user.student_id,
            name: user.name,
        }
    }
}

// Dados para login
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "O e-mail fornecido é inválido."))]
    pub email: String,
    #[validate(length(min = 1, message = "A senha é obrigatória."))]
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub user: SessionUser,
    pub token: String,
    pub expires_in: u64, // segundos
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshResponse {
    pub token: String,
}

// Estrutura de dados ("claims") dentro do JWT do servidor de referência
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // id do usuário
    pub role: UserRole,
    pub exp: usize,
    pub iat: usize,
    pub jti: Uuid,
}
