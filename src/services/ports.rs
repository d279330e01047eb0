// src/services/ports.rs

//! Contratos dos serviços. Cada um tem uma implementação local (sobre o
//! `StudentStore`) e uma HTTP (sobre o backend configurado).

use async_trait::async_trait;

use crate::{
    common::error::AppResult,
    models::{
        auth::{LoginRequest, LoginResponse, User},
        payment::{CreatePaymentRequest, PaymentResponse, PaymentSummary},
        student::{
            CreateStudentRequest, Instrument, PaymentStatus, StudentResponse, UpdateStudentRequest,
        },
    },
};

#[async_trait]
pub trait StudentService: Send + Sync {
    async fn get_all(&self) -> AppResult<Vec<StudentResponse>>;
    async fn get_by_id(&self, id: &str) -> AppResult<Option<StudentResponse>>;
    async fn create(&self, dto: CreateStudentRequest) -> AppResult<StudentResponse>;
    async fn update(&self, id: &str, dto: UpdateStudentRequest) -> AppResult<StudentResponse>;
    async fn delete(&self, id: &str) -> AppResult<()>;
    async fn search(&self, query: &str) -> AppResult<Vec<StudentResponse>>;
    async fn get_by_instrument(&self, instrument: Instrument) -> AppResult<Vec<StudentResponse>>;
    async fn get_by_payment_status(&self, status: PaymentStatus) -> AppResult<Vec<StudentResponse>>;
}

#[async_trait]
pub trait PaymentService: Send + Sync {
    async fn get_all(&self) -> AppResult<Vec<PaymentResponse>>;
    async fn get_by_student_id(&self, student_id: &str) -> AppResult<Vec<PaymentResponse>>;
    async fn create(&self, dto: CreatePaymentRequest) -> AppResult<PaymentResponse>;
    async fn record_payment(&self, student_id: &str, month: &str) -> AppResult<()>;
    async fn get_summary(&self) -> AppResult<PaymentSummary>;
    async fn get_overdue_payments(&self) -> AppResult<Vec<PaymentResponse>>;
}

#[async_trait]
pub trait AuthService: Send + Sync {
    async fn login(&self, dto: LoginRequest) -> AppResult<LoginResponse>;
    async fn logout(&self) -> AppResult<()>;
    fn current_user(&self) -> Option<User>;
    async fn refresh_token(&self) -> AppResult<String>;
    fn is_authenticated(&self) -> bool;
}
