// src/services/http_payment_service.rs

use async_trait::async_trait;

use crate::{
    common::error::AppResult,
    models::payment::{CreatePaymentRequest, PaymentResponse, PaymentSummary, RecordPaymentRequest},
    services::{
        http_client::{path_segment, ApiClient},
        ports::PaymentService,
    },
};

#[derive(Clone)]
pub struct HttpPaymentService {
    api: ApiClient,
}

impl HttpPaymentService {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }
}

#[async_trait]
impl PaymentService for HttpPaymentService {
    async fn get_all(&self) -> AppResult<Vec<PaymentResponse>> {
        self.api.get("/payments").await
    }

    async fn get_by_student_id(&self, student_id: &str) -> AppResult<Vec<PaymentResponse>> {
        self.api.get(&format!("/payments/student/{}", path_segment(student_id))).await
    }

    async fn create(&self, dto: CreatePaymentRequest) -> AppResult<PaymentResponse> {
        self.api.post("/payments", &dto).await
    }

    async fn record_payment(&self, student_id: &str, month: &str) -> AppResult<()> {
        let body = RecordPaymentRequest {
            student_id: student_id.to_string(),
            month: month.to_string(),
        };
        self.api.post_empty("/payments/record", &body).await
    }

    async fn get_summary(&self) -> AppResult<PaymentSummary> {
        self.api.get("/payments/summary").await
    }

    async fn get_overdue_payments(&self) -> AppResult<Vec<PaymentResponse>> {
        self.api.get("/payments/overdue").await
    }
}
