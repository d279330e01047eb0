// src/services/http_student_service.rs

use async_trait::async_trait;

use crate::{
    common::error::{AppError, AppResult},
    models::student::{
        CreateStudentRequest, Instrument, PaymentStatus, StudentResponse, UpdateStudentRequest,
    },
    services::{
        http_client::{path_segment, ApiClient},
        ports::StudentService,
    },
};

#[derive(Clone)]
pub struct HttpStudentService {
    api: ApiClient,
}

impl HttpStudentService {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }
}

#[async_trait]
impl StudentService for HttpStudentService {
    async fn get_all(&self) -> AppResult<Vec<StudentResponse>> {
        self.api.get("/students").await
    }

    async fn get_by_id(&self, id: &str) -> AppResult<Option<StudentResponse>> {
        match self.api.get(&format!("/students/{}", path_segment(id))).await {
            Ok(student) => Ok(Some(student)),
            Err(AppError::Api(e)) if e.status == 404 => Ok(None),
            Err(e) => Err(e),
        }
    }

    async fn create(&self, dto: CreateStudentRequest) -> AppResult<StudentResponse> {
        self.api.post("/students", &dto).await
    }

    async fn update(&self, id: &str, dto: UpdateStudentRequest) -> AppResult<StudentResponse> {
        self.api.put(&format!("/students/{}", path_segment(id)), &dto).await
    }

    async fn delete(&self, id: &str) -> AppResult<()> {
        self.api.delete(&format!("/students/{}", path_segment(id))).await
    }

    async fn search(&self, query: &str) -> AppResult<Vec<StudentResponse>> {
        self.api.get_with_query("/students/search", &[("q", query)]).await
    }

    async fn get_by_instrument(&self, instrument: Instrument) -> AppResult<Vec<StudentResponse>> {
        let path = format!("/students/by-instrument/{}", path_segment(instrument.as_str()));
        self.api.get(&path).await
    }

    async fn get_by_payment_status(&self, status: PaymentStatus) -> AppResult<Vec<StudentResponse>> {
        let path = format!("/students/by-payment-status/{}", path_segment(status.as_str()));
        self.api.get(&path).await
    }
}
