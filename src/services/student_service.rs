// src/services/student_service.rs

use std::sync::Arc;

use async_trait::async_trait;

use crate::{
    common::error::{AppError, AppResult},
    db::StudentStore,
    models::student::{
        CreateStudentRequest, Instrument, PaymentStatus, Student, StudentResponse, StudentUpdate,
        UpdateStudentRequest,
    },
    services::ports::StudentService,
};

/// Implementação local: delega tudo ao store, sem suspender de verdade.
#[derive(Clone)]
pub struct LocalStudentService {
    store: Arc<StudentStore>,
}

impl LocalStudentService {
    pub fn new(store: Arc<StudentStore>) -> Self {
        Self { store }
    }

    fn filtered<P>(&self, predicate: P) -> Vec<StudentResponse>
    where
        P: Fn(&Student) -> bool,
    {
        self.store
            .get_students()
            .into_iter()
            .filter(|s| predicate(s))
            .map(StudentResponse::from)
            .collect()
    }
}

#[async_trait]
impl StudentService for LocalStudentService {
    async fn get_all(&self) -> AppResult<Vec<StudentResponse>> {
        Ok(self.filtered(|_| true))
    }

    async fn get_by_id(&self, id: &str) -> AppResult<Option<StudentResponse>> {
        Ok(self.store.get_student(id).map(StudentResponse::from))
    }

    async fn create(&self, dto: CreateStudentRequest) -> AppResult<StudentResponse> {
        let student = self.store.add_student(dto.into());
        Ok(student.into())
    }

    async fn update(&self, id: &str, dto: UpdateStudentRequest) -> AppResult<StudentResponse> {
        let update = StudentUpdate::from(dto).with_derived_fee();
        self.store.update_student(id, update);
        self.store
            .get_student(id)
            .map(StudentResponse::from)
            .ok_or_else(|| AppError::StudentNotFound(id.to_string()))
    }

    async fn delete(&self, id: &str) -> AppResult<()> {
        self.store.delete_student(id);
        Ok(())
    }

    async fn search(&self, query: &str) -> AppResult<Vec<StudentResponse>> {
        let needle = query.to_lowercase();
        Ok(self.filtered(|s| {
            s.name.to_lowercase().contains(&needle) || s.email.to_lowercase().contains(&needle)
        }))
    }

    async fn get_by_instrument(&self, instrument: Instrument) -> AppResult<Vec<StudentResponse>> {
        Ok(self.filtered(|s| s.instrument == instrument))
    }

    async fn get_by_payment_status(&self, status: PaymentStatus) -> AppResult<Vec<StudentResponse>> {
        Ok(self.filtered(|s| s.payment_status == status))
    }
}
