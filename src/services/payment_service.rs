// src/services/payment_service.rs

use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;

use crate::{
    common::error::{AppError, AppResult},
    db::StudentStore,
    models::{
        payment::{parse_month, CreatePaymentRequest, Payment, PaymentResponse, PaymentSummary},
        student::PaymentStatus,
    },
    services::ports::PaymentService,
};

#[derive(Clone)]
pub struct LocalPaymentService {
    store: Arc<StudentStore>,
}

impl LocalPaymentService {
    pub fn new(store: Arc<StudentStore>) -> Self {
        Self { store }
    }

    // Junta o nome do aluno em cada pagamento
    fn with_names(&self, payments: Vec<Payment>) -> Vec<PaymentResponse> {
        let names: HashMap<String, String> = self
            .store
            .get_students()
            .into_iter()
            .map(|s| (s.id, s.name))
            .collect();

        payments
            .into_iter()
            .map(|p| {
                let name = names.get(&p.student_id).cloned().unwrap_or_default();
                PaymentResponse::from_payment(p, name)
            })
            .collect()
    }
}

/// Soma os valores por status.
pub fn summarize(payments: &[Payment]) -> PaymentSummary {
    payments.iter().fold(PaymentSummary::default(), |mut acc, p| {
        match p.status {
            PaymentStatus::Pago => acc.total_paid += p.amount,
            PaymentStatus::Pendente => acc.total_pending += p.amount,
            PaymentStatus::Atrasado => {
                acc.total_overdue += p.amount;
                acc.overdue_count += 1;
            }
        }
        acc
    })
}

#[async_trait]
impl PaymentService for LocalPaymentService {
    async fn get_all(&self) -> AppResult<Vec<PaymentResponse>> {
        Ok(self.with_names(self.store.get_payments(None)))
    }

    async fn get_by_student_id(&self, student_id: &str) -> AppResult<Vec<PaymentResponse>> {
        Ok(self.with_names(self.store.get_payments(Some(student_id))))
    }

    async fn create(&self, dto: CreatePaymentRequest) -> AppResult<PaymentResponse> {
        let payment = self.store.add_payment(&dto.student_id, &dto.month, dto.amount)?;
        let mut responses = self.with_names(vec![payment]);
        responses.pop().ok_or_else(|| AppError::StudentNotFound(dto.student_id))
    }

    async fn record_payment(&self, student_id: &str, month: &str) -> AppResult<()> {
        parse_month(month)?;
        if self.store.get_student(student_id).is_none() {
            return Err(AppError::StudentNotFound(student_id.to_string()));
        }
        self.store.record_payment(student_id, month);
        Ok(())
    }

    async fn get_summary(&self) -> AppResult<PaymentSummary> {
        Ok(summarize(&self.store.get_payments(None)))
    }

    async fn get_overdue_payments(&self) -> AppResult<Vec<PaymentResponse>> {
        let overdue = self
            .store
            .get_payments(None)
            .into_iter()
            .filter(|p| p.status == PaymentStatus::Atrasado)
            .collect();
        Ok(self.with_names(overdue))
    }
}
