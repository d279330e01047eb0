// src/models/payment.rs

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::common::error::{AppError, AppResult};
use crate::models::student::PaymentStatus;

/// Dia do mês em que a mensalidade vence.
pub const DUE_DAY: u32 = 5;

// Uma cobrança por (aluno, mês)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    pub id: String, // PAY<studentId><AAAAMM>
    pub student_id: String,
    pub amount: Decimal, // mensalidade no momento da geração
    pub due_date: NaiveDate,
    pub paid_date: Option<NaiveDate>,
    pub status: PaymentStatus,
    pub month: String, // AAAA-MM
}

impl Payment {
    pub fn make_id(student_id: &str, month: &str) -> String {
        format!("PAY{}{}", student_id, month.replace('-', ""))
    }
}

/// Valida uma chave de mês `AAAA-MM` e devolve o primeiro dia do mês.
pub fn parse_month(month: &str) -> AppResult<NaiveDate> {
    let invalid = || AppError::InvalidMonth(month.to_string());
    if month.len() != 7 {
        return Err(invalid());
    }
    NaiveDate::parse_from_str(&format!("{month}-01"), "%Y-%m-%d").map_err(|_| invalid())
}

pub fn month_key(date: NaiveDate) -> String {
    format!("{:04}-{:02}", date.year(), date.month())
}

pub fn due_date_for(month: &str) -> AppResult<NaiveDate> {
    let first = parse_month(month)?;
    Ok(first.with_day(DUE_DAY).unwrap_or(first))
}

// =============================================================================
//  DTOs DO CONTRATO HTTP
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreatePaymentRequest {
    #[validate(length(min = 1, message = "required"))]
    pub student_id: String,
    #[validate(length(equal = 7, message = "invalid_month"))]
    pub month: String,
    pub amount: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RecordPaymentRequest {
    #[validate(length(min = 1, message = "required"))]
    pub student_id: String,
    #[validate(length(equal = 7, message = "invalid_month"))]
    pub month: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentResponse {
    pub id: String,
    pub student_id: String,
    pub student_name: String,
    pub month: String,
    pub due_date: NaiveDate,
    pub paid_date: Option<NaiveDate>,
    pub amount: Decimal,
    pub status: PaymentStatus,
}

impl PaymentResponse {
    pub fn from_payment(payment: Payment, student_name: String) -> Self {
        Self {
            id: payment.id,
            student_id: payment.student_id,
            student_name,
            month: payment.month,
            due_date: payment.due_date,
            paid_date: payment.paid_date,
            amount: payment.amount,
            status: payment.status,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentSummary {
    pub total_paid: Decimal,
    pub total_pending: Decimal,
    pub total_overdue: Decimal,
    pub overdue_count: usize,
}
