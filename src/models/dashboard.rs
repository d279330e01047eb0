// src/models/dashboard.rs

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::student::Instrument;

// Cards do topo do painel
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_students: usize,
    pub active_students: usize, // status Pago
    pub pending_payments: usize,
    pub overdue_payments: usize,
    pub monthly_revenue: Decimal, // mensalidades dos alunos em dia
    pub pending_revenue: Decimal,
    pub overdue_revenue: Decimal,
    pub expected_revenue: Decimal,
    pub payment_collection_rate: Decimal, // percentual
    pub avg_monthly_per_student: Decimal, // média entre os alunos em dia
    pub active_percent: Decimal,
    pub revenue_progress: Decimal, // recebido / esperado, em %
    /// Dívida acumulada: mensalidade x meses em atraso dos alunos atrasados.
    pub total_overdue_debt: Decimal,
    pub students_by_instrument: Vec<InstrumentCount>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstrumentCount {
    pub instrument: Instrument,
    pub students: usize,
    pub paid: usize,
    pub pending: usize,
    pub overdue: usize,
    pub paid_percentage: u32, // arredondado para inteiro
}
