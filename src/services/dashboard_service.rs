// src/services/dashboard_service.rs

use std::sync::Arc;

use rust_decimal::{prelude::ToPrimitive, Decimal, RoundingStrategy};

use crate::{
    common::error::AppResult,
    models::{
        dashboard::{DashboardStats, InstrumentCount},
        student::{Instrument, PaymentStatus, StudentResponse},
    },
    services::ports::StudentService,
};

/// Indicadores do painel. Usa o status gravado em cada aluno, sem recalcular.
#[derive(Clone)]
pub struct DashboardService {
    students: Arc<dyn StudentService>,
}

impl DashboardService {
    pub fn new(students: Arc<dyn StudentService>) -> Self {
        Self { students }
    }

    pub async fn get_stats(&self) -> AppResult<DashboardStats> {
        let students = self.students.get_all().await?;
        Ok(compute_stats(&students))
    }
}

fn percent(part: Decimal, whole: Decimal) -> Decimal {
    if whole.is_zero() {
        return Decimal::ZERO;
    }
    part * Decimal::from(100) / whole
}

pub fn compute_stats(students: &[StudentResponse]) -> DashboardStats {
    let mut stats = DashboardStats {
        total_students: students.len(),
        ..Default::default()
    };

    for s in students {
        match s.payment_status {
            PaymentStatus::Pago => {
                stats.active_students += 1;
                stats.monthly_revenue += s.monthly_fee;
            }
            PaymentStatus::Pendente => {
                stats.pending_payments += 1;
                stats.pending_revenue += s.monthly_fee;
            }
            PaymentStatus::Atrasado => {
                stats.overdue_payments += 1;
                stats.overdue_revenue += s.monthly_fee;
                stats.total_overdue_debt += s.monthly_fee * Decimal::from(s.overdue_months);
            }
        }
    }

    stats.expected_revenue = stats.monthly_revenue + stats.pending_revenue + stats.overdue_revenue;

    let total = Decimal::from(stats.total_students);
    let active = Decimal::from(stats.active_students);
    let collected = Decimal::from(stats.active_students + stats.pending_payments);

    stats.payment_collection_rate = percent(collected, total).round_dp(2);
    stats.active_percent = percent(active, total).round_dp(2);
    stats.revenue_progress = percent(stats.monthly_revenue, stats.expected_revenue).round_dp(2);
    if stats.active_students > 0 {
        stats.avg_monthly_per_student = (stats.monthly_revenue / active).round_dp(2);
    }

    // Só entram os instrumentos que têm alunos, na ordem fixa de `Instrument::ALL`
    stats.students_by_instrument = Instrument::ALL
        .iter()
        .filter_map(|instrument| instrument_breakdown(*instrument, students))
        .collect();

    stats
}

fn instrument_breakdown(
    instrument: Instrument,
    students: &[StudentResponse],
) -> Option<InstrumentCount> {
    let mut count = InstrumentCount {
        instrument,
        students: 0,
        paid: 0,
        pending: 0,
        overdue: 0,
        paid_percentage: 0,
    };

    for s in students.iter().filter(|s| s.instrument == instrument) {
        count.students += 1;
        match s.payment_status {
            PaymentStatus::Pago => count.paid += 1,
            PaymentStatus::Pendente => count.pending += 1,
            PaymentStatus::Atrasado => count.overdue += 1,
        }
    }

    if count.students == 0 {
        return None;
    }

    let share = percent(Decimal::from(count.paid), Decimal::from(count.students))
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
    count.paid_percentage = share.to_u32().unwrap_or(0);
    Some(count)
}
