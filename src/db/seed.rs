// src/db/seed.rs

//! Massa de dados sintética, gerada quando o armazenamento ainda está vazio.
//! Determinística para a mesma semente, quantidade e data de hoje.

use std::cmp::Ordering;

use chrono::{Datelike, Duration, Months, NaiveDate};
use rand::{rngs::StdRng, seq::SliceRandom, Rng, SeedableRng};

use crate::{
    models::{
        payment::{month_key, Payment, DUE_DAY},
        student::{ExperienceLevel, Instrument, PackageType, PaymentStatus, Student},
    },
    services::status::calculate_status_at,
};

const FIRST_NAMES: &[&str] = &[
    "João", "Maria", "Pedro", "Ana", "Lucas", "Juliana", "Carlos", "Fernanda", "Rafael",
    "Camila", "Bruno", "Beatriz", "Felipe", "Larissa", "Gustavo", "Amanda", "Rodrigo",
    "Gabriela", "Thiago", "Mariana", "Diego", "Letícia", "Matheus", "Isabela", "Vinicius",
    "Carolina", "Leonardo", "Natália", "Gabriel", "Bianca", "André", "Patrícia", "Marcelo",
    "Renata", "Ricardo", "Vanessa", "Paulo", "Cristina", "Fábio", "Adriana", "Daniel",
    "Tatiana", "Alexandre", "Priscila", "Leandro", "Daniela", "Henrique", "Luciana", "Caio",
    "Aline",
];

const LAST_NAMES: &[&str] = &[
    "Silva", "Santos", "Oliveira", "Souza", "Rodrigues", "Ferreira", "Alves", "Pereira",
    "Lima", "Gomes", "Costa", "Ribeiro", "Martins", "Carvalho", "Rocha", "Almeida",
    "Nascimento", "Araújo", "Melo", "Barbosa", "Cardoso", "Correia", "Dias", "Teixeira",
    "Monteiro", "Mendes", "Barros", "Freitas", "Pinto", "Moreira",
];

const OBJECTIVES: &[&str] = &[
    "Tocar em uma banda",
    "Aprender por hobby",
    "Tocar na igreja",
    "Desenvolvimento pessoal",
    "Carreira profissional",
    "Tocar em eventos",
    "Gravar músicas",
    "Ensinar música",
];

const EMAIL_DOMAINS: &[&str] = &["gmail.com", "hotmail.com", "outlook.com", "yahoo.com.br"];

/// Janela de matrículas: os últimos dois anos.
const ENROLLMENT_WINDOW_DAYS: i64 = 730;
/// Quantos meses de cobranças são gerados (terminando no mês corrente).
const BILLED_MONTHS: u32 = 12;

pub fn student_id(sequence: usize) -> String {
    format!("STD{:04}", sequence)
}

fn pick<T: Copy>(rng: &mut StdRng, items: &[T]) -> T {
    // As listas são constantes e não vazias
    *items.choose(rng).unwrap_or(&items[0])
}

fn generate_phone(rng: &mut StdRng) -> String {
    let ddd: u32 = rng.gen_range(11..100);
    let number: u32 = rng.gen_range(100_000_000..1_000_000_000);
    let digits = number.to_string();
    format!("({}) 9{}-{}", ddd, &digits[0..4], &digits[4..8])
}

fn generate_email(rng: &mut StdRng, name: &str) -> String {
    let clean = name.to_lowercase().split_whitespace().collect::<Vec<_>>().join(".");
    format!("{}@{}", clean, pick(rng, EMAIL_DOMAINS))
}

// 70% pagaram nos últimos 25 dias, 20% estão pendentes (26-35), 10% atrasados (36-90)
fn generate_last_payment(rng: &mut StdRng, today: NaiveDate) -> NaiveDate {
    let roll: f64 = rng.gen_range(0.0..1.0);
    let days_ago = if roll < 0.7 {
        rng.gen_range(0..=25)
    } else if roll < 0.9 {
        rng.gen_range(26..=35)
    } else {
        rng.gen_range(36..=90)
    };
    today - Duration::days(days_ago)
}

pub fn generate_students(rng: &mut StdRng, count: usize, today: NaiveDate) -> Vec<Student> {
    let mut students = Vec::with_capacity(count);

    for i in 0..count {
        let name = format!("{} {}", pick(rng, FIRST_NAMES), pick(rng, LAST_NAMES));
        let package_type = pick(rng, &PackageType::ALL);
        let enrollment_date = today - Duration::days(rng.gen_range(0..=ENROLLMENT_WINDOW_DAYS));
        let last_payment_date = generate_last_payment(rng, today);
        let assessment = calculate_status_at(Some(last_payment_date), enrollment_date, today);

        students.push(Student {
            id: student_id(i + 1),
            email: generate_email(rng, &name),
            phone: generate_phone(rng),
            age: rng.gen_range(10..60),
            instrument: pick(rng, &Instrument::ALL),
            experience_level: pick(rng, &ExperienceLevel::ALL),
            objectives: pick(rng, OBJECTIVES).to_string(),
            available_for_group: rng.gen_bool(0.7),
            package_type,
            monthly_fee: package_type.monthly_fee(),
            enrollment_date,
            last_payment_date: Some(last_payment_date),
            payment_status: assessment.status,
            overdue_months: assessment.overdue_months,
            name,
        });
    }

    // Os ids seguem a ordem de geração; a lista final fica em ordem alfabética
    students.sort_by(|a, b| compare_names(&a.name, &b.name));
    students
}

// Chave de ordenação: minúsculas e sem acentos ("Fábio" vem antes de "Fernanda")
fn collation_key(name: &str) -> String {
    name.to_lowercase()
        .chars()
        .map(|c| match c {
            'á' | 'à' | 'â' | 'ã' | 'ä' => 'a',
            'é' | 'è' | 'ê' | 'ë' => 'e',
            'í' | 'ì' | 'î' | 'ï' => 'i',
            'ó' | 'ò' | 'ô' | 'õ' | 'ö' => 'o',
            'ú' | 'ù' | 'û' | 'ü' => 'u',
            'ç' => 'c',
            'ñ' => 'n',
            other => other,
        })
        .collect()
}

/// Ordem alfabética ignorando caixa e acentos; o acento só desempata.
pub fn compare_names(a: &str, b: &str) -> Ordering {
    collation_key(a)
        .cmp(&collation_key(b))
        .then_with(|| a.to_lowercase().cmp(&b.to_lowercase()))
}

/// Os `BILLED_MONTHS` meses que terminam no mês de `today`, do mais antigo ao atual.
pub fn billed_months(today: NaiveDate) -> Vec<String> {
    let current = today.with_day(1).unwrap_or(today);
    (0..BILLED_MONTHS)
        .rev()
        .filter_map(|back| current.checked_sub_months(Months::new(back)))
        .map(month_key)
        .collect()
}

pub fn generate_payments(rng: &mut StdRng, students: &[Student], today: NaiveDate) -> Vec<Payment> {
    let months = billed_months(today);
    let mut payments = Vec::new();

    for student in students {
        let enrollment_month = month_key(student.enrollment_date);
        let paid_through = student.last_payment_date.map(month_key);

        // Chaves AAAA-MM comparam corretamente como texto
        for month in months.iter().filter(|m| **m >= enrollment_month) {
            let Ok(first_day) = NaiveDate::parse_from_str(&format!("{month}-01"), "%Y-%m-%d") else {
                continue;
            };
            let due_date = first_day.with_day(DUE_DAY).unwrap_or(first_day);
            let is_paid = paid_through.as_deref().is_some_and(|last| month.as_str() <= last);

            let (paid_date, status) = if is_paid {
                let day = rng.gen_range(1..=10);
                (first_day.with_day(day), PaymentStatus::Pago)
            } else if today > due_date {
                (None, PaymentStatus::Atrasado)
            } else {
                (None, PaymentStatus::Pendente)
            };

            payments.push(Payment {
                id: Payment::make_id(&student.id, month),
                student_id: student.id.clone(),
                amount: student.monthly_fee,
                due_date,
                paid_date,
                status,
                month: month.clone(),
            });
        }
    }

    payments
}

/// Alunos e pagamentos de demonstração.
pub fn generate_dataset(seed: u64, count: usize, today: NaiveDate) -> (Vec<Student>, Vec<Payment>) {
    let mut rng = StdRng::seed_from_u64(seed);
    let students = generate_students(&mut rng, count, today);
    let payments = generate_payments(&mut rng, &students, today);
    tracing::info!(
        "🎼 Massa de dados gerada: {} alunos, {} pagamentos",
        students.len(),
        payments.len()
    );
    (students, payments)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 11, 20).unwrap()
    }

    #[test]
    fn same_seed_same_dataset() {
        let a = generate_dataset(7, 50, today());
        let b = generate_dataset(7, 50, today());
        assert_eq!(a, b);
    }

    #[test]
    fn students_are_sorted_and_consistent() {
        let (students, _) = generate_dataset(1, 200, today());
        assert_eq!(students.len(), 200);

        let ids: HashSet<_> = students.iter().map(|s| s.id.clone()).collect();
        assert_eq!(ids.len(), 200);
        assert!(ids.contains("STD0001") && ids.contains("STD0200"));

        for pair in students.windows(2) {
            assert_ne!(compare_names(&pair[0].name, &pair[1].name), Ordering::Greater);
        }
        for s in &students {
            assert_eq!(s.monthly_fee, s.package_type.monthly_fee());
            assert!((10..60).contains(&s.age));
            if s.overdue_months > 0 {
                assert_eq!(s.payment_status, PaymentStatus::Atrasado);
            }
            if s.payment_status == PaymentStatus::Pago {
                assert_eq!(s.overdue_months, 0);
            }
            assert!(!s.email.contains(' '));
        }
    }

    #[test]
    fn one_payment_per_student_month_after_enrollment() {
        let (students, payments) = generate_dataset(3, 100, today());

        let mut keys = HashSet::new();
        for p in &payments {
            assert!(keys.insert((p.student_id.clone(), p.month.clone())));
            let student = students.iter().find(|s| s.id == p.student_id).unwrap();
            assert!(p.month >= month_key(student.enrollment_date));
            assert_eq!(p.amount, student.monthly_fee);
            assert_eq!(p.due_date.day(), DUE_DAY);
            assert_eq!(p.paid_date.is_some(), p.status == PaymentStatus::Pago);
        }
    }

    #[test]
    fn accented_names_sort_with_their_base_letters() {
        let mut names = vec!["Fernanda Lima", "Fábio Rocha", "Ana Souza", "André Dias", "Álvaro Melo"];
        names.sort_by(|a, b| compare_names(a, b));
        assert_eq!(
            names,
            vec!["Álvaro Melo", "Ana Souza", "André Dias", "Fábio Rocha", "Fernanda Lima"]
        );
    }

    #[test]
    fn generated_fabios_come_before_fernandas() {
        let (students, _) = generate_dataset(42, 1000, today());
        let last_fabio = students.iter().rposition(|s| s.name.starts_with("Fábio "));
        let first_fernanda = students.iter().position(|s| s.name.starts_with("Fernanda "));
        if let (Some(fabio), Some(fernanda)) = (last_fabio, first_fernanda) {
            assert!(fabio < fernanda);
        }
    }

    #[test]
    fn billed_months_end_at_current_month() {
        let months = billed_months(today());
        assert_eq!(months.len(), 12);
        assert_eq!(months.first().map(String::as_str), Some("2023-12"));
        assert_eq!(months.last().map(String::as_str), Some("2024-11"));
    }
}
