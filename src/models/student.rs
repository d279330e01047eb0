// src/models/student.rs

use std::fmt;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::Validate;

// --- ENUMS ---
// Os rótulos em português são o formato gravado no documento e trafegado na API.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Instrument {
    Guitarra,
    Teclado,
    Bateria,
    #[serde(rename = "Violão")]
    Violao,
    #[serde(rename = "Contra-baixo")]
    ContraBaixo,
}

impl Instrument {
    pub const ALL: [Instrument; 5] = [
        Instrument::Guitarra,
        Instrument::Teclado,
        Instrument::Bateria,
        Instrument::Violao,
        Instrument::ContraBaixo,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Instrument::Guitarra => "Guitarra",
            Instrument::Teclado => "Teclado",
            Instrument::Bateria => "Bateria",
            Instrument::Violao => "Violão",
            Instrument::ContraBaixo => "Contra-baixo",
        }
    }
}

impl fmt::Display for Instrument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExperienceLevel {
    Iniciante,
    #[serde(rename = "Intermediário")]
    Intermediario,
    #[serde(rename = "Avançado")]
    Avancado,
}

impl ExperienceLevel {
    pub const ALL: [ExperienceLevel; 3] = [
        ExperienceLevel::Iniciante,
        ExperienceLevel::Intermediario,
        ExperienceLevel::Avancado,
    ];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PackageType {
    Individual,
    Grupo,
}

impl PackageType {
    pub const ALL: [PackageType; 2] = [PackageType::Individual, PackageType::Grupo];

    /// A mensalidade depende apenas do pacote.
    pub fn monthly_fee(&self) -> Decimal {
        match self {
            PackageType::Individual => Decimal::from(120),
            PackageType::Grupo => Decimal::from(108),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PaymentStatus {
    Pago,
    Pendente,
    Atrasado,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Pago => "Pago",
            PaymentStatus::Pendente => "Pendente",
            PaymentStatus::Atrasado => "Atrasado",
        }
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// --- ENTIDADE ---

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    pub id: String, // STD0001, STD0002, ...

    pub name: String,
    pub email: String,
    pub phone: String,
    pub age: u32,

    pub instrument: Instrument,
    pub experience_level: ExperienceLevel,
    pub objectives: String,
    pub available_for_group: bool,
    pub package_type: PackageType,

    pub monthly_fee: Decimal,
    pub enrollment_date: NaiveDate,

    // Estado derivado dos pagamentos. Só é calculado na geração da massa de dados.
    pub last_payment_date: Option<NaiveDate>,
    pub payment_status: PaymentStatus,
    pub overdue_months: u32,
}

/// Dados de um aluno novo, ainda sem id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentDraft {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub age: u32,
    pub instrument: Instrument,
    pub experience_level: ExperienceLevel,
    pub objectives: String,
    pub available_for_group: bool,
    pub package_type: PackageType,
}

/// Atualização parcial: cada campo presente sobrescreve o atual.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StudentUpdate {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub age: Option<u32>,
    pub instrument: Option<Instrument>,
    pub experience_level: Option<ExperienceLevel>,
    pub objectives: Option<String>,
    pub available_for_group: Option<bool>,
    pub package_type: Option<PackageType>,
    pub monthly_fee: Option<Decimal>,
    pub enrollment_date: Option<NaiveDate>,
    pub last_payment_date: Option<NaiveDate>,
    pub payment_status: Option<PaymentStatus>,
    pub overdue_months: Option<u32>,
}

impl StudentUpdate {
    /// Se só o pacote mudou, a mensalidade acompanha o novo pacote.
    pub fn with_derived_fee(mut self) -> Self {
        if let (Some(package), None) = (self.package_type, self.monthly_fee) {
            self.monthly_fee = Some(package.monthly_fee());
        }
        self
    }

    pub fn apply_to(self, student: &mut Student) {
        if let Some(v) = self.name { student.name = v; }
        if let Some(v) = self.email { student.email = v; }
        if let Some(v) = self.phone { student.phone = v; }
        if let Some(v) = self.age { student.age = v; }
        if let Some(v) = self.instrument { student.instrument = v; }
        if let Some(v) = self.experience_level { student.experience_level = v; }
        if let Some(v) = self.objectives { student.objectives = v; }
        if let Some(v) = self.available_for_group { student.available_for_group = v; }
        if let Some(v) = self.package_type { student.package_type = v; }
        if let Some(v) = self.monthly_fee { student.monthly_fee = v; }
        if let Some(v) = self.enrollment_date { student.enrollment_date = v; }
        if let Some(v) = self.last_payment_date { student.last_payment_date = Some(v); }
        if let Some(v) = self.payment_status { student.payment_status = v; }
        if let Some(v) = self.overdue_months { student.overdue_months = v; }
    }
}

// =============================================================================
//  DTOs DO CONTRATO HTTP
// =============================================================================
// No contrato os objetivos do aluno trafegam como `goals`.

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateStudentRequest {
    #[validate(length(min = 1, message = "required"))]
    pub name: String,

    #[validate(email(message = "invalid_email"))]
    pub email: String,

    #[validate(length(min = 1, message = "required"))]
    pub phone: String,

    #[validate(range(min = 1, max = 120, message = "invalid_age"))]
    pub age: u32,

    pub instrument: Instrument,
    pub experience_level: ExperienceLevel,

    #[serde(default)]
    pub goals: String,

    #[serde(default)]
    pub available_for_group: bool,

    pub package_type: PackageType,

    // Ignorado: a mensalidade sai do pacote
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub monthly_fee: Option<Decimal>,
}

impl From<CreateStudentRequest> for StudentDraft {
    fn from(dto: CreateStudentRequest) -> Self {
        Self {
            name: dto.name,
            email: dto.email,
            phone: dto.phone,
            age: dto.age,
            instrument: dto.instrument,
            experience_level: dto.experience_level,
            objectives: dto.goals,
            available_for_group: dto.available_for_group,
            package_type: dto.package_type,
        }
    }
}

impl From<StudentDraft> for CreateStudentRequest {
    fn from(draft: StudentDraft) -> Self {
        Self {
            monthly_fee: Some(draft.package_type.monthly_fee()),
            name: draft.name,
            email: draft.email,
            phone: draft.phone,
            age: draft.age,
            instrument: draft.instrument,
            experience_level: draft.experience_level,
            goals: draft.objectives,
            available_for_group: draft.available_for_group,
            package_type: draft.package_type,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateStudentRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, message = "required"))]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(email(message = "invalid_email"))]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 1, max = 120, message = "invalid_age"))]
    pub age: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instrument: Option<Instrument>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub experience_level: Option<ExperienceLevel>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub goals: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub available_for_group: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub package_type: Option<PackageType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub monthly_fee: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_status: Option<PaymentStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_payment_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overdue_months: Option<u32>,
}

impl From<UpdateStudentRequest> for StudentUpdate {
    fn from(dto: UpdateStudentRequest) -> Self {
        Self {
            name: dto.name,
            email: dto.email,
            phone: dto.phone,
            age: dto.age,
            instrument: dto.instrument,
            experience_level: dto.experience_level,
            objectives: dto.goals,
            available_for_group: dto.available_for_group,
            package_type: dto.package_type,
            monthly_fee: dto.monthly_fee,
            enrollment_date: None,
            last_payment_date: dto.last_payment_date,
            payment_status: dto.payment_status,
            overdue_months: dto.overdue_months,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentResponse {
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub age: u32,
    pub instrument: Instrument,
    pub experience_level: ExperienceLevel,
    pub goals: String,
    pub available_for_group: bool,
    pub package_type: PackageType,
    pub monthly_fee: Decimal,
    pub enrollment_date: NaiveDate,
    pub payment_status: PaymentStatus,
    pub last_payment_date: Option<NaiveDate>,
    pub overdue_months: u32,
}

impl From<Student> for StudentResponse {
    fn from(s: Student) -> Self {
        Self {
            id: s.id,
            name: s.name,
            email: s.email,
            phone: s.phone,
            age: s.age,
            instrument: s.instrument,
            experience_level: s.experience_level,
            goals: s.objectives,
            available_for_group: s.available_for_group,
            package_type: s.package_type,
            monthly_fee: s.monthly_fee,
            enrollment_date: s.enrollment_date,
            payment_status: s.payment_status,
            last_payment_date: s.last_payment_date,
            overdue_months: s.overdue_months,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: String,
}
