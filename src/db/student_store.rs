// src/db/student_store.rs

//! Fonte única da verdade de alunos e pagamentos.
//!
//! Toda mutação regrava o documento `{students, payments}` inteiro no
//! armazenamento durável e depois avisa os assinantes, de forma síncrona.

use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard, Weak};

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tokio::runtime::{Handle, RuntimeFlavor};

use crate::{
    common::error::{AppError, AppResult},
    db::seed,
    models::{
        payment::{due_date_for, Payment},
        student::{PaymentStatus, Student, StudentDraft, StudentUpdate},
    },
    storage::{DurableStorage, STORE_KEY},
};

/// Fornece a data de "hoje".
pub type Clock = Arc<dyn Fn() -> NaiveDate + Send + Sync>;

pub fn system_clock() -> Clock {
    Arc::new(|| Utc::now().date_naive())
}

type Listener = Arc<dyn Fn() + Send + Sync>;
type ListenerList = RwLock<Vec<(u64, Listener)>>;

/// O documento gravado sob `STORE_KEY`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StoreDocument {
    pub students: Vec<Student>,
    pub payments: Vec<Payment>,
}

#[derive(Clone)]
pub struct StoreOptions {
    pub seed_count: usize,
    pub seed: u64,
    pub clock: Clock,
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self {
            seed_count: 1000,
            seed: 42,
            clock: system_clock(),
        }
    }
}

pub struct StudentStore {
    storage: Arc<dyn DurableStorage>,
    data: RwLock<StoreDocument>,
    listeners: Arc<ListenerList>,
    next_listener_id: RwLock<u64>,
    clock: Clock,
}

/// Handle devolvido por `subscribe`.
pub struct Subscription {
    id: u64,
    listeners: Weak<ListenerList>,
}

impl Subscription {
    /// Remove o assinante. Chamar mais de uma vez não tem efeito.
    pub fn unsubscribe(&self) {
        if let Some(listeners) = self.listeners.upgrade() {
            let mut list = listeners.write().unwrap_or_else(PoisonError::into_inner);
            list.retain(|(id, _)| *id != self.id);
        }
    }
}

impl StudentStore {
    /// Carrega o documento do armazenamento ou, se não existir, gera a massa
    /// sintética e grava imediatamente.
    pub fn open(storage: Arc<dyn DurableStorage>, options: StoreOptions) -> AppResult<Self> {
        let data = match storage.get(STORE_KEY)? {
            Some(raw) => {
                let document: StoreDocument = serde_json::from_str(&raw)?;
                tracing::info!(
                    "✅ Dados carregados: {} alunos, {} pagamentos",
                    document.students.len(),
                    document.payments.len()
                );
                document
            }
            None => {
                let today = (options.clock)();
                let (students, payments) =
                    seed::generate_dataset(options.seed, options.seed_count, today);
                let document = StoreDocument { students, payments };
                let raw = serde_json::to_string(&document)?;
                blocking_io(|| storage.set(STORE_KEY, &raw))?;
                document
            }
        };

        Ok(Self {
            storage,
            data: RwLock::new(data),
            listeners: Arc::new(RwLock::new(Vec::new())),
            next_listener_id: RwLock::new(0),
            clock: options.clock,
        })
    }

    pub fn today(&self) -> NaiveDate {
        (self.clock)()
    }

    fn read(&self) -> RwLockReadGuard<'_, StoreDocument> {
        self.data.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, StoreDocument> {
        self.data.write().unwrap_or_else(PoisonError::into_inner)
    }

    // =========================================================================
    //  LEITURA
    // =========================================================================

    /// Alunos na ordem em que estão gravados.
    pub fn get_students(&self) -> Vec<Student> {
        self.read().students.clone()
    }

    pub fn get_student(&self, id: &str) -> Option<Student> {
        self.read().students.iter().find(|s| s.id == id).cloned()
    }

    pub fn get_payments(&self, student_id: Option<&str>) -> Vec<Payment> {
        let data = self.read();
        match student_id {
            Some(id) => data.payments.iter().filter(|p| p.student_id == id).cloned().collect(),
            None => data.payments.clone(),
        }
    }

    pub fn snapshot(&self) -> StoreDocument {
        self.read().clone()
    }

    // =========================================================================
    //  MUTAÇÕES
    // =========================================================================

    /// Cria o aluno com o próximo id sequencial (`STD` + total atual + 1).
    ///
    /// O id não é único depois de exclusões: excluir um aluno e cadastrar outro
    /// pode repetir um id existente.
    pub fn add_student(&self, draft: StudentDraft) -> Student {
        let student = {
            let mut data = self.write();
            let student = Student {
                id: seed::student_id(data.students.len() + 1),
                monthly_fee: draft.package_type.monthly_fee(),
                enrollment_date: self.today(),
                last_payment_date: None,
                payment_status: PaymentStatus::Pendente,
                overdue_months: 0,
                name: draft.name,
                email: draft.email,
                phone: draft.phone,
                age: draft.age,
                instrument: draft.instrument,
                experience_level: draft.experience_level,
                objectives: draft.objectives,
                available_for_group: draft.available_for_group,
                package_type: draft.package_type,
            };
            data.students.push(student.clone());
            self.persist(&data);
            student
        };
        tracing::info!("Aluno {} cadastrado", student.id);
        self.notify();
        student
    }

    /// Mescla os campos presentes. Id inexistente é ignorado em silêncio.
    pub fn update_student(&self, id: &str, update: StudentUpdate) {
        {
            let mut data = self.write();
            let Some(student) = data.students.iter_mut().find(|s| s.id == id) else {
                tracing::debug!("update_student: aluno {} não existe", id);
                return;
            };
            update.apply_to(student);
            self.persist(&data);
        }
        self.notify();
    }

    /// Remove o aluno e todos os pagamentos dele.
    pub fn delete_student(&self, id: &str) {
        {
            let mut data = self.write();
            data.students.retain(|s| s.id != id);
            data.payments.retain(|p| p.student_id != id);
            self.persist(&data);
        }
        tracing::info!("Aluno {} excluído (com seus pagamentos)", id);
        self.notify();
    }

    /// Registra o pagamento de um mês.
    ///
    /// Marca a cobrança do mês como paga (se existir) e zera o estado de atraso
    /// do aluno, mesmo que outros meses continuem em aberto.
    pub fn record_payment(&self, student_id: &str, month: &str) {
        let today = self.today();
        {
            let mut data = self.write();
            if !data.students.iter().any(|s| s.id == student_id) {
                return;
            }

            if let Some(payment) = data
                .payments
                .iter_mut()
                .find(|p| p.student_id == student_id && p.month == month)
            {
                payment.paid_date = Some(today);
                payment.status = PaymentStatus::Pago;
            }

            if let Some(student) = data.students.iter_mut().find(|s| s.id == student_id) {
                student.last_payment_date = Some(today);
                student.payment_status = PaymentStatus::Pago;
                student.overdue_months = 0;
            }
            self.persist(&data);
        }
        tracing::info!("Pagamento de {} registrado para {}", month, student_id);
        self.notify();
    }

    /// Cria a cobrança de um mês. Respeita a unicidade de (aluno, mês).
    pub fn add_payment(&self, student_id: &str, month: &str, amount: Decimal) -> AppResult<Payment> {
        let due_date = due_date_for(month)?;
        let today = self.today();

        let payment = {
            let mut data = self.write();
            if !data.students.iter().any(|s| s.id == student_id) {
                return Err(AppError::StudentNotFound(student_id.to_string()));
            }
            if data.payments.iter().any(|p| p.student_id == student_id && p.month == month) {
                return Err(AppError::PaymentAlreadyExists {
                    student_id: student_id.to_string(),
                    month: month.to_string(),
                });
            }

            let payment = Payment {
                id: Payment::make_id(student_id, month),
                student_id: student_id.to_string(),
                amount,
                due_date,
                paid_date: None,
                status: if today > due_date { PaymentStatus::Atrasado } else { PaymentStatus::Pendente },
                month: month.to_string(),
            };
            data.payments.push(payment.clone());
            self.persist(&data);
            payment
        };
        self.notify();
        Ok(payment)
    }

    // =========================================================================
    //  ASSINATURAS
    // =========================================================================

    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn() + Send + Sync + 'static,
    {
        let id = {
            let mut next = self.next_listener_id.write().unwrap_or_else(PoisonError::into_inner);
            *next += 1;
            *next
        };
        self.listeners
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push((id, Arc::new(listener)));

        Subscription {
            id,
            listeners: Arc::downgrade(&self.listeners),
        }
    }

    // Chamado sem nenhum lock do store, então o assinante pode ler o store.
    fn notify(&self) {
        let listeners: Vec<Listener> = self
            .listeners
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|(_, l)| Arc::clone(l))
            .collect();
        for listener in listeners {
            listener();
        }
    }

    // Falha de escrita só é registrada: o estado em memória já mudou e fica.
    fn persist(&self, data: &StoreDocument) {
        let result = serde_json::to_string(data)
            .map_err(AppError::from)
            .and_then(|raw| blocking_io(|| self.storage.set(STORE_KEY, &raw)));
        if let Err(e) = result {
            tracing::error!("🔥 Falha ao gravar os dados da escola: {}", e);
        }
    }
}

// A gravação é síncrona. Dentro do runtime multi-thread do servidor o tokio é
// avisado para tirar as outras tarefas desta thread enquanto ela bloqueia.
fn blocking_io<T>(io: impl FnOnce() -> T) -> T {
    match Handle::try_current() {
        Ok(handle) if handle.runtime_flavor() == RuntimeFlavor::MultiThread => {
            tokio::task::block_in_place(io)
        }
        _ => io(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::student::{ExperienceLevel, Instrument, PackageType};
    use crate::storage::MemoryStorage;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn fixed_today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 20).unwrap()
    }

    fn empty_store() -> StudentStore {
        let options = StoreOptions {
            seed_count: 0,
            seed: 1,
            clock: Arc::new(fixed_today),
        };
        StudentStore::open(Arc::new(MemoryStorage::new()), options).unwrap()
    }

    fn draft(name: &str) -> StudentDraft {
        StudentDraft {
            name: name.to_string(),
            email: format!("{}@escola.com", name.to_lowercase().replace(' ', ".")),
            phone: "(11) 91111-2222".into(),
            age: 30,
            instrument: Instrument::Teclado,
            experience_level: ExperienceLevel::Iniciante,
            objectives: "Aprender por hobby".into(),
            available_for_group: false,
            package_type: PackageType::Grupo,
        }
    }

    #[test]
    fn sequential_ids_repeat_after_delete() {
        let store = empty_store();
        let a = store.add_student(draft("Ana Silva"));
        let b = store.add_student(draft("Bruno Costa"));
        assert_eq!((a.id.as_str(), b.id.as_str()), ("STD0001", "STD0002"));

        store.delete_student("STD0001");
        let c = store.add_student(draft("Caio Dias"));
        // total atual = 1, então o próximo id colide com o de Bruno
        assert_eq!(c.id, "STD0002");
    }

    #[test]
    fn update_of_missing_student_is_silent() {
        let store = empty_store();
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let _sub = store.subscribe(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        store.update_student("STD9999", StudentUpdate { age: Some(40), ..Default::default() });
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert!(store.get_students().is_empty());
    }

    #[test]
    fn listener_can_read_the_store() {
        let store = Arc::new(empty_store());
        let seen = Arc::new(AtomicUsize::new(0));

        let reader = Arc::downgrade(&store);
        let seen_in_listener = Arc::clone(&seen);
        let _sub = store.subscribe(move || {
            if let Some(store) = reader.upgrade() {
                seen_in_listener.store(store.get_students().len(), Ordering::SeqCst);
            }
        });

        store.add_student(draft("Ana Silva"));
        assert_eq!(seen.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn add_payment_rejects_duplicates_and_unknown_students() {
        let store = empty_store();
        let student = store.add_student(draft("Ana Silva"));

        let payment = store.add_payment(&student.id, "2024-06", Decimal::from(108)).unwrap();
        assert_eq!(payment.id, "PAYSTD0001202406");
        assert_eq!(payment.status, PaymentStatus::Atrasado); // hoje 20/06 > vencimento 05/06

        let future = store.add_payment(&student.id, "2024-07", Decimal::from(108)).unwrap();
        assert_eq!(future.status, PaymentStatus::Pendente);

        assert!(matches!(
            store.add_payment(&student.id, "2024-06", Decimal::from(108)),
            Err(AppError::PaymentAlreadyExists { .. })
        ));
        assert!(matches!(
            store.add_payment("STD0404", "2024-06", Decimal::from(108)),
            Err(AppError::StudentNotFound(_))
        ));
        assert!(matches!(
            store.add_payment(&student.id, "2024/06", Decimal::from(108)),
            Err(AppError::InvalidMonth(_))
        ));
    }
}
