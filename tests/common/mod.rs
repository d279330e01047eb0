// tests/common/mod.rs
#![allow(dead_code)]

use std::{
    io,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
};

use axum::Router;
use chrono::NaiveDate;
use tokio::net::TcpListener;

use escola_musica::{
    common::error::AppResult,
    config::AppState,
    db::{StoreOptions, StudentStore},
    models::student::{ExperienceLevel, Instrument, PackageType, StudentDraft},
    routes::create_router,
    storage::{DurableStorage, MemoryStorage},
};

pub const JWT_SECRET: &str = "segredo-de-teste";

pub fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, 20).unwrap()
}

pub fn options(seed_count: usize) -> StoreOptions {
    StoreOptions {
        seed_count,
        seed: 7,
        clock: Arc::new(today),
    }
}

pub fn memory_storage() -> Arc<dyn DurableStorage> {
    Arc::new(MemoryStorage::new())
}

/// Armazenamento em memória cujas escritas passam a falhar sob comando.
#[derive(Default)]
pub struct BrokenDisk {
    inner: MemoryStorage,
    failing: AtomicBool,
}

impl BrokenDisk {
    pub fn break_writes(&self) {
        self.failing.store(true, Ordering::SeqCst);
    }
}

impl DurableStorage for BrokenDisk {
    fn get(&self, key: &str) -> AppResult<Option<String>> {
        self.inner.get(key)
    }

    fn set(&self, key: &str, value: &str) -> AppResult<()> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(io::Error::other("disco cheio").into());
        }
        self.inner.set(key, value)
    }

    fn remove(&self, key: &str) -> AppResult<()> {
        self.inner.remove(key)
    }
}

pub fn open_store(storage: &Arc<dyn DurableStorage>, seed_count: usize) -> Arc<StudentStore> {
    Arc::new(StudentStore::open(Arc::clone(storage), options(seed_count)).unwrap())
}

pub fn draft(name: &str, email: &str, package_type: PackageType) -> StudentDraft {
    StudentDraft {
        name: name.to_string(),
        email: email.to_string(),
        phone: "(11) 98765-4321".to_string(),
        age: 25,
        instrument: Instrument::Violao,
        experience_level: ExperienceLevel::Iniciante,
        objectives: "Tocar em uma banda".to_string(),
        available_for_group: true,
        package_type,
    }
}

/// Estado com um store vazio e dois alunos conhecidos (STD0001 e STD0002).
pub fn app_state() -> AppState {
    let storage = memory_storage();
    let store = open_store(&storage, 0);
    store.add_student(draft("Ana Silva", "ana.silva@email.com", PackageType::Individual));
    store.add_student(draft("Bruno Costa", "bruno.costa@email.com", PackageType::Grupo));
    AppState::from_parts(store, storage, JWT_SECRET.to_string())
}

pub fn app() -> (Router, AppState) {
    let state = app_state();
    (create_router(state.clone()), state)
}

/// Sobe o servidor numa porta livre e devolve a URL base da API.
pub async fn spawn_server(state: AppState) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let app = create_router(state);
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}/api")
}
