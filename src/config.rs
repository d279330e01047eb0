// src/config.rs

use std::{env, path::PathBuf, sync::Arc, time::Duration};

use anyhow::Context;

use crate::{
    db::{StoreOptions, StudentStore},
    services::{
        auth::{TokenService, UserDirectory},
        dashboard_service::DashboardService,
        ServiceFactory, ServiceMode, Services,
    },
    storage::{DurableStorage, FileStorage},
};

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub data_dir: PathBuf,
    pub port: u16,
    pub jwt_secret: String,
    pub service_mode: ServiceMode,
    pub api_url: String,
    pub api_timeout: Duration,
    pub seed_students: usize,
    pub seed: u64,
}

fn var_or<T: std::str::FromStr>(name: &str, default: T) -> anyhow::Result<T>
where
    T::Err: std::fmt::Display,
{
    match env::var(name) {
        Ok(raw) => raw
            .parse()
            .map_err(|e| anyhow::anyhow!("{name} inválida ({raw}): {e}")),
        Err(_) => Ok(default),
    }
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let jwt_secret = env::var("JWT_SECRET").context("JWT_SECRET deve ser definido")?;
        let service_mode = env::var("SERVICE_MODE")
            .unwrap_or_default()
            .parse()
            .unwrap_or(ServiceMode::Http);

        Ok(Self {
            data_dir: PathBuf::from(env::var("DATA_DIR").unwrap_or_else(|_| "./data".to_string())),
            port: var_or("PORT", 5000)?,
            jwt_secret,
            service_mode,
            api_url: env::var("API_URL").unwrap_or_else(|_| "http://localhost:5000/api".to_string()),
            api_timeout: Duration::from_secs(var_or("API_TIMEOUT_SECS", 30)?),
            seed_students: var_or("SEED_STUDENTS", 1000)?,
            seed: var_or("SEED", 42)?,
        })
    }

    pub fn service_factory(&self, storage: Arc<dyn DurableStorage>) -> ServiceFactory {
        ServiceFactory::new(self.service_mode, self.api_url.clone(), self.api_timeout, storage)
    }
}

// O estado compartilhado pelos handlers do servidor de referência.
// O servidor é o próprio backend, então trabalha sempre sobre o store local.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<StudentStore>,
    pub services: Services,
    pub dashboard_service: DashboardService,
    pub token_service: TokenService,
}

impl AppState {
    pub fn new(config: &AppConfig) -> anyhow::Result<Self> {
        let storage: Arc<dyn DurableStorage> = Arc::new(
            FileStorage::open(&config.data_dir)
                .with_context(|| format!("Falha ao abrir {}", config.data_dir.display()))?,
        );

        if config.service_mode == ServiceMode::Http {
            tracing::warn!(
                "SERVICE_MODE=http vale para os clientes; o servidor sempre usa o store local"
            );
        }

        let options = StoreOptions {
            seed_count: config.seed_students,
            seed: config.seed,
            ..Default::default()
        };
        let store = Arc::new(StudentStore::open(Arc::clone(&storage), options)?);
        tracing::info!("✅ Store aberto em {}", config.data_dir.display());

        Ok(Self::from_parts(store, storage, config.jwt_secret.clone()))
    }

    // --- Monta o gráfico de dependências ---
    pub fn from_parts(
        store: Arc<StudentStore>,
        storage: Arc<dyn DurableStorage>,
        jwt_secret: String,
    ) -> Self {
        let services = Services::local(Arc::clone(&store), storage);
        let dashboard_service = DashboardService::new(Arc::clone(&services.students));
        let token_service = TokenService::new(UserDirectory::new(Arc::clone(&store)), jwt_secret);

        Self {
            store,
            services,
            dashboard_service,
            token_service,
        }
    }
}
