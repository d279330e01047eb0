// src/services/factory.rs

use std::{str::FromStr, sync::Arc, time::Duration};

use crate::{
    common::error::AppResult,
    db::StudentStore,
    services::{
        auth::UserDirectory,
        http_auth_service::HttpAuthService,
        http_client::ApiClient,
        http_payment_service::HttpPaymentService,
        http_student_service::HttpStudentService,
        local_auth_service::LocalAuthService,
        payment_service::LocalPaymentService,
        ports::{AuthService, PaymentService, StudentService},
        student_service::LocalStudentService,
    },
    storage::DurableStorage,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceMode {
    Mock,
    Http,
}

impl FromStr for ServiceMode {
    type Err = std::convert::Infallible;

    // Só "mock" liga o modo local; qualquer outro valor cai no HTTP.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(if s.trim().eq_ignore_ascii_case("mock") {
            ServiceMode::Mock
        } else {
            ServiceMode::Http
        })
    }
}

/// Conjunto de serviços entregue às camadas de cima.
#[derive(Clone)]
pub struct Services {
    pub students: Arc<dyn StudentService>,
    pub payments: Arc<dyn PaymentService>,
    pub auth: Arc<dyn AuthService>,
}

impl Services {
    pub fn local(store: Arc<StudentStore>, storage: Arc<dyn DurableStorage>) -> Self {
        let directory = UserDirectory::new(Arc::clone(&store));
        Self {
            students: Arc::new(LocalStudentService::new(Arc::clone(&store))),
            payments: Arc::new(LocalPaymentService::new(store)),
            auth: Arc::new(LocalAuthService::new(directory, storage)),
        }
    }

    pub fn http(api: ApiClient) -> Self {
        Self {
            students: Arc::new(HttpStudentService::new(api.clone())),
            payments: Arc::new(HttpPaymentService::new(api.clone())),
            auth: Arc::new(HttpAuthService::new(api)),
        }
    }
}

/// Escolhe a implementação uma única vez, na construção.
pub struct ServiceFactory {
    mode: ServiceMode,
    api_url: String,
    timeout: Duration,
    storage: Arc<dyn DurableStorage>,
}

impl ServiceFactory {
    pub fn new(
        mode: ServiceMode,
        api_url: impl Into<String>,
        timeout: Duration,
        storage: Arc<dyn DurableStorage>,
    ) -> Self {
        Self {
            mode,
            api_url: api_url.into(),
            timeout,
            storage,
        }
    }

    pub fn mode(&self) -> ServiceMode {
        self.mode
    }

    /// No modo local o `store` é obrigatório; no HTTP ele é ignorado.
    pub fn build(&self, store: Option<Arc<StudentStore>>) -> AppResult<Services> {
        match (self.mode, store) {
            (ServiceMode::Mock, Some(store)) => {
                tracing::info!("Serviços em modo local (mock)");
                Ok(Services::local(store, Arc::clone(&self.storage)))
            }
            (ServiceMode::Mock, None) => Err(anyhow::anyhow!(
                "modo mock exige um StudentStore aberto"
            )
            .into()),
            (ServiceMode::Http, _) => {
                tracing::info!("Serviços em modo HTTP ({})", self.api_url);
                let api = ApiClient::new(self.api_url.clone(), self.timeout, Arc::clone(&self.storage))?;
                Ok(Services::http(api))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_mock_selects_local_mode() {
        assert_eq!("mock".parse::<ServiceMode>().unwrap(), ServiceMode::Mock);
        assert_eq!(" MOCK ".parse::<ServiceMode>().unwrap(), ServiceMode::Mock);
        assert_eq!("http".parse::<ServiceMode>().unwrap(), ServiceMode::Http);
        assert_eq!("".parse::<ServiceMode>().unwrap(), ServiceMode::Http);
    }
}
