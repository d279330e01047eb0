// src/services/http_client.rs

use std::{sync::Arc, time::Duration};

use reqwest::{Client, Method, RequestBuilder, Response};
use serde::{de::DeserializeOwned, Serialize};

use crate::{
    common::error::{ApiError, AppError, AppResult, ErrorBody},
    storage::{DurableStorage, TOKEN_KEY},
};

/// Cliente JSON do backend remoto. Anexa o token bearer gravado, se houver.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    storage: Arc<dyn DurableStorage>,
}

impl ApiClient {
    pub fn new(
        base_url: impl Into<String>,
        timeout: Duration,
        storage: Arc<dyn DurableStorage>,
    ) -> AppResult<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            storage,
        })
    }

    pub fn storage(&self) -> &Arc<dyn DurableStorage> {
        &self.storage
    }

    fn request(&self, method: Method, endpoint: &str) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, endpoint);
        let builder = self.client.request(method, url);

        match self.storage.get(TOKEN_KEY) {
            Ok(Some(token)) => builder.bearer_auth(token),
            Ok(None) => builder,
            Err(e) => {
                tracing::warn!("Não foi possível ler o token gravado: {}", e);
                builder
            }
        }
    }

    async fn send(&self, builder: RequestBuilder) -> AppResult<Response> {
        let response = builder.send().await.map_err(|e| {
            tracing::error!("Falha de conexão com a API: {}", e);
            AppError::TransportError(e)
        })?;

        if !response.status().is_success() {
            return Err(AppError::Api(Self::handle_error(response).await));
        }
        Ok(response)
    }

    // Traduz a resposta não-2xx para `{message, status, errors?}`
    async fn handle_error(response: Response) -> ApiError {
        let status = response.status();
        let text = response.text().await.unwrap_or_default();

        let (message, errors) = match serde_json::from_str::<ErrorBody>(&text) {
            Ok(body) if !body.message.is_empty() => (body.message, body.errors),
            Ok(body) => ("Ocorreu um erro".to_string(), body.errors),
            Err(_) => (
                status.canonical_reason().unwrap_or("Ocorreu um erro").to_string(),
                None,
            ),
        };

        tracing::warn!("API respondeu {}: {}", status, message);
        ApiError {
            message,
            status: status.as_u16(),
            errors,
        }
    }

    pub async fn get<T: DeserializeOwned>(&self, endpoint: &str) -> AppResult<T> {
        let response = self.send(self.request(Method::GET, endpoint)).await?;
        Ok(response.json().await?)
    }

    pub async fn get_with_query<T, Q>(&self, endpoint: &str, query: &Q) -> AppResult<T>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        let response = self.send(self.request(Method::GET, endpoint).query(query)).await?;
        Ok(response.json().await?)
    }

    pub async fn post<T, B>(&self, endpoint: &str, body: &B) -> AppResult<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let response = self.send(self.request(Method::POST, endpoint).json(body)).await?;
        Ok(response.json().await?)
    }

    /// POST cuja resposta não interessa (pode vir vazia).
    pub async fn post_empty<B>(&self, endpoint: &str, body: &B) -> AppResult<()>
    where
        B: Serialize + ?Sized,
    {
        self.send(self.request(Method::POST, endpoint).json(body)).await?;
        Ok(())
    }

    pub async fn put<T, B>(&self, endpoint: &str, body: &B) -> AppResult<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let response = self.send(self.request(Method::PUT, endpoint).json(body)).await?;
        Ok(response.json().await?)
    }

    pub async fn delete(&self, endpoint: &str) -> AppResult<()> {
        self.send(self.request(Method::DELETE, endpoint)).await?;
        Ok(())
    }
}

/// Codifica um valor para um segmento de caminho (ex.: "Violão").
pub fn path_segment(value: &str) -> String {
    urlencoding::encode(value).into_owned()
}
