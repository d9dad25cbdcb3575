//! REST binding of [`HabitService`] over reqwest.

use std::time::Duration;

use reqwest::{Client, Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};
use url::Url;

use super::HabitService;
use crate::error::TransportError;
use crate::habit::wire::{CategoryWire, CounterWire, HabitPayload, HabitWire, TimerWire};

/// Client for the habit backend.
#[derive(Debug, Clone)]
pub struct HttpHabitService {
    base_url: Url,
    http_client: Client,
}

impl HttpHabitService {
    /// Create a client rooted at `base_url` (e.g. `http://localhost:8083`).
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, TransportError> {
        let mut normalized = base_url.trim().to_string();
        if !normalized.ends_with('/') {
            normalized.push('/');
        }
        let base_url = Url::parse(&normalized)?;
        let http_client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|source| TransportError::Request {
                url: base_url.to_string(),
                source,
            })?;
        Ok(Self {
            base_url,
            http_client,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str, query: &[(&str, String)]) -> Result<Url, TransportError> {
        let mut url = self.base_url.join(path)?;
        if !query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in query {
                pairs.append_pair(key, value);
            }
        }
        Ok(url)
    }

    fn request(&self, method: Method, url: &Url) -> RequestBuilder {
        debug!(%method, %url, "habit service request");
        self.http_client.request(method, url.clone())
    }

    async fn send(&self, request: RequestBuilder, url: &Url) -> Result<Response, TransportError> {
        let response = request
            .send()
            .await
            .map_err(|source| TransportError::Request {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let message = if body.trim().is_empty() {
            status
                .canonical_reason()
                .unwrap_or("request failed")
                .to_string()
        } else {
            body
        };
        warn!(%url, status = status.as_u16(), %message, "habit service error");
        Err(TransportError::Status {
            status: status.as_u16(),
            message,
        })
    }

    async fn decode<T: DeserializeOwned>(response: Response, url: &Url) -> Result<T, TransportError> {
        let bytes = response
            .bytes()
            .await
            .map_err(|source| TransportError::Request {
                url: url.to_string(),
                source,
            })?;
        serde_json::from_slice(&bytes).map_err(|err| TransportError::Decode {
            url: url.to_string(),
            message: err.to_string(),
        })
    }

    async fn fetch<T: DeserializeOwned>(&self, url: Url) -> Result<T, TransportError> {
        let response = self.send(self.request(Method::GET, &url), &url).await?;
        Self::decode(response, &url).await
    }
}

impl HabitService for HttpHabitService {
    async fn list_habits(&self) -> Result<Vec<HabitWire>, TransportError> {
        let url = self.endpoint("api/habits", &[])?;
        self.fetch(url).await
    }

    async fn get_habit(&self, id: i64) -> Result<HabitWire, TransportError> {
        let url = self.endpoint(&format!("api/habits/{id}"), &[])?;
        self.fetch(url).await
    }

    async fn create_habit(
        &self,
        user_id: i64,
        payload: &HabitPayload,
    ) -> Result<HabitWire, TransportError> {
        let url = self.endpoint("api/habits", &[("idUsuario", user_id.to_string())])?;
        let request = self.request(Method::POST, &url).json(payload);
        let response = self.send(request, &url).await?;
        Self::decode(response, &url).await
    }

    async fn update_habit(
        &self,
        id: i64,
        user_id: i64,
        payload: &HabitPayload,
    ) -> Result<HabitWire, TransportError> {
        let url = self.endpoint(
            &format!("api/habits/{id}"),
            &[("idUsuario", user_id.to_string())],
        )?;
        let request = self.request(Method::PUT, &url).json(payload);
        let response = self.send(request, &url).await?;
        Self::decode(response, &url).await
    }

    async fn delete_habit(&self, id: i64) -> Result<(), TransportError> {
        let url = self.endpoint(&format!("api/habits/{id}"), &[])?;
        self.send(self.request(Method::DELETE, &url), &url).await?;
        Ok(())
    }

    async fn set_habit_state(&self, id: i64, state_code: u8) -> Result<(), TransportError> {
        let url = self.endpoint(
            &format!("api/habits/{id}/estado"),
            &[("estado", state_code.to_string())],
        )?;
        self.send(self.request(Method::PUT, &url), &url).await?;
        Ok(())
    }

    async fn list_categories_for_user(
        &self,
        user_id: i64,
    ) -> Result<Vec<CategoryWire>, TransportError> {
        let url = self.endpoint(
            "api/categorias/byUser",
            &[("IdUsuario", user_id.to_string())],
        )?;
        self.fetch(url).await
    }

    async fn update_counter_progress(
        &self,
        id: i64,
        progress: CounterWire,
    ) -> Result<(), TransportError> {
        let url = self.endpoint(&format!("api/habitos-contadores/{id}"), &[])?;
        let request = self.request(Method::PUT, &url).json(&progress);
        self.send(request, &url).await?;
        Ok(())
    }

    async fn update_timer_progress(
        &self,
        id: i64,
        progress: TimerWire,
    ) -> Result<(), TransportError> {
        let url = self.endpoint(&format!("api/habitos-temporizados/{id}"), &[])?;
        let request = self.request(Method::PUT, &url).json(&progress);
        self.send(request, &url).await?;
        Ok(())
    }
}
