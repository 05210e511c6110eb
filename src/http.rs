// src/http.rs
//! Тонкий типизированный клиент поверх транспорта.
//!
//! Хранилища никогда не ходят в сеть напрямую: они собирают [`ApiRequest`]
//! через [`ApiClient`], а сам запрос исполняет реализация [`HttpTransport`]
//! (в проде `AwcTransport`, в тестах скриптовый фейк).

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};
use std::fmt;
use std::rc::Rc;
use tracing::debug;

use crate::error::{StoreError, StoreResult};

// ==================== REQUEST / RESPONSE ====================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    Empty,
    Json(serde_json::Value),
    Form(Vec<(String, String)>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    pub url: String,
    pub query: Vec<(String, String)>,
    pub body: RequestBody,
}

impl ApiRequest {
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            query: Vec::new(),
            body: RequestBody::Empty,
        }
    }

    pub fn with_query(mut self, query: Vec<(String, String)>) -> Self {
        self.query = query;
        self
    }

    pub fn with_body(mut self, body: RequestBody) -> Self {
        self.body = body;
        self
    }

    /// Значение query-параметра по имени (для логов и тестов)
    pub fn query_value(&self, name: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl ApiResponse {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn json<T: DeserializeOwned>(&self) -> StoreResult<T> {
        Ok(serde_json::from_slice(&self.body)?)
    }
}

// ==================== TRANSPORT ====================

/// Исполнитель HTTP-запросов.
///
/// Все запросы идут с учётными данными (cookie сессии). Ответ с любым
/// статусом считается успешной доставкой; `Err` только для сетевых сбоев.
#[async_trait(?Send)]
pub trait HttpTransport {
    async fn send(&self, request: ApiRequest) -> StoreResult<ApiResponse>;
}

// ==================== CLIENT ====================

#[derive(Clone)]
pub struct ApiClient {
    transport: Rc<dyn HttpTransport>,
    base_url: String,
}

impl fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    /// `base_url` должен заканчиваться на `/` (см. `config::resolve_api_url`)
    pub fn new(transport: Rc<dyn HttpTransport>, base_url: impl Into<String>) -> Self {
        Self {
            transport,
            base_url: base_url.into(),
        }
    }

    /// Склеивает базовый URL и путь эндпоинта без двойных слэшей
    pub fn url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    /// Отправляет запрос; статус вне 2xx превращается в `StoreError::Server`
    pub async fn execute(&self, request: ApiRequest) -> StoreResult<ApiResponse> {
        debug!(method = %request.method, url = %request.url, "api request");
        let response = self.transport.send(request).await?;
        if response.is_success() {
            Ok(response)
        } else {
            debug!(status = response.status, "api request failed");
            Err(StoreError::from_response(response.status, &response.body))
        }
    }

    pub async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: Vec<(String, String)>,
    ) -> StoreResult<T> {
        let request = ApiRequest::new(Method::Get, self.url(path)).with_query(query);
        self.execute(request).await?.json()
    }

    pub async fn post_json<B: Serialize>(&self, path: &str, body: &B) -> StoreResult<ApiResponse> {
        let request = ApiRequest::new(Method::Post, self.url(path))
            .with_body(RequestBody::Json(serde_json::to_value(body)?));
        self.execute(request).await
    }

    pub async fn put_json<B: Serialize>(&self, path: &str, body: &B) -> StoreResult<ApiResponse> {
        let request = ApiRequest::new(Method::Put, self.url(path))
            .with_body(RequestBody::Json(serde_json::to_value(body)?));
        self.execute(request).await
    }

    pub async fn post_form(
        &self,
        path: &str,
        fields: Vec<(String, String)>,
    ) -> StoreResult<ApiResponse> {
        let request = ApiRequest::new(Method::Post, self.url(path)).with_body(RequestBody::Form(fields));
        self.execute(request).await
    }

    pub async fn delete(&self, path: &str) -> StoreResult<ApiResponse> {
        self.execute(ApiRequest::new(Method::Delete, self.url(path))).await
    }
}
