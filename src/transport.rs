// src/transport.rs
//! Боевой транспорт на awc. Запросы идут "с учётными данными": cookie из
//! ответов сервера запоминаются и отправляются обратно, как в браузере.

use async_trait::async_trait;
use awc::http::{header, Method as AwcMethod};
use awc::Client;
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::time::Duration;
use tracing::{debug, trace};

use crate::config::ApiConfig;
use crate::error::{StoreError, StoreResult};
use crate::http::{ApiRequest, ApiResponse, HttpTransport, Method, RequestBody};

impl From<Method> for AwcMethod {
    fn from(method: Method) -> Self {
        match method {
            Method::Get => AwcMethod::GET,
            Method::Post => AwcMethod::POST,
            Method::Put => AwcMethod::PUT,
            Method::Delete => AwcMethod::DELETE,
        }
    }
}

// ==================== COOKIE JAR ====================

#[derive(Debug, Default)]
pub struct CookieJar {
    cookies: RefCell<BTreeMap<String, String>>,
}

impl CookieJar {
    /// Пустое значение удаляет cookie (так сервер сбрасывает сессию)
    pub fn store(&self, name: &str, value: &str) {
        let mut cookies = self.cookies.borrow_mut();
        if value.is_empty() {
            cookies.remove(name);
        } else {
            cookies.insert(name.to_string(), value.to_string());
        }
    }

    pub fn get(&self, name: &str) -> Option<String> {
        self.cookies.borrow().get(name).cloned()
    }

    pub fn is_empty(&self) -> bool {
        self.cookies.borrow().is_empty()
    }

    /// Значение заголовка `Cookie`
    pub fn header_value(&self) -> Option<String> {
        let cookies = self.cookies.borrow();
        if cookies.is_empty() {
            return None;
        }
        let pairs: Vec<String> = cookies
            .iter()
            .map(|(name, value)| format!("{}={}", name, value))
            .collect();
        Some(pairs.join("; "))
    }
}

// ==================== TRANSPORT ====================

pub struct AwcTransport {
    client: Client,
    jar: CookieJar,
    max_body_bytes: usize,
}

impl std::fmt::Debug for AwcTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AwcTransport")
            .field("jar", &self.jar)
            .field("max_body_bytes", &self.max_body_bytes)
            .finish_non_exhaustive()
    }
}

impl AwcTransport {
    pub fn new(config: &ApiConfig) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .finish();
        Self {
            client,
            jar: CookieJar::default(),
            max_body_bytes: config.max_body_bytes,
        }
    }

    pub fn cookies(&self) -> &CookieJar {
        &self.jar
    }
}

#[async_trait(?Send)]
impl HttpTransport for AwcTransport {
    async fn send(&self, request: ApiRequest) -> StoreResult<ApiResponse> {
        let ApiRequest {
            method,
            url,
            query,
            body,
        } = request;

        let mut req = self.client.request(method.into(), url.as_str());
        if !query.is_empty() {
            req = req
                .query(&query)
                .map_err(|e| StoreError::transport(format!("Invalid query: {}", e)))?;
        }
        if let Some(cookie) = self.jar.header_value() {
            req = req.insert_header((header::COOKIE, cookie));
        }

        let sent = match body {
            RequestBody::Empty => req.send().await,
            RequestBody::Json(value) => req.send_json(&value).await,
            RequestBody::Form(fields) => req.send_form(&fields).await,
        };
        let mut response = sent.map_err(|e| {
            debug!(%method, %url, error = %e, "request failed");
            StoreError::transport(e.to_string())
        })?;

        match response.cookies() {
            Ok(cookies) => {
                for cookie in cookies.iter() {
                    trace!(name = cookie.name(), "cookie received");
                    self.jar.store(cookie.name(), cookie.value());
                }
            }
            Err(e) => debug!(error = %e, "ignoring malformed Set-Cookie"),
        }

        let status = response.status().as_u16();
        let bytes = response
            .body()
            .limit(self.max_body_bytes)
            .await
            .map_err(|e| StoreError::transport(format!("Failed to read response body: {}", e)))?;

        Ok(ApiResponse::new(status, bytes.to_vec()))
    }
}
