// src/error.rs
//! Ошибки слоя хранилищ: валидация, ответы сервера, транспорт, декодирование.

use serde_json::Value;
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum StoreError {
    /// Локальная проверка не прошла, запрос не отправлялся
    Validation(String),
    /// Сервер ответил статусом вне 2xx
    Server { status: u16, detail: Option<String> },
    /// Сетевая ошибка, таймаут, обрыв тела ответа
    Transport(String),
    /// Ответ 2xx, но тело не совпало с ожидаемой формой
    Decode(String),
    /// У ресурса нет эндпоинта для операции
    Unsupported(String),
    /// Ответ устарел: для того же слота уже ушёл более новый запрос
    Superseded,
}

pub type StoreResult<T> = Result<T, StoreError>;

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            StoreError::Validation(msg) => write!(f, "Validation Error: {}", msg),
            StoreError::Server { status, detail: Some(detail) } => {
                write!(f, "Server Error ({}): {}", status, detail)
            }
            StoreError::Server { status, detail: None } => {
                write!(f, "Request failed with status code {}", status)
            }
            StoreError::Transport(msg) => write!(f, "Transport Error: {}", msg),
            StoreError::Decode(msg) => write!(f, "Decode Error: {}", msg),
            StoreError::Unsupported(msg) => write!(f, "Unsupported: {}", msg),
            StoreError::Superseded => write!(f, "Response superseded by a newer request"),
        }
    }
}

impl std::error::Error for StoreError {}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        StoreError::Decode(err.to_string())
    }
}

impl StoreError {
    pub fn validation(msg: impl Into<String>) -> Self {
        StoreError::Validation(msg.into())
    }

    pub fn transport(msg: impl Into<String>) -> Self {
        StoreError::Transport(msg.into())
    }

    /// Строит ошибку сервера, вытаскивая `detail` из тела ответа
    pub fn from_response(status: u16, body: &[u8]) -> Self {
        StoreError::Server {
            status,
            detail: extract_detail(body),
        }
    }

    pub fn is_superseded(&self) -> bool {
        matches!(self, StoreError::Superseded)
    }

    /// Сообщение для поля `error` хранилища.
    ///
    /// `fallback` используется, когда сервер ответил ошибкой без `detail`.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            StoreError::Validation(msg) => msg.clone(),
            StoreError::Server { detail: Some(detail), .. } => detail.clone(),
            StoreError::Server { detail: None, .. } => fallback.to_string(),
            StoreError::Transport(msg)
            | StoreError::Decode(msg)
            | StoreError::Unsupported(msg) => msg.clone(),
            StoreError::Superseded => fallback.to_string(),
        }
    }

    /// Как `user_message`, но ответ без `detail` описывается статусом
    /// ("Request failed with status code 500"); так показывают ошибки заказов.
    pub fn status_message(&self, fallback: &str) -> String {
        match self {
            StoreError::Server { detail: None, .. } => self.to_string(),
            _ => self.user_message(fallback),
        }
    }
}

/// Достаёт `detail` из JSON тела ошибки.
///
/// FastAPI отдаёт либо строку, либо список объектов с полем `msg`
/// (ошибки валидации pydantic); список склеивается через "; ".
pub fn extract_detail(body: &[u8]) -> Option<String> {
    let value: Value = serde_json::from_slice(body).ok()?;
    match value.get("detail")? {
        Value::String(detail) if !detail.trim().is_empty() => Some(detail.clone()),
        Value::Array(items) => {
            let messages: Vec<&str> = items
                .iter()
                .filter_map(|item| item.get("msg").and_then(Value::as_str))
                .collect();
            if messages.is_empty() {
                None
            } else {
                Some(messages.join("; "))
            }
        }
        _ => None,
    }
}
