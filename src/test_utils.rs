// src/test_utils.rs
//! Скриптовый транспорт для тестов хранилищ.

use async_trait::async_trait;
use futures::channel::oneshot;
use std::cell::RefCell;
use std::collections::VecDeque;

use crate::error::{StoreError, StoreResult};
use crate::http::{ApiRequest, ApiResponse, HttpTransport};

enum Scripted {
    Ready(StoreResult<ApiResponse>),
    Gated(oneshot::Receiver<()>, StoreResult<ApiResponse>),
}

/// Отдаёт заранее записанные ответы по очереди и запоминает запросы
#[derive(Default)]
pub struct FakeTransport {
    responses: RefCell<VecDeque<Scripted>>,
    requests: RefCell<Vec<ApiRequest>>,
}

impl FakeTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_json(&self, status: u16, body: serde_json::Value) {
        let bytes = serde_json::to_vec(&body).unwrap();
        self.push(Ok(ApiResponse::new(status, bytes)));
    }

    pub fn push_status(&self, status: u16) {
        self.push(Ok(ApiResponse::new(status, Vec::new())));
    }

    pub fn push_network_error(&self, msg: &str) {
        self.push(Err(StoreError::transport(msg)));
    }

    pub fn push(&self, response: StoreResult<ApiResponse>) {
        self.responses.borrow_mut().push_back(Scripted::Ready(response));
    }

    /// Ответ придёт только после `send(())` в возвращённый канал
    pub fn push_gated_json(&self, status: u16, body: serde_json::Value) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        let bytes = serde_json::to_vec(&body).unwrap();
        self.responses
            .borrow_mut()
            .push_back(Scripted::Gated(rx, Ok(ApiResponse::new(status, bytes))));
        tx
    }

    pub fn requests(&self) -> Vec<ApiRequest> {
        self.requests.borrow().clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.borrow().len()
    }

    pub fn last_request(&self) -> Option<ApiRequest> {
        self.requests.borrow().last().cloned()
    }
}

#[async_trait(?Send)]
impl HttpTransport for FakeTransport {
    async fn send(&self, request: ApiRequest) -> StoreResult<ApiResponse> {
        self.requests.borrow_mut().push(request);
        let next = self.responses.borrow_mut().pop_front();
        match next {
            Some(Scripted::Ready(response)) => response,
            Some(Scripted::Gated(gate, response)) => {
                let _ = gate.await;
                response
            }
            None => Err(StoreError::transport("no scripted response")),
        }
    }
}
