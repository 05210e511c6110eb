// src/lib.rs
//! Клиент КИС: хранилища состояния (люди, контрагенты, шкафы, заказы,
//! сессия, тема) и их синхронизация с REST API.

pub mod config;
pub mod error;
pub mod http;
pub mod logging;
pub mod models;
pub mod pagination;
pub mod storage;
pub mod stores;
pub mod transport;
pub mod validator;

#[cfg(test)]
pub(crate) mod test_utils;

pub use error::{StoreError, StoreResult};
pub use http::ApiClient;
pub use stores::Stores;
