// src/models/mod.rs

// 1. Объявляем модули
pub mod box_accounting;
pub mod counterparty;
pub mod order;
pub mod person;
pub mod user;

// 2. Ре-экспортируем содержимое, чтобы структуры были доступны как crate::models::StructName
pub use box_accounting::*;
pub use counterparty::*;
pub use order::*;
pub use person::*;
pub use user::*;
