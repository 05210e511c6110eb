// src/pagination.rs
//! Две модели пагинации бэкенда:
//! page/size (учёт шкафов) и skip/limit (заказы).

use serde::{Deserialize, Serialize};

// ==================== PAGE / SIZE ====================

/// Метаданные страницы, как их отдаёт `box-accounting/read/`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageMeta {
    pub total: i64,
    pub page: i64,
    pub size: i64,
    pub pages: i64,
}

impl Default for PageMeta {
    fn default() -> Self {
        Self {
            total: 0,
            page: 1,
            size: 20,
            pages: 1,
        }
    }
}

impl PageMeta {
    pub fn contains_page(&self, page: i64) -> bool {
        page >= 1 && page <= self.pages
    }

    pub fn current_request(&self) -> PageRequest {
        PageRequest {
            page: self.page,
            size: self.size,
        }
    }
}

/// Страница, которую просим у сервера (1-based)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: i64,
    pub size: i64,
}

impl PageRequest {
    pub fn new(page: i64, size: i64) -> Self {
        Self { page, size }
    }

    pub fn to_query(self) -> Vec<(String, String)> {
        vec![
            ("page".to_string(), self.page.to_string()),
            ("size".to_string(), self.size.to_string()),
        ]
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: i64,
    pub page: i64,
    pub size: i64,
    pub pages: i64,
}

/// Ответ списочного эндпоинта: данные + опциональные метаданные страницы
pub trait Listing<T> {
    fn into_parts(self) -> (Vec<T>, Option<PageMeta>);
}

impl<T> Listing<T> for Vec<T> {
    fn into_parts(self) -> (Vec<T>, Option<PageMeta>) {
        (self, None)
    }
}

impl<T> Listing<T> for Page<T> {
    fn into_parts(self) -> (Vec<T>, Option<PageMeta>) {
        let meta = PageMeta {
            total: self.total,
            page: self.page,
            size: self.size,
            pages: self.pages,
        };
        (self.items, Some(meta))
    }
}

// ==================== SKIP / LIMIT ====================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkipLimit {
    pub total: i64,
    pub limit: i64,
    pub skip: i64,
}

impl Default for SkipLimit {
    fn default() -> Self {
        Self {
            total: 0,
            limit: 10,
            skip: 0,
        }
    }
}

impl SkipLimit {
    /// Номер текущей страницы, с нуля
    pub fn current_page(&self) -> i64 {
        if self.limit > 0 {
            self.skip / self.limit
        } else {
            0
        }
    }

    pub fn total_pages(&self) -> i64 {
        if self.limit > 0 {
            self.total / self.limit + i64::from(self.total % self.limit != 0)
        } else {
            0
        }
    }
}
