// src/models/order.rs
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use strum::{EnumIter, FromRepr, IntoStaticStr};

// ==================== STATUS ====================

/// Статусы заказа 1..=8, как в справочнике `order_statuses`
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, FromRepr, IntoStaticStr)]
#[repr(u8)]
pub enum OrderStatus {
    #[strum(serialize = "Не определён")]
    Undefined = 1,
    #[strum(serialize = "На согласовании")]
    Negotiation = 2,
    #[strum(serialize = "В работе")]
    InProgress = 3,
    #[strum(serialize = "Просрочено")]
    Overdue = 4,
    #[strum(serialize = "Выполнено в срок")]
    DoneOnTime = 5,
    #[strum(serialize = "Выполнено НЕ в срок")]
    DoneLate = 6,
    #[strum(serialize = "Не согласовано")]
    Rejected = 7,
    #[strum(serialize = "На паузе")]
    Paused = 8,
}

pub const UNKNOWN_STATUS_LABEL: &str = "Неизвестный статус";

impl OrderStatus {
    pub fn from_code(code: i64) -> Option<Self> {
        u8::try_from(code).ok().and_then(Self::from_repr)
    }

    pub fn code(self) -> u8 {
        self as u8
    }

    pub fn label(self) -> &'static str {
        self.into()
    }
}

/// Подпись статуса для UI; null и коды вне 1..=8 дают "Неизвестный статус"
pub fn status_label(code: Option<i64>) -> &'static str {
    code.and_then(OrderStatus::from_code)
        .map(OrderStatus::label)
        .unwrap_or(UNKNOWN_STATUS_LABEL)
}

// ==================== ORDER ====================

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct OrderSerial {
    pub serial: String,
}

/// Строка списка заказов (`order/read`)
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct OrderRead {
    pub serial: String,
    pub name: String,
    /// Уже собранная строка "Форма Имя"
    pub customer: String,
    pub priority: Option<i64>,
    pub status_id: i64,
    pub start_moment: Option<NaiveDateTime>,
    pub deadline_moment: Option<NaiveDateTime>,
    pub end_moment: Option<NaiveDateTime>,
    // Плановые деньги под заказ и флаги оплаты
    pub materials_cost: Option<i64>,
    #[serde(default)]
    pub materials_paid: bool,
    pub products_cost: Option<i64>,
    #[serde(default)]
    pub products_paid: bool,
    pub work_cost: Option<i64>,
    #[serde(default)]
    pub work_paid: bool,
    pub debt: Option<i64>,
    #[serde(default)]
    pub debt_paid: bool,
}

impl OrderRead {
    pub fn status_label(&self) -> &'static str {
        status_label(Some(self.status_id))
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct OrderPage {
    pub total: i64,
    pub limit: i64,
    pub skip: i64,
    pub data: Vec<OrderRead>,
}

// ==================== DETAIL ====================

// Вложенные записи карточки: любое поле может отсутствовать

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct OrderWork {
    #[serde(default)]
    pub id: i64,
    #[serde(default)]
    pub name: String,
    pub description: Option<String>,
    #[serde(default = "default_true")]
    pub active: bool,
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct OrderComment {
    #[serde(default)]
    pub id: i64,
    pub moment_of_creation: Option<NaiveDateTime>,
    #[serde(default)]
    pub text: String,
    pub person: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct OrderTask {
    #[serde(default)]
    pub id: i64,
    #[serde(default)]
    pub name: String,
    pub description: Option<String>,
    pub status_id: Option<i64>,
    pub executor: Option<String>,
    pub deadline_moment: Option<NaiveDateTime>,
}

/// Учёт затраченного времени по заказу
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct OrderTiming {
    #[serde(default)]
    pub id: i64,
    pub person: Option<String>,
    pub task_id: Option<i64>,
    /// Часы
    pub time: Option<f64>,
    pub timing_date: Option<NaiveDateTime>,
}

/// Развёрнутый заказ (`order/detail/{serial}`)
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct OrderDetail {
    #[serde(flatten)]
    pub order: OrderRead,
    #[serde(default)]
    pub works: Vec<OrderWork>,
    #[serde(default)]
    pub comments: Vec<OrderComment>,
    #[serde(default)]
    pub tasks: Vec<OrderTask>,
    #[serde(default)]
    pub timings: Vec<OrderTiming>,
}

// ==================== QUERY ====================

/// Фильтры `order/read`; `None` не попадает в query string
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OrderQuery {
    pub skip: Option<i64>,
    pub limit: Option<i64>,
    pub status_id: Option<i64>,
    pub search_serial: Option<String>,
    pub search_customer: Option<String>,
    pub search_priority: Option<i64>,
}

impl OrderQuery {
    /// Страница с нуля; отрицательная страница считается первой
    pub fn page(page: i64, limit: i64) -> Self {
        Self {
            skip: Some(page.max(0).saturating_mul(limit)),
            limit: Some(limit),
            ..Default::default()
        }
    }

    pub fn to_query(&self) -> Vec<(String, String)> {
        let mut params = Vec::new();
        let mut push = |key: &str, value: Option<String>| {
            if let Some(value) = value {
                params.push((key.to_string(), value));
            }
        };
        push("skip", self.skip.map(|v| v.to_string()));
        push("limit", self.limit.map(|v| v.to_string()));
        push("status_id", self.status_id.map(|v| v.to_string()));
        push("search_serial", self.search_serial.clone());
        push("search_customer", self.search_customer.clone());
        push("search_priority", self.search_priority.map(|v| v.to_string()));
        params
    }
}
