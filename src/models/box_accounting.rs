// src/models/box_accounting.rs
//! Учёт шкафов: серийный номер, заказ и четыре участника сборки.

use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::person::format_short_name;
use crate::validator::{not_blank, Draft};

/// Краткая карточка человека внутри шкафа (без отчества в старых ответах)
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct PersonRef {
    pub uuid: Uuid,
    pub name: String,
    pub surname: String,
    #[serde(default)]
    pub patronymic: Option<String>,
}

impl PersonRef {
    pub fn formatted_name(&self) -> String {
        format_short_name(&self.surname, &self.name, self.patronymic.as_deref().unwrap_or(""))
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct BoxAccounting {
    pub serial_num: i64,
    pub name: String,
    pub order_id: String,
    pub scheme_developer: PersonRef,
    pub assembler: PersonRef,
    pub programmer: Option<PersonRef>,
    pub tester: PersonRef,
}

#[derive(Debug, Serialize, Validate, Clone)]
pub struct BoxDraft {
    #[validate(custom(function = "not_blank"))]
    pub name: String,
    pub order_id: String,
    pub scheme_developer_id: Uuid,
    pub assembler_id: Uuid,
    pub programmer_id: Option<Uuid>,
    pub tester_id: Uuid,
}

impl Draft for BoxDraft {
    fn trimmed(self) -> Self {
        Self {
            name: self.name.trim().to_string(),
            order_id: self.order_id.trim().to_string(),
            ..self
        }
    }
}
