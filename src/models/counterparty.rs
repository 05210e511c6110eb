// src/models/counterparty.rs
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::validator::{not_blank, Draft};

/// Организационно-правовая форма (ООО, ИП, ...)
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct CounterpartyForm {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Counterparty {
    pub id: i64,
    pub name: String,
    pub form: CounterpartyForm,
}

impl Counterparty {
    /// `ООО "Ромашка"`
    pub fn full_name(&self) -> String {
        format!("{} \"{}\"", self.form.name, self.name)
    }
}

#[derive(Debug, Serialize, Validate, Clone)]
pub struct CounterpartyDraft {
    #[validate(custom(function = "not_blank"))]
    pub name: String,
    pub form_id: i64,
}

impl CounterpartyDraft {
    pub fn new(name: impl Into<String>, form_id: i64) -> Self {
        Self {
            name: name.into(),
            form_id,
        }
    }
}

impl Draft for CounterpartyDraft {
    fn trimmed(self) -> Self {
        Self {
            name: self.name.trim().to_string(),
            form_id: self.form_id,
        }
    }
}
