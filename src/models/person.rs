// src/models/person.rs
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::validator::{not_blank, Draft};

// ==================== PERSON ====================

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Person {
    pub uuid: Uuid,
    pub name: String,
    pub surname: String,
    #[serde(default)]
    pub patronymic: String,
}

impl Person {
    /// Фамилия И. О. для отображения: `Иванов И.П.`
    pub fn formatted_name(&self) -> String {
        format_short_name(&self.surname, &self.name, &self.patronymic)
    }
}

/// Сокращённое ФИО; пустые имя/отчество просто пропускаются
pub fn format_short_name(surname: &str, name: &str, patronymic: &str) -> String {
    let initials: String = [name, patronymic]
        .iter()
        .filter_map(|part| part.trim().chars().next())
        .map(|c| format!("{}.", c))
        .collect();

    if initials.is_empty() {
        surname.to_string()
    } else {
        format!("{} {}", surname, initials)
    }
}

#[derive(Debug, Serialize, Validate, Clone)]
pub struct PersonDraft {
    #[validate(custom(function = "not_blank"))]
    pub name: String,

    #[validate(custom(function = "not_blank"))]
    pub surname: String,

    #[validate(custom(function = "not_blank"))]
    pub patronymic: String,
}

impl PersonDraft {
    pub fn new(name: impl Into<String>, surname: impl Into<String>, patronymic: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            surname: surname.into(),
            patronymic: patronymic.into(),
        }
    }
}

impl Draft for PersonDraft {
    fn trimmed(self) -> Self {
        Self {
            name: self.name.trim().to_string(),
            surname: self.surname.trim().to_string(),
            patronymic: self.patronymic.trim().to_string(),
        }
    }
}
