// src/validator.rs - Validation of write payloads
use validator::{Validate, ValidationError};

use crate::error::StoreError;

/// Для `#[validate(custom(function = ...))]`: строка не пустая после trim
pub fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank"));
    }
    Ok(())
}

/// Тело запроса на запись: проверяется и очищается перед отправкой
pub trait Draft: Validate {
    /// Обрезает пробелы во всех строковых полях
    fn trimmed(self) -> Self;
}

/// Прогоняет валидацию; при ошибке отдаёт единое сообщение ресурса.
///
/// Подробности по полям уходят в лог, в UI попадает только `message`.
pub fn validate_draft<D: Draft>(draft: &D, message: &str) -> Result<(), StoreError> {
    draft.validate().map_err(|errors| {
        tracing::debug!("validation failed: {}", errors);
        StoreError::validation(message)
    })
}

pub struct FieldValidator;

impl FieldValidator {
    pub fn not_empty(value: &str, field: &str) -> Result<(), String> {
        if value.trim().is_empty() {
            Err(format!("{} cannot be empty", field))
        } else {
            Ok(())
        }
    }
}
