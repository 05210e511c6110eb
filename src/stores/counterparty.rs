// src/stores/counterparty.rs
use std::cmp::Ordering;

use crate::models::{Counterparty, CounterpartyDraft, CounterpartyForm};
use crate::stores::resource::{Resource, ResourceStore};

pub struct Counterparties;

pub type CounterpartyStore = ResourceStore<Counterparties>;

impl Resource for Counterparties {
    type Item = Counterparty;
    type Key = i64;
    type Draft = CounterpartyDraft;
    type Listing = Vec<Counterparty>;

    const NAME: &'static str = "counterparties";
    const SINGULAR: &'static str = "counterparty";
    const READ_PATH: &'static str = "counterparty/read";
    const CREATE_PATH: &'static str = "counterparty/create";
    const REQUIRED_MESSAGE: &'static str = "Counterparty name is required";

    fn key(item: &Counterparty) -> i64 {
        item.id
    }

    fn update_path(key: &i64) -> String {
        format!("counterparty/update/{}", key)
    }

    fn delete_path(key: &i64) -> Option<String> {
        Some(format!("counterparty/delete/{}", key))
    }

    /// По названию без учёта регистра
    fn compare(a: &Counterparty, b: &Counterparty) -> Ordering {
        a.name
            .to_lowercase()
            .cmp(&b.name.to_lowercase())
            .then_with(|| a.name.cmp(&b.name))
    }

    fn search_fields(item: &Counterparty) -> Vec<&str> {
        vec![item.name.as_str()]
    }
}

impl ResourceStore<Counterparties> {
    /// Уникальные формы в порядке первого появления
    pub fn forms(&self) -> Vec<CounterpartyForm> {
        self.with_items(|items| {
            let mut forms: Vec<CounterpartyForm> = Vec::new();
            for counterparty in items {
                if !forms.iter().any(|form| form.id == counterparty.form.id) {
                    forms.push(counterparty.form.clone());
                }
            }
            forms
        })
    }

    pub fn filter_by_form(&self, form_id: i64) -> Vec<Counterparty> {
        self.with_items(|items| {
            items
                .iter()
                .filter(|counterparty| counterparty.form.id == form_id)
                .cloned()
                .collect()
        })
    }
}
