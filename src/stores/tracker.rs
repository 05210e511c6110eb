// src/stores/tracker.rs
//! Флаг загрузки и поколение запросов для одного слота данных.
//!
//! Каждый запрос берёт [`RequestTicket`]; применять ответ можно только пока
//! тикет текущий. Флаг загрузки снимает `Drop` тикета, и только если за это
//! время не ушёл более новый запрос.

use std::cell::Cell;

#[derive(Debug, Default)]
pub struct RequestTracker {
    generation: Cell<u64>,
    loading: Cell<bool>,
}

impl RequestTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin(&self) -> RequestTicket<'_> {
        let id = self.generation.get().wrapping_add(1);
        self.generation.set(id);
        self.loading.set(true);
        RequestTicket { tracker: self, id }
    }

    pub fn is_loading(&self) -> bool {
        self.loading.get()
    }

    /// Все запросы в полёте становятся устаревшими (сброс хранилища)
    pub fn invalidate(&self) {
        self.generation.set(self.generation.get().wrapping_add(1));
        self.loading.set(false);
    }
}

#[derive(Debug)]
pub struct RequestTicket<'a> {
    tracker: &'a RequestTracker,
    id: u64,
}

impl RequestTicket<'_> {
    pub fn is_current(&self) -> bool {
        self.tracker.generation.get() == self.id
    }
}

impl Drop for RequestTicket<'_> {
    fn drop(&mut self) {
        if self.is_current() {
            self.tracker.loading.set(false);
        }
    }
}
