// src/stores/orders.rs
//! Заказы: серийные номера, постраничный список (skip/limit) и карточка заказа.

use std::cell::RefCell;
use tracing::{error, warn};

use crate::error::{StoreError, StoreResult};
use crate::http::ApiClient;
use crate::models::{status_label, OrderDetail, OrderPage, OrderQuery, OrderRead, OrderSerial};
use crate::pagination::SkipLimit;
use crate::stores::tracker::RequestTracker;

// ==================== LIST ====================

#[derive(Debug, Clone, Default)]
struct OrdersState {
    serials: Vec<OrderSerial>,
    orders: Vec<OrderRead>,
    window: SkipLimit,
    error: Option<String>,
    /// Фильтры последнего запроса, для перелистывания
    last_query: OrderQuery,
}

#[derive(Debug)]
pub struct OrderStore {
    api: ApiClient,
    state: RefCell<OrdersState>,
    serials_tracker: RequestTracker,
    orders_tracker: RequestTracker,
}

impl OrderStore {
    pub fn new(api: ApiClient) -> Self {
        Self {
            api,
            state: RefCell::new(OrdersState::default()),
            serials_tracker: RequestTracker::new(),
            orders_tracker: RequestTracker::new(),
        }
    }

    pub fn serials(&self) -> Vec<OrderSerial> {
        self.state.borrow().serials.clone()
    }

    pub fn orders(&self) -> Vec<OrderRead> {
        self.state.borrow().orders.clone()
    }

    pub fn window(&self) -> SkipLimit {
        self.state.borrow().window
    }

    pub fn total_orders(&self) -> i64 {
        self.window().total
    }

    pub fn serials_count(&self) -> usize {
        self.state.borrow().serials.len()
    }

    /// С нуля
    pub fn current_page(&self) -> i64 {
        self.window().current_page()
    }

    pub fn total_pages(&self) -> i64 {
        self.window().total_pages()
    }

    pub fn error(&self) -> Option<String> {
        self.state.borrow().error.clone()
    }

    /// Один общий индикатор на оба списка
    pub fn is_loading(&self) -> bool {
        self.serials_tracker.is_loading() || self.orders_tracker.is_loading()
    }

    pub fn clear_error(&self) {
        self.state.borrow_mut().error = None;
    }

    fn fail(&self, err: StoreError, fallback: &str) -> StoreError {
        if !err.is_superseded() {
            error!(error = %err, "{}", fallback);
            self.state.borrow_mut().error = Some(err.status_message(fallback));
        }
        err
    }

    pub async fn fetch_order_serials(&self, status_id: Option<i64>) -> StoreResult<Vec<OrderSerial>> {
        self.clear_error();
        let ticket = self.serials_tracker.begin();

        let query = status_id
            .map(|id| vec![("status_id".to_string(), id.to_string())])
            .unwrap_or_default();
        let result = self.api.get::<Vec<OrderSerial>>("order/read-serial", query).await;

        if !ticket.is_current() {
            warn!("discarding stale order serials response");
            return Err(StoreError::Superseded);
        }

        match result {
            Ok(serials) => {
                self.state.borrow_mut().serials = serials.clone();
                Ok(serials)
            }
            // старый список серийников остаётся
            Err(err) => Err(self.fail(err, "Failed to fetch order serials")),
        }
    }

    pub fn reset_order_serials(&self) {
        self.serials_tracker.invalidate();
        self.state.borrow_mut().serials.clear();
    }

    pub async fn fetch_orders(&self, query: OrderQuery) -> StoreResult<Vec<OrderRead>> {
        self.clear_error();
        let ticket = self.orders_tracker.begin();
        self.state.borrow_mut().last_query = query.clone();

        let result = self.api.get::<OrderPage>("order/read", query.to_query()).await;

        if !ticket.is_current() {
            warn!("discarding stale orders response");
            return Err(StoreError::Superseded);
        }

        match result {
            Ok(page) => {
                let mut state = self.state.borrow_mut();
                state.window = SkipLimit {
                    total: page.total,
                    limit: page.limit,
                    skip: page.skip,
                };
                state.orders = page.data.clone();
                Ok(page.data)
            }
            Err(err) => {
                {
                    // limit и skip сохраняются
                    let mut state = self.state.borrow_mut();
                    state.orders.clear();
                    state.window.total = 0;
                }
                Err(self.fail(err, "Failed to fetch orders"))
            }
        }
    }

    /// Переход на страницу (с нуля) с теми же фильтрами
    pub async fn change_page(&self, page: i64) -> bool {
        let window = self.window();
        if page < 0 || page >= window.total_pages() {
            return false;
        }
        let mut query = self.state.borrow().last_query.clone();
        query.limit = Some(window.limit);
        query.skip = Some(page.saturating_mul(window.limit));
        self.fetch_orders(query).await.is_ok()
    }

    pub fn reset_orders(&self) {
        self.orders_tracker.invalidate();
        let mut state = self.state.borrow_mut();
        state.orders.clear();
        state.window = SkipLimit::default();
        state.last_query = OrderQuery::default();
    }
}

// ==================== DETAIL ====================

/// Карточка заказа; свой флаг загрузки, чтобы не дёргать список
#[derive(Debug)]
pub struct OrderDetailStore {
    api: ApiClient,
    detail: RefCell<Option<OrderDetail>>,
    error: RefCell<Option<String>>,
    tracker: RequestTracker,
}

impl OrderDetailStore {
    pub fn new(api: ApiClient) -> Self {
        Self {
            api,
            detail: RefCell::new(None),
            error: RefCell::new(None),
            tracker: RequestTracker::new(),
        }
    }

    pub fn detail(&self) -> Option<OrderDetail> {
        self.detail.borrow().clone()
    }

    pub fn error(&self) -> Option<String> {
        self.error.borrow().clone()
    }

    pub fn is_loading(&self) -> bool {
        self.tracker.is_loading()
    }

    /// Подпись статуса загруженного заказа
    pub fn status_label(&self) -> &'static str {
        status_label(self.detail.borrow().as_ref().map(|d| d.order.status_id))
    }

    pub async fn fetch_detail(&self, serial: &str) -> StoreResult<OrderDetail> {
        *self.error.borrow_mut() = None;
        let serial = serial.trim();
        if serial.is_empty() {
            *self.detail.borrow_mut() = None;
            let err = StoreError::validation("Order serial is required");
            *self.error.borrow_mut() = Some(err.user_message(""));
            return Err(err);
        }

        let ticket = self.tracker.begin();
        let result = self
            .api
            .get::<OrderDetail>(&format!("order/detail/{}", serial), Vec::new())
            .await;

        if !ticket.is_current() {
            warn!(serial, "discarding stale order detail response");
            return Err(StoreError::Superseded);
        }

        match result {
            Ok(detail) => {
                *self.detail.borrow_mut() = Some(detail.clone());
                Ok(detail)
            }
            Err(err) => {
                error!(serial, error = %err, "Failed to fetch order detail");
                *self.detail.borrow_mut() = None;
                *self.error.borrow_mut() = Some(err.status_message("Failed to fetch order detail"));
                Err(err)
            }
        }
    }

    pub fn reset_detail(&self) {
        self.tracker.invalidate();
        *self.detail.borrow_mut() = None;
    }
}
