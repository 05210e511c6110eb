// src/stores/resource.rs
//! Обобщённое хранилище сущностей: список + ошибка + загрузка + пагинация
//! и CRUD-действия, синхронизирующие их с API.

use serde::{de::DeserializeOwned, Serialize};
use std::cell::RefCell;
use std::cmp::Ordering;
use std::fmt;
use std::marker::PhantomData;
use tracing::{debug, error, warn};

use crate::error::{StoreError, StoreResult};
use crate::http::ApiClient;
use crate::pagination::{Listing, PageMeta, PageRequest};
use crate::stores::tracker::RequestTracker;
use crate::validator::{validate_draft, Draft};

/// Описание ресурса: тип записи, ключ, эндпоинты и правила отображения
pub trait Resource: 'static {
    type Item: DeserializeOwned + Clone + fmt::Debug;
    type Key: PartialEq + Clone + fmt::Display;
    type Draft: Draft + Serialize;
    type Listing: DeserializeOwned + Listing<Self::Item>;

    /// Множественное число, для логов и "Error fetching ..."
    const NAME: &'static str;
    /// Единственное число, для "Error creating ..."
    const SINGULAR: &'static str;
    const READ_PATH: &'static str;
    const CREATE_PATH: &'static str;
    /// Сообщение при пустых обязательных полях
    const REQUIRED_MESSAGE: &'static str;
    /// Серверная пагинация page/size; такие списки очищаются при ошибке загрузки
    const PAGINATED: bool = false;

    fn key(item: &Self::Item) -> Self::Key;

    fn update_path(key: &Self::Key) -> String;

    /// `None` - у ресурса нет эндпоинта удаления
    fn delete_path(key: &Self::Key) -> Option<String>;

    fn compare(a: &Self::Item, b: &Self::Item) -> Ordering;

    /// Текстовые поля для поиска подстроки
    fn search_fields(item: &Self::Item) -> Vec<&str>;
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResourceState<T> {
    pub items: Vec<T>,
    pub error: Option<String>,
    pub pagination: Option<PageMeta>,
}

pub struct ResourceStore<R: Resource> {
    api: ApiClient,
    state: RefCell<ResourceState<R::Item>>,
    tracker: RequestTracker,
    _resource: PhantomData<R>,
}

impl<R: Resource> fmt::Debug for ResourceStore<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResourceStore")
            .field("resource", &R::NAME)
            .field("state", &self.state.borrow())
            .field("is_loading", &self.tracker.is_loading())
            .finish()
    }
}

impl<R: Resource> ResourceStore<R> {
    pub fn new(api: ApiClient) -> Self {
        Self {
            api,
            state: RefCell::new(Self::initial_state()),
            tracker: RequestTracker::new(),
            _resource: PhantomData,
        }
    }

    fn initial_state() -> ResourceState<R::Item> {
        ResourceState {
            items: Vec::new(),
            error: None,
            pagination: R::PAGINATED.then(PageMeta::default),
        }
    }

    // ==================== STATE ====================

    pub fn items(&self) -> Vec<R::Item> {
        self.state.borrow().items.clone()
    }

    pub fn len(&self) -> usize {
        self.state.borrow().items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.borrow().items.is_empty()
    }

    pub fn error(&self) -> Option<String> {
        self.state.borrow().error.clone()
    }

    pub fn is_loading(&self) -> bool {
        self.tracker.is_loading()
    }

    pub fn pagination(&self) -> Option<PageMeta> {
        self.state.borrow().pagination
    }

    /// Отсортированная копия; сам список остаётся в порядке сервера
    pub fn sorted(&self) -> Vec<R::Item> {
        let mut items = self.items();
        items.sort_by(R::compare);
        items
    }

    pub fn find(&self, key: &R::Key) -> Option<R::Item> {
        self.state
            .borrow()
            .items
            .iter()
            .find(|item| R::key(item) == *key)
            .cloned()
    }

    /// Поиск подстроки без учёта регистра; пустой запрос отдаёт весь список
    pub fn search(&self, query: &str) -> Vec<R::Item> {
        let needle = query.trim().to_lowercase();
        let state = self.state.borrow();
        if needle.is_empty() {
            return state.items.clone();
        }
        state
            .items
            .iter()
            .filter(|item| {
                R::search_fields(item)
                    .iter()
                    .any(|field| field.to_lowercase().contains(&needle))
            })
            .cloned()
            .collect()
    }

    /// Доступ к списку без копирования (производные представления)
    pub fn with_items<T>(&self, f: impl FnOnce(&[R::Item]) -> T) -> T {
        f(&self.state.borrow().items)
    }

    pub fn clear_error(&self) {
        self.state.borrow_mut().error = None;
    }

    pub fn clear_store(&self) {
        self.tracker.invalidate();
        *self.state.borrow_mut() = Self::initial_state();
    }

    fn fail(&self, err: StoreError, fallback: &str) -> StoreError {
        if !err.is_superseded() {
            error!(resource = R::NAME, error = %err, "{}", fallback);
            self.state.borrow_mut().error = Some(err.user_message(fallback));
        }
        err
    }

    fn prepare(&self, draft: R::Draft) -> StoreResult<R::Draft> {
        validate_draft(&draft, R::REQUIRED_MESSAGE).map_err(|err| {
            self.state.borrow_mut().error = Some(err.user_message(R::REQUIRED_MESSAGE));
            err
        })?;
        Ok(draft.trimmed())
    }

    // ==================== FETCH ====================

    /// Загружает текущую страницу (или весь список для непагинированных)
    pub async fn fetch(&self) -> StoreResult<Vec<R::Item>> {
        self.load(None).await
    }

    pub async fn fetch_page(&self, page: PageRequest) -> StoreResult<Vec<R::Item>> {
        self.load(Some(page)).await
    }

    async fn load(&self, page: Option<PageRequest>) -> StoreResult<Vec<R::Item>> {
        self.clear_error();
        let ticket = self.tracker.begin();

        let query = if R::PAGINATED {
            page.or_else(|| self.pagination().map(|meta| meta.current_request()))
                .map(PageRequest::to_query)
                .unwrap_or_default()
        } else {
            Vec::new()
        };

        let result = self.api.get::<R::Listing>(R::READ_PATH, query).await;

        if !ticket.is_current() {
            warn!(resource = R::NAME, "discarding stale list response");
            return Err(StoreError::Superseded);
        }

        match result {
            Ok(listing) => {
                let (items, meta) = listing.into_parts();
                let mut state = self.state.borrow_mut();
                state.items = items.clone();
                if meta.is_some() {
                    state.pagination = meta;
                }
                debug!(resource = R::NAME, count = items.len(), "list loaded");
                Ok(items)
            }
            Err(err) => {
                if R::PAGINATED {
                    self.state.borrow_mut().items.clear();
                }
                Err(self.fail(err, &format!("Error fetching {}", R::NAME)))
            }
        }
    }

    /// Перезагрузка после записи; ошибка уже лежит в `error`
    async fn refresh(&self) {
        if let Err(err) = self.load(None).await {
            debug!(resource = R::NAME, error = %err, "refresh after write failed");
        }
    }

    // ==================== PAGINATION ====================

    /// `false` без запроса, если страница вне 1..=pages
    pub async fn change_page(&self, page: i64) -> bool {
        let Some(meta) = self.pagination() else {
            return false;
        };
        if !meta.contains_page(page) {
            return false;
        }
        self.fetch_page(PageRequest::new(page, meta.size)).await.is_ok()
    }

    pub async fn change_page_size(&self, size: i64) -> bool {
        if !R::PAGINATED || size < 1 {
            return false;
        }
        self.fetch_page(PageRequest::new(1, size)).await.is_ok()
    }

    // ==================== WRITE ====================

    /// Создаёт запись и перезагружает текущую страницу.
    ///
    /// Локально ничего не вставляется: список приходит только из эндпоинта
    /// чтения. Возвращает созданную запись, если ответ совпал по форме.
    pub async fn create(&self, draft: R::Draft) -> StoreResult<Option<R::Item>> {
        self.clear_error();
        let draft = self.prepare(draft)?;
        let fallback = format!("Error creating {}", R::SINGULAR);

        let response = self
            .api
            .post_json(R::CREATE_PATH, &draft)
            .await
            .map_err(|err| self.fail(err, &fallback))?;

        let created = match response.json::<R::Item>() {
            Ok(item) => Some(item),
            Err(err) => {
                debug!(resource = R::NAME, error = %err, "create response has a different shape");
                None
            }
        };

        self.refresh().await;
        Ok(created)
    }

    /// Обновляет запись и подменяет её в списке на том же индексе
    pub async fn update(&self, key: &R::Key, draft: R::Draft) -> StoreResult<Option<R::Item>> {
        self.clear_error();
        let draft = self.prepare(draft)?;
        let fallback = format!("Error updating {}", R::SINGULAR);

        let response = self
            .api
            .put_json(&R::update_path(key), &draft)
            .await
            .map_err(|err| self.fail(err, &fallback))?;

        match response.json::<R::Item>() {
            Ok(item) => {
                let mut state = self.state.borrow_mut();
                if let Some(slot) = state.items.iter_mut().find(|existing| R::key(existing) == *key) {
                    *slot = item.clone();
                }
                Ok(Some(item))
            }
            Err(err) => {
                warn!(resource = R::NAME, key = %key, error = %err, "update response has a different shape, reloading");
                self.refresh().await;
                Ok(None)
            }
        }
    }

    /// Удаляет запись на сервере, затем первую запись с этим ключом локально
    pub async fn delete(&self, key: &R::Key) -> StoreResult<()> {
        self.clear_error();
        let fallback = format!("Error deleting {}", R::SINGULAR);

        let Some(path) = R::delete_path(key) else {
            let err = StoreError::Unsupported(format!("{} cannot be deleted", R::NAME));
            return Err(self.fail(err, &fallback));
        };

        self.api
            .delete(&path)
            .await
            .map_err(|err| self.fail(err, &fallback))?;

        let mut state = self.state.borrow_mut();
        if let Some(index) = state.items.iter().position(|item| R::key(item) == *key) {
            state.items.remove(index);
        }
        Ok(())
    }
}
