// src/stores/mod.rs

pub mod auth;
pub mod boxes;
pub mod counterparty;
pub mod orders;
pub mod people;
pub mod resource;
pub mod theme;
pub mod tracker;

pub use auth::{AuthState, AuthStore};
pub use boxes::{BoxStore, Boxes};
pub use counterparty::{Counterparties, CounterpartyStore};
pub use orders::{OrderDetailStore, OrderStore};
pub use people::{People, PeopleStore};
pub use resource::{Resource, ResourceState, ResourceStore};
pub use theme::{ClassList, Theme, ThemeStore, ThemeTarget};

use std::rc::Rc;

use crate::http::ApiClient;
use crate::storage::KeyValueStorage;

/// Все хранилища приложения; создаётся один раз в корне и передаётся по ссылке
#[derive(Debug)]
pub struct Stores {
    pub people: PeopleStore,
    pub counterparties: CounterpartyStore,
    pub boxes: BoxStore,
    pub orders: OrderStore,
    pub order_detail: OrderDetailStore,
    pub auth: AuthStore,
    pub theme: ThemeStore,
}

impl Stores {
    pub fn new(
        client: ApiClient,
        storage: Rc<dyn KeyValueStorage>,
        target: Rc<dyn ThemeTarget>,
        default_theme: Theme,
    ) -> Self {
        Self {
            people: PeopleStore::new(client.clone()),
            counterparties: CounterpartyStore::new(client.clone()),
            boxes: BoxStore::new(client.clone()),
            orders: OrderStore::new(client.clone()),
            order_detail: OrderDetailStore::new(client.clone()),
            auth: AuthStore::new(client),
            theme: ThemeStore::new(storage, target, default_theme),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;
    use crate::test_utils::FakeTransport;
    use serde_json::json;

    fn stores(transport: &Rc<FakeTransport>) -> Stores {
        Stores::new(
            ApiClient::new(transport.clone(), "http://api.test/"),
            Rc::new(MemoryStorage::new()),
            Rc::new(ClassList::new()),
            Theme::Light,
        )
    }

    #[actix_rt::test]
    async fn test_stores_share_one_client() {
        let transport = Rc::new(FakeTransport::new());
        transport.push_json(200, json!([]));
        transport.push_json(200, json!({"items": [], "total": 0, "page": 1, "size": 20, "pages": 1}));
        let app = stores(&transport);

        app.people.fetch().await.unwrap();
        app.boxes.fetch().await.unwrap();
        assert_eq!(transport.request_count(), 2);
        assert_eq!(app.theme.init(), Theme::Light);
    }

    #[actix_rt::test]
    async fn test_fresh_instances_are_independent() {
        let transport = Rc::new(FakeTransport::new());
        transport.push_status(500);
        let first = stores(&transport);
        let second = stores(&transport);

        assert!(first.counterparties.fetch().await.is_err());
        assert!(first.counterparties.error().is_some());
        assert!(second.counterparties.error().is_none());
    }
}
