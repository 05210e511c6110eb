// src/stores/boxes.rs
use std::cmp::Ordering;

use crate::models::{BoxAccounting, BoxDraft};
use crate::pagination::Page;
use crate::stores::resource::{Resource, ResourceStore};

pub struct Boxes;

pub type BoxStore = ResourceStore<Boxes>;

impl Resource for Boxes {
    type Item = BoxAccounting;
    type Key = i64;
    type Draft = BoxDraft;
    type Listing = Page<BoxAccounting>;

    const NAME: &'static str = "boxes";
    const SINGULAR: &'static str = "box";
    const READ_PATH: &'static str = "box-accounting/read/";
    const CREATE_PATH: &'static str = "box-accounting/create/";
    const REQUIRED_MESSAGE: &'static str = "Box name cannot be empty";
    const PAGINATED: bool = true;

    fn key(item: &BoxAccounting) -> i64 {
        item.serial_num
    }

    fn update_path(key: &i64) -> String {
        format!("box-accounting/update/{}", key)
    }

    // Бэкенд не умеет удалять шкафы
    fn delete_path(_key: &i64) -> Option<String> {
        None
    }

    fn compare(a: &BoxAccounting, b: &BoxAccounting) -> Ordering {
        a.serial_num.cmp(&b.serial_num)
    }

    fn search_fields(item: &BoxAccounting) -> Vec<&str> {
        vec![item.name.as_str(), item.order_id.as_str()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StoreError;
    use crate::http::{ApiClient, Method};
    use crate::test_utils::FakeTransport;
    use serde_json::json;
    use std::rc::Rc;
    use uuid::Uuid;

    fn box_json(serial: i64, name: &str) -> serde_json::Value {
        let who = json!({"uuid": Uuid::nil(), "name": "Иван", "surname": "Петров"});
        json!({
            "serial_num": serial, "name": name, "order_id": "001-01-2024",
            "scheme_developer": who, "assembler": who, "programmer": null, "tester": who
        })
    }

    fn draft(name: &str) -> BoxDraft {
        BoxDraft {
            name: name.to_string(),
            order_id: "001-01-2024".to_string(),
            scheme_developer_id: Uuid::nil(),
            assembler_id: Uuid::nil(),
            programmer_id: None,
            tester_id: Uuid::nil(),
        }
    }

    fn store(transport: &Rc<FakeTransport>) -> BoxStore {
        ResourceStore::new(ApiClient::new(transport.clone(), "http://api.test/"))
    }

    #[actix_rt::test]
    async fn test_create_refetches_current_page() {
        let transport = Rc::new(FakeTransport::new());
        transport.push_json(200, json!({"items": [box_json(7, "ШУ-7")], "total": 3, "page": 2, "size": 2, "pages": 2}));
        transport.push_json(201, box_json(8, "ШУ-8"));
        transport.push_json(200, json!({"items": [box_json(7, "ШУ-7"), box_json(8, "ШУ-8")], "total": 4, "page": 2, "size": 2, "pages": 2}));
        let store = store(&transport);
        store.change_page_size(2).await;
        assert_eq!(store.pagination().unwrap().page, 2);

        store.create(draft("ШУ-8")).await.unwrap();
        let last = transport.last_request().unwrap();
        assert_eq!(last.method, Method::Get);
        assert_eq!(last.query_value("page"), Some("2"));
        assert_eq!(last.query_value("size"), Some("2"));
        assert_eq!(store.len(), 2);
        assert_eq!(store.pagination().unwrap().total, 4);
    }

    #[actix_rt::test]
    async fn test_blank_name_rejected() {
        let transport = Rc::new(FakeTransport::new());
        let store = store(&transport);

        assert!(store.create(draft("  ")).await.is_err());
        assert!(store.update(&7, draft("")).await.is_err());
        assert_eq!(store.error(), Some("Box name cannot be empty".to_string()));
        assert_eq!(transport.request_count(), 0);
    }

    #[actix_rt::test]
    async fn test_update_path_and_patch() {
        let transport = Rc::new(FakeTransport::new());
        transport.push_json(200, json!({"items": [box_json(7, "ШУ-7"), box_json(9, "ШУ-9")], "total": 2, "page": 1, "size": 20, "pages": 1}));
        transport.push_json(200, box_json(9, "ШУ-9 (доработка)"));
        let store = store(&transport);
        store.fetch().await.unwrap();

        store.update(&9, draft("ШУ-9 (доработка)")).await.unwrap();
        let last = transport.last_request().unwrap();
        assert_eq!(last.method, Method::Put);
        assert_eq!(last.url, "http://api.test/box-accounting/update/9");
        assert_eq!(store.items()[1].name, "ШУ-9 (доработка)");
        assert_eq!(store.sorted()[0].serial_num, 7);
    }

    #[actix_rt::test]
    async fn test_delete_is_unsupported() {
        let transport = Rc::new(FakeTransport::new());
        let store = store(&transport);

        let err = store.delete(&7).await.unwrap_err();
        assert!(matches!(err, StoreError::Unsupported(_)));
        assert_eq!(store.error(), Some("boxes cannot be deleted".to_string()));
        assert_eq!(transport.request_count(), 0);
    }
}
