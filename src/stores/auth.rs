// src/stores/auth.rs
//! Сессия пользователя. Токен живёт в cookie транспорта, здесь только флаг
//! аутентификации и текущий пользователь.

use serde_json::json;
use std::cell::RefCell;
use tracing::{error, info, warn};

use crate::error::{StoreError, StoreResult};
use crate::http::ApiClient;
use crate::models::User;
use crate::validator::FieldValidator;

const LOGIN_PATH: &str = "jwt/login/";
const LOGOUT_PATH: &str = "jwt/logout/";
const ME_PATH: &str = "jwt/users/me/";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AuthState {
    pub is_authenticated: bool,
    pub user: Option<User>,
}

#[derive(Debug)]
pub struct AuthStore {
    api: ApiClient,
    state: RefCell<AuthState>,
}

impl AuthStore {
    pub fn new(api: ApiClient) -> Self {
        Self {
            api,
            state: RefCell::new(AuthState::default()),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.state.borrow().is_authenticated
    }

    pub fn user(&self) -> Option<User> {
        self.state.borrow().user.clone()
    }

    /// Пустая строка, если никто не вошёл
    pub fn username(&self) -> String {
        self.state
            .borrow()
            .user
            .as_ref()
            .map(|u| u.username.clone())
            .unwrap_or_default()
    }

    pub fn snapshot(&self) -> AuthState {
        self.state.borrow().clone()
    }

    /// `false` также забывает пользователя
    pub fn set_auth_state(&self, is_authenticated: bool) {
        if is_authenticated {
            self.state.borrow_mut().is_authenticated = true;
        } else {
            self.reset();
        }
    }

    fn reset(&self) {
        *self.state.borrow_mut() = AuthState::default();
    }

    /// Вход: форма username/password, затем запрос текущего пользователя.
    /// Состояние меняется только если прошли оба запроса.
    pub async fn login(&self, username: &str, password: &str) -> StoreResult<User> {
        FieldValidator::not_empty(username, "Username").map_err(StoreError::Validation)?;
        FieldValidator::not_empty(password, "Password").map_err(StoreError::Validation)?;

        let form = vec![
            ("username".to_string(), username.trim().to_string()),
            ("password".to_string(), password.to_string()),
        ];
        self.api.post_form(LOGIN_PATH, form).await.map_err(|err| {
            error!(username, error = %err, "Login error");
            err
        })?;

        let user = self.api.get::<User>(ME_PATH, Vec::new()).await.map_err(|err| {
            error!(username, error = %err, "Login succeeded but user info is unavailable");
            err
        })?;

        *self.state.borrow_mut() = AuthState {
            is_authenticated: true,
            user: Some(user.clone()),
        };
        info!(username = %user.username, "logged in");
        Ok(user)
    }

    /// Локальная сессия сбрасывается при любом исходе запроса
    pub async fn logout(&self) -> StoreResult<()> {
        let result = self.api.post_json(LOGOUT_PATH, &json!({})).await;
        self.reset();
        match result {
            Ok(_) => {
                info!("logged out");
                Ok(())
            }
            Err(err) => {
                error!(error = %err, "Logout error");
                Err(err)
            }
        }
    }

    pub async fn fetch_user_info(&self) -> StoreResult<User> {
        match self.api.get::<User>(ME_PATH, Vec::new()).await {
            Ok(user) => {
                self.state.borrow_mut().user = Some(user.clone());
                Ok(user)
            }
            Err(err) => {
                error!(error = %err, "Failed to fetch user info");
                Err(err)
            }
        }
    }

    /// Проверка живости сессии; ошибка не пробрасывается
    pub async fn check_auth(&self) -> bool {
        match self.fetch_user_info().await {
            Ok(_) => {
                self.set_auth_state(true);
                true
            }
            Err(err) => {
                warn!(error = %err, "session check failed");
                self.reset();
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::{Method, RequestBody};
    use crate::test_utils::FakeTransport;
    use std::rc::Rc;

    fn store(transport: &Rc<FakeTransport>) -> AuthStore {
        AuthStore::new(ApiClient::new(transport.clone(), "http://api.test/"))
    }

    #[actix_rt::test]
    async fn test_login_posts_form_then_fetches_me() {
        let transport = Rc::new(FakeTransport::new());
        transport.push_json(200, json!({"message": "ok"}));
        transport.push_json(200, json!({"username": "admin", "email": "admin@kis.local"}));
        let auth = store(&transport);

        let user = auth.login(" admin ", "secret").await.unwrap();
        assert_eq!(user.username, "admin");
        assert!(auth.is_authenticated());
        assert_eq!(auth.username(), "admin");

        let requests = transport.requests();
        assert_eq!(requests[0].method, Method::Post);
        assert_eq!(requests[0].url, "http://api.test/jwt/login/");
        assert_eq!(
            requests[0].body,
            RequestBody::Form(vec![
                ("username".to_string(), "admin".to_string()),
                ("password".to_string(), "secret".to_string()),
            ])
        );
        assert_eq!(requests[1].url, "http://api.test/jwt/users/me/");
    }

    #[actix_rt::test]
    async fn test_login_rejected_keeps_state() {
        let transport = Rc::new(FakeTransport::new());
        transport.push_json(401, json!({"detail": "Incorrect username or password"}));
        let auth = store(&transport);

        let err = auth.login("admin", "wrong").await.unwrap_err();
        assert_eq!(err.user_message(""), "Incorrect username or password");
        assert!(!auth.is_authenticated());
        assert_eq!(auth.user(), None);
        assert_eq!(transport.request_count(), 1);
    }

    #[actix_rt::test]
    async fn test_login_requires_both_fields() {
        let transport = Rc::new(FakeTransport::new());
        let auth = store(&transport);

        assert!(matches!(auth.login("", "secret").await, Err(StoreError::Validation(_))));
        assert!(matches!(auth.login("admin", "  ").await, Err(StoreError::Validation(_))));
        assert_eq!(transport.request_count(), 0);
    }

    #[actix_rt::test]
    async fn test_login_without_me_is_not_authenticated() {
        let transport = Rc::new(FakeTransport::new());
        transport.push_status(200);
        transport.push_network_error("Network Error");
        let auth = store(&transport);

        assert!(auth.login("admin", "secret").await.is_err());
        assert!(!auth.is_authenticated());
    }

    #[actix_rt::test]
    async fn test_logout_clears_state_even_on_failure() {
        let transport = Rc::new(FakeTransport::new());
        transport.push_status(200);
        transport.push_json(200, json!({"username": "admin"}));
        transport.push_status(500);
        let auth = store(&transport);
        auth.login("admin", "secret").await.unwrap();

        assert!(auth.logout().await.is_err());
        assert_eq!(auth.snapshot(), AuthState::default());
        assert_eq!(auth.username(), "");
        let last = transport.last_request().unwrap();
        assert_eq!(last.url, "http://api.test/jwt/logout/");
        assert_eq!(last.body, RequestBody::Json(json!({})));
    }

    #[actix_rt::test]
    async fn test_check_auth() {
        let transport = Rc::new(FakeTransport::new());
        transport.push_json(200, json!({"username": "admin"}));
        transport.push_status(401);
        let auth = store(&transport);

        assert!(auth.check_auth().await);
        assert!(auth.is_authenticated());
        assert_eq!(auth.username(), "admin");

        assert!(!auth.check_auth().await);
        assert_eq!(auth.snapshot(), AuthState::default());
    }

    #[actix_rt::test]
    async fn test_set_auth_state_false_clears_user() {
        let transport = Rc::new(FakeTransport::new());
        transport.push_status(200);
        transport.push_json(200, json!({"username": "admin"}));
        let auth = store(&transport);
        auth.login("admin", "secret").await.unwrap();

        auth.set_auth_state(false);
        assert!(!auth.is_authenticated());
        assert_eq!(auth.user(), None);
        assert_eq!(auth.username(), "");

        auth.set_auth_state(true);
        assert!(auth.is_authenticated());
        assert_eq!(auth.user(), None);
    }

    #[actix_rt::test]
    async fn test_fetch_user_info_does_not_flip_flag() {
        let transport = Rc::new(FakeTransport::new());
        transport.push_json(200, json!({"username": "admin"}));
        let auth = store(&transport);

        auth.fetch_user_info().await.unwrap();
        assert_eq!(auth.username(), "admin");
        assert!(!auth.is_authenticated());
    }
}
