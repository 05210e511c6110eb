// src/stores/theme.rs
//! Светлая/тёмная тема: значение в хранилище + класс `dark` на корне документа.

use serde::{Deserialize, Serialize};
use std::cell::{Cell, RefCell};
use std::collections::BTreeSet;
use std::rc::Rc;
use strum::{AsRefStr, Display, EnumString};
use tracing::{debug, warn};

use crate::storage::KeyValueStorage;

pub const THEME_KEY: &str = "theme";
const DARK_CLASS: &str = "dark";

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display, EnumString, AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

/// Куда отражается тема (корневой элемент документа)
pub trait ThemeTarget {
    fn set_class(&self, class: &str, enabled: bool);
}

/// Список классов в памяти
#[derive(Debug, Default)]
pub struct ClassList {
    classes: RefCell<BTreeSet<String>>,
}

impl ClassList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, class: &str) -> bool {
        self.classes.borrow().contains(class)
    }
}

impl ThemeTarget for ClassList {
    fn set_class(&self, class: &str, enabled: bool) {
        let mut classes = self.classes.borrow_mut();
        if enabled {
            classes.insert(class.to_string());
        } else {
            classes.remove(class);
        }
    }
}

pub struct ThemeStore {
    storage: Rc<dyn KeyValueStorage>,
    target: Rc<dyn ThemeTarget>,
    default: Theme,
    theme: Cell<Theme>,
}

impl std::fmt::Debug for ThemeStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ThemeStore")
            .field("theme", &self.theme.get())
            .field("default", &self.default)
            .finish_non_exhaustive()
    }
}

impl ThemeStore {
    pub fn new(storage: Rc<dyn KeyValueStorage>, target: Rc<dyn ThemeTarget>, default: Theme) -> Self {
        Self {
            storage,
            target,
            default,
            theme: Cell::new(default),
        }
    }

    /// Восстанавливает сохранённую тему; мусор в хранилище даёт тему по умолчанию
    pub fn init(&self) -> Theme {
        let theme = match self.storage.get_item(THEME_KEY) {
            Some(raw) => raw.parse::<Theme>().unwrap_or_else(|_| {
                warn!(value = %raw, "unknown persisted theme, using default");
                self.default
            }),
            None => self.default,
        };
        self.apply(theme);
        theme
    }

    pub fn theme(&self) -> Theme {
        self.theme.get()
    }

    pub fn is_dark(&self) -> bool {
        self.theme.get() == Theme::Dark
    }

    pub fn set_theme(&self, theme: Theme) {
        if let Err(err) = self.storage.set_item(THEME_KEY, theme.as_ref()) {
            warn!(error = %err, "failed to persist theme");
        }
        self.apply(theme);
        debug!(theme = %theme, "theme changed");
    }

    pub fn toggle(&self) -> Theme {
        let next = self.theme.get().toggled();
        self.set_theme(next);
        next
    }

    fn apply(&self, theme: Theme) {
        self.theme.set(theme);
        self.target.set_class(DARK_CLASS, theme == Theme::Dark);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;

    struct BrokenStorage;

    impl KeyValueStorage for BrokenStorage {
        fn get_item(&self, _key: &str) -> Option<String> {
            None
        }

        fn set_item(&self, _key: &str, _value: &str) -> anyhow::Result<()> {
            anyhow::bail!("quota exceeded")
        }

        fn remove_item(&self, _key: &str) -> anyhow::Result<()> {
            Ok(())
        }
    }

    fn setup(default: Theme) -> (Rc<MemoryStorage>, Rc<ClassList>, ThemeStore) {
        let storage = Rc::new(MemoryStorage::new());
        let classes = Rc::new(ClassList::new());
        let store = ThemeStore::new(storage.clone(), classes.clone(), default);
        (storage, classes, store)
    }

    #[test]
    fn test_theme_parse_and_display() {
        assert_eq!("dark".parse::<Theme>().unwrap(), Theme::Dark);
        assert_eq!("Light".parse::<Theme>().unwrap(), Theme::Light);
        assert!("sepia".parse::<Theme>().is_err());
        assert_eq!(Theme::Dark.to_string(), "dark");
        assert_eq!(serde_json::to_string(&Theme::Light).unwrap(), "\"light\"");
    }

    #[test]
    fn test_toggle_is_involution() {
        for theme in [Theme::Light, Theme::Dark] {
            assert_eq!(theme.toggled().toggled(), theme);
            assert_ne!(theme.toggled(), theme);
        }
    }

    #[test]
    fn test_toggle_persists_and_updates_class() {
        let (storage, classes, store) = setup(Theme::Light);
        store.init();
        assert!(!classes.contains("dark"));

        assert_eq!(store.toggle(), Theme::Dark);
        assert_eq!(storage.get_item(THEME_KEY), Some("dark".to_string()));
        assert!(classes.contains("dark"));
        assert!(store.is_dark());

        assert_eq!(store.toggle(), Theme::Light);
        assert_eq!(storage.get_item(THEME_KEY), Some("light".to_string()));
        assert!(!classes.contains("dark"));
    }

    #[test]
    fn test_init_restores_persisted_theme() {
        let (storage, classes, store) = setup(Theme::Light);
        storage.set_item(THEME_KEY, "dark").unwrap();

        assert_eq!(store.init(), Theme::Dark);
        assert!(classes.contains("dark"));
    }

    #[test]
    fn test_init_falls_back_to_default() {
        let (storage, classes, store) = setup(Theme::Dark);
        assert_eq!(store.init(), Theme::Dark);
        assert!(classes.contains("dark"));

        let (storage_light, _, light) = setup(Theme::Light);
        storage_light.set_item(THEME_KEY, "purple").unwrap();
        assert_eq!(light.init(), Theme::Light);

        // init ничего не пишет в хранилище
        assert_eq!(storage.get_item(THEME_KEY), None);
    }

    #[test]
    fn test_storage_failure_still_switches_theme() {
        let classes = Rc::new(ClassList::new());
        let store = ThemeStore::new(Rc::new(BrokenStorage), classes.clone(), Theme::Light);

        store.set_theme(Theme::Dark);
        assert_eq!(store.theme(), Theme::Dark);
        assert!(classes.contains("dark"));
    }
}
