// src/stores/people.rs
use std::cmp::Ordering;
use uuid::Uuid;

use crate::models::{Person, PersonDraft};
use crate::stores::resource::{Resource, ResourceStore};

pub struct People;

pub type PeopleStore = ResourceStore<People>;

impl Resource for People {
    type Item = Person;
    type Key = Uuid;
    type Draft = PersonDraft;
    type Listing = Vec<Person>;

    const NAME: &'static str = "people";
    const SINGULAR: &'static str = "person";
    const READ_PATH: &'static str = "get_all/people/";
    const CREATE_PATH: &'static str = "people/create/";
    const REQUIRED_MESSAGE: &'static str = "All fields are required (name, surname, patronymic)";

    fn key(item: &Person) -> Uuid {
        item.uuid
    }

    fn update_path(key: &Uuid) -> String {
        format!("people/update/{}", key)
    }

    fn delete_path(key: &Uuid) -> Option<String> {
        Some(format!("people/delete/{}", key))
    }

    /// Фамилия, затем имя
    fn compare(a: &Person, b: &Person) -> Ordering {
        a.surname.cmp(&b.surname).then_with(|| a.name.cmp(&b.name))
    }

    fn search_fields(item: &Person) -> Vec<&str> {
        vec![item.surname.as_str(), item.name.as_str(), item.patronymic.as_str()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn person(surname: &str, name: &str) -> Person {
        Person {
            uuid: Uuid::new_v4(),
            name: name.to_string(),
            surname: surname.to_string(),
            patronymic: "Петрович".to_string(),
        }
    }

    #[test]
    fn test_compare_by_surname_then_name() {
        let mut people = vec![
            person("Сидоров", "Олег"),
            person("Петров", "Пётр"),
            person("Петров", "Иван"),
        ];
        people.sort_by(People::compare);
        let names: Vec<String> = people.iter().map(|p| p.formatted_name()).collect();
        assert_eq!(names, vec!["Петров И.П.", "Петров П.П.", "Сидоров О.П."]);
    }

    #[test]
    fn test_search_fields_include_patronymic() {
        let p = person("Петров", "Иван");
        assert_eq!(People::search_fields(&p), vec!["Петров", "Иван", "Петрович"]);
    }
}
