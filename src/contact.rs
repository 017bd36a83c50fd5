//! Contact book.
//!
//! Contacts are keyed by name only informally: duplicates are allowed, and
//! update/delete act on the first exact name match.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::storage::Storage;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    pub name: String,
    pub phone: String,
    pub email: String,
    pub address: String,
}

impl Contact {
    /// Build a contact; every field is required.
    pub fn new(
        name: impl Into<String>,
        phone: impl Into<String>,
        email: impl Into<String>,
        address: impl Into<String>,
    ) -> Result<Self> {
        let contact = Self {
            name: name.into(),
            phone: phone.into(),
            email: email.into(),
            address: address.into(),
        };
        for (field, value) in [
            ("name", &contact.name),
            ("phone", &contact.phone),
            ("email", &contact.email),
            ("address", &contact.address),
        ] {
            if value.trim().is_empty() {
                return Err(Error::InvalidArgument(format!("{field} is required")));
            }
        }
        Ok(contact)
    }

    /// Case-insensitive substring on name, or plain substring on phone.
    pub fn matches(&self, query: &str) -> bool {
        self.name.to_lowercase().contains(&query.to_lowercase()) || self.phone.contains(query)
    }
}

impl fmt::Display for Contact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} | {} | {} | {}",
            self.name, self.phone, self.email, self.address
        )
    }
}

/// Field-by-field replacement; `None` or blank keeps the current value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactUpdate {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
}

impl ContactUpdate {
    pub fn is_empty(&self) -> bool {
        [&self.name, &self.phone, &self.email, &self.address]
            .iter()
            .all(|field| provided(field).is_none())
    }

    fn apply(&self, contact: &mut Contact) {
        if let Some(name) = provided(&self.name) {
            contact.name = name.to_string();
        }
        if let Some(phone) = provided(&self.phone) {
            contact.phone = phone.to_string();
        }
        if let Some(email) = provided(&self.email) {
            contact.email = email.to_string();
        }
        if let Some(address) = provided(&self.address) {
            contact.address = address.to_string();
        }
    }
}

fn provided(field: &Option<String>) -> Option<&str> {
    field.as_deref().filter(|value| !value.trim().is_empty())
}

/// In-memory contact list; serialized as a JSON array.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContactBook {
    contacts: Vec<Contact>,
}

impl ContactBook {
    pub fn contacts(&self) -> &[Contact] {
        &self.contacts
    }

    pub fn len(&self) -> usize {
        self.contacts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contacts.is_empty()
    }

    pub fn add(&mut self, contact: Contact) {
        self.contacts.push(contact);
    }

    pub fn search(&self, query: &str) -> Vec<Contact> {
        self.contacts
            .iter()
            .filter(|contact| contact.matches(query))
            .cloned()
            .collect()
    }

    /// Update the first contact named exactly `name`.
    pub fn update(&mut self, name: &str, update: &ContactUpdate) -> Result<Contact> {
        let contact = self
            .contacts
            .iter_mut()
            .find(|contact| contact.name == name)
            .ok_or_else(|| Error::ContactNotFound(name.to_string()))?;
        update.apply(contact);
        Ok(contact.clone())
    }

    /// Remove the first contact named exactly `name`.
    pub fn delete(&mut self, name: &str) -> Result<Contact> {
        let idx = self
            .contacts
            .iter()
            .position(|contact| contact.name == name)
            .ok_or_else(|| Error::ContactNotFound(name.to_string()))?;
        Ok(self.contacts.remove(idx))
    }
}

/// Contact book persisted in `contacts.json`.
#[derive(Debug, Clone)]
pub struct ContactStore {
    storage: Storage,
}

impl ContactStore {
    pub fn new(storage: Storage) -> Self {
        Self { storage }
    }

    pub fn load(&self) -> Result<ContactBook> {
        self.storage
            .read_json_or_default(&self.storage.contacts_file())
    }

    pub fn add(&self, contact: Contact) -> Result<Contact> {
        self.storage
            .update_json(&self.storage.contacts_file(), |book: &mut ContactBook| {
                book.add(contact.clone());
                tracing::debug!(name = %contact.name, "contact added");
                Ok(contact)
            })
    }

    pub fn update(&self, name: &str, update: &ContactUpdate) -> Result<Contact> {
        self.storage
            .update_json(&self.storage.contacts_file(), |book: &mut ContactBook| {
                book.update(name, update)
            })
    }

    pub fn delete(&self, name: &str) -> Result<Contact> {
        self.storage
            .update_json(&self.storage.contacts_file(), |book: &mut ContactBook| {
                book.delete(name)
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_book() -> ContactBook {
        let mut book = ContactBook::default();
        book.add(Contact::new("Alice Smith", "555-0100", "alice@example.com", "1 Main St").unwrap());
        book.add(Contact::new("Bob Jones", "555-0199", "bob@example.com", "2 Oak Ave").unwrap());
        book.add(Contact::new("alice cooper", "777-1234", "ac@example.com", "3 Elm Rd").unwrap());
        book
    }

    #[test]
    fn new_requires_every_field() {
        let err = Contact::new("Alice", "", "a@example.com", "1 Main St").expect_err("phone");
        assert!(matches!(err, Error::InvalidArgument(msg) if msg.contains("phone")));
    }

    #[test]
    fn display_is_pipe_separated() {
        let contact = Contact::new("Alice", "555", "a@example.com", "1 Main St").unwrap();
        assert_eq!(contact.to_string(), "Alice | 555 | a@example.com | 1 Main St");
    }

    #[test]
    fn search_is_case_insensitive_on_name() {
        let book = sample_book();
        let results = book.search("ALICE");
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].name, "Alice Smith");
        assert_eq!(results[1].name, "alice cooper");
    }

    #[test]
    fn search_matches_partial_phone() {
        let book = sample_book();
        let results = book.search("0199");
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].name, "Bob Jones");

        let results = book.search("555");
        assert_eq!(results.len(), 2);
    }

    #[test]
    fn search_empty_book_is_empty() {
        let book = ContactBook::default();
        assert!(book.search("anyone").is_empty());
    }

    #[test]
    fn update_changes_only_supplied_fields() {
        let mut book = sample_book();
        let updated = book
            .update(
                "Bob Jones",
                &ContactUpdate {
                    phone: Some("555-0000".to_string()),
                    email: Some("   ".to_string()),
                    ..ContactUpdate::default()
                },
            )
            .expect("update");
        assert_eq!(updated.phone, "555-0000");
        assert_eq!(updated.email, "bob@example.com");
        assert_eq!(book.contacts()[1], updated);
        assert_eq!(book.contacts()[0].phone, "555-0100");
    }

    #[test]
    fn update_missing_contact_leaves_book_unchanged() {
        let mut book = sample_book();
        let before = book.clone();
        let err = book
            .update("bob jones", &ContactUpdate::default())
            .expect_err("exact match only");
        assert!(matches!(err, Error::ContactNotFound(name) if name == "bob jones"));
        assert_eq!(book, before);
    }

    #[test]
    fn delete_removes_first_match() {
        let mut book = sample_book();
        book.add(Contact::new("Bob Jones", "999", "b2@example.com", "elsewhere").unwrap());

        let removed = book.delete("Bob Jones").expect("delete");
        assert_eq!(removed.phone, "555-0199");
        assert_eq!(book.len(), 3);
        assert_eq!(book.contacts()[2].phone, "999");

        assert!(book.delete("Nobody").is_err());
        assert_eq!(book.len(), 3);
    }

    #[test]
    fn update_is_empty_ignores_blank_fields() {
        let update = ContactUpdate {
            name: Some(String::new()),
            ..ContactUpdate::default()
        };
        assert!(update.is_empty());
    }

    #[test]
    fn store_persists_as_json_array() {
        let dir = tempfile::tempdir().expect("tempdir");
        let storage = Storage::new(dir.path());
        let store = ContactStore::new(storage.clone());

        store
            .add(Contact::new("Alice", "555", "a@example.com", "1 Main St").unwrap())
            .expect("add");
        let raw = std::fs::read_to_string(storage.contacts_file()).expect("read");
        let value: serde_json::Value = serde_json::from_str(&raw).expect("json");
        assert_eq!(value[0]["name"], "Alice");

        store.delete("Alice").expect("delete");
        assert!(store.load().expect("load").is_empty());
    }
}
