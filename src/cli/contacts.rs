//! toolbelt contacts command implementation

use crate::contact::{Contact, ContactStore, ContactUpdate};
use crate::error::{Error, Result};
use crate::output::{emit_success, HumanOutput, OutputOptions};
use crate::storage::Storage;

/// Options for `toolbelt contacts add`
pub struct AddOptions {
    pub name: String,
    pub phone: String,
    pub email: String,
    pub address: String,
    pub storage: Storage,
    pub output: OutputOptions,
}

/// Options for `toolbelt contacts list`
pub struct ListOptions {
    pub storage: Storage,
    pub output: OutputOptions,
}

/// Options for `toolbelt contacts search`
pub struct SearchOptions {
    pub query: String,
    pub storage: Storage,
    pub output: OutputOptions,
}

/// Options for `toolbelt contacts update`
pub struct UpdateOptions {
    pub name: String,
    pub new_name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub storage: Storage,
    pub output: OutputOptions,
}

/// Options for `toolbelt contacts rm`
pub struct RmOptions {
    pub name: String,
    pub storage: Storage,
    pub output: OutputOptions,
}

#[derive(serde::Serialize)]
struct ContactReport {
    contact: Contact,
}

#[derive(serde::Serialize)]
struct ContactListReport {
    #[serde(skip_serializing_if = "Option::is_none")]
    query: Option<String>,
    total: usize,
    contacts: Vec<Contact>,
}

pub fn run_add(options: AddOptions) -> Result<()> {
    let contact = Contact::new(
        options.name,
        options.phone,
        options.email,
        options.address,
    )?;
    let contact = ContactStore::new(options.storage).add(contact)?;

    let mut human = HumanOutput::new("Contact added successfully!");
    human.push_summary("contact", contact.to_string());

    emit_success(
        options.output,
        "contacts add",
        &ContactReport { contact },
        Some(&human),
    )
}

pub fn run_list(options: ListOptions) -> Result<()> {
    let book = ContactStore::new(options.storage).load()?;
    let contacts = book.contacts().to_vec();

    let mut human = HumanOutput::new(format!("Contacts ({})", contacts.len()));
    for contact in &contacts {
        human.push_detail(contact.to_string());
    }
    if contacts.is_empty() {
        human.push_next_step("toolbelt contacts add <name> <phone> <email> <address>");
    }

    let report = ContactListReport {
        query: None,
        total: contacts.len(),
        contacts,
    };
    emit_success(options.output, "contacts list", &report, Some(&human))
}

pub fn run_search(options: SearchOptions) -> Result<()> {
    if options.query.trim().is_empty() {
        return Err(Error::InvalidArgument(
            "search query cannot be empty".to_string(),
        ));
    }

    let book = ContactStore::new(options.storage).load()?;
    let contacts = book.search(&options.query);

    let mut human = HumanOutput::new(format!(
        "Contacts matching '{}' ({})",
        options.query,
        contacts.len()
    ));
    for contact in &contacts {
        human.push_detail(contact.to_string());
    }
    if contacts.is_empty() {
        human.push_detail("No contacts found.");
    }

    let report = ContactListReport {
        query: Some(options.query),
        total: contacts.len(),
        contacts,
    };
    emit_success(options.output, "contacts search", &report, Some(&human))
}

pub fn run_update(options: UpdateOptions) -> Result<()> {
    let update = ContactUpdate {
        name: options.new_name,
        phone: options.phone,
        email: options.email,
        address: options.address,
    };

    let store = ContactStore::new(options.storage);
    let mut human = HumanOutput::new("Contact updated successfully!");
    if update.is_empty() {
        human.push_warning("no fields supplied; contact unchanged");
    }

    let contact = store.update(&options.name, &update)?;
    human.push_summary("contact", contact.to_string());

    emit_success(
        options.output,
        "contacts update",
        &ContactReport { contact },
        Some(&human),
    )
}

pub fn run_rm(options: RmOptions) -> Result<()> {
    let contact = ContactStore::new(options.storage).delete(&options.name)?;

    let mut human = HumanOutput::new("Contact deleted successfully!");
    human.push_summary("contact", contact.to_string());

    emit_success(
        options.output,
        "contacts rm",
        &ContactReport { contact },
        Some(&human),
    )
}
