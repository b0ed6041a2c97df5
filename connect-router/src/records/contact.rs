//! The organization's contact list.

use serde::{Deserialize, Serialize};
use std::path::Path;

use super::{new_id, Record, Records};
use crate::validate::Checks;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    pub id: String,
    pub full_name: String,
    pub contact_number: String,
    pub email_address: String,
}

impl Record for Contact {
    const KIND: &'static str = "contact";

    fn id(&self) -> &str {
        &self.id
    }
}

/// Everything about a contact except its id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactDetails {
    pub full_name: String,
    pub contact_number: String,
    pub email_address: String,
}

impl ContactDetails {
    pub fn new(
        full_name: impl Into<String>,
        contact_number: impl Into<String>,
        email_address: impl Into<String>,
    ) -> Self {
        Self {
            full_name: full_name.into(),
            contact_number: contact_number.into(),
            email_address: email_address.into(),
        }
    }

    fn check(&self) -> crate::Result<()> {
        let mut checks = Checks::new();
        checks.required("fullName", &self.full_name, "Full name is required");
        checks.required("contactNumber", &self.contact_number, "Contact number is required");
        checks.email("emailAddress", &self.email_address);
        checks.finish()
    }
}

#[derive(Clone)]
pub struct ContactStore {
    records: Records<Contact>,
}

impl Default for ContactStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ContactStore {
    pub fn new() -> Self {
        Self::with_contacts(Vec::new())
    }

    pub fn with_contacts(contacts: Vec<Contact>) -> Self {
        Self { records: Records::from_items(contacts) }
    }

    /// Load contacts from a JSON array file. A missing file yields an empty store.
    pub fn load(path: impl AsRef<Path>) -> crate::Result<Self> {
        Ok(Self { records: Records::load(path.as_ref())? })
    }

    pub fn save(&self, path: impl AsRef<Path>) -> crate::Result<()> {
        self.records.save(path.as_ref())
    }

    pub fn list(&self) -> crate::Result<Vec<Contact>> {
        self.records.all()
    }

    pub fn get(&self, id: &str) -> crate::Result<Contact> {
        self.records.get(id)
    }

    pub fn create(&self, details: ContactDetails) -> crate::Result<Contact> {
        details.check()?;
        self.records.insert(Contact {
            id: new_id(),
            full_name: details.full_name,
            contact_number: details.contact_number,
            email_address: details.email_address,
        })
    }

    /// Replace a contact's details, keeping its id.
    pub fn update(&self, id: &str, details: ContactDetails) -> crate::Result<Contact> {
        details.check()?;
        self.records.modify(id, |contact| {
            contact.full_name = details.full_name;
            contact.contact_number = details.contact_number;
            contact.email_address = details.email_address;
        })
    }

    pub fn delete(&self, id: &str) -> crate::Result<()> {
        self.records.remove(id).map(|_| ())
    }

    pub fn len(&self) -> crate::Result<usize> {
        self.records.len()
    }

    pub fn is_empty(&self) -> crate::Result<bool> {
        self.len().map(|len| len == 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    fn details() -> ContactDetails {
        ContactDetails::new("Dana Coordinator", "905-555-0134", "dana@volunteer-connect.example")
    }

    #[test]
    fn test_contact_lifecycle() {
        let contacts = ContactStore::new();
        let created = contacts.create(details()).unwrap();
        assert_eq!(contacts.get(&created.id).unwrap().full_name, "Dana Coordinator");

        let renamed = ContactDetails { full_name: "Dana Lead".to_string(), ..details() };
        let updated = contacts.update(&created.id, renamed).unwrap();
        assert_eq!(updated.id, created.id);
        assert_eq!(contacts.list().unwrap(), vec![updated]);

        contacts.delete(&created.id).unwrap();
        assert!(contacts.is_empty().unwrap());
    }

    #[test]
    fn test_invalid_details_are_rejected() {
        let contacts = ContactStore::new();
        let bad = ContactDetails { email_address: "dana at example".to_string(), ..details() };
        let err = contacts.create(bad.clone()).unwrap_err();
        assert!(matches!(err, Error::InvalidForm { errors } if errors[0].field == "emailAddress"));

        let created = contacts.create(details()).unwrap();
        assert!(contacts.update(&created.id, bad).is_err());
        assert_eq!(contacts.get(&created.id).unwrap().email_address, "dana@volunteer-connect.example");
    }

    #[test]
    fn test_json_field_names() {
        let contact: Contact = serde_json::from_str(
            r#"{"id": "c1", "fullName": "Dana", "contactNumber": "555", "emailAddress": "d@example.org"}"#,
        )
        .unwrap();
        assert_eq!(contact.contact_number, "555");
        assert!(serde_json::to_string(&contact).unwrap().contains("\"emailAddress\""));
    }
}
