//! Contact page: the fixed introduction followed by the contact list.

use connect_router::{ContactStore, ContentFuture, NavigationEvent, Page, ProducerError};

use super::content::CONTACT;

pub struct ContactPage {
    contacts: ContactStore,
}

impl ContactPage {
    pub fn new(contacts: ContactStore) -> Self {
        Self { contacts }
    }
}

impl Page for ContactPage {
    fn render(&self) -> ContentFuture {
        let contacts = self.contacts.clone();
        Box::pin(async move {
            let mut markup = String::from(CONTACT);
            markup.push_str("<section>\n<h2>Our coordinators</h2>\n<ul>\n");
            for contact in contacts.list()? {
                markup.push_str(&format!(
                    "<li>{}  {}  {}</li>\n",
                    contact.full_name, contact.contact_number, contact.email_address
                ));
            }
            markup.push_str("</ul>\n<p>Press 'c' to add yourself as a coordinator.</p>\n</section>\n");
            Ok::<_, ProducerError>(markup)
        })
    }

    fn init(&self, _event: &NavigationEvent) {
        tracing::debug!(contacts = self.contacts.len().unwrap_or_default(), "contact page ready");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::SEED_CONTACTS;
    use connect_router::ContactDetails;

    #[tokio::test]
    async fn test_contact_list_follows_store() {
        let contacts = ContactStore::with_contacts(serde_json::from_str(SEED_CONTACTS).unwrap());
        let page = ContactPage::new(contacts.clone());
        contacts
            .create(ContactDetails::new("Gwen Guest", "905-555-0199", "gwen@volunteer-connect.example"))
            .unwrap();

        let markup = page.render().await.unwrap();

        assert!(markup.starts_with(CONTACT));
        assert!(markup.contains("<li>Dana Coordinator  905-555-0134  dana@volunteer-connect.example</li>"));
        assert!(markup.contains("Gwen Guest"));
    }
}
