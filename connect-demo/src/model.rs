//! Header navigation and shell state.

use connect_router::NavLink;

/// Header links; the account section depends on whether someone is signed in.
pub fn nav_links(logged_in: bool) -> Vec<NavLink> {
    let mut links = vec![
        NavLink::new("Home", "#/home").in_list_item(),
        NavLink::new("About", "#/about").in_list_item(),
        NavLink::new("Events", "#/events").in_list_item(),
        NavLink::new("Opportunities", "#/opportunities").in_list_item(),
        NavLink::new("News", "#/news").in_list_item(),
        NavLink::new("Contact", "#/contact").in_list_item(),
    ];
    if logged_in {
        links.push(NavLink::new("Statistics", "#/statistics").in_list_item());
        links.push(NavLink::new("Event Planning", "#/event-planning").in_list_item());
    } else {
        links.push(NavLink::new("Statistics", "#/statistics").in_list_item());
        links.push(NavLink::new("Login", "#/login"));
        links.push(NavLink::new("Register", "#/register"));
    }
    links
}

/// Volunteer account used by the 'l' shortcut.
pub const DEMO_USERNAME: &str = "volunteer";
pub const DEMO_PASSWORD: &str = "helping-hands";

/// The known user directory, as served from `data/users.json`.
pub const USERS_JSON: &str = r#"{
  "users": [
    { "DisplayName": "Vera Volunteer", "EmailAddress": "vera@volunteer-connect.example", "Username": "volunteer", "Password": "helping-hands" },
    { "DisplayName": "Ollie Organizer", "EmailAddress": "ollie@volunteer-connect.example", "Username": "organizer", "Password": "plan-ahead" }
  ]
}"#;

/// Events shown before anyone has planned one.
pub const SEED_EVENTS: &str = r#"[
  { "id": "seed-riverside", "name": "Riverside Clean-up", "date": "2026-11-02", "time": "09:00:00",
    "location": "Riverside Park", "description": "Gloves, bags and coffee provided. All ages welcome.", "organizer": "Ollie Organizer" },
  { "id": "seed-coats", "name": "Winter Coat Drive", "date": "2026-11-15", "time": "10:00:00",
    "location": "Community Centre", "description": "Sort and fold donated coats for the shelter network.", "organizer": "Ollie Organizer" },
  { "id": "seed-meal", "name": "Holiday Meal Service", "date": "2026-12-20", "time": "16:30:00",
    "location": "St. Mark's Hall", "description": "Help plate and serve a warm meal for two hundred guests.", "organizer": "Vera Volunteer" }
]"#;

/// The contact list before any changes.
pub const SEED_CONTACTS: &str = r#"[
  { "id": "seed-dana", "fullName": "Dana Coordinator", "contactNumber": "905-555-0134", "emailAddress": "dana@volunteer-connect.example" },
  { "id": "seed-sam", "fullName": "Sam Outreach", "contactNumber": "905-555-0178", "emailAddress": "sam@volunteer-connect.example" }
]"#;

/// What the shell shows besides the document.
#[derive(Clone, Default)]
pub struct ShellState {
    /// Index of the header link under the cursor.
    pub selected: usize,
    pub status: String,
    pub last_loaded: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seed_records_parse() {
        let events: Vec<connect_router::PlannedEvent> = serde_json::from_str(SEED_EVENTS).unwrap();
        assert_eq!(events.len(), 3);
        let contacts: Vec<connect_router::Contact> = serde_json::from_str(SEED_CONTACTS).unwrap();
        assert_eq!(contacts[0].full_name, "Dana Coordinator");
    }

    #[test]
    fn test_account_links_follow_login_state() {
        let out = nav_links(false);
        assert!(out.iter().any(|l| l.href == "#/login"));
        let signed_in = nav_links(true);
        assert!(signed_in.iter().all(|l| l.href != "#/login"));
        assert!(signed_in.iter().any(|l| l.href == "#/event-planning"));
    }
}
