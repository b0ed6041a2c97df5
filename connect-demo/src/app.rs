use chrono::{Days, Local, NaiveDate};
use connect_router::{
    AuthService, ContactDetails, ContactStore, ContentSink, Document, DocumentState, Entity, EventDraft, EventStore,
    EventUpdate, Location, NavigationEvent, Navigator, RegistrationForm, Router, RouterState,
};
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crate::model::{nav_links, ShellState, DEMO_PASSWORD, DEMO_USERNAME};

/// Terminal stand-in for the browser window: header, content area and status line.
pub struct Shell {
    router: Arc<Router>,
    location: Location,
    document: Document,
    auth: Arc<AuthService>,
    events: EventStore,
    contacts: ContactStore,
    state: Entity<ShellState>,
    guests: AtomicUsize,
}

impl Shell {
    pub fn new(
        router: Arc<Router>,
        location: Location,
        document: Document,
        auth: Arc<AuthService>,
        events: EventStore,
        contacts: ContactStore,
    ) -> Self {
        let state = Entity::new(ShellState {
            status: "Ready".to_string(),
            ..ShellState::default()
        });
        let loaded = state.clone();
        router.subscribe(move |event: &NavigationEvent| {
            let _ = loaded.update(|s| s.last_loaded = Some(event.path.clone()));
        });
        Self { router, location, document, auth, events, contacts, state, guests: AtomicUsize::new(1) }
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn shell_state(&self) -> &Entity<ShellState> {
        &self.state
    }

    /// Reload the header after a login or logout.
    pub fn reload_header(&self) {
        let links = nav_links(self.auth.is_logged_in());
        if let Err(e) = self.document.set_links(links) {
            tracing::warn!(error = %e, "failed to reload header");
            return;
        }
        self.document.highlight_active(&self.location.current_path());
        let _ = self.state.update(|s| s.selected = 0);
    }

    fn set_status(&self, status: impl Into<String>) {
        let status = status.into();
        let _ = self.state.update(|s| s.status = status);
    }

    /// Handle a key press. Returns true when the user asked to quit.
    pub fn handle_key(&self, key: KeyEvent) -> bool {
        let links = self.document.snapshot().map(|doc| doc.links).unwrap_or_default();
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => return true,
            KeyCode::Left => {
                let _ = self.state.update(|s| s.selected = s.selected.saturating_sub(1));
            }
            KeyCode::Right | KeyCode::Tab => {
                let last = links.len().saturating_sub(1);
                let _ = self.state.update(|s| s.selected = (s.selected + 1).min(last));
            }
            KeyCode::Enter => {
                let selected = self.state.read(|s| s.selected).unwrap_or(0);
                if let Some(link) = links.get(selected) {
                    self.location.follow_link(&link.href);
                }
            }
            KeyCode::Up => {
                let _ = self.document.scroll_by(-1);
            }
            KeyCode::Down => {
                let _ = self.document.scroll_by(1);
            }
            KeyCode::Char('h') => {
                self.location.follow_link("#/");
            }
            KeyCode::Char('g') => {
                self.location.follow_link("#/lost-and-found");
            }
            KeyCode::Char('l') => self.login(),
            KeyCode::Char('r') => self.register(),
            KeyCode::Char('n') => self.plan_event(),
            KeyCode::Char('p') => self.postpone_latest_event(),
            KeyCode::Char('x') => self.cancel_latest_event(),
            KeyCode::Char('c') => self.add_contact(),
            KeyCode::Char('o') => {
                if let Err(e) = self.auth.logout(&self.location) {
                    tracing::error!(error = %e, "logout failed");
                }
                self.set_status("Signed out");
            }
            _ => {}
        }
        false
    }

    fn login(&self) {
        match self.auth.authenticate(DEMO_USERNAME, DEMO_PASSWORD) {
            Some(user) => {
                if let Err(e) = self.auth.login(&user) {
                    tracing::error!(error = %e, "login failed");
                    self.set_status("Login failed");
                    return;
                }
                self.set_status(format!("Welcome, {}!", user.display_name));
                self.location.navigate("/home");
            }
            None => self.set_status("Invalid username or password"),
        }
    }

    fn register(&self) {
        let guest = self.guests.fetch_add(1, Ordering::Relaxed);
        let username = format!("guest{guest}");
        let form = RegistrationForm {
            first_name: "Guest".to_string(),
            last_name: format!("Volunteer {guest}"),
            email_address: format!("{username}@volunteer-connect.example"),
            username: username.clone(),
            password: "guest-pass".to_string(),
            confirm_password: "guest-pass".to_string(),
        };
        match self.auth.register_form(form) {
            Ok(_) => self.set_status(format!("Registered {username}; sign in from the login page")),
            Err(e) => self.set_status(e.to_string()),
        }
    }

    /// Render the current target again after its data changed.
    fn refresh(&self) {
        let router = Arc::clone(&self.router);
        tokio::spawn(async move {
            router.route_changed().await;
        });
    }

    fn organizer(&self) -> Option<String> {
        let name = self.auth.current_user().map(|user| user.display_name);
        if name.is_none() {
            self.set_status("Sign in to plan events");
        }
        name
    }

    fn plan_event(&self) {
        let Some(organizer) = self.organizer() else { return };
        let today = Local::now().date_naive();
        let planned = self.events.by_organizer(&organizer).map(|events| events.len()).unwrap_or_default();
        let draft = EventDraft {
            name: format!("Neighbourhood Meetup #{}", planned + 1),
            date: today.checked_add_days(Days::new(14)).unwrap_or(today).format("%Y-%m-%d").to_string(),
            time: "10:00".to_string(),
            location: "Community Centre".to_string(),
            description: "Meet the neighbours and sign up for spring projects.".to_string(),
        };
        match draft.into_event(organizer, today).and_then(|event| self.events.create(event)) {
            Ok(event) => {
                self.set_status(format!("Planned {} on {}", event.name, event.date));
                self.refresh();
            }
            Err(e) => self.set_status(e.to_string()),
        }
    }

    fn postpone_latest_event(&self) {
        let Some(organizer) = self.organizer() else { return };
        let Some(latest) = self.events.by_organizer(&organizer).ok().and_then(|mut events| events.pop()) else {
            self.set_status("You have no events to postpone");
            return;
        };
        let update = EventUpdate { date: Some(postponed(latest.date)), ..EventUpdate::default() };
        match self.events.update(&latest.id, update) {
            Ok(event) => {
                self.set_status(format!("Moved {} to {}", event.name, event.date));
                self.refresh();
            }
            Err(e) => self.set_status(e.to_string()),
        }
    }

    fn cancel_latest_event(&self) {
        let Some(organizer) = self.organizer() else { return };
        let Some(latest) = self.events.by_organizer(&organizer).ok().and_then(|mut events| events.pop()) else {
            self.set_status("You have no events to cancel");
            return;
        };
        match self.events.delete(&latest.id) {
            Ok(()) => {
                self.set_status(format!("Cancelled {}", latest.name));
                self.refresh();
            }
            Err(e) => self.set_status(e.to_string()),
        }
    }

    fn add_contact(&self) {
        let Some(user) = self.auth.current_user() else {
            self.set_status("Sign in to join the contact list");
            return;
        };
        let details = ContactDetails::new(user.display_name, "905-555-0100", user.email_address);
        match self.contacts.create(details) {
            Ok(contact) => {
                self.set_status(format!("Added {} to the contact list", contact.full_name));
                self.refresh();
            }
            Err(e) => self.set_status(e.to_string()),
        }
    }

    pub fn render(&self, frame: &mut ratatui::Frame) {
        let doc = self.document.snapshot().unwrap_or_default();
        let shell = self.state.read(|s| s.clone()).unwrap_or_default();

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Header
                Constraint::Min(0),    // Content area
                Constraint::Length(3), // Status
            ])
            .split(frame.area());

        frame.render_widget(self.header(&doc, shell.selected), chunks[0]);

        let content = Paragraph::new(plain_text(&doc.markup))
            .block(Block::default().title(doc.title.clone()).borders(Borders::ALL))
            .wrap(Wrap { trim: false })
            .scroll((doc.scroll_offset, 0));
        frame.render_widget(content, chunks[1]);

        let user = self
            .auth
            .current_user()
            .map(|u| u.display_name)
            .unwrap_or_else(|| "signed out".to_string());
        let status = format!(
            " {} | {} | {} | last loaded: {} | ←/→ select  Enter open  h home  g unknown  l login  r register  o logout  n/p/x events  c contact  q quit",
            state_label(self.router.state()),
            self.location.current_path(),
            user,
            shell.last_loaded.as_deref().unwrap_or("-"),
        );
        let footer = Paragraph::new(status)
            .block(Block::default().title(shell.status).borders(Borders::ALL));
        frame.render_widget(footer, chunks[2]);
    }

    fn header(&self, doc: &DocumentState, selected: usize) -> Paragraph<'static> {
        let mut spans = Vec::new();
        for (i, link) in doc.links.iter().enumerate() {
            let mut style = Style::default();
            if link.active {
                style = style.fg(Color::Cyan).add_modifier(Modifier::BOLD);
            }
            if i == selected {
                style = style.add_modifier(Modifier::REVERSED);
            }
            spans.push(Span::styled(format!(" {} ", link.label), style));
            spans.push(Span::raw("|"));
        }
        Paragraph::new(Line::from(spans))
            .block(Block::default().title(" Volunteer Connect ").borders(Borders::ALL))
    }
}

fn postponed(date: NaiveDate) -> NaiveDate {
    date.checked_add_days(Days::new(7)).unwrap_or(date)
}

fn state_label(state: RouterState) -> &'static str {
    match state {
        RouterState::Idle => "idle",
        RouterState::Resolving => "resolving",
        RouterState::Rendering => "loading",
        RouterState::Blocked => "blocked",
        RouterState::Failed => "failed",
    }
}

/// Markup with tags removed and blank lines collapsed, for terminal display.
pub fn plain_text(markup: &str) -> String {
    let mut text = String::with_capacity(markup.len());
    let mut in_tag = false;
    for ch in markup.chars() {
        match ch {
            '<' => in_tag = true,
            '>' if in_tag => in_tag = false,
            _ if !in_tag => text.push(ch),
            _ => {}
        }
    }
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_postponed_by_a_week() {
        let date = NaiveDate::from_ymd_opt(2026, 12, 28).unwrap();
        assert_eq!(postponed(date), NaiveDate::from_ymd_opt(2027, 1, 4).unwrap());
    }

    #[test]
    fn test_plain_text_strips_tags() {
        let markup = "<section>\n  <h1>Events</h1>\n\n  <p>Join <b>us</b></p>\n</section>";
        assert_eq!(plain_text(markup), "Events\nJoin us");
    }
}
