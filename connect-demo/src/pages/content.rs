//! Pages whose markup is fixed.

use connect_router::{ContentFuture, NavigationEvent, Page, ProducerError};
use tokio::time::{sleep, Duration};

pub struct ContentPage {
    markup: &'static str,
    latency: Duration,
}

impl ContentPage {
    pub fn new(markup: &'static str) -> Self {
        Self { markup, latency: Duration::ZERO }
    }

    /// Simulate fetching the markup from the server.
    pub fn with_latency(mut self, millis: u64) -> Self {
        self.latency = Duration::from_millis(millis);
        self
    }
}

impl Page for ContentPage {
    fn render(&self) -> ContentFuture {
        let markup = self.markup;
        let latency = self.latency;
        Box::pin(async move {
            if !latency.is_zero() {
                sleep(latency).await;
            }
            Ok::<_, ProducerError>(markup.to_string())
        })
    }

    fn init(&self, event: &NavigationEvent) {
        tracing::debug!(path = %event.path, "content page ready");
    }
}

pub const HOME: &str = r##"
<section class="hero-section">
  <h1>Welcome to Volunteer Connect</h1>
  <p>Your gateway to making a difference in the community.</p>
  <a href="#/opportunities">Get Involved</a>
</section>
<section>
  <h2>Upcoming highlights</h2>
  <p>Park clean-up, food bank shifts and weekend tutoring are all looking for helpers.</p>
</section>
"##;

pub const ABOUT: &str = r#"
<section>
  <h1>About Us</h1>
  <p>Volunteer Connect links local organizations with people who want to help.</p>
  <p>We started as a small community board and now coordinate hundreds of shifts every season.</p>
</section>
"#;

pub const CONTACT: &str = r#"
<section>
  <h1>Contact Us</h1>
  <p>Questions, ideas or a new opportunity to list? Send us a message.</p>
  <p>Email: hello@volunteer-connect.example</p>
</section>
"#;

pub const OPPORTUNITIES: &str = r#"
<section>
  <h1>Volunteer Opportunities</h1>
  <ul>
    <li>Food Bank Helper - Saturdays, 9am to noon</li>
    <li>Reading Buddy - Weekday afternoons</li>
    <li>Trail Steward - First Sunday of the month</li>
  </ul>
</section>
"#;

pub const LOGIN: &str = r#"
<main>
  <h1>Login</h1>
  <p>Press 'l' to sign in as the demo volunteer.</p>
</main>
"#;

pub const REGISTER: &str = r#"
<main>
  <h1>Register</h1>
  <p>Press 'r' to register a new guest account (username guestN, password guest-pass).</p>
</main>
"#;

pub const PRIVACY_POLICY: &str = r#"
<section>
  <h1>Privacy Policy</h1>
  <p>We only keep what is needed to match volunteers with events.</p>
</section>
"#;

pub const TERMS_OF_SERVICE: &str = r#"
<section>
  <h1>Terms of Service</h1>
  <p>Be kind, show up when you sign up, and let organizers know if plans change.</p>
</section>
"#;

pub const NOT_FOUND: &str = r##"
<div class="container text-center">
  <h1>404 - Page Not Found</h1>
  <p>The page you're looking for doesn't exist.</p>
  <a href="#/home">Go Home</a>
</div>
"##;
