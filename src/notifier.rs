use async_trait::async_trait;
use colored::*;
use events::{AuthEvent, EventHandler, LogoutReason};
use log::*;

/// Reports session changes on the terminal.
pub struct SessionNotifier;

#[async_trait]
impl EventHandler for SessionNotifier {
    async fn handle(&self, event: &AuthEvent) {
        debug!("{}", event.event_type());

        match event {
            AuthEvent::LoggedIn { email } => {
                eprintln!("{} signed in as {}", "✓".green(), email.bold());
            }
            AuthEvent::TokenRefreshed => {
                info!("Session renewed");
            }
            AuthEvent::LoggedOut {
                reason: LogoutReason::SessionExpired,
            } => {
                eprintln!(
                    "{} session expired, run `portfolio_client login` again",
                    "!".yellow().bold()
                );
            }
            AuthEvent::LoggedOut {
                reason: LogoutReason::UserRequested,
            } => {
                eprintln!("{} signed out", "✓".green());
            }
        }
    }
}
