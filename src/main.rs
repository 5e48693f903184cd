use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::*;
use dotenvy::dotenv;
use events::EventPublisher;
use log::*;
use portfolio_api::Api;
use service::{config::Config, logging::Logger, AppState};
use std::sync::Arc;
use std::time::Duration;

mod commands;
mod notifier;

use notifier::SessionNotifier;

#[derive(Parser)]
#[command(name = "portfolio_client")]
#[command(about = "Command line client for the portfolio site API")]
struct Cli {
    #[command(flatten)]
    config: Config,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Log in and keep the session
    Login {
        email: String,
        #[arg(long, env = "PORTFOLIO_PASSWORD")]
        password: String,
    },
    /// Create an account and log in
    Register {
        email: String,
        #[arg(long)]
        name: String,
        #[arg(long, env = "PORTFOLIO_PASSWORD")]
        password: String,
    },
    /// Forget the stored session
    Logout,
    /// Show the signed-in user
    Whoami,
    /// List blog posts
    Posts {
        #[arg(long)]
        page: Option<u32>,
        #[arg(long)]
        limit: Option<u32>,
        #[arg(long)]
        search: Option<String>,
    },
    /// Show one blog post
    Post { slug: String },
    /// List forum topics
    Topics {
        #[arg(long)]
        page: Option<u32>,
        #[arg(long)]
        limit: Option<u32>,
    },
    /// List projects
    Projects {
        #[arg(long)]
        featured: Option<bool>,
    },
    /// List portfolio items
    Portfolio {
        #[arg(long)]
        category: Option<String>,
    },
    /// List services
    Services,
    /// Send a message through the contact form
    Contact {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        subject: String,
        #[arg(long)]
        message: String,
    },
    /// List users (admin)
    Users {
        #[arg(long)]
        search: Option<String>,
    },
    /// Show user totals (admin)
    Stats,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    let cli = Cli::parse();
    Logger::init_logger(&cli.config);

    let logout_delay = Duration::from_millis(cli.config.logout_delay_ms);
    let events = EventPublisher::new().with_handler(Arc::new(SessionNotifier));
    let state = AppState::new(cli.config, events).await?;
    let api = Api::new(state.client.clone());

    match commands::run(&api, cli.command).await {
        Ok(()) => Ok(()),
        Err(e) => {
            let auth_expired = e
                .downcast_ref::<portfolio_auth::Error>()
                .is_some_and(|e| e.is_auth_expired());
            if auth_expired {
                // Let the delayed logout notice reach the terminal first.
                tokio::time::sleep(logout_delay + Duration::from_millis(50)).await;
            }
            error!("{e:?}");
            eprintln!("{} {}", "error:".red().bold(), e);
            std::process::exit(1);
        }
    }
}
