use anyhow::Result;
use portfolio_api::types::{ContactMessage, PostQuery, User};
use portfolio_api::Api;
use serde::Serialize;

use crate::Command;

/// Run one command and print its result as JSON.
pub async fn run(api: &Api, command: Command) -> Result<()> {
    match command {
        Command::Login { email, password } => {
            api.session().login(&email, &password).await?;
            let user: User = api.session().current_user().await?;
            print_json(&user)
        }
        Command::Register {
            email,
            name,
            password,
        } => {
            api.session().register(&email, &password, &name).await?;
            Ok(())
        }
        Command::Logout => Ok(api.session().logout().await?),
        Command::Whoami => {
            let user: User = api.session().current_user().await?;
            print_json(&user)
        }
        Command::Posts {
            page,
            limit,
            search,
        } => print_json(
            &api.blog()
                .list(&PostQuery {
                    page,
                    limit,
                    search,
                })
                .await?,
        ),
        Command::Post { slug } => print_json(&api.blog().get(&slug).await?),
        Command::Topics { page, limit } => {
            print_json(&api.forum().list_topics(page, limit).await?)
        }
        Command::Projects { featured } => print_json(&api.projects().list(featured).await?),
        Command::Portfolio { category } => {
            print_json(&api.portfolio().list(category.as_deref()).await?)
        }
        Command::Services => print_json(&api.services().list().await?),
        Command::Contact {
            name,
            email,
            subject,
            message,
        } => {
            api.contact()
                .send(&ContactMessage {
                    name,
                    email,
                    subject,
                    message,
                })
                .await?;
            println!("Message sent");
            Ok(())
        }
        Command::Users { search } => print_json(&api.users().list(search.as_deref()).await?),
        Command::Stats => print_json(&api.users().stats().await?),
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    println!("{json}");
    Ok(())
}
