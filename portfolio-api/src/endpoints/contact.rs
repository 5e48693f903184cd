use log::*;
use portfolio_auth::{Error, RequestClient, RequestOptions};

use crate::types::ContactMessage;

const CONTACT_PATH: &str = "/api/contact";

#[derive(Clone)]
pub struct Contact {
    client: RequestClient,
}

impl Contact {
    pub fn new(client: RequestClient) -> Self {
        Self { client }
    }

    /// Submit the contact form. The server rate-limits submissions.
    pub async fn send(&self, message: &ContactMessage) -> Result<(), Error> {
        self.client
            .send(CONTACT_PATH, RequestOptions::post().json(message)?)
            .await?;
        debug!("Contact message sent for {}", message.email);
        Ok(())
    }
}
