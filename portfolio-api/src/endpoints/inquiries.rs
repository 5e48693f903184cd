use portfolio_auth::{Error, RequestClient, RequestOptions};

use crate::types::{Inquiry, InquiryCreate, InquiryUpdate};

const INQUIRIES_PATH: &str = "/api/services/inquiries";

/// Client inquiries. Anyone may create one; the rest is admin only.
#[derive(Clone)]
pub struct Inquiries {
    client: RequestClient,
}

impl Inquiries {
    pub fn new(client: RequestClient) -> Self {
        Self { client }
    }

    pub async fn list(&self) -> Result<Vec<Inquiry>, Error> {
        self.client
            .request(INQUIRIES_PATH, RequestOptions::get())
            .await
    }

    pub async fn get(&self, id: i64) -> Result<Inquiry, Error> {
        self.client
            .request(&format!("{INQUIRIES_PATH}/{id}"), RequestOptions::get())
            .await
    }

    pub async fn create(&self, inquiry: &InquiryCreate) -> Result<Inquiry, Error> {
        self.client
            .request(INQUIRIES_PATH, RequestOptions::post().json(inquiry)?)
            .await
    }

    pub async fn update(&self, id: i64, update: &InquiryUpdate) -> Result<Inquiry, Error> {
        self.client
            .request(
                &format!("{INQUIRIES_PATH}/{id}"),
                RequestOptions::put().json(update)?,
            )
            .await
    }

    pub async fn delete(&self, id: i64) -> Result<(), Error> {
        self.client
            .send(&format!("{INQUIRIES_PATH}/{id}"), RequestOptions::delete())
            .await?;
        Ok(())
    }
}
