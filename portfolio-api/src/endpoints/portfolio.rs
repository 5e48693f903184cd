use portfolio_auth::{Error, RequestClient, RequestOptions};

use super::with_query;
use crate::types::{Portfolio, PortfolioCreate, PortfolioUpdate};

const PORTFOLIO_PATH: &str = "/api/portfolio";

/// Portfolio gallery, addressed by numeric id.
#[derive(Clone)]
pub struct PortfolioItems {
    client: RequestClient,
}

impl PortfolioItems {
    pub fn new(client: RequestClient) -> Self {
        Self { client }
    }

    pub async fn list(&self, category: Option<&str>) -> Result<Vec<Portfolio>, Error> {
        let path = with_query(
            PORTFOLIO_PATH,
            &[(
                "category",
                category.filter(|c| !c.is_empty()).map(str::to_string),
            )],
        );
        self.client.request(&path, RequestOptions::get()).await
    }

    pub async fn get(&self, id: i64) -> Result<Portfolio, Error> {
        self.client
            .request(&format!("{PORTFOLIO_PATH}/{id}"), RequestOptions::get())
            .await
    }

    pub async fn create(&self, item: &PortfolioCreate) -> Result<Portfolio, Error> {
        self.client
            .request(PORTFOLIO_PATH, RequestOptions::post().json(item)?)
            .await
    }

    pub async fn update(&self, id: i64, update: &PortfolioUpdate) -> Result<Portfolio, Error> {
        self.client
            .request(
                &format!("{PORTFOLIO_PATH}/{id}"),
                RequestOptions::put().json(update)?,
            )
            .await
    }

    pub async fn delete(&self, id: i64) -> Result<(), Error> {
        self.client
            .send(&format!("{PORTFOLIO_PATH}/{id}"), RequestOptions::delete())
            .await?;
        Ok(())
    }
}
