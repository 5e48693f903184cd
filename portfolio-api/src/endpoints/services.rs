use portfolio_auth::{Error, RequestClient, RequestOptions};

use super::segment;
use crate::types::{Service, ServiceCreate, ServiceUpdate};

const SERVICES_PATH: &str = "/api/services";

#[derive(Clone)]
pub struct Services {
    client: RequestClient,
}

impl Services {
    pub fn new(client: RequestClient) -> Self {
        Self { client }
    }

    pub async fn list(&self) -> Result<Vec<Service>, Error> {
        self.client
            .request(SERVICES_PATH, RequestOptions::get())
            .await
    }

    pub async fn get(&self, slug: &str) -> Result<Service, Error> {
        self.client
            .request(&service_path(slug), RequestOptions::get())
            .await
    }

    pub async fn create(&self, service: &ServiceCreate) -> Result<Service, Error> {
        self.client
            .request(SERVICES_PATH, RequestOptions::post().json(service)?)
            .await
    }

    pub async fn update(&self, slug: &str, update: &ServiceUpdate) -> Result<Service, Error> {
        self.client
            .request(&service_path(slug), RequestOptions::put().json(update)?)
            .await
    }

    pub async fn delete(&self, slug: &str) -> Result<(), Error> {
        self.client
            .send(&service_path(slug), RequestOptions::delete())
            .await?;
        Ok(())
    }
}

fn service_path(slug: &str) -> String {
    format!("{}/{}", SERVICES_PATH, segment(slug))
}
