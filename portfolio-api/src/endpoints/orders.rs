use portfolio_auth::{Error, RequestClient, RequestOptions};

use crate::types::{Order, OrderCreate, OrderUpdate};

const ORDERS_PATH: &str = "/api/services/orders";

/// Orders. Admins see every order, clients only their own.
#[derive(Clone)]
pub struct Orders {
    client: RequestClient,
}

impl Orders {
    pub fn new(client: RequestClient) -> Self {
        Self { client }
    }

    pub async fn list(&self) -> Result<Vec<Order>, Error> {
        self.client.request(ORDERS_PATH, RequestOptions::get()).await
    }

    pub async fn get(&self, id: i64) -> Result<Order, Error> {
        self.client
            .request(&format!("{ORDERS_PATH}/{id}"), RequestOptions::get())
            .await
    }

    pub async fn create(&self, order: &OrderCreate) -> Result<Order, Error> {
        self.client
            .request(ORDERS_PATH, RequestOptions::post().json(order)?)
            .await
    }

    pub async fn update(&self, id: i64, update: &OrderUpdate) -> Result<Order, Error> {
        self.client
            .request(
                &format!("{ORDERS_PATH}/{id}"),
                RequestOptions::put().json(update)?,
            )
            .await
    }
}
