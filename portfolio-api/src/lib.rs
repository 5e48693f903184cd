//! Typed access to the portfolio site's resources.
//!
//! Every call goes through [`portfolio_auth::RequestClient`], so bearer
//! tokens, renewal on a 401 and timeouts are handled in one place.

pub mod endpoints;
pub mod types;

use portfolio_auth::{RequestClient, Session};

use endpoints::{
    Blog, Contact, Forum, Inquiries, Orders, PortfolioItems, Projects, Services, Users,
};

/// Entry point to the endpoint groups. Cheap to clone; every group shares
/// the same request client and therefore the same session.
#[derive(Clone)]
pub struct Api {
    client: RequestClient,
}

impl Api {
    pub fn new(client: RequestClient) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &RequestClient {
        &self.client
    }

    pub fn session(&self) -> Session {
        Session::new(self.client.clone())
    }

    pub fn blog(&self) -> Blog {
        Blog::new(self.client.clone())
    }

    pub fn forum(&self) -> Forum {
        Forum::new(self.client.clone())
    }

    pub fn projects(&self) -> Projects {
        Projects::new(self.client.clone())
    }

    pub fn portfolio(&self) -> PortfolioItems {
        PortfolioItems::new(self.client.clone())
    }

    pub fn services(&self) -> Services {
        Services::new(self.client.clone())
    }

    pub fn inquiries(&self) -> Inquiries {
        Inquiries::new(self.client.clone())
    }

    pub fn orders(&self) -> Orders {
        Orders::new(self.client.clone())
    }

    pub fn contact(&self) -> Contact {
        Contact::new(self.client.clone())
    }

    pub fn users(&self) -> Users {
        Users::new(self.client.clone())
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::Api;
    use events::EventPublisher;
    use portfolio_auth::token::{MemoryStore, StorageKey, TokenStore};
    use portfolio_auth::{ClientConfig, RequestClient};
    use std::sync::Arc;

    pub const POST_JSON: &str = r##"{"id":1,"title":"Hello","slug":"hello-world","content":"# Hi",
        "excerpt":null,"cover_image":null,"published":true,"author_id":1,
        "created_at":"2024-05-01T08:00:00","updated_at":"2024-05-01T08:00:00"}"##;

    /// An `Api` against `base_url`, optionally signed in with `token`.
    pub async fn api_with_token(base_url: &str, token: Option<&str>) -> (Api, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        if let Some(token) = token {
            store
                .set(StorageKey::AccessToken, token.to_string())
                .await
                .unwrap();
        }

        let client = RequestClient::new(
            ClientConfig::default().with_base_url(base_url),
            store.clone(),
            EventPublisher::new(),
        )
        .unwrap();

        (Api::new(client), store)
    }
}
