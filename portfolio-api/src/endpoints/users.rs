use portfolio_auth::{Error, RequestClient, RequestOptions};
use serde::Serialize;

use super::with_query;
use crate::types::{Role, User, UserStats, UserUpdate};

const USERS_PATH: &str = "/api/users";
const STATS_PATH: &str = "/api/users/stats/count";

#[derive(Serialize)]
struct RoleUpdate {
    role: Role,
}

/// User administration. Every call requires an admin session.
#[derive(Clone)]
pub struct Users {
    client: RequestClient,
}

impl Users {
    pub fn new(client: RequestClient) -> Self {
        Self { client }
    }

    pub async fn list(&self, search: Option<&str>) -> Result<Vec<User>, Error> {
        let path = with_query(
            USERS_PATH,
            &[("search", search.filter(|s| !s.is_empty()).map(str::to_string))],
        );
        self.client.request(&path, RequestOptions::get()).await
    }

    pub async fn get(&self, id: i64) -> Result<User, Error> {
        self.client
            .request(&format!("{USERS_PATH}/{id}"), RequestOptions::get())
            .await
    }

    pub async fn update(&self, id: i64, update: &UserUpdate) -> Result<User, Error> {
        self.client
            .request(
                &format!("{USERS_PATH}/{id}"),
                RequestOptions::put().json(update)?,
            )
            .await
    }

    /// Change a user's role. The role goes in both the query and the body,
    /// since server versions have read it from either.
    pub async fn update_role(&self, id: i64, role: Role) -> Result<(), Error> {
        let path = with_query(
            &format!("{USERS_PATH}/{id}/role"),
            &[("role", Some(role.as_str().to_string()))],
        );
        self.client
            .send(&path, RequestOptions::put().json(&RoleUpdate { role })?)
            .await?;
        Ok(())
    }

    pub async fn delete(&self, id: i64) -> Result<(), Error> {
        self.client
            .send(&format!("{USERS_PATH}/{id}"), RequestOptions::delete())
            .await?;
        Ok(())
    }

    pub async fn stats(&self) -> Result<UserStats, Error> {
        self.client.request(STATS_PATH, RequestOptions::get()).await
    }
}

#[cfg(test)]
mod tests {
    use crate::test_support::api_with_token;
    use crate::types::Role;
    use mockito::{Matcher, Server};
    use serde_json::json;

    #[tokio::test]
    async fn test_update_role_sends_query_and_body() {
        let mut server = Server::new_async().await;
        let (api, _store) = api_with_token(&server.url(), Some("admin-token")).await;

        let mock = server
            .mock("PUT", "/api/users/5/role")
            .match_query(Matcher::UrlEncoded("role".into(), "ADMIN".into()))
            .match_body(Matcher::Json(json!({"role": "ADMIN"})))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"message":"role updated"}"#)
            .create_async()
            .await;

        api.users().update_role(5, Role::Admin).await.unwrap();
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_stats() {
        let mut server = Server::new_async().await;
        let (api, _store) = api_with_token(&server.url(), Some("admin-token")).await;

        server
            .mock("GET", "/api/users/stats/count")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"total":10,"admins":2,"regular_users":8}"#)
            .create_async()
            .await;

        let stats = api.users().stats().await.unwrap();

        assert_eq!(stats.total, 10);
        assert_eq!(stats.regular_users, 8);
    }

    #[tokio::test]
    async fn test_non_admin_gets_forbidden_message() {
        let mut server = Server::new_async().await;
        let (api, _store) = api_with_token(&server.url(), Some("member")).await;

        server
            .mock("GET", "/api/users")
            .with_status(403)
            .with_header("content-type", "application/json")
            .with_body(r#"{"detail":"admin privileges required"}"#)
            .create_async()
            .await;

        let err = api.users().list(None).await.unwrap_err();

        assert_eq!(err.status(), Some(403));
        assert_eq!(err.to_string(), "admin privileges required");
        // A 403 is not an authentication failure; the session stays.
        assert!(api.session().is_authenticated().await.unwrap());
    }
}
