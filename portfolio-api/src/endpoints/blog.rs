use portfolio_auth::{Error, RequestClient, RequestOptions};

use super::{segment, with_query};
use crate::types::{Post, PostCreate, PostList, PostQuery, PostUpdate};

const POSTS_PATH: &str = "/api/blog/posts";

/// Blog posts, addressed by slug.
#[derive(Clone)]
pub struct Blog {
    client: RequestClient,
}

impl Blog {
    pub fn new(client: RequestClient) -> Self {
        Self { client }
    }

    pub async fn list(&self, query: &PostQuery) -> Result<PostList, Error> {
        let path = with_query(
            POSTS_PATH,
            &[
                ("page", query.page.map(|page| page.to_string())),
                ("limit", query.limit.map(|limit| limit.to_string())),
                ("search", query.search.clone().filter(|s| !s.is_empty())),
            ],
        );
        self.client.request(&path, RequestOptions::get()).await
    }

    pub async fn get(&self, slug: &str) -> Result<Post, Error> {
        self.client
            .request(&post_path(slug), RequestOptions::get())
            .await
    }

    pub async fn create(&self, post: &PostCreate) -> Result<Post, Error> {
        self.client
            .request(POSTS_PATH, RequestOptions::post().json(post)?)
            .await
    }

    pub async fn update(&self, slug: &str, update: &PostUpdate) -> Result<Post, Error> {
        self.client
            .request(&post_path(slug), RequestOptions::put().json(update)?)
            .await
    }

    pub async fn delete(&self, slug: &str) -> Result<(), Error> {
        self.client
            .send(&post_path(slug), RequestOptions::delete())
            .await?;
        Ok(())
    }
}

fn post_path(slug: &str) -> String {
    format!("{}/{}", POSTS_PATH, segment(slug))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{api_with_token, POST_JSON};
    use mockito::{Matcher, Server};
    use serde_json::json;

    #[tokio::test]
    async fn test_list_sends_paging_and_search() {
        let mut server = Server::new_async().await;
        let (api, _store) = api_with_token(&server.url(), None).await;

        let mock = server
            .mock("GET", "/api/blog/posts")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("page".into(), "2".into()),
                Matcher::UrlEncoded("limit".into(), "5".into()),
                Matcher::UrlEncoded("search".into(), "async rust".into()),
            ]))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(format!(
                r#"{{"posts":[{POST_JSON}],"total":6,"page":2,"limit":5}}"#
            ))
            .create_async()
            .await;

        let list = api
            .blog()
            .list(&PostQuery {
                page: Some(2),
                limit: Some(5),
                search: Some("async rust".to_string()),
            })
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(list.total, 6);
        assert_eq!(list.posts[0].slug, "hello-world");
    }

    #[tokio::test]
    async fn test_create_sends_only_set_fields() {
        let mut server = Server::new_async().await;
        let (api, _store) = api_with_token(&server.url(), Some("admin-token")).await;

        let mock = server
            .mock("POST", "/api/blog/posts")
            .match_header("authorization", "Bearer admin-token")
            .match_body(Matcher::Json(json!({
                "title": "Hello",
                "slug": "hello-world",
                "content": "# Hi",
                "published": true
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(POST_JSON)
            .create_async()
            .await;

        let post = api
            .blog()
            .create(&PostCreate {
                title: "Hello".to_string(),
                slug: "hello-world".to_string(),
                content: "# Hi".to_string(),
                excerpt: None,
                cover_image: None,
                published: Some(true),
            })
            .await
            .unwrap();

        mock.assert_async().await;
        assert!(post.published);
    }

    #[tokio::test]
    async fn test_delete_ignores_confirmation_body() {
        let mut server = Server::new_async().await;
        let (api, _store) = api_with_token(&server.url(), Some("admin-token")).await;

        let mock = server
            .mock("DELETE", "/api/blog/posts/hello-world")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"message":"deleted"}"#)
            .create_async()
            .await;

        api.blog().delete("hello-world").await.unwrap();
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_missing_post_surfaces_detail() {
        let mut server = Server::new_async().await;
        let (api, _store) = api_with_token(&server.url(), None).await;

        server
            .mock("GET", "/api/blog/posts/nope")
            .with_status(404)
            .with_header("content-type", "application/json")
            .with_body(r#"{"detail":"post not found"}"#)
            .create_async()
            .await;

        let err = api.blog().get("nope").await.unwrap_err();

        assert_eq!(err.status(), Some(404));
        assert_eq!(err.to_string(), "post not found");
    }
}
