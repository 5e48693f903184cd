use portfolio_auth::{Error, RequestClient, RequestOptions};

use super::with_query;
use crate::types::{Comment, CommentCreate, Topic, TopicCreate, TopicList};

const TOPICS_PATH: &str = "/api/forum/topics";
const ADMIN_TOPICS_PATH: &str = "/api/forum/admin/topics";
const ADMIN_COMMENTS_PATH: &str = "/api/forum/admin/comments";

/// Forum topics and their comments, plus the admin moderation endpoints.
#[derive(Clone)]
pub struct Forum {
    client: RequestClient,
}

impl Forum {
    pub fn new(client: RequestClient) -> Self {
        Self { client }
    }

    pub async fn list_topics(
        &self,
        page: Option<u32>,
        limit: Option<u32>,
    ) -> Result<TopicList, Error> {
        let path = with_query(
            TOPICS_PATH,
            &[
                ("page", page.map(|page| page.to_string())),
                ("limit", limit.map(|limit| limit.to_string())),
            ],
        );
        self.client.request(&path, RequestOptions::get()).await
    }

    /// Fetch one topic. The server counts this as a view.
    pub async fn get_topic(&self, id: i64) -> Result<Topic, Error> {
        self.client
            .request(&format!("{TOPICS_PATH}/{id}"), RequestOptions::get())
            .await
    }

    pub async fn create_topic(&self, topic: &TopicCreate) -> Result<Topic, Error> {
        self.client
            .request(TOPICS_PATH, RequestOptions::post().json(topic)?)
            .await
    }

    pub async fn comments(&self, topic_id: i64) -> Result<Vec<Comment>, Error> {
        self.client
            .request(
                &format!("{TOPICS_PATH}/{topic_id}/comments"),
                RequestOptions::get(),
            )
            .await
    }

    pub async fn add_comment(
        &self,
        topic_id: i64,
        comment: &CommentCreate,
    ) -> Result<Comment, Error> {
        self.client
            .request(
                &format!("{TOPICS_PATH}/{topic_id}/comments"),
                RequestOptions::post().json(comment)?,
            )
            .await
    }

    pub async fn admin_list_topics(&self, search: Option<&str>) -> Result<Vec<Topic>, Error> {
        let path = with_query(
            ADMIN_TOPICS_PATH,
            &[("search", search.filter(|s| !s.is_empty()).map(str::to_string))],
        );
        self.client.request(&path, RequestOptions::get()).await
    }

    pub async fn admin_delete_topic(&self, id: i64) -> Result<(), Error> {
        self.client
            .send(&format!("{ADMIN_TOPICS_PATH}/{id}"), RequestOptions::delete())
            .await?;
        Ok(())
    }

    pub async fn admin_list_comments(&self) -> Result<Vec<Comment>, Error> {
        self.client
            .request(ADMIN_COMMENTS_PATH, RequestOptions::get())
            .await
    }

    pub async fn admin_delete_comment(&self, id: i64) -> Result<(), Error> {
        self.client
            .send(
                &format!("{ADMIN_COMMENTS_PATH}/{id}"),
                RequestOptions::delete(),
            )
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::test_support::api_with_token;
    use crate::types::CommentCreate;
    use mockito::{Matcher, Server};
    use serde_json::json;

    const TOPIC_JSON: &str = r#"{"id":4,"title":"Borrow checker","content":"Why?","author_id":1,
        "views":12,"created_at":"2024-05-01T08:00:00","updated_at":"2024-05-01T08:00:00"}"#;

    #[tokio::test]
    async fn test_list_topics_decodes_page() {
        let mut server = Server::new_async().await;
        let (api, _store) = api_with_token(&server.url(), None).await;

        let mock = server
            .mock("GET", "/api/forum/topics")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(format!(
                r#"{{"topics":[{TOPIC_JSON}],"total":1,"page":1,"limit":10}}"#
            ))
            .create_async()
            .await;

        let list = api.forum().list_topics(None, None).await.unwrap();

        mock.assert_async().await;
        assert_eq!(list.topics[0].views, 12);
        assert!(list.topics[0].author.is_none());
    }

    #[tokio::test]
    async fn test_add_comment_posts_to_topic() {
        let mut server = Server::new_async().await;
        let (api, _store) = api_with_token(&server.url(), Some("member")).await;

        let mock = server
            .mock("POST", "/api/forum/topics/4/comments")
            .match_header("authorization", "Bearer member")
            .match_body(Matcher::Json(json!({"content": "Lifetimes."})))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"id":1,"content":"Lifetimes.","author_id":2,"topic_id":4,"likes":0,
                    "created_at":"2024-05-01T09:00:00"}"#,
            )
            .create_async()
            .await;

        let comment = api
            .forum()
            .add_comment(
                4,
                &CommentCreate {
                    content: "Lifetimes.".to_string(),
                },
            )
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(comment.topic_id, Some(4));
    }
}
