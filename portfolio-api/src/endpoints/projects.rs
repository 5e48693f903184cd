use portfolio_auth::{Error, RequestClient, RequestOptions};

use super::{segment, with_query};
use crate::types::{Project, ProjectCreate, ProjectUpdate};

const PROJECTS_PATH: &str = "/api/projects";

#[derive(Clone)]
pub struct Projects {
    client: RequestClient,
}

impl Projects {
    pub fn new(client: RequestClient) -> Self {
        Self { client }
    }

    /// List projects, optionally only the featured (or non-featured) ones.
    pub async fn list(&self, featured: Option<bool>) -> Result<Vec<Project>, Error> {
        let path = with_query(
            PROJECTS_PATH,
            &[("featured", featured.map(|featured| featured.to_string()))],
        );
        self.client.request(&path, RequestOptions::get()).await
    }

    pub async fn get(&self, slug: &str) -> Result<Project, Error> {
        self.client
            .request(&project_path(slug), RequestOptions::get())
            .await
    }

    pub async fn create(&self, project: &ProjectCreate) -> Result<Project, Error> {
        self.client
            .request(PROJECTS_PATH, RequestOptions::post().json(project)?)
            .await
    }

    pub async fn update(&self, slug: &str, update: &ProjectUpdate) -> Result<Project, Error> {
        self.client
            .request(&project_path(slug), RequestOptions::put().json(update)?)
            .await
    }

    pub async fn delete(&self, slug: &str) -> Result<(), Error> {
        self.client
            .send(&project_path(slug), RequestOptions::delete())
            .await?;
        Ok(())
    }
}

fn project_path(slug: &str) -> String {
    format!("{}/{}", PROJECTS_PATH, segment(slug))
}
