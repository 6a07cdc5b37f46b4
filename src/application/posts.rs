//! Blog post use cases: list, show, create, edit and delete.

use std::sync::Arc;

use metrics::counter;
use thiserror::Error;
use tracing::info;

use crate::application::clock::SiteClock;
use crate::application::repos::{
    BlogPostsRepo, BlogPostsWriteRepo, CreateBlogPostParams, RepoError, UpdateBlogPostParams,
};
use crate::domain::entities::BlogPostRecord;
use crate::domain::posts::format_publication_date;
use crate::infra::telemetry::{POSTS_CREATED_TOTAL, POSTS_DELETED_TOTAL, POSTS_UPDATED_TOTAL};

#[derive(Debug, Error)]
pub enum BlogPostError {
    #[error("post `{id}` not found")]
    NotFound { id: i64 },
    #[error("a post titled `{title}` already exists")]
    DuplicateTitle { title: String },
    #[error(transparent)]
    Repo(#[from] RepoError),
}

/// Validated, user-editable fields of a post.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostContent {
    pub title: String,
    pub subtitle: String,
    pub author: String,
    pub img_url: String,
    pub body: String,
}

#[derive(Clone)]
pub struct BlogPostService {
    reader: Arc<dyn BlogPostsRepo>,
    writer: Arc<dyn BlogPostsWriteRepo>,
    clock: SiteClock,
}

impl BlogPostService {
    pub fn new(
        reader: Arc<dyn BlogPostsRepo>,
        writer: Arc<dyn BlogPostsWriteRepo>,
        clock: SiteClock,
    ) -> Self {
        Self {
            reader,
            writer,
            clock,
        }
    }

    pub fn clock(&self) -> SiteClock {
        self.clock
    }

    pub async fn list_posts(&self) -> Result<Vec<BlogPostRecord>, BlogPostError> {
        Ok(self.reader.list_all().await?)
    }

    pub async fn load_post(&self, id: i64) -> Result<BlogPostRecord, BlogPostError> {
        self.reader
            .find_by_id(id)
            .await?
            .ok_or(BlogPostError::NotFound { id })
    }

    pub async fn create_post(&self, content: PostContent) -> Result<BlogPostRecord, BlogPostError> {
        let date = format_publication_date(self.clock.today());
        let title = content.title.clone();

        let params = CreateBlogPostParams {
            title: content.title,
            subtitle: content.subtitle,
            date,
            body: content.body,
            author: content.author,
            img_url: content.img_url,
        };

        let post = self.writer.insert(params).await.map_err(|err| match err {
            RepoError::Duplicate { .. } => BlogPostError::DuplicateTitle { title },
            other => BlogPostError::Repo(other),
        })?;

        counter!(POSTS_CREATED_TOTAL).increment(1);
        info!(
            target = "inkpost::posts",
            post_id = post.id,
            title = %post.title,
            "post created"
        );

        Ok(post)
    }

    pub async fn update_post(
        &self,
        id: i64,
        content: PostContent,
    ) -> Result<BlogPostRecord, BlogPostError> {
        let title = content.title.clone();

        let params = UpdateBlogPostParams {
            id,
            title: content.title,
            subtitle: content.subtitle,
            body: content.body,
            author: content.author,
            img_url: content.img_url,
        };

        let post = self.writer.update(params).await.map_err(|err| match err {
            RepoError::NotFound => BlogPostError::NotFound { id },
            RepoError::Duplicate { .. } => BlogPostError::DuplicateTitle { title },
            other => BlogPostError::Repo(other),
        })?;

        counter!(POSTS_UPDATED_TOTAL).increment(1);
        info!(target = "inkpost::posts", post_id = post.id, "post updated");

        Ok(post)
    }

    pub async fn delete_post(&self, id: i64) -> Result<(), BlogPostError> {
        self.writer.delete(id).await.map_err(|err| match err {
            RepoError::NotFound => BlogPostError::NotFound { id },
            other => BlogPostError::Repo(other),
        })?;

        counter!(POSTS_DELETED_TOTAL).increment(1);
        info!(target = "inkpost::posts", post_id = id, "post deleted");

        Ok(())
    }
}
