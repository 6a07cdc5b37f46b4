//! Repository traits describing persistence adapters.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::entities::BlogPostRecord;

#[derive(Debug, Error)]
pub enum RepoError {
    #[error("persistence error: {0}")]
    Persistence(String),
    #[error("duplicate record violates unique constraint `{constraint}`")]
    Duplicate { constraint: String },
    #[error("resource not found")]
    NotFound,
    #[error("integrity error: {message}")]
    Integrity { message: String },
    #[error("database timeout")]
    Timeout,
}

impl RepoError {
    pub fn from_persistence(err: impl std::fmt::Display) -> Self {
        Self::Persistence(err.to_string())
    }
}

#[derive(Debug, Clone)]
pub struct CreateBlogPostParams {
    pub title: String,
    pub subtitle: String,
    pub date: String,
    pub body: String,
    pub author: String,
    pub img_url: String,
}

/// Replacement values for an existing post. `id` selects the row; `date` is
/// deliberately absent because it never changes after creation.
#[derive(Debug, Clone)]
pub struct UpdateBlogPostParams {
    pub id: i64,
    pub title: String,
    pub subtitle: String,
    pub body: String,
    pub author: String,
    pub img_url: String,
}

#[async_trait]
pub trait BlogPostsRepo: Send + Sync {
    /// All posts in store-native order.
    async fn list_all(&self) -> Result<Vec<BlogPostRecord>, RepoError>;

    async fn find_by_id(&self, id: i64) -> Result<Option<BlogPostRecord>, RepoError>;
}

#[async_trait]
pub trait BlogPostsWriteRepo: Send + Sync {
    async fn insert(&self, params: CreateBlogPostParams) -> Result<BlogPostRecord, RepoError>;

    /// Returns `RepoError::NotFound` when no row has the given id.
    async fn update(&self, params: UpdateBlogPostParams) -> Result<BlogPostRecord, RepoError>;

    /// Returns `RepoError::NotFound` when no row has the given id.
    async fn delete(&self, id: i64) -> Result<(), RepoError>;
}
