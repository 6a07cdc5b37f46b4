use async_trait::async_trait;

use crate::application::repos::{BlogPostsRepo, RepoError};
use crate::domain::entities::BlogPostRecord;

use super::super::SqliteRepositories;
use super::types::{BlogPostRow, POST_COLUMNS};
use crate::infra::db::map_sqlx_error;

#[async_trait]
impl BlogPostsRepo for SqliteRepositories {
    async fn list_all(&self) -> Result<Vec<BlogPostRecord>, RepoError> {
        let sql = format!("SELECT {POST_COLUMNS} FROM blog_post");
        let rows = sqlx::query_as::<_, BlogPostRow>(&sql)
            .fetch_all(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        Ok(rows.into_iter().map(BlogPostRecord::from).collect())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<BlogPostRecord>, RepoError> {
        let sql = format!("SELECT {POST_COLUMNS} FROM blog_post WHERE id = ?");
        let row = sqlx::query_as::<_, BlogPostRow>(&sql)
            .bind(id)
            .fetch_optional(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        Ok(row.map(BlogPostRecord::from))
    }
}
