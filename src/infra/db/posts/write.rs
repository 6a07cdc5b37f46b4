use async_trait::async_trait;

use crate::application::repos::{
    BlogPostsWriteRepo, CreateBlogPostParams, RepoError, UpdateBlogPostParams,
};
use crate::domain::entities::BlogPostRecord;

use super::super::SqliteRepositories;
use super::types::{BlogPostRow, POST_COLUMNS};
use crate::infra::db::map_sqlx_error;

#[async_trait]
impl BlogPostsWriteRepo for SqliteRepositories {
    async fn insert(&self, params: CreateBlogPostParams) -> Result<BlogPostRecord, RepoError> {
        let CreateBlogPostParams {
            title,
            subtitle,
            date,
            body,
            author,
            img_url,
        } = params;

        let sql = format!(
            "INSERT INTO blog_post (title, subtitle, date, body, author, img_url) \
             VALUES (?, ?, ?, ?, ?, ?) \
             RETURNING {POST_COLUMNS}"
        );
        let row = sqlx::query_as::<_, BlogPostRow>(&sql)
            .bind(title)
            .bind(subtitle)
            .bind(date)
            .bind(body)
            .bind(author)
            .bind(img_url)
            .fetch_one(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        Ok(BlogPostRecord::from(row))
    }

    async fn update(&self, params: UpdateBlogPostParams) -> Result<BlogPostRecord, RepoError> {
        let UpdateBlogPostParams {
            id,
            title,
            subtitle,
            body,
            author,
            img_url,
        } = params;

        let sql = format!(
            "UPDATE blog_post \
             SET title = ?, subtitle = ?, body = ?, author = ?, img_url = ? \
             WHERE id = ? \
             RETURNING {POST_COLUMNS}"
        );
        let row = sqlx::query_as::<_, BlogPostRow>(&sql)
            .bind(title)
            .bind(subtitle)
            .bind(body)
            .bind(author)
            .bind(img_url)
            .bind(id)
            .fetch_optional(self.pool())
            .await
            .map_err(map_sqlx_error)?
            .ok_or(RepoError::NotFound)?;

        Ok(BlogPostRecord::from(row))
    }

    async fn delete(&self, id: i64) -> Result<(), RepoError> {
        let result = sqlx::query("DELETE FROM blog_post WHERE id = ?")
            .bind(id)
            .execute(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        if result.rows_affected() == 0 {
            return Err(RepoError::NotFound);
        }

        Ok(())
    }
}
