use crate::domain::entities::BlogPostRecord;

pub(super) const POST_COLUMNS: &str = "id, title, subtitle, date, body, author, img_url";

#[derive(sqlx::FromRow)]
pub(crate) struct BlogPostRow {
    pub(crate) id: i64,
    pub(crate) title: String,
    pub(crate) subtitle: String,
    pub(crate) date: String,
    pub(crate) body: String,
    pub(crate) author: String,
    pub(crate) img_url: String,
}

impl From<BlogPostRow> for BlogPostRecord {
    fn from(row: BlogPostRow) -> Self {
        Self {
            id: row.id,
            title: row.title,
            subtitle: row.subtitle,
            date: row.date,
            body: row.body,
            author: row.author,
            img_url: row.img_url,
        }
    }
}
