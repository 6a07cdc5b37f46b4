//! Domain entities mirrored from persistent storage.

/// A stored blog post.
///
/// `date` is the human-readable creation date captured once at insert time
/// and never rewritten by edits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlogPostRecord {
    pub id: i64,
    pub title: String,
    pub subtitle: String,
    pub date: String,
    pub body: String,
    pub author: String,
    pub img_url: String,
}
