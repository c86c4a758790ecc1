pub type BookId = String;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BookOwner {
    pub id: String,
    pub username: Option<String>,
    pub profile_image: Option<String>,
}

/// A recommendation as shown in the feed. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Book {
    pub id: BookId,
    pub title: String,
    pub caption: String,
    pub image_url: String,
    /// 1..=5 stars.
    pub rating: u8,
    pub genre: String,
    pub owner: BookOwner,
    /// RFC 3339 timestamp as reported by the backend.
    pub created_at: String,
}

/// One page of the listing API.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BookPage {
    pub books: Vec<Book>,
    pub current_page: u32,
    pub total_books: u64,
    pub total_pages: u32,
}

impl BookPage {
    /// Whether pages beyond `page` exist according to `total_pages`.
    pub fn has_more_after(&self, page: u32) -> bool {
        page < self.total_pages
    }
}
