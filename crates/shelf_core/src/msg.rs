use crate::{BookPage, FeedError, Generation};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// Feed view was mounted: load the catalog and the first page.
    Mounted,
    /// User picked a genre chip ("All" clears the filter).
    FilterSelected(String),
    /// List scrolled to its end.
    EndReached,
    /// User pulled to refresh.
    RefreshRequested,
    /// User pressed retry on the error banner.
    RetryClicked,
    /// User asked for the genre catalog to be reloaded.
    GenresRequested,
    /// Engine answered a page request.
    PageLoaded {
        generation: Generation,
        page: u32,
        result: Result<BookPage, FeedError>,
    },
    /// Engine answered a genre catalog request.
    GenresLoaded {
        request_id: u64,
        result: Result<Vec<String>, FeedError>,
    },
    NoOp,
}
