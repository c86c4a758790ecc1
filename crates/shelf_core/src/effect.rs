use crate::PageRequest;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Fetch one page of the listing API.
    FetchPage(PageRequest),
    /// Fetch the active-genre list.
    FetchGenres { request_id: u64 },
    /// The backend rejected the token; the session must be torn down.
    SessionExpired,
}
