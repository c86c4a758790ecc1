use std::fmt;

use shelf_logging::{shelf_debug, shelf_warn};

use crate::genre::build_catalog;
use crate::merge::{merge, MergeMode};
use crate::view_model::FeedViewModel;
use crate::{Book, BookPage, Effect, GenreFilter};

/// Request generation. Advanced on every reset (filter change, refresh).
pub type Generation = u64;

/// Page size the client asks the listing API for.
pub const DEFAULT_PAGE_SIZE: u32 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FeedPhase {
    #[default]
    Idle,
    /// A page request is in flight (first page of a filter, or pagination).
    Loading,
    /// A pull-to-refresh request for page 1 is in flight.
    Refreshing,
    /// The last page request failed; retry is available.
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedErrorKind {
    /// Transport failure, timeout, non-2xx status or undecodable body.
    Network,
    /// The backend rejected the bearer token (401).
    Auth,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedError {
    pub kind: FeedErrorKind,
    pub message: String,
}

impl FeedError {
    pub fn network(message: impl Into<String>) -> Self {
        Self {
            kind: FeedErrorKind::Network,
            message: message.into(),
        }
    }

    pub fn auth(message: impl Into<String>) -> Self {
        Self {
            kind: FeedErrorKind::Auth,
            message: message.into(),
        }
    }
}

impl fmt::Display for FeedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// A page fetch the core asked the engine to perform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    pub generation: Generation,
    pub filter: GenreFilter,
    pub page: u32,
    pub limit: u32,
    pub mode: MergeMode,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct PendingPage {
    request: PageRequest,
    phase: FeedPhase,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedState {
    items: Vec<Book>,
    filter: GenreFilter,
    cursor: u32,
    has_more: bool,
    phase: FeedPhase,
    error: Option<FeedError>,
    page_size: u32,
    generation: Generation,
    in_flight: Option<PendingPage>,
    last_failed: Option<PendingPage>,
    genres: Vec<String>,
    genre_error: Option<FeedError>,
    genre_request: u64,
    genres_loading: bool,
    dirty: bool,
}

impl Default for FeedState {
    fn default() -> Self {
        Self::with_page_size(DEFAULT_PAGE_SIZE)
    }
}

impl FeedState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page_size(page_size: u32) -> Self {
        Self {
            items: Vec::new(),
            filter: GenreFilter::All,
            cursor: 1,
            has_more: true,
            phase: FeedPhase::Idle,
            error: None,
            page_size: page_size.max(1),
            generation: 0,
            in_flight: None,
            last_failed: None,
            genres: Vec::new(),
            genre_error: None,
            genre_request: 0,
            genres_loading: false,
            dirty: false,
        }
    }

    /// Start the feed on `filter` instead of "All". Takes effect from the first `Mounted`.
    pub fn with_filter(mut self, filter: GenreFilter) -> Self {
        self.filter = filter;
        self
    }

    pub fn view(&self) -> FeedViewModel {
        FeedViewModel::project(self)
    }

    pub fn items(&self) -> &[Book] {
        &self.items
    }

    pub fn filter(&self) -> &GenreFilter {
        &self.filter
    }

    /// Next page number to request.
    pub fn cursor(&self) -> u32 {
        self.cursor
    }

    pub fn has_more(&self) -> bool {
        self.has_more
    }

    pub fn phase(&self) -> FeedPhase {
        self.phase
    }

    pub fn is_loading(&self) -> bool {
        self.phase == FeedPhase::Loading
    }

    pub fn is_refreshing(&self) -> bool {
        self.phase == FeedPhase::Refreshing
    }

    pub fn error(&self) -> Option<&FeedError> {
        self.error.as_ref()
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    pub fn generation(&self) -> Generation {
        self.generation
    }

    pub fn in_flight(&self) -> Option<&PageRequest> {
        self.in_flight.as_ref().map(|pending| &pending.request)
    }

    /// Filter bar entries, "All" first. Empty until the first catalog load succeeds.
    pub fn genres(&self) -> &[String] {
        &self.genres
    }

    pub fn genre_error(&self) -> Option<&FeedError> {
        self.genre_error.as_ref()
    }

    pub fn genres_loading(&self) -> bool {
        self.genres_loading
    }

    /// Returns whether anything changed since the last call, and clears the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    fn issue_page(&mut self, page: u32, mode: MergeMode, phase: FeedPhase) -> Effect {
        let request = PageRequest {
            generation: self.generation,
            filter: self.filter.clone(),
            page,
            limit: self.page_size,
            mode,
        };
        self.phase = phase;
        self.error = None;
        self.last_failed = None;
        self.in_flight = Some(PendingPage {
            request: request.clone(),
            phase,
        });
        self.mark_dirty();
        Effect::FetchPage(request)
    }

    /// Initial load on mount: catalog plus page 1 of the current filter.
    pub(crate) fn mount(&mut self) -> Vec<Effect> {
        self.generation += 1;
        self.items.clear();
        self.cursor = 1;
        self.has_more = true;
        let genres = self.load_genres();
        let page = self.issue_page(1, MergeMode::Replace, FeedPhase::Loading);
        vec![genres, page]
    }

    /// Pagination. No-op while a request is in flight or when the feed is exhausted.
    pub(crate) fn load_next_page(&mut self) -> Option<Effect> {
        if self.in_flight.is_some() || !self.has_more {
            return None;
        }
        Some(self.issue_page(self.cursor, MergeMode::Append, FeedPhase::Loading))
    }

    /// Reload page 1 of the current filter, replacing items on success.
    ///
    /// Always allowed. Any in-flight request belongs to an older generation
    /// afterwards and is dropped when it resolves.
    pub(crate) fn refresh(&mut self) -> Vec<Effect> {
        self.generation += 1;
        let page = self.issue_page(1, MergeMode::Replace, FeedPhase::Refreshing);
        let genres = self.load_genres();
        vec![page, genres]
    }

    pub(crate) fn set_filter(&mut self, filter: GenreFilter) -> Vec<Effect> {
        if filter == self.filter {
            return Vec::new();
        }
        shelf_debug!("feed filter {} -> {}", self.filter, filter);
        self.filter = filter;
        self.generation += 1;
        self.items.clear();
        self.cursor = 1;
        self.has_more = true;
        vec![self.issue_page(1, MergeMode::Replace, FeedPhase::Loading)]
    }

    /// Re-issue the request that failed last, unchanged.
    pub(crate) fn retry(&mut self) -> Option<Effect> {
        if self.phase != FeedPhase::Error || self.in_flight.is_some() {
            return None;
        }
        let failed = self.last_failed.take()?;
        let request = PageRequest {
            generation: self.generation,
            ..failed.request
        };
        self.phase = failed.phase;
        self.error = None;
        self.in_flight = Some(PendingPage {
            request: request.clone(),
            phase: failed.phase,
        });
        self.mark_dirty();
        Some(Effect::FetchPage(request))
    }

    pub(crate) fn apply_page(
        &mut self,
        generation: Generation,
        page: u32,
        result: Result<BookPage, FeedError>,
    ) -> Vec<Effect> {
        if generation != self.generation {
            shelf_debug!(
                "dropping stale page {} from generation {} (current {})",
                page,
                generation,
                self.generation
            );
            return Vec::new();
        }
        let pending = match self.in_flight.take() {
            Some(pending) if pending.request.page == page => pending,
            other => {
                shelf_debug!("dropping unexpected page {} response", page);
                self.in_flight = other;
                return Vec::new();
            }
        };
        self.mark_dirty();

        match result {
            Ok(listing) => {
                let loaded = pending.request.page;
                self.has_more = listing.has_more_after(loaded);
                self.items = merge(
                    std::mem::take(&mut self.items),
                    listing.books,
                    pending.request.mode,
                );
                self.cursor = loaded + 1;
                self.phase = FeedPhase::Idle;
                self.error = None;
                Vec::new()
            }
            Err(err) => {
                shelf_warn!(
                    "page {} of {} failed: {}",
                    pending.request.page,
                    pending.request.filter,
                    err
                );
                let kind = err.kind;
                self.phase = FeedPhase::Error;
                self.error = Some(err);
                self.last_failed = Some(pending);
                session_effects(kind)
            }
        }
    }

    pub(crate) fn load_genres(&mut self) -> Effect {
        self.genre_request += 1;
        self.genres_loading = true;
        self.mark_dirty();
        Effect::FetchGenres {
            request_id: self.genre_request,
        }
    }

    /// Fails soft: on error the previous catalog stays in place.
    pub(crate) fn apply_genres(
        &mut self,
        request_id: u64,
        result: Result<Vec<String>, FeedError>,
    ) -> Vec<Effect> {
        if request_id != self.genre_request {
            shelf_debug!(
                "dropping stale genre response {} (current {})",
                request_id,
                self.genre_request
            );
            return Vec::new();
        }
        self.genres_loading = false;
        self.mark_dirty();
        match result {
            Ok(raw) => {
                self.genres = build_catalog(raw);
                self.genre_error = None;
                Vec::new()
            }
            Err(err) => {
                shelf_warn!("genre catalog load failed: {}", err);
                let kind = err.kind;
                self.genre_error = Some(err);
                session_effects(kind)
            }
        }
    }
}

fn session_effects(kind: FeedErrorKind) -> Vec<Effect> {
    match kind {
        FeedErrorKind::Auth => vec![Effect::SessionExpired],
        FeedErrorKind::Network => Vec::new(),
    }
}
