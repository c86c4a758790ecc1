//! ShelfShare core: pure feed state machine, merge reducer and view-model helpers.
mod book;
mod draft;
mod effect;
mod genre;
mod merge;
mod msg;
mod state;
mod update;
mod view_model;

pub use book::{Book, BookId, BookOwner, BookPage};
pub use draft::{BookDraft, DraftError, DEFAULT_DRAFT_RATING};
pub use effect::Effect;
pub use genre::{
    build_catalog, normalize_genre, GenreFilter, ALL_GENRES_LABEL, SUGGESTED_GENRES,
};
pub use merge::{merge, HasId, MergeMode};
pub use msg::Msg;
pub use state::{
    FeedError, FeedErrorKind, FeedPhase, FeedState, Generation, PageRequest, DEFAULT_PAGE_SIZE,
};
pub use update::update;
pub use view_model::{BookCardView, EmptyState, FeedViewModel, GenreChipView};
