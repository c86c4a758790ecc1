use std::sync::{mpsc, Arc};

use shelf_core::{Book, BookOwner, BookPage, Effect, FeedError, Msg};
use shelf_engine::{
    ApiError, ApiSettings, BookListing, BookRecord, EngineError, EngineEvent, EngineHandle,
    EventSink, ListingQuery, OwnerRecord,
};
use shelf_logging::{shelf_debug, shelf_info, shelf_warn};

use super::app::LoopEvent;

/// What the feed loop should do after a batch of effects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Flow {
    Continue,
    SessionExpired,
}

/// Executes core effects against the engine with the session's bearer token.
pub(crate) struct EffectRunner {
    engine: EngineHandle,
    token: String,
}

impl EffectRunner {
    pub fn new(
        settings: ApiSettings,
        token: String,
        loop_tx: mpsc::Sender<LoopEvent>,
    ) -> Result<Self, EngineError> {
        let sink = Arc::new(MsgSink { tx: loop_tx });
        let engine = EngineHandle::new(settings, sink)?;
        Ok(Self { engine, token })
    }

    pub fn enqueue(&self, effects: Vec<Effect>) -> Flow {
        let mut flow = Flow::Continue;
        for effect in effects {
            match effect {
                Effect::FetchPage(request) => {
                    shelf_debug!(
                        "FetchPage generation={} filter={} page={} limit={}",
                        request.generation,
                        request.filter,
                        request.page,
                        request.limit
                    );
                    let query = ListingQuery {
                        genre: request.filter.genre().map(str::to_string),
                        page: request.page,
                        limit: request.limit,
                    };
                    self.engine
                        .fetch_page(self.token.as_str(), request.generation, query);
                }
                Effect::FetchGenres { request_id } => {
                    shelf_debug!("FetchGenres request_id={}", request_id);
                    self.engine.fetch_genres(self.token.as_str(), request_id);
                }
                Effect::SessionExpired => {
                    shelf_info!("backend rejected the session token");
                    flow = Flow::SessionExpired;
                }
            }
        }
        flow
    }
}

/// Forwards engine results into the feed loop as core messages.
struct MsgSink {
    tx: mpsc::Sender<LoopEvent>,
}

impl EventSink for MsgSink {
    fn emit(&self, event: EngineEvent) {
        let _ = self.tx.send(LoopEvent::Msg(to_msg(event)));
    }
}

fn to_msg(event: EngineEvent) -> Msg {
    match event {
        EngineEvent::PageFetched {
            generation,
            page,
            result,
        } => Msg::PageLoaded {
            generation,
            page,
            result: result.map(to_page).map_err(to_feed_error),
        },
        EngineEvent::GenresFetched { request_id, result } => Msg::GenresLoaded {
            request_id,
            result: result.map_err(to_feed_error),
        },
    }
}

fn to_feed_error(err: ApiError) -> FeedError {
    if err.is_unauthorized() {
        FeedError::auth(err.message)
    } else {
        shelf_warn!("request failed: {}", err);
        FeedError::network(err.to_string())
    }
}

fn to_page(listing: BookListing) -> BookPage {
    BookPage {
        books: listing.books.into_iter().map(to_book).collect(),
        current_page: listing.current_page,
        total_books: listing.total_books,
        total_pages: listing.total_pages,
    }
}

pub(crate) fn to_book(record: BookRecord) -> Book {
    let owner = match record.user {
        OwnerRecord::Populated {
            id,
            username,
            profile_image,
        } => BookOwner {
            id,
            username,
            profile_image,
        },
        OwnerRecord::Id(id) => BookOwner {
            id,
            ..BookOwner::default()
        },
    };
    Book {
        id: record.id,
        title: record.title,
        caption: record.caption,
        image_url: record.image,
        rating: record.rating,
        genre: record.genre,
        owner,
        created_at: record.created_at,
    }
}
