use std::sync::Once;

use shelf_core::{
    update, Book, BookOwner, BookPage, Effect, FeedError, FeedPhase, FeedState,
    GenreFilter, MergeMode, Msg, PageRequest,
};

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(shelf_logging::initialize_for_tests);
}

fn book(id: &str, genre: &str) -> Book {
    Book {
        id: id.to_string(),
        title: format!("Title {id}"),
        caption: "caption".to_string(),
        image_url: format!("https://img.example.com/{id}.jpg"),
        rating: 4,
        genre: genre.to_string(),
        owner: BookOwner {
            id: "u1".to_string(),
            username: Some("reader".to_string()),
            profile_image: None,
        },
        created_at: "2025-05-06T10:00:00Z".to_string(),
    }
}

/// Slice `catalog` the way the listing API does.
fn serve(catalog: &[Book], request: &PageRequest) -> BookPage {
    let limit = request.limit as usize;
    let skip = (request.page as usize - 1) * limit;
    BookPage {
        books: catalog.iter().skip(skip).take(limit).cloned().collect(),
        current_page: request.page,
        total_books: catalog.len() as u64,
        total_pages: catalog.len().div_ceil(limit) as u32,
    }
}

fn page_request(effects: &[Effect]) -> PageRequest {
    effects
        .iter()
        .find_map(|effect| match effect {
            Effect::FetchPage(request) => Some(request.clone()),
            _ => None,
        })
        .expect("page fetch effect")
}

fn respond(state: FeedState, request: &PageRequest, catalog: &[Book]) -> FeedState {
    let (state, effects) = update(
        state,
        Msg::PageLoaded {
            generation: request.generation,
            page: request.page,
            result: Ok(serve(catalog, request)),
        },
    );
    assert!(effects.is_empty());
    state
}

fn fiction_catalog() -> Vec<Book> {
    (1..=5).map(|n| book(&format!("f{n}"), "Fiction")).collect()
}

#[test]
fn three_pages_of_five_books_accumulate_and_exhaust() {
    init_logging();
    let catalog = fiction_catalog();
    let (state, effects) = update(FeedState::with_page_size(2), Msg::FilterSelected("Fiction".into()));
    let first = page_request(&effects);
    assert_eq!(first.filter, GenreFilter::Genre("Fiction".into()));
    assert_eq!((first.page, first.limit), (1, 2));

    let state = respond(state, &first, &catalog);
    assert_eq!(state.items().len(), 2);
    assert_eq!(state.cursor(), 2);
    assert!(state.has_more());

    let (state, effects) = update(state, Msg::EndReached);
    let second = page_request(&effects);
    assert_eq!(second.page, 2);
    assert_eq!(second.mode, MergeMode::Append);
    let state = respond(state, &second, &catalog);
    assert_eq!(state.items().len(), 4);
    assert!(state.has_more());

    let (state, effects) = update(state, Msg::EndReached);
    let third = page_request(&effects);
    assert_eq!(third.page, 3);
    let state = respond(state, &third, &catalog);
    assert_eq!(state.items().len(), 5);
    assert!(!state.has_more());
    assert_eq!(state.cursor(), 4);
    assert_eq!(state.phase(), FeedPhase::Idle);

    let ids: Vec<_> = state.items().iter().map(|b| b.id.as_str()).collect();
    assert_eq!(ids, vec!["f1", "f2", "f3", "f4", "f5"]);

    // exhausted: no further requests
    let (_state, effects) = update(state, Msg::EndReached);
    assert!(effects.is_empty());
}

#[test]
fn end_reached_while_loading_is_a_noop() {
    init_logging();
    let (state, effects) = update(FeedState::new(), Msg::Mounted);
    assert_eq!(effects.len(), 2);
    assert!(state.is_loading());

    let before = state.clone();
    let (state, effects) = update(state, Msg::EndReached);
    assert!(effects.is_empty());
    assert_eq!(state.in_flight(), before.in_flight());
}

#[test]
fn failure_keeps_items_and_cursor_and_retry_reissues_same_request() {
    init_logging();
    let catalog = fiction_catalog();
    let (state, effects) = update(FeedState::with_page_size(2), Msg::Mounted);
    let state = respond(state, &page_request(&effects), &catalog);

    let (state, effects) = update(state, Msg::EndReached);
    let second = page_request(&effects);
    let (mut state, effects) = update(
        state,
        Msg::PageLoaded {
            generation: second.generation,
            page: second.page,
            result: Err(FeedError::network("connection reset")),
        },
    );
    assert!(effects.is_empty());
    assert!(state.consume_dirty());
    assert_eq!(state.phase(), FeedPhase::Error);
    assert_eq!(state.items().len(), 2);
    assert_eq!(state.cursor(), 2);
    assert_eq!(state.error().unwrap().message, "connection reset");
    assert_eq!(state.view().error.as_deref(), Some("connection reset"));

    let (state, effects) = update(state, Msg::RetryClicked);
    assert_eq!(effects, vec![Effect::FetchPage(second.clone())]);
    assert!(state.is_loading());
    assert!(state.error().is_none());

    let state = respond(state, &second, &catalog);
    assert_eq!(state.items().len(), 4);
    assert_eq!(state.cursor(), 3);
}

#[test]
fn retry_outside_error_state_does_nothing() {
    init_logging();
    let (state, effects) = update(FeedState::new(), Msg::RetryClicked);
    assert!(effects.is_empty());
    assert_eq!(state.phase(), FeedPhase::Idle);
}

#[test]
fn end_reached_from_error_state_tries_again() {
    init_logging();
    let (state, effects) = update(FeedState::new(), Msg::Mounted);
    let first = page_request(&effects);
    let (state, _) = update(
        state,
        Msg::PageLoaded {
            generation: first.generation,
            page: 1,
            result: Err(FeedError::network("offline")),
        },
    );
    assert_eq!(state.phase(), FeedPhase::Error);

    let (state, effects) = update(state, Msg::EndReached);
    let again = page_request(&effects);
    assert_eq!(again.page, 1);
    assert!(state.is_loading());
    assert!(state.error().is_none());
}

#[test]
fn overlapping_pages_do_not_duplicate_items() {
    init_logging();
    let catalog = fiction_catalog();
    let (state, effects) = update(FeedState::with_page_size(2), Msg::Mounted);
    let state = respond(state, &page_request(&effects), &catalog);

    // a new book was posted between fetches, shifting offsets by one
    let mut shifted = vec![book("new", "Fiction")];
    shifted.extend(catalog.iter().cloned());

    let (state, effects) = update(state, Msg::EndReached);
    let state = respond(state, &page_request(&effects), &shifted);

    let ids: Vec<_> = state.items().iter().map(|b| b.id.as_str()).collect();
    assert_eq!(ids, vec!["f1", "f2", "f3"]);
}

#[test]
fn empty_listing_is_not_an_error() {
    init_logging();
    let (state, effects) = update(FeedState::new(), Msg::Mounted);
    let state = respond(state, &page_request(&effects), &[]);

    assert_eq!(state.phase(), FeedPhase::Idle);
    assert!(state.error().is_none());
    assert!(!state.has_more());
    let view = state.view();
    assert_eq!(
        view.empty_state.map(|empty| empty.title),
        Some("No recommendations yet".to_string())
    );
    assert!(!view.show_footer_loader);
}
