use std::sync::Once;

use shelf_core::{update, Effect, FeedError, FeedState, Msg};

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(shelf_logging::initialize_for_tests);
}

fn genre_request(effects: &[Effect]) -> u64 {
    effects
        .iter()
        .find_map(|effect| match effect {
            Effect::FetchGenres { request_id } => Some(*request_id),
            _ => None,
        })
        .expect("genre fetch effect")
}

fn genres(list: &[&str]) -> Result<Vec<String>, FeedError> {
    Ok(list.iter().map(|g| g.to_string()).collect())
}

#[test]
fn catalog_is_all_followed_by_sorted_genres() {
    init_logging();
    let (state, effects) = update(FeedState::new(), Msg::GenresRequested);
    let request_id = genre_request(&effects);
    assert!(state.genres_loading());

    let (state, effects) = update(
        state,
        Msg::GenresLoaded {
            request_id,
            result: genres(&["Horror", "Fiction"]),
        },
    );
    assert!(effects.is_empty());
    assert_eq!(state.genres(), ["All", "Fiction", "Horror"]);
    assert!(!state.genres_loading());

    let chips = state.view().genres;
    assert!(chips[0].selected);
    assert!(!chips[1].selected);
}

#[test]
fn failed_reload_keeps_previous_catalog() {
    init_logging();
    let (state, effects) = update(FeedState::new(), Msg::GenresRequested);
    let (state, _) = update(
        state,
        Msg::GenresLoaded {
            request_id: genre_request(&effects),
            result: genres(&["Fiction", "Horror"]),
        },
    );

    let (state, effects) = update(state, Msg::GenresRequested);
    let (state, effects) = update(
        state,
        Msg::GenresLoaded {
            request_id: genre_request(&effects),
            result: Err(FeedError::network("HTTP 503")),
        },
    );
    assert!(effects.is_empty());
    assert_eq!(state.genres(), ["All", "Fiction", "Horror"]);
    assert_eq!(state.view().genre_error.as_deref(), Some("HTTP 503"));
    // the feed itself is untouched
    assert!(state.error().is_none());
}

#[test]
fn older_genre_response_is_ignored() {
    init_logging();
    let (state, effects) = update(FeedState::new(), Msg::GenresRequested);
    let first = genre_request(&effects);
    let (state, effects) = update(state, Msg::GenresRequested);
    let second = genre_request(&effects);

    let (state, _) = update(
        state,
        Msg::GenresLoaded {
            request_id: second,
            result: genres(&["Poetry"]),
        },
    );
    let (state, _) = update(
        state,
        Msg::GenresLoaded {
            request_id: first,
            result: genres(&["Fiction"]),
        },
    );
    assert_eq!(state.genres(), ["All", "Poetry"]);
}

#[test]
fn unauthorized_catalog_load_expires_the_session() {
    init_logging();
    let (state, effects) = update(FeedState::new(), Msg::GenresRequested);
    let (state, effects) = update(
        state,
        Msg::GenresLoaded {
            request_id: genre_request(&effects),
            result: Err(FeedError::auth("No authentication token, access denied")),
        },
    );
    assert_eq!(effects, vec![Effect::SessionExpired]);
    assert!(state.genres().is_empty());
}

#[test]
fn selected_chip_follows_filter() {
    init_logging();
    let (state, effects) = update(FeedState::new(), Msg::Mounted);
    let (state, _) = update(
        state,
        Msg::GenresLoaded {
            request_id: genre_request(&effects),
            result: genres(&["Fiction", "Horror"]),
        },
    );
    let (state, _) = update(state, Msg::FilterSelected("Horror".into()));

    let selected: Vec<_> = state
        .view()
        .genres
        .into_iter()
        .filter(|chip| chip.selected)
        .map(|chip| chip.label)
        .collect();
    assert_eq!(selected, vec!["Horror"]);
}
