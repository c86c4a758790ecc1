use crate::{Effect, FeedState, GenreFilter, Msg};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: FeedState, msg: Msg) -> (FeedState, Vec<Effect>) {
    let effects = match msg {
        Msg::Mounted => state.mount(),
        Msg::FilterSelected(label) => state.set_filter(GenreFilter::from_label(&label)),
        Msg::EndReached => state.load_next_page().into_iter().collect(),
        Msg::RefreshRequested => state.refresh(),
        Msg::RetryClicked => state.retry().into_iter().collect(),
        Msg::GenresRequested => vec![state.load_genres()],
        Msg::PageLoaded {
            generation,
            page,
            result,
        } => state.apply_page(generation, page, result),
        Msg::GenresLoaded { request_id, result } => state.apply_genres(request_id, result),
        Msg::NoOp => Vec::new(),
    };

    (state, effects)
}
