use crate::{Book, FeedPhase, FeedState, GenreFilter};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmptyState {
    pub title: String,
    pub subtitle: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenreChipView {
    pub label: String,
    pub selected: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookCardView {
    pub id: String,
    pub title: String,
    pub caption: String,
    pub image_url: String,
    pub rating: u8,
    pub genre: String,
    pub owner_name: String,
    pub owner_avatar: Option<String>,
    pub created_at: String,
}

/// Read-only projection of [`FeedState`] for renderers.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FeedViewModel {
    pub phase: FeedPhase,
    pub filter_label: String,
    pub genres: Vec<GenreChipView>,
    pub books: Vec<BookCardView>,
    pub has_more: bool,
    pub show_footer_loader: bool,
    pub error: Option<String>,
    pub genre_error: Option<String>,
    pub empty_state: Option<EmptyState>,
}

impl FeedViewModel {
    pub(crate) fn project(state: &FeedState) -> Self {
        let filter_label = state.filter().label().to_string();
        let genres = state
            .genres()
            .iter()
            .map(|label| GenreChipView {
                label: label.clone(),
                selected: *label == filter_label,
            })
            .collect();
        let books: Vec<BookCardView> = state.items().iter().map(card).collect();
        let error = state.error().map(ToString::to_string);

        let show_footer_loader =
            state.has_more() && !books.is_empty() && state.phase() != FeedPhase::Refreshing;
        let empty_state = if books.is_empty() && error.is_none() && state.phase() == FeedPhase::Idle
        {
            Some(empty_state_for(state.filter()))
        } else {
            None
        };

        Self {
            phase: state.phase(),
            filter_label,
            genres,
            books,
            has_more: state.has_more(),
            show_footer_loader,
            error,
            genre_error: state.genre_error().map(ToString::to_string),
            empty_state,
        }
    }
}

fn card(book: &Book) -> BookCardView {
    BookCardView {
        id: book.id.clone(),
        title: book.title.clone(),
        caption: book.caption.clone(),
        image_url: book.image_url.clone(),
        rating: book.rating,
        genre: book.genre.clone(),
        owner_name: book
            .owner
            .username
            .clone()
            .unwrap_or_else(|| book.owner.id.clone()),
        owner_avatar: book.owner.profile_image.clone(),
        created_at: book.created_at.clone(),
    }
}

fn empty_state_for(filter: &GenreFilter) -> EmptyState {
    match filter {
        GenreFilter::All => EmptyState {
            title: "No recommendations yet".to_string(),
            subtitle: "Be the first to share your favorite book!".to_string(),
        },
        GenreFilter::Genre(name) => EmptyState {
            title: format!("No books found in {name}"),
            subtitle: "Share a book in this genre to get started!".to_string(),
        },
    }
}
