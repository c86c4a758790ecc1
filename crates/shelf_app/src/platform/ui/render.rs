use shelf_core::{BookCardView, FeedPhase, FeedViewModel};

use super::format::{format_publish_date, rating_stars};

/// Text lines for one frame of the feed.
pub fn render(view: &FeedViewModel) -> Vec<String> {
    let mut lines = Vec::new();

    lines.push(genre_bar(view));
    if let Some(err) = &view.genre_error {
        lines.push(format!("(genres unavailable: {err})"));
    }
    lines.push(String::new());

    match view.phase {
        FeedPhase::Refreshing => lines.push("Refreshing...".to_string()),
        FeedPhase::Loading if view.books.is_empty() => lines.push("Loading...".to_string()),
        _ => {}
    }

    if let Some(err) = &view.error {
        lines.push(format!("Error: {err}"));
        lines.push("Type 'retry' to try again.".to_string());
    }

    if let Some(empty) = &view.empty_state {
        lines.push(empty.title.clone());
        lines.push(empty.subtitle.clone());
    }

    for book in &view.books {
        lines.extend(card_lines(book));
        lines.push(String::new());
    }

    if let Some(footer) = footer(view) {
        lines.push(footer.to_string());
    }
    lines
}

fn genre_bar(view: &FeedViewModel) -> String {
    if view.genres.is_empty() {
        return format!("Genre: {}", view.filter_label);
    }
    let chips: Vec<String> = view
        .genres
        .iter()
        .map(|chip| {
            if chip.selected {
                format!("[{}]", chip.label)
            } else {
                chip.label.clone()
            }
        })
        .collect();
    format!("Genres: {}", chips.join("  "))
}

fn card_lines(book: &BookCardView) -> Vec<String> {
    let mut lines = vec![
        book.owner_name.clone(),
        format!(
            "  {}  [{}]  {}",
            book.title,
            book.genre,
            rating_stars(book.rating)
        ),
    ];
    if !book.caption.is_empty() {
        lines.push(format!("  {}", book.caption));
    }
    lines.push(format!(
        "  Shared on {}",
        format_publish_date(&book.created_at)
    ));
    lines
}

fn footer(view: &FeedViewModel) -> Option<&'static str> {
    if view.books.is_empty() || view.error.is_some() {
        return None;
    }
    if view.show_footer_loader && view.phase == FeedPhase::Loading {
        Some("Loading more...")
    } else if view.show_footer_loader {
        Some("-- type 'more' for the next page --")
    } else if !view.has_more {
        Some("-- end of feed --")
    } else {
        None
    }
}
