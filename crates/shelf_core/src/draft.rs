use thiserror::Error;

use crate::genre::normalize_genre;

/// Rating the composer starts with.
pub const DEFAULT_DRAFT_RATING: u8 = 3;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DraftError {
    #[error("{0} is required")]
    MissingField(&'static str),
    #[error("rating must be between 1 and 5, got {0}")]
    RatingOutOfRange(u8),
}

/// A new recommendation as composed by the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookDraft {
    pub title: String,
    pub caption: String,
    /// `data:image/...;base64,...` payload, uploaded by the backend.
    pub image: String,
    pub rating: u8,
    pub genre: String,
}

impl Default for BookDraft {
    fn default() -> Self {
        Self {
            title: String::new(),
            caption: String::new(),
            image: String::new(),
            rating: DEFAULT_DRAFT_RATING,
            genre: String::new(),
        }
    }
}

impl BookDraft {
    /// Trim every text field, normalize the genre and check that nothing is missing.
    pub fn validated(self) -> Result<Self, DraftError> {
        let title = required("title", &self.title)?;
        let caption = required("caption", &self.caption)?;
        let image = required("image", &self.image)?;
        let genre = required("genre", &self.genre)?;
        if !(1..=5).contains(&self.rating) {
            return Err(DraftError::RatingOutOfRange(self.rating));
        }
        Ok(Self {
            title,
            caption,
            image,
            rating: self.rating,
            genre: normalize_genre(&genre),
        })
    }
}

fn required(field: &'static str, value: &str) -> Result<String, DraftError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(DraftError::MissingField(field))
    } else {
        Ok(trimmed.to_string())
    }
}
