use std::fmt;
use std::str::FromStr;

use serde::{de, Deserialize, Deserializer, Serialize};

pub type Generation = u64;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    InvalidUrl,
    HttpStatus(u16),
    /// 401 from the backend: missing, expired or revoked token.
    Unauthorized,
    Timeout,
    TooLarge { max_bytes: u64, actual: Option<u64> },
    Decode,
    Network,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::InvalidUrl => write!(f, "invalid url"),
            FailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            FailureKind::Unauthorized => write!(f, "unauthorized"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::TooLarge { max_bytes, actual } => {
                write!(f, "response too large (max {max_bytes}, actual {actual:?})")
            }
            FailureKind::Decode => write!(f, "malformed response"),
            FailureKind::Network => write!(f, "network error"),
        }
    }
}

/// Failure of a single API call. `message` is the backend's own `message`
/// field when it sent one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    pub kind: FailureKind,
    pub message: String,
}

impl ApiError {
    pub(crate) fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        self.kind == FailureKind::Unauthorized
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.message.is_empty() {
            write!(f, "{}", self.kind)
        } else {
            write!(f, "{}: {}", self.kind, self.message)
        }
    }
}

impl std::error::Error for ApiError {}

/// The `user` field of a book: populated in listings, a bare id elsewhere.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum OwnerRecord {
    Populated {
        #[serde(rename = "_id")]
        id: String,
        #[serde(default)]
        username: Option<String>,
        #[serde(default, rename = "profileImage")]
        profile_image: Option<String>,
    },
    Id(String),
}

impl OwnerRecord {
    pub fn id(&self) -> &str {
        match self {
            OwnerRecord::Populated { id, .. } => id,
            OwnerRecord::Id(id) => id,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookRecord {
    #[serde(rename = "_id")]
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub caption: String,
    pub image: String,
    #[serde(deserialize_with = "lenient_number")]
    pub rating: u8,
    #[serde(default)]
    pub genre: String,
    pub user: OwnerRecord,
    #[serde(default)]
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookListing {
    pub books: Vec<BookRecord>,
    #[serde(deserialize_with = "lenient_number")]
    pub current_page: u32,
    pub total_books: u64,
    pub total_pages: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    pub username: String,
    pub email: String,
    #[serde(default)]
    pub profile_image: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: UserRecord,
}

/// Body of `POST /books`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewBookRequest {
    pub title: String,
    pub caption: String,
    /// Data URL; the backend uploads it to the image host.
    pub image: String,
    pub rating: u8,
    pub genre: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct MessageBody {
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    PageFetched {
        generation: Generation,
        page: u32,
        result: Result<BookListing, ApiError>,
    },
    GenresFetched {
        request_id: u64,
        result: Result<Vec<String>, ApiError>,
    },
}

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrText {
    Number(u64),
    Text(String),
}

/// Accepts `3` as well as `"3"`; the backend echoes some query values as strings.
fn lenient_number<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: TryFrom<u64> + FromStr,
    <T as TryFrom<u64>>::Error: fmt::Display,
    <T as FromStr>::Err: fmt::Display,
{
    match NumberOrText::deserialize(deserializer)? {
        NumberOrText::Number(value) => T::try_from(value).map_err(de::Error::custom),
        NumberOrText::Text(text) => text.trim().parse().map_err(de::Error::custom),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn listing_accepts_string_page_and_populated_owner() {
        let json = r#"{
            "books": [{
                "_id": "b1",
                "title": "Dune",
                "caption": "Spice",
                "image": "https://res.cloudinary.com/x/image/upload/v1/abc.jpg",
                "rating": 5,
                "genre": "Science Fiction",
                "user": {"_id": "u1", "username": "paul", "profileImage": "https://a/p.svg"},
                "createdAt": "2025-05-06T10:00:00.000Z",
                "updatedAt": "2025-05-06T10:00:00.000Z",
                "__v": 0
            }],
            "currentPage": "2",
            "totalBooks": 7,
            "totalPages": 4
        }"#;
        let listing: BookListing = serde_json::from_str(json).unwrap();
        assert_eq!(listing.current_page, 2);
        assert_eq!(listing.total_pages, 4);
        let book = &listing.books[0];
        assert_eq!(book.rating, 5);
        assert_eq!(book.user.id(), "u1");
        assert!(matches!(
            &book.user,
            OwnerRecord::Populated { username: Some(name), .. } if name == "paul"
        ));
    }

    #[test]
    fn own_books_carry_bare_owner_id_and_string_rating() {
        let json = r#"{"_id":"b2","title":"T","image":"i","rating":"3","user":"u9"}"#;
        let book: BookRecord = serde_json::from_str(json).unwrap();
        assert_eq!(book.rating, 3);
        assert_eq!(book.user, OwnerRecord::Id("u9".into()));
        assert!(book.created_at.is_empty());
    }

    #[test]
    fn out_of_range_rating_is_rejected() {
        let json = r#"{"_id":"b3","title":"T","image":"i","rating":300,"user":"u9"}"#;
        assert!(serde_json::from_str::<BookRecord>(json).is_err());
    }

    #[test]
    fn api_error_display_includes_backend_message() {
        let err = ApiError::new(FailureKind::HttpStatus(400), "Email already exists");
        assert_eq!(err.to_string(), "http status 400: Email already exists");
        assert_eq!(ApiError::new(FailureKind::Timeout, "").to_string(), "timeout");
    }
}
