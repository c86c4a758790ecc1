use std::time::Duration;

use futures_util::StreamExt;
use reqwest::header::CONTENT_TYPE;
use reqwest::{RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use shelf_logging::{shelf_debug, shelf_warn};
use url::Url;

use crate::types::MessageBody;
use crate::{ApiError, AuthResponse, BookListing, BookRecord, FailureKind, NewBookRequest};

pub const DEFAULT_API_URL: &str = "https://shelfshare-backend.onrender.com/api";

#[derive(Debug, Clone)]
pub struct ApiSettings {
    pub base_url: String,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    pub redirect_limit: usize,
    pub max_bytes: u64,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
            redirect_limit: 5,
            max_bytes: 5 * 1024 * 1024,
        }
    }
}

/// One page of the feed; `genre: None` is the unfiltered listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingQuery {
    pub genre: Option<String>,
    pub page: u32,
    pub limit: u32,
}

/// The book endpoints. Every call is authorized with the session's bearer token.
#[async_trait::async_trait]
pub trait BookApi: Send + Sync {
    async fn list_books(&self, token: &str, query: &ListingQuery)
        -> Result<BookListing, ApiError>;

    /// Genres with at least one book.
    async fn active_genres(&self, token: &str) -> Result<Vec<String>, ApiError>;

    /// Genres in use plus the backend's suggested set.
    async fn all_genres(&self, token: &str) -> Result<Vec<String>, ApiError>;

    async fn user_books(&self, token: &str) -> Result<Vec<BookRecord>, ApiError>;

    async fn create_book(
        &self,
        token: &str,
        book: &NewBookRequest,
    ) -> Result<BookRecord, ApiError>;

    /// Returns the backend's confirmation message.
    async fn delete_book(&self, token: &str, book_id: &str) -> Result<String, ApiError>;
}

#[async_trait::async_trait]
pub trait AuthApi: Send + Sync {
    async fn login(&self, email: &str, password: &str) -> Result<AuthResponse, ApiError>;

    async fn register(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<AuthResponse, ApiError>;
}

#[derive(Debug, Clone)]
pub struct ReqwestApi {
    settings: ApiSettings,
    base_url: Url,
    client: reqwest::Client,
}

impl ReqwestApi {
    pub fn new(settings: ApiSettings) -> Result<Self, ApiError> {
        let base_url = Url::parse(&settings.base_url)
            .map_err(|err| ApiError::new(FailureKind::InvalidUrl, err.to_string()))?;
        if base_url.cannot_be_a_base() {
            return Err(ApiError::new(
                FailureKind::InvalidUrl,
                format!("{} cannot be used as a base url", settings.base_url),
            ));
        }
        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .redirect(reqwest::redirect::Policy::limited(settings.redirect_limit))
            .build()
            .map_err(|err| ApiError::new(FailureKind::Network, err.to_string()))?;

        Ok(Self {
            settings,
            base_url,
            client,
        })
    }

    pub fn settings(&self) -> &ApiSettings {
        &self.settings
    }

    /// `{base}/{segments...}` with each segment percent-encoded.
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty();
            path.extend(segments);
        }
        url
    }

    fn listing_url(&self, query: &ListingQuery) -> Url {
        let mut url = match query.genre.as_deref() {
            Some(genre) => self.endpoint(&["books", "genre", genre]),
            None => self.endpoint(&["books"]),
        };
        url.query_pairs_mut()
            .append_pair("page", &query.page.to_string())
            .append_pair("limit", &query.limit.to_string());
        url
    }

    async fn get_json<T: DeserializeOwned>(&self, token: &str, url: Url) -> Result<T, ApiError> {
        shelf_debug!("GET {}", url);
        let body = self.send(self.client.get(url).bearer_auth(token)).await?;
        decode(&body)
    }

    async fn post_json<B, T>(&self, token: Option<&str>, url: Url, payload: &B) -> Result<T, ApiError>
    where
        B: Serialize + Sync,
        T: DeserializeOwned,
    {
        shelf_debug!("POST {}", url);
        let bytes = serde_json::to_vec(payload)
            .map_err(|err| ApiError::new(FailureKind::Decode, err.to_string()))?;
        let mut request = self
            .client
            .post(url)
            .header(CONTENT_TYPE, "application/json")
            .body(bytes);
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }
        let body = self.send(request).await?;
        decode(&body)
    }

    async fn send(&self, request: RequestBuilder) -> Result<Vec<u8>, ApiError> {
        let response = request.send().await.map_err(map_reqwest_error)?;
        let status = response.status();

        if let Some(content_len) = response.content_length() {
            if content_len > self.settings.max_bytes {
                return Err(self.too_large(Some(content_len)));
            }
        }

        let mut bytes = Vec::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(map_reqwest_error)?;
            let next_len = bytes.len() as u64 + chunk.len() as u64;
            if next_len > self.settings.max_bytes {
                return Err(self.too_large(Some(next_len)));
            }
            bytes.extend_from_slice(&chunk);
        }

        if status.is_success() {
            return Ok(bytes);
        }

        let message = backend_message(&bytes).unwrap_or_else(|| status.to_string());
        shelf_warn!("request failed with {}: {}", status, message);
        let kind = if status == StatusCode::UNAUTHORIZED {
            FailureKind::Unauthorized
        } else {
            FailureKind::HttpStatus(status.as_u16())
        };
        Err(ApiError::new(kind, message))
    }

    fn too_large(&self, actual: Option<u64>) -> ApiError {
        ApiError::new(
            FailureKind::TooLarge {
                max_bytes: self.settings.max_bytes,
                actual,
            },
            "response too large",
        )
    }
}

#[async_trait::async_trait]
impl BookApi for ReqwestApi {
    async fn list_books(
        &self,
        token: &str,
        query: &ListingQuery,
    ) -> Result<BookListing, ApiError> {
        self.get_json(token, self.listing_url(query)).await
    }

    async fn active_genres(&self, token: &str) -> Result<Vec<String>, ApiError> {
        self.get_json(token, self.endpoint(&["books", "active-genres"]))
            .await
    }

    async fn all_genres(&self, token: &str) -> Result<Vec<String>, ApiError> {
        self.get_json(token, self.endpoint(&["books", "genres"])).await
    }

    async fn user_books(&self, token: &str) -> Result<Vec<BookRecord>, ApiError> {
        self.get_json(token, self.endpoint(&["books", "user"])).await
    }

    async fn create_book(
        &self,
        token: &str,
        book: &NewBookRequest,
    ) -> Result<BookRecord, ApiError> {
        self.post_json(Some(token), self.endpoint(&["books"]), book)
            .await
    }

    async fn delete_book(&self, token: &str, book_id: &str) -> Result<String, ApiError> {
        let url = self.endpoint(&["books", book_id]);
        shelf_debug!("DELETE {}", url);
        let body = self
            .send(self.client.delete(url).bearer_auth(token))
            .await?;
        let confirmation: MessageBody = decode(&body)?;
        Ok(confirmation.message)
    }
}

#[derive(Serialize)]
struct LoginBody<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Serialize)]
struct RegisterBody<'a> {
    username: &'a str,
    email: &'a str,
    password: &'a str,
}

#[async_trait::async_trait]
impl AuthApi for ReqwestApi {
    async fn login(&self, email: &str, password: &str) -> Result<AuthResponse, ApiError> {
        let url = self.endpoint(&["auth", "login"]);
        self.post_json(None, url, &LoginBody { email, password })
            .await
    }

    async fn register(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<AuthResponse, ApiError> {
        let url = self.endpoint(&["auth", "register"]);
        let body = RegisterBody {
            username,
            email,
            password,
        };
        self.post_json(None, url, &body).await
    }
}

fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, ApiError> {
    serde_json::from_slice(bytes).map_err(|err| ApiError::new(FailureKind::Decode, err.to_string()))
}

fn backend_message(bytes: &[u8]) -> Option<String> {
    serde_json::from_slice::<MessageBody>(bytes)
        .ok()
        .map(|body| body.message)
        .filter(|message| !message.trim().is_empty())
}

fn map_reqwest_error(err: reqwest::Error) -> ApiError {
    if err.is_timeout() {
        return ApiError::new(FailureKind::Timeout, err.to_string());
    }
    ApiError::new(FailureKind::Network, err.to_string())
}
