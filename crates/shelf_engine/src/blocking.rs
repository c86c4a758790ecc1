use std::future::Future;

use crate::client::{ApiSettings, AuthApi, BookApi, ReqwestApi};
use crate::engine::EngineError;
use crate::{ApiError, AuthResponse, BookRecord, NewBookRequest};

/// Synchronous facade over [`ReqwestApi`] for one-shot calls outside the feed loop.
pub struct BlockingClient {
    runtime: tokio::runtime::Runtime,
    api: ReqwestApi,
}

impl BlockingClient {
    pub fn new(settings: ApiSettings) -> Result<Self, EngineError> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;
        let api = ReqwestApi::new(settings)?;
        Ok(Self { runtime, api })
    }

    fn run<F: Future>(&self, future: F) -> F::Output {
        self.runtime.block_on(future)
    }

    pub fn login(&self, email: &str, password: &str) -> Result<AuthResponse, ApiError> {
        self.run(self.api.login(email, password))
    }

    pub fn register(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<AuthResponse, ApiError> {
        self.run(self.api.register(username, email, password))
    }

    pub fn active_genres(&self, token: &str) -> Result<Vec<String>, ApiError> {
        self.run(self.api.active_genres(token))
    }

    pub fn all_genres(&self, token: &str) -> Result<Vec<String>, ApiError> {
        self.run(self.api.all_genres(token))
    }

    pub fn user_books(&self, token: &str) -> Result<Vec<BookRecord>, ApiError> {
        self.run(self.api.user_books(token))
    }

    pub fn create_book(&self, token: &str, book: &NewBookRequest) -> Result<BookRecord, ApiError> {
        self.run(self.api.create_book(token, book))
    }

    pub fn delete_book(&self, token: &str, book_id: &str) -> Result<String, ApiError> {
        self.run(self.api.delete_book(token, book_id))
    }
}
