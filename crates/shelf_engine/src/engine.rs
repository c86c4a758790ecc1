use std::io;
use std::sync::{mpsc, Arc};
use std::thread;

use shelf_logging::shelf_debug;
use thiserror::Error;

use crate::client::{ApiSettings, BookApi, ListingQuery, ReqwestApi};
use crate::{ApiError, EngineEvent, Generation};

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("failed to start engine runtime: {0}")]
    Runtime(#[from] io::Error),
    #[error("invalid api settings: {0}")]
    Api(#[from] ApiError),
}

/// Receives engine events on the engine's worker threads.
pub trait EventSink: Send + Sync {
    fn emit(&self, event: EngineEvent);
}

pub struct ChannelEventSink {
    tx: mpsc::Sender<EngineEvent>,
}

impl ChannelEventSink {
    pub fn new(tx: mpsc::Sender<EngineEvent>) -> Self {
        Self { tx }
    }
}

impl EventSink for ChannelEventSink {
    fn emit(&self, event: EngineEvent) {
        let _ = self.tx.send(event);
    }
}

enum EngineCommand {
    FetchPage {
        token: String,
        generation: Generation,
        query: ListingQuery,
    },
    FetchGenres {
        token: String,
        request_id: u64,
    },
}

/// Runs API calls on a background tokio runtime and reports results to a sink.
///
/// Requests are never cancelled; callers decide whether a late answer still
/// matters. Dropping the handle stops the worker once queued commands are sent.
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
}

impl EngineHandle {
    pub fn new(settings: ApiSettings, sink: Arc<dyn EventSink>) -> Result<Self, EngineError> {
        let api = Arc::new(ReqwestApi::new(settings)?);
        Self::with_api(api, sink)
    }

    pub fn with_api(api: Arc<dyn BookApi>, sink: Arc<dyn EventSink>) -> Result<Self, EngineError> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .enable_all()
            .build()?;
        let (cmd_tx, cmd_rx) = mpsc::channel();

        thread::spawn(move || {
            while let Ok(command) = cmd_rx.recv() {
                let api = api.clone();
                let sink = sink.clone();
                runtime.spawn(async move {
                    handle_command(api.as_ref(), command, sink.as_ref()).await;
                });
            }
            shelf_debug!("engine command channel closed");
        });

        Ok(Self { cmd_tx })
    }

    pub fn fetch_page(&self, token: impl Into<String>, generation: Generation, query: ListingQuery) {
        let _ = self.cmd_tx.send(EngineCommand::FetchPage {
            token: token.into(),
            generation,
            query,
        });
    }

    pub fn fetch_genres(&self, token: impl Into<String>, request_id: u64) {
        let _ = self.cmd_tx.send(EngineCommand::FetchGenres {
            token: token.into(),
            request_id,
        });
    }
}

async fn handle_command(api: &dyn BookApi, command: EngineCommand, sink: &dyn EventSink) {
    match command {
        EngineCommand::FetchPage {
            token,
            generation,
            query,
        } => {
            let page = query.page;
            let result = api.list_books(&token, &query).await;
            sink.emit(EngineEvent::PageFetched {
                generation,
                page,
                result,
            });
        }
        EngineCommand::FetchGenres { token, request_id } => {
            let result = api.active_genres(&token).await;
            sink.emit(EngineEvent::GenresFetched { request_id, result });
        }
    }
}
