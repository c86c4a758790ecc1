//! ShelfShare engine: HTTP access to the book backend and effect execution.
mod blocking;
mod client;
mod engine;
mod image;
mod persist;
mod types;

pub use blocking::BlockingClient;
pub use client::{ApiSettings, AuthApi, BookApi, ListingQuery, ReqwestApi, DEFAULT_API_URL};
pub use engine::{ChannelEventSink, EngineError, EngineHandle, EventSink};
pub use image::{encode_data_url, image_mime_type, load_image_data_url, ImageError, MAX_IMAGE_BYTES};
pub use persist::{ensure_state_dir, AtomicFileWriter, PersistError};
pub use types::{
    ApiError, AuthResponse, BookListing, BookRecord, EngineEvent, FailureKind, Generation,
    NewBookRequest, OwnerRecord, UserRecord,
};
