//! One-shot subcommands: account, posting and "my books".

use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use shelf_core::{build_catalog, BookDraft, SUGGESTED_GENRES};
use shelf_engine::{load_image_data_url, ApiError, BlockingClient, NewBookRequest};
use shelf_logging::shelf_warn;

use super::config::AppConfig;
use super::effects::to_book;
use super::session::{Session, SessionStore};
use super::ui::format::{format_member_since, format_publish_date, rating_stars};

pub struct PostArgs {
    pub title: String,
    pub caption: String,
    pub rating: u8,
    pub genre: String,
    pub image: PathBuf,
}

fn client(config: &AppConfig) -> anyhow::Result<BlockingClient> {
    BlockingClient::new(config.api_settings()).context("failed to set up the API client")
}

fn require_session(store: &SessionStore) -> anyhow::Result<Session> {
    match store.load() {
        Some(session) => Ok(session),
        None => bail!("not logged in; run `shelf login <email> <password>` first"),
    }
}

/// Drops the stored session when the backend rejects its token.
fn check_auth<T>(store: &SessionStore, result: Result<T, ApiError>) -> anyhow::Result<T> {
    match result {
        Ok(value) => Ok(value),
        Err(err) if err.is_unauthorized() => {
            if let Err(clear_err) = store.clear() {
                shelf_warn!("failed to remove stored session: {}", clear_err);
            }
            bail!("session expired ({}); log in again", err.message)
        }
        Err(err) => Err(err.into()),
    }
}

fn store_session(config: &AppConfig, session: Session) -> anyhow::Result<()> {
    let store = SessionStore::new(&config.state_dir);
    store.save(&session)?;
    let since = session
        .user
        .created_at
        .as_deref()
        .map(format_member_since)
        .map(|date| format!(" (member since {date})"))
        .unwrap_or_default();
    println!("Logged in as {}{}", session.user.username, since);
    Ok(())
}

pub fn login(config: &AppConfig, email: &str, password: &str) -> anyhow::Result<()> {
    let auth = client(config)?.login(email.trim(), password)?;
    store_session(config, Session::from(auth))
}

pub fn register(
    config: &AppConfig,
    username: &str,
    email: &str,
    password: &str,
) -> anyhow::Result<()> {
    let auth = client(config)?.register(username.trim(), email.trim(), password)?;
    store_session(config, Session::from(auth))
}

pub fn logout(config: &AppConfig) -> anyhow::Result<()> {
    if SessionStore::new(&config.state_dir).clear()? {
        println!("Logged out.");
    } else {
        println!("No stored session.");
    }
    Ok(())
}

pub fn post(config: &AppConfig, args: PostArgs) -> anyhow::Result<()> {
    let store = SessionStore::new(&config.state_dir);
    let session = require_session(&store)?;

    let draft = BookDraft {
        title: args.title,
        caption: args.caption,
        image: args.image.to_string_lossy().into_owned(),
        rating: args.rating,
        genre: args.genre,
    }
    .validated()?;
    let image = load_image_data_url(Path::new(&draft.image))?;

    let request = NewBookRequest {
        title: draft.title,
        caption: draft.caption,
        image,
        rating: draft.rating,
        genre: draft.genre,
    };
    let created = check_auth(
        &store,
        client(config)?.create_book(&session.token, &request),
    )?;
    println!("Shared \"{}\" in {} ({})", created.title, created.genre, created.id);
    Ok(())
}

pub fn mine(config: &AppConfig) -> anyhow::Result<()> {
    let store = SessionStore::new(&config.state_dir);
    let session = require_session(&store)?;
    let records = check_auth(&store, client(config)?.user_books(&session.token))?;

    if records.is_empty() {
        println!("You have not shared any books yet.");
        return Ok(());
    }
    for book in records.into_iter().map(to_book) {
        println!(
            "{}  {}  [{}]  {}",
            book.id,
            book.title,
            book.genre,
            rating_stars(book.rating)
        );
        println!("    Shared on {}", format_publish_date(&book.created_at));
    }
    Ok(())
}

pub fn delete(config: &AppConfig, book_id: &str) -> anyhow::Result<()> {
    let store = SessionStore::new(&config.state_dir);
    let session = require_session(&store)?;
    // 401 here also means "not your book", so the session is kept.
    let message = client(config)?.delete_book(&session.token, book_id)?;
    println!("{message}");
    Ok(())
}

pub fn genres(config: &AppConfig, all: bool) -> anyhow::Result<()> {
    let store = SessionStore::new(&config.state_dir);
    let session = require_session(&store)?;
    let client = client(config)?;

    if !all {
        let active = check_auth(&store, client.active_genres(&session.token))?;
        for name in build_catalog(active) {
            println!("{name}");
        }
        return Ok(());
    }

    // Fixed list when the backend has none.
    let names = match client.all_genres(&session.token) {
        Ok(names) if !names.is_empty() => names,
        Ok(_) => suggested(),
        Err(err) if err.is_unauthorized() => check_auth(&store, Err(err))?,
        Err(err) => {
            shelf_warn!("genre list unavailable: {}", err);
            suggested()
        }
    };
    for name in names {
        println!("{name}");
    }
    Ok(())
}

fn suggested() -> Vec<String> {
    SUGGESTED_GENRES.iter().map(|name| name.to_string()).collect()
}
