use std::io::{self, BufRead, Write};
use std::sync::mpsc;
use std::thread;

use anyhow::{bail, Context};
use shelf_core::{update, FeedState, FeedViewModel, GenreFilter, Msg};
use shelf_logging::{shelf_debug, shelf_info};

use super::config::AppConfig;
use super::effects::{EffectRunner, Flow};
use super::session::SessionStore;
use super::ui;

const HELP: &str =
    "commands: more (or Enter), refresh, genre <name>, genre (All), genres, retry, quit";

/// Input to the feed loop: core messages from the user or the engine, or a request to stop.
#[derive(Debug, PartialEq)]
pub(crate) enum LoopEvent {
    Msg(Msg),
    Quit,
}

pub fn run_feed(config: &AppConfig, genre: Option<String>) -> anyhow::Result<()> {
    let store = SessionStore::new(&config.state_dir);
    let Some(session) = store.load() else {
        bail!("not logged in; run `shelf login <email> <password>` first");
    };
    shelf_info!("feed started for {}", session.user.username);

    let (loop_tx, loop_rx) = mpsc::channel::<LoopEvent>();
    let runner = EffectRunner::new(config.api_settings(), session.token, loop_tx.clone())
        .context("failed to start the network engine")?;
    spawn_input_reader(loop_tx);

    let filter = genre
        .as_deref()
        .map(GenreFilter::from_label)
        .unwrap_or_default();
    let mut state = FeedState::with_page_size(config.page_size).with_filter(filter);
    println!("{HELP}");

    let mut event = LoopEvent::Msg(Msg::Mounted);
    loop {
        let msg = match event {
            LoopEvent::Msg(msg) => msg,
            LoopEvent::Quit => break,
        };
        let (next, effects) = update(state, msg);
        state = next;
        if state.consume_dirty() {
            print_frame(&state.view());
        }
        if runner.enqueue(effects) == Flow::SessionExpired {
            if let Err(err) = store.clear() {
                eprintln!("Failed to remove stored session: {err}");
            }
            eprintln!("Your session has expired. Log in again with `shelf login`.");
            return Ok(());
        }

        event = match loop_rx.recv() {
            Ok(event) => event,
            Err(_) => break,
        };
    }
    shelf_debug!("feed loop finished");
    Ok(())
}

fn spawn_input_reader(loop_tx: mpsc::Sender<LoopEvent>) {
    thread::spawn(move || {
        let stdin = io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else { break };
            match parse_command(&line) {
                Some(LoopEvent::Quit) => break,
                Some(event) => {
                    if loop_tx.send(event).is_err() {
                        return;
                    }
                }
                None => println!("{HELP}"),
            }
        }
        let _ = loop_tx.send(LoopEvent::Quit);
    });
}

/// Maps one line of user input to a loop event. `None` for unknown input.
pub(crate) fn parse_command(line: &str) -> Option<LoopEvent> {
    let line = line.trim();
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };
    let msg = match word.to_ascii_lowercase().as_str() {
        "" | "more" | "m" => Msg::EndReached,
        "refresh" | "r" => Msg::RefreshRequested,
        "genre" | "g" => Msg::FilterSelected(rest.to_string()),
        "genres" => Msg::GenresRequested,
        "retry" => Msg::RetryClicked,
        "quit" | "q" | "exit" => return Some(LoopEvent::Quit),
        _ => return None,
    };
    Some(LoopEvent::Msg(msg))
}

fn print_frame(view: &FeedViewModel) {
    let mut out = io::stdout().lock();
    let _ = writeln!(out, "{}", "-".repeat(48));
    for line in ui::render::render(view) {
        let _ = writeln!(out, "{line}");
    }
    let _ = out.flush();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn enter_and_more_paginate() {
        assert_eq!(parse_command(""), Some(LoopEvent::Msg(Msg::EndReached)));
        assert_eq!(parse_command("  MORE "), Some(LoopEvent::Msg(Msg::EndReached)));
    }

    #[test]
    fn genre_takes_the_rest_of_the_line() {
        assert_eq!(
            parse_command("genre Science Fiction"),
            Some(LoopEvent::Msg(Msg::FilterSelected("Science Fiction".into())))
        );
        assert_eq!(
            parse_command("genre"),
            Some(LoopEvent::Msg(Msg::FilterSelected(String::new())))
        );
    }

    #[test]
    fn control_words() {
        assert_eq!(parse_command("refresh"), Some(LoopEvent::Msg(Msg::RefreshRequested)));
        assert_eq!(parse_command("retry"), Some(LoopEvent::Msg(Msg::RetryClicked)));
        assert_eq!(parse_command("genres"), Some(LoopEvent::Msg(Msg::GenresRequested)));
        assert_eq!(parse_command("q"), Some(LoopEvent::Quit));
        assert_eq!(parse_command("dance"), None);
    }
}
