use std::path::PathBuf;

use clap::{Parser, Subcommand};
use shelf_core::DEFAULT_DRAFT_RATING;

mod platform;

#[derive(Debug, Parser)]
#[command(name = "shelf", version, about = "Browse and share book recommendations")]
struct Args {
    /// RON config file (defaults to ./shelfshare.ron).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Interactive recommendation feed.
    Feed {
        /// Start on this genre instead of "All".
        #[arg(long)]
        genre: Option<String>,
    },
    Login {
        email: String,
        password: String,
    },
    Register {
        username: String,
        email: String,
        password: String,
    },
    Logout,
    /// Share a book recommendation.
    Post {
        #[arg(long)]
        title: String,
        #[arg(long)]
        caption: String,
        #[arg(long, default_value_t = DEFAULT_DRAFT_RATING)]
        rating: u8,
        #[arg(long)]
        genre: String,
        /// Cover image on disk; sent as a data URL.
        #[arg(long)]
        image: PathBuf,
    },
    /// List the books you have shared.
    Mine,
    Delete {
        id: String,
    },
    /// List genres. Only genres with books unless --all.
    Genres {
        #[arg(long)]
        all: bool,
    },
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let (config, source) = platform::config::load(args.config.as_deref());
    platform::logging::initialize(config.log_destination);
    source.log();

    match args.command.unwrap_or(Command::Feed { genre: None }) {
        Command::Feed { genre } => platform::app::run_feed(&config, genre),
        Command::Login { email, password } => platform::commands::login(&config, &email, &password),
        Command::Register {
            username,
            email,
            password,
        } => platform::commands::register(&config, &username, &email, &password),
        Command::Logout => platform::commands::logout(&config),
        Command::Post {
            title,
            caption,
            rating,
            genre,
            image,
        } => platform::commands::post(
            &config,
            platform::commands::PostArgs {
                title,
                caption,
                rating,
                genre,
                image,
            },
        ),
        Command::Mine => platform::commands::mine(&config),
        Command::Delete { id } => platform::commands::delete(&config, &id),
        Command::Genres { all } => platform::commands::genres(&config, all),
    }
}
