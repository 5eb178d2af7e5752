use anyhow::{Result, bail};
use clap::{Parser, Subcommand};
use libris::book::{Book, BookFields, BookId, Bookshelf, StorageSlot};
use libris::{App, Config};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "libris")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Add a book to your shelf
    Add {
        /// Book title
        title: String,
        /// Author name
        #[arg(short, long)]
        author: String,
        /// Publication year
        #[arg(short, long)]
        year: i32,
        /// Mark the book as already finished
        #[arg(long)]
        finished: bool,
    },
    /// List both shelves
    List,
    /// Search titles, case-insensitively
    Search {
        /// Substring to look for
        query: String,
    },
    /// Flip a book between reading and finished
    Toggle {
        /// Book id (see list)
        id: BookId,
    },
    /// Edit a book; omitted flags keep their current values
    Edit {
        /// Book id (see list)
        id: BookId,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        author: Option<String>,
        #[arg(long)]
        year: Option<i32>,
        #[arg(long)]
        finished: Option<bool>,
    },
    /// Remove a book from the shelf
    Remove {
        /// Book id (see list)
        id: BookId,
    },
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "libris=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Some(command) => run_command(command)?,
        None => {
            // Launch TUI
            let config = Config::load()?;
            let mut app = App::new(config)?;
            app.run()?;
        }
    }

    Ok(())
}

fn run_command(command: Commands) -> Result<()> {
    let config = Config::load()?;
    let slot = StorageSlot::new(config.storage_dir()?);
    if !slot.is_available() {
        bail!("data directory is not writable: {}", slot.slot_path().display());
    }
    let mut shelf = Bookshelf::open(slot);

    match command {
        Commands::Add { title, author, year, finished } => {
            let id = shelf.add(title.clone(), author, year, finished)?;
            println!("Added '{title}' (id {id})");
        }
        Commands::List => {
            print_books("Reading", shelf.reading());
            println!();
            print_books("Finished", shelf.finished());
        }
        Commands::Search { query } => {
            let matches: Vec<&Book> = shelf.search(&query).collect();
            if matches.is_empty() {
                println!("No books match '{query}'");
            } else {
                for book in matches {
                    println!("{}", book_line(book));
                }
            }
        }
        Commands::Toggle { id } => {
            if !shelf.toggle_complete(id)? {
                bail!("no book with id {id}");
            }
            if let Some(book) = shelf.find(id) {
                let status = if book.is_complete { "finished" } else { "reading" };
                println!("Marked '{}' as {}", book.title, status);
            }
        }
        Commands::Edit { id, title, author, year, finished } => {
            let Some(book) = shelf.find(id) else {
                bail!("no book with id {id}");
            };
            let fields = BookFields {
                title: title.unwrap_or_else(|| book.title.clone()),
                author: author.unwrap_or_else(|| book.author.clone()),
                year: year.unwrap_or(book.year),
                is_complete: finished.unwrap_or(book.is_complete),
            };
            let new_title = fields.title.clone();
            shelf.update(id, fields)?;
            println!("Updated '{new_title}'");
        }
        Commands::Remove { id } => {
            let Some(title) = shelf.find(id).map(|book| book.title.clone()) else {
                bail!("no book with id {id}");
            };
            shelf.remove(id)?;
            println!("Removed '{title}'");
        }
    }

    Ok(())
}

fn print_books<'a>(heading: &str, books: impl Iterator<Item = &'a Book>) {
    println!("{heading}:");
    let mut any = false;
    for book in books {
        any = true;
        println!("{}", book_line(book));
    }
    if !any {
        println!("  (none)");
    }
}

fn book_line(book: &Book) -> String {
    format!("  {:>13}  {} by {} ({})", book.id, book.title, book.author, book.year)
}
