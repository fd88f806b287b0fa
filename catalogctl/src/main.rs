use anyhow::{Context, Result};
use catalog::load::{load_catalog, load_ratings, DataPaths};
use catalog::{BookId, Catalog, Pager, DEFAULT_PAGE_SIZE};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "catalogctl")]
#[command(about = "Validate a book catalog data directory and query it offline", long_about = None)]
struct Cli {
    /// Data directory holding books_clean.csv, bias.json, recommendations.json and ratings_clean.csv
    #[arg(long, default_value = "./data")]
    data: String,
    /// Books per page
    #[arg(long, default_value_t = DEFAULT_PAGE_SIZE)]
    page_size: usize,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load every data file and report what was found
    Check,
    /// Print a page of the catalog in default order
    List {
        #[arg(long, default_value_t = 0)]
        page: usize,
    },
    /// Print a page of search results
    Search {
        #[arg(long)]
        q: String,
        #[arg(long, default_value_t = 0)]
        page: usize,
    },
    /// Print the recommendations for a title
    Recommend {
        #[arg(long)]
        title: String,
    },
    /// Print a book's rating histogram, or the catalog-wide one
    Ratings {
        #[arg(long)]
        book_id: Option<BookId>,
    },
}

#[derive(Serialize)]
struct CheckReport {
    books: usize,
    search_keys: usize,
    vocabulary: usize,
    rated_books: usize,
    ratings: u64,
}

fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).with_writer(std::io::stderr).init();
    let cli = Cli::parse();
    let paths = DataPaths::new(&cli.data);

    match cli.command {
        Commands::Check => {
            let catalog = open_catalog(&paths, cli.page_size)?;
            let ratings = load_ratings(&paths)?;
            print_json(&CheckReport {
                books: catalog.len(),
                search_keys: catalog.index().num_keys(),
                vocabulary: catalog.index().vocabulary.len(),
                rated_books: ratings.per_book.len(),
                ratings: ratings.overall.total(),
            })
        }
        Commands::List { page } => {
            let catalog = open_catalog(&paths, cli.page_size)?;
            print_json(&catalog.listing(page))
        }
        Commands::Search { q, page } => {
            let catalog = open_catalog(&paths, cli.page_size)?;
            print_json(&catalog.search_page(&q, page))
        }
        Commands::Recommend { title } => {
            let catalog = open_catalog(&paths, cli.page_size)?;
            print_json(&catalog.recommendations_for(&title))
        }
        Commands::Ratings { book_id } => {
            let ratings = load_ratings(&paths)?;
            match book_id {
                Some(id) => {
                    let histogram = ratings.for_book(id).with_context(|| format!("no ratings for book {id}"))?;
                    print_json(histogram)
                }
                None => print_json(&ratings.overall),
            }
        }
    }
}

fn open_catalog(paths: &DataPaths, page_size: usize) -> Result<Catalog> {
    let pager = Pager::new(page_size)?;
    let catalog = load_catalog(paths).with_context(|| format!("load catalog from {}", paths.root.display()))?;
    Ok(catalog.with_pager(pager))
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
