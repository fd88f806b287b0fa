use crate::catalog::{Catalog, Curation};
use crate::index::{Book, BookId};
use crate::ratings::{Rating, RatingSummary};
use anyhow::{anyhow, Context, Result};
use csv::StringRecord;
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

// books_clean.csv column positions
const COL_ID: usize = 0;
const COL_AUTHORS: usize = 7;
const COL_YEAR: usize = 8;
const COL_ORIGINAL_TITLE: usize = 9;
const COL_TITLE: usize = 10;
const COL_AVERAGE_RATING: usize = 12;
const COL_IMAGE_URL: usize = 21;

// ratings_clean.csv column positions
const COL_USER_ID: usize = 0;
const COL_BOOK_ID: usize = 1;
const COL_RATING: usize = 2;

/// File layout of a catalog data directory.
pub struct DataPaths {
    pub root: PathBuf,
}

impl DataPaths {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self { root: root.as_ref().to_path_buf() }
    }
    pub fn books(&self) -> PathBuf { self.root.join("books_clean.csv") }
    pub fn bias(&self) -> PathBuf { self.root.join("bias.json") }
    pub fn recommendations(&self) -> PathBuf { self.root.join("recommendations.json") }
    pub fn ratings(&self) -> PathBuf { self.root.join("ratings_clean.csv") }
}

fn column(record: &StringRecord, i: usize) -> Result<&str> {
    record.get(i).ok_or_else(|| anyhow!("missing column {i}"))
}

fn parse_book(record: &StringRecord) -> Result<Book> {
    let raw_id = column(record, COL_ID)?;
    let id: BookId = raw_id.parse().with_context(|| format!("invalid book id {raw_id:?}"))?;
    // Years may be blank or written as floats ("1997.0").
    let raw_year = column(record, COL_YEAR)?.trim();
    let publication_year = if raw_year.is_empty() {
        0
    } else {
        raw_year
            .parse::<f64>()
            .with_context(|| format!("invalid publication year {raw_year:?}"))? as i32
    };
    let raw_rating = column(record, COL_AVERAGE_RATING)?;
    let average_rating: f64 = raw_rating
        .parse()
        .with_context(|| format!("invalid average rating {raw_rating:?}"))?;
    // Names are trimmed and blanks dropped so "A, B" indexes "B" rather than " B".
    let authors = column(record, COL_AUTHORS)?
        .split(',')
        .map(str::trim)
        .filter(|a| !a.is_empty())
        .map(String::from)
        .collect();
    Ok(Book {
        id,
        authors,
        publication_year,
        original_title: column(record, COL_ORIGINAL_TITLE)?.to_string(),
        title: column(record, COL_TITLE)?.to_string(),
        average_rating,
        image_url: column(record, COL_IMAGE_URL)?.to_string(),
    })
}

fn parse_rating(record: &StringRecord) -> Result<Rating> {
    let field = |i: usize, name: &str| -> Result<u32> {
        let raw = column(record, i)?;
        raw.parse().with_context(|| format!("invalid {name} {raw:?}"))
    };
    let rating = field(COL_RATING, "rating")?;
    Ok(Rating {
        user_id: field(COL_USER_ID, "user id")?,
        book_id: field(COL_BOOK_ID, "book id")?,
        rating: u8::try_from(rating).with_context(|| format!("invalid rating {rating}"))?,
    })
}

/// Read a headed CSV file, converting each row with `parse`. The first bad row aborts the load.
fn read_csv<T>(path: &Path, parse: fn(&StringRecord) -> Result<T>) -> Result<Vec<T>> {
    let mut reader = csv::Reader::from_path(path).with_context(|| format!("open {}", path.display()))?;
    let mut out = Vec::new();
    for (i, record) in reader.records().enumerate() {
        // line 1 is the header
        let line = i + 2;
        let record = record.with_context(|| format!("{}: line {line}", path.display()))?;
        out.push(parse(&record).with_context(|| format!("{}: line {line}", path.display()))?);
    }
    Ok(out)
}

pub fn load_books_csv(path: &Path) -> Result<Vec<Book>> {
    let books = read_csv(path, parse_book)?;
    tracing::info!(num_books = books.len(), path = %path.display(), "loaded books");
    Ok(books)
}

pub fn load_ratings_csv(path: &Path) -> Result<Vec<Rating>> {
    let ratings = read_csv(path, parse_rating)?;
    tracing::info!(num_ratings = ratings.len(), path = %path.display(), "loaded ratings");
    Ok(ratings)
}

fn load_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let f = File::open(path).with_context(|| format!("open {}", path.display()))?;
    let value = serde_json::from_reader(BufReader::new(f)).with_context(|| format!("parse {}", path.display()))?;
    Ok(value)
}

pub fn load_bias(path: &Path) -> Result<HashMap<String, f64>> {
    load_json(path)
}

pub fn load_recommendations(path: &Path) -> Result<HashMap<String, Vec<String>>> {
    load_json(path)
}

pub fn load_curation(paths: &DataPaths) -> Result<Curation> {
    let bias = load_bias(&paths.bias())?;
    let recommendations = load_recommendations(&paths.recommendations())?;
    tracing::info!(bias = bias.len(), recommendations = recommendations.len(), "loaded curation");
    Ok(Curation { bias, recommendations })
}

/// Load the books and curation files of a data directory and build the catalog.
pub fn load_catalog(paths: &DataPaths) -> Result<Catalog> {
    let books = load_books_csv(&paths.books())?;
    let curation = load_curation(paths)?;
    Catalog::build(books, &curation)
}

/// Rating histograms for a data directory; empty when it has no ratings file.
pub fn load_ratings(paths: &DataPaths) -> Result<RatingSummary> {
    let path = paths.ratings();
    if !path.exists() {
        tracing::info!(path = %path.display(), "no ratings file, histograms empty");
        return Ok(RatingSummary::default());
    }
    let ratings = load_ratings_csv(&path)?;
    RatingSummary::from_ratings(&ratings).with_context(|| format!("aggregate {}", path.display()))
}
