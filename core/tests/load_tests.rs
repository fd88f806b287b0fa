use catalog::load::{load_books_csv, load_catalog, load_ratings, DataPaths};
use std::fs;
use tempfile::tempdir;

const BOOKS_HEADER: &str = "book_id,goodreads_book_id,best_book_id,work_id,books_count,isbn,isbn13,authors,original_publication_year,original_title,title,language_code,average_rating,ratings_count,work_ratings_count,work_text_reviews_count,ratings_1,ratings_2,ratings_3,ratings_4,ratings_5,image_url,small_image_url";

fn row(id: &str, authors: &str, year: &str, original: &str, title: &str, rating: &str) -> String {
    format!("{id},1,1,1,1,isbn,isbn13,\"{authors}\",{year},\"{original}\",\"{title}\",eng,{rating},0,0,0,0,0,0,0,0,https://img/{id}.jpg,small")
}

fn write_data_dir(dir: &std::path::Path, rows: &[String]) {
    let mut csv = String::from(BOOKS_HEADER);
    for r in rows {
        csv.push('\n');
        csv.push_str(r);
    }
    csv.push('\n');
    fs::write(dir.join("books_clean.csv"), csv).unwrap();
    fs::write(dir.join("bias.json"), r#"{"Foundation": 2.0, "Dune": 1.0}"#).unwrap();
    fs::write(dir.join("recommendations.json"), r#"{"Dune": ["Foundation", "Missing"]}"#).unwrap();
}

#[test]
fn parses_positional_columns() {
    let dir = tempdir().unwrap();
    write_data_dir(
        dir.path(),
        &[
            row("1", "Frank Herbert", "1965.0", "Dune", "Dune", "4.22"),
            row("2", "Isaac Asimov, Someone Else", "", "", "Foundation", "4.17"),
        ],
    );
    let books = load_books_csv(&DataPaths::new(dir.path()).books()).unwrap();
    assert_eq!(books.len(), 2);
    assert_eq!(books[0].id, 1);
    assert_eq!(books[0].publication_year, 1965);
    assert_eq!(books[0].average_rating, 4.22);
    assert_eq!(books[0].image_url, "https://img/1.jpg");
    assert_eq!(books[1].authors, vec!["Isaac Asimov", "Someone Else"]);
    assert_eq!(books[1].publication_year, 0);
    assert_eq!(books[1].original_title, "");
}

#[test]
fn malformed_numbers_are_fatal() {
    for bad in [
        row("x1", "A", "2000", "T", "T", "4.0"),
        row("1", "A", "nineteen", "T", "T", "4.0"),
        row("1", "A", "2000", "T", "T", "great"),
    ] {
        let dir = tempdir().unwrap();
        write_data_dir(dir.path(), &[bad]);
        let err = load_books_csv(&DataPaths::new(dir.path()).books()).unwrap_err();
        assert!(format!("{err:#}").contains("line 2"), "{err:#}");
    }
}

#[test]
fn short_rows_are_fatal() {
    let dir = tempdir().unwrap();
    let books = DataPaths::new(dir.path()).books();

    // consistent with its own header but missing the positional columns
    fs::write(&books, "a,b,c\n1,2,3\n").unwrap();
    let err = format!("{:#}", load_books_csv(&books).unwrap_err());
    assert!(err.contains("line 2") && err.contains("missing column"), "{err}");

    // fewer fields than the header
    fs::write(&books, format!("{BOOKS_HEADER}\n1,2,3\n")).unwrap();
    let err = format!("{:#}", load_books_csv(&books).unwrap_err());
    assert!(err.contains("line 2"), "{err}");
}

#[test]
fn builds_catalog_from_directory() {
    let dir = tempdir().unwrap();
    write_data_dir(
        dir.path(),
        &[
            row("1", "Frank Herbert", "1965", "Dune", "Dune", "4.22"),
            row("2", "Isaac Asimov", "1951", "Foundation", "Foundation", "4.17"),
            row("3", "Jane Austen", "1815", "Emma", "Emma", "4.0"),
        ],
    );
    let paths = DataPaths::new(dir.path());
    let catalog = load_catalog(&paths).unwrap();
    let order: Vec<u32> = catalog.books().iter().map(|b| b.id).collect();
    assert_eq!(order, vec![2, 1, 3]);
    let recs = catalog.recommendations_for("Dune");
    assert_eq!(recs[0].title, "Foundation");
    assert_eq!(recs[1].id, 0);

    // no ratings file present
    let summary = load_ratings(&paths).unwrap();
    assert_eq!(summary.overall.total(), 0);
}

#[test]
fn loads_rating_histograms() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("ratings_clean.csv"), "user_id,book_id,rating\n1,10,5\n2,10,3\n3,11,5\n").unwrap();
    let summary = load_ratings(&DataPaths::new(dir.path())).unwrap();
    assert_eq!(summary.for_book(10).unwrap().buckets(), [0, 0, 1, 0, 1]);
    assert_eq!(summary.overall.buckets(), [0, 0, 1, 0, 2]);

    fs::write(dir.path().join("ratings_clean.csv"), "user_id,book_id,rating\n1,10,7\n").unwrap();
    assert!(load_ratings(&DataPaths::new(dir.path())).is_err());
}

#[test]
fn missing_curation_file_is_fatal() {
    let dir = tempdir().unwrap();
    write_data_dir(dir.path(), &[row("1", "A", "2000", "T", "T", "4.0")]);
    fs::remove_file(dir.path().join("bias.json")).unwrap();
    assert!(load_catalog(&DataPaths::new(dir.path())).is_err());
}
