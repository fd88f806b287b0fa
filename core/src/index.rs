use serde::{Deserialize, Serialize};
use std::collections::HashMap;

pub type BookId = u32;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    pub id: BookId,
    pub authors: Vec<String>,
    /// Zero when the source row left the year blank.
    pub publication_year: i32,
    pub original_title: String,
    pub title: String,
    pub average_rating: f64,
    pub image_url: String,
}

/// Maps every searchable string (title, original title, author) to the books carrying it.
///
/// Built once from the final catalog order and never mutated. Entries hold book ids rather
/// than positions so a later reordering of the catalog cannot make them point at the wrong slot.
#[derive(Debug, Default)]
pub struct SearchIndex {
    /// Searchable string -> book ids in catalog order. A book appears twice under a key
    /// when its title and original title are equal.
    pub postings: HashMap<String, Vec<BookId>>,
    /// Every searchable string in catalog order, `[title, original_title, authors..]` per book.
    /// Order is the tie-break for equally ranked matches.
    pub vocabulary: Vec<String>,
    /// `vocabulary` case- and accent-folded, position for position.
    pub folded: Vec<String>,
}

impl SearchIndex {
    pub fn new() -> Self { Self::default() }

    pub fn build<'a, I>(books: I) -> Self
    where
        I: IntoIterator<Item = &'a Book>,
    {
        let mut index = Self::new();
        for book in books {
            index.insert(&book.title, book.id);
            index.insert(&book.original_title, book.id);
            for author in &book.authors {
                index.insert(author, book.id);
            }
        }
        index
    }

    fn insert(&mut self, key: &str, id: BookId) {
        self.postings.entry(key.to_string()).or_default().push(id);
        self.vocabulary.push(key.to_string());
        self.folded.push(crate::fuzzy::fold(key));
    }

    /// Book ids registered under `key`, empty if the key was never indexed.
    pub fn lookup(&self, key: &str) -> &[BookId] {
        self.postings.get(key).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn num_keys(&self) -> usize { self.postings.len() }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn book(id: BookId, title: &str, original: &str, authors: &[&str]) -> Book {
        Book {
            id,
            title: title.into(),
            original_title: original.into(),
            authors: authors.iter().map(|a| a.to_string()).collect(),
            ..Default::default()
        }
    }

    #[test]
    fn vocabulary_follows_catalog_order() {
        let books = [
            book(1, "Dune", "Dune", &["Frank Herbert"]),
            book(2, "Emma", "Emma.", &["Jane Austen", "Fiona Stafford"]),
        ];
        let index = SearchIndex::build(&books);
        assert_eq!(
            index.vocabulary,
            vec!["Dune", "Dune", "Frank Herbert", "Emma", "Emma.", "Jane Austen", "Fiona Stafford"]
        );
        assert_eq!(index.folded.len(), index.vocabulary.len());
        assert_eq!(index.folded[2], "frank herbert");
    }

    #[test]
    fn shared_keys_accumulate_ids() {
        let books = [
            book(1, "Dune", "Dune", &["Frank Herbert"]),
            book(3, "Dune Messiah", "Dune Messiah", &["Frank Herbert"]),
        ];
        let index = SearchIndex::build(&books);
        // title and original title both register the book
        assert_eq!(index.lookup("Dune"), &[1, 1]);
        assert_eq!(index.lookup("Frank Herbert"), &[1, 3]);
        assert!(index.lookup("frank herbert").is_empty());
        assert_eq!(index.num_keys(), 3);
    }
}
