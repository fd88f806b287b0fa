use crate::fuzzy::{rank_prefolded, Rank};
use crate::index::{Book, BookId, SearchIndex};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

/// Resolve ranked vocabulary matches into books, keeping the first occurrence of each book.
///
/// An author name shared by several books expands to all of them, in index order, at the
/// rank of that name.
pub fn assemble(ranks: &[Rank<'_>], index: &SearchIndex, books: &HashMap<BookId, Arc<Book>>) -> Vec<Arc<Book>> {
    let mut emitted: HashSet<BookId> = HashSet::new();
    let mut results = Vec::new();
    for rank in ranks {
        for &id in index.lookup(rank.target) {
            if !emitted.insert(id) {
                continue;
            }
            let book = books.get(&id);
            debug_assert!(book.is_some(), "search index references unknown book {id}");
            if let Some(book) = book {
                results.push(Arc::clone(book));
            }
        }
    }
    results
}

/// Fuzzy-match `term` against the index vocabulary and assemble the deduplicated result list.
pub fn search(term: &str, index: &SearchIndex, books: &HashMap<BookId, Arc<Book>>) -> Vec<Arc<Book>> {
    let ranks = rank_prefolded(term, &index.vocabulary, &index.folded);
    let results = assemble(&ranks, index, books);
    tracing::debug!(term, matched = ranks.len(), hits = results.len(), "search");
    results
}
