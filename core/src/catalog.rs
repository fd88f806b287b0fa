use crate::index::{Book, BookId, SearchIndex};
use crate::pager::Pager;
use crate::search;
use anyhow::{bail, Result};
use std::borrow::Borrow;
use std::collections::HashMap;
use std::sync::Arc;

/// Externally curated inputs applied once when the catalog is built.
#[derive(Debug, Clone, Default)]
pub struct Curation {
    /// Title -> popularity score; sets the default listing order (descending).
    pub bias: HashMap<String, f64>,
    /// Title -> recommended titles, in display order.
    pub recommendations: HashMap<String, Vec<String>>,
}

impl Curation {
    /// Titles without an entry score 0.0.
    pub fn bias_of(&self, title: &str) -> f64 {
        self.bias.get(title).copied().unwrap_or(0.0)
    }
}

/// Stable sort by descending bias. Sorting an already sorted slice leaves it unchanged.
pub fn sort_by_bias<T: Borrow<Book>>(books: &mut [T], curation: &Curation) {
    books.sort_by(|a, b| {
        let (a, b) = (a.borrow(), b.borrow());
        curation.bias_of(&b.title).total_cmp(&curation.bias_of(&a.title))
    });
}

/// The immutable book corpus with its search index and recommendation table.
///
/// Built once before serving; every query method takes `&self` and never fails, so a
/// `Catalog` can be shared across threads behind an `Arc` without locking.
#[derive(Debug)]
pub struct Catalog {
    books: Vec<Arc<Book>>,
    by_id: HashMap<BookId, Arc<Book>>,
    /// Title collisions keep the last book inserted.
    by_title: HashMap<String, Arc<Book>>,
    index: SearchIndex,
    recommendations: HashMap<String, Vec<String>>,
    placeholder: Arc<Book>,
    pager: Pager,
}

impl Catalog {
    pub fn build(books: Vec<Book>, curation: &Curation) -> Result<Self> {
        let mut books: Vec<Arc<Book>> = books.into_iter().map(Arc::new).collect();
        sort_by_bias(&mut books, curation);

        let mut by_id = HashMap::with_capacity(books.len());
        let mut by_title = HashMap::with_capacity(books.len());
        for book in &books {
            if by_id.insert(book.id, Arc::clone(book)).is_some() {
                bail!("duplicate book id {}", book.id);
            }
            by_title.insert(book.title.clone(), Arc::clone(book));
        }

        // Built from the final order so vocabulary tie-breaks follow the listing order.
        let index = SearchIndex::build(books.iter().map(|b| b.as_ref()));
        tracing::info!(num_books = books.len(), num_keys = index.num_keys(), "catalog built");

        Ok(Self {
            books,
            by_id,
            by_title,
            index,
            recommendations: curation.recommendations.clone(),
            placeholder: Arc::new(Book::default()),
            pager: Pager::default(),
        })
    }

    pub fn with_pager(mut self, pager: Pager) -> Self {
        self.pager = pager;
        self
    }

    pub fn books(&self) -> &[Arc<Book>] { &self.books }
    pub fn len(&self) -> usize { self.books.len() }
    pub fn is_empty(&self) -> bool { self.books.is_empty() }
    pub fn index(&self) -> &SearchIndex { &self.index }

    pub fn get(&self, id: BookId) -> Option<&Arc<Book>> { self.by_id.get(&id) }

    pub fn by_title(&self, title: &str) -> Option<&Arc<Book>> { self.by_title.get(title) }

    /// Every book matching `term`, best match first, each at most once.
    pub fn search(&self, term: &str) -> Vec<Arc<Book>> {
        search::search(term, &self.index, &self.by_id)
    }

    /// Page of any source using this catalog's page size.
    pub fn page<'a>(&self, source: &'a [Arc<Book>], page: usize) -> &'a [Arc<Book>] {
        self.pager.page(source, page)
    }

    /// Page of the full catalog in bias order.
    pub fn listing(&self, page: usize) -> &[Arc<Book>] {
        self.pager.page(&self.books, page)
    }

    pub fn search_page(&self, term: &str, page: usize) -> Vec<Arc<Book>> {
        let results = self.search(term);
        self.pager.page(&results, page).to_vec()
    }

    pub fn recommended_titles(&self, title: &str) -> &[String] {
        self.recommendations.get(title).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Books recommended for `title`, resolved by exact title at call time.
    /// Titles missing from the catalog resolve to a zero-value placeholder.
    pub fn recommendations_for(&self, title: &str) -> Vec<Arc<Book>> {
        self.recommended_titles(title)
            .iter()
            .map(|t| Arc::clone(self.by_title.get(t).unwrap_or(&self.placeholder)))
            .collect()
    }
}
