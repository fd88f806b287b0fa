pub mod catalog;
pub mod fuzzy;
pub mod index;
pub mod load;
pub mod pager;
pub mod ratings;
pub mod search;

pub use catalog::{Catalog, Curation};
pub use index::{Book, BookId, SearchIndex};
pub use pager::{Pager, DEFAULT_PAGE_SIZE};
pub use ratings::{Rating, RatingHistogram, RatingSummary};
