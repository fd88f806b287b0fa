use anyhow::Result;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use catalog::load::{load_catalog, load_ratings, DataPaths};
use catalog::{Book, BookId, Catalog, Pager, RatingHistogram, RatingSummary};
use serde::Deserialize;
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Query string of `/books.json`. A page that is not a non-negative integer is rejected with 400.
#[derive(Debug, Deserialize)]
pub struct ListParams {
    #[serde(default)]
    pub page: usize,
    #[serde(default)]
    pub q: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct BookParams {
    #[serde(default)]
    pub title: String,
}

#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<Catalog>,
    pub ratings: Arc<RatingSummary>,
}

impl AppState {
    pub fn new(catalog: Catalog, ratings: RatingSummary) -> Self {
        Self { catalog: Arc::new(catalog), ratings: Arc::new(ratings) }
    }

    /// Load the whole data directory. Any malformed file aborts startup.
    pub fn load(data_dir: &str, page_size: usize) -> Result<Self> {
        let paths = DataPaths::new(data_dir);
        let catalog = load_catalog(&paths)?.with_pager(Pager::new(page_size)?);
        let ratings = load_ratings(&paths)?;
        Ok(Self::new(catalog, ratings))
    }
}

pub fn build_app(data_dir: String, page_size: usize) -> Result<Router> {
    let state = AppState::load(&data_dir, page_size)?;
    Ok(router(state))
}

pub fn router(state: AppState) -> Router {
    // CORS: read CORS_ALLOW_ORIGIN (comma-separated) or allow Any by default
    let cors = match std::env::var("CORS_ALLOW_ORIGIN") {
        Ok(val) => {
            let origins: Vec<_> = val.split(',').filter_map(|s| s.trim().parse().ok()).collect();
            if origins.is_empty() {
                CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any)
            } else {
                CorsLayer::new().allow_origin(AllowOrigin::list(origins)).allow_methods(Any).allow_headers(Any)
            }
        }
        Err(_) => CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any),
    };

    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/books.json", get(list_handler))
        .route("/book", get(recommend_handler))
        .route("/books/:book_id/ratings", get(book_ratings_handler))
        .route("/ratings", get(overall_ratings_handler))
        .with_state(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

pub async fn list_handler(State(state): State<AppState>, Query(params): Query<ListParams>) -> Json<Vec<Arc<Book>>> {
    // A whitespace-only query lists the catalog instead of matching every entry.
    match params.q.as_deref().map(str::trim) {
        Some(q) if !q.is_empty() => Json(state.catalog.search_page(q, params.page)),
        _ => Json(state.catalog.listing(params.page).to_vec()),
    }
}

pub async fn recommend_handler(State(state): State<AppState>, Query(params): Query<BookParams>) -> Json<Vec<Arc<Book>>> {
    let recs = state.catalog.recommendations_for(&params.title);
    tracing::debug!(title = %params.title, count = recs.len(), "recommendations");
    Json(recs)
}

pub async fn book_ratings_handler(
    State(state): State<AppState>,
    Path(book_id): Path<BookId>,
) -> Result<Json<RatingHistogram>, (StatusCode, String)> {
    state
        .ratings
        .for_book(book_id)
        .copied()
        .map(Json)
        .ok_or_else(|| (StatusCode::NOT_FOUND, format!("no ratings for book {book_id}")))
}

pub async fn overall_ratings_handler(State(state): State<AppState>) -> Json<RatingHistogram> {
    Json(state.ratings.overall)
}
