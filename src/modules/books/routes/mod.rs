//! HTTP handlers for the books module.
//!
//! Every handler answers with the `{message, data?}` envelope. How catalog
//! failures become status codes depends on [`ErrorMapping`].

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    routing::{get, post},
    Json, Router,
};
use libris_http::{ApiResponse, AppError};
use libris_kernel::settings::ErrorMapping;

use super::error::CatalogError;
use super::models::{Book, BookPatch, BorrowRequest, NewBook};
use super::service::CatalogService;

/// Shared handler state.
#[derive(Clone)]
pub struct BooksState {
    pub service: Arc<CatalogService>,
    pub error_mapping: ErrorMapping,
}

/// Routes relative to the module mount point (`/api/books`).
pub fn router(state: BooksState) -> Router {
    Router::new()
        .route("/", get(list_books).post(add_book))
        .route("/health", get(health_check))
        .route("/recommendations", get(recommendations))
        .route("/{id}", get(get_book).put(update_book).delete(delete_book))
        .route("/{id}/borrow", post(borrow_book))
        .route("/{id}/return", post(return_book))
        .with_state(state)
}

/// Operations whose failures are translated per [`ErrorMapping`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    Add,
    Update,
    Borrow,
    Return,
}

impl Action {
    /// 404 message used by the legacy mapping for missing or
    /// state-mismatched books.
    fn not_found_message(self) -> &'static str {
        match self {
            Action::Add | Action::Update => "Book not found",
            Action::Borrow => "Book not found or already borrowed",
            Action::Return => "Book not found or not currently borrowed",
        }
    }

    /// Generic 500 message used by the legacy mapping.
    fn failure_message(self) -> &'static str {
        match self {
            Action::Add => "Error adding book",
            Action::Update => "Error updating book",
            Action::Borrow => "Error borrowing book",
            Action::Return => "Error returning book",
        }
    }
}

fn catalog_failure(mapping: ErrorMapping, action: Action, err: CatalogError) -> AppError {
    tracing::warn!(action = ?action, error = %err, "catalog operation rejected");

    match mapping {
        ErrorMapping::Legacy => match err {
            CatalogError::NotFound { .. } | CatalogError::Conflict { .. } => {
                AppError::not_found(action.not_found_message())
            }
            CatalogError::Validation { .. } | CatalogError::DuplicateId { .. } => {
                AppError::internal(action.failure_message())
            }
        },
        ErrorMapping::Strict => match err {
            CatalogError::Validation { .. } => AppError::validation(err.to_string()),
            CatalogError::NotFound { .. } => AppError::not_found(err.to_string()),
            CatalogError::Conflict { .. } | CatalogError::DuplicateId { .. } => {
                AppError::conflict(err.to_string())
            }
        },
    }
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "books module is healthy"
}

async fn list_books(State(state): State<BooksState>) -> ApiResponse<Vec<Book>> {
    ApiResponse::ok("Books retrieved", state.service.list_all())
}

async fn add_book(
    State(state): State<BooksState>,
    payload: Result<Json<NewBook>, JsonRejection>,
) -> Result<ApiResponse<Book>, AppError> {
    let Json(new_book) = payload?;
    let book = state
        .service
        .add(new_book)
        .map_err(|err| catalog_failure(state.error_mapping, Action::Add, err))?;
    Ok(ApiResponse::created("Book added", book))
}

async fn get_book(
    State(state): State<BooksState>,
    Path(id): Path<String>,
) -> Result<ApiResponse<Book>, AppError> {
    let book = state
        .service
        .get_by_id(&id)
        .ok_or_else(|| AppError::not_found("Book not found"))?;
    Ok(ApiResponse::ok("Book retrieved", book))
}

async fn update_book(
    State(state): State<BooksState>,
    Path(id): Path<String>,
    payload: Result<Json<BookPatch>, JsonRejection>,
) -> Result<ApiResponse<Book>, AppError> {
    let Json(patch) = payload?;
    let book = state
        .service
        .update(&id, patch)
        .map_err(|err| catalog_failure(state.error_mapping, Action::Update, err))?;
    Ok(ApiResponse::ok("Book updated", book))
}

async fn delete_book(
    State(state): State<BooksState>,
    Path(id): Path<String>,
) -> Result<ApiResponse<()>, AppError> {
    if state.service.delete(&id) {
        Ok(ApiResponse::message("Book deleted"))
    } else {
        Err(AppError::not_found("Book not found"))
    }
}

async fn borrow_book(
    State(state): State<BooksState>,
    Path(id): Path<String>,
    payload: Result<Json<BorrowRequest>, JsonRejection>,
) -> Result<ApiResponse<Book>, AppError> {
    let Json(request) = payload?;
    let borrower_id = request.borrower_id.unwrap_or_default();
    let book = state
        .service
        .borrow_book(&id, &borrower_id)
        .map_err(|err| catalog_failure(state.error_mapping, Action::Borrow, err))?;
    Ok(ApiResponse::ok("Book borrowed", book))
}

async fn return_book(
    State(state): State<BooksState>,
    Path(id): Path<String>,
) -> Result<ApiResponse<()>, AppError> {
    state
        .service
        .return_book(&id)
        .map_err(|err| catalog_failure(state.error_mapping, Action::Return, err))?;
    Ok(ApiResponse::message("Book returned"))
}

async fn recommendations(State(state): State<BooksState>) -> ApiResponse<Vec<Book>> {
    ApiResponse::ok("Recommendations retrieved", state.service.recommendations())
}
