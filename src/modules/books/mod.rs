//! Books module: an in-memory catalog with a borrow/return cycle.

pub mod error;
pub mod models;
mod openapi;
pub mod routes;
pub mod service;
pub mod store;

use std::sync::Arc;

use async_trait::async_trait;
use axum::Router;
use libris_kernel::{settings::CatalogSettings, InitCtx, Module};

pub use error::{CatalogError, LoanConflict};
pub use models::{AvailabilityStatus, Book, BookPatch, BorrowRequest, NewBook};
pub use routes::BooksState;
pub use service::CatalogService;
pub use store::{CatalogStore, InMemoryCatalog};

/// Books module wiring the catalog service into the kernel lifecycle
pub struct BooksModule {
    state: BooksState,
}

impl BooksModule {
    pub fn new(state: BooksState) -> Self {
        Self { state }
    }

    pub fn from_settings(settings: &CatalogSettings) -> Self {
        Self::new(BooksState {
            service: Arc::new(CatalogService::from_settings(settings)),
            error_mapping: settings.error_mapping,
        })
    }
}

#[async_trait]
impl Module for BooksModule {
    fn name(&self) -> &'static str {
        "books"
    }

    async fn init(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(
            module = self.name(),
            environment = ?ctx.settings.environment,
            books = self.state.service.len(),
            loan_period_days = self.state.service.loan_period().whole_days(),
            error_mapping = ?self.state.error_mapping,
            "books module initialized"
        );
        Ok(())
    }

    fn routes(&self) -> Router {
        routes::router(self.state.clone())
    }

    fn openapi(&self) -> Option<serde_json::Value> {
        Some(openapi::fragment())
    }

    async fn start(&self, _ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "books module started");
        Ok(())
    }

    async fn stop(&self) -> anyhow::Result<()> {
        tracing::info!(
            module = self.name(),
            books = self.state.service.len(),
            "books module stopped; in-memory catalog discarded"
        );
        Ok(())
    }
}

/// Create a new instance of the books module
pub fn create_module(settings: &CatalogSettings) -> Arc<dyn Module> {
    Arc::new(BooksModule::from_settings(settings))
}
