//! Shared types for the clinic API layer.

use std::sync::Arc;

use rusqlite::Connection;
use serde::Deserialize;

use crate::api::error::ApiError;
use crate::core_state::CoreState;
use crate::models::PageRequest;

/// Shared context for all API routes and middleware.
#[derive(Clone)]
pub struct ApiContext {
    pub core: Arc<CoreState>,
}

impl ApiContext {
    pub fn new(core: Arc<CoreState>) -> Self {
        Self { core }
    }

    /// Open a connection and run `work` on tokio's blocking pool.
    ///
    /// Every service call goes through here. SQLite may sit on the write lock
    /// for up to the busy timeout and password hashing is CPU-bound.
    pub async fn run_blocking<T, E, F>(&self, work: F) -> Result<T, ApiError>
    where
        F: FnOnce(&Connection) -> Result<T, E> + Send + 'static,
        T: Send + 'static,
        E: Send + 'static,
        ApiError: From<E>,
    {
        let core = Arc::clone(&self.core);
        tokio::task::spawn_blocking(move || -> Result<T, ApiError> {
            let conn = core.open_db()?;
            work(&conn).map_err(ApiError::from)
        })
        .await?
    }
}

/// `?page=&size=` query parameters. Both absent means "no paging".
///
/// Listed field by field rather than flattened: `serde_urlencoded` cannot
/// parse numbers through `#[serde(flatten)]`.
#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<u32>,
    pub size: Option<u32>,
}

impl PageQuery {
    pub fn to_page_request(&self) -> Option<PageRequest> {
        page_request(self.page, self.size)
    }
}

/// Build a page request when at least one of `page`/`size` was given.
pub fn page_request(page: Option<u32>, size: Option<u32>) -> Option<PageRequest> {
    if page.is_none() && size.is_none() {
        return None;
    }
    let defaults = PageRequest::default();
    Some(PageRequest::new(
        page.unwrap_or(defaults.page),
        size.unwrap_or(defaults.size),
    ))
}
