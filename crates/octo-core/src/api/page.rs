//! Paginated collection access.
//!
//! Collection endpoints accept `skip`/`take` and answer with one page plus the
//! total result count. [`Pages`] walks those pages lazily and yields a single
//! flattened sequence.

use std::collections::VecDeque;
use std::marker::PhantomData;

use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

use super::{ApiError, ApiTransport, Query};

pub const DEFAULT_PAGE_SIZE: usize = 30;

/// One page of a collection response.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Page<T> {
    #[serde(default = "Vec::new")]
    pub items: Vec<T>,
    #[serde(default)]
    pub total_results: usize,
}

/// Lazy iterator over every item of a paginated collection.
///
/// Iteration stops after an empty page or once `TotalResults` items have been
/// seen. A failed page is yielded once as `Err` and ends the sequence.
pub struct Pages<'a, T> {
    transport: &'a dyn ApiTransport,
    path: String,
    query: Query,
    page_size: usize,
    skip: usize,
    seen: usize,
    buffer: VecDeque<Value>,
    done: bool,
    _item: PhantomData<T>,
}

impl<'a, T: DeserializeOwned> Pages<'a, T> {
    pub fn new(
        transport: &'a dyn ApiTransport,
        path: impl Into<String>,
        query: Query,
        page_size: usize,
    ) -> Self {
        Self {
            transport,
            path: path.into(),
            query,
            page_size: page_size.max(1),
            skip: 0,
            seen: 0,
            buffer: VecDeque::new(),
            done: false,
            _item: PhantomData,
        }
    }

    fn fetch_next_page(&mut self) -> Result<(), ApiError> {
        let mut query = self.query.clone();
        query.push(("skip".to_string(), self.skip.to_string()));
        query.push(("take".to_string(), self.page_size.to_string()));

        let body = self.transport.get(&self.path, &query)?;
        let page: Page<Value> = serde_json::from_value(body)?;
        debug!(
            "Fetched {} items from {} (skip={}, total={})",
            page.items.len(),
            self.path,
            self.skip,
            page.total_results
        );

        if page.items.is_empty() {
            self.done = true;
            return Ok(());
        }

        self.skip += page.items.len();
        self.seen += page.items.len();
        if self.seen >= page.total_results {
            self.done = true;
        }
        self.buffer.extend(page.items);
        Ok(())
    }

    /// Drain the sequence, stopping at the first error.
    pub fn collect_all(self) -> Result<Vec<T>, ApiError> {
        self.collect()
    }
}

impl<T: DeserializeOwned> Iterator for Pages<'_, T> {
    type Item = Result<T, ApiError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.buffer.is_empty() && !self.done {
            if let Err(err) = self.fetch_next_page() {
                self.done = true;
                return Some(Err(err));
            }
        }

        let value = self.buffer.pop_front()?;
        Some(serde_json::from_value(value).map_err(ApiError::from))
    }
}
