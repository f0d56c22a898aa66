//! Pagination iterator over the remote user directory.

use crate::connector::RamConnector;
use crate::context::{ListContext, WorkflowContext};
use crate::error::RamResult;

/// One page of enriched user contexts plus continuation state.
///
/// Borrows the connector that produced it; advancing re-invokes
/// [`RamConnector::fetch_batch`] with the stored cursor, page size, and
/// group filter.
#[derive(Debug)]
pub struct BatchIterator<'a> {
    connector: &'a RamConnector,
    results: Vec<WorkflowContext>,
    marker: Option<String>,
    max_items: Option<u32>,
    contain_group: Option<String>,
    is_truncated: bool,
}

impl<'a> BatchIterator<'a> {
    pub(crate) fn new(
        connector: &'a RamConnector,
        results: Vec<WorkflowContext>,
        marker: Option<String>,
        max_items: Option<u32>,
        contain_group: Option<String>,
        is_truncated: bool,
    ) -> Self {
        Self {
            connector,
            results,
            marker,
            max_items,
            contain_group,
            is_truncated,
        }
    }

    /// The enriched contexts on this page.
    #[must_use]
    pub fn results(&self) -> &[WorkflowContext] {
        &self.results
    }

    /// Consumes the iterator, yielding the page contents.
    #[must_use]
    pub fn into_results(self) -> Vec<WorkflowContext> {
        self.results
    }

    /// True while the directory reports more data beyond this page.
    #[must_use]
    pub fn has_next(&self) -> bool {
        self.is_truncated
    }

    /// Fetches the following page, or `None` when this page is terminal.
    pub async fn next_page(&self) -> RamResult<Option<BatchIterator<'a>>> {
        if !self.has_next() {
            return Ok(None);
        }

        let list = ListContext {
            marker: self.marker.clone(),
            max_items: self.max_items,
            contain_group: self.contain_group.clone(),
        };
        self.connector.fetch_batch(list).await.map(Some)
    }
}
