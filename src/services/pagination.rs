use std::time::Duration;

use super::{wait_until, MapsLayout, Page};

/// Walks a scrollable result list, handing out references in discovery order.
///
/// New references are found by position: anything past the number already
/// handed out is new. This assumes the list only ever grows at the end.
pub struct Paginator<'a> {
    layout: &'a MapsLayout,
    max_attempts: u32,
    scroll_distance: i64,
    reveal_timeout: Duration,
    poll_interval: Duration,
    seen: usize,
    attempts: u32,
}

impl<'a> Paginator<'a> {
    pub fn new(
        layout: &'a MapsLayout,
        max_attempts: u32,
        scroll_distance: i64,
        reveal_timeout: Duration,
        poll_interval: Duration,
    ) -> Self {
        Paginator {
            layout,
            max_attempts,
            scroll_distance,
            reveal_timeout,
            poll_interval,
            seen: 0,
            attempts: 0,
        }
    }

    pub fn exhausted(&self) -> bool {
        self.attempts >= self.max_attempts
    }

    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    /// References listed since the previous call. A failed read yields nothing.
    pub async fn next_batch<P: Page>(&mut self, page: &P) -> Vec<String> {
        let references = self.visible_references(page).await;
        let fresh: Vec<String> = references.into_iter().skip(self.seen).collect();
        self.seen += fresh.len();

        log::info!(
            "Pagination attempt #{}: {} new references, {} total",
            self.attempts + 1,
            fresh.len(),
            self.seen
        );
        fresh
    }

    /// Scrolls the list and waits until more references show up or the reveal
    /// timeout passes. Counts as one attempt either way.
    pub async fn reveal_more<P: Page>(&mut self, page: &P) {
        self.attempts += 1;

        if let Err(e) = page
            .scroll(&self.layout.results_feed, self.scroll_distance)
            .await
        {
            log::warn!("Scrolling the result list failed: {}", e);
        }

        let this = &*self;
        let seen = self.seen;
        let grew = wait_until(self.reveal_timeout, self.poll_interval, move || async move {
            let count = this.visible_references(page).await.len();
            (count > seen).then_some(count)
        })
        .await;

        if grew.is_none() {
            log::info!("No new results after attempt #{}", self.attempts);
        }
    }

    async fn visible_references<P: Page>(&self, page: &P) -> Vec<String> {
        match page
            .attribute_all(&self.layout.result_link, &self.layout.result_link_attribute)
            .await
        {
            Ok(references) => references,
            Err(e) => {
                log::warn!("Reading result references failed: {}", e);
                vec![]
            }
        }
    }
}
