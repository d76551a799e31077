//! In-memory rendering surface for tests. Pages are static HTML keyed by URL and
//! selectors are evaluated with `scraper`. A search page lists its result links
//! in batches, one more batch per scroll.

use std::{
    collections::{HashMap, HashSet},
    sync::{Arc, Mutex, MutexGuard},
    time::Duration,
};

use async_trait::async_trait;
use scraper::{Html, Selector};

use super::{Browser, BrowserLauncher, Page, SurfaceError};

#[derive(Default)]
struct SiteState {
    pages: HashMap<String, String>,
    failures: HashSet<String>,
    broken_selectors: HashSet<String>,
    search_url: Option<String>,
    results: Vec<String>,
    batch: usize,
    revealed: usize,
    queries: Vec<String>,
    visits: HashMap<String, usize>,
    open_pages: usize,
    scrolls: usize,
    launches: usize,
    launch_failure: bool,
    page_limit: Option<usize>,
    browser_closed: bool,
}

#[derive(Clone, Default)]
pub struct FixtureSite {
    state: Arc<Mutex<SiteState>>,
}

impl FixtureSite {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, SiteState> {
        self.state.lock().unwrap()
    }

    pub fn with_page(self, url: &str, html: &str) -> Self {
        self.state().pages.insert(url.to_string(), html.to_string());
        self
    }

    /// Registers a search surface at `url` whose results appear `batch` at a time.
    pub fn with_search(self, url: &str, results: Vec<String>, batch: usize) -> Self {
        {
            let mut state = self.state();
            state.search_url = Some(url.to_string());
            state.results = results;
            state.batch = batch;
        }
        self
    }

    /// Navigating to `url` times out.
    pub fn with_failure(self, url: &str) -> Self {
        self.state().failures.insert(url.to_string());
        self
    }

    /// Any lookup with `selector` fails with a driver error.
    pub fn with_broken_selector(self, selector: &str) -> Self {
        self.state().broken_selectors.insert(selector.to_string());
        self
    }

    /// Opening a page fails once `limit` pages are already open.
    pub fn with_page_limit(self, limit: usize) -> Self {
        self.state().page_limit = Some(limit);
        self
    }

    pub fn with_launch_failure(self) -> Self {
        self.state().launch_failure = true;
        self
    }

    pub fn visits(&self, url: &str) -> usize {
        self.state().visits.get(url).copied().unwrap_or(0)
    }

    pub fn queries(&self) -> Vec<String> {
        self.state().queries.clone()
    }

    pub fn open_pages(&self) -> usize {
        self.state().open_pages
    }

    pub fn scrolls(&self) -> usize {
        self.state().scrolls
    }

    pub fn launches(&self) -> usize {
        self.state().launches
    }

    pub fn browser_closed(&self) -> bool {
        self.state().browser_closed
    }

    fn render(&self, url: &str) -> Option<String> {
        let state = self.state();
        if state.search_url.as_deref() == Some(url) {
            let links: String = state.results[..state.revealed]
                .iter()
                .map(|r| format!(r#"<a class="hfpxzc" href="{r}"></a>"#))
                .collect();
            return Some(format!(
                r#"<html><head><title>Maps</title></head><body>
                   <input id="searchboxinput">
                   <div role="feed">{links}</div></body></html>"#
            ));
        }
        state.pages.get(url).cloned()
    }

    fn check_selector(&self, selector: &str) -> Result<Selector, SurfaceError> {
        if self.state().broken_selectors.contains(selector) {
            return Err(SurfaceError::Driver(format!("lookup of {selector} failed")));
        }
        Selector::parse(selector)
            .map_err(|e| SurfaceError::Driver(format!("bad selector {selector}: {e:?}")))
    }
}

pub struct FixtureLauncher {
    site: FixtureSite,
}

impl FixtureLauncher {
    pub fn new(site: FixtureSite) -> Self {
        FixtureLauncher { site }
    }
}

#[async_trait]
impl BrowserLauncher for FixtureLauncher {
    type Browser = FixtureBrowser;

    async fn launch(&self) -> Result<FixtureBrowser, SurfaceError> {
        let mut state = self.site.state();
        state.launches += 1;
        if state.launch_failure {
            return Err(SurfaceError::Driver("session not created".to_string()));
        }
        Ok(FixtureBrowser::new(self.site.clone()))
    }
}

pub struct FixtureBrowser {
    site: FixtureSite,
}

impl FixtureBrowser {
    pub fn new(site: FixtureSite) -> Self {
        FixtureBrowser { site }
    }
}

#[async_trait]
impl Browser for FixtureBrowser {
    type Page = FixturePage;

    async fn new_page(&self) -> Result<FixturePage, SurfaceError> {
        {
            let mut state = self.site.state();
            if state.page_limit.is_some_and(|limit| state.open_pages >= limit) {
                return Err(SurfaceError::Driver("no such window".to_string()));
            }
            state.open_pages += 1;
        }
        Ok(FixturePage {
            site: self.site.clone(),
            current: Mutex::new(None),
        })
    }

    async fn close(self) -> Result<(), SurfaceError> {
        self.site.state().browser_closed = true;
        Ok(())
    }
}

pub struct FixturePage {
    site: FixtureSite,
    current: Mutex<Option<String>>,
}

impl FixturePage {
    fn html(&self) -> Result<String, SurfaceError> {
        let current = self.current.lock().unwrap().clone();
        current
            .and_then(|url| self.site.render(&url))
            .ok_or_else(|| SurfaceError::Driver("no document loaded".to_string()))
    }

    fn select<T>(
        &self,
        selector: &str,
        pick: impl Fn(scraper::ElementRef<'_>) -> Option<String>,
        collect: impl FnOnce(Vec<String>) -> T,
    ) -> Result<T, SurfaceError> {
        let selector = self.site.check_selector(selector)?;
        let document = Html::parse_document(&self.html()?);
        let values = document.select(&selector).filter_map(pick).collect();
        Ok(collect(values))
    }
}

#[async_trait]
impl Page for FixturePage {
    async fn goto(&self, url: &str, timeout: Duration) -> Result<(), SurfaceError> {
        {
            let mut state = self.site.state();
            *state.visits.entry(url.to_string()).or_insert(0) += 1;
            if state.failures.contains(url) {
                return Err(SurfaceError::Timeout(timeout));
            }
        }
        if self.site.render(url).is_none() {
            return Err(SurfaceError::Navigation {
                url: url.to_string(),
                reason: "404".to_string(),
            });
        }
        *self.current.lock().unwrap() = Some(url.to_string());
        Ok(())
    }

    async fn fill_and_submit(&self, selector: &str, text: &str) -> Result<(), SurfaceError> {
        let found = self.select(selector, |_| Some(String::new()), |v| !v.is_empty())?;
        if !found {
            return Err(SurfaceError::Driver(format!("no element matches {selector}")));
        }
        let mut state = self.site.state();
        state.queries.push(text.to_string());
        state.revealed = state.batch.min(state.results.len());
        Ok(())
    }

    async fn attribute_all(
        &self,
        selector: &str,
        attribute: &str,
    ) -> Result<Vec<String>, SurfaceError> {
        self.select(
            selector,
            |el| el.value().attr(attribute).map(str::to_string),
            |v| v,
        )
    }

    async fn attribute_of(
        &self,
        selector: &str,
        attribute: &str,
    ) -> Result<Option<String>, SurfaceError> {
        self.select(
            selector,
            |el| Some(el.value().attr(attribute).map(str::to_string).unwrap_or_default()),
            |v| v.into_iter().next().filter(|a| !a.is_empty()),
        )
    }

    async fn text_of(&self, selector: &str) -> Result<Option<String>, SurfaceError> {
        self.select(
            selector,
            |el| Some(el.text().collect::<String>()),
            |v| v.into_iter().next(),
        )
    }

    async fn title(&self) -> Result<String, SurfaceError> {
        self.select("title", |el| Some(el.text().collect()), |v| {
            v.into_iter().next().unwrap_or_default()
        })
    }

    async fn content(&self) -> Result<String, SurfaceError> {
        self.html()
    }

    async fn scroll(&self, container: &str, _delta: i64) -> Result<(), SurfaceError> {
        self.site.check_selector(container)?;
        let mut state = self.site.state();
        state.scrolls += 1;
        state.revealed = (state.revealed + state.batch).min(state.results.len());
        Ok(())
    }

    async fn close(self) -> Result<(), SurfaceError> {
        self.site.state().open_pages -= 1;
        Ok(())
    }
}
