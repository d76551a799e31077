use crate::{
    configuration::ScraperSettings,
    domain::{lead_quality::is_near_duplicate, ExtractedFields, LeadRecord, SearchQuery},
};

use super::{
    extract_fields, wait_until, Browser, BrowserLauncher, MapsLayout, Page, Paginator,
    SurfaceError,
};

#[derive(Debug, thiserror::Error)]
pub enum ScrapeError {
    #[error("failed to start browser session: {0}")]
    Launch(#[source] SurfaceError),
    #[error("failed to open the search page: {0}")]
    Search(#[source] SurfaceError),
}

#[derive(Debug, Clone, PartialEq)]
pub struct SkippedReference {
    pub reference: String,
    pub reason: String,
}

#[derive(Debug, Default)]
pub struct CollectOutcome {
    pub leads: Vec<LeadRecord>,
    pub skipped: Vec<SkippedReference>,
}

/// Searches for `query`, visits results in discovery order and returns at most
/// `query.target()` leads. A reference that fails to load or extract is skipped.
/// Only a failure to start the session or open the search itself is an error.
pub async fn collect<L: BrowserLauncher>(
    launcher: &L,
    settings: &ScraperSettings,
    layout: &MapsLayout,
    query: &SearchQuery,
) -> Result<CollectOutcome, ScrapeError> {
    let target = query.target();
    log::info!(
        "Starting search for niche='{}', city='{}', limit={}",
        query.niche,
        query.city,
        target
    );

    if target == 0 {
        return Ok(CollectOutcome::default());
    }

    let browser = launcher.launch().await.map_err(ScrapeError::Launch)?;
    let result = collect_with(&browser, settings, layout, query, target).await;

    if let Err(e) = browser.close().await {
        log::warn!("Failed to close browser session: {}", e);
    }

    if let Ok(outcome) = &result {
        log::info!(
            "Finished with {} leads, {} references skipped",
            outcome.leads.len(),
            outcome.skipped.len()
        );
    }
    result
}

async fn collect_with<B: Browser>(
    browser: &B,
    settings: &ScraperSettings,
    layout: &MapsLayout,
    query: &SearchQuery,
    target: usize,
) -> Result<CollectOutcome, ScrapeError> {
    let search_page = browser.new_page().await.map_err(ScrapeError::Search)?;
    let mut outcome = CollectOutcome::default();

    let result = crawl(browser, &search_page, settings, layout, query, target, &mut outcome).await;

    if let Err(e) = search_page.close().await {
        log::warn!("Failed to close search page: {}", e);
    }
    result.map(|_| outcome)
}

async fn crawl<B: Browser>(
    browser: &B,
    search_page: &B::Page,
    settings: &ScraperSettings,
    layout: &MapsLayout,
    query: &SearchQuery,
    target: usize,
    outcome: &mut CollectOutcome,
) -> Result<(), ScrapeError> {
    open_search(search_page, settings, layout, query).await?;

    let mut paginator = Paginator::new(
        layout,
        settings.max_pagination_attempts,
        settings.scroll_distance,
        settings.scroll_delay(),
        settings.poll_interval(),
    );

    while outcome.leads.len() < target && !paginator.exhausted() {
        for reference in paginator.next_batch(search_page).await {
            if outcome.leads.len() >= target {
                break;
            }

            match visit(browser, &reference, settings, layout, query).await {
                Ok(lead)
                    if settings.skip_duplicate_names
                        && is_near_duplicate(
                            &lead.name,
                            outcome.leads.iter().map(|l| l.name.as_str()),
                        ) =>
                {
                    log::info!("Skipping {}: duplicate of '{}'", reference, lead.name);
                    outcome.skipped.push(SkippedReference {
                        reference,
                        reason: format!("duplicate of '{}'", lead.name),
                    });
                }
                Ok(lead) => outcome.leads.push(lead),
                Err(e) => {
                    log::error!("Error on {}: {}", reference, e);
                    outcome.skipped.push(SkippedReference {
                        reference,
                        reason: e.to_string(),
                    });
                }
            }
        }

        if outcome.leads.len() < target {
            paginator.reveal_more(search_page).await;
        }
    }

    Ok(())
}

async fn open_search<P: Page>(
    page: &P,
    settings: &ScraperSettings,
    layout: &MapsLayout,
    query: &SearchQuery,
) -> Result<(), ScrapeError> {
    log::info!("Opening search surface {}", settings.search_url);
    page.goto(&settings.search_url, settings.navigation_timeout())
        .await
        .map_err(ScrapeError::Search)?;
    page.fill_and_submit(&layout.search_input, &query.search_text())
        .await
        .map_err(ScrapeError::Search)?;

    let link = layout.result_link.as_str();
    let attribute = layout.result_link_attribute.as_str();
    let listed = wait_until(
        settings.search_timeout(),
        settings.poll_interval(),
        move || async move {
            match page.attribute_all(link, attribute).await {
                Ok(references) if !references.is_empty() => Some(references.len()),
                _ => None,
            }
        },
    )
    .await;

    if listed.is_none() {
        log::warn!("No results listed yet for '{}'", query.search_text());
    }
    Ok(())
}

async fn visit<B: Browser>(
    browser: &B,
    reference: &str,
    settings: &ScraperSettings,
    layout: &MapsLayout,
    query: &SearchQuery,
) -> Result<LeadRecord, SurfaceError> {
    log::info!("Opening lead page: {}", reference);
    let page = browser.new_page().await?;

    let fields = load_and_extract(browser, &page, reference, settings, layout).await;

    if let Err(e) = page.close().await {
        log::warn!("Failed to close lead page {}: {}", reference, e);
    }
    Ok(LeadRecord::from_fields(fields?, query))
}

async fn load_and_extract<B: Browser>(
    browser: &B,
    page: &B::Page,
    reference: &str,
    settings: &ScraperSettings,
    layout: &MapsLayout,
) -> Result<ExtractedFields, SurfaceError> {
    page.goto(reference, settings.navigation_timeout()).await?;

    let heading = layout.detail_heading.as_str();
    wait_until(
        settings.settle_delay(),
        settings.poll_interval(),
        move || async move {
            page.text_of(heading)
                .await
                .ok()
                .flatten()
                .filter(|t| !t.trim().is_empty())
        },
    )
    .await;

    extract_fields(browser, page, layout, settings.website_timeout()).await
}
