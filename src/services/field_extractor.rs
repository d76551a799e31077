use std::{sync::LazyLock, time::Duration};

use regex::Regex;

use crate::domain::ExtractedFields;

use super::{Browser, MapsLayout, Page, SurfaceError};

static PHONE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\(?\d{2,3}\)?\s?\d{4,5}-\d{4}").expect("valid phone regex"));
static EMAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}").expect("valid email regex")
});

pub fn first_phone(html: &str) -> Option<String> {
    PHONE.find(html).map(|m| m.as_str().to_string())
}

pub fn first_email(html: &str) -> Option<String> {
    EMAIL.find(html).map(|m| m.as_str().to_string())
}

/// Builds the fields of one lead from an already loaded result page.
///
/// Title and markup are required, an error there fails the whole page. Phone,
/// website and email are each recovered locally: a failing lookup is logged and
/// the field stays empty. When the page has no email but links a website, that
/// website is loaded once in its own page and scanned too.
pub async fn extract_fields<B: Browser>(
    browser: &B,
    page: &B::Page,
    layout: &MapsLayout,
    website_timeout: Duration,
) -> Result<ExtractedFields, SurfaceError> {
    let name = page.title().await?;
    let html = page.content().await?;

    let phone = match page.text_of(&layout.phone_button).await {
        Ok(Some(text)) if !text.trim().is_empty() => Some(text),
        Ok(_) => first_phone(&html),
        Err(e) => {
            log::warn!("Phone lookup failed on {}: {}", name, e);
            first_phone(&html)
        }
    };

    let website = match page
        .attribute_of(&layout.website_link, &layout.website_link_attribute)
        .await
    {
        Ok(href) => href.filter(|h| !h.trim().is_empty()),
        Err(e) => {
            log::warn!("Website lookup failed on {}: {}", name, e);
            None
        }
    };

    let email = match (first_email(&html), &website) {
        (Some(email), _) => Some(email),
        (None, Some(site)) => email_from_website(browser, site, website_timeout).await,
        (None, None) => None,
    };

    Ok(ExtractedFields {
        name,
        phone,
        email,
        website,
    })
}

async fn email_from_website<B: Browser>(
    browser: &B,
    website: &str,
    timeout: Duration,
) -> Option<String> {
    let site_page = match browser.new_page().await {
        Ok(p) => p,
        Err(e) => {
            log::warn!("Could not open page for {}: {}", website, e);
            return None;
        }
    };

    let html = match site_page.goto(website, timeout).await {
        Ok(()) => site_page.content().await,
        Err(e) => Err(e),
    };

    if let Err(e) = site_page.close().await {
        log::warn!("Failed to close page for {}: {}", website, e);
    }

    match html {
        Ok(html) => first_email(&html),
        Err(e) => {
            log::warn!("Error fetching email from website {}: {}", website, e);
            None
        }
    }
}
