use std::time::Duration;

use async_trait::async_trait;
use serde_json::json;
use thirtyfour::{
    error::WebDriverError, By, ChromiumLikeCapabilities, DesiredCapabilities, WebDriver,
    WebElement, WindowHandle,
};

use crate::configuration::BrowserSettings;

use super::{Browser, BrowserLauncher, Page, SurfaceError};

// WebDriver code point for the Enter key.
const ENTER: &str = "\u{E007}";

impl From<WebDriverError> for SurfaceError {
    fn from(e: WebDriverError) -> Self {
        SurfaceError::Driver(e.to_string())
    }
}

/// Launches Chrome sessions through a running WebDriver server.
pub struct Droid {
    settings: BrowserSettings,
}

impl Droid {
    pub fn new(settings: BrowserSettings) -> Self {
        Droid { settings }
    }
}

#[async_trait]
impl BrowserLauncher for Droid {
    type Browser = DroidSession;

    async fn launch(&self) -> Result<DroidSession, SurfaceError> {
        let mut caps = DesiredCapabilities::chrome();
        if self.settings.headless {
            caps.set_headless()?;
        }
        caps.add_arg(&format!("--user-agent={}", self.settings.user_agent))?;
        caps.add_arg(&format!(
            "--window-size={},{}",
            self.settings.window_width, self.settings.window_height
        ))?;

        log::info!("Opening browser via {}", self.settings.webdriver_url);
        let driver = WebDriver::new(self.settings.webdriver_url.as_str(), caps).await?;
        let home = driver.window().await?;

        Ok(DroidSession { driver, home })
    }
}

/// One WebDriver session. Pages are tabs inside it.
pub struct DroidSession {
    driver: WebDriver,
    home: WindowHandle,
}

#[async_trait]
impl Browser for DroidSession {
    type Page = DroidPage;

    async fn new_page(&self) -> Result<DroidPage, SurfaceError> {
        self.driver.switch_to_window(self.home.clone()).await?;
        let handle = self.driver.new_tab().await?;

        Ok(DroidPage {
            driver: self.driver.clone(),
            handle,
        })
    }

    async fn close(self) -> Result<(), SurfaceError> {
        self.driver.quit().await?;
        Ok(())
    }
}

/// A browser tab. Tabs share one driver, so every call first focuses its own handle.
pub struct DroidPage {
    driver: WebDriver,
    handle: WindowHandle,
}

impl DroidPage {
    async fn focus(&self) -> Result<(), SurfaceError> {
        self.driver.switch_to_window(self.handle.clone()).await?;
        Ok(())
    }

    async fn first(&self, selector: &str) -> Result<Option<WebElement>, SurfaceError> {
        self.focus().await?;
        let mut elements = self.driver.find_all(By::Css(selector)).await?;
        Ok(if elements.is_empty() {
            None
        } else {
            Some(elements.remove(0))
        })
    }
}

#[async_trait]
impl Page for DroidPage {
    async fn goto(&self, url: &str, timeout: Duration) -> Result<(), SurfaceError> {
        self.focus().await?;
        // The driver must abandon the load itself, or later commands queue behind it.
        self.driver.set_page_load_timeout(timeout).await?;
        match tokio::time::timeout(timeout, self.driver.goto(url)).await {
            Ok(Ok(())) => Ok(()),
            Ok(Err(e)) => Err(SurfaceError::Navigation {
                url: url.to_string(),
                reason: e.to_string(),
            }),
            Err(_) => Err(SurfaceError::Timeout(timeout)),
        }
    }

    async fn fill_and_submit(&self, selector: &str, text: &str) -> Result<(), SurfaceError> {
        let input = self.first(selector).await?.ok_or_else(|| {
            SurfaceError::Driver(format!("no element matches {}", selector))
        })?;
        input.clear().await?;
        input.send_keys(text).await?;
        input.send_keys(ENTER).await?;
        Ok(())
    }

    async fn attribute_all(
        &self,
        selector: &str,
        attribute: &str,
    ) -> Result<Vec<String>, SurfaceError> {
        self.focus().await?;
        let mut values = vec![];
        for element in self.driver.find_all(By::Css(selector)).await? {
            if let Some(value) = element.attr(attribute).await? {
                values.push(value);
            }
        }
        Ok(values)
    }

    async fn attribute_of(
        &self,
        selector: &str,
        attribute: &str,
    ) -> Result<Option<String>, SurfaceError> {
        match self.first(selector).await? {
            Some(element) => Ok(element.attr(attribute).await?),
            None => Ok(None),
        }
    }

    async fn text_of(&self, selector: &str) -> Result<Option<String>, SurfaceError> {
        match self.first(selector).await? {
            Some(element) => Ok(Some(element.text().await?)),
            None => Ok(None),
        }
    }

    async fn title(&self) -> Result<String, SurfaceError> {
        self.focus().await?;
        Ok(self.driver.title().await?)
    }

    async fn content(&self) -> Result<String, SurfaceError> {
        self.focus().await?;
        Ok(self.driver.source().await?)
    }

    async fn scroll(&self, container: &str, delta: i64) -> Result<(), SurfaceError> {
        self.focus().await?;
        self.driver
            .execute(
                r#"
                const feed = document.querySelector(arguments[0]);
                if (feed) { feed.scrollBy(0, arguments[1]); } else { window.scrollBy(0, arguments[1]); }
                "#,
                vec![json!(container), json!(delta)],
            )
            .await?;
        Ok(())
    }

    async fn close(self) -> Result<(), SurfaceError> {
        self.focus().await?;
        self.driver.close_window().await?;
        Ok(())
    }
}
