//! Headless Chrome lifecycle and navigation.

use crate::config::ProbeConfig;
use anyhow::{Result, anyhow};
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::page::Page;
use futures::StreamExt as _;
use log::{debug, error, warn};
use std::path::Path;
use tokio::task::{JoinHandle, spawn};
use tokio::time::{Instant, timeout};
use url::Url;

/// Browser instance with its background event handler.
pub struct ChromeBrowser {
    browser: Browser,
    handler: JoinHandle<()>,
}

impl ChromeBrowser {
    /// Opens a blank tab.
    ///
    /// # Errors
    ///
    /// Returns an error if Chrome refuses to create the target.
    pub async fn new_page(&self) -> Result<Page> {
        Ok(self.browser.new_page("about:blank").await?)
    }

    /// Closes the browser and stops the event handler.
    ///
    /// # Errors
    ///
    /// Returns an error if the close command fails.
    pub async fn close(mut self) -> Result<()> {
        let closed = self.browser.close().await;
        self.handler.abort();
        closed?;
        Ok(())
    }
}

/// Launches headless Chrome.
///
/// # Errors
///
/// Returns an error if the configuration is rejected or the browser fails to
/// start.
pub async fn launch_browser(config: &ProbeConfig) -> Result<ChromeBrowser> {
    let mut builder = BrowserConfig::builder()
        .window_size(config.window_width, config.window_height)
        .request_timeout(config.navigation_timeout())
        .arg("--hide-scrollbars")
        .arg("--disable-gpu")
        .arg("--disable-extensions")
        .arg("--disable-background-networking")
        .arg("--disable-sync")
        .arg("--disable-dev-shm-usage");
    if let Some(executable) = &config.chrome_executable {
        builder = builder.chrome_executable(executable);
    }
    if config.no_sandbox {
        builder = builder.no_sandbox();
    }

    let (browser, mut handler) = Browser::launch(
        builder
            .build()
            .map_err(|err| anyhow!("Browser config error: {err}"))?,
    )
    .await?;

    let handler = spawn(async move {
        while let Some(event) = handler.next().await {
            if let Err(err) = event {
                debug!("Browser event error: {err:?}");
            }
        }
    });

    Ok(ChromeBrowser { browser, handler })
}

/// Resolves a probe target: absolute URLs are used as-is, anything else is
/// treated as a filesystem path.
///
/// # Errors
///
/// Returns an error if a path cannot be expressed as a `file://` URL.
pub fn resolve_target(target: &str) -> Result<Url> {
    if let Ok(url) = Url::parse(target)
        && url.scheme().len() > 1
    {
        return Ok(url);
    }
    let path = Path::new(target);
    let canonical = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());
    Url::from_file_path(&canonical)
        .map_err(|()| anyhow!("Invalid file path for URL: {}", canonical.display()))
}

/// Opens a new tab and navigates it to `target`, waiting for the load to
/// finish.
///
/// # Errors
///
/// Returns an error if navigation fails or exceeds the configured timeout.
pub async fn open_target(
    browser: &ChromeBrowser,
    target: &str,
    config: &ProbeConfig,
) -> Result<Page> {
    let url = resolve_target(target)?;
    let page = browser.new_page().await?;
    let limit = config.navigation_timeout();
    let start = Instant::now();
    debug!("[NAV] Starting navigation to: {}", url.as_str());

    let navigated = timeout(limit, page.goto(url.as_str()))
        .await
        .map(|result| result.map(|_| ()));
    match navigated {
        Ok(Ok(())) => {}
        Ok(Err(err)) => {
            error!("[NAV] Navigation goto failed: {err}");
            return Err(anyhow!("Navigation goto failed for {}: {err}", url.as_str()));
        }
        Err(_) => {
            error!("[NAV] Navigation goto timeout");
            return Err(anyhow!("Navigation goto timeout for {}", url.as_str()));
        }
    }

    let loaded = timeout(limit, page.wait_for_navigation())
        .await
        .map(|result| result.map(|_| ()));
    match loaded {
        Ok(Ok(())) => {
            debug!(
                "[NAV] Navigation completed in {:?} for: {}",
                start.elapsed(),
                url.as_str()
            );
            Ok(page)
        }
        Ok(Err(err)) => {
            warn!(
                "[NAV] Wait for navigation failed after {:?}: {err}",
                start.elapsed()
            );
            Err(anyhow!(
                "Wait for navigation failed for {}: {err}",
                url.as_str()
            ))
        }
        Err(_) => {
            warn!(
                "[NAV] Wait for navigation timeout after {:?}",
                start.elapsed()
            );
            Err(anyhow!(
                "Wait for navigation timeout for {}",
                url.as_str()
            ))
        }
    }
}
