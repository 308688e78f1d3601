mod build_helper;
mod config;
mod loader;
mod nav;
mod page;
mod profile;
mod render;
mod ui;
mod utils;

pub use build_helper::render_at_build_time;
pub use config::*;
pub use loader::*;
pub use nav::*;
pub use page::*;
pub use profile::*;
pub use render::{render_page, sections, Section, LOAD_FAILED_MESSAGE};
pub use ui::*;

use anyhow::{Context, Result};
use chrono::{Local, NaiveDateTime};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::info;

/// Name of the rendered page inside the output directory
pub const INDEX_FILE: &str = "index.html";

/// Main entry point for one-shot rendering
pub struct Portfolio {
    config: SiteConfig,
    source: ProfileSource,
    page: Page,
}

impl Portfolio {
    /// Load the profile from a source using the default configuration
    pub async fn new(source: ProfileSource) -> Self {
        let config = SiteConfig::default();
        Self::load(config, source).await
    }

    /// Load the profile named by the configuration
    pub async fn with_config(config: SiteConfig) -> Self {
        let source = config.profile_source();
        Self::load(config, source).await
    }

    async fn load(config: SiteConfig, source: ProfileSource) -> Self {
        let mut page = Page::new(&config);
        let fetcher = source.fetcher();
        let state = load_profile(fetcher.as_ref()).await;
        page.apply(PageEvent::Loaded(state));

        Self {
            config,
            source,
            page,
        }
    }

    pub fn config(&self) -> &SiteConfig {
        &self.config
    }

    pub fn source(&self) -> &ProfileSource {
        &self.source
    }

    pub fn load_state(&self) -> &LoadState {
        self.page.load_state()
    }

    pub fn profile(&self) -> Option<&Profile> {
        self.page.profile()
    }

    /// Sections that will render, empty when the profile failed to load
    pub fn sections(&self) -> Vec<Section> {
        self.profile().map(sections).unwrap_or_default()
    }

    /// Render the page as it looks once the typewriter has finished, with
    /// the clock showing the current local time
    pub fn render_html(&self) -> String {
        self.render_html_at(Local::now().naive_local())
    }

    /// Same as [`Portfolio::render_html`] with an explicit clock value
    pub fn render_html_at(&self, now: NaiveDateTime) -> String {
        let mut page = self.page.clone();
        page.settle_for_static(now);
        page.render()
    }

    /// Write `index.html` and a normalized `profile.json` into a directory.
    ///
    /// Fails if the profile did not load, so a broken document never
    /// replaces a previously rendered site.
    pub async fn write_site<P: AsRef<Path>>(&self, output_dir: P) -> Result<PathBuf> {
        let output_dir = output_dir.as_ref();
        let profile = self.profile().with_context(|| {
            format!(
                "Profile from {} failed to load, not writing {}",
                self.source,
                output_dir.display()
            )
        })?;

        fs::create_dir_all(output_dir)
            .await
            .with_context(|| format!("Failed to create output directory: {}", output_dir.display()))?;

        let index_path = output_dir.join(INDEX_FILE);
        fs::write(&index_path, self.render_html())
            .await
            .with_context(|| format!("Failed to write {}", index_path.display()))?;

        // The page fetches this document from the same relative path
        let profile_path = output_dir.join(PROFILE_PATH);
        let document =
            serde_json::to_string_pretty(profile).context("Failed to serialize profile")?;
        fs::write(&profile_path, document)
            .await
            .with_context(|| format!("Failed to write {}", profile_path.display()))?;

        info!(
            index = %index_path.display(),
            profile = %profile_path.display(),
            "site written"
        );

        Ok(index_path)
    }
}
