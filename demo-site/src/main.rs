use anyhow::{Context, Result};
use folio::{parse_config_file, LivePage, PageEvent};
use std::path::Path;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let site_dir = Path::new(env!("CARGO_MANIFEST_DIR"));
    let mut config = parse_config_file(site_dir.join("folio.yaml"))
        .await
        .context("Failed to load demo-site/folio.yaml")?;
    config.profile = site_dir.join(&config.profile).display().to_string();

    println!("Demo Site - Live Page Controller");
    println!("================================");

    let mut live = LivePage::mount(&config, config.profile_source().fetcher());

    let loaded = live.wait_loaded().await.profile().map(|p| p.name.clone());
    match loaded {
        Some(name) => println!("✓ Loaded profile for {}", name),
        None => {
            println!("✗ Failed to load {}", config.profile);
            live.unmount();
            return Ok(());
        }
    }

    // Let the greeting type itself out, printing each frame
    while !live.page().typewriter().is_complete() {
        if let Some(PageEvent::TypewriterTick) = live.next_event().await {
            println!("  {}", live.page().typewriter().displayed());
        }
    }

    // Simulate a reader scrolling past the fold and back
    let scroll = live.scroll_handle();
    for offset in [120.0, 480.0, 40.0] {
        scroll.scrolled(offset);
        loop {
            match live.next_event().await {
                Some(PageEvent::Scrolled(_)) | None => break,
                Some(_) => {}
            }
        }
        println!(
            "  scrolled to {:>5.0}px, scroll-to-top {}",
            offset,
            if live.page().scroll().is_visible() {
                "visible"
            } else {
                "hidden"
            }
        );
    }

    println!("  local time: {}", live.page().clock().display());

    live.unmount();
    tokio::task::yield_now().await;
    info!(tasks = live.active_tasks(), "timers released");

    let dist = site_dir.join("dist").join("index.html");
    println!();
    println!("Static page rendered at build time: {}", dist.display());

    Ok(())
}
