use async_trait::async_trait;
use chrono::NaiveDate;
use folio::*;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

const PROFILE: &str = r#"{
    "name": "Jane Doe",
    "title": "Distributed Systems Engineer",
    "bio": "I build storage engines and the tools around them.",
    "address": "Bergen, Norway",
    "email": "jane.doe@example.org",
    "phone": "+47 555 01 234",
    "education": [
        {"degree": "MSc Informatics", "institute": "University of Bergen", "year": "2021 - 2023", "grade": "A"},
        {"degree": "BSc Computer Science", "institute": "NTNU", "year": "2018 - 2021"}
    ],
    "skills": ["Rust", "Go", "PostgreSQL"],
    "interests": ["Climbing", "Chess"],
    "socials": {
        "github": "https://github.com/janedoe",
        "linkedin": "https://linkedin.com/in/janedoe",
        "facebook": "https://facebook.com/janedoe"
    },
    "arsenal": [
        {"category": "Languages", "items": ["Rust", "Go"], "icon": "code"},
        {"category": "Infrastructure", "items": ["Kubernetes"], "icon": "server"}
    ],
    "projects": [
        {"name": "tidewater", "description": "A log-structured key value store.", "codeUrl": "https://github.com/janedoe/tidewater", "tags": ["rust", "storage"]},
        {"name": "kelp", "description": "Terminal dashboard for cluster health.", "liveUrl": "https://kelp.example.org", "image": "/img/kelp.png"}
    ],
    "resume": "/files/jane-doe-cv.pdf",
    "profileImage": "/img/jane.jpg"
}"#;

struct MemoryFetcher(String);

#[async_trait]
impl ProfileFetcher for MemoryFetcher {
    async fn fetch_document(&self) -> Result<String, LoadError> {
        Ok(self.0.clone())
    }

    fn location(&self) -> String {
        "memory://profile.json".to_string()
    }
}

struct OfflineFetcher;

#[async_trait]
impl ProfileFetcher for OfflineFetcher {
    async fn fetch_document(&self) -> Result<String, LoadError> {
        Err(LoadError::Fetch {
            location: self.location(),
            reason: "network unreachable".to_string(),
        })
    }

    fn location(&self) -> String {
        "https://jane.example.org/profile.json".to_string()
    }
}

/// Never answers; records when the page drops it
struct StalledFetcher {
    dropped: Arc<AtomicBool>,
}

#[async_trait]
impl ProfileFetcher for StalledFetcher {
    async fn fetch_document(&self) -> Result<String, LoadError> {
        tokio::time::sleep(Duration::from_secs(24 * 3600)).await;
        Ok(PROFILE.to_string())
    }

    fn location(&self) -> String {
        "https://slow.example.org/profile.json".to_string()
    }
}

impl Drop for StalledFetcher {
    fn drop(&mut self) {
        self.dropped.store(true, Ordering::SeqCst);
    }
}

fn stalled_page() -> (LivePage, Arc<AtomicBool>) {
    let dropped = Arc::new(AtomicBool::new(false));
    let live = LivePage::mount(
        &SiteConfig::default(),
        Box::new(StalledFetcher {
            dropped: dropped.clone(),
        }),
    );
    (live, dropped)
}

/// Let the runtime poll aborted tasks without moving the clock
async fn run_pending_tasks() {
    for _ in 0..8 {
        tokio::task::yield_now().await;
    }
}

fn fixed_now() -> chrono::NaiveDateTime {
    NaiveDate::from_ymd_opt(2026, 10, 16)
        .unwrap()
        .and_hms_opt(14, 30, 0)
        .unwrap()
}

fn ready_page(document: &str) -> Page {
    let mut page = Page::default();
    let profile = Profile::from_json_str(document).unwrap();
    page.apply(PageEvent::Loaded(LoadState::Ready(profile)));
    page.settle_for_static(fixed_now());
    page
}

/// Remove one top-level key from the fixture
fn without(key: &str) -> String {
    let mut value: serde_json::Value = serde_json::from_str(PROFILE).unwrap();
    value.as_object_mut().unwrap().remove(key);
    value.to_string()
}

fn with(key: &str, replacement: serde_json::Value) -> String {
    let mut value: serde_json::Value = serde_json::from_str(PROFILE).unwrap();
    value[key] = replacement;
    value.to_string()
}

fn scratch_dir(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("folio-test-{}-{}", name, std::process::id()))
}

#[test]
fn test_required_fields_appear_exactly_once() {
    let html = ready_page(PROFILE).render();

    for field in [
        "Jane Doe",
        "Distributed Systems Engineer",
        "I build storage engines and the tools around them.",
        "Bergen, Norway",
        "jane.doe@example.org",
        "+47 555 01 234",
        "/files/jane-doe-cv.pdf",
        "/img/jane.jpg",
    ] {
        assert_eq!(html.matches(field).count(), 1, "field {:?}", field);
    }
}

#[test]
fn test_one_word_name_appears_once() {
    let html = ready_page(&with("name", serde_json::json!("Jane"))).render();

    assert_eq!(html.matches("Jane").count(), 1);
    assert!(html.contains("<h1 class=\"greeting\">I'm Jane<span"));
    assert!(html.contains("<title>Portfolio</title>"));
}

#[test]
fn test_query_string_urls_are_escaped_once() {
    let document = with("resume", serde_json::json!("/files/cv.pdf?v=2&lang=en"));
    let html = ready_page(&document).render();

    assert_eq!(html.matches("href=\"/files/cv.pdf?v=2&amp;lang=en\"").count(), 1);
    assert!(!html.contains("v=2&lang=en"));

    let document = with("profileImage", serde_json::json!("/img/jane.jpg?w=400&h=400"));
    let html = ready_page(&document).render();
    assert_eq!(html.matches("src=\"/img/jane.jpg?w=400&amp;h=400\"").count(), 1);
}

#[test]
fn test_lists_render_in_source_order() {
    let html = ready_page(PROFILE).render();

    let rust = html.find("<li>PostgreSQL</li>").unwrap();
    let go = html.find("<li>Go</li>").unwrap();
    assert!(go < rust);

    let msc = html.find("MSc Informatics").unwrap();
    let bsc = html.find("BSc Computer Science").unwrap();
    assert!(msc < bsc);

    let tidewater = html.find("<h3>tidewater</h3>").unwrap();
    let kelp = html.find("<h3>kelp</h3>").unwrap();
    assert!(tidewater < kelp);

    // Only the first education entry has a grade
    assert_eq!(html.matches("class=\"grade\"").count(), 1);
}

#[test]
fn test_projects_section_absent_when_missing_or_empty() {
    for document in [without("projects"), with("projects", serde_json::json!([]))] {
        let html = ready_page(&document).render();
        assert!(!html.contains("id=\"projects\""));
        assert!(!html.contains("tidewater"));
        // The rest of the page is unaffected
        assert!(html.contains("id=\"arsenal\""));
    }
}

#[test]
fn test_arsenal_section_absent_when_missing_or_empty() {
    for document in [without("arsenal"), with("arsenal", serde_json::json!([]))] {
        let html = ready_page(&document).render();
        assert!(!html.contains("id=\"arsenal\""));
        assert!(!html.contains("Infrastructure"));
        assert!(html.contains("id=\"projects\""));
    }
}

#[test]
fn test_social_links_only_when_present() {
    let html = ready_page(PROFILE).render();
    assert!(html.contains("https://github.com/janedoe"));
    assert!(html.contains("https://facebook.com/janedoe"));
    assert!(!html.contains("social-instagram"));

    // Facebook is listed in the About card but not in the footer
    assert_eq!(html.matches("href=\"https://facebook.com/janedoe\"").count(), 1);
    assert_eq!(html.matches("href=\"https://github.com/janedoe\"").count(), 2);

    let html = ready_page(&without("socials")).render();
    assert!(!html.contains("Social Connect"));
    assert!(!html.contains("footer-socials"));
}

#[test]
fn test_failed_state_shows_no_profile_content() {
    let mut page = Page::default();
    page.apply(PageEvent::Loaded(LoadState::Failed));
    let html = page.render();

    assert!(html.contains(LOAD_FAILED_MESSAGE));
    assert!(!html.contains("Jane"));
    assert!(!html.contains("<nav"));
    assert!(!html.contains("<main>"));
}

#[test]
fn test_loading_state_shows_spinner_only() {
    let html = Page::default().render();
    assert!(html.contains("class=\"spinner\""));
    assert!(!html.contains(LOAD_FAILED_MESSAGE));
    assert!(!html.contains("<main>"));
}

#[test]
fn test_menu_renders_mobile_nav_only_when_open() {
    let mut page = ready_page(PROFILE);
    assert!(!page.render().contains("mobile-nav"));
    assert!(page.render().contains("aria-expanded=\"false\""));

    page.apply(PageEvent::MenuToggled);
    let html = page.render();
    assert!(html.contains("mobile-nav"));
    assert!(html.contains("aria-expanded=\"true\""));
    assert_eq!(html.matches("href=\"#education\"").count(), 2);

    page.apply(PageEvent::NavLinkClicked);
    assert!(!page.render().contains("mobile-nav"));
}

#[test]
fn test_scroll_to_top_visibility_in_markup() {
    let mut page = ready_page(PROFILE);
    let threshold = page.scroll().threshold();

    page.apply(PageEvent::Scrolled(threshold + 1.0));
    assert!(page.render().contains("aria-label=\"Scroll to top\">"));

    page.apply(PageEvent::Scrolled(threshold));
    assert!(page.render().contains("aria-label=\"Scroll to top\" hidden>"));

    page.apply(PageEvent::Scrolled(threshold - 1.0));
    assert!(page.render().contains("aria-label=\"Scroll to top\" hidden>"));
}

#[test]
fn test_typewriter_partial_greeting_in_hero() {
    let mut page = Page::default();
    page.apply(PageEvent::Loaded(LoadState::Ready(
        Profile::from_json_str(PROFILE).unwrap(),
    )));
    for _ in 0..5 {
        page.apply(PageEvent::TypewriterTick);
    }
    let html = page.render();
    assert!(html.contains("<h1 class=\"greeting\">I'm J<span"));
    assert!(!html.contains("Jane Doe"));
}

#[test]
fn test_footer_clock_and_year() {
    let html = ready_page(PROFILE).render();
    assert!(html.contains("<time>14:30:00</time>"));
    assert!(html.contains("&copy; 2026 Portfolio."));
}

#[tokio::test]
async fn test_portfolio_invalid_json_fails() {
    let dir = scratch_dir("invalid");
    tokio::fs::create_dir_all(&dir).await.unwrap();
    let path = dir.join("profile.json");
    tokio::fs::write(&path, "{ \"name\": \"Jane\"").await.unwrap();

    let portfolio = Portfolio::new(ProfileSource::File(path)).await;
    assert!(portfolio.load_state().is_failed());
    assert!(portfolio.sections().is_empty());
    assert!(portfolio.render_html().contains(LOAD_FAILED_MESSAGE));
    assert!(portfolio.write_site(dir.join("dist")).await.is_err());

    tokio::fs::remove_dir_all(&dir).await.unwrap();
}

#[tokio::test]
async fn test_portfolio_write_site() {
    let dir = scratch_dir("site");
    tokio::fs::create_dir_all(&dir).await.unwrap();
    let path = dir.join("profile.json");
    tokio::fs::write(&path, PROFILE).await.unwrap();

    let portfolio = Portfolio::new(ProfileSource::File(path)).await;
    assert_eq!(
        portfolio.sections().last().copied(),
        Some(Section::Footer)
    );

    let out = dir.join("dist");
    let index = portfolio.write_site(&out).await.unwrap();
    assert_eq!(index, out.join(INDEX_FILE));

    let html = tokio::fs::read_to_string(&index).await.unwrap();
    assert!(html.contains("<h1 class=\"greeting\">I'm Jane Doe<span"));

    // The copied document loads back to the same profile
    let copied = tokio::fs::read_to_string(out.join(PROFILE_PATH)).await.unwrap();
    assert_eq!(
        Profile::from_json_str(&copied).unwrap(),
        Profile::from_json_str(PROFILE).unwrap()
    );

    tokio::fs::remove_dir_all(&dir).await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn test_live_page_runs_timers_until_unmount() {
    let mut live = LivePage::mount(
        &SiteConfig::default(),
        Box::new(MemoryFetcher(PROFILE.to_string())),
    );
    assert!(live.is_mounted());
    assert_eq!(live.active_tasks(), 3);

    assert!(live.wait_loaded().await.profile().is_some());

    while !live.page().typewriter().is_complete() {
        live.next_event().await.unwrap();
    }
    assert_eq!(live.page().typewriter().displayed(), "I'm Jane Doe");
    assert!(!live.page().clock().display().is_empty());

    let scroll = live.scroll_handle();
    assert!(scroll.scrolled(900.0));
    loop {
        if let Some(PageEvent::Scrolled(_)) = live.next_event().await {
            break;
        }
    }
    assert!(live.page().scroll().is_visible());

    live.toggle_menu();
    assert!(live.page().menu().is_open());
    live.click_nav_link();
    assert!(!live.page().menu().is_open());

    live.unmount();
    assert!(!live.is_mounted());
    assert!(!scroll.scrolled(10.0));

    // Tickers stop without waiting for their next period
    run_pending_tasks().await;
    assert_eq!(live.active_tasks(), 0);

    tokio::time::advance(Duration::from_secs(10)).await;
    assert!(live.next_event().await.is_none());
}

#[tokio::test(start_paused = true)]
async fn test_unmount_aborts_fetch_in_flight() {
    let (mut live, dropped) = stalled_page();
    for _ in 0..3 {
        live.next_event().await.unwrap();
    }
    assert!(live.page().load_state().is_loading());
    assert_eq!(live.active_tasks(), 3);
    assert!(!dropped.load(Ordering::SeqCst));

    live.unmount();
    run_pending_tasks().await;
    assert!(dropped.load(Ordering::SeqCst));
    assert_eq!(live.active_tasks(), 0);

    tokio::time::advance(Duration::from_secs(60)).await;
    assert_eq!(live.active_tasks(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_dropping_live_page_aborts_tasks() {
    let (mut live, dropped) = stalled_page();
    let scroll = live.scroll_handle();
    for _ in 0..3 {
        live.next_event().await.unwrap();
    }

    drop(live);
    run_pending_tasks().await;
    assert!(dropped.load(Ordering::SeqCst));
    assert!(!scroll.scrolled(10.0));
}

#[tokio::test(start_paused = true)]
async fn test_live_page_fetch_failure() {
    let mut live = LivePage::mount(&SiteConfig::default(), Box::new(OfflineFetcher));
    assert!(live.wait_loaded().await.is_failed());

    // Timers keep running, but the page stays in the failed state
    for _ in 0..5 {
        live.next_event().await.unwrap();
    }
    let html = live.render();
    assert!(html.contains(LOAD_FAILED_MESSAGE));
    assert!(!html.contains("Jane"));

    live.unmount();
    run_pending_tasks().await;
    assert_eq!(live.active_tasks(), 0);
}
