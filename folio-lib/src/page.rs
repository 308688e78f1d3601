use crate::config::SiteConfig;
use crate::loader::{load_profile, LoadState, ProfileFetcher};
use crate::nav::MenuState;
use crate::profile::Profile;
use crate::render::render_page;
use crate::ui::{Clock, ScrollToTop, Typewriter};
use chrono::{Local, NaiveDateTime};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::{debug, info};

const EVENT_BUFFER: usize = 64;

/// Everything that can change the page
#[derive(Debug, Clone, PartialEq)]
pub enum PageEvent {
    /// The single profile load settled
    Loaded(LoadState),
    MenuToggled,
    NavLinkClicked,
    /// Vertical scroll offset in pixels
    Scrolled(f64),
    TypewriterTick,
    ClockTick(NaiveDateTime),
}

/// Page controller state.
///
/// The profile is written once by the first `Loaded` event and never touched
/// again. The UI affordances are independent of each other and of the profile,
/// except that the typewriter text is derived from the loaded name.
#[derive(Debug, Clone)]
pub struct Page {
    load: LoadState,
    menu: MenuState,
    scroll: ScrollToTop,
    typewriter: Typewriter,
    clock: Clock,
}

impl Page {
    pub fn new(config: &SiteConfig) -> Self {
        Self {
            load: LoadState::Loading,
            menu: MenuState::default(),
            scroll: ScrollToTop::new(config.scroll_threshold),
            typewriter: Typewriter::default(),
            clock: Clock::new(config.clock_format.clone()),
        }
    }

    /// Apply one event to the page
    pub fn apply(&mut self, event: PageEvent) {
        match event {
            PageEvent::Loaded(state) => self.settle(state),
            PageEvent::MenuToggled => self.menu.toggle(),
            PageEvent::NavLinkClicked => self.menu.close(),
            PageEvent::Scrolled(offset) => self.scroll.on_scroll(offset),
            PageEvent::TypewriterTick => {
                self.typewriter.tick();
            }
            PageEvent::ClockTick(now) => self.clock.tick(now),
        }
    }

    fn settle(&mut self, state: LoadState) {
        if !self.load.is_loading() {
            debug!("ignoring repeated load result, profile is fetched once");
            return;
        }
        if state.is_loading() {
            return;
        }
        if let LoadState::Ready(profile) = &state {
            self.typewriter.set_source(&profile.greeting());
        }
        self.load = state;
    }

    /// Bring the time-driven parts to their final state, for one-shot renders
    pub fn settle_for_static(&mut self, now: NaiveDateTime) {
        self.typewriter.finish();
        self.clock.tick(now);
    }

    pub fn render(&self) -> String {
        render_page(self)
    }

    pub fn load_state(&self) -> &LoadState {
        &self.load
    }

    pub fn profile(&self) -> Option<&Profile> {
        self.load.profile()
    }

    pub fn menu(&self) -> &MenuState {
        &self.menu
    }

    pub fn scroll(&self) -> &ScrollToTop {
        &self.scroll
    }

    pub fn typewriter(&self) -> &Typewriter {
        &self.typewriter
    }

    pub fn clock(&self) -> &Clock {
        &self.clock
    }
}

impl Default for Page {
    fn default() -> Self {
        Self::new(&SiteConfig::default())
    }
}

/// Passive scroll listener handed to whatever reports scroll offsets.
///
/// Reports are dropped, never awaited, when the page is busy or torn down.
#[derive(Debug, Clone)]
pub struct ScrollHandle {
    sender: mpsc::Sender<PageEvent>,
}

impl ScrollHandle {
    /// Report a scroll offset. Returns false once the page is unmounted.
    pub fn scrolled(&self, offset: f64) -> bool {
        match self.sender.try_send(PageEvent::Scrolled(offset)) {
            Ok(()) => true,
            Err(mpsc::error::TrySendError::Full(_)) => {
                debug!(offset, "scroll event dropped, page is busy");
                true
            }
            Err(mpsc::error::TrySendError::Closed(_)) => false,
        }
    }
}

/// A mounted page: the profile fetch and the recurring timers run as tokio
/// tasks feeding one event channel.
///
/// Every task is aborted on [`LivePage::unmount`] or when the value is
/// dropped, so no periodic work outlives the page.
pub struct LivePage {
    page: Page,
    sender: mpsc::Sender<PageEvent>,
    events: mpsc::Receiver<PageEvent>,
    tasks: Vec<JoinHandle<()>>,
    mounted: bool,
}

impl LivePage {
    /// Mount the page: start the single profile fetch, the typewriter timer
    /// and the clock timer. Must be called within a tokio runtime.
    pub fn mount(config: &SiteConfig, fetcher: Box<dyn ProfileFetcher>) -> Self {
        let (sender, events) = mpsc::channel(EVENT_BUFFER);
        let mut tasks = Vec::with_capacity(3);

        let load_sender = sender.clone();
        tasks.push(tokio::spawn(async move {
            let state = load_profile(fetcher.as_ref()).await;
            let _ = load_sender.send(PageEvent::Loaded(state)).await;
        }));

        tasks.push(spawn_ticker(
            sender.clone(),
            config.typewriter_interval(),
            false,
            || PageEvent::TypewriterTick,
        ));
        tasks.push(spawn_ticker(
            sender.clone(),
            config.clock_interval(),
            true,
            || PageEvent::ClockTick(Local::now().naive_local()),
        ));

        info!(
            typewriter_ms = config.typewriter_interval_ms,
            clock_ms = config.clock_interval_ms,
            "page mounted"
        );

        Self {
            page: Page::new(config),
            sender,
            events,
            tasks,
            mounted: true,
        }
    }

    /// Wait for the next event and apply it. Returns `None` once unmounted.
    pub async fn next_event(&mut self) -> Option<PageEvent> {
        if !self.mounted {
            return None;
        }
        let event = self.events.recv().await?;
        self.page.apply(event.clone());
        Some(event)
    }

    /// Drive the page until the profile load settles
    pub async fn wait_loaded(&mut self) -> &LoadState {
        while self.page.load_state().is_loading() {
            if self.next_event().await.is_none() {
                break;
            }
        }
        self.page.load_state()
    }

    pub fn toggle_menu(&mut self) {
        self.page.apply(PageEvent::MenuToggled);
    }

    pub fn click_nav_link(&mut self) {
        self.page.apply(PageEvent::NavLinkClicked);
    }

    pub fn scroll_handle(&self) -> ScrollHandle {
        ScrollHandle {
            sender: self.sender.clone(),
        }
    }

    pub fn page(&self) -> &Page {
        &self.page
    }

    pub fn render(&self) -> String {
        self.page.render()
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    /// Number of spawned tasks that have not finished yet.
    ///
    /// Aborted tasks count until the runtime has polled their cancellation.
    pub fn active_tasks(&self) -> usize {
        self.tasks.iter().filter(|task| !task.is_finished()).count()
    }

    /// Tear the page down: stop every timer and the fetch if it is still in
    /// flight, close the scroll listener and discard queued events.
    pub fn unmount(&mut self) {
        if !self.mounted {
            return;
        }
        for task in &self.tasks {
            task.abort();
        }
        self.events.close();
        while self.events.try_recv().is_ok() {}
        self.mounted = false;
        info!("page unmounted");
    }
}

impl Drop for LivePage {
    fn drop(&mut self) {
        for task in &self.tasks {
            task.abort();
        }
    }
}

fn spawn_ticker<F>(
    sender: mpsc::Sender<PageEvent>,
    period: Duration,
    immediate: bool,
    make_event: F,
) -> JoinHandle<()>
where
    F: Fn() -> PageEvent + Send + 'static,
{
    tokio::spawn(async move {
        let start = if immediate {
            Instant::now()
        } else {
            Instant::now() + period
        };
        let mut interval = time::interval_at(start, period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            interval.tick().await;
            if sender.send(make_event()).await.is_err() {
                break;
            }
        }
    })
}
