use chrono::{Datelike, NaiveDateTime};
use std::fmt::Write;
use tracing::warn;

/// Default scroll offset, in pixels, past which the scroll-to-top control shows
pub const DEFAULT_SCROLL_THRESHOLD: f64 = 300.0;

/// Default clock pattern (chrono `strftime` syntax)
pub const DEFAULT_CLOCK_FORMAT: &str = "%H:%M:%S";

/// Visibility of the scroll-to-top control
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollToTop {
    threshold: f64,
    visible: bool,
}

impl ScrollToTop {
    pub fn new(threshold: f64) -> Self {
        Self {
            threshold,
            visible: false,
        }
    }

    /// Recompute visibility from the current vertical scroll offset
    pub fn on_scroll(&mut self, offset: f64) {
        self.visible = offset > self.threshold;
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }
}

impl Default for ScrollToTop {
    fn default() -> Self {
        Self::new(DEFAULT_SCROLL_THRESHOLD)
    }
}

/// Reveals a fixed string one character per tick.
///
/// Characters are Unicode scalar values, so the revealed prefix is always a
/// valid `&str` slice.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Typewriter {
    source: String,
    revealed: usize,
}

impl Typewriter {
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            revealed: 0,
        }
    }

    /// Reveal one more character. Returns false once the full text is shown.
    pub fn tick(&mut self) -> bool {
        if self.is_complete() {
            return false;
        }
        self.revealed += 1;
        true
    }

    /// Replace the source text, restarting only if it actually changed
    pub fn set_source(&mut self, source: &str) {
        if self.source != source {
            self.source = source.to_string();
            self.revealed = 0;
        }
    }

    /// The currently revealed prefix
    pub fn displayed(&self) -> &str {
        match self.source.char_indices().nth(self.revealed) {
            Some((end, _)) => &self.source[..end],
            None => &self.source,
        }
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn revealed(&self) -> usize {
        self.revealed
    }

    pub fn is_complete(&self) -> bool {
        self.revealed >= self.source.chars().count()
    }

    /// Jump to the fully revealed state (used for static renders)
    pub fn finish(&mut self) {
        self.revealed = self.source.chars().count();
    }
}

/// Formatted current time, refreshed on every clock tick
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Clock {
    format: String,
    display: String,
    year: Option<i32>,
}

impl Clock {
    pub fn new(format: impl Into<String>) -> Self {
        Self {
            format: format.into(),
            display: String::new(),
            year: None,
        }
    }

    pub fn tick(&mut self, now: NaiveDateTime) {
        let mut display = String::new();
        // An invalid pattern makes formatting fail instead of panicking here
        if write!(display, "{}", now.format(&self.format)).is_err() {
            warn!(format = %self.format, "invalid clock format");
            display.clear();
        }
        self.display = display;
        self.year = Some(now.year());
    }

    /// Formatted time of the last tick, empty before the first tick
    pub fn display(&self) -> &str {
        &self.display
    }

    /// Year of the last tick, for the footer copyright line
    pub fn year(&self) -> Option<i32> {
        self.year
    }
}

impl Default for Clock {
    fn default() -> Self {
        Self::new(DEFAULT_CLOCK_FORMAT)
    }
}
