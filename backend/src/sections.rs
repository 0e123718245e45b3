// Active-section tracking for the landing page.
//
// The landing page is four full-viewport sections stacked vertically. Wheel,
// keyboard, scroll and visibility input all move the "active" section; each
// source is throttled on its own. Nav clicks are applied immediately.

use std::time::{Duration, Instant};

use serde::Serialize;

use crate::throttle::{Throttle, ThrottleKey};

/// Wheel deltas smaller than this are treated as jitter.
pub const WHEEL_THRESHOLD: f64 = 50.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Section {
    Hero,
    HowItWorks,
    Features,
    About,
}

impl Section {
    /// Page order, top to bottom.
    pub const ALL: [Section; 4] = [
        Section::Hero,
        Section::HowItWorks,
        Section::Features,
        Section::About,
    ];

    /// DOM id of the section element.
    pub fn id(&self) -> &'static str {
        match self {
            Section::Hero => "hero",
            Section::HowItWorks => "how-it-works",
            Section::Features => "features",
            Section::About => "about",
        }
    }

    /// Label shown in the navigation bar.
    pub fn label(&self) -> &'static str {
        match self {
            Section::Hero => "Home",
            Section::HowItWorks => "How It Works",
            Section::Features => "Features",
            Section::About => "About",
        }
    }

    pub fn from_id(id: &str) -> Option<Section> {
        Self::ALL.into_iter().find(|s| s.id() == id)
    }

    pub fn index(&self) -> usize {
        Self::ALL
            .iter()
            .position(|s| s == self)
            .unwrap_or_default()
    }

    pub fn next(&self) -> Option<Section> {
        Self::ALL.get(self.index() + 1).copied()
    }

    pub fn prev(&self) -> Option<Section> {
        self.index().checked_sub(1).map(|i| Self::ALL[i])
    }
}

impl std::fmt::Display for Section {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.id())
    }
}

/// The input channels that can move the active section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum InputSource {
    Wheel,
    Keyboard,
    Scroll,
    Intersection,
}

impl ThrottleKey for InputSource {
    fn min_interval(&self) -> Duration {
        match self {
            InputSource::Wheel | InputSource::Keyboard => Duration::from_millis(800),
            InputSource::Scroll | InputSource::Intersection => Duration::from_millis(100),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavKey {
    ArrowUp,
    ArrowDown,
    Other,
}

impl NavKey {
    /// Map a DOM `KeyboardEvent.key` value.
    pub fn from_dom_key(key: &str) -> Self {
        match key {
            "ArrowUp" => NavKey::ArrowUp,
            "ArrowDown" => NavKey::ArrowDown,
            _ => NavKey::Other,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NavEvent {
    Wheel { delta_y: f64 },
    Key(NavKey),
    /// Window scrolled to `offset`, with the given viewport height.
    Scroll { offset: f64, viewport_height: f64 },
    /// A section crossed the middle of the viewport.
    Intersecting(Section),
    /// Nav button clicked.
    Select(Section),
}

impl NavEvent {
    fn source(&self) -> Option<InputSource> {
        match self {
            NavEvent::Wheel { .. } => Some(InputSource::Wheel),
            NavEvent::Key(_) => Some(InputSource::Keyboard),
            NavEvent::Scroll { .. } => Some(InputSource::Scroll),
            NavEvent::Intersecting(_) => Some(InputSource::Intersection),
            NavEvent::Select(_) => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Dropped by the throttle for its source.
    Throttled,
    /// Handled, active section unchanged.
    Stayed,
    Moved { from: Section, to: Section },
}

/// Finite-state tracker of the active landing section. One per page instance.
#[derive(Debug, Clone)]
pub struct SectionTracker {
    active: Section,
    throttle: Throttle<InputSource>,
}

impl SectionTracker {
    pub fn new() -> Self {
        Self::starting_at(Section::Hero)
    }

    pub fn starting_at(section: Section) -> Self {
        Self {
            active: section,
            throttle: Throttle::new(),
        }
    }

    pub fn active(&self) -> Section {
        self.active
    }

    pub fn handle(&mut self, event: NavEvent, now: Instant) -> Transition {
        if let Some(source) = event.source() {
            if !self.throttle.try_acquire(source, now) {
                return Transition::Throttled;
            }
        }

        let target = match event {
            NavEvent::Wheel { delta_y } => {
                if delta_y.abs() < WHEEL_THRESHOLD {
                    None
                } else if delta_y > 0.0 {
                    self.active.next()
                } else {
                    self.active.prev()
                }
            }
            NavEvent::Key(NavKey::ArrowDown) => self.active.next(),
            NavEvent::Key(NavKey::ArrowUp) => self.active.prev(),
            NavEvent::Key(NavKey::Other) => None,
            NavEvent::Scroll {
                offset,
                viewport_height,
            } => section_at_offset(offset, viewport_height),
            NavEvent::Intersecting(section) | NavEvent::Select(section) => Some(section),
        };

        match target {
            Some(to) if to != self.active => {
                let from = self.active;
                self.active = to;
                Transition::Moved { from, to }
            }
            _ => Transition::Stayed,
        }
    }
}

impl Default for SectionTracker {
    fn default() -> Self {
        Self::new()
    }
}

/// The section whose band contains `offset`, with every section one
/// viewport tall. A section's band starts a third of a viewport above its
/// top.
pub fn section_at_offset(offset: f64, viewport_height: f64) -> Option<Section> {
    if viewport_height <= 0.0 {
        return None;
    }
    let lead = viewport_height / 3.0;
    Section::ALL
        .into_iter()
        .enumerate()
        .filter(|(i, _)| {
            let top = *i as f64 * viewport_height;
            offset >= top - lead && offset < top + viewport_height - lead
        })
        .map(|(_, s)| s)
        .last()
}
