//! Section tracking for the destination page.
//!
//! The active section is the one containing the viewport's vertical
//! midpoint. When the midpoint falls in a gap (or past the last section)
//! the previous answer stands.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

/// Destination page sections, in page order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Section {
    /// About.
    About,
    /// Skills.
    Skills,
    /// Projects.
    Projects,
    /// Leadership.
    Leadership,
    /// Contact.
    Contact,
}

impl Section {
    /// Every section in page order.
    pub const ALL: [Self; 5] =
        [Self::About, Self::Skills, Self::Projects, Self::Leadership, Self::Contact];

    /// Anchor id.
    pub fn id(self) -> &'static str {
        match self {
            Section::About => "about",
            Section::Skills => "skills",
            Section::Projects => "projects",
            Section::Leadership => "leadership",
            Section::Contact => "contact",
        }
    }

    /// Section by anchor id.
    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.id() == id)
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// Vertical placement of a section inside the scroll container.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SectionLayout {
    /// Which section.
    pub section: Section,
    /// Offset of the section's top edge.
    pub top: f64,
    /// Section height.
    pub height: f64,
}

impl SectionLayout {
    fn contains(&self, y: f64) -> bool {
        y >= self.top && y < self.top + self.height
    }
}

/// What a scroll update changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScrollUpdate {
    /// Newly active section.
    pub activated: Option<Section>,
    /// This was the first scroll away from the top.
    pub first_scroll: bool,
}

/// Tracks the active section and whether the reader has scrolled.
#[derive(Debug, Clone)]
pub struct SectionTracker {
    layout: Vec<SectionLayout>,
    active: Section,
    has_scrolled: bool,
    scroll_top: f64,
}

impl SectionTracker {
    /// Tracker over `layout`; starts on [`Section::About`].
    pub fn new(layout: Vec<SectionLayout>) -> Self {
        Self { layout, active: Section::About, has_scrolled: false, scroll_top: 0.0 }
    }

    /// Evenly stacked sections of `height` each, starting at `offset`.
    pub fn stacked(offset: f64, height: f64) -> Self {
        let mut top = offset;
        let layout = Section::ALL
            .into_iter()
            .map(|section| {
                let l = SectionLayout { section, top, height };
                top += height;
                l
            })
            .collect();
        Self::new(layout)
    }

    /// Replace the layout after a resize.
    pub fn relayout(&mut self, layout: Vec<SectionLayout>) {
        self.layout = layout;
    }

    /// Currently active section.
    pub fn active(&self) -> Section {
        self.active
    }

    /// Whether the content has ever been scrolled away from the top.
    pub fn has_scrolled(&self) -> bool {
        self.has_scrolled
    }

    /// Last reported scroll offset.
    pub fn scroll_top(&self) -> f64 {
        self.scroll_top
    }

    /// Layout entries.
    pub fn layout(&self) -> &[SectionLayout] {
        &self.layout
    }

    /// Top offset to scroll to for `section`.
    pub fn offset_of(&self, section: Section) -> Option<f64> {
        self.layout.iter().find(|l| l.section == section).map(|l| l.top)
    }

    /// Total scrollable height.
    pub fn content_height(&self) -> f64 {
        self.layout.iter().map(|l| l.top + l.height).fold(0.0, f64::max)
    }

    /// Content container scrolled to `scroll_top`.
    pub fn on_scroll(&mut self, scroll_top: f64, viewport_height: f64) -> ScrollUpdate {
        let mut update = ScrollUpdate::default();
        self.scroll_top = scroll_top;

        if !self.has_scrolled && scroll_top > 0.0 {
            self.has_scrolled = true;
            update.first_scroll = true;
            debug!("content scrolled for the first time");
        }

        let probe = scroll_top + viewport_height / 2.0;
        if let Some(hit) = self.layout.iter().find(|l| l.contains(probe)) {
            if hit.section != self.active {
                self.active = hit.section;
                update.activated = Some(hit.section);
            }
        }
        update
    }
}
