//! Horizontal panel strip geometry.
//!
//! ```text
//! +------------------------------------------------------------+
//! | padding                                                    |
//! |  +-----------+ gap +-----------+ gap +-----------+ ...     |
//! |  | header    |     | header    |     | header    |         |
//! |  |-----------|     |-----------|     |-----------|         |
//! |  | content   |     | content   |     | content   |         |
//! |  +-----------+     +-----------+     +-----------+         |
//! | padding                                                    |
//! |------------------------------------------------------------|
//! | composer                                                   |
//! +------------------------------------------------------------+
//! ```
//!
//! Panel widths are a percentage of the viewport width, so the strip can be
//! wider than the window and scrolls horizontally.

use chorus_common::types::Rect;
use serde::Serialize;

use crate::reporter::{PlaceholderGeometry, ScrollContainer};

/// Fixed measurements of the strip, in logical pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StripMetrics {
    pub padding: f64,
    pub gap: f64,
    pub header_height: f64,
    pub border_width: f64,
    pub composer_height: f64,
}

impl Default for StripMetrics {
    fn default() -> Self {
        Self {
            padding: 8.0,
            gap: 8.0,
            header_height: 36.0,
            border_width: 1.0,
            composer_height: 64.0,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct StripPanel {
    width_percent: u32,
    mounted: bool,
}

/// Outer frame and header of one panel, for drawing the chrome.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PanelFrame {
    pub index: usize,
    pub frame: Rect,
    pub header: Rect,
    pub width_percent: u32,
}

pub struct StripLayout {
    metrics: StripMetrics,
    viewport_width: f64,
    viewport_height: f64,
    panels: Vec<StripPanel>,
    scroll_x: f64,
}

impl StripLayout {
    /// A strip with one unmounted panel per width.
    pub fn new(metrics: StripMetrics, widths: impl IntoIterator<Item = u32>) -> Self {
        Self {
            metrics,
            viewport_width: 0.0,
            viewport_height: 0.0,
            panels: widths
                .into_iter()
                .map(|width_percent| StripPanel {
                    width_percent,
                    mounted: false,
                })
                .collect(),
            scroll_x: 0.0,
        }
    }

    pub fn metrics(&self) -> StripMetrics {
        self.metrics
    }

    pub fn panel_count(&self) -> usize {
        self.panels.len()
    }

    /// Resize the viewport. Returns whether anything changed.
    pub fn set_viewport(&mut self, width: f64, height: f64) -> bool {
        if width == self.viewport_width && height == self.viewport_height {
            return false;
        }
        self.viewport_width = width.max(0.0);
        self.viewport_height = height.max(0.0);
        self.scroll_x = self.scroll_x.clamp(0.0, self.max_scroll());
        true
    }

    pub fn viewport(&self) -> (f64, f64) {
        (self.viewport_width, self.viewport_height)
    }

    pub fn mount(&mut self, index: usize) -> bool {
        match self.panels.get_mut(index) {
            Some(panel) => {
                panel.mounted = true;
                true
            }
            None => false,
        }
    }

    pub fn mount_all(&mut self) {
        for panel in &mut self.panels {
            panel.mounted = true;
        }
    }

    pub fn unmount(&mut self, index: usize) {
        if let Some(panel) = self.panels.get_mut(index) {
            panel.mounted = false;
        }
    }

    pub fn is_mounted(&self, index: usize) -> bool {
        self.panels.get(index).is_some_and(|p| p.mounted)
    }

    pub fn width_percent(&self, index: usize) -> Option<u32> {
        self.panels.get(index).map(|p| p.width_percent)
    }

    /// Change one panel's width. Returns whether it changed.
    pub fn set_width_percent(&mut self, index: usize, percent: u32) -> bool {
        let Some(panel) = self.panels.get_mut(index) else {
            return false;
        };
        if panel.width_percent == percent {
            return false;
        }
        panel.width_percent = percent;
        self.scroll_x = self.scroll_x.clamp(0.0, self.max_scroll());
        true
    }

    pub fn scroll_x(&self) -> f64 {
        self.scroll_x
    }

    fn panel_width(&self, panel: &StripPanel) -> f64 {
        self.viewport_width * f64::from(panel.width_percent) / 100.0
    }

    fn strip_height(&self) -> f64 {
        let m = &self.metrics;
        (self.viewport_height - m.composer_height - 2.0 * m.padding).max(0.0)
    }

    /// Total scrollable width of the strip including padding.
    pub fn content_width(&self) -> f64 {
        let m = &self.metrics;
        let panels: f64 = self.panels.iter().map(|p| self.panel_width(p)).sum();
        let gaps = m.gap * self.panels.len().saturating_sub(1) as f64;
        2.0 * m.padding + panels + gaps
    }

    pub fn max_scroll(&self) -> f64 {
        (self.content_width() - self.viewport_width).max(0.0)
    }

    /// Outer frame of a panel in viewport coordinates, after scrolling.
    pub fn panel_rect(&self, index: usize) -> Option<Rect> {
        let m = &self.metrics;
        let mut x = m.padding - self.scroll_x;
        for (i, panel) in self.panels.iter().enumerate() {
            let width = self.panel_width(panel);
            if i == index {
                return Some(Rect::new(x, m.padding, width, self.strip_height()));
            }
            x += width + m.gap;
        }
        None
    }

    /// Content area below the header, inside the border.
    fn content_rect(&self, index: usize) -> Option<Rect> {
        let m = &self.metrics;
        let frame = self.panel_rect(index)?;
        Some(Rect::new(
            frame.x + m.border_width,
            frame.y + m.border_width + m.header_height,
            (frame.width - 2.0 * m.border_width).max(0.0),
            (frame.height - 2.0 * m.border_width - m.header_height).max(0.0),
        ))
    }

    /// Frames and headers of every panel, mounted or not.
    pub fn frames(&self) -> Vec<PanelFrame> {
        let m = &self.metrics;
        (0..self.panels.len())
            .filter_map(|index| {
                let frame = self.panel_rect(index)?;
                Some(PanelFrame {
                    index,
                    frame,
                    header: Rect::new(
                        frame.x + m.border_width,
                        frame.y + m.border_width,
                        (frame.width - 2.0 * m.border_width).max(0.0),
                        m.header_height,
                    ),
                    width_percent: self.panels[index].width_percent,
                })
            })
            .collect()
    }

    /// The broadcast bar along the bottom edge.
    pub fn composer_rect(&self) -> Rect {
        let m = &self.metrics;
        let height = m.composer_height.min(self.viewport_height);
        Rect::new(
            0.0,
            self.viewport_height - height,
            self.viewport_width,
            height,
        )
    }
}

impl PlaceholderGeometry for StripLayout {
    fn placeholder_rect(&self, index: usize) -> Option<Rect> {
        if !self.is_mounted(index) {
            return None;
        }
        self.content_rect(index)
    }
}

impl ScrollContainer for StripLayout {
    fn scroll_by(&mut self, delta_x: f64) -> bool {
        if !delta_x.is_finite() {
            return false;
        }
        let next = (self.scroll_x + delta_x).clamp(0.0, self.max_scroll());
        if next == self.scroll_x {
            return false;
        }
        self.scroll_x = next;
        true
    }
}

// =============================================================================
// TESTS
// =============================================================================
