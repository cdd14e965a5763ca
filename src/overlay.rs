use tracing::debug;

use crate::config::EditorSettings;

/// Bounding box of the toolbar button, in viewport coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ButtonRect {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

impl From<&web_sys::DomRect> for ButtonRect {
    fn from(rect: &web_sys::DomRect) -> Self {
        Self {
            left: rect.left(),
            top: rect.top(),
            right: rect.right(),
            bottom: rect.bottom(),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ScrollOffset {
    pub x: f64,
    pub y: f64,
}

impl ScrollOffset {
    pub fn of_window() -> Self {
        web_sys::window()
            .map(|w| Self {
                x: w.scroll_x().unwrap_or_default(),
                y: w.scroll_y().unwrap_or_default(),
            })
            .unwrap_or_default()
    }
}

/// Where the signature panel is drawn.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OverlayGeometry {
    pub top: f64,
    pub left: f64,
    pub min_width: f64,
}

impl OverlayGeometry {
    /// Anchor the panel just below the button, nudged left so it lines up
    /// with the toolbar group rather than the icon.
    pub fn anchored_to(rect: ButtonRect, scroll: ScrollOffset, settings: &EditorSettings) -> Self {
        Self {
            top: rect.bottom + scroll.y + settings.overlay_offset_top,
            left: rect.left + scroll.x + settings.overlay_offset_left,
            min_width: settings.overlay_min_width,
        }
    }

    pub fn style(&self) -> String {
        format!(
            "position: fixed; top: {}px; left: {}px; min-width: {}px; z-index: 1000000; background: #ffffff; border: 1px solid #e5e7eb; border-radius: 8px; box-shadow: 0 10px 15px -3px rgba(0, 0, 0, 0.1); overflow: hidden;",
            self.top, self.left, self.min_width
        )
    }
}

/// Holds the last geometry measured for the open panel.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PositionTracker {
    geometry: Option<OverlayGeometry>,
}

impl PositionTracker {
    pub fn geometry(&self) -> Option<OverlayGeometry> {
        self.geometry
    }

    /// Re-measure on a transition to visible. Hidden panels and missing
    /// buttons leave the previous geometry untouched.
    pub fn refresh<F>(
        &mut self,
        visible: bool,
        measure: F,
        settings: &EditorSettings,
    ) -> Option<OverlayGeometry>
    where
        F: FnOnce() -> Option<(ButtonRect, ScrollOffset)>,
    {
        if !visible {
            return None;
        }
        let Some((rect, scroll)) = measure() else {
            debug!("signature button missing; overlay not positioned");
            return None;
        };
        let geometry = OverlayGeometry::anchored_to(rect, scroll, settings);
        self.geometry = Some(geometry);
        Some(geometry)
    }
}
