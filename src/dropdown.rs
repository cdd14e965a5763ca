//! Open/closed state of the signature panel.
//!
//! The toolbar button's action toggles the panel and arms a one-shot
//! suppression flag, so the pointer-down belonging to that same click is not
//! read as a click outside the panel. The document-level listener that feeds
//! [`DropdownState::pointer_down`] lives only while the panel is open; see
//! [`OutsideClickListener`].

use gloo_events::EventListener;
use tracing::trace;
use wasm_bindgen::JsCast;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DropdownState {
    open: bool,
    suppress_next_pointer: bool,
}

/// Where a pointer-down landed. `None` means the element was not mounted, in
/// which case the click cannot be proven to be outside it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PointerHit {
    pub in_panel: Option<bool>,
    pub in_button: Option<bool>,
}

impl PointerHit {
    pub fn is_outside(self) -> bool {
        self.in_panel == Some(false) && self.in_button == Some(false)
    }
}

impl DropdownState {
    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn is_suppressing(&self) -> bool {
        self.suppress_next_pointer
    }

    /// Toolbar button action.
    pub fn toggle(&mut self) {
        self.suppress_next_pointer = true;
        self.open = !self.open;
        trace!(open = self.open, "signature panel toggled");
    }

    /// Zero-delay fallback for when no pointer-down follows the toggle.
    pub fn release_suppression(&mut self) {
        self.suppress_next_pointer = false;
    }

    pub fn close(&mut self) {
        self.open = false;
    }

    /// Feed a global pointer-down. Returns `true` when it closed the panel.
    pub fn pointer_down(&mut self, hit: PointerHit) -> bool {
        if self.suppress_next_pointer {
            self.suppress_next_pointer = false;
            trace!("pointer-down swallowed after toggle");
            return false;
        }
        if self.open && hit.is_outside() {
            self.open = false;
            return true;
        }
        false
    }
}

/// Document `mousedown` subscription, removed when dropped.
pub struct OutsideClickListener {
    _listener: EventListener,
}

impl OutsideClickListener {
    pub fn attach<F>(mut on_pointer_down: F) -> Option<Self>
    where
        F: FnMut(Option<&web_sys::Node>) + 'static,
    {
        let document = web_sys::window()?.document()?;
        let listener = EventListener::new(&document, "mousedown", move |event| {
            let target = event
                .target()
                .and_then(|t| t.dyn_into::<web_sys::Node>().ok());
            on_pointer_down(target.as_ref());
        });
        trace!("outside-click listener attached");
        Some(Self {
            _listener: listener,
        })
    }
}

impl Drop for OutsideClickListener {
    fn drop(&mut self) {
        trace!("outside-click listener released");
    }
}

/// Whether `target` is `container` or one of its descendants.
pub fn contains<C>(container: Option<&C>, target: Option<&web_sys::Node>) -> Option<bool>
where
    C: AsRef<web_sys::Node>,
{
    let container: &web_sys::Node = container?.as_ref();
    Some(target.is_some_and(|node| container.contains(Some(node))))
}

#[cfg(test)]
mod tests {
    use super::*;

    const OUTSIDE: PointerHit = PointerHit {
        in_panel: Some(false),
        in_button: Some(false),
    };

    #[test]
    fn starts_closed() {
        let state = DropdownState::default();
        assert!(!state.is_open());
        assert!(!state.is_suppressing());
    }

    #[test]
    fn toggle_click_does_not_close_itself() {
        let mut state = DropdownState::default();
        state.toggle();
        assert!(state.is_open());
        assert!(state.is_suppressing());

        // The pointer-down belonging to the click that opened the panel.
        assert!(!state.pointer_down(OUTSIDE));
        assert!(state.is_open());

        // A later, separate click outside.
        assert!(state.pointer_down(OUTSIDE));
        assert!(!state.is_open());
    }

    #[test]
    fn fallback_release_lets_first_outside_click_close() {
        let mut state = DropdownState::default();
        state.toggle();
        state.release_suppression();
        assert!(state.pointer_down(OUTSIDE));
        assert!(!state.is_open());
    }

    #[test]
    fn clicks_inside_panel_or_button_keep_it_open() {
        let mut state = DropdownState::default();
        state.toggle();
        state.release_suppression();

        let in_panel = PointerHit {
            in_panel: Some(true),
            in_button: Some(false),
        };
        let in_button = PointerHit {
            in_panel: Some(false),
            in_button: Some(true),
        };
        assert!(!state.pointer_down(in_panel));
        assert!(!state.pointer_down(in_button));
        assert!(state.is_open());
    }

    #[test]
    fn unmounted_elements_never_count_as_outside() {
        let mut state = DropdownState::default();
        state.toggle();
        state.release_suppression();
        let no_panel = PointerHit {
            in_panel: None,
            in_button: Some(false),
        };
        assert!(!state.pointer_down(no_panel));
        assert!(state.is_open());
    }

    #[test]
    fn toggle_twice_closes_and_close_is_idempotent() {
        let mut state = DropdownState::default();
        state.toggle();
        state.toggle();
        assert!(!state.is_open());
        state.close();
        state.close();
        assert!(!state.is_open());
    }

    #[test]
    fn closed_panel_ignores_pointer_downs() {
        let mut state = DropdownState::default();
        assert!(!state.pointer_down(OUTSIDE));
        assert!(!state.is_open());
    }
}
