//! Finds the signature button TinyMCE renders into its toolbar.
//!
//! The toolbar is built asynchronously, so a lookup can legitimately come up
//! empty. Once a button is found it is kept for the rest of the session.

use std::cell::RefCell;

use tracing::{debug, trace};
use wasm_bindgen::JsCast;

const TOOLBAR_BUTTON_SELECTOR: &str = ".tox-toolbar .tox-tbtn";

/// Result of a locator query.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Lookup<B> {
    Found(B),
    NotYetAvailable,
}

impl<B> Lookup<B> {
    pub fn found(self) -> Option<B> {
        match self {
            Self::Found(button) => Some(button),
            Self::NotYetAvailable => None,
        }
    }
}

/// Source of toolbar buttons, matched by accessible label.
pub trait ToolbarQuery {
    type Button: Clone;

    fn find_labelled(&self, label: &str) -> Option<Self::Button>;
}

/// Queries the live document.
#[derive(Clone, Copy, Debug, Default)]
pub struct DomToolbar;

impl ToolbarQuery for DomToolbar {
    type Button = web_sys::Element;

    fn find_labelled(&self, label: &str) -> Option<web_sys::Element> {
        let document = web_sys::window()?.document()?;
        let buttons = document.query_selector_all(TOOLBAR_BUTTON_SELECTOR).ok()?;
        let mut matched = None;
        // Last match wins when several buttons share the label.
        for i in 0..buttons.length() {
            let Some(element) = buttons
                .item(i)
                .and_then(|node| node.dyn_into::<web_sys::Element>().ok())
            else {
                continue;
            };
            if element.get_attribute("aria-label").as_deref() == Some(label) {
                matched = Some(element);
            }
        }
        matched
    }
}

/// Caching wrapper around a [`ToolbarQuery`].
pub struct ToolbarButtonLocator<Q: ToolbarQuery> {
    query: Q,
    label: String,
    cached: RefCell<Option<Q::Button>>,
}

impl<Q: ToolbarQuery> ToolbarButtonLocator<Q> {
    pub fn new(query: Q, label: impl Into<String>) -> Self {
        Self {
            query,
            label: label.into(),
            cached: RefCell::new(None),
        }
    }

    /// Return the cached button, or query once and cache on success.
    pub fn locate(&self) -> Lookup<Q::Button> {
        if let Some(button) = self.cached.borrow().as_ref() {
            trace!(label = %self.label, "toolbar button served from cache");
            return Lookup::Found(button.clone());
        }
        match self.query.find_labelled(&self.label) {
            Some(button) => {
                debug!(label = %self.label, "toolbar button located");
                *self.cached.borrow_mut() = Some(button.clone());
                Lookup::Found(button)
            }
            None => {
                debug!(label = %self.label, "toolbar button not rendered yet");
                Lookup::NotYetAvailable
            }
        }
    }

    /// The cached button without querying.
    pub fn cached(&self) -> Option<Q::Button> {
        self.cached.borrow().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[derive(Default)]
    struct FakeToolbar {
        rendered: Cell<bool>,
        queries: Cell<u32>,
    }

    impl ToolbarQuery for &FakeToolbar {
        type Button = &'static str;

        fn find_labelled(&self, label: &str) -> Option<&'static str> {
            self.queries.set(self.queries.get() + 1);
            (self.rendered.get() && label == "Insert Signature").then_some("button#sig")
        }
    }

    #[test]
    fn reports_not_yet_available_until_rendered() {
        let toolbar = FakeToolbar::default();
        let locator = ToolbarButtonLocator::new(&toolbar, "Insert Signature");

        assert_eq!(locator.locate(), Lookup::NotYetAvailable);
        assert_eq!(locator.cached(), None);

        toolbar.rendered.set(true);
        assert_eq!(locator.locate(), Lookup::Found("button#sig"));
        assert_eq!(toolbar.queries.get(), 2);
    }

    #[test]
    fn never_unfinds_a_cached_button() {
        let toolbar = FakeToolbar::default();
        toolbar.rendered.set(true);
        let locator = ToolbarButtonLocator::new(&toolbar, "Insert Signature");
        assert!(locator.locate().found().is_some());

        toolbar.rendered.set(false);
        assert_eq!(locator.locate(), Lookup::Found("button#sig"));
        assert_eq!(locator.cached(), Some("button#sig"));
        assert_eq!(toolbar.queries.get(), 1);
    }

    #[test]
    fn label_must_match_exactly() {
        let toolbar = FakeToolbar::default();
        toolbar.rendered.set(true);
        let locator = ToolbarButtonLocator::new(&toolbar, "Insert signature");
        assert_eq!(locator.locate(), Lookup::NotYetAvailable);
    }
}
