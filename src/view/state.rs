use crate::bondlayer::dto::CatalogResponse;
use crate::bondlayer::model::{Event, RelatedEntity};
use std::collections::BTreeMap;
use tracing::debug;

/// Host capability for freezing the page scroll while the detail overlay is
/// open. Implementations must keep layout width stable while locked so fixed
/// content does not shift.
pub trait ScrollLock {
    fn current_offset(&self) -> f64;
    fn lock(&mut self, offset: f64);
    fn unlock(&mut self, offset: f64);
}

/// Where a click landed while the overlay was open. Clicks inside the detail
/// panel (including its links) must not reach the backdrop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickTarget {
    Backdrop,
    CloseButton,
    Panel,
    PanelLink,
}

/// Session-scoped state: the fetched catalog, the fetch status and the
/// single selected event. All mutation goes through the named actions.
pub struct AppState<S: ScrollLock> {
    pub items: Vec<Event>,
    pub related: BTreeMap<String, RelatedEntity>,
    pub loading: bool,
    pub error: Option<String>,
    selected: Option<Event>,
    saved_offset: Option<f64>,
    scroll: S,
}

impl<S: ScrollLock> AppState<S> {
    pub fn new(scroll: S) -> Self {
        Self {
            items: Vec::new(),
            related: BTreeMap::new(),
            loading: true,
            error: None,
            selected: None,
            saved_offset: None,
            scroll,
        }
    }

    pub fn fetch_succeeded(&mut self, catalog: CatalogResponse) {
        debug!(
            "Catalog loaded: {} events, {} related records",
            catalog.items.len(),
            catalog.related.len()
        );

        self.items = catalog.items;
        self.related = catalog.related;
        self.loading = false;
    }

    pub fn fetch_failed(&mut self, message: String) {
        debug!("Catalog fetch failed: {}", message);

        self.error = Some(message);
        self.loading = false;
    }

    /// Opens the detail overlay on `event`, replacing any current selection
    /// without an intermediate closed state. The scroll surface is locked
    /// before the selection becomes visible; the offset recorded on the
    /// first open of the cycle is the one that will be restored.
    pub fn select(&mut self, event: &Event) {
        if self.saved_offset.is_none() {
            let offset = self.scroll.current_offset();

            self.scroll.lock(offset);
            self.saved_offset = Some(offset);
        }

        debug!("Selected event {}", event.id);
        self.selected = Some(event.clone());
    }

    /// Closes the overlay and restores the recorded scroll offset exactly.
    /// Safe to call when nothing is selected.
    pub fn dismiss(&mut self) {
        self.selected = None;
        self.release_scroll();
    }

    pub fn handle_overlay_click(&mut self, target: ClickTarget) {
        match target {
            ClickTarget::Backdrop | ClickTarget::CloseButton => self.dismiss(),
            ClickTarget::Panel | ClickTarget::PanelLink => {}
        }
    }

    pub fn selected_item(&self) -> Option<&Event> {
        self.selected.as_ref()
    }

    pub fn overlay_open(&self) -> bool {
        self.selected.is_some()
    }

    fn release_scroll(&mut self) {
        if let Some(offset) = self.saved_offset.take() {
            self.scroll.unlock(offset);
        }
    }
}

// Teardown with the overlay still open must not leave the page locked
impl<S: ScrollLock> Drop for AppState<S> {
    fn drop(&mut self) {
        self.release_scroll();
    }
}
