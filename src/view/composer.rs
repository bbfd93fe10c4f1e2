use crate::bondlayer::model::{Event, RelatedEntity};
use crate::catalog::resolver::{resolve, RefField};
use crate::catalog::temporal;
use crate::catalog::text::{decode_plain_text, sanitize_rich_text, SafeHtml};
use crate::view::state::{AppState, ScrollLock};
use std::collections::BTreeMap;

/// The whole rendered surface: one of the three exclusive catalog branches,
/// plus the detail overlay drawn additively on top when an event is selected.
#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    pub catalog: CatalogView,
    pub detail: Option<DetailView>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum CatalogView {
    Loading,
    Error(String),
    Grid(Vec<CardView>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct CardView {
    pub id: String,
    pub title: String,
    pub image_url: Option<String>,
    pub section: Option<String>,
    pub starts: String,
    /// Only set when the event ends on a different calendar day.
    pub ends: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DetailView {
    pub title: String,
    pub image_url: Option<String>,
    pub synopsis: Option<SafeHtml>,
    pub starts: String,
    pub ends: Option<String>,
    pub calendar_url: String,
    pub venue: Option<VenueView>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct VenueView {
    pub name: String,
    pub address: Option<String>,
    pub description: Option<SafeHtml>,
    pub image_url: Option<String>,
    pub website: Option<String>,
    pub maps_url: Option<String>,
}

/// Pure projection of the session state. Loading wins over error, error wins
/// over the grid; no branch touches the network or mutates anything.
pub fn compose<S: ScrollLock>(state: &AppState<S>) -> Page {
    let catalog = if state.loading {
        CatalogView::Loading
    } else if let Some(message) = &state.error {
        CatalogView::Error(message.clone())
    } else {
        CatalogView::Grid(
            state
                .items
                .iter()
                .map(|event| compose_card(event, &state.related))
                .collect(),
        )
    };

    Page {
        catalog,
        detail: state
            .selected_item()
            .map(|event| compose_detail(event, &state.related)),
    }
}

fn compose_card(event: &Event, related: &BTreeMap<String, RelatedEntity>) -> CardView {
    CardView {
        id: event.id.clone(),
        title: decode_plain_text(event.text_display_title.get()),
        image_url: event.image_image.get_non_empty().map(String::from),
        section: resolve(event, related, RefField::Seccao)
            .and_then(|section| section.title.get_non_empty())
            .map(decode_plain_text),
        starts: temporal::format(&event.datetime_start_date),
        ends: end_if_different_day(event),
    }
}

fn compose_detail(event: &Event, related: &BTreeMap<String, RelatedEntity>) -> DetailView {
    let venue = resolve(event, related, RefField::Local);

    DetailView {
        title: decode_plain_text(event.text_display_title.get()),
        image_url: event.image_image.get_non_empty().map(String::from),
        synopsis: sanitize_rich_text(event.text_sinopse.get()),
        starts: temporal::format(&event.datetime_start_date),
        ends: end_if_different_day(event),
        calendar_url: temporal::build_calendar_url(event, venue),
        venue: venue.map(compose_venue),
    }
}

fn compose_venue(venue: &RelatedEntity) -> VenueView {
    VenueView {
        name: decode_plain_text(venue.title.get()),
        address: venue.text_morada.get_non_empty().map(decode_plain_text),
        description: sanitize_rich_text(venue.text_description.get()),
        image_url: venue.image_image.get_non_empty().map(String::from),
        website: venue.link_website.get_non_empty().map(String::from),
        maps_url: venue.link_google_maps.get_non_empty().map(String::from),
    }
}

fn end_if_different_day(event: &Event) -> Option<String> {
    if temporal::is_same_calendar_day(&event.datetime_start_date, &event.datetime_end_date) {
        None
    } else {
        Some(temporal::format(&event.datetime_end_date))
    }
}
