use super::model::{Event, RelatedEntity};
use crate::config::model::Config;
use chrono::Utc;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{json, Value};
use std::collections::BTreeMap;

const SORT_ATTR: &str = "datetime_end_date";
const DRAFT_ATTR: &str = "boolean_draft";

/// Response body of the repeater fetch: the published events plus every
/// venue/section record they may reference. Both fields are optional
/// upstream and default to empty.
#[derive(Debug, Deserialize)]
pub struct CatalogResponse {
    #[serde(default)]
    pub items: Vec<Event>,
    #[serde(default, deserialize_with = "deserialize_btreemap")]
    pub related: BTreeMap<String, RelatedEntity>,
}

/// Request descriptor for the repeater endpoint. This is configuration data
/// passed through unchanged, mirrored from the page bootstrap: sorted by end
/// date ascending, drafts and already-ended events filtered out, pagination
/// disabled.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestDescriptor {
    pub hash: String,
    pub locale: String,
    pub target: String,
    pub geo_data: Value,
    pub search_query: String,
    pub repeater: RepeaterConfig,
    pub project_id: String,
    pub content_id: String,
    pub favorites: Value,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RepeaterConfig {
    pub live_fetch: bool,
    pub detail: bool,
    pub sorts: Vec<SortSpec>,
    pub version: u32,
    pub pagination: PaginationConfig,
    pub id: String,
    pub limit: LimitConfig,
    pub filters: Vec<FilterSpec>,
    pub collection: String,
    pub user_filters: Value,
    pub user_sorts: UserSorts,
    pub page: u32,
}

#[derive(Debug, Serialize)]
pub struct SortSpec {
    pub attr: String,
    pub direction: String,
}

// Note: perPage and limit.end are strings on the wire, page is a number
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationConfig {
    pub enabled: bool,
    pub margin_pages_displayed: u32,
    pub page_range_displayed: u32,
    pub per_page: String,
}

#[derive(Debug, Serialize)]
pub struct LimitConfig {
    pub enabled: bool,
    pub start: u32,
    pub end: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterSpec {
    pub active_index: Option<u32>,
    pub date_range: String,
    pub value: String,
    pub attr: String,
    pub date_direction: String,
    pub date_exclude_today: bool,
    pub action: String,
    pub is_reference_filter: bool,
    pub condition: String,
    pub remote_filter: bool,
}

#[derive(Debug, Serialize)]
pub struct UserSorts {
    pub attr: String,
    pub direction: String,
    pub origin: String,
}

impl RequestDescriptor {
    pub fn for_catalog(config: &Config) -> Self {
        Self {
            hash: Utc::now().timestamp_millis().to_string(),
            locale: config.locale.to_string(),
            target: "production".to_string(),
            geo_data: json!({}),
            search_query: String::new(),
            repeater: RepeaterConfig {
                live_fetch: false,
                detail: false,
                sorts: vec![SortSpec {
                    attr: SORT_ATTR.to_string(),
                    direction: "asc".to_string(),
                }],
                version: 1,
                pagination: PaginationConfig {
                    enabled: false,
                    margin_pages_displayed: 0,
                    page_range_displayed: 6,
                    per_page: "20".to_string(),
                },
                id: config.repeater_id.to_string(),
                limit: LimitConfig {
                    enabled: false,
                    start: 0,
                    end: "100".to_string(),
                },
                filters: vec![
                    FilterSpec::with_condition(SORT_ATTR, "datetime-isSameOrAfter"),
                    FilterSpec::with_condition(DRAFT_ATTR, "boolean-false"),
                ],
                collection: config.collection_id.to_string(),
                user_filters: json!({}),
                user_sorts: UserSorts {
                    attr: SORT_ATTR.to_string(),
                    direction: "asc".to_string(),
                    origin: "filters".to_string(),
                },
                page: 1,
            },
            project_id: config.project_id.to_string(),
            content_id: "0".to_string(),
            favorites: json!({}),
        }
    }
}

impl FilterSpec {
    fn with_condition(attr: &str, condition: &str) -> Self {
        Self {
            active_index: None,
            date_range: "_day".to_string(),
            value: String::new(),
            attr: attr.to_string(),
            date_direction: "_future".to_string(),
            date_exclude_today: false,
            action: "create".to_string(),
            is_reference_filter: false,
            condition: condition.to_string(),
            remote_filter: false,
        }
    }
}

// The API serializes empty maps as arrays, so those need the tolerant
// deserializer
fn deserialize_btreemap<'de, D, T>(d: D) -> Result<BTreeMap<String, T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    let value = Value::deserialize(d)?;
    Ok(match value {
        Value::Object(_) => BTreeMap::deserialize(value).unwrap_or(BTreeMap::new()),
        _ => BTreeMap::new(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test_log::test]
    fn should_deserialize_catalog_with_items_and_related() {
        let response = serde_json::from_str::<CatalogResponse>(
            r##"
              {
                "items": [
                  {
                    "id": "evt-001",
                    "text_display_title": { "all": "Concerto de Verão", "pt": "ignorado" },
                    "text_sinopse": { "all": "<p>Um <em>concerto</em> ao ar livre.</p>" },
                    "image_image": { "all": "https://cdn.example.com/verao.jpg" },
                    "datetime_start_date": "2025-03-05T10:00:00Z",
                    "datetime_end_date": "2025-03-05T18:00:00Z",
                    "ref_seccao": "sec-musica",
                    "ref_local": "loc-casa"
                  }
                ],
                "related": {
                  "loc-casa": {
                    "_title": { "all": "Casa da Música" },
                    "text_morada": { "all": "Av. da Boavista 604" },
                    "link_website": { "all": "https://casadamusica.com" }
                  },
                  "sec-musica": {
                    "_title": { "all": "Música" }
                  }
                }
              }"##,
        );

        assert!(response.is_ok(), "{:?}", response.err());

        let response = response.unwrap();

        assert_eq!(response.items.len(), 1);
        assert_eq!(response.related.len(), 2);

        let item = response.items.first().unwrap();

        assert_eq!(item.id, "evt-001");
        assert_eq!(item.text_display_title.get(), "Concerto de Verão");
        assert_eq!(item.ref_local.as_deref(), Some("loc-casa"));

        let venue = response.related.get("loc-casa").unwrap();

        assert_eq!(venue.title.get(), "Casa da Música");
        assert_eq!(venue.text_morada.get(), "Av. da Boavista 604");
        assert_eq!(venue.text_description.get(), "");
        assert!(venue.link_google_maps.get_non_empty().is_none());
    }

    #[test_log::test]
    fn should_deserialize_empty_catalog() {
        let response = serde_json::from_str::<CatalogResponse>("{}").unwrap();

        assert!(response.items.is_empty());
        assert!(response.related.is_empty());
    }

    #[test_log::test]
    fn should_deserialize_related_sent_as_empty_array() {
        let response =
            serde_json::from_str::<CatalogResponse>(r#"{ "items": [], "related": [] }"#).unwrap();

        assert!(response.related.is_empty());
    }

    #[test_log::test]
    fn should_deserialize_item_with_bare_string_text_field() {
        let response = serde_json::from_str::<CatalogResponse>(
            r#"{ "items": [{ "id": "evt-002", "text_display_title": "Feira do Livro" }] }"#,
        )
        .unwrap();

        let item = response.items.first().unwrap();

        assert_eq!(item.text_display_title.get(), "Feira do Livro");
        assert_eq!(item.datetime_start_date, "");
        assert!(item.ref_seccao.is_none());
    }

    #[test_log::test]
    fn should_serialize_descriptor_with_pagination_disabled() {
        let descriptor = RequestDescriptor::for_catalog(&Config::default());
        let body = serde_json::to_value(&descriptor).unwrap();

        assert_eq!(body["repeater"]["pagination"]["enabled"], false);
        assert_eq!(body["repeater"]["pagination"]["perPage"], "20");
        assert_eq!(body["repeater"]["limit"]["enabled"], false);
        assert_eq!(body["repeater"]["page"], 1);
    }

    #[test_log::test]
    fn should_serialize_descriptor_sorted_by_end_date_ascending() {
        let descriptor = RequestDescriptor::for_catalog(&Config::default());
        let body = serde_json::to_value(&descriptor).unwrap();

        assert_eq!(body["repeater"]["sorts"][0]["attr"], "datetime_end_date");
        assert_eq!(body["repeater"]["sorts"][0]["direction"], "asc");
        assert_eq!(body["repeater"]["userSorts"]["origin"], "filters");
    }

    #[test_log::test]
    fn should_serialize_descriptor_filtering_drafts_and_past_events() {
        let descriptor = RequestDescriptor::for_catalog(&Config::default());
        let body = serde_json::to_value(&descriptor).unwrap();
        let filters = body["repeater"]["filters"].as_array().unwrap();

        assert_eq!(filters.len(), 2);
        assert_eq!(filters[0]["attr"], "datetime_end_date");
        assert_eq!(filters[0]["condition"], "datetime-isSameOrAfter");
        assert_eq!(filters[1]["attr"], "boolean_draft");
        assert_eq!(filters[1]["condition"], "boolean-false");
        assert_eq!(filters[0]["activeIndex"], Value::Null);
    }
}
