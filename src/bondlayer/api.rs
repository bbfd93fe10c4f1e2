use super::dto::{CatalogResponse, RequestDescriptor};
use crate::config::model::Config;
use lazy_static::lazy_static;
use reqwest::Client;
use tracing::{error, info};

lazy_static! {
    static ref REST_CLIENT: Client = Client::new();
}

pub struct BondlayerApi;

impl BondlayerApi {
    /// Fetches the published catalog. Issued once per session; failures are
    /// surfaced to the caller, never retried.
    #[tracing::instrument(skip(config), fields(api_url = %config.api_url))]
    pub async fn fetch_catalog(config: &Config) -> Result<CatalogResponse, FetchError> {
        info!("Fetching event catalog");

        let descriptor = RequestDescriptor::for_catalog(config);
        let json_response = REST_CLIENT
            .post(&config.api_url)
            .json(&descriptor)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;
        let parsed_response = serde_json::from_str::<CatalogResponse>(&json_response);

        match parsed_response {
            Ok(catalog) => {
                info!(
                    "Got {} events and {} related records",
                    catalog.items.len(),
                    catalog.related.len()
                );
                Ok(catalog)
            }
            Err(e) => {
                error!("Response parse failed: {:?}", e);
                Err(FetchError::InvalidResponse(e))
            }
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("invalid catalog response: {0}")]
    InvalidResponse(#[from] serde_json::Error),
}
