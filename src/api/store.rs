use crate::model::Extension;
use async_trait::async_trait;
use serde::Deserialize;

/// Store endpoint returning every listing in one page, including
/// native extensions that are not shown in the web storefront.
const STORE_LISTINGS_URL: &str =
    "https://www.raycast.com/api/v1/store_listings?per_page=2000&include_native=true";

pub struct StoreClient {
    client: reqwest::Client,
}

impl StoreClient {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }
}

impl Default for StoreClient {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Deserialize)]
struct StoreResponse {
    data: Vec<Extension>,
}

#[async_trait]
impl super::ListingSource for StoreClient {
    async fn fetch_listings(&self) -> Result<Vec<Extension>, super::ApiError> {
        let response = self.client.get(STORE_LISTINGS_URL).send().await?;

        if !response.status().is_success() {
            return Err(super::ApiError::Status(response.status()));
        }

        let body: StoreResponse = response.json().await?;
        Ok(body.data)
    }
}
