use crate::config::CatalogConfig;
use crate::error::ApiError;
use reqwest::{Client, StatusCode, Url};
use serde::Deserialize;
use std::time::Duration;

/// One page of the listing endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct Listing {
    pub count: u64,
    #[serde(default)]
    pub results: Vec<ListingEntry>,
}

/// Lightweight reference returned by the listing endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct ListingEntry {
    #[serde(default)]
    pub name: String,
}

/// Full record from the detail endpoint. Every field may be missing.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DetailRecord {
    #[serde(default)]
    pub id: Option<u64>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub types: Vec<TypeSlot>,
    #[serde(default)]
    pub sprites: Option<Sprites>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TypeSlot {
    #[serde(rename = "type", default)]
    pub kind: Option<NamedResource>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NamedResource {
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Sprites {
    #[serde(default)]
    pub front_default: Option<String>,
}

impl DetailRecord {
    /// Name of the first listed type.
    pub fn primary_type(&self) -> Option<&str> {
        self.types
            .first()
            .and_then(|slot| slot.kind.as_ref())
            .and_then(|kind| kind.name.as_deref())
    }

    pub fn image_url(&self) -> Option<&str> {
        self.sprites.as_ref().and_then(|s| s.front_default.as_deref())
    }
}

/// Outcome of a detail lookup. `NotFound` is a valid result, not an error.
#[derive(Debug, Clone)]
pub enum Lookup {
    Found(Box<DetailRecord>),
    NotFound,
    /// No name was given, so no request was made.
    Skipped,
}

/// HTTP client for the catalog API.
#[derive(Debug, Clone)]
pub struct PokeApi {
    client: Client,
    base_url: Url,
}

impl PokeApi {
    pub fn new(config: &CatalogConfig) -> Result<Self, ApiError> {
        let base_url = Url::parse(&config.base_url)
            .map_err(|_| ApiError::InvalidUrl(config.base_url.clone()))?;
        if base_url.cannot_be_a_base() {
            return Err(ApiError::InvalidUrl(config.base_url.clone()));
        }
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .user_agent(concat!("pokedex-explorer/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client, base_url })
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url, ApiError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ApiError::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// `GET /pokemon?limit=..&offset=..`
    pub async fn fetch_listing(&self, limit: u32, offset: u64) -> Result<Listing, ApiError> {
        let url = self.endpoint(&["pokemon"])?;
        tracing::debug!(%url, limit, offset, "fetching listing");

        let response = self
            .client
            .get(url)
            .query(&[("limit", u64::from(limit)), ("offset", offset)])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(status = status.as_u16(), "listing request failed");
            return Err(ApiError::from_status(status));
        }

        let body = response.bytes().await?;
        let listing: Listing = serde_json::from_slice(&body)?;
        tracing::debug!(count = listing.count, entries = listing.results.len(), "listing received");
        Ok(listing)
    }

    /// `GET /pokemon/{name}`; 404 maps to [`Lookup::NotFound`].
    pub async fn fetch_detail(&self, name: &str) -> Result<Lookup, ApiError> {
        if name.is_empty() {
            return Ok(Lookup::Skipped);
        }

        let url = self.endpoint(&["pokemon", name])?;
        tracing::debug!(%url, "fetching detail");
        let response = self.client.get(url).send().await?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            tracing::debug!(name, "no such entry");
            return Ok(Lookup::NotFound);
        }
        if !status.is_success() {
            tracing::warn!(name, status = status.as_u16(), "detail request failed");
            return Err(ApiError::from_status(status));
        }

        let body = response.bytes().await?;
        let record: DetailRecord = serde_json::from_slice(&body)?;
        Ok(Lookup::Found(Box::new(record)))
    }
}
