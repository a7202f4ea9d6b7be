//! Client for the Geoapify geocoding and places APIs.
//!
//! Two read-only endpoints, each called at most once per search. Failures are
//! already logged by [`HttpClient::fetch_json`]; this layer only adds the
//! "no credentials" and "empty input" short-circuits.

use reqwest::Url;

use crate::error::GeoError;
use crate::http::HttpClient;
use crate::types::{GeocodeResponse, PlacesResponse};

const DEFAULT_GEOCODE_URL: &str = "https://api.geoapify.com/v1/geocode/search";
const DEFAULT_PLACES_URL: &str = "https://api.geoapify.com/v2/places";

/// Maximum number of places requested around a geocoded feature.
pub const PLACES_LIMIT: u32 = 100;

/// Category filter sent with every places-near request.
pub const PLACE_CATEGORIES: [&str; 38] = [
    "accommodation",
    "activity",
    "adult",
    "administrative",
    "amenity",
    "airport",
    "beach",
    "building",
    "camping",
    "catering",
    "childcare",
    "commercial",
    "education",
    "entertainment",
    "healthcare",
    "heritage",
    "highway",
    "leisure",
    "low_emission_zone",
    "man_made",
    "national_park",
    "natural",
    "office",
    "parking",
    "pet",
    "political",
    "populated_place",
    "postal_code",
    "power",
    "production",
    "public_transport",
    "railway",
    "religion",
    "rental",
    "service",
    "ski",
    "sport",
    "tourism",
];

/// Client for the Geoapify REST APIs.
///
/// Use [`GeoapifyClient::new`] for production or
/// [`GeoapifyClient::with_base_url`] to point both endpoints at a mock server.
#[derive(Debug, Clone)]
pub struct GeoapifyClient {
    http: HttpClient,
    api_key: Option<String>,
    geocode_url: Url,
    places_url: Url,
}

impl GeoapifyClient {
    /// Creates a client pointed at the production Geoapify endpoints.
    ///
    /// A missing or blank `api_key` is accepted here; every request made
    /// without one is logged and returns `None`.
    ///
    /// # Errors
    ///
    /// Returns [`GeoError::InvalidUrl`] only if the built-in endpoint
    /// constants fail to parse.
    pub fn new(http: HttpClient, api_key: Option<String>) -> Result<Self, GeoError> {
        Self::with_urls(http, api_key, DEFAULT_GEOCODE_URL, DEFAULT_PLACES_URL)
    }

    /// Creates a client whose endpoints live under `base_url`
    /// (`{base}/v1/geocode/search` and `{base}/v2/places`).
    ///
    /// # Errors
    ///
    /// Returns [`GeoError::InvalidUrl`] if `base_url` is not a valid URL.
    pub fn with_base_url(
        http: HttpClient,
        api_key: Option<String>,
        base_url: &str,
    ) -> Result<Self, GeoError> {
        let base = base_url.trim_end_matches('/');
        Self::with_urls(
            http,
            api_key,
            &format!("{base}/v1/geocode/search"),
            &format!("{base}/v2/places"),
        )
    }

    fn with_urls(
        http: HttpClient,
        api_key: Option<String>,
        geocode_url: &str,
        places_url: &str,
    ) -> Result<Self, GeoError> {
        let parse = |raw: &str| {
            Url::parse(raw).map_err(|e| GeoError::InvalidUrl {
                url: raw.to_owned(),
                reason: e.to_string(),
            })
        };
        Ok(Self {
            http,
            api_key: api_key.filter(|k| !k.trim().is_empty()),
            geocode_url: parse(geocode_url)?,
            places_url: parse(places_url)?,
        })
    }

    /// Forward-geocodes free text.
    ///
    /// An empty (after trim) query returns an empty response without a
    /// request. `None` means the call could not be made or failed.
    pub async fn geocode(&self, query: &str) -> Option<GeocodeResponse> {
        let query = query.trim();
        if query.is_empty() {
            return Some(GeocodeResponse::default());
        }
        let url = self.geocode_request_url(query)?;
        let body = self.http.fetch_json(url.as_str(), "GET").await?;
        Some(GeocodeResponse::from_value(&body))
    }

    /// Lists places of interest around a geocoded `place_id`.
    pub async fn places_near(&self, place_id: &str) -> Option<PlacesResponse> {
        if place_id.is_empty() {
            return Some(PlacesResponse::default());
        }
        let url = self.places_request_url(place_id)?;
        let body = self.http.fetch_json(url.as_str(), "GET").await?;
        Some(PlacesResponse::from_value(&body))
    }

    fn geocode_request_url(&self, query: &str) -> Option<Url> {
        let api_key = self.require_api_key("geocode")?;
        let mut url = self.geocode_url.clone();
        url.query_pairs_mut()
            .append_pair("text", query)
            .append_pair("apiKey", api_key);
        Some(url)
    }

    fn places_request_url(&self, place_id: &str) -> Option<Url> {
        let api_key = self.require_api_key("places_near")?;
        let mut url = self.places_url.clone();
        url.query_pairs_mut()
            .append_pair("categories", &PLACE_CATEGORIES.join(","))
            .append_pair("filter", &format!("place:{place_id}"))
            .append_pair("limit", &PLACES_LIMIT.to_string())
            .append_pair("apiKey", api_key);
        Some(url)
    }

    fn require_api_key(&self, operation: &'static str) -> Option<&str> {
        let key = self.api_key.as_deref();
        if key.is_none() {
            tracing::error!(operation, "GEOAPIFY_ACCESS_TOKEN is not set; skipping request");
        }
        key
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_client(api_key: Option<&str>) -> GeoapifyClient {
        let http = HttpClient::new("test").expect("http client");
        GeoapifyClient::with_base_url(http, api_key.map(str::to_owned), "https://geo.test/")
            .expect("client construction should not fail")
    }

    #[test]
    fn geocode_url_encodes_query_and_key() {
        let client = test_client(Some("k1"));
        let url = client.geocode_request_url("Dam Square & co").expect("url");
        assert_eq!(url.path(), "/v1/geocode/search");
        assert_eq!(
            url.query(),
            Some("text=Dam+Square+%26+co&apiKey=k1"),
        );
    }

    #[test]
    fn places_url_carries_filter_limit_and_all_categories() {
        let client = test_client(Some("k1"));
        let url = client.places_request_url("51abc").expect("url");
        assert_eq!(url.path(), "/v2/places");

        let pairs: Vec<(String, String)> = url
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        assert_eq!(pairs[0].0, "categories");
        assert_eq!(pairs[0].1.split(',').count(), 38);
        assert!(pairs[0].1.starts_with("accommodation,activity,"));
        assert!(pairs[0].1.ends_with(",sport,tourism"));
        assert_eq!(pairs[1], ("filter".to_string(), "place:51abc".to_string()));
        assert_eq!(pairs[2], ("limit".to_string(), "100".to_string()));
        assert_eq!(pairs[3], ("apiKey".to_string(), "k1".to_string()));
    }

    #[test]
    fn blank_api_key_is_treated_as_missing() {
        let client = test_client(Some("  "));
        assert!(client.geocode_request_url("amsterdam").is_none());
        assert!(client.places_request_url("abc").is_none());
    }

    #[test]
    fn default_endpoints() {
        let http = HttpClient::new("test").expect("http client");
        let client = GeoapifyClient::new(http, Some("k".to_string())).expect("client");
        assert_eq!(client.geocode_url.as_str(), DEFAULT_GEOCODE_URL);
        assert_eq!(client.places_url.as_str(), DEFAULT_PLACES_URL);
    }
}
