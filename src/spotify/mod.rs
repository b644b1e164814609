pub mod auth;

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Deserializer};
use tracing::debug;

use crate::config::SpotifyConfig;

/// Categories requested from the search endpoint, in answer order.
pub const SEARCH_TYPES: &str = "track,album,artist,playlist";

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct ExternalUrls {
    #[serde(default)]
    pub spotify: Option<String>,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct Image {
    pub url: String,
}

/// Artist reference embedded in tracks and albums
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct ArtistRef {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub external_urls: ExternalUrls,
}

/// Album reference embedded in a track
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct AlbumRef {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub external_urls: ExternalUrls,
    #[serde(default, deserialize_with = "null_as_default")]
    pub images: Vec<Image>,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct Track {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub duration_ms: u64,
    #[serde(default)]
    pub external_urls: ExternalUrls,
    #[serde(default)]
    pub artists: Vec<ArtistRef>,
    #[serde(default)]
    pub album: AlbumRef,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct Album {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub release_date: String,
    #[serde(default)]
    pub external_urls: ExternalUrls,
    #[serde(default)]
    pub artists: Vec<ArtistRef>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub images: Vec<Image>,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct Artist {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub genres: Vec<String>,
    #[serde(default)]
    pub external_urls: ExternalUrls,
    #[serde(default, deserialize_with = "null_as_default")]
    pub images: Vec<Image>,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct PlaylistOwner {
    #[serde(default, deserialize_with = "null_as_default")]
    pub display_name: String,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct Playlist {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub owner: PlaylistOwner,
    #[serde(default)]
    pub external_urls: ExternalUrls,
    #[serde(default, deserialize_with = "null_as_default")]
    pub images: Vec<Image>,
}

/// The four result categories of one search call, each in relevance order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchResults {
    pub tracks: Vec<Track>,
    pub albums: Vec<Album>,
    pub artists: Vec<Artist>,
    pub playlists: Vec<Playlist>,
}

impl SearchResults {
    pub fn total(&self) -> usize {
        self.tracks.len() + self.albums.len() + self.artists.len() + self.playlists.len()
    }
}

#[derive(Debug, Deserialize)]
struct Page<T> {
    #[serde(default)]
    items: Vec<Option<T>>,
}

impl<T> Default for Page<T> {
    fn default() -> Self {
        Self { items: Vec::new() }
    }
}

impl<T> Page<T> {
    fn into_items(self) -> Vec<T> {
        self.items.into_iter().flatten().collect()
    }
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    tracks: Page<Track>,
    #[serde(default)]
    albums: Page<Album>,
    #[serde(default)]
    artists: Page<Artist>,
    #[serde(default)]
    playlists: Page<Playlist>,
}

impl From<SearchResponse> for SearchResults {
    fn from(response: SearchResponse) -> Self {
        Self {
            tracks: response.tracks.into_items(),
            albums: response.albums.into_items(),
            artists: response.artists.into_items(),
            playlists: response.playlists.into_items(),
        }
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Catalog search, authenticated with a bearer token from the caller.
#[async_trait]
pub trait CatalogSearch: Send + Sync {
    async fn search(&self, access_token: &str, query: &str, limit: u32) -> Result<SearchResults>;
}

pub struct SpotifyClient {
    client: reqwest::Client,
    api_base_url: String,
}

impl SpotifyClient {
    pub fn new(client: reqwest::Client, config: &SpotifyConfig) -> Self {
        Self {
            client,
            api_base_url: config.api_base_url.trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl CatalogSearch for SpotifyClient {
    async fn search(&self, access_token: &str, query: &str, limit: u32) -> Result<SearchResults> {
        let url = format!("{}/search", self.api_base_url);
        let limit = limit.to_string();

        debug!("Searching Spotify for {:?} (limit {})", query, limit);

        let response = self
            .client
            .get(&url)
            .bearer_auth(access_token)
            .query(&[("q", query), ("type", SEARCH_TYPES), ("limit", limit.as_str())])
            .send()
            .await
            .context("Failed to send search request to Spotify")?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            anyhow::bail!("Spotify search error ({}): {}", status, error_body);
        }

        let search_response: SearchResponse = response
            .json()
            .await
            .context("Failed to parse Spotify search response")?;

        Ok(search_response.into())
    }
}
