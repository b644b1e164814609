//! Rendering of catalog items into result cards.
//!
//! Card bodies use the HTML subset the chat client understands: one line per
//! field, entity names rendered as links to their Spotify pages.

use teloxide::utils::html;

use crate::platform::ResultCard;
use crate::spotify::{Album, Artist, ArtistRef, ExternalUrls, Image, Playlist, SearchResults, Track};

/// Genres shown for an artist.
const MAX_GENRES: usize = 3;

/// `<a href="url">name</a>`, or the escaped name alone when there is no URL.
pub fn link(urls: &ExternalUrls, name: &str) -> String {
    match urls.spotify.as_deref() {
        Some(url) => format!(
            "<a href=\"{}\">{}</a>",
            html::escape(url).replace('"', "&quot;"),
            html::escape(name)
        ),
        None => html::escape(name),
    }
}

/// `m:ss` with the seconds zero-padded and the minutes not.
pub fn format_duration(duration_ms: u64) -> String {
    let total_secs = duration_ms / 1000;
    format!("{}:{:02}", total_secs / 60, total_secs % 60)
}

fn artist_links(artists: &[ArtistRef]) -> String {
    artists
        .iter()
        .map(|artist| link(&artist.external_urls, &artist.name))
        .collect::<Vec<_>>()
        .join(", ")
}

fn artist_names(artists: &[ArtistRef]) -> String {
    artists
        .iter()
        .map(|artist| artist.name.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

fn genres(artist: &Artist) -> String {
    format!(
        "Genres: {}",
        artist
            .genres
            .iter()
            .take(MAX_GENRES)
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    )
}

fn first_image(images: &[Image]) -> Option<String> {
    images.first().map(|image| image.url.clone())
}

pub fn track_card(track: &Track) -> ResultCard {
    let body = [
        link(&track.external_urls, &track.name),
        format!("Artists: {}", artist_links(&track.artists)),
        format!("Album: {}", link(&track.album.external_urls, &track.album.name)),
        format!("Duration: {}", format_duration(track.duration_ms)),
    ]
    .join("\n");

    ResultCard {
        id: track.id.clone(),
        title: track.name.clone(),
        body,
        thumbnail_url: first_image(&track.album.images),
        subtitle: Some(format!("{}\nTrack", artist_names(&track.artists))),
    }
}

pub fn album_card(album: &Album) -> ResultCard {
    let body = [
        link(&album.external_urls, &album.name),
        format!("Artists: {}", artist_links(&album.artists)),
        format!("Release date: {}", html::escape(&album.release_date)),
    ]
    .join("\n");

    ResultCard {
        id: album.id.clone(),
        title: album.name.clone(),
        body,
        thumbnail_url: first_image(&album.images),
        subtitle: Some(format!("{}\nAlbum", artist_names(&album.artists))),
    }
}

pub fn artist_card(artist: &Artist) -> ResultCard {
    let genres = genres(artist);
    let body = [
        link(&artist.external_urls, &artist.name),
        html::escape(&genres),
    ]
    .join("\n");

    ResultCard {
        id: artist.id.clone(),
        title: artist.name.clone(),
        body,
        thumbnail_url: first_image(&artist.images),
        subtitle: Some(format!("{}\nArtist", genres)),
    }
}

pub fn playlist_card(playlist: &Playlist) -> ResultCard {
    let owner = &playlist.owner.display_name;
    let body = [
        link(&playlist.external_urls, &playlist.name),
        format!("Owner: {}", html::escape(owner)),
    ]
    .join("\n");

    ResultCard {
        id: playlist.id.clone(),
        title: playlist.name.clone(),
        body,
        thumbnail_url: first_image(&playlist.images),
        subtitle: Some(format!("Owner: {}\nPlaylist", owner)),
    }
}

/// All cards for a search, tracks first, then albums, artists and playlists.
/// Each category keeps the catalog's ranking; cards without a title are dropped.
pub fn cards_from_results(results: &SearchResults) -> Vec<ResultCard> {
    let tracks = results.tracks.iter().map(track_card);
    let albums = results.albums.iter().map(album_card);
    let artists = results.artists.iter().map(artist_card);
    let playlists = results.playlists.iter().map(playlist_card);

    tracks
        .chain(albums)
        .chain(artists)
        .chain(playlists)
        .filter(|card| !card.title.is_empty())
        .collect()
}
