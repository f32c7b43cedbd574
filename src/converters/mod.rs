//! JSON to model converters.
//!
//! Converts raw upstream playlist responses into the canonical
//! [`Playlist`]. The legacy endpoint nests playlist data under `playlist`;
//! the modern endpoint nests it under `result` and wraps every track entry
//! in a `track` object.

use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::error::{ResolverError, Result};
use crate::link::LinkKind;
use crate::models::{Playlist, PlaylistTrack};

/// Default iframe width in pixels.
pub const IFRAME_WIDTH: u32 = 614;

/// Default iframe height in pixels.
pub const IFRAME_HEIGHT: u32 = 244;

/// Embeddable player URL template.
const IFRAME_URL_TEMPLATE: &str = "https://music.yandex.ru/iframe/album/{album_id}/track/{track_id}";

/// Get string from JSON, returning empty string if not found.
fn get_str(json: &Value, key: &str) -> String {
    json.get(key)
        .and_then(|v| v.as_str())
        .unwrap_or("")
        .to_string()
}

/// Get an identifier from JSON (handles both string and numeric IDs).
///
/// Empty strings, zero, `null` and non-scalar values count as absent.
fn get_id(json: &Value, key: &str) -> Option<String> {
    match json.get(key)? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) if n.as_f64() != Some(0.0) => Some(n.to_string()),
        _ => None,
    }
}

/// Playlist kind as a string; upstream sends it as a number.
fn get_kind(json: &Value) -> String {
    match json.get("kind") {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        _ => String::new(),
    }
}

/// Select the container key for a link kind.
fn container_key(kind: &LinkKind) -> &'static str {
    match kind {
        LinkKind::Old { .. } => "playlist",
        LinkKind::New { .. } => "result",
    }
}

/// Build the embeddable player fragment for a track.
///
/// Fails when the track has neither `id` nor `realId`, when `albums` is
/// absent or empty, or when the first album has no non-zero `id`.
pub fn generate_track_iframe(track: &Value, width: u32, height: u32) -> Result<String> {
    let track_id = get_id(track, "id")
        .or_else(|| get_id(track, "realId"))
        .ok_or_else(|| ResolverError::Derivation("Track ID was not found".to_string()))?;

    let first_album = track
        .get("albums")
        .and_then(|a| a.as_array())
        .and_then(|albums| albums.first())
        .ok_or_else(|| ResolverError::Derivation("Albums data was not found".to_string()))?;

    let album_id = get_id(first_album, "id")
        .ok_or_else(|| ResolverError::Derivation("Album ID was not found".to_string()))?;

    let iframe_url = IFRAME_URL_TEMPLATE
        .replace("{album_id}", &album_id)
        .replace("{track_id}", &track_id);

    Ok(format!(
        r#"<iframe frameborder="0" allow="clipboard-write" style="border:none;width:{w}px;height:{h}px;" width="{w}" height="{h}" src="{src}"></iframe>"#,
        w = width,
        h = height,
        src = iframe_url
    ))
}

/// Parse a single track object into canonical form.
fn parse_track(json: &Value) -> PlaylistTrack {
    let iframe = match generate_track_iframe(json, IFRAME_WIDTH, IFRAME_HEIGHT) {
        Ok(iframe) => iframe,
        Err(e) => {
            warn!(
                "iframe generation failed for track '{}': {}",
                get_str(json, "title"),
                e
            );
            String::new()
        }
    };

    let artists = json
        .get("artists")
        .and_then(|a| a.as_array())
        .map(|arr| arr.iter().map(|artist| get_str(artist, "name")).collect())
        .unwrap_or_default();

    PlaylistTrack {
        title: get_str(json, "title"),
        cover_uri: get_str(json, "coverUri"),
        iframe,
        artists,
    }
}

/// Unwrap one track entry according to the link kind.
///
/// Modern entries carry the track under a `track` key; a missing (or
/// null) wrapper yields an all-defaults track.
fn unwrap_track_entry<'a>(
    entry: &'a Value,
    kind: &LinkKind,
    position: usize,
    empty: &'a Value,
) -> Result<&'a Value> {
    if !entry.is_object() {
        return Err(ResolverError::Normalization(format!(
            "track entry #{} is not an object",
            position
        )));
    }

    match kind {
        LinkKind::Old { .. } => Ok(entry),
        LinkKind::New { .. } => match entry.get("track") {
            None | Some(Value::Null) => Ok(empty),
            Some(track) if track.is_object() => Ok(track),
            Some(_) => Err(ResolverError::Normalization(format!(
                "track wrapper of entry #{} is not an object",
                position
            ))),
        },
    }
}

/// Normalize a raw upstream payload into a [`Playlist`].
///
/// An empty track list is a valid result here; rejecting it is up to the
/// caller.
pub fn normalize_playlist(payload: &Value, kind: &LinkKind) -> Result<Playlist> {
    debug!("Started playlist normalization");
    let key = container_key(kind);
    let data = payload
        .get(key)
        .filter(|d| d.is_object())
        .ok_or_else(|| {
            ResolverError::Normalization(format!("missing or non-object '{}' container", key))
        })?;

    let owner = data
        .get("owner")
        .and_then(|o| o.as_object())
        .cloned()
        .unwrap_or_else(Map::new);

    let entries: &[Value] = match data.get("tracks") {
        None | Some(Value::Null) => &[],
        Some(Value::Array(entries)) => entries.as_slice(),
        Some(_) => {
            return Err(ResolverError::Normalization(
                "'tracks' is not an array".to_string(),
            ))
        }
    };

    let empty = Value::Object(Map::new());
    let mut tracks = Vec::with_capacity(entries.len());
    for (idx, entry) in entries.iter().enumerate() {
        let track = unwrap_track_entry(entry, kind, idx + 1, &empty)?;
        tracks.push(parse_track(track));
    }

    debug!("Normalized playlist with {} tracks", tracks.len());

    Ok(Playlist {
        title: get_str(data, "title"),
        kind: get_kind(data),
        owner,
        tracks,
    })
}
