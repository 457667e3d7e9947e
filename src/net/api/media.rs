//! `/media` endpoints: photo records (the client stores URLs, never bytes).
//!
//! Two generations of routes coexist on the backend. The couple-scoped
//! `/media/{couple_id}/photos` pair predates spaces; the `/media/photos`
//! family is owned by the caller and filtered by space type.

#[cfg(test)]
#[path = "media_test.rs"]
mod media_test;

use serde::Serialize;

use super::v1;
use crate::net::error::ApiError;
use crate::net::http::HttpClient;
use crate::net::types::{Photo, PhotoCreate};

/// Space type the backend assumes when none is given.
pub const DEFAULT_SPACE_TYPE: &str = "couple";

#[derive(Serialize)]
struct SpaceQuery<'a> {
    space_type: &'a str,
}

/// Attach a photo URL to a couple (legacy route).
///
/// # Errors
///
/// Returns the normalized error on failure.
pub async fn add_photo(http: &HttpClient, couple_id: i64, payload: &PhotoCreate) -> Result<Photo, ApiError> {
    http.post_json(&v1(&format!("/media/{couple_id}/photos")), payload).await
}

/// List a couple's photos (legacy route).
///
/// # Errors
///
/// Returns the normalized error on failure.
pub async fn list_photos(http: &HttpClient, couple_id: i64) -> Result<Vec<Photo>, ApiError> {
    http.get(&v1(&format!("/media/{couple_id}/photos"))).await
}

/// # Errors
///
/// Returns the normalized error on failure.
pub async fn create_photo(http: &HttpClient, payload: &PhotoCreate) -> Result<Photo, ApiError> {
    http.post_json(&v1("/media/photos"), payload).await
}

/// List the caller's photos in one space; `None` means [`DEFAULT_SPACE_TYPE`].
///
/// # Errors
///
/// Returns the normalized error on failure.
pub async fn list_space_photos(http: &HttpClient, space_type: Option<&str>) -> Result<Vec<Photo>, ApiError> {
    let space_type = space_type.filter(|s| !s.is_empty()).unwrap_or(DEFAULT_SPACE_TYPE);
    http.get_with_query(&v1("/media/photos"), &SpaceQuery { space_type }).await
}

/// # Errors
///
/// Returns the normalized error on failure, e.g. `"Photo not found"`.
pub async fn delete_photo(http: &HttpClient, photo_id: i64) -> Result<(), ApiError> {
    http.delete(&v1(&format!("/media/photos/{photo_id}"))).await
}
