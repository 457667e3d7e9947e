//! `/couples` endpoints: the couple record and its shared collections
//! (notes, message board, countdowns, wish list).
//!
//! Every collection is scoped by couple id; the backend answers 403 when the
//! id does not belong to the caller.

#[cfg(test)]
#[path = "couples_test.rs"]
mod couples_test;

use super::v1;
use crate::net::error::ApiError;
use crate::net::http::HttpClient;
use crate::net::types::{
    Countdown, CountdownCreate, CountdownUpdate, Couple, CoupleCreate, Message, MessageCreate, Note, NoteCreate, Wish,
    WishCreate, WishUpdate,
};

fn couple_path(couple_id: i64, rest: &str) -> String {
    v1(&format!("/couples/{couple_id}{rest}"))
}

// =============================================================================
// COUPLE
// =============================================================================

/// # Errors
///
/// Returns the normalized error on failure.
pub async fn create_couple(http: &HttpClient, payload: &CoupleCreate) -> Result<Couple, ApiError> {
    http.post_json(&v1("/couples"), payload).await
}

/// The caller's couple, or `None` when the backend answers `null`.
///
/// # Errors
///
/// Returns the normalized error on failure.
pub async fn fetch_my_couple(http: &HttpClient) -> Result<Option<Couple>, ApiError> {
    http.get(&v1("/couples/me")).await
}

// =============================================================================
// NOTES
// =============================================================================

/// # Errors
///
/// Returns the normalized error on failure.
pub async fn add_note(http: &HttpClient, couple_id: i64, payload: &NoteCreate) -> Result<Note, ApiError> {
    http.post_json(&couple_path(couple_id, "/notes"), payload).await
}

/// # Errors
///
/// Returns the normalized error on failure.
pub async fn list_notes(http: &HttpClient, couple_id: i64) -> Result<Vec<Note>, ApiError> {
    http.get(&couple_path(couple_id, "/notes")).await
}

/// # Errors
///
/// Returns the normalized error on failure.
pub async fn update_note(http: &HttpClient, couple_id: i64, note_id: i64, payload: &NoteCreate) -> Result<Note, ApiError> {
    http.patch_json(&couple_path(couple_id, &format!("/notes/{note_id}")), payload).await
}

/// # Errors
///
/// Returns the normalized error on failure.
pub async fn delete_note(http: &HttpClient, couple_id: i64, note_id: i64) -> Result<(), ApiError> {
    http.delete(&couple_path(couple_id, &format!("/notes/{note_id}"))).await
}

// =============================================================================
// MESSAGE BOARD
// =============================================================================

/// # Errors
///
/// Returns the normalized error on failure.
pub async fn add_message(http: &HttpClient, couple_id: i64, payload: &MessageCreate) -> Result<Message, ApiError> {
    http.post_json(&couple_path(couple_id, "/messages"), payload).await
}

/// # Errors
///
/// Returns the normalized error on failure.
pub async fn list_messages(http: &HttpClient, couple_id: i64) -> Result<Vec<Message>, ApiError> {
    http.get(&couple_path(couple_id, "/messages")).await
}

/// # Errors
///
/// Returns the normalized error on failure.
pub async fn delete_message(http: &HttpClient, couple_id: i64, message_id: i64) -> Result<(), ApiError> {
    http.delete(&couple_path(couple_id, &format!("/messages/{message_id}"))).await
}

// =============================================================================
// COUNTDOWNS
// =============================================================================

/// # Errors
///
/// Returns the normalized error on failure.
pub async fn add_countdown(http: &HttpClient, couple_id: i64, payload: &CountdownCreate) -> Result<Countdown, ApiError> {
    http.post_json(&couple_path(couple_id, "/countdowns"), payload).await
}

/// # Errors
///
/// Returns the normalized error on failure.
pub async fn list_countdowns(http: &HttpClient, couple_id: i64) -> Result<Vec<Countdown>, ApiError> {
    http.get(&couple_path(couple_id, "/countdowns")).await
}

/// Partial update; only the fields set on `patch` are sent.
///
/// # Errors
///
/// Returns the normalized error on failure.
pub async fn update_countdown(
    http: &HttpClient,
    couple_id: i64,
    countdown_id: i64,
    patch: &CountdownUpdate,
) -> Result<Countdown, ApiError> {
    http.patch_json(&couple_path(couple_id, &format!("/countdowns/{countdown_id}")), patch)
        .await
}

/// # Errors
///
/// Returns the normalized error on failure.
pub async fn delete_countdown(http: &HttpClient, couple_id: i64, countdown_id: i64) -> Result<(), ApiError> {
    http.delete(&couple_path(couple_id, &format!("/countdowns/{countdown_id}"))).await
}

// =============================================================================
// WISHES
// =============================================================================

/// # Errors
///
/// Returns the normalized error on failure.
pub async fn add_wish(http: &HttpClient, couple_id: i64, payload: &WishCreate) -> Result<Wish, ApiError> {
    http.post_json(&couple_path(couple_id, "/wishes"), payload).await
}

/// # Errors
///
/// Returns the normalized error on failure.
pub async fn list_wishes(http: &HttpClient, couple_id: i64) -> Result<Vec<Wish>, ApiError> {
    http.get(&couple_path(couple_id, "/wishes")).await
}

/// # Errors
///
/// Returns the normalized error on failure.
pub async fn update_wish(http: &HttpClient, couple_id: i64, wish_id: i64, patch: &WishUpdate) -> Result<Wish, ApiError> {
    http.patch_json(&couple_path(couple_id, &format!("/wishes/{wish_id}")), patch).await
}

/// # Errors
///
/// Returns the normalized error on failure.
pub async fn delete_wish(http: &HttpClient, couple_id: i64, wish_id: i64) -> Result<(), ApiError> {
    http.delete(&couple_path(couple_id, &format!("/wishes/{wish_id}"))).await
}
