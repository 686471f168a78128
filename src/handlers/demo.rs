//! A few throwaway endpoints so the binary has traffic worth observing.

use axum::{extract::Path, Json};
use serde::Serialize;
use std::time::Duration;

use super::AppError;

/// Highest id `GET /api/items/:id` knows about.
const MAX_ITEM_ID: u32 = 100;

/// Upper bound for `GET /api/slow/:ms`.
const MAX_SLEEP_MS: u64 = 5_000;

#[derive(Debug, Serialize)]
pub struct Item {
    pub id: u32,
    pub name: String,
}

#[derive(Debug, Serialize)]
pub struct Slept {
    pub slept_ms: u64,
}

// ─── GET /api/hello ──────────────────────────────────────────────

pub async fn hello() -> &'static str {
    "hello"
}

// ─── GET /api/items/:id ──────────────────────────────────────────

pub async fn get_item(Path(id): Path<u32>) -> Result<Json<Item>, AppError> {
    if id == 0 || id > MAX_ITEM_ID {
        return Err(AppError::NotFound(format!("item '{id}' not found")));
    }
    Ok(Json(Item {
        id,
        name: format!("item-{id:03}"),
    }))
}

// ─── GET /api/slow/:ms ───────────────────────────────────────────

pub async fn slow(Path(ms): Path<u64>) -> Result<Json<Slept>, AppError> {
    if ms > MAX_SLEEP_MS {
        return Err(AppError::BadRequest(format!(
            "ms must be at most {MAX_SLEEP_MS}"
        )));
    }
    tokio::time::sleep(Duration::from_millis(ms)).await;
    Ok(Json(Slept { slept_ms: ms }))
}
