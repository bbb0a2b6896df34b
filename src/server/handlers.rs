//! HTTP request handlers

use std::sync::Arc;
use axum::{
    extract::{rejection::JsonRejection, State},
    response::Html,
    Json,
};
use serde_json::{json, Value};
use tracing::debug;

use super::error::{Result, ServerError};
use super::state::ServiceContext;

// ============================================================================
// Prediction
// ============================================================================

/// Predict listening time for one raw episode record
pub async fn predict(
    State(ctx): State<Arc<ServiceContext>>,
    payload: std::result::Result<Json<Value>, JsonRejection>,
) -> Result<Json<Value>> {
    let Json(payload) = payload.map_err(|e| {
        ctx.stats.record_failure();
        ServerError::MalformedPayload(e.body_text())
    })?;

    match ctx.predictor.predict_json(&payload) {
        Ok(prediction) => {
            let unknown = prediction.report.total_unknown();
            ctx.stats.record_success(unknown);
            debug!(
                prediction = prediction.listening_time_minutes,
                unknown_categories = unknown,
                "Served prediction"
            );
            Ok(Json(json!({
                "listening_time_minutes": prediction.listening_time_minutes,
            })))
        }
        Err(e) => {
            ctx.stats.record_failure();
            Err(ServerError::Prediction(e))
        }
    }
}

// ============================================================================
// System Handlers
// ============================================================================

pub async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

pub async fn get_stats(State(ctx): State<Arc<ServiceContext>>) -> Json<Value> {
    let snapshot = ctx.stats.snapshot();
    Json(json!({
        "requests": snapshot.requests,
        "failures": snapshot.failures,
        "unknown_categories": snapshot.unknown_categories,
        "uptime_secs": snapshot.uptime_secs,
        "model": ctx.predictor.model().metadata.name,
        "trained_at": ctx.predictor.model().metadata.trained_at,
    }))
}

pub async fn get_categories(State(ctx): State<Arc<ServiceContext>>) -> Result<Json<Value>> {
    let categories = ctx
        .categories
        .as_ref()
        .ok_or_else(|| ServerError::NotFound("categories file not available".to_string()))?;

    serde_json::to_value(categories)
        .map(Json)
        .map_err(|e| ServerError::Internal(e.to_string()))
}

// ============================================================================
// UI Handler
// ============================================================================

pub async fn serve_index() -> Html<&'static str> {
    Html(EMBEDDED_INDEX_HTML)
}

const EMBEDDED_INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Podcast Listening Time Predictor</title>
    <style>
        body { font-family: system-ui, sans-serif; background: #111827; color: #f3f4f6; margin: 0; }
        main { max-width: 640px; margin: 2rem auto; padding: 0 1rem; }
        label { display: block; margin-top: 0.75rem; font-size: 0.875rem; color: #9ca3af; }
        input, select { width: 100%; padding: 0.5rem; margin-top: 0.25rem; background: #1f2937; color: #f3f4f6; border: 1px solid #374151; border-radius: 4px; }
        button { margin-top: 1.25rem; padding: 0.6rem 1.2rem; background: #3b82f6; color: white; border: 0; border-radius: 4px; cursor: pointer; }
        #result { margin-top: 1.5rem; font-size: 1.25rem; }
        .error { color: #f87171; }
    </style>
</head>
<body>
<main>
    <h1>Podcast Listening Time Predictor</h1>
    <form id="predict-form">
        <label>Podcast name <input name="Podcast_Name" list="podcasts" required></label>
        <datalist id="podcasts"></datalist>
        <label>Episode title <input name="Episode_Title" list="titles" required></label>
        <datalist id="titles"></datalist>
        <label>Episode length (minutes) <input name="Episode_Length_minutes" type="number" step="any" min="0"></label>
        <label>Genre <input name="Genre" list="genres" required></label>
        <datalist id="genres"></datalist>
        <label>Host popularity (%) <input name="Host_Popularity_percentage" type="number" step="any" min="0" max="100"></label>
        <label>Publication day
            <select name="Publication_Day">
                <option>Monday</option><option>Tuesday</option><option>Wednesday</option>
                <option>Thursday</option><option>Friday</option><option>Saturday</option><option>Sunday</option>
            </select>
        </label>
        <label>Publication time
            <select name="Publication_Time">
                <option>Morning</option><option>Afternoon</option><option>Evening</option><option>Night</option>
            </select>
        </label>
        <label>Guest popularity (%) <input name="Guest_Popularity_percentage" type="number" step="any" min="0" max="100"></label>
        <label>Number of ads <input name="Number_of_Ads" type="number" step="1" min="0"></label>
        <label>Episode sentiment
            <select name="Episode_Sentiment">
                <option>Negative</option><option selected>Neutral</option><option>Positive</option>
            </select>
        </label>
        <button type="submit">Predict</button>
    </form>
    <div id="result"></div>
</main>
<script>
const NUMERIC = ["Episode_Length_minutes", "Host_Popularity_percentage", "Guest_Popularity_percentage", "Number_of_Ads"];

function fill(id, values) {
    const list = document.getElementById(id);
    (values || []).forEach(v => { const o = document.createElement("option"); o.value = v; list.appendChild(o); });
}

fetch("/categories").then(r => r.ok ? r.json() : null).then(c => {
    if (!c) return;
    fill("podcasts", c.podcasts); fill("titles", c.titles); fill("genres", c.genres);
}).catch(() => {});

document.getElementById("predict-form").addEventListener("submit", async (ev) => {
    ev.preventDefault();
    const record = {};
    new FormData(ev.target).forEach((value, key) => {
        record[key] = NUMERIC.includes(key) ? (value === "" ? null : Number(value)) : value;
    });
    const out = document.getElementById("result");
    try {
        const resp = await fetch("/predict", {
            method: "POST",
            headers: { "Content-Type": "application/json" },
            body: JSON.stringify(record),
        });
        const body = await resp.json();
        if (resp.ok) {
            out.className = "";
            out.textContent = "Predicted listening time: " + body.listening_time_minutes + " minutes";
        } else {
            out.className = "error";
            out.textContent = "Error: " + body.error;
        }
    } catch (e) {
        out.className = "error";
        out.textContent = "Error: " + e;
    }
});
</script>
</body>
</html>
"#;
