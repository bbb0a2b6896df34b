//! Derived episode features
//!
//! Each function is a pure formula over already-imputed values. Fit mode and
//! serve mode call the same functions.

use serde::{Deserialize, Serialize};

/// Added to denominators so zero-length episodes and zero-popularity hosts stay finite
pub const DIVISION_EPSILON: f64 = 0.001;

/// Upper edges of the episode length buckets, left-open and right-closed
const LENGTH_BUCKETS: [(f64, f64, &str); 4] = [
    (0.0, 30.0, "short"),
    (30.0, 60.0, "medium"),
    (60.0, 90.0, "long"),
    (90.0, 200.0, "very_long"),
];

/// Bucket label for lengths outside every interval, NaN included
pub const OUT_OF_RANGE_BUCKET: &str = "nan";

/// All derived values for one record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DerivedFeatures {
    pub ads_per_minute: f64,
    pub is_weekend: f64,
    pub is_morning: f64,
    pub is_night: f64,
    pub length_bucket: String,
    pub sentiment_score: f64,
    pub popularity_ratio: f64,
    pub episode_number: f64,
    pub genre_sentiment: String,
}

pub fn ads_per_minute(number_of_ads: f64, episode_length: f64) -> f64 {
    number_of_ads / (episode_length + DIVISION_EPSILON)
}

pub fn is_weekend(publication_day: &str) -> f64 {
    flag(matches!(publication_day, "Saturday" | "Sunday"))
}

pub fn is_morning(publication_time: &str) -> f64 {
    flag(publication_time == "Morning")
}

pub fn is_night(publication_time: &str) -> f64 {
    flag(publication_time == "Night")
}

pub fn length_bucket(episode_length: f64) -> &'static str {
    LENGTH_BUCKETS
        .iter()
        .find(|(lo, hi, _)| episode_length > *lo && episode_length <= *hi)
        .map(|(_, _, label)| *label)
        .unwrap_or(OUT_OF_RANGE_BUCKET)
}

pub fn sentiment_score(sentiment: &str) -> f64 {
    match sentiment {
        "Negative" => -1.0,
        "Positive" => 1.0,
        _ => 0.0,
    }
}

pub fn popularity_ratio(guest_popularity: f64, host_popularity: f64) -> f64 {
    guest_popularity / (host_popularity + DIVISION_EPSILON)
}

/// First run of ASCII digits in the title, or 0.0
pub fn episode_number(title: &str) -> f64 {
    let digits: String = title
        .chars()
        .skip_while(|c| !c.is_ascii_digit())
        .take_while(|c| c.is_ascii_digit())
        .collect();

    digits.parse::<f64>().unwrap_or(0.0)
}

pub fn genre_sentiment(genre: &str, sentiment: &str) -> String {
    format!("{}_{}", genre, sentiment)
}

fn flag(b: bool) -> f64 {
    if b {
        1.0
    } else {
        0.0
    }
}
