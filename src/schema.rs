//! Column names and the canonical feature order
//!
//! Every feature matrix produced by the crate, in fit mode or serve mode,
//! uses [`FEATURE_COLUMNS`] as its column order.

/// Row identifier, dropped before modelling
pub const ID_COLUMN: &str = "id";

/// Regression target in the training table
pub const TARGET_COLUMN: &str = "Listening_Time_minutes";

pub const PODCAST_NAME: &str = "Podcast_Name";
pub const EPISODE_TITLE: &str = "Episode_Title";
pub const EPISODE_LENGTH: &str = "Episode_Length_minutes";
pub const GENRE: &str = "Genre";
pub const HOST_POPULARITY: &str = "Host_Popularity_percentage";
pub const PUBLICATION_DAY: &str = "Publication_Day";
pub const PUBLICATION_TIME: &str = "Publication_Time";
pub const GUEST_POPULARITY: &str = "Guest_Popularity_percentage";
pub const NUMBER_OF_ADS: &str = "Number_of_Ads";
pub const EPISODE_SENTIMENT: &str = "Episode_Sentiment";

pub const ADS_PER_MINUTE: &str = "ads_per_minute";
pub const IS_WEEKEND: &str = "is_weekend";
pub const IS_MORNING: &str = "is_morning";
pub const IS_NIGHT: &str = "is_night";
pub const LENGTH_BUCKET: &str = "length_bucket";
pub const SENTIMENT_SCORE: &str = "sentiment_score";
pub const POPULARITY_RATIO: &str = "popularity_ratio";
pub const EPISODE_NUMBER: &str = "episode_number";
pub const GENRE_SENTIMENT: &str = "genre_sentiment";

/// Fields every raw record is expected to carry
pub const RAW_FIELDS: [&str; 10] = [
    PODCAST_NAME,
    EPISODE_TITLE,
    EPISODE_LENGTH,
    GENRE,
    HOST_POPULARITY,
    PUBLICATION_DAY,
    PUBLICATION_TIME,
    GUEST_POPULARITY,
    NUMBER_OF_ADS,
    EPISODE_SENTIMENT,
];

/// Raw fields read as numbers
pub const NUMERIC_FIELDS: [&str; 4] = [
    EPISODE_LENGTH,
    HOST_POPULARITY,
    GUEST_POPULARITY,
    NUMBER_OF_ADS,
];

/// Columns that go through label encoding
pub const CATEGORICAL_FEATURES: [&str; 8] = [
    PODCAST_NAME,
    EPISODE_TITLE,
    GENRE,
    PUBLICATION_DAY,
    PUBLICATION_TIME,
    EPISODE_SENTIMENT,
    LENGTH_BUCKET,
    GENRE_SENTIMENT,
];

/// Columns filled by the per-Genre mean during fitting
pub const GROUP_FILL_COLUMNS: [&str; 2] = [EPISODE_LENGTH, GUEST_POPULARITY];

/// Canonical column order of the model's input matrix
pub const FEATURE_COLUMNS: [&str; 19] = [
    PODCAST_NAME,
    EPISODE_TITLE,
    EPISODE_LENGTH,
    GENRE,
    HOST_POPULARITY,
    PUBLICATION_DAY,
    PUBLICATION_TIME,
    GUEST_POPULARITY,
    NUMBER_OF_ADS,
    EPISODE_SENTIMENT,
    ADS_PER_MINUTE,
    IS_WEEKEND,
    IS_MORNING,
    IS_NIGHT,
    LENGTH_BUCKET,
    SENTIMENT_SCORE,
    POPULARITY_RATIO,
    EPISODE_NUMBER,
    GENRE_SENTIMENT,
];

/// Canonical feature order as owned strings
pub fn feature_names() -> Vec<String> {
    FEATURE_COLUMNS.iter().map(|c| c.to_string()).collect()
}

/// Whether `column` is label encoded
pub fn is_categorical(column: &str) -> bool {
    CATEGORICAL_FEATURES.contains(&column)
}
