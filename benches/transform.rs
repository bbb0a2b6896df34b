use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use podcast_listening::inference::Predictor;
use podcast_listening::preprocessing::RawRecord;
use podcast_listening::schema;
use podcast_listening::training::{TrainingConfig, TrainingPipeline};
use polars::prelude::*;
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;

const PODCASTS: [&str; 5] = ["TechTalk", "Laugh Lines", "Daily Brief", "Mind Matters", "Game Day"];
const GENRES: [&str; 5] = ["Technology", "Comedy", "News", "Health", "Sports"];
const DAYS: [&str; 7] = ["Monday", "Tuesday", "Wednesday", "Thursday", "Friday", "Saturday", "Sunday"];
const TIMES: [&str; 4] = ["Morning", "Afternoon", "Evening", "Night"];
const SENTIMENTS: [&str; 3] = ["Negative", "Neutral", "Positive"];

fn create_episode_data(n_rows: usize) -> DataFrame {
    let mut rng = ChaCha8Rng::seed_from_u64(7);

    let mut podcasts = Vec::with_capacity(n_rows);
    let mut titles = Vec::with_capacity(n_rows);
    let mut lengths: Vec<Option<f64>> = Vec::with_capacity(n_rows);
    let mut genres = Vec::with_capacity(n_rows);
    let mut hosts = Vec::with_capacity(n_rows);
    let mut days = Vec::with_capacity(n_rows);
    let mut times = Vec::with_capacity(n_rows);
    let mut guests: Vec<Option<f64>> = Vec::with_capacity(n_rows);
    let mut ads = Vec::with_capacity(n_rows);
    let mut sentiments = Vec::with_capacity(n_rows);
    let mut target = Vec::with_capacity(n_rows);

    for _ in 0..n_rows {
        let length = rng.gen_range(5.0..150.0);
        let host = rng.gen_range(1.0..100.0);
        let n_ads = rng.gen_range(0..4) as f64;

        podcasts.push(*PODCASTS.choose(&mut rng).unwrap_or(&PODCASTS[0]));
        titles.push(format!("Episode {}", rng.gen_range(1..100)));
        lengths.push(if rng.gen_bool(0.1) { None } else { Some(length) });
        genres.push(*GENRES.choose(&mut rng).unwrap_or(&GENRES[0]));
        hosts.push(host);
        days.push(*DAYS.choose(&mut rng).unwrap_or(&DAYS[0]));
        times.push(*TIMES.choose(&mut rng).unwrap_or(&TIMES[0]));
        guests.push(if rng.gen_bool(0.2) { None } else { Some(rng.gen_range(1.0..100.0)) });
        ads.push(n_ads);
        sentiments.push(*SENTIMENTS.choose(&mut rng).unwrap_or(&SENTIMENTS[0]));
        target.push(0.7 * length + 0.1 * host - 1.5 * n_ads + rng.gen::<f64>() * 5.0);
    }

    df!(
        schema::PODCAST_NAME => podcasts,
        schema::EPISODE_TITLE => titles,
        schema::EPISODE_LENGTH => lengths,
        schema::GENRE => genres,
        schema::HOST_POPULARITY => hosts,
        schema::PUBLICATION_DAY => days,
        schema::PUBLICATION_TIME => times,
        schema::GUEST_POPULARITY => guests,
        schema::NUMBER_OF_ADS => ads,
        schema::EPISODE_SENTIMENT => sentiments,
        schema::TARGET_COLUMN => target
    )
    .unwrap()
}

fn sample_record() -> RawRecord {
    RawRecord::new()
        .with(schema::PODCAST_NAME, "TechTalk")
        .with(schema::EPISODE_TITLE, "Episode 7")
        .with(schema::EPISODE_LENGTH, 45.0)
        .with(schema::GENRE, "Technology")
        .with(schema::HOST_POPULARITY, 60.0)
        .with(schema::PUBLICATION_DAY, "Saturday")
        .with(schema::PUBLICATION_TIME, "Morning")
        .with(schema::GUEST_POPULARITY, 30.0)
        .with(schema::NUMBER_OF_ADS, 2.0)
        .with(schema::EPISODE_SENTIMENT, "Positive")
}

fn bench_fit(c: &mut Criterion) {
    let mut group = c.benchmark_group("fit");
    group.sample_size(10);

    for n_rows in [1000, 10000].iter() {
        let df = create_episode_data(*n_rows);
        let pipeline = TrainingPipeline::new(TrainingConfig::new("unused.csv"));

        group.bench_with_input(BenchmarkId::new("fit_frame", n_rows), &df, |b, df| {
            b.iter(|| pipeline.fit_frame(black_box(df)).unwrap())
        });
    }

    group.finish();
}

fn bench_serve(c: &mut Criterion) {
    let df = create_episode_data(2000);
    let outcome = TrainingPipeline::new(TrainingConfig::new("unused.csv"))
        .fit_frame(&df)
        .unwrap();
    let predictor = Predictor::new(outcome.bundle);
    let record = sample_record();

    let mut group = c.benchmark_group("serve");

    group.bench_function("transform_one", |b| {
        b.iter(|| predictor.transformer().transform_one(black_box(&record)).unwrap())
    });

    group.bench_function("predict_record", |b| {
        b.iter(|| predictor.predict_record(black_box(&record)).unwrap())
    });

    let payload = serde_json::json!({
        "Podcast_Name": "TechTalk",
        "Episode_Title": "Episode 7",
        "Episode_Length_minutes": null,
        "Genre": "Technology",
        "Host_Popularity_percentage": 60,
        "Publication_Day": "Saturday",
        "Publication_Time": "Morning",
        "Guest_Popularity_percentage": 30,
        "Number_of_Ads": 2,
        "Episode_Sentiment": "Positive"
    });
    group.bench_function("predict_json", |b| {
        b.iter(|| predictor.predict_json(black_box(&payload)).unwrap())
    });

    group.finish();
}

criterion_group!(benches, bench_fit, bench_serve);
criterion_main!(benches);
