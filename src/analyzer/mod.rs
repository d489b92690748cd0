pub mod sampling;
mod types;

pub use sampling::{sample_records, seeded_rng};
pub use types::{BatchReport, Progress, SampleOptions};

use crate::error::{Result, SentimentError};
use crate::scorer::Scorer;
use review_sentiment_common::{
    AggregateSummary, EnrichedRecord, ReviewRecord, SingleClassification,
};
use tracing::{debug, info};

/// 1件のテキストを分類（単発・対話用）
///
/// バッチ処理とは状態を共有しない。失敗時は結果を一切返さない。
pub fn classify_text(scorer: &Scorer, text: &str) -> Result<SingleClassification> {
    let result = scorer.score(text)?;
    Ok(SingleClassification::from_result(&result)?)
}

/// プールからシード固定でサンプルを抽出し、順に分類して集計
///
/// - 分類は抽出順に1件ずつ（並列化しない）
/// - 1件分類するごとに `on_progress` を呼ぶ
/// - 1件でも失敗したらバッチ全体を中断し、途中結果は返さない
pub fn analyze_sample<F>(
    scorer: &Scorer,
    pool: &[ReviewRecord],
    options: SampleOptions,
    mut on_progress: F,
) -> Result<BatchReport>
where
    F: FnMut(Progress),
{
    let mut rng = seeded_rng(options.seed);
    let sample = sample_records(pool, options.sample_size, &mut rng)?;
    let total = sample.len();

    info!(
        pool = pool.len(),
        sample_size = total,
        seed = options.seed,
        "batch classification started"
    );

    let mut records = Vec::with_capacity(total);
    for (position, record) in sample.into_iter().enumerate() {
        let enriched = classify_record(scorer, record).map_err(|e| SentimentError::BatchAbort {
            position: position + 1,
            index: record.index,
            source: Box::new(e),
        })?;

        debug!(
            position = position + 1,
            index = record.index,
            stars = enriched.classification.star_rating,
            category = %enriched.category,
            "record classified"
        );

        records.push(enriched);
        on_progress(Progress {
            completed: position + 1,
            total,
        });
    }

    let summary = AggregateSummary::from_records(&records);
    info!(
        negative = summary.negative,
        neutral = summary.neutral,
        positive = summary.positive,
        "batch classification finished"
    );

    Ok(BatchReport {
        records,
        summary,
        sample_size: options.sample_size,
        seed: options.seed,
        generated_at: chrono::Local::now().to_rfc3339(),
    })
}

fn classify_record(scorer: &Scorer, record: &ReviewRecord) -> Result<EnrichedRecord> {
    let classification = scorer.score(&record.comment)?;
    Ok(EnrichedRecord::new(record.clone(), classification)?)
}
