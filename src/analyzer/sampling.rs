//! シード固定のランダムサンプリング
//!
//! 同じプール・同じシード・同じサンプル数なら、毎回同じレコードを同じ順で選ぶ。
//! 乱数生成器はグローバル状態を使わず、呼び出し側が渡す。

use crate::error::{Result, SentimentError};
use rand::rngs::StdRng;
use rand::seq::index;
use rand::{Rng, SeedableRng};
use review_sentiment_common::ReviewRecord;

/// シードから乱数生成器を作る
pub fn seeded_rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

/// プールから `sample_size` 件を重複なしで一様に抽出
///
/// 返す順序は抽出順（進捗表示の順序になる）。
pub fn sample_records<'a, R: Rng + ?Sized>(
    pool: &'a [ReviewRecord],
    sample_size: usize,
    rng: &mut R,
) -> Result<Vec<&'a ReviewRecord>> {
    if sample_size > pool.len() {
        return Err(SentimentError::InsufficientPool {
            pool: pool.len(),
            sample: sample_size,
        });
    }

    Ok(index::sample(rng, pool.len(), sample_size)
        .into_iter()
        .map(|i| &pool[i])
        .collect())
}
