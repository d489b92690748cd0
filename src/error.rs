use thiserror::Error;

#[derive(Error, Debug)]
pub enum SentimentError {
    #[error(transparent)]
    Common(#[from] review_sentiment_common::Error),

    #[error("設定エラー: {0}")]
    Config(String),

    #[error("モデル読み込みエラー: {0}")]
    ModelLoad(String),

    #[error("スコアリング失敗: {0}")]
    ScoringFailed(String),

    #[error("レビュー数 {pool} 件がサンプル数 {sample} 件に足りません")]
    InsufficientPool { pool: usize, sample: usize },

    #[error("バッチ中断 (サンプル{position}件目, レビュー#{index}): {source}")]
    BatchAbort {
        position: usize,
        index: usize,
        #[source]
        source: Box<SentimentError>,
    },

    #[error("レビューファイルが見つかりません: {0}")]
    ReviewsNotFound(String),

    #[error("コメント付きのレビューがありません: {0}")]
    NoReviews(String),

    #[error("JSON解析エラー: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IOエラー: {0}")]
    Io(#[from] std::io::Error),
}

impl SentimentError {
    /// BatchAbort を剥がした根本原因
    pub fn root_cause(&self) -> &SentimentError {
        match self {
            SentimentError::BatchAbort { source, .. } => source.root_cause(),
            other => other,
        }
    }

    pub fn is_invalid_input(&self) -> bool {
        matches!(
            self.root_cause(),
            SentimentError::Common(review_sentiment_common::Error::InvalidInput(_))
        )
    }

    pub fn is_parse_error(&self) -> bool {
        matches!(
            self.root_cause(),
            SentimentError::Common(review_sentiment_common::Error::Parse { .. })
        )
    }

    pub fn is_invalid_rating(&self) -> bool {
        matches!(
            self.root_cause(),
            SentimentError::Common(review_sentiment_common::Error::InvalidRating(_))
        )
    }
}

pub type Result<T> = std::result::Result<T, SentimentError>;
