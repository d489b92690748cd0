use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use review_sentiment::common::{SentimentCategory, MAX_INPUT_CHARS};
use review_sentiment::{analyzer, cli, config, error, reviews, scorer, telemetry};
use cli::{Cli, Commands};
use config::Config;
use error::{Result, SentimentError};
use scorer::LazyScorer;
use std::time::Duration;

fn main() -> Result<()> {
    let cli = Cli::parse();
    telemetry::init_tracing(cli.json_logs, telemetry::level_for(cli.verbose));

    let mut config = Config::load()?;
    if let Some(backend) = cli.backend {
        config.backend = backend;
    }

    match cli.command {
        Commands::Classify { text } => {
            println!("🔎 review-sentiment - 単発分類\n");

            let scorer = LazyScorer::from_config(&config);
            load_scorer(&scorer)?;

            let result = analyzer::classify_text(scorer.get()?, &text)?;
            println!(
                "分類: {} {} / {} ({}つ星)",
                category_mark(result.category),
                result.category.label_pt(),
                result.category,
                result.star_rating
            );
            println!("信頼度: {:.2}", result.confidence);
        }

        Commands::Analyze { input, output, sample_size, seed } => {
            println!("📊 review-sentiment - サンプル分析\n");

            // 1. 読み込み
            println!("[1/3] レビューを読み込み中...");
            let pool = reviews::load_reviews(&input)?;
            if pool.is_empty() {
                return Err(SentimentError::NoReviews(input.display().to_string()));
            }
            println!("✔ コメント付きレビュー {}件\n", pool.len());

            // 2. 分類
            let options = analyzer::SampleOptions {
                sample_size: sample_size.unwrap_or(config.default_sample_size),
                seed: seed.unwrap_or(config.default_seed),
            };
            println!(
                "[2/3] AI分類中... ({}件サンプル, seed={})",
                options.sample_size, options.seed
            );

            let scorer = LazyScorer::from_config(&config);
            load_scorer(&scorer)?;

            let bar = ProgressBar::new(options.sample_size as u64);
            bar.set_style(
                ProgressStyle::with_template("  {bar:40.cyan/blue} {pos}/{len} ({percent}%)")
                    .unwrap_or_else(|_| ProgressStyle::default_bar()),
            );
            let report = match analyzer::analyze_sample(scorer.get()?, &pool, options, |p| {
                bar.set_position(p.completed as u64)
            }) {
                Ok(report) => {
                    bar.finish_and_clear();
                    report
                }
                Err(e) => {
                    bar.abandon();
                    return Err(e);
                }
            };
            println!("✔ 分類完了\n");

            println!("感情分布:");
            for category in SentimentCategory::ALL {
                println!(
                    "  {} {:<9} {:>4}件 ({:.1}%)",
                    category_mark(category),
                    category.label_pt(),
                    report.summary.count(category),
                    report.summary.share(category) * 100.0
                );
            }
            if let Some(dominant) = report.summary.dominant() {
                println!("  最多: {} {}", category_mark(dominant), dominant.label_pt());
            }
            println!();

            // 3. 保存
            println!("[3/3] 結果を保存中...");
            let output = output.unwrap_or_else(|| {
                input
                    .parent()
                    .unwrap_or(std::path::Path::new("."))
                    .join("sentiment-report.json")
            });
            let json = serde_json::to_string_pretty(&report)?;
            std::fs::write(&output, json)?;
            println!("✔ 結果を保存: {}", output.display());

            println!("\n✅ 分析完了");
        }

        Commands::Config { set_model_dir, set_command, show } => {
            if let Some(dir) = set_model_dir {
                config.set_model_dir(dir)?;
                println!("✔ モデルディレクトリを設定しました");
            }

            if let Some(command) = set_command {
                config.set_command(command)?;
                println!("✔ 外部スコアラーのコマンドを設定しました");
            }

            if show {
                println!("設定:");
                println!("  バックエンド: {}", config.backend.name());
                println!("  モデル: {} ({})", config.model_id, config.revision);
                println!(
                    "  モデルディレクトリ: {}",
                    config
                        .resolved_model_dir()
                        .map(|d| d.display().to_string())
                        .unwrap_or_else(|| "未設定（Hubから取得）".into())
                );
                println!(
                    "  外部コマンド: {}",
                    if config.command.is_empty() { "未設定".to_string() } else { config.command.join(" ") }
                );
                println!("  最大文字数: {}", MAX_INPUT_CHARS);
                println!("  サンプル数: {}", config.default_sample_size);
                println!("  シード: {}", config.default_seed);
            }
        }
    }

    Ok(())
}

/// モデル読み込み（初回のみ重い）をスピナー付きで行う
fn load_scorer(scorer: &LazyScorer) -> Result<()> {
    let spinner = ProgressBar::new_spinner();
    spinner.set_message("AIモデルを読み込み中...");
    spinner.enable_steady_tick(Duration::from_millis(120));

    let loaded = scorer.get().map(|_| ());
    spinner.finish_and_clear();
    loaded
}

fn category_mark(category: SentimentCategory) -> &'static str {
    match category {
        SentimentCategory::Negative => "🔴",
        SentimentCategory::Neutral => "🟡",
        SentimentCategory::Positive => "🟢",
    }
}
