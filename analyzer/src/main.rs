use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use review_core::backend::ModelArtifacts;
use review_core::export::{load_sentiment, load_topics, ExportFile, ExportPaths};
use review_core::input::InputSource;
use review_core::labels::TopicLabels;
use review_core::normalizer::normalize;
use review_core::pipeline::{AnalysisSummary, Analyzer, AnalyzerConfig, TopicSummary};
use tracing_subscriber::{fmt, EnvFilter};

use std::fs;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "analyzer")]
#[command(about = "Sentiment and topic analysis of transit app reviews", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
#[group(required = true, multiple = false)]
struct InputArgs {
    /// CSV file with a `Text` column
    #[arg(long)]
    input: Option<PathBuf>,
    /// Plain text file, one review per line
    #[arg(long)]
    lines: Option<PathBuf>,
    /// Use the built-in sample reviews
    #[arg(long)]
    sample: bool,
}

impl InputArgs {
    fn source(&self) -> Result<InputSource> {
        if let Some(path) = &self.input {
            let content = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
            return Ok(InputSource::Csv(content));
        }
        if let Some(path) = &self.lines {
            let content = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
            return Ok(InputSource::Lines(content));
        }
        if self.sample {
            return Ok(InputSource::Sample);
        }
        bail!("one of --input, --lines or --sample is required")
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Classify sentiment and topics, print the summary and optionally export CSVs
    Analyze {
        #[command(flatten)]
        input: InputArgs,
        /// Model artifact directory
        #[arg(long, default_value = "./assets/models")]
        models: PathBuf,
        /// Topic label directory (pos_lab.csv, neg_lab.csv)
        #[arg(long, default_value = "./assets/labels")]
        labels: PathBuf,
        /// Directory for hasil_*.csv exports
        #[arg(long)]
        output: Option<PathBuf>,
        /// Print the summary as JSON instead of text
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Show each review next to its cleaned form
    Preprocess {
        #[command(flatten)]
        input: InputArgs,
    },
    /// Recompute the summary from previously exported CSVs without running any model
    Summarize {
        /// Directory holding hasil_*.csv
        #[arg(long)]
        results: PathBuf,
        #[arg(long, default_value = "./assets/labels")]
        labels: PathBuf,
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Precompute topic centroids into topics.bin
    Compile {
        #[arg(long, default_value = "./assets/models")]
        models: PathBuf,
    },
}

fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Analyze { input, models, labels, output, json } => {
            let reviews = input.source()?.into_reviews()?;
            let analyzer = Analyzer::load(&AnalyzerConfig { models_dir: models, labels_dir: labels })?;
            let report = analyzer.analyze(reviews)?;
            if let Some(dir) = output {
                for path in report.save(&ExportPaths::new(&dir))? {
                    tracing::info!(path = %path.display(), "exported");
                }
            }
            print_summary(&report.summary(analyzer.labels()), json)
        }
        Commands::Preprocess { input } => {
            for review in input.source()?.into_reviews()? {
                println!("{review}\n  -> {}", normalize(&review));
            }
            Ok(())
        }
        Commands::Summarize { results, labels, json } => {
            let paths = ExportPaths::new(&results);
            let sentiment = load_sentiment(&paths)?;
            let positive = load_topics(&paths, ExportFile::PositiveTopics)?;
            let negative = load_topics(&paths, ExportFile::NegativeTopics)?;
            let labels = TopicLabels::load_dir(&labels);
            print_summary(&AnalysisSummary::from_rows(&sentiment, &positive, &negative, &labels), json)
        }
        Commands::Compile { models } => {
            let path = ModelArtifacts::compile(&models)?;
            tracing::info!(path = %path.display(), "compiled topic models");
            Ok(())
        }
    }
}

fn print_summary(summary: &AnalysisSummary, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(summary)?);
        return Ok(());
    }
    let m = &summary.metrics;
    println!("Total ulasan: {}", m.total);
    println!("Rata-rata confidence: {:.2}", m.mean_confidence);
    println!("Positif: {} ({:.1}%)", m.positive_count, summary.positive_share * 100.0);
    println!("Negatif: {} ({:.1}%)", m.negative_count, summary.negative_share * 100.0);
    println!();
    println!("{}", summary.sentiment_interpretation);
    print_topics("Topik Sentimen Positif", summary.positive_topics.as_ref());
    print_topics("Topik Sentimen Negatif", summary.negative_topics.as_ref());
    Ok(())
}

fn print_topics(title: &str, topics: Option<&TopicSummary>) {
    let Some(topics) = topics else { return };
    println!();
    println!("{title}");
    for c in &topics.counts {
        println!("  {:<40} {}", c.label, c.count);
    }
    println!("{}", topics.interpretation);
}
