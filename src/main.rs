use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;
use trivia_quiz::config::{DEFAULT_API_URL, DEFAULT_REVEAL_DELAY, DEFAULT_TIMEOUT};
use trivia_quiz::{
    ApiConfig, App, Difficulty, InMemoryTokenCache, OpenTdbClient, QuestionSource, Quiz,
    QuizError, load_pool_from_json,
};

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Base URL of the trivia API
    #[arg(long, env = "TRIVIA_API_URL", default_value = DEFAULT_API_URL)]
    api_url: String,

    /// Timeout for each request to the trivia API, in seconds
    #[arg(long, default_value_t = DEFAULT_TIMEOUT.as_secs())]
    timeout_secs: u64,

    /// Pause before retrying a refused fetch, in milliseconds
    /// (defaults to 5000 against opentdb.com, 0 elsewhere)
    #[arg(long)]
    retry_delay_ms: Option<u64>,

    /// JSON file of questions to use when the trivia API is unavailable
    #[arg(long)]
    fallback: Option<PathBuf>,

    /// How long an answer stays revealed before moving on; 0 waits for Enter
    #[arg(long, default_value_t = DEFAULT_REVEAL_DELAY.as_millis() as u64)]
    reveal_delay_ms: u64,

    /// Preselected category id
    #[arg(short, long)]
    category: Option<u32>,

    /// Preselected difficulty
    #[arg(short, long, value_enum)]
    difficulty: Option<Difficulty>,

    /// Preselected number of questions
    #[arg(short = 'n', long, value_parser = clap::value_parser!(u64).range(1..=50))]
    amount: Option<u64>,

    /// Write logs to this file (the terminal is taken by the quiz)
    #[arg(long, env = "TRIVIA_LOG_FILE")]
    log_file: Option<PathBuf>,

    /// Emit logs as JSON lines
    #[arg(long)]
    log_json: bool,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    if let Err(e) = run(args).await {
        eprintln!("Error running quiz: {}", e);
        std::process::exit(1);
    }
}

async fn run(args: Args) -> Result<(), QuizError> {
    if let Some(path) = &args.log_file {
        init_logging(path, args.log_json)?;
    }

    let mut api_config =
        ApiConfig::new(args.api_url).with_timeout(Duration::from_secs(args.timeout_secs));
    if let Some(ms) = args.retry_delay_ms {
        api_config = api_config.with_retry_delay(Duration::from_millis(ms));
    }
    let client = OpenTdbClient::new(&api_config)?;
    let mut source = QuestionSource::new(Arc::new(client), Arc::new(InMemoryTokenCache::new()))
        .with_retry_delay(api_config.retry_delay);

    if let Some(path) = &args.fallback {
        let pool = load_pool_from_json(path)?;
        info!(questions = pool.len(), path = %path.display(), "loaded fallback pool");
        source = source.with_fallback(pool);
    }

    let app = App::new()
        .with_preset(
            args.category,
            args.difficulty,
            args.amount.map(|n| n as usize),
        )
        .with_reveal_delay(Some(Duration::from_millis(args.reveal_delay_ms)));

    info!(api = %api_config.base_url, "starting quiz");
    Quiz::new(app, source).run().await
}

fn init_logging(path: &Path, json: bool) -> Result<(), QuizError> {
    let file = File::create(path)?;
    let filter = EnvFilter::try_from_env("TRIVIA_LOG").unwrap_or_else(|_| EnvFilter::new("info"));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_line_number(true)
        .with_target(false);

    if json {
        builder.json().init();
    } else {
        builder.init();
    }
    Ok(())
}
