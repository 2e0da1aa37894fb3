use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use subscrape::{
    init_tracing_once, merge_jsonl_files, Credentials, PostErrorPolicy, Scraper, TimeWindow, DEFAULT_MERGE_INPUTS,
    DEFAULT_MERGE_OUTPUT,
};

/// Scrape subreddit submissions + top comments into JSONL/CSV datasets.
#[derive(Parser, Debug)]
#[command(name = "subscrape", version)]
struct Cli {
    /// Path to .env file (optional).
    #[arg(long, env = "DOTENV_PATH", default_value = ".env", global = true)]
    dotenv: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Scrape a subreddit into {prefix}_{subreddit}_{sort}_{time_filter}_{limit}.jsonl/.csv
    Scrape(ScrapeArgs),
    /// Concatenate JSONL datasets into one file
    Merge(MergeArgs),
}

#[derive(Args, Debug)]
struct ScrapeArgs {
    /// Subreddit name (no r/)
    #[arg(short, long, default_value = "soccercirclejerk")]
    subreddit: String,

    /// Number of submissions to fetch (0 = no cap)
    #[arg(short, long, default_value_t = 250)]
    limit: u32,

    /// Sort order: top, hot, new, rising (anything else falls back to top)
    #[arg(long, default_value = "top")]
    sort: String,

    /// Time filter for top: all, day, hour, month, week, year
    #[arg(short, long = "time-filter", alias = "time_filter", default_value = "all")]
    time_filter: TimeWindow,

    /// Top N comments to include per submission
    #[arg(short = 'c', long = "top-comments", alias = "top_comments", default_value_t = 5)]
    top_comments: usize,

    /// Output filename prefix
    #[arg(short, long = "output-prefix", alias = "output_prefix", default_value = "dataset")]
    output_prefix: String,

    /// Directory for the output files
    #[arg(long, default_value = ".")]
    out_dir: PathBuf,

    /// On a per-submission error: skip it, or abort the run
    #[arg(long, default_value = "skip")]
    on_error: PostErrorPolicy,

    /// Mask URLs, e-mail addresses and u/ mentions in text fields
    #[arg(long)]
    redact_pii: bool,

    /// Write created_utc as RFC3339 strings instead of epoch seconds
    #[arg(long)]
    human_timestamps: bool,

    /// Disable the progress bar
    #[arg(long)]
    no_progress: bool,

    /// Reddit app client id [env: REDDIT_CLIENT_ID]
    #[arg(long)]
    client_id: Option<String>,

    /// Reddit app client secret [env: REDDIT_CLIENT_SECRET]
    #[arg(long)]
    client_secret: Option<String>,

    /// User agent sent with every request [env: REDDIT_USER_AGENT]
    #[arg(long)]
    user_agent: Option<String>,
}

#[derive(Args, Debug)]
struct MergeArgs {
    /// Input JSONL files, merged in order (defaults to the built-in dataset list)
    files: Vec<PathBuf>,

    /// Merged output file
    #[arg(short, long, default_value = DEFAULT_MERGE_OUTPUT)]
    output: PathBuf,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load .env before credentials are resolved.
    if std::path::Path::new(&cli.dotenv).exists() {
        dotenvy::from_path(&cli.dotenv)?;
    }
    init_tracing_once();

    match cli.command {
        Command::Scrape(args) => scrape(args),
        Command::Merge(args) => merge(args),
    }
}

fn scrape(args: ScrapeArgs) -> Result<()> {
    let env = |key: &str| std::env::var(key).ok();
    let creds = Credentials::new(
        args.client_id.or_else(|| env("REDDIT_CLIENT_ID")),
        args.client_secret.or_else(|| env("REDDIT_CLIENT_SECRET")),
        args.user_agent.or_else(|| env("REDDIT_USER_AGENT")),
    );

    let summary = Scraper::new()
        .subreddit(&args.subreddit)
        .sort(&args.sort)
        .time_filter(args.time_filter)
        .limit(Some(args.limit))
        .top_comments(args.top_comments)
        .output_prefix(args.output_prefix)
        .out_dir(&args.out_dir)
        .on_error(args.on_error)
        .redact_pii(args.redact_pii)
        .timestamps_human_readable(args.human_timestamps)
        .progress(!args.no_progress)
        .run_with_credentials(&creds)?;

    if summary.failed > 0 {
        tracing::warn!("{} submission(s) could not be processed", summary.failed);
    }
    Ok(())
}

fn merge(args: MergeArgs) -> Result<()> {
    let inputs: Vec<PathBuf> = if args.files.is_empty() {
        DEFAULT_MERGE_INPUTS.iter().map(PathBuf::from).collect()
    } else {
        args.files
    };
    let n = merge_jsonl_files(&inputs, &args.output)?;
    println!("Merged {} files into {}", n, args.output.display());
    Ok(())
}
