use clap::{Args, Parser, Subcommand};
use websift::{Config, LogEmitter, Orchestrator};

#[derive(Parser, Debug)]
#[command(name = "websift", about = "Search the web and summarize the result pages")]
struct Cli {
    #[command(subcommand)]
    command: Command,

    #[command(flatten)]
    overrides: Overrides,

    /// Do not log progress events
    #[arg(long, global = true)]
    quiet: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run a search and fetch every result page
    Search { query: Vec<String> },
    /// Fetch and summarize a single page
    Page { url: String },
}

#[derive(Args, Debug)]
struct Overrides {
    #[arg(long, global = true)]
    max_results: Option<usize>,
    #[arg(long, global = true)]
    words_limit: Option<usize>,
    /// Per-request timeout in seconds
    #[arg(long, global = true)]
    timeout: Option<u64>,
    /// Comma separated origins to skip
    #[arg(long, global = true)]
    ignore: Option<String>,
    #[arg(long, global = true)]
    concurrency: Option<usize>,
    #[arg(long, global = true)]
    max_main_points: Option<usize>,
    #[arg(long, global = true)]
    no_citations: bool,
    #[arg(long, global = true)]
    no_summary: bool,
    /// Keep results in search order
    #[arg(long, global = true)]
    ordered: bool,
}

impl Overrides {
    fn apply(self, mut config: Config) -> Config {
        if let Some(v) = self.max_results {
            config.max_results = v;
        }
        if let Some(v) = self.words_limit {
            config.page_content_words_limit = v;
        }
        if let Some(v) = self.timeout {
            config.timeout = v;
        }
        if let Some(v) = self.ignore {
            config.ignored_websites = v;
        }
        if let Some(v) = self.concurrency {
            config.max_concurrent_requests = v;
        }
        if let Some(v) = self.max_main_points {
            config.max_main_points = v;
        }
        if self.no_citations {
            config.citation_links = false;
        }
        if self.no_summary {
            config.summarize_content = false;
        }
        if self.ordered {
            config.preserve_order = true;
        }
        config
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Also picks up `log` records from the library.
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = cli.overrides.apply(Config::from_env()?);
    let orchestrator = Orchestrator::new(config)?;

    let emitter = LogEmitter;
    let emitter: Option<&dyn websift::EventEmitter> = if cli.quiet { None } else { Some(&emitter) };

    let outcome = match cli.command {
        Command::Search { query } => orchestrator.run(&query.join(" "), emitter).await,
        Command::Page { url } => orchestrator.scrape_page(&url, emitter).await,
    };
    println!("{}", outcome.to_json());
    Ok(())
}
