use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tokio::io::AsyncWriteExt;

use vidsum_datastore::{PgSummaryStore, SummaryMode, SummaryStore};
use vidsum_engine::{
    llm::{anthropic::AnthropicProvider, gemini::GeminiProvider, openai::OpenAiProvider},
    progress_channel,
    tracing::init_tracing_subscriber,
    transcript::{whisper::WhisperClient, ytdlp::YtDlpTool},
    FallbackAcquirer, ProgressEvent, Provider, ProviderChoice, SummarizationPipelineBuilder,
    SummaryRequest,
};

#[derive(Parser)]
#[command(name = "vidsum", about = "Incremental video transcript summarizer")]
struct Cli {
    /// Database connection URL
    #[arg(long, env = "DATABASE_URL")]
    database_url: Option<String>,

    /// Working directory for transcript acquisition scratch files
    #[arg(long, env = "VIDSUM_WORKDIR", default_value = "/var/tmp/vidsum")]
    workdir: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Summarize one video, streaming NDJSON progress events to stdout
    Summarize {
        /// Source video URL
        #[arg(long)]
        url: String,

        /// Target language tag for the summary
        #[arg(long, default_value = "en")]
        language: String,

        /// Summary style
        #[arg(long, default_value = "detailed")]
        mode: SummaryMode,

        /// Generation backend
        #[arg(long, default_value = "gemini")]
        provider: ProviderChoice,

        /// Maximum chunk size in characters
        #[arg(long, default_value = "7000")]
        chunk_size: usize,

        /// Overlap between neighboring chunks in characters
        #[arg(long, default_value = "1000")]
        overlap: usize,
    },
    /// Report which providers have credentials configured
    Providers,
    /// List stored summaries, most recently updated first
    History {
        #[arg(long, default_value = "20")]
        limit: i64,
    },
    /// Print one stored summary
    Show { id: i64 },
}

struct SummarizeConfig {
    db_url: String,
    workdir: PathBuf,
    url: String,
    language: String,
    mode: SummaryMode,
    chunk_size: usize,
    overlap: usize,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    let _guard = sentry::init((
        std::env::var("SENTRY_DSN").unwrap_or_default(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            ..Default::default()
        },
    ));

    let cli = Cli::parse();
    init_tracing_subscriber()?;

    match cli.command {
        Command::Summarize {
            url,
            language,
            mode,
            provider,
            chunk_size,
            overlap,
        } => {
            let config = SummarizeConfig {
                db_url: cli.database_url.context("DATABASE_URL not set")?,
                workdir: cli.workdir,
                url,
                language,
                mode,
                chunk_size,
                overlap,
            };
            match provider {
                ProviderChoice::Gemini => run_summarize(GeminiProvider::new(), config).await?,
                ProviderChoice::OpenAi => run_summarize(OpenAiProvider::new(), config).await?,
                ProviderChoice::Anthropic => {
                    run_summarize(AnthropicProvider::new(), config).await?
                }
            }
        }
        Command::Providers => {
            let map = vidsum_engine::availability();
            println!("{}", serde_json::to_string_pretty(&map)?);
        }
        Command::History { limit } => {
            let db_url = cli.database_url.context("DATABASE_URL not set")?;
            let store = PgSummaryStore::init(&db_url).await?;
            for summary in store.list_recent(limit).await? {
                println!(
                    "{:>6}  {}  [{}] {}",
                    summary.id,
                    summary.updated_at.format("%Y-%m-%d %H:%M"),
                    summary.language,
                    summary.display_title(),
                );
            }
        }
        Command::Show { id } => {
            let db_url = cli.database_url.context("DATABASE_URL not set")?;
            let store = PgSummaryStore::init(&db_url).await?;
            let summary = store
                .find_by_id(id)
                .await?
                .with_context(|| format!("no summary with id {id}"))?;
            println!("# {}", summary.display_title());
            println!(
                "video: {}  language: {}  mode: {}  source: {}",
                summary.video_id, summary.language, summary.mode, summary.source
            );
            println!();
            println!("{}", summary.content);
        }
    }

    Ok(())
}

async fn run_summarize<P>(provider: P, config: SummarizeConfig) -> anyhow::Result<()>
where
    P: Provider + Send + Sync + 'static,
{
    let store = PgSummaryStore::init(&config.db_url).await?;

    // yt-dlp backs both the caption and the media capability
    let ytdlp = YtDlpTool::new(&config.workdir)
        .with_caption_langs(format!("{},en,en-US", config.language));
    let acquirer = FallbackAcquirer::new(
        ytdlp.clone(),
        ytdlp,
        WhisperClient::new(),
        &config.workdir,
    );

    let pipeline = SummarizationPipelineBuilder::new()
        .store(store)
        .acquirer(acquirer)
        .provider(provider)
        .chunking(config.chunk_size, config.overlap)
        .build();

    let request = SummaryRequest {
        url: config.url,
        language: config.language,
        mode: config.mode,
    };

    let (sink, mut events) = progress_channel();
    let worker = tokio::spawn(pipeline.run(request, sink));

    // transport adapter: one JSON line per event, flushed as it arrives
    let mut stdout = tokio::io::stdout();
    let mut failed = false;
    while let Some(event) = events.recv().await {
        if matches!(event, ProgressEvent::Error { .. }) {
            failed = true;
        }
        let line = serde_json::to_string(&event)?;
        stdout.write_all(line.as_bytes()).await?;
        stdout.write_all(b"\n").await?;
        stdout.flush().await?;
    }
    worker.await?;

    if failed {
        anyhow::bail!("summarization failed; see the error event for details");
    }
    Ok(())
}
