use anyhow::{Context, Result};
use dotenvy::dotenv;
use std::path::Path;
use std::sync::Arc;
use teloxide::prelude::*;
use teloxide::update_listeners::Polling;
use tokio_util::sync::CancellationToken;

use pinbot::cli::{Cli, Commands};
use pinbot::telegram::{create_bot, schema, setup_bot_commands, HandlerDeps};
use pincore::conversation::Limits;
use pincore::conversion::check_ffmpeg;
use pincore::core::{config, init_logger, pinterest_link};
use pincore::download::source::YtDlpSource;
use pincore::download::{FetchRequest, MediaExtractor, MediaFetcher};
use pincore::storage::{DownloadLog, InMemorySessionStore, RetentionSweeper, WorkDirs};
use pincore::Conversation;

/// Main entry point for the Telegram bot
///
/// Parses CLI arguments and dispatches to appropriate subcommand.
///
/// # Errors
/// Returns an error if initialization fails (logging, working directories, bot creation).
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse_args();

    // Log panics inside handler tasks instead of losing them
    std::panic::set_hook(Box::new(|panic_info| {
        log::error!("Panic caught: {:?}", panic_info);
        if let Some(location) = panic_info.location() {
            log::error!("Panic at {}:{}:{}", location.file(), location.line(), location.column());
        }
        if let Some(msg) = panic_info.payload().downcast_ref::<&str>() {
            log::error!("Panic message: {}", msg);
        }
    }));

    // .env goes first: every config value is read lazily from the environment
    let _ = dotenv();

    init_logger(&config::LOG_FILE_PATH)?;

    match cli.command {
        Some(Commands::Run) | None => run_bot().await,
        Some(Commands::Info { url, json }) => run_info(&url, json).await,
        Some(Commands::Download {
            url,
            quality,
            format,
            output,
        }) => run_download(&url, quality.as_deref(), format, &output).await,
        Some(Commands::Sweep) => run_sweep(),
    }
}

fn work_dirs() -> Result<WorkDirs> {
    let dirs = WorkDirs::new(&*config::TEMP_DIR);
    dirs.ensure()
        .with_context(|| format!("Failed to create working directories under {}", dirs.root.display()))?;
    Ok(dirs)
}

async fn run_bot() -> Result<()> {
    log::info!("Starting {}...", *config::BOT_NAME);

    let dirs = work_dirs()?;
    if !check_ffmpeg().await {
        log::warn!("ffmpeg not found: oversized videos cannot be compressed");
    }

    let bot = create_bot()?;
    if let Err(e) = setup_bot_commands(&bot).await {
        log::warn!("Failed to set bot commands: {}", e);
    }

    let source = Arc::new(YtDlpSource::default());
    let conversation = Conversation::new(
        source.clone(),
        source,
        Arc::new(InMemorySessionStore::new()),
        dirs.videos.clone(),
    )
    .with_limits(Limits::from_config())
    .with_history(DownloadLog::new(dirs.logs.clone()));
    let deps = HandlerDeps::new(Arc::new(conversation), config::BOT_NAME.as_str());

    let cancel_token = CancellationToken::new();
    let sweeper = RetentionSweeper::from_config(dirs.sweepable());
    log::info!(
        "Retention sweeper: {} directories, files older than {:?}",
        sweeper.dirs().len(),
        sweeper.max_age()
    );
    let sweeper_handle = sweeper.spawn(cancel_token.clone());

    log::info!("Bot started, polling for updates");
    let listener = Polling::builder(bot.clone()).drop_pending_updates().build();
    Dispatcher::builder(bot, schema(deps))
        .dependencies(DependencyMap::new())
        .enable_ctrlc_handler()
        .build()
        .dispatch_with_listener(
            listener,
            LoggingErrorHandler::with_custom_text("An error from the update listener"),
        )
        .await;

    log::info!("Dispatcher stopped, shutting down");
    cancel_token.cancel();
    if let Err(e) = sweeper_handle.await {
        log::error!("Retention sweeper task failed: {}", e);
    }
    Ok(())
}

async fn run_info(text: &str, json: bool) -> Result<()> {
    let url = pinterest_link(text)?;
    let info = YtDlpSource::default()
        .extract(&url)
        .await?
        .with_context(|| format!("No video found at {}", url))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&info)?);
        return Ok(());
    }

    println!("{} ({})", info.title, info.duration);
    println!("Uploader: {}", info.uploader);
    for quality in &info.qualities {
        println!("  {:<12} {:<8} {:>10}  {}", quality.id, quality.label, quality.size, quality.extension);
    }
    Ok(())
}

async fn run_download(text: &str, quality_id: Option<&str>, format: Option<String>, output: &Path) -> Result<()> {
    let url = pinterest_link(text)?;
    let source = YtDlpSource::default();
    let info = source
        .extract(&url)
        .await?
        .with_context(|| format!("No video found at {}", url))?;

    let quality = match quality_id {
        Some(id) => info
            .quality(id)
            .with_context(|| format!("Quality {} not available", id))?,
        None => info.qualities.first().context("No downloadable quality")?,
    };
    log::info!("Downloading {} ({}) to {}", quality.label, quality.id, output.display());

    let mut request = FetchRequest::new(quality.url.clone(), output);
    if let Some(format) = format {
        request = request.with_format(format);
    }
    let result = source
        .fetch(&request)
        .await?
        .context("Download produced no file")?;
    println!("{} ({} bytes)", result.path.display(), result.size);
    Ok(())
}

fn run_sweep() -> Result<()> {
    let dirs = work_dirs()?;
    let report = RetentionSweeper::from_config(dirs.sweepable()).sweep_once();
    println!(
        "Scanned {} files, removed {}, failed {}",
        report.scanned, report.removed, report.failed
    );
    Ok(())
}
