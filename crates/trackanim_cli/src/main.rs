use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Parser, Subcommand, ValueEnum};

use trackanim_core::config::{ConfigManager, Settings};
use trackanim_core::logging::init_tracing;
use trackanim_core::models::ReferencePolicy;
use trackanim_core::orchestrator::{animate_tracks, AnimationOutcome};
use trackanim_core::store::{AddTrackOutcome, TrackStore, UploadedDocument};
use trackanim_core::tracks::{classify_file, crop_file};

#[derive(Parser, Debug)]
#[command(name = "trackanim", version)]
struct Cli {
    /// Config file (created with defaults if missing).
    #[arg(long, global = true, default_value = "config.toml")]
    config: PathBuf,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render GPX files into an animated video.
    Animate(AnimateArgs),
    /// Show how each file would be treated.
    Classify(ClassifyArgs),
    /// Keep only track points with index in START..=END.
    Crop(CropArgs),
    /// Manage the per-chat track store.
    #[command(subcommand)]
    Store(StoreCommand),
}

#[derive(Parser, Debug)]
struct AnimateArgs {
    /// GPX files, in color order.
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// Skip temporal alignment.
    #[arg(long)]
    no_align: bool,

    /// Override the recency window in hours.
    #[arg(long)]
    window_hours: Option<f64>,

    /// Override the alignment reference.
    #[arg(long, value_enum)]
    reference: Option<ReferenceChoice>,
}

#[derive(Parser, Debug)]
struct ClassifyArgs {
    #[arg(required = true)]
    files: Vec<PathBuf>,
}

#[derive(Parser, Debug)]
struct CropArgs {
    file: PathBuf,

    /// First point index to keep (0-based, inclusive).
    #[arg(long)]
    start: usize,

    /// Last point index to keep (inclusive).
    #[arg(long)]
    end: usize,
}

#[derive(Subcommand, Debug)]
enum StoreCommand {
    /// Register an uploaded document for a chat.
    Add {
        #[arg(long)]
        chat: i64,
        #[arg(long)]
        username: Option<String>,
        #[arg(long)]
        file_id: String,
        #[arg(long)]
        unique_id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long, default_value = "application/gpx+xml")]
        mime: String,
    },
    /// List a chat's tracks.
    List {
        #[arg(long)]
        chat: i64,
    },
    /// Remove all of a chat's tracks.
    Clear {
        #[arg(long)]
        chat: i64,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ReferenceChoice {
    PerFile,
    Global,
}

impl From<ReferenceChoice> for ReferencePolicy {
    fn from(choice: ReferenceChoice) -> Self {
        match choice {
            ReferenceChoice::PerFile => ReferencePolicy::PerFile,
            ReferenceChoice::Global => ReferencePolicy::Global,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = ConfigManager::new(&cli.config);
    config
        .load_or_create()
        .with_context(|| format!("load config '{}'", cli.config.display()))?;
    init_tracing(config.settings().logging.level);
    tracing::debug!("trackanim {}", trackanim_core::version());

    match cli.cmd {
        Command::Animate(args) => {
            config.ensure_dirs_exist().context("create work directories")?;
            cmd_animate(config.into_settings(), args).await
        }
        Command::Classify(args) => cmd_classify(args),
        Command::Crop(args) => cmd_crop(args),
        Command::Store(cmd) => cmd_store(config.settings(), cmd),
    }
}

async fn cmd_animate(mut settings: Settings, args: AnimateArgs) -> anyhow::Result<()> {
    if args.no_align {
        settings.alignment.enabled = false;
    }
    if let Some(hours) = args.window_hours {
        anyhow::ensure!(hours > 0.0, "--window-hours must be positive");
        settings.alignment.recency_window_hours = hours;
    }
    if let Some(reference) = args.reference {
        settings.alignment.reference = reference.into();
    }

    match animate_tracks(&settings, &args.files).await {
        AnimationOutcome::Success(video) => {
            println!("{}", video.display());
            Ok(())
        }
        AnimationOutcome::Error(message) => anyhow::bail!("{}", message.trim_end()),
    }
}

fn cmd_classify(args: ClassifyArgs) -> anyhow::Result<()> {
    for path in &args.files {
        let file = classify_file(path)?;
        let doc = &file.document;
        let span = match (doc.earliest_time(), doc.latest_time()) {
            (Some(first), Some(last)) => format!("{} .. {}", first, last),
            _ => "untimed".to_string(),
        };
        println!(
            "{}\t{}\t{} track(s), {} point(s), {} waypoint(s)\t{}",
            path.display(),
            file.class,
            doc.tracks.len(),
            doc.track_point_count(),
            doc.waypoints.len(),
            span
        );
    }
    Ok(())
}

fn cmd_crop(args: CropArgs) -> anyhow::Result<()> {
    let remaining = crop_file(&args.file, args.start, args.end)
        .with_context(|| format!("crop '{}'", args.file.display()))?;
    println!("{} point(s) left in {}", remaining, args.file.display());
    Ok(())
}

fn cmd_store(settings: &Settings, cmd: StoreCommand) -> anyhow::Result<()> {
    let mut store = TrackStore::open(&settings.paths.store_file);

    match cmd {
        StoreCommand::Add {
            chat,
            username,
            file_id,
            unique_id,
            name,
            mime,
        } => {
            let document = UploadedDocument {
                file_id,
                file_unique_id: unique_id,
                file_name: name,
                mime_type: Some(mime),
            };
            match store.try_add_track(chat, username.as_deref(), Some(&document))? {
                AddTrackOutcome::Added(track) => {
                    println!("added #{} {}", track.id, track.file_name)
                }
                AddTrackOutcome::NotGpx(mime) => anyhow::bail!("not a GPX document: {}", mime),
                AddTrackOutcome::TooMany(count) => {
                    anyhow::bail!("chat {} already has {} tracks", chat, count)
                }
                AddTrackOutcome::NoDocument => anyhow::bail!("no document"),
            }
        }
        StoreCommand::List { chat } => {
            for track in store.list_tracks(chat) {
                println!("#{}\t{}\t{}", track.id, track.file_name, track.unique_id);
            }
        }
        StoreCommand::Clear { chat } => {
            let removed = store.clear_tracks(chat)?;
            println!("removed {} track(s)", removed);
        }
    }
    Ok(())
}
