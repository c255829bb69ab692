//! Command implementations

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::{info, warn};

use crate::adapters::AppConfig;
use crate::app::{AppContainer, DefaultAppContainer, VideoCutInteractor};
use crate::cli::args::{CutArgs, CutsArgs, ResourceArgs, VideosArgs};
use crate::cli::{Cli, Commands};
use crate::domain::model::{CutRequest, TimeSpec};
use crate::output::VideoResource;
use crate::utils::format_file_size;

/// How often the cut command redraws its progress line
const PROGRESS_INTERVAL: Duration = Duration::from_millis(250);

/// Run the parsed command against a freshly wired container
pub async fn run(cli: Cli, config: AppConfig) -> Result<()> {
    let container = DefaultAppContainer::new(&config)?;
    let interactor = container.cut_interactor();
    let json = cli.json;

    match cli.command {
        Commands::Folders => print_list(&interactor.list_folders()?, json),
        Commands::Videos(args) => videos(&interactor, args, json),
        Commands::Cuts(args) => cuts(&interactor, args, json),
        Commands::Cut(args) => cut(&interactor, args, json).await,
        Commands::Resource(args) => resource(&interactor, args, json).await,
    }
}

fn videos(interactor: &VideoCutInteractor, args: VideosArgs, json: bool) -> Result<()> {
    let videos = interactor
        .list_videos(&args.folder)
        .with_context(|| format!("Failed to list videos in '{}'", args.folder))?;
    print_list(&videos, json)
}

fn cuts(interactor: &VideoCutInteractor, args: CutsArgs, json: bool) -> Result<()> {
    let names = match args.date {
        Some(date) => interactor
            .list_cut_videos(&date)
            .with_context(|| format!("Failed to list cuts of {}", date))?,
        None => interactor.list_cut_folders()?,
    };
    print_list(&names, json)
}

/// Execute the cut command, redrawing progress until the tool exits
pub async fn cut(interactor: &VideoCutInteractor, args: CutArgs, json: bool) -> Result<()> {
    let start = TimeSpec::parse(&args.start)
        .with_context(|| format!("Invalid start time '{}'", args.start))?;
    let duration = TimeSpec::parse(&args.duration)
        .with_context(|| format!("Invalid duration '{}'", args.duration))?;

    let request = CutRequest::new(
        args.folder.as_str(),
        args.file.as_str(),
        start.as_seconds(),
        duration.as_seconds(),
    )?;
    info!(
        folder = %args.folder,
        file = %args.file,
        start = %start,
        duration = %duration,
        "starting cut"
    );

    let handle = interactor.submit(request).await?;
    let show_progress = !args.quiet && !json;

    let mut ticker = tokio::time::interval(PROGRESS_INTERVAL);
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);
    let mut interrupted = false;

    while !handle.is_finished() {
        tokio::select! {
            _ = ticker.tick() => {
                if show_progress {
                    print_progress(&args.file, interactor.progress(&args.folder, &args.file));
                }
            }
            _ = &mut ctrl_c, if !interrupted => {
                warn!("interrupt received, cancelling cut");
                interrupted = true;
                handle.cancel();
            }
        }
    }

    let result = handle.wait().await;
    if show_progress {
        print_progress(&args.file, interactor.progress(&args.folder, &args.file));
        eprintln!();
    }
    let result = result.with_context(|| format!("Failed to cut {}/{}", args.folder, args.file))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        println!("{}", result.output_path.display());
    }
    Ok(())
}

#[derive(Debug, Serialize)]
struct ResourceInfo {
    path: PathBuf,
    file_name: String,
    content_type: String,
    len: u64,
}

/// Execute the resource command
pub async fn resource(
    interactor: &VideoCutInteractor,
    args: ResourceArgs,
    json: bool,
) -> Result<()> {
    let resource: VideoResource = if args.cut {
        interactor.load_cut_resource(&args.folder, &args.file).await?
    } else {
        interactor.load_resource(&args.folder, &args.file).await?
    };

    let details = ResourceInfo {
        path: resource.path().to_path_buf(),
        file_name: resource.file_name(),
        content_type: resource.content_type().to_string(),
        len: resource.len(),
    };
    if json {
        println!("{}", serde_json::to_string_pretty(&details)?);
    } else {
        println!("{}", details.path.display());
        println!("{}", details.content_type);
        println!("{}", format_file_size(details.len));
    }

    let Some(output) = args.output else {
        return Ok(());
    };

    let copied = match args.range {
        Some((start, end)) => {
            let mut reader = resource.into_range(start, end).await?;
            let mut file = tokio::fs::File::create(&output)
                .await
                .with_context(|| format!("Failed to create {}", output.display()))?;
            tokio::io::copy(&mut reader, &mut file)
                .await
                .with_context(|| format!("Failed to write {}", output.display()))?
        }
        None => tokio::fs::copy(resource.path(), &output)
            .await
            .with_context(|| format!("Failed to copy to {}", output.display()))?,
    };
    info!(output = %output.display(), bytes = copied, "resource copied");
    Ok(())
}

fn print_list(names: &[String], json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(names)?);
    } else {
        for name in names {
            println!("{}", name);
        }
    }
    Ok(())
}

fn print_progress(file: &str, progress: f64) {
    eprint!("\r{}: {:>3}%", file, (progress * 100.0).round() as u32);
}
