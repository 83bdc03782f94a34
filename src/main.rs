mod cli;

use shadowtake::{config, find_newest_take, take_path, Take, TakeFiles};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::Parser;
use cli::{Cli, Commands};
use serde::Serialize;
use shadowtake_stream::{NodeDescriptor, StreamHeader};
use std::path::{Path, PathBuf};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    // Respect RUST_LOG env var if set, otherwise use defaults based on verbose flag
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| {
        if cli.verbose {
            "shadowtake=trace,shadowtake_stream=trace".to_string()
        } else {
            "shadowtake=warn,shadowtake_stream=warn".to_string()
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(&env_filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Newest { root } => {
            let config = config::load_config_or_default(cli.config.as_deref())?;
            let root = root.unwrap_or(config.takes.root);
            newest(&root)
        }
        Commands::Info { take, json } => {
            let config = config::load_config_or_default(cli.config.as_deref())?;
            let take = open_take(&take, &config)?;
            info(&take, json)
        }
        Commands::Channels { take, json } => {
            let config = config::load_config_or_default(cli.config.as_deref())?;
            let take = open_take(&take, &config)?;
            channels(&take, json)
        }
        Commands::Dump {
            take,
            node,
            channel,
            start,
            count,
        } => {
            let config = config::load_config_or_default(cli.config.as_deref())?;
            let take = open_take(&take, &config)?;
            dump(&take, &node, &channel, start, count, config.output.precision)
        }
        Commands::Validate { file } => {
            let path = file.or(cli.config);
            validate_config(path.as_deref())
        }
        Commands::Version => {
            println!("shadowtake {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}

/// Resolve a take argument: "newest", an existing folder, or a take name
/// under the configured root.
fn resolve_take(arg: &str, config: &config::Config) -> Result<PathBuf> {
    if arg == "newest" {
        return Ok(find_newest_take(&config.takes.root)?);
    }

    let direct = PathBuf::from(arg);
    if direct.is_dir() {
        return Ok(direct);
    }

    let named = take_path(&config.takes.root, arg);
    if named.is_dir() {
        return Ok(named);
    }

    anyhow::bail!("Take does not exist: {:?}", arg)
}

fn open_take(arg: &str, config: &config::Config) -> Result<Take> {
    let dir = resolve_take(arg, config)?;
    let files = TakeFiles::with_names(
        &dir,
        &config.takes.stream_file,
        &config.takes.definition_file,
    );
    Take::open_files(&files).with_context(|| format!("Failed to open take {:?}", dir))
}

fn newest(root: &Path) -> Result<()> {
    let take = find_newest_take(root)?;
    println!("{}", take.display());
    Ok(())
}

#[derive(Serialize)]
struct InfoReport<'a> {
    dir: &'a Path,
    header: &'a StreamHeader,
    frame_count: usize,
    channel_count: usize,
    frame_rate: Option<f64>,
    duration_secs: Option<f64>,
    recorded_at: Option<DateTime<Utc>>,
    nodes: &'a [NodeDescriptor],
    mapped_channels: usize,
}

fn info(take: &Take, json: bool) -> Result<()> {
    let header = take.header();
    let frames = take.frames();

    if json {
        let report = InfoReport {
            dir: take.dir(),
            header,
            frame_count: frames.frame_count(),
            channel_count: frames.channel_count(),
            frame_rate: header.frame_rate(),
            duration_secs: take.duration().map(|d| d.as_secs_f64()),
            recorded_at: header.recorded_at(),
            nodes: take.nodes(),
            mapped_channels: take.node_map().len(),
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("Take: {}", take.dir().display());
    println!("Version: {}", header.version);
    println!("UUID: {}", header.uuid);
    if let Some(recorded) = header.recorded_at() {
        println!("Recorded: {}", recorded.format("%Y-%m-%d %H:%M:%S%.6f UTC"));
    }
    match header.declared_frame_count() {
        Some(_) => println!("Frames: {}", frames.frame_count()),
        None => println!("Frames: {} (derived from data length)", frames.frame_count()),
    }
    if let Some(rate) = header.frame_rate() {
        println!("Frame rate: {:.3} fps", rate);
    }
    if let Some(duration) = take.duration() {
        let millis = duration.as_millis();
        let secs = millis / 1000;
        println!(
            "Duration: {:02}:{:02}:{:02}.{:03}",
            secs / 3600,
            (secs / 60) % 60,
            secs % 60,
            millis % 1000
        );
    }
    println!("Channels: {}", frames.channel_count());

    println!("\nNodes: {}", take.nodes().len());
    for (i, node) in take.nodes().iter().enumerate() {
        let columns = node.columns();
        let name = if node.is_named() { node.name.as_str() } else { "(unnamed)" };
        let key = node.key.map(|k| format!(" key {}", k)).unwrap_or_default();
        println!(
            "  [{}] {}{} ({} channels, columns {}..{})",
            i,
            name,
            key,
            node.channel_count(),
            columns.start,
            columns.end
        );
        let groups: Vec<String> = node
            .groups()
            .into_iter()
            .map(|(group, range)| format!("{} {}..{}", group, range.start, range.end))
            .collect();
        if !groups.is_empty() {
            println!("      {}", groups.join(", "));
        }
    }

    println!("\nMapped channels: {}", take.node_map().len());
    Ok(())
}

fn channels(take: &Take, json: bool) -> Result<()> {
    let map = take.node_map();

    if json {
        println!("{}", serde_json::to_string_pretty(map)?);
        return Ok(());
    }

    if map.is_empty() {
        println!("No named channels (take definition lists no channels present in the stream)");
        return Ok(());
    }

    for entry in map {
        println!("{}.{}\t{}", entry.node, entry.channel, entry.column);
    }
    Ok(())
}

fn dump(
    take: &Take,
    node: &str,
    channel: &str,
    start: usize,
    count: Option<usize>,
    precision: usize,
) -> Result<()> {
    let column = take.column(node, channel).with_context(|| {
        format!(
            "Channel {}.{} is not in the take's node map",
            node, channel
        )
    })?;

    let frames = take.frames();
    let end = match count {
        Some(count) => start.saturating_add(count).min(frames.frame_count()),
        None => frames.frame_count(),
    };

    for index in start..end {
        if let Some(value) = frames.get(index, column) {
            println!("{}\t{:.*}", index, precision, value);
        }
    }
    Ok(())
}

fn validate_config(path: Option<&Path>) -> Result<()> {
    match path {
        Some(p) => {
            println!("Validating config: {:?}", p);
            let config = config::load_config(p)?;
            println!("✓ Configuration is valid");
            println!("  Take root: {}", config.takes.root.display());
            println!("  Stream file: {}", config.takes.stream_file);
            println!("  Definition file: {}", config.takes.definition_file);
            println!("  Output precision: {}", config.output.precision);
        }
        None => {
            println!("No config file specified, using defaults");
            let config = config::Config::default();
            println!("Default config:");
            println!("  Take root: {}", config.takes.root.display());
        }
    }

    Ok(())
}
