use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use ebml_seek::metadata::{Metadata, MetadataConfig};
use ebml_seek::source::FileSource;
use serde_json::{json, Map, Value};

const DEFAULT_ELEMENTS: [&str; 7] = ["Info", "Tracks", "Chapters", "Cluster", "Cues", "Attachments", "Tags"];

#[derive(Parser)]
#[command(name = "ebml-seek")]
#[command(author, version, about = "Print the metadata of a Matroska/WebM file using its SeekHead index")]
struct Cli {
    /// Matroska or WebM file to read
    #[arg(required = true)]
    file: PathBuf,

    /// Seek table entry to print (repeatable, defaults to all the usual top-level elements)
    #[arg(short, long = "element")]
    elements: Vec<String>,

    /// Stop scanning for an element after this many bytes
    #[arg(long)]
    max_scan_bytes: Option<u64>,

    /// Increase logging (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

async fn dump(cli: &Cli) -> Result<Value> {
    let mut config = MetadataConfig::default();
    if let Some(max) = cli.max_scan_bytes {
        config = config.with_max_scan_bytes(max);
    }
    let mut metadata = Metadata::with_config(FileSource::new(&cli.file), config);
    let mut output = Map::new();

    let segment = metadata.get_segment().await.context("Couldn't read Segment")?;
    output.insert(String::from("Segment"), json!({
        "position": segment.absolute_start,
        "content_start": segment.content_start(),
    }));

    let seek_table = metadata.get_seek_head().await.context("Couldn't read SeekHead")?;
    output.insert(String::from("SeekHead"), serde_json::to_value(seek_table)?);

    let elements: Vec<&str> = if cli.elements.is_empty() {
        DEFAULT_ELEMENTS.to_vec()
    } else {
        cli.elements.iter().map(String::as_str).collect()
    };

    for name in elements {
        let element = metadata.read_seeked_tag(name, name != "Info").await
            .with_context(|| format!("Couldn't read {}", name))?;
        output.insert(name.to_string(), serde_json::to_value(&element)?);
    }

    Ok(Value::Object(output))
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // RUST_LOG wins over -v
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| {
        match cli.verbose {
            0 => "warn",
            1 => "ebml_seek=debug",
            _ => "ebml_seek=trace",
        }.to_string()
    });

    tracing_subscriber::fmt()
        .with_env_filter(&env_filter)
        .with_writer(std::io::stderr)
        .init();

    if !cli.file.exists() {
        anyhow::bail!("Input file does not exist: {:?}", cli.file);
    }

    let output = futures::executor::block_on(dump(&cli))?;
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
