//! chatlens - read-only inspector for local chat-archive stores
//!
//! ## Commands
//!
//! - `dump`: every archive, oldest first, with decoded meta and rendered blobs
//! - `index`: chronological listing of archives
//! - `stats`: blob counts per classification for one archive
//! - `extract`: text recovered from the binary blobs of one archive
//! - `meta`: decoded metadata envelope of one archive
//! - `decode`: decode an envelope given as a hex string

mod index;
mod render;

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use chatlens_core::{
    classify, decode_envelope, emit_archive_failed, emit_archive_opened, extract_blob_text,
    ArchiveSpan, BlobKind, ChronoEntry,
};
use chatlens_store::{ArchiveStore, FsArchiveCatalog, SqliteArchiveStore};
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use tracing::{info, Level};

use crate::render::{
    render_blob, render_meta_entry, render_root_blob, DumpOptions, DEFAULT_DUMP_WIDTH,
};

#[derive(Parser)]
#[command(name = "chatlens")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Read-only inspector for local chat-archive stores", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit JSON-formatted log lines
    #[arg(long, global = true)]
    json: bool,

    /// Write report output to a file instead of stdout
    #[arg(short, long, global = true)]
    output: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Dump every archive in chronological order
    Dump {
        /// Directory containing archive *.db files (default: $HOME/.cursor/chats)
        #[arg(long, env = "CHATLENS_CHATS_DIR")]
        chats_dir: Option<PathBuf>,

        /// Colorize message roles
        #[arg(long)]
        color: bool,

        /// Append a printable-ASCII byte dump after each binary blob
        #[arg(long)]
        byte_dump: bool,

        /// Bytes per byte-dump line
        #[arg(long, env = "CHATLENS_DUMP_WIDTH", default_value_t = DEFAULT_DUMP_WIDTH)]
        dump_width: usize,
    },

    /// List archives oldest first with timestamp provenance
    Index {
        /// Directory containing archive *.db files (default: $HOME/.cursor/chats)
        #[arg(long, env = "CHATLENS_CHATS_DIR")]
        chats_dir: Option<PathBuf>,

        #[arg(short, long, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Count blobs per classification in one archive
    Stats {
        /// Path to the archive (*.db)
        archive: PathBuf,

        #[arg(short, long, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Print text recovered from the binary blobs of one archive
    Extract {
        /// Path to the archive (*.db)
        archive: PathBuf,

        #[arg(short, long, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Print the decoded metadata envelope of one archive
    Meta {
        /// Path to the archive (*.db)
        archive: PathBuf,
    },

    /// Decode a hex-encoded envelope
    Decode {
        /// Hex string as stored in the meta table
        hex: String,
    },
}

#[derive(Debug, Default, Serialize)]
struct BlobStats {
    conversational_json: usize,
    other_json: usize,
    binary: usize,
    total_bytes: usize,
}

impl BlobStats {
    fn record(&mut self, kind: BlobKind, len: usize) {
        match kind {
            BlobKind::ConversationalJson => self.conversational_json += 1,
            BlobKind::OtherJson => self.other_json += 1,
            BlobKind::Binary => self.binary += 1,
        }
        self.total_bytes += len;
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    chatlens_core::init_tracing(cli.json, level);

    let mut out = open_output(cli.output.as_deref())?;

    match cli.command {
        Commands::Dump {
            chats_dir,
            color,
            byte_dump,
            dump_width,
        } => {
            let opts = DumpOptions {
                color,
                byte_dump,
                dump_width,
            };
            cmd_dump(&mut out, &resolve_chats_dir(chats_dir), &opts).await?;
        }
        Commands::Index { chats_dir, format } => {
            cmd_index(&mut out, &resolve_chats_dir(chats_dir), format).await?;
        }
        Commands::Stats { archive, format } => cmd_stats(&mut out, &archive, format)?,
        Commands::Extract { archive, format } => cmd_extract(&mut out, &archive, format)?,
        Commands::Meta { archive } => cmd_meta(&mut out, &archive)?,
        Commands::Decode { hex } => {
            let envelope = decode_envelope(&hex).context("failed to decode envelope")?;
            writeln!(out, "{}", serde_json::to_string_pretty(&envelope)?)?;
        }
    }

    out.flush()?;
    Ok(())
}

fn open_output(path: Option<&Path>) -> Result<Box<dyn Write>> {
    match path {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("failed to create output file {}", path.display()))?;
            Ok(Box::new(BufWriter::new(file)))
        }
        None => Ok(Box::new(BufWriter::new(io::stdout().lock()))),
    }
}

fn resolve_chats_dir(flag: Option<PathBuf>) -> PathBuf {
    flag.unwrap_or_else(|| {
        let home = std::env::var_os("HOME").unwrap_or_else(|| ".".into());
        PathBuf::from(home).join(".cursor").join("chats")
    })
}

fn open_archive(path: &Path) -> Result<SqliteArchiveStore> {
    SqliteArchiveStore::open_read_only(path)
        .with_context(|| format!("failed to open archive {}", path.display()))
}

async fn cmd_dump(out: &mut dyn Write, chats_dir: &Path, opts: &DumpOptions) -> Result<()> {
    let entries = index::build_index(&FsArchiveCatalog::new(chats_dir)).await?;
    info!(chats_dir = %chats_dir.display(), archives = entries.len(), "dumping archives");

    for entry in &entries {
        let _span = ArchiveSpan::enter(&entry.location);
        writeln!(out, "=== {} ===", entry.location)?;
        if let Err(err) = dump_archive(out, entry, opts) {
            emit_archive_failed(&entry.location, &format!("{err:#}"));
            writeln!(out, "[error: {err:#}]")?;
        }
    }
    Ok(())
}

fn dump_archive(out: &mut dyn Write, entry: &ChronoEntry, opts: &DumpOptions) -> Result<()> {
    let store = open_archive(Path::new(&entry.location))?;

    for meta in store.metadata_entries().context("failed to read meta table")? {
        writeln!(out, "{}", render_meta_entry(&meta))?;
    }

    let blobs = store.list_blobs().context("failed to read blobs table")?;
    emit_archive_opened(&entry.location, blobs.len());
    let root_id = entry
        .envelope
        .as_ref()
        .and_then(|e| e.latest_root_blob_id.as_ref());
    for blob in &blobs {
        if root_id == Some(&blob.id) {
            writeln!(out, "[root blob]")?;
        }
        for line in render_blob(blob, opts) {
            writeln!(out, "{line}")?;
        }
    }
    Ok(())
}

async fn cmd_index(out: &mut dyn Write, chats_dir: &Path, format: OutputFormat) -> Result<()> {
    let entries = index::build_index(&FsArchiveCatalog::new(chats_dir)).await?;
    match format {
        OutputFormat::Json => writeln!(out, "{}", serde_json::to_string_pretty(&entries)?)?,
        OutputFormat::Text => {
            for entry in &entries {
                let when = chrono_label(entry.timestamp);
                writeln!(
                    out,
                    "{when}  {:<19}  {:<30}  {}",
                    entry.provenance.to_string(),
                    format!("{:?}", entry.name().unwrap_or("")),
                    entry.location
                )?;
            }
        }
    }
    Ok(())
}

fn chrono_label(timestamp: i64) -> String {
    chrono::DateTime::from_timestamp(timestamp, 0)
        .map(|t| t.to_rfc3339())
        .unwrap_or_else(|| timestamp.to_string())
}

fn cmd_stats(out: &mut dyn Write, archive: &Path, format: OutputFormat) -> Result<()> {
    let store = open_archive(archive)?;
    let mut stats = BlobStats::default();
    for blob in store.list_blobs()? {
        stats.record(classify(&blob.data), blob.len());
    }
    match format {
        OutputFormat::Json => writeln!(out, "{}", serde_json::to_string_pretty(&stats)?)?,
        OutputFormat::Text => {
            writeln!(out, "{}: {}", BlobKind::ConversationalJson, stats.conversational_json)?;
            writeln!(out, "{}: {}", BlobKind::OtherJson, stats.other_json)?;
            writeln!(out, "{}: {}", BlobKind::Binary, stats.binary)?;
            writeln!(out, "total bytes: {}", stats.total_bytes)?;
        }
    }
    Ok(())
}

fn cmd_extract(out: &mut dyn Write, archive: &Path, format: OutputFormat) -> Result<()> {
    let store = open_archive(archive)?;
    for blob in store.list_blobs()? {
        if classify(&blob.data) != BlobKind::Binary {
            continue;
        }
        for fragment in extract_blob_text(&blob) {
            match format {
                OutputFormat::Json => writeln!(out, "{}", serde_json::to_string(&fragment)?)?,
                OutputFormat::Text => writeln!(
                    out,
                    "{} @{:<6} {}",
                    blob.id.short(),
                    fragment.offset,
                    fragment.text
                )?,
            }
        }
    }
    Ok(())
}

fn cmd_meta(out: &mut dyn Write, archive: &Path) -> Result<()> {
    let store = open_archive(archive)?;
    let Some(hex_value) = store.envelope_hex()? else {
        bail!("archive {} has no metadata envelope", archive.display());
    };
    let envelope = decode_envelope(&hex_value)
        .with_context(|| format!("failed to decode envelope of {}", archive.display()))?;
    writeln!(out, "{}", serde_json::to_string_pretty(&envelope)?)?;

    if let Some(root_id) = &envelope.latest_root_blob_id {
        let root = store
            .get_blob(root_id)
            .with_context(|| format!("failed to read root blob {root_id}"))?;
        for line in render_root_blob(root_id, root.as_ref()) {
            writeln!(out, "{line}")?;
        }
    }
    Ok(())
}
