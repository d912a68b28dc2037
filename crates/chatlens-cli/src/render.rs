//! Human-readable rendering of archive contents.

use chatlens_core::{
    classify_blob, decode_envelope, emit_blob_classified, extract_blob_text, Blob, BlobId,
    BlobKind, ChatMessage, ClassifiedBlob, Envelope, ENVELOPE_KEY,
};
use chatlens_store::MetaEntry;
use serde_json::{Map, Value};

const MAX_PREVIEW_CHARS: usize = 800;
const MAX_FRAGMENT_CHARS: usize = 400;
const ROOT_HEX_BYTES: usize = 100;
const ROOT_TEXT_CHARS: usize = 80;
pub const DEFAULT_DUMP_WIDTH: usize = 76;

const GUTTER: &str = "  │ ";
const EXPAND_INDENT: &str = "  │     ";

const ANSI_RESET: &str = "\x1b[0m";

/// Rendering switches for `dump`.
#[derive(Debug, Clone)]
pub struct DumpOptions {
    /// Colorize message roles.
    pub color: bool,
    /// Append a printable-ASCII dump after binary blobs.
    pub byte_dump: bool,
    /// Bytes per byte-dump line.
    pub dump_width: usize,
}

impl Default for DumpOptions {
    fn default() -> Self {
        Self {
            color: false,
            byte_dump: false,
            dump_width: DEFAULT_DUMP_WIDTH,
        }
    }
}

fn role_color(role: &str) -> &'static str {
    match role {
        "user" => "\x1b[36m",
        "assistant" => "\x1b[32m",
        "system" => "\x1b[90m",
        _ => "\x1b[33m",
    }
}

/// Truncate to `max` characters, marking the cut with `...`.
pub fn truncate_chars(s: &str, max: usize) -> String {
    match s.char_indices().nth(max) {
        Some((idx, _)) => format!("{}...", &s[..idx]),
        None => s.to_string(),
    }
}

/// One line per `meta` row; the envelope row is decoded.
pub fn render_meta_entry(entry: &MetaEntry) -> String {
    if entry.key != ENVELOPE_KEY {
        return format!("[meta key={} value_len={}]", entry.key, entry.value.len());
    }
    match decode_envelope(&entry.value) {
        Ok(envelope) => render_envelope_line(&envelope),
        Err(err) => format!("[meta key={} decode error: {err}]", entry.key),
    }
}

pub fn render_envelope_line(envelope: &Envelope) -> String {
    let created = envelope
        .created_at_utc()
        .map(|t| t.to_rfc3339())
        .unwrap_or_else(|| "-".to_string());
    format!(
        "meta: name={:?} agentId={} createdAt={} mode={} lastUsedModel={}",
        envelope.name.as_deref().unwrap_or(""),
        envelope.agent_id,
        created,
        envelope.mode.as_deref().unwrap_or("-"),
        envelope.last_used_model.as_deref().unwrap_or("-"),
    )
}

/// Render one blob according to its classification.
pub fn render_blob(blob: &Blob, opts: &DumpOptions) -> Vec<String> {
    if blob.is_empty() {
        return vec![format!("[blob id={} len=0]", blob.id)];
    }
    let classified = classify_blob(&blob.data);
    emit_blob_classified(&blob.id, classified.kind(), blob.len());
    match classified {
        // nothing displayable in `content`: show the whole record instead
        ClassifiedBlob::Conversational(msg) if msg.content_text().trim().is_empty() => {
            render_other_json(blob, &msg.object)
        }
        ClassifiedBlob::Conversational(msg) => render_message(&msg, opts),
        ClassifiedBlob::OtherJson(object) => render_other_json(blob, &object),
        ClassifiedBlob::Binary => render_binary(blob, opts),
    }
}

fn render_message(msg: &ChatMessage, opts: &DumpOptions) -> Vec<String> {
    let role = msg.role();
    let text = msg.content_text();
    let preview = truncate_chars(&text, MAX_PREVIEW_CHARS);
    let label = if opts.color {
        format!("{}{role}{ANSI_RESET}", role_color(&role))
    } else {
        role
    };

    let mut out = vec![format!("{label}: {}", preview.trim())];
    if text.contains('\n') {
        out.push(format!(
            "  ── full message ({} lines) ──",
            text.split('\n').count()
        ));
        out.extend(expand_lines(&text));
    }
    out
}

fn render_other_json(blob: &Blob, object: &Map<String, Value>) -> Vec<String> {
    let value = Value::Object(object.clone());
    let pretty = serde_json::to_string_pretty(&value).unwrap_or_else(|_| value.to_string());

    let mut out = vec![format!("[blob id={} len={}] (JSON)", blob.id, blob.len())];
    out.extend(pretty.lines().map(|line| format!("{GUTTER}{line}")));

    let mut blocks = Vec::new();
    collect_multiline_strings(&value, "", &mut blocks);
    for (path, s) in blocks {
        out.push(format!("  ── {path} ({} lines) ──", s.split('\n').count()));
        out.extend(expand_lines(s));
    }
    out
}

fn render_binary(blob: &Blob, opts: &DumpOptions) -> Vec<String> {
    let fragments: Vec<_> = extract_blob_text(blob).collect();
    let mut out = Vec::with_capacity(fragments.len() + 2);
    if fragments.is_empty() {
        out.push(format!(
            "[binary blob id={} len={}] (no text recovered)",
            blob.id,
            blob.len()
        ));
    } else {
        out.push(format!(
            "[binary blob id={} len={}] ({} text fragments)",
            blob.id,
            blob.len(),
            fragments.len()
        ));
        out.extend(
            fragments
                .iter()
                .map(|f| format!("{GUTTER}{}", truncate_chars(&f.text, MAX_FRAGMENT_CHARS))),
        );
    }
    if opts.byte_dump {
        out.extend(byte_dump(&blob.data, opts.dump_width));
    }
    out
}

/// Summary of the blob named by the envelope's `latestRootBlobId`.
pub fn render_root_blob(id: &BlobId, blob: Option<&Blob>) -> Vec<String> {
    let Some(blob) = blob else {
        return vec![format!("root blob: id={id} (not in blobs table)")];
    };
    let classified = classify_blob(&blob.data);
    let mut out = vec![format!(
        "root blob: id={id} len={} kind={}",
        blob.len(),
        classified.kind()
    )];
    let head = &blob.data[..blob.len().min(ROOT_HEX_BYTES)];
    out.push(format!("{GUTTER}hex: {}", hex::encode(head)));
    let text: String = String::from_utf8_lossy(&blob.data)
        .chars()
        .map(|c| if c.is_control() { '.' } else { c })
        .collect();
    out.push(format!("{GUTTER}utf-8: {}", truncate_chars(&text, ROOT_TEXT_CHARS)));
    if classified.kind() == BlobKind::Binary {
        out.extend(extract_blob_text(blob).map(|f| {
            format!(
                "{GUTTER}@{} {}",
                f.offset,
                truncate_chars(&f.text, MAX_FRAGMENT_CHARS)
            )
        }));
    }
    out
}

fn expand_lines(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split('\n').map(|line| format!("{EXPAND_INDENT}{line}"))
}

/// Walk `value`, collecting every string that spans several lines together
/// with its path (`a.b[2].c`).
fn collect_multiline_strings<'a>(value: &'a Value, path: &str, out: &mut Vec<(String, &'a str)>) {
    match value {
        Value::Object(map) => {
            for (key, child) in map {
                let child_path = if path.is_empty() {
                    key.clone()
                } else {
                    format!("{path}.{key}")
                };
                collect_multiline_strings(child, &child_path, out);
            }
        }
        Value::Array(items) => {
            for (i, child) in items.iter().enumerate() {
                collect_multiline_strings(child, &format!("{path}[{i}]"), out);
            }
        }
        Value::String(s) if s.contains('\n') => out.push((path.to_string(), s.as_str())),
        _ => {}
    }
}

/// Printable US-ASCII bytes as themselves, everything else as `.`,
/// prefixed with the hex offset of the line.
pub fn byte_dump(data: &[u8], width: usize) -> Vec<String> {
    if data.is_empty() {
        return vec![format!("{GUTTER}(empty)")];
    }
    let width = width.max(1);
    data.chunks(width)
        .enumerate()
        .map(|(i, row)| {
            let printable: String = row
                .iter()
                .map(|&b| if (0x20..=0x7e).contains(&b) { b as char } else { '.' })
                .collect();
            format!("{GUTTER}{:04x} {printable}", i * width)
        })
        .collect()
}
