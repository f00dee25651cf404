//! Tab-separated worksheet handed to translators.
//!
//! Columns are `<Format> path` and `<Format> name` for each format, then
//! `English`, `Translation` and `Comment`. A field holding a newline, tab or
//! double quote is wrapped in double quotes as-is. Embedded quotes are not
//! escaped, so such fields do not survive a strict TSV reader unchanged.

use std::path::{Path, PathBuf};

use crate::{
    error::Error,
    formats::FileFormat,
    fsutil::write_atomic,
    packet::Packet,
};

pub const ENGLISH_HEADER: &str = "English";
pub const TRANSLATION_HEADER: &str = "Translation";
pub const COMMENT_HEADER: &str = "Comment";

/// The header cells, in column order.
pub fn header() -> Vec<String> {
    let mut cells = Vec::with_capacity(FileFormat::ALL.len() * 2 + 3);
    for format in FileFormat::ALL {
        cells.push(format!("{format} path"));
        cells.push(format!("{format} name"));
    }
    cells.push(ENGLISH_HEADER.to_string());
    cells.push(TRANSLATION_HEADER.to_string());
    cells.push(COMMENT_HEADER.to_string());
    cells
}

fn wrap(field: &str) -> String {
    if field.contains(['\n', '\t', '"']) {
        format!("\"{field}\"")
    } else {
        field.to_string()
    }
}

fn push_line(out: &mut String, fields: &[String]) {
    out.push_str(&fields.join("\t"));
    out.push('\n');
}

/// Renders `packet` as worksheet text.
pub fn serialize(packet: &Packet) -> String {
    let mut out = String::new();
    push_line(&mut out, &header());

    for row in packet.rows() {
        let mut fields = Vec::with_capacity(FileFormat::ALL.len() * 2 + 3);
        for format in FileFormat::ALL {
            let key = row.keys.get(&format);
            fields.push(wrap(key.map(|k| k.path.as_str()).unwrap_or_default()));
            fields.push(wrap(key.map(|k| k.name.as_str()).unwrap_or_default()));
        }
        fields.push(wrap(&row.english));
        fields.push(wrap(row.translation.as_deref().unwrap_or_default()));
        fields.push(wrap(row.comment.as_deref().unwrap_or_default()));
        push_line(&mut out, &fields);
    }
    out
}

impl Packet {
    pub fn to_tsv(&self) -> String {
        serialize(self)
    }
}

/// Writes the worksheet to `<base>/<file_name>` and returns its path.
pub fn write_worksheet<P: AsRef<Path>>(
    base: P,
    packet: &Packet,
    file_name: &str,
) -> Result<PathBuf, Error> {
    let path = base.as_ref().join(file_name);
    write_atomic(&path, serialize(packet).as_bytes())
        .map_err(|e| e.in_file(path.display().to_string()))?;
    tracing::info!(path = %path.display(), rows = packet.len(), "wrote worksheet");
    Ok(path)
}
