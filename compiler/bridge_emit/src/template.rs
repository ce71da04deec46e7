//! Splicing generated text into a template.
//!
//! The template carries one marker region:
//!
//! ```text
//! //!!!{{MethodBridge
//! ...replaced...
//! //!!!}}MethodBridge
//! ```
//!
//! Both marker lines are kept; everything between them is replaced. The
//! result is written to a temporary file next to the destination and renamed
//! over it, so a failed run never leaves a half-written file behind.

use std::io::Write;
use std::path::Path;

use tempfile::NamedTempFile;

use crate::TemplateError;

/// Marker name used when none is configured.
pub const DEFAULT_MARKER: &str = "MethodBridge";

/// Begin and end marker lines for `marker`.
pub fn marker_tags(marker: &str) -> (String, String) {
    (["//!!!{{", marker].concat(), ["//!!!}}", marker].concat())
}

/// Replace the contents of `marker`'s region in `template` with `block`.
pub fn splice(template: &str, marker: &str, block: &str) -> Result<String, TemplateError> {
    let (begin_tag, end_tag) = marker_tags(marker);

    // Byte offset just past the begin line, and of the start of the end line.
    let mut begin = None;
    let mut end = None;
    let mut offset = 0;
    for line in template.split_inclusive('\n') {
        let content = line.trim();
        if content == begin_tag {
            if begin.replace(offset + line.len()).is_some() {
                return Err(TemplateError::DuplicateMarker { tag: begin_tag });
            }
        } else if content == end_tag && end.replace(offset).is_some() {
            return Err(TemplateError::DuplicateMarker { tag: end_tag });
        }
        offset += line.len();
    }

    let begin = begin.ok_or(TemplateError::MissingMarker { tag: begin_tag })?;
    let end = end.ok_or(TemplateError::MissingMarker { tag: end_tag })?;
    if end < begin {
        return Err(TemplateError::MarkersOutOfOrder {
            marker: marker.to_owned(),
        });
    }

    let mut spliced = String::with_capacity(template.len() - (end - begin) + block.len() + 1);
    spliced.push_str(&template[..begin]);
    spliced.push_str(block);
    if !block.is_empty() && !block.ends_with('\n') {
        spliced.push('\n');
    }
    spliced.push_str(&template[end..]);
    Ok(spliced)
}

/// Write `contents` to `path` through a temporary file in the same directory.
pub fn write_atomic(path: &Path, contents: &str) -> Result<(), TemplateError> {
    let write_err = |source| TemplateError::Write {
        path: path.to_path_buf(),
        source,
    };

    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("."));
    let mut tmp = NamedTempFile::new_in(dir).map_err(write_err)?;
    tmp.write_all(contents.as_bytes()).map_err(write_err)?;
    // The temp file starts out owner-only; keep whatever mode the target had.
    if let Ok(existing) = std::fs::metadata(path) {
        tmp.as_file()
            .set_permissions(existing.permissions())
            .map_err(write_err)?;
    }
    tmp.as_file().sync_all().map_err(write_err)?;
    tmp.persist(path).map_err(|e| write_err(e.error))?;

    tracing::debug!(path = %path.display(), bytes = contents.len(), "wrote output");
    Ok(())
}

/// Read `template`, splice `block` into its `marker` region and write the
/// result to `output`. `output` may be the template itself.
pub fn splice_file(
    template: &Path,
    output: &Path,
    marker: &str,
    block: &str,
) -> Result<(), TemplateError> {
    let text = std::fs::read_to_string(template).map_err(|source| TemplateError::Read {
        path: template.to_path_buf(),
        source,
    })?;
    let spliced = splice(&text, marker, block)?;
    write_atomic(output, &spliced)
}
