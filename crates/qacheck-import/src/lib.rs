//! Readers that turn files into segments, pairs and glossaries.
//!
//! Format is chosen by file extension. Anything the readers do not understand
//! fails with [`QaError::UnsupportedFormat`] so callers can tell it apart
//! from I/O or parse failures.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use color_eyre::eyre::WrapErr;
use qacheck_core::{Glossary, QaError, Result, SegmentList, SegmentPair, Side};

mod glossary;
mod json;
mod office;
mod pdf;
mod po;
mod sheet;
mod table;

pub use po::{read_po_entries, PoEntry};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFormat {
    Csv,
    Tsv,
    Text,
    Json,
    Po,
    Xlsx,
    Docx,
    Pptx,
    Pdf,
}

impl InputFormat {
    pub fn from_path(path: &Path) -> std::result::Result<Self, QaError> {
        let ext = extension_of(path);
        match ext.as_str() {
            "csv" => Ok(InputFormat::Csv),
            "tsv" | "tab" => Ok(InputFormat::Tsv),
            "txt" => Ok(InputFormat::Text),
            "json" => Ok(InputFormat::Json),
            "po" | "pot" => Ok(InputFormat::Po),
            "xlsx" | "xlsm" => Ok(InputFormat::Xlsx),
            "docx" => Ok(InputFormat::Docx),
            "pptx" => Ok(InputFormat::Pptx),
            "pdf" => Ok(InputFormat::Pdf),
            _ => Err(QaError::UnsupportedFormat {
                path: path.to_path_buf(),
                extension: ext,
            }),
        }
    }

    /// Formats that can hold both sides in one file.
    pub fn is_bilingual(self) -> bool {
        matches!(
            self,
            InputFormat::Csv | InputFormat::Tsv | InputFormat::Json | InputFormat::Po | InputFormat::Xlsx
        )
    }

    /// PDF text is extracted for reading only; it never serves as a target.
    pub fn is_source_only(self) -> bool {
        self == InputFormat::Pdf
    }
}

fn extension_of(path: &Path) -> String {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default()
}

fn read_text(path: &Path) -> Result<String> {
    let raw = std::fs::read_to_string(path)
        .wrap_err_with(|| format!("failed to read {}", path.display()))?;
    Ok(match raw.strip_prefix('\u{feff}') {
        Some(s) => s.to_string(),
        None => raw,
    })
}

fn open(path: &Path) -> Result<BufReader<File>> {
    let file = File::open(path).wrap_err_with(|| format!("failed to open {}", path.display()))?;
    Ok(BufReader::new(file))
}

/// Read one side of a document.
pub fn read_segments(path: &Path, side: Side) -> Result<SegmentList> {
    let format = InputFormat::from_path(path)?;
    if side == Side::Target && format.is_source_only() {
        return Err(QaError::SourceOnlyFormat {
            path: path.to_path_buf(),
            extension: extension_of(path),
        }
        .into());
    }
    let list = match format {
        InputFormat::Csv => table::Rows::from_delimited(&read_text(path)?, b',')
            .map(|t| table::segments(&t, side)),
        InputFormat::Tsv => table::Rows::from_delimited(&read_text(path)?, b'\t')
            .map(|t| table::segments(&t, side)),
        InputFormat::Text => {
            let content = read_text(path)?;
            Ok(SegmentList::positional(
                content.lines().filter(|l| !l.trim().is_empty()),
            ))
        }
        InputFormat::Json => json::segments(&read_text(path)?, side),
        InputFormat::Po => po::parse_entries(&read_text(path)?).map(|e| po::segments(&e, side)),
        InputFormat::Xlsx => sheet::first_sheet(path).map(|t| table::segments(&t, side)),
        InputFormat::Docx => office::docx_paragraphs(open(path)?).map(SegmentList::positional),
        InputFormat::Pptx => office::pptx_shape_texts(open(path)?).map(SegmentList::positional),
        InputFormat::Pdf => pdf::pages(path).map(SegmentList::positional),
    }
    .wrap_err_with(|| format!("failed to parse {}", path.display()))?;
    tracing::debug!(
        event = "segments_read",
        path = %path.display(),
        side = side.column(),
        count = list.len(),
        identified = list.identified
    );
    Ok(list)
}

/// Read a file that already holds source and target side by side.
pub fn read_pairs(path: &Path) -> Result<Vec<SegmentPair>> {
    let format = InputFormat::from_path(path)?;
    let pairs = match format {
        InputFormat::Csv => table::Rows::from_delimited(&read_text(path)?, b',')
            .and_then(|t| table::pairs(&t)),
        InputFormat::Tsv => table::Rows::from_delimited(&read_text(path)?, b'\t')
            .and_then(|t| table::pairs(&t)),
        InputFormat::Json => json::pairs(&read_text(path)?),
        InputFormat::Po => po::parse_entries(&read_text(path)?).map(po::pairs),
        InputFormat::Xlsx => sheet::first_sheet(path).and_then(|t| table::pairs(&t)),
        InputFormat::Text | InputFormat::Docx | InputFormat::Pptx | InputFormat::Pdf => {
            return Err(QaError::UnsupportedFormat {
                path: path.to_path_buf(),
                extension: extension_of(path),
            }
            .into())
        }
    }
    .wrap_err_with(|| format!("failed to parse {}", path.display()))?;
    tracing::debug!(event = "pairs_read", path = %path.display(), count = pairs.len());
    Ok(pairs)
}

/// Read a two-column term table (`source`, `target`).
pub fn read_glossary(path: &Path) -> Result<Glossary> {
    let content = read_text(path)?;
    let g = glossary::parse(&content)
        .wrap_err_with(|| format!("failed to parse glossary {}", path.display()))?;
    tracing::debug!(event = "glossary_read", path = %path.display(), terms = g.len());
    Ok(g)
}
