//! PDF text, one segment per page that has any.

use std::path::Path;

use color_eyre::eyre::WrapErr;
use qacheck_core::Result;

pub(crate) fn pages(path: &Path) -> Result<Vec<String>> {
    let doc = lopdf::Document::load(path)?;
    let mut out = Vec::new();
    for number in doc.get_pages().into_keys() {
        let text = doc
            .extract_text(&[number])
            .wrap_err_with(|| format!("page {number}"))?;
        if !text.trim().is_empty() {
            out.push(text);
        }
    }
    tracing::debug!(event = "pdf_pages", path = %path.display(), pages = out.len());
    Ok(out)
}
