use color_eyre::eyre::eyre;
use qacheck_core::{Glossary, Result};

/// Header lookup is exact-case: lower-case first, then capitalized.
fn columns(headers: &csv::StringRecord, lower: &str, capital: &str) -> Vec<usize> {
    [lower, capital]
        .iter()
        .filter_map(|name| headers.iter().position(|h| h.trim() == *name))
        .collect()
}

fn first_filled(rec: &csv::StringRecord, cols: &[usize]) -> Option<String> {
    cols.iter()
        .filter_map(|&i| rec.get(i))
        .map(str::trim)
        .find(|v| !v.is_empty())
        .map(str::to_string)
}

pub(crate) fn parse(content: &str) -> Result<Glossary> {
    let mut rdr = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(content.as_bytes());
    let headers = rdr.headers()?.clone();
    let src_cols = columns(&headers, "source", "Source");
    let tgt_cols = columns(&headers, "target", "Target");
    if src_cols.is_empty() || tgt_cols.is_empty() {
        return Err(eyre!("glossary needs 'source' and 'target' columns"));
    }

    let mut glossary = Glossary::new();
    let mut skipped = 0usize;
    for rec in rdr.records() {
        let rec = rec?;
        match (first_filled(&rec, &src_cols), first_filled(&rec, &tgt_cols)) {
            (Some(s), Some(t)) => {
                glossary.insert(s, t);
            }
            _ => skipped += 1,
        }
    }
    if skipped > 0 {
        tracing::debug!(event = "glossary_rows_skipped", skipped = skipped);
    }
    Ok(glossary)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trims_and_skips_blank_rows() {
        let g = parse("source,target\n Submit , Soumettre \nCancel,\n,Orphan\n  ,x\n").unwrap();
        assert_eq!(g.len(), 1);
        assert_eq!(g.get("Submit"), Some("Soumettre"));
    }

    #[test]
    fn capitalized_headers() {
        let g = parse("Source,Target,Note\nFile,Fichier,menu\n").unwrap();
        assert_eq!(g.get("File"), Some("Fichier"));
    }

    #[test]
    fn lower_case_column_preferred_with_fallback() {
        let g = parse("source,Source,target\nsave,Save,enregistrer\n,Open,ouvrir\n").unwrap();
        let terms: Vec<_> = g.iter().map(|e| e.source.as_str()).collect();
        assert_eq!(terms, vec!["save", "Open"]);
    }

    #[test]
    fn later_duplicates_overwrite() {
        let g = parse("source,target\nSave,Enregistrer\nOpen,Ouvrir\nSave,Sauvegarder\n").unwrap();
        let entries: Vec<_> = g.iter().map(|e| (e.source.as_str(), e.target.as_str())).collect();
        assert_eq!(entries, vec![("Save", "Sauvegarder"), ("Open", "Ouvrir")]);
    }

    #[test]
    fn missing_columns_is_an_error() {
        assert!(parse("term,translation\na,b\n").is_err());
    }
}
