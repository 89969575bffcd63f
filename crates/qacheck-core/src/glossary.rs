use std::collections::HashMap;

/// Required translation for one source term.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlossaryEntry {
    pub source: String,
    pub target: String,
}

/// Ordered term table. Re-inserting a term replaces its target but keeps the
/// term at its original position, so matching order follows first definition.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Glossary {
    entries: Vec<GlossaryEntry>,
    index: HashMap<String, usize>,
}

impl Glossary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite a term. Returns the previous target, if any.
    pub fn insert(&mut self, source: impl Into<String>, target: impl Into<String>) -> Option<String> {
        let source = source.into();
        let target = target.into();
        match self.index.get(&source) {
            Some(&i) => Some(std::mem::replace(&mut self.entries[i].target, target)),
            None => {
                self.index.insert(source.clone(), self.entries.len());
                self.entries.push(GlossaryEntry { source, target });
                None
            }
        }
    }

    pub fn get(&self, source: &str) -> Option<&str> {
        self.index
            .get(source)
            .map(|&i| self.entries[i].target.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in definition order.
    pub fn iter(&self) -> impl Iterator<Item = &GlossaryEntry> {
        self.entries.iter()
    }
}

impl<S: Into<String>, T: Into<String>> FromIterator<(S, T)> for Glossary {
    fn from_iter<I: IntoIterator<Item = (S, T)>>(iter: I) -> Self {
        let mut g = Glossary::new();
        for (s, t) in iter {
            g.insert(s, t);
        }
        g
    }
}
