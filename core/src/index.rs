use std::collections::HashMap;

use crate::parser::parse;
use crate::source::ContentSource;
use crate::{Document, Result};

/// A source that did not make it into the index, and why.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedSource {
    pub name: String,
    pub reason: String,
}

#[derive(Debug, Default, Clone)]
pub struct BuildReport {
    pub loaded: usize,
    pub skipped: Vec<SkippedSource>,
    /// Slugs claimed by more than one source. The later source won.
    pub collisions: Vec<String>,
}

impl BuildReport {
    pub fn is_clean(&self) -> bool { self.skipped.is_empty() && self.collisions.is_empty() }
}

/// Every successfully parsed document, newest first.
///
/// Built once and never modified; share it behind an `Arc`.
#[derive(Debug, Default)]
pub struct ContentIndex {
    docs: Vec<Document>,
}

impl ContentIndex {
    pub fn build<S: ContentSource + ?Sized>(source: &S) -> Result<Self> {
        Self::build_with_report(source).map(|(index, _)| index)
    }

    /// Load every source, skipping the ones that fail to read or parse.
    ///
    /// Only a failure to list the source aborts the build.
    pub fn build_with_report<S: ContentSource + ?Sized>(source: &S) -> Result<(Self, BuildReport)> {
        let names = source.list()?;
        let mut report = BuildReport::default();
        let mut docs: Vec<Document> = Vec::with_capacity(names.len());
        let mut by_slug: HashMap<String, usize> = HashMap::new();

        for name in names {
            let parsed = source.read(&name).and_then(|raw| parse(&name, &raw));
            let doc = match parsed {
                Ok(doc) => doc,
                Err(err) => {
                    tracing::warn!(name = %name, error = %err, "skipping document");
                    report.skipped.push(SkippedSource { name, reason: err.to_string() });
                    continue;
                }
            };
            match by_slug.get(&doc.slug) {
                Some(&pos) => {
                    tracing::warn!(name = %name, slug = %doc.slug, "slug already loaded, replacing earlier document");
                    report.collisions.push(doc.slug.clone());
                    docs[pos] = doc;
                }
                None => {
                    by_slug.insert(doc.slug.clone(), docs.len());
                    docs.push(doc);
                }
            }
        }

        // Stable: equal dates keep build order. `None` sorts last.
        docs.sort_by(|a, b| b.published_at.cmp(&a.published_at));

        report.loaded = docs.len();
        tracing::info!(loaded = report.loaded, skipped = report.skipped.len(), "loaded posts");
        Ok((Self { docs }, report))
    }

    pub fn list(&self) -> &[Document] { &self.docs }

    /// First document whose slug is exactly `slug`.
    pub fn find_by_slug(&self, slug: &str) -> Option<&Document> {
        self.docs.iter().find(|d| d.slug == slug)
    }

    pub fn len(&self) -> usize { self.docs.len() }

    pub fn is_empty(&self) -> bool { self.docs.is_empty() }
}
