use serde::Serialize;
use std::collections::HashMap;

use crate::analyze::Analyzer;
use crate::document::{DocId, Indexable};
use crate::error::{Error, Result};

/// One entry of a posting list: a document containing the term, and how
/// often the term occurred across that document's field values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Posting {
    pub doc: DocId,
    pub freq: u32,
}

/// Per-field inverted index: field -> term -> postings ordered by ascending
/// document id. Built once over the full corpus and read-only afterwards,
/// which makes concurrent query evaluation safe without locking.
#[derive(Debug)]
pub struct InvertedIndex {
    analyzers: HashMap<String, Analyzer>,
    fields: HashMap<String, HashMap<String, Vec<Posting>>>,
    doc_count: u32,
}

impl InvertedIndex {
    /// An empty index over the given per-field analyzers. Fields without an
    /// analyzer are ignored at build time and match nothing at query time.
    pub fn new(analyzers: HashMap<String, Analyzer>) -> Self {
        Self {
            analyzers,
            fields: HashMap::new(),
            doc_count: 0,
        }
    }

    /// Index `docs` in order, assigning ids by position.
    pub fn build<D: Indexable>(analyzers: HashMap<String, Analyzer>, docs: &[D]) -> Result<Self> {
        let mut index = Self::new(analyzers);
        for (i, doc) in docs.iter().enumerate() {
            index.add_document(i as DocId, doc)?;
        }
        Ok(index)
    }

    /// Index one document. Ids must arrive strictly sequentially from 0;
    /// anything else is a contract violation.
    pub fn add_document<D: Indexable>(&mut self, doc_id: DocId, doc: &D) -> Result<()> {
        if doc_id != self.doc_count {
            return Err(Error::DocIdCollision {
                got: doc_id,
                expected: self.doc_count,
            });
        }

        for (field, values) in doc.fields() {
            let Some(analyzer) = self.analyzers.get(field) else {
                continue;
            };
            let terms = self.fields.entry(field.to_string()).or_default();
            for value in values {
                for term in analyzer.analyze_index(value) {
                    let postings = terms.entry(term).or_default();
                    match postings.last_mut() {
                        // ids are strictly increasing, so repeats of the
                        // current document are always at the tail
                        Some(last) if last.doc == doc_id => last.freq += 1,
                        _ => postings.push(Posting { doc: doc_id, freq: 1 }),
                    }
                }
            }
        }

        self.doc_count += 1;
        Ok(())
    }

    /// Postings for `term` in `field`, empty for unknown fields and terms.
    pub fn postings(&self, field: &str, term: &str) -> &[Posting] {
        self.fields
            .get(field)
            .and_then(|terms| terms.get(term))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Run `field`'s query-time analyzer over `query`. Unknown fields yield
    /// no terms.
    pub fn search_terms(&self, field: &str, query: &str) -> Vec<String> {
        self.analyzers
            .get(field)
            .map(|analyzer| analyzer.analyze_search(query))
            .unwrap_or_default()
    }

    /// Number of indexed documents.
    pub fn doc_count(&self) -> u32 {
        self.doc_count
    }

    /// Index statistics.
    pub fn stats(&self) -> IndexStats {
        IndexStats {
            total_documents: self.doc_count,
            total_terms: self.fields.values().map(|terms| terms.len()).sum(),
            total_postings: self
                .fields
                .values()
                .flat_map(|terms| terms.values())
                .map(|postings| postings.len())
                .sum(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct IndexStats {
    pub total_documents: u32,
    /// Distinct (field, term) pairs.
    pub total_terms: usize,
    pub total_postings: usize,
}
