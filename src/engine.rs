use crate::analyze::Analyzer;
use crate::document::{
    BLOB_FIELD, DocId, Indexable, MATCH_ALL_FIELD, MATCH_ALL_TERM, TAGS_FIELD,
};
use crate::error::{Error, Result};
use crate::index::{IndexStats, InvertedIndex};
use crate::query::{Query, evaluate};
use crate::select::{SelectionMode, Selector};
use std::collections::HashMap;
use std::time::Instant;
use tracing::{debug, info};

/// Search options
#[derive(Debug, Clone)]
pub struct SearchConfig {
    /// Fields queried per request, in DisMax child order.
    pub fields: Vec<String>,
    /// Weight of the non-best matching fields in the combined score.
    pub tie_breaker: f32,
    /// How the winner is drawn from the match stream.
    pub mode: SelectionMode,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            fields: vec![TAGS_FIELD.to_string(), BLOB_FIELD.to_string()],
            tie_breaker: 0.1,
            mode: SelectionMode::UniformRandom,
        }
    }
}

impl SearchConfig {
    fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.tie_breaker) {
            return Err(Error::InvalidTieBreaker(self.tie_breaker));
        }
        Ok(())
    }
}

/// Main search engine: a fixed document set behind an inverted index.
///
/// Built once at startup and immutable afterwards, so any number of
/// concurrent queries can read it without locking.
pub struct SearchEngine<D> {
    docs: Vec<D>,
    index: InvertedIndex,
    config: SearchConfig,
}

impl<D: Indexable> SearchEngine<D> {
    /// Index `docs` and wrap them into a queryable engine.
    pub fn build(
        docs: Vec<D>,
        analyzers: HashMap<String, Analyzer>,
        config: SearchConfig,
    ) -> Result<Self> {
        config.validate()?;
        let start = Instant::now();
        let index = InvertedIndex::build(analyzers, &docs)?;
        info!(
            documents = docs.len(),
            elapsed = ?start.elapsed(),
            "index built"
        );
        Ok(Self {
            docs,
            index,
            config,
        })
    }

    /// DisMax over the configured fields for one query string. Never fails:
    /// the tie breaker was validated at build time, and a query string that
    /// analyzes to nothing just matches nothing.
    pub fn query(&self, query: &str) -> Query {
        Query::DisMax {
            tie_breaker: self.config.tie_breaker,
            queries: self
                .config
                .fields
                .iter()
                .map(|field| Query::terms(&self.index, field, query))
                .collect(),
        }
    }

    /// Stream every document matching `query`, in ascending id order, with
    /// its combined relevance score.
    pub fn for_each_match<F>(&self, query: &str, mut f: F)
    where
        F: FnMut(DocId, f32, &D),
    {
        let compiled = self.query(query);
        evaluate(&self.index, &compiled, |doc, score| {
            if let Some(d) = self.docs.get(doc as usize) {
                f(doc, score, d);
            }
        });
    }

    /// Pick one document matching `query` according to the configured
    /// selection mode. Queries that analyze to nothing, or match nothing,
    /// yield `None`.
    pub fn search_one(&self, query: &str) -> Option<&D> {
        let compiled = self.query(query);
        let mut selector = Selector::new(self.config.mode);
        evaluate(&self.index, &compiled, |doc, score| {
            selector.offer(doc, score);
        });
        let picked = selector.pick();
        debug!(query, ?picked, "search");
        self.docs.get(picked? as usize)
    }

    /// Pick any indexed document, uniformly at random regardless of the
    /// configured mode.
    pub fn pick_any(&self) -> Option<&D> {
        let query = Query::TermSet {
            field: MATCH_ALL_FIELD.to_string(),
            terms: vec![MATCH_ALL_TERM.to_string()],
        };
        let mut selector = Selector::new(SelectionMode::UniformRandom);
        evaluate(&self.index, &query, |doc, score| {
            selector.offer(doc, score);
        });
        self.docs.get(selector.pick()? as usize)
    }

    /// Get a document by id
    pub fn doc(&self, id: DocId) -> Option<&D> {
        self.docs.get(id as usize)
    }

    /// Get total document count
    pub fn doc_count(&self) -> u32 {
        self.index.doc_count()
    }

    /// Get index statistics
    pub fn stats(&self) -> IndexStats {
        self.index.stats()
    }
}
