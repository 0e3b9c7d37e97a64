use crate::document::DocId;
use crate::error::{Error, Result};
use crate::index::{InvertedIndex, Posting};

/// Sentinel id meaning a cursor has run out of documents.
const NO_MORE: DocId = DocId::MAX;

/// A composable query tree, evaluated against one [`InvertedIndex`].
///
/// Queries are ephemeral: built per request from a query string, evaluated
/// in a single streaming pass, then dropped.
#[derive(Debug, Clone)]
pub enum Query {
    /// Disjunction of terms within one field. A document matches if any
    /// term's posting list contains it; its score is the summed frequency of
    /// the terms it matched.
    TermSet { field: String, terms: Vec<String> },
    /// Union of child queries, scored by the sum of the matching children.
    Or(Vec<Query>),
    /// Union of child queries scored DisMax-style: the best matching child
    /// counts fully, the remaining matching children contribute
    /// `tie_breaker` times their score.
    DisMax { tie_breaker: f32, queries: Vec<Query> },
}

impl Query {
    /// Per-field disjunction over the terms the field's query-time analyzer
    /// extracts from `query`. Unknown fields and term-free queries produce a
    /// query that matches nothing.
    pub fn terms(index: &InvertedIndex, field: &str, query: &str) -> Query {
        Query::TermSet {
            field: field.to_string(),
            terms: index.search_terms(field, query),
        }
    }

    /// DisMax with a validated tie breaker.
    pub fn dis_max(tie_breaker: f32, queries: Vec<Query>) -> Result<Query> {
        if !(0.0..=1.0).contains(&tie_breaker) {
            return Err(Error::InvalidTieBreaker(tie_breaker));
        }
        Ok(Query::DisMax {
            tie_breaker,
            queries,
        })
    }
}

/// Stream every document matching `query` to `on_match`, in ascending id
/// order, together with its relevance score. One pass over the posting
/// lists; no candidate list is materialized. A query with no usable terms
/// simply produces no calls.
pub fn evaluate<F>(index: &InvertedIndex, query: &Query, mut on_match: F)
where
    F: FnMut(DocId, f32),
{
    let mut root = Node::compile(query, index);
    loop {
        let doc = root.next();
        if doc == NO_MORE {
            break;
        }
        on_match(doc, root.score());
    }
}

/// How a union combines the scores of children matching the current doc.
#[derive(Clone, Copy)]
enum Combine {
    Sum,
    DisMax(f32),
}

/// Compiled query node: a streaming cursor over matching documents.
///
/// Term cursors start positioned on their first posting; unions start at
/// `NO_MORE` and position themselves on the first `next()`, which advances
/// exactly the children sitting on the doc just consumed.
enum Node<'a> {
    Term(TermCursor<'a>),
    Union(UnionNode<'a>),
}

impl<'a> Node<'a> {
    fn compile(query: &Query, index: &'a InvertedIndex) -> Node<'a> {
        match query {
            Query::TermSet { field, terms } => Node::union(
                terms
                    .iter()
                    .map(|term| Node::Term(TermCursor::new(index.postings(field, term))))
                    .collect(),
                Combine::Sum,
            ),
            Query::Or(children) => Node::union(
                children.iter().map(|q| Node::compile(q, index)).collect(),
                Combine::Sum,
            ),
            Query::DisMax {
                tie_breaker,
                queries,
            } => Node::union(
                queries.iter().map(|q| Node::compile(q, index)).collect(),
                Combine::DisMax(*tie_breaker),
            ),
        }
    }

    fn union(children: Vec<Node<'a>>, combine: Combine) -> Node<'a> {
        Node::Union(UnionNode {
            children,
            combine,
            current: NO_MORE,
        })
    }

    fn doc(&self) -> DocId {
        match self {
            Node::Term(cursor) => cursor.doc(),
            Node::Union(union) => union.current,
        }
    }

    fn next(&mut self) -> DocId {
        match self {
            Node::Term(cursor) => cursor.next(),
            Node::Union(union) => union.next(),
        }
    }

    fn score(&self) -> f32 {
        match self {
            Node::Term(cursor) => cursor.score(),
            Node::Union(union) => union.score(),
        }
    }
}

struct TermCursor<'a> {
    postings: &'a [Posting],
    pos: usize,
}

impl<'a> TermCursor<'a> {
    fn new(postings: &'a [Posting]) -> Self {
        Self { postings, pos: 0 }
    }

    fn doc(&self) -> DocId {
        self.postings.get(self.pos).map_or(NO_MORE, |p| p.doc)
    }

    fn next(&mut self) -> DocId {
        if self.pos < self.postings.len() {
            self.pos += 1;
        }
        self.doc()
    }

    fn score(&self) -> f32 {
        self.postings.get(self.pos).map_or(0.0, |p| p.freq as f32)
    }
}

struct UnionNode<'a> {
    children: Vec<Node<'a>>,
    combine: Combine,
    current: DocId,
}

impl UnionNode<'_> {
    fn next(&mut self) -> DocId {
        // consume the doc emitted last round from every child sitting on it;
        // on the very first call this initializes nested unions instead
        for child in &mut self.children {
            if child.doc() == self.current {
                child.next();
            }
        }
        self.current = self
            .children
            .iter()
            .map(Node::doc)
            .min()
            .unwrap_or(NO_MORE);
        self.current
    }

    fn score(&self) -> f32 {
        let matching = self
            .children
            .iter()
            .filter(|child| child.doc() == self.current)
            .map(Node::score);
        match self.combine {
            Combine::Sum => matching.sum(),
            Combine::DisMax(tie_breaker) => {
                let mut best = 0.0f32;
                let mut rest = 0.0f32;
                for score in matching {
                    if score > best {
                        rest += best;
                        best = score;
                    } else {
                        rest += score;
                    }
                }
                best + tie_breaker * rest
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyze::Analyzer;
    use crate::document::{BLOB_FIELD, Indexable, TAGS_FIELD};
    use std::collections::HashMap;

    struct Note {
        body: &'static str,
        tags: Vec<&'static str>,
    }

    impl Indexable for Note {
        fn fields(&self) -> Vec<(&str, Vec<&str>)> {
            vec![
                (BLOB_FIELD, vec![self.body]),
                (TAGS_FIELD, self.tags.clone()),
            ]
        }
    }

    fn index() -> InvertedIndex {
        let analyzers = HashMap::from([
            (BLOB_FIELD.to_string(), Analyzer::whitespace()),
            (TAGS_FIELD.to_string(), Analyzer::whitespace()),
        ]);
        let docs = vec![
            Note {
                body: "a happy cat",
                tags: vec!["cat"],
            },
            Note {
                body: "a happy dog",
                tags: vec!["dog"],
            },
            Note {
                body: "cat cat cat",
                tags: vec![],
            },
        ];
        InvertedIndex::build(analyzers, &docs).unwrap()
    }

    fn matches(index: &InvertedIndex, query: &Query) -> Vec<(DocId, f32)> {
        let mut out = Vec::new();
        evaluate(index, query, |doc, score| out.push((doc, score)));
        out
    }

    #[test]
    fn test_term_set_streams_in_ascending_id_order() {
        let index = index();
        let query = Query::terms(&index, BLOB_FIELD, "cat");

        assert_eq!(matches(&index, &query), vec![(0, 1.0), (2, 3.0)]);
    }

    #[test]
    fn test_term_set_sums_matched_term_frequencies() {
        let index = index();
        let query = Query::terms(&index, BLOB_FIELD, "happy cat");

        // doc 0 matches both terms, docs 1 and 2 match one each
        assert_eq!(matches(&index, &query), vec![(0, 2.0), (1, 1.0), (2, 3.0)]);
    }

    #[test]
    fn test_or_unions_children_without_duplicates() {
        let index = index();
        let query = Query::Or(vec![
            Query::terms(&index, TAGS_FIELD, "cat"),
            Query::terms(&index, BLOB_FIELD, "cat"),
        ]);

        // doc 0 appears in both children but is emitted once, scores summed
        assert_eq!(matches(&index, &query), vec![(0, 2.0), (2, 3.0)]);
    }

    #[test]
    fn test_dismax_single_matching_child_scores_exactly() {
        let index = index();
        for tie_breaker in [0.0, 0.1, 1.0] {
            let query = Query::dis_max(
                tie_breaker,
                vec![
                    Query::terms(&index, TAGS_FIELD, "dog"),
                    Query::terms(&index, BLOB_FIELD, "zebra"),
                ],
            )
            .unwrap();

            // only the tags child matches doc 1: combined == child score
            assert_eq!(matches(&index, &query), vec![(1, 1.0)]);
        }
    }

    #[test]
    fn test_dismax_combines_best_plus_tie_breaker_times_rest() {
        let index = index();
        let query = Query::dis_max(
            0.1,
            vec![
                Query::terms(&index, TAGS_FIELD, "cat"),
                Query::terms(&index, BLOB_FIELD, "cat"),
            ],
        )
        .unwrap();

        let out = matches(&index, &query);
        // doc 0: tags 1.0 + blob 1.0 -> 1.0 + 0.1 * 1.0
        // doc 2: blob only -> 3.0
        assert_eq!(out, vec![(0, 1.0 + 0.1), (2, 3.0)]);
    }

    #[test]
    fn test_dismax_monotonic_in_tie_breaker() {
        let index = index();
        let score_at = |tie_breaker: f32| {
            let query = Query::dis_max(
                tie_breaker,
                vec![
                    Query::terms(&index, TAGS_FIELD, "cat"),
                    Query::terms(&index, BLOB_FIELD, "cat"),
                ],
            )
            .unwrap();
            matches(&index, &query)[0].1
        };

        let mut last = score_at(0.0);
        for tie_breaker in [0.25, 0.5, 0.75, 1.0] {
            let score = score_at(tie_breaker);
            assert!(score >= last, "{score} < {last} at {tie_breaker}");
            last = score;
        }
    }

    #[test]
    fn test_nested_unions() {
        let index = index();
        let query = Query::dis_max(
            0.5,
            vec![Query::Or(vec![
                Query::terms(&index, BLOB_FIELD, "happy"),
                Query::terms(&index, TAGS_FIELD, "dog"),
            ])],
        )
        .unwrap();

        // single child: DisMax passes its score through unchanged
        assert_eq!(matches(&index, &query), vec![(0, 1.0), (1, 2.0)]);
    }

    #[test]
    fn test_empty_query_matches_nothing() {
        let index = index();
        assert!(matches(&index, &Query::terms(&index, BLOB_FIELD, "")).is_empty());
        assert!(matches(&index, &Query::terms(&index, BLOB_FIELD, "...")).is_empty());
        assert!(matches(&index, &Query::Or(vec![])).is_empty());
    }

    #[test]
    fn test_unknown_field_matches_nothing() {
        let index = index();
        let query = Query::terms(&index, "no_such_field", "cat");
        assert!(matches(&index, &query).is_empty());
    }

    #[test]
    fn test_absent_term_matches_nothing() {
        let index = index();
        let query = Query::terms(&index, BLOB_FIELD, "zebra");
        assert!(matches(&index, &query).is_empty());
    }

    #[test]
    fn test_dismax_rejects_out_of_range_tie_breaker() {
        assert_eq!(
            Query::dis_max(1.5, vec![]).unwrap_err(),
            Error::InvalidTieBreaker(1.5)
        );
        assert_eq!(
            Query::dis_max(-0.1, vec![]).unwrap_err(),
            Error::InvalidTieBreaker(-0.1)
        );
    }
}
