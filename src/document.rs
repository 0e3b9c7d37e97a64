/// Document identifier: the document's position in the corpus, assigned
/// sequentially from 0 at build time and never reused.
pub type DocId = u32;

/// Field holding the full text blob of a document.
pub const BLOB_FIELD: &str = "blob";
/// Field holding the short labels a document was filed under.
pub const TAGS_FIELD: &str = "tags";
/// Constant field present on every document, so "return anything" queries
/// have something to match.
pub const MATCH_ALL_FIELD: &str = "match_all";
/// The single term every document posts under [`MATCH_ALL_FIELD`].
pub const MATCH_ALL_TERM: &str = "true";

/// Capability interface for anything the index can ingest: a document
/// exposes named fields, each holding zero or more raw string values.
///
/// The index derives terms from these values but never copies the document
/// itself; documents stay owned by the corpus store and are handed out by
/// reference.
pub trait Indexable {
    fn fields(&self) -> Vec<(&str, Vec<&str>)>;
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Note {
        body: String,
    }

    impl Indexable for Note {
        fn fields(&self) -> Vec<(&str, Vec<&str>)> {
            vec![
                (BLOB_FIELD, vec![self.body.as_str()]),
                (MATCH_ALL_FIELD, vec![MATCH_ALL_TERM]),
            ]
        }
    }

    #[test]
    fn test_fields_borrow_from_document() {
        let note = Note {
            body: "hello".to_string(),
        };
        let fields = note.fields();
        assert_eq!(fields[0], (BLOB_FIELD, vec!["hello"]));
        assert_eq!(fields[1], (MATCH_ALL_FIELD, vec![MATCH_ALL_TERM]));
    }
}
