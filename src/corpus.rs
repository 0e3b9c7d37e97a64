use crate::analyze::{Analyzer, Normalizer};
use crate::document::{
    BLOB_FIELD, DocId, Indexable, MATCH_ALL_FIELD, MATCH_ALL_TERM, TAGS_FIELD,
};
use anyhow::{Context, Result};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use tracing::{info, warn};
use walkdir::WalkDir;

/// Art files larger than this are skipped at load time.
pub const MAX_BLOB_BYTES: usize = 3500;

/// One piece of ASCII art: the raw blob plus the file name it came from,
/// kept as its only tag.
#[derive(Debug, Clone)]
pub struct Art {
    pub id: DocId,
    pub blob: String,
    pub tags: Vec<String>,
}

impl Indexable for Art {
    fn fields(&self) -> Vec<(&str, Vec<&str>)> {
        vec![
            (BLOB_FIELD, vec![self.blob.as_str()]),
            (TAGS_FIELD, self.tags.iter().map(String::as_str).collect()),
            (MATCH_ALL_FIELD, vec![MATCH_ALL_TERM]),
        ]
    }
}

/// Walk `root` and load every `.txt` file as one [`Art`] document.
///
/// Files are visited in file-name order so ids stay stable across restarts.
/// Valid UTF-8 is kept byte for byte; invalid sequences degrade to U+FFFD
/// instead of failing the file. Trimming is left to the rendering layer.
pub fn load_corpus(root: &Path) -> Result<Vec<Art>> {
    let mut arts = Vec::new();
    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = entry.with_context(|| format!("walking {}", root.display()))?;
        let path = entry.path();
        if !entry.file_type().is_file() {
            continue;
        }
        if path.extension().and_then(|s| s.to_str()) != Some("txt") {
            continue;
        }
        let bytes = fs::read(path)
            .with_context(|| format!("reading {}", path.display()))?;
        if bytes.len() > MAX_BLOB_BYTES {
            warn!(path = %path.display(), bytes = bytes.len(), "skipping art, too large");
            continue;
        }
        let blob = String::from_utf8_lossy(&bytes).into_owned();
        let name = entry.file_name().to_string_lossy().into_owned();
        arts.push(Art {
            id: arts.len() as DocId,
            blob,
            tags: vec![name],
        });
    }
    info!(count = arts.len(), root = %root.display(), "corpus loaded");
    Ok(arts)
}

/// Field analyzers for the art corpus.
///
/// Blob text is matched word for word. Tags are file names, so their chain
/// also breaks `.`, `_` and `-` into word boundaries, and both sides shingle
/// adjacent word pairs so multi-word names can be found by partial phrases.
pub fn art_analyzers() -> crate::error::Result<HashMap<String, Analyzer>> {
    let filename_normalizers = vec![
        Normalizer::Unaccent,
        Normalizer::Lowercase,
        Normalizer::SpaceBetweenDigits,
        Normalizer::Replace {
            pattern: "#".to_string(),
            with: " ".to_string(),
        },
        Normalizer::Replace {
            pattern: ".".to_string(),
            with: " ".to_string(),
        },
        Normalizer::Replace {
            pattern: "_".to_string(),
            with: " ".to_string(),
        },
        Normalizer::Replace {
            pattern: "-".to_string(),
            with: " ".to_string(),
        },
        Normalizer::RemoveNonAlphanumeric,
        Normalizer::Trim,
    ];
    let tags = Analyzer::shingled(2)?.with_normalizers(filename_normalizers);
    Ok(HashMap::from([
        (BLOB_FIELD.to_string(), Analyzer::whitespace()),
        (TAGS_FIELD.to_string(), tags),
        (MATCH_ALL_FIELD.to_string(), Analyzer::whitespace()),
    ]))
}
