use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::document::DocId;

/// How the winning document is chosen from the match stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SelectionMode {
    /// Every matching document wins with equal probability, regardless of
    /// relevance score.
    #[default]
    UniformRandom,
    /// The highest-scoring document wins; ties go to the lower id.
    TopScore,
}

/// Single-slot reservoir over a stream of scored candidates.
///
/// Memory stays constant no matter how many candidates are offered. In
/// [`SelectionMode::UniformRandom`] each candidate gets a fresh random key
/// and the running maximum is kept, which leaves every offered document
/// equally likely to hold the slot once the stream ends.
pub struct Selector {
    mode: SelectionMode,
    rng: StdRng,
    best: Option<(DocId, f64)>,
}

impl Selector {
    pub fn new(mode: SelectionMode) -> Self {
        Self {
            mode,
            rng: StdRng::from_entropy(),
            best: None,
        }
    }

    /// Deterministic selector for tests and reproducible runs.
    pub fn seeded(mode: SelectionMode, seed: u64) -> Self {
        Self {
            mode,
            rng: StdRng::seed_from_u64(seed),
            best: None,
        }
    }

    /// Offer one candidate. First candidate always takes the slot; later
    /// ones only on a strictly greater key, so ties keep the earlier
    /// (lower-id) document.
    pub fn offer(&mut self, doc: DocId, score: f32) {
        let key = match self.mode {
            SelectionMode::UniformRandom => f64::from(self.rng.gen::<u32>()),
            SelectionMode::TopScore => f64::from(score),
        };
        if self.best.map_or(true, |(_, held)| key > held) {
            self.best = Some((doc, key));
        }
    }

    /// The surviving document, or `None` if nothing was offered.
    pub fn pick(self) -> Option<DocId> {
        self.best.map(|(doc, _)| doc)
    }
}

/// Drain an iterator of candidates through a fresh [`Selector`].
pub fn select_one<I>(mode: SelectionMode, candidates: I) -> Option<DocId>
where
    I: IntoIterator<Item = (DocId, f32)>,
{
    let mut selector = Selector::new(mode);
    for (doc, score) in candidates {
        selector.offer(doc, score);
    }
    selector.pick()
}
