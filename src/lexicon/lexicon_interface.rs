use async_trait::async_trait;
use serde::Serialize;
use ustr::Ustr;

pub type Result<T> = std::result::Result<T, LexiconError>;

// JSON parse errors are sticky data problems.
impl From<serde_json::Error> for LexiconError {
    fn from(err: serde_json::Error) -> LexiconError {
        LexiconError::StickyProblem(ErrorDetails {
            layer: ErrorLayer::DataLayer,
            message: err.to_string(),
        })
    }
}

/// IO errors amount to a 404 for our purposes which means a sticky problem.
impl From<std::io::Error> for LexiconError {
    fn from(err: std::io::Error) -> LexiconError {
        LexiconError::StickyProblem(ErrorDetails {
            layer: ErrorLayer::LexiconLayer,
            message: err.to_string(),
        })
    }
}

/// Express whether the error seems to be happening in the lexicon or the data.
#[derive(Debug)]
pub enum ErrorLayer {
    /// The request itself has structural issues like a malformed pipeline or a
    /// syntactically invalid synset key.  This should not be used for cases
    /// where a well-formed key simply has no synset behind it; that is a
    /// `DataLayer` miss.
    BadInput,
    /// An incorrectly constructed pipeline; for example a command receiving a
    /// pipeline value variant it cannot consume.
    ConfigLayer,
    /// The error seems to involve the lexicon source itself, like the graph
    /// dump being unreadable.
    LexiconLayer,
    /// The error seems to be related to the lexical data in question rather
    /// than the source, like a key that resolves to nothing.
    DataLayer,
    /// Internal bookkeeping desynchronized; a bug on our side.
    RuntimeInvariantViolation,
    /// We're not sure if it was a source issue or a data issue.
    UnknownLayer,
}

/// LexiconError payload to provide details about what went wrong for
/// investigation purposes.
#[derive(Debug)]
pub struct ErrorDetails {
    /// Attempt to distinguish failures due to our bugs from failures due to
    /// the underlying lexical data.
    pub layer: ErrorLayer,
    /// Stringified version of the lower level error.
    pub message: String,
}

/// Does a retry make sense or not?  Local graph dumps only ever produce sticky
/// problems, but the download adapter can hit transient server conditions, and
/// a unifying error type keeps the pipeline plumbing simple.
#[derive(Debug)]
pub enum LexiconError {
    /// An error that will persist for this lexicon.  For example a missing
    /// synset.
    StickyProblem(ErrorDetails),
    /// An error that might go away if retried later.  For example a 504
    /// "Gateway timeout" while fetching a dataset asset.
    TransientProblem(ErrorDetails),
}

/// One word sense in the lexical graph.
///
/// The record is intentionally flat: related synsets are referenced by key and
/// resolved through the lexicon on demand, the same way a cross-reference
/// database names other symbols rather than embedding them.
#[derive(Clone, Debug, Serialize)]
pub struct SynsetInfo {
    /// Stable key: part-of-speech tag followed by the 8-digit zero-padded
    /// offset, e.g. `n02084071`.
    pub key: Ustr,
    /// Dotted sense name, e.g. `dog.n.01`.
    pub name: Ustr,
    /// Primary lemma in raw form, underscores and all, e.g. `hunting_dog`.
    pub lemma: Ustr,
    /// Parent keys ("is-a"); the graph is a DAG so there can be several.  The
    /// first entry is the primary parent.
    pub hypernyms: Vec<Ustr>,
    /// Child keys, in sense order.
    pub hyponyms: Vec<Ustr>,
}

impl SynsetInfo {
    /// The human-readable label: the primary lemma with underscores replaced
    /// by spaces.
    pub fn display_name(&self) -> String {
        self.lemma.replace('_', " ")
    }
}

/// Syntactic validation of a synset key: a part-of-speech letter followed by a
/// numeric offset.  Returns the tag and offset, or `None` for garbage.  This
/// is the only identifier validation performed anywhere; whether a well-formed
/// key names a real synset is the lexicon's business.
pub fn parse_synset_key(key: &str) -> Option<(char, u64)> {
    if key.len() < 2 {
        return None;
    }
    let mut chars = key.chars();
    let pos = chars.next()?;
    if !pos.is_ascii_alphabetic() {
        return None;
    }
    let offset_str = chars.as_str();
    if !offset_str.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    offset_str.parse::<u64>().ok().map(|offset| (pos, offset))
}

/// Unified exposure for a lexical graph source: the on-disk WordNet dump or an
/// already-loaded in-memory graph supplied by an embedder.
///
/// Lookups are async so that implementations backed by slower storage can slot
/// in without touching the traversal code; the bundled implementations resolve
/// from in-memory maps.
#[async_trait]
pub trait AbstractLexicon {
    /// Retrieve the record for the synset with the given key.
    async fn synset_lookup(&self, key: &str) -> Result<SynsetInfo>;

    /// Retrieve the record for the synset with the given dotted sense name,
    /// e.g. `animal.n.01`.
    async fn synset_by_name(&self, name: &str) -> Result<SynsetInfo>;

    /// All synsets containing the given (raw, underscore-form) lemma, most
    /// frequent sense first.  An unknown lemma is an empty list, not an error.
    async fn synsets_for_lemma(&self, lemma: &str) -> Result<Vec<SynsetInfo>>;
}
