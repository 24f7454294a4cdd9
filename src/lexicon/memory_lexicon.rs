use std::collections::HashMap;

use async_trait::async_trait;
use ustr::{ustr, Ustr};

use super::lexicon_interface::{
    parse_synset_key, AbstractLexicon, ErrorDetails, ErrorLayer, LexiconError, Result, SynsetInfo,
};

/// Seed record for building an in-memory lexicon.  Mirrors one line of the
/// on-disk graph dump; embedders and tests construct these directly.
#[derive(Clone, Debug, serde::Deserialize)]
pub struct SynsetSeed {
    pub key: String,
    pub name: String,
    pub lemmas: Vec<String>,
    #[serde(default)]
    pub hypernyms: Vec<String>,
    #[serde(default)]
    pub hyponyms: Vec<String>,
}

impl SynsetSeed {
    pub fn new(
        key: &str,
        name: &str,
        lemmas: &[&str],
        hypernyms: &[&str],
        hyponyms: &[&str],
    ) -> SynsetSeed {
        SynsetSeed {
            key: key.to_string(),
            name: name.to_string(),
            lemmas: lemmas.iter().map(|s| s.to_string()).collect(),
            hypernyms: hypernyms.iter().map(|s| s.to_string()).collect(),
            hyponyms: hyponyms.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// Indexed form of a loaded graph: key → record, dotted name → key, and
/// lemma → keys in sense order (seed order is sense order, so the first entry
/// for a lemma is its primary sense).
pub(crate) struct LexiconStore {
    by_key: HashMap<Ustr, SynsetInfo>,
    by_name: HashMap<Ustr, Ustr>,
    by_lemma: HashMap<Ustr, Vec<Ustr>>,
}

impl LexiconStore {
    pub fn build(seeds: Vec<SynsetSeed>) -> LexiconStore {
        let mut by_key = HashMap::new();
        let mut by_name = HashMap::new();
        let mut by_lemma: HashMap<Ustr, Vec<Ustr>> = HashMap::new();

        for seed in seeds {
            let key = ustr(&seed.key);
            let name = ustr(&seed.name);
            let lemma = match seed.lemmas.first() {
                Some(l) => ustr(l),
                None => {
                    warn!(key = %key, "synset record without lemmas, skipping");
                    continue;
                }
            };

            for l in &seed.lemmas {
                by_lemma.entry(ustr(l)).or_insert_with(Vec::new).push(key);
            }
            by_name.insert(name, key);
            by_key.insert(
                key,
                SynsetInfo {
                    key,
                    name,
                    lemma,
                    hypernyms: seed.hypernyms.iter().map(|k| ustr(k)).collect(),
                    hyponyms: seed.hyponyms.iter().map(|k| ustr(k)).collect(),
                },
            );
        }

        LexiconStore {
            by_key,
            by_name,
            by_lemma,
        }
    }

    pub fn synset_lookup(&self, key: &str) -> Result<SynsetInfo> {
        if parse_synset_key(key).is_none() {
            return Err(LexiconError::StickyProblem(ErrorDetails {
                layer: ErrorLayer::BadInput,
                message: format!("malformed synset key: {}", key),
            }));
        }
        match self.by_key.get(&ustr(key)) {
            Some(info) => Ok(info.clone()),
            None => Err(LexiconError::StickyProblem(ErrorDetails {
                layer: ErrorLayer::DataLayer,
                message: format!("no synset for key: {}", key),
            })),
        }
    }

    pub fn synset_by_name(&self, name: &str) -> Result<SynsetInfo> {
        let key = self.by_name.get(&ustr(name)).ok_or_else(|| {
            LexiconError::StickyProblem(ErrorDetails {
                layer: ErrorLayer::DataLayer,
                message: format!("no synset named: {}", name),
            })
        })?;
        // by_name only ever points at keys we indexed.
        self.by_key
            .get(key)
            .cloned()
            .ok_or_else(|| {
                LexiconError::StickyProblem(ErrorDetails {
                    layer: ErrorLayer::RuntimeInvariantViolation,
                    message: "LexiconStore name index desynchronized".to_string(),
                })
            })
    }

    pub fn synsets_for_lemma(&self, lemma: &str) -> Result<Vec<SynsetInfo>> {
        let keys = match self.by_lemma.get(&ustr(lemma)) {
            Some(keys) => keys,
            None => return Ok(vec![]),
        };
        Ok(keys
            .iter()
            .filter_map(|k| self.by_key.get(k).cloned())
            .collect())
    }
}

struct MemoryLexicon {
    store: LexiconStore,
}

#[async_trait]
impl AbstractLexicon for MemoryLexicon {
    async fn synset_lookup(&self, key: &str) -> Result<SynsetInfo> {
        self.store.synset_lookup(key)
    }

    async fn synset_by_name(&self, name: &str) -> Result<SynsetInfo> {
        self.store.synset_by_name(name)
    }

    async fn synsets_for_lemma(&self, lemma: &str) -> Result<Vec<SynsetInfo>> {
        self.store.synsets_for_lemma(lemma)
    }
}

/// Wrap already-loaded in-memory synset records as a lexicon.
pub fn make_memory_lexicon(seeds: Vec<SynsetSeed>) -> Box<dyn AbstractLexicon + Send + Sync> {
    Box::new(MemoryLexicon {
        store: LexiconStore::build(seeds),
    })
}
