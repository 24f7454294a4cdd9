use std::io::Read;

use async_trait::async_trait;
use flate2::read::GzDecoder;
use serde_json::from_str;
use tokio::fs::File;
use tokio::io::AsyncReadExt;
use tokio::sync::OnceCell;

use super::lexicon_interface::{AbstractLexicon, Result, SynsetInfo};
use super::memory_lexicon::{LexiconStore, SynsetSeed};

/// Read a gzip-compressed newline-delimited-JSON graph dump, one synset record
/// per line.
async fn read_gzipped_ndjson_from_file(path: &str) -> Result<Vec<SynsetSeed>> {
    let mut f = File::open(path).await?;
    // We read the entirety to a buffer because
    // https://github.com/serde-rs/json/issues/160 suggests that the buffered
    // reader performance is likely to be much worse.
    let mut buffer = Vec::new();
    f.read_to_end(&mut buffer).await?;

    let mut gz = GzDecoder::new(&buffer[..]);

    let mut raw_str = String::new();
    gz.read_to_string(&mut raw_str)?;

    raw_str
        .lines()
        .filter(|s| !s.trim().is_empty())
        .map(|s| from_str(s).map_err(|e| e.into()))
        .collect()
}

/// Lexicon backed by an on-disk WordNet graph dump.  The dump is loaded and
/// indexed on first lookup, so a pipeline that never touches the graph (for
/// example a pure COCO grouping run) never requires the file to exist.
struct LocalWordnet {
    dump_path: String,
    store: OnceCell<LexiconStore>,
}

impl LocalWordnet {
    async fn store(&self) -> Result<&LexiconStore> {
        self.store
            .get_or_try_init(|| async {
                info!(path = %self.dump_path, "loading lexical graph dump");
                let seeds = read_gzipped_ndjson_from_file(&self.dump_path).await?;
                info!(synsets = seeds.len(), "lexical graph dump loaded");
                Ok(LexiconStore::build(seeds))
            })
            .await
    }
}

#[async_trait]
impl AbstractLexicon for LocalWordnet {
    async fn synset_lookup(&self, key: &str) -> Result<SynsetInfo> {
        self.store().await?.synset_lookup(key)
    }

    async fn synset_by_name(&self, name: &str) -> Result<SynsetInfo> {
        self.store().await?.synset_by_name(name)
    }

    async fn synsets_for_lemma(&self, lemma: &str) -> Result<Vec<SynsetInfo>> {
        self.store().await?.synsets_for_lemma(lemma)
    }
}

pub fn make_local_lexicon(dump_path: &str) -> Box<dyn AbstractLexicon + Send + Sync> {
    Box::new(LocalWordnet {
        dump_path: dump_path.to_string(),
        store: OnceCell::new(),
    })
}
