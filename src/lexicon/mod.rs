mod lexicon_interface;
mod local_wordnet;
mod memory_lexicon;

pub use lexicon_interface::{
    parse_synset_key, AbstractLexicon, ErrorDetails, ErrorLayer, LexiconError, Result, SynsetInfo,
};
pub use local_wordnet::make_local_lexicon;
pub use memory_lexicon::{make_memory_lexicon, SynsetSeed};
