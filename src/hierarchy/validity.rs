use std::collections::HashSet;

use ustr::{ustr, Ustr};

/// Allow-list of synset keys restricting which nodes may appear in output.
/// Purely a membership predicate; callers pass `Option<ValiditySet>` where
/// `None` means "no restriction".
#[derive(Clone, Debug, Default)]
pub struct ValiditySet {
    keys: HashSet<Ustr>,
}

impl ValiditySet {
    pub fn from_keys<I, S>(keys: I) -> ValiditySet
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        ValiditySet {
            keys: keys.into_iter().map(|k| ustr(k.as_ref())).collect(),
        }
    }

    pub fn contains(&self, key: &str) -> bool {
        self.keys.contains(&ustr(key))
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}
