use serde_json::Value;
use tokio::fs::read_to_string;

use crate::hierarchy::ValiditySet;

/// Read a class-index JSON file mapping class numbers to `[key, label]`
/// pairs (the ImageNet-1k distribution format: `{"0": ["n01440764",
/// "tench"], ...}`) into a validity set.
///
/// Any failure to read or parse is logged and yields `None`, i.e. "no
/// restriction": a broken side-input must not turn into an empty output.
pub async fn read_class_index(filename: &str) -> Option<ValiditySet> {
    let raw = match read_to_string(filename).await {
        Ok(raw) => raw,
        Err(_) => {
            info!("Error trying to open class index file [{}]", filename);
            return None;
        }
    };

    let data: Value = match serde_json::from_str(&raw) {
        Ok(data) => data,
        Err(_) => {
            info!("Error trying to parse class index file [{}]", filename);
            return None;
        }
    };

    let entries = match data.as_object() {
        Some(entries) => entries,
        None => {
            info!("Class index file is not an object [{}]", filename);
            return None;
        }
    };

    let keys = entries.values().filter_map(|value| {
        value
            .as_array()
            .and_then(|pair| pair.first())
            .and_then(|key| key.as_str())
    });
    let set = ValiditySet::from_keys(keys);
    info!(keys = set.len(), "loaded class index validity set");
    Some(set)
}

/// Read a line-oriented list of synset keys (one per line, blank lines
/// skipped) into a validity set.  Same degradation contract as
/// `read_class_index`.
pub async fn read_id_list(filename: &str) -> Option<ValiditySet> {
    let raw = match read_to_string(filename).await {
        Ok(raw) => raw,
        Err(_) => {
            info!("Error trying to open id list file [{}]", filename);
            return None;
        }
    };

    let set = ValiditySet::from_keys(raw.lines().map(|l| l.trim()).filter(|l| !l.is_empty()));
    info!(keys = set.len(), "loaded id list validity set");
    Some(set)
}
