use std::path::{Path, PathBuf};

use tokio::fs::{create_dir_all, write};

use crate::lexicon::{ErrorDetails, ErrorLayer, LexiconError, Result};

const OPENIMAGES_HIERARCHY_URL: &str =
    "https://storage.googleapis.com/openimages/2018_04/bbox_labels_600_hierarchy.json";
const OPENIMAGES_DESCRIPTIONS_URL: &str =
    "https://storage.googleapis.com/openimages/v5/class-descriptions-boxable.csv";
const IMAGENET_CLASS_INDEX_URL: &str =
    "https://raw.githubusercontent.com/raghakot/keras-vis/master/resources/imagenet_class_index.json";

/// reqwest won't return an error for an unhappy status code itself, so we map
/// status classes ourselves: server errors might clear up on retry, anything
/// else is sticky.
impl From<reqwest::Error> for LexiconError {
    fn from(err: reqwest::Error) -> LexiconError {
        LexiconError::TransientProblem(ErrorDetails {
            layer: ErrorLayer::LexiconLayer,
            message: err.to_string(),
        })
    }
}

/// Download `url` to `dest` unless the file already exists.
async fn download_file(url: &str, dest: &Path) -> Result<()> {
    if dest.exists() {
        info!(dest = %dest.display(), "file already exists, skipping download");
        return Ok(());
    }

    info!(url, dest = %dest.display(), "downloading");
    let res = reqwest::get(url).await?;
    if !res.status().is_success() {
        let details = ErrorDetails {
            layer: ErrorLayer::LexiconLayer,
            message: format!("status {} fetching {}", res.status(), url),
        };
        if res.status().is_server_error() {
            return Err(LexiconError::TransientProblem(details));
        }
        return Err(LexiconError::StickyProblem(details));
    }
    let body = res.bytes().await?;

    if let Some(parent) = dest.parent() {
        create_dir_all(parent).await?;
    }
    write(dest, &body).await?;
    info!(dest = %dest.display(), "download complete");
    Ok(())
}

/// Ensure the Open Images hierarchy and class descriptions are on disk,
/// returning `(hierarchy_path, descriptions_path)`.
pub async fn ensure_openimages_data(data_dir: &str) -> Result<(PathBuf, PathBuf)> {
    let dir = Path::new(data_dir);
    let hierarchy_path = dir.join("bbox_labels_600_hierarchy.json");
    let descriptions_path = dir.join("class-descriptions-boxable.csv");

    download_file(OPENIMAGES_HIERARCHY_URL, &hierarchy_path).await?;
    download_file(OPENIMAGES_DESCRIPTIONS_URL, &descriptions_path).await?;

    Ok((hierarchy_path, descriptions_path))
}

/// Ensure the ImageNet-1k class-index JSON is on disk, returning its path.
pub async fn ensure_class_index(data_dir: &str) -> Result<PathBuf> {
    let path = Path::new(data_dir).join("imagenet_class_index.json");
    download_file(IMAGENET_CLASS_INDEX_URL, &path).await?;
    Ok(path)
}
