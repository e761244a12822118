use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use actix_web::web;
use unicode_normalization::UnicodeNormalization;
use uuid::Uuid;

use crate::error::AppError;

/// Reduces a client-supplied filename to a flat, ASCII-only name that cannot
/// leave the directory it is joined onto. Accented letters keep their base
/// letter.
///
/// May return an empty string when nothing safe is left.
pub fn sanitize_filename(filename: &str) -> String {
    let ascii: String = filename
        .nfkd()
        .filter(char::is_ascii)
        .map(|c| if c == '/' || c == '\\' { ' ' } else { c })
        .collect();

    let joined = ascii.split_whitespace().collect::<Vec<_>>().join("_");
    let safe: String = joined
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'))
        .collect();

    safe.trim_matches(|c| c == '.' || c == '_').to_owned()
}

/// The directory uploaded images are written to.
#[derive(Debug, Clone)]
pub struct UploadDir {
    root: PathBuf,
}

impl UploadDir {
    /// Opens the directory, creating it and any missing parents.
    pub fn create(root: impl Into<PathBuf>) -> io::Result<Self> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Where an upload called `filename` is stored.
    pub fn path_for(&self, filename: &str) -> PathBuf {
        let mut name = sanitize_filename(filename);
        if name.is_empty() {
            name = Uuid::new_v4().to_string();
        }
        self.root.join(name)
    }

    /// Writes `data` under the sanitized `filename`, replacing any earlier upload
    /// with the same name.
    pub async fn save(&self, filename: &str, data: Vec<u8>) -> Result<PathBuf, AppError> {
        let path = self.path_for(filename);
        let target = path.clone();

        web::block(move || fs::write(&target, data)).await??;

        Ok(path)
    }
}
