use crate::domain::Storage;
use crate::error::Result;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Clone)]
pub struct FileSystemStore {
    data_dir: PathBuf,
}

impl FileSystemStore {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    fn get_path_for_key(&self, family: &str, key: &str, extension: &str) -> PathBuf {
        self.data_dir
            .join(family)
            .join(format!("{}.{}", sanitize_key(key), extension))
    }

    fn ensure_dir(&self, dir: &Path) -> Result<()> {
        if !dir.exists() {
            fs::create_dir_all(dir)?;
        }
        Ok(())
    }

    fn write_file(&self, family: &str, key: &str, extension: &str, content: &str) -> Result<()> {
        self.ensure_dir(&self.data_dir.join(family))?;

        let path = self.get_path_for_key(family, key, extension);
        debug!("Writing {}", path.display());
        fs::write(path, content)?;
        Ok(())
    }
}

/// Keys come from page names and file stems; keep them to one path segment.
fn sanitize_key(key: &str) -> String {
    key.chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '?' | '*' | '"' | '<' | '>' | '|' => '_',
            c => c,
        })
        .collect()
}

impl Storage for FileSystemStore {
    fn save_record(&self, family: &str, key: &str, record: &Value) -> Result<()> {
        self.write_file(family, key, "json", &serde_json::to_string_pretty(record)?)
    }

    fn load_record(&self, family: &str, key: &str) -> Result<Option<Value>> {
        let path = self.get_path_for_key(family, key, "json");
        if path.exists() {
            let content = fs::read_to_string(path)?;
            Ok(Some(serde_json::from_str(&content)?))
        } else {
            Ok(None)
        }
    }

    fn save_markup(&self, family: &str, key: &str, markup: &str) -> Result<()> {
        self.write_file(family, key, "svg", markup)
    }
}
