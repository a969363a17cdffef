//! Persistence of generation options and the cached custom wordlist.

use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;

use tempfile::NamedTempFile;
use thiserror::Error;
use tracing::debug;

use crate::options::{GenerationOptions, StoredOptionsError};
use crate::wordlist::{WordlistError, format_wordlist, parse_wordlist};

const OPTIONS_FILE: &str = "options.json";
const WORDLIST_FILE: &str = "wordlist.txt";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage I/O failed: {0}")]
    Io(#[from] io::Error),
    #[error("stored options are unusable: {0}")]
    Options(#[from] StoredOptionsError),
    #[error("failed to encode options: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("cached wordlist is unusable: {0}")]
    Wordlist(#[from] WordlistError),
}

/// Key-value persistence used by the application shell.
pub trait OptionsStore {
    /// `Ok(None)` when nothing has been stored yet.
    fn load_options(&self) -> Result<Option<GenerationOptions>, StoreError>;
    fn save_options(&mut self, options: &GenerationOptions) -> Result<(), StoreError>;

    fn load_wordlist(&self) -> Result<Option<Vec<String>>, StoreError>;
    fn save_wordlist(&mut self, words: &[String]) -> Result<(), StoreError>;
    fn clear_wordlist(&mut self) -> Result<(), StoreError>;
}

/// Stores `options.json` and `wordlist.txt` in one directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// `<config dir>/passphrase`, or the working directory if the platform
    /// has no config directory.
    pub fn default_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("passphrase")
    }

    pub fn options_path(&self) -> PathBuf {
        self.dir.join(OPTIONS_FILE)
    }

    fn read_optional(&self, name: &str) -> Result<Option<String>, StoreError> {
        match fs::read_to_string(self.dir.join(name)) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn write_atomic(&self, name: &str, contents: &[u8]) -> Result<(), StoreError> {
        fs::create_dir_all(&self.dir)?;

        let mut temp_file = NamedTempFile::new_in(&self.dir)?;
        temp_file.write_all(contents)?;
        temp_file.flush()?;
        temp_file
            .persist(self.dir.join(name))
            .map_err(|e| e.error)?;
        Ok(())
    }
}

impl OptionsStore for FileStore {
    fn load_options(&self) -> Result<Option<GenerationOptions>, StoreError> {
        let Some(json) = self.read_optional(OPTIONS_FILE)? else {
            return Ok(None);
        };
        let options = GenerationOptions::from_json(&json)?;
        debug!(dir = %self.dir.display(), "Loaded stored options");
        Ok(Some(options))
    }

    fn save_options(&mut self, options: &GenerationOptions) -> Result<(), StoreError> {
        let json = serde_json::to_string_pretty(options)?;
        self.write_atomic(OPTIONS_FILE, json.as_bytes())?;
        debug!(dir = %self.dir.display(), "Saved options");
        Ok(())
    }

    fn load_wordlist(&self) -> Result<Option<Vec<String>>, StoreError> {
        match self.read_optional(WORDLIST_FILE)? {
            Some(text) => Ok(Some(parse_wordlist(&text)?)),
            None => Ok(None),
        }
    }

    fn save_wordlist(&mut self, words: &[String]) -> Result<(), StoreError> {
        let text = format_wordlist(words);
        self.write_atomic(WORDLIST_FILE, text.as_bytes())?;
        debug!(words = words.len(), "Cached wordlist");
        Ok(())
    }

    fn clear_wordlist(&mut self) -> Result<(), StoreError> {
        match fs::remove_file(self.dir.join(WORDLIST_FILE)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// In-process store, nothing touches disk.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    pub options: Option<GenerationOptions>,
    pub wordlist: Option<Vec<String>>,
}

impl OptionsStore for MemoryStore {
    fn load_options(&self) -> Result<Option<GenerationOptions>, StoreError> {
        Ok(self.options)
    }

    fn save_options(&mut self, options: &GenerationOptions) -> Result<(), StoreError> {
        self.options = Some(*options);
        Ok(())
    }

    fn load_wordlist(&self) -> Result<Option<Vec<String>>, StoreError> {
        Ok(self.wordlist.clone())
    }

    fn save_wordlist(&mut self, words: &[String]) -> Result<(), StoreError> {
        self.wordlist = Some(words.to_vec());
        Ok(())
    }

    fn clear_wordlist(&mut self) -> Result<(), StoreError> {
        self.wordlist = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::{Casing, OptionsError};

    fn sample_options() -> GenerationOptions {
        GenerationOptions {
            word_count: 5,
            include_numbers: true,
            use_spaces: false,
            character_limit: true,
            casing: Casing::LowerCase,
        }
    }

    #[test]
    fn test_empty_dir_loads_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().join("nested"));

        assert!(store.load_options().unwrap().is_none());
        assert!(store.load_wordlist().unwrap().is_none());
    }

    #[test]
    fn test_options_persist() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = FileStore::new(dir.path().join("nested"));

        store.save_options(&sample_options()).unwrap();

        let reopened = FileStore::new(dir.path().join("nested"));
        assert_eq!(reopened.load_options().unwrap(), Some(sample_options()));

        let raw = fs::read_to_string(dir.path().join("nested").join(OPTIONS_FILE)).unwrap();
        assert!(raw.contains("\"characterLimit\": true"));
    }

    #[test]
    fn test_partial_options_file() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(OPTIONS_FILE), r#"{"wordCount": 2}"#).unwrap();

        let store = FileStore::new(dir.path());
        let options = store.load_options().unwrap().unwrap();
        assert_eq!(options.word_count, 2);
        assert_eq!(options.casing, Casing::StartCase);
    }

    #[test]
    fn test_options_file_without_word_count() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(OPTIONS_FILE), r#"{"casing": "upperCase"}"#).unwrap();

        let store = FileStore::new(dir.path());
        assert!(matches!(
            store.load_options(),
            Err(StoreError::Options(StoredOptionsError::Invalid(
                OptionsError::MissingWordCount
            )))
        ));
    }

    #[test]
    fn test_wordlist_cache() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = FileStore::new(dir.path());
        let words: Vec<String> = ["alpha", "bravo"].iter().map(|s| s.to_string()).collect();

        store.save_wordlist(&words).unwrap();
        assert_eq!(store.load_wordlist().unwrap(), Some(words));

        store.clear_wordlist().unwrap();
        assert!(store.load_wordlist().unwrap().is_none());
        store.clear_wordlist().unwrap();
    }

    #[test]
    fn test_wordlist_cache_keeps_words_verbatim() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = FileStore::new(dir.path());
        let words: Vec<String> = ["new york", "#red", "12", "apple 12"]
            .iter()
            .map(|s| s.to_string())
            .collect();

        store.save_wordlist(&words).unwrap();

        let reopened = FileStore::new(dir.path());
        assert_eq!(reopened.load_wordlist().unwrap(), Some(words));
    }

    #[test]
    fn test_overwrite_leaves_no_temp_files() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = FileStore::new(dir.path());

        store.save_options(&GenerationOptions::default()).unwrap();
        store.save_options(&sample_options()).unwrap();

        let entries: Vec<_> = fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(entries.len(), 1);
        assert_eq!(store.load_options().unwrap(), Some(sample_options()));
    }

    #[test]
    fn test_memory_store() {
        let mut store = MemoryStore::default();
        assert!(store.load_options().unwrap().is_none());

        store.save_options(&sample_options()).unwrap();
        assert_eq!(store.load_options().unwrap(), Some(sample_options()));
    }
}
