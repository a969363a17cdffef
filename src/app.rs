//! Application state: options, wordlist, and the phrase on display.
//!
//! Every mutating operation takes `&mut self`, so an options change can
//! never interleave with a generation in progress.

use thiserror::Error;
use tracing::{debug, info, warn};
use zeroize::Zeroizing;

use crate::clipboard::{Clipboard, ClipboardError};
use crate::generator::{self, GenerateError, GeneratedPhrase};
use crate::options::{GenerationOptions, OptionsError, OptionsPatch};
use crate::rng::RandomSource;
use crate::store::{OptionsStore, StoreError};
use crate::wordlist::get_wordlist;

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("invalid options: {0}")]
    Options(#[from] OptionsError),
    #[error(transparent)]
    Generate(#[from] GenerateError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Wordlist {
    Embedded,
    Custom(Vec<String>),
}

impl Wordlist {
    pub fn len(&self) -> usize {
        match self {
            Self::Embedded => get_wordlist().len(),
            Self::Custom(words) => words.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Embedded => "Built-in",
            Self::Custom(_) => "Custom",
        }
    }
}

#[derive(Debug)]
pub enum CopyStatus {
    Copied,
    Failed(ClipboardError),
    Skipped,
}

pub struct App<S, C> {
    store: S,
    clipboard: C,
    options: GenerationOptions,
    wordlist: Wordlist,
    phrase: Option<GeneratedPhrase>,
    text: Zeroizing<String>,
    auto_copy: bool,
    persist: bool,
}

impl<S: OptionsStore, C: Clipboard> App<S, C> {
    /// Restores options and any cached wordlist from `store`.
    pub fn new(store: S, clipboard: C) -> Result<Self, AppError> {
        Self::open(store, clipboard, false)
    }

    /// Like [`App::new`], but with `recover` set an unusable options record
    /// is replaced by defaults instead of failing. An unusable cached
    /// wordlist always falls back to the embedded one.
    pub fn open(store: S, clipboard: C, recover: bool) -> Result<Self, AppError> {
        let options = match store.load_options() {
            Ok(Some(options)) => options,
            Ok(None) => {
                debug!("No stored options, using defaults");
                GenerationOptions::default()
            }
            Err(StoreError::Options(e)) if recover => {
                warn!(error = %e, "Ignoring stored options");
                GenerationOptions::default()
            }
            Err(e) => return Err(e.into()),
        };

        let wordlist = match store.load_wordlist() {
            Ok(Some(words)) => {
                info!(words = words.len(), "Using cached wordlist");
                Wordlist::Custom(words)
            }
            Ok(None) => Wordlist::Embedded,
            Err(e) => {
                warn!(error = %e, "Ignoring cached wordlist");
                Wordlist::Embedded
            }
        };

        Ok(Self {
            store,
            clipboard,
            options,
            wordlist,
            phrase: None,
            text: Zeroizing::new(String::new()),
            auto_copy: true,
            persist: false,
        })
    }

    pub fn set_auto_copy(&mut self, auto_copy: bool) {
        self.auto_copy = auto_copy;
    }

    /// Whether option changes are written back to the store.
    pub fn set_persist(&mut self, persist: bool) {
        self.persist = persist;
    }

    pub fn options(&self) -> &GenerationOptions {
        &self.options
    }

    pub fn wordlist(&self) -> &Wordlist {
        &self.wordlist
    }

    /// Last generated phrase, `None` after a manual edit.
    pub fn phrase(&self) -> Option<&GeneratedPhrase> {
        self.phrase.as_ref()
    }

    /// Text currently on display.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Applies `patch`; the previous options stay in force if it is invalid.
    pub fn options_changed(&mut self, patch: &OptionsPatch) -> Result<(), AppError> {
        let mut options = self.options;
        options.apply(patch);
        options.validate()?;

        self.options = options;
        debug!(?options, "Options changed");

        if self.persist {
            self.store.save_options(&self.options)?;
        }
        Ok(())
    }

    pub fn use_wordlist(&mut self, words: Vec<String>) -> Result<(), AppError> {
        self.store.save_wordlist(&words)?;
        info!(words = words.len(), "Using custom wordlist");
        self.wordlist = Wordlist::Custom(words);
        Ok(())
    }

    pub fn use_default_wordlist(&mut self) -> Result<(), AppError> {
        self.store.clear_wordlist()?;
        self.wordlist = Wordlist::Embedded;
        Ok(())
    }

    pub fn generate<R: RandomSource>(&mut self, rng: &mut R) -> Result<CopyStatus, AppError> {
        let phrase = match &self.wordlist {
            Wordlist::Embedded => generator::generate(get_wordlist(), &self.options, rng)?,
            Wordlist::Custom(words) => generator::generate(words, &self.options, rng)?,
        };

        self.text = phrase.joined.clone();
        self.phrase = Some(phrase);
        Ok(self.auto_copy_text())
    }

    /// Replaces the displayed text with a manual edit.
    pub fn edit(&mut self, text: &str) -> CopyStatus {
        if text == self.text.as_str() {
            return CopyStatus::Skipped;
        }

        self.text = Zeroizing::new(text.to_string());
        self.phrase = None;
        self.auto_copy_text()
    }

    pub fn copy(&mut self) -> CopyStatus {
        if self.text.is_empty() {
            return CopyStatus::Skipped;
        }

        match self.clipboard.write_text(&self.text) {
            Ok(()) => CopyStatus::Copied,
            Err(e) => {
                warn!(error = %e, "Clipboard write failed");
                CopyStatus::Failed(e)
            }
        }
    }

    pub fn entropy_bits(&self) -> f64 {
        generator::entropy_bits(self.wordlist.len(), &self.options)
    }

    fn auto_copy_text(&mut self) -> CopyStatus {
        if self.auto_copy {
            self.copy()
        } else {
            CopyStatus::Skipped
        }
    }
}
