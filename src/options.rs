use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

/// Rendered length cap applied when `character_limit` is on.
pub const CHARACTER_LIMIT: usize = 20;

/// Upper bound (inclusive) of the injected number.
pub const MAX_NUMBER: usize = 999;

pub const DEFAULT_WORD_COUNT: usize = 4;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum OptionsError {
    #[error("wordCount is missing")]
    MissingWordCount,
    #[error("wordCount must be at least 1, got {0}")]
    InvalidWordCount(usize),
}

/// Per-word transform applied before joining.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Casing {
    UpperCase,
    LowerCase,
    #[default]
    StartCase,
}

impl Casing {
    /// Anything unrecognized is start case.
    pub fn from_name(name: &str) -> Self {
        match name {
            "upperCase" => Self::UpperCase,
            "lowerCase" => Self::LowerCase,
            _ => Self::StartCase,
        }
    }

    pub fn apply(self, word: &str) -> String {
        match self {
            Self::UpperCase => word.to_uppercase(),
            Self::LowerCase => word.to_lowercase(),
            Self::StartCase => {
                let mut chars = word.chars();
                chars.next().map_or_else(String::new, |c| {
                    c.to_uppercase().collect::<String>() + chars.as_str()
                })
            }
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::UpperCase => "UPPER",
            Self::LowerCase => "lower",
            Self::StartCase => "Start",
        }
    }
}

impl<'de> Deserialize<'de> for Casing {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Option::<serde_json::Value>::deserialize(deserializer)?;
        Ok(match value {
            Some(serde_json::Value::String(name)) => Self::from_name(&name),
            _ => Self::StartCase,
        })
    }
}

/// Validated generation options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationOptions {
    pub word_count: usize,
    pub include_numbers: bool,
    pub use_spaces: bool,
    pub character_limit: bool,
    pub casing: Casing,
}

impl Default for GenerationOptions {
    fn default() -> Self {
        Self {
            word_count: DEFAULT_WORD_COUNT,
            include_numbers: false,
            use_spaces: true,
            character_limit: false,
            casing: Casing::StartCase,
        }
    }
}

impl GenerationOptions {
    pub fn validate(&self) -> Result<(), OptionsError> {
        if self.word_count < 1 {
            return Err(OptionsError::InvalidWordCount(self.word_count));
        }
        Ok(())
    }

    pub fn separator(&self) -> &'static str {
        if self.use_spaces { " " } else { "" }
    }

    pub fn max_length(&self) -> Option<usize> {
        self.character_limit.then_some(CHARACTER_LIMIT)
    }

    /// Number of words drawn from the wordlist.
    pub fn sample_count(&self) -> usize {
        if self.include_numbers {
            self.word_count.saturating_sub(1)
        } else {
            self.word_count
        }
    }

    /// Parses a stored record, tolerating any subset of fields.
    pub fn from_json(json: &str) -> Result<Self, StoredOptionsError> {
        let stored: StoredOptions = serde_json::from_str(json)?;
        Ok(Self::try_from(stored)?)
    }

    pub fn apply(&mut self, patch: &OptionsPatch) {
        if let Some(word_count) = patch.word_count {
            self.word_count = word_count;
        }
        if let Some(include_numbers) = patch.include_numbers {
            self.include_numbers = include_numbers;
        }
        if let Some(use_spaces) = patch.use_spaces {
            self.use_spaces = use_spaces;
        }
        if let Some(character_limit) = patch.character_limit {
            self.character_limit = character_limit;
        }
        if let Some(casing) = patch.casing {
            self.casing = casing;
        }
    }
}

#[derive(Debug, Error)]
pub enum StoredOptionsError {
    #[error("malformed options record: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error(transparent)]
    Invalid(#[from] OptionsError),
}

/// On-disk shape of [`GenerationOptions`]; every field may be absent.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredOptions {
    word_count: Option<usize>,
    include_numbers: Option<bool>,
    use_spaces: Option<bool>,
    character_limit: Option<bool>,
    #[serde(default)]
    casing: Casing,
}

impl TryFrom<StoredOptions> for GenerationOptions {
    type Error = OptionsError;

    fn try_from(stored: StoredOptions) -> Result<Self, Self::Error> {
        let defaults = Self::default();
        let options = Self {
            word_count: stored.word_count.ok_or(OptionsError::MissingWordCount)?,
            include_numbers: stored.include_numbers.unwrap_or(defaults.include_numbers),
            use_spaces: stored.use_spaces.unwrap_or(defaults.use_spaces),
            character_limit: stored.character_limit.unwrap_or(defaults.character_limit),
            casing: stored.casing,
        };
        options.validate()?;
        Ok(options)
    }
}

/// A set of option changes; `None` leaves the field alone.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OptionsPatch {
    pub word_count: Option<usize>,
    pub include_numbers: Option<bool>,
    pub use_spaces: Option<bool>,
    pub character_limit: Option<bool>,
    pub casing: Option<Casing>,
}

impl OptionsPatch {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_casing_start_keeps_rest() {
        assert_eq!(Casing::StartCase.apply("banana"), "Banana");
        assert_eq!(Casing::StartCase.apply("bAnAnA"), "BAnAnA");
        assert_eq!(Casing::StartCase.apply(""), "");
    }

    #[test]
    fn test_casing_upper_lower() {
        assert_eq!(Casing::UpperCase.apply("Banana"), "BANANA");
        assert_eq!(Casing::LowerCase.apply("Banana"), "banana");
    }

    #[test]
    fn test_casing_unicode_first_char() {
        assert_eq!(Casing::StartCase.apply("éclair"), "Éclair");
    }

    #[test]
    fn test_casing_fallback() {
        assert_eq!(Casing::from_name("upperCase"), Casing::UpperCase);
        assert_eq!(Casing::from_name("lowerCase"), Casing::LowerCase);
        assert_eq!(Casing::from_name("startCase"), Casing::StartCase);
        assert_eq!(Casing::from_name("titleCase"), Casing::StartCase);
        assert_eq!(Casing::from_name(""), Casing::StartCase);
    }

    #[test]
    fn test_full_record() {
        let options = GenerationOptions::from_json(
            r#"{
                "wordCount": 4,
                "includeNumbers": true,
                "useSpaces": false,
                "characterLimit": true,
                "casing": "upperCase"
            }"#,
        )
        .unwrap();

        assert_eq!(
            options,
            GenerationOptions {
                word_count: 4,
                include_numbers: true,
                use_spaces: false,
                character_limit: true,
                casing: Casing::UpperCase,
            }
        );
    }

    #[test]
    fn test_partial_record_defaults() {
        let options = GenerationOptions::from_json(r#"{"wordCount":3}"#).unwrap();
        assert_eq!(options.word_count, 3);
        assert!(!options.include_numbers);
        assert!(options.use_spaces);
        assert!(!options.character_limit);
        assert_eq!(options.casing, Casing::StartCase);
    }

    #[test]
    fn test_unknown_casing_and_fields() {
        let options =
            GenerationOptions::from_json(r#"{"wordCount":2,"casing":"spongeCase","separator":"-"}"#)
                .unwrap();
        assert_eq!(options.casing, Casing::StartCase);

        let options = GenerationOptions::from_json(r#"{"wordCount":2,"casing":null}"#).unwrap();
        assert_eq!(options.casing, Casing::StartCase);

        let options = GenerationOptions::from_json(r#"{"wordCount":2,"casing":7}"#).unwrap();
        assert_eq!(options.casing, Casing::StartCase);
    }

    #[test]
    fn test_missing_word_count_rejected() {
        let err = GenerationOptions::from_json(r#"{"useSpaces":true}"#).unwrap_err();
        assert!(matches!(
            err,
            StoredOptionsError::Invalid(OptionsError::MissingWordCount)
        ));
    }

    #[test]
    fn test_zero_word_count_rejected() {
        let err = GenerationOptions::from_json(r#"{"wordCount":0}"#).unwrap_err();
        assert!(matches!(
            err,
            StoredOptionsError::Invalid(OptionsError::InvalidWordCount(0))
        ));
    }

    #[test]
    fn test_malformed_record() {
        assert!(matches!(
            GenerationOptions::from_json("not json"),
            Err(StoredOptionsError::Malformed(_))
        ));
        assert!(matches!(
            GenerationOptions::from_json(r#"{"wordCount":-1}"#),
            Err(StoredOptionsError::Malformed(_))
        ));
    }

    #[test]
    fn test_serialize_round_trip_names() {
        let json = serde_json::to_string(&GenerationOptions::default()).unwrap();
        assert!(json.contains("\"wordCount\":4"));
        assert!(json.contains("\"casing\":\"startCase\""));

        let back = GenerationOptions::from_json(&json).unwrap();
        assert_eq!(back, GenerationOptions::default());
    }

    #[test]
    fn test_sample_count() {
        let mut options = GenerationOptions::default();
        assert_eq!(options.sample_count(), 4);

        options.include_numbers = true;
        assert_eq!(options.sample_count(), 3);

        options.word_count = 1;
        assert_eq!(options.sample_count(), 0);
    }

    #[test]
    fn test_separator_and_limit() {
        let mut options = GenerationOptions::default();
        assert_eq!(options.separator(), " ");
        assert_eq!(options.max_length(), None);

        options.use_spaces = false;
        options.character_limit = true;
        assert_eq!(options.separator(), "");
        assert_eq!(options.max_length(), Some(CHARACTER_LIMIT));
    }

    #[test]
    fn test_apply_patch() {
        let mut options = GenerationOptions::default();
        let patch = OptionsPatch {
            word_count: Some(6),
            casing: Some(Casing::LowerCase),
            ..OptionsPatch::default()
        };

        assert!(!patch.is_empty());
        options.apply(&patch);

        assert_eq!(options.word_count, 6);
        assert_eq!(options.casing, Casing::LowerCase);
        assert!(options.use_spaces);
        assert!(OptionsPatch::default().is_empty());
    }
}
