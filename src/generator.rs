use std::collections::HashSet;

use thiserror::Error;
use tracing::debug;
use zeroize::Zeroizing;

use crate::options::{GenerationOptions, MAX_NUMBER};
use crate::rng::RandomSource;

/// Candidates drawn before giving up on the character limit.
pub const MAX_ATTEMPTS: usize = 10_000;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum GenerateError {
    #[error("invalid options: word count must be at least 1, got {word_count}")]
    InvalidOptions { word_count: usize },
    #[error("wordlist has {available} distinct words, {requested} requested")]
    InsufficientWordlist { requested: usize, available: usize },
    #[error("no passphrase of at most {limit} characters found in {attempts} attempts")]
    GenerationFailed { attempts: usize, limit: usize },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    Word(String),
    Number(u16),
}

impl Token {
    pub fn as_text(&self) -> std::borrow::Cow<'_, str> {
        match self {
            Self::Word(word) => word.as_str().into(),
            Self::Number(n) => n.to_string().into(),
        }
    }

    pub fn is_number(&self) -> bool {
        matches!(self, Self::Number(_))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedPhrase {
    pub tokens: Vec<Token>,
    pub joined: Zeroizing<String>,
}

impl GeneratedPhrase {
    pub fn len(&self) -> usize {
        self.joined.chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.joined.is_empty()
    }
}

/// Generates a passphrase with the default retry cap.
pub fn generate<S, R>(
    wordlist: &[S],
    options: &GenerationOptions,
    rng: &mut R,
) -> Result<GeneratedPhrase, GenerateError>
where
    S: AsRef<str>,
    R: RandomSource,
{
    generate_with_attempts(wordlist, options, rng, MAX_ATTEMPTS)
}

/// Rejection-samples candidates until one fits the character limit.
///
/// Casing is applied before the length check so the accepted phrase is the
/// one that was measured. Length is counted in characters.
pub fn generate_with_attempts<S, R>(
    wordlist: &[S],
    options: &GenerationOptions,
    rng: &mut R,
    max_attempts: usize,
) -> Result<GeneratedPhrase, GenerateError>
where
    S: AsRef<str>,
    R: RandomSource,
{
    if options.word_count < 1 {
        return Err(GenerateError::InvalidOptions {
            word_count: options.word_count,
        });
    }

    let words = distinct_words(wordlist);
    let sample_count = options.sample_count();

    if words.is_empty() || sample_count > words.len() {
        return Err(GenerateError::InsufficientWordlist {
            requested: sample_count,
            available: words.len(),
        });
    }

    let separator = options.separator();
    let limit = options.max_length();

    for attempt in 1..=max_attempts.max(1) {
        let number = options
            .include_numbers
            .then(|| rng.uniform_int(0, MAX_NUMBER) as u16);

        let mut tokens: Vec<Token> = rng
            .sample_distinct(&words, sample_count)
            .into_iter()
            .map(|word| Token::Word(options.casing.apply(word)))
            .collect();

        if let Some(n) = number {
            let index = rng.uniform_int(0, tokens.len());
            tokens.insert(index, Token::Number(n));
        }

        let joined = Zeroizing::new(join(&tokens, separator));

        match limit {
            Some(max) if joined.chars().count() > max => continue,
            _ => {
                debug!(attempt, tokens = tokens.len(), "Passphrase accepted");
                return Ok(GeneratedPhrase { tokens, joined });
            }
        }
    }

    debug!(max_attempts, "Character limit never satisfied");
    Err(GenerateError::GenerationFailed {
        attempts: max_attempts.max(1),
        limit: limit.unwrap_or(usize::MAX),
    })
}

/// Entropy of an unconstrained draw, in bits.
///
/// Counts ordered samples of distinct words, plus the number and its
/// position. The character limit only removes candidates, so with it
/// enabled this is an upper bound.
pub fn entropy_bits(wordlist_len: usize, options: &GenerationOptions) -> f64 {
    let sample_count = options.sample_count();
    if sample_count > wordlist_len {
        return 0.0;
    }

    let words: f64 = (0..sample_count)
        .map(|i| ((wordlist_len - i) as f64).log2())
        .sum();

    if options.include_numbers {
        words + ((MAX_NUMBER + 1) as f64).log2() + ((sample_count + 1) as f64).log2()
    } else {
        words
    }
}

fn distinct_words<S: AsRef<str>>(wordlist: &[S]) -> Vec<&str> {
    let mut seen = HashSet::with_capacity(wordlist.len());
    wordlist
        .iter()
        .map(|word| word.as_ref())
        .filter(|word| seen.insert(*word))
        .collect()
}

fn join(tokens: &[Token], separator: &str) -> String {
    tokens
        .iter()
        .map(Token::as_text)
        .collect::<Vec<_>>()
        .join(separator)
}
