// This file is part of Passphrase.
//
// Copyright (c) 2025  René Coignard <contact@renecoignard.com>
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

use std::collections::HashSet;
use std::path::Path;
use std::sync::OnceLock;

use thiserror::Error;
use unicode_normalization::UnicodeNormalization;

const WORDLIST_DATA: &str = include_str!("../assets/wordlist.txt");

const DEFAULT_WORDLIST_SIZE: usize = 438;

#[cfg(test)]
const EXPECTED_SHA256: &str = "6ee3ef47ea7d1c2ad005906ef65c8cedead6169c08e5c274f1306b828598f184";

static WORDLIST: OnceLock<Vec<&'static str>> = OnceLock::new();

#[derive(Debug, Error)]
pub enum WordlistError {
    #[error("failed to read wordlist {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("wordlist contains no words")]
    Empty,
}

/// The embedded default dictionary.
pub fn get_wordlist() -> &'static [&'static str] {
    WORDLIST.get_or_init(|| {
        let words: Vec<&'static str> = WORDLIST_DATA.lines().filter_map(entry).collect();

        debug_assert_eq!(
            words.len(),
            DEFAULT_WORDLIST_SIZE,
            "Wordlist must contain exactly {} words",
            DEFAULT_WORDLIST_SIZE
        );
        words
    })
}

pub fn wordlist_size() -> usize {
    get_wordlist().len()
}

/// Extracts the word from `word` or `<dice index><whitespace><word>` lines.
///
/// The first field is only treated as an index when it is all ASCII digits.
fn entry(line: &str) -> Option<&str> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return None;
    }

    let word = match line.split_once(char::is_whitespace) {
        Some((index, word)) if index.bytes().all(|b| b.is_ascii_digit()) => word.trim(),
        _ => line,
    };

    (!word.is_empty()).then_some(word)
}

/// Renders `words` as indexed lines that [`parse_wordlist`] reads back unchanged.
pub fn format_wordlist(words: &[String]) -> String {
    words
        .iter()
        .enumerate()
        .map(|(i, word)| format!("{}\t{}\n", i + 1, word))
        .collect()
}

/// Parses a user-supplied list: NFC-normalized, first occurrence wins.
pub fn parse_wordlist(text: &str) -> Result<Vec<String>, WordlistError> {
    let mut seen = HashSet::new();
    let words: Vec<String> = text
        .lines()
        .filter_map(entry)
        .map(|word| word.nfc().collect::<String>())
        .filter(|word| seen.insert(word.clone()))
        .collect();

    if words.is_empty() {
        return Err(WordlistError::Empty);
    }
    Ok(words)
}

pub fn load_wordlist(path: &Path) -> Result<Vec<String>, WordlistError> {
    let text = std::fs::read_to_string(path).map_err(|source| WordlistError::Read {
        path: path.display().to_string(),
        source,
    })?;
    parse_wordlist(&text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use sha2::{Digest, Sha256};

    #[test]
    fn test_wordlist_loaded() {
        assert_eq!(get_wordlist().len(), DEFAULT_WORDLIST_SIZE);
        assert_eq!(wordlist_size(), DEFAULT_WORDLIST_SIZE);
    }

    #[test]
    fn test_wordlist_no_duplicates() {
        let words = get_wordlist();
        let unique: HashSet<_> = words.iter().collect();
        assert_eq!(unique.len(), words.len(), "Wordlist contains duplicates");
    }

    #[test]
    fn test_wordlist_integrity() {
        let words = get_wordlist();

        assert_eq!(words[0], "able", "First word should be \"able\"");

        assert_eq!(words[437], "zip", "Last word should be \"zip\"");

        assert_eq!(words[99], "chimney", "Word at line 100 should be \"chimney\"");

        for (i, word) in words.iter().enumerate() {
            assert!(
                word.chars().all(|c| c.is_ascii_lowercase()),
                "Word at index {} (\"{}\") contains invalid characters",
                i,
                word
            );
            assert!(
                word.len() >= 3 && word.len() <= 8,
                "Word at index {} (\"{}\") has invalid length {}",
                i,
                word,
                word.len()
            )
        }
    }

    #[test]
    fn test_wordlist_has_short_words() {
        let short = get_wordlist().iter().filter(|w| w.len() <= 4).count();
        assert!(short >= 100, "Only {} short words", short);
    }

    #[test]
    fn test_wordlist_sha256() {
        let mut hasher = Sha256::new();
        hasher.update(WORDLIST_DATA.as_bytes());
        let result = format!("{:x}", hasher.finalize());

        assert_eq!(
            result, EXPECTED_SHA256,
            "Wordlist SHA-256 mismatch; file may be corrupted"
        );
    }

    #[test]
    fn test_parse_dice_format() {
        let words = parse_wordlist("11111\tabacus\n11112 abdomen\n\n# comment\nzoom\n").unwrap();
        assert_eq!(words, ["abacus", "abdomen", "zoom"]);
    }

    #[test]
    fn test_parse_index_must_be_numeric() {
        let words = parse_wordlist("apple 12\nbanana 7\ncherry 12\n1 new york\n").unwrap();
        assert_eq!(words, ["apple 12", "banana 7", "cherry 12", "new york"]);
    }

    #[test]
    fn test_format_parses_back_unchanged() {
        let words: Vec<String> = ["new york", "#red", "12", "apple 12", "1 2 3"]
            .iter()
            .map(|s| s.to_string())
            .collect();

        assert_eq!(parse_wordlist(&format_wordlist(&words)).unwrap(), words);
    }

    #[test]
    fn test_parse_dedup_keeps_first() {
        let words = parse_wordlist("pear\nplum\npear\n  plum  \nfig").unwrap();
        assert_eq!(words, ["pear", "plum", "fig"]);
    }

    #[test]
    fn test_parse_normalizes() {
        let words = parse_wordlist("caf\u{00e9}\ncafe\u{0301}\n").unwrap();
        assert_eq!(words, ["caf\u{00e9}"]);
    }

    #[test]
    fn test_parse_empty() {
        assert!(matches!(parse_wordlist(""), Err(WordlistError::Empty)));
        assert!(matches!(
            parse_wordlist("\n  \n# only comments\n"),
            Err(WordlistError::Empty)
        ));
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_wordlist(&dir.path().join("missing.txt")).unwrap_err();
        assert!(matches!(err, WordlistError::Read { .. }));
        assert!(err.to_string().contains("missing.txt"));
    }

    #[test]
    fn test_load_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("words.txt");
        std::fs::write(&path, "alpha\nbravo\ncharlie\n").unwrap();

        assert_eq!(load_wordlist(&path).unwrap(), ["alpha", "bravo", "charlie"]);
    }
}
