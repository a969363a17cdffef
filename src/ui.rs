use anyhow::{Context, Result};
use console::{Key, Style, Term};
use unicode_normalization::UnicodeNormalization;

use crate::app::CopyStatus;
use crate::options::{CHARACTER_LIMIT, GenerationOptions};

pub const MIN_SAFE_ENTROPY: f64 = 44.0;
pub const STRONG_ENTROPY: f64 = 64.0;

pub const MIN_SAFE_WORD_COUNT: usize = 4;

pub struct Summary<'a> {
    pub options: &'a GenerationOptions,
    pub wordlist_label: &'static str,
    pub wordlist_size: usize,
    pub entropy: f64,
    pub edited: bool,
}

pub struct DisplayOptions {
    pub unicode_support: bool,
    pub color_support: bool,
    pub quiet: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Regenerate,
    Edit,
    Copy,
    Quit,
}

pub fn detect_unicode_support() -> bool {
    supports_unicode::on(supports_unicode::Stream::Stdout)
}

pub fn detect_color_support() -> bool {
    supports_color::on(supports_color::Stream::Stdout).is_some()
}

pub fn get_status_symbols(unicode_support: bool) -> (&'static str, &'static str) {
    if unicode_support {
        ("✓", "!")
    } else {
        ("+", "!")
    }
}

fn tree_glyphs(unicode_support: bool) -> (&'static str, &'static str) {
    if unicode_support {
        ("├─", "└─")
    } else {
        ("|-", "`-")
    }
}

fn status_style(options: &DisplayOptions, ok: bool) -> Style {
    if !options.color_support {
        Style::new()
    } else if ok {
        Style::new().green()
    } else {
        Style::new().yellow()
    }
}

fn plural<'a>(n: usize, one: &'a str, many: &'a str) -> &'a str {
    if n == 1 { one } else { many }
}

/// Trims and NFC-normalizes a manual edit.
pub fn normalize_and_validate(s: &str) -> Result<String> {
    let normalized: String = s.trim().nfc().collect();

    let control_chars: Vec<usize> = normalized
        .chars()
        .enumerate()
        .filter(|(_, c)| c.is_control())
        .map(|(pos, _)| pos)
        .collect();

    if !control_chars.is_empty() {
        anyhow::bail!(
            "Passphrase contains {} control character(s) at position(s): {}",
            control_chars.len(),
            control_chars
                .iter()
                .map(|pos| pos.to_string())
                .collect::<Vec<_>>()
                .join(", ")
        );
    }

    Ok(normalized)
}

pub fn display_output(text: &str, summary: &Summary, options: &DisplayOptions) {
    if options.quiet {
        println!("{}", text);
        return;
    }

    println!("Out[0]:\n{}\n", text);
    display_settings(summary, options);
    display_stats(text, summary, options);
}

fn display_settings(summary: &Summary, options: &DisplayOptions) {
    let (branch, last) = tree_glyphs(options.unicode_support);
    let opts = summary.options;

    println!("Settings:");
    println!(
        "  {} Wordlist   {} ({} {})",
        branch,
        summary.wordlist_label,
        summary.wordlist_size,
        plural(summary.wordlist_size, "word", "words")
    );
    println!(
        "  {} Numbers    {}",
        branch,
        if opts.include_numbers { "0-999" } else { "off" }
    );
    println!(
        "  {} Separator  {}",
        branch,
        if opts.use_spaces { "space" } else { "none" }
    );
    println!("  {} Casing     {}", branch, opts.casing.label());
    match opts.max_length() {
        Some(limit) => println!("  {} Limit      {} chars", last, limit),
        None => println!("  {} Limit      off", last),
    }
    println!();
}

fn display_stats(text: &str, summary: &Summary, options: &DisplayOptions) {
    let (check_ok, check_warn) = get_status_symbols(options.unicode_support);
    let (branch, last) = tree_glyphs(options.unicode_support);
    let opts = summary.options;

    let (entropy_ok, status_text) = if summary.entropy >= STRONG_ENTROPY {
        (true, "Strong")
    } else if summary.entropy >= MIN_SAFE_ENTROPY {
        (true, "Fair")
    } else {
        (false, "Weak")
    };
    let entropy_style = status_style(options, entropy_ok);
    let entropy_icon = if entropy_ok { check_ok } else { check_warn };

    let words_ok = opts.word_count >= MIN_SAFE_WORD_COUNT;
    let words_style = status_style(options, words_ok);

    let length = text.chars().count();
    let length_ok = opts.max_length().is_none_or(|limit| length <= limit);
    let length_style = status_style(options, length_ok);

    println!("Stats:");

    if summary.edited {
        println!("  {} Entropy    n/a (edited)", branch);
    } else {
        println!(
            "  {} Entropy    {} {}{} bits ({})",
            branch,
            entropy_style.apply_to(format!("[{}]", entropy_icon)),
            if opts.character_limit { "<=" } else { "" },
            entropy_style.apply_to(format!("{:.1}", summary.entropy)),
            entropy_style.apply_to(status_text)
        );
    }

    println!(
        "  {} Length     {} {} {}",
        branch,
        length_style.apply_to(format!("[{}]", if length_ok { check_ok } else { check_warn })),
        length_style.apply_to(length),
        plural(length, "char", "chars")
    );

    println!(
        "  {} Words      {} {} {}",
        last,
        words_style.apply_to(format!("[{}]", if words_ok { check_ok } else { check_warn })),
        words_style.apply_to(opts.word_count),
        plural(opts.word_count, "token", "tokens")
    );
}

pub fn display_copy_status(status: &CopyStatus, options: &DisplayOptions) {
    let (check_ok, check_warn) = get_status_symbols(options.unicode_support);

    match status {
        CopyStatus::Copied => {
            let style = status_style(options, true);
            eprintln!("{} Copied to clipboard", style.apply_to(format!("[{}]", check_ok)));
        }
        CopyStatus::Failed(e) => {
            let style = status_style(options, false);
            eprintln!(
                "{} Could not copy to clipboard: {}",
                style.apply_to(format!("[{}]", check_warn)),
                e
            );
        }
        CopyStatus::Skipped => {}
    }
}

pub fn display_error(message: &str, options: &DisplayOptions) {
    let (_, check_warn) = get_status_symbols(options.unicode_support);
    let style = status_style(options, false);
    eprintln!("{} {}", style.apply_to(format!("[{}]", check_warn)), message);
}

pub fn action_for_key(key: &Key) -> Option<Action> {
    match key {
        Key::Char('r') | Key::Char('R') | Key::Char(' ') => Some(Action::Regenerate),
        Key::Char('e') | Key::Char('E') => Some(Action::Edit),
        Key::Char('c') | Key::Char('C') | Key::Enter => Some(Action::Copy),
        Key::Char('q') | Key::Char('Q') | Key::Escape => Some(Action::Quit),
        _ => None,
    }
}

pub fn read_action(term: &Term) -> Result<Action> {
    term.write_str("[r]egenerate  [e]dit  [c]opy  [q]uit ")?;
    term.flush()?;

    loop {
        let key = term.read_key().context("Failed to read key")?;
        if let Some(action) = action_for_key(&key) {
            term.clear_line()?;
            return Ok(action);
        }
    }
}

/// `None` when the edit is empty.
pub fn prompt_edit(term: &Term, current: &str) -> Result<Option<String>> {
    term.write_str("Edit: ")?;
    let input = term
        .read_line_initial_text(current)
        .context("Failed to read edited passphrase")?;

    let normalized = normalize_and_validate(&input)?;
    Ok((!normalized.is_empty()).then_some(normalized))
}

/// Warns when even the shortest words overflow the character limit.
pub fn limit_hint(options: &GenerationOptions) -> Option<String> {
    if !options.character_limit {
        return None;
    }

    let separators = options.separator().len() * options.word_count.saturating_sub(1);
    let min_len = 3 * options.word_count + separators;
    (min_len > CHARACTER_LIMIT).then(|| {
        format!(
            "{} tokens rarely fit in {} characters; try fewer words or --no-limit",
            options.word_count, CHARACTER_LIMIT
        )
    })
}
