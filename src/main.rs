use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, ValueEnum};
use console::Term;
use tracing::info;
use tracing_subscriber::EnvFilter;

use passphrase::app::{App, AppError};
use passphrase::clipboard::{Clipboard, SystemClipboard};
use passphrase::store::{FileStore, OptionsStore};
use passphrase::ui::{self, Action, DisplayOptions, Summary};
use passphrase::{Casing, KeystreamRng, OptionsPatch, load_wordlist};

#[derive(Parser)]
#[command(
    name = "passphrase",
    version,
    author,
    about = "Instantly generate secure, memorable passphrases"
)]
struct Cli {
    /// Tokens in the passphrase, the number included
    #[arg(short, long, value_name = "N")]
    words: Option<usize>,

    /// Put a number between 0 and 999 somewhere in the phrase
    #[arg(short = 'n', long, overrides_with = "no_numbers")]
    numbers: bool,

    #[arg(long, overrides_with = "numbers")]
    no_numbers: bool,

    /// Separate tokens with spaces
    #[arg(long, overrides_with = "no_spaces")]
    spaces: bool,

    #[arg(long, overrides_with = "spaces")]
    no_spaces: bool,

    /// Keep the phrase within 20 characters
    #[arg(short = 'l', long, overrides_with = "no_limit")]
    limit: bool,

    #[arg(long, overrides_with = "limit")]
    no_limit: bool,

    #[arg(short, long, value_enum)]
    casing: Option<CasingArg>,

    /// Derive the randomness from TEXT; same seed, same phrase
    #[arg(long, value_name = "TEXT", env = "PASSPHRASE_SEED", hide_env_values = true)]
    seed: Option<String>,

    /// Use (and remember) a custom wordlist, one word per line
    #[arg(long, value_name = "FILE", conflicts_with = "default_wordlist")]
    wordlist: Option<PathBuf>,

    /// Forget any remembered custom wordlist
    #[arg(long)]
    default_wordlist: bool,

    /// Do not copy to the clipboard
    #[arg(long)]
    no_copy: bool,

    /// Keep the phrase open for regeneration and editing
    #[arg(short, long)]
    interactive: bool,

    /// Print the phrase only
    #[arg(short, long, conflicts_with = "interactive")]
    quiet: bool,

    /// Remember the effective options
    #[arg(long)]
    save: bool,

    /// Settings directory
    #[arg(long, value_name = "DIR", env = "PASSPHRASE_HOME")]
    home: Option<PathBuf>,

    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
#[value(rename_all = "lowercase")]
enum CasingArg {
    Upper,
    Lower,
    Start,
}

impl From<CasingArg> for Casing {
    fn from(arg: CasingArg) -> Self {
        match arg {
            CasingArg::Upper => Casing::UpperCase,
            CasingArg::Lower => Casing::LowerCase,
            CasingArg::Start => Casing::StartCase,
        }
    }
}

fn flag(yes: bool, no: bool) -> Option<bool> {
    match (yes, no) {
        (true, _) => Some(true),
        (_, true) => Some(false),
        _ => None,
    }
}

impl Cli {
    fn patch(&self) -> OptionsPatch {
        OptionsPatch {
            word_count: self.words,
            include_numbers: flag(self.numbers, self.no_numbers),
            use_spaces: flag(self.spaces, self.no_spaces),
            character_limit: flag(self.limit, self.no_limit),
            casing: self.casing.map(Casing::from),
        }
    }
}

fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };

    let filter =
        EnvFilter::try_from_env("PASSPHRASE_LOG").unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn show<S: OptionsStore, C: Clipboard>(app: &App<S, C>, display: &DisplayOptions) {
    let summary = Summary {
        options: app.options(),
        wordlist_label: app.wordlist().label(),
        wordlist_size: app.wordlist().len(),
        entropy: app.entropy_bits(),
        edited: app.phrase().is_none(),
    };
    ui::display_output(app.text(), &summary, display);
}

fn run_interactive<S: OptionsStore, C: Clipboard>(
    app: &mut App<S, C>,
    rng: &mut KeystreamRng,
    display: &DisplayOptions,
) -> Result<()> {
    let term = Term::stdout();

    loop {
        println!();
        match ui::read_action(&term)? {
            Action::Regenerate => match app.generate(rng) {
                Ok(status) => {
                    show(app, display);
                    ui::display_copy_status(&status, display);
                }
                Err(e) => ui::display_error(&e.to_string(), display),
            },
            Action::Edit => match ui::prompt_edit(&term, app.text()) {
                Ok(Some(text)) => {
                    let status = app.edit(&text);
                    show(app, display);
                    ui::display_copy_status(&status, display);
                }
                Ok(None) => ui::display_error("Passphrase cannot be empty", display),
                Err(e) => ui::display_error(&e.to_string(), display),
            },
            Action::Copy => ui::display_copy_status(&app.copy(), display),
            Action::Quit => return Ok(()),
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let display = DisplayOptions {
        unicode_support: ui::detect_unicode_support(),
        color_support: ui::detect_color_support(),
        quiet: cli.quiet,
    };

    let dir = cli.home.clone().unwrap_or_else(FileStore::default_dir);
    let store = FileStore::new(&dir);
    let options_path = store.options_path();

    // An explicit word count replaces whatever the stored record says.
    let mut app = App::open(store, SystemClipboard, cli.words.is_some()).with_context(|| {
        format!(
            "Failed to restore settings from {}; fix or delete it, or rerun with --words N --save",
            options_path.display()
        )
    })?;

    app.set_auto_copy(!cli.no_copy);
    app.set_persist(cli.save);

    if let Some(path) = &cli.wordlist {
        let words = load_wordlist(path)?;
        app.use_wordlist(words)
            .context("Failed to remember custom wordlist")?;
    } else if cli.default_wordlist {
        app.use_default_wordlist()
            .context("Failed to forget custom wordlist")?;
    }

    let patch = cli.patch();
    if !patch.is_empty() || cli.save {
        app.options_changed(&patch).context("Invalid options")?;
    }

    if !cli.quiet {
        if let Some(hint) = ui::limit_hint(app.options()) {
            ui::display_error(&hint, &display);
        }
    }

    let mut rng = match &cli.seed {
        Some(seed) => {
            info!("Using seeded randomness");
            KeystreamRng::from_seed(seed)
        }
        None => KeystreamRng::from_entropy(),
    };

    let status = app.generate(&mut rng).map_err(|e| match e {
        AppError::Generate(e) => anyhow::Error::new(e).context("Failed to generate passphrase"),
        other => other.into(),
    })?;

    show(&app, &display);
    if !cli.quiet {
        ui::display_copy_status(&status, &display);
    }

    if cli.interactive {
        run_interactive(&mut app, &mut rng, &display)?;
    }

    Ok(())
}
