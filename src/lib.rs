pub mod app;
pub mod clipboard;
pub mod generator;
pub mod options;
pub mod rng;
pub mod store;
pub mod ui;
pub mod wordlist;

pub use generator::{GenerateError, GeneratedPhrase, Token, generate, generate_with_attempts};
pub use options::{Casing, GenerationOptions, OptionsPatch};
pub use rng::{KeystreamRng, RandomSource};
pub use wordlist::{get_wordlist, load_wordlist, wordlist_size};
