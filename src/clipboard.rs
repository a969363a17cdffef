//! System clipboard access through the platform copy utility.
//!
//! - **macOS**: `pbcopy`
//! - **Windows**: `clip`
//! - **Linux/BSD**: `wl-copy`, then `xclip`, then `xsel`

use std::io::{self, Write};
use std::process::{Command, Stdio};

use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum ClipboardError {
    #[error("no clipboard utility found (tried {0})")]
    Unavailable(String),
    #[error("{program} failed: {source}")]
    Io {
        program: &'static str,
        #[source]
        source: io::Error,
    },
    #[error("{program} exited with {status}")]
    Exit {
        program: &'static str,
        status: std::process::ExitStatus,
    },
}

pub trait Clipboard {
    fn write_text(&mut self, text: &str) -> Result<(), ClipboardError>;
}

#[cfg(target_os = "macos")]
const CANDIDATES: &[(&str, &[&str])] = &[("pbcopy", &[])];

#[cfg(target_os = "windows")]
const CANDIDATES: &[(&str, &[&str])] = &[("clip", &[])];

#[cfg(not(any(target_os = "macos", target_os = "windows")))]
const CANDIDATES: &[(&str, &[&str])] = &[
    ("wl-copy", &[]),
    ("xclip", &["-selection", "clipboard"]),
    ("xsel", &["--clipboard", "--input"]),
];

#[derive(Debug, Default)]
pub struct SystemClipboard;

impl SystemClipboard {
    fn pipe(program: &'static str, args: &[&str], text: &str) -> Result<(), ClipboardError> {
        let mut child = Command::new(program)
            .args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|source| ClipboardError::Io { program, source })?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin
                .write_all(text.as_bytes())
                .map_err(|source| ClipboardError::Io { program, source })?;
        }

        let status = child
            .wait()
            .map_err(|source| ClipboardError::Io { program, source })?;

        if !status.success() {
            return Err(ClipboardError::Exit { program, status });
        }
        Ok(())
    }
}

impl Clipboard for SystemClipboard {
    fn write_text(&mut self, text: &str) -> Result<(), ClipboardError> {
        for &(program, args) in CANDIDATES {
            match Self::pipe(program, args, text) {
                Ok(()) => {
                    debug!(program, "Copied to clipboard");
                    return Ok(());
                }
                Err(ClipboardError::Io { source, .. })
                    if source.kind() == io::ErrorKind::NotFound =>
                {
                    debug!(program, "Clipboard utility not installed");
                }
                Err(e) => return Err(e),
            }
        }

        Err(ClipboardError::Unavailable(
            CANDIDATES
                .iter()
                .map(|&(program, _)| program)
                .collect::<Vec<_>>()
                .join(", "),
        ))
    }
}
