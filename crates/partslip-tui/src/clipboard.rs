//! Clipboard writes through the terminal.
//!
//! Uses the OSC 52 escape sequence, which most modern terminal emulators
//! (and tmux with `set-clipboard on`) forward to the system clipboard. Works
//! over SSH without any platform clipboard library.

use std::io::{self, Write};

use base64::{engine::general_purpose::STANDARD, Engine as _};

/// Build the OSC 52 "set clipboard" sequence for `text`.
pub fn osc52_sequence(text: &str) -> String {
    format!("\x1b]52;c;{}\x07", STANDARD.encode(text))
}

pub fn copy_to_clipboard(out: &mut impl Write, text: &str) -> io::Result<()> {
    out.write_all(osc52_sequence(text).as_bytes())?;
    out.flush()
}
