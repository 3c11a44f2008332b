//! Terminal rendering of suggestions

use crate::query::Suggestion;
use std::io::{self, Write};
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

/// Print suggestions one per line, `> ` prefixed.
///
/// Words are printed bold; continuation prefixes in cyan with a trailing
/// `...` to show there is more below them.
pub fn print_suggestions(suggestions: &[Suggestion], color: bool) -> io::Result<()> {
    let choice = if color {
        ColorChoice::Auto
    } else {
        ColorChoice::Never
    };
    let mut stdout = StandardStream::stdout(choice);
    write_suggestions(&mut stdout, suggestions)
}

/// Write suggestions to any color-capable writer
pub fn write_suggestions<W: WriteColor>(out: &mut W, suggestions: &[Suggestion]) -> io::Result<()> {
    for suggestion in suggestions {
        write!(out, "> ")?;
        match suggestion {
            Suggestion::Word(word) => {
                out.set_color(ColorSpec::new().set_bold(true))?;
                write!(out, "{}", word)?;
                out.reset()?;
            }
            Suggestion::Prefix(prefix) => {
                out.set_color(ColorSpec::new().set_fg(Some(Color::Cyan)))?;
                write!(out, "{}...", prefix)?;
                out.reset()?;
            }
        }
        writeln!(out)?;
    }
    Ok(())
}

/// Print plain words, one per line (for `expand`)
pub fn print_words(words: &[String]) -> io::Result<()> {
    let stdout = io::stdout();
    let mut lock = stdout.lock();
    for word in words {
        writeln!(lock, "{}", word)?;
    }
    lock.flush()
}
