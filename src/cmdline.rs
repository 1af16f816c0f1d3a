use crate::environment::SymbolResolution;
use ansi_term::Colour::Red;
use linefeed::{DefaultTerminal, Interface, ReadResult, Terminal};
use std::fmt;
use std::path::PathBuf;

#[derive(Debug)]
pub enum Error {
    Io(std::io::Error),
    UnknownArgument(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Io(e) => write!(f, "io error: {}", e),
            Error::UnknownArgument(arg) => {
                write!(f, "unknown argument {:?}\nusage: [--strict]", arg)
            }
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Options {
    pub resolution: SymbolResolution,
}

impl Options {
    /// Parse the arguments that follow the program name.
    pub fn from_args<I>(args: I) -> Result<Self, Error>
    where
        I: IntoIterator<Item = String>,
    {
        let mut options = Options::default();
        for arg in args {
            match arg.as_str() {
                "--strict" => options.resolution = SymbolResolution::Strict,
                _ => return Err(Error::UnknownArgument(arg)),
            }
        }
        Ok(options)
    }
}

pub fn setup() -> std::io::Result<Interface<DefaultTerminal>> {
    let interface = linefeed::Interface::new("mal")?;
    interface.set_prompt("user> ")?;
    if let Some(path) = history_path() {
        interface.load_history(path).ok();
    };
    Ok(interface)
}

fn history_path() -> Option<PathBuf> {
    dirs::data_dir().map(|mut path| {
        path.push(".mal_history");
        path
    })
}

pub fn save_history<T: Terminal>(interface: &Interface<T>) -> std::io::Result<()> {
    match history_path() {
        Some(path) => interface.save_history(path),
        None => Ok(()),
    }
}

fn show_error<T: Terminal>(interface: &Interface<T>, error: &impl fmt::Display) {
    let message = format!("Error: {}", error);
    if atty::is(atty::Stream::Stdout) {
        writeln!(interface, "{}", Red.paint(message)).ok();
    } else {
        writeln!(interface, "{}", message).ok();
    }
}

/// Feed each line to `processor` until EOF, printing what it returns.
/// A failed line is reported and the loop carries on.
pub fn repl<T, F, E>(interface: &Interface<T>, mut processor: F)
where
    T: Terminal,
    F: FnMut(&str) -> Result<String, E>,
    E: fmt::Display,
{
    loop {
        match interface.read_line() {
            Ok(ReadResult::Eof) => break,
            Ok(ReadResult::Signal(sig)) => {
                writeln!(interface, "Received signal {:?}", sig).ok();
            }
            Ok(ReadResult::Input(line)) => {
                if line.trim().is_empty() {
                    continue;
                }
                interface.add_history_unique(line.clone());
                match processor(&line) {
                    Ok(output) => {
                        writeln!(interface, "{}", output).ok();
                    }
                    Err(e) => show_error(interface, &e),
                }
            }
            Err(e) => {
                show_error(interface, &e);
                break;
            }
        }
    }
}

pub fn run<F, E>(processor: F) -> Result<(), Error>
where
    F: FnMut(&str) -> Result<String, E>,
    E: fmt::Display,
{
    let interface = setup()?;
    repl(&interface, processor);
    save_history(&interface)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Options, Error> {
        Options::from_args(args.iter().map(|s| s.to_string()))
    }

    #[test]
    fn defaults_to_permissive() {
        assert_eq!(
            parse(&[]).unwrap().resolution,
            SymbolResolution::Permissive
        );
    }

    #[test]
    fn strict_flag() {
        assert_eq!(
            parse(&["--strict"]).unwrap().resolution,
            SymbolResolution::Strict
        );
    }

    #[test]
    fn unknown_arguments_are_rejected() {
        assert!(matches!(
            parse(&["--lenient"]),
            Err(Error::UnknownArgument(arg)) if arg == "--lenient"
        ));
    }
}
