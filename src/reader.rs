use crate::strings::{self, BuildError};
use crate::tokens::{tokenize, SpecialChar, Token, TokenizerError};
use crate::types::{MalInt, MalObject};
use regex::Regex;
use std::fmt;
use std::iter::Peekable;
use std::slice;

type Reader<'a> = Peekable<slice::Iter<'a, Token<'a>>>;

/// How many forms may be open at once: containers and reader macros alike.
pub const MAX_NESTING: usize = 512;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delimiter {
    Round,
    Square,
    Brace,
}

impl Delimiter {
    fn closer(self) -> SpecialChar {
        match self {
            Delimiter::Round => SpecialChar::CloseRoundBracket,
            Delimiter::Square => SpecialChar::CloseSquareBracket,
            Delimiter::Brace => SpecialChar::CloseBraceBracket,
        }
    }

    fn describe(self) -> &'static str {
        match self {
            Delimiter::Round => "list",
            Delimiter::Square => "vector",
            Delimiter::Brace => "hashmap",
        }
    }

    fn wrap(self, elements: Vec<MalObject>) -> MalObject {
        match self {
            Delimiter::Round => MalObject::wrap_list(elements),
            Delimiter::Square => MalObject::wrap_vector(elements),
            Delimiter::Brace => MalObject::wrap_map(elements),
        }
    }
}

// The bracket a token opens (true) or closes (false), if any.
fn bracket(token: &Token) -> Option<(Delimiter, bool)> {
    use SpecialChar::*;
    match token {
        Token::SpecialChar(c) => match c {
            OpenRoundBracket => Some((Delimiter::Round, true)),
            OpenSquareBracket => Some((Delimiter::Square, true)),
            OpenBraceBracket => Some((Delimiter::Brace, true)),
            CloseRoundBracket => Some((Delimiter::Round, false)),
            CloseSquareBracket => Some((Delimiter::Square, false)),
            CloseBraceBracket => Some((Delimiter::Brace, false)),
            Quote | Backtick | Tilde | Caret | AtSign => None,
        },
        _ => None,
    }
}

#[derive(Debug)]
pub enum Error {
    Tokenizer(TokenizerError),
    NoMoreTokens,
    Unclosed(Delimiter),
    UnexpectedCloser(Delimiter),
    UnexpectedComment,
    UnbalancedString,
    BadEscape(BuildError),
    BadInteger(String),
    MissingForm(&'static str),
    TooDeep,
}

impl Error {
    /// True when the input ran out before a complete form was read.
    pub fn is_eof(&self) -> bool {
        match self {
            Error::NoMoreTokens | Error::Unclosed(_) | Error::MissingForm(_) => true,
            _ => false,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Tokenizer(e) => write!(f, "{}", e),
            Error::NoMoreTokens => write!(f, "EOF: no input to read"),
            Error::Unclosed(d) => write!(f, "EOF: unbalanced {}", d.describe()),
            Error::UnexpectedCloser(d) => write!(
                f,
                "unexpected '{}' where a form was expected",
                d.closer().as_char()
            ),
            Error::UnexpectedComment => write!(f, "unexpected comment where a form was expected"),
            Error::UnbalancedString => write!(f, "unbalanced quotes in string literal"),
            Error::BadEscape(e) => write!(f, "{}", e),
            Error::BadInteger(token) => write!(f, "cannot read {} as an integer", token),
            Error::MissingForm(context) => write!(f, "EOF: missing form for {}", context),
            Error::TooDeep => write!(f, "forms nested deeper than {}", MAX_NESTING),
        }
    }
}

pub type Result<T = MalObject> = std::result::Result<T, Error>;

/// A form that has been started but not finished.
enum Frame {
    Sequence(Delimiter, Vec<MalObject>),
    Macro(&'static str),
    // ^meta value: waiting for the metadata, then for the value.
    Metadata,
    MetaValue(MalObject),
}

/// Read the first complete form from `input`. Anything after it is ignored.
pub fn read_str(input: &str) -> Result {
    let tokens = tokenize(input).map_err(Error::Tokenizer)?;
    let mut reader = tokens.iter().peekable();
    let form = read_form(&mut reader)?;
    if reader.peek().is_some() {
        log::trace!("read_str ignoring {} trailing tokens", reader.len());
    }
    log::debug!("read {:?}", form);
    Ok(form)
}

// Nesting lives in `pending` rather than on the call stack, so arbitrarily
// deep input can't overflow it.
fn read_form(reader: &mut Reader) -> Result {
    let mut pending: Vec<Frame> = Vec::new();
    loop {
        let token = match reader.peek() {
            Some(token) => **token,
            None => return Err(eof_error(&pending)),
        };
        let form = match read_token(&token, &mut pending) {
            Ok(form) => form,
            Err(e) => return Err(settle(reader, &pending, e)),
        };
        reader.next();
        if let Some(done) = form.and_then(|form| attach(&mut pending, form)) {
            return Ok(done);
        }
    }
}

// A complete form, or None when `token` opened a new frame.
fn read_token(token: &Token, pending: &mut Vec<Frame>) -> Result<Option<MalObject>> {
    use SpecialChar::*;
    let frame = match token {
        Token::SpecialChar(c) => match c {
            OpenRoundBracket => Frame::Sequence(Delimiter::Round, Vec::new()),
            OpenSquareBracket => Frame::Sequence(Delimiter::Square, Vec::new()),
            OpenBraceBracket => Frame::Sequence(Delimiter::Brace, Vec::new()),
            CloseRoundBracket => return close(pending, Delimiter::Round).map(Some),
            CloseSquareBracket => return close(pending, Delimiter::Square).map(Some),
            CloseBraceBracket => return close(pending, Delimiter::Brace).map(Some),
            Quote => Frame::Macro("quote"),
            Backtick => Frame::Macro("quasiquote"),
            Tilde => Frame::Macro("unquote"),
            AtSign => Frame::Macro("deref"),
            Caret => Frame::Metadata,
        },
        Token::SpliceUnquote => Frame::Macro("splice-unquote"),
        Token::Comment(_) => return Err(Error::UnexpectedComment),
        Token::StringLiteral(literal) => return read_string(literal).map(Some),
        Token::PlainChars(chars) => return read_atom(chars).map(Some),
    };
    if pending.len() >= MAX_NESTING {
        return Err(Error::TooDeep);
    }
    pending.push(frame);
    Ok(None)
}

fn close(pending: &mut Vec<Frame>, closing: Delimiter) -> Result {
    match pending.pop() {
        Some(Frame::Sequence(delimiter, elements)) if delimiter == closing => {
            Ok(delimiter.wrap(elements))
        }
        frame => {
            pending.extend(frame);
            Err(Error::UnexpectedCloser(closing))
        }
    }
}

// Hand a finished form to the innermost pending frame, finishing reader macros
// on the way. Returns the top-level form once nothing is pending.
fn attach(pending: &mut Vec<Frame>, mut form: MalObject) -> Option<MalObject> {
    while let Some(frame) = pending.pop() {
        form = match frame {
            Frame::Sequence(delimiter, mut elements) => {
                elements.push(form);
                pending.push(Frame::Sequence(delimiter, elements));
                return None;
            }
            Frame::Macro(name) => MalObject::wrap_list(vec![MalObject::new_symbol(name), form]),
            Frame::Metadata => {
                pending.push(Frame::MetaValue(form));
                return None;
            }
            // ^meta value becomes (with-meta value meta).
            Frame::MetaValue(meta) => MalObject::wrap_list(vec![
                MalObject::new_symbol("with-meta"),
                form,
                meta,
            ]),
        };
    }
    Some(form)
}

fn eof_error(pending: &[Frame]) -> Error {
    match pending.last() {
        None => Error::NoMoreTokens,
        Some(Frame::Sequence(delimiter, _)) => Error::Unclosed(*delimiter),
        Some(Frame::Macro(name)) => Error::MissingForm(*name),
        Some(Frame::Metadata) => Error::MissingForm("with-meta metadata"),
        Some(Frame::MetaValue(_)) => Error::MissingForm("with-meta value"),
    }
}

// A failure inside an open container stands only if the rest of the input
// closes that container. Input that runs out first is reported as unclosed.
// The offending token is still unconsumed and is scanned like the rest.
fn settle(reader: &mut Reader, pending: &[Frame], error: Error) -> Error {
    let mut open: Vec<Delimiter> = pending
        .iter()
        .filter_map(|frame| match frame {
            Frame::Sequence(delimiter, _) => Some(*delimiter),
            _ => None,
        })
        .collect();
    if open.is_empty() {
        return error;
    }
    for token in reader {
        match bracket(token) {
            Some((delimiter, true)) => open.push(delimiter),
            Some((delimiter, false)) if open.last() == Some(&delimiter) => {
                open.pop();
                if open.is_empty() {
                    return error;
                }
            }
            _ => {}
        }
    }
    match open.last() {
        Some(delimiter) => {
            log::debug!("input ended inside a {}, dropping {}", delimiter.describe(), error);
            Error::Unclosed(*delimiter)
        }
        None => error,
    }
}

fn read_string(literal: &str) -> Result {
    if literal.len() < 2 || !literal.ends_with('"') {
        return Err(Error::UnbalancedString);
    }
    strings::build_string(&literal[1..literal.len() - 1])
        .map(MalObject::String)
        .map_err(Error::BadEscape)
}

fn read_atom(chars: &str) -> Result {
    lazy_static! {
        static ref NUMBER_RE: Regex =
            Regex::new(r"^[+-]?([0-9]+(\.[0-9]*)?|\.[0-9]+)$").expect("number regex is valid");
    }
    if NUMBER_RE.is_match(chars) {
        // Fractional literals match the grammar but are not integers.
        return chars
            .parse::<MalInt>()
            .map(MalObject::Integer)
            .map_err(|_| Error::BadInteger(String::from(chars)));
    }
    match chars.strip_prefix(':') {
        Some(name) => Ok(MalObject::new_keyword(name)),
        None => Ok(MalObject::new_symbol(chars)),
    }
}
