use regex::Regex;
use std::fmt;

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum SpecialChar {
    OpenSquareBracket,
    CloseSquareBracket,
    OpenBraceBracket,
    CloseBraceBracket,
    OpenRoundBracket,
    CloseRoundBracket,
    Quote,
    Backtick,
    Tilde,
    Caret,
    AtSign,
}

impl SpecialChar {
    pub fn as_char(self) -> char {
        use SpecialChar::*;
        match self {
            OpenSquareBracket => '[',
            CloseSquareBracket => ']',
            OpenBraceBracket => '{',
            CloseBraceBracket => '}',
            OpenRoundBracket => '(',
            CloseRoundBracket => ')',
            Quote => '\'',
            Backtick => '`',
            Tilde => '~',
            Caret => '^',
            AtSign => '@',
        }
    }
}

/// A single lexical token, borrowing from the source text.
///
/// String literals are kept exactly as written, surrounding quotes included,
/// so that a missing closing quote can be reported by the reader.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Token<'a> {
    SpliceUnquote,
    SpecialChar(SpecialChar),
    StringLiteral(&'a str),
    Comment(&'a str),
    PlainChars(&'a str),
}

impl fmt::Display for Token<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::SpliceUnquote => write!(f, "~@"),
            Token::SpecialChar(c) => write!(f, "{}", c.as_char()),
            Token::StringLiteral(s) => write!(f, "{}", s),
            Token::Comment(s) => write!(f, ";{}", s),
            Token::PlainChars(s) => write!(f, "{}", s),
        }
    }
}

#[derive(Debug)]
pub enum TokenizerError {
    NoCapture(String),
}

impl fmt::Display for TokenizerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenizerError::NoCapture(rest) => {
                write!(f, "tokenizer failed: no token found at {:?}", rest)
            }
        }
    }
}

fn create_token(captured: &str) -> Option<Token<'_>> {
    use SpecialChar::*;
    if captured == "~@" {
        return Some(Token::SpliceUnquote);
    }
    let token = match captured.as_bytes().first()? {
        b'~' => Token::SpecialChar(Tilde),
        b'[' => Token::SpecialChar(OpenSquareBracket),
        b'{' => Token::SpecialChar(OpenBraceBracket),
        b'(' => Token::SpecialChar(OpenRoundBracket),
        b']' => Token::SpecialChar(CloseSquareBracket),
        b'}' => Token::SpecialChar(CloseBraceBracket),
        b')' => Token::SpecialChar(CloseRoundBracket),
        b'\'' => Token::SpecialChar(Quote),
        b'`' => Token::SpecialChar(Backtick),
        b'^' => Token::SpecialChar(Caret),
        b'@' => Token::SpecialChar(AtSign),
        b'"' => Token::StringLiteral(captured),
        // ; is ASCII so slicing off the first byte is safe.
        b';' => Token::Comment(&captured[1..]),
        _ => Token::PlainChars(captured),
    };
    Some(token)
}

pub fn tokenize(input: &str) -> Result<Vec<Token<'_>>, TokenizerError> {
    lazy_static! {
        static ref TOKEN_RE: Regex = Regex::new(
            r#"(?x)                          # ignore whitespace in this pattern & allow comments
                [\s,]*                       # whitespace or commas, ignored
                (                            # token capture group
                    ~@                       # literal splice-unquote
                    |[\[\]{}()'`~^@]         # single special characters
                    |"(?:                    # string literal. its contents, not captured, include:
                        \\.                  #    escapes
                        |[^\\"]              #    anything which isn't a backslash or a quote
                      )*
                      "?                     #    possibly missing a closing quote
                    |;.*                     # comments
                    |[^\s\[\]{}('"`,;)]*     # zero or more plain characters
                )
                [\s,]*                       # whitespace or commas, ignored
            "#
        )
        .expect("token regex is valid");
    }
    let mut input = input;
    let mut tokens = Vec::new();
    while !input.is_empty() {
        let caps = TOKEN_RE
            .captures(input)
            .filter(|caps| caps.get(0).map_or(0, |m| m.end()) > 0)
            .ok_or_else(|| TokenizerError::NoCapture(String::from(input)))?;
        let whole = caps.get(0).map_or(0, |m| m.end());
        if let Some(token) = caps.get(1).and_then(|m| create_token(m.as_str())) {
            tokens.push(token);
        }
        input = &input[whole..];
    }
    log::trace!("tokenized into {} tokens", tokens.len());
    Ok(tokens)
}
