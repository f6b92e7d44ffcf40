//! Nom-based line tokenizer.
//!
//! Splits one IRC line into tags, source, command and parameters:
//!
//! ```text
//! [@tags] [:source] <command> [params...] [:trailing]
//! ```

use nom::{
    IResult,
    bytes::complete::{take_until, take_while1},
    character::complete::{char, space0},
    combinator::opt,
    error::ErrorKind,
    sequence::preceded,
};
use smallvec::SmallVec;

/// Parse IRCv3 message tags (the part after `@` and before the first space).
fn parse_tags(input: &str) -> IResult<&str, &str> {
    preceded(char('@'), take_until(" "))(input)
}

/// Parse the message source (the part after `:` and before the first space).
fn parse_source(input: &str) -> IResult<&str, &str> {
    preceded(char(':'), take_while1(|c: char| c != ' '))(input)
}

/// Parse the command name (1*letter or 3digit).
fn parse_command(input: &str) -> IResult<&str, &str> {
    let (rest, cmd) = take_while1(|c: char| c.is_ascii_alphanumeric())(input)?;

    let is_all_letters = cmd.chars().all(|c| c.is_ascii_alphabetic());
    let is_three_digits = cmd.len() == 3 && cmd.chars().all(|c| c.is_ascii_digit());

    if is_all_letters || is_three_digits {
        Ok((rest, cmd))
    } else {
        Err(nom::Err::Error(nom::error::Error::new(
            input,
            ErrorKind::AlphaNumeric,
        )))
    }
}

/// Split parameters, treating runs of spaces as one separator.
///
/// A parameter starting with `:` is the trailing parameter and runs to the
/// end of the line, spaces included.
fn parse_params(input: &str) -> SmallVec<[&str; 15]> {
    let mut params: SmallVec<[&str; 15]> = SmallVec::new();
    let mut rest = input;

    while rest.starts_with(' ') {
        rest = rest.trim_start_matches(' ');
        if rest.is_empty() {
            break;
        }

        if let Some(trailing) = rest.strip_prefix(':') {
            params.push(trailing);
            break;
        }

        let end = rest.find(' ').unwrap_or(rest.len());
        params.push(&rest[..end]);
        rest = &rest[end..];
    }

    params
}

/// Intermediate representation borrowing from the input line.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct RawLine<'a> {
    pub tags: Option<&'a str>,
    pub source: Option<&'a str>,
    pub command: &'a str,
    pub params: SmallVec<[&'a str; 15]>,
}

fn parse_line(input: &str) -> IResult<&str, RawLine<'_>> {
    let (input, tags) = opt(parse_tags)(input)?;
    let (input, _) = space0(input)?;

    let (input, source) = opt(parse_source)(input)?;
    let (input, _) = space0(input)?;

    let (rest, command) = parse_command(input)?;
    let params = parse_params(rest);

    Ok((
        "",
        RawLine {
            tags,
            source,
            command,
            params,
        },
    ))
}

impl<'a> RawLine<'a> {
    /// Tokenize a line with its terminator already removed.
    pub fn parse(line: &'a str) -> Option<Self> {
        parse_line(line).ok().map(|(_, raw)| raw)
    }
}

/// Split a raw tag section into key/value pairs with values unescaped.
pub(crate) fn split_tags(raw: &str) -> impl Iterator<Item = (String, String)> + '_ {
    raw.split(';').filter(|t| !t.is_empty()).map(|tag| {
        let (key, value) = tag.split_once('=').unwrap_or((tag, ""));
        (key.to_owned(), unescape_tag_value(value))
    })
}

/// Unescape a tag value from wire format.
pub(crate) fn unescape_tag_value(value: &str) -> String {
    let mut unescaped = String::with_capacity(value.len());
    let mut iter = value.chars();
    while let Some(c) = iter.next() {
        let r = if c == '\\' {
            match iter.next() {
                Some(':') => ';',
                Some('s') => ' ',
                Some('\\') => '\\',
                Some('r') => '\r',
                Some('n') => '\n',
                Some(c) => c,
                None => break,
            }
        } else {
            c
        };
        unescaped.push(r);
    }
    unescaped
}
