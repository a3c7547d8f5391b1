//! Tokenizer for label markup.
//!
//! draw.io stores formatted labels (`html=1`) as a small subset of HTML.
//! Only bold, italic, line and paragraph breaks and `<font color>` change
//! the output; every other tag and unknown entity is kept as literal text.

use winnow::{
    Parser as _,
    ascii::multispace0,
    combinator::{alt, delimited, opt, preceded, repeat, terminated},
    error::{ContextError, ErrMode},
    token::{any, take_till, take_while},
};

type Input<'src> = &'src str;
type IResult<O> = Result<O, ErrMode<ContextError>>;

/// A span of text sharing one style.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextRun {
    pub text: String,
    pub bold: bool,
    pub italic: bool,
    /// Color override from an enclosing `<font color>`
    pub color: Option<String>,
}

impl TextRun {
    /// An unstyled run
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            bold: false,
            italic: false,
            color: None,
        }
    }
}

/// One element of a tokenized label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunToken {
    LineBreak,
    Text(TextRun),
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Tag<'src> {
    closing: bool,
    name: &'src str,
    attributes: Vec<(&'src str, &'src str)>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Piece<'src> {
    /// A well-formed tag and its source text
    Tag(Tag<'src>, &'src str),
    /// An entity reference and its source text
    Entity(Option<char>, &'src str),
    Text(&'src str),
}

fn attribute_value<'src>(input: &mut Input<'src>) -> IResult<&'src str> {
    alt((
        delimited('"', take_till(0.., '"'), '"'),
        delimited('\'', take_till(0.., '\''), '\''),
        take_till(1.., [' ', '\t', '\n', '/', '>']),
    ))
    .parse_next(input)
}

fn attribute<'src>(input: &mut Input<'src>) -> IResult<(&'src str, &'src str)> {
    preceded(
        multispace0,
        (
            take_while(1.., |c: char| {
                c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | ':')
            }),
            opt(preceded((multispace0, '=', multispace0), attribute_value))
                .map(Option::unwrap_or_default),
        ),
    )
    .parse_next(input)
}

fn attributes<'src>(input: &mut Input<'src>) -> IResult<Vec<(&'src str, &'src str)>> {
    terminated(
        repeat(0.., attribute),
        (multispace0, opt('/'), multispace0),
    )
    .parse_next(input)
}

fn tag<'src>(input: &mut Input<'src>) -> IResult<Tag<'src>> {
    (
        '<',
        opt('/'),
        take_while(1.., |c: char| c.is_ascii_alphanumeric()),
        attributes,
        '>',
    )
        .map(|(_, closing, name, attributes, _)| Tag {
            closing: closing.is_some(),
            name,
            attributes,
        })
        .parse_next(input)
}

fn decode_entity(name: &str) -> Option<char> {
    match name {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        "nbsp" => Some(' '),
        _ => {
            let code = name.strip_prefix('#')?;
            let value = match code.strip_prefix(['x', 'X']) {
                Some(hex) => u32::from_str_radix(hex, 16).ok()?,
                None => code.parse().ok()?,
            };
            char::from_u32(value)
        }
    }
}

fn entity<'src>(input: &mut Input<'src>) -> IResult<Option<char>> {
    delimited(
        '&',
        take_while(1..=16, |c: char| c.is_ascii_alphanumeric() || c == '#'),
        ';',
    )
    .map(decode_entity)
    .parse_next(input)
}

fn piece<'src>(input: &mut Input<'src>) -> IResult<Piece<'src>> {
    alt((
        tag.with_taken().map(|(tag, raw)| Piece::Tag(tag, raw)),
        entity
            .with_taken()
            .map(|(decoded, raw)| Piece::Entity(decoded, raw)),
        take_till(1.., ['<', '&']).map(Piece::Text),
        any.take().map(Piece::Text),
    ))
    .parse_next(input)
}

fn pieces<'src>(input: &mut Input<'src>) -> IResult<Vec<Piece<'src>>> {
    repeat(0.., piece).parse_next(input)
}

/// Accumulates runs while walking the markup.
#[derive(Default)]
struct Flattener {
    tokens: Vec<RunToken>,
    text: String,
    bold: u32,
    italic: u32,
    colors: Vec<Option<String>>,
}

impl Flattener {
    fn push_text(&mut self, text: &str) {
        // Source newlines are layout whitespace, not breaks
        self.text
            .extend(text.chars().map(|c| if c == '\n' { ' ' } else { c }));
    }

    fn flush(&mut self) {
        if self.text.is_empty() {
            return;
        }
        let color = self.colors.iter().rev().find_map(Clone::clone);
        self.tokens.push(RunToken::Text(TextRun {
            text: std::mem::take(&mut self.text),
            bold: self.bold > 0,
            italic: self.italic > 0,
            color,
        }));
    }

    fn line_break(&mut self) {
        if !self.tokens.is_empty() {
            self.tokens.push(RunToken::LineBreak);
        }
    }

    /// Applies a tag, returning false when it is not part of the vocabulary
    fn apply(&mut self, tag: &Tag<'_>) -> bool {
        let name = tag.name.to_ascii_lowercase();
        let known = matches!(
            name.as_str(),
            "b" | "strong" | "i" | "em" | "br" | "div" | "p" | "font"
        );
        if !known {
            return false;
        }
        self.flush();
        match (name.as_str(), tag.closing) {
            ("b" | "strong", false) => self.bold += 1,
            ("b" | "strong", true) => self.bold = self.bold.saturating_sub(1),
            ("i" | "em", false) => self.italic += 1,
            ("i" | "em", true) => self.italic = self.italic.saturating_sub(1),
            ("br" | "div" | "p", false) => self.line_break(),
            ("font", false) => {
                let color = tag
                    .attributes
                    .iter()
                    .find(|(key, _)| key.eq_ignore_ascii_case("color"))
                    .map(|(_, value)| value.to_string());
                self.colors.push(color);
            }
            ("font", true) => {
                self.colors.pop();
            }
            _ => {}
        }
        true
    }

    fn finish(mut self) -> Vec<RunToken> {
        self.flush();
        self.tokens
    }
}

/// Tokenizes formatted label markup into runs and line breaks.
///
/// Line breaks from `<br>`, `<div>` and `<p>` are only emitted once some
/// content precedes them, so a leading `<div>` does not produce an empty
/// first line.
pub fn tokenize_markup(source: &str) -> Vec<RunToken> {
    let mut input = source;
    // Every character is accepted by some alternative
    let pieces = pieces.parse_next(&mut input).unwrap_or_default();

    let mut flattener = Flattener::default();
    for piece in pieces {
        match piece {
            Piece::Tag(tag, raw) => {
                if !flattener.apply(&tag) {
                    flattener.push_text(raw);
                }
            }
            Piece::Entity(Some(decoded), _) => flattener.text.push(decoded),
            Piece::Entity(None, raw) | Piece::Text(raw) => flattener.push_text(raw),
        }
    }
    flattener.finish()
}

/// Tokenizes a plain label, where only `\n` is meaningful.
pub fn tokenize_plain(source: &str) -> Vec<RunToken> {
    let mut tokens = Vec::new();
    for (index, line) in source.split('\n').enumerate() {
        if index > 0 {
            tokens.push(RunToken::LineBreak);
        }
        let line = line.strip_suffix('\r').unwrap_or(line);
        if !line.is_empty() {
            tokens.push(RunToken::Text(TextRun::plain(line)));
        }
    }
    tokens
}
