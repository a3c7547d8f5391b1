//! Parser for `key=value;` style strings.

use winnow::{
    Parser as _,
    combinator::{opt, preceded, separated},
    error::{ContextError, ErrMode},
    token::take_till,
};

use mxdraw_core::semantic::StyleMap;

use crate::error::ParseError;

type Input<'src> = &'src str;
type IResult<O> = Result<O, ErrMode<ContextError>>;

/// One `key` or `key=value` item; empty items yield `None`
fn entry<'src>(input: &mut Input<'src>) -> IResult<Option<(&'src str, &'src str)>> {
    (
        take_till(0.., ['=', ';']),
        opt(preceded('=', take_till(0.., ';'))),
    )
        .map(|(key, value): (&'src str, Option<&'src str>)| {
            let key = key.trim();
            (!key.is_empty()).then(|| (key, value.map(str::trim).unwrap_or_default()))
        })
        .parse_next(input)
}

fn entries<'src>(input: &mut Input<'src>) -> IResult<Vec<Option<(&'src str, &'src str)>>> {
    separated(0.., entry, ';').parse_next(input)
}

/// Parses a draw.io style string.
///
/// Items are separated by `;`. The first `=` splits key from value, a bare
/// key maps to the empty string (draw.io writes `text;html=1;` for text
/// cells) and empty items are skipped. Later duplicates replace earlier
/// values.
pub fn parse_style(source: &str) -> Result<StyleMap, ParseError> {
    let mut input = source;
    let items = entries
        .parse_next(&mut input)
        .map_err(|err| ParseError::Style {
            message: format!("{err:?}"),
        })?;
    Ok(items.into_iter().flatten().collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_style_pairs_in_order() {
        let style = parse_style("rounded=0;whiteSpace=wrap;html=1;fillColor=#dae8fc;").unwrap();
        let items: Vec<_> = style.iter().collect();
        assert_eq!(
            items,
            [
                ("rounded", "0"),
                ("whiteSpace", "wrap"),
                ("html", "1"),
                ("fillColor", "#dae8fc"),
            ]
        );
    }

    #[test]
    fn test_parse_style_bare_keys() {
        let style = parse_style("text;html=1;edgeLabel").unwrap();
        assert_eq!(style.get("text"), Some(""));
        assert_eq!(style.get("edgeLabel"), Some(""));
        assert_eq!(style.get("html"), Some("1"));
    }

    #[test]
    fn test_parse_style_skips_empty_items() {
        let style = parse_style(";;a=1;; ;b=2;").unwrap();
        assert_eq!(style.len(), 2);
        assert!(parse_style("").unwrap().is_empty());
    }

    #[test]
    fn test_parse_style_splits_on_first_equals() {
        let style = parse_style("image=data:image/svg+xml,a=b;x=1").unwrap();
        assert_eq!(style.get("image"), Some("data:image/svg+xml,a=b"));
        assert_eq!(style.get("x"), Some("1"));
    }

    #[test]
    fn test_parse_style_last_duplicate_wins() {
        let style = parse_style("dashed=0;dashed=1").unwrap();
        assert_eq!(style.get("dashed"), Some("1"));
        assert_eq!(style.len(), 1);
    }
}
