//! Page range parsing and formatting.
//!
//! A range string is what a user types to pick pages out of one source
//! document: comma-separated 1-based page numbers and inclusive dash ranges,
//! e.g. `"1-3, 5"`. Parsing resolves it to zero-based indices in the order
//! the pages are mentioned; formatting turns an edited index list back into
//! a range string.
//!
//! Every function here is total. Malformed tokens are skipped and
//! out-of-bounds pages are clamped or dropped, so a half-typed range never
//! produces an error.
//!
//! # Examples
//!
//! ```
//! use pdfcombine::range::{format_page_list, parse_range};
//!
//! let pages = parse_range("3, 1-2, 2", 5);
//! assert_eq!(pages, vec![2, 0, 1]);
//! assert_eq!(format_page_list(&pages), "3, 1, 2");
//! ```

/// Largest page number [`parse_page_numbers`] will expand a range up to.
pub const MAX_PAGE_NUMBER: usize = 100_000;

/// Resolve a range string to zero-based page indices.
///
/// An empty or whitespace-only string selects every page in natural order.
/// Otherwise the result holds each valid page once, in order of first
/// mention. Reversed ranges such as `"5-1"` select nothing.
///
/// # Arguments
///
/// * `range` - Range string, e.g. `"1-3,5"`
/// * `total_pages` - Number of pages in the source document
pub fn parse_range(range: &str, total_pages: usize) -> Vec<usize> {
    if range.trim().is_empty() {
        return (0..total_pages).collect();
    }

    let last = total_pages as i64 - 1;
    let mut indices = Vec::new();

    for token in tokens(range) {
        match token {
            Token::Span(start, end) => {
                let first = (start - 1).max(0);
                let end = (end - 1).min(last);
                for index in first..=end {
                    push_unique(&mut indices, index as usize);
                }
            }
            Token::Single(page) => {
                let index = page - 1;
                if (0..=last).contains(&index) {
                    push_unique(&mut indices, index as usize);
                }
            }
        }
    }

    indices
}

/// Format zero-based page indices as a 1-based range string.
///
/// No range compression is applied: `[0, 1, 2]` becomes `"1, 2, 3"`. The
/// output of the page-set editor is an arbitrary ordering, and listing every
/// page keeps that ordering intact when the string is parsed again.
pub fn format_page_list(indices: &[usize]) -> String {
    indices
        .iter()
        .map(|index| (index + 1).to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Parse a list of 1-based output page numbers.
///
/// Used for the "insert blank page after" list, which refers to pages of the
/// document being built rather than a source. The grammar is the same as
/// [`parse_range`] but nothing is known about the final page count, so
/// there is no upper bound beyond [`MAX_PAGE_NUMBER`]. Zero is kept and
/// means "before the first page". Empty input yields an empty list.
pub fn parse_page_numbers(spec: &str) -> Vec<usize> {
    let max = MAX_PAGE_NUMBER as i64;
    let mut numbers = Vec::new();

    for token in tokens(spec) {
        let (start, end) = match token {
            Token::Span(start, end) => (start.max(0), end.min(max)),
            Token::Single(page) => (page, page),
        };
        if start < 0 || start > max {
            continue;
        }
        for number in start..=end {
            push_unique(&mut numbers, number as usize);
        }
    }

    numbers
}

/// A syntactically valid token of a range string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Token {
    /// A single 1-based page number.
    Single(i64),
    /// An inclusive `start-end` pair, as typed.
    Span(i64, i64),
}

/// Split a range string into tokens, silently dropping malformed ones.
fn tokens(range: &str) -> impl Iterator<Item = Token> + '_ {
    range
        .split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .filter_map(|part| {
            if part.contains('-') {
                let mut bounds = part.split('-');
                let start = bounds.next().and_then(parse_leading_int)?;
                let end = bounds.next().and_then(parse_leading_int)?;
                Some(Token::Span(start, end))
            } else {
                parse_leading_int(part).map(Token::Single)
            }
        })
}

/// Parse the leading decimal integer of a string.
///
/// Leading whitespace and a single sign are accepted, then the longest run of
/// ASCII digits is taken and anything after it is ignored: `"12abc"` is 12,
/// `"abc"` is `None`. Values beyond `i64` saturate.
pub fn parse_leading_int(text: &str) -> Option<i64> {
    let text = text.trim_start();
    let (negative, digits) = match text.as_bytes().first() {
        Some(b'-') => (true, &text[1..]),
        Some(b'+') => (false, &text[1..]),
        _ => (false, text),
    };

    let digits: Vec<i64> = digits
        .bytes()
        .take_while(u8::is_ascii_digit)
        .map(|b| i64::from(b - b'0'))
        .collect();
    if digits.is_empty() {
        return None;
    }

    let magnitude = digits
        .iter()
        .fold(0i64, |acc, d| acc.saturating_mul(10).saturating_add(*d));
    Some(if negative { -magnitude } else { magnitude })
}

fn push_unique(values: &mut Vec<usize>, value: usize) {
    if !values.contains(&value) {
        values.push(value);
    }
}
