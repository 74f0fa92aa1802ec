//! Header card encoding and parsing.
//!
//! Every FITS header is a sequence of 80-byte ASCII cards.
//!
//! # Structure
//!
//! | Columns | Length | Field     | Description                               |
//! |---------|--------|-----------|-------------------------------------------|
//! | 1-8     | 8      | keyword   | Upper-case keyword, space padded          |
//! | 9-10    | 2      | indicator | `"= "` on value cards                     |
//! | 11-80   | 70     | value     | Value followed by an optional `/ comment` |
//!
//! Commentary cards (`COMMENT`, `HISTORY`, blank keyword) carry free text in
//! columns 9-80.

use crate::error::{FitsError, Result};

/// Card length in bytes.
pub const CARD_LEN: usize = 80;

/// Maximum keyword length.
pub const KEYWORD_LEN: usize = 8;

/// Offset of the first value byte.
const VALUE_OFFSET: usize = 10;

/// Fixed-format values end in column 30.
const FIXED_VALUE_END: usize = 30;

/// Value stored in a header card.
#[derive(Debug, Clone, PartialEq)]
pub enum CardValue {
    Logical(bool),
    Integer(i64),
    Float(f64),
    Text(String),
    /// Keyword present with a blank value field.
    Undefined,
}

impl CardValue {
    /// Numeric view of the value; integers widen to `f64`.
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Integer(v) => Some(*v as f64),
            Self::Float(v) => Some(*v),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Integer(v) => Some(*v),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Logical(b) => Some(*b),
            _ => None,
        }
    }
}

impl From<bool> for CardValue {
    fn from(value: bool) -> Self {
        Self::Logical(value)
    }
}

impl From<i64> for CardValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<f64> for CardValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<&str> for CardValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for CardValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<Option<f64>> for CardValue {
    fn from(value: Option<f64>) -> Self {
        value.map_or(Self::Undefined, Self::Float)
    }
}

/// One header card.
#[derive(Debug, Clone, PartialEq)]
pub enum Card {
    /// `KEYWORD = value / comment`
    Value {
        keyword: String,
        value: CardValue,
        comment: Option<String>,
    },
    /// `COMMENT`, `HISTORY` or blank-keyword free text.
    Commentary { keyword: String, text: String },
    /// Header terminator.
    End,
}

impl Card {
    /// Create a value card.
    pub fn value(keyword: impl Into<String>, value: impl Into<CardValue>) -> Self {
        Self::Value {
            keyword: keyword.into(),
            value: value.into(),
            comment: None,
        }
    }

    /// Create a `COMMENT` card.
    pub fn comment(text: impl Into<String>) -> Self {
        Self::Commentary {
            keyword: "COMMENT".to_string(),
            text: text.into(),
        }
    }

    /// Create a `HISTORY` card.
    pub fn history(text: impl Into<String>) -> Self {
        Self::Commentary {
            keyword: "HISTORY".to_string(),
            text: text.into(),
        }
    }

    /// Attach a comment to a value card. No effect on other cards.
    #[must_use]
    pub fn with_comment(mut self, text: impl Into<String>) -> Self {
        if let Self::Value { comment, .. } = &mut self {
            *comment = Some(text.into());
        }
        self
    }

    /// The card keyword (`END` for the terminator).
    #[must_use]
    pub fn keyword(&self) -> &str {
        match self {
            Self::Value { keyword, .. } | Self::Commentary { keyword, .. } => keyword,
            Self::End => "END",
        }
    }
}

/// Whether a keyword introduces free text rather than a value.
#[must_use]
pub fn is_commentary_keyword(keyword: &str) -> bool {
    matches!(keyword, "COMMENT" | "HISTORY" | "")
}

/// Check keyword syntax: at most 8 of `A-Z`, `0-9`, `-`, `_`.
pub fn validate_keyword(keyword: &str) -> Result<()> {
    let valid_chars = keyword
        .bytes()
        .all(|b| b.is_ascii_uppercase() || b.is_ascii_digit() || b == b'-' || b == b'_');
    if keyword.len() > KEYWORD_LEN || !valid_chars {
        return Err(FitsError::invalid_keyword(keyword));
    }
    Ok(())
}

/// Build an 80-byte card.
pub fn build_card(card: &Card) -> Result<[u8; CARD_LEN]> {
    let mut record = [b' '; CARD_LEN];

    match card {
        Card::End => write_ascii(&mut record, 0, "END"),
        Card::Commentary { keyword, text } => {
            validate_keyword(keyword)?;
            write_ascii(&mut record, 0, keyword);
            write_ascii(&mut record, KEYWORD_LEN, text);
        }
        Card::Value {
            keyword,
            value,
            comment,
        } => {
            validate_keyword(keyword)?;
            if keyword.is_empty() {
                return Err(FitsError::invalid_keyword(keyword));
            }
            write_ascii(&mut record, 0, keyword);
            record[KEYWORD_LEN] = b'=';

            let formatted = format_value(value);
            if formatted.len() > CARD_LEN - VALUE_OFFSET {
                return Err(FitsError::ValueTooLong {
                    keyword: keyword.clone(),
                });
            }
            let right_justify = matches!(
                value,
                CardValue::Logical(_) | CardValue::Integer(_) | CardValue::Float(_)
            ) && formatted.len() <= FIXED_VALUE_END - VALUE_OFFSET;
            let start = if right_justify {
                FIXED_VALUE_END - formatted.len()
            } else {
                VALUE_OFFSET
            };
            write_ascii(&mut record, start, &formatted);

            let value_end = if right_justify {
                FIXED_VALUE_END
            } else {
                VALUE_OFFSET + formatted.len()
            };
            if let Some(comment) = comment.as_deref().filter(|c| !c.is_empty()) {
                // " / " needs three columns before any comment text fits
                if value_end + 3 < CARD_LEN {
                    write_ascii(&mut record, value_end, " / ");
                    write_ascii(&mut record, value_end + 3, comment);
                }
            }
        }
    }

    Ok(record)
}

/// Format a value field.
///
/// Non-finite floats have no FITS representation and are written as
/// undefined values.
fn format_value(value: &CardValue) -> String {
    match value {
        CardValue::Logical(true) => "T".to_string(),
        CardValue::Logical(false) => "F".to_string(),
        CardValue::Integer(v) => v.to_string(),
        CardValue::Float(v) if v.is_finite() => format_float(*v),
        CardValue::Float(_) | CardValue::Undefined => String::new(),
        CardValue::Text(s) => format_text(s),
    }
}

/// Shortest round-trip representation with an explicit decimal point.
fn format_float(value: f64) -> String {
    let repr = format!("{value:E}");
    match repr.split_once('E') {
        Some((mantissa, exponent)) if !mantissa.contains('.') => {
            format!("{mantissa}.0E{exponent}")
        }
        _ => repr,
    }
}

/// Quote a string, doubling embedded quotes and padding to 8 characters.
fn format_text(value: &str) -> String {
    let mut inner: String = value
        .chars()
        .map(|ch| if ch == ' ' || ch.is_ascii_graphic() { ch } else { '?' })
        .collect::<String>()
        .replace('\'', "''");
    while inner.len() < 8 {
        inner.push(' ');
    }
    format!("'{inner}'")
}

/// Write ASCII text into a record, truncating at the record end.
fn write_ascii(record: &mut [u8; CARD_LEN], offset: usize, text: &str) {
    for (slot, ch) in record[offset..].iter_mut().zip(text.chars()) {
        *slot = if ch == ' ' || ch.is_ascii_graphic() {
            ch as u8
        } else {
            b'?'
        };
    }
}

/// Parse an 80-byte card.
///
/// `index` is the card position within its header, used in error messages.
pub fn parse_card(record: &[u8], index: usize) -> Result<Card> {
    if record.len() < CARD_LEN {
        return Err(FitsError::invalid_card(index, "card too short"));
    }
    let record = &record[..CARD_LEN];
    if !record.is_ascii() {
        return Err(FitsError::invalid_card(index, "non-ASCII bytes"));
    }
    // ASCII was checked above, so byte slicing below stays on char boundaries.
    let text = String::from_utf8_lossy(record);
    let keyword = text[..KEYWORD_LEN].trim_end().to_string();

    if keyword == "END" {
        return Ok(Card::End);
    }

    if &text[KEYWORD_LEN..VALUE_OFFSET] == "= " && !is_commentary_keyword(&keyword) {
        let (value, comment) = parse_value_field(&text[VALUE_OFFSET..])
            .map_err(|message| FitsError::invalid_card(index, message))?;
        return Ok(Card::Value {
            keyword,
            value,
            comment,
        });
    }

    Ok(Card::Commentary {
        keyword,
        text: text[KEYWORD_LEN..].trim_end().to_string(),
    })
}

/// Parse the value/comment field of a value card (free format).
fn parse_value_field(field: &str) -> std::result::Result<(CardValue, Option<String>), String> {
    let trimmed = field.trim_start();

    if let Some(rest) = trimmed.strip_prefix('\'') {
        let mut value = String::new();
        let mut chars = rest.char_indices().peekable();
        let mut close = None;
        while let Some((idx, ch)) = chars.next() {
            if ch == '\'' {
                if matches!(chars.peek(), Some((_, '\''))) {
                    value.push('\'');
                    chars.next();
                } else {
                    close = Some(idx);
                    break;
                }
            } else {
                value.push(ch);
            }
        }
        let close = close.ok_or_else(|| "unterminated string value".to_string())?;
        // Trailing spaces inside a string are not significant.
        let value = value.trim_end().to_string();
        return Ok((CardValue::Text(value), parse_comment(&rest[close + 1..])));
    }

    let (token, comment) = match trimmed.split_once('/') {
        Some((token, comment)) => (token.trim(), non_empty(comment.trim())),
        None => (trimmed.trim(), None),
    };

    let value = match token {
        "" => CardValue::Undefined,
        "T" => CardValue::Logical(true),
        "F" => CardValue::Logical(false),
        _ => {
            if let Ok(v) = token.parse::<i64>() {
                CardValue::Integer(v)
            } else {
                let normalized = token.replace(['D', 'd'], "E");
                normalized
                    .parse::<f64>()
                    .map(CardValue::Float)
                    .map_err(|_| format!("unparseable value '{token}'"))?
            }
        }
    };

    Ok((value, comment))
}

fn parse_comment(remainder: &str) -> Option<String> {
    remainder
        .trim_start()
        .strip_prefix('/')
        .and_then(|c| non_empty(c.trim()))
}

fn non_empty(text: &str) -> Option<String> {
    if text.is_empty() {
        None
    } else {
        Some(text.to_string())
    }
}
