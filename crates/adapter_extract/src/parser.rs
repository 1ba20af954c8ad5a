//! Record parser for vendor extract lines.
//!
//! Each line is classified by its leading tag and decoded along one path per
//! [`QuoteKind`]. A line that cannot be decoded is counted and skipped; a
//! document never fails to parse as a whole.

use crate::quote::{QuoteKind, RawQuote, SpotQuote, TermQuote, VolQuote};
use norm_core::market_data::round_decimals;
use norm_core::types::Date;
use std::borrow::Cow;

/// Required length of an instrument identifier.
pub const INSTRUMENT_ID_LEN: usize = 12;

/// Fields per record: tag, identifier, value, observation date.
const FIELD_COUNT: usize = 4;

/// Decimal places kept on a parsed strike.
const STRIKE_DECIMALS: i32 = 4;

/// Vendor annotations marking a value the vendor itself interpolated or extrapolated.
const VENDOR_MARKERS: [&str; 4] = [
    "interpolated_forward",
    "extrapolated_volatility",
    "interpolated_volatility",
    "extrapolated_forward",
];

const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];

/// Result of classifying a single line.
#[derive(Debug, Clone, PartialEq)]
pub enum LineOutcome {
    /// Decoded record
    Quote(RawQuote),
    /// Known tag, but the fields could not be decoded
    Malformed(QuoteKind),
    /// Delimited line with an unknown tag
    Unrecognised,
    /// Blank line or free text without delimiters
    Ignored,
}

/// Quotes decoded from one extract, in file order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedDocument {
    /// Decoded records
    pub quotes: Vec<RawQuote>,
    /// Lines with a known tag that failed to decode
    pub malformed: usize,
    /// Delimited lines with an unknown tag
    pub unrecognised: usize,
}

impl ParsedDocument {
    /// Number of decoded records of `kind`.
    pub fn count(&self, kind: QuoteKind) -> usize {
        self.quotes.iter().filter(|q| q.kind() == kind).count()
    }
}

/// Parser for `;`-delimited, tag-prefixed quote records.
///
/// # Example
///
/// ```
/// use adapter_extract::{LineOutcome, RawQuote, RecordParser};
///
/// let parser = RecordParser::new();
/// let line = "Volatility;FR0000120271 2025-03-21 87.123456% ~interpolated_volatility;0.2412;2024-03-15";
/// match parser.parse_line(line) {
///     LineOutcome::Quote(RawQuote::Volatility(q)) => {
///         assert_eq!(q.strike, 87.1235);
///         assert!(q.vendor_adjusted);
///     }
///     other => panic!("unexpected {:?}", other),
/// }
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct RecordParser;

impl RecordParser {
    /// Create a parser.
    pub fn new() -> Self {
        Self
    }

    /// Classify and decode one line.
    pub fn parse_line(&self, line: &str) -> LineOutcome {
        let line = line.trim();
        if line.is_empty() || !line.contains(';') {
            return LineOutcome::Ignored;
        }

        let mut fields: Vec<&str> = line.split(';').map(str::trim).collect();
        let Some(kind) = QuoteKind::from_tag(fields[0]) else {
            return LineOutcome::Unrecognised;
        };
        if fields.len() == FIELD_COUNT + 1 && fields[FIELD_COUNT].is_empty() {
            fields.pop();
        }
        if fields.len() != FIELD_COUNT {
            return LineOutcome::Malformed(kind);
        }

        match decode_record(kind, fields[1], fields[2], fields[3]) {
            Some(quote) => LineOutcome::Quote(quote),
            None => LineOutcome::Malformed(kind),
        }
    }

    /// Parse a whole extract.
    pub fn parse_document(&self, text: &str) -> ParsedDocument {
        let mut doc = ParsedDocument::default();
        for line in text.lines() {
            match self.parse_line(line) {
                LineOutcome::Quote(q) => doc.quotes.push(q),
                LineOutcome::Malformed(_) => doc.malformed += 1,
                LineOutcome::Unrecognised => doc.unrecognised += 1,
                LineOutcome::Ignored => {}
            }
        }
        doc
    }
}

/// Decode extract bytes: UTF-8 with an optional BOM, else Latin-1.
///
/// # Example
///
/// ```
/// use adapter_extract::decode_text;
///
/// assert_eq!(decode_text(b"\xEF\xBB\xBFSpot"), "Spot");
/// assert_eq!(decode_text(b"caf\xE9"), "caf\u{e9}");
/// ```
pub fn decode_text(bytes: &[u8]) -> Cow<'_, str> {
    let body = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
    match std::str::from_utf8(body) {
        Ok(text) => Cow::Borrowed(text),
        // Latin-1 maps every byte to the code point of the same value
        Err(_) => Cow::Owned(body.iter().map(|&b| b as char).collect()),
    }
}

fn decode_record(kind: QuoteKind, identifier: &str, value: &str, date: &str) -> Option<RawQuote> {
    let (tokens, vendor_adjusted) = split_identifier(identifier);
    if tokens.len() != kind.identifier_tokens() {
        return None;
    }
    let instrument = parse_instrument(tokens[0])?;
    let value = parse_value(value)?;
    let date = Date::parse(date).ok()?;

    let quote = match kind {
        QuoteKind::Spot => RawQuote::Spot(SpotQuote {
            instrument,
            value,
            date,
        }),
        QuoteKind::Forward | QuoteKind::ForwardGrowthRate => {
            let term = TermQuote {
                instrument,
                maturity: Date::parse(tokens[1]).ok()?,
                value,
                date,
                vendor_adjusted,
            };
            if kind == QuoteKind::Forward {
                RawQuote::Forward(term)
            } else {
                RawQuote::ForwardGrowthRate(term)
            }
        }
        QuoteKind::Volatility => RawQuote::Volatility(VolQuote {
            instrument,
            maturity: Date::parse(tokens[1]).ok()?,
            strike: parse_strike(tokens[2])?,
            value,
            date,
            vendor_adjusted,
        }),
    };
    Some(quote)
}

/// Split the identifier field, dropping a trailing vendor marker and anything after it.
fn split_identifier(field: &str) -> (Vec<&str>, bool) {
    let mut tokens = Vec::new();
    for token in field.split_whitespace() {
        if let Some(marker) = token.strip_prefix('~') {
            if VENDOR_MARKERS.contains(&marker) {
                return (tokens, true);
            }
        }
        tokens.push(token);
    }
    (tokens, false)
}

fn parse_instrument(token: &str) -> Option<String> {
    (token.chars().count() == INSTRUMENT_ID_LEN).then(|| token.to_string())
}

fn parse_value(field: &str) -> Option<f64> {
    field.parse::<f64>().ok().filter(|v| v.is_finite())
}

fn parse_strike(token: &str) -> Option<f64> {
    let number = token.strip_suffix('%')?;
    let strike = parse_value(number)?;
    Some(round_decimals(strike, STRIKE_DECIMALS))
}
