//! # adapter_extract: Market Data Extract Adapter
//!
//! Turns vendor extract files into typed quotes.
//!
//! ## Layer Role
//!
//! Adapter layer between the raw extract files and the normalisation engine:
//! - [`parser`]: Line classification and decoding into [`RawQuote`] variants
//! - [`quote`]: Closed set of quote kinds with one payload type per kind
//! - [`source`]: Discovery and reading of named extract files, content fingerprints
//!
//! ## Extract Format
//!
//! Newline-delimited, `;`-separated, tag-prefixed:
//!
//! ```text
//! Spot;FR0000120271;98.12;2024-03-15
//! Forward;FR0000120271 2026-03-20 ~interpolated_forward;101.5;2024-03-15
//! ForwardGrowthRate;FR0000120271 2027-03-19;0.031;2024-03-15
//! Volatility;FR0000120271 2025-03-21 90%;0.2412;2024-03-15
//! ```
//!
//! ## Usage Example
//!
//! ```rust
//! use adapter_extract::{RawQuote, RecordParser};
//!
//! let text = "Spot;FR0000120271;98.12;2024-03-15\nnot a record\nBond;X;1;2024-03-15\n";
//! let doc = RecordParser::new().parse_document(text);
//!
//! assert_eq!(doc.quotes.len(), 1);
//! assert_eq!(doc.unrecognised, 1);
//! assert!(matches!(doc.quotes[0], RawQuote::Spot(_)));
//! ```

#![warn(missing_docs)]

pub mod error;
pub mod parser;
pub mod quote;
pub mod source;

pub use error::ExtractError;
pub use parser::{decode_text, LineOutcome, ParsedDocument, RecordParser, INSTRUMENT_ID_LEN};
pub use quote::{QuoteKind, RawQuote, SpotQuote, TermQuote, VolQuote};
pub use source::{fingerprint, DirectorySource, ExtractEntry, ExtractSource, MemorySource};
