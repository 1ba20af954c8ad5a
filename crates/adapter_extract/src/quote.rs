//! Typed quotes decoded from extract lines.

use norm_core::types::Date;
use std::fmt;

/// Kind of a quote record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum QuoteKind {
    /// Spot price
    Spot,
    /// Forward price at a maturity date
    Forward,
    /// Continuously compounded growth rate to a maturity date
    ForwardGrowthRate,
    /// Implied volatility at a maturity date and strike
    Volatility,
}

impl QuoteKind {
    /// Resolve a record tag, accepting both short and vendor long forms.
    ///
    /// # Example
    ///
    /// ```
    /// use adapter_extract::QuoteKind;
    ///
    /// assert_eq!(QuoteKind::from_tag("Asset_forward"), Some(QuoteKind::Forward));
    /// assert_eq!(QuoteKind::from_tag("Volatility"), Some(QuoteKind::Volatility));
    /// assert_eq!(QuoteKind::from_tag("Bond"), None);
    /// ```
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "Spot" | "Asset_spot" => Some(Self::Spot),
            "Forward" | "Asset_forward" => Some(Self::Forward),
            "ForwardGrowthRate" | "Asset_forward_growth_rate" => Some(Self::ForwardGrowthRate),
            "Volatility" | "Asset_volatility" => Some(Self::Volatility),
            _ => None,
        }
    }

    /// Number of whitespace-separated tokens in the identifier field.
    pub fn identifier_tokens(&self) -> usize {
        match self {
            Self::Spot => 1,
            Self::Forward | Self::ForwardGrowthRate => 2,
            Self::Volatility => 3,
        }
    }
}

impl fmt::Display for QuoteKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Spot => "Spot",
            Self::Forward => "Forward",
            Self::ForwardGrowthRate => "ForwardGrowthRate",
            Self::Volatility => "Volatility",
        };
        write!(f, "{}", name)
    }
}

/// Spot price of an instrument on an observation date.
#[derive(Debug, Clone, PartialEq)]
pub struct SpotQuote {
    /// Instrument identifier
    pub instrument: String,
    /// Spot price
    pub value: f64,
    /// Observation date
    pub date: Date,
}

/// Quote at a maturity date: a forward price or a growth rate.
#[derive(Debug, Clone, PartialEq)]
pub struct TermQuote {
    /// Instrument identifier
    pub instrument: String,
    /// Maturity date
    pub maturity: Date,
    /// Forward price or growth rate
    pub value: f64,
    /// Observation date
    pub date: Date,
    /// The vendor flagged this value as interpolated or extrapolated
    pub vendor_adjusted: bool,
}

impl TermQuote {
    /// Identifier of the raw point, `"{instrument} {maturity}"`.
    pub fn label(&self) -> String {
        format!("{} {}", self.instrument, self.maturity)
    }
}

/// Implied volatility at a maturity date and strike.
#[derive(Debug, Clone, PartialEq)]
pub struct VolQuote {
    /// Instrument identifier
    pub instrument: String,
    /// Maturity date
    pub maturity: Date,
    /// Strike in percent of spot, rounded to 4 decimals
    pub strike: f64,
    /// Implied volatility
    pub value: f64,
    /// Observation date
    pub date: Date,
    /// The vendor flagged this value as interpolated or extrapolated
    pub vendor_adjusted: bool,
}

impl VolQuote {
    /// Identifier of the raw point, `"{instrument} {maturity} {strike:.4}%"`.
    ///
    /// # Example
    ///
    /// ```
    /// use adapter_extract::VolQuote;
    /// use norm_core::types::Date;
    ///
    /// let q = VolQuote {
    ///     instrument: "FR0000120271".to_string(),
    ///     maturity: Date::from_ymd(2025, 12, 31).unwrap(),
    ///     strike: 90.0,
    ///     value: 0.21,
    ///     date: Date::from_ymd(2024, 1, 1).unwrap(),
    ///     vendor_adjusted: false,
    /// };
    /// assert_eq!(q.label(), "FR0000120271 2025-12-31 90.0000%");
    /// ```
    pub fn label(&self) -> String {
        format!("{} {} {:.4}%", self.instrument, self.maturity, self.strike)
    }
}

/// One decoded extract record.
#[derive(Debug, Clone, PartialEq)]
pub enum RawQuote {
    /// Spot record
    Spot(SpotQuote),
    /// Forward price record
    Forward(TermQuote),
    /// Growth rate record
    ForwardGrowthRate(TermQuote),
    /// Volatility record
    Volatility(VolQuote),
}

impl RawQuote {
    /// Kind of this record.
    pub fn kind(&self) -> QuoteKind {
        match self {
            Self::Spot(_) => QuoteKind::Spot,
            Self::Forward(_) => QuoteKind::Forward,
            Self::ForwardGrowthRate(_) => QuoteKind::ForwardGrowthRate,
            Self::Volatility(_) => QuoteKind::Volatility,
        }
    }

    /// Instrument identifier.
    pub fn instrument(&self) -> &str {
        match self {
            Self::Spot(q) => &q.instrument,
            Self::Forward(q) | Self::ForwardGrowthRate(q) => &q.instrument,
            Self::Volatility(q) => &q.instrument,
        }
    }

    /// Observation date.
    pub fn date(&self) -> Date {
        match self {
            Self::Spot(q) => q.date,
            Self::Forward(q) | Self::ForwardGrowthRate(q) => q.date,
            Self::Volatility(q) => q.date,
        }
    }

    /// Quoted value.
    pub fn value(&self) -> f64 {
        match self {
            Self::Spot(q) => q.value,
            Self::Forward(q) | Self::ForwardGrowthRate(q) => q.value,
            Self::Volatility(q) => q.value,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tags_round_trip_through_display() {
        for kind in [
            QuoteKind::Spot,
            QuoteKind::Forward,
            QuoteKind::ForwardGrowthRate,
            QuoteKind::Volatility,
        ] {
            assert_eq!(QuoteKind::from_tag(&kind.to_string()), Some(kind));
        }
    }

    #[test]
    fn test_tags_are_case_sensitive() {
        assert_eq!(QuoteKind::from_tag("spot"), None);
        assert_eq!(QuoteKind::from_tag("Asset_Spot"), None);
    }

    #[test]
    fn test_accessors() {
        let date = Date::from_ymd(2024, 3, 15).unwrap();
        let q = RawQuote::ForwardGrowthRate(TermQuote {
            instrument: "FR0000120271".to_string(),
            maturity: Date::from_ymd(2026, 3, 15).unwrap(),
            value: 0.03,
            date,
            vendor_adjusted: false,
        });
        assert_eq!(q.kind(), QuoteKind::ForwardGrowthRate);
        assert_eq!(q.instrument(), "FR0000120271");
        assert_eq!(q.date(), date);
        assert_eq!(q.value(), 0.03);
        if let RawQuote::ForwardGrowthRate(t) = &q {
            assert_eq!(t.label(), "FR0000120271 2026-03-15");
        }
    }
}
