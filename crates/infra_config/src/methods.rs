//! Method and policy selectors.
//!
//! Each selector reads and writes the same kebab-case names in TOML, in
//! environment overrides and on the command line.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Forward-curve method chain.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ForwardMethod {
    /// Least-squares cubic spline, then monotone cubic, then linear
    #[default]
    Spline,
    /// Monotone cubic, then linear
    Monotone,
    /// Linear only
    Linear,
    /// Exponential least-squares fit, then monotone cubic, then linear
    Parametric,
}

/// Volatility-surface method chain.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum VolatilityMethod {
    /// Clough-Tocher, then linear triangulation
    #[default]
    CloughTocher,
    /// Linear triangulation only
    Linear,
}

/// What to do when a row's (synthetic id, date) key already exists.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ConflictPolicy {
    /// Keep the existing row (first writer wins)
    #[default]
    InsertIfAbsent,
    /// Replace the existing value (last writer wins)
    UpsertOverwrite,
}

macro_rules! selector_names {
    ($ty:ty, $label:literal, { $($variant:path => $name:literal),+ $(,)? }) => {
        impl $ty {
            /// Configuration name of this value.
            pub fn as_str(&self) -> &'static str {
                match self {
                    $($variant => $name),+
                }
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $ty {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim().to_lowercase().as_str() {
                    $($name => Ok($variant),)+
                    other => Err(format!(
                        "Invalid {} '{}'. Valid values: {:?}",
                        $label,
                        other,
                        [$($name),+]
                    )),
                }
            }
        }
    };
}

selector_names!(ForwardMethod, "forward method", {
    ForwardMethod::Spline => "spline",
    ForwardMethod::Monotone => "monotone",
    ForwardMethod::Linear => "linear",
    ForwardMethod::Parametric => "parametric",
});

selector_names!(VolatilityMethod, "volatility method", {
    VolatilityMethod::CloughTocher => "clough-tocher",
    VolatilityMethod::Linear => "linear",
});

selector_names!(ConflictPolicy, "conflict policy", {
    ConflictPolicy::InsertIfAbsent => "insert-if-absent",
    ConflictPolicy::UpsertOverwrite => "upsert-overwrite",
});

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_names() {
        assert_eq!("spline".parse::<ForwardMethod>(), Ok(ForwardMethod::Spline));
        assert_eq!(" Parametric ".parse::<ForwardMethod>(), Ok(ForwardMethod::Parametric));
        assert_eq!(
            "clough-tocher".parse::<VolatilityMethod>(),
            Ok(VolatilityMethod::CloughTocher)
        );
        assert_eq!(
            "upsert-overwrite".parse::<ConflictPolicy>(),
            Ok(ConflictPolicy::UpsertOverwrite)
        );
    }

    #[test]
    fn test_parse_rejects_unknown() {
        let err = "cubic".parse::<ForwardMethod>().unwrap_err();
        assert!(err.contains("forward method"));
        assert!(err.contains("parametric"));
    }

    #[derive(Deserialize)]
    struct Wrapper {
        p: ConflictPolicy,
    }

    #[test]
    fn test_display_matches_serde_name() {
        for policy in [ConflictPolicy::InsertIfAbsent, ConflictPolicy::UpsertOverwrite] {
            let w: Wrapper = toml::from_str(&format!("p = \"{}\"", policy)).unwrap();
            assert_eq!(w.p, policy);
        }
    }

    #[test]
    fn test_defaults() {
        assert_eq!(ForwardMethod::default(), ForwardMethod::Spline);
        assert_eq!(VolatilityMethod::default(), VolatilityMethod::CloughTocher);
        assert_eq!(ConflictPolicy::default(), ConflictPolicy::InsertIfAbsent);
    }
}
