//! Hierarchy derivation for positional classification schemes.
//!
//! Every supported scheme encodes its hierarchy in the code string's shape
//! (length, trailing zero-run), so level and parent are pure functions of
//! the code — no lookup table is ever consulted. Unrecognized shapes are
//! non-fatal: they get the `Unknown` level and no parent, and callers skip
//! them when emitting hierarchy edges.

/// Level label returned for any code whose shape no tier recognizes.
pub const UNKNOWN_LEVEL: &str = "Unknown";

#[derive(Debug, Clone)]
enum SchemeRule {
    /// Level by exact code length; parent drops `stride` trailing characters
    /// per step down to a floor, which has no parent.
    Truncation {
        tiers: &'static [(usize, &'static str)],
        floor: usize,
        stride: usize,
    },
    /// Occupation-style `NN-NNNN` codes tiered by the trailing zero-run of
    /// the four-digit tail.
    TrailingZeros,
}

/// One classification scheme's derivation rules.
#[derive(Debug, Clone)]
pub struct CodeScheme {
    name: &'static str,
    rule: SchemeRule,
}

const INDUSTRY_TIERS: &[(usize, &'static str)] = &[
    (2, "Sector"),
    (3, "Subsector"),
    (4, "Industry Group"),
    (5, "NAICS Industry"),
    (6, "National Industry"),
];

const TARIFF_TIERS: &[(usize, &'static str)] = &[
    (2, "Chapter"),
    (4, "Heading"),
    (6, "Subheading"),
    (8, "Rate Line"),
    (10, "Statistical Suffix"),
];

impl CodeScheme {
    /// Industry codes: 2 through 6 digits, one character dropped per level,
    /// 2-digit sectors at the root.
    pub fn industry() -> Self {
        Self {
            name: "industry",
            rule: SchemeRule::Truncation {
                tiers: INDUSTRY_TIERS,
                floor: 2,
                stride: 1,
            },
        }
    }

    /// Tariff codes: even lengths from 2 to 10 digits, two digits dropped
    /// per level, 2-digit chapters at the root.
    pub fn tariff() -> Self {
        Self {
            name: "tariff",
            rule: SchemeRule::Truncation {
                tiers: TARIFF_TIERS,
                floor: 2,
                stride: 2,
            },
        }
    }

    /// Occupation codes: `NN-NNNN`, tiered by the trailing zero-run of the
    /// tail.
    pub fn occupation() -> Self {
        Self {
            name: "occupation",
            rule: SchemeRule::TrailingZeros,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// The code's level label, or `Unknown` for any unrecognized shape.
    pub fn level(&self, code: &str) -> &'static str {
        match &self.rule {
            SchemeRule::Truncation { tiers, .. } => {
                if !is_digits(code) {
                    return UNKNOWN_LEVEL;
                }
                tiers
                    .iter()
                    .find(|(len, _)| *len == code.len())
                    .map(|(_, label)| *label)
                    .unwrap_or(UNKNOWN_LEVEL)
            }
            SchemeRule::TrailingZeros => match occupation_parts(code) {
                Some((_, tail)) => match trailing_zeros(tail) {
                    4 => "Major Group",
                    2 | 3 => "Minor Group",
                    1 => "Broad Occupation",
                    _ => "Detailed Occupation",
                },
                None => UNKNOWN_LEVEL,
            },
        }
    }

    /// The parent code one level up, or `None` at the scheme's root and for
    /// unrecognized shapes.
    pub fn parent(&self, code: &str) -> Option<String> {
        match &self.rule {
            SchemeRule::Truncation { floor, stride, .. } => {
                if self.level(code) == UNKNOWN_LEVEL || code.len() <= *floor {
                    return None;
                }
                Some(code[..code.len() - stride].to_string())
            }
            SchemeRule::TrailingZeros => {
                let (prefix, tail) = occupation_parts(code)?;
                match trailing_zeros(tail) {
                    // Major groups are the root.
                    4 => None,
                    // Minor groups parent to their major group.
                    2 | 3 => Some(format!("{prefix}-0000")),
                    // Broad and detailed occupations both parent to the
                    // minor group (last two digits zeroed).
                    _ => Some(format!("{prefix}-{}00", &tail[..2])),
                }
            }
        }
    }
}

fn is_digits(code: &str) -> bool {
    !code.is_empty() && code.bytes().all(|b| b.is_ascii_digit())
}

/// Split `NN-NNNN` into prefix and tail; `None` for any other shape.
fn occupation_parts(code: &str) -> Option<(&str, &str)> {
    let (prefix, tail) = code.split_once('-')?;
    if prefix.len() == 2 && tail.len() == 4 && is_digits(prefix) && is_digits(tail) {
        Some((prefix, tail))
    } else {
        None
    }
}

fn trailing_zeros(tail: &str) -> usize {
    tail.bytes().rev().take_while(|b| *b == b'0').count()
}
