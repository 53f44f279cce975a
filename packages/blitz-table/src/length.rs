//! Declared widths and heights
//!
//! HTML tables predate CSS lengths: a width is either a pixel count, a percentage of the
//! available width, a relative weight (`2*`) or nothing at all. The solver only ever needs
//! to know which of those it is dealing with and, for the first two, the resolved pixel value.

use std::fmt;
use std::str::FromStr;

use crate::error::LengthParseError;

/// The kind of a [`Length`].
///
/// Kinds are ordered by how specific a constraint they express:
/// `Undefined < Variable < Relative < Percent < Fixed`. When several sources declare a
/// width for the same column the more specific one wins.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LengthKind {
    /// Nothing declared, inherit from the enclosing declaration if there is one
    Undefined,
    /// Size to content
    #[default]
    Variable,
    /// Share of the leftover width, weighted by `value`
    Relative,
    /// `value` percent of the available width
    Percent,
    /// `value` pixels
    Fixed,
}

impl LengthKind {
    /// Tiers visited when a spanning cell hands out width, least specific first
    pub(crate) const SPREAD_ORDER: [LengthKind; 4] = [
        LengthKind::Variable,
        LengthKind::Relative,
        LengthKind::Percent,
        LengthKind::Fixed,
    ];

    /// `Undefined` behaves like `Variable` once a column has been resolved
    pub(crate) fn normalized(self) -> LengthKind {
        match self {
            LengthKind::Undefined => LengthKind::Variable,
            kind => kind,
        }
    }
}

/// A declared width or height
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Length {
    pub kind: LengthKind,
    pub value: i32,
}

impl Length {
    pub const fn new(kind: LengthKind, value: i32) -> Self {
        Self { kind, value }
    }

    pub const fn fixed(px: i32) -> Self {
        Self::new(LengthKind::Fixed, px)
    }

    pub const fn percent(percent: i32) -> Self {
        Self::new(LengthKind::Percent, percent)
    }

    pub const fn relative(weight: i32) -> Self {
        Self::new(LengthKind::Relative, weight)
    }

    pub const fn variable() -> Self {
        Self::new(LengthKind::Variable, 0)
    }

    pub const fn undefined() -> Self {
        Self::new(LengthKind::Undefined, 0)
    }

    pub fn is_fixed(&self) -> bool {
        self.kind == LengthKind::Fixed
    }

    pub fn is_percent(&self) -> bool {
        self.kind == LengthKind::Percent
    }

    pub fn is_undefined(&self) -> bool {
        self.kind == LengthKind::Undefined
    }

    /// Resolve to pixels against `available`.
    ///
    /// Only `Fixed` and `Percent` resolve to something; flexible kinds return 0 and are
    /// sized by the column solver instead.
    pub fn resolve(&self, available: i32) -> i32 {
        match self.kind {
            LengthKind::Fixed => self.value,
            LengthKind::Percent => mul_div(available, self.value, 100),
            LengthKind::Relative | LengthKind::Variable | LengthKind::Undefined => 0,
        }
    }
}

impl fmt::Display for Length {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            LengthKind::Fixed => write!(f, "{}px", self.value),
            LengthKind::Percent => write!(f, "{}%", self.value),
            LengthKind::Relative => write!(f, "{}*", self.value),
            LengthKind::Variable => write!(f, "auto"),
            LengthKind::Undefined => write!(f, "undefined"),
        }
    }
}

/// Strict parsing of HTML length attributes: `120`, `120px`, `50%`, `3*`, `*` and `auto`.
///
/// Use [`crate::attrs::parse_length`] for the forgiving variant used on real markup.
impl FromStr for Length {
    type Err = LengthParseError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(LengthParseError::Empty);
        }
        if trimmed.eq_ignore_ascii_case("auto") {
            return Ok(Length::variable());
        }

        let (digits, kind) = if let Some(rest) = trimmed.strip_suffix('%') {
            (rest, LengthKind::Percent)
        } else if let Some(rest) = trimmed.strip_suffix('*') {
            // A bare `*` is a weight of one
            if rest.trim().is_empty() {
                return Ok(Length::relative(1));
            }
            (rest, LengthKind::Relative)
        } else if let Some(rest) = trimmed.strip_suffix("px") {
            (rest, LengthKind::Fixed)
        } else {
            (trimmed, LengthKind::Fixed)
        };

        let digits = digits.trim();
        // Fractional values are truncated the way legacy engines do
        let integral = digits.split('.').next().unwrap_or_default();
        let value: i32 = integral
            .parse()
            .map_err(|_| LengthParseError::invalid_number(input))?;
        if value < 0 {
            return Err(LengthParseError::Negative { value });
        }

        Ok(Length::new(kind, value))
    }
}

/// `a * b / c` without intermediate overflow, truncating toward zero. Returns 0 when `c` is 0.
pub(crate) fn mul_div(a: i32, b: i32, c: i32) -> i32 {
    if c == 0 {
        return 0;
    }
    let result = (a as i64 * b as i64) / c as i64;
    result.clamp(i32::MIN as i64, i32::MAX as i64) as i32
}
