//! Presentational HTML attributes
//!
//! Converts the attributes of `<table>`, `<td>`/`<th>`, `<col>` and `<colgroup>` into
//! engine inputs. Real-world markup is sloppy, so everything here is forgiving: unknown
//! attributes are ignored and unparsable values fall back to their defaults.

use crate::cell::{CellSpec, VerticalAlign};
use crate::col_info::{ColumnDecl, ColumnGroupDecl};
use crate::config::{Frame, Rules, TableConfig};
use crate::error::TableResult;
use crate::length::{Length, LengthKind};

/// Parse a length attribute, accepting whatever browsers accept.
///
/// A valid value parses as with [`str::parse`]. Otherwise the leading digits are used
/// (`"50abc"` is 50px, `"50 %"` is 50%); with no leading digits the length is `auto`.
pub fn parse_length(value: &str) -> Length {
    match value.parse::<Length>() {
        Ok(length) => length,
        Err(_err) => {
            let length = leading_length(value).unwrap_or_default();
            #[cfg(feature = "tracing")]
            tracing::debug!(
                "Lenient length parse of {:?} ({}), using {}",
                value,
                _err,
                length
            );
            length
        }
    }
}

/// Parse a length attribute, rejecting anything malformed
pub fn parse_length_strict(value: &str) -> TableResult<Length> {
    Ok(value.parse::<Length>()?)
}

fn leading_length(value: &str) -> Option<Length> {
    let trimmed = value.trim_start();
    let end = trimmed
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(trimmed.len());
    let number: i32 = trimmed[..end].parse().ok()?;
    let kind = match trimmed[end..].trim_start().chars().next() {
        Some('%') => LengthKind::Percent,
        Some('*') => LengthKind::Relative,
        _ => LengthKind::Fixed,
    };
    Some(Length::new(kind, number))
}

/// Leading integer of an attribute value, if there is one
fn parse_int(value: &str) -> Option<i32> {
    let trimmed = value.trim();
    let (negative, digits) = match trimmed.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, trimmed),
    };
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    let number: i32 = digits[..end].parse().ok()?;
    Some(if negative { -number } else { number })
}

pub fn parse_frame(value: &str) -> Option<Frame> {
    match value.trim().to_ascii_lowercase().as_str() {
        "void" => Some(Frame::VOID),
        "border" | "box" => Some(Frame::BOX),
        "hsides" => Some(Frame::HSIDES),
        "vsides" => Some(Frame::VSIDES),
        "above" => Some(Frame::ABOVE),
        "below" => Some(Frame::BELOW),
        "lhs" => Some(Frame::LHS),
        "rhs" => Some(Frame::RHS),
        _ => None,
    }
}

pub fn parse_rules(value: &str) -> Option<Rules> {
    match value.trim().to_ascii_lowercase().as_str() {
        "none" => Some(Rules::None),
        "groups" => Some(Rules::Groups),
        "rows" => Some(Rules::Rows),
        "cols" => Some(Rules::Cols),
        "all" => Some(Rules::All),
        _ => None,
    }
}

pub fn parse_valign(value: &str) -> Option<VerticalAlign> {
    match value.trim().to_ascii_lowercase().as_str() {
        "top" => Some(VerticalAlign::Top),
        "middle" | "center" => Some(VerticalAlign::Middle),
        "bottom" => Some(VerticalAlign::Bottom),
        "baseline" => Some(VerticalAlign::Baseline),
        _ => None,
    }
}

impl TableConfig {
    /// Build a config from the attributes of a `<table>` element, in document order
    pub fn from_attributes<'a>(attrs: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        let mut config = TableConfig::default();
        for (name, value) in attrs {
            match name.to_ascii_lowercase().as_str() {
                "width" => config.width = parse_length(value),
                "height" => config.height = parse_length(value),
                // A bare `border` means a one pixel border
                "border" if value.trim().is_empty() => config.set_border(1),
                "border" => config.set_border(parse_int(value).unwrap_or(0)),
                "frame" => {
                    if let Some(frame) = parse_frame(value) {
                        config.frame = frame;
                    }
                }
                "rules" => {
                    if let Some(rules) = parse_rules(value) {
                        config.rules = rules;
                    }
                }
                "cellspacing" => {
                    if let Some(spacing) = parse_int(value) {
                        config.spacing = spacing.max(0);
                    }
                }
                "cellpadding" => {
                    if let Some(padding) = parse_int(value) {
                        config.padding = padding.max(0);
                    }
                }
                "cols" => {
                    if let Some(cols) = parse_int(value) {
                        config.columns = cols.max(0) as usize;
                    }
                }
                _ => {}
            }
        }
        config
    }
}

impl CellSpec {
    /// Build a cell spec from the attributes of a `<td>` or `<th>` element
    pub fn from_attributes<'a>(attrs: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        let mut spec = CellSpec::default();
        for (name, value) in attrs {
            match name.to_ascii_lowercase().as_str() {
                "rowspan" => spec = spec.with_row_span(parse_int(value).unwrap_or(1)),
                "colspan" => spec = spec.with_col_span(parse_int(value).unwrap_or(1)),
                "nowrap" => spec.no_wrap = true,
                "width" => spec.width = parse_length(value),
                "height" => spec.height = parse_length(value),
                "valign" => {
                    if let Some(valign) = parse_valign(value) {
                        spec.valign = valign;
                    }
                }
                _ => {}
            }
        }
        spec
    }
}

impl ColumnDecl {
    /// Build a column declaration from the attributes of a `<col>` element
    pub fn from_attributes<'a>(attrs: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        let mut column = ColumnDecl::default();
        for (name, value) in attrs {
            match name.to_ascii_lowercase().as_str() {
                "span" => column = column.with_span(parse_int(value).unwrap_or(1)),
                "width" => column.width = parse_length(value),
                _ => {}
            }
        }
        column
    }
}

impl ColumnGroupDecl {
    /// Build a column group from the attributes of a `<colgroup>` element. Child columns
    /// are added with [`with_column`](Self::with_column).
    pub fn from_attributes<'a>(attrs: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        let mut group = ColumnGroupDecl::default();
        for (name, value) in attrs {
            match name.to_ascii_lowercase().as_str() {
                "span" => group = group.with_span(parse_int(value).unwrap_or(1)),
                "width" => group.width = parse_length(value),
                _ => {}
            }
        }
        group
    }
}
