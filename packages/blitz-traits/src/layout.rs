//! The capability every box in a layout tree exposes to its parent

/// Content width measurements
///
/// `min` is the narrowest width the content can be laid out in without overflowing,
/// `max` the width it would take up if it never had to wrap.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ContentWidths {
    pub min: i32,
    pub max: i32,
}

impl ContentWidths {
    pub const ZERO: Self = Self { min: 0, max: 0 };

    /// Create measurements, raising `max` to `min` if a box reports them inverted.
    pub fn new(min: i32, max: i32) -> Self {
        let min = min.max(0);
        Self {
            min,
            max: max.max(min),
        }
    }

    /// Both widths set to the same value, as reported by content that cannot wrap
    pub fn fixed(width: i32) -> Self {
        Self::new(width, width)
    }
}

/// Result of a layout request, reported upwards to the parent box
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LayoutStatus {
    /// The box fit into the width it was given
    #[default]
    Done,
    /// The box needs more width than it was given and asks its parent to re-layout
    NeedsResize,
}

impl LayoutStatus {
    pub fn needs_resize(self) -> bool {
        self == LayoutStatus::NeedsResize
    }

    /// Combine the status of two sibling boxes
    pub fn merge(self, other: LayoutStatus) -> LayoutStatus {
        if self.needs_resize() || other.needs_resize() {
            LayoutStatus::NeedsResize
        } else {
            LayoutStatus::Done
        }
    }
}

/// A box that can be measured and laid out by its parent.
///
/// The protocol is the classic two-pass one: the parent first asks for the
/// intrinsic widths ([`calc_min_max_width`](LayoutBox::calc_min_max_width)),
/// then hands down the width it settled on ([`set_available_width`](LayoutBox::set_available_width))
/// and finally asks for a [`layout`](LayoutBox::layout).
pub trait LayoutBox {
    /// Intrinsic min/max widths of the box
    fn calc_min_max_width(&mut self) -> ContentWidths;

    /// Width the parent made available to this box
    fn set_available_width(&mut self, width: i32);

    /// Lay the box out within its available width. When `deep` is set, descendants are laid out too.
    fn layout(&mut self, deep: bool) -> LayoutStatus;

    /// Used width after layout
    fn width(&self) -> i32;

    /// Used height after layout
    fn height(&self) -> i32;

    /// Distance from the top of the box to the baseline of its first line, if it has one
    fn baseline_offset(&self) -> Option<i32> {
        None
    }

    /// Notification that the content of this box changed size after it was laid out
    fn update_size(&mut self) -> LayoutStatus {
        LayoutStatus::Done
    }
}

impl<T: LayoutBox + ?Sized> LayoutBox for Box<T> {
    fn calc_min_max_width(&mut self) -> ContentWidths {
        (**self).calc_min_max_width()
    }

    fn set_available_width(&mut self, width: i32) {
        (**self).set_available_width(width)
    }

    fn layout(&mut self, deep: bool) -> LayoutStatus {
        (**self).layout(deep)
    }

    fn width(&self) -> i32 {
        (**self).width()
    }

    fn height(&self) -> i32 {
        (**self).height()
    }

    fn baseline_offset(&self) -> Option<i32> {
        (**self).baseline_offset()
    }

    fn update_size(&mut self) -> LayoutStatus {
        (**self).update_size()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_widths_never_inverted() {
        let widths = ContentWidths::new(40, 10);
        assert_eq!(widths.min, 40);
        assert_eq!(widths.max, 40);

        let negative = ContentWidths::new(-5, 20);
        assert_eq!(negative, ContentWidths { min: 0, max: 20 });
    }

    #[test]
    fn test_layout_status_merge() {
        assert_eq!(LayoutStatus::Done.merge(LayoutStatus::Done), LayoutStatus::Done);
        assert_eq!(
            LayoutStatus::Done.merge(LayoutStatus::NeedsResize),
            LayoutStatus::NeedsResize
        );
        assert!(LayoutStatus::NeedsResize.merge(LayoutStatus::Done).needs_resize());
    }
}
