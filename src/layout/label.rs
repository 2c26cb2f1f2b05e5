//! Count labels and the bubble size estimate derived from them

use crate::config::LayoutConfig;

/// Format a count the way bubble labels show it.
///
/// ```
/// use ferro_sv::layout::compact_count;
///
/// assert_eq!(compact_count(999), "999");
/// assert_eq!(compact_count(1250), "1.2K");
/// assert_eq!(compact_count(12_400), "12K");
/// assert_eq!(compact_count(3_400_000), "3.4M");
/// ```
pub fn compact_count(count: u64) -> String {
    fn scaled(count: u64, unit: u64, suffix: &str) -> String {
        if count < unit * 10 {
            let tenths = count * 10 / unit;
            if tenths % 10 == 0 {
                format!("{}{}", tenths / 10, suffix)
            } else {
                format!("{}.{}{}", tenths / 10, tenths % 10, suffix)
            }
        } else {
            format!("{}{}", count / unit, suffix)
        }
    }

    match count {
        0..=999 => count.to_string(),
        1_000..=999_999 => scaled(count, 1_000, "K"),
        _ => scaled(count, 1_000_000, "M"),
    }
}

/// Estimated size of a single-line label.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextSize {
    pub width: f64,
    pub height: f64,
}

/// Fixed-pitch text measurement.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LabelMetrics {
    pub char_width: f64,
    pub line_height: f64,
    pub padding: f64,
}

impl LabelMetrics {
    pub fn from_config(config: &LayoutConfig) -> Self {
        Self {
            char_width: config.label_char_width,
            line_height: config.label_line_height,
            padding: config.bubble_padding,
        }
    }

    pub fn text_size(&self, text: &str) -> TextSize {
        TextSize {
            width: text.chars().count() as f64 * self.char_width,
            height: self.line_height,
        }
    }

    /// Radius of a bubble labelled with `count`
    pub fn bubble_radius(&self, count: u64) -> f64 {
        let size = self.text_size(&compact_count(count));
        size.width.max(size.height) / 2.0 + self.padding
    }
}
