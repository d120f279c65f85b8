//! Human-readable size strings stored alongside items.
//!
//! The size column is display-only: it is computed once at creation time and
//! never re-derived, so the formatting here is part of the stored data
//! contract, not just presentation.

/// Size display for link items, which have no measurable content.
pub const LINK_SIZE_DISPLAY: &str = "-";

const BYTES_PER_MIB: f64 = 1_048_576.0;

/// Size display for a text item: the content's byte length.
pub fn text_size_display(content: &str) -> String {
    format!("{} bytes", content.len())
}

/// Size display for a file item: MiB to two decimal places.
pub fn file_size_display(size_bytes: u64) -> String {
    format!("{:.2} MB", size_bytes as f64 / BYTES_PER_MIB)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_size_counts_bytes() {
        assert_eq!(text_size_display("buy milk"), "8 bytes");
        assert_eq!(text_size_display(""), "0 bytes");
        // Multi-byte characters count as bytes, not chars.
        assert_eq!(text_size_display("héllo"), "6 bytes");
    }

    #[test]
    fn test_file_size_two_decimals() {
        assert_eq!(file_size_display(1_048_576), "1.00 MB");
        assert_eq!(file_size_display(1_572_864), "1.50 MB");
        assert_eq!(file_size_display(0), "0.00 MB");
        // Small files round down to fractions of a MB rather than switching units.
        assert_eq!(file_size_display(10_240), "0.01 MB");
    }

    #[test]
    fn test_link_size_placeholder() {
        assert_eq!(LINK_SIZE_DISPLAY, "-");
    }
}
