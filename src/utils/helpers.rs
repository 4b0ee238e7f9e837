//! Helper functions and utilities
//!
//! This module contains common helper functions used throughout the application.

/// Escape HTML special characters for Telegram HTML parse mode
///
/// Usernames and other user-supplied values are interpolated into HTML
/// captions and must not break out of their tags.
pub fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html("plain_name"), "plain_name");
        assert_eq!(escape_html("a<b>&c"), "a&lt;b&gt;&amp;c");
    }

    #[test]
    fn test_escape_html_ampersand_first() {
        assert_eq!(escape_html("<&>"), "&lt;&amp;&gt;");
    }
}
