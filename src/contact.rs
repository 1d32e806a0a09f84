//! Outbound WhatsApp contact link.
//!
//! The site's one outward boundary besides the document store: a deep
//! link opening a chat with the host, pre-filled with a greeting. The
//! link is stateless; number and greeting come from configuration.

use crate::config::EngagementConfig;

/// Builds a `wa.me` deep link for the given recipient and message.
///
/// The number is reduced to its digits (wa.me rejects `+`, spaces, and
/// separators) and the message is percent-encoded into the `text` query
/// parameter.
#[must_use]
pub fn whatsapp_link(number: &str, message: &str) -> String {
    let digits: String = number.chars().filter(char::is_ascii_digit).collect();
    format!("https://wa.me/{digits}?text={}", encode_query(message))
}

/// Builds the configured default contact link.
#[must_use]
pub fn default_contact_link(config: &EngagementConfig) -> String {
    whatsapp_link(&config.whatsapp_number, &config.whatsapp_greeting)
}

/// Percent-encodes a query value: RFC 3986 unreserved bytes pass through,
/// everything else is encoded bytewise over UTF-8.
fn encode_query(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for byte in raw.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                out.push(char::from(byte));
            }
            _ => {
                out.push('%');
                out.push_str(&format!("{byte:02X}"));
            }
        }
    }
    out
}
