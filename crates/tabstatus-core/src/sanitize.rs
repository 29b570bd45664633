//! Title sanitization: redaction first, then length bounding.
//!
//! Redaction always runs on the full title before any truncation so a
//! partially cut address can never slip past the email pattern.

use crate::redaction::RedactionTable;
use regex::Regex;
use std::sync::OnceLock;

/// Replaces every email-shaped substring.
pub const EMAIL_PLACEHOLDER: &str = "[email]";
/// Prefix of every status: `On <title>`, or `On <label>` for redacted hosts.
pub const STATUS_PREFIX: &str = "On ";
pub const ELLIPSIS: &str = "...";

fn email_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"[A-Za-z0-9._%+-]+@(?:[A-Za-z0-9-]+\.)+[A-Za-z0-9]{2,4}")
            .expect("email pattern is valid")
    })
}

fn builtin_table() -> &'static RedactionTable {
    static TABLE: OnceLock<RedactionTable> = OnceLock::new();
    TABLE.get_or_init(RedactionTable::builtin)
}

/// Replace email addresses in `input` with [`EMAIL_PLACEHOLDER`].
pub fn redact_emails(input: &str) -> String {
    email_regex()
        .replace_all(input, EMAIL_PLACEHOLDER)
        .into_owned()
}

/// Bound `input` to `max_len` characters.
///
/// Below three characters there is no room for an ellipsis, so the text is
/// cut hard.
pub fn truncate(input: &str, max_len: usize) -> String {
    if input.chars().count() <= max_len {
        return input.to_string();
    }
    if max_len < ELLIPSIS.len() {
        return input.chars().take(max_len).collect();
    }
    let mut out: String = input.chars().take(max_len - ELLIPSIS.len()).collect();
    out.push_str(ELLIPSIS);
    out
}

fn host_of(source_url: &str) -> Option<String> {
    url::Url::parse(source_url)
        .ok()
        .and_then(|u| u.host_str().map(str::to_string))
}

/// Sanitizes titles against a fixed redaction table.
#[derive(Debug, Clone, Default)]
pub struct Sanitizer {
    table: RedactionTable,
}

impl Sanitizer {
    pub fn new(table: RedactionTable) -> Self {
        Self { table }
    }

    pub fn sanitize(&self, raw_title: &str, source_url: &str, max_len: usize) -> String {
        sanitize_with(&self.table, raw_title, source_url, max_len)
    }
}

/// [`Sanitizer::sanitize`] with the built-in redaction table.
pub fn sanitize(raw_title: &str, source_url: &str, max_len: usize) -> String {
    sanitize_with(builtin_table(), raw_title, source_url, max_len)
}

fn sanitize_with(
    table: &RedactionTable,
    raw_title: &str,
    source_url: &str,
    max_len: usize,
) -> String {
    let mut body = redact_emails(raw_title);
    if let Some(label) = host_of(source_url).and_then(|h| table.label_for(&h)) {
        body = format!("{STATUS_PREFIX}{label}");
    }
    truncate(&body, max_len)
}

#[cfg(test)]
mod tests {
    use super::*;

    const GMAIL: &str = "https://mail.google.com/mail/u/0/#inbox";
    const PLAIN: &str = "https://example.com/page";

    #[test]
    fn email_is_replaced_with_placeholder() {
        assert_eq!(
            sanitize("Contact me at a.b@example.com please", PLAIN, 100),
            "Contact me at [email] please"
        );
    }

    #[test]
    fn multiple_emails_and_subdomains() {
        assert_eq!(
            redact_emails("from x_y+z@mail.corp-1.co.uk to q@ab.io"),
            "from [email] to [email]"
        );
    }

    #[test]
    fn long_final_label_is_still_redacted() {
        let out = sanitize("Mail jane@example.community now", PLAIN, 100);
        assert!(!out.contains("jane@"), "{out}");
        assert_eq!(out, "Mail [email]unity now");
        assert!(!sanitize("ping bob@studio.design re: cut", PLAIN, 100).contains("bob@"));
        assert!(!sanitize("x first.last@corp.company y", PLAIN, 100).contains("first.last@"));
    }

    #[test]
    fn address_followed_by_word_character_is_redacted() {
        assert_eq!(redact_emails("a@b.com_old"), "[email]_old");
        assert_eq!(redact_emails("see jo@site.org2day"), "see [email]day");
    }

    #[test]
    fn digits_in_final_label_are_redacted() {
        assert_eq!(redact_emails("ops@host.c0m"), "[email]");
    }

    #[test]
    fn redacted_host_body_starts_with_status_prefix() {
        let body = sanitize(&format!("{STATUS_PREFIX}Inbox"), GMAIL, 100);
        assert!(body.starts_with(STATUS_PREFIX));
        assert_eq!(sanitize(&body, GMAIL, 100), body);
    }

    #[test]
    fn non_addresses_are_left_alone() {
        assert_eq!(redact_emails("@handle and a@b"), "@handle and a@b");
        assert_eq!(redact_emails("user@localhost"), "user@localhost");
    }

    #[test]
    fn redacted_domain_discards_title() {
        assert_eq!(sanitize("On Inbox (3) - me@x.com", GMAIL, 100), "On Gmail");
        assert_eq!(
            sanitize("anything at all", GMAIL, 100),
            sanitize("something else entirely", GMAIL, 100)
        );
    }

    #[test]
    fn redaction_is_idempotent_for_redacted_domains() {
        for n in [0, 1, 2, 3, 5, 8, 100] {
            let once = sanitize("On Secret thread with boss@corp.com", GMAIL, n);
            assert_eq!(sanitize(&once, GMAIL, n), once, "max_len={n}");
        }
    }

    #[test]
    fn short_plain_title_is_only_email_redacted() {
        let s = "Reply to jo@site.org now";
        assert_eq!(sanitize(s, PLAIN, 100), redact_emails(s));
    }

    #[test]
    fn tiny_max_len_hard_truncates() {
        for n in 0..3 {
            let out = sanitize("abcdefgh", PLAIN, n);
            assert_eq!(out.chars().count(), n);
            assert!(!out.contains('.'));
        }
    }

    #[test]
    fn long_title_gets_ellipsis() {
        let title = "x".repeat(150);
        for n in [3, 4, 10, 100] {
            let out = sanitize(&title, PLAIN, n);
            assert_eq!(out.chars().count(), n);
            assert!(out.ends_with(ELLIPSIS));
        }
    }

    #[test]
    fn exact_length_is_untouched() {
        let title = "y".repeat(100);
        assert_eq!(sanitize(&title, PLAIN, 100), title);
    }

    #[test]
    fn truncation_counts_characters_not_bytes() {
        let title = "é".repeat(10);
        let out = truncate(&title, 6);
        assert_eq!(out, "ééé...");
    }

    #[test]
    fn email_cut_by_truncation_never_leaks() {
        let title = format!("{} someone@private.net", "a".repeat(20));
        let out = sanitize(&title, PLAIN, 25);
        assert!(!out.contains("someone"));
    }

    #[test]
    fn unparsable_url_skips_domain_redaction() {
        assert_eq!(sanitize("Hello", "not a url", 100), "Hello");
    }

    #[test]
    fn custom_table_applies() {
        let sanitizer = Sanitizer::new(RedactionTable::with_extra([("wiki.corp", "Wiki")]));
        assert_eq!(
            sanitizer.sanitize("On Layoff plan", "https://wiki.corp/x", 100),
            "On Wiki"
        );
    }
}
