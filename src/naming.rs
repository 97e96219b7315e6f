//! Exported-identifier formatting for schema keys.
//!
//! Turns arbitrary JSON keys (`snake_case`, `camelCase`, already `Capitalized`)
//! into exported type/field names. Well-known initialisms are capitalized as a
//! unit: `user_id` → `UserID`, `avatar_url` → `AvatarURL`.
use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;

// ------------------------------ Initialisms ------------------------------ //

/// Only entries that are highly unlikely to be ordinary words.
/// "ID" is fine; "AND" would not be.
static COMMON_INITIALISMS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "API", "ASCII", "CPU", "CSS", "DNS", "EOF", "GUID", "HTML", "HTTP", "HTTPS", "ID", "IP",
        "JSON", "LHS", "QPS", "RAM", "RHS", "RPC", "SLA", "SMTP", "SSH", "TLS", "TTL", "UI", "UID",
        "UUID", "URI", "URL", "UTF8", "VM", "XML",
    ]
    .into_iter()
    .collect()
});

static NON_IDENT_CHAR: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^\p{L}\p{N}]").unwrap());

/// True when `word` (any case) is one of the known initialisms.
pub fn is_initialism(word: &str) -> bool {
    COMMON_INITIALISMS.contains(word.to_uppercase().as_str())
}

// -------------------------------- Format --------------------------------- //

/// Format a raw schema key as an exported identifier.
///
/// Pure and total: keys that are empty or consist only of underscores come
/// back as `"_"`.
pub fn format_identifier(raw: &str) -> String {
    let name = raw.trim_start_matches('_');
    if name.is_empty() {
        return "_".to_string();
    }

    let cased = if is_lower_run(name) {
        capitalize_word(name)
    } else {
        join_words(name)
    };

    sanitize(&cased)
}

fn is_lower_run(s: &str) -> bool {
    s.chars().all(|c| c.is_lowercase() || c.is_ascii_digit())
}

/// Initialism → its uppercase form; all-lowercase → first char uppercased;
/// anything else passes through as given.
fn capitalize_word(word: &str) -> String {
    let upper = word.to_uppercase();
    if COMMON_INITIALISMS.contains(upper.as_str()) {
        return upper;
    }
    if word.to_lowercase() == word {
        let mut chars = word.chars();
        return match chars.next() {
            None => String::new(),
            Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        };
    }
    word.to_string()
}

/// Split on camelCase boundaries and underscore runs, then case each word.
fn join_words(name: &str) -> String {
    split_words(name)
        .iter()
        .map(|w| capitalize_word(w))
        .collect()
}

fn split_words(name: &str) -> Vec<String> {
    let chars: Vec<char> = name.chars().collect();
    let mut words = Vec::new();
    let mut current = String::new();
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        current.push(c);

        let next = chars.get(i + 1).copied();
        match next {
            None => {}
            Some('_') => {
                // skip the whole underscore run
                let mut j = i + 1;
                while j < chars.len() && chars[j] == '_' {
                    j += 1;
                }
                let after = chars.get(j).copied();
                let between_digits = c.is_ascii_digit()
                    && after.is_some_and(|a| a.is_ascii_digit());
                words.push(std::mem::take(&mut current));
                if between_digits {
                    current.push('_');
                }
                i = j;
                continue;
            }
            Some(n) if c.is_lowercase() && !n.is_lowercase() => {
                words.push(std::mem::take(&mut current));
            }
            Some(_) => {}
        }
        i += 1;
    }
    if !current.is_empty() {
        words.push(current);
    }
    words
}

/// Non-alphanumerics become `_`; the first character must be a letter.
fn sanitize(s: &str) -> String {
    let mut out = NON_IDENT_CHAR.replace_all(s, "_").into_owned();
    if out.chars().next().is_some_and(|c| !c.is_alphabetic()) {
        let first_len = out.chars().next().map(char::len_utf8).unwrap_or(0);
        out.replace_range(..first_len, "_");
    }
    out
}

// ------------------------------- Tests ------------------------------------ //

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn documented_examples() {
        assert_eq!(format_identifier("foo_id"), "FooID");
        assert_eq!(format_identifier("http_url"), "HTTPURL");
        assert_eq!(format_identifier("id"), "ID");
        assert_eq!(format_identifier("fooBar"), "FooBar");
        assert_eq!(format_identifier("user_id"), "UserID");
        assert_eq!(format_identifier("avatar_url"), "AvatarURL");
    }

    #[test]
    fn lowercase_runs() {
        assert_eq!(format_identifier("name"), "Name");
        assert_eq!(format_identifier("utf8"), "UTF8");
        assert_eq!(format_identifier("https"), "HTTPS");
        assert_eq!(format_identifier("v2"), "V2");
    }

    #[test]
    fn leading_underscores_are_stripped() {
        assert_eq!(format_identifier("_private"), "Private");
        assert_eq!(format_identifier("__created_at"), "CreatedAt");
    }

    #[test]
    fn underscore_runs_collapse() {
        assert_eq!(format_identifier("created__at"), "CreatedAt");
        assert_eq!(format_identifier("owner_"), "Owner");
    }

    #[test]
    fn underscore_between_digits_is_kept() {
        assert_eq!(format_identifier("v1_2"), "V1_2");
        assert_eq!(format_identifier("version_1__2"), "Version1_2");
        assert_eq!(format_identifier("rule_2"), "Rule2");
    }

    #[test]
    fn mixed_case_words_pass_through() {
        assert_eq!(format_identifier("userID"), "UserID");
        assert_eq!(format_identifier("HTTPServer"), "HTTPServer");
        assert_eq!(format_identifier("XMLHttpRequest"), "XMLHttpRequest");
        assert_eq!(format_identifier("getUrl"), "GetURL");
    }

    #[test]
    fn illegal_characters_become_underscores() {
        assert_eq!(format_identifier("content-type"), "Content_type");
        assert_eq!(format_identifier("a.b"), "A_b");
        assert_eq!(format_identifier("1st"), "_st");
        assert_eq!(format_identifier("$ref"), "_ref");
    }

    #[test]
    fn degenerate_inputs_are_total() {
        assert_eq!(format_identifier(""), "_");
        assert_eq!(format_identifier("___"), "_");
    }

    #[test]
    fn idempotent_on_exported_identifiers() {
        for raw in [
            "foo_id", "http_url", "id", "fooBar", "user_id", "avatar_url", "v1_2", "HTTPServer",
            "created_at", "getUrl", "api_key", "uuid",
        ] {
            let once = format_identifier(raw);
            assert_eq!(format_identifier(&once), once, "not idempotent for {raw:?}");
        }
    }

    #[test]
    fn initialism_lookup_ignores_case() {
        assert!(is_initialism("url"));
        assert!(is_initialism("Json"));
        assert!(!is_initialism("and"));
    }
}
