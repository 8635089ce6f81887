//! Deterministic text-to-identifier normalization.
//!
//! Turns arbitrary titles, aliases, and filename stems into lowercase
//! identifiers matching `[a-z0-9-]*`. Total function: never fails, empty
//! input yields an empty string, and the output is a fixed point of the
//! transform.

/// Characters replaced by a plain ASCII equivalent before filtering.
const TRANSLITERATE_FROM: &str = "àáäâèéëêìíïîòóöôùúüûñç·/_,:;";
const TRANSLITERATE_TO: &str = "aaaaeeeeiiiioooouuuunc------";

fn transliterate(ch: char) -> Option<char> {
    TRANSLITERATE_FROM
        .chars()
        .position(|c| c == ch)
        .and_then(|i| TRANSLITERATE_TO.chars().nth(i))
}

/// Normalize arbitrary text into a slug.
///
/// Trims, lowercases, maps accented characters and common punctuation to
/// ASCII or dashes, drops anything outside `[a-z0-9 -]`, then collapses
/// whitespace and dash runs into single dashes.
pub fn generate(input: &str) -> String {
    let lowered = input.trim().to_lowercase();
    let mut out = String::with_capacity(lowered.len());
    let mut last_dash = false;

    for ch in lowered.chars() {
        let ch = transliterate(ch).unwrap_or(ch);
        let ch = match ch {
            'a'..='z' | '0'..='9' => ch,
            ' ' | '-' => '-',
            _ => continue,
        };
        if ch == '-' {
            if last_dash {
                continue;
            }
            last_dash = true;
        } else {
            last_dash = false;
        }
        out.push(ch);
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn returns_eligible_slugs_unchanged() {
        assert_eq!(generate("books"), "books");
    }

    #[test]
    fn converts_to_lowercase() {
        assert_eq!(generate("UpPeRcAsEtEsT"), "uppercasetest");
    }

    #[test]
    fn replaces_underscores_with_dashes() {
        assert_eq!(generate("test_post"), "test-post");
    }

    #[test]
    fn replaces_spaces_with_dashes() {
        assert_eq!(generate("test post 123"), "test-post-123");
        assert_eq!(generate("test     post   123"), "test-post-123");
    }

    #[test]
    fn transliterates_accents() {
        assert_eq!(generate("Café au Lait"), "cafe-au-lait");
        assert_eq!(generate("naïve idée"), "naive-idee");
    }

    #[test]
    fn maps_punctuation_to_dashes() {
        assert_eq!(generate("a/b"), "a-b");
        assert_eq!(generate("one:two;three"), "one-two-three");
    }

    #[test]
    fn drops_invalid_characters() {
        assert_eq!(generate("hello! (world)"), "hello-world");
        assert_eq!(generate("100% sure"), "100-sure");
    }

    #[test]
    fn empty_input_yields_empty_slug() {
        assert_eq!(generate(""), "");
        assert_eq!(generate("   "), "");
    }

    #[test]
    fn output_alphabet_is_restricted() {
        for input in ["Test Post", "ünïcode", "a//b", "  x  y  "] {
            let slug = generate(input);
            assert!(
                slug.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-'),
                "unexpected character in slug {:?}",
                slug
            );
        }
    }

    #[test]
    fn is_idempotent() {
        for input in ["Test Post", "ünïcode", "a//b", "UPPER_case", "café"] {
            let once = generate(input);
            assert_eq!(generate(&once), once);
        }
    }
}
