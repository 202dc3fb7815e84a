// Forced sentence case: first character upper, everything else lower.
// Applied to display text fields and column headers, not to sentinel
// or identifier fields.
#[must_use]
pub fn sentence_case(text: &str) -> String {
    let mut chars = text.chars();
    let Some(first) = chars.next() else {
        return String::new();
    };

    let mut out = String::with_capacity(text.len());
    out.extend(first.to_uppercase());
    out.extend(chars.flat_map(char::to_lowercase));
    out
}

#[cfg(test)]
mod tests {
    use super::sentence_case;

    #[test]
    fn lowers_everything_after_the_first_char() {
        assert_eq!(sentence_case("hello WORLD"), "Hello world");
        assert_eq!(sentence_case("OSS PROJECT"), "Oss project");
    }

    #[test]
    fn empty_input_stays_empty() {
        assert_eq!(sentence_case(""), "");
    }

    #[test]
    fn single_character_and_sentinels_survive() {
        assert_eq!(sentence_case("a"), "A");
        assert_eq!(sentence_case("-"), "-");
    }

    #[test]
    fn handles_multibyte_first_char() {
        assert_eq!(sentence_case("éCOLE"), "École");
    }
}
