use unicode_width::UnicodeWidthStr;

/// Display columns a string occupies; Hangul syllables are double-width.
pub fn display_width(s: &str) -> usize {
    UnicodeWidthStr::width(s)
}

/// Keep the tail of `s` that fits in `max` columns. Append-style editors
/// always want the end of the text visible, so truncation drops from the
/// front.
pub fn fit_tail(s: &str, max: usize) -> &str {
    if display_width(s) <= max {
        return s;
    }
    for (idx, _) in s.char_indices() {
        if display_width(&s[idx..]) <= max {
            return &s[idx..];
        }
    }
    ""
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ascii_is_single_width() {
        assert_eq!(display_width("hello"), 5);
    }

    #[test]
    fn hangul_is_double_width() {
        assert_eq!(display_width("홍길동"), 6);
        assert_eq!(display_width("이름: 홍길동"), 10);
    }

    #[test]
    fn fit_tail_returns_short_strings_unchanged() {
        assert_eq!(fit_tail("abc", 10), "abc");
        assert_eq!(fit_tail("", 5), "");
    }

    #[test]
    fn fit_tail_keeps_the_end() {
        assert_eq!(fit_tail("abcdef", 3), "def");
    }

    #[test]
    fn fit_tail_respects_double_width_boundaries() {
        // each syllable is 2 columns; 5 columns fit only two of them
        assert_eq!(fit_tail("가나다라", 5), "다라");
        assert_eq!(fit_tail("가나다라", 4), "다라");
    }

    #[test]
    fn fit_tail_with_zero_budget_is_empty() {
        assert_eq!(fit_tail("abc", 0), "");
    }
}
