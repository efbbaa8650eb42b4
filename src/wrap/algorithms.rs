//! Line-breaking algorithms.
//!
//! Both take a single unwrapped line and return the lines it breaks into.
//! Lengths are counted in `char`s, so a tab placeholder or a CJK ideograph
//! each count as one column.

/// Cost multiplier for every column a line overflows the width.
const OVERFLOW_PENALTY: u128 = 10_000_000_000;

/// Break `text` greedily so lines fit in `width` columns where possible.
///
/// Each line ends at the last space that keeps it within `width`. A word longer
/// than `width` stays whole and the line ends at the first space after it.
/// Trailing empty lines are dropped, so empty input yields no lines.
pub fn wrap_greedy(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let chars: Vec<char> = text.chars().collect();
    let len = chars.len();
    let mut lines = Vec::new();
    let mut offset = 0;

    while len - offset > width {
        if chars[offset] == ' ' {
            offset += 1;
            continue;
        }

        let limit = offset + width;
        let split = chars[offset..=limit]
            .iter()
            .rposition(|&c| c == ' ')
            .map(|i| i + offset)
            .or_else(|| chars[limit..].iter().position(|&c| c == ' ').map(|i| i + limit));

        let Some(split) = split else {
            break;
        };
        lines.push(chars[offset..split].iter().collect());
        offset = split + 1;
    }

    lines.push(chars[offset..].iter().collect());
    drop_trailing_empty(&mut lines);
    lines
}

/// Break `text` so the sum of squared trailing space over all lines is minimal.
///
/// Words are separated by single spaces. A line wider than `width` costs
/// [`OVERFLOW_PENALTY`] per overflowing column, regardless of the lines before
/// it. Ties resolve to the earliest break.
pub fn wrap_minimum_raggedness(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let words: Vec<&str> = text.split(' ').collect();
    let count = words.len();

    // offsets[k] is the total length of the first k words
    let mut offsets = Vec::with_capacity(count + 1);
    offsets.push(0_usize);
    for word in &words {
        let last = offsets.last().copied().unwrap_or(0);
        offsets.push(last + word.chars().count());
    }

    let mut minima = vec![u128::MAX; count + 1];
    let mut breaks = vec![0_usize; count + 1];
    minima[0] = 0;

    for j in 1..=count {
        // Lines widen as i falls, and past the first overflow they only cost more.
        // `<=` keeps the earliest break on ties.
        for i in (0..j).rev() {
            let line_width = offsets[j] - offsets[i] + (j - i - 1);
            let cost = line_cost(minima[i], line_width, width);
            if cost <= minima[j] {
                minima[j] = cost;
                breaks[j] = i;
            }
            if line_width > width {
                break;
            }
        }
    }

    let mut lines = Vec::new();
    let mut j = count;
    while j > 0 {
        let i = breaks[j];
        lines.push(words[i..j].join(" "));
        j = i;
    }
    lines.reverse();
    drop_trailing_empty(&mut lines);
    lines
}

fn line_cost(before: u128, line_width: usize, width: usize) -> u128 {
    if line_width > width {
        OVERFLOW_PENALTY * (line_width - width) as u128
    } else {
        let slack = (width - line_width) as u128;
        before.saturating_add(slack * slack)
    }
}

fn drop_trailing_empty(lines: &mut Vec<String>) {
    while lines.last().is_some_and(String::is_empty) {
        lines.pop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn greedy_breaks_at_last_fitting_space() {
        let lines = wrap_greedy("the quick brown fox jumps", 10);
        assert_eq!(lines, vec!["the quick", "brown fox", "jumps"]);
    }

    #[test]
    fn greedy_keeps_long_word_whole() {
        let lines = wrap_greedy("a supercalifragilistic word", 5);
        assert_eq!(lines, vec!["a", "supercalifragilistic", "word"]);
    }

    #[test]
    fn greedy_long_word_without_spaces_is_one_line() {
        let word = "x".repeat(30);
        assert_eq!(wrap_greedy(&word, 10), vec![word]);
    }

    #[test]
    fn greedy_empty_input_has_no_lines() {
        assert!(wrap_greedy("", 80).is_empty());
    }

    #[test]
    fn greedy_short_input_is_untouched() {
        assert_eq!(wrap_greedy("short", 80), vec!["short"]);
    }

    #[test]
    fn greedy_zero_width_still_terminates() {
        assert_eq!(wrap_greedy("a b", 0), vec!["a", "b"]);
    }

    #[test]
    fn greedy_counts_chars_not_bytes() {
        // Six ideographs fit exactly in six columns.
        assert_eq!(wrap_greedy("一二三四五六 七", 6), vec!["一二三四五六", "七"]);
    }

    #[test]
    fn raggedness_balances_lines() {
        // Greedy would give "aaa bb cc" / "ddddd"; balancing moves a word down.
        let greedy = wrap_greedy("aaa bb cc ddddd", 9);
        assert_eq!(greedy, vec!["aaa bb cc", "ddddd"]);

        let balanced = wrap_minimum_raggedness("aaa bb cc ddddd", 9);
        assert_eq!(balanced, vec!["aaa bb", "cc ddddd"]);
    }

    #[test]
    fn raggedness_single_word() {
        assert_eq!(wrap_minimum_raggedness("word", 10), vec!["word"]);
    }

    #[test]
    fn raggedness_empty_input_has_no_lines() {
        assert!(wrap_minimum_raggedness("", 10).is_empty());
    }

    /// Every break considered, earliest break on ties.
    fn exhaustive_breaks(text: &str, width: usize) -> Vec<String> {
        let words: Vec<&str> = text.split(' ').collect();
        let count = words.len();
        let mut minima = vec![u128::MAX; count + 1];
        let mut breaks = vec![0_usize; count + 1];
        minima[0] = 0;
        for j in 1..=count {
            for i in 0..j {
                let line_width = words[i..j].join(" ").chars().count();
                let cost = line_cost(minima[i], line_width, width);
                if cost < minima[j] {
                    minima[j] = cost;
                    breaks[j] = i;
                }
            }
        }
        let mut lines = Vec::new();
        let mut j = count;
        while j > 0 {
            lines.push(words[breaks[j]..j].join(" "));
            j = breaks[j];
        }
        lines.reverse();
        drop_trailing_empty(&mut lines);
        lines
    }

    #[test]
    fn raggedness_search_matches_exhaustive_search() {
        let texts = [
            "aaa bb cc ddddd",
            "a bbbbbbbbbbbb c",
            "the quick brown fox jumps over the lazy dog and keeps running far away",
            "x y z  double  spaces and a verylongwordthatoverflows everything here",
            "aa aa aa aa aa aa aa aa aa aa",
            "一二三 四五 六七八九 十",
        ];
        for text in texts {
            for width in [1, 3, 5, 8, 10, 13, 20, 40] {
                assert_eq!(wrap_minimum_raggedness(text, width), exhaustive_breaks(text, width), "{text:?} at {width}");
            }
        }
    }

    #[test]
    fn raggedness_handles_many_words() {
        let text = vec!["word"; 20_000].join(" ");
        let lines = wrap_minimum_raggedness(&text, 80);
        assert!(lines.iter().all(|line| line.chars().count() <= 80));
        assert_eq!(lines.join(" "), text);
    }

    #[test]
    fn raggedness_overlong_word_gets_own_line() {
        let lines = wrap_minimum_raggedness("a bbbbbbbbbbbb c", 5);
        assert_eq!(lines, vec!["a", "bbbbbbbbbbbb", "c"]);
    }
}
