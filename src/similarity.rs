//! Pure field-similarity functions. All of them are total: invalid or
//! unparseable input maps to 0.0, and every return value lies in [0, 1].

use chrono::{Datelike, NaiveDate};

/// Matching-blocks ratio between two strings after case-folding:
/// `2 * M / (|a| + |b|)` over characters, where M sums the lengths of
/// recursively chosen longest common substrings. Interleaved one-off
/// character matches do not count, so reordered tokens are penalized.
/// Two empty strings are an exact match.
pub fn text_similarity(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.to_uppercase().chars().collect();
    let b: Vec<char> = b.to_uppercase().chars().collect();
    if a.is_empty() && b.is_empty() {
        return 1.0;
    }
    let matched = matching_len(&a, &b);
    2.0 * matched as f64 / (a.len() + b.len()) as f64
}

/// Total length of matching blocks: take the longest common contiguous
/// block, then recurse on the slices to its left and to its right.
fn matching_len(a: &[char], b: &[char]) -> usize {
    let (i, j, len) = longest_block(a, b);
    if len == 0 {
        return 0;
    }
    len + matching_len(&a[..i], &b[..j]) + matching_len(&a[i + len..], &b[j + len..])
}

/// Longest common substring as `(start_a, start_b, len)`, two-row DP.
/// Ties go to the lowest `start_a`, then the lowest `start_b`.
fn longest_block(a: &[char], b: &[char]) -> (usize, usize, usize) {
    let mut best = (0, 0, 0);
    let mut prev = vec![0usize; b.len() + 1];
    let mut cur = vec![0usize; b.len() + 1];
    for (i, &ca) in a.iter().enumerate() {
        for (j, &cb) in b.iter().enumerate() {
            if ca == cb {
                let len = prev[j] + 1;
                cur[j + 1] = len;
                if len > best.2 {
                    best = (i + 1 - len, j + 1 - len, len);
                }
            } else {
                cur[j + 1] = 0;
            }
        }
        std::mem::swap(&mut prev, &mut cur);
    }
    best
}

/// Binary calendar-aware comparison: 1.0 iff both sides parse as dates and
/// the actual date equals the expected one, or equals the expected one with
/// day and month transposed (annotation noise frequently swaps them). A
/// transposition that does not form a valid date (day 13 and up) is not a
/// candidate; everything else is 0.0.
pub fn date_similarity(expected: &str, actual: &str) -> f64 {
    let (Some(expected), Some(actual)) = (parse_date(expected), parse_date(actual)) else {
        return 0.0;
    };
    if actual == expected {
        return 1.0;
    }
    let swapped = NaiveDate::from_ymd_opt(expected.year(), expected.day(), expected.month());
    if swapped == Some(actual) {
        return 1.0;
    }
    0.0
}

const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%d/%m/%Y",
    "%d-%m-%Y",
    "%d.%m.%Y",
    "%m/%d/%Y",
    "%d/%m/%y",
    "%d %b %Y",
    "%d %B %Y",
    "%b %d, %Y",
    "%B %d, %Y",
];

fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
}

/// Relative-error score for monetary amounts. Currency symbols and thousands
/// separators are stripped before parsing. An expected value of zero (or an
/// unparseable side) scores 0.0; an exact match scores 1.0; otherwise
/// `1 - |expected - actual| / |expected|`, floored at zero.
pub fn numeric_similarity(expected: &str, actual: &str) -> f64 {
    let Some(expected) = parse_amount(expected) else {
        return 0.0;
    };
    if expected == 0.0 {
        return 0.0;
    }
    let Some(actual) = parse_amount(actual) else {
        return 0.0;
    };
    if expected == actual {
        return 1.0;
    }
    (1.0 - (expected - actual).abs() / expected.abs()).max(0.0)
}

fn parse_amount(s: &str) -> Option<f64> {
    let cleaned: String = s
        .replace("RM", "")
        .replace(['$', ','], "")
        .trim()
        .to_string();
    cleaned.parse::<f64>().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_identity_is_one() {
        for s in ["", "JOHN", "Acme Corp Sdn Bhd", "ümläut"] {
            assert_eq!(text_similarity(s, s), 1.0);
        }
    }

    #[test]
    fn text_is_symmetric_and_bounded() {
        let pairs = [
            ("KITTEN", "SITTING"),
            ("JOHN SMITH", "JON SMITH"),
            ("abc", ""),
            ("A", "Z"),
        ];
        for (a, b) in pairs {
            let ab = text_similarity(a, b);
            let ba = text_similarity(b, a);
            assert_eq!(ab, ba);
            assert!((0.0..=1.0).contains(&ab));
        }
    }

    #[test]
    fn text_case_folds() {
        assert_eq!(text_similarity("john smith", "JOHN SMITH"), 1.0);
    }

    #[test]
    fn text_disjoint_strings_score_zero() {
        assert_eq!(text_similarity("ABC", "XYZ"), 0.0);
    }

    #[test]
    fn text_counts_contiguous_blocks_not_subsequences() {
        // Blocks: "AB" plus the trailing "A", so M = 3 of 13 characters.
        // The common subsequence "BDAB" has 4 and must not be what we count.
        let got = text_similarity("ABCBDAB", "BDCABA");
        assert!((got - 6.0 / 13.0).abs() < 1e-12, "got {got}");
    }

    #[test]
    fn text_penalizes_reordered_tokens() {
        // Same characters, shuffled word order: well below an exact match.
        let in_order = text_similarity("1 MAIN ST", "1 MAIN ST");
        let shuffled = text_similarity("1 MAIN ST", "MAIN ST 1");
        assert_eq!(in_order, 1.0);
        assert!(shuffled < 0.9, "got {shuffled}");
    }

    #[test]
    fn date_tolerates_day_month_swap() {
        assert_eq!(date_similarity("2024-03-05", "2024-05-03"), 1.0);
    }

    #[test]
    fn date_exact_match() {
        assert_eq!(date_similarity("2024-03-05", "2024-03-05"), 1.0);
        assert_eq!(date_similarity("05/03/2024", "2024-03-05"), 1.0);
    }

    #[test]
    fn date_mismatch_is_zero() {
        assert_eq!(date_similarity("2024-03-05", "2024-03-06"), 0.0);
    }

    #[test]
    fn date_swap_requires_valid_calendar_date() {
        // 2018-12-25 swapped would be month 25; only the exact date matches.
        assert_eq!(date_similarity("2018-12-25", "2018-12-25"), 1.0);
        assert_eq!(date_similarity("2018-12-25", "2018-01-25"), 0.0);
    }

    #[test]
    fn date_unparseable_is_zero() {
        assert_eq!(date_similarity("not a date", "2024-03-05"), 0.0);
        assert_eq!(date_similarity("2024-03-05", "???"), 0.0);
    }

    #[test]
    fn numeric_strips_currency_formatting() {
        assert_eq!(numeric_similarity("$1,000.00", "1000"), 1.0);
        assert_eq!(numeric_similarity("RM 72.80", "72.8"), 1.0);
    }

    #[test]
    fn numeric_relative_error() {
        assert_eq!(numeric_similarity("100", "150"), 0.5);
        assert_eq!(numeric_similarity("100", "50"), 0.5);
    }

    #[test]
    fn numeric_zero_expected_is_guarded() {
        assert_eq!(numeric_similarity("0", "5"), 0.0);
        assert_eq!(numeric_similarity("0.00", "0"), 0.0);
    }

    #[test]
    fn numeric_large_error_floors_at_zero() {
        assert_eq!(numeric_similarity("10", "1000"), 0.0);
    }

    #[test]
    fn numeric_unparseable_is_zero() {
        assert_eq!(numeric_similarity("abc", "5"), 0.0);
        assert_eq!(numeric_similarity("5", "abc"), 0.0);
    }
}
