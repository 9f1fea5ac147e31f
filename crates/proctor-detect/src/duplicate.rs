//! Near-duplicate (herd/boilerplate) solution detection.
//!
//! Two-stage heuristic: containment against a catalog of canonical
//! boilerplate fingerprints, then a character-entropy fallback for long,
//! low-variety code. The catalog and thresholds are swappable without
//! changing the contract; this sits behind the same interface a future
//! embedding-index similarity lookup would implement.

use proctor_core::config::DuplicateConfig;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Match id reported by the entropy fallback.
pub const LOW_ENTROPY_MATCH_ID: &str = "low_entropy_scripted_pattern";

/// Verdict on whether submitted code is a herd solution.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DuplicateVerdict {
    pub is_herd: bool,
    /// Detector confidence in `[0, 1]`.
    pub confidence: f64,
    /// Which catalog pattern matched, if any.
    pub match_id: Option<String>,
}

impl DuplicateVerdict {
    fn clean() -> Self {
        Self {
            is_herd: false,
            confidence: 0.0,
            match_id: None,
        }
    }
}

/// A fixed catalog of canonical boilerplate fingerprints, stored in
/// normalized form (lowercased, all whitespace stripped).
#[derive(Debug, Clone)]
pub struct FingerprintCatalog {
    patterns: Vec<(String, String)>,
}

impl FingerprintCatalog {
    /// An empty catalog.
    pub fn empty() -> Self {
        Self {
            patterns: Vec::new(),
        }
    }

    /// Add a fingerprint under the given pattern id.
    pub fn with_pattern(mut self, id: &str, snippet: &str) -> Self {
        self.patterns.push((id.to_string(), normalize(snippet)));
        self
    }

    /// Id of the first fingerprint contained in the normalized code.
    fn find_match(&self, normalized_code: &str) -> Option<&str> {
        self.patterns
            .iter()
            .find(|(_, fp)| normalized_code.contains(fp.as_str()))
            .map(|(id, _)| id.as_str())
    }
}

impl Default for FingerprintCatalog {
    /// The shipped catalog of widely circulated canonical answers.
    fn default() -> Self {
        Self::empty()
            .with_pattern(
                "two_sum_hashmap",
                "seen = {}\nfor i, n in enumerate(nums):\n    if target - n in seen:\n        return [seen[target - n], i]\n    seen[n] = i",
            )
            .with_pattern(
                "fizzbuzz_modulo",
                "for i in range(1, 101):\n    if i % 15 == 0:\n        print(\"FizzBuzz\")\n    elif i % 3 == 0:\n        print(\"Fizz\")\n    elif i % 5 == 0:\n        print(\"Buzz\")\n    else:\n        print(i)",
            )
            .with_pattern(
                "reverse_linked_list",
                "prev = None\nwhile head:\n    head.next, prev, head = prev, head, head.next\nreturn prev",
            )
            .with_pattern(
                "binary_search_iterative",
                "lo, hi = 0, len(arr) - 1\nwhile lo <= hi:\n    mid = (lo + hi) // 2\n    if arr[mid] == target:\n        return mid\n    elif arr[mid] < target:\n        lo = mid + 1\n    else:\n        hi = mid - 1\nreturn -1",
            )
            .with_pattern(
                "valid_parens_stack",
                "stack = []\npairs = {')': '(', ']': '[', '}': '{'}\nfor c in s:\n    if c in pairs:\n        if not stack or stack.pop() != pairs[c]:\n            return False\n    else:\n        stack.append(c)\nreturn not stack",
            )
    }
}

/// Analyze a submitted solution for herd/boilerplate character.
///
/// `problem_id` identifies the problem for observability only; the verdict
/// depends solely on the code.
pub fn analyze_solution(
    code: &str,
    problem_id: &str,
    catalog: &FingerprintCatalog,
    config: &DuplicateConfig,
) -> DuplicateVerdict {
    let normalized = normalize(code);

    if let Some(match_id) = catalog.find_match(&normalized) {
        tracing::debug!(problem_id, match_id, "catalog fingerprint matched");
        return DuplicateVerdict {
            is_herd: true,
            confidence: 0.95,
            match_id: Some(match_id.to_string()),
        };
    }

    let entropy = shannon_entropy(code);
    let line_count = code.lines().count();
    if entropy < config.entropy_threshold && line_count > config.min_lines {
        tracing::debug!(problem_id, entropy, line_count, "low-entropy scripted pattern");
        return DuplicateVerdict {
            is_herd: true,
            confidence: 0.7,
            match_id: Some(LOW_ENTROPY_MATCH_ID.to_string()),
        };
    }

    DuplicateVerdict::clean()
}

/// Lowercase and strip all whitespace.
fn normalize(code: &str) -> String {
    code.to_lowercase()
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect()
}

/// Character-level Shannon entropy of the raw code, in bits per character.
fn shannon_entropy(code: &str) -> f64 {
    let mut counts: HashMap<char, usize> = HashMap::new();
    let mut total = 0usize;
    for c in code.chars() {
        *counts.entry(c).or_insert(0) += 1;
        total += 1;
    }

    if total == 0 {
        return 0.0;
    }

    counts
        .values()
        .map(|&n| {
            let p = n as f64 / total as f64;
            -p * p.log2()
        })
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cfg() -> DuplicateConfig {
        DuplicateConfig::default()
    }

    #[test]
    fn catalog_match_flags_herd_solution() {
        let catalog = FingerprintCatalog::default();
        // Case and whitespace differences are normalized away.
        let code = "SEEN = {}\nFOR I, N IN ENUMERATE(NUMS):\n    IF TARGET - N IN SEEN:\n        RETURN [SEEN[TARGET - N], I]\n    SEEN[N] = I";

        let verdict = analyze_solution(code, "two-sum", &catalog, &cfg());
        assert!(verdict.is_herd);
        assert!((verdict.confidence - 0.95).abs() < f64::EPSILON);
        assert_eq!(verdict.match_id.as_deref(), Some("two_sum_hashmap"));
    }

    #[test]
    fn catalog_match_works_on_containment() {
        let catalog = FingerprintCatalog::default();
        let code = format!(
            "def solve(nums, target):\n{}\n# trailing comment",
            "    seen = {}\n    for i, n in enumerate(nums):\n        if target - n in seen:\n            return [seen[target - n], i]\n        seen[n] = i"
        );

        let verdict = analyze_solution(&code, "two-sum", &catalog, &cfg());
        assert!(verdict.is_herd);
    }

    #[test]
    fn low_entropy_long_code_is_flagged() {
        // 30 lines drawn from a tiny alphabet: entropy well under 3.5.
        let code = "aaaa bbbb\n".repeat(30);

        let verdict = analyze_solution(&code, "p1", &FingerprintCatalog::empty(), &cfg());
        assert!(verdict.is_herd);
        assert!((verdict.confidence - 0.7).abs() < f64::EPSILON);
        assert_eq!(verdict.match_id.as_deref(), Some(LOW_ENTROPY_MATCH_ID));
    }

    #[test]
    fn low_entropy_short_code_is_not_flagged() {
        // Same alphabet but only 10 lines: under the line-count gate.
        let code = "aaaa bbbb\n".repeat(10);

        let verdict = analyze_solution(&code, "p1", &FingerprintCatalog::empty(), &cfg());
        assert!(!verdict.is_herd);
        assert_eq!(verdict.confidence, 0.0);
        assert!(verdict.match_id.is_none());
    }

    #[test]
    fn original_code_passes_clean() {
        let code = "fn quantize(histogram: &mut [u32], gamma: f64) -> Vec<u8> {\n    histogram.iter().map(|&v| ((v as f64).powf(gamma) * 0.37) as u8).collect()\n}";

        let verdict = analyze_solution(code, "p2", &FingerprintCatalog::default(), &cfg());
        assert_eq!(
            verdict,
            DuplicateVerdict {
                is_herd: false,
                confidence: 0.0,
                match_id: None
            }
        );
    }

    #[test]
    fn shannon_entropy_known_values() {
        // Single repeated character: zero entropy.
        assert_eq!(shannon_entropy("aaaa"), 0.0);
        // Two equiprobable characters: exactly 1 bit.
        assert!((shannon_entropy("abab") - 1.0).abs() < 1e-9);
        // Empty input is defined as zero.
        assert_eq!(shannon_entropy(""), 0.0);
    }

    #[test]
    fn custom_catalog_pattern_is_honored() {
        let catalog = FingerprintCatalog::empty().with_pattern("team_starter", "int main(void) { return 0; }");

        let verdict = analyze_solution("INT MAIN(VOID) { RETURN 0; }", "p3", &catalog, &cfg());
        assert_eq!(verdict.match_id.as_deref(), Some("team_starter"));
    }
}
