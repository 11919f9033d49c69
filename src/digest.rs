use crate::restriction_enzyme::EnzymePair;

/// Half-open cut boundaries within the scanned strand. The raw offsets are
/// kept even when they fall outside the strand; slicing clamps, the report
/// does not.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FragmentSpan {
    pub start: usize,
    pub end: usize,
}

impl FragmentSpan {
    /// The fragment sequence, with out-of-range or inverted boundaries
    /// clamping to the empty string.
    pub fn sequence<'a>(&self, strand: &'a str) -> &'a str {
        let start = self.start.min(strand.len());
        let end = self.end.min(strand.len());
        if start >= end { "" } else { &strand[start..end] }
    }
}

/// All start offsets of any of the concrete site variants within the strand,
/// ascending. The search cursor advances by one base after each match, so
/// overlapping occurrences are all reported; a degenerate or palindromic
/// site that matches at adjacent offsets cuts more than once.
pub fn find_site_positions(strand: &str, variants: &[String]) -> Vec<usize> {
    let mut positions = Vec::new();
    for variant in variants {
        let mut from = 0;
        while let Some(hit) = strand[from..].find(variant.as_str()) {
            positions.push(from + hit);
            from += hit + 1;
        }
    }
    positions.sort_unstable();
    positions
}

/// Minimum offset at or after `from` where any of the variants occurs.
fn next_occurrence(strand: &str, variants: &[String], from: usize) -> Option<usize> {
    if from > strand.len() {
        return None;
    }
    variants
        .iter()
        .filter_map(|variant| strand[from..].find(variant.as_str()).map(|hit| from + hit))
        .min()
}

/// Double-digestion policy for one strand: every enzyme1 site is paired with
/// the nearest enzyme2 site downstream of it, provided no further enzyme1
/// site lies in between (that one pairs with it instead). Once no enzyme2
/// site remains downstream the whole strand scan stops, since the search
/// start only moves forward.
pub fn double_digest_spans(strand: &str, pair: &EnzymePair) -> Vec<FragmentSpan> {
    let site1_len = pair.enzyme1.site_len();
    let overhang1_len = pair.overhang1().len();
    let overhang2_len = pair.overhang2().len();
    let positions1 = find_site_positions(strand, pair.enzyme1.variants());

    let mut spans = Vec::new();
    for (i, &position1) in positions1.iter().enumerate() {
        let from = position1 + site1_len;
        let Some(position2) = next_occurrence(strand, pair.enzyme2.variants(), from) else {
            break;
        };
        if i + 1 < positions1.len() && position2 >= positions1[i + 1] {
            // an intervening enzyme1 site pairs with this enzyme2 site
            continue;
        }
        spans.push(FragmentSpan {
            start: position1 + site1_len - overhang1_len,
            end: position2 + overhang2_len,
        });
    }
    spans
}

/// Single-digestion policy: consecutive enzyme1 sites bound the fragments,
/// from the strand start through a trailing fragment to the strand end.
pub fn single_digest_spans(strand: &str, pair: &EnzymePair) -> Vec<FragmentSpan> {
    let site1_len = pair.enzyme1.site_len();
    let overhang1_len = pair.overhang1().len();
    let overhang2_len = pair.overhang2().len();
    let positions = find_site_positions(strand, pair.enzyme1.variants());

    let mut spans = Vec::new();
    let mut last_position = 0;
    let mut is_first_cut = true;
    for &position in &positions {
        let start = if is_first_cut {
            0
        } else {
            last_position + site1_len - overhang1_len
        };
        spans.push(FragmentSpan {
            start,
            end: position + overhang2_len,
        });
        is_first_cut = false;
        last_position = position;
    }
    if last_position < strand.len() {
        spans.push(FragmentSpan {
            start: last_position + site1_len - overhang1_len,
            end: strand.len(),
        });
    }
    spans
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::restriction_enzyme::RestrictionEnzyme;

    fn pair(seq1: &str, seq2: &str) -> EnzymePair {
        let mut enzyme1 = RestrictionEnzyme::new("enzyme1", seq1);
        enzyme1.resolve().unwrap();
        let mut enzyme2 = RestrictionEnzyme::new("enzyme2", seq2);
        enzyme2.resolve().unwrap();
        EnzymePair::new(enzyme1, enzyme2)
    }

    fn variants(patterns: &[&str]) -> Vec<String> {
        patterns.iter().map(|p| p.to_string()).collect()
    }

    #[test]
    fn test_find_site_positions() {
        let positions = find_site_positions("AAGAATTCGGAATTCCC", &variants(&["GAATTC"]));
        assert_eq!(positions, [2, 9]);
    }

    #[test]
    fn test_find_site_positions_overlapping() {
        // a self-overlapping pattern yields distinct positions, not one
        assert_eq!(find_site_positions("AAA", &variants(&["AA"])), [0, 1]);
    }

    #[test]
    fn test_find_site_positions_pooled_variants() {
        // positions of all variants are pooled and sorted together
        let positions = find_site_positions("ACAC", &variants(&["AC", "CA"]));
        assert_eq!(positions, [0, 1, 2]);
    }

    #[test]
    fn test_find_site_positions_none() {
        assert!(find_site_positions("ACGT", &variants(&["TTAA"])).is_empty());
    }

    #[test]
    fn test_single_digest() {
        // EcoRI cuts at offsets 2 and 9; overhangs are AATTC / GAATT
        let spans = single_digest_spans("AAGAATTCGGAATTCCC", &pair("G*AATTC", "G*AATTC"));
        assert_eq!(
            spans,
            [
                FragmentSpan { start: 0, end: 7 },
                FragmentSpan { start: 3, end: 14 },
                FragmentSpan { start: 10, end: 17 },
            ]
        );
    }

    #[test]
    fn test_single_digest_reconstructs_locus() {
        let strand = "AAGAATTCGGAATTCCC";
        let spans = single_digest_spans(strand, &pair("G*AATTC", "G*AATTC"));
        // trimming each overhang overlap and concatenating restores the locus
        let mut rebuilt = String::new();
        let mut covered = 0;
        for span in &spans {
            let sequence = span.sequence(strand);
            rebuilt.push_str(&sequence[covered - span.start..]);
            covered = span.end;
        }
        assert_eq!(rebuilt, strand);
    }

    #[test]
    fn test_single_digest_no_sites() {
        // no site at all still emits the trailing fragment
        let spans = single_digest_spans("ACGTACGT", &pair("G*AATTC", "G*AATTC"));
        assert_eq!(spans, [FragmentSpan { start: 1, end: 8 }]);
    }

    #[test]
    fn test_single_digest_empty_strand() {
        assert!(single_digest_spans("", &pair("G*AATTC", "G*AATTC")).is_empty());
    }

    #[test]
    fn test_double_digest() {
        // EcoRI at 2, MseI at 10; overhang2 = TTA
        let spans = double_digest_spans("AAGAATTCCCTTAACC", &pair("G*AATTC", "T*TAA"));
        assert_eq!(spans, [FragmentSpan { start: 3, end: 13 }]);
    }

    #[test]
    fn test_double_digest_terminates_without_enzyme2() {
        // no enzyme2 site downstream: no dangling trailing fragment
        let spans = double_digest_spans("AAGAATTCCCCC", &pair("G*AATTC", "T*TAA"));
        assert!(spans.is_empty());
    }

    #[test]
    fn test_double_digest_skips_intervening_enzyme1_site() {
        // enzyme1 at 0 and 6, enzyme2 at 12: the pairing (0, 12) is skipped
        // because site 6 lies in between and claims the enzyme2 cut
        let strand = "GAATTCGAATTCTTAAG";
        let spans = double_digest_spans(strand, &pair("G*AATTC", "T*TAA"));
        assert_eq!(spans, [FragmentSpan { start: 7, end: 15 }]);
    }

    #[test]
    fn test_span_sequence_clamps() {
        let span = FragmentSpan { start: 2, end: 99 };
        assert_eq!(span.sequence("ACGTACGT"), "GTACGT");
        let inverted = FragmentSpan { start: 5, end: 3 };
        assert_eq!(inverted.sequence("ACGTACGT"), "");
    }
}
