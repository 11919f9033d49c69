use crate::iupac_code::{self, IupacCode};
use anyhow::{Result, anyhow};
use serde::{Deserialize, Serialize};

/// One restriction enzyme from the catalog. `sequence` is the recognition
/// sequence over the 16 IUPAC symbols with `*` marking the sense-strand cut,
/// eg `G*AATTC` for EcoRI or `CATG*` for NlaIII. The derived fields are
/// filled in by [`RestrictionEnzyme::resolve`], once per run.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RestrictionEnzyme {
    pub name: String,
    pub sequence: String,
    pub note: Option<String>,
    #[serde(skip_serializing, default)]
    site: String,
    #[serde(skip_serializing, default)]
    left_cut: String,
    #[serde(skip_serializing, default)]
    right_cut: String,
    #[serde(skip_serializing, default)]
    variants: Vec<String>,
}

impl RestrictionEnzyme {
    pub fn new(name: &str, sequence: &str) -> Self {
        Self {
            name: name.to_string(),
            sequence: sequence.to_string(),
            note: None,
            site: String::new(),
            left_cut: String::new(),
            right_cut: String::new(),
            variants: vec![],
        }
    }

    /// Parses the cut mark and expands the ambiguity codes. Site sequences
    /// are run-invariant, so this happens once per enzyme per run.
    pub fn resolve(&mut self) -> Result<()> {
        let upper = self.sequence.to_ascii_uppercase();
        let (left, right) = upper.split_once('*').ok_or_else(|| {
            anyhow!(
                "Recognition sequence '{}' has no '*' cut mark",
                self.sequence
            )
        })?;
        if right.contains('*') {
            return Err(anyhow!(
                "Recognition sequence '{}' has more than one '*' cut mark",
                self.sequence
            ));
        }
        let site = format!("{left}{right}");
        if site.is_empty() {
            return Err(anyhow!("Recognition sequence '{}' is empty", self.sequence));
        }
        if let Some(bad) = site.bytes().find(|&b| !IupacCode::is_valid_letter(b)) {
            return Err(anyhow!(
                "Recognition sequence '{}' contains invalid symbol '{}'",
                self.sequence,
                bad as char
            ));
        }
        self.left_cut = left.to_string();
        self.right_cut = right.to_string();
        self.variants = iupac_code::expand_ambiguous(&site);
        self.site = site;
        Ok(())
    }

    /// Uppercased recognition sequence without the cut mark.
    #[inline(always)]
    pub fn site(&self) -> &str {
        &self.site
    }

    #[inline(always)]
    pub fn site_len(&self) -> usize {
        self.site.len()
    }

    /// Flank left of the staggered cut on the sense strand.
    #[inline(always)]
    pub fn left_cut(&self) -> &str {
        &self.left_cut
    }

    /// Flank right of the staggered cut on the sense strand.
    #[inline(always)]
    pub fn right_cut(&self) -> &str {
        &self.right_cut
    }

    /// All concrete A/C/G/T sequences the site can match, sorted.
    #[inline(always)]
    pub fn variants(&self) -> &[String] {
        &self.variants
    }
}

/// The one or two enzymes of a run, with the derived overhangs and the
/// digestion policy flag. Built once, immutable thereafter.
#[derive(Clone, Debug)]
pub struct EnzymePair {
    pub enzyme1: RestrictionEnzyme,
    pub enzyme2: RestrictionEnzyme,
    overhang1: String,
    overhang2: String,
    double_digest: bool,
}

impl EnzymePair {
    /// Both enzymes must already be resolved.
    pub fn new(enzyme1: RestrictionEnzyme, enzyme2: RestrictionEnzyme) -> Self {
        let overhang1 = if enzyme1.left_cut().len() >= enzyme1.right_cut().len() {
            iupac_code::reverse_complement(enzyme1.left_cut())
        } else {
            enzyme1.right_cut().to_string()
        };
        // Output-compatible with ddRADseqTools rsitesearch: when enzyme2's
        // left flank dominates, the overhang is taken from enzyme1's left
        // flank, without reverse complement (sic).
        let overhang2 = if enzyme2.left_cut().len() >= enzyme2.right_cut().len() {
            enzyme1.left_cut().to_string()
        } else {
            iupac_code::reverse_complement(enzyme2.right_cut())
        };
        let double_digest = enzyme1.site() != enzyme2.site();
        Self {
            enzyme1,
            enzyme2,
            overhang1,
            overhang2,
            double_digest,
        }
    }

    #[inline(always)]
    pub fn overhang1(&self) -> &str {
        &self.overhang1
    }

    #[inline(always)]
    pub fn overhang2(&self) -> &str {
        &self.overhang2
    }

    /// True when the two recognition sequences differ; selects the
    /// double-digestion policy.
    #[inline(always)]
    pub fn is_double_digest(&self) -> bool {
        self.double_digest
    }
}
