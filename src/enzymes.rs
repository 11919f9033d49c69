use crate::error::RadSiteError;
use crate::restriction_enzyme::RestrictionEnzyme;
use anyhow::{Result, anyhow};
use std::fs;
use std::path::Path;

const BUILTIN_ENZYMES_JSON: &str = include_str!("../assets/enzymes.json");

/// The enzyme catalog: a list of restriction enzymes, resolved and ready to
/// scan with. Either the built-in set of common RAD enzymes or a
/// user-provided JSON file.
#[derive(Clone, Debug, Default)]
pub struct Enzymes {
    restriction_enzymes: Vec<RestrictionEnzyme>,
}

impl Enzymes {
    pub fn new(json_text: &str) -> Result<Self> {
        let mut restriction_enzymes: Vec<RestrictionEnzyme> = serde_json::from_str(json_text)?;
        for re in &mut restriction_enzymes {
            re.resolve()
                .map_err(|e| anyhow!("Bad restriction enzyme '{}': {e}", re.name))?;
        }
        Ok(Self {
            restriction_enzymes,
        })
    }

    pub fn builtin() -> Result<Self> {
        Self::new(BUILTIN_ENZYMES_JSON)
    }

    pub fn from_path(path: &Path) -> Result<Self, RadSiteError> {
        let text = fs::read_to_string(path).map_err(|source| RadSiteError::InputOpen {
            path: path.to_path_buf(),
            source,
        })?;
        Self::new(&text).map_err(|e| RadSiteError::Format {
            path: path.to_path_buf(),
            detail: e.to_string(),
        })
    }

    pub fn restriction_enzymes(&self) -> &[RestrictionEnzyme] {
        &self.restriction_enzymes
    }

    pub fn by_name(&self, name: &str) -> Result<&RestrictionEnzyme, RadSiteError> {
        self.restriction_enzymes
            .iter()
            .find(|re| re.name == name)
            .ok_or_else(|| RadSiteError::UnknownEnzyme {
                name: name.to_string(),
            })
    }
}
