use anyhow::{Context, Result, anyhow, bail};
use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_PATH: &str = "radsite-config.txt";

/// All options of one digestion run, already resolved and validated; the
/// digestion core never reads process-wide state.
#[derive(Clone, Debug, PartialEq)]
pub struct RunConfig {
    /// FASTA genome, plain or gzipped (`genfile`).
    pub genome_file: PathBuf,
    /// Fragment output in FASTA-like format (`fragsfile`).
    pub fragments_file: PathBuf,
    /// Enzyme catalog JSON; the built-in catalog when unset (`rsfile`).
    pub enzyme_file: Option<PathBuf>,
    pub enzyme1: String,
    pub enzyme2: String,
    pub min_fragment_size: usize,
    pub max_fragment_size: usize,
    /// Length-histogram report (`fragstfile`).
    pub stats_file: PathBuf,
    /// Histogram interval width in bp (`fragstinterval`).
    pub interval_width: usize,
    pub plot: bool,
    pub verbose: bool,
    pub trace: bool,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            genome_file: PathBuf::from("genome.fasta"),
            fragments_file: PathBuf::from("fragments.fasta"),
            enzyme_file: None,
            enzyme1: "EcoRI".to_string(),
            enzyme2: "MseI".to_string(),
            min_fragment_size: 101,
            max_fragment_size: 300,
            stats_file: PathBuf::from("fragments-stats.txt"),
            interval_width: 25,
            plot: false,
            verbose: false,
            trace: false,
        }
    }
}

const OPTION_COMMENTS: &[(&str, &str)] = &[
    ("genfile", "genome file in FASTA format (may be .gz)"),
    ("fragsfile", "path of the output file with the fragments"),
    ("rsfile", "enzyme catalog JSON (empty = built-in catalog)"),
    ("enzyme1", "name of the first restriction enzyme"),
    ("enzyme2", "name of the second restriction enzyme"),
    ("minfragsize", "lower limit of the fragment size window"),
    ("maxfragsize", "upper limit of the fragment size window"),
    ("fragstfile", "path of the fragment statistics report"),
    ("fragstinterval", "interval width of the length histogram in bp"),
    ("plot", "write an SVG histogram next to the report: YES or NO"),
    ("verbose", "per-fragment progress messages: YES or NO"),
    ("trace", "developer trace messages: YES or NO"),
];

fn parse_yes_no(key: &str, value: &str) -> Result<bool> {
    match value.to_ascii_uppercase().as_str() {
        "YES" => Ok(true),
        "NO" => Ok(false),
        _ => Err(anyhow!("Option '{key}' must be YES or NO, got '{value}'")),
    }
}

impl RunConfig {
    /// Applies one `key=value` option, as found in the config file or on the
    /// command line.
    pub fn apply_option(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "genfile" => self.genome_file = PathBuf::from(value),
            "fragsfile" => self.fragments_file = PathBuf::from(value),
            "rsfile" => {
                self.enzyme_file = if value.is_empty() {
                    None
                } else {
                    Some(PathBuf::from(value))
                }
            }
            "enzyme1" => self.enzyme1 = value.to_string(),
            "enzyme2" => self.enzyme2 = value.to_string(),
            "minfragsize" => {
                self.min_fragment_size = value
                    .parse()
                    .with_context(|| format!("Option 'minfragsize' is not a number: '{value}'"))?
            }
            "maxfragsize" => {
                self.max_fragment_size = value
                    .parse()
                    .with_context(|| format!("Option 'maxfragsize' is not a number: '{value}'"))?
            }
            "fragstfile" => self.stats_file = PathBuf::from(value),
            "fragstinterval" => {
                self.interval_width = value.parse().with_context(|| {
                    format!("Option 'fragstinterval' is not a number: '{value}'")
                })?
            }
            "plot" => self.plot = parse_yes_no(key, value)?,
            "verbose" => self.verbose = parse_yes_no(key, value)?,
            "trace" => self.trace = parse_yes_no(key, value)?,
            _ => bail!("Unknown option '{key}'"),
        }
        Ok(())
    }

    /// Builds the run configuration from the defaults, the config file (when
    /// present) and the command-line `--key=value` overrides, in that order.
    pub fn from_sources(config_path: &Path, args: &[String]) -> Result<Self> {
        let mut config = Self::default();
        if config_path.exists() {
            let text = fs::read_to_string(config_path).with_context(|| {
                format!("Could not read config file '{}'", config_path.display())
            })?;
            for line in text.lines() {
                let line = line.split('#').next().unwrap_or("").trim();
                if line.is_empty() {
                    continue;
                }
                let (key, value) = line
                    .split_once('=')
                    .ok_or_else(|| anyhow!("Bad config line '{line}' (expected key=value)"))?;
                config.apply_option(key.trim(), value.trim())?;
            }
        }
        for arg in args {
            let option = arg
                .strip_prefix("--")
                .ok_or_else(|| anyhow!("Unexpected argument '{arg}' (expected --option=value)"))?;
            let (key, value) = option
                .split_once('=')
                .ok_or_else(|| anyhow!("Bad option '{arg}' (expected --option=value)"))?;
            config.apply_option(key, value)?;
        }
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.min_fragment_size > self.max_fragment_size {
            bail!(
                "minfragsize ({}) must not exceed maxfragsize ({})",
                self.min_fragment_size,
                self.max_fragment_size
            );
        }
        if self.interval_width == 0 {
            bail!("fragstinterval must be greater than zero");
        }
        if self.enzyme1.is_empty() || self.enzyme2.is_empty() {
            bail!("enzyme1 and enzyme2 must both be set");
        }
        Ok(())
    }

    fn option_value(&self, key: &str) -> String {
        match key {
            "genfile" => self.genome_file.display().to_string(),
            "fragsfile" => self.fragments_file.display().to_string(),
            "rsfile" => self
                .enzyme_file
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_default(),
            "enzyme1" => self.enzyme1.clone(),
            "enzyme2" => self.enzyme2.clone(),
            "minfragsize" => self.min_fragment_size.to_string(),
            "maxfragsize" => self.max_fragment_size.to_string(),
            "fragstfile" => self.stats_file.display().to_string(),
            "fragstinterval" => self.interval_width.to_string(),
            "plot" => if self.plot { "YES" } else { "NO" }.to_string(),
            "verbose" => if self.verbose { "YES" } else { "NO" }.to_string(),
            "trace" => if self.trace { "YES" } else { "NO" }.to_string(),
            _ => String::new(),
        }
    }

    /// Writes a config file with the default option values, ready to edit.
    pub fn write_default_file(path: &Path) -> Result<()> {
        let defaults = Self::default();
        let mut text = String::new();
        for (key, comment) in OPTION_COMMENTS {
            let _ = writeln!(
                text,
                "{:43} # {comment}",
                format!("{key}={}", defaults.option_value(key))
            );
        }
        fs::write(path, text)
            .with_context(|| format!("Could not write config file '{}'", path.display()))
    }

    /// Option help lines for the CLI usage text.
    pub fn option_help() -> String {
        let mut text = String::new();
        for (key, comment) in OPTION_COMMENTS {
            let _ = writeln!(text, "  --{key:16} {comment}");
        }
        text
    }
}
