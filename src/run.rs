use crate::config::RunConfig;
use crate::digest::{self, FragmentSpan};
use crate::enzymes::Enzymes;
use crate::error::RadSiteError;
use crate::fasta;
use crate::fragment::{self, FragmentWriter, SizeWindow, Strand};
use crate::plot;
use crate::restriction_enzyme::EnzymePair;
use crate::stats::FragmentStats;
use log::{debug, info, trace};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

#[derive(Clone, Copy, Debug, Default)]
pub struct RunSummary {
    pub loci: u64,
    pub total_fragments: u64,
    pub written_fragments: u64,
}

fn gc_distribution_path(config: &RunConfig) -> PathBuf {
    let mut path = config.fragments_file.clone();
    path.set_extension("gc.csv");
    path
}

fn emit_fragments<W: Write>(
    strand: &str,
    kind: Strand,
    spans: &[FragmentSpan],
    locus_id: &str,
    window: &SizeWindow,
    stats: &mut FragmentStats,
    writer: &mut FragmentWriter<W>,
) -> Result<(), RadSiteError> {
    for span in spans {
        let sequence = span.sequence(strand);
        let profile = fragment::gc_profile(sequence);
        if window.retains(sequence.len()) {
            stats.record_written(profile.gc_rate);
            writer.write_fragment(
                stats.written_fragments(),
                sequence,
                &fragment::format_gc(profile.gc_rate),
                kind,
                span,
                strand.len(),
                locus_id,
            )?;
            debug!("fragments written: {}", stats.written_fragments());
        }
        stats.record_fragment(sequence.len(), profile.n_count);
    }
    Ok(())
}

/// One complete digestion run: streams the genome, cuts each locus on the
/// applicable strands, writes the retained fragments and finally the
/// statistics outputs.
pub fn run(config: &RunConfig) -> Result<RunSummary, RadSiteError> {
    let enzymes = match &config.enzyme_file {
        Some(path) => Enzymes::from_path(path)?,
        None => Enzymes::builtin().expect("built-in enzyme catalog is valid"),
    };
    let enzyme1 = enzymes.by_name(&config.enzyme1)?.clone();
    let enzyme2 = enzymes.by_name(&config.enzyme2)?.clone();
    let pair = EnzymePair::new(enzyme1, enzyme2);
    if pair.is_double_digest() {
        info!(
            "The enzymes have different restriction site sequences, so the fragments will correspond to a double digestion."
        );
    } else {
        info!(
            "The enzymes have equal restriction site sequences, so the fragments will correspond to a single digestion."
        );
    }
    trace!(
        "overhang1: {} - overhang2: {}",
        pair.overhang1(),
        pair.overhang2()
    );
    trace!(
        "site1 variants: {:?} - site2 variants: {:?}",
        pair.enzyme1.variants(),
        pair.enzyme2.variants()
    );

    let window = SizeWindow {
        min: config.min_fragment_size,
        max: config.max_fragment_size,
    };
    let mut stats = FragmentStats::new(config.interval_width);
    let mut writer = FragmentWriter::create(&config.fragments_file)?;
    let mut loci = 0;

    for locus in fasta::open_locus_reader(&config.genome_file)? {
        let locus = locus?;
        loci += 1;
        debug!("locus '{}' ({} bp)", locus.id, locus.sequence.len());

        if pair.is_double_digest() {
            let watson_spans = digest::double_digest_spans(&locus.sequence, &pair);
            emit_fragments(
                &locus.sequence,
                Strand::Watson,
                &watson_spans,
                &locus.id,
                &window,
                &mut stats,
                &mut writer,
            )?;
            let crick = locus.crick_sequence();
            let crick_spans = digest::double_digest_spans(&crick, &pair);
            emit_fragments(
                &crick,
                Strand::Crick,
                &crick_spans,
                &locus.id,
                &window,
                &mut stats,
                &mut writer,
            )?;
        } else {
            // single digestion cuts the Watson strand only
            let spans = digest::single_digest_spans(&locus.sequence, &pair);
            emit_fragments(
                &locus.sequence,
                Strand::Watson,
                &spans,
                &locus.id,
                &window,
                &mut stats,
                &mut writer,
            )?;
        }
    }
    writer.finish()?;
    info!(
        "The file '{}' containing the fragments of the digested genome is created.",
        config.fragments_file.display()
    );

    let title = if pair.is_double_digest() {
        format!(
            "Distribution of fragments after a double digest with {} and {}",
            config.enzyme1, config.enzyme2
        )
    } else {
        format!(
            "Distribution of fragments after a single digest with {}",
            config.enzyme1
        )
    };
    stats.write_report(&config.stats_file, &title, &window)?;
    stats.write_gc_distribution(&gc_distribution_path(config))?;
    if config.plot {
        let svg_path = config.stats_file.with_extension("svg");
        let document = plot::histogram_svg(&stats.interval_rows(&window), &title);
        let file = File::create(&svg_path).map_err(|source| RadSiteError::OutputOpen {
            path: svg_path.clone(),
            source,
        })?;
        let mut out = BufWriter::new(file);
        out.write_all(document.as_bytes())?;
        out.flush()?;
        info!("The file '{}' with the histogram is created.", svg_path.display());
    }

    Ok(RunSummary {
        loci,
        total_fragments: stats.total_fragments(),
        written_fragments: stats.written_fragments(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::Path;

    fn test_config(dir: &Path, enzyme1: &str, enzyme2: &str) -> RunConfig {
        RunConfig {
            genome_file: dir.join("genome.fasta"),
            fragments_file: dir.join("fragments.fasta"),
            enzyme_file: None,
            enzyme1: enzyme1.to_string(),
            enzyme2: enzyme2.to_string(),
            min_fragment_size: 1,
            max_fragment_size: 50,
            stats_file: dir.join("fragments-stats.txt"),
            interval_width: 25,
            plot: false,
            verbose: false,
            trace: false,
        }
    }

    #[test]
    fn test_single_digest_end_to_end() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("genome.fasta"), ">locusA\nAAGAATTCGGAATTCCC\n").unwrap();
        let config = test_config(dir.path(), "EcoRI", "EcoRI");

        let summary = run(&config).unwrap();
        assert_eq!(summary.loci, 1);
        assert_eq!(summary.total_fragments, 3);
        assert_eq!(summary.written_fragments, 3);

        let fragments = fs::read_to_string(&config.fragments_file).unwrap();
        assert_eq!(
            fragments,
            ">fragment: 1 | length: 7 | GC: 14.29 | strand: + | start: 1 | end: 7 | locus: locusA\n\
             AAGAATT\n\
             >fragment: 2 | length: 11 | GC: 27.27 | strand: + | start: 4 | end: 14 | locus: locusA\n\
             AATTCGGAATT\n\
             >fragment: 3 | length: 7 | GC: 42.86 | strand: + | start: 11 | end: 17 | locus: locusA\n\
             AATTCCC\n"
        );

        let report = fs::read_to_string(&config.stats_file).unwrap();
        assert!(report.starts_with("Distribution of fragments after a single digest with EcoRI"));
        assert!(report.contains("Total fragments: 3"));
        assert!(report.contains("Written fragments: 3"));

        let gc = fs::read_to_string(dir.path().join("fragments.gc.csv")).unwrap();
        assert_eq!(gc, "gc_rate,fragments\n14.29,1\n27.27,1\n42.86,1\n");
    }

    #[test]
    fn test_double_digest_end_to_end() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("genome.fasta"), ">locusA\nAAGAATTCCCTTAACC\n").unwrap();
        let config = test_config(dir.path(), "EcoRI", "MseI");

        let summary = run(&config).unwrap();
        // Watson yields one fragment; on the Crick strand no MseI site
        // remains downstream of the EcoRI site, so the scan stops there
        assert_eq!(summary.total_fragments, 1);
        assert_eq!(summary.written_fragments, 1);

        let fragments = fs::read_to_string(&config.fragments_file).unwrap();
        assert_eq!(
            fragments,
            ">fragment: 1 | length: 10 | GC: 30.00 | strand: + | start: 4 | end: 13 | locus: locusA\n\
             AATTCCCTTA\n"
        );

        let report = fs::read_to_string(&config.stats_file).unwrap();
        assert!(report.contains("double digest with EcoRI and MseI"));
    }

    #[test]
    fn test_double_digest_crick_strand() {
        // MseI ... EcoRI on Watson reads EcoRI ... MseI on Crick
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("genome.fasta"), ">locusA\nGGTTAAGGGAATTCTT\n").unwrap();
        let config = test_config(dir.path(), "EcoRI", "MseI");

        let summary = run(&config).unwrap();
        assert_eq!(summary.total_fragments, 1);
        let fragments = fs::read_to_string(&config.fragments_file).unwrap();
        assert!(fragments.contains("strand: -"));
    }

    #[test]
    fn test_size_window_filters_but_counts() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("genome.fasta"), ">locusA\nAAGAATTCGGAATTCCC\n").unwrap();
        let mut config = test_config(dir.path(), "EcoRI", "EcoRI");
        config.min_fragment_size = 10;
        config.max_fragment_size = 50;

        let summary = run(&config).unwrap();
        assert_eq!(summary.total_fragments, 3);
        assert_eq!(summary.written_fragments, 1); // only the 11 bp fragment
        let fragments = fs::read_to_string(&config.fragments_file).unwrap();
        assert_eq!(fragments.lines().count(), 2);
    }

    #[test]
    fn test_locus_without_fragments_is_not_an_error() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("genome.fasta"),
            ">empty\n\n>locusA\nAAGAATTCCCTTAACC\n",
        )
        .unwrap();
        let config = test_config(dir.path(), "EcoRI", "MseI");
        let summary = run(&config).unwrap();
        assert_eq!(summary.loci, 2);
        assert_eq!(summary.total_fragments, 1);
    }

    #[test]
    fn test_unknown_enzyme() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("genome.fasta"), ">locusA\nACGT\n").unwrap();
        let config = test_config(dir.path(), "EcoXX", "MseI");
        let err = run(&config).unwrap_err();
        assert!(matches!(err, RadSiteError::UnknownEnzyme { name } if name == "EcoXX"));
    }

    #[test]
    fn test_idempotence() {
        let genome = ">locusA\nAAGAATTCGGAATTCCC\n>locusB\nTTAAGAATTCTTAAGG\n";
        let mut outputs = vec![];
        for _ in 0..2 {
            let dir = tempfile::tempdir().unwrap();
            fs::write(dir.path().join("genome.fasta"), genome).unwrap();
            let config = test_config(dir.path(), "EcoRI", "MseI");
            run(&config).unwrap();
            outputs.push((
                fs::read(&config.fragments_file).unwrap(),
                fs::read(&config.stats_file).unwrap(),
            ));
        }
        assert_eq!(outputs[0], outputs[1]);
    }

    #[test]
    fn test_plot_output() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("genome.fasta"), ">locusA\nAAGAATTCGGAATTCCC\n").unwrap();
        let mut config = test_config(dir.path(), "EcoRI", "EcoRI");
        config.plot = true;
        run(&config).unwrap();
        let svg = fs::read_to_string(dir.path().join("fragments-stats.svg")).unwrap();
        assert!(svg.contains("<svg"));
        assert!(svg.contains("single digest with EcoRI"));
    }
}
