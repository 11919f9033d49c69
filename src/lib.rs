pub mod config;
pub mod digest;
pub mod enzymes;
pub mod error;
pub mod fasta;
pub mod fragment;
pub mod iupac_code;
pub mod plot;
pub mod restriction_enzyme;
pub mod run;
pub mod stats;
