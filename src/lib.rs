// lib.rs - deduplicate and filter FASTA/FASTQ records into clean FASTA

pub mod alphabet;
pub mod dedup;
pub mod error;
pub mod filter;
pub mod pipeline;
pub mod reader;
pub mod stats;
pub mod writer;

pub use alphabet::{complement_base, reverse_complement};
pub use dedup::{CleanedRecords, Classification, SequenceCleaner};
pub use error::{CleanerError, Result};
pub use filter::{CleanerConfig, Rejection};
pub use reader::SeqRecord;
pub use stats::RunStatistics;
