// dedup.rs - single-pass classification of records into equivalence classes

use std::collections::HashMap;

use log::warn;

use crate::alphabet::reverse_complement;
use crate::filter::{check_sequence, CleanerConfig, Rejection};
use crate::reader::SeqRecord;
use crate::stats::RunStatistics;

/// Suffix added to a member label that matched through its reverse complement.
pub const RC_SUFFIX: &str = "_RC";

/// What happened to one record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    Rejected(Rejection),
    /// First occurrence of a sequence in either orientation.
    NewClass,
    Duplicate,
    ReverseComplementDuplicate,
    /// Stored unchanged (no-merge mode).
    PassedThrough,
    /// No-merge mode only: the identifier was already stored, the record is dropped.
    ShadowedIdentifier,
}

/// Sequences seen in one orientation plus every record that collapsed onto them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EquivalenceClass {
    canonical: String,
    members: Vec<String>,
}

impl EquivalenceClass {
    /// The orientation that was encountered first. Never replaced.
    pub fn canonical(&self) -> &str {
        &self.canonical
    }

    /// Member labels in input order.
    pub fn members(&self) -> &[String] {
        &self.members
    }
}

/// Insertion-ordered mapping from canonical sequence to its class.
#[derive(Debug, Default)]
pub struct MergedClasses {
    classes: Vec<EquivalenceClass>,
    index: HashMap<String, usize>,
}

impl MergedClasses {
    fn add(&mut self, sequence: String, id: String, stats: &mut RunStatistics) -> Classification {
        if let Some(&slot) = self.index.get(&sequence) {
            self.classes[slot].members.push(id);
            stats.repeated += 1;
            return Classification::Duplicate;
        }

        let rc = reverse_complement(&sequence);
        if let Some(&slot) = self.index.get(&rc) {
            self.classes[slot].members.push(format!("{id}{RC_SUFFIX}"));
            stats.repeated += 1;
            stats.repeated_rc += 1;
            return Classification::ReverseComplementDuplicate;
        }

        self.index.insert(sequence.clone(), self.classes.len());
        self.classes.push(EquivalenceClass {
            canonical: sequence,
            members: vec![id],
        });
        Classification::NewClass
    }

    pub fn get(&self, sequence: &str) -> Option<&EquivalenceClass> {
        self.index.get(sequence).map(|&slot| &self.classes[slot])
    }

    pub fn iter(&self) -> impl Iterator<Item = &EquivalenceClass> {
        self.classes.iter()
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}

/// Records kept as they were read, one per identifier, in input order.
#[derive(Debug, Default)]
pub struct PassthroughRecords {
    records: Vec<SeqRecord>,
    ids: HashMap<String, usize>,
    shadowed: usize,
}

impl PassthroughRecords {
    fn add(&mut self, record: SeqRecord) -> Classification {
        if self.ids.contains_key(&record.id) {
            warn!(
                "Identifier {} seen again, keeping its first sequence only",
                record.id
            );
            self.shadowed += 1;
            return Classification::ShadowedIdentifier;
        }
        self.ids.insert(record.id.clone(), self.records.len());
        self.records.push(record);
        Classification::PassedThrough
    }

    pub fn get(&self, id: &str) -> Option<&SeqRecord> {
        self.ids.get(id).map(|&slot| &self.records[slot])
    }

    pub fn iter(&self) -> impl Iterator<Item = &SeqRecord> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records dropped because their identifier was already stored.
    pub fn shadowed(&self) -> usize {
        self.shadowed
    }
}

/// Output of one file, in whichever shape the run's mode produces.
#[derive(Debug)]
pub enum CleanedRecords {
    Merged(MergedClasses),
    Passthrough(PassthroughRecords),
}

impl CleanedRecords {
    /// Number of records the writer will emit.
    pub fn len(&self) -> usize {
        match self {
            CleanedRecords::Merged(classes) => classes.len(),
            CleanedRecords::Passthrough(records) => records.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Stateful engine for one input file.
#[derive(Debug)]
pub struct SequenceCleaner {
    config: CleanerConfig,
    records: CleanedRecords,
    stats: RunStatistics,
}

impl SequenceCleaner {
    pub fn new(config: CleanerConfig) -> Self {
        let records = if config.merge_duplicates {
            CleanedRecords::Merged(MergedClasses::default())
        } else {
            CleanedRecords::Passthrough(PassthroughRecords::default())
        };
        SequenceCleaner {
            config,
            records,
            stats: RunStatistics::default(),
        }
    }

    /// Classify one record against everything seen so far.
    pub fn classify(&mut self, record: SeqRecord) -> Classification {
        let SeqRecord { id, mut seq } = record;
        seq.make_ascii_uppercase();
        self.stats.processed += 1;

        match check_sequence(&seq, &self.config) {
            Some(Rejection::TooShort) => {
                self.stats.short += 1;
                return Classification::Rejected(Rejection::TooShort);
            }
            Some(Rejection::TooAmbiguous) => {
                self.stats.high_n += 1;
                return Classification::Rejected(Rejection::TooAmbiguous);
            }
            None => {}
        }

        match &mut self.records {
            CleanedRecords::Merged(classes) => classes.add(seq, id, &mut self.stats),
            CleanedRecords::Passthrough(records) => records.add(SeqRecord { id, seq }),
        }
    }

    /// Drain a record source, stopping at the first read error.
    pub fn consume<I, E>(&mut self, records: I) -> Result<(), E>
    where
        I: IntoIterator<Item = Result<SeqRecord, E>>,
    {
        for record in records {
            self.classify(record?);
        }
        Ok(())
    }

    pub fn stats(&self) -> &RunStatistics {
        &self.stats
    }

    pub fn records(&self) -> &CleanedRecords {
        &self.records
    }

    pub fn finish(self) -> (CleanedRecords, RunStatistics) {
        (self.records, self.stats)
    }
}
