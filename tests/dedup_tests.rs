use sequence_cleaner::dedup::{CleanedRecords, Classification};
use sequence_cleaner::writer::write_fasta;
use sequence_cleaner::{
    reverse_complement, CleanerConfig, Rejection, RunStatistics, SeqRecord, SequenceCleaner,
};

fn run(config: CleanerConfig, input: &[(&str, &str)]) -> (CleanedRecords, RunStatistics) {
    let mut cleaner = SequenceCleaner::new(config);
    for (id, seq) in input {
        cleaner.classify(SeqRecord::new(*id, *seq));
    }
    cleaner.finish()
}

fn fasta(records: &CleanedRecords) -> String {
    let mut out = Vec::new();
    write_fasta(records, &mut out).unwrap();
    String::from_utf8(out).unwrap()
}

fn config(min_length: usize, max_percent_n: f64, merge: bool) -> CleanerConfig {
    CleanerConfig::new(min_length, max_percent_n, merge).unwrap()
}

#[test]
fn exact_duplicates_merge_under_one_header() {
    let (records, stats) = run(CleanerConfig::default(), &[("r1", "ACGT"), ("r2", "ACGT")]);

    assert_eq!(fasta(&records), ">r1__r2\nACGT\n");
    assert_eq!(stats.processed, 2);
    assert_eq!(stats.repeated, 1);
    assert_eq!(stats.repeated_rc, 0);
}

#[test]
fn reverse_complement_duplicate_gets_rc_label() {
    let (records, stats) = run(CleanerConfig::default(), &[("r1", "AAAA"), ("r2", "TTTT")]);

    match &records {
        CleanedRecords::Merged(classes) => {
            assert_eq!(classes.len(), 1);
            assert_eq!(classes.get("AAAA").unwrap().members(), ["r1", "r2_RC"]);
            assert!(classes.get("TTTT").is_none());
        }
        CleanedRecords::Passthrough(_) => panic!("expected merge mode"),
    }
    assert_eq!(fasta(&records), ">r1__r2_RC\nAAAA\n");
    assert_eq!(stats.repeated, 1);
    assert_eq!(stats.repeated_rc, 1);
}

#[test]
fn short_sequence_is_dropped() {
    let (records, stats) = run(config(2, 100.0, true), &[("r1", "AC")]);

    assert!(records.is_empty());
    assert_eq!(fasta(&records), "");
    assert_eq!(stats.short, 1);
    assert_eq!(stats.high_n, 0);
}

#[test]
fn high_n_sequence_is_dropped() {
    let mut cleaner = SequenceCleaner::new(config(0, 50.0, true));
    assert_eq!(
        cleaner.classify(SeqRecord::new("r1", "NNNAC")),
        Classification::Rejected(Rejection::TooAmbiguous)
    );
    assert_eq!(cleaner.stats().high_n, 1);
    assert!(cleaner.records().is_empty());
}

#[test]
fn lowercase_n_counts_as_ambiguous() {
    let (_, stats) = run(config(0, 50.0, true), &[("r1", "nnnac")]);
    assert_eq!(stats.high_n, 1);
}

#[test]
fn passthrough_writes_records_unmerged() {
    let (records, stats) = run(
        config(0, 100.0, false),
        &[("r1", "acgt"), ("r2", "ACGT"), ("r3", "TTTT"), ("r4", "AAAA")],
    );

    assert_eq!(fasta(&records), ">r1\nACGT\n>r2\nACGT\n>r3\nTTTT\n>r4\nAAAA\n");
    assert_eq!(stats.repeated, 0);
    assert_eq!(stats.repeated_rc, 0);
}

#[test]
fn passthrough_keeps_first_sequence_of_repeated_identifier() {
    let mut cleaner = SequenceCleaner::new(config(0, 100.0, false));
    cleaner.classify(SeqRecord::new("r1", "ACGT"));
    assert_eq!(
        cleaner.classify(SeqRecord::new("r1", "GGGG")),
        Classification::ShadowedIdentifier
    );
    let (records, stats) = cleaner.finish();

    assert_eq!(fasta(&records), ">r1\nACGT\n");
    assert_eq!(stats.processed, 2);
    match records {
        CleanedRecords::Passthrough(passthrough) => {
            assert_eq!(passthrough.shadowed(), 1);
            assert_eq!(passthrough.get("r1").unwrap().seq, "ACGT");
        }
        CleanedRecords::Merged(_) => panic!("expected passthrough mode"),
    }
}

#[test]
fn output_follows_first_seen_order() {
    let (records, _) = run(
        CleanerConfig::default(),
        &[("a", "GGGC"), ("b", "CCCA"), ("c", "GCCC"), ("d", "TGGG"), ("e", "ACGTT")],
    );
    assert_eq!(
        fasta(&records),
        ">a__c_RC\nGGGC\n>b__d_RC\nCCCA\n>e\nACGTT\n"
    );
}

#[test]
fn counters_are_conserved_and_orientations_exclusive() {
    let input = [
        ("r1", "ACGTTG"),
        ("r2", "CAACGT"),
        ("r3", "ACGTTG"),
        ("r4", "AC"),
        ("r5", "NNNNNA"),
        ("r6", "ccaacg"),
        ("r7", "CGTTGG"),
        ("r8", "NACGTA"),
        ("r9", "TACGTN"),
        ("r10", "GGG"),
    ];
    let (records, stats) = run(config(2, 40.0, true), &input);

    let classes = match &records {
        CleanedRecords::Merged(classes) => classes,
        CleanedRecords::Passthrough(_) => panic!("expected merge mode"),
    };
    let members: usize = classes.iter().map(|class| class.members().len()).sum();

    assert_eq!(stats.processed, input.len());
    assert_eq!(stats.short, 1);
    assert_eq!(stats.high_n, 1);
    assert_eq!(stats.retained(), members);
    assert_eq!(stats.processed, stats.short + stats.high_n + members);
    assert!(stats.repeated >= stats.repeated_rc);
    assert_eq!(stats.repeated, members - classes.len());

    for class in classes.iter() {
        let rc = reverse_complement(class.canonical());
        if rc != class.canonical() {
            assert!(classes.get(&rc).is_none(), "both orientations of {rc} stored");
        }
    }
}
