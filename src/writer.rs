// writer.rs - two-line FASTA output

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use crate::dedup::CleanedRecords;

/// Separator between member labels of a merged header.
pub const MEMBER_SEPARATOR: &str = "__";

fn write_record<W: Write>(out: &mut W, header: &str, sequence: &str) -> io::Result<()> {
    out.write_all(b">")?;
    out.write_all(header.as_bytes())?;
    out.write_all(b"\n")?;
    out.write_all(sequence.as_bytes())?;
    out.write_all(b"\n")
}

/// Serialize cleaned records in insertion order, without line wrapping.
///
/// Merged classes become `>label1__label2...` over the canonical sequence;
/// passthrough records keep their own identifier and sequence.
pub fn write_fasta<W: Write>(records: &CleanedRecords, out: &mut W) -> io::Result<()> {
    match records {
        CleanedRecords::Merged(classes) => {
            for class in classes.iter() {
                let header = class.members().join(MEMBER_SEPARATOR);
                write_record(out, &header, class.canonical())?;
            }
        }
        CleanedRecords::Passthrough(passthrough) => {
            for record in passthrough.iter() {
                write_record(out, &record.id, &record.seq)?;
            }
        }
    }
    Ok(())
}

/// Create (or truncate) `path` and write the records to it.
pub fn write_fasta_file(records: &CleanedRecords, path: &Path) -> io::Result<()> {
    let mut out = BufWriter::with_capacity(1 << 20, File::create(path)?);
    write_fasta(records, &mut out)?;
    out.flush()
}
