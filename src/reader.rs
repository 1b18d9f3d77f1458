// reader.rs - lazy (identifier, sequence) records from FASTA or FASTQ files

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

use needletail::FastxReader;

/// One input record. Quality strings are never kept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeqRecord {
    pub id: String,
    pub seq: String,
}

impl SeqRecord {
    pub fn new(id: impl Into<String>, seq: impl Into<String>) -> Self {
        SeqRecord {
            id: id.into(),
            seq: seq.into(),
        }
    }

    /// Build from a raw header (without `>`/`@`) and sequence bytes.
    ///
    /// The identifier is the header up to its first whitespace. Headers must
    /// be UTF-8 and sequences ASCII; anything else is malformed input.
    fn from_parts(header: &[u8], seq: &[u8]) -> io::Result<Self> {
        let header = std::str::from_utf8(header)
            .map_err(|e| invalid_data(format!("header is not valid UTF-8: {e}")))?;
        if !seq.is_ascii() {
            return Err(invalid_data(format!(
                "sequence of {} contains non-ASCII bytes",
                header.split_whitespace().next().unwrap_or_default()
            )));
        }
        let seq = String::from_utf8(seq.to_vec())
            .map_err(|e| invalid_data(format!("sequence is not valid UTF-8: {e}")))?;
        let id = header.split_whitespace().next().unwrap_or_default().to_string();
        Ok(SeqRecord { id, seq })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeqFormat {
    Fasta,
    Fastq,
}

fn invalid_data(message: impl Into<String>) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidData, message.into())
}

pub fn open_reader(path: &Path) -> io::Result<Box<dyn BufRead + Send>> {
    let file = File::open(path)?;
    Ok(Box::new(BufReader::with_capacity(1 << 20, file)))
}

/// Skip leading whitespace and look at the first byte without consuming it.
/// `None` means the input holds no records at all.
pub fn sniff_format<R: BufRead>(reader: &mut R) -> io::Result<Option<SeqFormat>> {
    loop {
        let (skip, first) = {
            let buf = reader.fill_buf()?;
            if buf.is_empty() {
                return Ok(None);
            }
            match buf.iter().position(|b| !b.is_ascii_whitespace()) {
                Some(pos) => (pos, Some(buf[pos])),
                None => (buf.len(), None),
            }
        };
        reader.consume(skip);

        match first {
            Some(b'>') => return Ok(Some(SeqFormat::Fasta)),
            Some(b'@') => return Ok(Some(SeqFormat::Fastq)),
            Some(other) => {
                return Err(invalid_data(format!(
                    "expected '>' or '@' at start of input, found {:?}",
                    other as char
                )))
            }
            None => continue,
        }
    }
}

/// FASTA records through needletail, which joins multi-line sequences.
pub struct FastaRecords<'a> {
    inner: Box<dyn FastxReader + 'a>,
    done: bool,
}

impl<'a> FastaRecords<'a> {
    pub fn new<R: io::Read + Send + 'a>(reader: R) -> io::Result<Self> {
        let inner = needletail::parse_fastx_reader(reader)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        Ok(FastaRecords { inner, done: false })
    }
}

impl Iterator for FastaRecords<'_> {
    type Item = io::Result<SeqRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let item = match self.inner.next()? {
            Ok(record) => SeqRecord::from_parts(record.id(), &record.seq()),
            Err(e) => Err(io::Error::new(io::ErrorKind::InvalidData, e)),
        };
        self.done = item.is_err();
        Some(item)
    }
}

/// FASTQ tokenizer that accepts sequence and quality wrapped over several lines.
///
/// Sequence lines run up to the `+` separator; quality lines are then read
/// until they cover the sequence length, so a quality line starting with `@`
/// is never mistaken for a header.
pub struct FastqRecords<R: BufRead> {
    lines: io::Lines<R>,
    line_no: usize,
    done: bool,
}

impl<R: BufRead> FastqRecords<R> {
    pub fn new(reader: R) -> Self {
        FastqRecords {
            lines: reader.lines(),
            line_no: 0,
            done: false,
        }
    }

    fn next_line(&mut self) -> io::Result<Option<String>> {
        match self.lines.next() {
            Some(line) => {
                self.line_no += 1;
                let mut line = line?;
                if line.ends_with('\r') {
                    line.pop();
                }
                Ok(Some(line))
            }
            None => Ok(None),
        }
    }

    fn read_record(&mut self) -> io::Result<Option<SeqRecord>> {
        let header = loop {
            match self.next_line()? {
                Some(line) if line.trim().is_empty() => continue,
                Some(line) => match line.strip_prefix('@') {
                    Some(header) => break header.to_string(),
                    None => {
                        return Err(invalid_data(format!(
                            "line {}: expected '@' at start of FASTQ record",
                            self.line_no
                        )))
                    }
                },
                None => return Ok(None),
            }
        };

        let mut sequence = String::new();
        loop {
            match self.next_line()? {
                Some(line) if line.starts_with('+') => break,
                Some(line) => sequence.push_str(line.trim()),
                None => {
                    return Err(invalid_data(format!(
                        "unexpected end of file in sequence of record {header}"
                    )))
                }
            }
        }

        let mut quality_len = 0;
        while quality_len < sequence.len() {
            match self.next_line()? {
                Some(line) => quality_len += line.trim().len(),
                None => {
                    return Err(invalid_data(format!(
                        "unexpected end of file in quality of record {header}"
                    )))
                }
            }
        }
        if quality_len != sequence.len() {
            return Err(invalid_data(format!(
                "line {}: quality longer than sequence in record {header}",
                self.line_no
            )));
        }

        SeqRecord::from_parts(header.as_bytes(), sequence.as_bytes()).map(Some)
    }
}

impl<R: BufRead> Iterator for FastqRecords<R> {
    type Item = io::Result<SeqRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.read_record() {
            Ok(Some(record)) => Some(Ok(record)),
            Ok(None) => {
                self.done = true;
                None
            }
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}

/// Records of one input, whichever format it turned out to be.
pub enum RecordReader<'a, R: BufRead> {
    Fasta(FastaRecords<'a>),
    Fastq(FastqRecords<R>),
    Empty,
}

impl<'a, R: BufRead + Send + 'a> RecordReader<'a, R> {
    pub fn new(mut reader: R) -> io::Result<Self> {
        Ok(match sniff_format(&mut reader)? {
            Some(SeqFormat::Fasta) => RecordReader::Fasta(FastaRecords::new(reader)?),
            Some(SeqFormat::Fastq) => RecordReader::Fastq(FastqRecords::new(reader)),
            None => RecordReader::Empty,
        })
    }
}

impl<R: BufRead> Iterator for RecordReader<'_, R> {
    type Item = io::Result<SeqRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        match self {
            RecordReader::Fasta(records) => records.next(),
            RecordReader::Fastq(records) => records.next(),
            RecordReader::Empty => None,
        }
    }
}

/// Open a FASTA/FASTQ file as a lazy record stream.
pub fn open_records(path: &Path) -> io::Result<RecordReader<'static, Box<dyn BufRead + Send>>> {
    RecordReader::new(open_reader(path)?)
}
