// pipeline.rs - directory of FASTA/FASTQ files in, one cleaned FASTA per file out

use std::fs;
use std::path::{Path, PathBuf};
use std::thread;

use crossbeam_channel::{bounded, unbounded, Receiver, Sender};
use log::{error, info};

use crate::dedup::SequenceCleaner;
use crate::error::{CleanerError, Result};
use crate::filter::CleanerConfig;
use crate::reader::open_records;
use crate::stats::RunStatistics;
use crate::writer::write_fasta_file;

const WANTED_EXTENSIONS: [&str; 3] = [".fna", ".fasta", ".fastq"];
const OUTPUT_PREFIX: &str = "clean_";

/// Settings for a whole run over one query directory.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub query: PathBuf,
    pub output_directory: PathBuf,
    pub cleaner: CleanerConfig,
    /// Files cleaned concurrently. Records within a file are always sequential.
    pub threads: usize,
}

/// Outcome of cleaning one file.
#[derive(Debug, Clone, PartialEq)]
pub struct FileReport {
    pub input: PathBuf,
    pub output: PathBuf,
    pub stats: RunStatistics,
    /// FASTA records written to `output`.
    pub written: usize,
}

/// `.fna`, `.fasta` or `.fastq` in any case. Compressed files are not picked up.
pub fn is_wanted_file(name: &str) -> bool {
    let lower = name.to_ascii_lowercase();
    WANTED_EXTENSIONS
        .iter()
        .any(|ext| lower.len() > ext.len() && lower.ends_with(ext))
}

/// Wanted files directly under `query`, sorted by file name.
pub fn find_input_files(query: &Path) -> Result<Vec<PathBuf>> {
    if !query.is_dir() {
        return Err(CleanerError::InvalidInputDirectory(query.to_path_buf()));
    }
    let entries = fs::read_dir(query).map_err(|source| CleanerError::RecordFile {
        path: query.to_path_buf(),
        source,
    })?;

    let mut files = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|source| CleanerError::RecordFile {
            path: query.to_path_buf(),
            source,
        })?;
        let path = entry.path();
        let wanted = path
            .file_name()
            .and_then(|name| name.to_str())
            .is_some_and(is_wanted_file);
        if wanted && path.is_file() {
            files.push(path);
        }
    }
    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(files)
}

/// `output_directory/clean_<input file name>`.
pub fn output_path(output_directory: &Path, input: &Path) -> PathBuf {
    let name = input
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    output_directory.join(format!("{OUTPUT_PREFIX}{name}"))
}

/// Create the output directory (and parents) if missing. Returns whether it was created.
pub fn prepare_output_directory(dir: &Path) -> Result<bool> {
    if dir.is_dir() {
        return Ok(false);
    }
    fs::create_dir_all(dir).map_err(|source| CleanerError::OutputDirectory {
        path: dir.to_path_buf(),
        source,
    })?;
    Ok(true)
}

/// Read every record of `input`, then write the cleaned FASTA to `output`.
///
/// Nothing is written when the input cannot be read to the end.
pub fn clean_file(input: &Path, output: &Path, config: &CleanerConfig) -> Result<FileReport> {
    let read_error = |source| CleanerError::RecordFile {
        path: input.to_path_buf(),
        source,
    };
    let records = open_records(input).map_err(read_error)?;
    let mut cleaner = SequenceCleaner::new(*config);
    cleaner.consume(records).map_err(read_error)?;
    let (records, stats) = cleaner.finish();

    info!("Writing results: {}", output.display());
    write_fasta_file(&records, output).map_err(|source| CleanerError::OutputWrite {
        path: output.to_path_buf(),
        source,
    })?;

    Ok(FileReport {
        input: input.to_path_buf(),
        output: output.to_path_buf(),
        stats,
        written: records.len(),
    })
}

fn log_report(n: usize, total: usize, report: &FileReport) {
    let stats = &report.stats;
    info!("[{n}/{total}] Stats for: {}", report.output.display());
    info!("[{n}/{total}] - # Sequences Processed: {}", stats.processed);
    info!("[{n}/{total}] - # Repeated Sequences: {}", stats.repeated);
    info!(
        "[{n}/{total}] - # Repeated Sequences (Reverse Complement): {}",
        stats.repeated_rc
    );
    info!("[{n}/{total}] - # Short Sequences: {}", stats.short);
    info!("[{n}/{total}] - # High N Sequences: {}", stats.high_n);
}

type Job = (usize, PathBuf);
type JobResult = (usize, Result<FileReport>);

fn spawn_worker(
    jobs: Receiver<Job>,
    results: Sender<JobResult>,
    output_directory: PathBuf,
    config: CleanerConfig,
    total: usize,
) -> thread::JoinHandle<()> {
    thread::spawn(move || {
        while let Ok((index, input)) = jobs.recv() {
            info!("[{}/{}] Cleaning input: {}", index + 1, total, input.display());
            let output = output_path(&output_directory, &input);
            let result = clean_file(&input, &output, &config);
            if results.send((index, result)).is_err() {
                break;
            }
        }
    })
}

/// Clean every wanted file under the query directory.
///
/// Files are spread over `threads` workers, each with its own cleaner and
/// statistics. Reports are logged and returned in sorted file order; if any
/// file fails, the error of the first failing file is returned. Every error
/// is logged here once.
pub fn run(config: &RunConfig) -> Result<Vec<FileReport>> {
    let files = find_input_files(&config.query).inspect_err(|e| error!("{e}"))?;
    if prepare_output_directory(&config.output_directory).inspect_err(|e| error!("{e}"))? {
        info!(
            "Output directory {} does not exist, created it",
            config.output_directory.display()
        );
    }

    let total = files.len();
    let threads = config.threads.clamp(1, total.max(1));
    let (job_tx, job_rx) = bounded::<Job>(threads * 2);
    let (result_tx, result_rx) = unbounded::<JobResult>();

    let handles: Vec<_> = (0..threads)
        .map(|_| {
            spawn_worker(
                job_rx.clone(),
                result_tx.clone(),
                config.output_directory.clone(),
                config.cleaner,
                total,
            )
        })
        .collect();
    drop(job_rx);
    drop(result_tx);

    for job in files.into_iter().enumerate() {
        // every worker gone means they panicked; the join below reports it
        if job_tx.send(job).is_err() {
            break;
        }
    }
    drop(job_tx);

    let mut slots: Vec<Option<Result<FileReport>>> = (0..total).map(|_| None).collect();
    let mut next = 0;
    for (index, result) in result_rx.iter() {
        slots[index] = Some(result);
        while let Some(Some(ready)) = slots.get(next) {
            match ready {
                Ok(report) => log_report(next + 1, total, report),
                Err(e) => error!("[{}/{}] {}", next + 1, total, e),
            }
            next += 1;
        }
    }

    let panicked = handles.into_iter().fold(false, |panicked, handle| {
        handle.join().is_err() || panicked
    });
    if panicked || next < total {
        error!("{}", CleanerError::WorkerPanicked);
        return Err(CleanerError::WorkerPanicked);
    }

    slots
        .into_iter()
        .map(|slot| slot.unwrap_or(Err(CleanerError::WorkerPanicked)))
        .collect()
}
