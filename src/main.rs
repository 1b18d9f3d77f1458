use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use env_logger::{Builder, Env, Target};
use log::info;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;
use std::process;

use sequence_cleaner::pipeline::{self, RunConfig};
use sequence_cleaner::CleanerConfig;

#[derive(Parser)]
#[command(name = "sequence_cleaner", version, disable_version_flag = true)]
#[command(about = "Sequence Cleaner: remove duplicate, short and high-N sequences from FASTA/FASTQ files")]
#[command(after_help = "example > sequence_cleaner -q INPUT -o OUTPUT")]
struct Args {
    #[arg(short = 'v', long, action = ArgAction::Version, help = "Print version")]
    version: (),

    #[arg(short = 'q', long, help = "Directory with FASTA/FASTQ files (.fna, .fasta, .fastq)")]
    query: PathBuf,

    #[arg(short = 'o', long, alias = "output_directory", help = "Directory for cleaned files (created if missing)")]
    output_directory: PathBuf,

    #[arg(short = 'm', long, alias = "minimum_length", default_value = "0", help = "Sequences of this length or shorter are removed")]
    minimum_length: usize,

    #[arg(short = 'n', long, alias = "percentage_n", default_value = "100", help = "Maximum percentage of N allowed")]
    percentage_n: f64,

    #[arg(
        long = "no-merge-duplicates",
        alias = "concatenate_duplicates",
        action = ArgAction::SetFalse,
        help = "Keep every record instead of merging duplicate and reverse-complement sequences"
    )]
    merge_duplicates: bool,

    #[arg(short = 'l', long, help = "Append log messages to this file instead of STDOUT")]
    log: Option<PathBuf>,

    #[arg(short = 't', long, default_value = "1", help = "Number of files cleaned in parallel")]
    threads: usize,
}

fn init_logger(log: Option<&PathBuf>) -> Result<()> {
    let mut builder = Builder::from_env(Env::default().default_filter_or("info"));
    builder.format(|buf, record| {
        writeln!(buf, "[{} - {}] {}", buf.timestamp(), record.level(), record.args())
    });

    match log {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("cannot open log file {}", path.display()))?;
            builder.target(Target::Pipe(Box::new(file)));
        }
        None => {
            builder.target(Target::Stdout);
        }
    }

    builder.try_init().context("logger already initialised")?;
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logger(args.log.as_ref())?;

    info!(
        "Sequence_Cleaner: Remove Duplicate Sequences, etc - version {}",
        env!("CARGO_PKG_VERSION")
    );

    let config = RunConfig {
        query: args.query,
        output_directory: args.output_directory,
        cleaner: CleanerConfig::new(args.minimum_length, args.percentage_n, args.merge_duplicates)?,
        threads: args.threads,
    };

    match pipeline::run(&config) {
        Ok(reports) => {
            let written: usize = reports.iter().map(|r| r.written).sum();
            info!("Cleaned {} files, {} records written", reports.len(), written);
            info!("Done :)");
            Ok(())
        }
        // already logged by the pipeline
        Err(_) => process::exit(1),
    }
}
