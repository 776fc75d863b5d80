//! huffbook: encode a file into a codebook plus bitstream, and back.
//!
//!   huffbook encode input.txt codebook.csv encoded.bin
//!   huffbook decode output.txt codebook.csv encoded.bin
//!   huffbook stats codebook.csv

mod logging;

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{error, info, warn};

use huffbook::{codebook, DecodeOptions, HuffmanCodec, ParsedCodebook};
use logging::{LogFormat, LoggingConfig};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Log filter directive
    #[arg(long, global = true, env = "HUFFBOOK_LOG", default_value = "info")]
    log_level: String,

    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Plain)]
    log_format: LogFormat,

    /// Write logs to this file instead of stderr
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Build a codebook for INPUT and write the encoded bitstream
    Encode {
        input: PathBuf,
        codebook: PathBuf,
        encoded: PathBuf,
        /// Encode with an existing codebook instead of building one
        #[arg(long, value_name = "PATH")]
        reuse_codebook: Option<PathBuf>,
    },
    /// Decode ENCODED with CODEBOOK into OUTPUT
    Decode {
        output: PathBuf,
        codebook: PathBuf,
        encoded: PathBuf,
        /// Fail on the first invalid codeword instead of resynchronizing
        #[arg(long)]
        strict: bool,
    },
    /// Print entropy and code length figures for a codebook
    Stats { codebook: PathBuf },
}

impl Command {
    fn name(&self) -> &'static str {
        match self {
            Command::Encode { .. } => "encoder",
            Command::Decode { .. } => "decoder",
            Command::Stats { .. } => "stats",
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = LoggingConfig {
        level: cli.log_level.clone(),
        format: cli.log_format,
        file: cli.log_file.clone(),
    };
    let _guard = match logging::init(&config) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("huffbook: {:#}", e);
            return ExitCode::FAILURE;
        }
    };

    let component = cli.command.name();
    let logs_to_file = cli.log_file.is_some();
    match run(cli.command) {
        Ok(()) => {
            info!(component, "finish status=ok");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(component, "{:#}", e);
            error!(component, "finish status=error");
            if logs_to_file {
                eprintln!("huffbook: {:#}", e);
            }
            ExitCode::FAILURE
        }
    }
}

fn run(command: Command) -> Result<()> {
    match command {
        Command::Encode {
            input,
            codebook,
            encoded,
            reuse_codebook,
        } => encode(&input, &codebook, &encoded, reuse_codebook.as_deref()),
        Command::Decode {
            output,
            codebook,
            encoded,
            strict,
        } => decode(&output, &codebook, &encoded, strict),
        Command::Stats { codebook } => stats(&codebook),
    }
}

fn read(path: &Path, what: &str) -> Result<Vec<u8>> {
    fs::read(path).with_context(|| format!("cannot read {} {}", what, path.display()))
}

fn write(path: &Path, what: &str, bytes: &[u8]) -> Result<()> {
    fs::write(path, bytes).with_context(|| format!("cannot write {} {}", what, path.display()))
}

/// Whether both paths resolve to one existing file.
fn same_file(a: &Path, b: &Path) -> bool {
    match (fs::canonicalize(a), fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

fn load_codebook(path: &Path) -> Result<ParsedCodebook> {
    let text = read(path, "codebook")?;
    let parsed = codebook::parse(&String::from_utf8_lossy(&text))
        .with_context(|| format!("malformed codebook {}", path.display()))?;

    for skipped in &parsed.skipped {
        warn!(
            line = skipped.line_number,
            reason = skipped.reason,
            "skipped_line codebook={}",
            path.display()
        );
    }
    info!(entries = parsed.records.len(), "load_codebook");
    Ok(parsed)
}

fn encode(
    input: &Path,
    codebook_path: &Path,
    encoded_path: &Path,
    reuse_codebook: Option<&Path>,
) -> Result<()> {
    info!(
        component = "encoder",
        "start input={} codebook={} encoded={}",
        input.display(),
        codebook_path.display(),
        encoded_path.display()
    );
    let data = read(input, "input file")?;

    let bytes = match reuse_codebook {
        Some(existing) => {
            let parsed = load_codebook(existing)?;
            let bytes = HuffmanCodec::from_entries(&parsed.entries())
                .encode(&data)
                .with_context(|| format!("cannot encode {}", input.display()))?;
            if !same_file(existing, codebook_path) {
                fs::copy(existing, codebook_path).with_context(|| {
                    format!("cannot write codebook {}", codebook_path.display())
                })?;
            }
            bytes
        }
        None => {
            let encoded = huffbook::encode(&data)
                .with_context(|| format!("cannot encode {}", input.display()))?;
            info!(
                symbols = encoded.codebook.len(),
                entropy = encoded.codebook.entropy(),
                average_code_length = encoded.codebook.average_code_length(),
                "build_codebook"
            );
            let file = File::create(codebook_path).with_context(|| {
                format!("cannot create codebook {}", codebook_path.display())
            })?;
            let mut writer = BufWriter::new(file);
            encoded
                .codebook
                .write_to(&mut writer)
                .with_context(|| format!("cannot write codebook {}", codebook_path.display()))?;
            encoded.bytes
        }
    };

    write(encoded_path, "encoded file", &bytes)?;
    info!(
        component = "metrics",
        input_bytes = data.len(),
        encoded_bytes = bytes.len(),
        "summary input={} encoded={}",
        input.display(),
        encoded_path.display()
    );
    Ok(())
}

fn decode(output: &Path, codebook_path: &Path, encoded_path: &Path, strict: bool) -> Result<()> {
    info!(
        component = "decoder",
        "start input_encoded={} input_codebook={} output_file={}",
        encoded_path.display(),
        codebook_path.display(),
        output.display()
    );
    let parsed = load_codebook(codebook_path)?;

    let tree = huffbook::build_decode_tree(&parsed.entries())
        .with_context(|| format!("cannot build tree from {}", codebook_path.display()))?;
    info!(leaves = tree.leaves(), "build_tree done");
    if !tree.contains_end_of_stream() {
        warn!("codebook has no EOF record; decoding runs to the end of input");
    }

    let bitstream = read(encoded_path, "encoded file")?;
    let options = DecodeOptions { strict };
    let decoded = huffbook::decode_with(&tree, &bitstream, options)
        .with_context(|| format!("cannot decode {}", encoded_path.display()))?;

    for bit_position in &decoded.invalid_codewords {
        warn!(bit_position, reason = "unexpected_prefix", "invalid_codeword");
    }
    if !decoded.end_of_stream {
        warn!(bits_read = decoded.bits_read, "bitstream ended before EOF symbol");
    }

    let mut out = BufWriter::new(
        File::create(output)
            .with_context(|| format!("cannot open output file {}", output.display()))?,
    );
    out.write_all(&decoded.bytes)
        .and_then(|_| out.flush())
        .with_context(|| format!("cannot write output file {}", output.display()))?;

    info!(
        num_decoded_symbols = decoded.bytes.len(),
        "decode_bitstream done output_file={}",
        output.display()
    );
    info!(
        component = "metrics",
        num_decoded_symbols = decoded.bytes.len(),
        invalid_codewords = decoded.invalid_codewords.len(),
        bytes_consumed = decoded.bytes_consumed,
        "summary input_encoded={} input_codebook={} output_file={}",
        encoded_path.display(),
        codebook_path.display(),
        output.display()
    );
    Ok(())
}

fn stats(codebook_path: &Path) -> Result<()> {
    let parsed = load_codebook(codebook_path)?;
    let skipped = parsed.skipped.len();
    let codebook = parsed.into_codebook();

    let entropy = codebook.entropy();
    let average = codebook.average_code_length();
    let total: u64 = codebook.records().iter().map(|r| r.count).sum();

    println!("records:             {}", codebook.len());
    println!("skipped lines:       {}", skipped);
    println!("symbols counted:     {}", total);
    println!("entropy:             {:.6} bits/symbol", entropy);
    println!("average code length: {:.6} bits/symbol", average);
    if average > 0.0 {
        println!("efficiency:          {:.2}%", entropy / average * 100.0);
    }
    Ok(())
}
