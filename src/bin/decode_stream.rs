//! Decode a raw PDF stream body through a filter chain.
//!
//! Usage:
//!   cargo run --release --bin decode_stream -- --filter FlateDecode stream.bin out.bin
//!   cargo run --release --bin decode_stream -- --filter A85 --filter Fl \
//!       --param Predictor=12 --param Columns=5 stream.bin
//!
//! Filters are applied in the order given. `--param` entries attach to the
//! most recent `--filter`. Without OUTPUT the decoded bytes go to stdout.
//! Set `RUST_LOG=debug` for decoder diagnostics.

use pdf_filters::{DecodeOptions, FilterIdentifier, FilterStage, ParamValue, decode_pipeline};
use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;

const USAGE: &str =
    "Usage: decode_stream [--filter NAME]... [--param KEY=VALUE]... [--max-size BYTES] INPUT [OUTPUT]";

struct DecodeConfig {
    stages: Vec<FilterStage>,
    options: DecodeOptions,
    input: PathBuf,
    output: Option<PathBuf>,
}

impl DecodeConfig {
    fn from_args() -> Result<Self, String> {
        let args: Vec<String> = std::env::args().skip(1).collect();
        let mut stages: Vec<FilterStage> = Vec::new();
        let mut options = DecodeOptions::default();
        let mut paths = Vec::new();

        let mut i = 0;
        while i < args.len() {
            match args[i].as_str() {
                "--filter" | "-f" => {
                    i += 1;
                    let name = args.get(i).ok_or("--filter needs a filter name")?;
                    let filter = name.parse::<FilterIdentifier>().map_err(|e| e.to_string())?;
                    stages.push(FilterStage::new(filter));
                },
                "--param" | "-p" => {
                    i += 1;
                    let entry = args.get(i).ok_or("--param needs KEY=VALUE")?;
                    let (key, value) = entry
                        .split_once('=')
                        .ok_or_else(|| format!("--param expects KEY=VALUE, got '{}'", entry))?;
                    let stage = stages
                        .last_mut()
                        .ok_or("--param must follow the --filter it applies to")?;
                    stage.params.insert(key, ParamValue::parse(value));
                },
                "--max-size" => {
                    i += 1;
                    let bytes = args.get(i).ok_or("--max-size needs a byte count")?;
                    let bytes = bytes
                        .parse::<usize>()
                        .map_err(|_| format!("invalid --max-size '{}'", bytes))?;
                    options = options.with_max_decompressed_size(bytes);
                },
                "--help" | "-h" => return Err(USAGE.to_string()),
                flag if flag.starts_with('-') && flag.len() > 1 => {
                    return Err(format!("unknown option '{}'\n{}", flag, USAGE));
                },
                path => paths.push(PathBuf::from(path)),
            }
            i += 1;
        }

        let mut paths = paths.into_iter();
        let input = paths.next().ok_or(USAGE)?;
        let output = paths.next();
        if paths.next().is_some() {
            return Err(USAGE.to_string());
        }

        Ok(Self {
            stages,
            options,
            input,
            output,
        })
    }
}

fn run(config: &DecodeConfig) -> pdf_filters::Result<usize> {
    let data = fs::read(&config.input)?;
    let start = Instant::now();
    let decoded = decode_pipeline(&data, &config.stages, &config.options)?;
    log::info!(
        "Decoded {} -> {} bytes through {} filter(s) in {:.2?}",
        data.len(),
        decoded.len(),
        config.stages.len(),
        start.elapsed()
    );

    match &config.output {
        Some(path) => fs::write(path, &decoded)?,
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(&decoded)?;
            stdout.flush()?;
        },
    }
    Ok(decoded.len())
}

fn main() -> ExitCode {
    env_logger::init();

    let config = match DecodeConfig::from_args() {
        Ok(config) => config,
        Err(message) => {
            eprintln!("{}", message);
            return ExitCode::from(2);
        },
    };

    for stage in &config.stages {
        log::debug!("Stage {} params {:?}", stage.filter, stage.params);
    }

    match run(&config) {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error decoding {}: {}", config.input.display(), e);
            if let Some(partial) = e.partial_output() {
                eprintln!("  ({} bytes recovered before the failure)", partial.len());
            }
            ExitCode::FAILURE
        },
    }
}
