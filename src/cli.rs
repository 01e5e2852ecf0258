// Command-line front end for oxibocu.
//
// Subcommands convert between UTF-8 text and BOCU-1, dump the symbol
// structure of an encoded stream, and report build configuration.

use std::fs::File;
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::PathBuf;
use std::process;

use clap::{ArgAction, Args, Parser, Subcommand, ValueHint};

use crate::bocu1::tables::{
    ASCII_ANCHOR, MAX_LEAD, MIDDLE, MIN_LEAD, REACH_NEG_1, REACH_NEG_2, REACH_NEG_3, REACH_POS_1,
    REACH_POS_2, REACH_POS_3, RESET_BYTE, TRAIL_COUNT,
};
use crate::bocu1::{Decoded, Decoder};
use crate::io::{self as bocu_io, hex_digest};
use crate::stream::{DecodeOptions, ErrorPolicy, StreamError, encode_str};

const BUF_SIZE: usize = 64 * 1024;

// ---------------------------------------------------------------------------
// Clap CLI definition
// ---------------------------------------------------------------------------

/// BOCU-1 (Binary Ordered Compression for Unicode) encoder/decoder.
#[derive(Parser, Debug)]
#[command(
    name = "oxibocu",
    version,
    about = "BOCU-1 encoder/decoder",
    arg_required_else_help = true
)]
struct Cli {
    #[command(subcommand)]
    command: Cmd,

    /// Force overwrite existing output files.
    #[arg(short = 'f', long, global = true)]
    force: bool,

    /// Quiet mode (suppress non-error output).
    #[arg(short = 'q', long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    /// Verbose mode (use multiple times for more detail).
    #[arg(short = 'v', long, global = true, action = ArgAction::Count)]
    verbose: u8,

    /// Output stats as JSON to stderr.
    #[arg(long = "json", global = true)]
    json_output: bool,
}

#[derive(Subcommand, Debug)]
enum Cmd {
    /// Encode UTF-8 text as BOCU-1.
    Encode(EncodeArgs),
    /// Decode BOCU-1 to UTF-8 text.
    Decode(DecodeArgs),
    /// Print every symbol of a BOCU-1 stream with its offset and octets.
    Dump(DumpArgs),
    /// Print build/configuration details.
    Config,
}

#[derive(Args, Debug)]
struct StreamArgs {
    /// Input file (default: stdin).
    #[arg(long, value_hint = ValueHint::FilePath, conflicts_with = "input_pos")]
    input: Option<PathBuf>,

    /// Output file (default: stdout).
    #[arg(long, value_hint = ValueHint::FilePath, conflicts_with = "output_pos")]
    output: Option<PathBuf>,

    /// Write output to stdout.
    #[arg(short = 'c', long)]
    stdout: bool,

    /// Check/compute only (do not write output).
    #[arg(long = "check-only")]
    no_output: bool,

    /// Input file (positional form).
    #[arg(value_hint = ValueHint::FilePath)]
    input_pos: Option<PathBuf>,

    /// Output file (positional form).
    #[arg(value_hint = ValueHint::FilePath)]
    output_pos: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct EncodeArgs {
    #[command(flatten)]
    io: StreamArgs,
}

#[derive(Args, Debug)]
struct DecodeArgs {
    /// Replace malformed sequences with U+FFFD instead of failing.
    #[arg(long)]
    lossy: bool,

    #[command(flatten)]
    io: StreamArgs,
}

#[derive(Args, Debug)]
struct DumpArgs {
    /// Treat the input as UTF-8 text and dump its encoding.
    #[arg(long)]
    text: bool,

    /// BOCU-1 input file.
    #[arg(value_hint = ValueHint::FilePath)]
    input: PathBuf,
}

// ---------------------------------------------------------------------------
// Resolved command + options (flattened from Cli)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Encode,
    Decode,
    Dump,
    Config,
}

#[derive(Debug)]
struct Options {
    command: Command,
    use_stdout: bool,
    force: bool,
    quiet: bool,
    verbose: u8,
    no_output: bool,
    lossy: bool,
    text_input: bool,
    input_file: Option<PathBuf>,
    output_file: Option<PathBuf>,
    json_output: bool,
}

impl Options {
    fn with_stream(mut self, io: StreamArgs) -> Self {
        self.use_stdout = io.stdout;
        self.no_output = io.no_output;
        self.input_file = io.input.or(io.input_pos);
        self.output_file = io.output.or(io.output_pos);
        self
    }

    fn decode_options(&self) -> DecodeOptions {
        DecodeOptions {
            policy: if self.lossy {
                ErrorPolicy::Replace
            } else {
                ErrorPolicy::Strict
            },
        }
    }
}

fn resolve_options(cli: Cli) -> Options {
    let Cli {
        command,
        force,
        quiet,
        verbose,
        json_output,
    } = cli;
    let base = |command| Options {
        command,
        use_stdout: false,
        force,
        quiet,
        verbose: verbose.min(2),
        no_output: false,
        lossy: false,
        text_input: false,
        input_file: None,
        output_file: None,
        json_output,
    };

    match command {
        Cmd::Encode(args) => base(Command::Encode).with_stream(args.io),
        Cmd::Decode(args) => Options {
            lossy: args.lossy,
            ..base(Command::Decode).with_stream(args.io)
        },
        Cmd::Dump(args) => Options {
            text_input: args.text,
            input_file: Some(args.input),
            ..base(Command::Dump)
        },
        Cmd::Config => base(Command::Config),
    }
}

#[cfg(any(test, feature = "fuzzing"))]
pub fn fuzz_try_parse_args(args: &[String]) {
    let argv: Vec<String> = std::iter::once("oxibocu".to_string())
        .chain(args.iter().cloned())
        .collect();
    if let Ok(cli) = Cli::try_parse_from(argv) {
        let _ = resolve_options(cli);
    }
}

// ---------------------------------------------------------------------------
// Config command
// ---------------------------------------------------------------------------

fn cmd_config() -> i32 {
    let version = env!("CARGO_PKG_VERSION");
    eprintln!("oxibocu version {version} (Rust), Copyright (C) oxibocu contributors");
    eprintln!("Licensed under the Apache License, Version 2.0");

    let file_io = cfg!(feature = "file-io") as u8;
    let ptr_size = std::mem::size_of::<*const ()>();

    eprintln!("FILE_IO={file_io}");
    eprintln!("ASCII_ANCHOR={ASCII_ANCHOR:#04X}");
    eprintln!("MIN_LEAD={MIN_LEAD:#04X}");
    eprintln!("MIDDLE={MIDDLE:#04X}");
    eprintln!("MAX_LEAD={MAX_LEAD:#04X}");
    eprintln!("RESET_BYTE={RESET_BYTE:#04X}");
    eprintln!("TRAIL_COUNT={TRAIL_COUNT}");
    eprintln!("REACH_1={REACH_NEG_1}..={REACH_POS_1}");
    eprintln!("REACH_2={REACH_NEG_2}..={REACH_POS_2}");
    eprintln!("REACH_3={REACH_NEG_3}..={REACH_POS_3}");
    eprintln!("sizeof(usize)={ptr_size}");

    0
}

// ---------------------------------------------------------------------------
// Input / output plumbing
// ---------------------------------------------------------------------------

fn open_input(opts: &Options) -> Result<Box<dyn Read>, i32> {
    match &opts.input_file {
        Some(path) => match File::open(path) {
            Ok(f) => Ok(Box::new(BufReader::with_capacity(BUF_SIZE, f))),
            Err(e) => {
                eprintln!("oxibocu: input file: {}: {e}", path.display());
                Err(1)
            }
        },
        None => Ok(Box::new(BufReader::new(io::stdin()))),
    }
}

fn open_output(opts: &Options) -> Result<Box<dyn Write>, i32> {
    if opts.no_output {
        return Ok(Box::new(io::sink()));
    }
    match (opts.use_stdout, &opts.output_file) {
        (true, _) | (_, None) => Ok(Box::new(BufWriter::with_capacity(
            BUF_SIZE,
            io::stdout().lock(),
        ))),
        (false, Some(path)) => {
            if path.exists() && !opts.force {
                eprintln!(
                    "oxibocu: output file exists, use -f to overwrite: {}",
                    path.display()
                );
                return Err(1);
            }
            match File::create(path) {
                Ok(f) => Ok(Box::new(BufWriter::with_capacity(BUF_SIZE, f))),
                Err(e) => {
                    eprintln!("oxibocu: output file: {}: {e}", path.display());
                    Err(1)
                }
            }
        }
    }
}

fn print_json(value: &serde_json::Value) {
    eprintln!("{value:#}");
}

// ---------------------------------------------------------------------------
// Encode command
// ---------------------------------------------------------------------------

fn cmd_encode(opts: &Options) -> i32 {
    let reader = match open_input(opts) {
        Ok(r) => r,
        Err(code) => return code,
    };
    let mut writer = match open_output(opts) {
        Ok(w) => w,
        Err(code) => return code,
    };

    let stats = match bocu_io::encode_stream(reader, &mut writer) {
        Ok(stats) => stats,
        Err(e) => {
            eprintln!("oxibocu: encode error: {e}");
            return 1;
        }
    };

    if let Err(e) = writer.flush() {
        eprintln!("oxibocu: write flush error: {e}");
        return 1;
    }

    if opts.verbose > 0 && !opts.quiet {
        eprintln!(
            "oxibocu: encoder: input size: {}, output size: {}, code points: {}, ratio: {:.3}",
            stats.input_size,
            stats.output_size,
            stats.code_points,
            stats.ratio()
        );
        if opts.verbose > 1
            && let Some(digest) = &stats.output_sha256
        {
            eprintln!("oxibocu: encoder: output sha256: {}", hex_digest(digest));
        }
    }

    if opts.json_output {
        print_json(&serde_json::json!({
            "command": "encode",
            "input_size": stats.input_size,
            "output_size": stats.output_size,
            "code_points": stats.code_points,
            "ratio": stats.ratio(),
            "output_sha256": stats.output_sha256.as_ref().map(|d| hex_digest(d)),
        }));
    }

    0
}

// ---------------------------------------------------------------------------
// Decode command
// ---------------------------------------------------------------------------

fn cmd_decode(opts: &Options) -> i32 {
    let reader = match open_input(opts) {
        Ok(r) => r,
        Err(code) => return code,
    };
    let mut writer = match open_output(opts) {
        Ok(w) => w,
        Err(code) => return code,
    };

    let stats = match bocu_io::decode_stream(reader, &mut writer, opts.decode_options()) {
        Ok(stats) => stats,
        Err(e) => {
            // Flush what was decoded before the error.
            let _ = writer.flush();
            eprintln!("oxibocu: decode error: {e}");
            return 1;
        }
    };

    if let Err(e) = writer.flush() {
        eprintln!("oxibocu: write flush error: {e}");
        return 1;
    }

    if stats.replacements > 0 && !opts.quiet {
        eprintln!(
            "oxibocu: warning: replaced {} malformed sequence(s) with U+FFFD",
            stats.replacements
        );
    }

    if opts.verbose > 0 && !opts.quiet {
        eprintln!(
            "oxibocu: decoder: input size: {}, output size: {}, code points: {}",
            stats.input_size, stats.output_size, stats.code_points
        );
        if opts.verbose > 1
            && let Some(digest) = &stats.output_sha256
        {
            eprintln!("oxibocu: decoder: output sha256: {}", hex_digest(digest));
        }
    }

    if opts.json_output {
        print_json(&serde_json::json!({
            "command": "decode",
            "input_size": stats.input_size,
            "output_size": stats.output_size,
            "code_points": stats.code_points,
            "replacements": stats.replacements,
            "output_sha256": stats.output_sha256.as_ref().map(|d| hex_digest(d)),
        }));
    }

    0
}

// ---------------------------------------------------------------------------
// Dump command
// ---------------------------------------------------------------------------

fn cmd_dump(opts: &Options) -> i32 {
    let Some(path) = &opts.input_file else {
        eprintln!("oxibocu: dump requires an input file");
        return 1;
    };

    let data = match std::fs::read(path) {
        Ok(data) => data,
        Err(e) => {
            eprintln!("oxibocu: {}: {e}", path.display());
            return 1;
        }
    };

    let bytes = if opts.text_input {
        match String::from_utf8(data) {
            Ok(text) => encode_str(&text),
            Err(e) => {
                eprintln!("oxibocu: {}: not UTF-8 text: {e}", path.display());
                return 1;
            }
        }
    } else {
        data
    };

    let stdout = io::stdout();
    let mut out = BufWriter::with_capacity(BUF_SIZE, stdout.lock());
    let result = dump_symbols(&bytes, &mut out);
    if let Err(e) = out.flush() {
        eprintln!("oxibocu: write flush error: {e}");
        return 1;
    }

    match result {
        Ok(symbols) => {
            if opts.verbose > 0 && !opts.quiet {
                eprintln!("oxibocu: dump: {} bytes, {symbols} symbols", bytes.len());
            }
            if opts.json_output {
                print_json(&serde_json::json!({
                    "command": "dump",
                    "input_size": bytes.len(),
                    "symbols": symbols,
                }));
            }
            0
        }
        Err(e) => {
            eprintln!("oxibocu: dump: {e}");
            1
        }
    }
}

/// Write one line per decoded symbol: offset, code point (or `reset`),
/// octets, the anchor after the symbol, and the character if printable.
/// Returns the number of symbols written.
fn dump_symbols<W: Write>(bytes: &[u8], out: &mut W) -> Result<u64, StreamError> {
    let mut decoder = Decoder::new();
    let mut start = 0usize;
    let mut symbols = 0u64;

    writeln!(out, "  OFFSET  SYMBOL    OCTETS       ANCHOR")?;
    for (i, &byte) in bytes.iter().enumerate() {
        let (symbol, glyph) = match decoder.decode_byte(byte)? {
            Decoded::Pending => continue,
            Decoded::Reset => ("reset".to_string(), None),
            Decoded::CodePoint(c) => (
                format!("U+{c:04X}"),
                char::from_u32(c).filter(|ch| !ch.is_control()),
            ),
        };
        let octets = bytes[start..=i]
            .iter()
            .map(|b| format!("{b:02X}"))
            .collect::<Vec<_>>()
            .join(" ");

        write!(out, "{start:>8}  {symbol:<8}  {octets:<11}  {:06X}", decoder.anchor())?;
        match glyph {
            Some(ch) => writeln!(out, "  {ch}")?,
            None => writeln!(out)?,
        }

        symbols += 1;
        start = i + 1;
    }
    decoder.finish()?;
    Ok(symbols)
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

/// Main CLI entry point. Parses arguments via clap, dispatches commands.
pub fn run() -> ! {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .format_timestamp(None)
        .format_target(false)
        .init();

    let cli = Cli::parse();
    let mut opts = resolve_options(cli);

    // Warn if -c overrides output filename.
    if opts.use_stdout
        && let Some(path) = opts.output_file.take()
        && !opts.quiet
    {
        eprintln!(
            "oxibocu: warning: -c option overrides output filename: {}",
            path.display()
        );
    }

    let exit_code = match opts.command {
        Command::Encode => cmd_encode(&opts),
        Command::Decode => cmd_decode(&opts),
        Command::Dump => cmd_dump(&opts),
        Command::Config => cmd_config(),
    };

    process::exit(exit_code);
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_opts(args: &[&str]) -> Options {
        let argv: Vec<String> = std::iter::once("oxibocu".to_string())
            .chain(args.iter().map(|s| s.to_string()))
            .collect();
        let cli = Cli::try_parse_from(argv).expect("cli parse failed");
        resolve_options(cli)
    }

    fn dump_to_string(bytes: &[u8]) -> Result<String, StreamError> {
        let mut out = Vec::new();
        dump_symbols(bytes, &mut out)?;
        Ok(String::from_utf8(out).unwrap())
    }

    #[test]
    fn encode_subcommand_maps_correctly() {
        let opts = parse_opts(&["encode", "in.txt", "out.bocu"]);
        assert_eq!(opts.command, Command::Encode);
        assert_eq!(opts.input_file, Some(PathBuf::from("in.txt")));
        assert_eq!(opts.output_file, Some(PathBuf::from("out.bocu")));
        assert!(!opts.use_stdout);
        assert!(!opts.no_output);
    }

    #[test]
    fn long_form_paths() {
        let opts = parse_opts(&["encode", "--input", "a", "--output", "b"]);
        assert_eq!(opts.input_file, Some(PathBuf::from("a")));
        assert_eq!(opts.output_file, Some(PathBuf::from("b")));
    }

    #[test]
    fn conflicting_path_forms_are_rejected() {
        let argv = ["oxibocu", "encode", "--input", "a", "b"];
        assert!(Cli::try_parse_from(argv).is_err());
    }

    #[test]
    fn decode_subcommand_maps_correctly() {
        let opts = parse_opts(&["--quiet", "decode", "--lossy", "--check-only", "in.bocu"]);
        assert_eq!(opts.command, Command::Decode);
        assert!(opts.lossy);
        assert!(opts.no_output);
        assert!(opts.quiet);
        assert_eq!(opts.input_file, Some(PathBuf::from("in.bocu")));
        assert_eq!(opts.output_file, None);
        assert_eq!(opts.decode_options().policy, ErrorPolicy::Replace);
    }

    #[test]
    fn strict_decode_is_default() {
        let opts = parse_opts(&["decode", "in", "out"]);
        assert_eq!(opts.decode_options().policy, ErrorPolicy::Strict);
    }

    #[test]
    fn global_stdio_and_force_flags() {
        let opts = parse_opts(&["--force", "encode", "--stdout", "in", "out"]);
        assert!(opts.use_stdout);
        assert!(opts.force);
    }

    #[test]
    fn verbose_is_capped() {
        let verbose = parse_opts(&["--verbose", "--verbose", "--verbose", "encode", "in", "out"]);
        assert_eq!(verbose.verbose, 2);
    }

    #[test]
    fn quiet_conflicts_with_verbose() {
        let argv = ["oxibocu", "-q", "-v", "config"];
        assert!(Cli::try_parse_from(argv).is_err());
    }

    #[test]
    fn dump_and_config_map() {
        let opts = parse_opts(&["dump", "--text", "notes.txt"]);
        assert_eq!(opts.command, Command::Dump);
        assert!(opts.text_input);
        assert_eq!(opts.input_file, Some(PathBuf::from("notes.txt")));

        assert_eq!(parse_opts(&["--json", "config"]).command, Command::Config);
        assert!(parse_opts(&["--json", "config"]).json_output);
    }

    #[test]
    fn dump_lists_every_symbol() {
        let text = dump_to_string(&[0xD0, 0x96, 0xFF, 0x91]).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[0].contains("OFFSET"));
        assert_eq!(lines[1], "       0  U+0109    D0 96        000140  ĉ");
        assert_eq!(lines[2], "       2  reset     FF           000040");
        assert_eq!(lines[3], "       3  U+0041    91           000040  A");
    }

    #[test]
    fn dump_reports_malformed_input() {
        assert!(matches!(
            dump_to_string(&[0x91, 0xFB, 0x11]),
            Err(StreamError::Decode(
                crate::bocu1::DecodeError::InvalidTruncatedSequence { offset: 1, len: 3 }
            ))
        ));
    }

    #[test]
    fn fuzz_entry_point_tolerates_garbage() {
        fuzz_try_parse_args(&["--bogus".to_string()]);
        fuzz_try_parse_args(&["decode".to_string(), "--lossy".to_string()]);
        fuzz_try_parse_args(&[]);
    }
}
