//! CLI entry point for the v4l2-replay binary.

use std::env;
use std::ffi::OsString;
use std::io::{self, Write};
use std::path::PathBuf;

use serde as _;
use serde_json as _;
use thiserror as _;
use v4l2_decode::{
    ByteOrder, Catalog, DecoderConfig, NullSink, PointerWidth, ShortReadPolicy, XlatStyle,
};
use v4l2_replay::{replay_file, ReplayRecord, WriterSink};

#[cfg(test)]
use tempfile as _;

const USAGE_TEXT: &str = "\
Usage: v4l2-replay <command> [options]

Commands:
  run <fixture> [options]   Decode every ioctl in a fixture and print trace lines
  commands [options]        List the supported commands and their codes

Options:
  -X, --xlat <style>        raw, abbrev (default) or verbose
      --ilp32               32-bit pointer ABI
      --big-endian          Big-endian byte order
      --no-device-caps      Omit v4l2_capability.device_caps
      --truncate-short-reads
                            Decode the readable prefix of short reads
      --json                Print one JSON record per call (run only)
      --trace               Print decode events to stderr (run only)
  -h, --help                Show this help message

Examples:
  v4l2-replay run fixtures/ioctl_v4l2.fixture
  v4l2-replay run capture.fixture -X raw --json
  v4l2-replay commands --ilp32
";

#[derive(Debug, PartialEq, Eq)]
enum Command {
    Run(RunArgs),
    Commands(DecoderConfig),
}

#[derive(Debug, PartialEq, Eq)]
struct RunArgs {
    input: PathBuf,
    config: DecoderConfig,
    json: bool,
}

#[derive(Debug)]
enum ParseResult {
    Command(Command),
    Help,
}

fn parse_args(mut args: impl Iterator<Item = OsString>) -> Result<ParseResult, String> {
    let first = args.next().ok_or_else(|| "missing command".to_string())?;

    if first == "--help" || first == "-h" {
        return Ok(ParseResult::Help);
    }

    let command_str = first.to_string_lossy().to_string();

    match command_str.as_str() {
        "run" => parse_run_args(args)
            .map(Command::Run)
            .map(ParseResult::Command),
        "commands" => parse_options(args, false)
            .map(|(config, _, _)| Command::Commands(config))
            .map(ParseResult::Command),
        other => Err(format!("unknown command: {other}")),
    }
}

fn parse_run_args(args: impl Iterator<Item = OsString>) -> Result<RunArgs, String> {
    let (config, json, input) = parse_options(args, true)?;
    let input = input.ok_or_else(|| "missing fixture path".to_string())?;
    Ok(RunArgs {
        input,
        config,
        json,
    })
}

#[allow(clippy::while_let_on_iterator)]
fn parse_options(
    mut args: impl Iterator<Item = OsString>,
    run: bool,
) -> Result<(DecoderConfig, bool, Option<PathBuf>), String> {
    let mut config = DecoderConfig::default();
    let mut json = false;
    let mut input: Option<PathBuf> = None;

    while let Some(arg) = args.next() {
        let text = arg.to_string_lossy().to_string();
        match text.as_str() {
            "--help" | "-h" => return Err(USAGE_TEXT.to_string()),
            "-X" | "--xlat" => {
                let value = args
                    .next()
                    .ok_or_else(|| format!("missing value for {text}"))?;
                config.xlat_style = parse_style(&value.to_string_lossy())?;
            }
            "--ilp32" => config.platform.pointer_width = PointerWidth::Bits32,
            "--big-endian" => config.platform.byte_order = ByteOrder::Big,
            "--no-device-caps" => config.platform.has_device_caps = false,
            "--truncate-short-reads" => config.short_reads = ShortReadPolicy::Truncate,
            "--json" if run => json = true,
            "--trace" if run => config.tracing_enabled = true,
            option if option.starts_with('-') => {
                return Err(format!("unknown option: {option}"));
            }
            _ if !run => return Err(format!("unexpected argument: {text}")),
            _ => {
                if input.is_some() {
                    return Err("multiple fixture paths provided".to_string());
                }
                input = Some(PathBuf::from(arg));
            }
        }
    }

    Ok((config, json, input))
}

fn parse_style(value: &str) -> Result<XlatStyle, String> {
    match value {
        "raw" => Ok(XlatStyle::Raw),
        "abbrev" => Ok(XlatStyle::Abbrev),
        "verbose" => Ok(XlatStyle::Verbose),
        other => Err(format!("unknown xlat style: {other}")),
    }
}

fn render_record(record: &ReplayRecord, json: bool) -> Result<String, String> {
    if json {
        record.to_json().map_err(|e| e.to_string())
    } else {
        Ok(record.trace.to_string())
    }
}

fn run_replay(args: &RunArgs) -> Result<(), i32> {
    let records = if args.config.tracing_enabled {
        let mut sink = WriterSink::new(io::stderr().lock());
        let records = replay_file(&args.input, args.config, &mut sink);
        if let Some(e) = sink.error() {
            eprintln!("warning: trace output incomplete: {e}");
        }
        records
    } else {
        replay_file(&args.input, args.config, &mut NullSink)
    };
    let records = match records {
        Ok(records) => records,
        Err(e) => {
            eprintln!("{}: error: {e}", args.input.display());
            return Err(1);
        }
    };

    let mut out = io::stdout().lock();
    for record in &records {
        let line = render_record(record, args.json).map_err(|e| {
            eprintln!("error: {e}");
            1
        })?;
        if let Err(e) = writeln!(out, "{line}") {
            eprintln!("error: failed to write output: {e}");
            return Err(1);
        }
    }
    Ok(())
}

fn list_commands(config: &DecoderConfig) {
    let catalog = Catalog::new(config.platform);
    for command in catalog.commands() {
        let layout = catalog.layout(command.argument);
        println!(
            "{:#010x} {:<18} {:<20} {} ({} bytes)",
            command.code,
            command.name,
            command.direction.symbol(),
            layout.name,
            layout.size
        );
    }
}

fn main() {
    let exit_code = match parse_args(env::args_os().skip(1)) {
        Ok(ParseResult::Help) => {
            println!("{USAGE_TEXT}");
            0
        }
        Ok(ParseResult::Command(Command::Run(args))) => match run_replay(&args) {
            Ok(()) => 0,
            Err(code) => code,
        },
        Ok(ParseResult::Command(Command::Commands(config))) => {
            list_commands(&config);
            0
        }
        Err(error) => {
            if error.starts_with("Usage:") {
                println!("{error}");
            } else {
                eprintln!("error: {error}");
                eprintln!("{USAGE_TEXT}");
            }
            1
        }
    };

    std::process::exit(exit_code);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::OsString;
    use std::path::PathBuf;
    use v4l2_decode::Platform;

    fn os<'a>(args: &'a [&'a str]) -> impl Iterator<Item = OsString> + 'a {
        args.iter().map(OsString::from)
    }

    #[test]
    fn parses_run_command_with_options() {
        let result = parse_run_args(os(&[
            "calls.fixture",
            "-X",
            "raw",
            "--ilp32",
            "--big-endian",
            "--no-device-caps",
            "--truncate-short-reads",
            "--json",
            "--trace",
        ]))
        .expect("valid run args should parse");

        assert_eq!(result.input, PathBuf::from("calls.fixture"));
        assert!(result.json);
        assert_eq!(result.config.xlat_style, XlatStyle::Raw);
        assert_eq!(result.config.short_reads, ShortReadPolicy::Truncate);
        assert!(result.config.tracing_enabled);
        assert_eq!(
            result.config.platform,
            Platform {
                byte_order: ByteOrder::Big,
                pointer_width: PointerWidth::Bits32,
                has_device_caps: false,
            }
        );
    }

    #[test]
    fn run_defaults_match_decoder_defaults() {
        let result = parse_run_args(os(&["calls.fixture"])).expect("should parse");
        assert_eq!(result.config, DecoderConfig::default());
        assert!(!result.json);
    }

    #[test]
    fn parses_help_flag() {
        let result = parse_args(os(&["--help"])).expect("help should parse without error");
        assert!(matches!(result, ParseResult::Help));
    }

    #[test]
    fn parses_commands_listing() {
        let result = parse_args(os(&["commands", "--ilp32"])).expect("should parse");
        let ParseResult::Command(Command::Commands(config)) = result else {
            panic!("expected commands listing");
        };
        assert_eq!(config.platform.pointer_width, PointerWidth::Bits32);
    }

    #[test]
    fn commands_rejects_run_only_options() {
        let error = parse_args(os(&["commands", "--json"])).expect_err("json is run only");
        assert!(error.contains("unknown option"));
        let error = parse_args(os(&["commands", "calls.fixture"])).expect_err("no paths");
        assert!(error.contains("unexpected argument"));
    }

    #[test]
    fn rejects_unknown_command() {
        let error = parse_args(os(&["unknown"])).expect_err("unknown command should fail parse");
        assert!(error.contains("unknown command"));
    }

    #[test]
    fn rejects_bad_style_and_missing_input() {
        let error = parse_run_args(os(&["calls.fixture", "--xlat", "fancy"]))
            .expect_err("bad style should fail");
        assert!(error.contains("unknown xlat style"));

        let error = parse_run_args(os(&["-X"])).expect_err("missing value should fail");
        assert!(error.contains("missing value"));

        let error = parse_run_args(std::iter::empty()).expect_err("missing input should fail");
        assert!(error.contains("missing fixture path"));
    }

    #[test]
    fn rejects_multiple_inputs() {
        let error = parse_run_args(os(&["a.fixture", "b.fixture"])).expect_err("two inputs");
        assert!(error.contains("multiple fixture paths"));
    }
}
