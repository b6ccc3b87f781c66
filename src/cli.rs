// Command-line front end for multidiff.
//
// Loads files into a model, runs one orchestration strategy and prints the
// rendered diffs (or the raw opcode lists).

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use std::process;

use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum, ValueHint};

use crate::align::{AlignOptions, OpKind};
use crate::io::load_files;
use crate::model::{Diff, MultidiffModel};
use crate::render::{Encoding, Highlight, RenderOptions, Renderer, Side};

const BUF_SIZE: usize = 64 * 1024;

// ---------------------------------------------------------------------------
// Clap CLI definition
// ---------------------------------------------------------------------------

/// Byte-aligned, colorized diffs across sets of binary objects.
#[derive(Parser, Debug)]
#[command(
    name = "multidiff",
    version,
    about = "Colorized binary diffs across many objects",
    arg_required_else_help = true
)]
struct Cli {
    #[command(subcommand)]
    command: Cmd,

    /// Output encoding.
    #[arg(short = 'e', long, value_enum, global = true, default_value_t = EncodeArg::Hexdump)]
    encode: EncodeArg,

    /// Highlighting of changed bytes.
    #[arg(long, value_enum, global = true, default_value_t = ColorArg::Ansi)]
    color: ColorArg,

    /// Which side of each diff to render.
    #[arg(long, value_enum, global = true, default_value_t = SideArg::Target)]
    side: SideArg,

    /// Always search for the longest match (slower on large inputs).
    #[arg(long, global = true)]
    exact: bool,

    /// Output file (default: stdout).
    #[arg(short = 'o', long, global = true, value_hint = ValueHint::FilePath)]
    output: Option<PathBuf>,

    /// Force overwrite existing output files.
    #[arg(short = 'f', long, global = true)]
    force: bool,

    /// Quiet mode (no per-diff headers, no non-error output).
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
    /// Diff every object against the next one.
    Sequence(FilesArgs),
    /// Diff every object against one reference object.
    Baseline(BaselineArgs),
    /// Diff two objects.
    Pair(PairArgs),
    /// Print the edit opcodes between two objects.
    Opcodes(PairArgs),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum EncodeArg {
    Hexdump,
    Hex,
    Utf8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ColorArg {
    Ansi,
    Html,
    None,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum SideArg {
    Source,
    Target,
}

#[derive(Args, Debug)]
struct FilesArgs {
    /// Input files, in order (`-` reads stdin).
    #[arg(required = true, value_hint = ValueHint::FilePath)]
    files: Vec<PathBuf>,
}

#[derive(Args, Debug)]
struct BaselineArgs {
    /// Index of the reference object.
    #[arg(long, short = 'b', default_value_t = 0)]
    baseline: usize,

    /// Input files, in order (`-` reads stdin).
    #[arg(required = true, value_hint = ValueHint::FilePath)]
    files: Vec<PathBuf>,
}

#[derive(Args, Debug)]
struct PairArgs {
    /// Source file.
    #[arg(value_hint = ValueHint::FilePath)]
    source: PathBuf,

    /// Target file.
    #[arg(value_hint = ValueHint::FilePath)]
    target: PathBuf,
}

// ---------------------------------------------------------------------------
// Resolved command + options (flattened from Cli)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Sequence,
    Baseline,
    Pair,
    Opcodes,
}

struct Options {
    command: Command,
    files: Vec<PathBuf>,
    baseline: usize,
    render: RenderOptions,
    side: Side,
    align: AlignOptions,
    output_file: Option<PathBuf>,
    force: bool,
    quiet: bool,
    verbose: u8,
    json_output: bool,
}

fn resolve_options(cli: Cli) -> Options {
    let (command, files, baseline) = match cli.command {
        Cmd::Sequence(args) => (Command::Sequence, args.files, 0),
        Cmd::Baseline(args) => (Command::Baseline, args.files, args.baseline),
        Cmd::Pair(args) => (Command::Pair, vec![args.source, args.target], 0),
        Cmd::Opcodes(args) => (Command::Opcodes, vec![args.source, args.target], 0),
    };

    let encoding = match cli.encode {
        EncodeArg::Hexdump => Encoding::Hexdump,
        EncodeArg::Hex => Encoding::Hex,
        EncodeArg::Utf8 => Encoding::Utf8,
    };
    let highlight = match cli.color {
        ColorArg::Ansi => Highlight::Ansi,
        ColorArg::Html => Highlight::Html,
        ColorArg::None => Highlight::Plain,
    };
    let side = match cli.side {
        SideArg::Source => Side::Source,
        SideArg::Target => Side::Target,
    };
    let align = if cli.exact {
        AlignOptions::exact()
    } else {
        AlignOptions::default()
    };

    Options {
        command,
        files,
        baseline,
        render: RenderOptions {
            encoding,
            highlight,
        },
        side,
        align,
        output_file: cli.output,
        force: cli.force,
        quiet: cli.quiet,
        verbose: cli.verbose.min(2),
        json_output: cli.json_output,
    }
}

#[cfg(any(test, feature = "fuzzing"))]
pub fn fuzz_try_parse_args(args: &[String]) {
    let argv: Vec<String> = std::iter::once("multidiff".to_string())
        .chain(args.iter().cloned())
        .collect();
    if let Ok(cli) = Cli::try_parse_from(argv) {
        let _ = resolve_options(cli);
    }
}

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

fn open_output(opts: &Options) -> Result<Box<dyn Write>, String> {
    match &opts.output_file {
        None => Ok(Box::new(BufWriter::with_capacity(
            BUF_SIZE,
            io::stdout().lock(),
        ))),
        Some(path) => {
            if path.exists() && !opts.force {
                return Err(format!(
                    "output file exists, use -f to overwrite: {}",
                    path.display()
                ));
            }
            File::create(path)
                .map(|f| Box::new(BufWriter::with_capacity(BUF_SIZE, f)) as Box<dyn Write>)
                .map_err(|e| format!("output file: {}: {e}", path.display()))
        }
    }
}

fn diff_header(model: &MultidiffModel, diff: &Diff) -> String {
    let objects = model.objects();
    format!(
        "--- #{} {} -> #{} {}",
        diff.source,
        objects[diff.source].name(),
        diff.target,
        objects[diff.target].name()
    )
}

fn equal_bytes(diff: &Diff) -> usize {
    diff.opcodes
        .iter()
        .filter(|op| op.kind == OpKind::Equal)
        .map(|op| op.target_len())
        .sum()
}

// ---------------------------------------------------------------------------
// Diff commands (sequence, baseline, pair)
// ---------------------------------------------------------------------------

fn cmd_diff(opts: &Options, model: &mut MultidiffModel) -> i32 {
    match opts.command {
        Command::Sequence => {
            model.diff_sequence();
        }
        Command::Baseline => {
            if let Err(e) = model.diff_baseline(opts.baseline) {
                eprintln!("multidiff: --baseline: {e}");
                return 1;
            }
        }
        _ => {
            if let Err(e) = model.diff(0, 1) {
                eprintln!("multidiff: {e}");
                return 1;
            }
        }
    }

    let renderer = Renderer::new(opts.render);
    let mut out = match open_output(opts) {
        Ok(w) => w,
        Err(msg) => {
            eprintln!("multidiff: {msg}");
            return 1;
        }
    };

    for diff in model.diffs() {
        let rendered = match renderer.render_side(model, diff, opts.side) {
            Ok(text) => text,
            Err(e) => {
                eprintln!("multidiff: {}: {e}", diff_header(model, diff));
                return 1;
            }
        };
        let written = if opts.quiet {
            writeln!(out, "{rendered}")
        } else {
            writeln!(out, "{}\n{rendered}", diff_header(model, diff))
        };
        if let Err(e) = written {
            eprintln!("multidiff: write error: {e}");
            return 1;
        }
    }
    if let Err(e) = out.flush() {
        eprintln!("multidiff: write flush error: {e}");
        return 1;
    }

    if opts.verbose > 0 && !opts.quiet {
        eprintln!(
            "multidiff: {} objects, {} diffs",
            model.len(),
            model.diffs().len()
        );
    }
    if opts.json_output {
        let diffs: Vec<_> = model
            .diffs()
            .iter()
            .map(|d| {
                serde_json::json!({
                    "source": d.source,
                    "target": d.target,
                    "opcodes": d.opcodes.len(),
                    "equal_bytes": equal_bytes(d),
                    "identical": d.is_identity(),
                })
            })
            .collect();
        let json = serde_json::json!({
            "command": format!("{:?}", opts.command).to_lowercase(),
            "objects": model.len(),
            "diffs": diffs,
        });
        match serde_json::to_string_pretty(&json) {
            Ok(text) => eprintln!("{text}"),
            Err(e) => {
                eprintln!("multidiff: json: {e}");
                return 1;
            }
        }
    }

    0
}

// ---------------------------------------------------------------------------
// Opcodes command
// ---------------------------------------------------------------------------

fn cmd_opcodes(opts: &Options, model: &mut MultidiffModel) -> i32 {
    let (diff, stats) = match model.diff_with_stats(0, 1) {
        Ok((d, stats)) => (d.clone(), stats),
        Err(e) => {
            eprintln!("multidiff: {e}");
            return 1;
        }
    };

    let mut out = match open_output(opts) {
        Ok(w) => w,
        Err(msg) => {
            eprintln!("multidiff: {msg}");
            return 1;
        }
    };

    let result = if opts.json_output {
        let ops: Vec<_> = diff
            .opcodes
            .iter()
            .map(|op| {
                serde_json::json!([
                    op.kind.as_str(),
                    op.source_start,
                    op.source_end,
                    op.target_start,
                    op.target_end,
                ])
            })
            .collect();
        serde_json::to_string_pretty(&serde_json::Value::Array(ops))
            .map_err(io::Error::other)
            .and_then(|text| writeln!(out, "{text}"))
    } else {
        diff.opcodes.iter().try_for_each(|op| writeln!(out, "{op}"))
    };

    if let Err(e) = result.and_then(|_| out.flush()) {
        eprintln!("multidiff: write error: {e}");
        return 1;
    }

    if opts.verbose > 0 && !opts.quiet {
        eprintln!(
            "multidiff: {} opcodes, {} matching blocks, {} bytes matched, {} popular byte values",
            diff.opcodes.len(),
            stats.blocks,
            stats.matched_bytes,
            stats.popular_bytes
        );
    }
    0
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

/// Main CLI entry point. Parses arguments via clap, dispatches commands.
pub fn run() -> ! {
    let cli = Cli::parse();
    let opts = resolve_options(cli);

    let filter = match (opts.quiet, opts.verbose) {
        (true, _) => "error",
        (false, 0) => "warn",
        (false, 1) => "info",
        (false, _) => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(filter))
        .format_timestamp(None)
        .format_target(false)
        .init();

    let mut model = MultidiffModel::with_align_options(opts.align);
    match load_files(&mut model, &opts.files) {
        Ok(stats) => log::info!(
            "loaded {} objects, {} bytes (largest {})",
            stats.objects,
            stats.total_bytes,
            stats.largest
        ),
        Err(e) => {
            eprintln!("multidiff: {e}");
            process::exit(1);
        }
    }

    let exit_code = match opts.command {
        Command::Sequence | Command::Baseline | Command::Pair => cmd_diff(&opts, &mut model),
        Command::Opcodes => cmd_opcodes(&opts, &mut model),
    };

    process::exit(exit_code);
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
