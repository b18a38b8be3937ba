//! userdic CLI - Japanese input-method user dictionary converter
//!
//! Reads a dictionary exported by one input method and writes it in the
//! format of another.

use clap::error::ErrorKind;
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use colored::*;
use log::debug;
use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use userdic::render::DEFAULT_WEIGHT;
use userdic::{Conversion, Diagnostics, DictFormat, Userdic, Vocabulary};

/// Japanese input-method user dictionary converter
#[derive(Parser)]
#[command(
    name = "userdic",
    author = "iyulab",
    version,
    about = "Convert Japanese IME user dictionaries between formats",
    long_about = "userdic - Japanese input-method user dictionary converter.\n\n\
                  Converts user dictionaries between Mozc/Google, Anthy/Canna, ATOK,\n\
                  Microsoft IME, Wnn, Apple text replacements and a generic format.\n\n\
                  Usage:\n  \
                  userdic <from> <to> < in.txt > out.txt   Convert stdin to stdout\n  \
                  userdic <from> <to> -i in.txt -o out.txt Convert files\n  \
                  userdic inspect <from> -i in.txt         Show parsed records as JSON"
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Source format
    from: Option<FormatArg>,

    /// Target format
    to: Option<FormatArg>,

    /// Input file (default: stdin)
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Fail on the first malformed record or unknown part-of-speech
    #[arg(long)]
    strict: bool,

    /// Disable parallel record processing
    #[arg(long)]
    sequential: bool,

    /// Frequency weight written to anthy/canna dictionaries
    #[arg(long, default_value_t = DEFAULT_WEIGHT)]
    weight: u32,

    /// Part-of-speech table to use instead of the bundled one
    #[arg(long, env = "USERDIC_HINSHI", global = true)]
    hinshi: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// List supported dictionary formats
    Formats,

    /// Parse a dictionary and print its canonical records as JSON
    Inspect {
        /// Source format
        from: FormatArg,

        /// Input file (default: stdin)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Output compact JSON (no indentation)
        #[arg(long)]
        compact: bool,
    },

    /// Show version information
    Version,
}

/// Dictionary format
#[derive(Clone, Copy, ValueEnum)]
enum FormatArg {
    /// Mozc user dictionary
    Mozc,
    /// Google Japanese Input (same as mozc)
    Google,
    /// Anthy private dictionary
    Anthy,
    /// Canna (anthy records, EUC-JP)
    Canna,
    /// ATOK word list
    Atok,
    /// Microsoft IME text dictionary
    Msime,
    /// Wnn text dictionary
    Wnn,
    /// Apple text replacement property list
    Apple,
    /// Tab separated, canonical part-of-speech
    Generic,
}

impl From<FormatArg> for DictFormat {
    fn from(format: FormatArg) -> Self {
        match format {
            FormatArg::Mozc => DictFormat::Mozc,
            FormatArg::Google => DictFormat::Google,
            FormatArg::Anthy => DictFormat::Anthy,
            FormatArg::Canna => DictFormat::Canna,
            FormatArg::Atok => DictFormat::Atok,
            FormatArg::Msime => DictFormat::Msime,
            FormatArg::Wnn => DictFormat::Wnn,
            FormatArg::Apple => DictFormat::Apple,
            FormatArg::Generic => DictFormat::Generic,
        }
    }
}

fn main() {
    let cli = Cli::parse();
    if let Err(e) = check_formats(&cli) {
        e.exit();
    }
    init_logging(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();
}

/// Without a subcommand, both formats are required.
fn check_formats(cli: &Cli) -> Result<(), clap::Error> {
    if cli.command.is_some() || (cli.from.is_some() && cli.to.is_some()) {
        return Ok(());
    }
    Err(Cli::command().error(
        ErrorKind::MissingRequiredArgument,
        "both <FROM> and <TO> formats are required",
    ))
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        None => {
            let (Some(from), Some(to)) = (cli.from, cli.to) else {
                return Err("both FROM and TO formats are required".into());
            };

            let mut userdic = build_userdic(cli.hinshi.as_deref())?.with_weight(cli.weight);
            if cli.strict {
                userdic = userdic.strict();
            }
            if cli.sequential {
                userdic = userdic.sequential();
            }

            run_convert(
                &userdic,
                from.into(),
                to.into(),
                cli.input.as_deref(),
                cli.output.as_deref(),
            )?;
        }

        Some(Commands::Formats) => print_formats(),

        Some(Commands::Inspect {
            from,
            input,
            compact,
        }) => {
            let userdic = build_userdic(cli.hinshi.as_deref())?;
            debug!("inspecting {} ({})", DictFormat::from(from), describe(input.as_deref(), "stdin"));
            let data = read_input(input.as_deref())?;
            let loaded = userdic.read(from.into(), &data)?;
            report_diagnostics(&loaded.diagnostics);

            let json = if compact {
                serde_json::to_string(&loaded.records)?
            } else {
                serde_json::to_string_pretty(&loaded.records)?
            };
            println!("{}", json);
        }

        Some(Commands::Version) => print_version(),
    }

    Ok(())
}

/// Converts input to output. Nothing is written unless conversion succeeds.
fn run_convert(
    userdic: &Userdic,
    from: DictFormat,
    to: DictFormat,
    input: Option<&Path>,
    output: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    debug!(
        "converting {} -> {} ({} -> {})",
        from,
        to,
        describe(input, "stdin"),
        describe(output, "stdout")
    );
    let data = read_input(input)?;
    let conversion = userdic.convert(from, to, &data)?;
    report_diagnostics(&conversion.diagnostics);

    write_output(output, &conversion.bytes)?;

    if let Some(path) = output {
        print_summary(from, to, path, &conversion);
    }
    Ok(())
}

fn build_userdic(hinshi: Option<&Path>) -> userdic::Result<Userdic> {
    let userdic = Userdic::new();
    match hinshi {
        Some(path) => {
            debug!("part-of-speech table: {}", path.display());
            Ok(userdic.with_vocabulary(Vocabulary::load(path)?))
        }
        None => Ok(userdic),
    }
}

fn describe(path: Option<&Path>, default: &str) -> String {
    path.map_or_else(|| default.to_string(), |p| p.display().to_string())
}

fn report_diagnostics(diagnostics: &Diagnostics) {
    for diagnostic in diagnostics {
        eprintln!("{}: {}", "warning".yellow().bold(), diagnostic);
    }
}

fn print_summary(from: DictFormat, to: DictFormat, path: &Path, conversion: &Conversion) {
    println!(
        "{} Converted {} records ({} -> {}): {}",
        "✓".green().bold(),
        conversion.record_count,
        from,
        to,
        path.display()
    );
    if let Some(encoding) = conversion.encoding {
        println!("{}: {}", "Input encoding".bold(), encoding);
    }
    if !conversion.diagnostics.is_empty() {
        println!(
            "{} {} warnings",
            "!".yellow().bold(),
            conversion.diagnostics.len()
        );
    }
}

fn print_formats() {
    println!("{}", "Supported Formats".cyan().bold());
    println!("{}", "─".repeat(40));
    for format in DictFormat::ALL {
        println!("{:<10} {}", format.name().bold(), format.description());
    }
}

fn print_version() {
    println!("{} {}", "userdic".green().bold(), env!("CARGO_PKG_VERSION"));
    println!("Japanese input-method user dictionary converter");
    println!();
    let names: Vec<&str> = DictFormat::ALL.iter().map(|format| format.name()).collect();
    println!("Supported formats: {}", names.join(", "));
}

fn read_input(path: Option<&Path>) -> io::Result<Vec<u8>> {
    match path {
        Some(p) => fs::read(p),
        None => {
            let mut data = Vec::new();
            io::stdin().lock().read_to_end(&mut data)?;
            Ok(data)
        }
    }
}

fn write_output(path: Option<&Path>, content: &[u8]) -> io::Result<()> {
    match path {
        Some(p) => fs::write(p, content),
        None => {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            handle.write_all(content)?;
            handle.flush()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_convert_arguments() {
        let cli = Cli::try_parse_from(["userdic", "msime", "mozc", "-i", "in.txt", "--weight", "100"]).unwrap();
        assert!(cli.command.is_none());
        assert!(matches!(cli.from, Some(FormatArg::Msime)));
        assert!(matches!(cli.to, Some(FormatArg::Mozc)));
        assert_eq!(cli.input, Some(PathBuf::from("in.txt")));
        assert_eq!(cli.weight, 100);
    }

    #[test]
    fn test_missing_target_format_is_an_error() {
        let cli = Cli::try_parse_from(["userdic", "msime"]).unwrap();
        match check_formats(&cli) {
            Err(e) => {
                assert_eq!(e.kind(), ErrorKind::MissingRequiredArgument);
                assert_ne!(e.exit_code(), 0);
            }
            Ok(()) => panic!("Expected missing argument error"),
        }

        let cli = Cli::try_parse_from(["userdic"]).unwrap();
        assert!(check_formats(&cli).is_err());

        let cli = Cli::try_parse_from(["userdic", "formats"]).unwrap();
        assert!(check_formats(&cli).is_ok());
        let cli = Cli::try_parse_from(["userdic", "msime", "mozc"]).unwrap();
        assert!(check_formats(&cli).is_ok());
    }

    #[test]
    fn test_describe_paths() {
        assert_eq!(describe(None, "stdin"), "stdin");
        assert_eq!(describe(Some(Path::new("in.txt")), "stdin"), "in.txt");
    }

    #[test]
    fn test_unknown_format_is_rejected() {
        assert!(Cli::try_parse_from(["userdic", "skk", "mozc"]).is_err());
    }

    #[test]
    fn test_format_arg_mapping() {
        assert_eq!(DictFormat::from(FormatArg::Google).dialect(), userdic::Dialect::Mozc);
        assert_eq!(DictFormat::from(FormatArg::Canna), DictFormat::Canna);
    }
}
