//! texnum CLI - siunitx-style number and unit macros for TeX math markup

#[cfg(feature = "cli")]
use clap::{Parser, Subcommand};
#[cfg(feature = "cli")]
use std::fs;
#[cfg(feature = "cli")]
use std::io::{self, Read, Write};
#[cfg(feature = "cli")]
use std::path::Path;
#[cfg(feature = "cli")]
use texnum::{
    format_number, render_document, Engine, ExpandError, ExpandResult, MacroTable, RenderOptions,
    RenderReport,
};

#[cfg(feature = "cli")]
#[derive(Parser)]
#[command(name = "texnum")]
#[command(version)]
#[command(about = "texnum - siunitx-style number and unit macros for TeX math markup", long_about = None)]
struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    command: Option<Commands>,

    /// Input file path (reads from stdin if not provided)
    input_file: Option<String>,

    /// Output file path (writes to stdout if not provided)
    #[arg(short, long)]
    output: Option<String>,

    /// Render options file (.toml or .json)
    #[arg(long, global = true)]
    config: Option<String>,

    /// Extra macro as NAME=TEMPLATE, e.g. '\RR=\mathbb{R}' (repeatable)
    #[arg(long = "macro", value_name = "NAME=TEMPLATE", global = true)]
    macros: Vec<String>,

    /// Fail on the first math region that cannot be expanded
    #[arg(long, global = true)]
    strict: bool,

    /// Expansion limit per math region
    #[arg(long, global = true)]
    max_expansions: Option<usize>,

    /// Write the warnings of a render as JSON to this path
    #[arg(long, global = true)]
    report: Option<String>,

    /// Log each macro expansion
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[cfg(feature = "cli")]
#[derive(Subcommand)]
enum Commands {
    /// Expand every math region of a document (default action)
    Render {
        /// Input file path
        input: Option<String>,

        /// Output file path
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Format numeric literals, one result per line
    Num {
        /// Literals such as 12345.678 or 1.5e-3
        #[arg(required = true, allow_hyphen_values = true)]
        literals: Vec<String>,
    },

    /// Expand the whole input as a single math region
    Math {
        /// Input file path
        input: Option<String>,

        /// Output file path
        #[arg(short, long)]
        output: Option<String>,
    },

    /// List every macro with its template
    Macros,

    /// Show version and feature info
    Info,
}

#[cfg(feature = "cli")]
fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

#[cfg(feature = "cli")]
fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

#[cfg(feature = "cli")]
fn run(cli: Cli) -> ExpandResult<()> {
    let options = build_options(&cli)?;

    match cli.command {
        None => render(cli.input_file.as_deref(), cli.output.as_deref(), &options, cli.report.as_deref()),
        Some(Commands::Render { input, output }) => {
            render(input.as_deref(), output.as_deref(), &options, cli.report.as_deref())
        }
        Some(Commands::Num { literals }) => {
            for literal in &literals {
                println!("{}", format_number(literal));
            }
            Ok(())
        }
        Some(Commands::Math { input, output }) => {
            let source = read_input(input.as_deref())?;
            let table = options.macro_table();
            let engine = Engine::new(&table).with_max_expansions(options.max_expansions);
            let expanded = engine.expand(source.trim_end())?;
            write_output(output.as_deref(), &expanded)
        }
        Some(Commands::Macros) => {
            let table = options.macro_table();
            for name in table.names() {
                if let Some(rule) = table.get(name) {
                    println!("{:<16} {}", name, rule);
                }
            }
            Ok(())
        }
        Some(Commands::Info) => {
            print_info();
            Ok(())
        }
    }
}

/// Config file first, then the command-line flags on top.
#[cfg(feature = "cli")]
fn build_options(cli: &Cli) -> ExpandResult<RenderOptions> {
    let mut options = match &cli.config {
        Some(path) => load_config(Path::new(path))?,
        None => RenderOptions::default(),
    };

    for definition in &cli.macros {
        let (name, template) = parse_macro_definition(definition)?;
        options.macros.insert(name, template);
    }
    if cli.strict {
        options.throw_on_error = true;
    }
    if let Some(limit) = cli.max_expansions {
        options.max_expansions = limit;
    }

    Ok(options)
}

#[cfg(feature = "cli")]
fn load_config(path: &Path) -> ExpandResult<RenderOptions> {
    let text = fs::read_to_string(path)?;
    match path.extension().and_then(|ext| ext.to_str()) {
        Some("json") => RenderOptions::from_json(&text),
        _ => toml::from_str(&text).map_err(|e| ExpandError::Config {
            message: format!("{}: {}", path.display(), e),
        }),
    }
}

/// Split `NAME=TEMPLATE`. A missing backslash on the name is added.
#[cfg(feature = "cli")]
fn parse_macro_definition(definition: &str) -> ExpandResult<(String, String)> {
    let Some((name, template)) = definition.split_once('=') else {
        return Err(ExpandError::Config {
            message: format!("expected NAME=TEMPLATE, got '{}'", definition),
        });
    };
    let name = name.trim();
    if name.is_empty() {
        return Err(ExpandError::Config {
            message: format!("empty macro name in '{}'", definition),
        });
    }
    let name = if name.starts_with('\\') || name == "," {
        name.to_string()
    } else {
        format!("\\{}", name)
    };
    Ok((name, template.to_string()))
}

#[cfg(feature = "cli")]
fn render(
    input: Option<&str>,
    output: Option<&str>,
    options: &RenderOptions,
    report_path: Option<&str>,
) -> ExpandResult<()> {
    let source = read_input(input)?;
    let report = render_document(&source, options)?;

    for warning in &report.warnings {
        eprintln!("{}", warning);
    }
    if let Some(path) = report_path {
        write_report(path, &report)?;
    }

    write_output(output, &report.content)
}

#[cfg(feature = "cli")]
fn write_report(path: &str, report: &RenderReport) -> ExpandResult<()> {
    let json = serde_json::to_string_pretty(&report.warnings)?;
    fs::write(path, json)?;
    Ok(())
}

#[cfg(feature = "cli")]
fn read_input(path: Option<&str>) -> ExpandResult<String> {
    match path {
        Some(path) => Ok(fs::read_to_string(path)?),
        None => {
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer)?;
            Ok(buffer)
        }
    }
}

#[cfg(feature = "cli")]
fn write_output(path: Option<&str>, content: &str) -> ExpandResult<()> {
    match path {
        Some(path) => fs::write(path, content)?,
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(content.as_bytes())?;
            if !content.ends_with('\n') {
                writeln!(stdout)?;
            }
        }
    }
    Ok(())
}

#[cfg(feature = "cli")]
fn print_info() {
    let table = MacroTable::builtin();
    println!("texnum - siunitx-style number and unit macros for TeX math markup");
    println!("Version: {}", env!("CARGO_PKG_VERSION"));
    println!();
    println!("Features:");
    println!("  ✓ Number formatting (digit grouping, exponents, \\pm)");
    println!("  ✓ \\num, \\qty, \\qtyrange and the comma macro");
    println!("  ✓ SI units, prefixes and \\unit composition");
    println!("  ✓ Document auto-render ($...$, $$...$$, \\(...\\), \\[...\\])");
    println!();
    println!("Built-in macros: {}", table.len());
    println!();
}

#[cfg(not(feature = "cli"))]
fn main() {
    eprintln!("CLI feature not enabled. Build with --features cli");
    eprintln!();
    eprintln!("Usage:");
    eprintln!("  cargo install texnum --features cli");
    eprintln!("  texnum [OPTIONS] [INPUT_FILE]");
}
