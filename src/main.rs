//! mdconceal - preview a Markdown file the way a concealing editor shows it

use std::env;
use std::fs;
use std::io;
use std::path::PathBuf;
use std::process;

use tracing_subscriber::EnvFilter;

use mdconceal::preview::{render_lines, write_preview};
use mdconceal::{
    effective_tab_size, ConcealError, Config, DecorationPlan, Document, Engine, Position, Result,
    Selection,
};

/// Parsed command line
struct Options {
    path: PathBuf,
    caret_line: Option<usize>,
    tab_size: Option<usize>,
    dump_plan: bool,
}

fn main() {
    init_logging();

    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_env("MDCONCEAL_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn run() -> Result<()> {
    let args: Vec<String> = env::args().skip(1).collect();
    let Some(options) = parse_args(&args)? else {
        return Ok(());
    };

    let config = Config::load();
    let language = Config::language_for_path(&options.path).unwrap_or_else(|| "markdown".into());
    let text = fs::read_to_string(&options.path)?;
    let doc = Document::new(&text);

    let selection = match options.caret_line {
        Some(line) => Selection::caret(Position::new(line, 0)),
        None => Selection::none(),
    };
    let tab_size = effective_tab_size(options.tab_size.unwrap_or(config.tab_size));

    let plan = if config.handles_language(&language) {
        Engine::new()?.recompute(&doc, &selection, tab_size)
    } else {
        tracing::info!(%language, "language not enabled, showing raw text");
        DecorationPlan::new()
    };

    let mut stdout = io::stdout();
    if options.dump_plan {
        print_plan(&plan);
    } else {
        write_preview(&mut stdout, &render_lines(&doc, &plan)?)?;
    }
    Ok(())
}

/// Parse arguments; `None` means help or version was printed
fn parse_args(args: &[String]) -> Result<Option<Options>> {
    let mut path = None;
    let mut caret_line = None;
    let mut tab_size = None;
    let mut dump_plan = false;

    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--help" | "-h" => {
                print_usage();
                return Ok(None);
            }
            "--version" | "-V" => {
                println!("mdconceal {}", env!("CARGO_PKG_VERSION"));
                return Ok(None);
            }
            "--plan" => dump_plan = true,
            "--line" => caret_line = Some(number_arg("--line", iter.next())?),
            "--tab-size" => tab_size = Some(number_arg("--tab-size", iter.next())?),
            other if other.starts_with('-') => {
                return Err(ConcealError::Message(format!("unknown option: {}", other)));
            }
            other => path = Some(PathBuf::from(other)),
        }
    }

    let path = path.ok_or_else(|| ConcealError::Message("no input file given".into()))?;
    Ok(Some(Options {
        path,
        caret_line,
        tab_size,
        dump_plan,
    }))
}

fn number_arg(flag: &str, value: Option<&String>) -> Result<usize> {
    value
        .and_then(|v| v.parse().ok())
        .ok_or_else(|| ConcealError::Message(format!("{} expects a number", flag)))
}

fn print_plan(plan: &DecorationPlan) {
    for (bucket, ranges) in plan.iter() {
        let ranges: Vec<String> = ranges.iter().map(|r| r.to_string()).collect();
        println!("{}: [{}]", bucket.name(), ranges.join(", "));
    }
}

fn print_usage() {
    println!("mdconceal {} - preview concealed Markdown", env!("CARGO_PKG_VERSION"));
    println!();
    println!("Usage: mdconceal [OPTIONS] FILE");
    println!();
    println!("Options:");
    println!("  --line N       Place the caret on line N (0-based) to reveal its syntax");
    println!("  --tab-size N   Tab width for list nesting, 1-16 (default from config, else 2)");
    println!("  --plan         Print the decoration plan instead of the preview");
    println!("  -h, --help     Show this help message");
    println!("  -V, --version  Show version information");
    println!();
    println!("Logging is controlled by MDCONCEAL_LOG (e.g. MDCONCEAL_LOG=debug).");
}
