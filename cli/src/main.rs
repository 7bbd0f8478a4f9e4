mod build;
mod test_runner;

use std::path::Path;
use std::process;

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const SUBCOMMANDS: &[&str] = &["compile", "build", "test", "help"];

#[derive(Parser)]
#[command(name = "sprig", version, about = "Sprig markup compiler")]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Disable colored test output
    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Compile a single source file to HTML
    Compile(CompileArgs),

    /// Run a target from a Sprigfile
    Build(BuildArgs),

    /// Run .test.sprig golden tests
    Test(TestArgs),
}

#[derive(clap::Args)]
struct CompileArgs {
    /// Source file to compile
    input: String,

    /// Output file (defaults to output.html)
    output: Option<String>,

    /// Dump the parsed AST instead of compiling
    #[arg(long)]
    ast: bool,
}

#[derive(clap::Args)]
struct BuildArgs {
    /// Target to build
    #[arg(default_value = "all")]
    target: String,

    /// Build file to read
    #[arg(short, long, default_value = "Sprigfile")]
    file: String,
}

#[derive(clap::Args)]
struct TestArgs {
    /// A .test.sprig file or a directory containing them
    path: String,

    /// Run only tests in these categories (subfolder names). Repeatable.
    #[arg(short, long)]
    category: Vec<String>,

    /// List available categories and exit
    #[arg(long)]
    list_categories: bool,
}

fn main() {
    // Backwards compatibility: if the first positional arg is not a known
    // subcommand, inject "compile" so `sprig page.sprig out.html` works
    // like `sprig compile page.sprig out.html`.
    let mut args: Vec<String> = std::env::args().collect();
    if let Some(first_pos) = args.iter().skip(1).find(|a| !a.starts_with('-')) {
        let first_pos = first_pos.clone();
        if !SUBCOMMANDS.contains(&first_pos.as_str()) {
            let pos = args.iter().position(|a| *a == first_pos).unwrap();
            args.insert(pos, "compile".to_string());
        }
    }

    let cli = Cli::parse_from(&args);

    init_logging(cli.verbose);

    match cli.command {
        Command::Compile(args) => do_compile(args, cli.verbose),
        Command::Build(args) => do_build(args, cli.verbose),
        Command::Test(args) => {
            let path = Path::new(&args.path);
            if args.list_categories {
                test_runner::list_categories(path);
                return;
            }
            let exit_code = test_runner::run_tests(path, cli.no_color, &args.category);
            process::exit(exit_code);
        }
    }
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn do_compile(args: CompileArgs, verbose: bool) {
    let input = Path::new(&args.input);

    if args.ast {
        let source = match std::fs::read_to_string(input) {
            Ok(s) => s,
            Err(e) => {
                eprintln!("error: cannot read '{}': {}", args.input, e);
                process::exit(1);
            }
        };
        let program = sprig::parser::Parser::new(source, verbose).parse();
        println!("{:#?}", program);
        return;
    }

    let output = args.output.as_deref().unwrap_or(build::DEFAULT_OUTPUT);
    if let Err(error) = build::compile_file(input, Path::new(output), verbose) {
        eprintln!("error: {}", error);
        process::exit(1);
    }
}

fn do_build(args: BuildArgs, verbose: bool) {
    if let Err(error) = build::run_target(Path::new(&args.file), &args.target, verbose) {
        eprintln!("error: {}", error);
        process::exit(1);
    }
}
