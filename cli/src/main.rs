mod scenario;
mod test_runner;

use std::io::{self, Write};
use std::path::Path;
use std::process;

use clap::{Parser, Subcommand};
use codespan_reporting::files::SimpleFiles;
use codespan_reporting::term;
use codespan_reporting::term::termcolor::{ColorChoice, StandardStream};

use query::Structure;
use wall::Wall;
use wall::block::Block;

use crate::scenario::{Scenario, ScenarioError};

const SUBCOMMANDS: &[&str] = &["run", "test", "help"];

#[derive(Parser)]
#[command(name = "wall", version, about = "Query a structure of building blocks")]
struct Cli {
    /// Disable colored error output
    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Load a scenario file and query its wall
    Run(RunArgs),

    /// Run .test.toml scenario files
    Test(TestArgs),
}

#[derive(clap::Args)]
struct RunArgs {
    /// Scenario file describing the wall
    file: String,

    /// Find the first block of this color. Repeatable.
    #[arg(short, long)]
    color: Vec<String>,

    /// Find every block of this material. Repeatable.
    #[arg(short, long)]
    material: Vec<String>,

    /// Print the total number of blocks
    #[arg(long)]
    count: bool,

    /// Print the block tree
    #[arg(long)]
    tree: bool,

    /// Load only, don't query (exit 0 if valid)
    #[arg(long)]
    check: bool,
}

#[derive(clap::Args)]
struct TestArgs {
    /// Path to a .test.toml file or directory containing them
    path: String,

    /// Run only tests in these categories (subfolder names). Repeatable.
    #[arg(short, long)]
    category: Vec<String>,

    /// List available categories and exit
    #[arg(long)]
    list_categories: bool,
}

fn main() {
    env_logger::init();

    let args = with_default_subcommand(std::env::args().collect());
    let cli = Cli::parse_from(&args);

    match cli.command {
        Command::Run(run_args) => do_run(run_args, cli.no_color),
        Command::Test(test_args) => {
            let path = Path::new(&test_args.path);
            if test_args.list_categories {
                test_runner::list_categories(path);
                return;
            }
            let exit_code = test_runner::run_tests(path, cli.no_color, &test_args.category);
            process::exit(exit_code);
        }
    }
}

/// `wall file.toml` works like `wall run file.toml`: insert "run" before the
/// first positional argument unless it already names a subcommand.
fn with_default_subcommand(mut args: Vec<String>) -> Vec<String> {
    if let Some(pos) = args
        .iter()
        .skip(1)
        .position(|a| !a.starts_with('-'))
        .map(|i| i + 1)
    {
        if !SUBCOMMANDS.contains(&args[pos].as_str()) {
            args.insert(pos, "run".to_string());
        }
    }
    args
}

fn do_run(args: RunArgs, no_color: bool) {
    let color_choice = if no_color {
        ColorChoice::Never
    } else {
        ColorChoice::Auto
    };

    // Read source
    let source = match std::fs::read_to_string(&args.file) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("error: cannot read '{}': {}", args.file, e);
            process::exit(1);
        }
    };

    let mut files = SimpleFiles::new();
    let file_id = files.add(args.file.clone(), source.clone());

    let wall = match Scenario::parse(&source, file_id).and_then(|s| s.build(file_id)) {
        Ok(wall) => wall,
        Err(error) => {
            emit_scenario_error(color_choice, &files, &error);
            process::exit(1);
        }
    };

    if args.check {
        eprintln!("ok: {} loaded successfully", args.file);
        return;
    }

    let mut stdout = std::io::stdout().lock();
    if let Err(e) = write_queries(&wall, &args, &mut stdout) {
        eprintln!("error: cannot write output: {}", e);
        process::exit(1);
    }
}

/// Answer the queries requested on the command line. Without any query
/// flag, the block count is printed.
fn write_queries(wall: &Wall, args: &RunArgs, out: &mut dyn Write) -> io::Result<()> {
    if args.tree {
        write_tree(wall, out)?;
    }

    for color in &args.color {
        match wall.find_block_by_color(color) {
            Some(block) => writeln!(out, "color {}: {}", color, describe(block))?,
            None => writeln!(out, "color {}: not found", color)?,
        }
    }

    for material in &args.material {
        let found = wall.find_blocks_by_material(material);
        writeln!(out, "material {}: {} block(s)", material, found.len())?;
        for block in found {
            writeln!(out, "  {}", describe(block))?;
        }
    }

    let queried = args.tree || !args.color.is_empty() || !args.material.is_empty();
    if args.count || !queried {
        writeln!(out, "count: {}", wall.count())?;
    }
    Ok(())
}

fn emit_scenario_error(
    color_choice: ColorChoice,
    files: &SimpleFiles<String, String>,
    error: &ScenarioError,
) {
    let writer = StandardStream::stderr(color_choice);
    let config = term::Config::default();
    let diagnostic = error.to_diagnostic();
    let _ = term::emit_to_write_style(&mut writer.lock(), &config, files, &diagnostic);
}

fn write_tree(wall: &Wall, out: &mut dyn Write) -> io::Result<()> {
    let mut blocks = wall.iter();
    while let Some(block) = blocks.next() {
        let pad = "  ".repeat(blocks.depth());
        writeln!(out, "{}{}", pad, describe(block))?;
    }
    Ok(())
}

/// One-line description of a block: its attributes and kind.
fn describe(block: &Block) -> String {
    match block {
        Block::Atomic(_) => format!("{} {}", block.color(), block.material()),
        Block::Composite(composite) => format!(
            "{} {} (composite of {})",
            block.color(),
            block.material(),
            composite.blocks().len()
        ),
    }
}
