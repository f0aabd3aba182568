mod config;
mod render;
mod runner;

use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, Subcommand};
use codespan_reporting::files::SimpleFiles;
use codespan_reporting::term::termcolor::StandardStream;

use config::SiteConfig;
use playground::{Playground, ProcessEngine};

const SUBCOMMANDS: &[&str] = &["extract", "check", "verify", "pages", "help"];

#[derive(Parser)]
#[command(name = "erdocs", version, about = "EdgeRules documentation examples")]
struct Cli {
    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    /// Log parser and engine activity (overrides RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the example blocks of a markdown document
    Extract(ExtractArgs),

    /// Check that every snippet has an output section
    Check(CheckArgs),

    /// Evaluate snippets with an external engine and compare with their output
    Verify(VerifyArgs),

    /// List the pages of a site config and their examples
    Pages(PagesArgs),
}

#[derive(clap::Args)]
struct ExtractArgs {
    /// Markdown document to parse
    file: String,

    /// Print blocks as JSON instead of debug output
    #[arg(long)]
    json: bool,

    /// Print a readable rendering of each example instead of debug output
    #[arg(long, conflicts_with = "json")]
    text: bool,

    /// Evaluate snippets with this command and show its results (with --text)
    #[arg(short, long, requires = "text")]
    engine: Option<String>,

    /// Arguments passed to the engine command (after --)
    #[arg(last = true)]
    args: Vec<String>,

    /// Also report parser warnings
    #[arg(short, long)]
    warnings: bool,
}

#[derive(clap::Args)]
struct CheckArgs {
    /// A markdown file, a directory of them, or a site config (.toml)
    path: String,
}

#[derive(clap::Args)]
struct VerifyArgs {
    /// A markdown file, a directory of them, or a site config (.toml)
    path: String,

    /// Engine command: reads a snippet on stdin, prints the result on stdout
    #[arg(short, long)]
    engine: String,

    /// Arguments passed to the engine command (after --)
    #[arg(last = true)]
    args: Vec<String>,
}

#[derive(clap::Args)]
struct PagesArgs {
    /// Site config; the built-in menu is used when omitted
    #[arg(short, long)]
    config: Option<String>,

    /// Content root the page documents are read from
    #[arg(short, long)]
    root: Option<PathBuf>,
}

fn main() {
    // `erdocs file.md` works like `erdocs extract file.md`.
    let mut args: Vec<String> = std::env::args().collect();
    if let Some(pos) = args
        .iter()
        .skip(1)
        .position(|a| !a.starts_with('-'))
        .map(|p| p + 1)
    {
        if !SUBCOMMANDS.contains(&args[pos].as_str()) {
            args.insert(pos, "extract".to_string());
        }
    }

    let cli = Cli::parse_from(&args);
    init_logging(cli.verbose);

    match cli.command {
        Command::Extract(extract_args) => do_extract(extract_args, cli.no_color),
        Command::Check(check_args) => {
            process::exit(runner::run_check(Path::new(&check_args.path), cli.no_color));
        }
        Command::Verify(verify_args) => {
            let mut engine = ProcessEngine::new(verify_args.engine, verify_args.args);
            let code = runner::run_verify(Path::new(&verify_args.path), &mut engine, cli.no_color);
            process::exit(code);
        }
        Command::Pages(pages_args) => process::exit(do_pages(pages_args)),
    }
}

fn init_logging(verbose: bool) {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
    if verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.init();
}

fn do_extract(args: ExtractArgs, no_color: bool) {
    let mut files = SimpleFiles::new();
    let doc = match runner::load_document(&mut files, Path::new(&args.file)) {
        Ok(doc) => doc,
        Err(e) => {
            eprintln!("error: {}", e);
            process::exit(1);
        }
    };

    if args.warnings {
        let writer = StandardStream::stderr(runner::color_choice(no_color));
        runner::emit_warnings(&writer, &files, &doc.warnings);
    }

    if args.json {
        match serde_json::to_string_pretty(&doc.blocks) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("error: cannot serialize blocks: {}", e);
                process::exit(1);
            }
        }
    } else if args.text {
        let mut playground = Playground::new(doc.blocks);
        if let Some(program) = args.engine {
            playground.attach(ProcessEngine::new(program, args.args));
        }
        print!("{}", render::render_page(&playground));
    } else {
        println!("{:#?}", doc.blocks);
    }
}

fn do_pages(args: PagesArgs) -> i32 {
    let mut config = match &args.config {
        Some(path) => match SiteConfig::load_from_path(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("error: {}", e);
                return 1;
            }
        },
        None => SiteConfig::default(),
    };
    if let Some(root) = args.root {
        config.root = Some(root);
    }

    let mut files = SimpleFiles::new();
    let mut missing = 0;
    for (page, path) in config.document_paths() {
        match runner::load_document(&mut files, &path) {
            Ok(doc) => {
                let snippets = doc.blocks.iter().filter(|b| b.has_code()).count();
                let with_output = doc
                    .blocks
                    .iter()
                    .filter(|b| b.has_code() && b.output.is_some())
                    .count();
                println!(
                    "{:<20} {:>3} examples ({} with output)  {}",
                    page.title(),
                    snippets,
                    with_output,
                    path.display()
                );
            }
            Err(e) => {
                missing += 1;
                println!("{:<20} missing  {}", page.title(), e);
            }
        }
    }

    if missing == 0 { 0 } else { 1 }
}
