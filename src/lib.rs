//! Regenerates a blog's note index and navigation links, then commits and
//! pushes the result.

use std::env;
use std::error::Error;
use std::path::Path;

use tracing_subscriber::EnvFilter;

pub mod args;
pub mod builder;
pub mod config;
pub mod error;
pub mod formatting;
pub mod note;
pub mod publish;

pub use builder::{BuildReport, build};
pub use config::{DateMarker, IndexConfig, LinkLabels, Preset, PublishTarget};
pub use error::IndexError;
pub use note::NoteName;
pub use publish::{BashRunner, ScriptRunner};

use args::BuildFlags;
use formatting::FormatContext;

pub fn entry() -> Result<(), Box<dyn Error>> {
    let mut args: Vec<String> = env::args().skip(1).collect();
    let has_cmd = args.first().is_some_and(|a| !a.starts_with('-'));
    let cmd = if has_cmd { args.remove(0) } else { "build".to_string() };
    let dir = note::notes_dir()?;

    match cmd.as_str() {
        "build" => {
            let flags = parse_flags(args, "build")?;
            init_logging(flags.verbose);
            run_build(&dir, &flags, &BashRunner::new(&dir), &FormatContext::from_env())?;
        }
        "list" => {
            let flags = parse_flags(args, "list")?;
            init_logging(flags.verbose);
            list_notes(&dir, &flags.config, &FormatContext::from_env())?;
        }
        "path" => println!("{}", dir.display()),
        "help" => print_help(),
        other => {
            print_help();
            return Err(format!("Unknown command: {other}").into());
        }
    }

    Ok(())
}

fn parse_flags(args: Vec<String>, command_name: &str) -> Result<BuildFlags, Box<dyn Error>> {
    args::parse_build_flags(args, command_name)?.resolve(|key| env::var(key).ok())
}

/// RUST_LOG wins; otherwise warnings only, or debug with --verbose.
fn init_logging(verbose: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(if verbose { "note_index=debug" } else { "note_index=warn" })
    });
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn print_help() {
    println!(
        "\
Note Index
Usage:
  nidx [build] [flags]            Regenerate notes and the index, then commit and push
  nidx list [--preset <name>]     List notes in navigation order
  nidx path                       Show the working directory
  nidx help                       Show this message

Build flags:
  -p, --preset <name>             Layout preset: plain|linked|raw (default plain)
  -b, --base <dir>                Directory prefixed to index \"read more\" links
      --index <file>              Index file name (default README.md)
  -n, --dry-run                   Report what would change without writing
      --no-publish                Write files but skip git add/commit/push
      --remote <name>             Remote to push to (default origin)
      --branch <name>             Branch to push (default master)
  -v, --verbose                   Debug logging on stderr

Notes are files named _YYYY-MM-DD-<name>.<ext>; each is rewritten to <name>.<ext>.

Environment:
  NOTE_INDEX_DIR                  Working directory (default: current directory)
  NOTE_INDEX_PRESET               Default preset
  NOTE_INDEX_BASE                 Default base directory for links
  NOTE_INDEX_REMOTE               Default remote
  NOTE_INDEX_BRANCH               Default branch
  NO_COLOR                        Disable colored output
  RUST_LOG                        Override the log filter
"
    );
}

/// Build, report each note, then publish unless told not to.
pub fn run_build(
    dir: &Path,
    flags: &BuildFlags,
    runner: &dyn ScriptRunner,
    ctx: &FormatContext,
) -> Result<BuildReport, Box<dyn Error>> {
    let report = builder::build(dir, &flags.config, flags.dry_run)?;

    let names: Vec<&str> = report.notes.iter().map(|n| n.file_name.as_str()).collect();
    println!("{} {}", ctx.format_header("notes:"), names.join(", "));
    for name in &report.notes {
        if report.changed.contains(&name.realname) {
            println!("{}", ctx.format_changed(&name.realname, flags.dry_run));
        } else {
            println!("{}", ctx.format_unchanged(&name.realname));
        }
    }

    let summary = report.change_summary();
    if flags.dry_run || !flags.publish {
        println!("{} {}", ctx.format_header("summary:"), summary);
        return Ok(report);
    }

    println!("{}", ctx.format_script(&publish::commit_script(&summary, &flags.target)));
    let output = publish::publish(runner, &summary, &flags.target)?;
    print!("{output}");
    Ok(report)
}

fn list_notes(dir: &Path, config: &IndexConfig, ctx: &FormatContext) -> Result<(), Box<dyn Error>> {
    let notes = note::list_note_files(dir)?;
    if notes.is_empty() {
        println!("No notes found. Name files like _2024-01-31-my-note.md.");
        return Ok(());
    }
    for n in notes {
        println!(
            "{}  {}  {}",
            ctx.format_date(&n.date_string()),
            n.realname,
            n.title(config.decorate_titles)
        );
    }
    Ok(())
}
