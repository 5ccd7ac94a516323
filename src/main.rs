use anyhow::Context;
use clap::{Parser, Subcommand};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use snaplog::config::{load_config, LoggingConfig};
use snaplog::error::{SnapError, SnapResult};
use snaplog::model::{Author, Commit, DiffSummary, FileChange};
use snaplog::store::{unified_diff, CommitLog};

/// snaplog: linear commit history for generated project files
#[derive(Parser)]
#[command(name = "snaplog")]
#[command(
    about = "Linear commit history for generated project files. Undo/redo, checkpoints, diffs and export."
)]
#[command(version)]
struct Cli {
    /// Optional configuration file (TOML/JSON/YAML)
    #[arg(short, long, global = true, env = "SNAPLOG_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a scripted walkthrough of commits, undo/redo, restore and diffs
    Demo,
    /// Start an interactive REPL session
    Interactive {
        /// Load an exported history on startup
        #[arg(short, long)]
        import: Option<PathBuf>,
    },
    /// List the commits of an exported history
    Log {
        /// Exported history file
        #[arg(short, long)]
        file: PathBuf,
    },
    /// Diff two commits of an exported history
    Diff {
        /// Exported history file
        #[arg(short, long)]
        file: PathBuf,
        /// Older commit (ID or unique prefix)
        #[arg(long)]
        from: String,
        /// Newer commit (ID or unique prefix)
        #[arg(long)]
        to: String,
    },
    /// Print a file as it looked at a commit (head by default)
    Show {
        /// Exported history file
        #[arg(short, long)]
        file: PathBuf,
        /// Logical file path
        #[arg(short, long)]
        path: String,
        /// Commit ID or unique prefix
        #[arg(long)]
        commit: Option<String>,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };
    init_tracing(&config.logging);

    let log = CommitLog::from_config(&config.history);
    let result = match cli.command {
        Commands::Demo => run_demo(log),
        Commands::Interactive { import } => run_interactive(log, import.as_deref()),
        Commands::Log { file } => load_into(log, &file).map(|log| print_log(&log)),
        Commands::Diff { file, from, to } => {
            load_into(log, &file).and_then(|log| cmd_diff(&log, &from, &to))
        }
        Commands::Show { file, path, commit } => {
            load_into(log, &file).and_then(|log| cmd_show(&log, &path, commit.as_deref()))
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn init_tracing(logging: &LoggingConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.filter));
    let registry = tracing_subscriber::registry().with(filter);

    if logging.json {
        registry
            .with(fmt::layer().json().with_writer(io::stderr))
            .init();
    } else {
        registry.with(fmt::layer().with_writer(io::stderr)).init();
    }
}

fn load_into(mut log: CommitLog, path: &Path) -> anyhow::Result<CommitLog> {
    let serialized = std::fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    log.try_import_history(&serialized)
        .with_context(|| format!("importing {}", path.display()))?;
    Ok(log)
}

// ---------------------------------------------------------------------------
// Demo
// ---------------------------------------------------------------------------

fn run_demo(mut log: CommitLog) -> anyhow::Result<()> {
    println!("=== snaplog demo ===\n");

    let init = log.commit(
        vec![
            FileChange::create("src/App.tsx", "export const App = () => null;\n"),
            FileChange::create("src/index.ts", "import { App } from './App';\n"),
        ],
        "Scaffold project",
        Author::Automated,
    );
    println!("  + {} {}", init.short_id(), init.message);

    let edit = log.commit(
        vec![FileChange::modify(
            "src/App.tsx",
            "export const App = () => <h1>Hello</h1>;\n",
        )],
        "Render a heading",
        Author::User,
    );
    println!("  + {} {}", edit.short_id(), edit.message);

    let fix = log.commit(
        vec![
            FileChange::modify(
                "src/App.tsx",
                "import React from 'react';\nexport const App = () => <h1>Hello</h1>;\n",
            ),
            FileChange::create("src/styles.css", "h1 { color: teal; }\n"),
        ],
        "Fix missing React import",
        Author::Automated,
    );
    println!("  + {} {}", fix.short_id(), fix.message);

    println!("\n  Current diff:");
    print_current_diff(&log);

    println!("\n  undo -> {}", describe(log.undo()));
    println!("  undo -> {}", describe(log.undo()));
    println!("  undo -> {}", describe(log.undo()));
    println!("  redo -> {}", describe(log.redo()));

    println!("\n  restore {} -> {}", fix.short_id(), describe(log.restore_checkpoint(&fix.id)));
    println!("  restore {} -> {}", init.short_id(), describe(log.restore_checkpoint(&init.id)));
    println!("  can redo after restore: {}", log.can_redo());

    let diverge = log.commit(
        vec![FileChange::delete("src/index.ts")],
        "Drop entry point",
        Author::User,
    );
    println!("  + {} {} (forward commits discarded)", diverge.short_id(), diverge.message);

    println!();
    print_log(&log);

    println!("\n  History of src/App.tsx:");
    for version in log.file_history("src/App.tsx") {
        println!(
            "    {} | {} | {} lines",
            version.timestamp.format("%H:%M:%S%.3f"),
            version.change_type,
            version.content.lines().count()
        );
    }

    let exported = log.export_history()?;
    let mut restored = CommitLog::with_max_history(log.max_history());
    let ok = restored.import_history(&exported);
    println!(
        "\n  Export: {} bytes; re-import ok={} identical={}",
        exported.len(),
        ok,
        restored.history() == log.history() && restored.head() == log.head()
    );

    Ok(())
}

fn describe(commit: Option<Commit>) -> String {
    match commit {
        Some(c) => format!("{} {}", c.short_id(), c.message),
        None => "(nothing)".to_string(),
    }
}

// ---------------------------------------------------------------------------
// Interactive REPL
// ---------------------------------------------------------------------------

fn run_interactive(mut log: CommitLog, import: Option<&Path>) -> anyhow::Result<()> {
    println!("=== snaplog interactive ===");
    println!("Linear commit history for project files.\n");

    if let Some(path) = import {
        log = load_into(log, path)?;
        println!("  Loaded {} commits from {}", log.len(), path.display());
    } else {
        println!("History is empty. Commands:");
    }

    print_help();

    let stdin = io::stdin();
    loop {
        print!("\nsnaplog> ");
        io::stdout().flush().ok();

        let mut input = String::new();
        match stdin.read_line(&mut input) {
            Ok(0) => break, // EOF
            Ok(_) => {}
            Err(e) => {
                eprintln!("Read error: {}", e);
                break;
            }
        }

        let input = input.trim();
        if input.is_empty() {
            continue;
        }

        let parts: Vec<&str> = input.splitn(2, char::is_whitespace).collect();
        let cmd = parts[0].to_lowercase();
        let args = if parts.len() > 1 { parts[1].trim() } else { "" };

        match cmd.as_str() {
            "help" | "h" | "?" => print_help(),
            "quit" | "exit" | "q" => {
                println!("Goodbye.");
                break;
            }
            "status" => cmd_status(&log),
            "commit" | "gen" => {
                let author = if cmd == "gen" {
                    Author::Automated
                } else {
                    Author::User
                };
                match parse_write(&log, args) {
                    Some(change) => {
                        let message = format!("{} {}", change.change_type, change.path);
                        let commit = log.commit(vec![change], message, author);
                        println!("  + {} {}", commit.short_id(), commit.message);
                    }
                    None => println!("  Usage: {} <path> <content>  (use \\n for newlines)", cmd),
                }
            }
            "rm" | "delete" => {
                if args.is_empty() {
                    println!("  Usage: rm <path>");
                } else {
                    let commit = log.commit(
                        vec![FileChange::delete(args)],
                        format!("delete {}", args),
                        Author::User,
                    );
                    println!("  + {} {}", commit.short_id(), commit.message);
                }
            }
            "undo" => println!("  {}", describe(log.undo())),
            "redo" => println!("  {}", describe(log.redo())),
            "restore" | "checkout" => {
                if args.is_empty() {
                    println!("  Usage: restore <commit-id-prefix>");
                } else {
                    match find_commit(&log, args) {
                        Ok(id) => println!("  {}", describe(log.restore_checkpoint(&id))),
                        Err(e) => eprintln!("  Error: {}", e),
                    }
                }
            }
            "log" => print_log(&log),
            "diff" => {
                let result = if args.is_empty() {
                    print_current_diff(&log);
                    Ok(())
                } else {
                    let ids: Vec<&str> = args.split_whitespace().collect();
                    if ids.len() == 2 {
                        cmd_diff(&log, ids[0], ids[1])
                    } else {
                        println!("  Usage: diff [<from> <to>]");
                        Ok(())
                    }
                };
                if let Err(e) = result {
                    eprintln!("  Error: {:#}", e);
                }
            }
            "history" => {
                if args.is_empty() {
                    println!("  Usage: history <path>");
                } else {
                    cmd_history(&log, args);
                }
            }
            "show" | "cat" => {
                let mut it = args.split_whitespace();
                match it.next() {
                    Some(path) => {
                        if let Err(e) = cmd_show(&log, path, it.next()) {
                            eprintln!("  Error: {:#}", e);
                        }
                    }
                    None => println!("  Usage: show <path> [commit]"),
                }
            }
            "export" => {
                if args.is_empty() {
                    println!("  Usage: export <file>");
                } else if let Err(e) = cmd_export(&log, args) {
                    eprintln!("  Error: {:#}", e);
                }
            }
            "import" => {
                if args.is_empty() {
                    println!("  Usage: import <file>");
                } else {
                    match std::fs::read_to_string(args) {
                        Ok(serialized) => {
                            if log.import_history(&serialized) {
                                println!("  Imported {} commits", log.len());
                            } else {
                                println!("  Import rejected; history unchanged.");
                            }
                        }
                        Err(e) => eprintln!("  Error: {}", e),
                    }
                }
            }
            "clear" => {
                log.clear_history();
                println!("  History cleared.");
            }
            _ => {
                println!(
                    "  Unknown command: '{}'. Type 'help' for available commands.",
                    cmd
                );
            }
        }
    }

    Ok(())
}

fn print_help() {
    println!("  Commands:");
    println!("    status                 Show head position and undo/redo availability");
    println!("    commit <path> <text>   Record a user edit (use \\n for newlines)");
    println!("    gen <path> <text>      Record an automated edit");
    println!("    rm <path>              Record a deletion");
    println!("    undo / redo            Step through history");
    println!("    restore <id>           Jump to any commit (ID prefix is enough)");
    println!("    log                    List commits, '*' marks head");
    println!("    diff [<from> <to>]     Diff head against its parent, or two commits");
    println!("    history <path>         Every recorded version of a file");
    println!("    show <path> [id]       Print a file as of head or a commit");
    println!("    export <file>          Write the history as JSON");
    println!("    import <file>          Replace the history from JSON");
    println!("    clear                  Drop all history");
    println!("    help                   Show this help message");
    println!("    quit                   Exit the REPL");
}

// ---------------------------------------------------------------------------
// Commands
// ---------------------------------------------------------------------------

fn cmd_status(log: &CommitLog) {
    match log.current_commit() {
        Some(commit) => println!(
            "  head {}/{} at {} ({}) | undo: {} | redo: {} | max history: {}",
            log.head_index() + 1,
            log.len(),
            commit.short_id(),
            commit.message,
            log.can_undo(),
            log.can_redo(),
            log.max_history()
        ),
        None => println!("  History is empty (max history: {})", log.max_history()),
    }
}

fn print_log(log: &CommitLog) {
    let checkpoints = log.checkpoints();
    println!("  {} commits:", checkpoints.len());
    for summary in &checkpoints {
        println!("  {}", summary.format_line());
    }
}

fn print_current_diff(log: &CommitLog) {
    let summary = log.current_diff();
    if summary.is_empty() {
        println!("  (no changes relative to the previous commit)");
        return;
    }
    print_summary(&summary);
}

fn print_summary(summary: &DiffSummary) {
    println!(
        "  {} files changed, +{} -{}",
        summary.files_changed, summary.additions, summary.deletions
    );
    for change in &summary.changes {
        println!(
            "    {} {} (+{} -{})",
            change.kind.marker(),
            change.path,
            change.additions,
            change.deletions
        );
    }
}

fn cmd_diff(log: &CommitLog, from: &str, to: &str) -> anyhow::Result<()> {
    let from_id = find_commit(log, from)?;
    let to_id = find_commit(log, to)?;
    let (Some(a), Some(b)) = (log.get_commit(&from_id), log.get_commit(&to_id)) else {
        anyhow::bail!("commit disappeared while diffing");
    };

    print_summary(&log.diff_summary(&from_id, &to_id));

    let diff = log.compare_commits(&from_id, &to_id);
    for path in diff.modified.iter().chain(&diff.added).chain(&diff.deleted) {
        let old = a.file(path).map_or("", |v| v.content.as_str());
        let new = b.file(path).map_or("", |v| v.content.as_str());
        print!("{}", unified_diff(path, old, new));
    }
    Ok(())
}

fn cmd_history(log: &CommitLog, path: &str) {
    let versions = log.file_history(path);
    println!("  Version history for '{}' ({} versions):\n", path, versions.len());

    if versions.is_empty() {
        println!("  (no versions recorded)");
        return;
    }
    for v in &versions {
        println!(
            "  {} | {} | {} | {} | {} lines",
            v.short_id(),
            v.timestamp.format("%Y-%m-%d %H:%M:%S"),
            v.author,
            v.change_type,
            v.content.lines().count()
        );
    }
}

fn cmd_show(log: &CommitLog, path: &str, commit: Option<&str>) -> anyhow::Result<()> {
    let commit_id = match commit {
        Some(prefix) => find_commit(log, prefix)?,
        None => log
            .current_commit()
            .map(|c| c.id.clone())
            .context("history is empty")?,
    };

    match log.resolve_file(path, &commit_id) {
        Some(version) => print!("{}", version.content),
        None => println!("  '{}' does not exist at {}", path, commit_id),
    }
    Ok(())
}

fn cmd_export(log: &CommitLog, path: &str) -> anyhow::Result<()> {
    let serialized = log.export_history()?;
    std::fs::write(path, &serialized).with_context(|| format!("writing {}", path))?;
    println!("  Wrote {} commits ({} bytes) to {}", log.len(), serialized.len(), path);
    Ok(())
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Parse `<path> <content>` with `\n` escapes. A path unseen so far is a
/// creation, otherwise a modification.
fn parse_write(log: &CommitLog, args: &str) -> Option<FileChange> {
    let (path, content) = args.split_once(char::is_whitespace)?;
    let content = content.trim_start().replace("\\n", "\n");
    let exists = log
        .current_commit()
        .and_then(|head| log.resolve_file(path, &head.id))
        .is_some();
    if exists {
        Some(FileChange::modify(path, content))
    } else {
        Some(FileChange::create(path, content))
    }
}

/// Resolve a full commit ID from an exact ID or a unique prefix.
fn find_commit(log: &CommitLog, needle: &str) -> SnapResult<String> {
    let needle = needle.trim();
    if let Some(commit) = log.get_commit(needle) {
        return Ok(commit.id.clone());
    }
    let mut matches = log
        .commits()
        .iter()
        .filter(|c| !needle.is_empty() && c.id.starts_with(needle));
    match (matches.next(), matches.next()) {
        (Some(only), None) => Ok(only.id.clone()),
        _ => Err(SnapError::CommitNotFound(needle.to_string())),
    }
}
