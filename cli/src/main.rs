use std::{
    env,
    io::{self, Write},
    path::PathBuf,
    process::ExitCode,
    sync::LazyLock,
};

use clap::{ArgAction, Parser, Subcommand};
use colored::Colorize;
use regex::Regex;
use roster::{Action, Config, Report, Workflow};
use tracing::Level;
use tracing_subscriber::EnvFilter;

// cargo install --path cli


#[derive(Parser)]
#[command(name = "roster")]
#[command(about = "view and edit the employee table kept in a delimited file")]
struct CLI {
    /// Read settings from this JSON file instead of the default location
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// More log output (-v debug, -vv trace), RUST_LOG is respected too
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,

    /// Import the canonical file before the prompt opens
    #[arg(long)]
    import: bool,
}


#[derive(Parser)]
#[command(name = "roster")]
#[command(about = "Available commands:")]
#[command(override_usage = "<COMMAND> <ARGS>")]
struct InteractiveCLI {
    #[command(subcommand)]
    command: InteractiveCommand
}


#[derive(Subcommand)]
enum InteractiveCommand {
    /// Show the table
    Show {
        /// First row to show
        #[arg(short, long, default_value = "0")]
        from: usize,
        /// Number of rows to show
        #[arg(short, long, default_value = "25")]
        window: usize,
    },
    /// Write the table to a new, uniquely named file
    Export,
    /// Load the canonical file, only when the table is empty
    Import,
    /// Open the edit form for the selected row
    Edit {
        /// Index of the selected row (exactly one)
        rows: Vec<usize>,
    },
    /// Change a field of the open form: set <COLUMN>=<VALUE>
    Set {
        #[arg(value_name = "COLUMN=VALUE", num_args = 0.., allow_hyphen_values = true)]
        assignment: Vec<String>,
    },
    /// Show the open form
    Form,
    /// Save the form into the table and the canonical file
    Submit,
    /// Discard the open form
    Cancel,
    /// Exit the CLI
    Quit
}


/// `set <column>=<value>`, the value is taken verbatim so it may hold spaces
static ASSIGNMENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(?:set\s+)?(?P<column>[^=]+?)\s*=(?P<value>.*)$").expect("assignment pattern is valid")
});

fn parse_assignment(input: &str) -> Option<(String, String)> {
    let caps = ASSIGNMENT.captures(input)?;
    Some((caps["column"].trim().to_string(), caps["value"].to_string()))
}


fn log_filter(verbose: u8, rust_log: Option<&str>) -> EnvFilter {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };

    let mut filter = EnvFilter::builder().parse_lossy(rust_log.unwrap_or_default());
    // RUST_LOG decides on its own unless -v asks for more
    if verbose > 0 || rust_log.is_none() {
        for crate_name in ["roster", "roster_cli"] {
            if let Ok(directive) = format!("{crate_name}={level}").parse() {
                filter = filter.add_directive(directive);
            }
        }
    }
    filter
}

fn init_logging(verbose: u8) {
    let rust_log = env::var(EnvFilter::DEFAULT_ENV).ok();

    tracing_subscriber::fmt()
        .with_env_filter(log_filter(verbose, rust_log.as_deref()))
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}


fn main() -> ExitCode {
    let cli = CLI::parse();
    init_logging(cli.verbose);

    let config = match Config::discover(cli.config.as_deref()) {
        Ok(c) => c,
        Err(e) => { eprintln!("{}", e.to_string().red()); return ExitCode::FAILURE; }
    };

    let mut workflow = match Workflow::from_config(&config) {
        Ok(w) => w,
        Err(e) => { eprintln!("{}", e.to_string().red()); return ExitCode::FAILURE; }
    };

    if cli.import {
        let report = workflow.handle(Action::Import);
        print_report(&report);
    }

    interact(&mut workflow);
    ExitCode::SUCCESS
}


fn interact(workflow: &mut Workflow) {
    println!("Employee table editor, working on '{}'", workflow.canonical_path().display());
    println!("type 'help' for the list of commands");
    loop {
        let prompt = if workflow.form().is_some() { "roster (editing)> " } else { "roster> " };
        print!("{prompt}");
        if io::stdout().flush().is_err() { break; }

        let mut input = String::new();
        match io::stdin().read_line(&mut input) {
            // end of input
            Ok(0) => break,
            Ok(_) => {
                let input = input.trim();
                if input.is_empty() { continue; }

                match input {
                    "help" => {
                        if let Err(e) = InteractiveCLI::try_parse_from(vec!["roster", "--help"]) {
                            println!("{e}")
                        }
                        continue;
                    }
                    "quit" | "exit" => { break; }
                    _ => { }
                }

                // assignments are matched on the raw line so values keep their spacing
                if input.starts_with("set ") {
                    if let Some((column, text)) = parse_assignment(input) {
                        dispatch(workflow, Action::EditField { column, text });
                        continue;
                    }
                }

                let args: Vec<&str> = input.split_whitespace().collect();
                let mut full_args = vec!["roster"];
                full_args.extend(args);
                match InteractiveCLI::try_parse_from(full_args) {
                    Ok(cli) => {
                        if handle(cli.command, workflow) { break; }
                    },
                    Err(e) => eprintln!("{e}")
                }

            },
            Err(e) => {
                eprintln!("An error occurred!: {e}"); break;
            },
        }
    }
}


fn handle(cmd: InteractiveCommand, workflow: &mut Workflow) -> bool {

    match cmd {
        InteractiveCommand::Show { from, window } => {
            if workflow.table().number_of_cols() == 0 {
                println!("{}", "the table is empty, try 'import'".yellow());
            } else {
                match show_window(from, window) {
                    Some((first, last)) => println!("{}", workflow.table().as_string(first, last)),
                    None => println!("{}", "a window of 0 rows shows nothing".yellow()),
                }
            }
            false
        },
        InteractiveCommand::Export => { dispatch(workflow, Action::Export); false },
        InteractiveCommand::Import => { dispatch(workflow, Action::Import); false },
        InteractiveCommand::Edit { rows } => { dispatch(workflow, Action::SelectRow(rows)); false },
        InteractiveCommand::Set { assignment } => {
            match parse_assignment(&assignment.join(" ")) {
                Some((column, text)) => dispatch(workflow, Action::EditField { column, text }),
                None => eprintln!("{}", "expected <COLUMN>=<VALUE>".red()),
            }
            false
        },
        InteractiveCommand::Form => {
            match workflow.form() {
                Some(form) => println!("{}", form.as_string()),
                None => println!("{}", "no edit form is open, use 'edit <ROW>'".yellow()),
            }
            false
        },
        InteractiveCommand::Submit => { dispatch(workflow, Action::SubmitEdit); false },
        InteractiveCommand::Cancel => { dispatch(workflow, Action::CancelEdit); false },
        InteractiveCommand::Quit => { println!("Exiting..."); true },
    }
}


/// the inclusive row range `show` prints, `None` when the window is empty
fn show_window(from: usize, window: usize) -> Option<(usize, usize)> {
    let span = window.checked_sub(1)?;
    Some((from, from.saturating_add(span)))
}


fn dispatch(workflow: &mut Workflow, action: Action) {
    let report = workflow.handle(action);
    print_report(&report);

    match report {
        Report::FormOpened { .. } | Report::FieldEdited { .. } => {
            if let Some(form) = workflow.form() { println!("{}", form.as_string()); }
        },
        Report::Imported { .. } | Report::Saved { .. } => {
            println!("{}", workflow.table().as_string(0, usize::MAX));
        },
        _ => { }
    }
}


fn print_report(report: &Report) {
    let text = report.to_string();
    if report.is_failure() {
        eprintln!("{}", text.red());
    } else if report.is_noop() {
        println!("{}", text.yellow());
    } else {
        println!("{}", text.green());
    }
}



#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn assignments_keep_spaces_in_values() {
        assert_eq!(
            parse_assignment("set title=Senior  Engineer"),
            Some(("title".to_string(), "Senior  Engineer".to_string()))
        );
        assert_eq!(parse_assignment("set first name = Ann"), Some(("first name".to_string(), " Ann".to_string())));
        assert_eq!(parse_assignment("set title="), Some(("title".to_string(), String::new())));
        assert_eq!(parse_assignment("set title"), None);
    }

    #[test]
    fn commands_parse_through_clap() {
        let cli = InteractiveCLI::try_parse_from(["roster", "edit", "3"]).unwrap();
        assert!(matches!(cli.command, InteractiveCommand::Edit { rows } if rows == vec![3]));

        let cli = InteractiveCLI::try_parse_from(["roster", "show", "--window", "5"]).unwrap();
        assert!(matches!(cli.command, InteractiveCommand::Show { from: 0, window: 5 }));
    }

    #[test]
    fn rust_log_is_only_overridden_by_verbose_flags() {
        use tracing_subscriber::filter::LevelFilter;

        assert_eq!(log_filter(0, None).max_level_hint(), Some(LevelFilter::WARN));
        assert_eq!(log_filter(0, Some("roster=debug")).max_level_hint(), Some(LevelFilter::DEBUG));
        assert_eq!(log_filter(2, Some("roster=debug")).max_level_hint(), Some(LevelFilter::TRACE));
    }

    #[test]
    fn show_window_is_inclusive_and_may_be_empty() {
        assert_eq!(show_window(0, 25), Some((0, 24)));
        assert_eq!(show_window(3, 1), Some((3, 3)));
        assert_eq!(show_window(3, 0), None);
        assert_eq!(show_window(usize::MAX, 5), Some((usize::MAX, usize::MAX)));
    }
}
