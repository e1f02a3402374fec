use anyhow::Error;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use classe_diag::roster::{read_names, StudentRecord};
use classe_diag::scoring::{
    parse_assignments, Coefficients, DiagnosticType, IntelligenceObservations,
    MotivationObservations, ObservationUpdate, Observations, RythmeObservations,
    SoutienObservations, StyleObservations,
};
use classe_diag::storage::{self, FileStore};
use classe_diag::{output, stderr_buffer, summary};

const EXIT_SUCCESS: i32 = 0;
const EXIT_USAGE: i32 = 1;
const EXIT_STORAGE: i32 = 2;
const EXIT_CONFIG: i32 = 4;

#[derive(Subcommand, Debug)]
enum RosterCommand {
    /// Import the class list from a text file (one name per line)
    Import { file: PathBuf },
    /// Show the imported class list
    Show,
    /// Add a student row to one grid
    Add {
        diagnostic: DiagnosticType,
        name: String,
    },
    /// Rename a student row of one grid
    Rename {
        diagnostic: DiagnosticType,
        /// Student id or exact name
        student: String,
        name: String,
    },
    /// Remove a student row from one grid
    Remove {
        diagnostic: DiagnosticType,
        /// Student id or exact name
        student: String,
    },
}

#[derive(Debug)]
enum RosterEdit {
    Add { name: String },
    Rename { student: String, name: String },
    Remove { student: String },
}

#[derive(Subcommand, Debug)]
enum CoefficientsCommand {
    /// Show current coefficients
    Show { diagnostic: Option<DiagnosticType> },
    /// Override coefficients of one diagnostic, e.g. `seuilRapide=1.8`
    Set {
        diagnostic: DiagnosticType,
        #[arg(required = true)]
        assignments: Vec<String>,
    },
    /// Drop every override and go back to the defaults
    Reset,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Manage the class list
    Roster {
        #[command(subcommand)]
        command: RosterCommand,
    },
    /// Check (or clear) one level of a criterion for a student
    Record {
        diagnostic: DiagnosticType,
        /// Student id or exact name
        student: String,
        /// Criterion key, e.g. frenchReading, visuel, logicoMath
        criterion: String,
        /// Level key, e.g. correct, parfait, fort
        level: String,
        /// Uncheck instead of check (clears the whole criterion)
        #[arg(long)]
        clear: bool,
    },
    /// Set the free-text teacher observation of a student
    Note {
        diagnostic: DiagnosticType,
        student: String,
        text: String,
    },
    /// Show the grid and class summary of one diagnostic
    Results { diagnostic: DiagnosticType },
    /// Show the overview across all diagnostics
    Global,
    /// Inspect or change scoring coefficients
    Coefficients {
        #[command(subcommand)]
        command: CoefficientsCommand,
    },
}

#[derive(Parser, Debug)]
#[command(name = "classe-diag")]
#[command(about = "Classroom diagnostic grids and class summaries", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to config file (defaults to ~/.config/classe-diag/config.yaml)
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

fn fail(code: i32, err: Error) -> ! {
    eprintln!("Error: {:#}", err);
    std::process::exit(code);
}

fn print_warnings() {
    for warning in stderr_buffer::drain() {
        eprintln!("{}", warning);
    }
}

fn record<O: Observations>(
    store: &mut FileStore,
    coefficients: &Coefficients,
    student: &str,
    update: O::Update,
    checked: bool,
) -> StudentRecord<O> {
    let mut roster = storage::working_roster::<O>(store, coefficients);
    let id = match roster.find_named(student) {
        Ok(r) => r.id.clone(),
        Err(e) => fail(EXIT_USAGE, e),
    };
    let updated = match roster.update(&id, update, checked, coefficients) {
        Ok(r) => r.clone(),
        Err(e) => fail(EXIT_USAGE, e),
    };
    if let Err(e) = storage::save_results(store, &roster) {
        fail(EXIT_STORAGE, e);
    }
    updated
}

fn note<O: Observations>(store: &mut FileStore, coefficients: &Coefficients, student: &str, text: &str) {
    let mut roster = storage::working_roster::<O>(store, coefficients);
    let id = match roster.find_named(student) {
        Ok(r) => r.id.clone(),
        Err(e) => fail(EXIT_USAGE, e),
    };
    if let Err(e) = roster.set_note(&id, text) {
        fail(EXIT_USAGE, e);
    }
    if let Err(e) = storage::save_results(store, &roster) {
        fail(EXIT_STORAGE, e);
    }
}

/// Apply a row edit to one grid and save it. Returns the message to print.
fn edit_roster<O: Observations>(store: &mut FileStore, coefficients: &Coefficients, edit: &RosterEdit) -> String {
    let mut roster = storage::working_roster::<O>(store, coefficients);
    let edited = match edit {
        RosterEdit::Add { name } => {
            let id = roster.add_student(name.as_str());
            Ok(format!("Added {} as student {} in {}", name, id, O::KIND.title()))
        }
        RosterEdit::Rename { student, name } => roster
            .rename(student, name.as_str())
            .map(|()| format!("Renamed {} to {} in {}", student, name, O::KIND.title())),
        RosterEdit::Remove { student } => roster
            .remove_student(student)
            .map(|r| format!("Removed {} from {}", r.name, O::KIND.title())),
    };
    let message = match edited {
        Ok(m) => m,
        Err(e) => fail(EXIT_USAGE, e),
    };
    if let Err(e) = storage::save_results(store, &roster) {
        fail(EXIT_STORAGE, e);
    }
    message
}

/// Print the saved grid and its class summary. Returns the saved rows, if any.
fn show_results<O: Observations>(
    store: &FileStore,
    coefficients: &Coefficients,
    use_colors: bool,
) -> Option<Vec<StudentRecord<O>>> {
    let Some(students) = storage::load_results::<O>(store, coefficients) else {
        println!("No saved results for {}.", O::KIND.title());
        return None;
    };

    println!("{}", output::format_student_table(&students, use_colors));
    println!();
    let class = summary::class_summary(&students);
    println!("{}", output::format_class_summary(&class, use_colors));
    Some(students)
}

fn dispatch_edit(
    diagnostic: DiagnosticType,
    store: &mut FileStore,
    coefficients: &Coefficients,
    edit: &RosterEdit,
) -> String {
    match diagnostic {
        DiagnosticType::Rythme => edit_roster::<RythmeObservations>(store, coefficients, edit),
        DiagnosticType::Style => edit_roster::<StyleObservations>(store, coefficients, edit),
        DiagnosticType::Intelligences => {
            edit_roster::<IntelligenceObservations>(store, coefficients, edit)
        }
        DiagnosticType::SoutienFamilial => {
            edit_roster::<SoutienObservations>(store, coefficients, edit)
        }
        DiagnosticType::MotivationParticipation => {
            edit_roster::<MotivationObservations>(store, coefficients, edit)
        }
    }
}

fn main() {
    let cli = Cli::parse();

    // Load config
    let config_path = cli.config.map(PathBuf::from);
    let config = match classe_diag::config::load_config(config_path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Config error: {:#}", e);
            std::process::exit(EXIT_CONFIG);
        }
    };

    let data_dir = match config.data_dir() {
        Ok(d) => d,
        Err(e) => {
            eprintln!("Config error: {:#}", e);
            std::process::exit(EXIT_CONFIG);
        }
    };

    if cli.verbose {
        eprintln!("Data directory: {}", data_dir.display());
    }

    let use_colors = config.colors.unwrap_or_else(output::should_use_colors);
    let mut store = FileStore::new(data_dir);
    let coefficients = storage::load_coefficients(&store);

    match cli.command {
        Commands::Roster { command } => match command {
            RosterCommand::Import { file } => {
                let names = match read_names(&file) {
                    Ok(n) => n,
                    Err(e) => fail(EXIT_USAGE, e),
                };
                if let Err(e) = storage::save_global_students(&mut store, &names) {
                    fail(EXIT_STORAGE, e);
                }
                println!("Imported {} student(s) from {}", names.len(), file.display());
            }
            RosterCommand::Show => {
                let names = storage::load_global_students(&store);
                println!("{}", output::format_class_list(&names, use_colors));
            }
            RosterCommand::Add { diagnostic, name } => {
                let edit = RosterEdit::Add { name };
                println!("{}", dispatch_edit(diagnostic, &mut store, &coefficients, &edit));
            }
            RosterCommand::Rename {
                diagnostic,
                student,
                name,
            } => {
                let edit = RosterEdit::Rename { student, name };
                println!("{}", dispatch_edit(diagnostic, &mut store, &coefficients, &edit));
            }
            RosterCommand::Remove {
                diagnostic,
                student,
            } => {
                let edit = RosterEdit::Remove { student };
                println!("{}", dispatch_edit(diagnostic, &mut store, &coefficients, &edit));
            }
        },
        Commands::Record {
            diagnostic,
            student,
            criterion,
            level,
            clear,
        } => {
            let update = match ObservationUpdate::parse(diagnostic, &criterion, &level) {
                Ok(u) => u,
                Err(e) => fail(EXIT_USAGE, e),
            };
            let checked = !clear;

            if cli.verbose {
                eprintln!("{} {:?} for {}", if checked { "Checking" } else { "Clearing" }, update, student);
            }

            let (name, category) = match update {
                ObservationUpdate::Rythme(u) => {
                    let r = record::<RythmeObservations>(&mut store, &coefficients, &student, u, checked);
                    (r.name, r.category)
                }
                ObservationUpdate::Style(u) => {
                    let r = record::<StyleObservations>(&mut store, &coefficients, &student, u, checked);
                    (r.name, r.category)
                }
                ObservationUpdate::Intelligences(u) => {
                    let r = record::<IntelligenceObservations>(&mut store, &coefficients, &student, u, checked);
                    (r.name, r.category)
                }
                ObservationUpdate::SoutienFamilial(u) => {
                    let r = record::<SoutienObservations>(&mut store, &coefficients, &student, u, checked);
                    (r.name, r.category)
                }
                ObservationUpdate::MotivationParticipation(u) => {
                    let r = record::<MotivationObservations>(&mut store, &coefficients, &student, u, checked);
                    (r.name, r.category)
                }
            };

            if category.is_empty() {
                println!("{}: not enough answers to classify yet", name);
            } else {
                println!("{}: {}", name, category);
            }
        }
        Commands::Note {
            diagnostic,
            student,
            text,
        } => {
            match diagnostic {
                DiagnosticType::SoutienFamilial => {
                    note::<SoutienObservations>(&mut store, &coefficients, &student, &text)
                }
                DiagnosticType::MotivationParticipation => {
                    note::<MotivationObservations>(&mut store, &coefficients, &student, &text)
                }
                other => fail(
                    EXIT_USAGE,
                    anyhow::anyhow!("{} has no teacher observation field", other.title()),
                ),
            }
            println!("Observation saved for {}", student);
        }
        Commands::Results { diagnostic } => {
            stderr_buffer::activate();
            match diagnostic {
                DiagnosticType::Rythme => {
                    if let Some(students) = show_results::<RythmeObservations>(&store, &coefficients, use_colors) {
                        println!();
                        println!("Score global:");
                        println!("{}", output::format_rythme_scores(&students, use_colors));
                    }
                }
                DiagnosticType::Style => {
                    show_results::<StyleObservations>(&store, &coefficients, use_colors);
                }
                DiagnosticType::Intelligences => {
                    show_results::<IntelligenceObservations>(&store, &coefficients, use_colors);
                }
                DiagnosticType::SoutienFamilial => {
                    show_results::<SoutienObservations>(&store, &coefficients, use_colors);
                }
                DiagnosticType::MotivationParticipation => {
                    show_results::<MotivationObservations>(&store, &coefficients, use_colors);
                }
            }
            print_warnings();
        }
        Commands::Global => {
            stderr_buffer::activate();
            let data = storage::load_global_data(&store, &coefficients);
            let overview = summary::cross_diagnostic_summary(&data);
            println!("{}", output::format_global_summary(&overview, use_colors));

            if cli.verbose {
                for (diagnostic, count) in data.record_counts() {
                    match count {
                        Some(n) => eprintln!("  {}: {} saved row(s)", diagnostic.title(), n),
                        None => eprintln!("  {}: never saved", diagnostic.title()),
                    }
                }
            }
            print_warnings();
        }
        Commands::Coefficients { command } => match command {
            CoefficientsCommand::Show { diagnostic } => {
                println!("{}", output::format_coefficients(&coefficients, diagnostic, use_colors));
            }
            CoefficientsCommand::Set {
                diagnostic,
                assignments,
            } => {
                let updates = match parse_assignments(diagnostic, &assignments) {
                    Ok(u) => u,
                    Err(errors) => {
                        eprintln!("Coefficient errors:");
                        for error in errors {
                            eprintln!("  - {}", error);
                        }
                        std::process::exit(EXIT_USAGE);
                    }
                };
                let updated = match storage::set_coefficients(&mut store, diagnostic, &updates) {
                    Ok(c) => c,
                    Err(e) => fail(EXIT_STORAGE, e),
                };
                println!("{}", output::format_coefficients(&updated, Some(diagnostic), use_colors));
            }
            CoefficientsCommand::Reset => {
                if let Err(e) = storage::reset_coefficients(&mut store) {
                    fail(EXIT_STORAGE, e);
                }
                println!("Coefficients reset to defaults.");
            }
        },
    }

    std::process::exit(EXIT_SUCCESS);
}
