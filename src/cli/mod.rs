//! Command-line interface for toolbelt
//!
//! This module defines the CLI structure using clap derive macros.
//! Each utility is implemented in its own submodule.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::error::Result;
use crate::output::OutputOptions;
use crate::storage::{Storage, DATA_DIR_ENV};

mod calc;
mod contacts;
mod pass;
mod rps;
mod todo;

/// toolbelt - everyday utilities
///
/// A calculator, rock-paper-scissors, a contact book, a password generator
/// and a to-do list sharing one data directory.
#[derive(Parser, Debug)]
#[command(name = "toolbelt")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Directory holding toolbelt state (defaults to the platform data dir)
    #[arg(long, global = true, env = DATA_DIR_ENV)]
    pub data_dir: Option<PathBuf>,

    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Arithmetic calculator
    #[command(subcommand)]
    Calc(CalcCommands),

    /// Rock-paper-scissors against the computer
    #[command(subcommand)]
    Rps(RpsCommands),

    /// Contact book
    #[command(subcommand)]
    Contacts(ContactsCommands),

    /// Password generator and strength checker
    #[command(subcommand)]
    Pass(PassCommands),

    /// To-do list
    #[command(subcommand)]
    Todo(TodoCommands),
}

/// Calculator subcommands
#[derive(Subcommand, Debug)]
pub enum CalcCommands {
    /// Evaluate an expression (+ - * / ** and parentheses)
    Eval {
        /// Expression to evaluate, e.g. "(1 + 2) * 3"
        #[arg(allow_hyphen_values = true)]
        expression: String,
    },

    /// Replay a sequence of calculator keys
    Keys {
        /// Keys: digits, '.', + - * /, '=', c (clear), s (square), r (sqrt)
        #[arg(allow_hyphen_values = true)]
        sequence: String,
    },
}

/// Rock-paper-scissors subcommands
#[derive(Subcommand, Debug)]
pub enum RpsCommands {
    /// Play one round
    Play {
        /// Your choice: rock, paper, or scissors
        choice: String,

        /// Fix the computer's choice instead of picking at random
        #[arg(long)]
        against: Option<String>,
    },

    /// Show scores, high score, history and statistics
    Score,

    /// Start a new session (the high score is kept)
    Reset,
}

/// Contact book subcommands
#[derive(Subcommand, Debug)]
pub enum ContactsCommands {
    /// Add a contact
    Add {
        name: String,
        phone: String,
        email: String,
        address: String,
    },

    /// List all contacts
    List,

    /// Search by name (case-insensitive) or phone
    Search {
        query: String,
    },

    /// Update the first contact with this exact name
    Update {
        /// Current name of the contact
        name: String,

        /// New name
        #[arg(long = "name")]
        new_name: Option<String>,

        #[arg(long)]
        phone: Option<String>,

        #[arg(long)]
        email: Option<String>,

        #[arg(long)]
        address: Option<String>,
    },

    /// Delete the first contact with this exact name
    Rm {
        name: String,
    },
}

/// Password subcommands
#[derive(Subcommand, Debug)]
pub enum PassCommands {
    /// Generate a password
    Gen {
        /// Password length (8-100; defaults to password.default_length)
        #[arg(short, long, allow_hyphen_values = true)]
        length: Option<String>,

        /// Character classes: upper, lower, digit, symbol (comma-separated)
        #[arg(short, long, value_delimiter = ',')]
        classes: Vec<String>,

        /// Exclude look-alike characters (1 l I 0 O)
        #[arg(long, overrides_with = "no_avoid_similar")]
        avoid_similar: bool,

        /// Keep look-alike characters
        #[arg(long)]
        no_avoid_similar: bool,
    },

    /// Score a password's strength
    Check {
        #[arg(allow_hyphen_values = true)]
        password: String,
    },

    /// Show recently generated passwords
    History {
        /// Number of entries to show (defaults to password.history_display)
        #[arg(short = 'n', long)]
        limit: Option<usize>,

        /// Delete the history
        #[arg(long)]
        clear: bool,
    },
}

/// To-do subcommands
#[derive(Subcommand, Debug)]
pub enum TodoCommands {
    /// Add a task
    Add {
        title: String,

        #[arg(short, long, default_value = "")]
        description: String,

        /// Due date (YYYY-MM-DD)
        #[arg(long, default_value = "")]
        due: String,

        /// Priority: high, medium, low
        #[arg(short, long, default_value = "medium")]
        priority: String,

        #[arg(short, long, default_value = "")]
        category: String,
    },

    /// List tasks
    List {
        /// Only tasks whose title or category contains this text
        #[arg(short, long)]
        filter: Option<String>,
    },

    /// Update a task by position
    Update {
        /// 1-based position from `todo list`
        position: usize,

        #[arg(short, long)]
        title: Option<String>,

        #[arg(short, long)]
        description: Option<String>,

        /// Due date (YYYY-MM-DD, empty to clear)
        #[arg(long)]
        due: Option<String>,

        #[arg(short, long)]
        priority: Option<String>,

        #[arg(short, long)]
        category: Option<String>,
    },

    /// Delete a task by position
    Rm {
        position: usize,
    },

    /// Mark a task done
    Done {
        position: usize,
    },

    /// Mark a task pending again
    Reopen {
        position: usize,
    },
}

impl Cli {
    /// Execute the CLI command
    pub fn run(self) -> Result<()> {
        let storage = Storage::resolve(self.data_dir);
        let output = OutputOptions {
            json: self.json,
            quiet: self.quiet,
        };

        match self.command {
            Commands::Calc(cmd) => match cmd {
                CalcCommands::Eval { expression } => calc::run_eval(calc::EvalOptions {
                    expression,
                    output,
                }),
                CalcCommands::Keys { sequence } => calc::run_keys(calc::KeysOptions {
                    sequence,
                    storage,
                    output,
                }),
            },
            Commands::Rps(cmd) => match cmd {
                RpsCommands::Play { choice, against } => rps::run_play(rps::PlayOptions {
                    choice,
                    against,
                    storage,
                    output,
                }),
                RpsCommands::Score => rps::run_score(rps::ScoreOptions { storage, output }),
                RpsCommands::Reset => rps::run_reset(rps::ResetOptions { storage, output }),
            },
            Commands::Contacts(cmd) => match cmd {
                ContactsCommands::Add {
                    name,
                    phone,
                    email,
                    address,
                } => contacts::run_add(contacts::AddOptions {
                    name,
                    phone,
                    email,
                    address,
                    storage,
                    output,
                }),
                ContactsCommands::List => {
                    contacts::run_list(contacts::ListOptions { storage, output })
                }
                ContactsCommands::Search { query } => {
                    contacts::run_search(contacts::SearchOptions {
                        query,
                        storage,
                        output,
                    })
                }
                ContactsCommands::Update {
                    name,
                    new_name,
                    phone,
                    email,
                    address,
                } => contacts::run_update(contacts::UpdateOptions {
                    name,
                    new_name,
                    phone,
                    email,
                    address,
                    storage,
                    output,
                }),
                ContactsCommands::Rm { name } => contacts::run_rm(contacts::RmOptions {
                    name,
                    storage,
                    output,
                }),
            },
            Commands::Pass(cmd) => match cmd {
                PassCommands::Gen {
                    length,
                    classes,
                    avoid_similar,
                    no_avoid_similar,
                } => pass::run_gen(pass::GenOptions {
                    length,
                    classes,
                    avoid_similar: if no_avoid_similar {
                        Some(false)
                    } else if avoid_similar {
                        Some(true)
                    } else {
                        None
                    },
                    storage,
                    output,
                }),
                PassCommands::Check { password } => {
                    pass::run_check(pass::CheckOptions { password, output })
                }
                PassCommands::History { limit, clear } => {
                    pass::run_history(pass::HistoryOptions {
                        limit,
                        clear,
                        storage,
                        output,
                    })
                }
            },
            Commands::Todo(cmd) => match cmd {
                TodoCommands::Add {
                    title,
                    description,
                    due,
                    priority,
                    category,
                } => todo::run_add(todo::AddOptions {
                    title,
                    description,
                    due,
                    priority,
                    category,
                    storage,
                    output,
                }),
                TodoCommands::List { filter } => todo::run_list(todo::ListOptions {
                    filter,
                    storage,
                    output,
                }),
                TodoCommands::Update {
                    position,
                    title,
                    description,
                    due,
                    priority,
                    category,
                } => todo::run_update(todo::UpdateOptions {
                    position,
                    title,
                    description,
                    due,
                    priority,
                    category,
                    storage,
                    output,
                }),
                TodoCommands::Rm { position } => todo::run_rm(todo::PositionOptions {
                    position,
                    storage,
                    output,
                }),
                TodoCommands::Done { position } => todo::run_done(todo::PositionOptions {
                    position,
                    storage,
                    output,
                }),
                TodoCommands::Reopen { position } => {
                    todo::run_reopen(todo::PositionOptions {
                        position,
                        storage,
                        output,
                    })
                }
            },
        }
    }
}
