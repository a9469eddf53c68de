use crate::export::ExportFormat;
use crate::models::incident::{IncidentKind, UtilityType};
use crate::models::job_status::HoldKind;
use clap::{Args, Parser, Subcommand, ValueEnum};

/// Command-line interface for fence-installation crews
#[derive(Parser)]
#[command(
    name = "fencecrew",
    version = env!("CARGO_PKG_VERSION"),
    about = "Field-operations CLI for fence crews: daily jobs, safety analyses, As-Built documentation and incident reports",
    long_about = None
)]
pub struct Cli {
    /// Override database path (useful for tests or custom DB)
    #[arg(global = true, long = "db")]
    pub db: Option<String>,

    /// Run in test mode (no config file update)
    #[arg(global = true, long = "test", hide = true)]
    pub test: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum Connectivity {
    On,
    Off,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the database and configuration
    Init,

    /// Manage the configuration file (view or edit)
    Config {
        #[arg(long = "print", help = "Print the current configuration")]
        print_config: bool,

        #[arg(
            long = "edit",
            help = "Edit the configuration file (default editor: $EDITOR, or nano/notepad)"
        )]
        edit_config: bool,

        #[arg(long = "editor", help = "Editor to use (vim, nano, or custom path)")]
        editor: Option<String>,
    },

    /// Manage the database (migrations, integrity checks, etc.)
    Db {
        #[arg(long = "migrate", help = "Run pending database migrations")]
        migrate: bool,

        #[arg(long = "check", help = "Check database integrity")]
        check: bool,

        #[arg(long = "vacuum", help = "Optimize the database using VACUUM")]
        vacuum: bool,

        #[arg(long = "info", help = "Show database information")]
        info: bool,
    },

    /// Print the internal audit log
    Log {
        #[arg(long = "print", help = "Print rows from the internal log table")]
        print: bool,
    },

    /// Sign in as the crew foreman
    Login {
        #[arg(long = "user")]
        user: String,

        #[arg(long = "password")]
        password: String,
    },

    /// Sign out and reset the day's schedule
    Logout,

    /// Record the truck for today and stamp it on the schedule
    StartDay {
        #[arg(long = "truck", value_name = "NUMBER")]
        truck: String,
    },

    /// End the working day and reset the schedule
    EndDay,

    /// List today's jobs
    List,

    /// Show one job with its history and next actions
    Show {
        job: String,
    },

    /// Start a job (requires a Pre-JSA)
    Start {
        job: String,
    },

    /// Put an in-progress job on hold
    Hold {
        job: String,

        #[arg(long, value_enum)]
        kind: HoldKind,

        #[arg(long, help = "What is needed")]
        details: String,
    },

    /// Resume a job that is on hold
    Resume {
        job: String,
    },

    /// Fill in the Pre-Job Safety Analysis
    PreJsa(JsaArgs),

    /// Fill in the Post-Job Safety Analysis
    PostJsa(JsaArgs),

    /// Document the finished installation, step by step
    AsBuilt(AsBuiltArgs),

    /// Switch offline mode on or off (off replays queued writes)
    Offline {
        #[arg(value_enum)]
        mode: Connectivity,
    },

    /// File an incident report
    Incident(IncidentArgs),

    /// Personal reminders
    Remind {
        #[arg(long, requires = "date", help = "Reminder text")]
        note: Option<String>,

        #[arg(long, value_name = "YYYY-MM-DD")]
        date: Option<String>,

        #[arg(long, conflicts_with_all = ["note", "remove"])]
        list: bool,

        #[arg(long, value_name = "ID", conflicts_with = "note")]
        remove: Option<u32>,
    },

    /// Simulated turn-by-turn navigation to a job site
    Nav {
        job: String,
    },

    /// Export job data
    Export {
        #[arg(long, value_enum, default_value = "csv")]
        format: ExportFormat,

        #[arg(long, value_name = "FILE")]
        file: String,

        #[arg(long, short = 'f')]
        force: bool,
    },

    /// Create a backup copy of the database
    Backup {
        #[arg(long, value_name = "FILE")]
        file: String,

        #[arg(long)]
        compress: bool,
    },
}

#[derive(Args, Clone, Debug)]
pub struct JsaArgs {
    pub job: String,

    /// Answer a question: `q1=yes`, `q2=no:reason`
    #[arg(long = "set", value_name = "QN=ANSWER")]
    pub set: Vec<String>,

    /// Validate and submit the form
    #[arg(long)]
    pub submit: bool,
}

#[derive(Args, Clone, Debug, Default)]
pub struct AsBuiltArgs {
    pub job: String,

    #[arg(long = "job-name")]
    pub job_name: Option<String>,

    #[arg(long = "address")]
    pub address: Option<String>,

    #[arg(long = "foreman")]
    pub foreman: Option<String>,

    #[arg(long = "crew")]
    pub crew: Option<String>,

    #[arg(long = "clock-in", value_name = "HH:MM")]
    pub clock_in: Option<String>,

    #[arg(long = "clock-out", value_name = "HH:MM")]
    pub clock_out: Option<String>,

    /// Site drawing (any reference, e.g. a file name)
    #[arg(long = "drawing")]
    pub drawing: Option<String>,

    /// Add an installed item: `item:qty[:gateA[:gateB]]`
    #[arg(long = "item", value_name = "SPEC")]
    pub items: Vec<String>,

    #[arg(long = "bay-info")]
    pub bay_info: Option<String>,

    /// Attach a photo: `front=img.jpg`, `extra=img.jpg`
    #[arg(long = "photo", value_name = "SLOT=IMAGE")]
    pub photos: Vec<String>,

    /// Tick a checklist entry
    #[arg(long = "check", value_name = "KEY")]
    pub checks: Vec<String>,

    #[arg(long = "notes")]
    pub notes: Option<String>,

    #[arg(long = "signature")]
    pub signature: Option<String>,

    #[arg(long, conflicts_with_all = ["back", "submit"])]
    pub next: bool,

    #[arg(long, conflicts_with = "submit")]
    pub back: bool,

    #[arg(long)]
    pub submit: bool,
}

#[derive(Args, Clone, Debug)]
pub struct IncidentArgs {
    #[arg(long, value_enum)]
    pub kind: IncidentKind,

    /// Date of the incident (defaults to today)
    #[arg(long, value_name = "YYYY-MM-DD")]
    pub date: Option<String>,

    #[arg(long = "employee")]
    pub employee: Option<String>,

    #[arg(long = "injury")]
    pub injury: Option<String>,

    #[arg(long = "witness")]
    pub witness: Option<String>,

    #[arg(long = "utility", value_enum)]
    pub utilities: Vec<UtilityType>,

    /// Whether the utility was marked (811)
    #[arg(long)]
    pub marked: Option<bool>,

    #[arg(long = "photo")]
    pub photos: Vec<String>,

    #[arg(long, default_value = "")]
    pub description: String,

    #[arg(long)]
    pub signature: Option<String>,
}
