use clap::{Args, Parser, Subcommand, ValueEnum};
use projecthub::domain::models::{BillingType, WorkItemKind, WorkItemStatus};
use rust_decimal::Decimal;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "projecthub")]
#[command(about = "Track clients, contractors, and what each project is worth")]
pub struct Cli {
    /// Data directory, overriding the config file and PROJECTHUB_DATA_DIR
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Start a session as USERNAME
    Login { username: String },
    /// End the current session
    Logout,
    /// Print the logged-in user
    Whoami,
    /// Manage clients
    Client {
        #[command(subcommand)]
        command: ClientCommand,
    },
    /// Manage contractors
    Contractor {
        #[command(subcommand)]
        command: ContractorCommand,
    },
    /// Manage the skill catalog
    Skill {
        #[command(subcommand)]
        command: SkillCommand,
    },
    /// Manage projects
    Project {
        #[command(subcommand)]
        command: WorkItemCommand,
    },
    /// Manage tasks
    Task {
        #[command(subcommand)]
        command: WorkItemCommand,
    },
    /// Manage the checklist of a task
    Subtask {
        #[command(subcommand)]
        command: SubTaskCommand,
    },
    /// Show items grouped by status with per-column totals
    Board {
        #[arg(value_enum, default_value_t = BoardTarget::Projects)]
        target: BoardTarget,
    },
    /// Print config path and create default file if missing
    ConfigPath,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum BoardTarget {
    Projects,
    Tasks,
}

impl BoardTarget {
    pub fn kind(self) -> WorkItemKind {
        match self {
            Self::Projects => WorkItemKind::Project,
            Self::Tasks => WorkItemKind::Task,
        }
    }
}

#[derive(Debug, Args)]
pub struct ClientArgs {
    #[arg(long)]
    pub first_name: String,
    #[arg(long)]
    pub last_name: String,
    #[arg(long)]
    pub company: String,
    #[arg(long)]
    pub email: String,
    #[arg(long)]
    pub phone: String,
}

/// Fields left out keep their current value.
#[derive(Debug, Args)]
pub struct ClientEditArgs {
    #[arg(long)]
    pub first_name: Option<String>,
    #[arg(long)]
    pub last_name: Option<String>,
    #[arg(long)]
    pub company: Option<String>,
    #[arg(long)]
    pub email: Option<String>,
    #[arg(long)]
    pub phone: Option<String>,
}

#[derive(Debug, Subcommand)]
pub enum ClientCommand {
    Add(ClientArgs),
    List,
    Show {
        id: String,
    },
    Edit {
        id: String,
        #[command(flatten)]
        fields: ClientEditArgs,
    },
    Delete {
        id: String,
    },
}

#[derive(Debug, Args)]
pub struct ContractorArgs {
    #[arg(long)]
    pub name: String,
    #[arg(long)]
    pub email: String,
    /// Repeat for several skills
    #[arg(long = "skill", required = true)]
    pub skills: Vec<String>,
    /// Hourly rate, e.g. "75" or "$75/hr"
    #[arg(long)]
    pub rate: String,
    /// Three-letter currency code of the rate
    #[arg(long)]
    pub currency: Option<String>,
}

/// Fields left out keep their current value. `--skill` replaces the whole list.
#[derive(Debug, Args)]
pub struct ContractorEditArgs {
    #[arg(long)]
    pub name: Option<String>,
    #[arg(long)]
    pub email: Option<String>,
    #[arg(long = "skill")]
    pub skills: Vec<String>,
    #[arg(long)]
    pub rate: Option<String>,
    #[arg(long)]
    pub currency: Option<String>,
}

#[derive(Debug, Subcommand)]
pub enum ContractorCommand {
    Add(ContractorArgs),
    List,
    Show {
        id: String,
    },
    Edit {
        id: String,
        #[command(flatten)]
        fields: ContractorEditArgs,
    },
    Delete {
        id: String,
    },
}

#[derive(Debug, Subcommand)]
pub enum SkillCommand {
    Add { skill: String },
    List,
    Remove { skill: String },
}

#[derive(Debug, Args)]
pub struct WorkItemArgs {
    #[arg(long)]
    pub name: String,
    /// Client id
    #[arg(long)]
    pub client: String,
    /// Declared value, e.g. "15000" or "15,000.00"
    #[arg(long)]
    pub value: String,
    /// Planning, "In Progress" or Completed
    #[arg(long)]
    pub status: Option<WorkItemStatus>,
    #[arg(long)]
    pub description: Option<String>,
    /// Parent task id (tasks only)
    #[arg(long)]
    pub parent: Option<String>,
}

/// Fields left out keep their current value.
#[derive(Debug, Args)]
pub struct WorkItemEditArgs {
    #[arg(long)]
    pub name: Option<String>,
    #[arg(long)]
    pub client: Option<String>,
    #[arg(long)]
    pub value: Option<String>,
    #[arg(long)]
    pub status: Option<WorkItemStatus>,
    #[arg(long)]
    pub description: Option<String>,
    #[arg(long, conflicts_with = "no_parent")]
    pub parent: Option<String>,
    /// Detach from the parent task
    #[arg(long)]
    pub no_parent: bool,
}

#[derive(Debug, Subcommand)]
pub enum WorkItemCommand {
    New(WorkItemArgs),
    List,
    Show {
        id: String,
    },
    Edit {
        id: String,
        #[command(flatten)]
        fields: WorkItemEditArgs,
    },
    Delete {
        id: String,
    },
    /// Move to another board column
    Move {
        id: String,
        status: WorkItemStatus,
    },
    /// Assign a contractor (hourly, 0 hours)
    Assign {
        id: String,
        contractor: String,
    },
    Unassign {
        id: String,
        contractor: String,
    },
    /// Set hours worked; assigns the contractor if needed
    Hours {
        id: String,
        contractor: String,
        hours: Decimal,
    },
    /// Switch between hourly and fixed billing
    Billing {
        id: String,
        contractor: String,
        billing_type: BillingType,
    },
    /// Set the fixed amount
    Fixed {
        id: String,
        contractor: String,
        amount: Decimal,
    },
}

#[derive(Debug, Subcommand)]
pub enum SubTaskCommand {
    Add {
        task: String,
        name: String,
        #[arg(long)]
        description: Option<String>,
        /// Contractor id to assign
        #[arg(long)]
        contractor: Option<String>,
    },
    List {
        task: String,
    },
    Edit {
        task: String,
        sub_task: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long, conflicts_with = "unassign")]
        contractor: Option<String>,
        /// Remove the assigned contractor
        #[arg(long)]
        unassign: bool,
    },
    Toggle {
        task: String,
        sub_task: String,
    },
    Remove {
        task: String,
        sub_task: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use rust_decimal_macros::dec;

    #[test]
    fn command_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_status_and_billing_names() {
        let cli = Cli::parse_from(["projecthub", "task", "move", "t1", "In Progress"]);
        assert!(matches!(
            cli.command,
            Commands::Task {
                command: WorkItemCommand::Move {
                    status: WorkItemStatus::InProgress,
                    ..
                }
            }
        ));

        let cli = Cli::parse_from(["projecthub", "project", "billing", "p1", "k1", "fixed"]);
        assert!(matches!(
            cli.command,
            Commands::Project {
                command: WorkItemCommand::Billing {
                    billing_type: BillingType::Fixed,
                    ..
                }
            }
        ));
    }

    #[test]
    fn parses_decimal_hours() {
        let cli = Cli::parse_from(["projecthub", "project", "hours", "p1", "k1", "2.5"]);
        match cli.command {
            Commands::Project {
                command: WorkItemCommand::Hours { hours, .. },
            } => assert_eq!(hours, dec!(2.5)),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn board_defaults_to_projects() {
        let cli = Cli::parse_from(["projecthub", "board"]);
        assert!(matches!(
            cli.command,
            Commands::Board {
                target: BoardTarget::Projects
            }
        ));
    }

    #[test]
    fn contractor_needs_a_skill() {
        let parsed = Cli::try_parse_from([
            "projecthub",
            "contractor",
            "add",
            "--name",
            "Kim",
            "--email",
            "kim@example.com",
            "--rate",
            "75",
        ]);
        assert!(parsed.is_err());
    }
}
