use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "dl", about = concat!("[x] daylist v", env!("CARGO_PKG_VERSION"), " - nested checklists that reset every day"), version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Use a different data directory (default: $DAYLIST_DIR or the platform data dir)
    #[arg(short = 'C', long = "data-dir", global = true)]
    pub data_dir: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Group management
    Group(GroupCmd),
    /// Add a task to a group (or under another task with --parent)
    Add(AddArgs),
    /// Delete a task and all of its subtasks
    Rm(IdArg),
    /// Toggle completion of a task and its subtasks
    Done(IdArg),
    /// Hide a task until tomorrow
    Hide(IdArg),
    /// Move a task to another task's position among its siblings
    Mv(MvArgs),
    /// Expand a group or task
    Open(IdArg),
    /// Collapse a group or task
    Close(IdArg),
    /// Rename a task
    Rename(RenameArgs),
    /// Show today's checklist
    List(ListArgs),
    /// Search task names by regex
    Search(SearchArgs),
    /// Validate the stored tree
    Check,
}

// ---------------------------------------------------------------------------
// Group args
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct GroupCmd {
    #[command(subcommand)]
    pub action: GroupAction,
}

#[derive(Subcommand)]
pub enum GroupAction {
    /// Create a new group
    Add(NameArg),
    /// Rename a group
    Rename(RenameArgs),
    /// Delete a group and all of its tasks
    Rm(IdArg),
    /// Move a group to another group's position
    Mv(GroupMvArgs),
}

#[derive(Args)]
pub struct NameArg {
    /// Display name
    pub name: String,
}

#[derive(Args)]
pub struct GroupMvArgs {
    /// Group to move
    pub active: String,
    /// Group whose position it takes
    pub over: String,
}

// ---------------------------------------------------------------------------
// Task args
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct IdArg {
    /// Id or unique id prefix
    pub id: String,
}

#[derive(Args)]
pub struct AddArgs {
    /// Group to add the task to
    pub group: String,
    /// Task name
    pub name: String,
    /// Add as a subtask of this task
    #[arg(long)]
    pub parent: Option<String>,
}

#[derive(Args)]
pub struct MvArgs {
    /// Group containing the tasks
    pub group: String,
    /// Task to move
    pub active: String,
    /// Task whose position it takes
    pub over: String,
    /// Parent task of both (default: group root)
    #[arg(long)]
    pub parent: Option<String>,
}

#[derive(Args)]
pub struct RenameArgs {
    /// Id or unique id prefix
    pub id: String,
    /// New name
    pub name: String,
}

#[derive(Args)]
pub struct ListArgs {
    /// Include tasks hidden until a later day
    #[arg(long)]
    pub all: bool,
    /// Show full ids instead of short ones
    #[arg(long)]
    pub ids: bool,
}

#[derive(Args)]
pub struct SearchArgs {
    /// Regex pattern to search for
    pub pattern: String,
}
