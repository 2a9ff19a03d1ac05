mod resolve;
pub use resolve::{IdError, IdKind, resolve_id};

use std::path::Path;

use regex::Regex;

use crate::cli::commands::*;
use crate::cli::output::*;
use crate::io::config_io;
use crate::io::snapshot_io::JsonFileStore;
use crate::model::config::Config;
use crate::ops::check::{self, CheckError, CheckWarning};
use crate::ops::search;
use crate::ops::tree_ops::Parent;
use crate::store::TreeStore;
use crate::util::dates::format_date;

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

pub fn dispatch(cli: Cli, data_dir: &Path, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let json = cli.json;
    let mut store = open_store(data_dir, config)?;

    match cli.command {
        Commands::Group(cmd) => match cmd.action {
            GroupAction::Add(args) => cmd_group_add(&mut store, args),
            GroupAction::Rename(args) => cmd_group_rename(&mut store, args),
            GroupAction::Rm(args) => cmd_group_rm(&mut store, args),
            GroupAction::Mv(args) => cmd_group_mv(&mut store, args),
        },

        // Write commands
        Commands::Add(args) => cmd_add(&mut store, args),
        Commands::Rm(args) => cmd_rm(&mut store, args),
        Commands::Done(args) => cmd_done(&mut store, args),
        Commands::Hide(args) => cmd_hide(&mut store, args),
        Commands::Mv(args) => cmd_mv(&mut store, args),
        Commands::Open(args) => cmd_set_open(&mut store, args, true),
        Commands::Close(args) => cmd_set_open(&mut store, args, false),
        Commands::Rename(args) => cmd_rename(&mut store, args),

        // Read commands
        Commands::List(args) => cmd_list(&store, config, args, json),
        Commands::Search(args) => cmd_search(&store, args, json),
        Commands::Check => cmd_check(&store, json),
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Load the snapshot from the data dir and wrap it in a store that saves
/// back to the same file.
fn open_store(data_dir: &Path, config: &Config) -> Result<TreeStore, Box<dyn std::error::Error>> {
    let file = JsonFileStore::new(config_io::snapshot_path(data_dir, config));
    let initial = file.load()?;
    Ok(TreeStore::new(initial, file))
}

fn resolve(store: &TreeStore, prefix: &str, kind: IdKind) -> Result<String, IdError> {
    resolve_id(&store.snapshot(), prefix, kind)
}

fn require_name(name: &str) -> Result<(), Box<dyn std::error::Error>> {
    if name.trim().is_empty() {
        return Err("name cannot be empty".into());
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Group handlers
// ---------------------------------------------------------------------------

fn cmd_group_add(store: &mut TreeStore, args: NameArg) -> Result<(), Box<dyn std::error::Error>> {
    require_name(&args.name)?;
    let id = store
        .add_group(&args.name)?
        .ok_or("group was not created")?;
    println!("{}", id);
    Ok(())
}

fn cmd_group_rename(
    store: &mut TreeStore,
    args: RenameArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    require_name(&args.name)?;
    let id = resolve(store, &args.id, IdKind::Group)?;
    store.rename_group(&id, &args.name)?;
    Ok(())
}

fn cmd_group_rm(store: &mut TreeStore, args: IdArg) -> Result<(), Box<dyn std::error::Error>> {
    let id = resolve(store, &args.id, IdKind::Group)?;
    store.delete_group(&id)?;
    println!("deleted {}", id);
    Ok(())
}

fn cmd_group_mv(store: &mut TreeStore, args: GroupMvArgs) -> Result<(), Box<dyn std::error::Error>> {
    let active = resolve(store, &args.active, IdKind::Group)?;
    let over = resolve(store, &args.over, IdKind::Group)?;
    store.reorder_groups(&active, &over)?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Task handlers
// ---------------------------------------------------------------------------

fn cmd_add(store: &mut TreeStore, args: AddArgs) -> Result<(), Box<dyn std::error::Error>> {
    require_name(&args.name)?;
    let group_id = resolve(store, &args.group, IdKind::Group)?;
    let parent_id = match &args.parent {
        Some(prefix) => {
            let id = resolve(store, prefix, IdKind::Task)?;
            let snapshot = store.snapshot();
            let (owner, _) = snapshot
                .find_task(&id)
                .ok_or_else(|| format!("task not found: {}", id))?;
            if owner != group_id {
                return Err(format!("task {} is not in group {}", prefix, args.group).into());
            }
            Some(id)
        }
        None => None,
    };

    let id = store
        .add_task(&group_id, Parent::from_option(parent_id.as_deref()), &args.name)?
        .ok_or("task was not created")?;
    println!("{}", id);
    Ok(())
}

fn cmd_rm(store: &mut TreeStore, args: IdArg) -> Result<(), Box<dyn std::error::Error>> {
    let id = resolve(store, &args.id, IdKind::Task)?;
    store.delete_task(&id)?;
    println!("deleted {}", id);
    Ok(())
}

fn cmd_done(store: &mut TreeStore, args: IdArg) -> Result<(), Box<dyn std::error::Error>> {
    let id = resolve(store, &args.id, IdKind::Task)?;
    store.toggle_completion(&id)?;
    let snapshot = store.snapshot();
    if let Some((_, task)) = snapshot.find_task(&id) {
        let state = if task.completed_date.is_some() { "done" } else { "open" };
        println!("{} {}", id, state);
    }
    Ok(())
}

fn cmd_hide(store: &mut TreeStore, args: IdArg) -> Result<(), Box<dyn std::error::Error>> {
    let id = resolve(store, &args.id, IdKind::Task)?;
    store.hide_task(&id)?;
    let snapshot = store.snapshot();
    if let Some((_, task)) = snapshot.find_task(&id)
        && let Some(until) = task.hidden_until
    {
        println!("{} hidden until {}", id, format_date(until));
    }
    Ok(())
}

fn cmd_mv(store: &mut TreeStore, args: MvArgs) -> Result<(), Box<dyn std::error::Error>> {
    let group_id = resolve(store, &args.group, IdKind::Group)?;
    let active = resolve(store, &args.active, IdKind::Task)?;
    let over = resolve(store, &args.over, IdKind::Task)?;
    let parent_id = match &args.parent {
        Some(prefix) => Some(resolve(store, prefix, IdKind::Task)?),
        None => None,
    };
    store.reorder_tasks(
        &group_id,
        Parent::from_option(parent_id.as_deref()),
        &active,
        &over,
    )?;
    Ok(())
}

fn cmd_set_open(
    store: &mut TreeStore,
    args: IdArg,
    is_open: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let id = resolve(store, &args.id, IdKind::Any)?;
    store.set_open(&id, is_open)?;
    Ok(())
}

fn cmd_rename(store: &mut TreeStore, args: RenameArgs) -> Result<(), Box<dyn std::error::Error>> {
    require_name(&args.name)?;
    let id = resolve(store, &args.id, IdKind::Task)?;
    store.rename_task(&id, &args.name)?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Read handlers
// ---------------------------------------------------------------------------

fn cmd_list(
    store: &TreeStore,
    config: &Config,
    args: ListArgs,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let today = store.today();
    let forest = if args.all || config.view.show_hidden {
        (*store.snapshot()).clone()
    } else {
        store.visible()
    };
    let forest = apply_view(&forest, &config.view, today);

    if json {
        let groups: Vec<GroupJson> = forest
            .groups
            .iter()
            .map(|g| group_to_json(g, today))
            .collect();
        println!("{}", serde_json::to_string_pretty(&groups)?);
    } else if forest.is_empty() {
        println!("no groups yet (try `dl group add <name>`)");
    } else {
        print!("{}", format_forest(&forest, today, args.ids));
    }
    Ok(())
}

fn cmd_search(store: &TreeStore, args: SearchArgs, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let re = Regex::new(&args.pattern)
        .map_err(|e| format!("invalid regex '{}': {}", args.pattern, e))?;
    let hits = search::search_tasks(&store.snapshot(), &re);

    if json {
        let out: Vec<SearchHitJson> = hits.iter().map(hit_to_json).collect();
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        for hit in &hits {
            println!("{}", format_hit(hit));
        }
    }
    Ok(())
}

fn cmd_check(store: &TreeStore, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let result = check::check_forest(&store.snapshot(), store.today());

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    if !result.errors.is_empty() {
        println!("Errors:");
        for err in &result.errors {
            match err {
                CheckError::DuplicateId { id, count } => {
                    println!("  {} is used by {} nodes", id, count);
                }
                CheckError::OrderGap { parent_id, orders } => {
                    println!("  children of {} have orders {:?}", parent_id, orders);
                }
                CheckError::BlankName { id } => {
                    println!("  {} has a blank name", id);
                }
            }
        }
    }
    if !result.warnings.is_empty() {
        if !result.errors.is_empty() {
            println!();
        }
        println!("Warnings:");
        for warn in &result.warnings {
            match warn {
                CheckWarning::FutureCompletion { id, date } => {
                    println!("  {} completed in the future ({})", id, date);
                }
                CheckWarning::LongHide { id, until } => {
                    println!("  {} hidden until {}", id, until);
                }
            }
        }
    }
    if result.valid {
        println!("✓ checklist is valid");
    } else {
        println!("✗ checklist has errors");
    }
    Ok(())
}
