//! Command dispatch: turns parsed arguments into service calls.

use std::io;
use std::path::{Path, PathBuf};

use clap::CommandFactory;
use clap_complete::generate;
use tracing::{debug, info, instrument};

use crate::application::services::{AppliedSelection, SelectionRequest};
use crate::application::ApplicationError;
use crate::cli::args::{Cli, Commands, ConfigCommands, SelectionArgs};
use crate::cli::output;
use crate::cli::{CliError, CliResult};
use crate::config::{global_config_path, local_config_path, Settings};
use crate::domain::Forest;
use crate::infrastructure::di::ServiceContainer;
use crate::infrastructure::InfraError;
use crate::tree_traits::TreeRender;

pub fn execute_command(cli: &Cli) -> CliResult<()> {
    let Some(command) = &cli.command else {
        return Err(CliError::Usage(
            "no command given, see 'labeltree --help'".to_string(),
        ));
    };

    // Completion needs neither config nor forest
    if let Commands::Completion { shell } = command {
        let mut cmd = Cli::command();
        let name = cmd.get_name().to_string();
        generate(*shell, &mut cmd, name, &mut io::stdout());
        return Ok(());
    }

    let project_dir = resolve_project_dir(cli.project_dir.as_deref())?;
    let settings = Settings::load(Some(project_dir.as_path()))?;
    let container = ServiceContainer::new(settings);

    match command {
        Commands::Tags {
            selection,
            write,
            json,
        } => cmd_tags(&container, selection, write.as_deref(), *json),
        Commands::Tree { selection } => cmd_tree(&container, selection),
        Commands::Leaves { forest } => cmd_leaves(&container, forest.as_deref()),
        Commands::Check { forest } => cmd_check(&container, forest.as_deref()),
        Commands::Config { command } => cmd_config(&container, command, &project_dir),
        Commands::Completion { .. } => Ok(()),
    }
}

fn resolve_project_dir(explicit: Option<&Path>) -> CliResult<PathBuf> {
    match explicit {
        Some(dir) => Ok(dir.to_path_buf()),
        None => std::env::current_dir()
            .map_err(|e| InfraError::io("determine current directory", e).into()),
    }
}

fn load_forest(container: &ServiceContainer, explicit: Option<&Path>) -> CliResult<Forest> {
    let path = container.forest_path(explicit)?;
    Ok(container.labels.load_forest(&path)?)
}

/// Build the selection described by the arguments, warning about stale tags.
fn apply_selection<'f>(
    container: &ServiceContainer,
    forest: &'f Forest,
    selection: &SelectionArgs,
) -> CliResult<AppliedSelection<'f>> {
    let policy = container.policy(selection.domain.as_deref())?;

    let mut tags = Vec::new();
    if let Some(path) = &selection.tags_file {
        tags.extend(container.labels.read_tags(path)?);
    }
    tags.extend(selection.tags.iter().cloned());

    let request = SelectionRequest {
        tags,
        toggles: selection.toggles.clone(),
    };
    debug!("apply_selection: policy={}, request={:?}", policy, request);
    let applied = container.labels.apply(forest, policy, &request)?;

    for tag in &applied.unknown_tags {
        output::warning(&format!("unknown tag ignored: {tag}"));
    }
    Ok(applied)
}

#[instrument(level = "debug", skip(container))]
fn cmd_tags(
    container: &ServiceContainer,
    selection: &SelectionArgs,
    write: Option<&Path>,
    json: bool,
) -> CliResult<()> {
    let forest = load_forest(container, selection.forest.as_deref())?;
    let applied = apply_selection(container, &forest, selection)?;
    let tags = applied.manager.get_selected();

    if let Some(path) = write {
        container.labels.write_tags(path, &tags)?;
        info!("wrote {} tags to {}", tags.len(), path.display());
    }

    if json || container.settings.json {
        let rendered =
            serde_json::to_string(&tags).map_err(|e| ApplicationError::OperationFailed {
                context: "serialize tags".to_string(),
                source: Box::new(e),
            })?;
        output::info(&rendered);
    } else {
        for tag in &tags {
            output::info(tag);
        }
    }
    Ok(())
}

#[instrument(level = "debug", skip(container))]
fn cmd_tree(container: &ServiceContainer, selection: &SelectionArgs) -> CliResult<()> {
    let forest = load_forest(container, selection.forest.as_deref())?;
    let applied = apply_selection(container, &forest, selection)?;

    for tree in applied.manager.to_tree_strings() {
        output::info(&tree);
    }
    Ok(())
}

#[instrument(level = "debug", skip(container))]
fn cmd_leaves(container: &ServiceContainer, forest: Option<&Path>) -> CliResult<()> {
    let forest = load_forest(container, forest)?;

    for (id, node) in forest.iter().filter(|(_, node)| node.is_leaf()) {
        let label = node.data.label.as_deref().unwrap_or_default();
        output::info(&format!("{}\t{}", label, forest.path(id).join("/")));
    }
    Ok(())
}

#[instrument(level = "debug", skip(container))]
fn cmd_check(container: &ServiceContainer, forest: Option<&Path>) -> CliResult<()> {
    let path = container.forest_path(forest)?;
    let forest = container.labels.load_forest(&path)?;

    let leaves = forest.iter().filter(|(_, node)| node.is_leaf()).count();
    let labelled_groups = forest
        .iter()
        .filter(|(_, node)| !node.is_leaf() && node.data.label.is_some())
        .count();

    output::success(&format!("{} is a valid forest", path.display()));
    output::detail(&format!("roots:           {}", forest.roots().len()));
    output::detail(&format!("nodes:           {}", forest.len()));
    output::detail(&format!("leaves:          {}", leaves));
    output::detail(&format!("labelled groups: {}", labelled_groups));
    output::detail(&format!("depth:           {}", forest.depth()));
    Ok(())
}

fn cmd_config(
    container: &ServiceContainer,
    command: &ConfigCommands,
    project_dir: &Path,
) -> CliResult<()> {
    match command {
        ConfigCommands::Show => {
            output::info(&container.settings.to_toml()?);
            Ok(())
        }
        ConfigCommands::Template => {
            output::info(&Settings::template());
            Ok(())
        }
        ConfigCommands::Init { global } => {
            let path = if *global {
                global_config_path().ok_or_else(|| {
                    CliError::Usage("cannot determine global config directory".to_string())
                })?
            } else {
                local_config_path(project_dir)
            };

            if container.fs.exists(&path) {
                return Err(CliError::Usage(format!(
                    "config already exists: {}",
                    path.display()
                )));
            }

            container
                .fs
                .ensure_parent(&path)
                .map_err(|e| InfraError::io(format!("create parent of {}", path.display()), e))?;
            container
                .fs
                .write(&path, &Settings::template())
                .map_err(|e| InfraError::io(format!("write {}", path.display()), e))?;
            output::action("Created", &path.display());
            Ok(())
        }
        ConfigCommands::Path => {
            output::header("Config paths");
            match global_config_path() {
                Some(path) => output::detail(&format!(
                    "global: {} {}",
                    path.display(),
                    presence(container, &path)
                )),
                None => output::detail(&"global: (unavailable)"),
            }
            let local = local_config_path(project_dir);
            output::detail(&format!(
                "local:  {} {}",
                local.display(),
                presence(container, &local)
            ));
            Ok(())
        }
    }
}

fn presence(container: &ServiceContainer, path: &Path) -> &'static str {
    if container.fs.exists(path) {
        "(exists)"
    } else {
        "(not found)"
    }
}
