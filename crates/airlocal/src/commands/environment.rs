//! start, stop, restart and delete

use airlocal_core::provision::{DeleteReport, EnvironmentManager};
use anyhow::{anyhow, bail, Context, Result};
use camino::Utf8PathBuf;
use dialoguer::{Confirm, Select};

use crate::cli::{DeleteArgs, Target, TargetArgs};
use crate::commands::{collaborators, load_config, require_docker};
use crate::output;

async fn manager() -> Result<EnvironmentManager> {
    let store = load_config()?;
    let settings = store.settings()?;
    let collaborators = collaborators(&store)?;
    require_docker(&collaborators).await?;
    Ok(EnvironmentManager::new(&settings, collaborators))
}

fn current_dir() -> Option<Utf8PathBuf> {
    std::env::current_dir()
        .ok()
        .and_then(|dir| Utf8PathBuf::from_path_buf(dir).ok())
}

/// Resolve the environment to act on
///
/// An explicit argument wins, then the environment containing the current
/// directory, then an interactive choice.
fn resolve_target(
    manager: &EnvironmentManager,
    args: &TargetArgs,
    include_incomplete: bool,
) -> Result<Target> {
    let resolve = |name: &str| {
        if include_incomplete {
            manager.resolve_for_delete(name)
        } else {
            manager.resolve(name)
        }
    };

    match args.target() {
        Some(Target::All) => return Ok(Target::All),
        Some(Target::Named(name)) => return Ok(Target::Named(resolve(&name)?)),
        None => {}
    }

    let registry = manager.registry();
    if let Some(slug) = current_dir().and_then(|dir| registry.env_from_dir(&dir)) {
        return Ok(Target::Named(slug));
    }

    let mut choices = registry.list_environments()?;
    if include_incomplete {
        choices.extend(registry.incomplete()?);
        choices.sort();
    }
    if choices.is_empty() {
        bail!("No environments found in {}", registry.sites_root());
    }

    let selection = Select::new()
        .with_prompt("What environment would you like to use?")
        .items(&choices)
        .default(0)
        .interact()?;

    choices
        .get(selection)
        .map(|slug| Target::Named(slug.clone()))
        .ok_or_else(|| anyhow!("Invalid selection"))
}

pub async fn start(args: TargetArgs) -> Result<()> {
    let manager = manager().await?;
    match resolve_target(&manager, &args, false)? {
        Target::All => {
            let spinner = output::spinner("Starting all environments...");
            let started = manager.start_all().await;
            spinner.finish_and_clear();
            output::success(&format!("Started {} environment(s)", started?.len()));
        }
        Target::Named(slug) => {
            let spinner = output::spinner(&format!("Starting {}...", slug));
            let result = manager.start(&slug).await;
            spinner.finish_and_clear();
            result?;
            output::success(&format!("{} started", slug));
        }
    }
    Ok(())
}

pub async fn stop(args: TargetArgs) -> Result<()> {
    let manager = manager().await?;
    match resolve_target(&manager, &args, false)? {
        Target::All => {
            let spinner = output::spinner("Stopping all environments...");
            let stopped = manager.stop_all().await;
            spinner.finish_and_clear();
            output::success(&format!("Stopped {} environment(s)", stopped?.len()));
        }
        Target::Named(slug) => {
            let spinner = output::spinner(&format!("Stopping {}...", slug));
            let result = manager.stop(&slug).await;
            spinner.finish_and_clear();
            result?;
            output::success(&format!("{} stopped", slug));
        }
    }
    Ok(())
}

pub async fn restart(args: TargetArgs) -> Result<()> {
    let manager = manager().await?;
    match resolve_target(&manager, &args, false)? {
        Target::All => {
            let spinner = output::spinner("Restarting all environments...");
            let restarted = manager.restart_all().await;
            spinner.finish_and_clear();
            output::success(&format!("Restarted {} environment(s)", restarted?.len()));
        }
        Target::Named(slug) => {
            let spinner = output::spinner(&format!("Restarting {}...", slug));
            let result = manager.restart(&slug).await;
            spinner.finish_and_clear();
            result?;
            output::success(&format!("{} restarted", slug));
        }
    }
    Ok(())
}

fn print_delete_report(report: &DeleteReport) {
    for warning in &report.warnings {
        output::warning(warning);
    }
    output::success(&format!("Deleted {}", report.slug));
    if !report.removed_hosts.is_empty() {
        output::kv("Hosts removed", &report.removed_hosts.join(", "));
    }
}

pub async fn delete(args: DeleteArgs) -> Result<()> {
    let manager = manager().await?;
    let target = resolve_target(&manager, &args.target, true)?;

    let prompt = match &target {
        Target::All => "Are you sure you want to delete ALL environments?".to_string(),
        Target::Named(slug) => format!("Are you sure you want to delete the {} environment?", slug),
    };
    if !args.yes && !Confirm::new().with_prompt(prompt).default(false).interact()? {
        output::info("Cancelled");
        return Ok(());
    }

    match target {
        Target::All => {
            let reports = manager
                .delete_all()
                .await
                .context("Failed to delete environments")?;
            for report in &reports {
                print_delete_report(report);
            }
        }
        Target::Named(slug) => {
            let report = manager.delete(&slug).await?;
            print_delete_report(&report);
        }
    }
    Ok(())
}
