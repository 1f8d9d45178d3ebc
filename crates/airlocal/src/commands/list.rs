//! List command

use airlocal_core::EnvironmentRegistry;
use anyhow::Result;
use tabled::{settings::Style, Table, Tabled};

use crate::commands::load_config;
use crate::output;

#[derive(Tabled)]
struct EnvironmentRow {
    environment: String,
    hosts: String,
    path: String,
}

fn rows(registry: &EnvironmentRegistry) -> Result<Vec<EnvironmentRow>> {
    Ok(registry
        .list_environments()?
        .into_iter()
        .map(|slug| EnvironmentRow {
            hosts: registry.hosts_for(&slug).join(", "),
            path: registry.path_for(&slug).to_string(),
            environment: slug,
        })
        .collect())
}

pub fn run() -> Result<()> {
    let store = load_config()?;
    let registry = EnvironmentRegistry::new(store.settings()?.sites_path);

    let environments = rows(&registry)?;
    if environments.is_empty() {
        output::info(&format!("No environments in {}", registry.sites_root()));
    } else {
        let mut table = Table::new(environments);
        table.with(Style::sharp());
        println!("{}", table);
    }

    let incomplete = registry.incomplete()?;
    if !incomplete.is_empty() {
        output::warning(&format!(
            "Incomplete environments (remove with `airlocal delete <name>`): {}",
            incomplete.join(", ")
        ));
    }

    Ok(())
}
