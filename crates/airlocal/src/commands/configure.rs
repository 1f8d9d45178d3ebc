//! Configure command

use airlocal_core::config::{KEY_MANAGE_HOSTS, KEY_SITES_PATH, KEY_SNAPSHOTS_PATH};
use airlocal_core::ConfigStore;
use anyhow::{bail, Context, Result};
use dialoguer::{Confirm, Input};
use serde_json::Value;

use crate::cli::{ConfigureArgs, ConfigureCommands};
use crate::output;

pub fn run(args: ConfigureArgs) -> Result<()> {
    let mut store = ConfigStore::load_default().context("Failed to load configuration")?;

    match args.command {
        None => interactive(&mut store),
        Some(ConfigureCommands::Show) => {
            output::header(&format!("Configuration ({})", store.path()));
            for (key, value) in store.entries() {
                output::kv(&key, &display_value(&value));
            }
            Ok(())
        }
        Some(ConfigureCommands::Get { key }) => match store.get(&key) {
            Some(value) => {
                println!("{}", display_value(value));
                Ok(())
            }
            None => bail!("{} is not set", key),
        },
        Some(ConfigureCommands::Set { key, value }) => {
            let value = parse_value(&value);
            store
                .set(key.clone(), value.clone())
                .with_context(|| format!("Failed to save {}", key))?;
            output::success(&format!("{} = {}", key, display_value(&value)));
            Ok(())
        }
    }
}

fn interactive(store: &mut ConfigStore) -> Result<()> {
    let sites_path: String = Input::new()
        .with_prompt("What directory would you like to create environments within?")
        .default(store.get_string(KEY_SITES_PATH).unwrap_or_default())
        .interact_text()?;

    let snapshots_path: String = Input::new()
        .with_prompt("What directory would you like to store database snapshots in?")
        .default(store.get_string(KEY_SNAPSHOTS_PATH).unwrap_or_default())
        .interact_text()?;

    let manage_hosts = Confirm::new()
        .with_prompt("Would you like the hosts file managed automatically? (requires sudo)")
        .default(store.get_bool(KEY_MANAGE_HOSTS).unwrap_or(true))
        .interact()?;

    store.set(KEY_SITES_PATH, Value::String(sites_path.trim().to_string()))?;
    store.set(
        KEY_SNAPSHOTS_PATH,
        Value::String(snapshots_path.trim().to_string()),
    )?;
    store.set(KEY_MANAGE_HOSTS, Value::Bool(manage_hosts))?;

    let settings = store.settings()?;
    std::fs::create_dir_all(&settings.sites_path)
        .with_context(|| format!("Failed to create {}", settings.sites_path))?;
    std::fs::create_dir_all(&settings.snapshots_path)
        .with_context(|| format!("Failed to create {}", settings.snapshots_path))?;

    output::success(&format!("Configuration saved to {}", store.path()));
    Ok(())
}

/// JSON if it parses, a plain string otherwise
fn parse_value(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}

fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
