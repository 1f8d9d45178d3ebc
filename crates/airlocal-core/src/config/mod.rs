//! Configuration loading and management

mod store;

pub use store::{ConfigStore, Settings, CONFIG_FILE_NAME, KEY_MANAGE_HOSTS, KEY_SITES_PATH, KEY_SNAPSHOTS_PATH};
