use tracing::info;

use crate::client::config::errors::RoleConfigError;
use crate::client::stats::model::RoleConfig;

/** Reads and validates the role configuration file. Called once at startup. */
pub async fn load_role_config(path: &str) -> Result<RoleConfig, RoleConfigError> {
    let raw = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| RoleConfigError::Unreadable {
            path: path.to_owned(),
            source,
        })?;
    let config = parse_role_config(path, &raw)?;
    info!(
        "Loaded {} class, {} role and {} profession entries from {}",
        config.classes.len(),
        config.roles.len(),
        config.professions.len(),
        path
    );
    Ok(config)
}

fn parse_role_config(path: &str, raw: &str) -> Result<RoleConfig, RoleConfigError> {
    let config: RoleConfig =
        serde_json::from_str(raw).map_err(|source| RoleConfigError::Malformed {
            path: path.to_owned(),
            source,
        })?;

    for (category, entries) in config.categories() {
        if entries.iter().any(|entry| entry.id.trim().is_empty()) {
            return Err(RoleConfigError::EmptyRoleId {
                path: path.to_owned(),
                category: category.heading(),
            });
        }
    }
    Ok(config)
}
