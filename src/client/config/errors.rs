use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    /// Required environment variable is not set. See `.env.example`.
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Environment variable {key} is not a valid id: {value}")]
    InvalidId { key: String, value: String },
}

#[derive(Error, Debug)]
pub enum RoleConfigError {
    #[error("Roles file {path} could not be read (see roles.example.json): {source}")]
    Unreadable {
        path: String,
        source: std::io::Error,
    },

    #[error("Failed to parse roles file {path}: {source}")]
    Malformed {
        path: String,
        source: serde_json::Error,
    },

    #[error("Roles file {path} has an entry with an empty id in {category}")]
    EmptyRoleId { path: String, category: &'static str },
}
