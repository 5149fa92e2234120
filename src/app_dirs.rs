use directories::ProjectDirs;
use std::path::PathBuf;

/// Centralized application directory resolution
pub struct AppDirs;

impl AppDirs {
    fn project() -> Option<ProjectDirs> {
        ProjectDirs::from("", "", "keydrill")
    }

    /// SQLite store under `$HOME/.local/state/keydrill`, or the platform data dir.
    pub fn db_path() -> Option<PathBuf> {
        if let Ok(home) = std::env::var("HOME") {
            let state_dir = PathBuf::from(home)
                .join(".local")
                .join("state")
                .join("keydrill");
            Some(state_dir.join("keydrill.db"))
        } else {
            Self::project().map(|proj_dirs| proj_dirs.data_local_dir().join("keydrill.db"))
        }
    }

    pub fn config_path() -> Option<PathBuf> {
        Self::project().map(|proj_dirs| proj_dirs.config_dir().join("config.json"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paths_named_for_app() {
        if let Some(path) = AppDirs::db_path() {
            assert!(path.ends_with("keydrill.db"));
        }
        if let Some(path) = AppDirs::config_path() {
            assert!(path.ends_with("config.json"));
        }
    }
}
