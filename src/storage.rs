use crate::errors::AppError;
use crate::models::Preferences;
use std::{env, path::Path, path::PathBuf};
use tokio::fs;
use tracing::error;

pub fn resolve_prefs_path() -> Result<PathBuf, std::io::Error> {
    if let Ok(path) = env::var("APP_PREFS_PATH") {
        return Ok(PathBuf::from(path));
    }

    Ok(PathBuf::from("data/prefs.json"))
}

pub async fn load_prefs(path: &Path) -> Preferences {
    match fs::read(path).await {
        Ok(bytes) => match serde_json::from_slice(&bytes) {
            Ok(prefs) => prefs,
            Err(err) => {
                error!("failed to parse prefs file: {err}");
                Preferences::default()
            }
        },
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => Preferences::default(),
        Err(err) => {
            error!("failed to read prefs file: {err}");
            Preferences::default()
        }
    }
}

pub async fn persist_prefs(path: &Path, prefs: &Preferences) -> Result<(), AppError> {
    let payload = serde_json::to_vec_pretty(prefs).map_err(AppError::internal)?;
    fs::write(path, payload).await.map_err(AppError::internal)?;
    Ok(())
}
