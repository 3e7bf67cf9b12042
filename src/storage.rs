use crate::errors::AppError;
use crate::models::GymData;
use std::{env, path::Path, path::PathBuf};
use tokio::fs;
use tracing::error;

pub fn resolve_data_path() -> Result<PathBuf, std::io::Error> {
    if let Ok(path) = env::var("GYM_DATA_PATH") {
        return Ok(PathBuf::from(path));
    }

    Ok(PathBuf::from("data/gym.json"))
}

pub async fn load_data(path: &Path) -> GymData {
    match fs::read(path).await {
        Ok(bytes) => match serde_json::from_slice(&bytes) {
            Ok(data) => data,
            Err(err) => {
                error!("failed to parse gym data file: {err}");
                GymData::default()
            }
        },
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => GymData::default(),
        Err(err) => {
            error!("failed to read gym data file: {err}");
            GymData::default()
        }
    }
}

pub async fn persist_data(path: &Path, data: &GymData) -> Result<(), AppError> {
    let payload = serde_json::to_vec_pretty(data).map_err(AppError::internal)?;
    fs::write(path, payload).await.map_err(AppError::internal)?;
    Ok(())
}
