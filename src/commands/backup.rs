//! Backup command implementation

use crate::config::Config;
use crate::error::Result;
use crate::store::{backup_path, NewsDb};
use std::path::PathBuf;
use tracing::info;

/// Write an on-demand snapshot of the database into the backup directory
pub async fn cmd_backup(config: &Config, db: &NewsDb, label: Option<&str>) -> Result<PathBuf> {
    let suffix = match label {
        Some(label) => format!("_{}", label.replace(' ', "_")),
        None => String::new(),
    };
    let path = backup_path(&config.backup_dir, &suffix);

    info!("Writing snapshot to {}", path.display());
    db.snapshot_to(&path).await?;
    Ok(path)
}
