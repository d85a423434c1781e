//! Offset table persistence.

use std::fs;
use std::path::Path;

use tracing::{debug, info, warn};

use super::OffsetTable;
use crate::error::Result;

/// Load an offset table from a JSON file.
pub fn load_offsets<P: AsRef<Path>>(path: P) -> Result<OffsetTable> {
    let path = path.as_ref();
    let content = fs::read_to_string(path)?;
    let table: OffsetTable = serde_json::from_str(&content)?;

    debug!(
        "Loaded offsets version={} from {}",
        table.version,
        path.display()
    );
    if !table.is_valid() {
        warn!(
            "Offset table {} is incomplete (version or player base missing)",
            path.display()
        );
    }

    Ok(table)
}

/// Save an offset table as pretty-printed JSON.
pub fn save_offsets<P: AsRef<Path>>(path: P, table: &OffsetTable) -> Result<()> {
    let content = serde_json::to_string_pretty(table)?;
    fs::write(&path, content)?;
    info!("Saved offset table to {}", path.as_ref().display());
    Ok(())
}
