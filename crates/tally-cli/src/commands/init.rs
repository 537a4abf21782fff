//! Init command for creating the storage document.

use std::path::Path;

use anyhow::{Context, Result};
use tally_store::Store;

/// Runs the init command.
pub fn run(path: &Path) -> Result<()> {
    let created = Store::init(path)
        .with_context(|| format!("failed to initialize {}", path.display()))?;

    if created {
        println!("Created:  {}", path.display());
    } else {
        println!("Exists:   {}", path.display());
    }

    Ok(())
}
