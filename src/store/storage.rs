use anyhow::{Context, Result};
use atomic_write_file::AtomicWriteFile;
use std::fs::File;
use std::path::Path;

use super::state::JudgingState;

/// Load judging state from a JSON file
///
/// If the file doesn't exist, returns a new empty state.
/// If the file exists but has an unsupported version, returns an error.
pub fn load_state(path: &Path) -> Result<JudgingState> {
    if !path.exists() {
        return Ok(JudgingState::new());
    }

    let file = File::open(path)
        .with_context(|| format!("Failed to open state file at {}", path.display()))?;

    let state: JudgingState =
        serde_json::from_reader(file).context("Failed to load judging state")?;

    // Version check
    if state.version != 1 {
        anyhow::bail!("Unsupported state file version: {}", state.version);
    }

    Ok(state)
}

/// Save judging state to a JSON file atomically
///
/// Uses atomic-write-file so a crash mid-write never leaves a corrupted
/// or half-written state file behind.
pub fn save_state(path: &Path, state: &JudgingState) -> Result<()> {
    let mut file = AtomicWriteFile::open(path)
        .with_context(|| format!("Failed to open atomic write file at {}", path.display()))?;

    serde_json::to_writer_pretty(&mut file, state).context("Failed to serialize judging state")?;

    file.commit().context("Failed to save judging state")?;

    Ok(())
}
