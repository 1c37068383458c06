//! Atomic profile file output.

use std::io::Write;
use std::path::Path;

use tempfile::NamedTempFile;
use tracing::info;

use super::builder::ProfileBuilder;
use crate::error::Result;
use crate::models::ColorProfile;

/// Write encoded profile bytes to disk atomically.
///
/// The bytes go to a temporary file in the target's directory, which is then
/// renamed over `target_path`. An interrupted write never leaves a partial file.
pub fn write_profile(bytes: &[u8], target_path: &Path) -> Result<()> {
    let parent = match target_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(parent)?;

    let mut temp = NamedTempFile::new_in(parent)?;
    temp.write_all(bytes)?;
    temp.flush()?;
    temp.persist(target_path).map_err(|err| err.error)?;

    info!(bytes = bytes.len(), "Wrote ICC profile to {:?}", target_path);
    Ok(())
}

/// Serialize `profile` with `builder`'s settings and write it to `target_path`
pub fn save_profile(builder: &ProfileBuilder, profile: &ColorProfile, target_path: &Path) -> Result<()> {
    let bytes = builder.serialize(profile)?;
    write_profile(&bytes, target_path)
}
