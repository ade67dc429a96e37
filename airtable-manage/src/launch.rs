//! Launch environment preparation: addon identity first, then the `.env`
//! overlay, so overlay entries may override identity values.

use anyhow::{Context, Result};

use airtable_manage_core::config::{load_overlay, LayoutConfig};
use airtable_manage_core::{AddonIdentity, EnvBlock};

pub fn prepare_environment(layout: &LayoutConfig, mut env: EnvBlock) -> Result<EnvBlock> {
    let identity = AddonIdentity::from_package_metadata(&layout.package_metadata())
        .context("Resolve addon identity")?;
    identity.apply(&mut env);
    tracing::debug!(name = %identity.name, version = %identity.version, "Addon identity set");

    if let Some(overlay) = load_overlay(&layout.overlay_file()).context("Load .env overlay")? {
        if overlay.is_empty() {
            tracing::warn!(path = %overlay.path.display(), "Overlay file has no usable entries");
            return Ok(env);
        }
        env.apply_overlay(&overlay);
        tracing::info!(
            path = %overlay.path.display(),
            count = overlay.len(),
            "Loaded environment overlay"
        );
    }
    Ok(env)
}
