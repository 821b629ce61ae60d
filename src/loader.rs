use std::fs;
use std::path::Path;

use anyhow::Context;
use neural_field::FieldConfig;

/// Load a field configuration, falling back to the defaults when no file is
/// given. The format is picked from the extension.
pub fn load_config(path: Option<&Path>) -> anyhow::Result<FieldConfig> {
    let Some(path) = path else {
        tracing::debug!("No config file given, using defaults");
        return Ok(FieldConfig::default());
    };

    let source = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config {}", path.display()))?;

    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);

    let config = match extension.as_deref() {
        Some("json") => FieldConfig::from_json(&source)?,
        Some("yaml" | "yml") => {
            let config: FieldConfig = serde_yaml::from_str(&source)
                .with_context(|| format!("Failed to parse {}", path.display()))?;
            config.validate()?;
            config
        }
        _ => anyhow::bail!(
            "Unsupported config format for {} (expected .json, .yaml or .yml)",
            path.display()
        ),
    };

    tracing::debug!(path = %path.display(), ?config, "Loaded config");
    Ok(config)
}
