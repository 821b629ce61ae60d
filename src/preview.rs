use std::fs;
use std::path::Path;

use anyhow::Context;
use askama::Template;
use neural_field::FieldConfig;

use crate::snapshot::BACKGROUND;

/// JS glue emitted by `wasm-pack build --target web` for neural-field-web
pub const WASM_MODULE: &str = "neural_field_web.js";
/// The matching wasm binary
pub const WASM_BINARY: &str = "neural_field_web_bg.wasm";

#[derive(Template)]
#[template(path = "index.html")]
struct PreviewTemplate<'a> {
    title: &'a str,
    background: &'a str,
    module: &'a str,
    config_json: &'a str,
    particle_count: usize,
    connection_distance: f64,
}

/// Write `index.html` (and the wasm package, when given) into `output`
pub fn write_preview(
    config: &FieldConfig,
    title: &str,
    output: &Path,
    pkg: Option<&Path>,
) -> anyhow::Result<()> {
    fs::create_dir_all(output)?;

    let config_json = serde_json::to_string(config)?;
    let html = PreviewTemplate {
        title,
        background: BACKGROUND,
        module: WASM_MODULE,
        config_json: &config_json,
        particle_count: config.particle_count,
        connection_distance: config.connection_distance,
    }
    .render()?;
    fs::write(output.join("index.html"), html)?;

    if let Some(pkg) = pkg {
        for name in [WASM_MODULE, WASM_BINARY] {
            let source = pkg.join(name);
            fs::copy(&source, output.join(name))
                .with_context(|| format!("Failed to copy {}", source.display()))?;
        }
        tracing::debug!(pkg = %pkg.display(), "Copied wasm package");
    } else if !output.join(WASM_MODULE).exists() {
        tracing::warn!(
            "{} not found in {}; build neural-field-web with wasm-pack and pass --pkg",
            WASM_MODULE,
            output.display()
        );
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn writes_index_with_embedded_config() {
        let dir = tempdir().unwrap();
        let config = FieldConfig {
            particle_count: 42,
            ..Default::default()
        };

        write_preview(&config, "My Site", dir.path(), None).unwrap();

        let html = fs::read_to_string(dir.path().join("index.html")).unwrap();
        assert!(html.contains("<title>My Site</title>"));
        assert!(html.contains("\"particle_count\":42"));
        assert!(html.contains("from \"./neural_field_web.js\""));
        assert!(html.contains("NeuralBackground.fullscreen"));
    }

    #[test]
    fn copies_wasm_package() {
        let pkg = tempdir().unwrap();
        fs::write(pkg.path().join(WASM_MODULE), "export default 1;").unwrap();
        fs::write(pkg.path().join(WASM_BINARY), [0u8, 97, 115, 109]).unwrap();
        let out = tempdir().unwrap();

        write_preview(&FieldConfig::default(), "t", out.path(), Some(pkg.path())).unwrap();

        assert!(out.path().join(WASM_MODULE).exists());
        assert_eq!(
            fs::read(out.path().join(WASM_BINARY)).unwrap(),
            vec![0u8, 97, 115, 109]
        );
    }

    #[test]
    fn missing_package_files_are_an_error() {
        let pkg = tempdir().unwrap();
        let out = tempdir().unwrap();

        let err = write_preview(&FieldConfig::default(), "t", out.path(), Some(pkg.path()))
            .unwrap_err();
        assert!(err.to_string().contains("Failed to copy"));
    }
}
