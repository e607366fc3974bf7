use std::path::Path;

use scmap_dds::{container, DdsError, PixelFormat};
use scmap_format::{Map, MapArgs, MapError};

use crate::report;

#[derive(Debug, thiserror::Error)]
pub enum ToolError {
    #[error("{path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Map(#[from] MapError),

    #[error(transparent)]
    Dds(#[from] DdsError),

    #[error("roundtrip mismatch in sections: {}", .0.join(", "))]
    RoundtripMismatch(Vec<&'static str>),

    #[error("saved {saved} bytes but the original file has {original}")]
    SizeMismatch { original: usize, saved: usize },
}

fn read(path: &Path) -> Result<Vec<u8>, ToolError> {
    std::fs::read(path).map_err(|source| ToolError::Io {
        path: path.display().to_string(),
        source,
    })
}

fn write(path: &Path, bytes: &[u8]) -> Result<(), ToolError> {
    std::fs::write(path, bytes).map_err(|source| ToolError::Io {
        path: path.display().to_string(),
        source,
    })
}

pub fn load_map(path: &Path) -> Result<Map, ToolError> {
    let bytes = read(path)?;
    log::info!("Loading {} ({} bytes)", path.display(), bytes.len());
    Ok(Map::load(&bytes)?)
}

/// Print a markdown summary and optionally save it as JSON.
pub fn info(map_path: &Path, json_path: Option<&Path>) -> Result<(), ToolError> {
    let map = load_map(map_path)?;
    let summary = report::summarize(&map);

    println!("\n## {}\n", map_path.display());
    println!("{}", report::format_markdown(&summary));

    if let Some(path) = json_path {
        report::save_report(path, &summary).map_err(|source| ToolError::Io {
            path: path.display().to_string(),
            source,
        })?;
        log::info!("Saved report to {}", path.display());
    }
    Ok(())
}

/// Build a blank map from RON map args.
pub fn create(args_path: &Path, out_path: &Path) -> Result<(), ToolError> {
    let ron_str = String::from_utf8_lossy(&read(args_path)?).into_owned();
    let args = MapArgs::from_ron(&ron_str)?;
    let map = Map::create(&args)?;
    write(out_path, &map.save()?)?;
    log::info!("Wrote {} to {}", args.name, out_path.display());
    Ok(())
}

/// Load, save and reload a map, failing if anything changed.
pub fn roundtrip(map_path: &Path) -> Result<(), ToolError> {
    let original_bytes = read(map_path)?;
    let original = Map::load(&original_bytes)?;
    let saved = original.save()?;
    let reloaded = Map::load(&saved)?;

    let (lossy, exact): (Vec<_>, Vec<_>) = report::section_diffs(&original, &reloaded)
        .into_iter()
        .partition(|name| report::LOSSY_SECTIONS.contains(name));
    if !exact.is_empty() {
        return Err(ToolError::RoundtripMismatch(exact));
    }
    for name in lossy {
        log::warn!("{name} changed after DXT5 re-encoding");
    }
    if saved.len() != original_bytes.len() {
        return Err(ToolError::SizeMismatch {
            original: original_bytes.len(),
            saved: saved.len(),
        });
    }
    log::info!("Roundtrip OK: {} bytes", saved.len());
    Ok(())
}

/// Extract the preview thumbnail as a standalone DDS file.
pub fn preview(map_path: &Path, out_path: &Path) -> Result<(), ToolError> {
    let map = load_map(map_path)?;
    let bytes = container::save(map.preview.image(), PixelFormat::Argb8888)?;
    write(out_path, &bytes)?;
    log::info!("Saved preview to {}", out_path.display());
    Ok(())
}
