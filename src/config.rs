//! Optional `gridsheet.toml` settings.

use directories::ProjectDirs;
use gridsheet_core::DocumentConfig;
use gridsheet_engine::engine::TextAlign;
use serde::Deserialize;
use std::path::{Path, PathBuf};

const MAX_CONFIG_FILE_BYTES: u64 = 1_048_576; // 1 MiB

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    sheet: Option<SheetSection>,
    toolbar: Option<ToolbarSection>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct SheetSection {
    rows: Option<usize>,
    cols: Option<usize>,
    history_limit: Option<usize>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ToolbarSection {
    bold: Option<bool>,
    italic: Option<bool>,
    font_size: Option<u32>,
    color: Option<String>,
    background_color: Option<String>,
    text_align: Option<TextAlign>,
}

/// Load the document settings. Problems are returned as warnings and the
/// defaults are used in their place.
pub fn load_config(config_file: Option<&PathBuf>) -> (DocumentConfig, Vec<String>) {
    let mut warnings: Vec<String> = Vec::new();
    let config_path = config_file.cloned().or_else(user_config_path);

    let file = match config_path.as_ref() {
        Some(path) if path.exists() => read_config_file(path, &mut warnings),
        Some(path) if config_file.is_some() => {
            warnings.push(format!("Config file not found: {}", path.display()));
            None
        }
        _ => None,
    };

    let config = apply(file.unwrap_or_default(), &mut warnings);
    (config, warnings)
}

fn user_config_path() -> Option<PathBuf> {
    let proj = ProjectDirs::from("", "", "gridsheet")?;
    let mut path = proj.config_dir().to_path_buf();
    path.push("gridsheet.toml");
    Some(path)
}

fn read_config_file(path: &Path, warnings: &mut Vec<String>) -> Option<ConfigFile> {
    match std::fs::metadata(path) {
        Ok(meta) if meta.len() > MAX_CONFIG_FILE_BYTES => {
            warnings.push(format!(
                "Refusing to read {}: file too large ({} bytes, max {})",
                path.display(),
                meta.len(),
                MAX_CONFIG_FILE_BYTES
            ));
            None
        }
        Ok(_) => match std::fs::read_to_string(path) {
            Ok(content) => match parse_config(&content) {
                Ok(parsed) => Some(parsed),
                Err(err) => {
                    warnings.push(format!("Failed to parse {}: {}", path.display(), err));
                    None
                }
            },
            Err(err) => {
                warnings.push(format!("Failed to read {}: {}", path.display(), err));
                None
            }
        },
        Err(err) => {
            warnings.push(format!(
                "Failed to read metadata for {}: {}",
                path.display(),
                err
            ));
            None
        }
    }
}

fn parse_config(content: &str) -> Result<ConfigFile, toml::de::Error> {
    toml::from_str::<ConfigFile>(content)
}

fn apply(file: ConfigFile, warnings: &mut Vec<String>) -> DocumentConfig {
    let mut config = DocumentConfig::default();

    if let Some(sheet) = file.sheet {
        config.rows = sheet.rows.unwrap_or(config.rows);
        config.cols = sheet.cols.unwrap_or(config.cols);
        if let Some(limit) = sheet.history_limit {
            if limit < 2 {
                warnings.push(format!("history_limit {} is too small; using 2", limit));
            }
            config.history_limit = limit.max(2);
        }
    }

    if let Some(toolbar) = file.toolbar {
        let style = &mut config.toolbar;
        style.bold = toolbar.bold.unwrap_or(style.bold);
        style.italic = toolbar.italic.unwrap_or(style.italic);
        style.font_size = toolbar.font_size.unwrap_or(style.font_size);
        if let Some(color) = toolbar.color {
            style.color = color;
        }
        if let Some(background_color) = toolbar.background_color {
            style.background_color = background_color;
        }
        style.text_align = toolbar.text_align.unwrap_or(style.text_align);
    }

    config
}
