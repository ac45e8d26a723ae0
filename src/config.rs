// src/config.rs

//! Defines the configuration structures for the `bitfont-extract` tool.
//!
//! The configuration is a JSON document. Every struct carries
//! `#[serde(default)]`, so a file only needs to name the settings it changes;
//! everything else keeps the built-in defaults below.

use std::fs;
use std::path::{Path, PathBuf};

use log::{info, warn};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::color::Rgba;
use crate::error::{FontError, Result};
use crate::keys::{KeySymbol, Modifiers};

/// Environment variable naming the configuration file.
pub const CONFIG_ENV_VAR: &str = "BITFONT_CONFIG";

/// Process-wide configuration, loaded on first use.
///
/// Library code takes `&Config` explicitly; only the binary reads this.
pub static CONFIG: Lazy<Config> = Lazy::new(Config::load_or_default);

// --- Top-Level Configuration Structure ---

/// Represents the complete configuration for the extraction tool.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Initial grid resolution.
    pub grid: GridConfig,
    /// Key combinations bound to tool triggers.
    pub keybindings: KeybindingsConfig,
    /// Overlay colors and preview output.
    pub view: ViewConfig,
}

impl Config {
    /// Reads a configuration file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|e| FontError::io(path, e))?;
        let config: Config =
            serde_json::from_str(&text).map_err(|e| FontError::Format(e.to_string()))?;
        info!("Configuration loaded from '{}'", path.display());
        Ok(config)
    }

    /// Reads the file named by `BITFONT_CONFIG`, or falls back to defaults.
    pub fn load_or_default() -> Self {
        match std::env::var_os(CONFIG_ENV_VAR) {
            Some(path) => Self::load(Path::new(&path)).unwrap_or_else(|e| {
                warn!("Ignoring configuration: {}. Using defaults.", e);
                Config::default()
            }),
            None => {
                info!("{} not set, using default configuration", CONFIG_ENV_VAR);
                Config::default()
            }
        }
    }
}

// --- Grid Configuration ---

/// Initial grid resolution of an extraction session.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct GridConfig {
    pub rows: usize,
    pub cols: usize,
    /// Smallest cell edge the "finer" trigger may produce.
    pub min_cell_px: u32,
}

impl Default for GridConfig {
    fn default() -> Self {
        GridConfig {
            rows: 16,
            cols: 16,
            min_cell_px: 1,
        }
    }
}

// --- Keybinding Configuration ---

/// Represents a combination of a key and modifiers for keybindings.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Eq, PartialEq, Hash)]
pub struct KeyCombination {
    #[serde(default)]
    pub symbol: KeySymbol,
    #[serde(default)]
    pub modifiers: Modifiers,
}

impl KeyCombination {
    pub const fn plain(symbol: KeySymbol) -> Self {
        KeyCombination {
            symbol,
            modifiers: Modifiers::empty(),
        }
    }

    pub const fn ctrl(symbol: KeySymbol) -> Self {
        KeyCombination {
            symbol,
            modifiers: Modifiers::CONTROL,
        }
    }

    pub fn matches(&self, symbol: KeySymbol, modifiers: Modifiers) -> bool {
        self.symbol == symbol && self.modifiers == modifiers
    }
}

/// Defines keybindings for the extraction tool triggers.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct KeybindingsConfig {
    /// Fewer, larger cells.
    pub coarser: Vec<KeyCombination>,
    /// More, smaller cells.
    pub finer: Vec<KeyCombination>,
    pub begin_assign: Vec<KeyCombination>,
    pub commit: Vec<KeyCombination>,
    pub cancel: Vec<KeyCombination>,
    pub erase: Vec<KeyCombination>,
    pub save: Vec<KeyCombination>,
    pub mark_default: Vec<KeyCombination>,
    pub toggle_span: Vec<KeyCombination>,
    pub toggle_help: Vec<KeyCombination>,
    pub quit: Vec<KeyCombination>,
}

impl Default for KeybindingsConfig {
    fn default() -> Self {
        use KeySymbol::*;
        KeybindingsConfig {
            coarser: vec![KeyCombination::plain(PageUp)],
            finer: vec![KeyCombination::plain(PageDown)],
            begin_assign: vec![KeyCombination::plain(Insert)],
            commit: vec![KeyCombination::plain(Enter)],
            cancel: vec![KeyCombination::plain(Escape)],
            erase: vec![KeyCombination::plain(Backspace)],
            save: vec![KeyCombination::ctrl(Char('s')), KeyCombination::plain(F2)],
            mark_default: vec![KeyCombination::plain(Home)],
            toggle_span: vec![KeyCombination::plain(Space)],
            toggle_help: vec![KeyCombination::plain(F1)],
            quit: vec![KeyCombination::ctrl(Char('q'))],
        }
    }
}

// --- View Configuration ---

/// Colors of the extraction overlay and where to write it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ViewConfig {
    pub grid_color: Rgba,
    /// Cell under the cursor.
    pub cursor_color: Rgba,
    /// Cells of a multi-cell span.
    pub span_color: Rgba,
    /// Rectangles already committed to the descriptor.
    pub committed_color: Rgba,
    /// When set, the console host writes the overlay image here.
    pub preview_path: Option<PathBuf>,
}

impl Default for ViewConfig {
    fn default() -> Self {
        ViewConfig {
            grid_color: Rgba::new(0, 255, 0, 128),
            cursor_color: Rgba::new(255, 0, 0, 128),
            span_color: Rgba::new(0, 255, 0, 128),
            committed_color: Rgba::new(128, 128, 128, 128),
            preview_path: None,
        }
    }
}
