// src/extractor/mod.rs

//! The extraction tool: browse a font image on a grid and assign characters
//! to cells, building a FreeDims descriptor.
//!
//! `Extractor` owns all tool state. Hosts feed it [`ToolInput`]s through
//! [`Extractor::handle`]; everything it shows is derived on demand by
//! [`view`].

pub mod keymap;
pub mod session;
pub mod state;
pub mod view;


use std::path::{Path, PathBuf};

use log::{debug, info, warn};

use crate::color::{detect_colorkey, Rgba};
use crate::config::{Config, KeybindingsConfig};
use crate::descriptor::FontDescriptor;
use crate::error::{FontError, Result};
use crate::grid::GlyphGrid;
use crate::platform::ToolInput;
use crate::surface::{GlyphRect, GraphicsHost, PixelBuffer};

pub use state::{Action, Mode, Navigation, Trigger};

/// Result of handling one input.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum ToolStatus {
    /// Keep polling.
    Running,
    /// Quit was requested. Nothing is saved implicitly.
    Shutdown,
}

/// Grid resolution plus the cursor and optional span anchor on it.
///
/// Cursor and anchor always address valid cells of the current grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridState {
    grid: GlyphGrid,
    cursor: (usize, usize),
    anchor: Option<(usize, usize)>,
}

impl GridState {
    pub fn new(grid: GlyphGrid) -> Self {
        GridState {
            grid,
            cursor: (0, 0),
            anchor: None,
        }
    }

    pub fn grid(&self) -> &GlyphGrid {
        &self.grid
    }

    /// `(row, col)` of the cursor cell.
    pub fn cursor(&self) -> (usize, usize) {
        self.cursor
    }

    pub fn anchor(&self) -> Option<(usize, usize)> {
        self.anchor
    }

    /// Bounding rectangle of the span, or the cursor cell when no span is anchored.
    pub fn selection(&self) -> Result<GlyphRect> {
        self.grid
            .span_rect(self.anchor.unwrap_or(self.cursor), self.cursor)
    }

    /// Moves one cell, stopping at the grid edge.
    pub fn step(&mut self, (dr, dc): (isize, isize)) {
        let clamp = |value: usize, delta: isize, len: usize| {
            value.saturating_add_signed(delta).min(len - 1)
        };
        self.cursor = (
            clamp(self.cursor.0, dr, self.grid.rows()),
            clamp(self.cursor.1, dc, self.grid.cols()),
        );
    }

    /// Moves the cursor to the cell holding image pixel `(x, y)`.
    pub fn point_to(&mut self, x: u32, y: u32) {
        self.cursor = self.grid.clamped_cell_at_point(x, y);
    }

    /// Moves the cursor to `(x, y)` and anchors a new span there.
    pub fn press(&mut self, x: u32, y: u32) {
        self.point_to(x, y);
        self.anchor = Some(self.cursor);
    }

    /// Anchors a span at the cursor, or collapses the current one.
    pub fn toggle_span(&mut self) {
        self.anchor = match self.anchor {
            Some(_) => None,
            None => Some(self.cursor),
        };
    }

    /// Changes the resolution. Cursor and anchor keep pointing at the cell
    /// containing the top-left pixel of the cell they addressed before.
    pub fn set_resolution(&mut self, rows: usize, cols: usize) -> Result<()> {
        let cursor_px = self.top_left(self.cursor)?;
        let anchor_px = match self.anchor {
            Some(cell) => Some(self.top_left(cell)?),
            None => None,
        };
        self.grid.set_resolution(rows, cols)?;
        self.cursor = self.grid.clamped_cell_at_point(cursor_px.0, cursor_px.1);
        self.anchor = anchor_px.map(|(x, y)| self.grid.clamped_cell_at_point(x, y));
        Ok(())
    }

    fn top_left(&self, (row, col): (usize, usize)) -> Result<(u32, u32)> {
        let cell = self.grid.cell_at(row, col)?;
        Ok((cell.x, cell.y))
    }
}

/// The whole state of one extraction session.
#[derive(Debug, Clone)]
pub struct Extractor {
    image: PixelBuffer,
    state: GridState,
    mode: Mode,
    descriptor: FontDescriptor,
    out_path: PathBuf,
    bindings: KeybindingsConfig,
    min_cell_px: u32,
    show_help: bool,
    unsaved: bool,
}

impl Extractor {
    /// Starts a session over an already decoded image.
    ///
    /// The working descriptor is an empty FreeDims descriptor whose colorkey
    /// is taken from the image corners (or the top-left pixel when they
    /// disagree).
    pub fn new(
        image: PixelBuffer,
        image_path: impl Into<PathBuf>,
        out_path: impl Into<PathBuf>,
        config: &Config,
    ) -> Result<Self> {
        let grid = GlyphGrid::new(image.width(), image.height(), config.grid.rows, config.grid.cols)?;
        let mut descriptor = FontDescriptor::free_dims(image_path, image.width(), image.height());
        descriptor.colorkey = detect_colorkey(&image)
            .or_else(|| image.pixel(0, 0))
            .map(|c| Rgba::opaque(c.r, c.g, c.b))
            .unwrap_or(Rgba::BLACK);
        debug!("Working descriptor colorkey {}", descriptor.colorkey);

        Ok(Extractor {
            image,
            state: GridState::new(grid),
            mode: Mode::Browsing,
            descriptor,
            out_path: out_path.into(),
            bindings: config.keybindings.clone(),
            min_cell_px: config.grid.min_cell_px.max(1),
            show_help: false,
            unsaved: false,
        })
    }

    /// Decodes `image_path` through `host` and starts a session over it.
    pub fn open<H: GraphicsHost + ?Sized>(
        host: &H,
        image_path: &Path,
        out_path: impl Into<PathBuf>,
        config: &Config,
    ) -> Result<Self> {
        let image = host.decode_image(image_path)?;
        info!(
            "Opened '{}' ({}x{}) for extraction",
            image_path.display(),
            image.width(),
            image.height()
        );
        Self::new(image, image_path, out_path, config)
    }

    pub fn image(&self) -> &PixelBuffer {
        &self.image
    }

    pub fn grid_state(&self) -> &GridState {
        &self.state
    }

    pub fn grid(&self) -> &GlyphGrid {
        self.state.grid()
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn descriptor(&self) -> &FontDescriptor {
        &self.descriptor
    }

    pub fn out_path(&self) -> &Path {
        &self.out_path
    }

    pub fn bindings(&self) -> &KeybindingsConfig {
        &self.bindings
    }

    pub fn show_help(&self) -> bool {
        self.show_help
    }

    /// True when glyphs were committed after the last save.
    pub fn has_unsaved_changes(&self) -> bool {
        self.unsaved
    }

    /// The rectangle an assignment would capture right now.
    pub fn selection(&self) -> Result<GlyphRect> {
        match self.mode {
            Mode::AwaitingCharacter { target, .. } => Ok(target),
            Mode::Browsing => self.state.selection(),
        }
    }

    /// Feeds one host input to the state machine.
    pub fn handle(&mut self, input: &ToolInput) -> Result<ToolStatus> {
        match keymap::trigger_for(input, &self.mode, &self.bindings) {
            Some(trigger) => self.apply(trigger),
            None => {
                debug!("Unbound input {:?}", input);
                Ok(ToolStatus::Running)
            }
        }
    }

    /// Runs one trigger through the state machine and carries out its action.
    ///
    /// Only save failures are returned as errors; rejected input is logged.
    pub fn apply(&mut self, trigger: Trigger) -> Result<ToolStatus> {
        let selection = self.state.selection()?;
        let (next, action) = state::transition(self.mode, trigger, selection);
        if next != self.mode {
            debug!("Mode {:?} -> {:?}", self.mode, next);
        }
        self.mode = next;

        match action {
            Action::None => {}
            Action::Rejected(reason) => warn!("Ignoring {:?}: {}", trigger, reason),
            Action::Navigate(nav) => self.navigate(nav),
            Action::Commit { ch, rect } => self.commit(ch, rect)?,
            Action::Save => self.save()?,
            Action::MarkDefault => {
                self.descriptor.set_default_glyph(selection)?;
                self.unsaved = true;
                info!("Default glyph set to {:?}", selection);
            }
            Action::ToggleHelp => self.show_help = !self.show_help,
            Action::Quit => {
                if self.unsaved {
                    warn!("Quitting with unsaved glyphs; '{}' not updated", self.out_path.display());
                }
                info!("Extraction session finished");
                return Ok(ToolStatus::Shutdown);
            }
        }
        Ok(ToolStatus::Running)
    }

    fn navigate(&mut self, nav: Navigation) {
        match nav {
            Navigation::Step(dir) => self.state.step(dir.delta()),
            Navigation::PointTo { x, y } => self.state.point_to(x, y),
            Navigation::Press { x, y } => self.state.press(x, y),
            Navigation::ToggleSpan => self.state.toggle_span(),
            Navigation::Coarser => {
                let grid = self.state.grid();
                let rows = (grid.rows() / 2).max(1);
                let cols = (grid.cols() / 2).max(1);
                if (rows, cols) == (grid.rows(), grid.cols()) {
                    debug!("Grid already at its coarsest resolution");
                    return;
                }
                self.change_resolution(rows, cols);
            }
            Navigation::Finer => {
                let grid = self.state.grid();
                let (rows, cols) = (grid.rows().saturating_mul(2), grid.cols().saturating_mul(2));
                let (width, height) = grid.image_size();
                let too_small = (width as u64 / cols as u64) < self.min_cell_px as u64
                    || (height as u64 / rows as u64) < self.min_cell_px as u64;
                if too_small {
                    warn!(
                        "{}x{} grid would make cells smaller than {} px; keeping {}x{}",
                        rows,
                        cols,
                        self.min_cell_px,
                        grid.rows(),
                        grid.cols()
                    );
                    return;
                }
                self.change_resolution(rows, cols);
            }
        }
    }

    fn change_resolution(&mut self, rows: usize, cols: usize) {
        match self.state.set_resolution(rows, cols) {
            Ok(()) => info!("Grid resolution now {}x{}", rows, cols),
            Err(e @ FontError::InvalidResolution { .. }) => warn!("{}", e),
            Err(e) => warn!("Resolution change failed: {}", e),
        }
    }

    fn commit(&mut self, ch: char, rect: GlyphRect) -> Result<()> {
        let previous = self.descriptor.insert_glyph(ch, rect)?;
        self.unsaved = true;
        match previous {
            Some(old) => info!("Reassigned '{}' from {:?} to {:?}", ch.escape_default(), old, rect),
            None => info!("Assigned '{}' to {:?}", ch.escape_default(), rect),
        }
        Ok(())
    }

    /// Writes the working descriptor to the output path.
    pub fn save(&mut self) -> Result<()> {
        self.descriptor.save(&self.out_path)?;
        self.unsaved = false;
        Ok(())
    }
}
