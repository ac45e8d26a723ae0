// src/platform/mod.rs
//
// Host platforms for the extraction tool.

use anyhow::Result;

use crate::keys::{KeySymbol, Modifiers};
use crate::surface::PixelBuffer;

pub mod console;
pub mod mock;

pub use console::ConsolePlatform;
pub use mock::MockPlatform;

/// A discrete input event delivered by the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolInput {
    /// A key press. `text` is the character the key produced, if any.
    Key {
        symbol: KeySymbol,
        modifiers: Modifiers,
        text: Option<String>,
    },
    /// Pointer position in source-image pixels.
    PointerMoved { x: u32, y: u32 },
    PointerPressed { x: u32, y: u32 },
    /// The user closed the window or the input stream ended.
    CloseRequested,
}

impl ToolInput {
    /// A key press without modifiers or text.
    pub fn key(symbol: KeySymbol) -> Self {
        ToolInput::Key {
            symbol,
            modifiers: Modifiers::empty(),
            text: None,
        }
    }

    /// A key press with modifiers.
    pub fn chord(symbol: KeySymbol, modifiers: Modifiers) -> Self {
        ToolInput::Key {
            symbol,
            modifiers,
            text: None,
        }
    }

    /// A printable character as typed.
    pub fn text(ch: char) -> Self {
        ToolInput::Key {
            symbol: KeySymbol::Char(ch),
            modifiers: Modifiers::empty(),
            text: Some(ch.to_string()),
        }
    }
}

/// Everything a host needs to show one frame of the tool.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    /// One-line status: resolution, cursor, selection, mode.
    pub caption: String,
    /// Help lines, empty unless help is toggled on.
    pub help: Vec<String>,
    /// Source image with the grid and selection overlay drawn in.
    pub overlay: PixelBuffer,
}

/// A trait that defines the interface between the tool and its host.
///
/// The tool is single-threaded: the session loop polls, feeds every input to
/// the state machine, then presents one frame.
pub trait ToolPlatform {
    /// Returns the inputs that arrived since the last poll. May block.
    fn poll_events(&mut self) -> Result<Vec<ToolInput>>;

    /// Shows a frame.
    fn present(&mut self, frame: &Frame) -> Result<()>;

    /// Performs any necessary cleanup before the platform is dropped.
    fn cleanup(&mut self) -> Result<()>;
}
