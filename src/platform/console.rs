// src/platform/console.rs
//
// Line-oriented console host: one command per line on stdin, captions on
// stdout, and an optional PNG preview of the overlay.

use std::io::{self, BufRead, StdinLock, Stdout, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use log::{debug, info, warn};

use crate::keys::{KeySymbol, Modifiers};
use crate::platform::{Frame, ToolInput, ToolPlatform};
use crate::surface::PixelBuffer;

const USAGE: &str = "commands: left right up down pgup pgdn insert enter esc backspace \
home space f1 f2 save quit | move X Y | click X Y | char C";

/// Parses one command line. `Ok(None)` for blank lines.
pub fn parse_command(line: &str) -> std::result::Result<Option<ToolInput>, String> {
    let trimmed = line.trim_end_matches(['\r', '\n']);
    if let Some(rest) = trimmed.strip_prefix("char ") {
        let mut chars = rest.chars();
        return match (chars.next(), chars.next()) {
            (Some(ch), None) => Ok(Some(ToolInput::text(ch))),
            _ => Err(format!("'char' takes exactly one character, got '{}'", rest)),
        };
    }

    let mut words = trimmed.split_whitespace();
    let Some(command) = words.next() else {
        return Ok(None);
    };
    let key = |symbol| Ok(Some(ToolInput::key(symbol)));
    match command.to_ascii_lowercase().as_str() {
        "left" => key(KeySymbol::Left),
        "right" => key(KeySymbol::Right),
        "up" => key(KeySymbol::Up),
        "down" => key(KeySymbol::Down),
        "pgup" => key(KeySymbol::PageUp),
        "pgdn" => key(KeySymbol::PageDown),
        "insert" => key(KeySymbol::Insert),
        "enter" => key(KeySymbol::Enter),
        "esc" => key(KeySymbol::Escape),
        "backspace" => key(KeySymbol::Backspace),
        "home" => key(KeySymbol::Home),
        "space" => key(KeySymbol::Space),
        "f1" => key(KeySymbol::F1),
        "f2" => key(KeySymbol::F2),
        "save" => Ok(Some(ToolInput::chord(KeySymbol::Char('s'), Modifiers::CONTROL))),
        "quit" => Ok(Some(ToolInput::CloseRequested)),
        "move" | "click" => {
            let mut coord = |axis: &str| -> std::result::Result<u32, String> {
                words
                    .next()
                    .ok_or_else(|| format!("'{}' needs {}", command, axis))?
                    .parse::<u32>()
                    .map_err(|e| format!("bad {} for '{}': {}", axis, command, e))
            };
            let (x, y) = (coord("X")?, coord("Y")?);
            Ok(Some(if command.eq_ignore_ascii_case("move") {
                ToolInput::PointerMoved { x, y }
            } else {
                ToolInput::PointerPressed { x, y }
            }))
        }
        other => Err(format!("unknown command '{}'", other)),
    }
}

/// Console host over any line reader and writer.
pub struct ConsolePlatform<R: BufRead, W: Write> {
    input: R,
    output: W,
    preview_path: Option<PathBuf>,
    last_caption: Option<String>,
    last_help: Vec<String>,
    last_overlay: Option<PixelBuffer>,
}

impl ConsolePlatform<StdinLock<'static>, Stdout> {
    /// Reads stdin, writes stdout.
    pub fn stdio(preview_path: Option<PathBuf>) -> Self {
        Self::new(io::stdin().lock(), io::stdout(), preview_path)
    }
}

impl<R: BufRead, W: Write> ConsolePlatform<R, W> {
    pub fn new(input: R, output: W, preview_path: Option<PathBuf>) -> Self {
        if let Some(path) = &preview_path {
            info!("Overlay preview will be written to '{}'", path.display());
        }
        ConsolePlatform {
            input,
            output,
            preview_path,
            last_caption: None,
            last_help: Vec::new(),
            last_overlay: None,
        }
    }

    pub fn into_output(self) -> W {
        self.output
    }
}

impl<R: BufRead, W: Write> ToolPlatform for ConsolePlatform<R, W> {
    fn poll_events(&mut self) -> Result<Vec<ToolInput>> {
        let mut line = String::new();
        let read = self
            .input
            .read_line(&mut line)
            .context("Failed to read command from console")?;
        if read == 0 {
            debug!("Console input closed");
            return Ok(vec![ToolInput::CloseRequested]);
        }
        match parse_command(&line) {
            Ok(Some(input)) => Ok(vec![input]),
            Ok(None) => Ok(Vec::new()),
            Err(message) => {
                warn!("{}", message);
                writeln!(self.output, "{}\n{}", message, USAGE)
                    .context("Failed to write to console")?;
                Ok(Vec::new())
            }
        }
    }

    fn present(&mut self, frame: &Frame) -> Result<()> {
        let caption_changed = self.last_caption.as_deref() != Some(frame.caption.as_str());
        let help_changed = self.last_help != frame.help;

        if caption_changed {
            writeln!(self.output, "{}", frame.caption).context("Failed to write to console")?;
        }
        if help_changed {
            for line in &frame.help {
                writeln!(self.output, "  {}", line).context("Failed to write to console")?;
            }
        }
        if caption_changed || help_changed {
            self.output.flush().context("Failed to flush console")?;
            self.last_caption = Some(frame.caption.clone());
            self.last_help = frame.help.clone();
        }

        if let Some(path) = &self.preview_path {
            if self.last_overlay.as_ref() != Some(&frame.overlay) {
                frame
                    .overlay
                    .save_png(path)
                    .with_context(|| format!("Failed to write preview '{}'", path.display()))?;
                self.last_overlay = Some(frame.overlay.clone());
            }
        }
        Ok(())
    }

    fn cleanup(&mut self) -> Result<()> {
        self.output.flush().context("Failed to flush console")?;
        Ok(())
    }
}
