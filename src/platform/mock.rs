// src/platform/mock.rs

use std::collections::VecDeque;

use anyhow::Result;

use crate::platform::{Frame, ToolInput, ToolPlatform};

/// Scripted host for tests.
///
/// Each queued batch is returned by one `poll_events` call. Once the script
/// runs out the mock reports `CloseRequested`, so a session always ends.
#[derive(Debug, Default)]
pub struct MockPlatform {
    batches: VecDeque<Vec<ToolInput>>,
    presented: Vec<Frame>,
    cleaned_up: bool,
}

impl MockPlatform {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues every input as its own batch.
    pub fn scripted(inputs: impl IntoIterator<Item = ToolInput>) -> Self {
        let mut platform = Self::new();
        for input in inputs {
            platform.push_event(input);
        }
        platform
    }

    pub fn push_event(&mut self, event: ToolInput) {
        self.batches.push_back(vec![event]);
    }

    pub fn presented(&self) -> &[Frame] {
        &self.presented
    }

    pub fn last_frame(&self) -> Option<&Frame> {
        self.presented.last()
    }

    pub fn cleaned_up(&self) -> bool {
        self.cleaned_up
    }
}

impl ToolPlatform for MockPlatform {
    fn poll_events(&mut self) -> Result<Vec<ToolInput>> {
        Ok(self
            .batches
            .pop_front()
            .unwrap_or_else(|| vec![ToolInput::CloseRequested]))
    }

    fn present(&mut self, frame: &Frame) -> Result<()> {
        self.presented.push(frame.clone());
        Ok(())
    }

    fn cleanup(&mut self) -> Result<()> {
        self.cleaned_up = true;
        Ok(())
    }
}
