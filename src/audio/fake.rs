//! Recording `AudioOutput` for engine tests.

use std::cell::{Cell, RefCell};
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::time::Duration;

use super::output::{AudioError, AudioOutput};
use super::types::RequestId;

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum OutputCall {
    Load(RequestId, PathBuf),
    Play(RequestId),
    Pause,
    Seek(Duration),
    SetVolume(f32),
}

/// Records every call. Clones share the same log so a test can keep one
/// handle after boxing the other into the engine.
#[derive(Debug, Clone, Default)]
pub(crate) struct FakeOutput {
    calls: Rc<RefCell<Vec<OutputCall>>>,
    fail_play: Rc<Cell<bool>>,
    shut_down: Rc<Cell<bool>>,
}

impl FakeOutput {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn calls(&self) -> Vec<OutputCall> {
        self.calls.borrow().clone()
    }

    pub(crate) fn clear(&self) {
        self.calls.borrow_mut().clear();
    }

    pub(crate) fn last_load(&self) -> Option<(RequestId, PathBuf)> {
        self.calls.borrow().iter().rev().find_map(|c| match c {
            OutputCall::Load(r, p) => Some((*r, p.clone())),
            _ => None,
        })
    }

    pub(crate) fn set_fail_play(&self, fail: bool) {
        self.fail_play.set(fail);
    }

    pub(crate) fn was_shut_down(&self) -> bool {
        self.shut_down.get()
    }

    fn record(&self, call: OutputCall) {
        self.calls.borrow_mut().push(call);
    }
}

impl AudioOutput for FakeOutput {
    fn load(&mut self, request: RequestId, path: &Path) -> Result<(), AudioError> {
        self.record(OutputCall::Load(request, path.to_path_buf()));
        Ok(())
    }

    fn play(&mut self, request: RequestId) -> Result<(), AudioError> {
        self.record(OutputCall::Play(request));
        if self.fail_play.get() {
            return Err(AudioError::Disconnected);
        }
        Ok(())
    }

    fn pause(&mut self) -> Result<(), AudioError> {
        self.record(OutputCall::Pause);
        Ok(())
    }

    fn seek(&mut self, position: Duration) -> Result<(), AudioError> {
        self.record(OutputCall::Seek(position));
        Ok(())
    }

    fn set_volume(&mut self, volume: f32) -> Result<(), AudioError> {
        self.record(OutputCall::SetVolume(volume));
        Ok(())
    }

    fn shutdown(&mut self) {
        self.shut_down.set(true);
    }
}
