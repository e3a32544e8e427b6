//! Progress and message reporting for long generation runs.

use log::{debug, error, warn};

pub trait ProgressListener {
    fn warning(&mut self, _message: &str) {}
    fn error(&mut self, _message: &str) {}
    fn begin_task(&mut self, _cancelable: bool, _show_progress: bool) {}
    fn update_progress(&mut self, _current: usize, _total: usize) {}
    fn end_task(&mut self) {}
}

/// Silent listener.
impl ProgressListener for () {}

/// Forwards everything to the `log` facade.
#[derive(Clone, Copy, Debug, Default)]
pub struct LogProgress;

impl ProgressListener for LogProgress {
    fn warning(&mut self, message: &str) {
        warn!("{message}");
    }

    fn error(&mut self, message: &str) {
        error!("{message}");
    }

    fn update_progress(&mut self, current: usize, total: usize) {
        debug!("rendering glyph {}/{}", current + 1, total);
    }
}
