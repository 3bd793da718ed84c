use std::path::PathBuf;
use std::time::Duration;

use crossterm::event::{KeyEvent, MouseEvent};

use crate::error::AppError;
use crate::state::response_state::CapturedResponse;

/// Outcome of one send, tagged with the generation it was started under.
#[derive(Debug)]
pub struct SendResult {
    pub generation: u64,
    pub result: Result<(CapturedResponse, Duration), AppError>,
}

#[derive(Debug)]
pub enum Event {
    Key(KeyEvent),
    Mouse(MouseEvent),
    Tick,
    Resize,
    Response(SendResult),
    CaptureChanged(PathBuf),
}
