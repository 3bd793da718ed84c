use std::io::Write;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;

use crate::error::AppError;

/// Something text can be copied into.
pub trait ClipboardSink {
    fn name(&self) -> &'static str;
    fn copy(&mut self, text: &str) -> Result<(), AppError>;
}

/// The desktop clipboard. Connected lazily: headless sessions have none and
/// only find out on first use.
#[derive(Default)]
pub struct SystemClipboard {
    inner: Option<arboard::Clipboard>,
}

impl ClipboardSink for SystemClipboard {
    fn name(&self) -> &'static str {
        "system"
    }

    fn copy(&mut self, text: &str) -> Result<(), AppError> {
        if self.inner.is_none() {
            let clipboard =
                arboard::Clipboard::new().map_err(|e| AppError::Clipboard(e.to_string()))?;
            self.inner = Some(clipboard);
        }
        match self.inner.as_mut() {
            Some(clipboard) => clipboard
                .set_text(text.to_owned())
                .map_err(|e| AppError::Clipboard(e.to_string())),
            None => Err(AppError::Clipboard("clipboard unavailable".into())),
        }
    }
}

/// OSC 52: asks the terminal emulator to set its clipboard. Works over SSH
/// where no desktop clipboard exists.
///
/// Success only means the escape sequence was written; terminals give no
/// acknowledgement, so one that ignores OSC 52 still reports success here.
pub struct Osc52Clipboard<W: Write> {
    out: W,
}

impl<W: Write> Osc52Clipboard<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }
}

impl Osc52Clipboard<std::io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }
}

impl<W: Write> ClipboardSink for Osc52Clipboard<W> {
    fn name(&self) -> &'static str {
        "terminal"
    }

    fn copy(&mut self, text: &str) -> Result<(), AppError> {
        let encoded = STANDARD.encode(text.as_bytes());
        write!(self.out, "\x1b]52;c;{}\x07", encoded)?;
        self.out.flush()?;
        Ok(())
    }
}

/// A primary sink with a secondary one tried when the first fails.
pub struct Clipboard {
    primary: Box<dyn ClipboardSink>,
    fallback: Box<dyn ClipboardSink>,
}

impl Clipboard {
    pub fn new(
        primary: Box<dyn ClipboardSink>,
        fallback: Box<dyn ClipboardSink>,
    ) -> Self {
        Self { primary, fallback }
    }

    pub fn system() -> Self {
        Self::new(
            Box::new(SystemClipboard::default()),
            Box::new(Osc52Clipboard::stdout()),
        )
    }

    /// Copy `text`, returning the name of the sink that took it.
    pub fn copy(&mut self, text: &str) -> Result<&'static str, AppError> {
        match self.primary.copy(text) {
            Ok(()) => Ok(self.primary.name()),
            Err(e) => {
                tracing::warn!(error = %e, sink = self.primary.name(), "copy failed, trying fallback");
                self.fallback.copy(text)?;
                Ok(self.fallback.name())
            }
        }
    }
}
