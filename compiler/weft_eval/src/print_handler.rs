//! Destination for `print` and `println`.
//!
//! An engine owns one handler and shares it with every evaluation, so the
//! handler must be usable from several threads at once. Output written to a
//! buffer can be read back and cleared, which the command-line tests and
//! embedders capturing script output rely on.

use std::io::Write;
use std::sync::Arc;

use parking_lot::Mutex;

/// Where script output goes.
pub enum PrintHandlerImpl {
    /// Process stdout (default).
    Stdout,
    /// In-memory capture.
    Buffer(Mutex<String>),
    /// Drop everything.
    Silent,
}

impl PrintHandlerImpl {
    pub fn print(&self, text: &str) {
        match self {
            Self::Stdout => {
                let mut out = std::io::stdout().lock();
                // A closed stdout is not a script error.
                let _ = out.write_all(text.as_bytes());
                let _ = out.flush();
            }
            Self::Buffer(buffer) => buffer.lock().push_str(text),
            Self::Silent => {}
        }
    }

    pub fn println(&self, text: &str) {
        match self {
            Self::Stdout => println!("{text}"),
            Self::Buffer(buffer) => {
                let mut buffer = buffer.lock();
                buffer.push_str(text);
                buffer.push('\n');
            }
            Self::Silent => {}
        }
    }

    /// Everything captured so far; empty unless buffering.
    pub fn output(&self) -> String {
        match self {
            Self::Buffer(buffer) => buffer.lock().clone(),
            Self::Stdout | Self::Silent => String::new(),
        }
    }

    /// Take the captured output, leaving the buffer empty.
    pub fn take_output(&self) -> String {
        match self {
            Self::Buffer(buffer) => std::mem::take(&mut *buffer.lock()),
            Self::Stdout | Self::Silent => String::new(),
        }
    }

    pub fn clear(&self) {
        if let Self::Buffer(buffer) = self {
            buffer.lock().clear();
        }
    }
}

impl Default for PrintHandlerImpl {
    fn default() -> Self {
        Self::Stdout
    }
}

pub type SharedPrintHandler = Arc<PrintHandlerImpl>;

pub fn stdout_handler() -> SharedPrintHandler {
    Arc::new(PrintHandlerImpl::Stdout)
}

pub fn buffer_handler() -> SharedPrintHandler {
    Arc::new(PrintHandlerImpl::Buffer(Mutex::new(String::new())))
}

pub fn silent_handler() -> SharedPrintHandler {
    Arc::new(PrintHandlerImpl::Silent)
}

#[cfg(test)]
mod tests;
