//! The raw HTTP/1.1 text model: captured request → editable text → request.

pub mod format;
pub mod headers;
pub mod parse;

pub use format::{format_request, format_response};
pub use parse::parse;
