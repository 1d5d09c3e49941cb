//! Output handling for executed commands.
//!
//! Two independent consumers see a command's output while it runs:
//!
//! - An [`OutputTransformer`] per stream renders or filters chunks for display
//! - A [`RawOutputSink`] archives every displayed chunk untouched

mod ninja;
mod sink;
mod transformer;

#[cfg(test)]
mod tests;

pub use ninja::Ninja;
pub use sink::{FileOutputLog, NullOutputLog, RawOutputSink};
pub use transformer::{Hidden, Identity, OutputSink, OutputTransformer};
