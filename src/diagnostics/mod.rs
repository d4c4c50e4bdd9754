//! Compile-time diagnostics (A5): a timeline of recursive frame activity,
//! useful for reporting how long elaboration of a deeply nested workflow
//! tree took and in what order sub-workflows were entered.

pub mod timeline;

pub use timeline::{CompileTimeline, FrameEvent, FrameEventKind};
