//! Compile timeline: tracks when each recursive frame was entered and left,
//! enabling a report of how elaboration time was spent across a deeply
//! nested workflow tree.

use std::collections::HashMap;
use std::time::Instant;

/// Type of timeline event.
#[derive(Debug, Clone, PartialEq)]
pub enum FrameEventKind {
    /// A recursive frame began compiling its document.
    Started,
    /// A recursive frame finished and returned to its caller.
    Completed,
}

/// A single event in the compile timeline.
#[derive(Debug, Clone)]
pub struct FrameEvent {
    pub yaml_stem: String,
    pub kind: FrameEventKind,
    pub timestamp: Instant,
}

/// Tracks the compile timeline of a recursive elaboration run.
#[derive(Debug, Clone)]
pub struct CompileTimeline {
    events: Vec<FrameEvent>,
    start_time: Instant,
}

impl CompileTimeline {
    pub fn new() -> Self {
        Self { events: Vec::new(), start_time: Instant::now() }
    }

    pub fn frame_started(&mut self, yaml_stem: impl Into<String>) {
        self.events.push(FrameEvent { yaml_stem: yaml_stem.into(), kind: FrameEventKind::Started, timestamp: Instant::now() });
    }

    pub fn frame_completed(&mut self, yaml_stem: impl Into<String>) {
        self.events.push(FrameEvent { yaml_stem: yaml_stem.into(), kind: FrameEventKind::Completed, timestamp: Instant::now() });
    }

    pub fn events(&self) -> &[FrameEvent] {
        &self.events
    }

    pub fn elapsed(&self) -> std::time::Duration {
        self.start_time.elapsed()
    }

    /// Per-frame compile durations in milliseconds, keyed by yaml stem. A
    /// stem recompiled more than once (unlikely, but not forbidden) keeps
    /// only its most recent duration.
    pub fn durations(&self) -> HashMap<String, u128> {
        let mut starts: HashMap<String, u128> = HashMap::new();
        let mut durations = HashMap::new();

        for event in &self.events {
            let elapsed = event.timestamp.duration_since(self.start_time).as_millis();
            match event.kind {
                FrameEventKind::Started => {
                    starts.insert(event.yaml_stem.clone(), elapsed);
                }
                FrameEventKind::Completed => {
                    if let Some(start) = starts.get(&event.yaml_stem) {
                        durations.insert(event.yaml_stem.clone(), elapsed - start);
                    }
                }
            }
        }

        durations
    }

    /// A one-line-per-frame text report, ordered by start time.
    pub fn report(&self) -> String {
        let mut out = String::from("Compile timeline:\n");
        let durations = self.durations();
        let mut seen = Vec::new();
        for event in &self.events {
            if event.kind == FrameEventKind::Started && !seen.contains(&event.yaml_stem) {
                seen.push(event.yaml_stem.clone());
            }
        }
        for stem in seen {
            match durations.get(&stem) {
                Some(ms) => out.push_str(&format!("  {stem:30} {ms} ms\n")),
                None => out.push_str(&format!("  {stem:30} (still open)\n")),
            }
        }
        out.push_str(&format!("total: {} ms\n", self.elapsed().as_millis()));
        out
    }
}

impl Default for CompileTimeline {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;
    use std::time::Duration;

    #[test]
    fn tracks_start_and_completion_of_a_frame() {
        let mut timeline = CompileTimeline::new();
        timeline.frame_started("root");
        thread::sleep(Duration::from_millis(10));
        timeline.frame_completed("root");

        let durations = timeline.durations();
        assert!(durations.contains_key("root"));
        assert!(*durations.get("root").unwrap() >= 10);
    }

    #[test]
    fn nested_frames_are_tracked_independently() {
        let mut timeline = CompileTimeline::new();
        timeline.frame_started("root");
        timeline.frame_started("sub");
        thread::sleep(Duration::from_millis(10));
        timeline.frame_completed("sub");
        timeline.frame_completed("root");

        let durations = timeline.durations();
        assert!(durations.contains_key("root"));
        assert!(durations.contains_key("sub"));
    }

    #[test]
    fn report_mentions_every_started_frame() {
        let mut timeline = CompileTimeline::new();
        timeline.frame_started("root");
        timeline.frame_completed("root");
        let report = timeline.report();
        assert!(report.contains("root"));
        assert!(report.contains("total:"));
    }
}
