//! Progress event streaming.
//!
//! Serializes pipeline events into the newline-delimited JSON wire
//! format. The stream is an append-only log: any number of waypoint
//! events, then the final path and a done marker, or a single error
//! object. Each line is flushed immediately so a consumer sees progress
//! while the refinement is still running.

use std::io::Write;

use serde_json::json;

use marga_plan::RouteEvent;

use crate::error::Result;

/// NDJSON event writer over any byte sink.
pub struct EventWriter<W: Write> {
    sink: W,
}

impl<W: Write> EventWriter<W> {
    /// Wrap a sink.
    pub fn new(sink: W) -> Self {
        Self { sink }
    }

    /// Emit one pipeline event.
    pub fn emit(&mut self, event: &RouteEvent) -> Result<()> {
        let value = match event {
            RouteEvent::Waypoint {
                index,
                total,
                position,
            } => json!({
                "waypoint": index,
                "total": total,
                "current": [position.x, position.y],
            }),
            RouteEvent::FinalPath { points } => json!({
                "final_path": points.iter().map(|(x, y)| [x, y]).collect::<Vec<_>>(),
            }),
            RouteEvent::Done => json!({ "status": "done" }),
            RouteEvent::Failed { reason } => json!({ "error": reason }),
        };
        self.write_line(&value)
    }

    /// Emit a terminal error object.
    pub fn emit_error(&mut self, message: &str) -> Result<()> {
        self.write_line(&json!({ "error": message }))
    }

    fn write_line(&mut self, value: &serde_json::Value) -> Result<()> {
        serde_json::to_writer(&mut self.sink, value)?;
        self.sink.write_all(b"\n")?;
        self.sink.flush()?;
        Ok(())
    }
}
