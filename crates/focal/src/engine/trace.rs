//! Evaluation tracing.
//!
//! The tracer is a zero-cost seam: [`NoopTracer`] methods are empty
//! `#[inline(always)]` functions the compiler erases, so untraced evaluation
//! carries no tracing state. Implementations receive raw references and do
//! their own formatting.

use std::fmt;

use focal_core::Value;

use crate::error::Error;
use crate::optic::Optic;

use super::wrapped::Wrapped;

/// Sink for evaluator events.
///
/// The evaluator maintains the depth counter and reports it with every
/// event; writes are fire-and-forget.
pub trait Tracer {
    /// An optic is about to be applied.
    fn enter(&mut self, depth: u32, optic: &Optic);

    /// A select produced an outcome.
    fn matched(&mut self, depth: u32, optic: &Optic, outcome: &Wrapped);

    /// A transform reached a leaf focus.
    fn picked(&mut self, depth: u32, focus: &Value);

    /// The optic application finished.
    fn leave(&mut self, depth: u32, optic: &Optic);

    /// The optic application raised an error.
    fn failed(&mut self, depth: u32, optic: &Optic, error: &Error);
}

/// Tracer that does nothing and compiles away.
pub struct NoopTracer;

impl Tracer for NoopTracer {
    #[inline(always)]
    fn enter(&mut self, _depth: u32, _optic: &Optic) {}

    #[inline(always)]
    fn matched(&mut self, _depth: u32, _optic: &Optic, _outcome: &Wrapped) {}

    #[inline(always)]
    fn picked(&mut self, _depth: u32, _focus: &Value) {}

    #[inline(always)]
    fn leave(&mut self, _depth: u32, _optic: &Optic) {}

    #[inline(always)]
    fn failed(&mut self, _depth: u32, _optic: &Optic, _error: &Error) {}
}

/// Tracer that collects indented lines for later inspection.
#[derive(Default)]
pub struct CollectTracer {
    lines: Vec<String>,
}

impl CollectTracer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn render(&self) -> String {
        self.lines.join("\n")
    }

    fn push(&mut self, depth: u32, line: impl fmt::Display) {
        let indent = depth.saturating_sub(1) as usize * 2;
        self.lines.push(format!("{:indent$}{line}", ""));
    }
}

/// Clip long value renderings so trace lines stay scannable.
fn clip(text: impl fmt::Display) -> String {
    const LIMIT: usize = 64;
    let text = text.to_string();
    if text.chars().count() <= LIMIT {
        return text;
    }
    let clipped: String = text.chars().take(LIMIT).collect();
    format!("{clipped}…")
}

impl Tracer for CollectTracer {
    fn enter(&mut self, depth: u32, optic: &Optic) {
        self.push(depth, format!("> {}", clip(optic)));
    }

    fn matched(&mut self, depth: u32, optic: &Optic, outcome: &Wrapped) {
        let _ = optic;
        self.push(depth, format!("= {}", clip(outcome)));
    }

    fn picked(&mut self, depth: u32, focus: &Value) {
        self.push(depth, format!("* {}", clip(focus)));
    }

    fn leave(&mut self, depth: u32, optic: &Optic) {
        let _ = optic;
        self.push(depth, "<");
    }

    fn failed(&mut self, depth: u32, optic: &Optic, error: &Error) {
        let _ = optic;
        self.push(depth, format!("! {error}"));
    }
}
