//! Evaluation context: binding layers, depth counter, trace sink.

use std::cell::{Cell, RefCell};

use crate::options::{Bindings, Options};

use super::trace::Tracer;

/// State threaded through one `select` or `transform` call.
///
/// The optic AST is never mutated; converter references resolve through
/// [`EvalCtx::bindings`] into transient pairs for the duration of the call.
pub(crate) struct EvalCtx<'a> {
    call: Option<&'a Options>,
    tracer: RefCell<&'a mut dyn Tracer>,
    depth: Cell<u32>,
}

impl<'a> EvalCtx<'a> {
    pub(crate) fn new(call: Option<&'a Options>, tracer: &'a mut dyn Tracer) -> Self {
        Self {
            call,
            tracer: RefCell::new(tracer),
            depth: Cell::new(0),
        }
    }

    /// Resolution view for the current sequence scope.
    pub(crate) fn bindings<'b>(&'b self, seq: Option<&'b Options>) -> Bindings<'b> {
        Bindings::new(self.call, seq)
    }

    pub(crate) fn enter(&self) {
        self.depth.set(self.depth.get() + 1);
    }

    pub(crate) fn exit(&self) {
        self.depth.set(self.depth.get().saturating_sub(1));
    }

    /// Run a tracing action with the sink and current depth.
    pub(crate) fn trace(&self, action: impl FnOnce(&mut dyn Tracer, u32)) {
        let depth = self.depth.get();
        let mut tracer = self.tracer.borrow_mut();
        action(&mut **tracer, depth);
    }
}
