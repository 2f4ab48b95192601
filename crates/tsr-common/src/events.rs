//! Lifecycle notifications of a transform run.
//!
//! Observers are registered per run and called synchronously, in
//! registration order, from the thread that drives the pipeline.

use crate::Diagnostic;
use std::path::PathBuf;

/// Maximum number of diagnostics carried by a single `Diagnostics` event.
pub const DIAGNOSTICS_BATCH_SIZE: usize = 15;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransformEvent {
    Start,
    /// The units about to be rewritten.
    Transform(Vec<PathBuf>),
    /// The first `DIAGNOSTICS_BATCH_SIZE` diagnostics and the total count.
    Diagnostics {
        batch: Vec<Diagnostic>,
        total: usize,
    },
    Cleanup,
    Stop,
    End,
}

impl TransformEvent {
    pub fn diagnostics(diagnostics: &[Diagnostic]) -> Self {
        TransformEvent::Diagnostics {
            batch: diagnostics
                .iter()
                .take(DIAGNOSTICS_BATCH_SIZE)
                .cloned()
                .collect(),
            total: diagnostics.len(),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            TransformEvent::Start => "start",
            TransformEvent::Transform(_) => "transform",
            TransformEvent::Diagnostics { .. } => "diagnostics",
            TransformEvent::Cleanup => "cleanup",
            TransformEvent::Stop => "stop",
            TransformEvent::End => "end",
        }
    }
}

pub trait TransformObserver {
    fn notify(&mut self, event: &TransformEvent);
}

impl<F> TransformObserver for F
where
    F: FnMut(&TransformEvent),
{
    fn notify(&mut self, event: &TransformEvent) {
        self(event)
    }
}

/// The observers of one run.
#[derive(Default)]
pub struct Observers<'a> {
    observers: Vec<&'a mut dyn TransformObserver>,
}

impl<'a> Observers<'a> {
    pub fn new() -> Self {
        Observers {
            observers: Vec::new(),
        }
    }

    pub fn register(&mut self, observer: &'a mut dyn TransformObserver) {
        self.observers.push(observer);
    }

    pub fn emit(&mut self, event: TransformEvent) {
        tracing::trace!(event = event.name(), "transform event");
        for observer in self.observers.iter_mut() {
            observer.notify(&event);
        }
    }

    pub fn len(&self) -> usize {
        self.observers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observers.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_diagnostics_event_is_capped() {
        let diags: Vec<Diagnostic> = (0..20)
            .map(|i| Diagnostic::error("a.ts", i, 1, "boom", 2304))
            .collect();
        match TransformEvent::diagnostics(&diags) {
            TransformEvent::Diagnostics { batch, total } => {
                assert_eq!(batch.len(), DIAGNOSTICS_BATCH_SIZE);
                assert_eq!(total, 20);
            }
            other => panic!("unexpected event {other:?}"),
        }
    }

    #[test]
    fn test_observers_are_called_in_registration_order() {
        let mut seen = Vec::new();
        let mut first = |e: &TransformEvent| seen.push(format!("a:{}", e.name()));
        let mut log2 = Vec::new();
        let mut second = |e: &TransformEvent| log2.push(format!("b:{}", e.name()));
        {
            let mut observers = Observers::new();
            observers.register(&mut first);
            observers.register(&mut second);
            observers.emit(TransformEvent::Start);
            observers.emit(TransformEvent::End);
        }
        assert_eq!(seen, vec!["a:start", "a:end"]);
        assert_eq!(log2, vec!["b:start", "b:end"]);
    }
}
