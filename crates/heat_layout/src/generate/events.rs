//! Event types and sinks for observing generation jobs.
//!
//! This module defines [`GenerationEvent`] and the sinks that receive them while
//! a [`crate::generate::runner::GenerationJob`] runs.

/// Describes events emitted by a generation job.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq)]
pub enum GenerationEvent {
    /// Emitted before the first sample is scheduled.
    JobStarted {
        /// Number of samples requested.
        samples: usize,
        /// Size of the worker pool.
        workers: usize,
        /// Job seed.
        seed: u64,
    },

    /// Emitted once the monitoring mask is planned.
    MaskPlanned {
        /// Number of monitoring points in the mask.
        points: usize,
    },

    /// Emitted when a sample has been handed to the consumer.
    SampleProduced {
        /// Index of the sample within the job.
        index: usize,
        /// Intensity draws the sample needed.
        attempts: usize,
    },

    /// Emitted when a sample needed more than one intensity draw.
    SampleRetried {
        index: usize,
        attempts: usize,
    },

    /// Emitted after every sample was consumed.
    JobFinished {
        samples: usize,
    },

    /// Emitted when a fatal error stops the job.
    JobAborted {
        /// Index of the failing sample, if the failure belongs to one.
        index: Option<usize>,
        /// Human-readable reason.
        message: String,
    },
}

/// Discriminant of [`GenerationEvent`], used for sink filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GenerationEventKind {
    JobStarted,
    MaskPlanned,
    SampleProduced,
    SampleRetried,
    JobFinished,
    JobAborted,
}

impl GenerationEvent {
    pub fn kind(&self) -> GenerationEventKind {
        match self {
            GenerationEvent::JobStarted { .. } => GenerationEventKind::JobStarted,
            GenerationEvent::MaskPlanned { .. } => GenerationEventKind::MaskPlanned,
            GenerationEvent::SampleProduced { .. } => GenerationEventKind::SampleProduced,
            GenerationEvent::SampleRetried { .. } => GenerationEventKind::SampleRetried,
            GenerationEvent::JobFinished { .. } => GenerationEventKind::JobFinished,
            GenerationEvent::JobAborted { .. } => GenerationEventKind::JobAborted,
        }
    }
}

/// A generic event sink that accepts [`GenerationEvent`]s.
pub trait EventSink {
    fn send(&mut self, event: GenerationEvent);

    /// Whether events of `kind` should be built and sent at all.
    fn wants(&self, _kind: GenerationEventKind) -> bool {
        true
    }
}

/// A no-op event sink.
impl EventSink for () {
    #[inline]
    fn send(&mut self, _event: GenerationEvent) {}

    #[inline]
    fn wants(&self, _kind: GenerationEventKind) -> bool {
        false
    }
}

/// An event sink that forwards to a user-provided closure.
pub struct FnSink<F>
where
    F: FnMut(GenerationEvent),
{
    f: F,
}

impl<F> FnSink<F>
where
    F: FnMut(GenerationEvent),
{
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

impl<F> EventSink for FnSink<F>
where
    F: FnMut(GenerationEvent),
{
    #[inline]
    fn send(&mut self, event: GenerationEvent) {
        (self.f)(event);
    }
}

/// An event sink that collects all events in a `Vec`.
#[derive(Default)]
pub struct VecSink {
    events: Vec<GenerationEvent>,
}

impl VecSink {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn as_slice(&self) -> &[GenerationEvent] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Number of collected events of `kind`.
    pub fn count(&self, kind: GenerationEventKind) -> usize {
        self.events.iter().filter(|e| e.kind() == kind).count()
    }
}

impl EventSink for VecSink {
    #[inline]
    fn send(&mut self, event: GenerationEvent) {
        self.events.push(event);
    }
}
