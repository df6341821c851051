//! Parallel generation of a whole dataset.
//!
//! A [`GenerationJob`] validates its [`JobConfig`], builds the shared
//! [`ComponentSet`], derives one seed per worker from the job seed and plans the
//! monitoring mask. [`GenerationJob::run`] then starts a fixed pool of scoped
//! worker threads. Worker `w` produces the samples `w, w + workers, ...` with its
//! own generator and sends them back over a channel; the calling thread hands
//! them to the [`SampleConsumer`] strictly in index order.
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;

use crossbeam_channel::Sender;
use rand::rngs::StdRng;
use rand::{Rng as RngCore, SeedableRng};
use tracing::{debug, error, info};

use crate::error::{Error, Result};
use crate::generate::config::JobConfig;
use crate::generate::events::{EventSink, GenerationEvent, GenerationEventKind};
use crate::generate::task::{SampleResult, SampleTask};
use crate::layout::ComponentSet;
use crate::monitor::MonitorMask;

/// Receives finished samples in index order.
pub trait SampleConsumer {
    fn consume(&mut self, index: usize, sample: SampleResult, mask: &MonitorMask) -> Result<()>;
}

impl<F> SampleConsumer for F
where
    F: FnMut(usize, SampleResult, &MonitorMask) -> Result<()>,
{
    fn consume(&mut self, index: usize, sample: SampleResult, mask: &MonitorMask) -> Result<()> {
        self(index, sample, mask)
    }
}

/// Outcome of a successful job.
#[non_exhaustive]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct JobSummary {
    /// Samples delivered to the consumer.
    pub samples: usize,
    /// Size of the worker pool.
    pub workers: usize,
}

type Produced = (usize, Result<SampleResult>);

/// A validated, ready-to-run generation job.
#[derive(Debug, Clone)]
pub struct GenerationJob {
    config: JobConfig,
    components: Arc<ComponentSet>,
    mask: Arc<MonitorMask>,
    worker_seeds: Vec<u64>,
}

impl GenerationJob {
    /// Validate `config` and prepare everything shared by the workers.
    ///
    /// The job generator is seeded from `config.seed`; it first yields one seed
    /// per worker, in worker order, and is then used to plan the monitoring mask.
    pub fn new(config: JobConfig) -> Result<Self> {
        config.validate()?;
        let components = Arc::new(config.component_set()?);

        let mut rng = StdRng::seed_from_u64(config.seed);
        let worker_seeds: Vec<u64> = (0..config.workers).map(|_| rng.next_u64()).collect();
        let mask = Arc::new(config.monitoring.plan(&components, &mut rng)?);

        info!(
            "Prepared job: {} component(s), {} monitoring point(s), {} sample(s) on {} worker(s).",
            components.len(),
            mask.count(),
            config.samples,
            config.workers
        );

        Ok(Self {
            config,
            components,
            mask,
            worker_seeds,
        })
    }

    pub fn config(&self) -> &JobConfig {
        &self.config
    }

    pub fn components(&self) -> &ComponentSet {
        &self.components
    }

    pub fn mask(&self) -> &MonitorMask {
        &self.mask
    }

    pub fn worker_seeds(&self) -> &[u64] {
        &self.worker_seeds
    }

    /// Produce every sample and hand it to `consumer` in index order.
    ///
    /// The first error, from a worker or from the consumer, stops the job and is
    /// returned as [`Error::SampleFailed`]; samples after the failing index are
    /// never delivered.
    pub fn run(
        &self,
        consumer: &mut dyn SampleConsumer,
        sink: &mut dyn EventSink,
    ) -> Result<JobSummary> {
        let samples = self.config.samples;
        let workers = self.worker_seeds.len();

        info!(
            "Starting generation: {} sample(s), {} worker(s), seed {}.",
            samples, workers, self.config.seed
        );
        if sink.wants(GenerationEventKind::JobStarted) {
            sink.send(GenerationEvent::JobStarted {
                samples,
                workers,
                seed: self.config.seed,
            });
        }
        if sink.wants(GenerationEventKind::MaskPlanned) {
            sink.send(GenerationEvent::MaskPlanned {
                points: self.mask.count(),
            });
        }

        let abort = AtomicBool::new(false);
        let (tx, rx) = crossbeam_channel::bounded::<Produced>(workers * 2);

        let outcome = thread::scope(|scope| -> Result<usize> {
            let mut handles = Vec::with_capacity(workers);
            for (worker, &seed) in self.worker_seeds.iter().enumerate() {
                let tx = tx.clone();
                let components = Arc::clone(&self.components);
                let abort = &abort;
                let max_attempts = self.config.max_attempts;
                let handle = thread::Builder::new()
                    .name(format!("heat-layout-worker-{worker}"))
                    .spawn_scoped(scope, move || {
                        run_worker(
                            WorkerSlot {
                                worker,
                                workers,
                                samples,
                                seed,
                            },
                            &components,
                            max_attempts,
                            abort,
                            tx,
                        )
                    });
                match handle {
                    Ok(h) => handles.push((worker, h)),
                    Err(e) => {
                        abort.store(true, Ordering::Relaxed);
                        return Err(e.into());
                    }
                }
            }
            drop(tx);

            let delivered = self.collect(&rx, consumer, sink, &abort);
            drop(rx);

            let mut panicked = None;
            for (worker, handle) in handles {
                if handle.join().is_err() && panicked.is_none() {
                    error!("Worker {} panicked.", worker);
                    panicked = Some(worker);
                }
            }
            match panicked {
                Some(worker) => Err(Error::WorkerPanicked { worker }),
                None => delivered,
            }
        });

        match outcome {
            Ok(delivered) => {
                info!("Generation finished: {} sample(s).", delivered);
                if sink.wants(GenerationEventKind::JobFinished) {
                    sink.send(GenerationEvent::JobFinished { samples: delivered });
                }
                Ok(JobSummary {
                    samples: delivered,
                    workers,
                })
            }
            Err(err) => {
                error!("Generation aborted: {}", err);
                if sink.wants(GenerationEventKind::JobAborted) {
                    let index = match &err {
                        Error::SampleFailed { index, .. } => Some(*index),
                        _ => None,
                    };
                    sink.send(GenerationEvent::JobAborted {
                        index,
                        message: err.to_string(),
                    });
                }
                Err(err)
            }
        }
    }

    /// Reorder worker output and feed the consumer. Returns the number delivered.
    fn collect(
        &self,
        rx: &crossbeam_channel::Receiver<Produced>,
        consumer: &mut dyn SampleConsumer,
        sink: &mut dyn EventSink,
        abort: &AtomicBool,
    ) -> Result<usize> {
        let mut pending: BTreeMap<usize, SampleResult> = BTreeMap::new();
        let mut next = 0usize;

        for (index, produced) in rx.iter() {
            let sample = match produced {
                Ok(sample) => sample,
                Err(err) => {
                    abort.store(true, Ordering::Relaxed);
                    return Err(err.in_sample(index));
                }
            };
            pending.insert(index, sample);

            while let Some(sample) = pending.remove(&next) {
                let attempts = sample.attempts;
                if attempts > 1 && sink.wants(GenerationEventKind::SampleRetried) {
                    sink.send(GenerationEvent::SampleRetried {
                        index: next,
                        attempts,
                    });
                }
                if let Err(err) = consumer.consume(next, sample, &self.mask) {
                    abort.store(true, Ordering::Relaxed);
                    return Err(err.in_sample(next));
                }
                debug!("Delivered sample {}.", next);
                if sink.wants(GenerationEventKind::SampleProduced) {
                    sink.send(GenerationEvent::SampleProduced {
                        index: next,
                        attempts,
                    });
                }
                next += 1;
            }
        }

        if next < self.config.samples {
            // Only reachable when a worker died without reporting.
            return Err(Error::Other(format!(
                "generation stopped after {next} of {} sample(s)",
                self.config.samples
            )));
        }
        Ok(next)
    }
}

#[derive(Debug, Clone, Copy)]
struct WorkerSlot {
    worker: usize,
    workers: usize,
    samples: usize,
    seed: u64,
}

fn run_worker(
    slot: WorkerSlot,
    components: &ComponentSet,
    max_attempts: usize,
    abort: &AtomicBool,
    tx: Sender<Produced>,
) {
    let mut rng = StdRng::seed_from_u64(slot.seed);
    let task = SampleTask::new(components).with_max_attempts(max_attempts);

    for index in (slot.worker..slot.samples).step_by(slot.workers) {
        if abort.load(Ordering::Relaxed) {
            debug!("Worker {} stopping early.", slot.worker);
            return;
        }
        let produced = task.produce_sample(&mut rng);
        let failed = produced.is_err();
        if tx.send((index, produced)).is_err() || failed {
            return;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generate::events::VecSink;
    use crate::layout::{ComponentArrays, Geometry, LayoutOptions, PowerDistribution};
    use crate::monitor::MonitorStrategy;
    use crate::sampling::IntensitySpec;

    fn config(workers: usize, samples: usize) -> JobConfig {
        let components = ComponentArrays::new()
            .with_component(
                Geometry::Rectangle,
                [0.02, 0.02],
                0.0,
                IntensitySpec::Uniform {
                    low: 1000.0,
                    high: 2000.0,
                },
                PowerDistribution::Uniform,
                [0.03, 0.03],
            )
            .with_component(
                Geometry::Circle,
                [0.02, 0.02],
                0.3,
                IntensitySpec::Normal {
                    mean: 500.0,
                    std: 20.0,
                },
                PowerDistribution::Gaussian,
                [0.07, 0.07],
            );
        JobConfig::new(0.1, 20)
            .with_components(components)
            .with_layout(LayoutOptions::new())
            .with_monitoring(MonitorStrategy::Random { count: 12 })
            .with_samples(samples)
            .with_workers(workers)
            .with_seed(99)
    }

    fn collect(job: &GenerationJob) -> (Vec<(usize, Vec<f64>)>, VecSink) {
        let mut seen = Vec::new();
        let mut sink = VecSink::new();
        let mut consumer = |index: usize, sample: SampleResult, mask: &MonitorMask| -> Result<()> {
            assert_eq!(mask.count(), 12);
            seen.push((index, sample.intensities));
            Ok(())
        };
        let summary = job.run(&mut consumer, &mut sink).unwrap();
        assert_eq!(summary.samples, job.config().samples);
        (seen, sink)
    }

    #[test]
    fn delivers_every_sample_in_order() {
        let job = GenerationJob::new(config(3, 10)).unwrap();
        let (seen, sink) = collect(&job);
        let indices: Vec<usize> = seen.iter().map(|(i, _)| *i).collect();
        assert_eq!(indices, (0..10).collect::<Vec<_>>());

        assert_eq!(sink.count(GenerationEventKind::JobStarted), 1);
        assert_eq!(sink.count(GenerationEventKind::MaskPlanned), 1);
        assert_eq!(sink.count(GenerationEventKind::SampleProduced), 10);
        assert_eq!(sink.count(GenerationEventKind::JobFinished), 1);
        assert_eq!(sink.count(GenerationEventKind::JobAborted), 0);
    }

    #[test]
    fn fixed_seed_and_workers_reproduce() {
        let a = collect(&GenerationJob::new(config(2, 6)).unwrap()).0;
        let b = collect(&GenerationJob::new(config(2, 6)).unwrap()).0;
        assert_eq!(a, b);

        let job = GenerationJob::new(config(2, 6)).unwrap();
        assert_eq!(job.worker_seeds().len(), 2);
        assert_ne!(job.worker_seeds()[0], job.worker_seeds()[1]);
    }

    #[test]
    fn mask_depends_only_on_seed() {
        let a = GenerationJob::new(config(1, 1)).unwrap();
        let b = GenerationJob::new(config(1, 1)).unwrap();
        assert_eq!(a.mask(), b.mask());
    }

    #[test]
    fn zero_samples_is_a_noop() {
        let job = GenerationJob::new(config(2, 0)).unwrap();
        let (seen, sink) = collect(&job);
        assert!(seen.is_empty());
        assert_eq!(sink.count(GenerationEventKind::JobFinished), 1);
    }

    #[test]
    fn overlapping_layout_aborts_the_job() {
        let mut cfg = config(2, 4);
        cfg.components = cfg.components.with_component(
            Geometry::Rectangle,
            [0.02, 0.02],
            0.0,
            IntensitySpec::fixed(1.0),
            PowerDistribution::Uniform,
            [0.03, 0.03],
        );
        let job = GenerationJob::new(cfg).unwrap();
        let mut delivered = 0;
        let mut consumer = |_: usize, _: SampleResult, _: &MonitorMask| -> Result<()> {
            delivered += 1;
            Ok(())
        };
        let mut sink = VecSink::new();
        let err = job.run(&mut consumer, &mut sink).unwrap_err();
        match err {
            Error::SampleFailed { source, .. } => {
                assert!(matches!(*source, Error::LayoutOverlap { .. }))
            }
            other => panic!("unexpected error {other:?}"),
        }
        assert_eq!(delivered, 0);
        assert_eq!(sink.count(GenerationEventKind::JobAborted), 1);
        assert_eq!(sink.count(GenerationEventKind::JobFinished), 0);
    }

    #[test]
    fn consumer_errors_stop_delivery() {
        let job = GenerationJob::new(config(2, 8)).unwrap();
        let mut seen = Vec::new();
        let mut consumer = |index: usize, _: SampleResult, _: &MonitorMask| -> Result<()> {
            if index == 3 {
                return Err(Error::Other("disk full".into()));
            }
            seen.push(index);
            Ok(())
        };
        let err = job.run(&mut consumer, &mut ()).unwrap_err();
        assert!(matches!(err, Error::SampleFailed { index: 3, .. }));
        assert_eq!(seen, vec![0, 1, 2]);
    }

    #[test]
    fn invalid_config_is_rejected_up_front() {
        assert!(GenerationJob::new(config(0, 1)).is_err());
        let mut cfg = config(1, 1);
        cfg.monitoring = MonitorStrategy::Uniform { rows: 20, cols: 1 };
        assert!(GenerationJob::new(cfg).is_err());
    }
}
