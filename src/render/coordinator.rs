use crate::{
    foundation::error::{MemeError, MemeResult},
    raster::frame::{Frame, FrameOutcome, Sequence},
};

/// Input for one worker, tagged with the index its result must land at.
#[derive(Clone, Debug)]
pub struct WorkUnit<T> {
    pub index: usize,
    pub payload: T,
}

struct Completed {
    index: usize,
    outcome: MemeResult<FrameOutcome>,
}

/// Fans independent per-frame work out over a rayon pool and reassembles it by index.
///
/// Only stateless passes go through here; passes with a shared accumulation canvas run as
/// plain loops.
pub struct FrameCoordinator<'p> {
    pool: &'p rayon::ThreadPool,
}

impl<'p> FrameCoordinator<'p> {
    pub fn new(pool: &'p rayon::ThreadPool) -> Self {
        Self { pool }
    }

    /// Run `worker` once per unit and return the outcomes in unit order.
    ///
    /// Completion order is arbitrary; each result is placed at its unit's index. Exactly
    /// `units.len()` results are collected. The first failing unit (lowest index) aborts the
    /// run; a worker panic propagates to the caller.
    pub fn run<T, F>(&self, units: Vec<WorkUnit<T>>, worker: F) -> MemeResult<Vec<FrameOutcome>>
    where
        T: Send,
        F: Fn(WorkUnit<T>) -> MemeResult<FrameOutcome> + Sync,
    {
        let n = units.len();
        let (tx, rx) = crossbeam_channel::unbounded::<Completed>();
        let worker = &worker;

        self.pool.install(|| {
            rayon::scope(|s| {
                for unit in units {
                    let tx = tx.clone();
                    s.spawn(move |_| {
                        let index = unit.index;
                        let outcome = worker(unit);
                        // the receiver outlives the scope
                        let _ = tx.send(Completed { index, outcome });
                    });
                }
            });
        });
        drop(tx);

        let mut slots: Vec<Option<FrameOutcome>> = (0..n).map(|_| None).collect();
        let mut failure: Option<(usize, MemeError)> = None;
        for received in 0..n {
            let Completed { index, outcome } = rx.recv().map_err(|_| {
                MemeError::worker(format!("channel closed after {received} of {n} results"))
            })?;
            let slot = slots
                .get_mut(index)
                .ok_or_else(|| MemeError::worker(format!("result index {index} out of range")))?;
            match outcome {
                Ok(o) => *slot = Some(o),
                Err(e) => {
                    if failure.as_ref().is_none_or(|(i, _)| index < *i) {
                        failure = Some((index, e));
                    }
                }
            }
        }
        if let Some((index, e)) = failure {
            tracing::debug!(index, error = %e, "frame worker failed");
            return Err(e);
        }

        slots
            .into_iter()
            .enumerate()
            .map(|(i, o)| o.ok_or_else(|| MemeError::worker(format!("no result for frame {i}"))))
            .collect()
    }

    /// Transform every frame of `seq` independently, keeping its canvas and loop metadata.
    pub fn map_frames<F>(&self, seq: &Sequence, worker: F) -> MemeResult<Sequence>
    where
        F: Fn(&Frame) -> MemeResult<FrameOutcome> + Sync,
    {
        let units = seq
            .frames
            .iter()
            .map(|f| WorkUnit {
                index: f.index,
                payload: f,
            })
            .collect();
        let outcomes = self.run(units, |u| worker(u.payload))?;
        let kept = outcomes.iter().filter(|o| o.is_kept()).count();
        if kept > 0 {
            tracing::debug!(kept, "frames passed through unchanged");
        }

        let out = Sequence {
            frames: outcomes.into_iter().map(FrameOutcome::into_frame).collect(),
            config: seq.config,
            repeat: seq.repeat,
        };
        out.check_order()?;
        Ok(out)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/coordinator.rs"]
mod tests;
