use std::{sync::Arc, time::Duration};

use super::*;
use crate::{
    foundation::core::Bounds,
    raster::{
        frame::{CanvasConfig, Disposal, Repeat},
        palette::Palette,
    },
};

fn pool(n: usize) -> rayon::ThreadPool {
    rayon::ThreadPoolBuilder::new()
        .num_threads(n)
        .build()
        .unwrap()
}

fn empty_units(n: usize) -> Vec<WorkUnit<()>> {
    (0..n)
        .map(|index| WorkUnit { index, payload: () })
        .collect()
}

fn frame(index: usize, delay: u16) -> Frame {
    let palette = Arc::new(Palette::new(vec![[0, 0, 0, 255]], None).unwrap());
    Frame::new(
        index,
        Bounds::canvas(1, 1),
        palette,
        vec![0],
        delay,
        Disposal::Keep,
    )
    .unwrap()
}

#[test]
fn results_land_at_their_index_despite_completion_order() {
    let pool = pool(4);
    let coord = FrameCoordinator::new(&pool);
    let units = (0..12)
        .map(|i| WorkUnit {
            index: i,
            payload: i as u16,
        })
        .collect();
    // later units finish first
    let out = coord
        .run(units, |u| {
            std::thread::sleep(Duration::from_millis(2 * (12 - u.index as u64)));
            Ok(FrameOutcome::Replaced(frame(u.index, u.payload * 10)))
        })
        .unwrap();

    assert_eq!(out.len(), 12);
    for (i, o) in out.iter().enumerate() {
        assert_eq!(o.frame().index, i);
        assert_eq!(o.frame().delay, i as u16 * 10);
    }
}

#[test]
fn single_thread_pool_does_not_deadlock() {
    let pool = pool(1);
    let coord = FrameCoordinator::new(&pool);
    let out = coord
        .run(empty_units(5), |u| Ok(FrameOutcome::Kept(frame(u.index, 1))))
        .unwrap();
    assert_eq!(out.len(), 5);
    assert!(out.iter().all(FrameOutcome::is_kept));
}

#[test]
fn lowest_failing_index_aborts_the_run() {
    let pool = pool(3);
    let coord = FrameCoordinator::new(&pool);
    let err = coord
        .run(empty_units(8), |u| {
            if u.index == 2 || u.index == 6 {
                Err(MemeError::validation(format!("bad frame {}", u.index)))
            } else {
                Ok(FrameOutcome::Replaced(frame(u.index, 1)))
            }
        })
        .unwrap_err();
    assert_eq!(err.to_string(), "validation error: bad frame 2");
}

#[test]
#[should_panic(expected = "worker blew up")]
fn worker_panic_propagates() {
    let pool = pool(2);
    let coord = FrameCoordinator::new(&pool);
    let _ = coord.run(empty_units(3), |u| {
        if u.index == 1 {
            panic!("worker blew up");
        }
        Ok(FrameOutcome::Replaced(frame(u.index, 1)))
    });
}

#[test]
fn map_frames_keeps_metadata_and_order() {
    let pool = pool(4);
    let coord = FrameCoordinator::new(&pool);
    let seq = Sequence::new(
        (0..6).map(|i| frame(i, i as u16 + 1)).collect(),
        CanvasConfig::new(1, 1),
        Repeat::Finite(2),
    )
    .unwrap();
    let out = coord
        .map_frames(&seq, |f| {
            let mut f = f.clone();
            f.delay *= 2;
            Ok(FrameOutcome::Replaced(f))
        })
        .unwrap();
    assert_eq!(out.delays(), vec![2, 4, 6, 8, 10, 12]);
    assert_eq!(out.repeat, Repeat::Finite(2));
    assert_eq!(out.config, seq.config);
}

#[test]
fn map_frames_flags_misplaced_results() {
    let pool = pool(2);
    let coord = FrameCoordinator::new(&pool);
    let seq = Sequence::new(
        vec![frame(0, 1), frame(1, 1)],
        CanvasConfig::new(1, 1),
        Repeat::Infinite,
    )
    .unwrap();
    let err = coord
        .map_frames(&seq, |f| Ok(FrameOutcome::Replaced(frame(1 - f.index, 1))))
        .unwrap_err();
    assert!(err.to_string().starts_with("worker error"));
}
