use std::time::Instant;

use log::info;
use rayon::prelude::*;

use crate::{exhaustive, Case, Outcome};

/// A case where A* and exhaustive search disagree.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Mismatch {
    pub id: usize,
    pub astar: Outcome,
    pub exhaustive: Outcome,
}

/// Solve every case on the rayon pool.
///
/// Results are in input order, each paired with its case id.
pub fn solve_all(cases: &[Case]) -> Vec<(usize, Outcome)> {
    let started = Instant::now();
    let results: Vec<_> = cases.par_iter().map(|case| (case.id, case.solve())).collect();
    info!("solved {} cases in {:?}", results.len(), started.elapsed());
    results
}

/// Re-solve every case by brute force and report the ones that disagree.
pub fn verify_all(cases: &[Case]) -> Vec<Mismatch> {
    let started = Instant::now();
    let mismatches: Vec<_> = cases
        .par_iter()
        .filter_map(|case| {
            let astar = case.solve();
            let exhaustive = exhaustive(&case.grid, case.start, case.end);
            (astar != exhaustive).then_some(Mismatch {
                id: case.id,
                astar,
                exhaustive,
            })
        })
        .collect();
    info!(
        "verified {} cases in {:?}, {} mismatches",
        cases.len(),
        started.elapsed(),
        mismatches.len()
    );
    mismatches
}
