//! Sweep driver
//!
//! Every trial owns its `RunState` and an `StdRng` seeded from the sweep
//! seed, the point index and the trial index, so a table does not depend
//! on the number of workers.

use crossbeam_channel::unbounded;
use netda_core::MarketConfig;
use netda_runner::{RunnerResult, WelfareRatios, generate, solve};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::thread;

use crate::config::SweepConfig;
use crate::error::{SweepError, SweepResult};
use crate::table::ResultTable;

/// Seed of one trial
pub fn trial_seed(base: u64, point_index: usize, trials: usize, trial: usize) -> u64 {
    base.wrapping_add((point_index * trials + trial) as u64)
}

/// Generate and solve one instance, returning its welfare ratios
pub fn run_trial(market: &MarketConfig, seed: u64) -> RunnerResult<WelfareRatios> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut state = generate(market, &mut rng)?;
    let report = solve(&mut state)?;
    Ok(report.ratios())
}

/// Runs a validated sweep
#[derive(Debug, Clone)]
pub struct SweepRunner {
    config: SweepConfig,
}

impl SweepRunner {
    pub fn new(config: SweepConfig) -> SweepResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &SweepConfig {
        &self.config
    }

    /// Run every point and collect the averaged ratios
    pub fn run(&self) -> SweepResult<ResultTable> {
        let points = self.config.points();
        let mut table = ResultTable::new(self.config.parameter);

        log::info!(
            "Sweeping {} over {} points, {} trials each, {} workers",
            self.config.parameter.name(),
            points.len(),
            self.config.trials,
            self.config.worker_count()
        );

        for (index, value) in points.into_iter().enumerate() {
            let market = self.config.parameter.apply(&self.config.market, value);
            let averages = self.run_point(&market, index)?;

            log::info!(
                "{}={} optimal={:.4} static={:.4} dynamic={:.4}",
                self.config.parameter.name(),
                value,
                averages.optimal,
                averages.static_mtr,
                averages.dynamic
            );
            table.push(value, averages);
        }

        Ok(table)
    }

    /// Average the ratios of all trials of one point
    pub fn run_point(
        &self,
        market: &MarketConfig,
        point_index: usize,
    ) -> SweepResult<WelfareRatios> {
        let trials = self.config.trials;
        let workers = self.config.worker_count();
        let seed = self.config.seed;

        let (tx, rx) = unbounded();

        thread::scope(|scope| {
            for worker in 0..workers {
                let tx = tx.clone();
                scope.spawn(move || {
                    for trial in (worker..trials).step_by(workers) {
                        let seed = trial_seed(seed, point_index, trials, trial);
                        let result = run_trial(market, seed);
                        if tx.send((trial, result)).is_err() {
                            break;
                        }
                    }
                });
            }
        });
        drop(tx);

        let mut results: Vec<(usize, RunnerResult<WelfareRatios>)> = rx.iter().collect();
        if results.len() != trials {
            return Err(SweepError::MissingTrials {
                received: results.len(),
                expected: trials,
            });
        }
        results.sort_by_key(|(trial, _)| *trial);

        let mut sum = WelfareRatios::default();
        for (trial, result) in results {
            let ratios = result.map_err(|source| SweepError::Trial { trial, source })?;
            sum.optimal += ratios.optimal;
            sum.static_mtr += ratios.static_mtr;
            sum.dynamic += ratios.dynamic;
        }

        let n = trials as f64;
        Ok(WelfareRatios {
            optimal: sum.optimal / n,
            static_mtr: sum.static_mtr / n,
            dynamic: sum.dynamic / n,
        })
    }
}
