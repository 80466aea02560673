//! The scout query: coarse scan, clustering, refinement.

use super::cancel::CancellationToken;
use super::category::LifeCategory;
use super::cluster::cluster_hot_zones;
use super::config::ScoutConfig;
use super::grid::{generate_coarse_grid, rank_order, zone_grids, GridPoint, ScoredGridPoint};
use super::influence::ScoutLines;
use crate::error::{AstroError, Result};
use log::{debug, info};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use uuid::Uuid;

/// Coarse points scored between cancellation checks.
const COARSE_CHUNK: usize = 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoutPhase {
    CoarseScan,
    Cluster,
    Refine,
    Done,
}

/// Outcome of a complete query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoutResult {
    pub run_id: Uuid,
    pub category: Option<LifeCategory>,
    pub coarse_point_count: usize,
    pub hot_zones: Vec<ScoredGridPoint>,
    /// Refined points, best first
    pub points: Vec<ScoredGridPoint>,
}

impl ScoutResult {
    pub fn best(&self) -> Option<&ScoredGridPoint> {
        self.points.first()
    }
}

/// Runs one scout query over a fixed set of lines.
#[derive(Debug)]
pub struct GridScorer {
    lines: ScoutLines,
    config: ScoutConfig,
    cancel: CancellationToken,
    phase: ScoutPhase,
    run_id: Uuid,
}

impl GridScorer {
    pub fn new(lines: ScoutLines, config: ScoutConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            lines,
            config,
            cancel: CancellationToken::new(),
            phase: ScoutPhase::CoarseScan,
            run_id: Uuid::new_v4(),
        })
    }

    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn phase(&self) -> ScoutPhase {
        self.phase
    }

    pub fn run_id(&self) -> Uuid {
        self.run_id
    }

    pub fn config(&self) -> &ScoutConfig {
        &self.config
    }

    fn score_point(&self, p: GridPoint) -> ScoredGridPoint {
        ScoredGridPoint {
            point: p,
            score: self.lines.score(p, &self.config.scoring),
        }
    }

    /// Scores the whole coarse grid.
    pub fn coarse_scan(&mut self) -> Result<Vec<ScoredGridPoint>> {
        self.phase = ScoutPhase::CoarseScan;
        let grid = generate_coarse_grid(self.config.coarse_step, self.config.exclude_water)?;
        debug!(
            "[{}] coarse scan of {} points against {} lines",
            self.run_id,
            grid.len(),
            self.lines.len()
        );

        let this = &*self;
        let chunks: Vec<Vec<ScoredGridPoint>> = grid
            .par_chunks(COARSE_CHUNK)
            .map(|chunk| -> Result<Vec<ScoredGridPoint>> {
                this.cancel.check()?;
                Ok(chunk.iter().map(|&p| this.score_point(p)).collect())
            })
            .collect::<Result<_>>()?;
        Ok(chunks.into_iter().flatten().collect())
    }

    pub fn cluster(&mut self, coarse: &[ScoredGridPoint]) -> Vec<ScoredGridPoint> {
        self.phase = ScoutPhase::Cluster;
        let zones = cluster_hot_zones(coarse, self.config.top_n_coarse, self.config.cluster_radius_deg);
        debug!("[{}] {} hot zones from {} coarse points", self.run_id, zones.len(), coarse.len());
        zones
    }

    /// Rescores the fine grid around each zone, best first.
    pub fn refine(&mut self, hot_zones: &[ScoredGridPoint]) -> Result<Vec<ScoredGridPoint>> {
        self.phase = ScoutPhase::Refine;
        let centres: Vec<GridPoint> = hot_zones.iter().map(|z| z.point).collect();
        let grids = zone_grids(&centres, &self.config)?;
        debug!(
            "[{}] refining {} zones, {} unique points",
            self.run_id,
            grids.len(),
            grids.iter().map(Vec::len).sum::<usize>()
        );

        let this = &*self;
        let zones: Vec<Vec<ScoredGridPoint>> = grids
            .par_iter()
            .map(|grid| -> Result<Vec<ScoredGridPoint>> {
                this.cancel.check()?;
                Ok(grid.iter().map(|&p| this.score_point(p)).collect())
            })
            .collect::<Result<_>>()?;

        let mut points: Vec<ScoredGridPoint> = zones.into_iter().flatten().collect();
        points.sort_by(rank_order);
        Ok(points)
    }

    /// Runs every phase to completion, or returns [`AstroError::Cancelled`].
    pub fn run(mut self) -> Result<ScoutResult> {
        let started = Instant::now();
        let coarse = self.coarse_scan()?;
        let hot_zones = self.cluster(&coarse);
        self.cancel.check()?;
        let points = self.refine(&hot_zones)?;
        self.cancel.check()?;
        self.phase = ScoutPhase::Done;

        info!(
            "[{}] scout finished in {:?}: {} coarse points, {} hot zones, {} refined points, best {:.1}",
            self.run_id,
            started.elapsed(),
            coarse.len(),
            hot_zones.len(),
            points.len(),
            points.first().map(|p| p.overall()).unwrap_or(0.0)
        );

        Ok(ScoutResult {
            run_id: self.run_id,
            category: self.lines.category(),
            coarse_point_count: coarse.len(),
            hot_zones,
            points,
        })
    }
}

/// Runs a scout query on the blocking pool.
pub async fn run_scout_task(
    lines: ScoutLines,
    config: ScoutConfig,
    cancel: CancellationToken,
) -> Result<ScoutResult> {
    let scorer = GridScorer::new(lines, config)?.with_cancellation(cancel);
    tokio::task::spawn_blocking(move || scorer.run())
        .await
        .map_err(|e| AstroError::TaskFailed { message: e.to_string() })?
}
