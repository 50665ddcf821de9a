use std::fmt;

use serde::Serialize;

/// How many of the latest collision gaps feed the recent average.
pub const RECENT_WINDOW: usize = 5;

/// Point-in-time statistics rendered from a [`Ledger`](crate::Ledger).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub failures:            u64,
    pub successes:           u64,
    pub collisions:          u64,
    pub distinct_collisions: u64,
    /// `None` until the first collision.
    pub mean_time_to_collide: Option<f64>,
    pub recent_gaps:          Vec<u64>,
    pub recent_mean:          Option<f64>,
}

impl Summary {
    pub(crate) fn new(
        failures: u64,
        successes: u64,
        collisions: u64,
        distinct_collisions: u64,
        time_to_collide: &[u64],
    ) -> Self {
        let recent = &time_to_collide[time_to_collide.len().saturating_sub(RECENT_WINDOW)..];
        Self {
            failures,
            successes,
            collisions,
            distinct_collisions,
            mean_time_to_collide: mean(time_to_collide),
            recent_gaps: recent.to_vec(),
            recent_mean: mean(recent),
        }
    }
}

fn mean(values: &[u64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let total: f64 = values.iter().map(|&v| v as f64).sum();
    Some(total / values.len() as f64)
}

struct Mean(Option<f64>, &'static str);

impl fmt::Display for Mean {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(value) => write!(f, "{value:.2}"),
            None => f.write_str(self.1),
        }
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Failure: {}", self.failures)?;
        writeln!(f, "Success: {}", self.successes)?;
        writeln!(f, "Collide: {}", self.collisions)?;
        writeln!(f, "Distinct-content collisions: {}", self.distinct_collisions)?;
        writeln!(
            f,
            "Average time to collision: {}",
            Mean(self.mean_time_to_collide, "no data")
        )?;
        writeln!(f, "Recent collisions: {:?}", self.recent_gaps)?;
        write!(f, "Recent average: {}", Mean(self.recent_mean, "no collisions"))
    }
}
