use rand::Rng;
use thiserror::Error;

/// Per-entry jitter added to the even share before renormalizing.
const JITTER_LOW: f64 = -0.5;
const JITTER_HIGH: f64 = 1.5;

/// Rough shares never drop below this fraction of the even share.
const MIN_SHARE_FRACTION: f64 = 0.1;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum AllocationError {
    #[error("target total must be a positive number of hours, got {0}")]
    InvalidTarget(f64),
    #[error("variation must be at least 0 and below the target total, got {0}")]
    InvalidVariation(f64),
    #[error("effective total of {effective_total} hours cannot be spread over {count} entries")]
    Degenerate { effective_total: f64, count: usize },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AllocationRequest {
    count: usize,
    target_total: f64,
    variation: f64,
}

impl AllocationRequest {
    /// `variation` must stay below `target_total` so the drawn total is
    /// always positive.
    pub fn new(count: usize, target_total: f64, variation: f64) -> Result<Self, AllocationError> {
        if !target_total.is_finite() || target_total <= 0.0 {
            return Err(AllocationError::InvalidTarget(target_total));
        }
        if !variation.is_finite() || variation < 0.0 || variation >= target_total {
            return Err(AllocationError::InvalidVariation(variation));
        }

        Ok(Self {
            count,
            target_total,
            variation,
        })
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn target_total(&self) -> f64 {
        self.target_total
    }

    pub fn variation(&self) -> f64 {
        self.variation
    }
}

/// Durations in hours, one per entry, summing to `effective_total`.
#[derive(Debug, Clone, PartialEq)]
pub struct Allocation {
    durations: Vec<f64>,
    effective_total: f64,
}

impl Allocation {
    pub fn len(&self) -> usize {
        self.durations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.durations.is_empty()
    }

    /// Unrounded durations.
    pub fn durations(&self) -> &[f64] {
        &self.durations
    }

    /// The randomized total that was drawn for this allocation.
    pub fn effective_total(&self) -> f64 {
        self.effective_total
    }

    /// Durations rounded to two decimals.
    ///
    /// Plain rounding can drift up to half a cent per entry, so leftover cents
    /// go to the entries with the largest remainders. The result sums to the
    /// effective total rounded to cents.
    ///
    /// When the total holds at least one cent per entry, no entry rounds down
    /// to zero; the cents it needs are taken from the largest entries.
    pub fn rounded(&self) -> Vec<f64> {
        if self.durations.is_empty() {
            return Vec::new();
        }

        let target_cents = (self.effective_total * 100.0).round() as i64;
        let min_cents = if target_cents >= self.durations.len() as i64 {
            1
        } else {
            0
        };
        let mut cents: Vec<i64> = self
            .durations
            .iter()
            .map(|duration| ((duration * 100.0).floor() as i64).max(min_cents))
            .collect();

        let mut remainders: Vec<(usize, f64)> = self
            .durations
            .iter()
            .zip(&cents)
            .enumerate()
            .map(|(i, (duration, rounded))| (i, duration * 100.0 - *rounded as f64))
            .collect();
        remainders.sort_by(|a, b| b.1.total_cmp(&a.1));

        let shortfall = target_cents - cents.iter().sum::<i64>();
        if shortfall >= 0 {
            let shortfall = usize::try_from(shortfall).unwrap_or(0);
            for (i, _) in remainders.into_iter().take(shortfall) {
                cents[i] += 1;
            }
        } else {
            for _ in 0..shortfall.unsigned_abs() {
                // The sum exceeds `target_cents >= len`, so some entry is above one cent.
                let Some(largest) = (0..cents.len()).max_by_key(|&i| cents[i]) else {
                    break;
                };
                cents[largest] -= 1;
            }
        }

        cents.into_iter().map(|c| c as f64 / 100.0).collect()
    }
}

/// Spreads a randomized total over `request.count()` entries.
///
/// The total is `target ± variation`. Each entry first gets the even share
/// plus a small asymmetric jitter, then every share is scaled so the sum hits
/// the drawn total exactly. The aggregate is what ends up on an invoice, so it
/// wins over any single entry's value.
pub fn allocate<R: Rng + ?Sized>(
    request: &AllocationRequest,
    rng: &mut R,
) -> Result<Allocation, AllocationError> {
    if request.count == 0 {
        return Ok(Allocation {
            durations: Vec::new(),
            effective_total: request.target_total,
        });
    }

    let effective_total =
        request.target_total + rng.gen_range(-request.variation..=request.variation);
    if effective_total <= 0.0 {
        return Err(AllocationError::Degenerate {
            effective_total,
            count: request.count,
        });
    }

    let base = effective_total / request.count as f64;
    let floor = base * MIN_SHARE_FRACTION;
    let rough: Vec<f64> = (0..request.count)
        .map(|_| (base + rng.gen_range(JITTER_LOW..JITTER_HIGH)).max(floor))
        .collect();

    let scale = effective_total / rough.iter().sum::<f64>();
    let durations: Vec<f64> = rough.into_iter().map(|share| share * scale).collect();

    tracing::debug!(
        "Allocated {:.2} hours over {} entries (target {}, variation {})",
        effective_total,
        request.count,
        request.target_total,
        request.variation
    );

    Ok(Allocation {
        durations,
        effective_total,
    })
}
