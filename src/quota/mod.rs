//! Quota allocation between the two backends
//!
//! Pure arithmetic: given the requested total and whether the primary
//! backend is configured, split the total into per-backend shares.

/// Per-backend share of a requested result count
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuotaSplit {
    pub primary: usize,
    pub secondary: usize,
}

impl QuotaSplit {
    pub fn total(&self) -> usize {
        self.primary + self.secondary
    }
}

/// Default share of the total routed to the primary backend when configured
pub const PRIMARY_SHARE: f64 = 0.7;

/// Compute per-backend quotas with the default primary share.
pub fn allocate(total: usize, primary_configured: bool) -> QuotaSplit {
    allocate_weighted(total, primary_configured, PRIMARY_SHARE)
}

/// Compute per-backend quotas for a configured primary weight.
///
/// The primary backend always receives at least one unit whenever it is
/// configured and the total is positive, even for small totals; the
/// secondary backend receives the remainder rather than a proportional
/// share.
pub fn allocate_weighted(total: usize, primary_configured: bool, weight: f64) -> QuotaSplit {
    if total < 1 {
        return QuotaSplit {
            primary: 0,
            secondary: 0,
        };
    }

    if !primary_configured {
        return QuotaSplit {
            primary: 0,
            secondary: total,
        };
    }

    let primary = ((total as f64 * weight).floor() as usize)
        .max(1)
        .min(total);
    QuotaSplit {
        primary,
        secondary: total - primary,
    }
}
