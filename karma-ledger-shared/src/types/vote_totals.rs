use serde::{Deserialize, Serialize};
use std::ops::{Add, Neg, Sub};

/// Cached running totals for one recipient.
///
/// `positive` and `negative` count the records with a value above and below
/// zero; `total` is the signed sum of all values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteTotals {
    pub recipient: String,
    pub total: i64,
    pub positive: i64,
    pub negative: i64,
}

impl VoteTotals {
    /// Folds a sequence of vote values into totals.
    ///
    /// An empty sequence gives the all-zero totals of a recipient nobody
    /// voted on.
    pub fn from_values(recipient: impl Into<String>, values: impl IntoIterator<Item = i64>) -> Self {
        let delta = values
            .into_iter()
            .fold(TallyDelta::ZERO, |acc, value| acc + TallyDelta::of_value(value));
        Self {
            recipient: recipient.into(),
            total: delta.total,
            positive: delta.positive,
            negative: delta.negative,
        }
    }
}

/// Change to apply to a recipient's totals after a ledger mutation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TallyDelta {
    pub total: i64,
    pub positive: i64,
    pub negative: i64,
}

impl TallyDelta {
    pub const ZERO: TallyDelta = TallyDelta {
        total: 0,
        positive: 0,
        negative: 0,
    };

    /// Contribution of a single stored vote.
    pub fn of_value(value: i64) -> Self {
        Self {
            total: value,
            positive: i64::from(value > 0),
            negative: i64::from(value < 0),
        }
    }

    /// Delta of replacing a stored vote with another one.
    ///
    /// `None` stands for "no record": `(None, Some(v))` is an insert and
    /// `(Some(v), None)` a deletion.
    pub fn between(previous: Option<i64>, next: Option<i64>) -> Self {
        let previous = previous.map(Self::of_value).unwrap_or_default();
        let next = next.map(Self::of_value).unwrap_or_default();
        next - previous
    }
}

impl Add for TallyDelta {
    type Output = TallyDelta;

    fn add(self, rhs: TallyDelta) -> TallyDelta {
        TallyDelta {
            total: self.total.saturating_add(rhs.total),
            positive: self.positive.saturating_add(rhs.positive),
            negative: self.negative.saturating_add(rhs.negative),
        }
    }
}

impl Sub for TallyDelta {
    type Output = TallyDelta;

    fn sub(self, rhs: TallyDelta) -> TallyDelta {
        self + -rhs
    }
}

impl Neg for TallyDelta {
    type Output = TallyDelta;

    fn neg(self) -> TallyDelta {
        TallyDelta {
            total: self.total.saturating_neg(),
            positive: self.positive.saturating_neg(),
            negative: self.negative.saturating_neg(),
        }
    }
}

/// A recipient whose cached totals disagree with the ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Divergence {
    pub recipient: String,
    /// What the cache holds, `None` when the row is missing.
    pub cached: Option<VoteTotals>,
    /// What the ledger adds up to.
    pub computed: VoteTotals,
}
