//! Spin state machine, daily budget and prize history.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use chrono::{NaiveDate, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use crate::ids::SpinId;
use crate::voucher::{Wheel, WheelSegment};

/// Spins granted per user per day.
pub const DEFAULT_DAILY_SPINS: u32 = 3;

/// Full turns before the wheel settles: 3 to 5.
const MIN_TURNS: u32 = 3;
const EXTRA_TURNS: u32 = 3;

/// Random bytes in a voucher code.
const CODE_BYTES: usize = 6;

/// Why a spin request was refused. The engine state is unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SpinRejection {
    #[error("no spins remaining today")]
    NoSpinsRemaining,
    #[error("a spin is already in progress")]
    AlreadySpinning,
    #[error("no spin is in progress")]
    NotSpinning,
    #[error("ticket does not belong to the spin in progress")]
    StaleTicket,
}

/// Engine phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpinPhase {
    Idle,
    Resolving,
}

/// Remaining spins for one user on one day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpinBudget {
    pub day: NaiveDate,
    pub remaining: u32,
    pub daily_allowance: u32,
}

impl SpinBudget {
    /// A full budget for `day`.
    pub fn new(daily_allowance: u32, day: NaiveDate) -> Self {
        Self {
            day,
            remaining: daily_allowance,
            daily_allowance,
        }
    }

    /// A full budget for the current UTC day.
    pub fn for_today(daily_allowance: u32) -> Self {
        Self::new(daily_allowance, Utc::now().date_naive())
    }

    pub fn is_exhausted(&self) -> bool {
        self.remaining == 0
    }

    /// Refill for a new day. Returns `false` if `day` is not after the
    /// budget's current day.
    pub fn reset_for(&mut self, day: NaiveDate) -> bool {
        if day <= self.day {
            return false;
        }
        self.day = day;
        self.remaining = self.daily_allowance;
        true
    }

    fn consume(&mut self) {
        self.remaining = self.remaining.saturating_sub(1);
    }
}

/// Handle for a spin in progress, carrying where the wheel will stop.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpinTicket {
    seq: u64,
    rotation: f64,
}

impl SpinTicket {
    /// Total rotation in degrees, for animating the wheel.
    pub fn rotation(&self) -> f64 {
        self.rotation
    }
}

/// Whether a history entry earned a voucher.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpinRecordStatus {
    /// Voucher issued.
    Claimed,
    /// Landed on a no-prize segment.
    Lost,
}

/// One resolved spin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpinRecord {
    pub id: SpinId,
    pub date: NaiveDate,
    /// Segment label.
    pub prize: String,
    /// Voucher code, for winning spins.
    pub code: Option<String>,
    pub status: SpinRecordStatus,
}

/// Result of a resolved spin.
#[derive(Debug, Clone, PartialEq)]
pub struct SpinOutcome {
    /// Index of the winning segment.
    pub index: usize,
    pub segment: WheelSegment,
    pub rotation: f64,
    pub record: SpinRecord,
    /// Spins left after this one.
    pub remaining: u32,
}

struct PendingSpin {
    ticket: SpinTicket,
    code: String,
}

/// The promotional wheel: Idle, then Resolving while the wheel turns, then
/// Idle again with one spin fewer.
pub struct SpinEngine {
    wheel: Wheel,
    budget: SpinBudget,
    pending: Option<PendingSpin>,
    next_seq: u64,
    history: Vec<SpinRecord>,
}

impl SpinEngine {
    pub fn new(wheel: Wheel, budget: SpinBudget) -> Self {
        Self::restore(wheel, budget, Vec::new())
    }

    /// Rebuild an idle engine from a saved budget and history.
    ///
    /// Ticket numbering continues after the recorded spins.
    pub fn restore(wheel: Wheel, budget: SpinBudget, history: Vec<SpinRecord>) -> Self {
        Self {
            wheel,
            budget,
            pending: None,
            next_seq: history.len() as u64,
            history,
        }
    }

    /// Start a spin and pick where the wheel stops.
    pub fn begin_spin<R: Rng>(&mut self, rng: &mut R) -> Result<SpinTicket, SpinRejection> {
        if self.pending.is_some() {
            return Err(SpinRejection::AlreadySpinning);
        }
        if self.budget.is_exhausted() {
            return Err(SpinRejection::NoSpinsRemaining);
        }

        let turns = MIN_TURNS + rng.gen_range(0..EXTRA_TURNS);
        let angle: f64 = rng.gen_range(0.0..360.0);
        let rotation = f64::from(turns) * 360.0 + angle;

        let bytes: [u8; CODE_BYTES] = rng.gen();
        let code = format!("CROCUS-{}", URL_SAFE_NO_PAD.encode(bytes));

        let ticket = SpinTicket {
            seq: self.next_seq,
            rotation,
        };
        self.next_seq += 1;
        self.pending = Some(PendingSpin { ticket, code });
        debug!(rotation, "spin started");
        Ok(ticket)
    }

    /// Settle the spin in progress and spend one spin from the budget.
    pub fn resolve(&mut self, ticket: SpinTicket) -> Result<SpinOutcome, SpinRejection> {
        let pending = self.pending.take().ok_or(SpinRejection::NotSpinning)?;
        if pending.ticket.seq != ticket.seq {
            self.pending = Some(pending);
            return Err(SpinRejection::StaleTicket);
        }
        let PendingSpin { ticket, code } = pending;

        let index = self.wheel.index_at(ticket.rotation);
        let segment = self.wheel.segments()[index].clone();
        let won = segment.reward.is_win();

        let record = SpinRecord {
            id: SpinId::generate(),
            date: Utc::now().date_naive(),
            prize: segment.label.clone(),
            code: won.then_some(code),
            status: if won {
                SpinRecordStatus::Claimed
            } else {
                SpinRecordStatus::Lost
            },
        };
        self.history.push(record.clone());
        self.budget.consume();

        info!(prize = %segment.label, won, remaining = self.budget.remaining, "spin resolved");
        Ok(SpinOutcome {
            index,
            segment,
            rotation: ticket.rotation,
            record,
            remaining: self.budget.remaining,
        })
    }

    /// Begin and immediately resolve a spin.
    pub fn spin<R: Rng>(&mut self, rng: &mut R) -> Result<SpinOutcome, SpinRejection> {
        let ticket = self.begin_spin(rng)?;
        self.resolve(ticket)
    }

    pub fn phase(&self) -> SpinPhase {
        if self.pending.is_some() {
            SpinPhase::Resolving
        } else {
            SpinPhase::Idle
        }
    }

    pub fn is_spinning(&self) -> bool {
        self.phase() == SpinPhase::Resolving
    }

    pub fn remaining(&self) -> u32 {
        self.budget.remaining
    }

    pub fn budget(&self) -> &SpinBudget {
        &self.budget
    }

    /// Refill the budget for a new day; see [`SpinBudget::reset_for`].
    pub fn reset_budget(&mut self, day: NaiveDate) -> bool {
        self.budget.reset_for(day)
    }

    pub fn wheel(&self) -> &Wheel {
        &self.wheel
    }

    /// Resolved spins, oldest first.
    pub fn history(&self) -> &[SpinRecord] {
        &self.history
    }
}

impl std::fmt::Debug for SpinEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SpinEngine")
            .field("segments", &self.wheel.len())
            .field("budget", &self.budget)
            .field("phase", &self.phase())
            .field("history", &self.history.len())
            .finish()
    }
}
