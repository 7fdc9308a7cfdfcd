//! Per-user voucher store: spin budget and prize history.

use chrono::NaiveDate;
use crocus_cache::{cache_key, Cache, Persisted};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::ids::UserId;
use crate::store::impl_persisted_store;
use crate::voucher::{SpinBudget, SpinEngine, SpinOutcome, SpinRecord, SpinRejection, SpinTicket, Wheel};

/// Persisted voucher state for one user.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct VoucherState {
    /// Budget as of the last resolved spin or reset.
    pub budget: Option<SpinBudget>,
    #[serde(default)]
    pub history: Vec<SpinRecord>,
}

/// A user's spin engine, persisted under `vouchers:<user id>`.
#[derive(Debug)]
pub struct VoucherStore {
    inner: Persisted<VoucherState>,
    engine: SpinEngine,
    user_id: UserId,
}

impl VoucherStore {
    /// Start with a full budget for today.
    pub fn new(cache: Cache, user_id: &UserId, wheel: Wheel, daily_spins: u32) -> Self {
        Self {
            inner: Persisted::new(cache, cache_key!("vouchers", user_id)),
            engine: SpinEngine::new(wheel, SpinBudget::for_today(daily_spins)),
            user_id: user_id.clone(),
        }
    }

    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    /// See [`SpinEngine::begin_spin`].
    pub fn begin_spin<R: Rng>(&mut self, rng: &mut R) -> Result<SpinTicket, SpinRejection> {
        self.engine.begin_spin(rng)
    }

    /// See [`SpinEngine::resolve`].
    pub fn resolve(&mut self, ticket: SpinTicket) -> Result<SpinOutcome, SpinRejection> {
        let outcome = self.engine.resolve(ticket)?;
        self.record();
        Ok(outcome)
    }

    /// Begin and immediately resolve a spin.
    pub fn spin<R: Rng>(&mut self, rng: &mut R) -> Result<SpinOutcome, SpinRejection> {
        let ticket = self.begin_spin(rng)?;
        self.resolve(ticket)
    }

    /// Refill the budget when `day` is a new day.
    pub fn reset_budget(&mut self, day: NaiveDate) -> bool {
        let reset = self.engine.reset_budget(day);
        if reset {
            self.record();
        }
        reset
    }

    pub fn engine(&self) -> &SpinEngine {
        &self.engine
    }

    fn record(&mut self) {
        self.inner.replace(VoucherState {
            budget: Some(*self.engine.budget()),
            history: self.engine.history().to_vec(),
        });
    }

    fn restore_engine(&mut self) {
        let state = self.inner.state();
        if let Some(budget) = state.budget {
            self.engine =
                SpinEngine::restore(self.engine.wheel().clone(), budget, state.history.clone());
        }
    }
}

impl_persisted_store!(VoucherStore, after_rehydrate = restore_engine);
