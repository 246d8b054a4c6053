use crate::error::ContractError;
use crate::pair::PairKey;
use cosmwasm_schema::cw_serde;
use cosmwasm_std::{StdError, StdResult, Storage, Timestamp};
use cw_storage_plus::Map;

#[cw_serde]
pub struct InteractionRecord {
    /// Completed reward cycles of the pair, only ever incremented by one
    pub interaction_count: u64,
    /// Time of the last successful reward issuance, zero if never rewarded
    pub last_reward_timestamp: Timestamp,
}

impl Default for InteractionRecord {
    fn default() -> Self {
        Self {
            interaction_count: 0,
            last_reward_timestamp: Timestamp::from_seconds(0),
        }
    }
}

impl InteractionRecord {
    /// Earliest time the pair can be rewarded again.
    pub fn next_reward_at(&self, min_reward_interval: u64) -> Timestamp {
        if self.interaction_count == 0 {
            return self.last_reward_timestamp;
        }
        self.last_reward_timestamp.plus_seconds(min_reward_interval)
    }

    pub fn assert_interval_elapsed(
        &self,
        min_reward_interval: u64,
        now: Timestamp,
    ) -> Result<(), ContractError> {
        if self.interaction_count == 0 {
            return Ok(());
        }

        let elapsed = now
            .seconds()
            .saturating_sub(self.last_reward_timestamp.seconds());
        if elapsed < min_reward_interval {
            return Err(ContractError::RewardInterval {});
        }
        Ok(())
    }
}

/// Records are created lazily and never removed.
const INTERACTIONS: Map<PairKey, InteractionRecord> = Map::new("interactions");

/// Get the record of a pair, a zero record if the pair never interacted.
pub fn get(storage: &dyn Storage, key: &PairKey) -> StdResult<InteractionRecord> {
    Ok(INTERACTIONS
        .may_load(storage, key.clone())?
        .unwrap_or_default())
}

pub(crate) fn increment_count(
    storage: &mut dyn Storage,
    key: &PairKey,
) -> StdResult<InteractionRecord> {
    let mut record = get(storage, key)?;
    record.interaction_count = record
        .interaction_count
        .checked_add(1)
        .ok_or_else(|| StdError::generic_err("interaction count overflow"))?;
    INTERACTIONS.save(storage, key.clone(), &record)?;
    Ok(record)
}

/// The timestamp of a pair only moves forward.
pub(crate) fn set_last_reward_timestamp(
    storage: &mut dyn Storage,
    key: &PairKey,
    timestamp: Timestamp,
) -> StdResult<InteractionRecord> {
    let mut record = get(storage, key)?;
    if timestamp < record.last_reward_timestamp {
        return Err(StdError::generic_err(
            "last reward timestamp cannot move backwards",
        ));
    }
    record.last_reward_timestamp = timestamp;
    INTERACTIONS.save(storage, key.clone(), &record)?;
    Ok(record)
}
