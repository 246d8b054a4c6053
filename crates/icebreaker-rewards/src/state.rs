use cosmwasm_schema::cw_serde;
use cosmwasm_std::{Addr, StdResult, Storage, Uint128};
use cw_storage_plus::Item;

#[cw_serde]
pub struct Config {
    /// CW20 token contract used as the fungible token ledger
    pub token: Addr,
    /// Funds rewards and collects ice breaker fees
    pub treasury: Addr,
    /// Reward paid to each participant on the first interaction of a pair
    pub base_reward_rate: Uint128,
    pub ice_breaker_fee: Uint128,
    /// Minimum seconds between two rewards of the same pair
    pub min_reward_interval: u64,
    /// Oracle contract that issues request ids and delivers `FulfillRequest`
    pub oracle: Addr,
    pub subscription_id: u64,
}

pub(crate) const CONFIG: Item<Config> = Item::new("config");

pub fn get_config(storage: &dyn Storage) -> StdResult<Config> {
    CONFIG.load(storage)
}

/// Apply `action` to the stored config and return `(prev, new)`.
/// Last write wins, there is no versioning.
pub(crate) fn update_config<F>(storage: &mut dyn Storage, action: F) -> StdResult<(Config, Config)>
where
    F: FnOnce(&mut Config),
{
    let prev = CONFIG.load(storage)?;
    let mut new = prev.clone();
    action(&mut new);
    CONFIG.save(storage, &new)?;
    Ok((prev, new))
}
