use cosmwasm_std::Uint128;

/// Reward paid to each participant of a pair for its next interaction cycle.
///
/// The first cycle pays the full `base_rate`, every following cycle pays
/// `base_rate / (interaction_count + 1)`, floored.
pub fn reward(base_rate: Uint128, interaction_count: u64) -> Uint128 {
    if interaction_count == 0 {
        return base_rate;
    }
    base_rate / Uint128::new(u128::from(interaction_count) + 1)
}
