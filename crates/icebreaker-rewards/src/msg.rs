use crate::correlator::{OracleStatus, RequestStatus};
use crate::state::Config;
use cosmwasm_schema::{cw_serde, QueryResponses};
use cosmwasm_std::{Addr, Binary, HexBinary, Timestamp, Uint128, Uint256};

#[cw_serde]
pub struct InstantiateMsg {
    /// Administrator of this contract, who can change the configuration and issue rewards
    pub admin: String,
    /// CW20 token contract used for fees, tips and rewards
    pub token: String,
    pub treasury: String,
    pub base_reward_rate: Uint128,
    pub ice_breaker_fee: Uint128,
    /// In seconds
    pub min_reward_interval: u64,
    pub oracle: String,
    pub subscription_id: u64,
}

#[cw_serde]
pub struct MigrateMsg {}

#[cw_serde]
pub enum ExecuteMsg {
    /// Pay the ice breaker fee to the treasury to start an acquaintance with `invitee`.
    /// The sender must have granted this contract a token allowance of at least the fee.
    PayIceBreakerFee { invitee: String },

    /// Send `amount` of the sender's tokens directly to `recipient`.
    /// The sender must have granted this contract a token allowance of at least `amount`.
    Tip { recipient: String, amount: Uint128 },

    /// Ask the oracle to verify an interaction between two participants.
    /// Callable by either participant or the admin.
    RequestInteractionReward {
        participant_a: String,
        participant_b: String,
        /// Ordered arguments handed to the oracle computation
        args: Vec<String>,
    },

    /// Callback of the oracle with the result (or error) of a request.
    FulfillRequest {
        request_id: HexBinary,
        response: Binary,
        err: Binary,
    },

    /// Reward both participants of a request from the treasury.
    IssueReward { request_id: HexBinary },

    SetBaseRewardRate { base_reward_rate: Uint128 },

    SetIceBreakerFee { ice_breaker_fee: Uint128 },

    SetMinRewardInterval { min_reward_interval: u64 },

    SetTreasury { treasury: String },

    SetOracle { oracle: String, subscription_id: u64 },

    TransferAdmin {
        /// See [`icebreaker_library::admin::transfer_admin`] for more information on this field
        new_admin: String,
    },

    /// Sweep the tokens held by this contract to the admin.
    Withdraw {},
}

#[cw_serde]
#[derive(QueryResponses)]
pub enum QueryMsg {
    #[returns(ConfigResponse)]
    Config {},

    #[returns(AdminResponse)]
    Admin {},

    #[returns(PairKeyResponse)]
    PairKey {
        participant_a: String,
        participant_b: String,
    },

    #[returns(InteractionResponse)]
    Interaction {
        participant_a: String,
        participant_b: String,
    },

    /// Reward a pair with `interaction_count` completed cycles would receive next
    #[returns(EstimateRewardResponse)]
    EstimateReward { interaction_count: u64 },

    #[returns(PendingRequestResponse)]
    PendingRequest { request_id: HexBinary },

    #[returns(OracleResultResponse)]
    OracleResult { request_id: HexBinary },
}

pub type ConfigResponse = Config;

#[cw_serde]
pub struct AdminResponse(pub Addr);

/// Hex encoded canonical key of the pair
#[cw_serde]
pub struct PairKeyResponse(pub String);

#[cw_serde]
pub struct InteractionResponse {
    pub interaction_count: u64,
    pub last_reward_timestamp: Timestamp,
    /// Reward each participant receives on the next cycle
    pub next_reward: Uint128,
    /// Earliest time the next cycle can be issued
    pub next_reward_at: Timestamp,
}

#[cw_serde]
pub struct EstimateRewardResponse(pub Uint128);

#[cw_serde]
pub struct PendingRequestResponse {
    pub participant_a: Addr,
    pub participant_b: Addr,
    pub status: RequestStatus,
    /// Whether the oracle answered, tracked apart from `status` since a reward can be issued first
    pub oracle_status: OracleStatus,
    pub requested_at: Timestamp,
}

/// `None` until the oracle fulfilled the request
#[cw_serde]
pub struct OracleResultResponse(pub Option<Uint256>);
