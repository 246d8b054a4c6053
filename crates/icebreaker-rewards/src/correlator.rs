use crate::error::ContractError;
use crate::oracle;
use crate::pair::canonical_pair;
use cosmwasm_schema::cw_serde;
use cosmwasm_std::{Addr, Binary, HexBinary, StdResult, Storage, Timestamp, Uint256};
use cw_storage_plus::{Item, Key, KeyDeserialize, Map, Prefixer, PrimaryKey};
use std::fmt;

/// RequestId is the opaque identifier issued by the oracle for a submitted request.
#[cw_serde]
pub struct RequestId(pub HexBinary);

impl RequestId {
    pub fn to_hex(&self) -> String {
        self.0.to_hex()
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.to_hex())
    }
}

impl From<HexBinary> for RequestId {
    fn from(bytes: HexBinary) -> Self {
        Self(bytes)
    }
}

impl From<Vec<u8>> for RequestId {
    fn from(bytes: Vec<u8>) -> Self {
        Self(HexBinary::from(bytes))
    }
}

impl PrimaryKey<'_> for RequestId {
    type Prefix = ();
    type SubPrefix = ();
    type Suffix = Self;
    type SuperSuffix = Self;

    fn key(&self) -> Vec<Key> {
        vec![Key::Ref(self.0.as_slice())]
    }
}

impl Prefixer<'_> for RequestId {
    fn prefix(&self) -> Vec<Key> {
        vec![Key::Ref(self.0.as_slice())]
    }
}

impl KeyDeserialize for RequestId {
    type Output = Self;

    const KEY_ELEMS: u16 = 1;

    #[inline(always)]
    fn from_vec(value: Vec<u8>) -> StdResult<Self::Output> {
        Ok(RequestId(HexBinary::from(value)))
    }
}

/// ```text
/// Pending ──> Fulfilled ──> Consumed
///    │  └─────────────────────^
///    └──> Failed
/// ```
/// `Consumed` and `Failed` are terminal.
#[cw_serde]
#[derive(Copy)]
pub enum RequestStatus {
    /// Submitted to the oracle, no response yet.
    Pending,
    /// The oracle delivered a result.
    Fulfilled,
    /// The oracle reported an error, a new request is needed.
    Failed,
    /// A reward was issued for this request.
    Consumed,
}

/// Whether the oracle has answered, independent of the reward lifecycle.
/// A request can be consumed before its answer arrives.
#[cw_serde]
#[derive(Copy)]
pub enum OracleStatus {
    Awaiting,
    Fulfilled,
    Failed,
}

#[cw_serde]
pub struct PendingRequest {
    pub participant_a: Addr,
    pub participant_b: Addr,
    pub status: RequestStatus,
    pub oracle_status: OracleStatus,
    pub requested_at: Timestamp,
}

impl PendingRequest {
    /// Whether a reward can still be issued against this request.
    pub fn is_resolvable(&self) -> bool {
        matches!(
            self.status,
            RequestStatus::Pending | RequestStatus::Fulfilled
        )
    }
}

/// Requests are never removed, terminal ones stay queryable.
const REQUESTS: Map<RequestId, PendingRequest> = Map::new("requests");

/// Numeric result delivered by the oracle, kept for observation only.
const ORACLE_RESULTS: Map<RequestId, Uint256> = Map::new("oracle_results");

/// Participants of the request in flight to the oracle, until the oracle returns its id.
const INITIATING: Item<(Addr, Addr)> = Item::new("initiating");

pub enum Fulfillment {
    Fulfilled(Uint256),
    Failed(String),
}

/// First half of `initiate`: hold the participants while the oracle is asked for a request id.
pub(crate) fn stash_initiation(
    storage: &mut dyn Storage,
    participant_a: &Addr,
    participant_b: &Addr,
) -> Result<(), ContractError> {
    canonical_pair(participant_a, participant_b)?;
    INITIATING.save(storage, &(participant_a.clone(), participant_b.clone()))?;
    Ok(())
}

/// Second half of `initiate`: bind the stashed participants to the id the oracle issued.
pub(crate) fn complete_initiation(
    storage: &mut dyn Storage,
    request_id: &RequestId,
    requested_at: Timestamp,
) -> Result<PendingRequest, ContractError> {
    let (participant_a, participant_b) = INITIATING.load(storage)?;
    INITIATING.remove(storage);

    if REQUESTS.has(storage, request_id.clone()) {
        return Err(ContractError::UnexpectedRequestId {
            request_id: request_id.to_hex(),
        });
    }

    let request = PendingRequest {
        participant_a,
        participant_b,
        status: RequestStatus::Pending,
        oracle_status: OracleStatus::Awaiting,
        requested_at,
    };
    REQUESTS.save(storage, request_id.clone(), &request)?;
    Ok(request)
}

/// Get a request regardless of its status.
pub fn get_request(storage: &dyn Storage, request_id: &RequestId) -> StdResult<Option<PendingRequest>> {
    REQUESTS.may_load(storage, request_id.clone())
}

/// Get the oracle result of a fulfilled request.
pub fn get_oracle_result(storage: &dyn Storage, request_id: &RequestId) -> StdResult<Option<Uint256>> {
    ORACLE_RESULTS.may_load(storage, request_id.clone())
}

/// Look up the participants of a request that can still be rewarded.
/// The oracle response does not need to have arrived.
pub fn resolve(storage: &dyn Storage, request_id: &RequestId) -> Result<PendingRequest, ContractError> {
    get_request(storage, request_id)?
        .filter(PendingRequest::is_resolvable)
        .ok_or(ContractError::UnknownOrStaleRequest {})
}

/// Mark a resolvable request as used, it can never be resolved again.
pub(crate) fn consume(storage: &mut dyn Storage, request_id: &RequestId) -> Result<(), ContractError> {
    let mut request = resolve(storage, request_id)?;
    request.status = RequestStatus::Consumed;
    REQUESTS.save(storage, request_id.clone(), &request)?;
    Ok(())
}

/// Record the oracle's answer to a request.
/// Only the first answer is accepted, whether or not the request was already consumed.
/// A non-empty `err` fails a request that was not rewarded yet.
pub(crate) fn fulfill(
    storage: &mut dyn Storage,
    request_id: &RequestId,
    response: &Binary,
    err: &Binary,
) -> Result<Fulfillment, ContractError> {
    let mut request = get_request(storage, request_id)?
        .filter(|request| request.oracle_status == OracleStatus::Awaiting)
        .ok_or_else(|| ContractError::UnexpectedRequestId {
            request_id: request_id.to_hex(),
        })?;

    if !err.is_empty() {
        request.oracle_status = OracleStatus::Failed;
        if request.status == RequestStatus::Pending {
            request.status = RequestStatus::Failed;
        }
        REQUESTS.save(storage, request_id.clone(), &request)?;
        return Ok(Fulfillment::Failed(
            String::from_utf8_lossy(err.as_slice()).into_owned(),
        ));
    }

    let value = oracle::decode_response(response)?;
    request.oracle_status = OracleStatus::Fulfilled;
    if request.status == RequestStatus::Pending {
        request.status = RequestStatus::Fulfilled;
    }
    REQUESTS.save(storage, request_id.clone(), &request)?;
    ORACLE_RESULTS.save(storage, request_id.clone(), &value)?;
    Ok(Fulfillment::Fulfilled(value))
}
