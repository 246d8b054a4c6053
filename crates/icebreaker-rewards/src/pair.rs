use crate::error::ContractError;
use cosmwasm_schema::cw_serde;
use cosmwasm_std::{Addr, HexBinary, StdResult};
use cw_storage_plus::{Key, KeyDeserialize, Prefixer, PrimaryKey};
use sha3::Digest;
use std::cmp::Ordering;
use std::fmt;

/// Order two distinct participants as `(min, max)`.
/// A participant paired with itself is never a valid interaction.
pub fn canonical_pair<'a>(a: &'a Addr, b: &'a Addr) -> Result<(&'a Addr, &'a Addr), ContractError> {
    match a.cmp(b) {
        Ordering::Less => Ok((a, b)),
        Ordering::Greater => Ok((b, a)),
        Ordering::Equal => Err(ContractError::InvalidParticipants {}),
    }
}

/// PairKey is the order independent identity of two participants,
/// a 32-byte `sha3_256(min || max)` over their address bytes.
#[cw_serde]
pub struct PairKey(pub HexBinary);

impl PairKey {
    pub fn new(a: &Addr, b: &Addr) -> Result<Self, ContractError> {
        let (first, second) = canonical_pair(a, b)?;

        let mut hasher = sha3::Sha3_256::new();
        hasher.update(first.as_bytes());
        hasher.update(second.as_bytes());

        Ok(<[u8; 32]>::from(hasher.finalize()).into())
    }

    pub fn to_hex(&self) -> String {
        self.0.to_hex()
    }
}

impl fmt::Display for PairKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.to_hex())
    }
}

impl From<[u8; 32]> for PairKey {
    fn from(bytes: [u8; 32]) -> Self {
        Self(HexBinary::from(bytes))
    }
}

impl PrimaryKey<'_> for PairKey {
    type Prefix = ();
    type SubPrefix = ();
    type Suffix = Self;
    type SuperSuffix = Self;

    fn key(&self) -> Vec<Key> {
        vec![Key::Ref(self.0.as_slice())]
    }
}

impl Prefixer<'_> for PairKey {
    fn prefix(&self) -> Vec<Key> {
        vec![Key::Ref(self.0.as_slice())]
    }
}

impl KeyDeserialize for PairKey {
    type Output = Self;

    const KEY_ELEMS: u16 = 1;

    #[inline(always)]
    fn from_vec(value: Vec<u8>) -> StdResult<Self::Output> {
        Ok(PairKey(HexBinary::from(value)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cosmwasm_std::testing::mock_dependencies;

    #[test]
    fn test_symmetric() {
        let deps = mock_dependencies();

        for (a, b) in [("alice", "bob"), ("bob", "carol"), ("zed", "amy")] {
            let a = deps.api.addr_make(a);
            let b = deps.api.addr_make(b);
            assert_eq!(PairKey::new(&a, &b).unwrap(), PairKey::new(&b, &a).unwrap());
        }
    }

    #[test]
    fn test_self_pair_rejected() {
        let deps = mock_dependencies();
        let alice = deps.api.addr_make("alice");

        assert_eq!(
            PairKey::new(&alice, &alice),
            Err(ContractError::InvalidParticipants {})
        );
        assert_eq!(
            canonical_pair(&alice, &alice),
            Err(ContractError::InvalidParticipants {})
        );
    }

    #[test]
    fn test_distinct_pairs_distinct_keys() {
        let deps = mock_dependencies();
        let alice = deps.api.addr_make("alice");
        let bob = deps.api.addr_make("bob");
        let carol = deps.api.addr_make("carol");

        let ab = PairKey::new(&alice, &bob).unwrap();
        let ac = PairKey::new(&alice, &carol).unwrap();
        let bc = PairKey::new(&bob, &carol).unwrap();
        assert_ne!(ab, ac);
        assert_ne!(ab, bc);
        assert_ne!(ac, bc);
    }

    #[test]
    fn test_canonical_order() {
        let a = Addr::unchecked("a");
        let b = Addr::unchecked("b");

        assert_eq!(canonical_pair(&a, &b).unwrap(), (&a, &b));
        assert_eq!(canonical_pair(&b, &a).unwrap(), (&a, &b));
    }

    #[test]
    fn test_hash_of_ordered_concatenation() {
        let a = Addr::unchecked("a");
        let b = Addr::unchecked("b");

        let key = PairKey::new(&b, &a).unwrap();

        let expected: [u8; 32] = sha3::Sha3_256::digest(b"ab").into();
        assert_eq!(key, PairKey::from(expected));
        assert_eq!(key.to_hex().len(), 64);
        assert_eq!(key.to_string(), key.to_hex());
    }
}
