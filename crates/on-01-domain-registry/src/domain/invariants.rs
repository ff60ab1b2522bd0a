//! # Domain Invariants
//!
//! Business rules for the Domain Registry.

use super::entities::{DomainInfo, DomainRecord};
use super::errors::RegistryError;
use shared_types::{Address, Amount, ChainId, Timestamp};

/// Invariant: attached payment covers the fee.
///
/// Returns the excess to refund.
pub fn invariant_payment_covers(required: Amount, provided: Amount) -> Result<Amount, RegistryError> {
    provided
        .checked_sub(required)
        .ok_or(RegistryError::InsufficientPayment { required, provided })
}

/// Invariant: only the recorded owner acts on a live record.
pub fn invariant_owner(
    record: &DomainRecord,
    caller: Address,
    now: Timestamp,
) -> Result<(), RegistryError> {
    if record.owner.is_zero() || record.owner != caller {
        return Err(RegistryError::NotOwner {
            name: record.name.to_string(),
            caller,
        });
    }
    if record.is_expired(now) {
        return Err(RegistryError::Expired(record.name.to_string()));
    }
    Ok(())
}

/// Invariant: a name may only be created where no live copy exists.
///
/// A departed tombstone blocks local registration whatever its expiry; only a
/// restore or an inbound mint replaces it.
pub fn invariant_available(existing: Option<&DomainRecord>, now: Timestamp) -> bool {
    existing.map_or(true, |r| !r.is_departed() && r.is_expired(now))
}

/// Invariant: an inbound mint never lands on a live record.
pub fn invariant_mint_target_vacant(
    existing: Option<&DomainRecord>,
    now: Timestamp,
) -> Result<(), RegistryError> {
    match existing {
        Some(r) if r.is_live(now) => Err(RegistryError::AlreadyRegistered(r.name.to_string())),
        _ => Ok(()),
    }
}

/// Invariant: at most one chain reports a live copy of a name.
///
/// `views` holds one `get_domain_info` result per chain, read at the same
/// logical moment.
pub fn invariant_single_live_copy(views: &[(ChainId, DomainInfo)]) -> bool {
    views.iter().filter(|(_, info)| info.is_live()).count() <= 1
}
