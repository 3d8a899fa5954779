//! Event-type predicates and payload field access.
//!
//! The ledger does not enumerate its event taxonomy, so these are substring
//! heuristics over observed type names, not schema validation.

use serde_json::Value;

/// Whether an event type signals a stake deposit.
pub fn is_stake_deposit(event_type: &str) -> bool {
    event_type.contains("RequestAddStake") || event_type.contains("StakingRequest")
}

/// Whether an event type signals a stake withdrawal.
pub fn is_stake_withdrawal(event_type: &str) -> bool {
    event_type.contains("Withdraw")
        || event_type.contains("Unstake")
        || event_type.contains("UnstakingRequest")
}

/// Numeric field from an event payload. Events encode amounts as strings or
/// numbers; absent or malformed values read as 0.
pub fn payload_f64(payload: &Value, key: &str) -> f64 {
    match payload.get(key) {
        Some(Value::Number(n)) => n.as_f64().unwrap_or(0.0),
        Some(Value::String(s)) => s.trim().parse().unwrap_or(0.0),
        _ => 0.0,
    }
}

/// String field from an event payload; absent reads as "".
pub fn payload_str<'a>(payload: &'a Value, key: &str) -> &'a str {
    payload.get(key).and_then(Value::as_str).unwrap_or("")
}
