//! Core data types for the Sui transaction analyzer.

use chrono::{LocalResult, TimeZone, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Timestamp in milliseconds since Unix epoch (UTC).
pub type TimestampMs = i64;

/// Base units (MIST) per SUI.
pub const MIST_PER_SUI: f64 = 1_000_000_000.0;

/// Fully qualified coin type of the native asset.
pub const NATIVE_COIN_TYPE: &str = "0x2::sui::SUI";

/// Display symbol of the native asset.
pub const NATIVE_SYMBOL: &str = "SUI";

/// Convert base units (MIST) to display units (SUI).
///
/// The same 10^9 divisor is applied to every asset, including non-native
/// coins of unknown decimal precision. Known approximation; there is no
/// per-asset metadata lookup.
#[inline]
pub fn mist_to_sui(mist: f64) -> f64 {
    mist / MIST_PER_SUI
}

/// Whether a coin type identifier names the native asset.
///
/// Suffix match so the short (`0x2::sui::SUI`) and zero-padded long form both
/// count as native. Heuristic, not type resolution.
#[inline]
pub fn is_native_coin(coin_type: &str) -> bool {
    coin_type.ends_with("::sui::SUI")
}

/// Format an epoch-ms timestamp the way the report displays it.
pub fn format_timestamp(ts_ms: TimestampMs) -> String {
    match Utc.timestamp_millis_opt(ts_ms) {
        LocalResult::Single(dt) => dt.format("%d.%m.%Y UTC %H:%M").to_string(),
        _ => "Unknown".to_string(),
    }
}

/// One transaction block as returned by the fullnode, reduced to the fields
/// classification reads. Everything else in the RPC payload is ignored.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TransactionRecord {
    /// Transaction digest (unique identifier).
    pub digest: String,
    /// Epoch milliseconds, string-encoded on the wire.
    #[serde(deserialize_with = "de_opt_num")]
    pub timestamp_ms: Option<TimestampMs>,
    /// Input envelope; only the sender address is read.
    pub transaction: Option<TransactionEnvelope>,
    /// Execution effects; only the gas summary is read.
    pub effects: Option<TransactionEffects>,
    /// Emitted events, in execution order.
    pub events: Vec<TxEvent>,
    /// Net balance deltas per owner and coin.
    pub balance_changes: Vec<BalanceChange>,
}

impl TransactionRecord {
    /// Sender address, if the input envelope carried one.
    pub fn sender(&self) -> Option<&str> {
        self.transaction.as_ref()?.data.as_ref()?.sender.as_deref()
    }

    /// Gas summary, zeroed when effects are missing.
    pub fn gas_used(&self) -> GasUsed {
        self.effects
            .as_ref()
            .and_then(|e| e.gas_used.clone())
            .unwrap_or_default()
    }
}

/// Input envelope wrapper.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TransactionEnvelope {
    pub data: Option<TransactionData>,
}

/// Transaction input data; only the sender matters here.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TransactionData {
    pub sender: Option<String>,
}

/// Execution effects wrapper.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TransactionEffects {
    pub gas_used: Option<GasUsed>,
}

/// Gas charges in base units. The fullnode encodes these as decimal strings.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GasUsed {
    #[serde(deserialize_with = "de_u64")]
    pub computation_cost: u64,
    #[serde(deserialize_with = "de_u64")]
    pub storage_cost: u64,
    #[serde(deserialize_with = "de_u64")]
    pub storage_rebate: u64,
}

impl GasUsed {
    /// Net gas charged: computation + storage - rebate. Signed because the
    /// rebate can exceed the charges.
    #[inline]
    pub fn net_mist(&self) -> i64 {
        self.computation_cost as i64 + self.storage_cost as i64 - self.storage_rebate as i64
    }
}

/// A ledger-emitted event with its parsed payload.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TxEvent {
    #[serde(rename = "type")]
    pub event_type: String,
    #[serde(rename = "parsedJson")]
    pub parsed_json: Value,
}

/// Net delta to one owner's holdings of one coin within a transaction.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BalanceChange {
    pub owner: Owner,
    /// Signed base units, string-encoded on the wire.
    #[serde(deserialize_with = "de_i128")]
    pub amount: i128,
    pub coin_type: String,
}

impl Default for BalanceChange {
    fn default() -> Self {
        Self {
            owner: Owner::default(),
            amount: 0,
            // Absent coin types mean the native asset.
            coin_type: NATIVE_COIN_TYPE.to_string(),
        }
    }
}

/// Owner of a balance change. Only address-owned entries matter to
/// classification; the other variants exist so shared or immutable owners do
/// not reject the whole record.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Owner {
    Address {
        #[serde(rename = "AddressOwner")]
        address: String,
    },
    Object {
        #[serde(rename = "ObjectOwner")]
        object: String,
    },
    Other(Value),
}

impl Owner {
    /// Address for address-owned changes; `None` otherwise.
    pub fn address(&self) -> Option<&str> {
        match self {
            Owner::Address { address } => Some(address),
            _ => None,
        }
    }
}

impl Default for Owner {
    fn default() -> Self {
        Owner::Other(Value::Null)
    }
}

/// Semantic classification of a transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TxKind {
    /// Stake deposit to a validator (outflow).
    Stake,
    /// Stake withdrawal, principal plus rewards (inflow).
    Unstake,
    /// Outgoing transfer.
    Send,
    /// Incoming transfer.
    Receive,
    /// No net movement for the sender beyond gas.
    ContractCall,
    /// No record obtained after batch and single-record fetch attempts.
    Error,
    /// The classifier received no usable record.
    NetworkError,
    /// No classification branch matched.
    Unknown,
}

impl TxKind {
    /// Display label used in the report.
    pub fn as_str(self) -> &'static str {
        match self {
            TxKind::Stake => "Stake",
            TxKind::Unstake => "Unstake",
            TxKind::Send => "Send",
            TxKind::Receive => "Receive",
            TxKind::ContractCall => "Contract Call",
            TxKind::Error => "Error",
            TxKind::NetworkError => "Network Error",
            TxKind::Unknown => "Unknown",
        }
    }

    /// Whether this kind is one of the failure placeholders.
    pub fn is_failure(self) -> bool {
        matches!(self, TxKind::Error | TxKind::NetworkError)
    }
}

/// Classifier output for one transaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    /// Semantic kind.
    pub kind: TxKind,
    /// Principal amount in display units; negative for outflows.
    pub amount: f64,
    /// Display symbol of the principal asset.
    pub asset: String,
    /// Stake amount, populated only when the resolved validator name matched
    /// the keyword; rendered as "N/A" otherwise.
    pub target_amount: Option<f64>,
    /// Display timestamp, "Unknown" or "N/A" when unavailable.
    pub timestamp: String,
    /// Sender address, or "Unknown"/"N/A".
    pub sender: String,
    /// Recipient address, validator name, or "N/A".
    pub recipient: String,
    /// Network fee in SUI display units.
    pub gas_fee: f64,
}

impl Classification {
    /// Placeholder row for a call that reached the classifier without a
    /// record (every node exhausted).
    pub fn network_error() -> Self {
        Self {
            kind: TxKind::NetworkError,
            amount: 0.0,
            asset: NATIVE_SYMBOL.to_string(),
            target_amount: None,
            timestamp: "Unknown".to_string(),
            sender: "Unknown".to_string(),
            recipient: "N/A".to_string(),
            gas_fee: 0.0,
        }
    }

    /// Placeholder row for a digest the orchestrator could not resolve after
    /// both the batch and the single-record attempt.
    pub fn unavailable() -> Self {
        Self {
            kind: TxKind::Error,
            amount: 0.0,
            asset: NATIVE_SYMBOL.to_string(),
            target_amount: None,
            timestamp: "N/A".to_string(),
            sender: "N/A".to_string(),
            recipient: "N/A".to_string(),
            gas_fee: 0.0,
        }
    }
}

/// Wire representation of a numeric field: the fullnode mixes JSON numbers
/// and decimal strings.
#[derive(Deserialize)]
#[serde(untagged)]
enum NumRepr {
    Num(serde_json::Number),
    Str(String),
}

/// Malformed or absent numerics read as 0 so one bad field never rejects the
/// record.
fn de_u64<'de, D>(de: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<NumRepr>::deserialize(de)? {
        Some(NumRepr::Num(n)) => n.as_u64().unwrap_or(0),
        Some(NumRepr::Str(s)) => s.trim().parse().unwrap_or(0),
        None => 0,
    })
}

fn de_i128<'de, D>(de: D) -> Result<i128, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<NumRepr>::deserialize(de)? {
        Some(NumRepr::Num(n)) => n
            .as_i64()
            .map(i128::from)
            .or_else(|| n.as_u64().map(i128::from))
            .unwrap_or(0),
        Some(NumRepr::Str(s)) => s.trim().parse().unwrap_or(0),
        None => 0,
    })
}

fn de_opt_num<'de, D>(de: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<NumRepr>::deserialize(de)? {
        Some(NumRepr::Num(n)) => n.as_i64(),
        Some(NumRepr::Str(s)) => s.trim().parse().ok(),
        None => None,
    })
}
