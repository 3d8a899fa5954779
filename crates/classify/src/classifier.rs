//! Transaction classification.
//!
//! Maps one raw transaction record to its semantic classification using a
//! strict precedence: staking events first, balance-change reconciliation
//! second, contract-call fallback last.

use analyzer_core::{
    format_timestamp, is_native_coin, mist_to_sui, BalanceChange, Classification,
    TransactionRecord, TxEvent, TxKind, ValidatorDirectory, NATIVE_SYMBOL,
};

use crate::events::{is_stake_deposit, is_stake_withdrawal, payload_f64, payload_str};

/// Classify one transaction record.
///
/// `record` is `None` when the fetch layer exhausted every node; that is the
/// only input producing [`TxKind::NetworkError`]. `keyword` conditions the
/// target amount: a stake whose resolved validator name contains it
/// (case-insensitively) carries the staked amount in `target_amount`.
///
/// Pure: no I/O, no mutation of inputs, identical output for identical
/// inputs. Missing fields degrade to placeholder values, never to a panic.
pub fn classify(
    record: Option<&TransactionRecord>,
    directory: &ValidatorDirectory,
    keyword: &str,
) -> Classification {
    let Some(record) = record else {
        return Classification::network_error();
    };

    let timestamp = record
        .timestamp_ms
        .map(format_timestamp)
        .unwrap_or_else(|| "Unknown".to_string());
    let sender = record.sender().unwrap_or("Unknown").to_string();
    let net_gas = record.gas_used().net_mist();
    let gas_fee = mist_to_sui(net_gas as f64);

    // Staking events take priority; the first match ends the scan.
    for event in &record.events {
        if is_stake_deposit(&event.event_type) {
            return classify_stake(event, directory, keyword, timestamp, sender, gas_fee);
        }
        if is_stake_withdrawal(&event.event_type) {
            return classify_unstake(event, timestamp, sender, gas_fee);
        }
    }

    classify_balance_changes(record, net_gas, timestamp, sender, gas_fee)
}

/// Stake deposit: amount is negative (outflow), the recipient is the
/// resolved validator name, and the target amount fills only on a keyword
/// match.
fn classify_stake(
    event: &TxEvent,
    directory: &ValidatorDirectory,
    keyword: &str,
    timestamp: String,
    sender: String,
    gas_fee: f64,
) -> Classification {
    let amount = -mist_to_sui(payload_f64(&event.parsed_json, "amount"));
    let validator = directory.resolve(payload_str(&event.parsed_json, "validator_address"));
    let target_amount = validator
        .to_lowercase()
        .contains(&keyword.to_lowercase())
        .then_some(amount);

    Classification {
        kind: TxKind::Stake,
        amount,
        asset: NATIVE_SYMBOL.to_string(),
        target_amount,
        timestamp,
        sender,
        recipient: validator,
        gas_fee,
    }
}

/// Stake withdrawal: principal plus rewards, falling back to the generic
/// amount field when the sub-fields are absent or zero. Non-negative.
fn classify_unstake(
    event: &TxEvent,
    timestamp: String,
    sender: String,
    gas_fee: f64,
) -> Classification {
    let payload = &event.parsed_json;
    let mut principal = payload_f64(payload, "principal_amount");
    let reward = payload_f64(payload, "reward_amount");
    if principal == 0.0 && reward == 0.0 {
        principal = payload_f64(payload, "amount");
    }

    Classification {
        kind: TxKind::Unstake,
        amount: mist_to_sui(principal + reward),
        asset: NATIVE_SYMBOL.to_string(),
        target_amount: None,
        timestamp,
        sender,
        recipient: "N/A".to_string(),
        gas_fee,
    }
}

/// Balance-change fallback for non-staking transactions: pick the sender's
/// principal change, reconcile gas, and classify by sign.
fn classify_balance_changes(
    record: &TransactionRecord,
    net_gas: i64,
    timestamp: String,
    sender: String,
    gas_fee: f64,
) -> Classification {
    let Some(principal) = principal_change(&record.balance_changes, &sender) else {
        // Nothing moved for the sender; only gas was spent.
        return Classification {
            kind: TxKind::ContractCall,
            amount: 0.0,
            asset: NATIVE_SYMBOL.to_string(),
            target_amount: None,
            timestamp,
            sender,
            recipient: "N/A".to_string(),
            gas_fee,
        };
    };

    // The recorded native delta already includes the gas debit; adding the
    // net gas back exposes the true transfer amount. Non-native balances
    // never carry gas.
    let native = is_native_coin(&principal.coin_type);
    let net_change = if native {
        principal.amount + i128::from(net_gas)
    } else {
        principal.amount
    };

    let (kind, recipient) = match net_change {
        n if n < 0 => (
            TxKind::Send,
            find_recipient(&record.balance_changes, &sender, &principal.coin_type),
        ),
        n if n > 0 => (TxKind::Receive, "N/A".to_string()),
        _ => (TxKind::ContractCall, "N/A".to_string()),
    };

    Classification {
        kind,
        amount: mist_to_sui(net_change as f64),
        asset: asset_symbol(&principal.coin_type),
        target_amount: None,
        timestamp,
        sender,
        recipient,
        gas_fee,
    }
}

/// The sender's principal balance change. Gas is always paid in the native
/// asset, so a non-native change is the stronger signal of intent than the
/// gas-polluted native one; it wins when both exist.
fn principal_change<'a>(changes: &'a [BalanceChange], sender: &str) -> Option<&'a BalanceChange> {
    changes
        .iter()
        .find(|c| c.owner.address() == Some(sender) && !is_native_coin(&c.coin_type))
        .or_else(|| changes.iter().find(|c| c.owner.address() == Some(sender)))
}

/// First counterparty credited with the principal asset.
fn find_recipient(changes: &[BalanceChange], sender: &str, coin_type: &str) -> String {
    changes
        .iter()
        .filter(|c| c.amount > 0 && c.coin_type == coin_type)
        .find_map(|c| match c.owner.address() {
            Some(address) if address != sender => Some(address.to_string()),
            _ => None,
        })
        .unwrap_or_else(|| "N/A".to_string())
}

/// Display symbol for a coin type: trailing segment of the fully qualified
/// identifier, or "Unknown Token" when the identifier has no module path.
fn asset_symbol(coin_type: &str) -> String {
    if is_native_coin(coin_type) {
        return NATIVE_SYMBOL.to_string();
    }
    match coin_type.rsplit("::").next() {
        Some(symbol) if !symbol.is_empty() && coin_type.contains("::") => symbol.to_string(),
        _ => "Unknown Token".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use analyzer_core::{
        GasUsed, Owner, TransactionData, TransactionEffects, TransactionEnvelope,
        NATIVE_COIN_TYPE,
    };
    use approx::assert_relative_eq;
    use serde_json::json;

    const SENDER: &str = "0xsender";

    fn make_record(events: Vec<TxEvent>, balance_changes: Vec<BalanceChange>) -> TransactionRecord {
        TransactionRecord {
            digest: "D1".to_string(),
            timestamp_ms: Some(1_700_000_000_000),
            transaction: Some(TransactionEnvelope {
                data: Some(TransactionData {
                    sender: Some(SENDER.to_string()),
                }),
            }),
            effects: Some(TransactionEffects {
                gas_used: Some(GasUsed {
                    computation_cost: 800_000,
                    storage_cost: 400_000,
                    storage_rebate: 200_000,
                }),
            }),
            events,
            balance_changes,
        }
    }

    fn make_stake_event(amount: u64, validator: &str) -> TxEvent {
        TxEvent {
            event_type: "0x3::validator::StakingRequestEvent".to_string(),
            parsed_json: json!({
                "amount": amount.to_string(),
                "validator_address": validator,
            }),
        }
    }

    fn make_change(owner: &str, amount: i128, coin_type: &str) -> BalanceChange {
        BalanceChange {
            owner: Owner::Address {
                address: owner.to_string(),
            },
            amount,
            coin_type: coin_type.to_string(),
        }
    }

    fn infstones_directory() -> ValidatorDirectory {
        ValidatorDirectory::from_entries([("0xval1", "InfStones")])
    }

    #[test]
    fn test_stake_with_matching_keyword() {
        let record = make_record(vec![make_stake_event(500_000_000_000, "0xval1")], vec![]);
        let result = classify(Some(&record), &infstones_directory(), "InfStones");

        assert_eq!(result.kind, TxKind::Stake);
        assert_relative_eq!(result.amount, -500.0);
        assert_eq!(result.target_amount, Some(-500.0));
        assert_eq!(result.recipient, "InfStones");
        assert_eq!(result.asset, "SUI");
        assert_eq!(result.timestamp, "14.11.2023 UTC 22:13");
    }

    #[test]
    fn test_stake_with_non_matching_keyword() {
        let record = make_record(vec![make_stake_event(500_000_000_000, "0xval1")], vec![]);
        let result = classify(Some(&record), &infstones_directory(), "Nansen");

        assert_eq!(result.kind, TxKind::Stake);
        assert_relative_eq!(result.amount, -500.0);
        assert_eq!(result.target_amount, None);
    }

    #[test]
    fn test_keyword_match_is_case_insensitive() {
        let record = make_record(vec![make_stake_event(1_000_000_000, "0xval1")], vec![]);
        let directory = infstones_directory();

        let lower = classify(Some(&record), &directory, "infstones");
        let upper = classify(Some(&record), &directory, "INFSTONES");
        assert_eq!(lower, upper);
        assert_eq!(lower.target_amount, Some(-1.0));
    }

    #[test]
    fn test_stake_to_unlisted_validator() {
        let record = make_record(vec![make_stake_event(1_000_000_000, "0xdead")], vec![]);
        let result = classify(Some(&record), &ValidatorDirectory::new(), "InfStones");

        assert_eq!(result.recipient, "Unknown Validator");
        assert_eq!(result.target_amount, None);
    }

    #[test]
    fn test_stake_to_detected_operator() {
        let record = make_record(vec![make_stake_event(1_000_000_000, "0xA36A99")], vec![]);
        let result = classify(Some(&record), &ValidatorDirectory::new(), "Nansen");

        assert_eq!(result.recipient, "Nansen (Detected)");
        // The substituted label still participates in keyword matching.
        assert_eq!(result.target_amount, Some(-1.0));
    }

    #[test]
    fn test_unstake_sums_principal_and_reward() {
        let record = make_record(
            vec![TxEvent {
                event_type: "0x3::validator::UnstakingRequestEvent".to_string(),
                parsed_json: json!({
                    "principal_amount": "2000000000",
                    "reward_amount": "500000000",
                }),
            }],
            vec![],
        );
        let result = classify(Some(&record), &ValidatorDirectory::new(), "");

        assert_eq!(result.kind, TxKind::Unstake);
        assert_relative_eq!(result.amount, 2.5);
        assert_eq!(result.recipient, "N/A");
    }

    #[test]
    fn test_unstake_falls_back_to_amount_field() {
        let record = make_record(
            vec![TxEvent {
                event_type: "0x3::staking_pool::WithdrawRequest".to_string(),
                parsed_json: json!({"amount": "3000000000"}),
            }],
            vec![],
        );
        let result = classify(Some(&record), &ValidatorDirectory::new(), "");

        assert_eq!(result.kind, TxKind::Unstake);
        assert_relative_eq!(result.amount, 3.0);
    }

    #[test]
    fn test_first_event_match_wins() {
        // A stake event ahead of an unstake event: the scan must stop at the
        // stake.
        let record = make_record(
            vec![
                make_stake_event(1_000_000_000, "0xval1"),
                TxEvent {
                    event_type: "0x3::validator::UnstakingRequestEvent".to_string(),
                    parsed_json: json!({"amount": "9000000000"}),
                },
            ],
            vec![],
        );
        let result = classify(Some(&record), &infstones_directory(), "");
        assert_eq!(result.kind, TxKind::Stake);
    }

    #[test]
    fn test_native_send_reconciles_gas() {
        let record = make_record(
            vec![],
            vec![make_change(SENDER, -1_200_000_000, NATIVE_COIN_TYPE)],
        );
        // net_gas is 1_000_000; the true transfer is -1_199_000_000.
        let result = classify(Some(&record), &ValidatorDirectory::new(), "");

        assert_eq!(result.kind, TxKind::Send);
        assert_relative_eq!(result.amount, -1.199);
        assert_relative_eq!(result.gas_fee, 0.001);
        // amount and gas fee together reconstruct the recorded delta.
        assert_relative_eq!(result.gas_fee - result.amount, 1.2);
    }

    #[test]
    fn test_native_receive() {
        let record = make_record(
            vec![],
            vec![make_change(SENDER, 5_000_000_000, NATIVE_COIN_TYPE)],
        );
        let result = classify(Some(&record), &ValidatorDirectory::new(), "");

        assert_eq!(result.kind, TxKind::Receive);
        assert_relative_eq!(result.amount, 5.001);
        assert_eq!(result.recipient, "N/A");
    }

    #[test]
    fn test_non_native_send_ignores_gas() {
        let record = make_record(
            vec![],
            vec![make_change(SENDER, -50_000_000_000, "0xabc::blub::BLUB")],
        );
        let result = classify(Some(&record), &ValidatorDirectory::new(), "");

        assert_eq!(result.kind, TxKind::Send);
        assert_eq!(result.asset, "BLUB");
        assert_relative_eq!(result.amount, -50.0);
        // Gas still reports in SUI.
        assert_relative_eq!(result.gas_fee, 0.001);
    }

    #[test]
    fn test_non_native_change_preferred_over_native() {
        let record = make_record(
            vec![],
            vec![
                make_change(SENDER, -1_000_000, NATIVE_COIN_TYPE),
                make_change(SENDER, -7_000_000_000, "0xabc::blub::BLUB"),
            ],
        );
        let result = classify(Some(&record), &ValidatorDirectory::new(), "");

        assert_eq!(result.asset, "BLUB");
        assert_relative_eq!(result.amount, -7.0);
    }

    #[test]
    fn test_send_recipient_matches_principal_asset() {
        let record = make_record(
            vec![],
            vec![
                make_change(SENDER, -50_000_000_000, "0xabc::blub::BLUB"),
                // Positive change in a different asset must not be picked.
                make_change("0xother1", 1_000_000, NATIVE_COIN_TYPE),
                make_change("0xother2", 50_000_000_000, "0xabc::blub::BLUB"),
            ],
        );
        let result = classify(Some(&record), &ValidatorDirectory::new(), "");

        assert_eq!(result.kind, TxKind::Send);
        assert_eq!(result.recipient, "0xother2");
    }

    #[test]
    fn test_send_without_matching_counterparty() {
        let record = make_record(
            vec![],
            vec![
                make_change(SENDER, -50_000_000_000, "0xabc::blub::BLUB"),
                make_change("0xother1", 1_000_000, NATIVE_COIN_TYPE),
            ],
        );
        let result = classify(Some(&record), &ValidatorDirectory::new(), "");

        assert_eq!(result.kind, TxKind::Send);
        assert_eq!(result.recipient, "N/A");
    }

    #[test]
    fn test_zero_net_change_is_contract_call() {
        // The native delta exactly cancels against the gas debit.
        let record = make_record(
            vec![],
            vec![make_change(SENDER, -1_000_000, NATIVE_COIN_TYPE)],
        );
        let result = classify(Some(&record), &ValidatorDirectory::new(), "");

        assert_eq!(result.kind, TxKind::ContractCall);
        assert_relative_eq!(result.amount, 0.0);
    }

    #[test]
    fn test_no_sender_change_is_contract_call() {
        let record = make_record(
            vec![],
            vec![make_change("0xother", 1_000_000, NATIVE_COIN_TYPE)],
        );
        let result = classify(Some(&record), &ValidatorDirectory::new(), "");

        assert_eq!(result.kind, TxKind::ContractCall);
        assert_relative_eq!(result.amount, 0.0);
        assert_eq!(result.asset, "SUI");
    }

    #[test]
    fn test_empty_record_is_contract_call() {
        let record = make_record(vec![], vec![]);
        let result = classify(Some(&record), &ValidatorDirectory::new(), "");

        assert_eq!(result.kind, TxKind::ContractCall);
        assert_relative_eq!(result.amount, 0.0);
    }

    #[test]
    fn test_missing_record_is_network_error() {
        let result = classify(None, &ValidatorDirectory::new(), "InfStones");
        assert_eq!(result.kind, TxKind::NetworkError);
        assert_relative_eq!(result.amount, 0.0);
    }

    #[test]
    fn test_missing_sender_and_timestamp_degrade() {
        let record = TransactionRecord {
            digest: "D2".to_string(),
            ..Default::default()
        };
        let result = classify(Some(&record), &ValidatorDirectory::new(), "");

        assert_eq!(result.sender, "Unknown");
        assert_eq!(result.timestamp, "Unknown");
        assert_eq!(result.kind, TxKind::ContractCall);
        assert_relative_eq!(result.gas_fee, 0.0);
    }

    #[test]
    fn test_classify_is_idempotent() {
        let record = make_record(
            vec![make_stake_event(500_000_000_000, "0xval1")],
            vec![make_change(SENDER, -500_001_200_000, NATIVE_COIN_TYPE)],
        );
        let directory = infstones_directory();

        let first = classify(Some(&record), &directory, "InfStones");
        let second = classify(Some(&record), &directory, "InfStones");
        assert_eq!(first, second);
    }

    #[test]
    fn test_malformed_coin_type_symbol() {
        let record = make_record(vec![], vec![make_change(SENDER, -1_000, "garbage")]);
        let result = classify(Some(&record), &ValidatorDirectory::new(), "");

        assert_eq!(result.kind, TxKind::Send);
        assert_eq!(result.asset, "Unknown Token");
    }

    #[test]
    fn test_sign_convention() {
        let stake = classify(
            Some(&make_record(
                vec![make_stake_event(1_000_000_000, "0xval1")],
                vec![],
            )),
            &infstones_directory(),
            "",
        );
        assert!(stake.amount < 0.0);

        let send = classify(
            Some(&make_record(
                vec![],
                vec![make_change(SENDER, -2_000_000_000, NATIVE_COIN_TYPE)],
            )),
            &ValidatorDirectory::new(),
            "",
        );
        assert!(send.amount < 0.0);

        let receive = classify(
            Some(&make_record(
                vec![],
                vec![make_change(SENDER, 2_000_000_000, NATIVE_COIN_TYPE)],
            )),
            &ValidatorDirectory::new(),
            "",
        );
        assert!(receive.amount > 0.0);

        let unstake = classify(
            Some(&make_record(
                vec![TxEvent {
                    event_type: "0x3::validator::UnstakingRequestEvent".to_string(),
                    parsed_json: json!({"amount": "2000000000"}),
                }],
                vec![],
            )),
            &ValidatorDirectory::new(),
            "",
        );
        assert!(unstake.amount >= 0.0);
    }
}
