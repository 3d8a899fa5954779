//! Validator directory loading.

use analyzer_core::ValidatorDirectory;
use serde_json::Value;

use crate::client::RpcClient;

/// Load the validator directory from the current system state.
///
/// Any failure (all nodes down, unexpected payload) yields an empty
/// directory and the run continues in offline mode.
pub async fn load_validator_directory(client: &RpcClient) -> ValidatorDirectory {
    let Some(state) = client
        .call("suix_getLatestSuiSystemStateV2", Value::Array(Vec::new()))
        .await
    else {
        tracing::warn!("validator directory unavailable, continuing offline");
        return ValidatorDirectory::new();
    };

    let directory = directory_from_system_state(&state);
    if directory.is_empty() {
        tracing::warn!("system state carried no validators, continuing offline");
    } else {
        tracing::info!("loaded {} validators", directory.len());
    }
    directory
}

/// Extract (address, name) pairs from a system state payload. Entries
/// missing either field are skipped.
pub fn directory_from_system_state(state: &Value) -> ValidatorDirectory {
    let mut directory = ValidatorDirectory::new();
    let Some(validators) = state.get("activeValidators").and_then(Value::as_array) else {
        return directory;
    };
    for validator in validators {
        let address = validator.get("suiAddress").and_then(Value::as_str);
        let name = validator.get("name").and_then(Value::as_str);
        if let (Some(address), Some(name)) = (address, name) {
            directory.insert(address, name);
        }
    }
    directory
}
