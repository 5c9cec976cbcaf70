//! JSON-RPC 2.0 dialect

use super::FeedMessage;
use serde_json::{json, Value};
use telemetry_socket::WsMessage;

pub const REPLAY_REQUEST_ID: u64 = 1;
pub const SUBSCRIBE_REQUEST_ID: u64 = 2;

/// One batch asking for the battle history and for future results
pub fn handshake() -> Vec<WsMessage> {
    let batch = json!([
        {"jsonrpc": "2.0", "method": "get_battle_results", "id": REPLAY_REQUEST_ID},
        {"jsonrpc": "2.0", "method": "subscribe", "id": SUBSCRIBE_REQUEST_ID},
    ]);
    vec![WsMessage::Text(batch.to_string())]
}

/// Decode one frame (a response object or a batch of them)
///
/// A bad batch element becomes `FeedMessage::Invalid` in its place; its
/// siblings still decode.
pub fn decode(frame: Value) -> Result<Vec<FeedMessage>, String> {
    match frame {
        Value::Array(items) => Ok(items
            .into_iter()
            .flat_map(|item| decode_object(item).unwrap_or_else(|e| vec![FeedMessage::Invalid(e)]))
            .collect()),
        other => decode_object(other),
    }
}

fn decode_object(object: Value) -> Result<Vec<FeedMessage>, String> {
    if !object.is_object() {
        return Err(format!("expected a JSON-RPC object, got {}", object));
    }

    if object.get("method").and_then(Value::as_str) == Some("subscription") {
        let record = object
            .get("params")
            .and_then(|params| params.get("battleResult"))
            .ok_or("subscription without params.battleResult")?;
        return Ok(vec![FeedMessage::BattleResult(record.clone())]);
    }

    if let Some(result) = object.get("result") {
        if object.get("id").and_then(Value::as_u64) == Some(REPLAY_REQUEST_ID) {
            let records = result
                .get("battleResults")
                .and_then(Value::as_array)
                .ok_or("replay response without result.battleResults")?;
            return Ok(records.iter().cloned().map(FeedMessage::BattleResult).collect());
        }
    }

    if let Some(error) = object.get("error") {
        return Ok(vec![FeedMessage::ServerError(error.clone())]);
    }

    Ok(vec![FeedMessage::Acknowledged])
}
