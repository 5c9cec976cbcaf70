//! `{"messageType": ..., "payload": ...}` dialect

use super::FeedMessage;
use serde::Deserialize;
use serde_json::{json, Value};
use telemetry_socket::WsMessage;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Envelope {
    message_type: String,
    #[serde(default)]
    payload: Value,
}

/// Replay request, then the live subscription
pub fn handshake() -> Vec<WsMessage> {
    vec![
        WsMessage::Text(json!({"messageType": "REPLAY"}).to_string()),
        WsMessage::Text(json!({"messageType": "SUBSCRIBE"}).to_string()),
    ]
}

pub fn decode(frame: Value) -> Result<Vec<FeedMessage>, String> {
    match frame {
        Value::Array(items) => Ok(items
            .into_iter()
            .flat_map(|item| decode_envelope(item).unwrap_or_else(|e| vec![FeedMessage::Invalid(e)]))
            .collect()),
        other => decode_envelope(other),
    }
}

fn decode_envelope(frame: Value) -> Result<Vec<FeedMessage>, String> {
    let envelope = Envelope::deserialize(frame).map_err(|e| e.to_string())?;

    match envelope.message_type.as_str() {
        "BATTLE_RESULT" => {
            if !envelope.payload.is_object() {
                return Err("BATTLE_RESULT payload is not an object".to_string());
            }
            Ok(vec![FeedMessage::BattleResult(envelope.payload)])
        }
        "REPLAY" => {
            let records = match envelope.payload {
                Value::Array(records) => records,
                Value::Object(mut object) => match object.remove("battleResults") {
                    Some(Value::Array(records)) => records,
                    _ => return Err("REPLAY payload without battleResults".to_string()),
                },
                _ => return Err("REPLAY payload is not a list".to_string()),
            };
            Ok(records.into_iter().map(FeedMessage::BattleResult).collect())
        }
        "ERROR" => Ok(vec![FeedMessage::ServerError(envelope.payload)]),
        "SUBSCRIBE" => Ok(vec![FeedMessage::Acknowledged]),
        other => Err(format!("unknown messageType {:?}", other)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handshake_order() {
        let frames: Vec<String> = handshake()
            .iter()
            .filter_map(|m| m.as_text().map(str::to_string))
            .collect();
        assert_eq!(
            frames,
            vec![
                r#"{"messageType":"REPLAY"}"#.to_string(),
                r#"{"messageType":"SUBSCRIBE"}"#.to_string(),
            ]
        );
    }

    #[test]
    fn test_decodes_each_message_type() {
        assert_eq!(
            decode(json!({"messageType": "BATTLE_RESULT", "payload": {"n": 1}})).unwrap(),
            vec![FeedMessage::BattleResult(json!({"n": 1}))]
        );
        assert_eq!(
            decode(json!({"messageType": "REPLAY", "payload": [{"n": 1}, {"n": 2}]})).unwrap(),
            vec![
                FeedMessage::BattleResult(json!({"n": 1})),
                FeedMessage::BattleResult(json!({"n": 2})),
            ]
        );
        assert_eq!(
            decode(json!({"messageType": "REPLAY", "payload": {"battleResults": [{"n": 3}]}}))
                .unwrap(),
            vec![FeedMessage::BattleResult(json!({"n": 3}))]
        );
        assert_eq!(
            decode(json!({"messageType": "ERROR", "payload": "boom"})).unwrap(),
            vec![FeedMessage::ServerError(json!("boom"))]
        );
        assert_eq!(
            decode(json!({"messageType": "SUBSCRIBE"})).unwrap(),
            vec![FeedMessage::Acknowledged]
        );
    }

    #[test]
    fn test_batch_skips_unknown_envelopes() {
        let frame = json!([
            {"messageType": "PING"},
            {"messageType": "BATTLE_RESULT", "payload": {"n": 1}}
        ]);
        let messages = decode(frame).unwrap();
        assert!(matches!(messages[0], FeedMessage::Invalid(_)));
        assert_eq!(messages[1], FeedMessage::BattleResult(json!({"n": 1})));
    }

    #[test]
    fn test_rejects_unknown_envelopes() {
        assert!(decode(json!({"messageType": "PING"})).is_err());
        assert!(decode(json!({"payload": {}})).is_err());
        assert!(decode(json!({"messageType": "BATTLE_RESULT", "payload": 3})).is_err());
    }
}
