//! Membership Authority response decoding
//!
//! Response shape:
//! ```json
//! { "data": [ { "membership_status": true, "aicf_id": "...",
//!               "first_name": "...", "middle_name": null, "last_name": "..." } ] }
//! ```
//! `membership_status` and `aicf_id` are required. Name fragments may be
//! absent or null (read as empty) but a present fragment of the wrong type is
//! still a decode error.

use crate::error::AuthorityError;
use crate::types::PlayerRecord;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct PlayersEnvelope {
    data: Vec<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct PlayerEntry {
    membership_status: bool,
    aicf_id: String,
    first_name: Option<String>,
    middle_name: Option<String>,
    last_name: Option<String>,
}

/// Decode a lookup response for `id` into its single player record
pub fn decode_player_response(id: &str, body: &[u8]) -> Result<PlayerRecord, AuthorityError> {
    let envelope: PlayersEnvelope = serde_json::from_slice(body).map_err(|e| {
        AuthorityError::Decode(format!("Membership response for {id}: {e}"))
    })?;

    // Count before decoding elements so an ambiguous ID is reported as such
    // even when the extra records are malformed
    let entry = match envelope.data.as_slice() {
        [] => return Err(AuthorityError::NotFound(id.to_string())),
        [single] => single.clone(),
        many => {
            return Err(AuthorityError::AmbiguousId {
                id: id.to_string(),
                count: many.len(),
            })
        }
    };

    let entry: PlayerEntry = serde_json::from_value(entry).map_err(|e| {
        AuthorityError::Decode(format!("Membership record for {id}: {e}"))
    })?;

    Ok(PlayerRecord {
        identifier: entry.aicf_id,
        membership_active: entry.membership_status,
        first_name: entry.first_name.unwrap_or_default(),
        middle_name: entry.middle_name.unwrap_or_default(),
        last_name: entry.last_name.unwrap_or_default(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode(json: &str) -> Result<PlayerRecord, AuthorityError> {
        decode_player_response("ID1", json.as_bytes())
    }

    #[test]
    fn test_single_record() {
        let record = decode(
            r#"{"data":[{"membership_status":true,"aicf_id":"25MH0042",
                "first_name":"Jane","middle_name":"Q","last_name":"Doe","extra":1}]}"#,
        )
        .unwrap();

        assert_eq!(record.identifier, "25MH0042");
        assert!(record.membership_active);
        assert_eq!(record.display_name(), "Jane Q Doe");
    }

    #[test]
    fn test_absent_and_null_name_fragments_are_empty() {
        let record = decode(
            r#"{"data":[{"membership_status":false,"aicf_id":"A1","middle_name":null}]}"#,
        )
        .unwrap();

        assert!(!record.membership_active);
        assert_eq!(record.first_name, "");
        assert_eq!(record.middle_name, "");
        assert_eq!(record.display_name(), "");
    }

    #[test]
    fn test_empty_data_is_not_found() {
        assert_eq!(
            decode(r#"{"data":[]}"#),
            Err(AuthorityError::NotFound("ID1".into()))
        );
    }

    #[test]
    fn test_multiple_records_are_ambiguous() {
        let err = decode(r#"{"data":[{"x":1},{"y":2}]}"#).unwrap_err();
        assert_eq!(
            err,
            AuthorityError::AmbiguousId {
                id: "ID1".into(),
                count: 2
            }
        );
    }

    #[test]
    fn test_missing_required_field_is_decode_error() {
        let err = decode(r#"{"data":[{"aicf_id":"A1"}]}"#).unwrap_err();
        assert!(matches!(err, AuthorityError::Decode(_)));
    }

    #[test]
    fn test_wrong_typed_fields_are_decode_errors() {
        for json in [
            r#"{"data":[{"membership_status":"true","aicf_id":"A1"}]}"#,
            r#"{"data":[{"membership_status":true,"aicf_id":42}]}"#,
            r#"{"data":[{"membership_status":true,"aicf_id":"A1","first_name":7}]}"#,
            r#"{"data":{"membership_status":true}}"#,
            r#"{"players":[]}"#,
            "<html>maintenance</html>",
        ] {
            assert!(
                matches!(decode(json), Err(AuthorityError::Decode(_))),
                "expected decode error for {json}"
            );
        }
    }
}
