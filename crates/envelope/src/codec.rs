//! Text encoding of an [`Envelope`] for transport and storage.
//!
//! ```text
//! {"iv":"<standard base64>","data":"<standard base64>"}
//! ```
//!
//! This module performs no cryptography and knows nothing about keys.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::cipher::{Envelope, IV_LEN, TAG_LEN};
use crate::error::EnvelopeError;

#[derive(Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct WireEnvelope {
    iv: String,
    data: String,
}

/// Encode `envelope` as its two-field JSON record.
///
/// # Errors
///
/// Returns [`EnvelopeError::Encoding`] if JSON serialisation fails.
pub fn serialize(envelope: &Envelope) -> Result<String, EnvelopeError> {
    let wire = WireEnvelope {
        iv: STANDARD.encode(envelope.iv),
        data: STANDARD.encode(&envelope.ciphertext),
    };
    serde_json::to_string(&wire).map_err(|e| EnvelopeError::Encoding(e.to_string()))
}

/// Parse a two-field JSON record back into an [`Envelope`].
///
/// # Errors
///
/// Returns [`EnvelopeError::Format`] if the text is not a JSON object with
/// exactly `iv` and `data`, if either field is not standard base64, if the IV
/// is not 12 bytes, or if the data is too short to hold a tag.
pub fn deserialize(s: &str) -> Result<Envelope, EnvelopeError> {
    const NOT_A_RECORD: EnvelopeError =
        EnvelopeError::Format("expected a JSON object with `iv` and `data`");

    // Only an object may become a record; the derived impl also takes `[iv, data]`.
    let wire: WireEnvelope = match serde_json::from_str(s) {
        Ok(object @ Value::Object(_)) => {
            serde_json::from_value(object).map_err(|_| NOT_A_RECORD)?
        }
        _ => return Err(NOT_A_RECORD),
    };

    let iv_bytes = STANDARD
        .decode(&wire.iv)
        .map_err(|_| EnvelopeError::Format("`iv` is not valid base64"))?;
    let iv: [u8; IV_LEN] = iv_bytes
        .try_into()
        .map_err(|_| EnvelopeError::Format("`iv` must decode to 12 bytes"))?;

    let ciphertext = STANDARD
        .decode(&wire.data)
        .map_err(|_| EnvelopeError::Format("`data` is not valid base64"))?;
    if ciphertext.len() < TAG_LEN {
        return Err(EnvelopeError::Format("`data` is shorter than the authentication tag"));
    }

    Ok(Envelope { iv, ciphertext })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Envelope {
        Envelope {
            iv: [1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12],
            ciphertext: vec![0xAB; TAG_LEN + 2],
        }
    }

    #[test]
    fn serialize_field_order_and_alphabet() {
        let s = serialize(&sample()).unwrap();
        assert_eq!(
            s,
            r#"{"iv":"AQIDBAUGBwgJCgsM","data":"q6urq6urq6urq6urq6urq6ur"}"#
        );
        assert_eq!(deserialize(&s).unwrap(), sample());
    }

    #[test]
    fn accepts_reordered_fields_and_whitespace() {
        let s = r#"{ "data": "q6urq6urq6urq6urq6urq6ur", "iv": "AQIDBAUGBwgJCgsM" }"#;
        assert_eq!(deserialize(s).unwrap(), sample());
    }

    #[test]
    fn rejects_non_json() {
        assert!(matches!(deserialize("plain text"), Err(EnvelopeError::Format(_))));
        assert!(matches!(deserialize(""), Err(EnvelopeError::Format(_))));
    }

    #[test]
    fn rejects_positional_array_form() {
        let s = r#"["AQIDBAUGBwgJCgsM","q6urq6urq6urq6urq6urq6ur"]"#;
        assert_eq!(
            deserialize(s),
            Err(EnvelopeError::Format("expected a JSON object with `iv` and `data`"))
        );
    }

    #[test]
    fn rejects_missing_field() {
        let s = r#"{"iv":"AQIDBAUGBwgJCgsM"}"#;
        assert!(matches!(deserialize(s), Err(EnvelopeError::Format(_))));
    }

    #[test]
    fn rejects_extra_field() {
        let s = r#"{"iv":"AQIDBAUGBwgJCgsM","data":"q6urq6urq6urq6urq6urq6ur","v":1}"#;
        assert!(matches!(deserialize(s), Err(EnvelopeError::Format(_))));
    }

    #[test]
    fn rejects_bad_base64() {
        let s = r#"{"iv":"!!!","data":"q6urq6urq6urq6urq6urq6ur"}"#;
        assert_eq!(
            deserialize(s),
            Err(EnvelopeError::Format("`iv` is not valid base64"))
        );
        let s = r#"{"iv":"AQIDBAUGBwgJCgsM","data":"q6ur*"}"#;
        assert_eq!(
            deserialize(s),
            Err(EnvelopeError::Format("`data` is not valid base64"))
        );
    }

    #[test]
    fn rejects_wrong_iv_length() {
        let s = r#"{"iv":"AQID","data":"q6urq6urq6urq6urq6urq6ur"}"#;
        assert_eq!(
            deserialize(s),
            Err(EnvelopeError::Format("`iv` must decode to 12 bytes"))
        );
    }

    #[test]
    fn rejects_data_shorter_than_tag() {
        let s = r#"{"iv":"AQIDBAUGBwgJCgsM","data":"q6ur"}"#;
        assert!(matches!(deserialize(s), Err(EnvelopeError::Format(_))));
    }

    #[test]
    fn rejects_non_string_fields() {
        let s = r#"{"iv":12,"data":"q6urq6urq6urq6urq6urq6ur"}"#;
        assert!(matches!(deserialize(s), Err(EnvelopeError::Format(_))));
    }
}
