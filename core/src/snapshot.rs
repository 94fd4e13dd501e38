//! Durable snapshot codec.
//!
//! One JSON object per phase, keyed by layer name:
//! `{"operating":[34,12,29,10,12,3],"capital":[68,4,3,1,22,2]}`.
//! Decoding is per entry: a malformed layer is dropped with a warning and the
//! rest of the object is still used.

use serde_json::{Map, Value};

use civic_types::{Allocation, Layer, LayerMap};

pub fn encode(layers: &LayerMap<Option<Allocation>>) -> Result<String, serde_json::Error> {
    let mut object = Map::new();
    for layer in Layer::ALL {
        if let Some(allocation) = layers.get(layer) {
            object.insert(layer.as_str().to_string(), serde_json::to_value(allocation)?);
        }
    }
    serde_json::to_string(&Value::Object(object))
}

/// Decode a persisted phase map. Never fails; unusable input yields empty slots.
#[must_use]
pub fn decode(raw: &str, sectors: usize) -> LayerMap<Option<Allocation>> {
    let mut out = LayerMap::default();
    let value: Value = match serde_json::from_str(raw) {
        Ok(value) => value,
        Err(e) => {
            tracing::warn!("Discarding unreadable allocation snapshot: {e}");
            return out;
        }
    };
    let Value::Object(object) = value else {
        tracing::warn!("Discarding allocation snapshot: expected a JSON object");
        return out;
    };

    for layer in Layer::ALL {
        let Some(entry) = object.get(layer.as_str()) else {
            continue;
        };
        match decode_entry(entry, sectors) {
            Ok(allocation) => *out.get_mut(layer) = Some(allocation),
            Err(reason) => {
                tracing::warn!(%layer, "Discarding stored allocation: {reason}");
            }
        }
    }
    out
}

fn decode_entry(entry: &Value, sectors: usize) -> Result<Allocation, String> {
    let values: Vec<u32> = serde_json::from_value(entry.clone()).map_err(|e| e.to_string())?;
    Allocation::with_len(values, sectors).map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn allocation(values: &[u32]) -> Allocation {
        Allocation::new(values.to_vec()).unwrap()
    }

    #[test]
    fn encode_omits_empty_layers() {
        let layers = LayerMap::new(Some(allocation(&[60, 40])), None);
        assert_eq!(encode(&layers).unwrap(), r#"{"operating":[60,40]}"#);
    }

    #[test]
    fn decode_restores_both_layers() {
        let layers = LayerMap::new(Some(allocation(&[60, 40])), Some(allocation(&[0, 100])));
        let decoded = decode(&encode(&layers).unwrap(), 2);
        assert_eq!(decoded, layers);
    }

    #[test]
    fn decode_keeps_good_entries_next_to_bad_ones() {
        let decoded = decode(r#"{"operating":[50,49],"capital":[30,70],"revenue":[1]}"#, 2);
        assert_eq!(decoded.operating, None);
        assert_eq!(decoded.capital, Some(allocation(&[30, 70])));
    }

    #[test]
    fn decode_rejects_wrong_length_and_garbage() {
        assert_eq!(decode(r#"{"operating":[100]}"#, 2), LayerMap::default());
        assert_eq!(decode("not json", 2), LayerMap::default());
        assert_eq!(decode("[1,2,3]", 2), LayerMap::default());
        assert_eq!(decode(r#"{"capital":"oops"}"#, 2), LayerMap::default());
    }
}
