use std::fmt;

use chrono::{DateTime, Utc};
use serde::de::{self, Deserialize, Deserializer, IgnoredAny, MapAccess, Visitor};
use serde::Serialize;

// Latest known sensor state for a single plant, as stored and listed
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Reading {
    pub plant_id: i64,
    pub moisture: i64,
    pub raw_value: i64,
    pub server_timestamp: DateTime<Utc>,
}

// What a sensor posts. Decoding is lenient the way sensor firmware expects:
// keys match regardless of ASCII case, a later duplicate key overrides an
// earlier one, null leaves a field untouched, missing fields stay zero and
// unknown fields (including any client-side serverTimestamp) are dropped.
// A bare `null` document is an all-zero payload.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReadingPayload {
    pub plant_id: i64,
    pub moisture: i64,
    pub raw_value: i64,
}

impl ReadingPayload {
    // Turn the payload into a stored reading, stamped with the arrival time
    pub fn stamp(self, received_at: DateTime<Utc>) -> Reading {
        Reading {
            plant_id: self.plant_id,
            moisture: self.moisture,
            raw_value: self.raw_value,
            server_timestamp: received_at,
        }
    }

    fn field_mut(&mut self, key: &str) -> Option<&mut i64> {
        if key.eq_ignore_ascii_case("plantId") {
            Some(&mut self.plant_id)
        } else if key.eq_ignore_ascii_case("moisture") {
            Some(&mut self.moisture)
        } else if key.eq_ignore_ascii_case("rawValue") {
            Some(&mut self.raw_value)
        } else {
            None
        }
    }
}

impl<'de> Deserialize<'de> for ReadingPayload {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_option(PayloadVisitor)
    }
}

struct PayloadVisitor;

impl<'de> Visitor<'de> for PayloadVisitor {
    type Value = ReadingPayload;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a soil moisture reading object")
    }

    fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(ReadingPayload::default())
    }

    fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(ReadingPayload::default())
    }

    fn visit_some<D>(self, deserializer: D) -> Result<Self::Value, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_map(self)
    }

    // Keys are walked in document order so the last occurrence wins
    fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut payload = ReadingPayload::default();
        while let Some(key) = map.next_key::<String>()? {
            match payload.field_mut(&key) {
                Some(field) => {
                    if let Some(value) = map.next_value::<Option<i64>>()? {
                        *field = value;
                    }
                }
                None => {
                    map.next_value::<IgnoredAny>()?;
                }
            }
        }
        Ok(payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn decode(body: &str) -> Result<ReadingPayload, serde_json::Error> {
        serde_json::from_str(body)
    }

    #[test]
    fn test_payload_ignores_client_timestamp() {
        let body = r#"{"plantId":3,"moisture":41,"rawValue":612,"serverTimestamp":"2001-01-01T00:00:00Z"}"#;
        let now = Utc.with_ymd_and_hms(2026, 5, 1, 12, 0, 0).unwrap();
        let reading = decode(body).unwrap().stamp(now);
        assert_eq!(reading.plant_id, 3);
        assert_eq!(reading.moisture, 41);
        assert_eq!(reading.raw_value, 612);
        assert_eq!(reading.server_timestamp, now);
    }

    #[test]
    fn test_payload_missing_fields_default_to_zero() {
        let payload = decode(r#"{"plantId":9}"#).unwrap();
        assert_eq!(payload, ReadingPayload { plant_id: 9, moisture: 0, raw_value: 0 });
    }

    #[test]
    fn test_payload_keys_ignore_case() {
        let payload = decode(r#"{"PlantID":7,"MOISTURE":33,"rawvalue":401}"#).unwrap();
        assert_eq!(payload, ReadingPayload { plant_id: 7, moisture: 33, raw_value: 401 });
    }

    #[test]
    fn test_payload_duplicate_key_last_wins() {
        let payload = decode(r#"{"plantId":2,"PLANTID":3}"#).unwrap();
        assert_eq!(payload.plant_id, 3);
        let payload = decode(r#"{"PLANTID":3,"plantId":2}"#).unwrap();
        assert_eq!(payload.plant_id, 2);
    }

    #[test]
    fn test_payload_null_values() {
        let payload = decode(r#"{"plantId":1,"moisture":null}"#).unwrap();
        assert_eq!(payload, ReadingPayload { plant_id: 1, moisture: 0, raw_value: 0 });
        // null does not clear an earlier value
        let payload = decode(r#"{"moisture":5,"moisture":null}"#).unwrap();
        assert_eq!(payload.moisture, 5);
        assert_eq!(decode("null").unwrap(), ReadingPayload::default());
    }

    #[test]
    fn test_payload_rejects_wrong_shapes() {
        for body in ["[1,2,3]", "42", r#""text""#, r#"{"plantId":"one"}"#, r#"{"moisture":1.5}"#, ""] {
            assert!(decode(body).is_err(), "{body:?}");
        }
    }

    #[test]
    fn test_reading_serializes_camel_case() {
        let at = Utc.with_ymd_and_hms(2026, 5, 1, 12, 0, 0).unwrap();
        let reading = ReadingPayload { plant_id: 1, moisture: 55, raw_value: 480 }.stamp(at);
        let value = serde_json::to_value(&reading).unwrap();
        assert_eq!(value["plantId"], 1);
        assert_eq!(value["moisture"], 55);
        assert_eq!(value["rawValue"], 480);
        assert_eq!(value["serverTimestamp"], "2026-05-01T12:00:00Z");
    }
}
