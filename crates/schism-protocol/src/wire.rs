//! Serde adapters for the JSON wire format shared with the signing service.
//!
//! Byte fields travel as standard base64 strings and durations as integer
//! nanoseconds.

pub(crate) mod base64_bytes {
    use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(bytes: &[u8], s: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        s.serialize_str(&BASE64.encode(bytes))
    }

    pub fn deserialize<'de, D>(d: D) -> Result<Vec<u8>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let encoded: Option<String> = Option::deserialize(d)?;
        match encoded {
            None => Ok(Vec::new()),
            Some(encoded) => BASE64
                .decode(encoded.as_bytes())
                .map_err(|e| serde::de::Error::custom(format!("invalid base64: {}", e))),
        }
    }
}

pub(crate) mod duration_nanos {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(d: &Duration, s: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let nanos = i64::try_from(d.as_nanos())
            .map_err(|_| serde::ser::Error::custom("duration exceeds i64 nanoseconds"))?;
        s.serialize_i64(nanos)
    }

    pub fn deserialize<'de, D>(d: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let nanos = i64::deserialize(d)?;
        let nanos = u64::try_from(nanos)
            .map_err(|_| serde::de::Error::custom("duration must not be negative"))?;
        Ok(Duration::from_nanos(nanos))
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use serde::{Deserialize, Serialize};

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Sample {
        #[serde(with = "super::base64_bytes")]
        raw: Vec<u8>,
        #[serde(with = "super::duration_nanos")]
        ttl: Duration,
    }

    #[test]
    fn test_encoding() {
        let sample = Sample {
            raw: b"ssh-ed25519".to_vec(),
            ttl: Duration::from_secs(3600),
        };
        let json = serde_json::to_value(&sample).unwrap();
        assert_eq!(json["raw"], "c3NoLWVkMjU1MTk=");
        assert_eq!(json["ttl"], 3_600_000_000_000_i64);
    }

    #[test]
    fn test_null_bytes_decode_empty() {
        let sample: Sample = serde_json::from_str(r#"{"raw": null, "ttl": 0}"#).unwrap();
        assert!(sample.raw.is_empty());
    }

    #[test]
    fn test_rejects_negative_duration() {
        assert!(serde_json::from_str::<Sample>(r#"{"raw": "", "ttl": -1}"#).is_err());
    }

    #[test]
    fn test_rejects_bad_base64() {
        assert!(serde_json::from_str::<Sample>(r#"{"raw": "***", "ttl": 1}"#).is_err());
    }
}
