//! Serde support: conditions and fulfillments travel as their URI strings.

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

use crate::{Condition, Fulfillment};

impl Serialize for Condition {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_uri())
    }
}

impl<'de> Deserialize<'de> for Condition {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let uri = String::deserialize(deserializer)?;
        Self::from_uri(&uri).map_err(de::Error::custom)
    }
}

impl Serialize for Fulfillment {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let uri = self.to_uri().map_err(serde::ser::Error::custom)?;
        serializer.serialize_str(&uri)
    }
}

impl<'de> Deserialize<'de> for Fulfillment {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let uri = String::deserialize(deserializer)?;
        Self::from_uri(&uri).map_err(de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use crate::{Condition, Fulfillment};

    #[test]
    fn condition_as_uri_string() {
        let condition = Fulfillment::preimage("").condition().unwrap();
        let json = serde_json::to_string(&condition).unwrap();
        assert_eq!(
            json,
            "\"cc:1:3:47DEQpj8HBSa-_TImW-5JCeuQeRkm5NMpJWZG3hSuFU:1\""
        );
        let back: Condition = serde_json::from_str(&json).unwrap();
        assert_eq!(back, condition);
    }

    #[test]
    fn fulfillment_as_uri_string() {
        let fulfillment = Fulfillment::preimage("");
        let json = serde_json::to_string(&fulfillment).unwrap();
        assert_eq!(json, "\"cf:1:0:AA\"");
        let back: Fulfillment = serde_json::from_str(&json).unwrap();
        assert_eq!(back, fulfillment);
    }

    #[test]
    fn rejects_invalid_uris() {
        assert!(serde_json::from_str::<Condition>("\"cc:1:ZZ:AA:0\"").is_err());
        assert!(serde_json::from_str::<Fulfillment>("\"not-a-uri\"").is_err());
    }
}
