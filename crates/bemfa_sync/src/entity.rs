//! Read-only view of a host entity's state.
//!
//! The host reports state as `{"entity_id": ..., "state": ..., "attributes": {...}}`.
//! Attributes the host considers inactive are reported as `null`; those are treated
//! exactly like absent keys.

use serde::Deserialize;
use serde::Serialize;
use serde_json::Map;
use serde_json::Value;

use crate::error::Result;
use crate::error::SyncError;

/// Status token of an entity that is switched on.
pub const STATE_ON: &str = "on";

/// Attribute mapping of an entity.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Attributes(Map<String, Value>);

impl Attributes {
    pub fn new(map: Map<String, Value>) -> Self {
        Self(map)
    }

    fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key).filter(|v| !v.is_null())
    }

    /// Whether `key` is present with a non-null value
    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Read an integral attribute. Floats without a fractional part are accepted.
    pub fn integer(&self, key: &'static str) -> Result<Option<i64>> {
        let Some(value) = self.get(key) else {
            return Ok(None);
        };
        let malformed = SyncError::MalformedAttribute {
            key,
            expected: "integer",
        };

        if let Some(i) = value.as_i64() {
            return Ok(Some(i));
        }
        match value.as_f64() {
            Some(f) if f.fract() == 0.0 && f.abs() < i64::MAX as f64 => Ok(Some(f as i64)),
            _ => Err(malformed),
        }
    }

    /// Like [`Attributes::integer`], but an absent attribute is a fault.
    pub fn require_integer(&self, key: &'static str) -> Result<i64> {
        self.integer(key)?.ok_or(SyncError::MissingAttribute(key))
    }

    pub fn number(&self, key: &'static str) -> Result<Option<f64>> {
        self.get(key)
            .map(|v| {
                v.as_f64().ok_or(SyncError::MalformedAttribute {
                    key,
                    expected: "number",
                })
            })
            .transpose()
    }

    /// Read an `[r, g, b]` attribute with 8-bit components.
    pub fn rgb(&self, key: &'static str) -> Result<Option<[u8; 3]>> {
        let Some(value) = self.get(key) else {
            return Ok(None);
        };
        let malformed = || SyncError::MalformedAttribute {
            key,
            expected: "array of three 0-255 integers",
        };

        let items = value.as_array().ok_or_else(malformed)?;
        if items.len() != 3 {
            return Err(malformed());
        }

        let mut rgb = [0u8; 3];
        for (slot, item) in rgb.iter_mut().zip(items) {
            *slot = item
                .as_u64()
                .and_then(|c| u8::try_from(c).ok())
                .ok_or_else(malformed)?;
        }
        Ok(Some(rgb))
    }

    pub fn string_list(&self, key: &'static str) -> Result<Option<Vec<&str>>> {
        let Some(value) = self.get(key) else {
            return Ok(None);
        };
        let malformed = || SyncError::MalformedAttribute {
            key,
            expected: "array of strings",
        };

        value
            .as_array()
            .ok_or_else(malformed)?
            .iter()
            .map(|v| v.as_str().ok_or_else(malformed))
            .collect::<Result<Vec<_>>>()
            .map(Some)
    }
}

impl From<Map<String, Value>> for Attributes {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

/// Snapshot of an entity as supplied by the host's state store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityState {
    /// Entity ID (e.g., "light.living_room")
    pub entity_id: String,

    /// Status token ("on", "off", "unavailable", ...)
    pub state: String,

    #[serde(default)]
    pub attributes: Attributes,
}

impl EntityState {
    pub fn is_on(&self) -> bool {
        self.state == STATE_ON
    }

    /// The domain part of the entity ID ("light" for "light.living_room")
    pub fn domain(&self) -> &str {
        entity_domain(&self.entity_id)
    }
}

/// Split the domain off an entity ID. IDs without a dot are all domain.
pub fn entity_domain(entity_id: &str) -> &str {
    entity_id
        .split_once('.')
        .map_or(entity_id, |(domain, _)| domain)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn attrs(value: Value) -> Attributes {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_null_attribute_is_absent() {
        let a = attrs(json!({"color_temp_kelvin": null, "brightness": 10}));
        assert!(!a.contains("color_temp_kelvin"));
        assert!(a.contains("brightness"));
        assert_eq!(a.integer("color_temp_kelvin").unwrap(), None);
    }

    #[test]
    fn test_integer_accepts_integral_float() {
        let a = attrs(json!({"color_temp": 250.0, "brightness": 12.5}));
        assert_eq!(a.integer("color_temp").unwrap(), Some(250));
        assert_eq!(
            a.integer("brightness"),
            Err(SyncError::MalformedAttribute {
                key: "brightness",
                expected: "integer",
            })
        );
    }

    #[test]
    fn test_require_integer() {
        let a = attrs(json!({"min_mireds": 153}));
        assert_eq!(a.require_integer("min_mireds").unwrap(), 153);
        assert_eq!(
            a.require_integer("max_mireds"),
            Err(SyncError::MissingAttribute("max_mireds"))
        );
    }

    #[test]
    fn test_rgb() {
        let a = attrs(json!({
            "rgb_color": [255, 128, 0],
            "short": [1, 2],
            "big": [256, 0, 0],
        }));
        assert_eq!(a.rgb("rgb_color").unwrap(), Some([255, 128, 0]));
        assert!(a.rgb("short").is_err());
        assert!(a.rgb("big").is_err());
        assert_eq!(a.rgb("missing").unwrap(), None);
    }

    #[test]
    fn test_string_list() {
        let a = attrs(json!({"supported_color_modes": ["color_temp", "rgb"], "bad": "rgb"}));
        assert_eq!(
            a.string_list("supported_color_modes").unwrap(),
            Some(vec!["color_temp", "rgb"])
        );
        assert!(a.string_list("bad").is_err());
    }

    #[test]
    fn test_entity_state_from_json() {
        let state: EntityState = serde_json::from_value(json!({
            "entity_id": "light.living_room",
            "state": "on",
            "attributes": {"brightness": 128}
        }))
        .unwrap();

        assert!(state.is_on());
        assert_eq!(state.domain(), "light");
        assert_eq!(state.attributes.integer("brightness").unwrap(), Some(128));
    }

    #[test]
    fn test_entity_domain() {
        assert_eq!(entity_domain("light.kitchen"), "light");
        assert_eq!(entity_domain("light"), "light");
    }
}
