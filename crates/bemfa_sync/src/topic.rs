use strum::AsRefStr;
use strum::Display;
use strum::EnumIter;
use strum::IntoEnumIterator;

use crate::entity::entity_domain;
use crate::error::Result;
use crate::error::SyncError;

/// Device class suffix of a bemfa topic.
///
/// bemfa routes a topic to a device type by its last three digits, so the light
/// "livingroom" lives on topic `livingroom002`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, AsRefStr, EnumIter)]
pub enum TopicSuffix {
    #[strum(serialize = "001")]
    Outlet,
    #[strum(serialize = "002")]
    Light,
    #[strum(serialize = "003")]
    Fan,
    #[strum(serialize = "004")]
    Sensor,
    #[strum(serialize = "005")]
    Climate,
    #[strum(serialize = "006")]
    Switch,
    #[strum(serialize = "009")]
    Cover,
}

impl TopicSuffix {
    /// Recover the suffix from a full topic name
    pub fn from_topic(topic: &str) -> Option<Self> {
        Self::iter().find(|suffix| {
            let suffix: &str = suffix.as_ref();
            topic.len() > suffix.len() && topic.ends_with(suffix)
        })
    }
}

/// Full topic name for a base name and device class.
pub fn topic_name(base: &str, suffix: TopicSuffix) -> Result<String> {
    validate_topic_base(base)?;
    Ok(format!("{}{}", base, suffix))
}

/// bemfa only accepts ASCII letters and digits in topic names.
pub fn validate_topic_base(base: &str) -> Result<()> {
    if base.is_empty() || !base.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(SyncError::InvalidTopic(base.to_string()));
    }
    Ok(())
}

/// Topic base derived from an entity ID: its object ID without separators.
pub fn default_topic_base(entity_id: &str) -> String {
    let object_id = entity_id
        .strip_prefix(entity_domain(entity_id))
        .and_then(|rest| rest.strip_prefix('.'))
        .unwrap_or(entity_id);

    object_id
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .collect()
}
