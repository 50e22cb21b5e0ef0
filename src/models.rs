use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};

#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub backend: BackendConfig,
    pub server: ServerConfig,
    pub notification: NotificationConfig,
}

#[derive(Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct BackendConfig {
    pub base_url: String,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8000".to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    pub addr: String,
    pub title: String,
    pub timezone: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: "0.0.0.0:3009".to_string(),
            title: "Mergington High School".to_string(),
            timezone: "UTC".to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct NotificationConfig {
    pub hide_after_secs: u64,
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self { hide_after_secs: 5 }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ActivityDetails {
    pub description: String,
    pub schedule: String,
    pub max_participants: i64,
    #[serde(default)]
    pub participants: Vec<String>,
}

impl ActivityDetails {
    /// Remaining capacity. Negative when the server has over-allocated.
    pub fn spots_left(&self) -> i64 {
        self.max_participants - self.participants.len() as i64
    }
}

/// Activities keyed by name, in the order the server sent them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ActivitySet {
    entries: Vec<(String, ActivityDetails)>,
}

impl ActivitySet {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ActivityDetails)> {
        self.entries.iter().map(|(name, details)| (name.as_str(), details))
    }

}

impl FromIterator<(String, ActivityDetails)> for ActivitySet {
    fn from_iter<I: IntoIterator<Item = (String, ActivityDetails)>>(iter: I) -> Self {
        let mut set = ActivitySet::default();
        for (name, details) in iter {
            // Later duplicates replace earlier ones in place, like a JSON object.
            match set.entries.iter_mut().find(|(n, _)| *n == name) {
                Some(slot) => slot.1 = details,
                None => set.entries.push((name, details)),
            }
        }
        set
    }
}

impl<'de> Deserialize<'de> for ActivitySet {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct SetVisitor;

        impl<'de> Visitor<'de> for SetVisitor {
            type Value = ActivitySet;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of activity name to activity details")
            }

            fn visit_map<M: MapAccess<'de>>(self, mut map: M) -> Result<ActivitySet, M::Error> {
                let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some(entry) = map.next_entry::<String, ActivityDetails>()? {
                    entries.push(entry);
                }
                Ok(entries.into_iter().collect())
            }
        }

        deserializer.deserialize_map(SetVisitor)
    }
}

/// How the backend answered a signup or unregister request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServerReply {
    /// 2xx with the server's confirmation text.
    Accepted { message: String },
    /// Any other status, with the server's `detail` when it sent one.
    Rejected { status: u16, detail: Option<String> },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_activity_set_keeps_server_order() {
        let json = r#"{
            "Zumba": {"description": "Dance", "schedule": "Mon", "max_participants": 10, "participants": []},
            "Art Club": {"description": "Paint", "schedule": "Tue", "max_participants": 5, "participants": ["a@x.com"]},
            "Chess Club": {"description": "Chess", "schedule": "Fri", "max_participants": 12, "participants": []}
        }"#;
        let set: ActivitySet = serde_json::from_str(json).unwrap();
        let names: Vec<&str> = set.iter().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["Zumba", "Art Club", "Chess Club"]);
        let (_, art) = set.iter().find(|(name, _)| *name == "Art Club").unwrap();
        assert_eq!(art.participants, vec!["a@x.com"]);
    }

    #[test]
    fn test_spots_left_is_not_clamped() {
        let details = ActivityDetails {
            description: String::new(),
            schedule: String::new(),
            max_participants: 1,
            participants: vec!["a@x.com".into(), "b@x.com".into(), "c@x.com".into()],
        };
        assert_eq!(details.spots_left(), -2);
    }

    #[test]
    fn test_activity_set_rejects_non_object() {
        assert!(serde_json::from_str::<ActivitySet>("[1, 2]").is_err());
        assert!(serde_json::from_str::<ActivitySet>(r#"{"X": {"description": "d"}}"#).is_err());
    }

    #[test]
    fn test_config_defaults_fill_missing_keys() {
        let cfg: Config = toml::from_str("[backend]\nbase_url = \"http://api:9000\"\n").unwrap();
        assert_eq!(cfg.backend.base_url, "http://api:9000");
        assert_eq!(cfg.server.addr, "0.0.0.0:3009");
        assert_eq!(cfg.notification.hide_after_secs, 5);
    }
}
