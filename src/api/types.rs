use serde::{Deserialize, Serialize};

/// Generation style requested from the backend. Serialized as the `type` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MapMode {
    #[default]
    Simple,
    Analogy,
    Text,
}

impl MapMode {
    pub const ALL: [MapMode; 3] = [MapMode::Simple, MapMode::Analogy, MapMode::Text];

    pub fn as_str(&self) -> &'static str {
        match self {
            MapMode::Simple => "simple",
            MapMode::Analogy => "analogy",
            MapMode::Text => "text",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            MapMode::Simple => "Simple Mind Map",
            MapMode::Analogy => "Analogy-Based",
            MapMode::Text => "Text-to-Mind Map",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            MapMode::Simple => "Creates a standard mind map with hierarchical concepts.",
            MapMode::Analogy => {
                "Generates a mind map using a real-world analogy to explain the topic."
            }
            MapMode::Text => "Analyzes your text to extract key concepts and relationships.",
        }
    }

    pub fn next(self) -> Self {
        match self {
            MapMode::Simple => MapMode::Analogy,
            MapMode::Analogy => MapMode::Text,
            MapMode::Text => MapMode::Simple,
        }
    }
}

/// Body of `POST /generate-mindmap`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MindMapRequest {
    pub topic: String,
    #[serde(rename = "type")]
    pub mode: MapMode,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

impl MindMapRequest {
    /// Builds a request; `text` is only carried in [`MapMode::Text`].
    pub fn new(topic: impl Into<String>, mode: MapMode, text: Option<String>) -> Self {
        Self {
            topic: topic.into(),
            mode,
            text: if mode == MapMode::Text { text } else { None },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct MindMapResponse {
    #[serde(rename = "mermaidCode")]
    pub diagram_source: String,
    #[serde(default)]
    pub svg: Option<String>,
    #[serde(rename = "mindMapId", default)]
    pub mind_map_id: Option<String>,
}

impl MindMapResponse {
    pub fn from_source(source: impl Into<String>) -> Self {
        Self {
            diagram_source: source.into(),
            svg: None,
            mind_map_id: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageResult {
    pub url: String,
    #[serde(rename = "alt", default)]
    pub alt_text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserInfo {
    #[serde(default)]
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub picture: String,
}

/// Payload of `GET /user`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub user: UserInfo,
    #[serde(default)]
    pub is_admin: bool,
    #[serde(default)]
    pub limit: Option<u32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    Online,
    #[default]
    #[serde(other)]
    Offline,
}

impl SessionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionStatus::Online => "online",
            SessionStatus::Offline => "offline",
        }
    }
}

/// One row of `GET /admin/sessions`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminSession {
    pub email: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub ip: String,
    #[serde(rename = "agent", default)]
    pub user_agent: String,
    #[serde(rename = "login_time", default)]
    pub login_time: String,
    #[serde(rename = "last_active", default)]
    pub last_active: String,
    #[serde(rename = "mindMapsUsed", default)]
    pub mind_maps_used: u32,
    #[serde(rename = "mindMapLimit", default)]
    pub mind_map_limit: u32,
    #[serde(default)]
    pub status: SessionStatus,
}

impl AdminSession {
    pub fn limit_reached(&self) -> bool {
        self.mind_maps_used >= self.mind_map_limit
    }

    pub fn is_online(&self) -> bool {
        self.status == SessionStatus::Online
    }

    /// Case-insensitive substring match over email, name and IP.
    /// `needle` must already be lowercased.
    pub fn matches(&self, needle: &str) -> bool {
        needle.is_empty()
            || self.email.to_lowercase().contains(needle)
            || self.name.to_lowercase().contains(needle)
            || self.ip.to_lowercase().contains(needle)
    }
}

/// Key of one cached diagram, as listed by `GET /admin/cached-maps`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CacheEntry {
    pub topic: String,
    #[serde(rename = "map_type")]
    pub map_type: String,
}

impl CacheEntry {
    pub fn new(topic: impl Into<String>, map_type: impl Into<String>) -> Self {
        Self {
            topic: topic.into(),
            map_type: map_type.into(),
        }
    }

    /// The form the backend keys its cache by: trimmed and lowercased.
    pub fn normalized(&self) -> Self {
        Self {
            topic: self.topic.trim().to_lowercase(),
            map_type: self.map_type.trim().to_lowercase(),
        }
    }

    pub fn key(&self) -> String {
        format!("{}_{}", self.topic, self.map_type)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminStats {
    #[serde(default)]
    pub total_users: u32,
    #[serde(default)]
    pub online_users: u32,
    #[serde(default)]
    pub total_mind_maps: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_serializes_mode_as_type() {
        let request = MindMapRequest::new("Cats", MapMode::Analogy, None);
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value, json!({"topic": "Cats", "type": "analogy"}));
    }

    #[test]
    fn test_request_drops_text_outside_text_mode() {
        let request = MindMapRequest::new("Cats", MapMode::Simple, Some("ignored".into()));
        assert!(request.text.is_none());

        let request = MindMapRequest::new("Cats", MapMode::Text, Some("paragraph".into()));
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(
            value,
            json!({"topic": "Cats", "type": "text", "text": "paragraph"})
        );
    }

    #[test]
    fn test_admin_session_wire_names() {
        let raw = json!({
            "email": "ada@example.com",
            "name": "Ada",
            "ip": "10.0.0.1",
            "agent": "curl/8",
            "login_time": "2024-05-01T10:00:00",
            "last_active": "2024-05-01T10:03:00",
            "status": "online",
            "mindMapsUsed": 5,
            "mindMapLimit": 5
        });
        let session: AdminSession = serde_json::from_value(raw).unwrap();
        assert_eq!(session.user_agent, "curl/8");
        assert!(session.is_online());
        assert!(session.limit_reached());
    }

    #[test]
    fn test_unknown_status_is_offline() {
        let raw = json!({"email": "x@example.com", "status": "away"});
        let session: AdminSession = serde_json::from_value(raw).unwrap();
        assert_eq!(session.status, SessionStatus::Offline);
    }

    #[test]
    fn test_session_matching_is_case_insensitive() {
        let session = AdminSession {
            email: "Ada@Example.com".into(),
            name: "Ada Lovelace".into(),
            ip: "192.168.1.20".into(),
            user_agent: String::new(),
            login_time: String::new(),
            last_active: String::new(),
            mind_maps_used: 0,
            mind_map_limit: 5,
            status: SessionStatus::Offline,
        };
        assert!(session.matches("ada@"));
        assert!(session.matches("lovelace"));
        assert!(session.matches("168.1"));
        assert!(!session.matches("grace"));
    }

    #[test]
    fn test_cache_entry_normalization() {
        let entry = CacheEntry::new("Cats ", "Simple");
        assert_eq!(entry.normalized(), CacheEntry::new("cats", "simple"));
        assert_eq!(
            serde_json::to_value(entry.normalized()).unwrap(),
            json!({"topic": "cats", "map_type": "simple"})
        );
    }
}
