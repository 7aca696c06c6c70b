//! Wire types for the gateway signaling protocol
//!
//! Request/response and pushed-event message shapes exchanged with the
//! gateway's REST signaling API, plus the command/event vocabulary.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

// ============================================================================
// Vocabulary
// ============================================================================

/// Command or event kind carried in the `janus` wire field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageKind {
    /// Create a new session
    Create,
    /// Attach a plugin handle inside a session
    Attach,
    /// Plugin-directed signaling command
    Message,
    /// Trickle an ICE candidate
    Trickle,
    /// Detach a plugin handle
    Detach,
    /// Asynchronous event pushed by the gateway
    Event,
    /// Transport-level keep-alive, carries no information
    KeepAlive,
    /// PeerConnection is up
    WebRtcUp,
    /// Media started or stopped flowing
    Media,
    /// Too many NACKs in the last second
    SlowLink,
    /// PeerConnection was closed
    HangUp,
    /// Destroy a session
    Destroy,
    /// Synchronous success response
    Success,
    /// Command acknowledged, result follows as an event
    Ack,
    /// Error response
    Error,
    /// Session timed out on the gateway
    Timeout,
    /// Plugin-specific kind not in the fixed vocabulary
    #[serde(untagged)]
    Other(String),
}

impl std::fmt::Display for MessageKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MessageKind::Create => write!(f, "create"),
            MessageKind::Attach => write!(f, "attach"),
            MessageKind::Message => write!(f, "message"),
            MessageKind::Trickle => write!(f, "trickle"),
            MessageKind::Detach => write!(f, "detach"),
            MessageKind::Event => write!(f, "event"),
            MessageKind::KeepAlive => write!(f, "keepalive"),
            MessageKind::WebRtcUp => write!(f, "webrtcup"),
            MessageKind::Media => write!(f, "media"),
            MessageKind::SlowLink => write!(f, "slowlink"),
            MessageKind::HangUp => write!(f, "hangup"),
            MessageKind::Destroy => write!(f, "destroy"),
            MessageKind::Success => write!(f, "success"),
            MessageKind::Ack => write!(f, "ack"),
            MessageKind::Error => write!(f, "error"),
            MessageKind::Timeout => write!(f, "timeout"),
            MessageKind::Other(kind) => write!(f, "{}", kind),
        }
    }
}

// ============================================================================
// Payloads
// ============================================================================

/// Identifier payload of create/attach success responses
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdData {
    /// Newly allocated session or handle identifier
    #[serde(deserialize_with = "deserialize_id")]
    pub id: u64,
}

/// Some gateway builds quote identifiers as strings
fn deserialize_id<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum IdRepr {
        Number(u64),
        Text(String),
    }

    match IdRepr::deserialize(deserializer)? {
        IdRepr::Number(id) => Ok(id),
        IdRepr::Text(text) => text.parse().map_err(serde::de::Error::custom),
    }
}

/// SDP offer/answer payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Jsep {
    /// Whether this is an offer or an answer
    #[serde(rename = "type")]
    pub kind: JsepType,
    /// The session description
    pub sdp: String,
}

impl Jsep {
    /// Create an offer payload
    pub fn offer(sdp: impl Into<String>) -> Self {
        Jsep {
            kind: JsepType::Offer,
            sdp: sdp.into(),
        }
    }

    /// Create an answer payload
    pub fn answer(sdp: impl Into<String>) -> Self {
        Jsep {
            kind: JsepType::Answer,
            sdp: sdp.into(),
        }
    }
}

/// SDP message type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JsepType {
    /// SDP offer
    Offer,
    /// SDP answer
    Answer,
}

/// Trickled ICE candidate payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IceCandidate {
    /// Candidate line from the SDP
    pub candidate: String,
    /// Media stream identification tag
    #[serde(rename = "sdpMid", skip_serializing_if = "Option::is_none")]
    pub sdp_mid: Option<String>,
    /// Index of the media description this candidate belongs to
    #[serde(rename = "sdpMLineIndex", skip_serializing_if = "Option::is_none")]
    pub sdp_mline_index: Option<u16>,
}

/// Plugin-specific payload attached to events and responses
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PluginData {
    /// Package name of the plugin that produced the payload
    pub plugin: String,
    /// Plugin-opaque state
    pub data: Value,
}

/// Error payload returned by the gateway
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayError {
    /// Numeric error code
    pub code: i64,
    /// Human-readable reason
    pub reason: String,
}

// ============================================================================
// Messages
// ============================================================================

/// One signaling message, in either direction
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignalingMessage {
    /// Command or event kind
    #[serde(rename = "janus")]
    pub kind: MessageKind,
    /// Correlation token matching a response to its request
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transaction: Option<String>,
    /// Session the message is scoped to
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_id: Option<u64>,
    /// Handle that emitted a pushed event
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sender: Option<u64>,
    /// Plugin package name (attach requests)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plugin: Option<String>,
    /// Identifier payload of create/attach successes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<IdData>,
    /// Plugin-specific payload
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plugindata: Option<PluginData>,
    /// Command parameters sent to a plugin
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<Map<String, Value>>,
    /// SDP offer/answer payload
    #[serde(skip_serializing_if = "Option::is_none")]
    pub jsep: Option<Jsep>,
    /// Trickled ICE candidate payload
    #[serde(skip_serializing_if = "Option::is_none")]
    pub candidate: Option<IceCandidate>,
    /// Error payload
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<GatewayError>,
    /// Media kind of a `media` event ("audio" or "video")
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub media_type: Option<String>,
    /// Whether media of that kind is being received
    #[serde(skip_serializing_if = "Option::is_none")]
    pub receiving: Option<bool>,
    /// Direction of a `slowlink` event, from the gateway's perspective
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uplink: Option<bool>,
    /// NACK count of a `slowlink` event
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nacks: Option<u32>,
    /// Reason attached to a `hangup` event
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl SignalingMessage {
    /// Create an outbound request with the given correlation token
    pub fn request(kind: MessageKind, transaction: impl Into<String>) -> Self {
        SignalingMessage {
            kind,
            transaction: Some(transaction.into()),
            session_id: None,
            sender: None,
            plugin: None,
            data: None,
            plugindata: None,
            body: None,
            jsep: None,
            candidate: None,
            error: None,
            media_type: None,
            receiving: None,
            uplink: None,
            nacks: None,
            reason: None,
        }
    }

    /// Set the plugin package name
    pub fn with_plugin(mut self, plugin: impl Into<String>) -> Self {
        self.plugin = Some(plugin.into());
        self
    }

    /// Set the command body
    pub fn with_body(mut self, body: Map<String, Value>) -> Self {
        self.body = Some(body);
        self
    }

    /// Set the SDP payload
    pub fn with_jsep(mut self, jsep: Jsep) -> Self {
        self.jsep = Some(jsep);
        self
    }

    /// Set the ICE candidate payload
    pub fn with_candidate(mut self, candidate: IceCandidate) -> Self {
        self.candidate = Some(candidate);
        self
    }

    /// Whether this is a synchronous success response
    pub fn is_success(&self) -> bool {
        self.kind == MessageKind::Success
    }

    /// Whether this is an acknowledgement of an asynchronous command
    pub fn is_ack(&self) -> bool {
        self.kind == MessageKind::Ack
    }

    /// Whether this is a transport-level keep-alive
    pub fn is_keepalive(&self) -> bool {
        self.kind == MessageKind::KeepAlive
    }

    /// Identifier carried in a create/attach success response
    pub fn data_id(&self) -> Option<u64> {
        self.data.as_ref().map(|data| data.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_wire_names() {
        assert_eq!(
            serde_json::to_string(&MessageKind::KeepAlive).unwrap(),
            "\"keepalive\""
        );
        assert_eq!(
            serde_json::to_string(&MessageKind::WebRtcUp).unwrap(),
            "\"webrtcup\""
        );
        let kind: MessageKind = serde_json::from_str("\"slowlink\"").unwrap();
        assert_eq!(kind, MessageKind::SlowLink);
    }

    #[test]
    fn test_unknown_kind_is_preserved() {
        let kind: MessageKind = serde_json::from_str("\"joined\"").unwrap();
        assert_eq!(kind, MessageKind::Other("joined".to_string()));
        assert_eq!(serde_json::to_string(&kind).unwrap(), "\"joined\"");
        assert_eq!(kind.to_string(), "joined");
    }

    #[test]
    fn test_request_skips_absent_fields() {
        let request = SignalingMessage::request(MessageKind::Create, "tx-1");
        let json = serde_json::to_value(&request).unwrap();
        let object = json.as_object().unwrap();
        assert_eq!(object.len(), 2);
        assert_eq!(object["janus"], "create");
        assert_eq!(object["transaction"], "tx-1");
    }

    #[test]
    fn test_decode_success_with_numeric_id() {
        let response: SignalingMessage =
            serde_json::from_str(r#"{"janus":"success","transaction":"t","data":{"id":12345}}"#)
                .unwrap();
        assert!(response.is_success());
        assert_eq!(response.data_id(), Some(12345));
    }

    #[test]
    fn test_decode_success_with_quoted_id() {
        let response: SignalingMessage =
            serde_json::from_str(r#"{"janus":"success","data":{"id":"12345"}}"#).unwrap();
        assert_eq!(response.data_id(), Some(12345));
    }

    #[test]
    fn test_decode_error_payload() {
        let response: SignalingMessage = serde_json::from_str(
            r#"{"janus":"error","transaction":"t","error":{"code":458,"reason":"No such session"}}"#,
        )
        .unwrap();
        let error = response.error.unwrap();
        assert_eq!(error.code, 458);
        assert_eq!(error.reason, "No such session");
    }

    #[test]
    fn test_decode_plugin_event() {
        let event: SignalingMessage = serde_json::from_str(
            r#"{
                "janus": "event",
                "sender": 987,
                "plugindata": {
                    "plugin": "janus.plugin.videoroom",
                    "data": {"videoroom": "joined", "room": 1234, "id": 42}
                },
                "jsep": {"type": "answer", "sdp": "v=0..."}
            }"#,
        )
        .unwrap();
        assert_eq!(event.kind, MessageKind::Event);
        assert_eq!(event.sender, Some(987));
        let plugindata = event.plugindata.unwrap();
        assert_eq!(plugindata.plugin, "janus.plugin.videoroom");
        assert_eq!(plugindata.data["room"], 1234);
        assert_eq!(event.jsep.unwrap().kind, JsepType::Answer);
    }

    #[test]
    fn test_candidate_wire_renames() {
        let message = SignalingMessage::request(MessageKind::Trickle, "t").with_candidate(
            IceCandidate {
                candidate: "candidate:0 1 UDP 2122252543 198.51.100.7 49203 typ host".to_string(),
                sdp_mid: Some("0".to_string()),
                sdp_mline_index: Some(0),
            },
        );
        let json = serde_json::to_value(&message).unwrap();
        assert!(json["candidate"]["sdpMid"].is_string());
        assert!(json["candidate"]["sdpMLineIndex"].is_number());
    }

    #[test]
    fn test_decode_media_event_fields() {
        let event: SignalingMessage = serde_json::from_str(
            r#"{"janus":"media","sender":987,"type":"audio","receiving":true}"#,
        )
        .unwrap();
        assert_eq!(event.kind, MessageKind::Media);
        assert_eq!(event.media_type.as_deref(), Some("audio"));
        assert_eq!(event.receiving, Some(true));
    }
}
