//! Generative model client (Gemini `generateContent` REST API).
//!
//! Three single-shot calls back the AI terminal: conversational chat,
//! script analysis into storyboard scenes, and image generation for a scene.
//! Oversized inputs are truncated before the request is built. None of the
//! calls retry.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use retro_types::config::RetroConfig;
use retro_types::error::{Result, RetroError};

use crate::http;
use crate::tls::TlsProvider;

/// Longest chat message sent as-is (characters).
pub const MAX_CHAT_CHARS: usize = 50_000;

/// Longest script sent as-is (characters).
pub const MAX_SCRIPT_CHARS: usize = 800_000;

const CHAT_TRUNCATION_SUFFIX: &str = "...";
const SCRIPT_TRUNCATION_SUFFIX: &str = "\n\n[Script truncated due to length limitations]";

/// Reply used when the model answers with no text at all.
pub const NO_DATA_REPLY: &str = "SYSTEM ERROR: NO DATA RECEIVED.";

const SYSTEM_INSTRUCTION: &str = "You are the AI interface for a retro game console OS \
(Retro-OS). Speak in a helpful, slightly robotic, retro-tech style. Keep responses concise \
and text-based.";

const SCRIPT_PROMPT: &str = "Break down the following movie/video script into a sequence of \
key visual scenes for a storyboard.\nFor each scene, provide a short description and a highly \
descriptive visual prompt suitable for an AI image generator.\nThe visual prompt should \
describe camera angle, lighting, subject, and action.\n\nScript:\n";

/// Speaker of a history turn as the remote API names it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TurnRole {
    User,
    Model,
}

/// One prior message of a conversation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryTurn {
    pub role: TurnRole,
    pub text: String,
}

/// A storyboard scene as returned by script analysis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SceneOutline {
    pub scene_number: u32,
    pub description: String,
    pub visual_prompt: String,
}

/// The remote model, as seen by the rest of the system.
///
/// Implementations block; callers run them off the frame loop.
pub trait GenerativeModel: Send + Sync {
    /// Continue a conversation. `history` is every prior message in order.
    fn send_chat(&self, history: &[HistoryTurn], message: &str) -> Result<String>;

    /// Split a script into ordered storyboard scenes.
    fn analyze_script(&self, script: &str) -> Result<Vec<SceneOutline>>;

    /// Render a visual prompt; returns a `data:<mime>;base64,...` URI.
    fn generate_image(&self, visual_prompt: &str) -> Result<String>;
}

/// Truncate `text` to `max_chars` characters, appending `suffix` if cut.
fn truncate_with_suffix(text: &str, max_chars: usize, suffix: &str) -> String {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => {
            let mut out = String::with_capacity(byte_idx + suffix.len());
            out.push_str(&text[..byte_idx]);
            out.push_str(suffix);
            out
        },
        None => text.to_string(),
    }
}

/// Clamp a chat message to [`MAX_CHAT_CHARS`].
pub fn truncate_message(message: &str) -> String {
    truncate_with_suffix(message, MAX_CHAT_CHARS, CHAT_TRUNCATION_SUFFIX)
}

/// Clamp a script to [`MAX_SCRIPT_CHARS`].
pub fn truncate_script(script: &str) -> String {
    let out = truncate_with_suffix(script, MAX_SCRIPT_CHARS, SCRIPT_TRUNCATION_SUFFIX);
    if out.len() != script.len() {
        log::warn!(
            "Script too large ({} chars), truncated to {MAX_SCRIPT_CHARS}",
            script.chars().count()
        );
    }
    out
}

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest {
    contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    role: Option<TurnRole>,
    #[serde(default)]
    parts: Vec<Part>,
}

impl Content {
    fn text(role: Option<TurnRole>, text: impl Into<String>) -> Self {
        Self {
            role,
            parts: vec![Part {
                text: Some(text.into()),
                inline_data: None,
            }],
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    inline_data: Option<InlineData>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InlineData {
    mime_type: String,
    data: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_mime_type: String,
    response_schema: serde_json::Value,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    #[serde(default)]
    message: String,
    #[serde(default)]
    status: String,
}

impl GenerateResponse {
    fn first_parts(&self) -> &[Part] {
        self.candidates
            .first()
            .and_then(|c| c.content.as_ref())
            .map(|c| c.parts.as_slice())
            .unwrap_or_default()
    }

    /// Concatenated text parts of the first candidate.
    fn text(&self) -> Option<String> {
        let text: String = self
            .first_parts()
            .iter()
            .filter_map(|p| p.text.as_deref())
            .collect();
        if text.is_empty() { None } else { Some(text) }
    }

    /// First inline image of the first candidate, as a data URI.
    fn image_data_uri(&self) -> Option<String> {
        self.first_parts()
            .iter()
            .filter_map(|p| p.inline_data.as_ref())
            .find(|d| !d.data.is_empty())
            .map(|d| format!("data:{};base64,{}", d.mime_type, d.data))
    }
}

fn build_chat_request(history: &[HistoryTurn], message: &str) -> GenerateRequest {
    let mut contents: Vec<Content> = history
        .iter()
        .map(|turn| Content::text(Some(turn.role), turn.text.clone()))
        .collect();
    contents.push(Content::text(Some(TurnRole::User), truncate_message(message)));
    GenerateRequest {
        contents,
        system_instruction: Some(Content::text(None, SYSTEM_INSTRUCTION)),
        generation_config: None,
    }
}

fn scene_schema() -> serde_json::Value {
    serde_json::json!({
        "type": "ARRAY",
        "items": {
            "type": "OBJECT",
            "properties": {
                "sceneNumber": { "type": "NUMBER" },
                "description": { "type": "STRING" },
                "visualPrompt": { "type": "STRING" }
            },
            "required": ["sceneNumber", "description", "visualPrompt"]
        }
    })
}

fn build_script_request(script: &str) -> GenerateRequest {
    let prompt = format!("{SCRIPT_PROMPT}{}", truncate_script(script));
    GenerateRequest {
        contents: vec![Content::text(Some(TurnRole::User), prompt)],
        system_instruction: None,
        generation_config: Some(GenerationConfig {
            response_mime_type: "application/json".to_string(),
            response_schema: scene_schema(),
        }),
    }
}

fn build_image_request(visual_prompt: &str) -> GenerateRequest {
    GenerateRequest {
        contents: vec![Content::text(Some(TurnRole::User), visual_prompt)],
        system_instruction: None,
        generation_config: None,
    }
}

/// Scenes come back as a JSON array; numbers may be floats (`1.0`).
fn parse_scenes(text: &str) -> Result<Vec<SceneOutline>> {
    #[derive(Deserialize)]
    #[serde(rename_all = "camelCase")]
    struct RawScene {
        scene_number: f64,
        description: String,
        visual_prompt: String,
    }

    let raw: Vec<RawScene> = serde_json::from_str(text.trim())?;
    Ok(raw
        .into_iter()
        .map(|s| SceneOutline {
            scene_number: s.scene_number.max(0.0) as u32,
            description: s.description,
            visual_prompt: s.visual_prompt,
        })
        .collect())
}

/// Turn a non-200 response into an API error with the server's message.
fn api_error(status: u16, body: &[u8]) -> RetroError {
    match serde_json::from_slice::<ErrorEnvelope>(body) {
        Ok(env) if !env.error.message.is_empty() => RetroError::Api(format!(
            "HTTP {status} {}: {}",
            env.error.status, env.error.message
        )),
        _ => RetroError::Api(format!("HTTP {status}")),
    }
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

/// Blocking client for the hosted model.
pub struct GenAiClient {
    host: String,
    api_key: Option<String>,
    chat_model: String,
    script_model: String,
    image_model: String,
    tls: Arc<dyn TlsProvider>,
}

impl GenAiClient {
    pub fn from_config(config: &RetroConfig, tls: Arc<dyn TlsProvider>) -> Self {
        Self {
            host: config.api_host.clone(),
            api_key: config.api_key.clone(),
            chat_model: config.chat_model.clone(),
            script_model: config.script_model.clone(),
            image_model: config.image_model.clone(),
            tls,
        }
    }

    /// Whether an API key is configured.
    pub fn is_online(&self) -> bool {
        self.api_key.is_some()
    }

    fn generate(&self, model: &str, request: &GenerateRequest) -> Result<GenerateResponse> {
        let key = self
            .api_key
            .as_deref()
            .ok_or_else(|| RetroError::Config("no API key configured".to_string()))?;

        let body = serde_json::to_vec(request)?;
        let path = format!("/v1beta/models/{model}:generateContent");
        log::debug!("POST {}{path} ({} bytes)", self.host, body.len());

        let resp = http::post_json(
            &self.host,
            &path,
            &[("x-goog-api-key", key)],
            &body,
            self.tls.as_ref(),
        )?;

        if resp.status_code != 200 {
            let err = api_error(resp.status_code, &resp.body);
            log::error!("{model}: {err}");
            return Err(err);
        }
        Ok(serde_json::from_slice(&resp.body)?)
    }
}

impl GenerativeModel for GenAiClient {
    fn send_chat(&self, history: &[HistoryTurn], message: &str) -> Result<String> {
        let request = build_chat_request(history, message);
        let resp = self.generate(&self.chat_model, &request)?;
        Ok(resp.text().unwrap_or_else(|| NO_DATA_REPLY.to_string()))
    }

    fn analyze_script(&self, script: &str) -> Result<Vec<SceneOutline>> {
        let request = build_script_request(script);
        let resp = self.generate(&self.script_model, &request)?;
        let text = resp
            .text()
            .ok_or_else(|| RetroError::Api("no response text received".to_string()))?;
        parse_scenes(&text)
    }

    fn generate_image(&self, visual_prompt: &str) -> Result<String> {
        let request = build_image_request(visual_prompt);
        let resp = self.generate(&self.image_model, &request)?;
        resp.image_data_uri()
            .ok_or_else(|| RetroError::Api("no image data found in response".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use std::net::TcpStream;

    use super::*;
    use crate::tls::NetStream;

    struct NoTls;

    impl TlsProvider for NoTls {
        fn connect_tls(&self, _s: TcpStream, _n: &str) -> Result<Box<dyn NetStream>> {
            Err(RetroError::Network("offline".into()))
        }
    }

    #[test]
    fn short_message_untouched() {
        assert_eq!(truncate_message("hello"), "hello");
    }

    #[test]
    fn long_message_truncated_with_ellipsis() {
        let long = "x".repeat(MAX_CHAT_CHARS + 10);
        let out = truncate_message(&long);
        assert_eq!(out.chars().count(), MAX_CHAT_CHARS + 3);
        assert!(out.ends_with("..."));
    }

    #[test]
    fn message_at_ceiling_untouched() {
        let exact = "y".repeat(MAX_CHAT_CHARS);
        assert_eq!(truncate_message(&exact), exact);
    }

    #[test]
    fn truncation_respects_char_boundaries() {
        let long = "\u{00E9}".repeat(MAX_CHAT_CHARS + 1);
        let out = truncate_message(&long);
        assert!(out.starts_with('\u{00E9}'));
        assert_eq!(out.chars().filter(|c| *c == '\u{00E9}').count(), MAX_CHAT_CHARS);
    }

    #[test]
    fn long_script_gets_marker() {
        let long = "s".repeat(MAX_SCRIPT_CHARS + 1);
        let out = truncate_script(&long);
        assert!(out.ends_with(SCRIPT_TRUNCATION_SUFFIX));
        assert_eq!(
            out.chars().count(),
            MAX_SCRIPT_CHARS + SCRIPT_TRUNCATION_SUFFIX.chars().count()
        );
    }

    #[test]
    fn chat_request_tags_roles_and_appends_message() {
        let history = vec![
            HistoryTurn {
                role: TurnRole::User,
                text: "hi".into(),
            },
            HistoryTurn {
                role: TurnRole::Model,
                text: "GREETINGS.".into(),
            },
        ];
        let req = build_chat_request(&history, "play doom");
        let json = serde_json::to_value(&req).unwrap();
        let contents = json["contents"].as_array().unwrap();
        assert_eq!(contents.len(), 3);
        assert_eq!(contents[0]["role"], "user");
        assert_eq!(contents[1]["role"], "model");
        assert_eq!(contents[1]["parts"][0]["text"], "GREETINGS.");
        assert_eq!(contents[2]["role"], "user");
        assert_eq!(contents[2]["parts"][0]["text"], "play doom");
        assert!(json["systemInstruction"]["parts"][0]["text"]
            .as_str()
            .unwrap()
            .contains("Retro-OS"));
        assert!(json.get("generationConfig").is_none());
    }

    #[test]
    fn script_request_carries_schema() {
        let req = build_script_request("INT. ARCADE - NIGHT");
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["generationConfig"]["responseMimeType"], "application/json");
        assert_eq!(json["generationConfig"]["responseSchema"]["type"], "ARRAY");
        let prompt = json["contents"][0]["parts"][0]["text"].as_str().unwrap();
        assert!(prompt.ends_with("INT. ARCADE - NIGHT"));
    }

    #[test]
    fn response_text_concatenates_parts() {
        let resp: GenerateResponse = serde_json::from_str(
            r#"{"candidates":[{"content":{"role":"model","parts":[{"text":"A"},{"text":"B"}]}}]}"#,
        )
        .unwrap();
        assert_eq!(resp.text().as_deref(), Some("AB"));
    }

    #[test]
    fn empty_response_has_no_text() {
        let resp: GenerateResponse = serde_json::from_str(r#"{"candidates":[]}"#).unwrap();
        assert_eq!(resp.text(), None);
        let resp: GenerateResponse = serde_json::from_str("{}").unwrap();
        assert_eq!(resp.image_data_uri(), None);
    }

    #[test]
    fn image_data_uri_from_inline_data() {
        let resp: GenerateResponse = serde_json::from_str(
            r#"{"candidates":[{"content":{"parts":[
                {"text":"here you go"},
                {"inlineData":{"mimeType":"image/png","data":"iVBORw0KGgo="}}
            ]}}]}"#,
        )
        .unwrap();
        assert_eq!(
            resp.image_data_uri().as_deref(),
            Some("data:image/png;base64,iVBORw0KGgo=")
        );
    }

    #[test]
    fn scenes_parse_with_float_numbers() {
        let scenes = parse_scenes(
            r#"[{"sceneNumber":1.0,"description":"Arcade","visualPrompt":"wide shot"},
                {"sceneNumber":2,"description":"Boss","visualPrompt":"close up"}]"#,
        )
        .unwrap();
        assert_eq!(scenes.len(), 2);
        assert_eq!(scenes[0].scene_number, 1);
        assert_eq!(scenes[1].visual_prompt, "close up");
    }

    #[test]
    fn malformed_scenes_are_json_errors() {
        assert!(matches!(parse_scenes("not json"), Err(RetroError::Json(_))));
    }

    #[test]
    fn api_error_uses_server_message() {
        let body = br#"{"error":{"code":429,"message":"quota exceeded","status":"RESOURCE_EXHAUSTED"}}"#;
        let err = api_error(429, body);
        assert_eq!(
            format!("{err}"),
            "model API error: HTTP 429 RESOURCE_EXHAUSTED: quota exceeded"
        );
        assert_eq!(format!("{}", api_error(502, b"<html>")), "model API error: HTTP 502");
    }

    #[test]
    fn missing_key_fails_before_network() {
        let client = GenAiClient::from_config(&RetroConfig::default(), Arc::new(NoTls));
        assert!(!client.is_online());
        let err = client.send_chat(&[], "hello").unwrap_err();
        assert!(matches!(err, RetroError::Config(_)));
    }
}
