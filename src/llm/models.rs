//! Wire types for the OpenAI-compatible completion provider

use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Serialize)]
pub struct ChatCompletionRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub temperature: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// Response fields that may carry the completion, in priority order:
/// chat-style `choices[0].message.content`, then `response.content`, then
/// `result.summary`.
const CONTENT_POINTERS: [&str; 3] = [
    "/choices/0/message/content",
    "/response/content",
    "/result/summary",
];

/// Pull the completion text out of a provider response, trimmed
pub fn extract_content(response: &Value) -> Option<String> {
    CONTENT_POINTERS.iter().find_map(|pointer| {
        response
            .pointer(pointer)
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
            .map(|s| s.trim().to_string())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_chat_style_response() {
        let body = json!({"choices": [{"message": {"role": "assistant", "content": "  done \n"}}]});
        assert_eq!(extract_content(&body), Some("done".to_string()));
    }

    #[test]
    fn test_fallback_shapes() {
        let body = json!({"response": {"content": "from response"}});
        assert_eq!(extract_content(&body), Some("from response".to_string()));

        let body = json!({"result": {"summary": "from result"}});
        assert_eq!(extract_content(&body), Some("from result".to_string()));
    }

    #[test]
    fn test_chat_style_wins() {
        let body = json!({
            "choices": [{"message": {"content": "chat"}}],
            "result": {"summary": "result"}
        });
        assert_eq!(extract_content(&body), Some("chat".to_string()));
    }

    #[test]
    fn test_empty_choice_falls_through() {
        let body = json!({"choices": [{"message": {"content": ""}}], "response": {"content": "next"}});
        assert_eq!(extract_content(&body), Some("next".to_string()));
    }

    #[test]
    fn test_unknown_shape() {
        assert_eq!(extract_content(&json!({"choices": []})), None);
        assert_eq!(extract_content(&json!({"foo": 1})), None);
    }

    #[test]
    fn test_request_serialization() {
        let request = ChatCompletionRequest {
            model: "llama3-8b".to_string(),
            messages: vec![ChatMessage::system("sys"), ChatMessage::user("hi")],
            temperature: 0.2,
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["model"], "llama3-8b");
        assert_eq!(value["messages"][0]["role"], "system");
        assert_eq!(value["messages"][1]["content"], "hi");
        assert!((value["temperature"].as_f64().unwrap() - 0.2).abs() < 1e-6);
    }
}
