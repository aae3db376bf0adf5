use reqwest::{Client, RequestBuilder};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::Value;
use tracing::debug;

use crate::error::{Result, TelegramError};

pub const TELEGRAM_API_URL: &str = "https://api.telegram.org";

/// Thin Bot API client.
/// https://core.telegram.org/bots/api
#[derive(Clone)]
pub struct TgBot {
    client: Client,
    base_api: String,
    token: String,
}

impl TgBot {
    pub fn new(token: impl Into<String>) -> Self {
        Self::with_base_url(TELEGRAM_API_URL, token)
    }

    pub fn with_base_url(base_api: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_api: base_api.into(),
            token: token.into(),
        }
    }

    fn method_url(&self, method: &str) -> String {
        format!(
            "{}/bot{}/{}",
            self.base_api.trim_end_matches('/'),
            self.token,
            method
        )
    }

    fn get(&self, method: &str) -> RequestBuilder {
        self.client.get(self.method_url(method))
    }

    fn post(&self, method: &str) -> RequestBuilder {
        self.client.post(self.method_url(method))
    }

    async fn call<T: DeserializeOwned>(
        &self,
        method: &'static str,
        request: RequestBuilder,
    ) -> Result<T> {
        let request_failed = |source: reqwest::Error| TelegramError::Request {
            method,
            source: source.without_url(),
        };

        let response = request.send().await.map_err(request_failed)?;
        let status = response.status();
        let body = response.text().await.map_err(request_failed)?;
        debug!(method, status = status.as_u16(), "telegram response");

        if !status.is_success() {
            return Err(TelegramError::Http {
                method,
                status: status.as_u16(),
                body,
            });
        }

        let result = acknowledged(method, &body)?;
        serde_json::from_value(result).map_err(|source| TelegramError::Decode {
            method,
            body,
            source,
        })
    }

    /// Identity of the bot behind the token.
    pub async fn get_me(&self) -> Result<User> {
        self.call("getMe", self.get("getMe")).await
    }

    pub async fn get_chat(&self, chat_id: i64) -> Result<Chat> {
        let request = self.get("getChat").query(&[("chat_id", chat_id)]);
        self.call("getChat", request).await
    }

    /// Pending updates; the usual way to find the id of a chat the bot was
    /// added to.
    pub async fn get_updates(&self) -> Result<Vec<Update>> {
        self.call("getUpdates", self.get("getUpdates")).await
    }

    pub async fn send_message(
        &self,
        chat_id: i64,
        text: &str,
        disable_notification: bool,
    ) -> Result<Message> {
        let request = self.post("sendMessage").json(&SendMessage {
            chat_id,
            text,
            disable_notification,
        });
        self.call("sendMessage", request).await
    }
}

/// Unwrap the `{"ok": ..., "result": ...}` envelope every Bot API method
/// answers with.
fn acknowledged(method: &'static str, body: &str) -> Result<Value> {
    let envelope: Envelope =
        serde_json::from_str(body).map_err(|source| TelegramError::Decode {
            method,
            body: body.to_string(),
            source,
        })?;

    if !envelope.ok {
        return Err(TelegramError::Rejected {
            method,
            description: envelope.description.unwrap_or_else(|| body.to_string()),
        });
    }

    Ok(envelope.result.unwrap_or(Value::Null))
}

#[derive(Debug, Deserialize)]
struct Envelope {
    #[serde(default)]
    ok: bool,
    description: Option<String>,
    result: Option<Value>,
}

#[derive(Debug, Serialize)]
struct SendMessage<'a> {
    chat_id: i64,
    text: &'a str,
    disable_notification: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct User {
    pub id: i64,
    pub is_bot: bool,
    pub first_name: String,
    pub username: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Chat {
    pub id: i64,

    #[serde(rename = "type")]
    pub kind: String,

    pub title: Option<String>,
    pub username: Option<String>,
    pub first_name: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Message {
    pub message_id: i64,
    pub date: i64,
    pub chat: Chat,
    pub text: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Update {
    pub update_id: i64,
    pub message: Option<Message>,
    pub channel_post: Option<Message>,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_negative_ack_is_rejected() {
        let body = r#"{"ok":false,"error_code":400,"description":"Bad Request: chat not found"}"#;
        match acknowledged("sendMessage", body) {
            Err(TelegramError::Rejected {
                method,
                description,
            }) => {
                assert_eq!(method, "sendMessage");
                assert_eq!(description, "Bad Request: chat not found");
            }
            other => panic!("expected Rejected, got {other:?}"),
        }
    }

    #[test]
    fn test_missing_ack_flag_is_rejected() {
        let body = r#"{"result":{"id":1}}"#;
        match acknowledged("getMe", body) {
            Err(TelegramError::Rejected { description, .. }) => assert_eq!(description, body),
            other => panic!("expected Rejected, got {other:?}"),
        }
    }

    #[test]
    fn test_positive_ack_yields_result() {
        let body = r#"{"ok":true,"result":{"id":7,"is_bot":true,"first_name":"Quotes"}}"#;
        let user: User = serde_json::from_value(acknowledged("getMe", body).unwrap()).unwrap();
        assert_eq!(user.id, 7);
        assert!(user.is_bot);
        assert_eq!(user.username, None);
    }

    #[test]
    fn test_non_json_body_is_decode_error() {
        assert!(matches!(
            acknowledged("getMe", "<html>bad gateway</html>"),
            Err(TelegramError::Decode { .. })
        ));
    }

    #[test]
    fn test_updates_deserialize() {
        let result = json!([
            {
                "update_id": 10,
                "message": {
                    "message_id": 3,
                    "date": 1_600_000_000,
                    "chat": { "id": -100_200, "type": "group", "title": "Stocks" },
                    "text": "/start"
                }
            },
            { "update_id": 11 }
        ]);
        let updates: Vec<Update> = serde_json::from_value(result).unwrap();
        assert_eq!(updates.len(), 2);

        let chat = &updates[0].message.as_ref().unwrap().chat;
        assert_eq!(chat.id, -100_200);
        assert_eq!(chat.kind, "group");
        assert!(updates[1].message.is_none());
    }

    #[test]
    fn test_send_message_payload() {
        let payload = serde_json::to_value(SendMessage {
            chat_id: 42,
            text: "hi",
            disable_notification: true,
        })
        .unwrap();
        assert_eq!(
            payload,
            json!({ "chat_id": 42, "text": "hi", "disable_notification": true })
        );
    }

    #[test]
    fn test_method_url_embeds_token() {
        let bot = TgBot::with_base_url("http://localhost:8081/", "123:abc");
        assert_eq!(
            bot.method_url("getMe"),
            "http://localhost:8081/bot123:abc/getMe"
        );
    }
}
