// ==========================================
// 啤酒库存对账系统 - Telegram 通知
// ==========================================
// 接口: Telegram Bot API
// - sendMessage: HTML 模式, 正文转义, 上限 4096 字符
// - sendDocument: multipart 上传, 说明上限 1024 字符
// ==========================================

use crate::config::TelegramConfig;
use crate::delivery::error::{DeliveryError, DeliveryResult};
use crate::delivery::notifier::Notifier;
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::{debug, instrument};

/// 消息正文上限（字符）
pub const MESSAGE_LIMIT: usize = 4096;

/// 附件说明上限（字符）
pub const CAPTION_LIMIT: usize = 1024;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Serialize)]
struct SendMessageRequest<'a> {
    chat_id: &'a str,
    text: &'a str,
    parse_mode: &'a str,
}

#[derive(Debug, Deserialize)]
struct TelegramResponse {
    ok: bool,
    #[serde(default)]
    description: Option<String>,
}

#[derive(Clone)]
pub struct TelegramNotifier {
    config: TelegramConfig,
    http_client: reqwest::Client,
}

impl TelegramNotifier {
    pub fn new(config: TelegramConfig) -> DeliveryResult<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self {
            config,
            http_client,
        })
    }

    fn method_url(&self, method: &str) -> String {
        format!(
            "{}/bot{}/{}",
            self.config.api_base, self.config.bot_token, method
        )
    }

    async fn check_response(response: reqwest::Response) -> DeliveryResult<()> {
        let status = response.status();
        let body: Option<TelegramResponse> = response.json().await.ok();
        match body {
            Some(TelegramResponse { ok: true, .. }) if status.is_success() => Ok(()),
            other => Err(DeliveryError::TelegramApi {
                status: status.as_u16(),
                description: other
                    .and_then(|b| b.description)
                    .unwrap_or_else(|| "Unknown error".to_string()),
            }),
        }
    }
}

#[async_trait]
impl Notifier for TelegramNotifier {
    fn name(&self) -> &str {
        "telegram"
    }

    #[instrument(skip(self, title, body), fields(chat_id = %self.config.chat_id))]
    async fn send_message(&self, title: &str, body: &str) -> DeliveryResult<()> {
        let text = format_message(title, body);
        let request = SendMessageRequest {
            chat_id: &self.config.chat_id,
            text: &text,
            parse_mode: "HTML",
        };

        let response = self
            .http_client
            .post(self.method_url("sendMessage"))
            .json(&request)
            .send()
            .await?;
        Self::check_response(response).await?;
        debug!(chars = text.chars().count(), "Telegram 消息已发送");
        Ok(())
    }

    #[instrument(skip(self, caption), fields(path = %path.display()))]
    async fn send_document(&self, path: &Path, caption: &str) -> DeliveryResult<()> {
        let bytes = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "document.csv".to_string());

        let part = Part::bytes(bytes)
            .file_name(file_name)
            .mime_str("text/csv")?;
        let form = Form::new()
            .text("chat_id", self.config.chat_id.clone())
            .text(
                "caption",
                truncate_html(&format!("<code>{}</code>", escape_html(caption)), CAPTION_LIMIT),
            )
            .text("parse_mode", "HTML")
            .part("document", part);

        let response = self
            .http_client
            .post(self.method_url("sendDocument"))
            .multipart(form)
            .send()
            .await?;
        Self::check_response(response).await?;
        debug!("Telegram 附件已发送");
        Ok(())
    }
}

/// 组装 HTML 消息: 加粗标题 + 转义正文
pub fn format_message(title: &str, body: &str) -> String {
    let text = format!("<b>{}</b>\n{}", escape_html(title), escape_html(body));
    truncate_html(&text, MESSAGE_LIMIT)
}

/// HTML 模式下必须转义的字符
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

/// 按字符数截断, 不截断在实体（&amp; 等）中间
pub fn truncate_html(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let mut truncated: String = text.chars().take(max_chars).collect();
    if let Some(amp) = truncated.rfind('&') {
        if !truncated[amp..].contains(';') {
            truncated.truncate(amp);
        }
    }
    truncated
}
