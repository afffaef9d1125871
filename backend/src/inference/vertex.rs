use async_trait::async_trait;
use futures_util::StreamExt;
use reqwest::Client as HttpClient;
use url::Url;

use super::client::{InferenceError, RatingModel};
use super::models::{GenerateContentRequest, GenerateContentResponse};
use crate::config::VertexConfig;
use crate::rating::prompt::PromptPayload;

/// Gemini on Vertex AI, read through the server-sent-event stream.
pub struct VertexClient {
    http_client: HttpClient,
    stream_url: Url,
    access_token: Option<String>,
    model: String,
}

impl VertexClient {
    pub fn new(config: &VertexConfig) -> Result<Self, InferenceError> {
        Ok(Self {
            http_client: HttpClient::new(),
            stream_url: config.stream_url()?,
            access_token: config.access_token.clone(),
            model: config.model.clone(),
        })
    }

    pub fn stream_url(&self) -> &Url {
        &self.stream_url
    }
}

#[async_trait]
impl RatingModel for VertexClient {
    async fn generate(&self, prompt: &PromptPayload<'_>) -> Result<String, InferenceError> {
        let request = GenerateContentRequest::from_prompt(prompt);

        let mut builder = self.http_client.post(self.stream_url.clone()).json(&request);
        if let Some(token) = &self.access_token {
            builder = builder.bearer_auth(token);
        }

        let response = builder.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(InferenceError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let mut stream = response.bytes_stream();
        let mut decoder = SseDecoder::default();
        let mut text = String::new();

        while let Some(chunk) = stream.next().await {
            let chunk = chunk?;
            for data in decoder.push(&chunk) {
                append_chunk(&data, &mut text)?;
            }
        }
        if let Some(data) = decoder.finish() {
            append_chunk(&data, &mut text)?;
        }

        log::debug!("{} streamed {} characters", self.model, text.len());
        Ok(text)
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

fn append_chunk(data: &str, text: &mut String) -> Result<(), InferenceError> {
    let chunk: GenerateContentResponse = serde_json::from_str(data)?;
    if let Some(error) = chunk.error {
        return Err(InferenceError::Api(error.to_string()));
    }
    if let Some(reason) = chunk
        .candidates
        .first()
        .and_then(|c| c.finish_reason.as_deref())
    {
        log::debug!("Stream finished with reason {}", reason);
    }
    text.push_str(&chunk.text());
    Ok(())
}

/// Splits a byte stream into server-sent-event payloads.
///
/// Multi-line `data:` fields are joined with `\n`; an event is dispatched on a blank line.
#[derive(Debug, Default)]
struct SseDecoder {
    buffer: Vec<u8>,
    data_lines: Vec<String>,
}

impl SseDecoder {
    fn push(&mut self, bytes: &[u8]) -> Vec<String> {
        self.buffer.extend_from_slice(bytes);
        let mut events = Vec::new();

        while let Some(pos) = self.buffer.iter().position(|&b| b == b'\n') {
            let line: Vec<u8> = self.buffer.drain(..=pos).collect();
            let line = String::from_utf8_lossy(&line);
            let line = line.trim_end_matches(['\n', '\r']);
            if let Some(event) = self.handle_line(line) {
                events.push(event);
            }
        }
        events
    }

    fn finish(&mut self) -> Option<String> {
        if !self.buffer.is_empty() {
            let rest = std::mem::take(&mut self.buffer);
            let line = String::from_utf8_lossy(&rest).into_owned();
            if let Some(event) = self.handle_line(line.trim_end_matches('\r')) {
                return Some(event);
            }
        }
        self.dispatch()
    }

    fn handle_line(&mut self, line: &str) -> Option<String> {
        if line.is_empty() {
            return self.dispatch();
        }
        if let Some(data) = line.strip_prefix("data:") {
            self.data_lines
                .push(data.strip_prefix(' ').unwrap_or(data).to_string());
        }
        // Comments, `event:`, `id:` and `retry:` carry nothing we use.
        None
    }

    fn dispatch(&mut self) -> Option<String> {
        if self.data_lines.is_empty() {
            return None;
        }
        Some(std::mem::take(&mut self.data_lines).join("\n"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rating::prompt::{GenerationSettings, PromptPart};
    use actix_web::{App, HttpRequest, HttpResponse, HttpServer, web};

    #[test]
    fn decoder_handles_split_chunks_and_crlf() {
        let mut decoder = SseDecoder::default();
        assert!(decoder.push(b"data: {\"a\":").is_empty());
        let events = decoder.push(b"1}\r\n\r\ndata: {\"b\":2}\n\n: keepalive\n");
        assert_eq!(events, vec!["{\"a\":1}".to_string(), "{\"b\":2}".to_string()]);
        assert_eq!(decoder.finish(), None);
    }

    #[test]
    fn decoder_flushes_unterminated_event() {
        let mut decoder = SseDecoder::default();
        assert!(decoder.push(b"data: first\ndata: second").is_empty());
        assert_eq!(decoder.finish(), Some("first\nsecond".to_string()));
    }

    #[test]
    fn append_chunk_surfaces_streamed_errors() {
        let mut text = String::new();
        append_chunk(r#"{"candidates":[{"content":{"parts":[{"text":"Rating: 4/10"}]}}]}"#, &mut text)
            .unwrap();
        assert_eq!(text, "Rating: 4/10");

        let err = append_chunk(r#"{"error":{"code":403,"message":"denied"}}"#, &mut text).unwrap_err();
        assert_eq!(err.to_string(), "Model API error: 403: denied");
        assert!(matches!(
            append_chunk("not json", &mut text),
            Err(InferenceError::Decode(_))
        ));
    }

    fn prompt() -> PromptPayload<'static> {
        PromptPayload {
            parts: vec![
                PromptPart::Text("rate"),
                PromptPart::Image {
                    mime_type: "image/jpeg",
                    data: b"img",
                },
            ],
            settings: GenerationSettings::default(),
        }
    }

    async fn stream_reply(req: HttpRequest, body: web::Json<serde_json::Value>) -> HttpResponse {
        let authorized = req
            .headers()
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            == Some("Bearer test-token");
        if !authorized || body["contents"][0]["parts"].as_array().map(Vec::len) != Some(2) {
            return HttpResponse::Unauthorized().body("bad request");
        }
        HttpResponse::Ok().content_type("text/event-stream").body(concat!(
            "data: {\"candidates\":[{\"content\":{\"role\":\"model\",\"parts\":[{\"text\":\"Rating: 7/10\\n\"}]}}]}\r\n\r\n",
            "data: {\"candidates\":[{\"content\":{\"role\":\"model\",\"parts\":[{\"text\":\"Reason: plastered walls\"}]},\"finishReason\":\"STOP\"}]}\r\n\r\n",
        ))
    }

    async fn quota_exceeded() -> HttpResponse {
        HttpResponse::TooManyRequests().body("{\"error\":{\"message\":\"Quota exceeded\"}}")
    }

    fn client_for(addr: std::net::SocketAddr, token: Option<&str>) -> VertexClient {
        let config = VertexConfig {
            endpoint: Some(format!("http://{}", addr)),
            access_token: token.map(str::to_string),
            ..VertexConfig::default()
        };
        VertexClient::new(&config).unwrap()
    }

    #[actix_web::test]
    async fn generate_concatenates_streamed_text() {
        let server = HttpServer::new(|| App::new().default_service(web::to(stream_reply)))
            .workers(1)
            .disable_signals()
            .bind(("127.0.0.1", 0))
            .unwrap();
        let addr = server.addrs()[0];
        actix_web::rt::spawn(server.run());

        let client = client_for(addr, Some("test-token"));
        assert!(client.stream_url().as_str().ends_with(
            "/publishers/google/models/gemini-2.5-flash:streamGenerateContent?alt=sse"
        ));
        let text = client.generate(&prompt()).await.unwrap();
        assert_eq!(text, "Rating: 7/10\nReason: plastered walls");
    }

    #[actix_web::test]
    async fn generate_reports_http_status() {
        let server = HttpServer::new(|| App::new().default_service(web::to(quota_exceeded)))
            .workers(1)
            .disable_signals()
            .bind(("127.0.0.1", 0))
            .unwrap();
        let addr = server.addrs()[0];
        actix_web::rt::spawn(server.run());

        let err = client_for(addr, None).generate(&prompt()).await.unwrap_err();
        match err {
            InferenceError::Status { status, body } => {
                assert_eq!(status, 429);
                assert!(body.contains("Quota exceeded"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }
}
