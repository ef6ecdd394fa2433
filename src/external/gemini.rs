//! Cliente do Gemini (generateContent)
//!
//! Só texto entra e texto sai; quem chama monta o prompt e valida o JSON.

use std::time::Duration;

use reqwest::Client;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use validator::Validate;

use crate::common::error::{AppError, AppResult};

pub const DEFAULT_MODEL: &str = "gemini-2.0-flash-exp";
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

#[derive(Clone)]
pub struct GeminiClient {
    api_key: String,
    model: String,
    base_url: String,
    http_client: Client,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest<'a> {
    contents: [Content<'a>; 1],
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    parts: [Part<'a>; 1],
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    top_k: u32,
    top_p: f32,
    max_output_tokens: u32,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self { temperature: 0.7, top_k: 40, top_p: 0.95, max_output_tokens: 2048 }
    }
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ReplyPart>,
}

#[derive(Debug, Deserialize)]
struct ReplyPart {
    text: Option<String>,
}

impl GenerateResponse {
    fn first_text(self) -> Option<String> {
        self.candidates
            .into_iter()
            .next()?
            .content?
            .parts
            .into_iter()
            .next()?
            .text
            .filter(|t| !t.trim().is_empty())
    }
}

impl GeminiClient {
    pub fn new(api_key: String, model: String, base_url: String) -> AppResult<Self> {
        let http_client = Client::builder().timeout(Duration::from_secs(60)).build()?;

        Ok(Self {
            api_key,
            model,
            base_url: base_url.trim_end_matches('/').to_string(),
            http_client,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.base_url, self.model)
    }

    /// Envia o prompt e devolve o texto do primeiro candidato.
    pub async fn generate(&self, prompt: &str) -> AppResult<String> {
        let request = GenerateRequest {
            contents: [Content { parts: [Part { text: prompt }] }],
            generation_config: GenerationConfig::default(),
        };

        let response = self
            .http_client
            .post(self.endpoint())
            .query(&[("key", self.api_key.as_str())])
            .json(&request)
            .send()
            .await
            .map_err(|e| AppError::AiUnavailable(format!("Falha na requisição: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Erro desconhecido".to_string());
            return Err(AppError::AiUnavailable(format!("API retornou {}: {}", status, body)));
        }

        let reply: GenerateResponse = response
            .json()
            .await
            .map_err(|e| AppError::AiResponse(format!("Falha ao ler a resposta: {}", e)))?;

        reply
            .first_text()
            .ok_or_else(|| AppError::AiResponse("Resposta vazia da API".into()))
    }

    /// `generate` + extração do JSON + validação do formato esperado.
    pub async fn generate_json<T>(&self, prompt: &str) -> AppResult<T>
    where
        T: DeserializeOwned + Validate,
    {
        let text = self.generate(prompt).await?;
        parse_reply(&text)
    }
}

/// Primeiro objeto `{...}` balanceado dentro do texto.
///
/// Conta chaves fora de strings JSON, respeitando escapes, então cercas de
/// markdown e comentários em volta da resposta são ignorados.
pub fn extract_json_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, ch) in text[start..].char_indices() {
        if in_string {
            match ch {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }

        match ch {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    let end = start + offset + ch.len_utf8();
                    return Some(&text[start..end]);
                }
            }
            _ => {}
        }
    }

    None
}

/// Interpreta a resposta da IA. Campos faltando ou fora do formato são erro,
/// nunca preenchidos com padrão.
pub fn parse_reply<T>(text: &str) -> AppResult<T>
where
    T: DeserializeOwned + Validate,
{
    let json = extract_json_object(text)
        .ok_or_else(|| AppError::AiResponse("Não foi possível extrair JSON da resposta".into()))?;

    let value: T = serde_json::from_str(json)
        .map_err(|e| AppError::AiResponse(format!("JSON fora do formato esperado: {}", e)))?;

    value
        .validate()
        .map_err(|e| AppError::AiResponse(format!("Resposta incompleta: {}", e)))?;

    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Deserialize, Validate)]
    struct Reply {
        #[validate(length(min = 1))]
        items: Vec<String>,
    }

    #[test]
    fn extracts_object_wrapped_in_markdown() {
        let text = "Claro! Segue:\n```json\n{\"a\": {\"b\": 1}}\n```\nAbraço {fim}";
        assert_eq!(extract_json_object(text), Some("{\"a\": {\"b\": 1}}"));
    }

    #[test]
    fn braces_inside_strings_are_ignored() {
        let text = r#"{"nota": "use } e { à vontade", "x": "aspas \" e }"} resto"#;
        assert_eq!(
            extract_json_object(text),
            Some(r#"{"nota": "use } e { à vontade", "x": "aspas \" e }"}"#)
        );
    }

    #[test]
    fn unbalanced_or_missing_object_yields_none() {
        assert_eq!(extract_json_object("sem json aqui"), None);
        assert_eq!(extract_json_object("{\"a\": 1"), None);
    }

    #[test]
    fn reply_failing_validation_is_an_ai_error() {
        let err = parse_reply::<Reply>("{\"items\": []}").unwrap_err();
        assert!(matches!(err, AppError::AiResponse(_)));

        let ok = parse_reply::<Reply>("ok: {\"items\": [\"x\"]}").unwrap();
        assert_eq!(ok.items, vec!["x".to_string()]);
    }

    #[test]
    fn request_body_uses_generation_config_keys() {
        let request = GenerateRequest {
            contents: [Content { parts: [Part { text: "oi" }] }],
            generation_config: GenerationConfig::default(),
        };
        let body = serde_json::to_value(&request).unwrap();
        assert_eq!(body["contents"][0]["parts"][0]["text"], "oi");
        assert_eq!(body["generationConfig"]["topK"], 40);
        assert_eq!(body["generationConfig"]["maxOutputTokens"], 2048);
    }

    #[test]
    fn first_candidate_text_is_returned() {
        let raw = r#"{"candidates":[{"content":{"parts":[{"text":"{}"}]}}]}"#;
        let reply: GenerateResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(reply.first_text().as_deref(), Some("{}"));

        let empty: GenerateResponse = serde_json::from_str("{}").unwrap();
        assert!(empty.first_text().is_none());
    }
}
