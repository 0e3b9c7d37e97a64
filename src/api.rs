use crate::corpus::Art;
use crate::document::DocId;
use crate::engine::SearchEngine;
use axum::{
    Router,
    extract::{Form, Query, State},
    response::{IntoResponse, Json},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

type Engine = Arc<SearchEngine<Art>>;

// ========== Slack Message Types ==========

const NO_MATCH_TEXT: &str =
    "couldnt find anything.... try something else or help me to add more ascii art";

/// Body of a slash-command reply, shaped the way Slack expects it.
#[derive(Debug, Serialize)]
pub struct SlackResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_type: Option<String>,
    #[serde(skip_serializing_if = "is_false")]
    pub replace_original: bool,
    #[serde(skip_serializing_if = "is_false")]
    pub delete_original: bool,
    pub blocks: Vec<Block>,
}

impl SlackResponse {
    /// Reply visible to the whole channel.
    fn in_channel(blocks: Vec<Block>) -> Self {
        Self {
            response_type: Some("in_channel".to_string()),
            replace_original: false,
            delete_original: false,
            blocks,
        }
    }

    /// Reply visible only to the requester (Slack's default when no
    /// response type is sent).
    fn ephemeral(blocks: Vec<Block>) -> Self {
        Self {
            response_type: None,
            replace_original: false,
            delete_original: false,
            blocks,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct Block {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<Text>,
}

impl Block {
    fn section(text: String) -> Self {
        Self {
            kind: "section".to_string(),
            text: Some(Text {
                kind: "mrkdwn".to_string(),
                text,
            }),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct Text {
    #[serde(rename = "type")]
    pub kind: String,
    pub text: String,
}

fn is_false(v: &bool) -> bool {
    !*v
}

/// Render one art as a single section block: the blob fenced as code, with
/// outer newlines trimmed so the fences sit tight around it.
fn art_blocks(art: &Art) -> Vec<Block> {
    vec![Block::section(format!(
        "```\n{}\n```",
        art.blob.trim_matches('\n')
    ))]
}

// ========== Request/Response Types ==========

/// Form body of a Slack slash command. Slack sends many more fields; only
/// the query text matters here.
#[derive(Debug, Deserialize)]
pub struct AsciiRequest {
    #[serde(default)]
    pub text: String,
}

#[derive(Debug, Deserialize)]
pub struct SearchRequest {
    #[serde(default)]
    pub q: String,
}

#[derive(Debug, Serialize)]
pub struct ArtResponse {
    pub id: DocId,
    pub tags: Vec<String>,
    pub blob: String,
}

impl From<&Art> for ArtResponse {
    fn from(art: &Art) -> Self {
        Self {
            id: art.id,
            tags: art.tags.clone(),
            blob: art.blob.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct StatsResponse {
    pub total_documents: u32,
    pub total_terms: usize,
    pub total_postings: usize,
}

#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T> ApiResponse<T> {
    fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
        }
    }

    fn error_msg(message: String) -> Self {
        ApiResponse {
            success: false,
            data: None,
            message: Some(message),
        }
    }
}

// ========== Handlers ==========

async fn post_ascii(
    State(engine): State<Engine>,
    Form(req): Form<AsciiRequest>,
) -> impl IntoResponse {
    match engine.search_one(&req.text) {
        Some(art) => Json(SlackResponse::in_channel(art_blocks(art))),
        None => Json(SlackResponse::ephemeral(vec![Block::section(format!(
            "```\n{NO_MATCH_TEXT}\n```"
        ))])),
    }
}

async fn search_art(
    State(engine): State<Engine>,
    Query(req): Query<SearchRequest>,
) -> impl IntoResponse {
    match engine.search_one(&req.q) {
        Some(art) => Json(ApiResponse::success(ArtResponse::from(art))),
        None => Json(ApiResponse::error_msg(format!(
            "no art matching '{}'",
            req.q
        ))),
    }
}

async fn random_art(State(engine): State<Engine>) -> impl IntoResponse {
    match engine.pick_any() {
        Some(art) => Json(ApiResponse::success(ArtResponse::from(art))),
        None => Json(ApiResponse::error_msg("corpus is empty".to_string())),
    }
}

async fn health_check() -> impl IntoResponse {
    Json(ApiResponse::success("OK"))
}

async fn get_stats(State(engine): State<Engine>) -> impl IntoResponse {
    let stats = engine.stats();

    let response = StatsResponse {
        total_documents: stats.total_documents,
        total_terms: stats.total_terms,
        total_postings: stats.total_postings,
    };

    Json(ApiResponse::success(response))
}

// ========== Router ==========

pub fn create_router(engine: Engine) -> Router {
    Router::new()
        .route("/ascii", post(post_ascii))
        .route("/search", get(search_art))
        .route("/random", get(random_art))
        .route("/health", get(health_check))
        .route("/stats", get(get_stats))
        .layer(TraceLayer::new_for_http())
        .with_state(engine)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_matched_reply_is_in_channel_with_fenced_blob() {
        let art = Art {
            id: 0,
            blob: "\n |\\_/|\n".to_string(),
            tags: vec!["cat.txt".to_string()],
        };
        let response = SlackResponse::in_channel(art_blocks(&art));

        assert_eq!(
            serde_json::to_value(&response).unwrap(),
            json!({
                "response_type": "in_channel",
                "blocks": [{
                    "type": "section",
                    "text": { "type": "mrkdwn", "text": "```\n |\\_/|\n```" },
                }],
            })
        );
    }

    #[test]
    fn test_no_match_reply_omits_response_type() {
        let response = SlackResponse::ephemeral(vec![Block::section(format!(
            "```\n{NO_MATCH_TEXT}\n```"
        ))]);
        let value = serde_json::to_value(&response).unwrap();

        assert!(value.get("response_type").is_none());
        assert!(value.get("replace_original").is_none());
        assert_eq!(
            value["blocks"][0]["text"]["text"],
            format!("```\n{NO_MATCH_TEXT}\n```")
        );
    }

    #[test]
    fn test_art_response_copies_document_fields() {
        let art = Art {
            id: 3,
            blob: "woof".to_string(),
            tags: vec!["dog.txt".to_string()],
        };
        let response = ArtResponse::from(&art);

        assert_eq!(response.id, 3);
        assert_eq!(response.tags, vec!["dog.txt"]);
        assert_eq!(response.blob, "woof");
    }
}
