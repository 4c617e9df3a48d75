use actix_web::http::StatusCode;
use actix_web::http::header::ContentType;
use actix_web::web::{Data, Json};
use actix_web::{HttpResponse, Responder};
use gallery_common::{ScoreReceipt, ScoreSubmission};
use gallery_persist::{ScoreBoard, StoreError};
use std::sync::Mutex;

/// Shared server state. The mutex serializes read-modify-write of the file.
pub(crate) struct AppState {
    pub(crate) board: Mutex<ScoreBoard>,
}

impl AppState {
    pub(crate) fn new(board: ScoreBoard) -> Self {
        Self {
            board: Mutex::new(board),
        }
    }
}

fn json_error(status: StatusCode, message: impl Into<String>) -> HttpResponse {
    HttpResponse::build(status).json(serde_json::json!({
        "status": "error",
        "error": message.into(),
    }))
}

fn store_error(err: StoreError) -> HttpResponse {
    tracing::error!("leaderboard store failed: {err}");
    json_error(StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
}

fn poisoned() -> HttpResponse {
    json_error(StatusCode::INTERNAL_SERVER_ERROR, "leaderboard lock poisoned")
}

pub(crate) async fn save_score(
    state: Data<AppState>,
    body: Json<ScoreSubmission>,
) -> impl Responder {
    let score = body.into_inner().score;
    let Ok(board) = state.board.lock() else {
        return poisoned();
    };
    match board.record(score) {
        Ok(_) => {
            tracing::info!("saved score {score}");
            HttpResponse::Ok().json(ScoreReceipt::success(score))
        }
        Err(e) => store_error(e),
    }
}

pub(crate) async fn get_scores(state: Data<AppState>) -> impl Responder {
    let Ok(board) = state.board.lock() else {
        return poisoned();
    };
    match board.load() {
        Ok(scores) => HttpResponse::Ok().json(scores),
        Err(e) => store_error(e),
    }
}

pub(crate) async fn index(state: Data<AppState>) -> impl Responder {
    let Ok(board) = state.board.lock() else {
        return poisoned();
    };
    match board.load() {
        Ok(scores) => HttpResponse::Ok()
            .content_type(ContentType::html())
            .body(leaderboard_html(&scores)),
        Err(e) => store_error(e),
    }
}

pub(crate) fn leaderboard_html(scores: &[u32]) -> String {
    let rows = if scores.is_empty() {
        "<tr><td colspan=\"2\">No scores yet</td></tr>".to_string()
    } else {
        scores
            .iter()
            .enumerate()
            .map(|(i, s)| format!("<tr><td>{}</td><td>{s}</td></tr>", i + 1))
            .collect::<Vec<_>>()
            .join("\n")
    };
    format!(
        "<!DOCTYPE html>
<html>
<head><meta charset=\"utf-8\"><title>Shooting Gallery Leaderboard</title></head>
<body>
<h1>Top Scores</h1>
<table>
<tr><th>Rank</th><th>Score</th></tr>
{rows}
</table>
</body>
</html>
"
    )
}
