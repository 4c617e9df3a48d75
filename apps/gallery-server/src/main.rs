mod handlers;

use actix_web::{App, HttpServer, middleware, web};
use clap::Parser;
use gallery_persist::ScoreBoard;
use handlers::{AppState, get_scores, index, save_score};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "gallery-server", about = "Shooting gallery leaderboard service")]
struct Cli {
    /// Address to listen on
    #[arg(long, env = "GALLERY_BIND_ADDR", default_value = "0.0.0.0:5000")]
    bind: String,

    /// Leaderboard file
    #[arg(long, env = "GALLERY_SCORE_FILE", default_value = "scores.json")]
    score_file: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

/// Registers the leaderboard routes on an app.
pub(crate) fn routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(index))
        .route("/save_score", web::post().to(save_score))
        .route("/get_scores", web::get().to(get_scores));
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    let board = ScoreBoard::open(&cli.score_file);
    // Fail at startup rather than on the first request.
    let existing = board.load()?;
    tracing::info!(
        "starting gallery server: bind_addr={} score_file={} entries={}",
        cli.bind,
        cli.score_file.display(),
        existing.len()
    );

    let state = web::Data::new(AppState::new(board));
    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(middleware::Logger::default())
            .configure(routes)
    })
    .bind(&cli.bind)?
    .run()
    .await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;
    use actix_web::test as awtest;
    use gallery_common::ScoreReceipt;
    use serde_json::Value;

    fn state_in(dir: &tempfile::TempDir) -> web::Data<AppState> {
        web::Data::new(AppState::new(ScoreBoard::open(
            dir.path().join("scores.json"),
        )))
    }

    #[actix_web::test]
    async fn save_score_returns_receipt_and_persists() {
        let dir = tempfile::tempdir().unwrap();
        let state = state_in(&dir);
        let app =
            awtest::init_service(App::new().app_data(state.clone()).configure(routes)).await;

        let req = awtest::TestRequest::post()
            .uri("/save_score")
            .set_json(serde_json::json!({ "score": 70 }))
            .to_request();
        let receipt: ScoreReceipt = awtest::call_and_read_body_json(&app, req).await;
        assert_eq!(receipt, ScoreReceipt::success(70));

        let req = awtest::TestRequest::get().uri("/get_scores").to_request();
        let scores: Vec<u32> = awtest::call_and_read_body_json(&app, req).await;
        assert_eq!(scores, vec![70]);
    }

    #[actix_web::test]
    async fn missing_score_is_zero() {
        let dir = tempfile::tempdir().unwrap();
        let app =
            awtest::init_service(App::new().app_data(state_in(&dir)).configure(routes)).await;

        let req = awtest::TestRequest::post()
            .uri("/save_score")
            .set_json(serde_json::json!({}))
            .to_request();
        let body: Value = awtest::call_and_read_body_json(&app, req).await;
        assert_eq!(body["status"], "success");
        assert_eq!(body["score"], 0);
    }

    #[actix_web::test]
    async fn leaderboard_keeps_best_ten_descending() {
        let dir = tempfile::tempdir().unwrap();
        let app =
            awtest::init_service(App::new().app_data(state_in(&dir)).configure(routes)).await;

        for score in [30, 110, 0, 60, 10, 90, 20, 50, 80, 40, 100, 70] {
            let req = awtest::TestRequest::post()
                .uri("/save_score")
                .set_json(serde_json::json!({ "score": score }))
                .to_request();
            let resp = awtest::call_service(&app, req).await;
            assert_eq!(resp.status(), StatusCode::OK);
        }

        let req = awtest::TestRequest::get().uri("/get_scores").to_request();
        let scores: Vec<u32> = awtest::call_and_read_body_json(&app, req).await;
        assert_eq!(scores, vec![110, 100, 90, 80, 70, 60, 50, 40, 30, 20]);
    }

    #[actix_web::test]
    async fn malformed_body_is_bad_request() {
        let dir = tempfile::tempdir().unwrap();
        let app =
            awtest::init_service(App::new().app_data(state_in(&dir)).configure(routes)).await;

        let req = awtest::TestRequest::post()
            .uri("/save_score")
            .insert_header(("content-type", "application/json"))
            .set_payload("{not json")
            .to_request();
        let resp = awtest::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn corrupt_file_is_server_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("scores.json"), "\"oops\"").unwrap();
        let app =
            awtest::init_service(App::new().app_data(state_in(&dir)).configure(routes)).await;

        let req = awtest::TestRequest::get().uri("/get_scores").to_request();
        let resp = awtest::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body: Value = awtest::read_body_json(resp).await;
        assert_eq!(body["status"], "error");
    }

    #[actix_web::test]
    async fn index_renders_table() {
        let dir = tempfile::tempdir().unwrap();
        let state = state_in(&dir);
        state.board.lock().unwrap().record(42).unwrap();
        let app =
            awtest::init_service(App::new().app_data(state.clone()).configure(routes)).await;

        let req = awtest::TestRequest::get().uri("/").to_request();
        let body = awtest::call_and_read_body(&app, req).await;
        let html = String::from_utf8(body.to_vec()).unwrap();
        assert!(html.contains("<td>1</td><td>42</td>"));
    }

    #[test]
    fn empty_board_says_so() {
        assert!(handlers::leaderboard_html(&[]).contains("No scores yet"));
    }
}
