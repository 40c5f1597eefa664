//! Single binary web server: JSON API over the group stats store.
//! Run with: cargo run --bin web
//! Listens on 0.0.0.0:8080 by default so a chat transport on another host can reach it.
//! Override with env: HOST, PORT, STATS_FILE (snapshot path), LEADERBOARD_TOP (rows per board).

use actix_web::{
    get, post,
    web::{Data, Json, Path, Query},
    App, HttpResponse, HttpServer, Responder,
};
use group_stats_bot::{
    dispatch, models::normalize_role, Award, Caller, Command, Hints, LeaderboardKind, Outcome,
    StatsStore, DEFAULT_STATS_FILE,
};
use serde::Deserialize;

/// The store locks internally; handlers share one instance.
type AppState = Data<StatsStore>;

/// Rows per leaderboard in command replies.
#[derive(Clone, Copy)]
struct TopN(usize);

#[derive(serde::Serialize)]
struct HealthResponse {
    ok: bool,
    service: &'static str,
}

#[derive(Deserialize)]
struct CommandBody {
    text: String,
    user_id: String,
    username: Option<String>,
    first_name: Option<String>,
}

#[derive(Deserialize)]
struct OutcomeBody {
    outcome: Outcome,
    username: Option<String>,
    first_name: Option<String>,
}

#[derive(Deserialize)]
struct AwardBody {
    award: Award,
    username: Option<String>,
    first_name: Option<String>,
}

#[derive(Deserialize)]
struct HandleAwardBody {
    handle: String,
    award: Award,
}

#[derive(Deserialize)]
struct RoleBody {
    role: String,
}

#[derive(Deserialize)]
struct LeaderboardQuery {
    #[serde(default)]
    kind: LeaderboardKind,
    limit: Option<usize>,
}

/// Path segment: player id (e.g. /api/players/{id})
#[derive(Deserialize)]
struct PlayerPath {
    id: String,
}

/// Path segment: handle, with or without '@' (e.g. /api/players/by-handle/{handle})
#[derive(Deserialize)]
struct HandlePath {
    handle: String,
}

fn not_found(what: &str) -> HttpResponse {
    HttpResponse::NotFound().json(serde_json::json!({ "error": format!("No {}", what) }))
}

fn bad_request(message: impl std::fmt::Display) -> HttpResponse {
    HttpResponse::BadRequest().json(serde_json::json!({ "error": message.to_string() }))
}

fn player_json(store: &StatsStore, id: &str, record: impl serde::Serialize) -> serde_json::Value {
    serde_json::json!({
        "id": id,
        "display_name": store.display_name(id),
        "record": record,
    })
}

#[get("/api/health")]
async fn api_health() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        ok: true,
        service: "group-stats-bot",
    })
}

/// Run one chat command for the calling user and return the reply data.
#[post("/api/commands")]
async fn api_command(state: AppState, top: Data<TopN>, body: Json<CommandBody>) -> HttpResponse {
    let command = match Command::parse(&body.text) {
        Ok(command) => command,
        Err(e) => return bad_request(e),
    };
    let body = body.into_inner();
    let caller = Caller {
        id: body.user_id,
        username: body.username,
        first_name: body.first_name,
    };
    HttpResponse::Ok().json(dispatch(&state, &caller, command, top.0))
}

/// Get one player's record (404 if never seen).
#[get("/api/players/{id}")]
async fn api_get_player(state: AppState, path: Path<PlayerPath>) -> HttpResponse {
    match state.player(&path.id) {
        Some(record) => HttpResponse::Ok().json(player_json(&state, &path.id, record)),
        None => not_found("player"),
    }
}

/// Resolve a handle to a player id (case-insensitive, '@' optional).
#[get("/api/players/by-handle/{handle}")]
async fn api_find_by_handle(state: AppState, path: Path<HandlePath>) -> HttpResponse {
    match state.find_by_handle(&path.handle) {
        Some(id) => HttpResponse::Ok().json(serde_json::json!({
            "id": id,
            "display_name": state.display_name(&id),
        })),
        None => not_found("player with that handle"),
    }
}

/// Record a win or loss for a player.
#[post("/api/players/{id}/outcome")]
async fn api_record_outcome(state: AppState, path: Path<PlayerPath>, body: Json<OutcomeBody>) -> HttpResponse {
    let hints = Hints::new(body.username.as_deref(), body.first_name.as_deref());
    let record = state.record_outcome(&path.id, body.outcome, hints);
    HttpResponse::Ok().json(player_json(&state, &path.id, record))
}

/// Give a player an MVP or LVM award.
#[post("/api/players/{id}/award")]
async fn api_record_award(state: AppState, path: Path<PlayerPath>, body: Json<AwardBody>) -> HttpResponse {
    let hints = Hints::new(body.username.as_deref(), body.first_name.as_deref());
    let record = state.record_award(&path.id, body.award, hints);
    HttpResponse::Ok().json(player_json(&state, &path.id, record))
}

/// Count a win under a role label.
#[post("/api/players/{id}/roles")]
async fn api_record_role_win(state: AppState, path: Path<PlayerPath>, body: Json<RoleBody>) -> HttpResponse {
    match state.record_role_win(&path.id, &body.role) {
        Some(wins) => HttpResponse::Ok().json(serde_json::json!({
            "role": normalize_role(&body.role),
            "wins": wins,
        })),
        None => bad_request("Role must not be empty"),
    }
}

/// Award a player by handle; unknown handles are registered under a synthetic id.
#[post("/api/awards")]
async fn api_award_by_handle(state: AppState, body: Json<HandleAwardBody>) -> HttpResponse {
    match state.record_award_by_handle(&body.handle, body.award) {
        Some(id) => {
            let record = state.player(&id);
            HttpResponse::Ok().json(player_json(&state, &id, record))
        }
        None => bad_request("Handle must not be empty"),
    }
}

/// Ranked players for a board; `limit` defaults to LEADERBOARD_TOP.
#[get("/api/leaderboard")]
async fn api_leaderboard(state: AppState, top: Data<TopN>, query: Query<LeaderboardQuery>) -> HttpResponse {
    let limit = query.limit.unwrap_or(top.0);
    HttpResponse::Ok().json(state.ranked_leaderboard(query.kind, limit))
}

#[get("/api/summary")]
async fn api_summary(state: AppState) -> HttpResponse {
    HttpResponse::Ok().json(state.group_summary())
}

#[get("/api/summary/weekly")]
async fn api_weekly_summary(state: AppState) -> HttpResponse {
    HttpResponse::Ok().json(state.weekly_summary())
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_top() -> usize {
    5
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let host = std::env::var("HOST").unwrap_or_else(|_| default_host());
    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or_else(default_port);
    let stats_file = std::env::var("STATS_FILE").unwrap_or_else(|_| DEFAULT_STATS_FILE.to_string());
    let top = std::env::var("LEADERBOARD_TOP")
        .ok()
        .and_then(|n| n.parse().ok())
        .unwrap_or_else(default_top);
    let bind = (host.as_str(), port);

    let state = Data::new(StatsStore::open(&stats_file));
    let top = Data::new(TopN(top));
    log::info!(
        "Starting server at http://{}:{} (stats file: {})",
        bind.0,
        bind.1,
        state.path().display()
    );

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .app_data(top.clone())
            .service(api_health)
            .service(api_command)
            .service(api_find_by_handle)
            .service(api_get_player)
            .service(api_record_outcome)
            .service(api_record_award)
            .service(api_record_role_win)
            .service(api_award_by_handle)
            .service(api_leaderboard)
            .service(api_summary)
            .service(api_weekly_summary)
    })
    .bind(bind)?
    .run()
    .await
}
