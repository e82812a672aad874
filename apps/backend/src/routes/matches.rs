use actix_web::http::header::{ETAG, IF_NONE_MATCH};
use actix_web::http::StatusCode;
use actix_web::{web, HttpRequest, HttpResponse};
use serde::{Deserialize, Serialize};

use crate::domain::events::ScoringEvent;
use crate::domain::match_flow::{MatchPhase, MatchResult, TossDecision};
use crate::domain::state::{PlayerId, TeamId};
use crate::error::AppError;
use crate::extractors::{CurrentUser, ExpectedVersion, MatchId, ValidatedJson};
use crate::http::etag::match_etag;
use crate::services::live_scoring::{CommandOutcome, ScoringCommand};
use crate::state::app_state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TossRequest {
    winner_id: TeamId,
    decision: TossDecision,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct OpenersRequest {
    striker_id: PlayerId,
    non_striker_id: PlayerId,
    bowler_id: PlayerId,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct OverlayResponse<'a> {
    match_id: &'a str,
    version: u64,
    phase: MatchPhase,
    overlay: Option<&'a crate::domain::overlay::OverlayView>,
    result: Option<&'a MatchResult>,
}

/// True when any entity tag in `If-None-Match` names the current version.
fn if_none_match_hits(req: &HttpRequest, etag: &str) -> bool {
    let Some(header) = req.headers().get(IF_NONE_MATCH) else {
        return false;
    };
    let Ok(client_etags) = header.to_str() else {
        return false;
    };
    client_etags.trim() == "*"
        || client_etags
            .split(',')
            .map(str::trim)
            .any(|candidate| candidate == etag)
}

/// GET /api/matches/{match_id}/snapshot
///
/// Full document plus phase and derived views; cacheable by ETag.
async fn get_snapshot(
    http_req: HttpRequest,
    match_id: MatchId,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let snapshot = app_state.scoring.snapshot(match_id.as_str()).await?;
    let etag = match_etag(match_id.as_str(), snapshot.version);

    if if_none_match_hits(&http_req, &etag) {
        return Ok(HttpResponse::build(StatusCode::NOT_MODIFIED)
            .insert_header((ETAG, etag))
            .finish());
    }

    Ok(HttpResponse::Ok()
        .insert_header((ETAG, etag))
        .json(snapshot.as_ref()))
}

/// GET /api/matches/{match_id}/overlay
async fn get_overlay(
    match_id: MatchId,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let snapshot = app_state.scoring.snapshot(match_id.as_str()).await?;
    let body = OverlayResponse {
        match_id: &snapshot.match_id,
        version: snapshot.version,
        phase: snapshot.phase,
        overlay: snapshot.overlay.as_ref(),
        result: snapshot.result.as_ref(),
    };
    Ok(HttpResponse::Ok()
        .insert_header((ETAG, match_etag(match_id.as_str(), snapshot.version)))
        .json(body))
}

/// GET /api/matches/{match_id}/scorecard
async fn get_scorecard(
    match_id: MatchId,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let snapshot = app_state.scoring.snapshot(match_id.as_str()).await?;
    Ok(HttpResponse::Ok()
        .insert_header((ETAG, match_etag(match_id.as_str(), snapshot.version)))
        .json(&snapshot.scorecards))
}

async fn run_command(
    app_state: &AppState,
    match_id: &MatchId,
    user: &CurrentUser,
    command: ScoringCommand,
    expected: ExpectedVersion,
) -> Result<HttpResponse, AppError> {
    let outcome: CommandOutcome = app_state
        .scoring
        .execute(match_id.as_str(), &user.sub, command, expected.0)
        .await?;
    Ok(HttpResponse::Ok()
        .insert_header((ETAG, match_etag(match_id.as_str(), outcome.version)))
        .json(outcome))
}

/// POST /api/matches/{match_id}/toss
async fn post_toss(
    match_id: MatchId,
    user: CurrentUser,
    expected: ExpectedVersion,
    body: ValidatedJson<TossRequest>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let TossRequest {
        winner_id,
        decision,
    } = body.into_inner();
    let command = ScoringCommand::Toss {
        winner_id,
        decision,
    };
    run_command(&app_state, &match_id, &user, command, expected).await
}

/// POST /api/matches/{match_id}/openers
async fn post_openers(
    match_id: MatchId,
    user: CurrentUser,
    expected: ExpectedVersion,
    body: ValidatedJson<OpenersRequest>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let OpenersRequest {
        striker_id,
        non_striker_id,
        bowler_id,
    } = body.into_inner();
    let command = ScoringCommand::Openers {
        striker: striker_id,
        non_striker: non_striker_id,
        bowler: bowler_id,
    };
    run_command(&app_state, &match_id, &user, command, expected).await
}

/// POST /api/matches/{match_id}/events
async fn post_event(
    match_id: MatchId,
    user: CurrentUser,
    expected: ExpectedVersion,
    body: ValidatedJson<ScoringEvent>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let command = ScoringCommand::Event(body.into_inner());
    run_command(&app_state, &match_id, &user, command, expected).await
}

/// POST /api/matches/{match_id}/next-innings
async fn post_next_innings(
    match_id: MatchId,
    user: CurrentUser,
    expected: ExpectedVersion,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    run_command(
        &app_state,
        &match_id,
        &user,
        ScoringCommand::StartNextInnings,
        expected,
    )
    .await
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/{match_id}/snapshot", web::get().to(get_snapshot))
        .route("/{match_id}/overlay", web::get().to(get_overlay))
        .route("/{match_id}/scorecard", web::get().to(get_scorecard))
        .route("/{match_id}/toss", web::post().to(post_toss))
        .route("/{match_id}/openers", web::post().to(post_openers))
        .route("/{match_id}/events", web::post().to(post_event))
        .route("/{match_id}/next-innings", web::post().to(post_next_innings));
}
