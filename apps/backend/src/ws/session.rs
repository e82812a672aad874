//! WebSocket overlay stream.
//!
//! Each session watches one match in the snapshot hub and pushes the overlay
//! of every new version. Missed versions are not replayed; the next push
//! carries the full current overlay.

use std::sync::Arc;
use std::time::{Duration, Instant};

use actix::prelude::*;
use actix_web::{web, Error, HttpRequest, HttpResponse};
use actix_web_actors::ws;
use tokio_stream::wrappers::WatchStream;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::extractors::match_id::MatchId;
use crate::realtime::PublishedSnapshot;
use crate::state::app_state::AppState;
use crate::ws::protocol::{ServerMsg, PROTOCOL_VERSION};

const HEARTBEAT_INTERVAL: Duration = Duration::from_secs(20);
const CLIENT_TIMEOUT: Duration = Duration::from_secs(40);

/// GET /api/ws/matches/{match_id}
pub async fn upgrade(
    req: HttpRequest,
    stream: web::Payload,
    match_id: MatchId,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, Error> {
    let updates = app_state.scoring.subscribe(match_id.as_str()).await?;
    let session = OverlaySession::new(match_id.0, WatchStream::new(updates));
    ws::start(session, &req, stream)
}

pub struct OverlaySession {
    conn_id: Uuid,
    match_id: String,
    updates: Option<WatchStream<Option<Arc<PublishedSnapshot>>>>,
    last_version: Option<u64>,
    last_heartbeat: Instant,
}

impl OverlaySession {
    fn new(match_id: String, updates: WatchStream<Option<Arc<PublishedSnapshot>>>) -> Self {
        Self {
            conn_id: Uuid::new_v4(),
            match_id,
            updates: Some(updates),
            last_version: None,
            last_heartbeat: Instant::now(),
        }
    }

    fn send_json(ctx: &mut ws::WebsocketContext<Self>, msg: &ServerMsg<'_>) {
        match serde_json::to_string(msg) {
            Ok(payload) => ctx.text(payload),
            Err(err) => warn!(error = %err, "[WS SESSION] failed to serialize outbound message"),
        }
    }

    fn start_heartbeat(&self, ctx: &mut ws::WebsocketContext<Self>) {
        ctx.run_interval(HEARTBEAT_INTERVAL, |actor, ctx| {
            if Instant::now().duration_since(actor.last_heartbeat) > CLIENT_TIMEOUT {
                warn!(
                    conn_id = %actor.conn_id,
                    match_id = %actor.match_id,
                    "[WS SESSION] heartbeat timed out"
                );
                ctx.close(Some(ws::CloseReason::from(ws::CloseCode::Normal)));
                ctx.stop();
                return;
            }
            ctx.ping(b"keepalive");
        });
    }
}

impl Actor for OverlaySession {
    type Context = ws::WebsocketContext<Self>;

    fn started(&mut self, ctx: &mut Self::Context) {
        info!(conn_id = %self.conn_id, match_id = %self.match_id, "[WS SESSION] started");
        Self::send_json(
            ctx,
            &ServerMsg::Hello {
                protocol: PROTOCOL_VERSION,
                match_id: &self.match_id,
            },
        );
        if let Some(updates) = self.updates.take() {
            ctx.add_stream(updates);
        }
        self.start_heartbeat(ctx);
    }

    fn stopped(&mut self, _ctx: &mut Self::Context) {
        info!(conn_id = %self.conn_id, match_id = %self.match_id, "[WS SESSION] stopped");
    }
}

impl StreamHandler<Option<Arc<PublishedSnapshot>>> for OverlaySession {
    fn handle(&mut self, item: Option<Arc<PublishedSnapshot>>, ctx: &mut Self::Context) {
        // `None` until the first command for this match is saved.
        let Some(snapshot) = item else {
            return;
        };
        if self.last_version == Some(snapshot.version) {
            return;
        }
        self.last_version = Some(snapshot.version);
        debug!(
            conn_id = %self.conn_id,
            match_id = %self.match_id,
            version = snapshot.version,
            "[WS SESSION] pushing overlay"
        );
        Self::send_json(ctx, &ServerMsg::overlay(&snapshot));
    }

    fn finished(&mut self, ctx: &mut Self::Context) {
        Self::send_json(
            ctx,
            &ServerMsg::Error {
                message: "Snapshot feed closed".to_string(),
            },
        );
        ctx.close(Some(ws::CloseReason::from(ws::CloseCode::Away)));
        ctx.stop();
    }
}

impl StreamHandler<Result<ws::Message, ws::ProtocolError>> for OverlaySession {
    fn handle(&mut self, msg: Result<ws::Message, ws::ProtocolError>, ctx: &mut Self::Context) {
        match msg {
            Ok(ws::Message::Ping(payload)) => {
                self.last_heartbeat = Instant::now();
                ctx.pong(&payload);
            }
            Ok(ws::Message::Pong(_)) | Ok(ws::Message::Text(_)) => {
                self.last_heartbeat = Instant::now();
            }
            Ok(ws::Message::Binary(_)) => {
                Self::send_json(
                    ctx,
                    &ServerMsg::Error {
                        message: "Binary not supported".to_string(),
                    },
                );
                ctx.close(Some(ws::CloseReason::from(ws::CloseCode::Unsupported)));
                ctx.stop();
            }
            Ok(ws::Message::Close(reason)) => {
                ctx.close(reason);
                ctx.stop();
            }
            Ok(ws::Message::Continuation(_)) | Ok(ws::Message::Nop) => {
                self.last_heartbeat = Instant::now();
            }
            Err(err) => {
                warn!(
                    conn_id = %self.conn_id,
                    match_id = %self.match_id,
                    error = %err,
                    "[WS SESSION] protocol error"
                );
                ctx.close(Some(ws::CloseReason::from(ws::CloseCode::Error)));
                ctx.stop();
            }
        }
    }
}
