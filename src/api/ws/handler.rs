//! WebSocket connection handler
//!
//! One task per connection. Inbound frames mutate the registry and trigger a
//! snapshot broadcast; the task's own broadcast subscription carries every
//! snapshot (its own updates included) back out, filtered through the
//! session's route scope.

use std::sync::Arc;

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::Response,
};
use tokio::sync::broadcast::error::RecvError;

use super::events::{
    AuthPayload, RoutePayload, ServerEvent, StopSharingPayload, VehicleBroadcastPayload,
    VehicleSharePayload,
};
use super::session::Session;
use super::state::AppState;
use crate::protocol::{events, Envelope, ErrorPayload};
use crate::types::LocationRecord;

/// WebSocket upgrade handler for `GET /ws`
pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<Arc<AppState>>) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Drive one connection until it closes, then evict whatever it reported
async fn handle_socket(mut socket: WebSocket, state: Arc<AppState>) {
    let mut session = Session::new(state.next_connection_id());
    let mut rx = state.subscribe();

    println!("[Relay] {} connected", session.id);

    // New clients get the current snapshot immediately, even when empty
    let snapshot = state.registry.snapshot();
    let welcome = ServerEvent::LocationUpdate { payload: snapshot };
    if send_event(&mut socket, &welcome).await.is_err() {
        return; // Client disconnected immediately
    }

    loop {
        tokio::select! {
            // Fan-out: snapshots broadcast by any connection, this one included
            result = rx.recv() => {
                match result {
                    Ok(snapshot) => {
                        let event = ServerEvent::LocationUpdate {
                            payload: session.filter_snapshot(&snapshot),
                        };
                        if send_event(&mut socket, &event).await.is_err() {
                            break; // Client disconnected
                        }
                    }
                    Err(RecvError::Lagged(n)) => {
                        // Too slow; the next full snapshot restores them
                        let event = ServerEvent::error(None, ErrorPayload::lagged(n));
                        let _ = send_event(&mut socket, &event).await;
                    }
                    Err(RecvError::Closed) => break,
                }
            }

            // Inbound frames from this client
            result = socket.recv() => {
                match result {
                    Some(Ok(msg)) => {
                        if !handle_client_message(msg, &mut socket, &mut session, &state).await {
                            break; // Client requested close or error
                        }
                    }
                    Some(Err(_)) => break, // WebSocket error
                    None => break, // Client disconnected
                }
            }
        }
    }

    println!("[Relay] {} disconnected", session.id);
    if state.registry.disconnect(session.id) {
        state.broadcast_snapshot();
    }
}

/// Handle one frame from the client.
/// Returns false if the connection should be closed.
async fn handle_client_message(
    msg: Message,
    socket: &mut WebSocket,
    session: &mut Session,
    state: &AppState,
) -> bool {
    match msg {
        Message::Text(text) => {
            if let Some(reply) = dispatch(&text, session, state) {
                let _ = send_event(socket, &reply).await;
            }
            true
        }
        Message::Binary(_) => true, // Ignore binary frames
        Message::Ping(data) => {
            let _ = socket.send(Message::Pong(data)).await;
            true
        }
        Message::Pong(_) => true,
        Message::Close(_) => false, // Client requested close
    }
}

/// Dispatch one inbound envelope. Returns a direct reply for the sender when
/// the event warrants one; snapshot fan-out happens through the broadcast
/// channel, not here.
pub fn dispatch(text: &str, session: &mut Session, state: &AppState) -> Option<ServerEvent> {
    // Frames that are not envelopes at all are dropped without a reply,
    // matching the baseline relay
    let envelope = Envelope::parse(text).ok()?;
    let request_id = envelope.request_id.clone();

    if envelope.kind == events::AUTH {
        return handle_auth(envelope, request_id, session, state);
    }

    // With a secret configured, everything else requires a prior auth
    if state.auth_required() && !session.is_authenticated() {
        return Some(ServerEvent::error(
            request_id,
            ErrorPayload::unauthorized("Authenticate before sending events"),
        ));
    }

    match envelope.kind.as_str() {
        // Baseline events keep the baseline failure mode: incomplete
        // payloads are dropped with no reply
        events::SEND_LOCATION => {
            let record: LocationRecord = serde_json::from_value(envelope.payload).ok()?;
            if state.registry.upsert(session.id, record) {
                state.broadcast_snapshot();
            }
            None
        }

        events::STOP_SHARING => {
            let payload: StopSharingPayload = serde_json::from_value(envelope.payload).ok()?;
            if state.registry.stop_sharing(session.id, &payload.user_id) {
                state.broadcast_snapshot();
            }
            None
        }

        events::VEHICLE_LOCATION_BROADCAST => {
            let payload: VehicleBroadcastPayload = match serde_json::from_value(envelope.payload) {
                Ok(p) => p,
                Err(e) => {
                    return Some(ServerEvent::error(
                        request_id,
                        ErrorPayload::bad_request(e.to_string()),
                    ))
                }
            };
            if payload.vehicle_id.is_empty() {
                return Some(ServerEvent::error(
                    request_id,
                    ErrorPayload::bad_request("vehicle_id must not be empty"),
                ));
            }
            // Broadcasts for a vehicle toggled off on this connection are dropped
            if !session.sharing_enabled(&payload.vehicle_id) {
                return None;
            }
            if state.registry.upsert(session.id, payload.into_record()) {
                state.broadcast_snapshot();
            }
            None
        }

        events::VEHICLE_LOCATION_SHARE => {
            let payload: VehicleSharePayload = match serde_json::from_value(envelope.payload) {
                Ok(p) => p,
                Err(e) => {
                    return Some(ServerEvent::error(
                        request_id,
                        ErrorPayload::bad_request(e.to_string()),
                    ))
                }
            };
            session.set_sharing(&payload.vehicle_id, payload.enabled);
            // Disabling is a forward delete, like stopSharing
            if !payload.enabled && state.registry.stop_sharing(session.id, &payload.vehicle_id) {
                state.broadcast_snapshot();
            }
            None
        }

        events::ROUTE_SUBSCRIBE => {
            let payload: RoutePayload = match serde_json::from_value(envelope.payload) {
                Ok(p) => p,
                Err(e) => {
                    return Some(ServerEvent::error(
                        request_id,
                        ErrorPayload::bad_request(e.to_string()),
                    ))
                }
            };
            if payload.route_id.is_empty() {
                return Some(ServerEvent::error(
                    request_id,
                    ErrorPayload::bad_request("route_id must not be empty"),
                ));
            }
            session.subscribe_route(&payload.route_id);
            Some(ServerEvent::RouteSubscribeOk {
                request_id,
                payload,
            })
        }

        events::ROUTE_UNSUBSCRIBE => {
            let payload: RoutePayload = match serde_json::from_value(envelope.payload) {
                Ok(p) => p,
                Err(e) => {
                    return Some(ServerEvent::error(
                        request_id,
                        ErrorPayload::bad_request(e.to_string()),
                    ))
                }
            };
            session.unsubscribe_route(&payload.route_id);
            Some(ServerEvent::RouteUnsubscribeOk {
                request_id,
                payload,
            })
        }

        other => Some(ServerEvent::error(
            request_id,
            ErrorPayload::bad_request(format!("Unknown event type: {}", other)),
        )),
    }
}

fn handle_auth(
    envelope: Envelope,
    request_id: Option<String>,
    session: &mut Session,
    state: &AppState,
) -> Option<ServerEvent> {
    // Open relay: accept and ignore auth events
    let auth = state.auth()?;

    let payload: AuthPayload = match serde_json::from_value(envelope.payload) {
        Ok(p) => p,
        Err(e) => {
            return Some(ServerEvent::error(
                request_id,
                ErrorPayload::bad_request(e.to_string()),
            ))
        }
    };

    match auth.validate_token(&payload.token) {
        Ok(claims) => {
            println!("[Auth] {} authenticated as {}", session.id, claims.sub);
            session.authenticate(claims);
            None
        }
        Err(e) => Some(ServerEvent::error(
            request_id,
            ErrorPayload::unauthorized(e.to_string()),
        )),
    }
}

async fn send_event(socket: &mut WebSocket, event: &ServerEvent) -> Result<(), axum::Error> {
    match serde_json::to_string(event) {
        Ok(json) => socket.send(Message::Text(json)).await,
        Err(_) => Ok(()), // server events always serialize
    }
}
