//! Room-change fan-out.
//!
//! Mutation handlers publish a [`RoomChanged`] value after every successful
//! write; subscribers receive it over Server-Sent Events and react by
//! re-fetching the room. The channel is advisory only: delivery carries no
//! payload semantics beyond "something in this room changed", lagging
//! receivers simply drop missed events, and a re-fetch is idempotent.

use std::convert::Infallible;

use axum::{
    extract::{Path, State},
    response::{
        IntoResponse, Response,
        sse::{Event, KeepAlive, Sse},
    },
};
use tokio::sync::broadcast;
use tokio_stream::{StreamExt, wrappers::BroadcastStream};

use crate::{app_state::AppState, auth::middleware::Session, rooms::RoomNumber};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoomChanged {
    pub room: RoomNumber,
}

#[derive(Clone)]
pub struct ChangeNotifier {
    tx: broadcast::Sender<RoomChanged>,
}

impl ChangeNotifier {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    /// Never blocks and never fails: zero subscribers is normal.
    pub fn publish(&self, room: RoomNumber) {
        let _ = self.tx.send(RoomChanged { room });
    }

    pub fn subscribe(&self) -> broadcast::Receiver<RoomChanged> {
        self.tx.subscribe()
    }
}

/// `GET /v1/rooms/{room}/events` — SSE stream of `room-changed` events for
/// one room. Unsubscribe is the client closing the connection.
pub async fn room_events(
    _session: Session,
    State(state): State<AppState>,
    Path(room): Path<String>,
) -> Response {
    let room = match room.parse::<RoomNumber>() {
        Ok(room) => room,
        Err(err) => {
            return (
                axum::http::StatusCode::BAD_REQUEST,
                axum::Json(crate::auth::dtos::ErrorResponse {
                    error: err.to_string(),
                }),
            )
                .into_response();
        }
    };

    let stream = BroadcastStream::new(state.notifier.subscribe()).filter_map(move |message| {
        match message {
            Ok(changed) if changed.room == room => Some(Ok::<Event, Infallible>(
                Event::default().event("room-changed").data(room.to_string()),
            )),
            // Other rooms and lag errors are skipped; consumers re-fetch on
            // the next event they do see.
            _ => None,
        }
    });

    Sse::new(stream)
        .keep_alive(KeepAlive::default())
        .into_response()
}
