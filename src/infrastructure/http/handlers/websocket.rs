//! WebSocket Handler - 章节生命周期事件推送

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::IntoResponse,
};
use futures_util::{SinkExt, StreamExt};
use std::sync::Arc;
use tokio::sync::broadcast::error::RecvError;

use crate::domain::UserId;
use crate::infrastructure::http::middleware::RequireAuth;
use crate::infrastructure::http::state::AppState;

/// 事件 WebSocket 连接处理，只推送当前用户课程的事件
pub async fn events_websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
    RequireAuth(ctx): RequireAuth,
) -> impl IntoResponse {
    let user_id = ctx.user_id().clone();
    ws.on_upgrade(move |socket| handle_events_socket(socket, user_id, state))
}

async fn handle_events_socket(socket: WebSocket, user_id: UserId, state: Arc<AppState>) {
    let (mut sender, mut receiver) = socket.split();

    let mut event_rx = state.event_publisher.subscribe();

    tracing::info!(user_id = %user_id, "Events WebSocket connected");

    let forward_user = user_id.clone();

    // 事件转发任务
    let forward_task = tokio::spawn(async move {
        loop {
            let owned = match event_rx.recv().await {
                Ok(owned) => owned,
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(user_id = %forward_user, skipped, "Events WebSocket lagged");
                    continue;
                }
                Err(RecvError::Closed) => break,
            };

            if owned.owner_id != forward_user {
                continue;
            }

            let msg = match serde_json::to_string(&owned.event) {
                Ok(json) => Message::Text(json),
                Err(e) => {
                    tracing::error!(error = %e, "Failed to serialize event");
                    continue;
                }
            };

            if let Err(e) = sender.send(msg).await {
                tracing::debug!(user_id = %forward_user, error = %e, "Failed to send WebSocket message");
                break;
            }
        }
    });

    // 接收客户端消息（心跳）
    let receive_user = user_id.clone();
    let receive_task = tokio::spawn(async move {
        while let Some(msg) = receiver.next().await {
            match msg {
                Ok(Message::Close(_)) => {
                    tracing::info!(user_id = %receive_user, "Events WebSocket closed by client");
                    break;
                }
                Err(e) => {
                    tracing::debug!(user_id = %receive_user, error = %e, "Events WebSocket error");
                    break;
                }
                _ => {}
            }
        }
    });

    // 等待任一任务完成
    tokio::select! {
        _ = forward_task => {}
        _ = receive_task => {}
    }

    tracing::info!(user_id = %user_id, "Events WebSocket disconnected");
}
