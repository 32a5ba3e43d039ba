use actix_web::{
    http::StatusCode,
    web::{Data, Json},
    HttpResponse, Responder,
};
use timer_core::{
    leaderboard as leaderboard_view, resolve_attempt, update_message as replace_message,
    AttemptError, StoreError, ValidationError,
};

use crate::response::{attempt_error_response, json_error_with_code};
use crate::{
    now_unix_s, AppState, AttemptBody, HealthResponse, UpdateMessageBody, UpdateMessageResponse,
};

/// Run store work on the blocking pool so SQLite never stalls an HTTP worker.
async fn run_blocking<T, F>(work: F) -> Result<T, AttemptError>
where
    F: FnOnce() -> Result<T, AttemptError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(work).await.map_err(|err| {
        AttemptError::Store(StoreError::Backend(format!(
            "store worker join failure: {err}"
        )))
    })?
}

pub(crate) async fn health(state: Data<AppState>) -> impl Responder {
    let counts = state
        .store
        .count()
        .and_then(|players| Ok((players, state.store.ranked()?.len())));
    let (players, ranked_players) = match counts {
        Ok(counts) => counts,
        Err(e) => {
            tracing::error!("health check failed: {e}");
            return json_error_with_code(
                StatusCode::INTERNAL_SERVER_ERROR,
                "player store error",
                Some("internal_error"),
            );
        }
    };

    HttpResponse::Ok().json(HealthResponse {
        status: "healthy",
        service: "perfect-ten-api",
        store_backend: state.store_backend.as_str(),
        players,
        ranked_players,
    })
}

pub(crate) async fn submit_attempt(
    state: Data<AppState>,
    body: Json<AttemptBody>,
) -> impl Responder {
    let request = match body.into_inner().into_request() {
        Ok(request) => request,
        Err(err) => return attempt_error_response(&AttemptError::from(err)),
    };

    let store = state.store.clone();
    let filter = state.filter.clone();
    let result = run_blocking(move || {
        resolve_attempt(store.as_ref(), filter.as_ref(), &request, now_unix_s())
    })
    .await;

    match result {
        Ok(outcome) => {
            if let Some(player) = &outcome.player {
                tracing::info!(
                    player = %player.name,
                    rank = ?outcome.rank,
                    first_perfect_attempt = ?player.first_perfect_attempt,
                    new_record = ?outcome.is_new_record,
                    "perfect attempt recorded"
                );
            }
            HttpResponse::Ok().json(outcome)
        }
        Err(err) => attempt_error_response(&err),
    }
}

pub(crate) async fn update_message(
    state: Data<AppState>,
    body: Json<UpdateMessageBody>,
) -> impl Responder {
    let UpdateMessageBody {
        player_name,
        message,
    } = body.into_inner();
    let Some(player_name) = player_name else {
        return attempt_error_response(&AttemptError::from(ValidationError::MissingName));
    };
    let Some(message) = message else {
        return attempt_error_response(&AttemptError::from(ValidationError::MissingMessage));
    };

    let store = state.store.clone();
    let filter = state.filter.clone();
    let result = run_blocking(move || {
        replace_message(store.as_ref(), filter.as_ref(), &player_name, &message)
    })
    .await;

    match result {
        Ok(player) => {
            tracing::info!(player = %player.name, "leader message updated");
            HttpResponse::Ok().json(UpdateMessageResponse {
                success: true,
                player,
            })
        }
        Err(err) => {
            if let AttemptError::NotLeader { name } = &err {
                tracing::warn!(player = %name, "message update rejected: not the leader");
            }
            attempt_error_response(&err)
        }
    }
}

pub(crate) async fn leaderboard(state: Data<AppState>) -> impl Responder {
    let store = state.store.clone();
    match run_blocking(move || leaderboard_view(store.as_ref())).await {
        Ok(view) => HttpResponse::Ok().json(view),
        Err(err) => attempt_error_response(&err),
    }
}
