//! HTTP routes for /graphql and /graphql/ws.
//!
//! Both entry points resolve the caller before execution. A bearer token
//! that fails verification rejects the request outright instead of running
//! it anonymously.

use std::sync::Arc;

use async_graphql::http::GraphiQLSource;
use async_graphql::{Data, ErrorExtensions, Pos, Response};
use async_graphql_axum::{GraphQLProtocol, GraphQLRequest, GraphQLResponse, GraphQLWebSocket};
use axum::Router;
use axum::extract::{State, WebSocketUpgrade};
use axum::http::header::{ACCEPT, AUTHORIZATION};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{Html, IntoResponse};
use axum::routing::get;

use crate::app::AppState;
use crate::graphql::{authenticate, book_count_loader, with_request_context};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/graphql", get(graphiql).post(graphql_handler))
        .route("/graphql/ws", get(graphql_ws_handler))
}

fn authorization(headers: &HeaderMap) -> Option<&str> {
    headers.get(AUTHORIZATION).and_then(|h| h.to_str().ok())
}

/// GraphiQL interactive playground (only for browsers)
async fn graphiql(headers: HeaderMap) -> impl IntoResponse {
    let accepts_html = headers
        .get(ACCEPT)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.contains("text/html"))
        .unwrap_or(false);

    if accepts_html {
        Html(
            GraphiQLSource::build()
                .endpoint("/graphql")
                .subscription_endpoint("/graphql/ws")
                .finish(),
        )
        .into_response()
    } else {
        (
            StatusCode::METHOD_NOT_ALLOWED,
            axum::Json(serde_json::json!({
                "error": "GET requests are not supported for GraphQL queries. Use POST with Content-Type: application/json"
            })),
        )
            .into_response()
    }
}

/// GraphQL query/mutation handler with auth context
async fn graphql_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    req: GraphQLRequest,
) -> GraphQLResponse {
    let current_user = match authenticate(&state.auth, authorization(&headers)).await {
        Ok(user) => user,
        Err(e) => {
            let error = e.extend().into_server_error(Pos::default());
            return Response::from_errors(vec![error]).into();
        }
    };

    let request = with_request_context(req.into_inner(), &state.db, current_user);
    state.schema.execute(request).await.into()
}

/// GraphQL WebSocket handler for subscriptions.
///
/// Credentials come from the upgrade request's `Authorization` header or the
/// `Authorization` field of the `connection_init` payload, the latter taking
/// precedence.
async fn graphql_ws_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    protocol: GraphQLProtocol,
    ws: WebSocketUpgrade,
) -> axum::response::Response {
    let header_user = match authenticate(&state.auth, authorization(&headers)).await {
        Ok(user) => user,
        Err(e) => {
            return (
                StatusCode::UNAUTHORIZED,
                axum::Json(serde_json::json!({ "error": e.to_string() })),
            )
                .into_response();
        }
    };

    let AppState {
        schema, db, auth, ..
    } = state;

    ws.protocols(["graphql-transport-ws", "graphql-ws"])
        .on_upgrade(move |socket| {
            GraphQLWebSocket::new(socket, schema, protocol)
                .on_connection_init(move |params| async move {
                    let param_token = params
                        .get("Authorization")
                        .or_else(|| params.get("authorization"))
                        .and_then(|v| v.as_str())
                        .map(|v| format!("Bearer {}", v.strip_prefix("Bearer ").unwrap_or(v)));

                    let user = match param_token {
                        Some(value) => authenticate(&auth, Some(&value))
                            .await
                            .map_err(|e| e.extend())?,
                        None => header_user,
                    };

                    let mut data = Data::default();
                    data.insert(book_count_loader(Arc::new(db)));
                    if let Some(user) = user {
                        data.insert(user);
                    }
                    Ok(data)
                })
                .serve()
        })
        .into_response()
}
