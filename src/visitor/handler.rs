//! API Gateway proxy boundary for the visitor counter.

use lambda_http::http::Response;
use lambda_http::request::RequestContext;
use lambda_http::{Body, Error, Request, RequestExt};
use shared::AppError;
use tracing::error;

use super::counter::{count_visit, VisitorCountResponse};
use crate::state::AppState;

/// Headers on every counter response, failures included.
pub const CORS_HEADERS: [(&str, &str); 3] = [
    ("Access-Control-Allow-Origin", "*"),
    ("Access-Control-Allow-Methods", "POST"),
    ("Access-Control-Allow-Headers", "Content-Type"),
];

/// Caller address from the REST (v1) or HTTP (v2) API request context.
pub fn source_ip(request: &Request) -> Option<String> {
    let ip = match request.request_context_ref()? {
        RequestContext::ApiGatewayV1(ctx) => ctx.identity.source_ip.clone(),
        RequestContext::ApiGatewayV2(ctx) => ctx.http.source_ip.clone(),
        _ => None,
    };
    ip.filter(|ip| !ip.is_empty())
}

fn json_response(status: u16, body: String) -> Result<Response<Body>, Error> {
    let mut builder = Response::builder()
        .status(status)
        .header("Content-Type", "application/json");
    for (name, value) in CORS_HEADERS {
        builder = builder.header(name, value);
    }
    Ok(builder.body(Body::from(body))?)
}

/// Count the caller and answer `{"visitor_count": n}`.
///
/// Failures are turned into an error body with the matching status code
/// here; the request body is never read.
pub async fn function_handler(state: &AppState, event: Request) -> Result<Response<Body>, Error> {
    let result = match source_ip(&event) {
        Some(ip) => {
            count_visit(
                state.secrets.as_ref(),
                state.visitors.as_ref(),
                &state.config.visitor.ip_salt_parameter,
                &ip,
            )
            .await
        }
        None => Err(AppError::bad_request("request context has no source IP")),
    };

    match result {
        Ok(outcome) => {
            let body = serde_json::to_string(&VisitorCountResponse::from(outcome))?;
            json_response(200, body)
        }
        Err(e) => {
            error!(error_code = e.error_code(), error = %e, "visitor counter failed");
            let body = serde_json::to_string(&e.to_error_response())?;
            json_response(e.status_code().as_u16(), body)
        }
    }
}
