//! Request extractors for client metadata and bearer authentication.

use std::convert::Infallible;
use std::future::Future;
use std::net::SocketAddr;

use axum::extract::{ConnectInfo, FromRequestParts, Query};
use axum::http::{HeaderMap, header, request::Parts};
use serde::Deserialize;
use uuid::Uuid;

use crate::domain::notification::Locale;
use crate::domain::repository::UserRepository;
use crate::domain::types::{RequestContext, UNKNOWN, UNKNOWN_COUNTRY};
use crate::error::AuthServiceError;
use crate::state::AppState;

const X_FORWARDED_FOR: &str = "x-forwarded-for";
const X_REAL_IP: &str = "x-real-ip";
const CF_IPCOUNTRY: &str = "cf-ipcountry";

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
}

/// Build a [`RequestContext`] from edge headers, falling back to the peer address.
pub fn request_context(headers: &HeaderMap, peer: Option<SocketAddr>) -> RequestContext {
    let ip = header_str(headers, X_FORWARDED_FOR)
        .and_then(|v| v.split(',').next())
        .map(|v| v.trim().to_owned())
        .filter(|v| !v.is_empty())
        .or_else(|| header_str(headers, X_REAL_IP).map(str::to_owned))
        .or_else(|| peer.map(|addr| addr.ip().to_string()))
        .unwrap_or_else(|| UNKNOWN.to_owned());

    let browser = header_str(headers, header::USER_AGENT.as_str())
        .unwrap_or(UNKNOWN)
        .to_owned();

    let country = header_str(headers, CF_IPCOUNTRY)
        .unwrap_or(UNKNOWN_COUNTRY)
        .to_owned();

    RequestContext {
        ip,
        browser,
        country,
    }
}

impl<S> FromRequestParts<S> for RequestContext
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> impl Future<Output = Result<Self, Self::Rejection>> + Send {
        let peer = parts
            .extensions
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| *addr);
        let ctx = request_context(&parts.headers, peer);
        async move { Ok(ctx) }
    }
}

impl<S> FromRequestParts<S> for Locale
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> impl Future<Output = Result<Self, Self::Rejection>> + Send {
        let locale = header_str(&parts.headers, header::ACCEPT_LANGUAGE.as_str())
            .map(Locale::from_accept_language)
            .unwrap_or_default();
        async move { Ok(locale) }
    }
}

#[derive(Deserialize)]
struct TokenQuery {
    token: Option<String>,
}

/// Opaque token from `Authorization: Bearer ...`, else the `token` query parameter.
pub fn bearer_token(parts: &Parts) -> Option<String> {
    let from_header = header_str(&parts.headers, header::AUTHORIZATION.as_str())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(|v| v.trim().to_owned());

    from_header
        .or_else(|| {
            Query::<TokenQuery>::try_from_uri(&parts.uri)
                .ok()
                .and_then(|Query(q)| q.token)
                .map(|t| t.trim().to_owned())
        })
        .filter(|t| !t.is_empty())
}

/// Caller identity proven by a valid access token whose subject still exists.
///
/// Rejects with 401 otherwise. Role checks come afterwards, see
/// [`crate::usecase::authorize::AuthorizeUseCase`].
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub user_id: Uuid,
    /// The token as presented, for flows that re-read it.
    pub token: String,
}

impl FromRequestParts<AppState> for AuthenticatedUser {
    type Rejection = AuthServiceError;

    // Extract synchronously and return a 'static future; see axum-core's
    // `fn -> impl Future + Send` signature.
    fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> impl Future<Output = Result<Self, Self::Rejection>> + Send {
        let token = bearer_token(parts);
        let tokens = state.tokens.clone();
        let users = state.user_repo();

        async move {
            let token = token.ok_or(AuthServiceError::Unauthorized)?;
            let user_id = tokens
                .subject(&token)
                .map_err(|_| AuthServiceError::Unauthorized)?;
            users
                .find_by_id(user_id)
                .await?
                .ok_or(AuthServiceError::Unauthorized)?;
            Ok(Self { user_id, token })
        }
    }
}
