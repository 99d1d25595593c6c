use axum::{
    extract::{FromRef, FromRequestParts, Request},
    http::{StatusCode, request::Parts},
    middleware::Next,
    response::{IntoResponse, Response},
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use tracing::debug;
use uuid::Uuid;

use crate::guard::{self, GuardDecision, Target};
use crate::navigation::Navigation;
use crate::session::{Session, SessionStore};
use crate::storage::StorageRegistry;

/// Name of the cookie that identifies a browser profile.
pub const CLIENT_COOKIE: &str = "portal_client";

/// ClientId
///
/// The browser profile a request comes from. Inserted into the request
/// extensions by [`client_identity`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClientId(pub Uuid);

/// client_identity
///
/// Outermost portal middleware. Reads the client cookie, or issues a new id on the
/// first visit, and makes it available to every extractor below.
pub async fn client_identity(jar: CookieJar, mut request: Request, next: Next) -> Response {
    let existing = jar
        .get(CLIENT_COOKIE)
        .and_then(|cookie| Uuid::parse_str(cookie.value()).ok());
    let client_id = existing.unwrap_or_else(Uuid::new_v4);
    request.extensions_mut().insert(ClientId(client_id));

    let response = next.run(request).await;
    if existing.is_some() {
        return response;
    }

    debug!(%client_id, "issuing client cookie");
    let cookie = Cookie::build((CLIENT_COOKIE, client_id.to_string()))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build();
    (jar.add(cookie), response).into_response()
}

/// ClientSession Extractor Result
///
/// The session store of the requesting browser profile plus a snapshot of its
/// fields, read synchronously when the request was extracted.
#[derive(Clone)]
pub struct ClientSession {
    pub client_id: ClientId,
    pub store: SessionStore,
    pub session: Session,
}

/// ClientSession Extractor Implementation
///
/// Resolves the partition for the request's client id. Rejects with 500 when
/// `client_identity` did not run, which only happens when the router is
/// assembled without it.
impl<S> FromRequestParts<S> for ClientSession
where
    S: Send + Sync,
    StorageRegistry: FromRef<S>,
{
    type Rejection = StatusCode;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let client_id = parts
            .extensions
            .get::<ClientId>()
            .copied()
            .ok_or(StatusCode::INTERNAL_SERVER_ERROR)?;

        let registry = StorageRegistry::from_ref(state);
        let store = SessionStore::new(registry.partition(client_id.0));
        let session = store.get();

        Ok(Self {
            client_id,
            store,
            session,
        })
    }
}

/// require_credential
///
/// Route guard for the protected router. Re-reads the client's store on every
/// request and redirects to login when no credential token is present.
pub async fn require_credential(
    client: ClientSession,
    request: Request,
    next: Next,
) -> Response {
    let target = Target::from_path(request.uri().path()).unwrap_or(Target::Dashboard);
    match guard::check(target, &client.session) {
        GuardDecision::Allow => next.run(request).await,
        GuardDecision::RedirectToLogin => Navigation::to_login().into_response(),
    }
}
