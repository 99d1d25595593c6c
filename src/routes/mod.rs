/// Router Module Index
///
/// Splits the portal's pages by access level. The guard is applied to the
/// protected router as a whole, so a page cannot be exposed by forgetting a
/// check inside its handler.

/// Pages reachable without a session: landing, login, registration and the
/// static information pages.
pub mod public;

/// Pages behind the route guard. Requires a credential token in the client's
/// session store.
pub mod protected;
