//! Response envelope for the `/api/v1` surface.
//!
//! Every resource handler wraps its payload in `{ "data": ... }` via
//! [`DataResponse`] rather than ad-hoc `serde_json::json!` maps, so clients
//! can unwrap one field everywhere. Two corners of the surface stay bare:
//! `/health` (probed by infrastructure that expects a flat body) and the
//! `/auth/*` session endpoints (token payloads are their own shape).

use serde::Serialize;

/// Standard `{ "data": T }` envelope.
#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub data: T,
}
