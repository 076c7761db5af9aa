//! Request/response DTOs and JSON mapping.

use serde::{Deserialize, Serialize};

use linkwise_core::ClusterView;

/// Raw `POST /identify` body. Validation (at least one non-empty
/// identifier) happens in `IdentifyRequest::new`, not here.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdentifyRequestBody {
    pub email: Option<String>,
    pub phone_number: Option<String>,
}

/// Identify response envelope: `{ "contact": { ... } }`.
#[derive(Debug, Serialize)]
pub struct IdentifyResponseBody {
    pub contact: ClusterView,
}
