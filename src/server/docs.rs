use axum::response::Json;
use utoipa::OpenApi;

use super::handlers::{health, summary};
use crate::payload::{ErrorBody, HistoryEntry, SummaryPayload};

#[derive(OpenApi)]
#[openapi(
    paths(health::health_check, summary::upload_summary, summary::list_history),
    components(schemas(SummaryPayload, HistoryEntry, ErrorBody, summary::UploadForm))
)]
pub struct ApiDoc;

pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_lists_endpoints() {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key("/api/summary/"));
        assert!(doc.paths.paths.contains_key("/api/summary/history"));
        assert!(doc.paths.paths.contains_key("/health"));
    }
}
