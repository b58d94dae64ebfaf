use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{debug, error, warn};

use super::schemas::{ErrorBody, HealthResponse, RiskAssessmentRequest, RiskAssessmentResponse};
use crate::error::{AssessError, ModelError};
use crate::features::RawApplication;
use crate::service::{Phase, RiskService};

/// Request failures and the status each one maps to.
#[derive(Debug)]
pub enum ApiError {
    /// Body missing, not JSON, wrong content type, or missing fields. Always 422.
    Validation(JsonRejection),
    Assess(AssessError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Assess(AssessError::Encode(_)) => StatusCode::BAD_REQUEST,
            ApiError::Assess(AssessError::Model(ModelError::NotTrained)) => {
                StatusCode::SERVICE_UNAVAILABLE
            }
            ApiError::Assess(AssessError::Model(ModelError::DimensionMismatch { .. })) => {
                StatusCode::BAD_REQUEST
            }
            ApiError::Assess(AssessError::Model(_)) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn detail(&self) -> String {
        match self {
            ApiError::Validation(rejection) => rejection.body_text(),
            ApiError::Assess(e) => e.to_string(),
        }
    }
}

impl From<AssessError> for ApiError {
    fn from(e: AssessError) -> Self {
        ApiError::Assess(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let detail = self.detail();
        match &self {
            ApiError::Validation(_) => debug!(%status, detail = %detail, "request rejected"),
            _ if status.is_server_error() => error!(%status, detail = %detail, "prediction failed"),
            _ => warn!(%status, detail = %detail, "prediction refused"),
        }
        (status, Json(ErrorBody { detail })).into_response()
    }
}

pub async fn root() -> Json<Value> {
    Json(json!({"message": "AI Risk Analysis Service is running!"}))
}

pub async fn predict(
    State(service): State<Arc<RiskService>>,
    payload: Result<Json<RiskAssessmentRequest>, JsonRejection>,
) -> Result<Json<RiskAssessmentResponse>, ApiError> {
    let Json(request) = payload.map_err(ApiError::Validation)?;
    let application = RawApplication::from(request);
    let assessment = service.assess(&application)?;
    debug!(
        approved = assessment.approved,
        band = assessment.band.as_str(),
        p_reject = assessment.probabilities.reject,
        "application assessed"
    );
    Ok(Json(assessment.into()))
}

pub async fn health(State(service): State<Arc<RiskService>>) -> impl IntoResponse {
    let phase = service.phase();
    let status = if phase == Phase::Ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    let reason = match &phase {
        Phase::Failed(reason) => Some(reason.clone()),
        _ => None,
    };
    let body = HealthResponse {
        status: phase.name(),
        reason,
        model: service.model().map(|m| m.metadata().clone()),
    };
    (status, Json(body))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EncodeError;

    fn assess(e: impl Into<AssessError>) -> ApiError {
        ApiError::Assess(e.into())
    }

    #[test]
    fn model_errors_split_between_client_and_server() {
        assert_eq!(
            assess(ModelError::DimensionMismatch { expected: 9, got: 8 }).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(assess(ModelError::NotTrained).status(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(
            assess(ModelError::EmptyTrainingSet).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            assess(ModelError::LabelCountMismatch { rows: 2, labels: 1 }).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn unknown_value_is_a_bad_request() {
        let e = assess(EncodeError::UnknownValue {
            field: "tipo_aplicacao",
            value: "Desktop".into(),
        });
        assert_eq!(e.status(), StatusCode::BAD_REQUEST);
        assert!(e.detail().contains("tipo_aplicacao"));
    }
}
