//! Request/response bodies.

use crate::features::RawApplication;
use crate::model::ModelMetadata;
use crate::risk::{Assessment, RiskBand};
use serde::{Deserialize, Serialize};

/// All fields are required; a body missing any of them is rejected before the model runs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskAssessmentRequest {
    /// "Web", "Mobile" or "API"
    pub tipo_aplicacao: String,
    /// "Sim" or "Não" from here on
    pub exposicao_publica: String,
    pub dados_sensiveis: String,
    pub historico_incidentes: String,
    pub sast_alto_risco: String,
    pub dast_alto_risco: String,
    pub aplicacao_mfa: String,
}

impl From<RiskAssessmentRequest> for RawApplication {
    fn from(r: RiskAssessmentRequest) -> Self {
        RawApplication {
            tipo_aplicacao: r.tipo_aplicacao,
            exposicao_publica: r.exposicao_publica,
            dados_sensiveis: r.dados_sensiveis,
            historico_incidentes: r.historico_incidentes,
            sast_alto_risco: r.sast_alto_risco,
            dast_alto_risco: r.dast_alto_risco,
            aplicacao_mfa: r.aplicacao_mfa,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskAssessmentResponse {
    pub aprovado_appsec: bool,
    pub risco: RiskBand,
}

impl From<Assessment> for RiskAssessmentResponse {
    fn from(a: Assessment) -> Self {
        Self {
            aprovado_appsec: a.approved,
            risco: a.band,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<ModelMetadata>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ErrorBody {
    pub detail: String,
}
