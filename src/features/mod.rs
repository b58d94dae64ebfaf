//! Categorical application attributes → fixed-order numeric feature vectors.

mod dataset;
mod encoder;
mod schema;

pub use dataset::{read_training_csv, TrainingSet, LABEL_HEADER, TYPE_HEADER};
pub use encoder::{encode_app_type, encode_flag, Encoded, FeatureEncoder, UnknownPolicy};
pub use schema::{Column, FeatureSchema};

use serde::{Deserialize, Serialize};

/// Yes/no attributes, in feature column order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryField {
    PublicExposure,
    SensitiveData,
    IncidentHistory,
    SastHighRisk,
    DastHighRisk,
    MfaEnabled,
}

impl BinaryField {
    pub const ALL: [BinaryField; 6] = [
        BinaryField::PublicExposure,
        BinaryField::SensitiveData,
        BinaryField::IncidentHistory,
        BinaryField::SastHighRisk,
        BinaryField::DastHighRisk,
        BinaryField::MfaEnabled,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    /// Feature column name
    pub fn column_name(self) -> &'static str {
        match self {
            BinaryField::PublicExposure => "Exposicao_Publica",
            BinaryField::SensitiveData => "Dados_Sensiveis",
            BinaryField::IncidentHistory => "Historico_Incidentes",
            BinaryField::SastHighRisk => "SAST_Alto_Risco",
            BinaryField::DastHighRisk => "DAST_Alto_Risco",
            BinaryField::MfaEnabled => "Aplicacao_MFA",
        }
    }

    /// Request field name
    pub fn key(self) -> &'static str {
        match self {
            BinaryField::PublicExposure => "exposicao_publica",
            BinaryField::SensitiveData => "dados_sensiveis",
            BinaryField::IncidentHistory => "historico_incidentes",
            BinaryField::SastHighRisk => "sast_alto_risco",
            BinaryField::DastHighRisk => "dast_alto_risco",
            BinaryField::MfaEnabled => "aplicacao_mfa",
        }
    }

    /// Training CSV header
    pub fn csv_header(self) -> &'static str {
        match self {
            BinaryField::PublicExposure => "Exposição Pública",
            BinaryField::SensitiveData => "Dados Sensíveis?",
            BinaryField::IncidentHistory => "Histórico de Incidentes?",
            BinaryField::SastHighRisk => "Resultado do Scan SAST (alto risco)?",
            BinaryField::DastHighRisk => "Resultado do Scan DAST (alto risco)?",
            BinaryField::MfaEnabled => "Aplicação com MFA?",
        }
    }
}

/// Application type, in one-hot column order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AppType {
    #[serde(rename = "API")]
    Api,
    Mobile,
    Web,
}

impl AppType {
    pub const ALL: [AppType; 3] = [AppType::Api, AppType::Mobile, AppType::Web];

    pub fn label(self) -> &'static str {
        match self {
            AppType::Api => "API",
            AppType::Mobile => "Mobile",
            AppType::Web => "Web",
        }
    }

    pub fn column_name(self) -> &'static str {
        match self {
            AppType::Api => "TipoApp_API",
            AppType::Mobile => "TipoApp_Mobile",
            AppType::Web => "TipoApp_Web",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        AppType::ALL.into_iter().find(|t| t.label() == raw)
    }
}

/// One application as submitted: textual attributes, not yet validated against the known categories.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawApplication {
    pub tipo_aplicacao: String,
    pub exposicao_publica: String,
    pub dados_sensiveis: String,
    pub historico_incidentes: String,
    pub sast_alto_risco: String,
    pub dast_alto_risco: String,
    pub aplicacao_mfa: String,
}

impl RawApplication {
    pub fn flag(&self, field: BinaryField) -> &str {
        match field {
            BinaryField::PublicExposure => &self.exposicao_publica,
            BinaryField::SensitiveData => &self.dados_sensiveis,
            BinaryField::IncidentHistory => &self.historico_incidentes,
            BinaryField::SastHighRisk => &self.sast_alto_risco,
            BinaryField::DastHighRisk => &self.dast_alto_risco,
            BinaryField::MfaEnabled => &self.aplicacao_mfa,
        }
    }
}

/// Numeric model input, aligned to a [`FeatureSchema`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    pub values: Vec<f32>,
}

impl FeatureVector {
    pub fn as_slice(&self) -> &[f32] {
        &self.values
    }

    pub fn dim(&self) -> usize {
        self.values.len()
    }
}
