//! Training CSV reader. The header names are an external contract.

use super::{BinaryField, RawApplication};
use crate::error::TrainingDataError;
use sha2::{Digest, Sha256};
use std::path::Path;

pub const TYPE_HEADER: &str = "Tipo de Aplicação";
pub const LABEL_HEADER: &str = "Aprovado_AppSec";

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Raw training rows with their approval labels.
#[derive(Debug, Clone)]
pub struct TrainingSet {
    pub rows: Vec<RawApplication>,
    /// `true` = approved
    pub labels: Vec<bool>,
    /// Hex SHA-256 of the source bytes
    pub sha256: String,
}

impl TrainingSet {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn parse(bytes: &[u8]) -> Result<Self, TrainingDataError> {
        let sha256 = format!("{:x}", Sha256::digest(bytes));
        let body = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(body);

        let headers = reader.headers()?.clone();
        let position = |name: &'static str| {
            headers
                .iter()
                .position(|h| h == name)
                .ok_or(TrainingDataError::MissingColumn(name))
        };
        let type_idx = position(TYPE_HEADER)?;
        let label_idx = position(LABEL_HEADER)?;
        let mut flag_idx = [0usize; 6];
        for field in BinaryField::ALL {
            flag_idx[field.index()] = position(field.csv_header())?;
        }

        let mut rows = Vec::new();
        let mut labels = Vec::new();
        for (i, record) in reader.records().enumerate() {
            let record = record?;
            let cell = |idx: usize| record.get(idx).unwrap_or_default().to_string();
            let label = match record.get(label_idx).unwrap_or_default() {
                "Sim" => true,
                "Não" => false,
                other => {
                    return Err(TrainingDataError::InvalidLabel {
                        row: i + 1,
                        value: other.to_string(),
                    })
                }
            };
            let flag = |field: BinaryField| cell(flag_idx[field.index()]);
            rows.push(RawApplication {
                tipo_aplicacao: cell(type_idx),
                exposicao_publica: flag(BinaryField::PublicExposure),
                dados_sensiveis: flag(BinaryField::SensitiveData),
                historico_incidentes: flag(BinaryField::IncidentHistory),
                sast_alto_risco: flag(BinaryField::SastHighRisk),
                dast_alto_risco: flag(BinaryField::DastHighRisk),
                aplicacao_mfa: flag(BinaryField::MfaEnabled),
            });
            labels.push(label);
        }

        if rows.is_empty() {
            return Err(TrainingDataError::Empty);
        }
        Ok(Self { rows, labels, sha256 })
    }
}

pub fn read_training_csv(path: &Path) -> Result<TrainingSet, TrainingDataError> {
    let bytes = std::fs::read(path)?;
    TrainingSet::parse(&bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "Tipo de Aplicação,Exposição Pública,Dados Sensíveis?,Histórico de Incidentes?,Resultado do Scan SAST (alto risco)?,Resultado do Scan DAST (alto risco)?,Aplicação com MFA?,Aprovado_AppSec";

    #[test]
    fn parses_rows_and_labels() {
        let csv = format!("{HEADER}\nWeb,Sim,Sim,Não,Não,Sim,Sim,Não\nAPI,Não,Não,Não,Não,Não,Sim,Sim\n");
        let set = TrainingSet::parse(csv.as_bytes()).unwrap();
        assert_eq!(set.len(), 2);
        assert_eq!(set.labels, vec![false, true]);
        assert_eq!(set.rows[0].tipo_aplicacao, "Web");
        assert_eq!(set.rows[0].dast_alto_risco, "Sim");
        assert_eq!(set.rows[1].aplicacao_mfa, "Sim");
        assert_eq!(set.sha256.len(), 64);
    }

    #[test]
    fn header_order_does_not_matter_and_bom_is_skipped() {
        let csv = "\u{feff}Aprovado_AppSec,Aplicação com MFA?,Resultado do Scan DAST (alto risco)?,Resultado do Scan SAST (alto risco)?,Histórico de Incidentes?,Dados Sensíveis?,Exposição Pública,Tipo de Aplicação\nSim,Sim,Não,Não,Não,Não,Não,Mobile\n";
        let set = TrainingSet::parse(csv.as_bytes()).unwrap();
        assert_eq!(set.rows[0].tipo_aplicacao, "Mobile");
        assert_eq!(set.rows[0].aplicacao_mfa, "Sim");
        assert_eq!(set.labels, vec![true]);
    }

    #[test]
    fn missing_header_is_reported() {
        let csv = "Tipo de Aplicação,Aprovado_AppSec\nWeb,Sim\n";
        let err = TrainingSet::parse(csv.as_bytes()).unwrap_err();
        assert!(matches!(err, TrainingDataError::MissingColumn("Exposição Pública")));
    }

    #[test]
    fn invalid_label_and_empty_body() {
        let csv = format!("{HEADER}\nWeb,Sim,Sim,Não,Não,Sim,Sim,Talvez\n");
        let err = TrainingSet::parse(csv.as_bytes()).unwrap_err();
        assert!(matches!(err, TrainingDataError::InvalidLabel { row: 1, .. }));

        let err = TrainingSet::parse(format!("{HEADER}\n").as_bytes()).unwrap_err();
        assert!(matches!(err, TrainingDataError::Empty));
    }
}
