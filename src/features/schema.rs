//! Frozen, ordered feature columns captured at training time.

use super::{AppType, BinaryField};
use std::collections::HashSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Column {
    Flag(BinaryField),
    AppType(AppType),
}

impl Column {
    pub fn name(self) -> &'static str {
        match self {
            Column::Flag(f) => f.column_name(),
            Column::AppType(t) => t.column_name(),
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        BinaryField::ALL
            .into_iter()
            .map(Column::Flag)
            .chain(AppType::ALL.into_iter().map(Column::AppType))
            .find(|c| c.name() == name)
    }
}

/// Ordered column list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureSchema {
    columns: Vec<Column>,
}

impl FeatureSchema {
    /// Six flags followed by the given application types (kept in one-hot order).
    pub fn with_app_types(types: &[AppType]) -> Self {
        let mut columns: Vec<Column> = BinaryField::ALL.into_iter().map(Column::Flag).collect();
        columns.extend(
            AppType::ALL
                .into_iter()
                .filter(|t| types.contains(t))
                .map(Column::AppType),
        );
        Self { columns }
    }

    /// All nine columns.
    pub fn full() -> Self {
        Self::with_app_types(&AppType::ALL)
    }

    /// Rebuild from persisted names. Unknown or duplicated names are rejected.
    pub fn from_names<S: AsRef<str>>(names: &[S]) -> Result<Self, String> {
        let mut seen = HashSet::new();
        let mut columns = Vec::with_capacity(names.len());
        for name in names {
            let name = name.as_ref();
            let col = Column::from_name(name).ok_or_else(|| format!("unknown column {name:?}"))?;
            if !seen.insert(col) {
                return Err(format!("duplicate column {name:?}"));
            }
            columns.push(col);
        }
        Ok(Self { columns })
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.columns.iter().map(|c| c.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_schema_order() {
        assert_eq!(
            FeatureSchema::full().names(),
            vec![
                "Exposicao_Publica",
                "Dados_Sensiveis",
                "Historico_Incidentes",
                "SAST_Alto_Risco",
                "DAST_Alto_Risco",
                "Aplicacao_MFA",
                "TipoApp_API",
                "TipoApp_Mobile",
                "TipoApp_Web",
            ]
        );
    }

    #[test]
    fn app_types_keep_one_hot_order() {
        let s = FeatureSchema::with_app_types(&[AppType::Web, AppType::Api]);
        assert_eq!(s.len(), 8);
        assert_eq!(&s.names()[6..], &["TipoApp_API", "TipoApp_Web"]);
    }

    #[test]
    fn from_names_rejects_foreign_and_duplicate_columns() {
        assert!(FeatureSchema::from_names(&["Exposicao_Publica", "TipoApp_Desktop"]).is_err());
        assert!(FeatureSchema::from_names(&["TipoApp_Web", "TipoApp_Web"]).is_err());
        let names = FeatureSchema::full().names();
        assert_eq!(FeatureSchema::from_names(names.as_slice()).unwrap(), FeatureSchema::full());
    }
}
