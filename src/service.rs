//! Startup train-or-load state machine and the encode → classify → band request path.

use crate::config::ServiceConfig;
use crate::error::{AssessError, ModelError, StartupError};
use crate::features::{read_training_csv, FeatureEncoder, RawApplication};
use crate::model::{FittedModel, TreeParams};
use crate::risk::{Assessment, RiskEngine};
use std::sync::{Arc, Mutex, OnceLock, PoisonError, RwLock};
use tracing::{error, info, warn};

/// Model lifecycle. `Uninitialized → Loading | Training → Ready`, or `Failed` on error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Phase {
    Uninitialized,
    Loading,
    Training,
    Ready,
    Failed(String),
}

impl Phase {
    pub fn name(&self) -> &'static str {
        match self {
            Phase::Uninitialized => "uninitialized",
            Phase::Loading => "loading",
            Phase::Training => "training",
            Phase::Ready => "ready",
            Phase::Failed(_) => "failed",
        }
    }
}

pub struct RiskService {
    config: ServiceConfig,
    encoder: FeatureEncoder,
    risk: RiskEngine,
    phase: RwLock<Phase>,
    model: OnceLock<Arc<FittedModel>>,
    init: Mutex<()>,
}

impl RiskService {
    pub fn new(config: ServiceConfig) -> Self {
        Self {
            encoder: FeatureEncoder::new(config.encoder.unknown_values),
            risk: RiskEngine::new(config.risk.clone()),
            config,
            phase: RwLock::new(Phase::Uninitialized),
            model: OnceLock::new(),
            init: Mutex::new(()),
        }
    }

    /// Service that is ready from the start with an already fitted model.
    pub fn with_model(config: ServiceConfig, model: FittedModel) -> Self {
        let svc = Self::new(config);
        let _ = svc.model.set(Arc::new(model));
        svc.set_phase(Phase::Ready);
        svc
    }

    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    pub fn phase(&self) -> Phase {
        self.phase
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn model(&self) -> Option<&Arc<FittedModel>> {
        self.model.get()
    }

    fn set_phase(&self, phase: Phase) {
        *self.phase.write().unwrap_or_else(PoisonError::into_inner) = phase;
    }

    /// Bring the model to Ready: load the artifact if it exists, otherwise train from the
    /// CSV and persist. Serialized; a no-op once Ready. On failure the phase is `Failed`
    /// and predictions answer [`ModelError::NotTrained`].
    pub fn initialize(&self) -> Result<(), StartupError> {
        let _guard = self.init.lock().unwrap_or_else(PoisonError::into_inner);
        if self.model.get().is_some() {
            return Ok(());
        }

        let artifact = &self.config.model.artifact_path;
        let result = if artifact.exists() {
            self.set_phase(Phase::Loading);
            info!(path = %artifact.display(), "loading model artifact");
            FittedModel::load(artifact).map_err(StartupError::from)
        } else {
            self.set_phase(Phase::Training);
            self.train_and_persist(false)
        };

        match result {
            Ok(model) => {
                let meta = model.metadata();
                info!(
                    trained_at = %meta.trained_at,
                    training_rows = meta.training_rows,
                    dataset_sha256 = %meta.dataset_sha256,
                    columns = ?model.schema().names(),
                    "model ready"
                );
                let _ = self.model.set(Arc::new(model));
                self.set_phase(Phase::Ready);
                Ok(())
            }
            Err(e) => {
                error!(error = %e, "model initialization failed; predictions disabled");
                self.set_phase(Phase::Failed(e.to_string()));
                Err(e)
            }
        }
    }

    /// Fit a model on the configured CSV and write the artifact.
    ///
    /// With `require_persist` a failed write is an error; otherwise it is logged and the
    /// fitted model is still returned.
    pub fn train_and_persist(&self, require_persist: bool) -> Result<FittedModel, StartupError> {
        let model_cfg = &self.config.model;
        info!(path = %model_cfg.training_data_path.display(), "training model from csv");
        let set = read_training_csv(&model_cfg.training_data_path)?;
        let params = TreeParams {
            max_depth: model_cfg.max_depth,
            seed: model_cfg.seed,
            ..TreeParams::default()
        };
        let model = FittedModel::train(&set, &self.encoder, params)?;
        match model.save(&model_cfg.artifact_path) {
            Ok(()) => info!(path = %model_cfg.artifact_path.display(), "model artifact written"),
            Err(e) if require_persist => return Err(e.into()),
            Err(e) => warn!(error = %e, "failed to persist model artifact"),
        }
        Ok(model)
    }

    /// Encode, classify and band one application.
    pub fn assess(&self, application: &RawApplication) -> Result<Assessment, AssessError> {
        let model = self.model.get().ok_or(ModelError::NotTrained)?;
        let features = self.encoder.encode_one(application, model.schema())?;
        let probabilities = model.predict_probability(&features)?;
        let approved = model.predict_label(&features)?;
        Ok(self.risk.assess(approved, probabilities))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn application() -> RawApplication {
        RawApplication {
            tipo_aplicacao: "API".into(),
            exposicao_publica: "Sim".into(),
            dados_sensiveis: "Não".into(),
            historico_incidentes: "Não".into(),
            sast_alto_risco: "Não".into(),
            dast_alto_risco: "Não".into(),
            aplicacao_mfa: "Sim".into(),
        }
    }

    #[test]
    fn uninitialized_service_refuses_to_assess() {
        let svc = RiskService::new(ServiceConfig::default());
        assert_eq!(svc.phase(), Phase::Uninitialized);
        assert!(matches!(
            svc.assess(&application()),
            Err(AssessError::Model(ModelError::NotTrained))
        ));
    }

    #[test]
    fn failed_startup_is_reported_not_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = ServiceConfig::default();
        config.model.artifact_path = dir.path().join("model.json");
        config.model.training_data_path = dir.path().join("missing.csv");
        let svc = RiskService::new(config);
        assert!(svc.initialize().is_err());
        assert!(matches!(svc.phase(), Phase::Failed(_)));
        assert!(matches!(
            svc.assess(&application()),
            Err(AssessError::Model(ModelError::NotTrained))
        ));
    }
}
