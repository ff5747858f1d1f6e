//! Scene contents for one viewer session

use vitrine_core::{ModelNode, Rgb};
use crate::config::ViewerConfig;
use crate::environment::EnvironmentMap;
use crate::lighting::StudioRig;

/// Blur applied to the generated room, in radians
pub const ENVIRONMENT_BLUR: f32 = 0.04;

/// Background, lights, environment and at most one model
#[derive(Debug, Clone)]
pub struct Scene {
    pub background: Rgb,
    pub lights: StudioRig,
    pub environment: EnvironmentMap,
    model: Option<ModelNode>,
    /// Bumped whenever the model changes so surfaces know to re-upload
    revision: u64,
}

impl Scene {
    pub fn new(background: Rgb, lights: StudioRig, environment: EnvironmentMap) -> Self {
        Self {
            background,
            lights,
            environment,
            model: None,
            revision: 0,
        }
    }

    /// Studio lights and room environment over the configured background
    pub fn studio(config: &ViewerConfig) -> Self {
        Self::new(
            config.background_color(),
            StudioRig::studio(),
            EnvironmentMap::room(ENVIRONMENT_BLUR),
        )
    }

    pub fn model(&self) -> Option<&ModelNode> {
        self.model.as_ref()
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Insert a model, replacing any previous one
    pub fn set_model(&mut self, model: ModelNode) {
        self.model = Some(model);
        self.revision += 1;
    }

    /// Remove and return the model
    pub fn take_model(&mut self) -> Option<ModelNode> {
        let model = self.model.take();
        if model.is_some() {
            self.revision += 1;
        }
        model
    }
}
