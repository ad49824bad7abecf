//! Configuration writes as values.
//!
//! Every external setter has a [`SimCommand`] counterpart so edits can be
//! recorded, replayed, or sent from another thread through a
//! [`CommandSender`]. The simulation drains its channel at the start of each
//! tick.

use crate::config::{
    validate_nb_types, validate_weight, validate_weights, PointerConfig, SimConfig,
};
use crate::error::{Result, SimError};
use particula_data::{PhysicsParam, ResponseMode};
use std::sync::mpsc::Sender;

#[derive(Debug, Clone, PartialEq)]
pub enum SimCommand {
    /// Replace all 64 weights.
    SetWeights(Vec<f32>),
    /// Write one weight cell, `index = row * 8 + col`.
    SetWeight { index: usize, value: f32 },
    RandomizeWeights,
    ZeroWeights,
    MirrorWeights,
    /// Re-scatter positions and zero velocities.
    ResetPositions,
    SetPhysicsParam { param: PhysicsParam, value: f32 },
    SetNbTypes(usize),
    SetResponseMode(ResponseMode),
    SetNoiseEnabled(bool),
    SetNoiseParams {
        time_scale: f32,
        frequency: f32,
        amplitude: f32,
    },
    SetPointerParams(PointerConfig),
    SetPointerPressed(bool),
    SetPointerPosition { x: f32, y: f32 },
    /// Replace the whole configuration at the next tick boundary.
    ApplyConfig(Box<SimConfig>),
}

impl SimCommand {
    /// Checks everything that can be checked without the simulation state.
    pub fn validate(&self) -> Result<()> {
        match self {
            SimCommand::SetWeights(values) => validate_weights(values),
            SimCommand::SetWeight { index, value } => validate_weight(*index, *value),
            SimCommand::SetPhysicsParam { param, value } => {
                if param.contains(*value) {
                    Ok(())
                } else {
                    Err(SimError::out_of_range(*param, *value))
                }
            }
            SimCommand::SetNbTypes(n) => validate_nb_types(*n),
            SimCommand::SetPointerParams(params) => params.validate(),
            SimCommand::SetPointerPosition { x, y } => {
                for (field, value) in [("pointer.x", *x), ("pointer.y", *y)] {
                    if !value.is_finite() {
                        return Err(SimError::NonFiniteValue { field, value });
                    }
                }
                Ok(())
            }
            SimCommand::ApplyConfig(config) => config.validate(),
            SimCommand::RandomizeWeights
            | SimCommand::ZeroWeights
            | SimCommand::MirrorWeights
            | SimCommand::ResetPositions
            | SimCommand::SetResponseMode(_)
            | SimCommand::SetNoiseEnabled(_)
            | SimCommand::SetNoiseParams { .. }
            | SimCommand::SetPointerPressed(_) => Ok(()),
        }
    }

    /// Builds a physics write from its persisted name.
    pub fn physics_param(name: &str, value: f32) -> Result<Self> {
        let param = name
            .parse::<PhysicsParam>()
            .map_err(|_| SimError::UnknownParameter(name.to_string()))?;
        Ok(SimCommand::SetPhysicsParam { param, value })
    }

    /// Builds a response-mode write from its integer index.
    pub fn response_mode(index: u8) -> Result<Self> {
        ResponseMode::try_from(index)
            .map(SimCommand::SetResponseMode)
            .map_err(|_| SimError::InvalidResponseMode(index))
    }

    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            SimCommand::SetWeights(_) => "set_weights",
            SimCommand::SetWeight { .. } => "set_weight",
            SimCommand::RandomizeWeights => "randomize_weights",
            SimCommand::ZeroWeights => "zero_weights",
            SimCommand::MirrorWeights => "mirror_weights",
            SimCommand::ResetPositions => "reset_positions",
            SimCommand::SetPhysicsParam { .. } => "set_physics_param",
            SimCommand::SetNbTypes(_) => "set_nb_types",
            SimCommand::SetResponseMode(_) => "set_response_mode",
            SimCommand::SetNoiseEnabled(_) => "set_noise_enabled",
            SimCommand::SetNoiseParams { .. } => "set_noise_params",
            SimCommand::SetPointerParams(_) => "set_pointer_params",
            SimCommand::SetPointerPressed(_) => "set_pointer_pressed",
            SimCommand::SetPointerPosition { .. } => "set_pointer_position",
            SimCommand::ApplyConfig(_) => "apply_config",
        }
    }
}

/// Cloneable handle for submitting commands from other threads.
#[derive(Debug, Clone)]
pub struct CommandSender {
    sender: Sender<SimCommand>,
}

impl CommandSender {
    pub(crate) fn new(sender: Sender<SimCommand>) -> Self {
        Self { sender }
    }

    /// Validates and enqueues a command for the next tick.
    pub fn send(&self, command: SimCommand) -> Result<()> {
        command.validate()?;
        self.sender
            .send(command)
            .map_err(|_| SimError::Disconnected)
    }
}
