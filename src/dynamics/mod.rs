//! Structures related to dynamics: bodies, their mass properties, integration and activation.

pub use self::area_override::{aggregate_area_effects, AreaEffects};
pub use self::body::{Body, BodyBuilder};
pub use self::body_components::*;
pub use self::body_lists::{BodyListMembership, BodyLists};
pub use self::body_params::{BodyError, BodyParamValue, BodyParameter, BodyState, BodyStateValue};
pub use self::body_set::BodySet;
pub use self::callbacks::{
    CallbackUserData, ForceIntegrationCallback, StateSyncCallback, TargetedCallback,
};
pub use self::constraint::{Constraint, ConstraintHandle, ConstraintSet};
pub use self::direct_state::DirectBodyState;
pub use self::integration_parameters::IntegrationParameters;

pub mod mass_properties;

mod activation;
mod area_override;
mod body;
mod body_components;
mod body_lists;
mod body_params;
mod body_set;
mod callbacks;
mod constraint;
mod direct_state;
mod integration;
mod integration_parameters;
