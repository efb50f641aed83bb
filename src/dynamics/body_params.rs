use crate::dynamics::BodyHandle;
use crate::math::{Real, Vector};
use crate::utils::Transform;

/// The parameters of a body that can be read and written through
/// [`Body::set_param`](crate::dynamics::Body::set_param).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub enum BodyParameter {
    /// Restitution coefficient (scalar).
    Bounce,
    /// Friction coefficient (scalar).
    Friction,
    /// Total mass (scalar, strictly positive).
    Mass,
    /// Principal inertia (vector). Components `<= 0` are computed automatically.
    Inertia,
    /// Local center of mass (vector). Disables its automatic computation.
    CenterOfMass,
    /// Gravity multiplier (scalar).
    GravityScale,
    /// Linear damping (scalar). Negative values defer to the overlapping areas.
    LinearDamp,
    /// Angular damping (scalar). Negative values defer to the overlapping areas.
    AngularDamp,
}

/// The value of a [`BodyParameter`].
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub enum BodyParamValue {
    /// A scalar value.
    Real(Real),
    /// A vector value.
    Vector(Vector<Real>),
}

impl BodyParamValue {
    pub(crate) fn real(self, param: BodyParameter) -> Result<Real, BodyError> {
        match self {
            Self::Real(val) => Ok(val),
            Self::Vector(_) => Err(BodyError::ParamTypeMismatch {
                param,
                expected: "scalar",
            }),
        }
    }

    pub(crate) fn vector(self, param: BodyParameter) -> Result<Vector<Real>, BodyError> {
        match self {
            Self::Vector(val) => Ok(val),
            Self::Real(_) => Err(BodyError::ParamTypeMismatch {
                param,
                expected: "vector",
            }),
        }
    }

    /// The scalar value, if this is one.
    pub fn as_real(&self) -> Option<Real> {
        match self {
            Self::Real(val) => Some(*val),
            Self::Vector(_) => None,
        }
    }

    /// The vector value, if this is one.
    pub fn as_vector(&self) -> Option<Vector<Real>> {
        match self {
            Self::Vector(val) => Some(*val),
            Self::Real(_) => None,
        }
    }
}

impl From<Real> for BodyParamValue {
    fn from(val: Real) -> Self {
        Self::Real(val)
    }
}

impl From<Vector<Real>> for BodyParamValue {
    fn from(val: Vector<Real>) -> Self {
        Self::Vector(val)
    }
}

/// The state variables of a body that can be read and written through
/// [`Body::set_state`](crate::dynamics::Body::set_state).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub enum BodyState {
    /// The transform of the body (or the target transform of a kinematic body).
    Transform,
    /// The linear velocity.
    LinearVelocity,
    /// The angular velocity.
    AngularVelocity,
    /// Is the body asleep?
    Sleeping,
    /// Is the body allowed to fall asleep?
    CanSleep,
}

/// The value of a [`BodyState`].
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub enum BodyStateValue {
    /// A transform value.
    Transform(Transform),
    /// A vector value.
    Vector(Vector<Real>),
    /// A boolean value.
    Bool(bool),
}

impl BodyStateValue {
    pub(crate) fn transform(self, state: BodyState) -> Result<Transform, BodyError> {
        match self {
            Self::Transform(val) => Ok(val),
            _ => Err(BodyError::StateTypeMismatch {
                state,
                expected: "transform",
            }),
        }
    }

    pub(crate) fn vector(self, state: BodyState) -> Result<Vector<Real>, BodyError> {
        match self {
            Self::Vector(val) => Ok(val),
            _ => Err(BodyError::StateTypeMismatch {
                state,
                expected: "vector",
            }),
        }
    }

    pub(crate) fn boolean(self, state: BodyState) -> Result<bool, BodyError> {
        match self {
            Self::Bool(val) => Ok(val),
            _ => Err(BodyError::StateTypeMismatch {
                state,
                expected: "boolean",
            }),
        }
    }

    /// The transform value, if this is one.
    pub fn as_transform(&self) -> Option<Transform> {
        match self {
            Self::Transform(val) => Some(*val),
            _ => None,
        }
    }

    /// The vector value, if this is one.
    pub fn as_vector(&self) -> Option<Vector<Real>> {
        match self {
            Self::Vector(val) => Some(*val),
            _ => None,
        }
    }

    /// The boolean value, if this is one.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(val) => Some(*val),
            _ => None,
        }
    }
}

impl From<Transform> for BodyStateValue {
    fn from(val: Transform) -> Self {
        Self::Transform(val)
    }
}

impl From<Vector<Real>> for BodyStateValue {
    fn from(val: Vector<Real>) -> Self {
        Self::Vector(val)
    }
}

impl From<bool> for BodyStateValue {
    fn from(val: bool) -> Self {
        Self::Bool(val)
    }
}

/// Errors returned by the parameter and state APIs of a body.
///
/// When an error is returned, the body is left unchanged.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum BodyError {
    /// The mass of a body must be strictly positive.
    #[error("invalid mass {0}: the mass of a body must be strictly positive")]
    InvalidMass(Real),
    /// The value given for a parameter has the wrong type.
    #[error("the parameter {param:?} expects a {expected} value")]
    ParamTypeMismatch {
        /// The parameter being set.
        param: BodyParameter,
        /// The expected kind of value.
        expected: &'static str,
    },
    /// The value given for a state variable has the wrong type.
    #[error("the state {state:?} expects a {expected} value")]
    StateTypeMismatch {
        /// The state variable being set.
        state: BodyState,
        /// The expected kind of value.
        expected: &'static str,
    },
    /// No body matches the given handle.
    #[error("no body found for the handle {0:?}")]
    InvalidHandle(BodyHandle),
    /// No shape matches the given index.
    #[error("the body has no shape at index {0}")]
    InvalidShapeIndex(usize),
}
