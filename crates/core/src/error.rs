//! Core error type.
//!
//! Contract violations (illegal transitions, binding misuse, publishing while
//! not ready) get their own variants so calling code — and tests — can match
//! on the exact failure. Domain codec errors and broker conditions are wrapped
//! via `#[from]`.

use homielink_domain::error::{ValidationError, ValueError};
use homielink_domain::id::Identifier;

use crate::device::DeviceState;
use crate::ports::BrokerError;

/// Errors produced by the device tree and lifecycle.
#[derive(Debug, thiserror::Error)]
pub enum HomieError {
    /// A construction-time contract violation from the value model.
    #[error("validation error")]
    Validation(#[from] ValidationError),

    /// A value or payload outside a codec's domain.
    #[error("value codec error")]
    Value(#[from] ValueError),

    /// A condition reported by the broker connection.
    #[error("broker error")]
    Broker(#[from] BrokerError),

    /// A lifecycle operation called from a state that does not allow it.
    #[error("{operation}() is illegal in state {state:?}")]
    IllegalTransition {
        operation: &'static str,
        state: Option<DeviceState>,
    },

    /// A value publish attempted while the device is not `ready`.
    #[error("device must be ready to publish values, current state is {state:?}")]
    NotReady { state: Option<DeviceState> },

    /// `init` was called on a device that already holds a broker connection.
    #[error("device was already initialised")]
    AlreadyInitialised,

    /// A publish was requested before `init` supplied a broker connection.
    #[error("device has not been initialised")]
    NotInitialised,

    /// An entity instance was attached to a second parent.
    #[error("{kind} {id} is already bound")]
    AlreadyBound {
        kind: &'static str,
        id: Identifier,
    },

    /// An entity is missing its topic binding.
    #[error("{kind} {id} is not bound into a device tree")]
    Unbound {
        kind: &'static str,
        id: Identifier,
    },

    /// Two sibling entities share an id.
    #[error("duplicate {kind} id {id}")]
    DuplicateId {
        kind: &'static str,
        id: Identifier,
    },

    /// A listener was registered on a property without the settable
    /// capability.
    #[error("property {0} is not settable")]
    NotSettable(Identifier),

    /// The current value of a property without the retained capability was
    /// queried.
    #[error("property {0} is not retained")]
    NotRetained(Identifier),

    /// A value publish addressed a property bound to a different device.
    #[error("property {0} does not belong to this device")]
    ForeignProperty(Identifier),

    /// An initial value was supplied for a property without the retained
    /// capability.
    #[error("property {0} is not retained and cannot hold an initial value")]
    InitialValueWithoutRetained(Identifier),

    /// The at-most-once initial value was supplied twice.
    #[error("initial value for property {0} was supplied twice")]
    InitialValueSetTwice(Identifier),

    /// A node or property extension requires a device extension that is not
    /// attached.
    #[error("{holder} requires device extension {required}, which is not attached to the device")]
    MissingRequiredExtension {
        holder: Identifier,
        required: String,
    },
}
