use core::str::FromStr;

use ibc_core_host_types::identifiers::PortId;

use crate::error::InterchainAccountError;

/// The prefix of every controller port identifier. The full port identifier
/// is the prefix followed by the owner.
pub const CONTROLLER_PORT_PREFIX: &str = "icacontroller-";

/// The port identifier that the host chain binds to.
pub const HOST_PORT_ID: &str = "icahost";

/// Returns the controller port identifier bound to the given owner, i.e.
/// `icacontroller-{owner}`.
///
/// The mapping is injective: the owner can always be recovered with
/// [`owner_from_controller_port_id`], so two distinct owners never share a
/// port (and therefore never share an interchain account or channel).
pub fn new_controller_port_id(owner: &str) -> Result<PortId, InterchainAccountError> {
    if owner.is_empty() {
        return Err(InterchainAccountError::EmptyOwner);
    }

    Ok(PortId::from_str(&format!("{CONTROLLER_PORT_PREFIX}{owner}"))?)
}

pub fn verify_controller_port_id_prefix(port_id: &PortId) -> Result<(), InterchainAccountError> {
    if !port_id.as_str().starts_with(CONTROLLER_PORT_PREFIX) {
        return Err(InterchainAccountError::InvalidControllerPortPrefix {
            port_id: port_id.clone(),
            expected_prefix: CONTROLLER_PORT_PREFIX,
        });
    }

    Ok(())
}

/// Recovers the owner a controller port identifier was derived from.
pub fn owner_from_controller_port_id(port_id: &PortId) -> Option<&str> {
    port_id
        .as_str()
        .strip_prefix(CONTROLLER_PORT_PREFIX)
        .filter(|owner| !owner.is_empty())
}

/// Returns an instance of the default host port identifier.
pub fn default_host_port_id() -> PortId {
    PortId::from_str(HOST_PORT_ID).expect("Never fails")
}

pub fn verify_host_port_id(port_id: &PortId) -> Result<(), InterchainAccountError> {
    let expected = default_host_port_id();

    if port_id != &expected {
        return Err(InterchainAccountError::InvalidHostPort {
            expected,
            actual: port_id.clone(),
        });
    }

    Ok(())
}
