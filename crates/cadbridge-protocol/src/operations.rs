//! Operation names understood by the standard dispatch table.

/// Liveness check; answers without touching the host model.
pub const PING: &str = "ping";
/// Reports the host and bridge versions.
pub const GET_VERSION_INFO: &str = "get_version_info";
/// Reports the name of the open model.
pub const GET_MODEL_NAME: &str = "get_model_name";
/// Creates a rectangular beam from points and dimensions.
pub const CREATE_BEAM: &str = "create_beam";
/// Reads identity, geometry, and dimensions of one element.
pub const GET_ELEMENT_INFO: &str = "get_element_info";
/// Lists the ids of the currently selected elements.
pub const GET_ACTIVE_SELECTION_IDS: &str = "get_active_selection_ids";
/// Reads the standard attributes of one element.
pub const GET_STANDARD_ATTRIBUTES: &str = "get_standard_attributes";
/// Reads the user attributes set on one element.
pub const GET_USER_ATTRIBUTES: &str = "get_user_attributes";
/// Lists user attribute slots that have a name defined.
pub const LIST_DEFINED_USER_ATTRIBUTE_NAMES: &str = "list_defined_user_attribute_names";

/// Every operation in registration order.
pub const ALL: &[&str] = &[
    PING,
    GET_VERSION_INFO,
    GET_MODEL_NAME,
    CREATE_BEAM,
    GET_ELEMENT_INFO,
    GET_ACTIVE_SELECTION_IDS,
    GET_STANDARD_ATTRIBUTES,
    GET_USER_ATTRIBUTES,
    LIST_DEFINED_USER_ATTRIBUTE_NAMES,
];
