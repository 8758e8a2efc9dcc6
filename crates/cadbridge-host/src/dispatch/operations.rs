//! Handlers for the standard operations.

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use cadbridge_protocol::operations as ops;
use cadbridge_protocol::{
    CreateBeamArgs, ElementIdArgs, NoArgs, Success, VersionInfo, decode_args,
};

use crate::host::{HostError, HostModel};

use super::errors::{DispatchError, RegistrationError};
use super::table::{DispatchTableBuilder, PreparedCall};

/// Name reported by `get_model_name` before the model has been saved.
pub const UNSAVED_MODEL_NAME: &str = "(unsaved model)";

pub(super) fn register_standard(
    builder: DispatchTableBuilder,
) -> Result<DispatchTableBuilder, RegistrationError> {
    builder
        .register(ops::PING, ping)?
        .register(ops::GET_VERSION_INFO, get_version_info)?
        .register(ops::GET_MODEL_NAME, get_model_name)?
        .register(ops::CREATE_BEAM, create_beam)?
        .register(ops::GET_ELEMENT_INFO, get_element_info)?
        .register(ops::GET_ACTIVE_SELECTION_IDS, get_active_selection_ids)?
        .register(ops::GET_STANDARD_ATTRIBUTES, get_standard_attributes)?
        .register(ops::GET_USER_ATTRIBUTES, get_user_attributes)?
        .register(
            ops::LIST_DEFINED_USER_ATTRIBUTE_NAMES,
            list_defined_user_attribute_names,
        )
}

fn ping(args: &Map<String, Value>) -> Result<PreparedCall, DispatchError> {
    let NoArgs {} = decode(ops::PING, args)?;
    Ok(prepared(|_| Ok(Success::new().with_name("pong"))))
}

fn get_version_info(args: &Map<String, Value>) -> Result<PreparedCall, DispatchError> {
    let NoArgs {} = decode(ops::GET_VERSION_INFO, args)?;
    Ok(prepared(|model| {
        let info = VersionInfo::current(model.host_version());
        Ok(Success::new().with_data(encode(&info)?))
    }))
}

fn get_model_name(args: &Map<String, Value>) -> Result<PreparedCall, DispatchError> {
    let NoArgs {} = decode(ops::GET_MODEL_NAME, args)?;
    Ok(prepared(|model| {
        let name = model
            .model_name()
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| UNSAVED_MODEL_NAME.to_owned());
        Ok(Success::new().with_name(name))
    }))
}

fn create_beam(args: &Map<String, Value>) -> Result<PreparedCall, DispatchError> {
    let beam: CreateBeamArgs = decode(ops::CREATE_BEAM, args)?;
    beam.validate()
        .map_err(|error| DispatchError::invalid_arguments(ops::CREATE_BEAM, error.to_string()))?;
    Ok(prepared(move |model| {
        let id = model.create_rectangular_beam(&beam)?;
        let info = model.element_info(id)?;
        Ok(Success::new().with_id(id).with_name(info.name))
    }))
}

fn get_element_info(args: &Map<String, Value>) -> Result<PreparedCall, DispatchError> {
    let ElementIdArgs { element_id } = decode(ops::GET_ELEMENT_INFO, args)?;
    Ok(prepared(move |model| {
        let info = model.element_info(element_id)?;
        let data = encode(&info)?;
        Ok(Success::new()
            .with_id(info.id)
            .with_name(info.name)
            .with_data(data))
    }))
}

fn get_active_selection_ids(args: &Map<String, Value>) -> Result<PreparedCall, DispatchError> {
    let NoArgs {} = decode(ops::GET_ACTIVE_SELECTION_IDS, args)?;
    Ok(prepared(|model| {
        Ok(Success::new().with_data(encode(&model.active_selection())?))
    }))
}

fn get_standard_attributes(args: &Map<String, Value>) -> Result<PreparedCall, DispatchError> {
    let ElementIdArgs { element_id } = decode(ops::GET_STANDARD_ATTRIBUTES, args)?;
    Ok(prepared(move |model| {
        let attributes = model.standard_attributes(element_id)?;
        let data = encode(&attributes)?;
        Ok(Success::new()
            .with_id(element_id)
            .with_name(attributes.name)
            .with_data(data))
    }))
}

fn get_user_attributes(args: &Map<String, Value>) -> Result<PreparedCall, DispatchError> {
    let ElementIdArgs { element_id } = decode(ops::GET_USER_ATTRIBUTES, args)?;
    Ok(prepared(move |model| {
        let attributes = model.user_attributes(element_id)?;
        Ok(Success::new()
            .with_id(element_id)
            .with_data(encode(&attributes)?))
    }))
}

fn list_defined_user_attribute_names(
    args: &Map<String, Value>,
) -> Result<PreparedCall, DispatchError> {
    let NoArgs {} = decode(ops::LIST_DEFINED_USER_ATTRIBUTE_NAMES, args)?;
    Ok(prepared(|model| {
        Ok(Success::new().with_data(encode(&model.user_attribute_names())?))
    }))
}

fn prepared<F>(call: F) -> PreparedCall
where
    F: FnOnce(&mut dyn HostModel) -> Result<Success, HostError> + Send + 'static,
{
    Box::new(call)
}

fn decode<A: DeserializeOwned>(
    operation: &'static str,
    args: &Map<String, Value>,
) -> Result<A, DispatchError> {
    decode_args(args).map_err(|error| DispatchError::invalid_arguments(operation, error.to_string()))
}

fn encode<T: Serialize>(value: &T) -> Result<Value, HostError> {
    serde_json::to_value(value)
        .map_err(|error| HostError::api(format!("failed to encode host data: {error}")))
}
