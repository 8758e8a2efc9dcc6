//! The host API as seen by dispatch handlers.

use std::collections::BTreeMap;

use serde::Serialize;

use cadbridge_protocol::{CreateBeamArgs, Point3};

use super::errors::HostError;

/// Element categories the bridge can report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ElementKind {
    /// Rectangular timber beam.
    Beam,
}

/// Identity and geometry of one element.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ElementInfo {
    /// Element identifier.
    pub id: i64,
    /// Element name.
    pub name: String,
    /// Element category.
    pub kind: ElementKind,
    /// Start of the element axis.
    pub p1: Point3,
    /// End of the element axis.
    pub p2: Point3,
    /// Orientation point.
    pub p3: Point3,
    /// Cross-section width.
    pub width: f64,
    /// Cross-section height.
    pub height: f64,
    /// Axis length.
    pub length: f64,
}

/// Standard (non user-defined) attributes of an element.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StandardAttributes {
    /// Element name.
    pub name: String,
    /// Group label.
    pub group: String,
    /// Subgroup label.
    pub subgroup: String,
    /// Free-text comment.
    pub comment: String,
    /// Material name.
    pub material: String,
}

/// Operations the host application exposes to the bridge.
///
/// Implementations are only ever called from the host-safe context and need
/// not be `Send`.
pub trait HostModel {
    /// Major API level of the host application.
    fn host_version(&self) -> u32;

    /// File name of the open model, if it has been saved.
    fn model_name(&self) -> Option<String>;

    /// Creates a rectangular beam and returns its identifier.
    fn create_rectangular_beam(&mut self, args: &CreateBeamArgs) -> Result<i64, HostError>;

    /// Reads identity and geometry of an element.
    fn element_info(&self, id: i64) -> Result<ElementInfo, HostError>;

    /// Identifiers of the currently selected elements, in selection order.
    fn active_selection(&self) -> Vec<i64>;

    /// Standard attributes of an element.
    fn standard_attributes(&self, id: i64) -> Result<StandardAttributes, HostError>;

    /// User attribute values set on an element, keyed by slot number.
    fn user_attributes(&self, id: i64) -> Result<BTreeMap<u32, String>, HostError>;

    /// Names of user attribute slots that have been defined, keyed by slot.
    fn user_attribute_names(&self) -> BTreeMap<u32, String>;
}
