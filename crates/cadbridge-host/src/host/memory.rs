//! Deterministic in-memory host used by the standalone binary and tests.

use std::collections::BTreeMap;

use cadbridge_protocol::{CreateBeamArgs, MIN_HOST_VERSION, Point3};

use super::errors::HostError;
use super::model::{ElementInfo, ElementKind, HostModel, StandardAttributes};

/// Tolerance below which lengths and areas count as zero.
const GEOMETRY_EPSILON: f64 = 1e-9;

#[derive(Debug, Clone)]
struct StoredElement {
    info: ElementInfo,
    attributes: StandardAttributes,
    user_attributes: BTreeMap<u32, String>,
}

/// A host model kept entirely in memory.
///
/// Element identifiers are allocated from 1 upwards and never reused.
#[derive(Debug, Clone)]
pub struct InMemoryModel {
    host_version: u32,
    model_name: Option<String>,
    next_id: i64,
    elements: BTreeMap<i64, StoredElement>,
    selection: Vec<i64>,
    user_attribute_names: BTreeMap<u32, String>,
}

impl Default for InMemoryModel {
    fn default() -> Self {
        Self::new(MIN_HOST_VERSION)
    }
}

impl InMemoryModel {
    /// Creates an empty, unsaved model reporting `host_version`.
    #[must_use]
    pub fn new(host_version: u32) -> Self {
        Self {
            host_version,
            model_name: None,
            next_id: 1,
            elements: BTreeMap::new(),
            selection: Vec::new(),
            user_attribute_names: BTreeMap::new(),
        }
    }

    /// Sets the file name reported by `model_name`.
    #[must_use]
    pub fn with_model_name(mut self, name: impl Into<String>) -> Self {
        self.model_name = Some(name.into());
        self
    }

    /// Number of elements in the model.
    #[must_use]
    pub fn element_count(&self) -> usize {
        self.elements.len()
    }

    /// Replaces the active selection.
    ///
    /// # Errors
    ///
    /// Returns `HostError::ElementNotFound` for the first unknown id; the
    /// selection is left unchanged in that case.
    pub fn select(&mut self, ids: impl IntoIterator<Item = i64>) -> Result<(), HostError> {
        let ids: Vec<i64> = ids.into_iter().collect();
        if let Some(missing) = ids.iter().find(|id| !self.elements.contains_key(*id)) {
            return Err(HostError::ElementNotFound { id: *missing });
        }
        self.selection = ids;
        Ok(())
    }

    /// Names user attribute slot `slot`.
    pub fn define_user_attribute(&mut self, slot: u32, name: impl Into<String>) {
        self.user_attribute_names.insert(slot, name.into());
    }

    /// Stores a user attribute value on an element.
    ///
    /// # Errors
    ///
    /// Returns `HostError::ElementNotFound` when `id` is unknown.
    pub fn set_user_attribute(
        &mut self,
        id: i64,
        slot: u32,
        value: impl Into<String>,
    ) -> Result<(), HostError> {
        self.stored_mut(id)?
            .user_attributes
            .insert(slot, value.into());
        Ok(())
    }

    /// Replaces the standard attributes of an element.
    ///
    /// # Errors
    ///
    /// Returns `HostError::ElementNotFound` when `id` is unknown.
    pub fn set_standard_attributes(
        &mut self,
        id: i64,
        attributes: StandardAttributes,
    ) -> Result<(), HostError> {
        let stored = self.stored_mut(id)?;
        stored.info.name.clone_from(&attributes.name);
        stored.attributes = attributes;
        Ok(())
    }

    fn stored(&self, id: i64) -> Result<&StoredElement, HostError> {
        self.elements
            .get(&id)
            .ok_or(HostError::ElementNotFound { id })
    }

    fn stored_mut(&mut self, id: i64) -> Result<&mut StoredElement, HostError> {
        self.elements
            .get_mut(&id)
            .ok_or(HostError::ElementNotFound { id })
    }
}

impl HostModel for InMemoryModel {
    fn host_version(&self) -> u32 {
        self.host_version
    }

    fn model_name(&self) -> Option<String> {
        self.model_name.clone()
    }

    fn create_rectangular_beam(&mut self, args: &CreateBeamArgs) -> Result<i64, HostError> {
        let p3 = args.orientation();
        check_beam_geometry(args.p1, args.p2, p3)?;

        let id = self.next_id;
        self.next_id += 1;
        let name = args.name.clone().unwrap_or_else(|| format!("Beam {id}"));
        let info = ElementInfo {
            id,
            name: name.clone(),
            kind: ElementKind::Beam,
            p1: args.p1,
            p2: args.p2,
            p3,
            width: args.width,
            height: args.height,
            length: args.p1.distance(args.p2),
        };
        let attributes = StandardAttributes {
            name,
            ..StandardAttributes::default()
        };
        self.elements.insert(
            id,
            StoredElement {
                info,
                attributes,
                user_attributes: BTreeMap::new(),
            },
        );
        Ok(id)
    }

    fn element_info(&self, id: i64) -> Result<ElementInfo, HostError> {
        self.stored(id).map(|stored| stored.info.clone())
    }

    fn active_selection(&self) -> Vec<i64> {
        self.selection.clone()
    }

    fn standard_attributes(&self, id: i64) -> Result<StandardAttributes, HostError> {
        self.stored(id).map(|stored| stored.attributes.clone())
    }

    fn user_attributes(&self, id: i64) -> Result<BTreeMap<u32, String>, HostError> {
        self.stored(id).map(|stored| stored.user_attributes.clone())
    }

    fn user_attribute_names(&self) -> BTreeMap<u32, String> {
        self.user_attribute_names.clone()
    }
}

fn check_beam_geometry(p1: Point3, p2: Point3, p3: Point3) -> Result<(), HostError> {
    if p1.distance(p2) <= GEOMETRY_EPSILON {
        return Err(HostError::invalid_geometry("beam axis has zero length"));
    }
    let axis = [p2.x - p1.x, p2.y - p1.y, p2.z - p1.z];
    let up = [p3.x - p1.x, p3.y - p1.y, p3.z - p1.z];
    let cross = Point3::new(
        axis[1] * up[2] - axis[2] * up[1],
        axis[2] * up[0] - axis[0] * up[2],
        axis[0] * up[1] - axis[1] * up[0],
    );
    if cross.distance(Point3::new(0.0, 0.0, 0.0)) <= GEOMETRY_EPSILON {
        return Err(HostError::invalid_geometry(
            "orientation point lies on the beam axis",
        ));
    }
    Ok(())
}
