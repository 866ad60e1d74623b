//! Container fitting.
//!
//! A container without explicit geometry is sized to the bounding box of its
//! member components and nested containers, grown by a padding and clipped
//! to the canvas. Nested containers are fitted before their parents.

use log::{debug, trace};

use stratus_core::{
    geometry::{Bounds, Insets},
    identifier::Id,
    model::DiagramModel,
};

use crate::structure::ContainmentTree;

/// Extra room above the members for the container's own label.
const LABEL_HEIGHT: f32 = 20.0;

/// Fit every container lacking geometry around its members.
///
/// Containers with no positioned members keep no geometry; the validator
/// reports them.
pub fn fit_containers(model: &mut DiagramModel, padding: f32) {
    if model.containers().is_empty() {
        return;
    }

    let tree = ContainmentTree::from_model(model);
    let canvas = model.canvas_bounds();
    let insets = Insets::new(padding + LABEL_HEIGHT, padding, padding, padding);
    let mut fitted = 0;

    for id in tree.post_order() {
        let explicit = model
            .containers()
            .iter()
            .filter(|container| container.id() == id)
            .all(|container| container.geometry().is_some());
        if explicit {
            continue;
        }

        let Some(extent) = member_extent(model, id) else {
            trace!(container = id.to_string(); "Container has no positioned members");
            continue;
        };
        let geometry = extent.add_padding(insets).intersect(&canvas);

        for container in model.containers_mut() {
            if container.id() == id && container.geometry().is_none() {
                container.set_geometry(geometry);
            }
        }
        fitted += 1;
    }

    debug!(fitted; "Containers fitted");
}

/// Smallest rectangle holding every positioned member of `container`.
fn member_extent(model: &DiagramModel, container: Id) -> Option<Bounds> {
    let components = model
        .children_of(Some(container))
        .filter_map(|component| component.position());
    let containers = model
        .subcontainers_of(Some(container))
        .filter(|sub| sub.id() != container)
        .filter_map(|sub| sub.geometry());

    components
        .chain(containers)
        .reduce(|extent, bounds| extent.merge(&bounds))
}
