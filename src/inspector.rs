//! Debug inspector bindings.
//!
//! The inspector panel is the optional debug-UI collaborator: it exposes
//! named numeric properties of the scene (classically a light's intensity)
//! as sliders with a range and step. Each binding is a setter closure over
//! the scene graph; the panel is purely observational and never required for
//! correctness.

use crate::data_structures::scene_graph::{NodeId, NodeKind, SceneGraph};

type Setter = Box<dyn FnMut(&mut SceneGraph, f32)>;

struct Slider {
    name: String,
    min: f32,
    max: f32,
    step: f32,
    apply: Setter,
}

#[derive(Default)]
pub struct InspectorPanel {
    sliders: Vec<Slider>,
}

impl InspectorPanel {
    pub fn new() -> Self {
        Self {
            sliders: Vec::new(),
        }
    }

    /// Register a slider binding `name` to a setter closure.
    pub fn add_slider(
        &mut self,
        name: &str,
        min: f32,
        max: f32,
        step: f32,
        apply: impl FnMut(&mut SceneGraph, f32) + 'static,
    ) {
        self.sliders.push(Slider {
            name: name.to_string(),
            min,
            max,
            step,
            apply: Box::new(apply),
        });
    }

    /// Bind a light node's intensity with the conventional range `[0, 1]`
    /// and step `0.001`.
    pub fn bind_light_intensity(&mut self, name: &str, node: NodeId) {
        self.add_slider(name, 0.0, 1.0, 0.001, move |scene, value| {
            match scene.node_mut(node).kind_mut() {
                NodeKind::Light(light) => light.intensity = value,
                other => log::warn!(
                    "inspector binding {node:?} is not a light (found {other:?})"
                ),
            }
        });
    }

    /// Apply a user interaction: snap `value` to the slider's step, clamp it
    /// to the declared range and invoke the setter.
    ///
    /// Returns false (and logs) for unknown property names.
    pub fn set(&mut self, scene: &mut SceneGraph, name: &str, value: f32) -> bool {
        let Some(slider) = self.sliders.iter_mut().find(|s| s.name == name) else {
            log::warn!("inspector has no property named {name:?}");
            return false;
        };
        let snapped = if slider.step > 0.0 {
            slider.min + ((value - slider.min) / slider.step).round() * slider.step
        } else {
            value
        };
        let clamped = snapped.clamp(slider.min, slider.max);
        (slider.apply)(scene, clamped);
        true
    }

    /// Declared properties, in registration order.
    pub fn properties(&self) -> impl Iterator<Item = &str> {
        self.sliders.iter().map(|s| s.name.as_str())
    }
}
