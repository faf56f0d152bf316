use crate::camera::PerspectiveCamera;
use crate::scene::Scene;
use prism_common::Transform;

/// Everything one frame draws, borrowed from the scene set and the kernel.
#[derive(Debug, Clone, Copy)]
pub struct FrameView<'a> {
    pub scene: &'a Scene,
    pub camera: &'a PerspectiveCamera,
    /// Placement of the scene's target object, if it has one.
    pub object: &'a Transform,
    pub opacity: f32,
}

/// Renderer-agnostic interface.
///
/// A renderer reads a frame view and produces output. It never mutates
/// animation state.
pub trait Renderer {
    /// The output type produced by this renderer.
    type Output;

    fn render(&self, frame: &FrameView<'_>) -> Self::Output;
}

/// Plain-text renderer for the CLI, logs and tests.
#[derive(Debug, Default)]
pub struct DebugTextRenderer;

impl DebugTextRenderer {
    pub fn new() -> Self {
        Self
    }
}

impl Renderer for DebugTextRenderer {
    type Output = String;

    fn render(&self, frame: &FrameView<'_>) -> String {
        let scene = frame.scene;
        let rig = &frame.camera.rig;
        let mut out = String::new();
        out.push_str(&format!(
            "=== Scene '{}' [{}] opacity={:.2} ===\n",
            scene.name,
            scene.id.short(),
            frame.opacity
        ));
        out.push_str(&format!("Lights: {}\n", scene.lights.len()));
        out.push_str(&format!(
            "Camera: eye=({:.2}, {:.2}, {:.2}) target=({:.2}, {:.2}, {:.2}) fov={:.0}\n",
            rig.eye.x,
            rig.eye.y,
            rig.eye.z,
            rig.target.x,
            rig.target.y,
            rig.target.z,
            frame.camera.projection.fov_y.to_degrees()
        ));

        if scene.target.is_some() {
            let t = frame.object;
            let (yaw, pitch, roll) = t.rotation.to_euler(glam::EulerRot::YXZ);
            out.push_str(&format!(
                "  object pos=({:.2}, {:.2}, {:.2}) scale={:.3} rot=(y {:.2}, x {:.2}, z {:.2})\n",
                t.position.x, t.position.y, t.position.z, t.scale.x, yaw, pitch, roll
            ));
        }

        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::Projection;
    use glam::Vec3;
    use prism_common::CameraRig;

    fn camera() -> PerspectiveCamera {
        PerspectiveCamera::new(CameraRig::default(), Projection::default())
    }

    #[test]
    fn renders_object_in_crystal_room() {
        let scene = Scene::crystal_room();
        let cam = camera();
        let object = Transform {
            scale: Vec3::splat(1.25),
            ..Transform::default()
        };
        let output = DebugTextRenderer::new().render(&FrameView {
            scene: &scene,
            camera: &cam,
            object: &object,
            opacity: 1.0,
        });
        assert!(output.contains("'crystal'"));
        assert!(output.contains("opacity=1.00"));
        assert!(output.contains("scale=1.250"));
        assert!(output.contains("Lights: 3"));
        assert!(output.contains("fov=75"));
    }

    #[test]
    fn empty_room_has_no_object_line() {
        let scene = Scene::empty_room();
        let cam = camera();
        let output = DebugTextRenderer::new().render(&FrameView {
            scene: &scene,
            camera: &cam,
            object: &Transform::default(),
            opacity: 0.5,
        });
        assert!(output.contains("opacity=0.50"));
        assert!(!output.contains("object"));
    }
}
