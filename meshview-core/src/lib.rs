/// meshview core library - mesh ingestion and orbit camera logic
///
/// This library provides the backend-independent part of the viewer:
/// OBJ parsing and triangulation, transformation matrices, the orbit camera
/// controller, and the contract a rendering backend implements.

pub mod controller;
pub mod error;
pub mod geometry;
pub mod obj;
pub mod projection;
pub mod render;
pub mod settings;
pub mod transform;
pub mod triangulate;

// Re-export commonly used types
pub use controller::{ControlSignal, ControlState, FrameClock, OrbitController};
pub use error::{FormatError, MeshError};
pub use geometry::{Mesh, MeshBuilder};
pub use obj::{load_obj, parse_obj, MeshParser, ParseOptions};
pub use projection::{project_to_screen, Camera, Projection};
pub use render::{FrameUniforms, Lighting, RenderPipeline};
pub use settings::{CameraSettings, LightingSettings, SettingsError};
pub use transform::{OrbitAngles, Transform};
pub use triangulate::{Corner, FanTriangulator, Triangulator};
