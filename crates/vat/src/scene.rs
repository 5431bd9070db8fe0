//! JSON scene dumps and the evaluator that replays them.
//!
//! A scene dump is what the host application writes out after evaluating its
//! deformation stack at every frame. Each vertex carries the stable index the
//! host stamped into its `VertexIndex` UV map, so vertex order inside a frame
//! does not matter.
//!
//! ```json
//! {
//!   "object": { "name": "Cube", "kind": "mesh", "uv_layers": ["UVMap", "VertexIndex"] },
//!   "frame_start": 1,
//!   "frame_end": 24,
//!   "frames": [
//!     { "frame": 0, "vertices": [{ "index": 0, "position": [0, 0, 0], "normal": [0, 0, 1] }] }
//!   ],
//!   "loops": [{ "vertex_index": 0, "tangent": [1, 0, 0], "bitangent_sign": 1 }]
//! }
//! ```

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use glam::Vec3;
use serde::{Deserialize, Serialize};
use tracing::debug;
use vat_encode::{
    FrameEvaluator, FrameSample, LoopTangent, REST_FRAME, SampleError, SampleResult, VertexSample,
};

use crate::error::{Precondition, Result};

/// Name of the UV map holding each vertex's stable index.
pub const VERTEX_INDEX_LAYER: &str = "VertexIndex";

/// The exported object and its animation, one snapshot per frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneDump {
    pub object: ObjectInfo,
    /// First frame of the scene's animation range.
    pub frame_start: i32,
    /// Last frame of the scene's animation range (inclusive).
    pub frame_end: i32,
    pub frames: Vec<DumpFrame>,
    /// Face-corner tangents at the rest frame.
    #[serde(default)]
    pub loops: Vec<DumpLoop>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectInfo {
    pub name: String,
    /// Host object type, e.g. `"mesh"` or `"armature"`.
    pub kind: String,
    #[serde(default)]
    pub uv_layers: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DumpFrame {
    pub frame: i32,
    pub vertices: Vec<DumpVertex>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DumpVertex {
    /// Stable vertex index stamped by the host.
    pub index: usize,
    pub position: Vec3,
    pub normal: Vec3,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DumpLoop {
    pub vertex_index: usize,
    pub tangent: Vec3,
    pub bitangent_sign: f32,
}

impl SceneDump {
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    pub fn from_json_str(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Check that the object can be baked at all.
    pub fn check_preconditions(&self) -> std::result::Result<(), Precondition> {
        if !self.object.kind.eq_ignore_ascii_case("mesh") {
            return Err(Precondition::NotAMesh {
                name: self.object.name.clone(),
                kind: self.object.kind.clone(),
            });
        }
        if !self.object.uv_layers.iter().any(|l| l == VERTEX_INDEX_LAYER) {
            return Err(Precondition::MissingUvLayer {
                name: self.object.name.clone(),
            });
        }
        Ok(())
    }

    /// Evaluator replaying this dump's frames.
    #[must_use]
    pub fn evaluator(&self) -> DumpEvaluator<'_> {
        DumpEvaluator::new(self)
    }
}

/// [`FrameEvaluator`] over a [`SceneDump`].
///
/// Tracks a current frame the way a host's animation cursor would.
pub struct DumpEvaluator<'a> {
    frames: HashMap<i32, &'a DumpFrame>,
    loops: &'a [DumpLoop],
    current_frame: i32,
}

impl<'a> DumpEvaluator<'a> {
    #[must_use]
    pub fn new(scene: &'a SceneDump) -> Self {
        Self {
            frames: scene.frames.iter().map(|f| (f.frame, f)).collect(),
            loops: &scene.loops,
            current_frame: REST_FRAME,
        }
    }

    /// Frame the evaluator was last moved to.
    #[must_use]
    pub fn current_frame(&self) -> i32 {
        self.current_frame
    }
}

impl FrameEvaluator for DumpEvaluator<'_> {
    fn sample_at(&mut self, frame: i32) -> SampleResult<FrameSample> {
        let dump = self.frames.get(&frame).ok_or_else(|| SampleError::Host {
            frame,
            message: "frame is not in the scene dump".to_owned(),
        })?;
        self.current_frame = frame;

        let count = dump.vertices.len();
        let mut slots: Vec<Option<VertexSample>> = vec![None; count];
        for vertex in &dump.vertices {
            let slot = slots
                .get_mut(vertex.index)
                .filter(|slot| slot.is_none())
                .ok_or_else(|| SampleError::Host {
                    frame,
                    message: format!(
                        "vertex index {} is duplicated or outside 0..{count}",
                        vertex.index
                    ),
                })?;
            *slot = Some(VertexSample {
                position: vertex.position,
                normal: vertex.normal,
            });
        }

        // Every index is unique and below `count`, so every slot is filled.
        let vertices = slots.into_iter().flatten().collect();
        debug!(frame, vertices = count, "evaluated scene dump frame");
        Ok(FrameSample::new(frame, vertices))
    }

    fn loop_tangents(&mut self) -> SampleResult<Vec<LoopTangent>> {
        Ok(self
            .loops
            .iter()
            .map(|l| LoopTangent {
                vertex_index: l.vertex_index,
                tangent: l.tangent,
                bitangent_sign: l.bitangent_sign,
            })
            .collect())
    }

    fn restore(&mut self, frame: i32) -> SampleResult<()> {
        self.current_frame = frame;
        Ok(())
    }
}
