use bevy::pbr::{MaterialPipeline, MaterialPipelineKey};
use bevy::{
    prelude::*,
    reflect::TypePath,
    render::{
        mesh::{MeshVertexAttribute, MeshVertexBufferLayoutRef},
        render_resource::{
            AsBindGroup, BlendComponent, BlendFactor, BlendOperation, BlendState,
            RenderPipelineDescriptor, ShaderRef, ShaderType, SpecializedMeshPipelineError,
            VertexFormat,
        },
    },
};
use bytemuck::{Pod, Zeroable};

const SHADER_ASSET_PATH: &str = "shaders/galaxy_points.wgsl";

/// Per-particle point size multiplier
pub const ATTRIBUTE_SCALE: MeshVertexAttribute =
    MeshVertexAttribute::new("Vertex_Scale", 988_540_917, VertexFormat::Float32);
/// Per-particle jitter, added after the spin rotation
pub const ATTRIBUTE_RANDOMNESS: MeshVertexAttribute =
    MeshVertexAttribute::new("Vertex_Randomness", 988_540_918, VertexFormat::Float32x3);
/// Quad corner in [-1, 1], expanded to the point size in the vertex shader
pub const ATTRIBUTE_CORNER: MeshVertexAttribute =
    MeshVertexAttribute::new("Vertex_Corner", 988_540_919, VertexFormat::Float32x2);

// Duplicated in galaxy_points.wgsl, so make sure to update both
#[derive(ShaderType, Pod, Zeroable, Clone, Copy, Debug, Default, PartialEq)]
#[repr(C)]
pub struct GalaxyUniforms {
    /// Base point size in physical pixels
    pub size: f32,
    /// Seconds since startup
    pub time: f32,
    pub spin: f32,
    pad: f32,
}

impl GalaxyUniforms {
    pub fn new(size: f32, spin: f32, time: f32) -> Self {
        Self {
            size,
            time,
            spin,
            ..default()
        }
    }
}

#[derive(Asset, TypePath, AsBindGroup, Debug, Clone)]
pub struct GalaxyMaterial {
    #[uniform(0)]
    pub uniforms: GalaxyUniforms,
    pub alpha_mode: AlphaMode,
}

impl GalaxyMaterial {
    /// `time` is the current elapsed time, so the first frame doesn't snap back to the initial pose
    pub fn new(size: f32, spin: f32, time: f32) -> Self {
        Self {
            uniforms: GalaxyUniforms::new(size, spin, time),
            alpha_mode: AlphaMode::Add,
        }
    }
}

/// Overlapping particles brighten rather than occlude
const ADDITIVE: BlendState = BlendState {
    color: BlendComponent {
        src_factor: BlendFactor::One,
        dst_factor: BlendFactor::One,
        operation: BlendOperation::Add,
    },
    alpha: BlendComponent {
        src_factor: BlendFactor::One,
        dst_factor: BlendFactor::One,
        operation: BlendOperation::Add,
    },
};

impl Material for GalaxyMaterial {
    fn vertex_shader() -> ShaderRef {
        SHADER_ASSET_PATH.into()
    }

    fn fragment_shader() -> ShaderRef {
        SHADER_ASSET_PATH.into()
    }

    fn alpha_mode(&self) -> AlphaMode {
        self.alpha_mode
    }

    fn specialize(
        _pipeline: &MaterialPipeline<Self>,
        descriptor: &mut RenderPipelineDescriptor,
        layout: &MeshVertexBufferLayoutRef,
        _key: MaterialPipelineKey<Self>,
    ) -> Result<(), SpecializedMeshPipelineError> {
        let vertex_layout = layout.0.get_layout(&[
            Mesh::ATTRIBUTE_POSITION.at_shader_location(0),
            Mesh::ATTRIBUTE_COLOR.at_shader_location(1),
            ATTRIBUTE_SCALE.at_shader_location(2),
            ATTRIBUTE_RANDOMNESS.at_shader_location(3),
            ATTRIBUTE_CORNER.at_shader_location(4),
        ])?;
        descriptor.vertex.buffers = vec![vertex_layout];

        if let Some(depth_stencil) = descriptor.depth_stencil.as_mut() {
            depth_stencil.depth_write_enabled = false;
        }
        if let Some(fragment) = descriptor.fragment.as_mut() {
            for target in fragment.targets.iter_mut().flatten() {
                target.blend = Some(ADDITIVE);
            }
        }
        Ok(())
    }
}
