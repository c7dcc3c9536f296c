use super::galaxy_material::{ATTRIBUTE_CORNER, ATTRIBUTE_RANDOMNESS, ATTRIBUTE_SCALE};
use crate::prelude::*;
use bevy::{
    prelude::*,
    render::{mesh::Indices, render_asset::RenderAssetUsages, render_resource::PrimitiveTopology},
};

const CORNERS: [[f32; 2]; 4] = [[-1.0, -1.0], [1.0, -1.0], [1.0, 1.0], [-1.0, 1.0]];
const QUAD_INDICES: [u32; 6] = [0, 1, 2, 0, 2, 3];

/// Uploads the generated buffers as one mesh, one camera-facing quad per particle.
/// Every corner of a quad carries the particle's attributes, the vertex shader
/// spreads them apart by the point size.
pub fn galaxy_mesh(buffers: &GalaxyBuffers) -> Mesh {
    let vertex_count = buffers.len() * CORNERS.len();

    let mut positions = Vec::with_capacity(vertex_count);
    let mut colors = Vec::with_capacity(vertex_count);
    let mut scales = Vec::with_capacity(vertex_count);
    let mut randomness = Vec::with_capacity(vertex_count);
    let mut corners = Vec::with_capacity(vertex_count);
    let mut indices = Vec::with_capacity(buffers.len() * QUAD_INDICES.len());

    for i in 0..buffers.len() {
        let first = (i * CORNERS.len()) as u32;
        for corner in CORNERS {
            positions.push(buffers.positions[i].to_array());
            colors.push(buffers.colors[i].extend(1.0).to_array());
            scales.push(buffers.scales[i]);
            randomness.push(buffers.random_offsets[i].to_array());
            corners.push(corner);
        }
        indices.extend(QUAD_INDICES.iter().map(|index| first + index));
    }

    Mesh::new(
        PrimitiveTopology::TriangleList,
        RenderAssetUsages::RENDER_WORLD,
    )
    .with_inserted_attribute(Mesh::ATTRIBUTE_POSITION, positions)
    .with_inserted_attribute(Mesh::ATTRIBUTE_COLOR, colors)
    .with_inserted_attribute(ATTRIBUTE_SCALE, scales)
    .with_inserted_attribute(ATTRIBUTE_RANDOMNESS, randomness)
    .with_inserted_attribute(ATTRIBUTE_CORNER, corners)
    .with_inserted_indices(Indices::U32(indices))
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::render::mesh::VertexAttributeValues;

    fn buffers() -> GalaxyBuffers {
        GalaxyBuffers {
            positions: vec![vec3(1.0, 0.0, 0.0), vec3(-2.0, 0.0, 0.5)],
            colors: vec![vec3(1.0, 0.5, 0.0), vec3(0.0, 0.25, 1.0)],
            scales: vec![0.25, 0.75],
            random_offsets: vec![vec3(0.1, -0.1, 0.0), Vec3::ZERO],
        }
    }

    #[test]
    fn four_vertices_and_two_triangles_per_particle() {
        let mesh = galaxy_mesh(&buffers());
        assert_eq!(mesh.count_vertices(), 8);
        let Some(Indices::U32(indices)) = mesh.indices() else {
            panic!("expected u32 indices");
        };
        assert_eq!(indices, &[0, 1, 2, 0, 2, 3, 4, 5, 6, 4, 6, 7]);
    }

    #[test]
    fn corners_share_the_particle_attributes() {
        let mesh = galaxy_mesh(&buffers());

        let Some(VertexAttributeValues::Float32(scales)) = mesh.attribute(ATTRIBUTE_SCALE) else {
            panic!("missing scale attribute");
        };
        assert_eq!(scales, &[0.25, 0.25, 0.25, 0.25, 0.75, 0.75, 0.75, 0.75]);

        let Some(VertexAttributeValues::Float32x3(offsets)) =
            mesh.attribute(ATTRIBUTE_RANDOMNESS)
        else {
            panic!("missing randomness attribute");
        };
        assert!(offsets[..4].iter().all(|o| *o == [0.1, -0.1, 0.0]));

        let Some(VertexAttributeValues::Float32x4(colors)) = mesh.attribute(Mesh::ATTRIBUTE_COLOR)
        else {
            panic!("missing color attribute");
        };
        assert!(colors[4..].iter().all(|c| *c == [0.0, 0.25, 1.0, 1.0]));
    }

    #[test]
    fn empty_galaxy_gives_empty_mesh() {
        let mesh = galaxy_mesh(&GalaxyBuffers::default());
        assert_eq!(mesh.count_vertices(), 0);
    }
}
