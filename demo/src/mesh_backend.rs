use bevy::{
    asset::RenderAssetUsages,
    prelude::*,
    render::{
        mesh::{Indices, PrimitiveTopology},
        view::NoFrustumCulling,
    },
};
use soft_body::{COMPONENT_COUNT, MeshBackend, MeshLayout, mesher::fan_to_list};

/// The bevy side of one soft body.
#[derive(Debug, Clone)]
pub struct BodyMesh {
    pub handle: Handle<Mesh>,
    pub entity: Entity,
}

/// Retained mode backend: each soft body becomes one `Mesh2d` entity whose
/// attributes are rewritten every frame.
pub struct BevyMeshBackend<'a, 'w, 's> {
    pub commands: &'a mut Commands<'w, 's>,
    pub meshes: &'a mut Assets<Mesh>,
    pub material: Handle<ColorMaterial>,
}

/// wgpu has no fan primitive, fans are drawn as lists.
fn bevy_topology(topology: soft_body::PrimitiveTopology) -> PrimitiveTopology {
    match topology {
        soft_body::PrimitiveTopology::TriangleStrip => PrimitiveTopology::TriangleStrip,
        soft_body::PrimitiveTopology::TriangleList | soft_body::PrimitiveTopology::TriangleFan => {
            PrimitiveTopology::TriangleList
        }
    }
}

fn bevy_indices(layout: &MeshLayout, indices: &[u32]) -> Vec<u32> {
    match layout.topology {
        soft_body::PrimitiveTopology::TriangleFan => fan_to_list(layout.vertex_capacity),
        _ => indices.to_vec(),
    }
}

impl BevyMeshBackend<'_, '_, '_> {
    pub fn release(&mut self, mesh: BodyMesh) {
        self.commands.entity(mesh.entity).despawn();
        self.meshes.remove(&mesh.handle);
    }
}

impl MeshBackend for BevyMeshBackend<'_, '_, '_> {
    type Mesh = BodyMesh;

    fn create_mesh(&mut self, layout: &MeshLayout, indices: &[u32]) -> BodyMesh {
        let mesh = Mesh::new(
            bevy_topology(layout.topology),
            RenderAssetUsages::MAIN_WORLD | RenderAssetUsages::RENDER_WORLD,
        )
        .with_inserted_attribute(Mesh::ATTRIBUTE_POSITION, vec![[0f32; 3]; layout.vertex_capacity])
        .with_inserted_attribute(Mesh::ATTRIBUTE_UV_0, vec![[0f32; 2]; layout.vertex_capacity])
        .with_inserted_indices(Indices::U32(bevy_indices(layout, indices)));
        let handle = self.meshes.add(mesh);
        let entity = self
            .commands
            .spawn((
                Mesh2d(handle.clone()),
                MeshMaterial2d(self.material.clone()),
                Transform::default(),
                // Bounds are computed once from the placeholder vertices
                NoFrustumCulling,
            ))
            .id();
        BodyMesh { handle, entity }
    }

    fn upload_vertices(&mut self, mesh: &mut BodyMesh, vertices: &[f32]) {
        let Some(bevy_mesh) = self.meshes.get_mut(&mesh.handle) else {
            return;
        };
        let (positions, uvs): (Vec<[f32; 3]>, Vec<[f32; 2]>) = vertices
            .chunks_exact(COMPONENT_COUNT)
            .map(|vertex| ([vertex[0], vertex[1], vertex[2]], [vertex[3], vertex[4]]))
            .unzip();
        bevy_mesh.insert_attribute(Mesh::ATTRIBUTE_POSITION, positions);
        bevy_mesh.insert_attribute(Mesh::ATTRIBUTE_UV_0, uvs);
    }

    fn draw(&mut self, _mesh: &BodyMesh, _topology: soft_body::PrimitiveTopology) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use soft_body::soft_body::VERTEX_ATTRIBUTES;

    #[test]
    fn fans_become_lists() {
        let layout = MeshLayout {
            vertex_capacity: 6,
            index_capacity: 0,
            topology: soft_body::PrimitiveTopology::TriangleFan,
            attributes: &VERTEX_ATTRIBUTES,
        };
        assert_eq!(bevy_topology(layout.topology), PrimitiveTopology::TriangleList);
        assert_eq!(bevy_indices(&layout, &[]), vec![0, 1, 2, 0, 2, 3, 0, 3, 4, 0, 4, 5]);
    }

    #[test]
    fn strips_keep_their_indices() {
        let layout = MeshLayout {
            vertex_capacity: 4,
            index_capacity: 4,
            topology: soft_body::PrimitiveTopology::TriangleStrip,
            attributes: &VERTEX_ATTRIBUTES,
        };
        assert_eq!(bevy_topology(layout.topology), PrimitiveTopology::TriangleStrip);
        assert_eq!(bevy_indices(&layout, &[0, 2, 1, 3]), vec![0, 2, 1, 3]);
    }
}
