//! Lane geometry: the scoring-hole table, the hole-cut board plate, and the
//! static colliders that bound the play surface.
//!
//! The board plate mesh and its trimesh collider are generated from the same
//! vertex/index buffers, and both are derived from [`SCORING_HOLES`] — the
//! visual cut-outs and the logical scoring zones share one source of truth
//! and cannot drift apart.
//!
//! ## Layout (world units, lane origin at `(0,0,0)`)
//!
//! ```text
//!   z=0 ─ staging floor ─ z=1 ─ ramp ─ board plate (tilted 8°) ─ z=7 back wall
//!                                      holes at z = 5.0 / 5.5 / 6.0 / 6.5
//! ```

use crate::config::GameConfig;
use crate::constants::{
    BOARD_CENTER_Y_OFFSET, BOARD_CENTER_Z, BOARD_HALF_LENGTH, BOARD_HALF_WIDTH, HOLE_RADIUS,
    LANE_RISE,
};
use crate::error::GameError;
use bevy::prelude::*;
use bevy_asset::RenderAssetUsages;
use bevy_mesh::{Indices, PrimitiveTopology};
use bevy_rapier3d::prelude::*;

// ── Scoring holes ─────────────────────────────────────────────────────────────

/// One scoring hole: point value, centre (lane-local world coordinates, y
/// unused by detection), and radius.
#[derive(Debug, Clone, Copy)]
pub struct ScoringHole {
    pub score: u32,
    pub position: Vec3,
    pub radius: f32,
}

/// The fixed board layout: 13 holes across four depths.
///
/// Declaration order is significant — the scoring detector takes the first
/// hole whose detection zone a ball satisfies and stops scanning.
pub const SCORING_HOLES: [ScoringHole; 13] = [
    ScoringHole { score: 5, position: Vec3::new(0.0, 0.0, 6.5), radius: HOLE_RADIUS },
    //
    ScoringHole { score: 1, position: Vec3::new(-0.8, 0.0, 6.0), radius: HOLE_RADIUS },
    ScoringHole { score: 3, position: Vec3::new(-0.4, 0.0, 6.0), radius: HOLE_RADIUS },
    ScoringHole { score: 5, position: Vec3::new(0.0, 0.0, 6.0), radius: HOLE_RADIUS },
    ScoringHole { score: 3, position: Vec3::new(0.4, 0.0, 6.0), radius: HOLE_RADIUS },
    ScoringHole { score: 1, position: Vec3::new(0.8, 0.0, 6.0), radius: HOLE_RADIUS },
    //
    ScoringHole { score: 1, position: Vec3::new(-0.6, 0.0, 5.5), radius: HOLE_RADIUS },
    ScoringHole { score: 3, position: Vec3::new(0.2, 0.0, 5.5), radius: HOLE_RADIUS },
    ScoringHole { score: 3, position: Vec3::new(-0.2, 0.0, 5.5), radius: HOLE_RADIUS },
    ScoringHole { score: 1, position: Vec3::new(0.6, 0.0, 5.5), radius: HOLE_RADIUS },
    //
    ScoringHole { score: 1, position: Vec3::new(-0.4, 0.0, 5.0), radius: HOLE_RADIUS },
    ScoringHole { score: 1, position: Vec3::new(0.0, 0.0, 5.0), radius: HOLE_RADIUS },
    ScoringHole { score: 1, position: Vec3::new(0.4, 0.0, 5.0), radius: HOLE_RADIUS },
];

/// Ring marker colour, keyed by point value.
pub fn hole_color(score: u32) -> Color {
    match score {
        5 => Color::srgb(1.0, 0.0, 0.0),
        3 => Color::srgb(0.0, 1.0, 0.0),
        1 => Color::srgb(0.0, 0.0, 1.0),
        _ => Color::WHITE,
    }
}

// ── Resources ─────────────────────────────────────────────────────────────────

/// World-space origin of the lane.  Every spawn position, clamp bound, and
/// detection threshold is expressed relative to this point.
#[derive(Resource, Debug, Clone, Copy)]
pub struct LaneOrigin(pub Vec3);

impl Default for LaneOrigin {
    fn default() -> Self {
        Self(Vec3::ZERO)
    }
}

// ── Static solids ─────────────────────────────────────────────────────────────

/// One static cuboid bounding the lane: centre offset from the lane origin,
/// half-extents, and tilt (degrees about X, then Z).
struct LaneSolid {
    offset: [f32; 3],
    half_extents: [f32; 3],
    rot_x_deg: f32,
    rot_z_deg: f32,
}

/// Edges, ramp, floor, side walls, and back walls.  Together with the board
/// plate these block every escape route except the intentional
/// fall-below-threshold path past the end of the lane.
const LANE_SOLIDS: [LaneSolid; 10] = [
    // Raised board edges, following the 8° plate tilt.
    LaneSolid { offset: [1.0, LANE_RISE / 2.0 + 0.75, 3.95], half_extents: [0.05, 0.1, 3.0], rot_x_deg: -8.0, rot_z_deg: 0.0 },
    LaneSolid { offset: [-1.0, LANE_RISE / 2.0 + 0.75, 3.95], half_extents: [0.05, 0.1, 3.0], rot_x_deg: -8.0, rot_z_deg: 0.0 },
    // Lip behind the deepest hole row.
    LaneSolid { offset: [0.0, LANE_RISE + 0.82, 6.95], half_extents: [1.0, 0.005, 0.25], rot_x_deg: -90.0, rot_z_deg: 0.0 },
    // Ramp from the staging floor up to the board.
    LaneSolid { offset: [0.0, 0.5, 5.0], half_extents: [1.0, 0.05, 1.975], rot_x_deg: -13.846, rot_z_deg: 0.0 },
    // Staging floor, with a slight backward lean so loose balls roll home.
    LaneSolid { offset: [0.0, 0.06, 2.0], half_extents: [1.0, 0.05, 2.0], rot_x_deg: -1.8, rot_z_deg: 0.0 },
    // Outer side walls along the full lane length.
    LaneSolid { offset: [1.001, 0.20, 3.5], half_extents: [0.25, 0.05, 3.5], rot_x_deg: 0.0, rot_z_deg: 90.0 },
    LaneSolid { offset: [-1.001, 0.20, 3.5], half_extents: [0.25, 0.05, 3.5], rot_x_deg: 0.0, rot_z_deg: -90.0 },
    // Front wall behind the staging area.
    LaneSolid { offset: [0.0, 0.2, 0.0], half_extents: [1.0, 0.05, 0.25], rot_x_deg: -90.0, rot_z_deg: 0.0 },
    // Back wall, low and top sections.
    LaneSolid { offset: [0.0, 0.25, 6.98], half_extents: [1.0, 0.05, 0.25], rot_x_deg: -90.0, rot_z_deg: 0.0 },
    LaneSolid { offset: [0.0, 0.93, 6.98], half_extents: [1.0, 0.05, 0.425], rot_x_deg: -90.0, rot_z_deg: 0.0 },
];

// ── Board plate tessellation ──────────────────────────────────────────────────

/// Tessellate the board plate into a triangle grid with the scoring holes cut
/// out.
///
/// The plate lies in its local XZ plane (normal +Y), centred at the origin,
/// spanning `x ∈ [−half_w, half_w]`, `z ∈ [−half_l, half_l]`.  Cells whose
/// centre falls inside any hole circle are skipped, carving a polygonal
/// approximation of the circular cut-out.  `holes` are given in plate-local
/// XZ coordinates.
///
/// Returns `(positions, indices)` shared by the render mesh and the trimesh
/// collider.
pub fn board_plate_grid(
    holes: &[(Vec2, f32)],
    half_w: f32,
    half_l: f32,
    cell: f32,
) -> (Vec<[f32; 3]>, Vec<[u32; 3]>) {
    let nx = ((2.0 * half_w) / cell).ceil().max(1.0) as usize;
    let nz = ((2.0 * half_l) / cell).ceil().max(1.0) as usize;
    let dx = 2.0 * half_w / nx as f32;
    let dz = 2.0 * half_l / nz as f32;

    let mut positions = Vec::with_capacity((nx + 1) * (nz + 1));
    for j in 0..=nz {
        for i in 0..=nx {
            positions.push([-half_w + i as f32 * dx, 0.0, -half_l + j as f32 * dz]);
        }
    }

    let inside_hole = |x: f32, z: f32| {
        holes
            .iter()
            .any(|(c, r)| Vec2::new(x - c.x, z - c.y).length_squared() < r * r)
    };

    let vert = |i: usize, j: usize| (j * (nx + 1) + i) as u32;

    let mut indices = Vec::with_capacity(nx * nz * 2);
    for j in 0..nz {
        for i in 0..nx {
            let cx = -half_w + (i as f32 + 0.5) * dx;
            let cz = -half_l + (j as f32 + 0.5) * dz;
            if inside_hole(cx, cz) {
                continue;
            }
            let (v00, v10, v01, v11) = (vert(i, j), vert(i + 1, j), vert(i, j + 1), vert(i + 1, j + 1));
            // Wound for an upward (+Y) face normal.
            indices.push([v00, v01, v10]);
            indices.push([v10, v01, v11]);
        }
    }

    (positions, indices)
}

/// Build the render [`Mesh`] for the board plate from the shared grid data.
fn board_plate_mesh(positions: &[[f32; 3]], indices: &[[u32; 3]], half_w: f32, half_l: f32) -> Mesh {
    let normals: Vec<[f32; 3]> = vec![[0.0, 1.0, 0.0]; positions.len()];
    let uvs: Vec<[f32; 2]> = positions
        .iter()
        .map(|p| [(p[0] / (2.0 * half_w)) + 0.5, (p[2] / (2.0 * half_l)) + 0.5])
        .collect();

    let mut mesh = Mesh::new(
        PrimitiveTopology::TriangleList,
        RenderAssetUsages::RENDER_WORLD,
    );
    mesh.insert_attribute(
        Mesh::ATTRIBUTE_POSITION,
        positions.to_vec(),
    );
    mesh.insert_attribute(Mesh::ATTRIBUTE_NORMAL, normals);
    mesh.insert_attribute(Mesh::ATTRIBUTE_UV_0, uvs);
    mesh.insert_indices(Indices::U32(
        indices.iter().flat_map(|t| t.iter().copied()).collect(),
    ));
    mesh
}

/// Flat annulus in the local XZ plane (normal +Y), used for hole ring markers.
pub fn annulus_mesh(inner: f32, outer: f32, segments: usize) -> Mesh {
    let n = segments.max(3);
    let mut positions = Vec::with_capacity(n * 2);
    let mut uvs = Vec::with_capacity(n * 2);
    for k in 0..n {
        let a = std::f32::consts::TAU * k as f32 / n as f32;
        let (s, c) = a.sin_cos();
        positions.push([c * inner, 0.0, s * inner]);
        positions.push([c * outer, 0.0, s * outer]);
        uvs.push([0.0, k as f32 / n as f32]);
        uvs.push([1.0, k as f32 / n as f32]);
    }
    let normals: Vec<[f32; 3]> = vec![[0.0, 1.0, 0.0]; positions.len()];

    let mut indices: Vec<u32> = Vec::with_capacity(n * 6);
    for k in 0..n as u32 {
        let i0 = 2 * k;
        let o0 = 2 * k + 1;
        let i1 = 2 * ((k + 1) % n as u32);
        let o1 = 2 * ((k + 1) % n as u32) + 1;
        indices.extend_from_slice(&[i0, i1, o0, o0, i1, o1]);
    }

    let mut mesh = Mesh::new(
        PrimitiveTopology::TriangleList,
        RenderAssetUsages::RENDER_WORLD,
    );
    mesh.insert_attribute(Mesh::ATTRIBUTE_POSITION, positions);
    mesh.insert_attribute(Mesh::ATTRIBUTE_NORMAL, normals);
    mesh.insert_attribute(Mesh::ATTRIBUTE_UV_0, uvs);
    mesh.insert_indices(Indices::U32(indices));
    mesh
}

/// World transform of the board plate: tilted about X, centred above the
/// ramp so the holes sit at their advertised z depths.
pub fn board_transform(origin: Vec3, tilt_deg: f32) -> Transform {
    Transform::from_translation(
        origin + Vec3::new(0.0, LANE_RISE / 2.0 + BOARD_CENTER_Y_OFFSET, BOARD_CENTER_Z),
    )
    .with_rotation(Quat::from_rotation_x(-tilt_deg.to_radians()))
}

/// World-space position of a hole's centre on the tilted plate surface.
///
/// Used for ring markers; the scoring detector works in unprojected lane
/// coordinates and never needs this.
pub fn hole_surface_position(hole: &ScoringHole, origin: Vec3, tilt_deg: f32) -> Vec3 {
    let tilt = tilt_deg.to_radians();
    let local_z = hole.position.z - BOARD_CENTER_Z;
    Vec3::new(
        origin.x + hole.position.x,
        origin.y + LANE_RISE / 2.0 + BOARD_CENTER_Y_OFFSET + local_z * tilt.sin(),
        origin.z + BOARD_CENTER_Z + local_z * tilt.cos(),
    )
}

// ── Spawn ─────────────────────────────────────────────────────────────────────

/// Marker for every static lane entity, so round resets can leave them alone.
#[derive(Component)]
pub struct LanePart;

/// Spawn the board plate (render mesh + trimesh collider from the same
/// buffers), the hole ring markers, and the static bounding solids.
pub fn spawn_lane(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    config: Res<GameConfig>,
    origin: Res<LaneOrigin>,
) {
    let origin = origin.0;

    // ── Board plate ──────────────────────────────────────────────────────────
    let plate_holes: Vec<(Vec2, f32)> = SCORING_HOLES
        .iter()
        .map(|h| {
            (
                Vec2::new(h.position.x, h.position.z - BOARD_CENTER_Z),
                h.radius,
            )
        })
        .collect();

    let (positions, indices) = board_plate_grid(
        &plate_holes,
        BOARD_HALF_WIDTH,
        BOARD_HALF_LENGTH,
        config.board_mesh_cell,
    );

    if positions.len() < 3 || indices.is_empty() {
        warn!(
            "{}",
            GameError::BoardMesh {
                vertex_count: positions.len(),
                triangle_count: indices.len(),
            }
        );
        return;
    }

    let collider_vertices: Vec<Vec3> = positions.iter().map(|p| Vec3::from(*p)).collect();
    let collider = match Collider::trimesh(collider_vertices, indices.clone()) {
        Ok(c) => c,
        Err(e) => {
            // Solid plate fallback: the lane remains playable, holes become
            // visual-only until the tessellation is fixed.
            warn!("board trimesh rejected ({e:?}); falling back to a solid plate");
            Collider::cuboid(BOARD_HALF_WIDTH, 0.01, BOARD_HALF_LENGTH)
        }
    };

    let plate_material = materials.add(StandardMaterial {
        base_color: Color::srgb(0.898, 0.898, 0.898),
        double_sided: true,
        cull_mode: None,
        ..default()
    });

    commands.spawn((
        LanePart,
        RigidBody::Fixed,
        collider,
        Mesh3d(meshes.add(board_plate_mesh(
            &positions,
            &indices,
            BOARD_HALF_WIDTH,
            BOARD_HALF_LENGTH,
        ))),
        MeshMaterial3d(plate_material),
        board_transform(origin, config.board_tilt_deg),
    ));

    // ── Hole ring markers ────────────────────────────────────────────────────
    let ring_mesh = meshes.add(annulus_mesh(HOLE_RADIUS, HOLE_RADIUS * 1.15, 32));
    let tilt = config.board_tilt_deg.to_radians();
    let plate_normal = Vec3::new(0.0, tilt.cos(), -tilt.sin());
    for hole in SCORING_HOLES.iter() {
        let color = hole_color(hole.score);
        let material = materials.add(StandardMaterial {
            base_color: color,
            emissive: LinearRgba::from(color) * 0.5,
            double_sided: true,
            cull_mode: None,
            ..default()
        });
        commands.spawn((
            LanePart,
            Mesh3d(ring_mesh.clone()),
            MeshMaterial3d(material),
            Transform::from_translation(
                hole_surface_position(hole, origin, config.board_tilt_deg) + plate_normal * 0.002,
            )
            .with_rotation(Quat::from_rotation_x(-tilt)),
        ));
    }

    // ── Bounding solids ──────────────────────────────────────────────────────
    let solid_material = materials.add(StandardMaterial::from_color(Color::srgb(0.6, 0.6, 0.6)));
    for solid in LANE_SOLIDS.iter() {
        let he = Vec3::from(solid.half_extents);
        commands.spawn((
            LanePart,
            RigidBody::Fixed,
            Collider::cuboid(he.x, he.y, he.z),
            Mesh3d(meshes.add(Cuboid::new(he.x * 2.0, he.y * 2.0, he.z * 2.0))),
            MeshMaterial3d(solid_material.clone()),
            Transform::from_translation(origin + Vec3::from(solid.offset)).with_rotation(
                Quat::from_rotation_x(solid.rot_x_deg.to_radians())
                    * Quat::from_rotation_z(solid.rot_z_deg.to_radians()),
            ),
        ));
    }

    info!("Lane spawned: {} holes, {} solids", SCORING_HOLES.len(), LANE_SOLIDS.len());
}

// ── Unit tests ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn thirteen_holes_with_expected_values() {
        assert_eq!(SCORING_HOLES.len(), 13);
        let total: u32 = SCORING_HOLES.iter().map(|h| h.score).sum();
        assert_eq!(total, 29, "board value layout changed");
        for hole in SCORING_HOLES.iter() {
            assert!(matches!(hole.score, 1 | 3 | 5));
            assert_eq!(hole.radius, HOLE_RADIUS);
        }
    }

    /// The deepest (hardest) hole is declared first so first-match-wins
    /// favours it if detection zones ever touch.
    #[test]
    fn five_pointer_declared_first() {
        assert_eq!(SCORING_HOLES[0].score, 5);
        assert_eq!(SCORING_HOLES[0].position.z, 6.5);
    }

    /// Adjacent holes 0.4 apart with ×1.2 detection radius (0.192) leave a
    /// gap — detection zones never overlap, so first-match order only
    /// matters as a tie-break policy, not as a correctness hazard.
    #[test]
    fn detection_zones_do_not_overlap() {
        for (i, a) in SCORING_HOLES.iter().enumerate() {
            for b in SCORING_HOLES.iter().skip(i + 1) {
                let d = Vec2::new(a.position.x - b.position.x, a.position.z - b.position.z)
                    .length();
                assert!(
                    d >= 2.0 * HOLE_RADIUS * 1.2,
                    "holes at {:?} and {:?} have overlapping detection zones",
                    a.position,
                    b.position
                );
            }
        }
    }

    #[test]
    fn plate_grid_carves_every_hole() {
        let holes: Vec<(Vec2, f32)> = SCORING_HOLES
            .iter()
            .map(|h| {
                (
                    Vec2::new(h.position.x, h.position.z - BOARD_CENTER_Z),
                    h.radius,
                )
            })
            .collect();
        let (positions, indices) =
            board_plate_grid(&holes, BOARD_HALF_WIDTH, BOARD_HALF_LENGTH, 0.05);

        assert!(!indices.is_empty());

        // No triangle centroid may sit over a hole centre: the ball must see
        // open space where the table says there is a hole.
        for (center, radius) in &holes {
            for tri in &indices {
                let centroid = tri.iter().fold(Vec2::ZERO, |acc, &i| {
                    let p = positions[i as usize];
                    acc + Vec2::new(p[0], p[2])
                }) / 3.0;
                assert!(
                    (centroid - *center).length() > radius * 0.5,
                    "triangle centroid {centroid:?} covers hole at {center:?}"
                );
            }
        }
    }

    #[test]
    fn plate_grid_spans_full_plate() {
        let (positions, _) = board_plate_grid(&[], 1.0, 3.0, 0.05);
        let xs: Vec<f32> = positions.iter().map(|p| p[0]).collect();
        let zs: Vec<f32> = positions.iter().map(|p| p[2]).collect();
        let eps = 1e-4;
        assert!(xs.iter().any(|&x| (x - -1.0).abs() < eps));
        assert!(xs.iter().any(|&x| (x - 1.0).abs() < eps));
        assert!(zs.iter().any(|&z| (z - -3.0).abs() < eps));
        assert!(zs.iter().any(|&z| (z - 3.0).abs() < eps));
    }

    /// Hole surface positions follow the plate tilt: deeper holes sit higher.
    #[test]
    fn hole_surface_height_increases_with_depth() {
        let shallow = hole_surface_position(&SCORING_HOLES[12], Vec3::ZERO, BOARD_TILT_DEG_TEST);
        let deep = hole_surface_position(&SCORING_HOLES[0], Vec3::ZERO, BOARD_TILT_DEG_TEST);
        assert!(deep.y > shallow.y);
        assert!(deep.z > shallow.z);
    }

    const BOARD_TILT_DEG_TEST: f32 = crate::constants::BOARD_TILT_DEG;
}
