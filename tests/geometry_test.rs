use gloam::data_structures::geometry::Geometry;

fn bounds(geometry: &Geometry) -> ([f32; 3], [f32; 3]) {
    let mut min = [f32::MAX; 3];
    let mut max = [f32::MIN; 3];
    for vertex in &geometry.vertices {
        for axis in 0..3 {
            min[axis] = min[axis].min(vertex.position[axis]);
            max[axis] = max[axis].max(vertex.position[axis]);
        }
    }
    (min, max)
}

#[test]
fn should_build_a_centered_cuboid() {
    let geometry = Geometry::cuboid(4.0, 2.5, 4.0);
    // four vertices per face, two triangles per face
    assert_eq!(geometry.vertices.len(), 24);
    assert_eq!(geometry.indices.len(), 36);

    let (min, max) = bounds(&geometry);
    assert_eq!(min, [-2.0, -1.25, -2.0]);
    assert_eq!(max, [2.0, 1.25, 2.0]);
}

#[test]
fn should_be_deterministic_for_identical_parameters() {
    let a = Geometry::cuboid(1.0, 2.0, 3.0);
    let b = Geometry::cuboid(1.0, 2.0, 3.0);
    assert_eq!(a.indices, b.indices);
    for (va, vb) in a.vertices.iter().zip(&b.vertices) {
        assert_eq!(va.position, vb.position);
        assert_eq!(va.normal, vb.normal);
        assert_eq!(va.tangent, vb.tangent);
    }
}

#[test]
fn should_subdivide_the_plane() {
    let geometry = Geometry::plane(2.2, 2.2, 100, 100);
    assert_eq!(geometry.vertices.len(), 101 * 101);
    assert_eq!(geometry.indices.len(), 100 * 100 * 6);

    // flat and facing +Z
    for vertex in &geometry.vertices {
        assert_eq!(vertex.position[2], 0.0);
        assert_eq!(vertex.normal, [0.0, 0.0, 1.0]);
    }
}

#[test]
fn should_cap_the_cone_base() {
    let geometry = Geometry::cone(3.5, 1.0, 4);
    // 4 side triangles plus 4 cap triangles
    assert_eq!(geometry.indices.len(), 8 * 3);

    let (min, max) = bounds(&geometry);
    assert_eq!(min[1], -0.5);
    assert_eq!(max[1], 0.5);
    assert!((max[0] - 3.5).abs() < 1e-4);

    // cap normals face straight down
    let down = geometry
        .vertices
        .iter()
        .filter(|v| v.normal == [0.0, -1.0, 0.0])
        .count();
    assert!(down > 0);
}

#[test]
fn should_keep_sphere_vertices_on_the_radius() {
    let geometry = Geometry::uv_sphere(1.0, 16, 16);
    for vertex in &geometry.vertices {
        let [x, y, z] = vertex.position;
        let r = (x * x + y * y + z * z).sqrt();
        assert!((r - 1.0).abs() < 1e-4, "vertex off the sphere: r = {r}");
        // normals point outward along the radius
        for axis in 0..3 {
            assert!((vertex.normal[axis] - vertex.position[axis]).abs() < 1e-4);
        }
    }
}

#[test]
fn should_compute_a_tangent_basis() {
    let geometry = Geometry::plane(1.0, 1.0, 1, 1);
    for vertex in &geometry.vertices {
        let t = vertex.tangent;
        let len = (t[0] * t[0] + t[1] * t[1] + t[2] * t[2]).sqrt();
        assert!(len > 1e-3, "tangent was never accumulated");

        // tangent orthogonal to the +Z normal for a flat plane
        assert!(t[2].abs() < 1e-4);
    }
}
