//! The scene graph: an ownership tree of spatial nodes.
//!
//! Nodes live in an arena owned by [`SceneGraph`] and refer to each other by
//! [`NodeId`]. Geometry and material data are likewise owned by the graph and
//! shared across nodes by handle, so fifty grave markers can point at one
//! cuboid. The graph is a tree, never a general graph: a node has at most one
//! parent and can never become its own ancestor.
//!
//! Handles are only meaningful for the graph that issued them; indexing with
//! a foreign handle panics.

use anyhow::{Result, bail};

use crate::data_structures::{
    geometry::Geometry, light::Light, material::Material, transform::Transform,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GeometryId(pub(crate) u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MaterialId(pub(crate) u32);

#[derive(Debug, Clone)]
pub enum NodeKind {
    /// A pure grouping node with no renderable payload.
    Group,
    /// A renderable mesh binding shared geometry and material.
    Mesh {
        geometry: GeometryId,
        material: MaterialId,
    },
    Light(Light),
    Camera,
}

#[derive(Debug)]
pub struct Node {
    pub name: String,
    pub local: Transform,
    kind: NodeKind,
    children: Vec<NodeId>,
    parent: Option<NodeId>,
}

impl Node {
    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    pub fn kind_mut(&mut self) -> &mut NodeKind {
        &mut self.kind
    }

    /// Child order is insertion order; it matters for draw order only where
    /// transparency is involved.
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }
}

/// Linear fog: full scene color at `near`, full fog color at `far`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fog {
    pub color: [f32; 3],
    pub near: f32,
    pub far: f32,
}

#[derive(Debug)]
pub struct SceneGraph {
    nodes: Vec<Node>,
    root: NodeId,
    geometries: Vec<Geometry>,
    materials: Vec<Material>,
    pub fog: Option<Fog>,
    pub background: [f32; 3],
}

impl SceneGraph {
    /// An empty scene containing only the root group.
    pub fn new() -> Self {
        let root = Node {
            name: "root".to_string(),
            local: Transform::identity(),
            kind: NodeKind::Group,
            children: Vec::new(),
            parent: None,
        };
        Self {
            nodes: vec![root],
            root: NodeId(0),
            geometries: Vec::new(),
            materials: Vec::new(),
            fog: None,
            background: [0.0, 0.0, 0.0],
        }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn add_geometry(&mut self, geometry: Geometry) -> GeometryId {
        self.geometries.push(geometry);
        GeometryId(self.geometries.len() as u32 - 1)
    }

    pub fn add_material(&mut self, material: Material) -> MaterialId {
        self.materials.push(material);
        MaterialId(self.materials.len() as u32 - 1)
    }

    pub fn geometry(&self, id: GeometryId) -> &Geometry {
        &self.geometries[id.0 as usize]
    }

    pub fn material(&self, id: MaterialId) -> &Material {
        &self.materials[id.0 as usize]
    }

    pub fn geometries(&self) -> &[Geometry] {
        &self.geometries
    }

    pub fn materials(&self) -> &[Material] {
        &self.materials
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0 as usize]
    }

    pub fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.0 as usize]
    }

    /// Number of nodes in the arena, the root included.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Create a node without attaching it to the tree.
    pub fn add_node(&mut self, name: &str, kind: NodeKind, local: Transform) -> NodeId {
        self.nodes.push(Node {
            name: name.to_string(),
            local,
            kind,
            children: Vec::new(),
            parent: None,
        });
        NodeId(self.nodes.len() as u32 - 1)
    }

    /// Attach `node` as the last child of `parent`.
    ///
    /// Ownership is exclusive and single: the node must not already have a
    /// parent (reparenting is out of scope), and the edge must not create a
    /// cycle.
    pub fn add_child(&mut self, parent: NodeId, node: NodeId) -> Result<()> {
        if node == parent {
            bail!("node {:?} cannot be its own parent", node);
        }
        if let Some(existing) = self.node(node).parent {
            bail!(
                "node {:?} already has parent {:?}; reparenting is not supported",
                node,
                existing
            );
        }
        if self.is_ancestor(node, parent) {
            bail!(
                "attaching {:?} under {:?} would create a cycle",
                node,
                parent
            );
        }
        self.nodes[node.0 as usize].parent = Some(parent);
        self.nodes[parent.0 as usize].children.push(node);
        Ok(())
    }

    /// Create a node and attach it to `parent` in one step.
    pub fn insert(
        &mut self,
        parent: NodeId,
        name: &str,
        kind: NodeKind,
        local: Transform,
    ) -> Result<NodeId> {
        let id = self.add_node(name, kind, local);
        self.add_child(parent, id)?;
        Ok(id)
    }

    fn is_ancestor(&self, maybe_ancestor: NodeId, mut node: NodeId) -> bool {
        while let Some(parent) = self.node(node).parent {
            if parent == maybe_ancestor {
                return true;
            }
            node = parent;
        }
        false
    }

    /// World transform of a single node, composed root-to-node.
    pub fn world_transform(&self, id: NodeId) -> Transform {
        let mut chain = vec![id];
        let mut cursor = id;
        while let Some(parent) = self.node(cursor).parent {
            chain.push(parent);
            cursor = parent;
        }
        let mut world = Transform::identity();
        for id in chain.into_iter().rev() {
            world = &world * &self.node(id).local;
        }
        world
    }

    /// Depth-first pre-order traversal from the root.
    ///
    /// Yields every reachable node exactly once, parents before children,
    /// each paired with its accumulated world transform. The iterator is lazy
    /// and restartable; traversing an unmodified graph twice yields identical
    /// results.
    pub fn traverse(&self) -> Traversal<'_> {
        Traversal {
            graph: self,
            stack: vec![(self.root, Transform::identity())],
        }
    }
}

impl Default for SceneGraph {
    fn default() -> Self {
        Self::new()
    }
}

pub struct Traversal<'a> {
    graph: &'a SceneGraph,
    // nodes paired with their parent's world transform
    stack: Vec<(NodeId, Transform)>,
}

impl<'a> Iterator for Traversal<'a> {
    type Item = (NodeId, Transform);

    fn next(&mut self) -> Option<Self::Item> {
        let (id, parent_world) = self.stack.pop()?;
        let node = self.graph.node(id);
        let world = &parent_world * &node.local;
        // reversed so the leftmost child pops first (pre-order)
        for &child in node.children.iter().rev() {
            self.stack.push((child, world.clone()));
        }
        Some((id, world))
    }
}
