use serde::{Deserialize, Serialize};

/// Category tag deciding which volumes may be reported against each other.
#[repr(u8)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CollisionLayer {
    #[default]
    Default = 0,
    /// Floor geometry whose bounding box is precise enough for picking.
    GeometrySimple = 1,
    Building = 2,
    /// Pathfinding bookkeeping only; never returned by ray queries.
    Navigation = 3,
    Player = 4,
    Npc = 5,
    Enemy = 6,
    Boid = 7,
    /// Floor geometry that needs a mesh-level ray test.
    GeometryComplex = 8,
    /// Collides with nothing and is never hit by rays.
    Background = 9,
    Stairs = 10,
    Item = 11,
    Interactable = 12,
    Chest = 13,
}

impl CollisionLayer {
    pub const COUNT: usize = 14;

    pub const ALL: [CollisionLayer; Self::COUNT] = [
        CollisionLayer::Default,
        CollisionLayer::GeometrySimple,
        CollisionLayer::Building,
        CollisionLayer::Navigation,
        CollisionLayer::Player,
        CollisionLayer::Npc,
        CollisionLayer::Enemy,
        CollisionLayer::Boid,
        CollisionLayer::GeometryComplex,
        CollisionLayer::Background,
        CollisionLayer::Stairs,
        CollisionLayer::Item,
        CollisionLayer::Interactable,
        CollisionLayer::Chest,
    ];

    #[inline]
    pub fn as_index(self) -> usize {
        self as usize
    }

    /// Layers that ray queries skip entirely.
    #[inline]
    pub fn is_ray_transparent(self) -> bool {
        matches!(self, CollisionLayer::Navigation | CollisionLayer::Background)
    }

    /// Walkable surfaces: a hit on one of these is a candidate destination.
    #[inline]
    pub fn is_floor(self) -> bool {
        matches!(
            self,
            CollisionLayer::GeometrySimple | CollisionLayer::GeometryComplex | CollisionLayer::Stairs
        )
    }

    /// Layers whose box hit must be confirmed against the actual mesh.
    #[inline]
    pub fn needs_mesh_refinement(self) -> bool {
        matches!(self, CollisionLayer::GeometryComplex | CollisionLayer::Stairs)
    }

    /// Layers the cursor reports hover on.
    #[inline]
    pub fn is_hoverable(self) -> bool {
        matches!(
            self,
            CollisionLayer::Npc
                | CollisionLayer::Enemy
                | CollisionLayer::Item
                | CollisionLayer::Interactable
                | CollisionLayer::Chest
        )
    }
}

/// Symmetric "may collide" table over every pair of layers.
///
/// Pairs that were never allowed read as non-colliding. Serialised as the
/// list of allowed pairs so config files stay short.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<(CollisionLayer, CollisionLayer)>", into = "Vec<(CollisionLayer, CollisionLayer)>")]
pub struct CollisionMatrix {
    table: [[bool; CollisionLayer::COUNT]; CollisionLayer::COUNT],
}

impl CollisionMatrix {
    /// A matrix where nothing collides.
    pub fn empty() -> Self {
        Self { table: [[false; CollisionLayer::COUNT]; CollisionLayer::COUNT] }
    }

    pub fn from_pairs(pairs: &[(CollisionLayer, CollisionLayer)]) -> Self {
        let mut matrix = Self::empty();
        for &(a, b) in pairs {
            matrix.allow(a, b);
        }
        matrix
    }

    /// Allow `a` and `b` to collide, in both directions.
    pub fn allow(&mut self, a: CollisionLayer, b: CollisionLayer) {
        self.table[a.as_index()][b.as_index()] = true;
        self.table[b.as_index()][a.as_index()] = true;
    }

    pub fn forbid(&mut self, a: CollisionLayer, b: CollisionLayer) {
        self.table[a.as_index()][b.as_index()] = false;
        self.table[b.as_index()][a.as_index()] = false;
    }

    #[inline]
    pub fn can_collide(&self, a: CollisionLayer, b: CollisionLayer) -> bool {
        self.table[a.as_index()][b.as_index()]
    }

    /// Allowed pairs with `a <= b`, in layer order.
    pub fn pairs(&self) -> Vec<(CollisionLayer, CollisionLayer)> {
        let mut out = Vec::new();
        for (i, &a) in CollisionLayer::ALL.iter().enumerate() {
            for &b in &CollisionLayer::ALL[i..] {
                if self.can_collide(a, b) {
                    out.push((a, b));
                }
            }
        }
        out
    }
}

impl Default for CollisionMatrix {
    fn default() -> Self {
        use CollisionLayer::*;
        Self::from_pairs(&[
            (Default, Default),
            (Default, Building),
            (Default, Player),
            (Default, Npc),
            (Default, Enemy),
            (Player, Building),
            (Player, Npc),
            (Player, Enemy),
            (Player, Item),
            (Player, Interactable),
            (Player, Chest),
            (Npc, Building),
            (Npc, Enemy),
            (Enemy, Enemy),
            (Enemy, Building),
            (Enemy, Boid),
            (Boid, Boid),
            (Boid, Building),
        ])
    }
}

impl From<Vec<(CollisionLayer, CollisionLayer)>> for CollisionMatrix {
    fn from(pairs: Vec<(CollisionLayer, CollisionLayer)>) -> Self {
        Self::from_pairs(&pairs)
    }
}

impl From<CollisionMatrix> for Vec<(CollisionLayer, CollisionLayer)> {
    fn from(matrix: CollisionMatrix) -> Self {
        matrix.pairs()
    }
}
