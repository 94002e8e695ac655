use rstar::{RTree, RTreeObject, AABB};

use crate::geo::{Boundable, Rectangle, Segment};
use crate::graph::EdgeId;

/// An edge and its segment, stored in the R-tree by bounding box.
#[derive(Clone, Debug)]
pub struct EdgeObject {
    pub edge: EdgeId,
    pub segment: Segment,
}

impl RTreeObject for EdgeObject {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_corners(
            [self.segment.start.x, self.segment.start.y],
            [self.segment.end.x, self.segment.end.y],
        )
    }
}

/// R-tree over edge bounding boxes.
///
/// Like [`GridIndex`](crate::index::GridIndex), a search returns every
/// edge whose bounding box intersects the query rectangle; callers verify
/// exact geometry themselves.
pub struct EdgeTree {
    tree: RTree<EdgeObject>,
}

impl EdgeTree {
    pub fn bulk_load(objects: Vec<EdgeObject>) -> EdgeTree {
        EdgeTree {
            tree: RTree::bulk_load(objects),
        }
    }

    pub fn search(&self, rect: Rectangle) -> impl Iterator<Item = &EdgeObject> {
        let envelope = AABB::from_corners([rect.min.x, rect.min.y], [rect.max.x, rect.max.y]);
        self.tree.locate_in_envelope_intersecting(&envelope)
    }

    pub fn size(&self) -> usize {
        self.tree.size()
    }
}

impl Boundable for EdgeObject {
    fn bounds(&self) -> Rectangle {
        self.segment.bounds()
    }
}
