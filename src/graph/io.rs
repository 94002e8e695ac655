use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use log::debug;

use crate::geo::Point;
use crate::graph::{Graph, GraphError, NodeId};

/// Plain-text graph persistence.
///
/// The format is a count header followed by one `x y` line per node and
/// one `src dst` line per edge; ids are implied by line order, so a
/// read/write round trip preserves node ids, edge ids and coordinates.
impl Graph {
    pub fn read(path: impl AsRef<Path>) -> Result<Graph, GraphError> {
        let reader = BufReader::new(File::open(path.as_ref())?);
        let mut lines = reader.lines();

        let header = lines
            .next()
            .ok_or_else(|| GraphError::Parse("missing header".into()))??;
        let mut counts = header.split_whitespace();
        let node_count = parse_field::<usize>(counts.next(), "node count")?;
        let edge_count = parse_field::<usize>(counts.next(), "edge count")?;

        let mut graph = Graph::new();
        for _ in 0..node_count {
            let line = lines
                .next()
                .ok_or_else(|| GraphError::Parse("truncated node section".into()))??;
            let mut fields = line.split_whitespace();
            let x = parse_field::<f64>(fields.next(), "node x")?;
            let y = parse_field::<f64>(fields.next(), "node y")?;
            graph.add_node(Point::new(x, y));
        }
        for _ in 0..edge_count {
            let line = lines
                .next()
                .ok_or_else(|| GraphError::Parse("truncated edge section".into()))??;
            let mut fields = line.split_whitespace();
            let src = parse_field::<usize>(fields.next(), "edge src")?;
            let dst = parse_field::<usize>(fields.next(), "edge dst")?;
            if src >= node_count || dst >= node_count {
                return Err(GraphError::Parse(format!(
                    "edge endpoint out of range: {src} {dst}"
                )));
            }
            graph.add_edge(NodeId::new(src), NodeId::new(dst));
        }

        debug!(
            "read graph: {} nodes, {} edges from {:?}",
            node_count,
            edge_count,
            path.as_ref()
        );
        Ok(graph)
    }

    pub fn write(&self, path: impl AsRef<Path>) -> Result<(), GraphError> {
        let mut writer = BufWriter::new(File::create(path.as_ref())?);
        writeln!(writer, "{} {}", self.node_count(), self.edge_count())?;
        for node in self.node_ids() {
            let point = self.point(node);
            writeln!(writer, "{:?} {:?}", point.x, point.y)?;
        }
        for edge in self.edge_ids() {
            let (src, dst) = self.endpoints(edge);
            writeln!(writer, "{} {}", src.index(), dst.index())?;
        }
        Ok(())
    }
}

fn parse_field<T: std::str::FromStr>(field: Option<&str>, what: &str) -> Result<T, GraphError> {
    field
        .ok_or_else(|| GraphError::Parse(format!("missing {what}")))?
        .parse::<T>()
        .map_err(|_| GraphError::Parse(format!("unparseable {what}")))
}
