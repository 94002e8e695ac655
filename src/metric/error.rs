use thiserror::Error;

#[derive(Error, Debug)]
pub enum MetricError {
    #[error("shortest-path store i/o failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed shortest-path store file: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Graph(#[from] crate::graph::GraphError),

    #[error("could not sample a source node within the graph bounds")]
    NoSampleableNode,
}
