use thiserror::Error;

#[derive(Error, Debug)]
pub enum GraphError {
    #[error("graph i/o failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed graph file: {0}")]
    Parse(String),

    #[error("operation requires a bidirectional graph")]
    NotBidirectional,

    #[error("edges do not form a path")]
    BrokenChain,

    #[error("ran into a junction while following a loop")]
    UnexpectedJunction,

    #[error("got stuck choosing a forward edge")]
    StuckWalk,

    #[error("unexpectedly re-entered the starting edge")]
    UnexpectedLoop,

    #[error("leftover edge does not lie on a loop")]
    LeftoverEdge,
}
