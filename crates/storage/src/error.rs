#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SelectionError {
    #[error("storage node {endpoint} has no delegate owner wallet")]
    MissingWallet { endpoint: String },
}
