pub mod error;
pub mod health;
pub mod models;
pub mod selection;
pub mod utils;

pub use error::SelectionError;
pub use health::{HealthProbe, HttpHealthProbe};
pub use models::node::StorageNode;
pub use selection::{DefaultLogger, NodeSelector, SelectionLogger};
pub use utils::rendezvous::RendezvousHash;
