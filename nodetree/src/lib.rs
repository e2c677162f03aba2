pub mod config;
pub mod error;
pub mod node;
pub mod node_list;
pub mod query;
pub mod registry;
pub mod tree;
pub mod widget;

pub use config::TreeConfig;
pub use error::{NodeListError, Result, TreeError};
pub use node::NodeId;
pub use node_list::NodeList;
pub use query::{descendants, query_id, query_name, Descendants};
pub use registry::{Detached, Registry};
pub use tree::{Ancestors, NodeTree};
pub use widget::{Element, Widget};
