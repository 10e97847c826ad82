pub mod metadata;
pub mod node;
pub mod node_info;
pub mod pod;
pub mod quantity;
pub mod resource;

pub use metadata::Metadata;
pub use node::Node;
pub use node_info::NodeInfo;
pub use pod::{ContainerSpec, Pod, PodSpec, ResourceRequirements};
pub use quantity::{Quantity, QuantityError};
pub use resource::{Resource, ResourceList};
