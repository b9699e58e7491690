#![doc = r"Design-tree collaborators consumed by the Trellis settings panel."]

pub mod collections;
mod idle;
pub mod locale;
pub mod node;
pub mod operation;
pub mod platform;
pub mod value;
pub mod workspace;

pub use idle::IdleQueue;
pub use locale::{GlobalRegistry, LocaleTable, MessageRegistry, DEFAULT_LANGUAGE};
pub use node::{DesignNode, DesignerProps, NodeId, SharedProps, TreeNode};
pub use operation::{Operation, OperationHistory, SnapshotRecord, UPDATE_NODE_PROPS};
pub use platform::{Clock, IdleOptions, IdleRequestId, IdleScheduler, SystemClock};
pub use value::{deep_merge, get_in, get_in_map, is_truthy, set_in, ValueError};
pub use workspace::{SubscriptionId, Workbench, Workspace, WorkspaceId};
