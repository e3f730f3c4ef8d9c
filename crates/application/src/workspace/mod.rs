//! The tabbed workspace: tab bookkeeping, persistence and the controller.

mod controller;
mod debounce;
mod loaders;
mod options;
mod tabs;

pub use controller::WorkspaceController;
pub use debounce::StoreDebouncer;
pub use options::AddOptions;
pub use tabs::TabSet;
