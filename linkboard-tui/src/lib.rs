pub mod link_viewer;

pub use link_viewer::{LinkViewer, LoadedView, ViewerMessage, create_viewer_channel, run_viewer};
