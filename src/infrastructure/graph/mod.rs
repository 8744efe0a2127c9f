mod drive_client;

pub use drive_client::{GraphDriveClient, GRAPH_SCOPES};
