mod traffy_client;

pub use traffy_client::TraffyClient;
