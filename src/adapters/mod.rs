// Adapters layer: concrete clients for external systems (GRaaS backend, openEO jobs API).

pub mod graas_client;
pub mod openeo_client;

pub use graas_client::GraasClient;
pub use openeo_client::{JobResponse, OpenEoClient};
