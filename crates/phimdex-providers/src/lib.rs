pub mod capabilities;
pub mod error;
pub mod kkphim;
pub mod mapping;
pub mod nguonc;
pub mod registry;
pub mod traits;

pub use capabilities::{MovieCatalog, ProviderCapabilities, TitleSearch};
pub use error::ProviderError;
pub use kkphim::KkphimClient;
pub use nguonc::NguoncClient;
pub use registry::ProviderRegistry;
pub use traits::StreamProvider;
