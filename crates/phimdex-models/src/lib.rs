pub mod media_type;
pub mod movie;
pub mod stream;

pub use media_type::MediaType;
pub use movie::{Movie, MovieSeed};
pub use stream::{Episode, StreamLanguage, StreamSource};
