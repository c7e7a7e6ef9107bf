pub mod error;
pub mod extract;
pub mod normalize;
pub mod response;
