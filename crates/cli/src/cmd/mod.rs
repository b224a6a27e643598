pub mod normalize;
pub mod request;
