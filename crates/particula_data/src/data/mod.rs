pub mod constants;
pub mod params;
pub mod particle;
pub mod response;
