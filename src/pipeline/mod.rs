pub mod average;
pub mod derive;
pub mod quantize;
pub mod target;
