pub mod point;
pub mod polygon;
