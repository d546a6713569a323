pub mod map_position;
pub mod marker;
