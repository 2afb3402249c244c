mod render;
pub mod status;
pub mod track;
