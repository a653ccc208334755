pub mod decode;
pub mod fetch;
pub mod geometry;
pub mod heat;
pub mod output;
pub mod render;
pub mod select;
pub mod store;
