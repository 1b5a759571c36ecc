pub mod difficulty;
pub mod entity;
pub mod physics;
pub mod placement;
pub mod spawner;
pub mod tile;
