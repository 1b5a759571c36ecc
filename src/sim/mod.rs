pub mod event;
pub mod level;
pub mod runner;
pub mod schedule;
pub mod step;
pub mod world;
