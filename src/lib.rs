pub mod error;
pub mod generators;
pub mod grid;
pub mod path;
pub mod union_find;

pub use error::{Error, Result};
pub use generators::{
    BackbiteMixer, BlockDoubling, CycleGenerator, DfsTreeMerger, DominoOverlay, SnakeCycle,
    WilsonMerger,
};
