mod aspect_ratio;
mod selection;
mod target;

pub use aspect_ratio::AspectRatio;
pub use selection::ModelSelection;
pub use target::TargetModel;
