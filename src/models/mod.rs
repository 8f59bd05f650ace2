pub mod recipe;
pub mod summary;

pub use recipe::{
    ChannelLevelsConfig, DitherModeConfig, HueRangeAdjust, HueRangeName, Recipe, ScaleModeConfig,
    Step, ToneShift,
};
pub use summary::ImageSummary;
