//! Activity observation: folds foreground-window samples into one summary per
//! period. Only a scripted demo source ships; real capture is platform work.

pub mod aggregator;
pub mod demo;

pub use aggregator::{sanitize_title, ActivityAggregator, WindowSample};
pub use demo::{demo_activity_loop, DemoWindowSource};
