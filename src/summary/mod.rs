//! Class-level and cross-diagnostic aggregation of labelled student records.

pub mod class;
pub mod global;

pub use class::{
    class_summary, count_categories, criterion_averages, rythme_global_score, CategoryCount,
    ClassSummary, CriterionAverage,
};
pub use global::{cross_diagnostic_summary, GlobalData, GlobalSummary, RadarIndicator};
