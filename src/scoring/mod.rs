pub mod coefficients;
pub mod diagnostic;
pub mod engine;
pub mod levels;
pub mod observations;
pub mod validation;

pub use coefficients::*;
pub use diagnostic::DiagnosticType;
pub use engine::{
    classify_intelligences, classify_motivation, classify_rythme, classify_soutien,
    classify_style, profile_label, Engagement, Intelligence, Rhythm, Style, Support,
};
pub use levels::{Group, Level};
pub use observations::{
    IntelligenceObservations, IntelligenceUpdate, MotivationObservations, MotivationUpdate,
    ObservationUpdate, Observations, RythmeObservations, RythmeUpdate, SoutienObservations,
    SoutienUpdate, StyleObservations, StyleUpdate,
};
pub use validation::parse_assignments;
