//! Barcode handling: token classification and symbol rendering

pub mod classifier;
pub mod render;

pub use classifier::{
    default_rules, BarcodeClassifier, ClassificationRule, ClassifiedReference, ClassifierError,
    EntityKind, RulePriority,
};
pub use render::{render_svg, RenderError, RenderOptions};
