//! Translation Numbers
//!
//! - **sandwich**: integer bounds and the composition estimate
//! - **estimator**: dyadic limit with certified error and exact periodic detection
//! - **transfer**: estimates from approximate orbits and displacement points

pub mod estimator;
pub mod sandwich;
pub mod transfer;

pub use estimator::{dyadic_sample, translation_number, Estimate, TranslationNumberEstimator};
pub use sandwich::{
    composition_defect, composition_within_unit, displacement_bounds, integer_sandwich, strict_bounds_hold,
};
pub use transfer::{
    average_displacement, bounded_distance_estimate, point_with_displacement, rotation_point,
    translation_number_of_commuting_product, translation_number_of_power, translation_number_of_zpow,
};
