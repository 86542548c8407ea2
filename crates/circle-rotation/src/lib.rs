//! Circle Rotation
//!
//! Exact translation numbers of degree-one circle maps and semiconjugacies
//! between group actions on the circle.
//!
//! # Architecture
//!
//! The crate is structured in four layers:
//!
//! - **Layer 0 (Foundation)**: exact rationals, monoid/group/lattice axioms, group actions
//! - **Layer 1 (Lift)**: degree-one lifts as exact piecewise-linear tables, and their units
//! - **Layer 2 (Translation)**: the translation number with certified error, periodic orbits
//! - **Layer 3 (Semiconjugacy)**: the relation `F ∘ f = g ∘ F` and its synthesis
//!
//! # Example
//!
//! ```rust
//! use circle_rotation::prelude::*;
//! use circle_rotation::foundation::exactmath::q;
//!
//! // 0 ↦ 2/3 ↦ 4/3 ↦ 2: a periodic orbit with translation number 2/3
//! let f = DegreeOneLift::from_breakpoints(&[
//!     (q(0, 1), q(2, 3)),
//!     (q(1, 6), q(3, 4)),
//!     (q(1, 3), q(1, 1)),
//!     (q(2, 3), q(4, 3)),
//! ])
//! .unwrap();
//!
//! let estimate = translation_number(&f, &q(1, 1000)).unwrap();
//! assert!(estimate.exact);
//! assert_eq!(estimate.value, q(2, 3));
//! ```

// Layer 0: Foundation
pub mod foundation;

// Layer 1: Degree-One Lifts
pub mod lift;

// Layer 2: Translation Numbers
pub mod periodic;
pub mod translation;

// Layer 3: Semiconjugacy
pub mod semiconj;

pub mod config;
mod error;

pub use error::{Error, Result};

/// Prelude - commonly used types and traits
pub mod prelude {
    // Foundation
    pub use crate::foundation::exactmath::Real;
    pub use crate::foundation::group::{AbelianGroup, Group, Monoid, Power};
    pub use crate::foundation::homomorphism::{CommutingPairAction, LiftAction, PowerAction};
    pub use crate::foundation::lattice::Lattice;

    // Lifts
    pub use crate::lift::{DegreeOneLift, Piece, Unit};

    // Translation numbers
    pub use crate::periodic::{find_periodic_orbit, PeriodicOrbit};
    pub use crate::translation::{translation_number, Estimate, TranslationNumberEstimator};

    // Semiconjugacy
    pub use crate::semiconj::{semiconjugate, semiconjugate_units, SemiconjugacySynthesizer, Synthesis, SynthesisMethod};

    // Configuration and errors
    pub use crate::config::RotationConfig;
    pub use crate::Error;
}
