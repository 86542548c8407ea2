//! Semiconjugacy Layer
//!
//! - **relation**: the relation `F ∘ f = g ∘ F` and its composition
//! - **orbit**: breadth-first enumeration of group elements by word length
//! - **synthesizer**: the supremum construction between actions with equal
//!   translation numbers

pub mod orbit;
pub mod relation;
pub mod synthesizer;

pub use orbit::WordShells;
pub use relation::{defect, is_semiconjugacy, semiconjugacy_defect, semiconjugates_actions, Semiconjugacy};
pub use synthesizer::{
    semiconjugate, semiconjugate_units, SemiconjugacySynthesizer, Synthesis, SynthesisMethod, ORBIT_BOUND,
};
