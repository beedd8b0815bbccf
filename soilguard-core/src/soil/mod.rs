//! Soil profiles and their physical coefficients
//!
//! A deployment selects one [`SoilProfile`]; the [`SoilProfileRegistry`]
//! maps it to Archie's-law coefficients, nutrient references and channel
//! offsets. The registry is built once at startup and never mutated, so it is
//! passed by reference into the compensation engine instead of living in a
//! global table.

mod profile;
mod registry;

pub use profile::SoilProfile;
pub use registry::{
    ArchieCoefficients, NpkReference, NpkReferences, ProfileLookup, ProfileParameters,
    SoilProfileRegistry,
};
