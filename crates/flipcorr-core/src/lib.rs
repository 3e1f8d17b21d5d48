//! Flipping-ratio correction for DNS polarized-neutron diffraction data.

pub mod domain;
pub mod modules;
pub mod numerics;
