// src/lib.rs

pub mod averages;
pub mod config;
pub mod effective_field;
pub mod energy;
pub mod error;
pub mod lattice;
pub mod llg;
pub mod magnetization;
pub mod output;
pub mod params;
pub mod scalar_list;
pub mod simulation;
pub mod sweep;
pub mod vec3;
pub mod vector_field;

pub use error::{LlgError, Result};
