// src/config.rs
//
// System files (input) and run metadata (output).
//
// Input layout:
//   {
//     "geometry": {
//       "sites": [{"index", "position", "type", "mu", "anisotropy_constant",
//                  "anisotropy_axis", "field_axis", "jex_interactions"?}, ...],
//       "neighbors": [{"source", "target", "jex"}, ...]
//     },
//     "parameters": {"energy_unit", "damping", "gyromagnetic", "delta_time"},
//     "temperature": 10 | [..] | {"start", "final", "step"},
//     "field":       same shapes,
//     "num_iterations": 1000,
//     "seed": 42,              (optional)
//     "initial_state": [[x, y, z], ...]   (optional)
//   }
//
// The older key names (`units`, `deltat`, `temperatures`,
// `magnetic_field_intensities`, `magnetic_field_axis`) are accepted as aliases.
// `sites`/`neighbors` may also sit at the top level without the `geometry`
// wrapper (the layout saved by the Python tooling, sites carrying their own
// `jex_interactions`).

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::lattice::{Lattice, LatticeBuilder, NeighborLink, Site};
use crate::params::{EnergyUnit, Parameters};
use crate::scalar_list::ScalarSpec;
use crate::simulation::System;
use crate::vector_field::VectorField;

/// Kind tag for sites that do not name one.
pub const GENERIC_SITE_KIND: &str = "generic";

fn default_kind() -> String {
    GENERIC_SITE_KIND.to_string()
}

fn z_axis() -> [f64; 3] {
    [0.0, 0.0, 1.0]
}

#[derive(Debug, Clone, Deserialize)]
pub struct SystemFile {
    #[serde(flatten)]
    pub geometry: GeometryLayout,
    pub parameters: ParametersFile,
    #[serde(alias = "temperatures")]
    pub temperature: ScalarSpec,
    #[serde(alias = "magnetic_field_intensities", alias = "magnetic_field")]
    pub field: ScalarSpec,
    pub num_iterations: usize,
    #[serde(default)]
    pub seed: Option<u32>,
    #[serde(default)]
    pub initial_state: Option<Vec<[f64; 3]>>,
}

/// Where the sites live in the file: under `geometry` or at the top level.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum GeometryLayout {
    Nested { geometry: GeometryFile },
    Flat(GeometryFile),
}

impl GeometryLayout {
    pub fn into_lattice(self) -> Result<Lattice> {
        match self {
            Self::Nested { geometry } | Self::Flat(geometry) => geometry.into_lattice(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct GeometryFile {
    pub sites: Vec<SiteFile>,
    #[serde(default)]
    pub neighbors: Vec<NeighborFile>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SiteFile {
    pub index: usize,
    pub position: [f64; 3],
    #[serde(rename = "type", default = "default_kind")]
    pub kind: String,
    pub mu: f64,
    #[serde(default)]
    pub anisotropy_constant: f64,
    #[serde(default = "z_axis")]
    pub anisotropy_axis: [f64; 3],
    #[serde(alias = "magnetic_field_axis", default = "z_axis")]
    pub field_axis: [f64; 3],
    #[serde(default)]
    pub jex_interactions: Vec<JexInteractionFile>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct JexInteractionFile {
    pub neighbor_index: usize,
    pub jex: f64,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct NeighborFile {
    pub source: usize,
    pub target: usize,
    pub jex: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ParametersFile {
    #[serde(alias = "units")]
    pub energy_unit: String,
    pub damping: f64,
    pub gyromagnetic: f64,
    #[serde(alias = "deltat")]
    pub delta_time: f64,
}

impl GeometryFile {
    pub fn into_lattice(self) -> Result<Lattice> {
        let mut builder = LatticeBuilder::new();
        for s in self.sites {
            let mut site = Site::new(s.index, s.position, s.kind, s.mu)
                .with_anisotropy(s.anisotropy_constant, s.anisotropy_axis)
                .with_field_axis(s.field_axis);
            for it in s.jex_interactions {
                site = site.with_interaction(it.neighbor_index, it.jex);
            }
            builder.add_site(site);
        }
        for n in self.neighbors {
            builder.add_link(NeighborLink::new(n.source, n.target, n.jex));
        }
        builder.build()
    }
}

impl ParametersFile {
    pub fn into_parameters(self) -> Result<Parameters> {
        let unit = EnergyUnit::try_from(self.energy_unit.as_str())?;
        Ok(Parameters::new(unit, self.damping, self.gyromagnetic, self.delta_time))
    }
}

impl SystemFile {
    pub fn from_json_str(s: &str) -> Result<Self> {
        Ok(serde_json::from_str(s)?)
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let reader = BufReader::new(File::open(path)?);
        Ok(serde_json::from_reader(reader)?)
    }

    /// Validate everything and build the in-memory system.
    pub fn into_system(self) -> Result<System> {
        let lattice = self.geometry.into_lattice()?;
        let parameters = self.parameters.into_parameters()?;
        let temperatures = self.temperature.resolve()?;
        let fields = self.field.resolve()?;
        debug!(
            "loaded {} sites, {} temperatures, {} field intensities",
            lattice.num_sites(),
            temperatures.len(),
            fields.len()
        );
        System::new(
            lattice,
            parameters,
            temperatures,
            fields,
            self.num_iterations,
            self.initial_state.map(VectorField::from_vec),
            self.seed,
        )
    }
}

/// Run metadata, written next to the outputs as `config.json`.
#[derive(Debug, Clone, Serialize)]
pub struct RunInformation {
    pub num_sites: usize,
    pub parameters: Parameters,
    /// Size-matched temperature list.
    pub temperatures: Vec<f64>,
    /// Size-matched field-intensity list.
    pub magnetic_field_intensities: Vec<f64>,
    pub seed: u32,
    pub num_iterations: usize,
    pub positions: Vec<[f64; 3]>,
    pub types: Vec<String>,
    pub initial_state: VectorField,
    pub num_sweep_points: usize,
    /// Largest coordination number of the exchange table.
    pub max_neighbors: usize,
    /// Directed exchange bonds.
    pub num_links: usize,
}

impl RunInformation {
    pub fn write_to_dir(&self, out_dir: &Path) -> std::io::Result<()> {
        let path = out_dir.join("config.json");
        let file = File::create(path)?;
        serde_json::to_writer_pretty(file, self)?;
        Ok(())
    }
}
