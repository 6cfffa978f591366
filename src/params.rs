// src/params.rs

use serde::Serialize;

use crate::error::LlgError;

/// Electron gyromagnetic ratio used by the benchmarks (rad/(s·T)).
pub const GAMMA_E_RAD_PER_S_T: f64 = 1.76e11;

/// Boltzmann constant in meV/K.
pub const KB_MEV: f64 = 0.08618;
/// Boltzmann constant in J/K.
pub const KB_JOULE: f64 = 1.380649e-23;

/// Energy unit of the exchange/anisotropy constants; fixes k_B.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EnergyUnit {
    Adim,
    Mev,
    Joule,
}

impl EnergyUnit {
    pub fn kb(&self) -> f64 {
        match self {
            Self::Adim => 1.0,
            Self::Mev => KB_MEV,
            Self::Joule => KB_JOULE,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Adim => "adim",
            Self::Mev => "mev",
            Self::Joule => "joule",
        }
    }
}

impl TryFrom<&str> for EnergyUnit {
    type Error = LlgError;
    fn try_from(s: &str) -> Result<Self, Self::Error> {
        match s.to_ascii_lowercase().as_str() {
            "adim" | "adimensional" => Ok(Self::Adim),
            "mev" => Ok(Self::Mev),
            "joule" | "joules" | "j" => Ok(Self::Joule),
            _ => Err(LlgError::UnknownEnergyUnit(s.to_string())),
        }
    }
}

/// Global physical parameters of a system.
///
/// `kb` is derived from `energy_unit` once, here, and is only readable.
#[derive(Debug, Clone, Serialize)]
pub struct Parameters {
    energy_unit: EnergyUnit,
    damping: f64,
    gyromagnetic: f64,
    delta_time: f64,
    kb: f64,
}

impl Parameters {
    pub fn new(energy_unit: EnergyUnit, damping: f64, gyromagnetic: f64, delta_time: f64) -> Self {
        Self {
            energy_unit,
            damping,
            gyromagnetic,
            delta_time,
            kb: energy_unit.kb(),
        }
    }

    pub fn energy_unit(&self) -> EnergyUnit {
        self.energy_unit
    }

    pub fn damping(&self) -> f64 {
        self.damping
    }

    pub fn gyromagnetic(&self) -> f64 {
        self.gyromagnetic
    }

    pub fn delta_time(&self) -> f64 {
        self.delta_time
    }

    pub fn kb(&self) -> f64 {
        self.kb
    }

    /// Integrator view of these parameters.
    pub fn llg(&self) -> LLGParams {
        LLGParams {
            gamma: self.gyromagnetic,
            alpha: self.damping,
            dt: self.delta_time,
            kb: self.kb,
            parallel: true,
        }
    }
}

impl Default for Parameters {
    fn default() -> Self {
        Self::new(EnergyUnit::Adim, 0.1, 1.0, 1e-3)
    }
}

/// Parameters consumed by the Heun step.
#[derive(Debug, Clone, Copy)]
pub struct LLGParams {
    pub gamma: f64, // gyromagnetic ratio
    pub alpha: f64, // damping
    pub dt: f64,    // fixed time step
    pub kb: f64,    // Boltzmann constant in the lattice energy unit

    /// Spread the per-site field and torque passes over the rayon pool.
    /// Results are identical either way; thermal noise is always drawn serially.
    pub parallel: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kb_follows_energy_unit() {
        assert_eq!(Parameters::new(EnergyUnit::Adim, 0.1, 1.0, 1e-3).kb(), 1.0);
        assert_eq!(Parameters::new(EnergyUnit::Mev, 0.1, 1.0, 1e-3).kb(), 0.08618);
        assert_eq!(Parameters::new(EnergyUnit::Joule, 0.1, 1.0, 1e-3).kb(), 1.380649e-23);
    }

    #[test]
    fn unknown_energy_unit_is_rejected() {
        assert!(matches!(
            EnergyUnit::try_from("erg"),
            Err(LlgError::UnknownEnergyUnit(_))
        ));
        assert_eq!(EnergyUnit::try_from("meV").unwrap(), EnergyUnit::Mev);
    }

    #[test]
    fn legacy_unit_spellings_are_accepted() {
        assert_eq!(EnergyUnit::try_from("joules").unwrap(), EnergyUnit::Joule);
        assert_eq!(EnergyUnit::try_from("J").unwrap(), EnergyUnit::Joule);
        assert_eq!(EnergyUnit::try_from("adimensional").unwrap(), EnergyUnit::Adim);
    }

    #[test]
    fn llg_view_copies_parameters() {
        let p = Parameters::new(EnergyUnit::Mev, 0.5, 2.0, 1e-4);
        let llg = p.llg();
        assert_eq!(llg.alpha, 0.5);
        assert_eq!(llg.gamma, 2.0);
        assert_eq!(llg.dt, 1e-4);
        assert_eq!(llg.kb, KB_MEV);
        assert!(llg.parallel);
    }
}
