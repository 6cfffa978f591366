// src/lattice.rs
//
// Lattice model: sites, their static properties and the exchange graph.
//
// Construction is two-phase. `LatticeBuilder` collects sites and neighbour
// links in adjacency-list form; `build()` validates them and freezes the graph
// into an `ExchangeTable` (dense when every site has the same coordination
// number, CSR otherwise) that the field/energy loops index without chasing
// pointers.

use std::collections::HashSet;

use serde::Serialize;

use crate::error::{LlgError, Result};

/// One exchange bond as seen from its source site.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ExchangeInteraction {
    pub neighbor: usize,
    pub jex: f64,
}

/// Directed link `source -> target` with exchange constant `jex`.
///
/// A symmetric bond is two links, one in each direction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NeighborLink {
    pub source: usize,
    pub target: usize,
    pub jex: f64,
}

impl NeighborLink {
    pub fn new(source: usize, target: usize, jex: f64) -> Self {
        Self { source, target, jex }
    }
}

/// One lattice point.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Site {
    pub index: usize,
    /// Informational only; never read by the integrator.
    pub position: [f64; 3],
    /// Species tag used to group observables.
    pub kind: String,
    pub mu: f64,
    pub anisotropy_constant: f64,
    pub anisotropy_axis: [f64; 3],
    pub field_axis: [f64; 3],
    interactions: Vec<ExchangeInteraction>,
}

impl Site {
    pub fn new(index: usize, position: [f64; 3], kind: impl Into<String>, mu: f64) -> Self {
        Self {
            index,
            position,
            kind: kind.into(),
            mu,
            anisotropy_constant: 0.0,
            anisotropy_axis: [0.0, 0.0, 1.0],
            field_axis: [0.0, 0.0, 1.0],
            interactions: Vec::new(),
        }
    }

    pub fn with_anisotropy(mut self, k: f64, axis: [f64; 3]) -> Self {
        self.anisotropy_constant = k;
        self.anisotropy_axis = axis;
        self
    }

    pub fn with_field_axis(mut self, axis: [f64; 3]) -> Self {
        self.field_axis = axis;
        self
    }

    /// Attach an exchange interaction owned by this site (sample files that
    /// embed `jex_interactions` per site use this instead of links).
    pub fn with_interaction(mut self, neighbor: usize, jex: f64) -> Self {
        self.interactions.push(ExchangeInteraction { neighbor, jex });
        self
    }

    pub fn interactions(&self) -> &[ExchangeInteraction] {
        &self.interactions
    }

    fn validate(&self) -> Result<()> {
        let invalid = |message: &str| LlgError::InvalidSite {
            index: self.index,
            message: message.to_string(),
        };
        if !self.mu.is_finite() {
            return Err(invalid("mu must be finite"));
        }
        if !self.anisotropy_constant.is_finite() {
            return Err(invalid("anisotropy_constant must be finite"));
        }
        if !self.anisotropy_axis.iter().all(|c| c.is_finite()) {
            return Err(invalid("anisotropy_axis must be finite"));
        }
        if !self.field_axis.iter().all(|c| c.is_finite()) {
            return Err(invalid("field_axis must be finite"));
        }
        Ok(())
    }
}

/// Frozen exchange graph.
///
/// Both layouts expose the same per-site row view through [`ExchangeTable::row`].
#[derive(Debug, Clone, PartialEq)]
pub enum ExchangeTable {
    /// Row `i` lives in `neighbors[offsets[i]..offsets[i + 1]]`.
    Csr {
        offsets: Vec<usize>,
        neighbors: Vec<usize>,
        jex: Vec<f64>,
    },
    /// Row-major `(num_sites, width)` matrices; every site has `width` neighbours.
    Dense {
        num_sites: usize,
        width: usize,
        neighbors: Vec<usize>,
        jex: Vec<f64>,
    },
}

impl ExchangeTable {
    /// Dense layout when coordination is uniform, CSR otherwise.
    pub fn from_rows(rows: &[Vec<ExchangeInteraction>]) -> Self {
        Self::dense(rows).unwrap_or_else(|| Self::csr(rows))
    }

    pub fn csr(rows: &[Vec<ExchangeInteraction>]) -> Self {
        let total: usize = rows.iter().map(Vec::len).sum();
        let mut offsets = Vec::with_capacity(rows.len() + 1);
        let mut neighbors = Vec::with_capacity(total);
        let mut jex = Vec::with_capacity(total);

        offsets.push(0);
        for row in rows {
            for it in row {
                neighbors.push(it.neighbor);
                jex.push(it.jex);
            }
            offsets.push(neighbors.len());
        }

        Self::Csr {
            offsets,
            neighbors,
            jex,
        }
    }

    /// `None` if the rows have different lengths.
    pub fn dense(rows: &[Vec<ExchangeInteraction>]) -> Option<Self> {
        let width = rows.first().map(Vec::len).unwrap_or(0);
        if rows.iter().any(|r| r.len() != width) {
            return None;
        }

        let mut neighbors = Vec::with_capacity(rows.len() * width);
        let mut jex = Vec::with_capacity(rows.len() * width);
        for row in rows {
            for it in row {
                neighbors.push(it.neighbor);
                jex.push(it.jex);
            }
        }

        Some(Self::Dense {
            num_sites: rows.len(),
            width,
            neighbors,
            jex,
        })
    }

    pub fn num_sites(&self) -> usize {
        match self {
            Self::Csr { offsets, .. } => offsets.len().saturating_sub(1),
            Self::Dense { num_sites, .. } => *num_sites,
        }
    }

    pub fn is_dense(&self) -> bool {
        matches!(self, Self::Dense { .. })
    }

    /// Neighbour indices and exchange constants of site `i`.
    #[inline]
    pub fn row(&self, i: usize) -> (&[usize], &[f64]) {
        match self {
            Self::Csr {
                offsets,
                neighbors,
                jex,
            } => {
                let (a, b) = (offsets[i], offsets[i + 1]);
                (&neighbors[a..b], &jex[a..b])
            }
            Self::Dense {
                width,
                neighbors,
                jex,
                ..
            } => {
                let a = i * width;
                (&neighbors[a..a + width], &jex[a..a + width])
            }
        }
    }

    pub fn num_neighbors(&self, i: usize) -> usize {
        self.row(i).0.len()
    }

    /// Largest coordination number.
    pub fn max_neighbors(&self) -> usize {
        match self {
            Self::Dense { width, .. } => *width,
            Self::Csr { offsets, .. } => offsets
                .windows(2)
                .map(|w| w[1] - w[0])
                .max()
                .unwrap_or(0),
        }
    }

    /// Total number of directed bonds.
    pub fn num_links(&self) -> usize {
        match self {
            Self::Csr { neighbors, .. } | Self::Dense { neighbors, .. } => neighbors.len(),
        }
    }
}

/// Mutable adjacency-list phase of lattice construction.
#[derive(Debug, Default)]
pub struct LatticeBuilder {
    sites: Vec<Site>,
    links: Vec<NeighborLink>,
    force_csr: bool,
}

impl LatticeBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_site(&mut self, site: Site) -> &mut Self {
        self.sites.push(site);
        self
    }

    pub fn add_link(&mut self, link: NeighborLink) -> &mut Self {
        self.links.push(link);
        self
    }

    /// Convenience for a symmetric bond (two directed links).
    pub fn add_bond(&mut self, a: usize, b: usize, jex: f64) -> &mut Self {
        self.links.push(NeighborLink::new(a, b, jex));
        self.links.push(NeighborLink::new(b, a, jex));
        self
    }

    /// Keep the CSR layout even when coordination is uniform.
    pub fn force_csr(&mut self, yes: bool) -> &mut Self {
        self.force_csr = yes;
        self
    }

    /// Validate and freeze.
    pub fn build(self) -> Result<Lattice> {
        let Self {
            mut sites,
            links,
            force_csr,
        } = self;

        let mut seen = HashSet::with_capacity(sites.len());
        for site in &sites {
            if !seen.insert(site.index) {
                return Err(LlgError::DuplicateSite(site.index));
            }
            site.validate()?;
        }

        // The index is the array offset.
        sites.sort_by_key(|s| s.index);
        let n = sites.len();
        if let Some(site) = sites.iter().enumerate().find(|(pos, s)| s.index != *pos) {
            return Err(LlgError::NonContiguousIndex {
                index: site.1.index,
                num_sites: n,
            });
        }

        for site in &sites {
            if let Some(it) = site.interactions.iter().find(|it| it.neighbor >= n) {
                return Err(LlgError::DanglingNeighbor {
                    from: site.index,
                    to: it.neighbor,
                    missing: it.neighbor,
                });
            }
        }

        for link in &links {
            let missing = if link.source >= n {
                Some(link.source)
            } else if link.target >= n {
                Some(link.target)
            } else {
                None
            };
            if let Some(missing) = missing {
                return Err(LlgError::DanglingNeighbor {
                    from: link.source,
                    to: link.target,
                    missing,
                });
            }
            sites[link.source].interactions.push(ExchangeInteraction {
                neighbor: link.target,
                jex: link.jex,
            });
        }

        Ok(Lattice::freeze(sites, force_csr))
    }
}

/// Immutable, validated lattice plus its flattened per-site views.
#[derive(Debug, Clone)]
pub struct Lattice {
    sites: Vec<Site>,
    mu: Vec<f64>,
    field_axes: Vec<[f64; 3]>,
    anisotropy_constants: Vec<f64>,
    anisotropy_axes: Vec<[f64; 3]>,
    exchange: ExchangeTable,
}

impl Lattice {
    /// Build from sites and directed neighbour links.
    pub fn build(sites: Vec<Site>, links: Vec<NeighborLink>) -> Result<Self> {
        let mut builder = LatticeBuilder::new();
        for site in sites {
            builder.add_site(site);
        }
        for link in links {
            builder.add_link(link);
        }
        builder.build()
    }

    fn freeze(sites: Vec<Site>, force_csr: bool) -> Self {
        let rows: Vec<Vec<ExchangeInteraction>> =
            sites.iter().map(|s| s.interactions.clone()).collect();
        let exchange = if force_csr {
            ExchangeTable::csr(&rows)
        } else {
            ExchangeTable::from_rows(&rows)
        };

        Self {
            mu: sites.iter().map(|s| s.mu).collect(),
            field_axes: sites.iter().map(|s| s.field_axis).collect(),
            anisotropy_constants: sites.iter().map(|s| s.anisotropy_constant).collect(),
            anisotropy_axes: sites.iter().map(|s| s.anisotropy_axis).collect(),
            exchange,
            sites,
        }
    }

    pub fn num_sites(&self) -> usize {
        self.sites.len()
    }

    pub fn sites(&self) -> &[Site] {
        &self.sites
    }

    pub fn mu(&self) -> &[f64] {
        &self.mu
    }

    pub fn field_axes(&self) -> &[[f64; 3]] {
        &self.field_axes
    }

    pub fn anisotropy_constants(&self) -> &[f64] {
        &self.anisotropy_constants
    }

    pub fn anisotropy_axes(&self) -> &[[f64; 3]] {
        &self.anisotropy_axes
    }

    pub fn exchange(&self) -> &ExchangeTable {
        &self.exchange
    }

    pub fn positions(&self) -> Vec<[f64; 3]> {
        self.sites.iter().map(|s| s.position).collect()
    }

    pub fn kinds(&self) -> Vec<String> {
        self.sites.iter().map(|s| s.kind.clone()).collect()
    }
}
