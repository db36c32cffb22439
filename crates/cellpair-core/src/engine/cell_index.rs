use crate::core::distance::{BoxGeometry, DistancePolicy, Periodic, position};
use crate::engine::error::ConfigError;
use itertools::Itertools;
use nalgebra::SVector;
use tracing::debug;

/// Uniform spatial grid over the simulation box.
///
/// The grid geometry and the list of cell pairs that may hold interacting particles are fixed
/// at construction. Cell membership is recomputed from scratch by [`CellIndex::rebuild`] for
/// every configuration, using a counting sort so that each cell lists its particles in
/// ascending index order.
///
/// Cell edges are at least `cutoff / cell_scale` long. The neighbor search reaches
/// `ceil(cutoff / edge)` cells in each direction, so every pair closer than the cutoff lies
/// in one of the recorded cell pairs.
#[derive(Debug, Clone)]
pub struct CellIndex<const D: usize> {
    periodic: Option<Periodic<D>>,
    cells_per_dim: [usize; D],
    strides: [usize; D],
    inv_cell_width: SVector<f64, D>,
    shells: [usize; D],
    cell_pairs: Vec<(usize, usize)>,
    cell_start: Vec<usize>,
    members: Vec<usize>,
    particle_cell: Vec<usize>,
}

impl<const D: usize> CellIndex<D> {
    pub fn new(
        geometry: &BoxGeometry<D>,
        cutoff: f64,
        cell_scale: f64,
        capacity: usize,
    ) -> Result<Self, ConfigError> {
        if !cutoff.is_finite() {
            return Err(ConfigError::InvalidCutoff(cutoff));
        }
        geometry.check_cutoff(cutoff)?;
        if !(cell_scale > 0.0) || !cell_scale.is_finite() {
            return Err(ConfigError::InvalidCellScale(cell_scale));
        }
        if !geometry.is_periodic() && cutoff > geometry.diagonal() {
            return Err(ConfigError::CutoffExceedsBoxDiagonal {
                cutoff,
                diagonal: geometry.diagonal(),
            });
        }

        let target_width = cutoff / cell_scale;
        let lengths = geometry.lengths();
        let mut cells_per_dim = [1usize; D];
        let mut shells = [0usize; D];
        let mut inv_cell_width = SVector::<f64, D>::zeros();
        for dim in 0..D {
            let cells = ((lengths[dim] / target_width).floor() as usize).max(1);
            let width = lengths[dim] / cells as f64;
            let reach = ((cutoff / width).ceil() as usize).max(1);
            if geometry.is_periodic() && cells < 2 * reach + 1 {
                return Err(ConfigError::DomainTooSmall {
                    dim,
                    cells,
                    required: 2 * reach + 1,
                });
            }
            cells_per_dim[dim] = cells;
            // an open grid never needs to look further than its own extent
            shells[dim] = if geometry.is_periodic() {
                reach
            } else {
                reach.min(cells - 1)
            };
            inv_cell_width[dim] = 1.0 / width;
        }

        let mut strides = [1usize; D];
        for dim in 1..D {
            strides[dim] = strides[dim - 1] * cells_per_dim[dim - 1];
        }
        let total_cells = strides[D - 1] * cells_per_dim[D - 1];

        let mut index = Self {
            periodic: geometry
                .is_periodic()
                .then(|| Periodic::from_geometry(geometry)),
            cells_per_dim,
            strides,
            inv_cell_width,
            shells,
            cell_pairs: Vec::new(),
            cell_start: vec![0; total_cells + 1],
            members: Vec::with_capacity(capacity),
            particle_cell: Vec::with_capacity(capacity),
        };
        index.cell_pairs = index.enumerate_cell_pairs();

        debug!(
            cells_per_dim = ?index.cells_per_dim,
            shells = ?index.shells,
            cell_pairs = index.cell_pairs.len(),
            "Constructed cell index."
        );
        Ok(index)
    }

    pub fn cells_per_dim(&self) -> [usize; D] {
        self.cells_per_dim
    }

    /// Neighbor search reach, in cells, along each dimension.
    pub fn shells(&self) -> [usize; D] {
        self.shells
    }

    pub fn cell_count(&self) -> usize {
        self.cell_start.len() - 1
    }

    /// Unique unordered cell pairs `(a, b)` with `a <= b`; `a == b` marks a cell paired with itself.
    pub fn cell_pairs(&self) -> &[(usize, usize)] {
        &self.cell_pairs
    }

    pub fn members(&self, cell: usize) -> &[usize] {
        &self.members[self.cell_start[cell]..self.cell_start[cell + 1]]
    }

    /// Cell holding `particle` after the latest rebuild.
    pub fn cell_of(&self, particle: usize) -> Option<usize> {
        self.particle_cell.get(particle).copied()
    }

    pub fn particle_count(&self) -> usize {
        self.particle_cell.len()
    }

    fn enumerate_cell_pairs(&self) -> Vec<(usize, usize)> {
        let offsets: Vec<Vec<isize>> = (0..D)
            .map(|dim| {
                let s = self.shells[dim] as isize;
                -s..=s
            })
            .multi_cartesian_product()
            .collect();

        let mut pairs = Vec::new();
        for cell in (0..D).map(|dim| 0..self.cells_per_dim[dim]).multi_cartesian_product() {
            let a = self.linear_index(&cell);
            for offset in &offsets {
                if let Some(b) = self.neighbor(&cell, offset) {
                    if a <= b {
                        pairs.push((a, b));
                    }
                }
            }
        }
        pairs
    }

    fn neighbor(&self, cell: &[usize], offset: &[isize]) -> Option<usize> {
        let mut linear = 0;
        for dim in 0..D {
            let n = self.cells_per_dim[dim] as isize;
            let mut c = cell[dim] as isize + offset[dim];
            if self.periodic.is_some() {
                c = c.rem_euclid(n);
            } else if c < 0 || c >= n {
                return None;
            }
            linear += c as usize * self.strides[dim];
        }
        Some(linear)
    }

    #[inline]
    fn linear_index(&self, cell: &[usize]) -> usize {
        cell.iter()
            .zip(self.strides.iter())
            .map(|(c, stride)| c * stride)
            .sum()
    }

    #[inline]
    fn locate(&self, mut pos: SVector<f64, D>) -> usize {
        if let Some(periodic) = &self.periodic {
            periodic.wrap(&mut pos);
        }
        let mut linear = 0;
        for dim in 0..D {
            let max = self.cells_per_dim[dim] - 1;
            // points outside an open box land in the nearest boundary cell
            let c = (pos[dim] * self.inv_cell_width[dim]).floor();
            let c = if c <= 0.0 {
                0
            } else {
                (c as usize).min(max)
            };
            linear += c * self.strides[dim];
        }
        linear
    }

    /// Reassigns every particle of `coords` to its cell. `coords.len()` must be a multiple of `D`.
    pub fn rebuild(&mut self, coords: &[f64]) {
        let n = coords.len() / D;
        let mut particle_cell = std::mem::take(&mut self.particle_cell);
        particle_cell.clear();
        particle_cell.extend((0..n).map(|i| self.locate(position::<D>(coords, i))));
        self.particle_cell = particle_cell;

        self.cell_start.iter_mut().for_each(|s| *s = 0);
        for &cell in &self.particle_cell {
            self.cell_start[cell + 1] += 1;
        }
        for cell in 1..self.cell_start.len() {
            self.cell_start[cell] += self.cell_start[cell - 1];
        }

        let mut cursor = self.cell_start.clone();
        self.members.clear();
        self.members.resize(n, 0);
        for (particle, &cell) in self.particle_cell.iter().enumerate() {
            self.members[cursor[cell]] = particle;
            cursor[cell] += 1;
        }
    }

    /// Visits each candidate pair `(i, j)`, `i < j`, drawn from the cell pair `cell_pair`.
    pub fn try_for_each_pair_in<E, F>(&self, cell_pair: (usize, usize), mut f: F) -> Result<(), E>
    where
        F: FnMut(usize, usize) -> Result<(), E>,
    {
        let (a, b) = cell_pair;
        let members_a = self.members(a);
        if a == b {
            for (x, &i) in members_a.iter().enumerate() {
                for &j in &members_a[x + 1..] {
                    f(i, j)?;
                }
            }
        } else {
            let members_b = self.members(b);
            for &i in members_a {
                for &j in members_b {
                    if i < j { f(i, j)? } else { f(j, i)? }
                }
            }
        }
        Ok(())
    }

    /// All candidate pairs for the latest rebuild, each reported once with `i < j`.
    pub fn candidate_pairs(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.cell_pairs.iter().flat_map(move |&(a, b)| {
            let members_a = self.members(a);
            let members_b = self.members(b);
            members_a
                .iter()
                .enumerate()
                .flat_map(move |(x, &i)| {
                    let partners = if a == b { &members_a[x + 1..] } else { members_b };
                    partners.iter().map(move |&j| (i.min(j), i.max(j)))
                })
        })
    }
}
