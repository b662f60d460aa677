//! # The basis matrix
//!
//! Keeps the vectors that are currently basic together with a factorization of the matrix they
//! form. On each change of the basis, it is decided whether the factorization is updated or
//! recomputed.
use std::fmt;
use std::fmt::Display;
use std::mem;

use enum_map::{Enum, EnumMap};
use log::{debug, trace};

use crate::algorithm::basis::descriptor::{Descriptor, Status, dual_id_status, primal_id_status};
use crate::algorithm::basis::factorization::{Factorization, FactorizationError, FactorizationStatus};
use crate::algorithm::matrix_provider::MatrixProvider;
use crate::data::linear_algebra::SparseTuple;
use crate::data::linear_algebra::vector::{DenseVector, SparseVector};
use crate::data::linear_program::elements::{Representation, Tolerances, VectorId};

pub mod descriptor;
pub mod exchange;
pub mod factorization;


/// State of the basis.
///
/// Ordered: a basis is usable for solves when it is larger than `Singular`.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum BasisStatus {
    /// No linear program is loaded.
    NoProblem,
    /// The last factorization found the basis matrix to be singular.
    Singular,
    /// The basis matrix is nonsingular, as far as known.
    Regular,
}

/// Reason for computing a factorization from scratch during a change of the basis.
#[derive(Enum, Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum RefactorTrigger {
    /// There was no factorization yet.
    NotFactorized,
    /// Memory grew too much relative to the memory right after the last factorization.
    Fill,
    /// Memory grew too much relative to the number of nonzeros in the basis matrix.
    Nonzeros,
    /// The maximum number of updates was reached.
    Updates,
    /// The update left the engine in a bad state or unstable.
    Stability,
}

/// Parameters of the refactorization decision.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct BasisSettings {
    /// Number of updates after which the factorization is always recomputed.
    pub max_updates: usize,
    /// Refactorize when the engine memory exceeds this multiple of the basis matrix nonzeros.
    pub nonzero_factor: f64,
    /// Refactorize when the engine memory exceeds this multiple of the memory right after the last
    /// factorization.
    pub fill_factor: f64,
    /// Pairs `(threshold, multiplier)`, applied in order to the stability of a fresh factorization
    /// to get the minimum accepted stability: while above the threshold, multiply.
    pub stability_damping: [(f64, f64); 3],
    #[allow(missing_docs)]
    pub tolerances: Tolerances,
}

impl Default for BasisSettings {
    fn default() -> Self {
        Self {
            max_updates: 200,
            nonzero_factor: 10.0,
            fill_factor: 5.0,
            stability_damping: [(1e-4, 1e-3), (1e-5, 1e-2), (1e-6, 1e-1)],
            tolerances: Tolerances::default(),
        }
    }
}

/// A vector entering the basis.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Entering<'lp> {
    /// Row or column that enters.
    pub id: VectorId,
    /// Its vector in the current representation.
    pub vector: &'lp [SparseTuple<f64>],
}

/// Basis of a linear program of which the vectors are borrowed for the lifetime `'lp`.
///
/// Slots are the positions of the basis matrix columns; slot `k` holds the vector of
/// `base_id(k)`.
pub struct BasisMatrix<'lp, MP, E> {
    provider: Option<&'lp MP>,
    representation: Representation,
    descriptor: Descriptor,

    base_ids: Vec<VectorId>,
    matrix: Vec<&'lp [SparseTuple<f64>]>,
    matrix_is_setup: bool,

    factor: E,
    factorized: bool,
    status: BasisStatus,

    settings: BasisSettings,
    /// Number of changes since the last load of a description.
    iteration_count: usize,
    /// Number of changes since the last factorization.
    update_count: usize,
    /// Total number of nonzeros in the basis matrix.
    nz_count: usize,
    min_stab: f64,
    last_fill: f64,
    last_mem: usize,

    last_in: Option<VectorId>,
    last_out: Option<VectorId>,
    last_index: Option<usize>,

    refactorizations: EnumMap<RefactorTrigger, usize>,
}

impl<'lp, MP, E> BasisMatrix<'lp, MP, E>
where
    MP: MatrixProvider,
    E: Factorization,
{
    /// Create a basis without a problem.
    pub fn new(factor: E, settings: BasisSettings) -> Self {
        Self {
            provider: None,
            representation: Representation::Column,
            descriptor: Descriptor::new(Vec::new(), Vec::new()),

            base_ids: Vec::new(),
            matrix: Vec::new(),
            matrix_is_setup: false,

            factor,
            factorized: false,
            status: BasisStatus::NoProblem,

            settings,
            iteration_count: 0,
            update_count: 0,
            nz_count: 0,
            min_stab: 0.0,
            last_fill: 0.0,
            last_mem: 0,

            last_in: None,
            last_out: None,
            last_index: None,

            refactorizations: EnumMap::default(),
        }
    }

    /// Bind to a linear program and load its slack basis.
    pub fn load(&mut self, provider: &'lp MP) {
        self.provider = Some(provider);
        self.representation = provider.representation();
        self.status = BasisStatus::Regular;
        self.min_stab = 0.0;

        let descriptor = Descriptor::slack(provider, &self.settings.tolerances);
        self.load_desc(descriptor);
    }

    /// Load a description of the basis.
    ///
    /// # Arguments
    ///
    /// * `descriptor`: Should describe as many rows and columns as the loaded problem has, and
    /// exactly `dimension` of them should be basic.
    pub fn load_desc(&mut self, descriptor: Descriptor) {
        let provider = self.provider();
        assert_eq!(descriptor.nr_rows(), provider.nr_rows(), "row count of description doesn't match");
        assert_eq!(
            descriptor.nr_columns(), provider.nr_columns(),
            "column count of description doesn't match",
        );

        self.base_ids = descriptor.basic_ids(self.representation).collect();
        assert_eq!(
            self.base_ids.len(), provider.dimension(),
            "description has {} basic vectors, the dimension is {}", self.base_ids.len(), provider.dimension(),
        );
        self.matrix = self.base_ids.iter().map(|&id| provider.vector(id)).collect();
        self.nz_count = self.matrix.iter().map(|vector| vector.len()).sum();
        self.descriptor = descriptor;

        self.last_in = None;
        self.last_out = None;
        self.last_index = None;
        self.iteration_count = 0;
        self.update_count = 0;

        self.matrix_is_setup = true;
        self.factorized = false;
        self.factor.clear();
        debug!("Loaded basis description with {} nonzeros, factorization invalidated", self.nz_count);
    }

    /// Follow a change of the representation of the loaded problem.
    ///
    /// The description is kept, the basis matrix is rebuilt lazily.
    pub fn set_rep(&mut self) {
        let provider = self.provider();
        self.representation = provider.representation();
        self.base_ids.clear();
        self.matrix.clear();
        self.matrix_is_setup = false;
        self.factorized = false;
        self.factor.clear();
        self.min_stab = 0.0;
        debug!("Representation set to {:?}, factorization invalidated", self.representation);
    }

    /// Replace the factorization engine.
    ///
    /// # Return value
    ///
    /// The previous engine.
    pub fn load_solver(&mut self, factor: E) -> E {
        let mut old = mem::replace(&mut self.factor, factor);
        old.clear();
        self.factor.clear();
        self.factorized = false;
        debug!("Factorization engine replaced");

        old
    }

    /// Exchange a basic vector for a nonbasic one.
    ///
    /// # Arguments
    ///
    /// * `slot`: Position of the leaving vector.
    /// * `entering`: The vector replacing it. If either this or `slot` is absent, nothing changes
    /// apart from the record of what left.
    /// * `eta`: The entering vector expressed in the current basis, if it is known already.
    ///
    /// # Errors
    ///
    /// When the engine reports a status that is neither ok nor singular while refactorizing.
    pub fn change(
        &mut self,
        slot: Option<usize>,
        entering: Option<Entering<'lp>>,
        eta: Option<&SparseVector<f64>>,
    ) -> Result<(), FactorizationError> {
        let (slot, entering) = match (slot, entering) {
            (Some(slot), Some(entering)) => (slot, entering),
            _ => {
                self.last_index = slot;
                self.last_in = entering.map(|entering| entering.id);
                self.last_out = self.last_in;
                return Ok(());
            },
        };

        if !self.matrix_is_setup {
            self.load_desc(self.descriptor.clone());
        }
        self.last_index = Some(slot);
        self.last_in = Some(entering.id);
        assert!(
            slot < self.matrix.len(),
            "slot {} is out of range for a basis of dimension {}", slot, self.matrix.len(),
        );

        let leaving = self.base_ids[slot];
        self.nz_count = self.nz_count - self.matrix[slot].len() + entering.vector.len();
        self.matrix[slot] = entering.vector;
        self.base_ids[slot] = entering.id;
        self.last_out = Some(leaving);
        self.update_descriptor(entering.id, leaving);

        self.iteration_count += 1;
        self.update_count += 1;

        let memory = self.factor.memory() as f64;
        let trigger = if !self.factorized {
            Some(RefactorTrigger::NotFactorized)
        } else if memory > self.settings.fill_factor * self.last_mem as f64 {
            debug!(
                "Fill triggers refactorization: memory {}, last memory {}, fill factor {}",
                memory, self.last_mem, self.settings.fill_factor,
            );
            Some(RefactorTrigger::Fill)
        } else if memory > self.settings.nonzero_factor * self.nz_count as f64 {
            debug!(
                "Nonzeros trigger refactorization: memory {}, nonzeros {}, nonzero factor {}",
                memory, self.nz_count, self.settings.nonzero_factor,
            );
            Some(RefactorTrigger::Nonzeros)
        } else if self.update_count >= self.settings.max_updates {
            debug!(
                "Update count triggers refactorization: {} updates, maximum {}",
                self.update_count, self.settings.max_updates,
            );
            Some(RefactorTrigger::Updates)
        } else {
            let status = self.factor.change(slot, entering.vector, eta);
            let stability = self.factor.stability();
            if status != FactorizationStatus::Ok || stability < self.min_stab {
                debug!(
                    "Stability triggers refactorization: status {}, stability {:e}, minimum {:e}",
                    status, stability, self.min_stab,
                );
                Some(RefactorTrigger::Stability)
            } else {
                trace!("Updated factorization in slot {}, stability {:e}", slot, stability);
                None
            }
        };

        match trigger {
            Some(trigger) => {
                self.refactorizations[trigger] += 1;
                self.factorize()
            },
            None => Ok(()),
        }
    }

    /// Compute the factorization of the basis matrix from scratch.
    ///
    /// A singular basis matrix is not an error, it is reflected in `status`.
    ///
    /// # Errors
    ///
    /// When the engine reports a status that is neither ok nor singular.
    pub fn factorize(&mut self) -> Result<(), FactorizationError> {
        if !self.matrix_is_setup {
            self.load_desc(self.descriptor.clone());
        }
        debug_assert!(self.matrix_is_setup);

        self.update_count = 0;

        match self.factor.load(&self.matrix) {
            FactorizationStatus::Ok => {
                if self.status == BasisStatus::Singular {
                    self.status = BasisStatus::Regular;
                }

                self.min_stab = self.settings.stability_damping.iter()
                    .fold(self.factor.stability(), |min_stab, &(threshold, multiplier)| {
                        if min_stab > threshold { min_stab * multiplier } else { min_stab }
                    });
            },
            FactorizationStatus::Singular => {
                debug!("Basis matrix of dimension {} is singular", self.matrix.len());
                self.status = BasisStatus::Singular;
            },
            other => return Err(FactorizationError::Unexpected(other)),
        }

        self.last_mem = self.factor.memory();
        self.last_fill = self.settings.fill_factor * self.last_mem as f64 / self.nz_count.max(1) as f64;
        self.factorized = true;
        trace!("Factorized with memory {} and minimum stability {:e}", self.last_mem, self.min_stab);

        Ok(())
    }

    /// Compute `x <- B x` with `B` the basis matrix.
    pub fn mult_with_base(&mut self, x: &mut DenseVector<f64>) {
        assert!(self.status > BasisStatus::Singular);
        if !self.matrix_is_setup {
            self.load_desc(self.descriptor.clone());
        }
        assert_eq!(x.len(), self.matrix.len());

        let mut result = DenseVector::zeros(x.len());
        for (slot, vector) in self.matrix.iter().enumerate() {
            result.mult_add(x[slot], vector);
        }
        *x = result;
    }

    /// Compute `x <- B^T x` with `B` the basis matrix.
    pub fn mult_base_with(&mut self, x: &mut DenseVector<f64>) {
        assert!(self.status > BasisStatus::Singular);
        if !self.matrix_is_setup {
            self.load_desc(self.descriptor.clone());
        }
        assert_eq!(x.len(), self.matrix.len());

        let result = self.matrix.iter()
            .map(|vector| x.inner_product_with_sparse(vector))
            .collect();
        *x = DenseVector::new(result);
    }

    /// Overwrite `rhs` with the solution of `B x = rhs`, factorizing first if needed.
    ///
    /// # Errors
    ///
    /// When a required factorization fails unexpectedly.
    pub fn solve(&mut self, rhs: &mut DenseVector<f64>) -> Result<(), FactorizationError> {
        self.ensure_factorized()?;
        self.factor.solve(rhs);

        Ok(())
    }

    /// Overwrite `rhs` with the solution of `B^T y = rhs`, factorizing first if needed.
    ///
    /// # Errors
    ///
    /// When a required factorization fails unexpectedly.
    pub fn co_solve(&mut self, rhs: &mut DenseVector<f64>) -> Result<(), FactorizationError> {
        self.ensure_factorized()?;
        self.factor.co_solve(rhs);

        Ok(())
    }

    fn ensure_factorized(&mut self) -> Result<(), FactorizationError> {
        assert!(self.status > BasisStatus::Singular);
        if !self.factorized {
            self.factorize()?;
        }
        assert_eq!(self.status, BasisStatus::Regular, "basis matrix is singular");

        Ok(())
    }

    /// Whether the description and the basis matrix agree with each other and the problem.
    pub fn is_consistent(&self) -> bool {
        let provider = match self.provider {
            Some(provider) => provider,
            None => return self.status == BasisStatus::NoProblem,
        };
        let tolerances = &self.settings.tolerances;

        if self.matrix_is_setup && self.matrix.len() != provider.dimension() {
            debug!("Basis has {} slots, dimension is {}", self.matrix.len(), provider.dimension());
            return false;
        }

        let ids = (0..provider.nr_rows()).map(|i| provider.row_id(i))
            .chain((0..provider.nr_columns()).map(|j| provider.column_id(j)));
        for id in ids {
            if let Status::Dual(status) = self.descriptor.status(id) {
                if status != dual_id_status(provider, id, tolerances) {
                    debug!("Dual status {:?} of {} doesn't match its bounds", status, id);
                    return false;
                }
            }
        }

        let nr_primal = self.descriptor.nr_primal();
        if nr_primal != provider.nr_columns() {
            debug!("{} primal statuses for {} columns", nr_primal, provider.nr_columns());
            return false;
        }

        true
    }

    fn update_descriptor(&mut self, entering: VectorId, leaving: VectorId) {
        let provider = self.provider();
        let representation = self.representation;
        let tolerances = self.settings.tolerances;
        let (basic, nonbasic) = match representation {
            Representation::Column => (
                Status::Dual(dual_id_status(provider, entering, &tolerances)),
                Status::Primal(primal_id_status(provider, leaving, &tolerances)),
            ),
            Representation::Row => (
                Status::Primal(primal_id_status(provider, entering, &tolerances)),
                Status::Dual(dual_id_status(provider, leaving, &tolerances)),
            ),
        };

        if !self.descriptor.status(entering).is_basic(representation) {
            self.descriptor.set_status(entering, basic);
        }
        if self.descriptor.status(leaving).is_basic(representation) {
            self.descriptor.set_status(leaving, nonbasic);
        }
    }

    fn provider(&self) -> &'lp MP {
        match self.provider {
            Some(provider) => provider,
            None => panic!("no problem loaded in the basis"),
        }
    }
}

impl<'lp, MP, E> BasisMatrix<'lp, MP, E> {
    /// Current state.
    pub fn status(&self) -> BasisStatus {
        self.status
    }

    /// Representation the basis was built for.
    pub fn representation(&self) -> Representation {
        self.representation
    }

    /// Description of the basis.
    pub fn desc(&self) -> &Descriptor {
        &self.descriptor
    }

    /// Number of slots in the basis matrix.
    pub fn dimension(&self) -> usize {
        self.base_ids.len()
    }

    /// Identifier of the vector in a slot.
    pub fn base_id(&self, slot: usize) -> VectorId {
        self.base_ids[slot]
    }

    /// Identifiers of the vectors in the basis, ordered by slot.
    pub fn base_ids(&self) -> &[VectorId] {
        &self.base_ids
    }

    /// Vector in a slot.
    pub fn base_vector(&self, slot: usize) -> &'lp [SparseTuple<f64>] {
        self.matrix[slot]
    }

    /// Identifier that entered during the last change.
    pub fn last_entered(&self) -> Option<VectorId> {
        self.last_in
    }

    /// Identifier that left during the last change.
    pub fn last_left(&self) -> Option<VectorId> {
        self.last_out
    }

    /// Slot of the last change.
    pub fn last_index(&self) -> Option<usize> {
        self.last_index
    }

    /// Number of changes since the description was loaded.
    pub fn iteration(&self) -> usize {
        self.iteration_count
    }

    /// Number of changes since the last factorization.
    pub fn last_update(&self) -> usize {
        self.update_count
    }

    /// Number of nonzeros in the basis matrix.
    pub fn nonzeros(&self) -> usize {
        self.nz_count
    }

    /// Smallest stability accepted after an update.
    pub fn min_stability(&self) -> f64 {
        self.min_stab
    }

    /// Fill ratio as measured at the last factorization.
    pub fn last_fill(&self) -> f64 {
        self.last_fill
    }

    /// Engine memory right after the last factorization.
    pub fn last_memory(&self) -> usize {
        self.last_mem
    }

    /// Whether a factorization was computed since the matrix last changed wholesale.
    pub fn is_factorized(&self) -> bool {
        self.factorized
    }

    /// How often a trigger caused a refactorization.
    pub fn refactorizations(&self, trigger: RefactorTrigger) -> usize {
        self.refactorizations[trigger]
    }

    /// The factorization engine.
    pub fn factor(&self) -> &E {
        &self.factor
    }

    /// Parameters of the refactorization decision.
    pub fn settings(&self) -> &BasisSettings {
        &self.settings
    }

    /// Change the maximum number of updates between factorizations.
    pub fn set_max_updates(&mut self, max_updates: usize) {
        self.settings.max_updates = max_updates;
    }

    /// Change the memory limit relative to the nonzeros of the basis matrix.
    pub fn set_nonzero_factor(&mut self, nonzero_factor: f64) {
        self.settings.nonzero_factor = nonzero_factor;
    }

    /// Change the memory limit relative to the memory right after the last factorization.
    pub fn set_fill_factor(&mut self, fill_factor: f64) {
        self.settings.fill_factor = fill_factor;
    }
}

impl<'lp, MP, E: Factorization> BasisMatrix<'lp, MP, E> {
    /// Stability reported by the engine.
    pub fn stability(&self) -> f64 {
        self.factor.stability()
    }
}

impl<'lp, MP, E> Display for BasisMatrix<'lp, MP, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Basis entries:")?;
        for (slot, id) in self.base_ids.iter().enumerate() {
            write!(f, "{:>5}: {:<8}", slot, id.to_string())?;
            if (slot + 1) % 8 == 0 {
                writeln!(f)?;
            }
        }
        if self.base_ids.len() % 8 != 0 {
            writeln!(f)?;
        }

        Ok(())
    }
}
