use super::*;

impl<T> ConstrainedQP<T>
where
    T: FloatT,
{
    fn check_constraint_index(&self, j: usize) -> Result<(), QPError> {
        if j >= self.block.m {
            return Err(QPError::IndexOutOfBounds {
                index: j,
                size: self.block.m,
            });
        }
        Ok(())
    }

    /// Removes constraint `j` from the problem.
    ///
    /// An inactive constraint is disabled at once.  An active one is
    /// marked and released at the start of the next hotstart, with its
    /// multiplier absorbed into the gradient.
    pub fn disable_constraint(&mut self, j: usize) -> Result<(), QPError> {
        self.check_constraint_index(j)?;
        let block = &mut self.block;
        match block.constraints.get_status(j) {
            status @ (SubjectToStatus::Lower | SubjectToStatus::Upper) => {
                block.disabling_side[j] = status;
                block.constraints.mark_disabling(j)?;
            }
            SubjectToStatus::Inactive => {
                block.constraints.move_inactive_to_disabled(j)?;
                self.core.y[self.core.n + j] = T::zero();
            }
            SubjectToStatus::Disabled | SubjectToStatus::Disabling => {
                self.core.print_warning("constraint is already disabled");
            }
        }
        Ok(())
    }

    /// Brings a disabled constraint back as inactive.  Its current data
    /// is relaxed around `A*x` so that the current iterate stays
    /// feasible, the next hotstart moves it to the target data.
    pub fn enable_constraint(&mut self, j: usize) -> Result<(), QPError> {
        self.check_constraint_index(j)?;
        match self.block.constraints.get_status(j) {
            SubjectToStatus::Disabled => {
                let settings = &self.core.settings;
                let (factor, offset) = (settings.enabling_factor, settings.enabling_offset);
                let block = &mut self.block;

                let ax = block.row_product(j, &self.core.x);
                let margin = factor * ax.abs() + offset;
                block.Ax[j] = ax;
                block.lbA[j] = T::min(block.lbA[j], ax - margin);
                block.ubA[j] = T::max(block.ubA[j], ax + margin);
                block.constraints.move_disabled_to_inactive(j)?;
                block.update_types(&self.work, &self.core.settings, self.core.inf);
                block.update_residuals();
                self.core.y[self.core.n + j] = T::zero();
            }
            SubjectToStatus::Disabling => {
                let block = &mut self.block;
                let side = block.disabling_side[j];
                block.constraints.set_status(j, side)?;
                block.disabling_side[j] = SubjectToStatus::Inactive;
            }
            _ => {
                self.core.print_warning("constraint is already enabled");
            }
        }
        Ok(())
    }

    pub fn is_constraint_enabled(&self, j: usize) -> Result<bool, QPError> {
        self.check_constraint_index(j)?;
        Ok(self.block.is_enabled(j))
    }
}
