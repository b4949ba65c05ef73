use super::*;
use crate::algebra::*;
use crate::io::{ConfigurablePrintTarget, PrintTarget};
use std::io::Write;

impl<T> ConfigurablePrintTarget for HomotopyCore<T>
where
    T: FloatT,
{
    fn print_to_stdout(&mut self) {
        self.stream.print_to_stdout()
    }
    fn print_to_file(&mut self, file: std::fs::File) {
        self.stream.print_to_file(file)
    }
    fn print_to_stream(&mut self, stream: Box<dyn Write + Send + Sync>) {
        self.stream.print_to_stream(stream)
    }
    fn print_to_sink(&mut self) {
        self.stream.print_to_sink()
    }
    fn print_to_buffer(&mut self) {
        self.stream.print_to_buffer()
    }
    fn get_print_buffer(&mut self) -> std::io::Result<String> {
        self.stream.get_print_buffer()
    }
}

// Output failures are never allowed to interrupt a solve, so the
// public printing entry points below swallow io errors.

impl<T> HomotopyCore<T>
where
    T: FloatT,
{
    fn level_at_least(&self, level: PrintLevel) -> bool {
        self.settings.print_level >= level
    }

    pub fn print_header(&mut self, engine: &str) {
        if !self.level_at_least(PrintLevel::Low) {
            return;
        }
        let _ = _print_header(&mut self.stream, engine, self.n, self.m, self.hessian_type);
        if self.level_at_least(PrintLevel::Medium) {
            let _ = _print_iteration_header(&mut self.stream);
        }
    }

    pub fn print_iteration(
        &mut self,
        iter: u32,
        tau: T,
        homotopy_length: T,
        blocking: Option<&Blocking>,
        n_active: usize,
    ) {
        if !self.level_at_least(PrintLevel::Medium) {
            return;
        }
        let change = match blocking {
            None => "-".to_string(),
            Some(b) => describe_blocking(b),
        };
        let _ = writeln!(
            self.stream,
            "{:>5}  {:>10.3e}  {:>10.3e}  {:>6}  {:>6}  {}",
            iter,
            tau,
            homotopy_length,
            self.bounds.n_fixed(),
            n_active,
            change
        );
    }

    /// Detailed trace of a single working set change
    pub fn print_change(&mut self, what: &str, index: usize, status: SubjectToStatus) {
        if !self.level_at_least(PrintLevel::High) {
            return;
        }
        let _ = writeln!(self.stream, "        {} {} -> {:?}", what, index, status);
    }

    pub fn print_footer(&mut self, status: SolverStatus, iterations: u32, solve_time: f64) {
        if !self.level_at_least(PrintLevel::Low) {
            return;
        }
        let objective = self.objective_value();
        let _ = _print_footer(&mut self.stream, status, iterations, solve_time, objective);
        if self.level_at_least(PrintLevel::High) {
            let _ = writeln!(self.stream, "timings:");
            let _ = self.timers.print(&mut self.stream);
        }
    }

    pub fn print_warning(&mut self, msg: &str) {
        if !self.level_at_least(PrintLevel::Low) {
            return;
        }
        let _ = writeln!(self.stream, "warning: {}", msg);
    }

    pub fn print_regularisation(&mut self) {
        if !self.level_at_least(PrintLevel::Medium) {
            return;
        }
        let _ = writeln!(
            self.stream,
            "regularising hessian with {:.3e} * I",
            self.reg_val
        );
    }

    /// Engine dimensions, working set sizes and key settings.  Always
    /// printed, whatever the print level.
    pub fn print_properties(&mut self, engine: &str, n_active: usize) -> std::io::Result<()> {
        let out = &mut self.stream;
        writeln!(out, "\n{} properties:", engine)?;
        writeln!(out, "  variables      = {}", self.n)?;
        writeln!(out, "  constraints    = {}", self.m)?;
        writeln!(out, "  hessian type   = {}", self.hessian_type)?;
        writeln!(out, "  regularisation = {:.3e}", self.reg_val)?;
        writeln!(out, "  free / fixed   = {} / {}", self.bounds.n_free(), self.bounds.n_fixed())?;
        writeln!(out, "  active         = {}", n_active)?;
        writeln!(out, "  state          = {}", self.status)?;
        writeln!(out, "  infinity       = {:.1e}", self.inf)?;
        writeln!(out, "settings:")?;
        let s = &self.settings;
        writeln!(out, "  max iter = {}, time limit = {}", s.max_iter, _fmt_time(s.time_limit))?;
        writeln!(out, "  print level = {:?}", s.print_level)?;
        writeln!(
            out,
            "  regularisation = {}, steps = {}, eps = {:.1e}",
            _bool_on_off(s.enable_regularisation),
            s.num_regularisation_steps,
            s.eps_regularisation
        )?;
        writeln!(
            out,
            "  refactorisation every {}, drift correction every {}",
            s.enable_cholesky_refactorisation, s.enable_drift_correction
        )?;
        writeln!(
            out,
            "  tol: termination = {:.1e}, bounds = {:.1e}, lin. independence = {:.1e}",
            s.termination_tolerance, s.bound_tolerance, s.eps_lin_independence
        )?;
        writeln!(out)?;
        out.flush()
    }
}

fn describe_blocking(b: &Blocking) -> String {
    let (what, index, status) = match *b {
        Blocking::Bound(i, s) => ("bnd", i, s),
        Blocking::Constraint(j, s) => ("con", j, s),
    };
    let action = match status {
        SubjectToStatus::Inactive => "rem",
        SubjectToStatus::Upper => "add(u)",
        _ => "add(l)",
    };
    format!("{} {} {}", action, what, index)
}

fn _print_header(
    out: &mut PrintTarget,
    engine: &str,
    n: usize,
    m: usize,
    hessian: HessianType,
) -> std::io::Result<()> {
    writeln!(out, "-------------------------------------------------------------")?;
    writeln!(out, "           hotqp v{}  -  {}", crate::VERSION, engine)?;
    writeln!(out, "-------------------------------------------------------------")?;
    writeln!(out, "  variables = {}, constraints = {}, hessian = {}", n, m, hessian)?;
    Ok(())
}

fn _print_iteration_header(out: &mut PrintTarget) -> std::io::Result<()> {
    writeln!(out)?;
    writeln!(out, " iter         tau      length    nFX    nAC  change")?;
    writeln!(out, "-------------------------------------------------------------")?;
    Ok(())
}

fn _print_footer<T: FloatT>(
    out: &mut PrintTarget,
    status: SolverStatus,
    iterations: u32,
    solve_time: f64,
    objective: T,
) -> std::io::Result<()> {
    writeln!(out, "-------------------------------------------------------------")?;
    writeln!(out, "status    : {}", status)?;
    writeln!(out, "iterations: {}", iterations)?;
    writeln!(out, "objective : {:+.6e}", objective)?;
    writeln!(out, "solve time: {:.3e}s", solve_time)?;
    writeln!(out)?;
    out.flush()
}

fn _bool_on_off(v: bool) -> &'static str {
    match v {
        true => "on",
        false => "off",
    }
}

fn _fmt_time(t: f64) -> String {
    if t.is_finite() {
        format!("{}s", t)
    } else {
        "none".to_string()
    }
}

#[test]
fn test_describe_blocking() {
    assert_eq!(
        describe_blocking(&Blocking::Bound(3, SubjectToStatus::Lower)),
        "add(l) bnd 3"
    );
    assert_eq!(
        describe_blocking(&Blocking::Constraint(0, SubjectToStatus::Inactive)),
        "rem con 0"
    );
}
