#![allow(non_snake_case)]

use crate::algebra::*;
use crate::solver::implementations::constrained::QPProblem;

use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::io::Write;
use std::{fs::File, io, io::Read};

/// Owned data of one QP, as read from or written to a JSON file.
///
/// Absent bounds are infinite.  `A` may be absent for problems with
/// simple bounds only.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(bound = "T: Serialize + DeserializeOwned")]
pub struct QPData<T: FloatT> {
    pub H: Option<Matrix<T>>,
    pub g: Vec<T>,
    pub A: Option<Matrix<T>>,
    pub lb: Option<Vec<T>>,
    pub ub: Option<Vec<T>>,
    pub lbA: Option<Vec<T>>,
    pub ubA: Option<Vec<T>>,
}

impl<T> QPData<T>
where
    T: FloatT + DeserializeOwned + Serialize,
{
    pub fn from_problem(problem: &QPProblem<T>) -> Self {
        Self {
            H: problem.H.cloned(),
            g: problem.g.to_vec(),
            A: Some(problem.A.clone()),
            lb: problem.lb.map(|v| v.to_vec()),
            ub: problem.ub.map(|v| v.to_vec()),
            lbA: problem.lbA.map(|v| v.to_vec()),
            ubA: problem.ubA.map(|v| v.to_vec()),
        }
    }

    /// Borrowed view for [`ConstrainedQP::init_with_guess`](crate::solver::ConstrainedQP::init_with_guess).
    /// `None` if there is no constraint matrix.
    pub fn problem(&self) -> Option<QPProblem<'_, T>> {
        Some(QPProblem {
            H: self.H.as_ref(),
            g: &self.g,
            A: self.A.as_ref()?,
            lb: self.lb.as_deref(),
            ub: self.ub.as_deref(),
            lbA: self.lbA.as_deref(),
            ubA: self.ubA.as_deref(),
        })
    }

    pub fn write_to_file(&self, file: &mut File) -> Result<(), io::Error> {
        let mut json_data = self.clone();

        // infinite bounds can't be represented in json
        sanitize_bounds(&mut json_data);

        let json = serde_json::to_string(&json_data)?;
        file.write_all(json.as_bytes())?;
        Ok(())
    }

    pub fn read_from_file(file: &mut File) -> Result<Self, io::Error> {
        let mut buffer = String::new();
        file.read_to_string(&mut buffer)?;
        let mut json_data: Self = serde_json::from_str(&buffer)?;

        desanitize_bounds(&mut json_data);
        Ok(json_data)
    }
}

fn bound_vectors<T: FloatT>(data: &mut QPData<T>) -> impl Iterator<Item = &mut Vec<T>> {
    [&mut data.lb, &mut data.ub, &mut data.lbA, &mut data.ubA]
        .into_iter()
        .flatten()
}

fn sanitize_bounds<T: FloatT>(data: &mut QPData<T>) {
    for v in bound_vectors(data) {
        v.scalarop(|x| {
            if x == T::infinity() {
                T::max_value()
            } else if x == -T::infinity() {
                -T::max_value()
            } else {
                x
            }
        });
    }
}

fn desanitize_bounds<T: FloatT>(data: &mut QPData<T>) {
    for v in bound_vectors(data) {
        v.scalarop(|x| {
            if x == T::max_value() {
                T::infinity()
            } else if x == -T::max_value() {
                -T::infinity()
            } else {
                x
            }
        });
    }
}

#[test]
fn test_json_io() {
    use crate::solver::*;
    use std::io::{Seek, SeekFrom};

    let H = Matrix::<f64>::identity(2);
    let A = Matrix::from(&[[1.0, 1.0]]);
    let data = QPData {
        H: Some(H),
        g: vec![-1.0, -1.0],
        A: Some(A),
        lb: Some(vec![f64::NEG_INFINITY, 0.0]),
        ub: None,
        lbA: None,
        ubA: Some(vec![1.0]),
    };

    // write the problem to a file
    let mut file = tempfile::tempfile().unwrap();
    data.write_to_file(&mut file).unwrap();

    // read the problem from the file
    file.seek(SeekFrom::Start(0)).unwrap();
    let data2 = QPData::<f64>::read_from_file(&mut file).unwrap();
    assert_eq!(data, data2);

    let settings = QPSettingsBuilder::default()
        .print_level(PrintLevel::None)
        .build()
        .unwrap();
    let mut qp = ConstrainedQP::<f64>::new(2, 1, settings).unwrap();
    let problem = data2.problem().unwrap();
    let result = qp
        .init_with_guess(&problem, &InitialGuess::default(), SolveBudget::default())
        .unwrap();
    assert_eq!(result.status, SolverStatus::Solved);
    let x = qp.primal_solution().unwrap();
    assert!((x[0] - 0.5).abs() < 1e-9);
}
