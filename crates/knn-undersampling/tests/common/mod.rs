//! Data generation utilities for testing.

#![allow(dead_code)]

use knn_undersampling::{
    core::{
        feature_space::Coordinate,
        metric::{Euclidean, Metric},
        Attribute, Dataset, Header, Instance, Value,
    },
    Error, LinearSearch, NeighborSearch, SelfMatch,
};
use rand::prelude::*;

/// A header with one numeric attribute `x` and a class `{A, B}`.
fn line_header(name: &str) -> Header {
    Header::new(name, vec![Attribute::numeric("x"), Attribute::nominal("class", ["A", "B"])], 1).unwrap()
}

/// Instances on a line, given as `(x, class)`.
pub fn line(name: &str, rows: &[(f64, usize)]) -> Dataset {
    let instances = rows
        .iter()
        .map(|&(x, c)| Instance::new(vec![Value::Numeric(x), Value::Nominal(c)]))
        .collect();
    Dataset::new(line_header(name), instances).unwrap()
}

/// Six instances, `A B A A B A`, one unit apart.
///
/// With `k = 2` and self excluded, every `A` has a `B` among its two nearest
/// neighbors.
pub fn interleaved() -> Dataset {
    line("interleaved", &[(0.0, 0), (1.0, 1), (2.0, 0), (3.0, 0), (4.0, 1), (5.0, 0)])
}

/// Four `A`s near 0 and two `B`s near 100.
pub fn separated() -> Dataset {
    line(
        "separated",
        &[(0.0, 0), (0.1, 0), (0.2, 0), (0.3, 0), (100.0, 1), (100.1, 1)],
    )
}

/// A random dataset with `dim` numeric attributes, one nominal attribute
/// `colour` with three labels, and a class `{maj, min}` where roughly
/// `minority` of the instances are `min`.
///
/// With `missing`, about one value in twenty, class labels included, is
/// missing.
pub fn tabular(car: usize, dim: usize, minority: f64, missing: bool, seed: u64) -> Dataset {
    let mut rng = StdRng::seed_from_u64(seed);

    let mut attributes = (0..dim).map(|j| Attribute::numeric(format!("x{j}"))).collect::<Vec<_>>();
    attributes.push(Attribute::nominal("colour", ["red", "green", "blue"]));
    attributes.push(Attribute::nominal("class", ["maj", "min"]));
    let header = Header::new("tabular", attributes, dim + 1).unwrap();

    let instances = (0..car)
        .map(|_| {
            let mut values = (0..dim)
                .map(|_| Value::Numeric(rng.gen_range(-10.0..10.0)))
                .collect::<Vec<_>>();
            values.push(Value::Nominal(rng.gen_range(0..3)));
            values.push(Value::Nominal(usize::from(rng.gen_bool(minority))));
            if missing {
                for v in &mut values {
                    if rng.gen_bool(0.05) {
                        *v = Value::Missing;
                    }
                }
            }
            Instance::new(values)
        })
        .collect();

    Dataset::new(header, instances).unwrap()
}

/// A random dataset with only numeric attributes besides the class.
pub fn numeric(car: usize, dim: usize, minority: f64, seed: u64) -> Dataset {
    let mut rng = StdRng::seed_from_u64(seed);

    let mut attributes = (0..dim).map(|j| Attribute::numeric(format!("x{j}"))).collect::<Vec<_>>();
    attributes.push(Attribute::nominal("class", ["maj", "min"]));
    let header = Header::new("numeric", attributes, dim).unwrap();

    let instances = (0..car)
        .map(|_| {
            let mut values = (0..dim).map(|_| Value::Numeric(rng.gen())).collect::<Vec<_>>();
            values.push(Value::Nominal(usize::from(rng.gen_bool(minority))));
            Instance::new(values)
        })
        .collect();

    Dataset::new(header, instances).unwrap()
}

/// A linear search whose queries fail for every odd index.
pub struct Flaky(pub LinearSearch);

impl NeighborSearch for Flaky {
    fn name(&self) -> &str {
        "Flaky"
    }

    fn prepare(&mut self, data: &Dataset) -> Result<(), Error> {
        self.0.prepare(data)
    }

    fn query(&self, query: &Instance, k: usize) -> Result<Vec<(usize, f64)>, Error> {
        self.0.query(query, k)
    }

    fn query_indexed(&self, index: usize, k: usize, self_match: SelfMatch) -> Result<Vec<(usize, f64)>, Error> {
        if index % 2 == 1 {
            Err(Error::NeighborQuery(format!("index {index} is unreachable")))
        } else {
            self.0.query_indexed(index, k, self_match)
        }
    }
}

/// Squared Euclidean distance, which breaks the triangle inequality.
#[derive(Debug, Clone, Copy, Default)]
pub struct SquaredEuclidean;

impl Metric for SquaredEuclidean {
    fn name(&self) -> &str {
        "squared-euclidean"
    }

    fn distance(&self, coordinates: &[Coordinate], a: &[f64], b: &[f64]) -> f64 {
        Euclidean.distance(coordinates, a, b).powi(2)
    }

    fn obeys_triangle_inequality(&self) -> bool {
        false
    }
}
