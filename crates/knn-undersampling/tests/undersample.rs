//! Properties of a complete filtering pass.

mod common;

use std::sync::{mpsc, Arc, Mutex};

use knn_undersampling::{
    core::{Attribute, Dataset, Header, Instance, Value},
    undersample::{ChannelSubscriber, Event},
    BallTree, ClassLabel, Error, Filter, FilterOutput, LinearSearch, NeighborSearch, Params, SelfMatch,
};
use test_case::test_case;

/// The indices of the instances of `data` with the given class.
fn with_class(data: &Dataset, class: Option<usize>) -> Vec<usize> {
    (0..data.cardinality())
        .filter(|&i| data.class_label(i) == class)
        .collect()
}

/// Checks the guarantees that hold for every pass.
fn check_output(input: &Dataset, out: &FilterOutput, majority: usize) {
    assert_eq!(out.dataset.header(), input.header());
    assert_eq!(out.dataset.cardinality() + out.removed.len(), input.cardinality());
    assert_eq!(out.report.input_size, input.cardinality());
    assert_eq!(out.report.output_size, out.dataset.cardinality());
    assert_eq!(out.report.removed, out.removed.len());

    // Only majority instances are removed, and the rest keep their order.
    assert!(out.removed.iter().all(|i| input.class_label(i) == Some(majority)));
    let retained = (0..input.cardinality())
        .filter(|&i| !out.removed.contains(i))
        .map(|i| input.get(i).clone())
        .collect::<Vec<_>>();
    assert_eq!(out.dataset.instances(), retained);
}

fn run(data: &Dataset, params: Params) -> FilterOutput {
    let majority = params.validate(data.header()).unwrap();
    let out = Filter::new(params).apply(data).unwrap();
    check_output(data, &out, majority);
    out
}

#[test]
fn interleaved() {
    let data = common::interleaved();
    let out = run(&data, Params::default().with_k(2));

    assert_eq!(out.removed.iter().collect::<Vec<_>>(), vec![0, 2, 3, 5]);
    assert_eq!(out.dataset.cardinality(), 2);
    assert!((0..2).all(|i| out.dataset.class_label(i) == Some(1)));
}

#[test]
fn separated() {
    let data = common::separated();
    let out = run(&data, Params::default().with_k(2));

    assert!(out.removed.is_empty());
    assert_eq!(out.dataset, data);
    assert_eq!(out.report.candidates, 4);
}

#[test]
fn k_larger_than_dataset() {
    // Every `A` sees all five others, two of which are `B`s.
    let data = common::interleaved();

    let out = run(&data, Params::default().with_k(50).with_threshold(2));
    assert_eq!(out.removed.len(), 4);

    let out = run(&data, Params::default().with_k(50).with_threshold(3));
    assert!(out.removed.is_empty());

    for search in [
        Box::new(LinearSearch::default()) as Box<dyn NeighborSearch>,
        Box::new(BallTree::default()),
    ] {
        let params = Params::default().with_k(usize::MAX).with_threshold(2);
        let out = Filter::new(params).with_search(search).apply(&data).unwrap();
        check_output(&data, &out, 0);
        assert_eq!(out.removed.iter().collect::<Vec<_>>(), vec![0, 2, 3, 5]);
    }
}

#[test_case(1, false; "k = 1")]
#[test_case(5, false; "k = 5")]
#[test_case(5, true; "k = 5 with missing values")]
#[test_case(17, true; "k = 17 with missing values")]
fn zero_threshold_removes_all_majority(k: usize, missing: bool) {
    let data = common::tabular(120, 3, 0.3, missing, 1);
    let out = run(&data, Params::default().with_k(k).with_threshold(0));

    assert_eq!(out.removed.iter().collect::<Vec<_>>(), with_class(&data, Some(0)));
    assert!((0..out.dataset.cardinality()).all(|i| out.dataset.class_label(i) != Some(0)));
}

#[test_case(1; "k = 1")]
#[test_case(5; "k = 5")]
fn threshold_above_k_removes_nothing(k: usize) {
    let data = common::tabular(120, 3, 0.5, true, 2);
    let out = run(&data, Params::default().with_k(k).with_threshold(k + 1));

    assert!(out.removed.is_empty());
    assert_eq!(out.dataset, data);
}

#[test_case(0; "majority is first label")]
#[test_case(1; "majority is second label")]
fn other_classes_are_kept(majority: usize) {
    let data = common::tabular(200, 4, 0.4, true, 3);
    let out = run(&data, Params::default().with_k(3).with_majority_label(ClassLabel::Index(majority)));

    let majority_count = with_class(&data, Some(majority)).len();
    assert_eq!(out.report.candidates, majority_count);
    assert_eq!(out.dataset.cardinality(), data.cardinality() - out.removed.len());
    for class in [Some(1 - majority), None] {
        assert_eq!(with_class(&out.dataset, class).len(), with_class(&data, class).len());
    }
}

#[test]
fn majority_by_name() {
    let data = common::tabular(100, 2, 0.3, false, 4);
    let by_index = run(&data, Params::default().with_majority_label(ClassLabel::Index(1)));
    let by_name = run(&data, Params::default().with_majority_label(ClassLabel::Name("min".to_string())));
    assert_eq!(by_index.removed, by_name.removed);
}

#[test]
fn repeated_passes() {
    let mut data = common::tabular(200, 3, 0.3, false, 5);
    let params = Params::default().with_k(3);

    // Each pass removes at least one instance or changes nothing, so this
    // stops within `cardinality` passes.
    for _ in 0..data.cardinality() {
        let out = run(&data, params.clone());
        if out.removed.is_empty() {
            assert_eq!(out.dataset, data);
            return;
        }
        assert!(out.dataset.cardinality() < data.cardinality());
        data = out.dataset;
    }
    panic!("repeated passes did not settle");
}

#[test_case(SelfMatch::Exclude; "exclude self")]
#[test_case(SelfMatch::Include; "include self")]
fn parallel_matches_sequential(self_match: SelfMatch) {
    let data = common::tabular(400, 5, 0.25, true, 6);
    let params = Params::default().with_k(7).with_threshold(2).with_self_match(self_match);

    let seq = run(&data, params.clone());
    let par = run(&data, params.with_parallel(true));
    assert_eq!(seq.removed, par.removed);
    assert_eq!(seq.dataset, par.dataset);
}

#[test_case(1; "threshold 1")]
#[test_case(3; "threshold 3")]
fn ball_tree_matches_linear(threshold: usize) {
    let data = common::tabular(400, 3, 0.3, true, 8);
    let params = Params::default().with_k(5).with_threshold(threshold);

    let linear = Filter::new(params.clone())
        .with_search(LinearSearch::default())
        .apply(&data)
        .unwrap();
    let tree = Filter::new(params)
        .with_search(BallTree::default().with_leaf_size(4))
        .apply(&data)
        .unwrap();
    assert_eq!(linear.removed, tree.removed);
    assert_eq!(linear.dataset, tree.dataset);
    assert_eq!(tree.report.search, "BallTree");
}

#[test]
fn self_inclusion_is_more_conservative() {
    // With self included, one of the `k` slots always holds the instance
    // itself, so the other `k - 1` are the nearest of the excluded variant.
    let data = common::numeric(300, 3, 0.3, 9);
    for k in [2, 4, 8] {
        let include = run(&data, Params::default().with_k(k).with_self_match(SelfMatch::Include));
        let narrower = run(&data, Params::default().with_k(k - 1));
        let exclude = run(&data, Params::default().with_k(k));

        assert_eq!(include.removed, narrower.removed);
        assert!(include.removed.iter().all(|i| exclude.removed.contains(i)));
    }
}

#[test]
fn missing_class_is_minority() {
    let header = Header::new("m", vec![Attribute::numeric("x"), Attribute::nominal("class", ["A", "B"])], 1).unwrap();
    let instances = [(0.0, Value::Nominal(0)), (1.0, Value::Missing), (5.0, Value::Nominal(0)), (6.0, Value::Nominal(0))]
        .into_iter()
        .map(|(x, c)| Instance::new(vec![Value::Numeric(x), c]))
        .collect();
    let data = Dataset::new(header, instances).unwrap();

    let out = run(&data, Params::default().with_k(1));
    assert_eq!(out.removed.iter().collect::<Vec<_>>(), vec![0]);
    assert_eq!(out.dataset.class_label(0), None);
}

#[test]
fn errors_before_any_scan() {
    let (tx, rx) = mpsc::channel();
    let filter = |params: Params| Filter::new(params).with_subscriber(ChannelSubscriber::new(tx.clone()));
    let data = common::interleaved();

    let bad_params = [
        Params::default().with_k(0),
        Params::default().with_majority_label(ClassLabel::Name("C".to_string())),
        Params::default().with_majority_label(ClassLabel::Index(2)),
    ];
    for params in bad_params {
        assert!(matches!(filter(params).apply(&data), Err(Error::Configuration(_))));
    }

    let mut good = filter(Params::default());
    assert!(matches!(good.apply(&data.empty_like()), Err(Error::InvalidDataset(_))));

    let header = Header::new("c", vec![Attribute::nominal("class", ["A", "B"])], 0).unwrap();
    let class_only = Dataset::new(header, vec![Instance::new(vec![Value::Nominal(0)])]).unwrap();
    assert!(matches!(good.apply(&class_only), Err(Error::InvalidDataset(_))));

    drop(good);
    drop(tx);
    assert_eq!(rx.iter().count(), 0);
}

#[test]
fn metric_is_checked_before_any_scan() {
    let (tx, rx) = mpsc::channel();
    let mut filter = Filter::new(Params::default().with_k(2))
        .with_search(BallTree::new(common::SquaredEuclidean))
        .with_subscriber(ChannelSubscriber::new(tx));
    assert_eq!(filter.search_name(), "BallTree");
    assert!(matches!(filter.apply(&common::interleaved()), Err(Error::Configuration(_))));

    drop(filter);
    assert_eq!(rx.iter().count(), 0);

    // Without pruning, the same metric is fine.
    let out = Filter::new(Params::default().with_k(2))
        .with_search(LinearSearch::new(common::SquaredEuclidean))
        .apply(&common::interleaved())
        .unwrap();
    assert_eq!(out.removed.len(), 4);
}

#[test_case(false; "sequential")]
#[test_case(true; "parallel")]
fn failed_queries_keep_their_instances(parallel: bool) {
    let (tx, rx) = mpsc::channel();
    let data = common::interleaved();
    let params = Params::default().with_k(2).with_parallel(parallel);

    let mut filter = Filter::new(params)
        .with_search(common::Flaky(LinearSearch::default()))
        .with_subscriber(ChannelSubscriber::new(tx));
    let out = filter.apply(&data).unwrap();
    drop(filter);
    check_output(&data, &out, 0);

    // The `A`s at 3 and 5 would be removed, but their queries fail.
    assert_eq!(out.removed.iter().collect::<Vec<_>>(), vec![0, 2]);
    assert_eq!(out.removed.unevaluated(), [3, 5]);
    assert_eq!(out.report.unevaluated, 2);
    assert_eq!(out.report.candidates, 4);
    assert_eq!(out.dataset.instances(), [data.get(1), data.get(3), data.get(4), data.get(5)].map(Instance::clone));

    let events = rx.iter().collect::<Vec<_>>();
    assert_eq!(events.len(), 3);
    assert!(matches!(&events[0], Event::Started { search, .. } if search == "Flaky"));
    assert_eq!(
        events[1],
        Event::Unevaluated {
            dataset: "interleaved".to_string(),
            indices: vec![3, 5],
        }
    );
    assert_eq!(events[2], Event::Finished(out.report));
}

#[test]
fn events_describe_the_pass() {
    let seen = Arc::new(Mutex::new(Vec::<Event>::new()));
    let sink = Arc::clone(&seen);
    let data = common::interleaved();

    let out = Filter::new(Params::default().with_k(2))
        .with_subscriber(move |e: &Event| {
            if let Ok(mut seen) = sink.lock() {
                seen.push(e.clone());
            }
        })
        .apply(&data)
        .unwrap();

    let seen = seen.lock().unwrap();
    assert_eq!(seen.len(), 2);
    assert_eq!(
        seen[0],
        Event::Started {
            dataset: "interleaved".to_string(),
            cardinality: 6,
            search: "LinearSearch".to_string(),
        }
    );
    assert_eq!(seen[1], Event::Finished(out.report));
}

#[test]
fn convenience_function() {
    let data = common::interleaved();
    let cleaned = knn_undersampling::undersample(&data, &Params::default().with_k(2)).unwrap();
    assert_eq!(cleaned.cardinality(), 2);
}
