use super::*;
use proptest::{collection::vec, prop_assert, prop_assert_eq, proptest};
use std::{string::String, vec::Vec};

fn trace_init() -> tracing::dispatcher::DefaultGuard {
    use tracing_subscriber::prelude::*;
    tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::TRACE)
        .with_target(false)
        .with_timer(())
        .set_default()
}

fn queue_of(values: &[&str]) -> Queue {
    values.iter().copied().collect()
}

#[test]
fn empty_group() {
    let mut group = Group::new();
    assert!(group.is_empty());
    assert_eq!(group.len(), 0);
    assert!(group.first().is_none());
    assert_eq!(group.merge(Order::Ascending), 0);

    let group = Group::try_new().expect("allocating a sentinel should succeed");
    assert!(group.is_empty());
}

#[test]
fn push_assigns_ids_and_sizes() {
    let mut a = queue_of(&["a", "b"]);
    let mut b = Queue::new();
    let mut c = queue_of(&["c"]);

    let mut group = Group::default();
    assert_eq!(group.push(&mut a), Ok(0));
    assert_eq!(group.push(&mut b), Ok(1));
    assert_eq!(group.push(&mut c), Ok(2));
    assert_eq!(group.len(), 3);

    let entries: Vec<(usize, usize)> = group.iter().map(|ctx| (ctx.id(), ctx.size())).collect();
    assert_eq!(entries, [(0, 2), (1, 0), (2, 1)]);

    let first = group.first().unwrap();
    assert_eq!(first.id(), 0);
    assert_eq!(first.queue().to_vec(), ["a", "b"]);
}

#[test]
fn single_member_returns_cached_size() {
    let mut queue = queue_of(&["c", "a", "b"]);
    let mut group = Group::new();
    group.push(&mut queue).unwrap();

    // the queue is not sorted, and a lone member is not touched
    assert_eq!(group.merge(Order::Ascending), 3);
    drop(group);
    assert_eq!(queue.to_vec(), ["c", "a", "b"]);
}

#[test]
fn merge_singletons() {
    let _trace = trace_init();
    let mut queues: Vec<Queue> = ["d", "b", "e", "a", "c"]
        .into_iter()
        .map(|value| queue_of(&[value]))
        .collect();

    let mut group = Group::new();
    for queue in &mut queues {
        group.push(queue).unwrap();
    }

    assert_eq!(group.merge(Order::Ascending), 5);
    assert_eq!(group.first().map(Context::size), Some(5));
    assert!(group.iter().skip(1).all(|ctx| ctx.size() == 0));
    drop(group);

    assert_eq!(queues[0].to_vec(), ["a", "b", "c", "d", "e"]);
    for queue in &queues[1..] {
        assert!(queue.is_empty());
        queue.assert_valid();
    }
    queues[0].assert_valid();
}

#[test]
fn merge_descending_with_empty_members() {
    let _trace = trace_init();
    let mut a = Queue::new();
    let mut b = queue_of(&["z", "m", "a"]);
    let mut c = Queue::new();
    let mut d = queue_of(&["y", "m"]);

    let mut group = Group::new();
    for queue in [&mut a, &mut b, &mut c, &mut d] {
        group.push(queue).unwrap();
    }

    assert_eq!(group.merge(Order::Descending), 5);
    drop(group);

    a.assert_valid();
    assert_eq!(a.to_vec(), ["z", "y", "m", "m", "a"]);
    assert!(b.is_empty());
    assert!(c.is_empty());
    assert!(d.is_empty());
}

#[test]
fn merge_keeps_earlier_members_first_on_ties() {
    let mut a = queue_of(&["k"]);
    let mut b = queue_of(&["k"]);
    let first = a.front().unwrap() as *const str;
    let second = b.front().unwrap() as *const str;

    let mut group = Group::new();
    group.push(&mut a).unwrap();
    group.push(&mut b).unwrap();
    assert_eq!(group.merge(Order::Ascending), 2);
    drop(group);

    let merged: Vec<*const str> = a.iter().map(|s| s as *const str).collect();
    assert_eq!(merged, [first, second]);
}

#[test]
fn merge_uses_cached_first_size() {
    let mut a = queue_of(&["a", "c"]);
    let mut b = queue_of(&["b"]);

    let mut group = Group::new();
    group.push(&mut a).unwrap();
    group.push(&mut b).unwrap();

    // the cached size of the first member is reported as-is, plus whatever
    // is moved into it
    assert_eq!(group.merge(Order::Ascending), 3);
    assert_eq!(group.first().map(Context::queue).map(Queue::len), Some(3));

    // merging again moves nothing
    assert_eq!(group.merge(Order::Ascending), 3);
}

#[test]
fn cached_sizes_match_queues_after_merge() {
    let mut a = queue_of(&["a"]);
    let mut b = queue_of(&["b", "c"]);
    let mut c = queue_of(&["d"]);

    let mut group = Group::new();
    for queue in [&mut a, &mut b, &mut c] {
        group.push(queue).unwrap();
    }
    let sizes: Vec<usize> = group.iter().map(Context::size).collect();
    assert_eq!(sizes, [1, 2, 1]);

    assert_eq!(group.merge(Order::Ascending), 4);
    for context in &group {
        assert_eq!(context.size(), context.queue().len(), "{context:?}");
    }
    let sizes: Vec<usize> = group.iter().map(Context::size).collect();
    assert_eq!(sizes, [4, 0, 0]);
}

#[test]
fn dropping_group_keeps_queues() {
    let mut a = queue_of(&["a", "b"]);
    {
        let mut group = Group::new();
        group.push(&mut a).unwrap();
        assert!(std::format!("{group:?}").contains("Context"));
    }
    a.assert_valid();
    assert_eq!(a.to_vec(), ["a", "b"]);
}

proptest! {
    #[test]
    fn merge_matches_sorted_concat(
        members in vec(vec("[a-e]{0,2}", 0..8), 0..6),
        descending in proptest::bool::ANY,
    ) {
        let order = if descending { Order::Descending } else { Order::Ascending };

        let mut queues: Vec<Queue> = members
            .iter()
            .map(|values| {
                let mut queue: Queue = values.iter().map(String::as_str).collect();
                queue.sort(order);
                queue
            })
            .collect();

        let mut expected: Vec<String> = members.iter().flatten().cloned().collect();
        expected.sort();
        if descending {
            expected.reverse();
        }

        let mut group = Group::new();
        for queue in &mut queues {
            group.push(queue).unwrap();
        }
        prop_assert_eq!(group.merge(order), expected.len());
        drop(group);

        if let Some((first, rest)) = queues.split_first() {
            first.assert_valid();
            let merged: Vec<String> = first.iter().map(String::from).collect();
            prop_assert_eq!(merged, expected);
            for queue in rest {
                prop_assert!(queue.is_empty());
            }
        } else {
            prop_assert!(expected.is_empty());
        }
    }
}
