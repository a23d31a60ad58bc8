use std::collections::BTreeSet;
use std::time::{SystemTime, UNIX_EPOCH};

use rand::{rngs::SmallRng, Rng, SeedableRng};

use crate::balance::{Balance, Plain};
use crate::bst::Bst;
use crate::error::Error;
use crate::{Avl, RedBlack, Splay, Treap};

#[test]
fn test_id() {
    let index: Bst<i64, i64> = Bst::new("test-bst");
    assert_eq!(index.id(), "test-bst".to_string());
}

#[test]
fn test_len() {
    let index: Bst<i64, i64> = Bst::new("test-bst");
    assert_eq!(index.len(), 0);
    assert!(index.is_empty());
    assert_eq!(index.root_key(), None);
}

fn insert_and_count<B: Balance<i64, String> + Default>() {
    let mut index: Bst<i64, String, B> = Bst::new("test-bst");
    assert!(index.set(5, "Five".to_string()).is_none());
    assert!(index.set(3, "Three".to_string()).is_none());
    assert!(index.set(7, "Seven".to_string()).is_none());

    assert_eq!(index.len(), 3);
    assert!(index.contains_key(&5));
    assert!(!index.contains_key(&99));
    assert!(index.validate().is_ok());
}

#[test]
fn test_insert_and_count() {
    insert_and_count::<Plain>();
    insert_and_count::<Avl>();
    insert_and_count::<RedBlack>();
    insert_and_count::<Splay>();
    insert_and_count::<Treap>();
}

fn update_existing<B: Balance<i64, String> + Default>() {
    let mut index: Bst<i64, String, B> = Bst::new("test-bst");
    assert_eq!(index.set(10, "Initial".to_string()), None);
    let old = index.set(10, "Updated".to_string());
    assert_eq!(old, Some("Initial".to_string()));

    assert_eq!(index.len(), 1);
    assert_eq!(index.lookup(&10), Ok(&"Updated".to_string()));
    assert!(index.validate().is_ok());
}

#[test]
fn test_update_existing() {
    update_existing::<Plain>();
    update_existing::<Avl>();
    update_existing::<RedBlack>();
    update_existing::<Splay>();
    update_existing::<Treap>();
}

fn get_and_lookup<B: Balance<i64, String> + Default>() {
    let mut index: Bst<i64, String, B> = Bst::new("test-bst");
    index.set(10, "Ten".to_string());

    assert_eq!(index.get(&10), Some(&"Ten".to_string()));
    assert_eq!(index.get(&99), None);
    assert_eq!(index.lookup(&999), Err(Error::KeyNotFound(999)));
}

#[test]
fn test_get_and_lookup() {
    get_and_lookup::<Plain>();
    get_and_lookup::<Avl>();
    get_and_lookup::<RedBlack>();
    get_and_lookup::<Splay>();
    get_and_lookup::<Treap>();
}

fn clear<B: Balance<i64, i64> + Default>() {
    let mut index: Bst<i64, i64, B> = Bst::new("test-bst");
    index.set(1, 1);
    index.set(2, 2);
    index.clear();

    assert_eq!(index.len(), 0);
    assert!(index.in_order().next().is_none());
    assert!(index.validate().is_ok());

    // reusable after clear.
    index.set(3, 30);
    assert_eq!(index.keys(), vec![3]);
    assert!(index.validate().is_ok());
}

#[test]
fn test_clear() {
    clear::<Plain>();
    clear::<Avl>();
    clear::<RedBlack>();
    clear::<Splay>();
    clear::<Treap>();
}

fn keys_values<B: Balance<i64, &'static str> + Default>() {
    let mut index: Bst<i64, &'static str, B> = Bst::new("test-bst");
    index.extend(vec![(5, "A"), (3, "B"), (7, "C")]);

    assert_eq!(index.keys(), vec![3, 5, 7]);
    assert_eq!(index.values(), vec!["B", "A", "C"]);
}

#[test]
fn test_keys_values() {
    keys_values::<Plain>();
    keys_values::<Avl>();
    keys_values::<RedBlack>();
    keys_values::<Splay>();
    keys_values::<Treap>();
}

//      50
//    /    \
//  30      70
//  / \    /  \
// 20 40  60  80
fn remove_leaf_and_internal<B: Balance<i64, String> + Default>() {
    let mut index: Bst<i64, String, B> = Bst::new("test-bst");
    for key in [50, 30, 70, 20, 40, 60, 80].iter() {
        index.set(*key, key.to_string());
    }

    // leaf
    assert!(index.remove(&20));
    assert!(!index.contains_key(&20));
    assert!(index.validate().is_ok());
    // one child left after 20 went away
    assert!(index.remove(&30));
    assert!(!index.contains_key(&30));
    assert!(index.validate().is_ok());
    // root, two children
    assert_eq!(index.delete(&50), Some("50".to_string()));
    assert!(!index.contains_key(&50));
    assert!(index.validate().is_ok());

    assert!(!index.remove(&50));
    assert_eq!(index.len(), 4);
    assert_eq!(index.keys(), vec![40, 60, 70, 80]);
    let values = vec!["40", "60", "70", "80"];
    assert_eq!(index.values(), values);
}

#[test]
fn test_remove_leaf_and_internal() {
    remove_leaf_and_internal::<Plain>();
    remove_leaf_and_internal::<Avl>();
    remove_leaf_and_internal::<RedBlack>();
    remove_leaf_and_internal::<Splay>();
    remove_leaf_and_internal::<Treap>();
}

#[test]
fn test_remove_two_children_keeps_position() {
    let mut index: Bst<i64, i64> = Bst::new("test-bst");
    for key in [50, 30, 70, 20, 40, 60, 80].iter() {
        index.set(*key, *key * 10);
    }
    // predecessor 40 moves into the root's slot.
    assert_eq!(index.delete(&50), Some(500));
    assert_eq!(index.root_key(), Some(&40));
    let keys: Vec<i64> = index.pre_order().map(|e| *e.key).collect();
    assert_eq!(keys, vec![40, 30, 20, 70, 60, 80]);
    assert_eq!(index.get(&40), Some(&400));
}

fn random_consistency<B: Balance<i64, String> + Default>(seed: u128) {
    let mut rng = SmallRng::from_seed(seed.to_le_bytes());
    let mut index: Bst<i64, String, B> = Bst::new("test-bst");
    let (mut inserted, mut order) = (BTreeSet::new(), vec![]);

    for _ in 0..500 {
        let key: i64 = rng.gen_range(-1000, 1000);
        if inserted.insert(key) {
            order.push(key);
            index.set(key, "v".to_string());
        }
    }
    assert_eq!(index.len(), inserted.len());
    assert_eq!(index.keys(), inserted.iter().cloned().collect::<Vec<i64>>());

    for key in order.iter().take(250) {
        assert!(index.remove(key), "seed {} failed to remove key {}", seed, key);
        inserted.remove(key);
    }
    assert_eq!(index.len(), inserted.len());
    assert_eq!(index.keys(), inserted.iter().cloned().collect::<Vec<i64>>());
    assert!(index.validate().is_ok(), "seed {}", seed);
}

#[test]
fn test_random_consistency() {
    let seed = make_seed();
    println!("seed {}", seed);
    random_consistency::<Plain>(seed);
    random_consistency::<Avl>(seed);
    random_consistency::<RedBlack>(seed);
    random_consistency::<Splay>(seed);
    random_consistency::<Treap>(seed);
}

#[test]
fn test_crud() {
    let seed = make_seed();
    println!("seed {}", seed);
    crud_against_ref(&mut Bst::<i64, i64, Plain>::new("plain"), 1000, 10_000, seed);
    crud_against_ref(&mut Bst::<i64, i64, Avl>::new("avl"), 1000, 10_000, seed);
    crud_against_ref(&mut Bst::<i64, i64, RedBlack>::new("rb"), 1000, 10_000, seed);
    crud_against_ref(&mut Bst::<i64, i64, Splay>::new("splay"), 1000, 10_000, seed);
    let treap = Treap::with_seed(seed);
    let mut index = Bst::with_balance("treap", <i64 as Ord>::cmp, treap);
    crud_against_ref(&mut index, 1000, 10_000, seed);
}

#[test]
fn test_comparator() {
    let cmp = |a: &i64, b: &i64| b.cmp(a);
    let mut index: Bst<i64, i64, RedBlack> = Bst::with_comparator("desc", cmp);
    for key in 0..100 {
        index.set(key, key);
    }
    assert!(index.validate().is_ok());
    assert_eq!(index.keys(), (0..100).rev().collect::<Vec<i64>>());
    assert!(index.remove(&42));
    assert!(index.validate().is_ok());
    assert_eq!(index.len(), 99);
}

#[test]
fn test_iter_and_collect() {
    let index: Bst<i64, i64, Avl> = (0..10).rev().map(|key| (key, key * 10)).collect();
    let items: Vec<(i64, i64)> = index.iter().map(|(k, v)| (*k, *v)).collect();
    assert_eq!(items, (0..10).map(|key| (key, key * 10)).collect::<Vec<_>>());

    let mut n = 0;
    for (key, value) in &index {
        assert_eq!(*value, *key * 10);
        n += 1;
    }
    assert_eq!(n, 10);

    let loaded: Bst<i64, i64> = Bst::load_from("loaded", vec![(1, 1), (1, 2), (0, 0)]);
    assert_eq!(loaded.len(), 2);
    assert_eq!(loaded.values(), vec![0, 2]);
}

#[test]
fn test_clone() {
    let mut index: Bst<i64, i64, RedBlack> = Bst::new("test-bst");
    for key in 0..20 {
        index.set(key, key);
    }
    let mut other = index.clone();
    other.remove(&3);
    assert_eq!(index.len(), 20);
    assert_eq!(other.len(), 19);
    assert!(index.validate().is_ok());
    assert!(other.validate().is_ok());
}

#[test]
fn test_stats() {
    let mut index: Bst<i64, i64> = Bst::new("test-bst");
    assert!(index.validate().unwrap().depths().is_none());

    for key in [50, 30, 70, 20, 40, 60, 80].iter() {
        index.set(*key, *key);
    }
    let stats = index.stats();
    assert_eq!(stats.entries(), 7);
    assert!(stats.node_size() > 0);
    assert!(stats.depths().is_none());

    let stats = index.validate().unwrap();
    assert_eq!(stats.height(), None);
    assert_eq!(stats.blacks(), None);
    let depths = stats.depths().unwrap();
    assert_eq!(depths.samples(), 4);
    assert_eq!((depths.min(), depths.mean(), depths.max()), (2, 2, 2));
    assert_eq!(depths.percentiles(), vec![(100, 2)]);
    assert!(depths.to_string().starts_with("depth (min, avg, max): (2, 2, 2)"));

    // degenerate chain, depths beyond any fixed histogram width.
    let mut chain: Bst<i64, i64> = Bst::new("chain");
    for key in 0..300 {
        chain.set(key, key);
    }
    let depths = chain.validate().unwrap().depths().unwrap();
    assert_eq!((depths.samples(), depths.min(), depths.max()), (1, 299, 299));
}

#[test]
fn test_error_display() {
    let err: Error<i64> = Error::InvalidConfig("empty".to_string());
    assert_eq!(err.to_string(), "invalid config: empty");
    assert_eq!(Error::KeyNotFound(1).to_string(), "key not found");
    assert_eq!(Error::<i64>::CountMismatch(2, 1).to_string(), "count mismatch: counted 2 reachable 1");
}

include!("./ref_test.rs");
