use std::time::{SystemTime, UNIX_EPOCH};

use rand::{rngs::SmallRng, Rng, SeedableRng};

use crate::bst::Bst;
use crate::error::Error;
use crate::Splay;

fn pre_order(index: &Bst<i64, i64, Splay>) -> Vec<i64> {
    index.pre_order().map(|e| *e.key).collect()
}

#[test]
fn test_access_moves_to_root() {
    let mut index: Bst<i64, i64, Splay> = Bst::new("splay");
    index.set(10, 10);
    index.set(20, 20);
    index.set(5, 5);
    assert_eq!(index.root_key(), Some(&5));

    assert!(index.contains_key(&20));
    assert_eq!(index.root_key(), Some(&20));
    assert_eq!(index.lookup(&10), Ok(&10));
    assert_eq!(index.root_key(), Some(&10));
    assert!(index.validate().is_ok());
}

#[test]
fn test_miss_keeps_shape() {
    let mut index: Bst<i64, i64, Splay> = Bst::new("splay");
    for key in [40, 20, 60, 10, 30].iter() {
        index.set(*key, *key);
    }
    let before = pre_order(&index);
    assert_eq!(index.get(&25), None);
    assert_eq!(index.lookup(&99), Err(Error::KeyNotFound(99)));
    assert!(!index.remove(&15));
    assert_eq!(pre_order(&index), before);
}

#[test]
fn test_overwrite_splays() {
    let mut index: Bst<i64, i64, Splay> = Bst::new("splay");
    for key in 0..10 {
        index.set(key, key);
    }
    assert_eq!(index.root_key(), Some(&9));
    assert_eq!(index.set(3, 300), Some(3));
    assert_eq!(index.root_key(), Some(&3));
    assert!(index.validate().is_ok());
}

// sorted inserts leave a left leaning chain, reaching the deepest node
// roughly halves the depth along the access path.
#[test]
fn test_zig_zig_chain() {
    let mut index: Bst<i64, i64, Splay> = Bst::new("splay");
    for key in 1..=7 {
        index.set(key, key);
    }
    assert_eq!(pre_order(&index), vec![7, 6, 5, 4, 3, 2, 1]);
    assert_eq!(index.get(&1), Some(&1));
    assert_eq!(pre_order(&index), vec![1, 6, 4, 2, 3, 5, 7]);
    assert_eq!(index.validate().unwrap().depths().unwrap().max(), 4);
}

#[test]
fn test_zig_zag() {
    let mut index: Bst<i64, i64, Splay> = Bst::new("splay");
    for key in [50, 30, 70].iter() {
        index.set(*key, *key);
    }
    // 70 at root, 50 under it on the left, 30 under 50 on the left.
    assert_eq!(pre_order(&index), vec![70, 50, 30]);
    index.set(40, 40);
    assert_eq!(index.root_key(), Some(&40));
    assert!(index.validate().is_ok());
    assert_eq!(index.keys(), vec![30, 40, 50, 70]);
}

#[test]
fn test_random_access() {
    let seed: u128 = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    println!("seed {}", seed);
    let mut rng = SmallRng::from_seed(seed.to_le_bytes());

    let mut index: Bst<i64, i64, Splay> = Bst::new("splay");
    for _ in 0..1000 {
        let key = rng.gen_range(0, 500);
        index.set(key, key);
        assert_eq!(index.root_key(), Some(&key), "seed {}", seed);
    }
    for _ in 0..1000 {
        let key = rng.gen_range(0, 500);
        if index.get(&key).is_some() {
            assert_eq!(index.root_key(), Some(&key), "seed {}", seed);
        }
        if rng.gen::<u8>() % 8 == 0 {
            index.remove(&key);
        }
        if let Err(err) = index.validate() {
            panic!("seed {} invalid {:?}", seed, err);
        }
    }
}
