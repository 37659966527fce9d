#![no_main]

use libfuzzer_sys::fuzz_target;
use lrukit::lru::LruCore;
use lrukit::strategy::NoopListener;

// Fuzz arbitrary operation sequences on LruCore with a value-derived cost.
//
// The first byte picks a budget in -8..=247; every following pair of bytes
// is (op, operand). Invariants are checked after every step.
fuzz_target!(|data: &[u8]| {
    let Some((&budget, ops)) = data.split_first() else {
        return;
    };
    let max_size = isize::from(budget) - 8;
    let mut cache =
        LruCore::with_policies(max_size, |_: &u8, v: &u8| usize::from(*v % 16), NoopListener);

    for pair in ops.chunks_exact(2) {
        let (op, operand) = (pair[0] % 7, pair[1]);
        let key = operand % 32;

        match op {
            0 | 1 => {
                cache.put(key, operand);
                if cache.contains(&key) {
                    assert_eq!(cache.all_keys().first(), Some(&key));
                }
            }
            2 => {
                let before = cache.all_keys();
                if cache.get(&key).is_some() {
                    assert_eq!(cache.all_keys().first(), Some(&key));
                    assert_eq!(cache.count(), before.len());
                }
            }
            3 => {
                let before = cache.all_keys();
                let _ = cache.peek(&key);
                assert_eq!(cache.all_keys(), before);
            }
            4 => {
                let had = cache.contains(&key);
                assert_eq!(cache.remove(&key), had);
                assert!(!cache.contains(&key));
            }
            5 => {
                let bound = operand % 32;
                let before = cache.count();
                let removed = cache.remove_if(|k| *k < bound);
                assert_eq!(cache.count(), before - removed);
                assert!(cache.iter().all(|(k, _)| *k >= bound));
            }
            _ => {
                if operand == 0 {
                    cache.remove_all();
                    assert!(cache.is_empty());
                    assert_eq!(cache.size(), 0);
                }
            }
        }

        if let Err(e) = cache.check_invariants() {
            panic!("invariant violated: {}", e);
        }
    }
});
