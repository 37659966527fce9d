#![no_main]

use libfuzzer_sys::fuzz_target;
use lrukit::ds::IntrusiveList;

// Fuzz arbitrary operation sequences on IntrusiveList, including operations
// through ids whose slots have since been freed and reused.
fuzz_target!(|data: &[u8]| {
    let mut list: IntrusiveList<u32> = IntrusiveList::new();
    let mut all_ids = Vec::new();

    for pair in data.chunks_exact(2) {
        let op = pair[0] % 6;
        let value = u32::from(pair[1]);

        match op {
            0 => {
                let id = list.push_front(value);
                all_ids.push(id);
                assert_eq!(list.front(), Some(&value));
                assert_eq!(list.get(id), Some(&value));
            }
            1 => {
                let old_len = list.len();
                match list.pop_front() {
                    Some(_) => assert_eq!(list.len(), old_len - 1),
                    None => assert_eq!(old_len, 0),
                }
            }
            2 => {
                let old_len = list.len();
                match list.pop_back() {
                    Some(_) => assert_eq!(list.len(), old_len - 1),
                    None => assert_eq!(old_len, 0),
                }
            }
            3 => {
                if !all_ids.is_empty() {
                    let id = all_ids[value as usize % all_ids.len()];
                    if list.move_to_front(id) {
                        assert_eq!(list.front_id(), Some(id));
                    } else {
                        assert!(!list.contains(id));
                    }
                }
            }
            4 => {
                if !all_ids.is_empty() {
                    let id = all_ids[value as usize % all_ids.len()];
                    let was_live = list.contains(id);
                    assert_eq!(list.remove(id).is_some(), was_live);
                    assert!(!list.contains(id));
                }
            }
            _ => {
                if value == 0 {
                    list.clear();
                    assert!(list.is_empty());
                }
            }
        }

        if let Err(e) = list.check_links() {
            panic!("list links broken: {}", e);
        }
        assert_eq!(list.iter().count(), list.len());
    }
});
