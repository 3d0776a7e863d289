use indexed_skiplist::SkipList;

#[global_allocator]
static ALLOCATOR: checkers::Allocator = checkers::Allocator::system();

#[checkers::test]
fn test_allocations() {
    let mut sk = SkipList::with_seed(4, 17);
    let _: Vec<u32> = sk.iter().cloned().collect();
    let _ = sk.get_at(0);

    for i in (0..50u32).rev() {
        sk.insert(i);
    }
    sk.contains(&13);
    sk.insert(13);
    let _: Vec<u32> = sk.iter().cloned().collect();
    let _ = sk.get_at(1);
    let _ = sk.index_of(&1);
    for i in (0..50u32).step_by(4) {
        sk.remove(&i);
    }
    sk.relevel();
    let cloned = sk.clone();
    let _: Vec<u32> = cloned.into_iter().take(3).collect();
    sk.clear();
    sk.insert(7);
}

#[checkers::test]
fn test_heap_values() {
    let mut sk = SkipList::with_seed(3, 23);
    for i in 0..30 {
        sk.insert(format!("value-{:03}", i));
    }
    sk.remove(&"value-000".to_string());
    sk.remove(&"value-015".to_string());
    sk.insert("value-015".to_string());
    assert!(!sk.insert("value-015".to_string()));
    let _ = sk.insert_with_height("value-100".to_string(), 9);
}
